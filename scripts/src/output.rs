//! Console output helpers shared by the bins

use std::fmt::Display;

/// Print a section header
pub fn print_header(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

/// Print a labelled value
pub fn print_field(label: &str, value: impl Display) {
    println!("   {:<12} {}", format!("{label}:"), value);
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {}", msg);
}

pub fn print_waiting(msg: &str) {
    println!("⏳ {}", msg);
}

pub fn print_success(msg: &str) {
    println!("✅ {}", msg);
}

/// Errors go to stderr
pub fn print_error(msg: &str) {
    eprintln!("❌ {}", msg);
}
