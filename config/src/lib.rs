//! Privacy Pool Configuration
//!
//! Shared configuration crate for all pool tools.
//!
//! Handles loading configuration from:
//! 1. POOL_CONFIG env var (explicit path)
//! 2. ./pool.toml (current directory)
//! 3. ~/.privacy-pool/config.toml (user home)
//!
//! Environment variables (and a `.env` file) take precedence over TOML config.
//! Malformed values fail at load time. Each tool then asks for the typed
//! settings it needs (`note_settings`, `ledger_settings`, ...), which are
//! validated once here and passed explicitly to the components.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use std::{env, fs};

use alloy::primitives::utils::{ParseUnits, parse_units};
use alloy::primitives::{Address, B256, U256};
use num_bigint::BigUint;
use pool_privacy::HashOrder;
use pool_privacy::field::parse_decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "pool.toml";
const CONFIG_DIR_NAME: &str = ".privacy-pool";
const GLOBAL_CONFIG_FILE_NAME: &str = "config.toml";

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
const JSC_RPC_TOKEN_URL: &str = "https://rpc.kaigan.jsc.dev/rpc?token=";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_BUILD_DIR: &str = "build";
const DEFAULT_DECIMALS: u8 = 18;
/// `0x11` followed by 62 zero digits
const DEFAULT_DEPOSIT_COMMITMENT: &str =
    "0x1100000000000000000000000000000000000000000000000000000000000000";

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{key} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} is required")]
    Missing(&'static str),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub pool: PoolSection,
    #[serde(default)]
    pub note: NoteConfig,
    #[serde(default)]
    pub deposit: DepositConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

/// RPC connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Full RPC URL or a bare JSC access token
    #[serde(default)]
    pub rpc: Option<String>,
    /// Hex private key of the transaction signer
    #[serde(default, skip_serializing)]
    pub private_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc: None,
            private_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Pool contract and event-range configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolSection {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub from_block: Option<u64>,
    #[serde(default)]
    pub to_block: Option<u64>,
    /// Publish the computed association root
    #[serde(default)]
    pub publish: bool,
    /// Root to publish (`0x` + 64 hex digits)
    #[serde(default)]
    pub root: Option<String>,
}

/// Note and Merkle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteConfig {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub denom_index: u64,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default)]
    pub hash_order: HashOrderToml,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            secret: None,
            denom_index: 0,
            height: pool_privacy::DEFAULT_HEIGHT,
            hash_order: HashOrderToml::Left,
        }
    }
}

fn default_height() -> usize {
    pool_privacy::DEFAULT_HEIGHT
}

/// Merkle ordering policy for TOML config
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HashOrderToml {
    #[default]
    Left,
    Bits,
}

impl FromStr for HashOrderToml {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "bits" => Ok(Self::Bits),
            other => Err(format!("expected \"left\" or \"bits\", got {other:?}")),
        }
    }
}

impl From<HashOrderToml> for HashOrder {
    fn from(value: HashOrderToml) -> Self {
        match value {
            HashOrderToml::Left => HashOrder::LeftAlways,
            HashOrderToml::Bits => HashOrder::FollowPathBits,
        }
    }
}

/// Deposit amount and commitment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositConfig {
    /// Pool to deposit into; falls back to `pool.address`
    #[serde(default)]
    pub pool: Option<String>,
    /// Amount in wei
    #[serde(default)]
    pub amount_wei: Option<String>,
    /// Amount in human units, scaled by `decimals`
    #[serde(default)]
    pub amount_units: Option<String>,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default)]
    pub commitment: Option<String>,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            pool: None,
            amount_wei: None,
            amount_units: None,
            decimals: DEFAULT_DECIMALS,
            commitment: None,
        }
    }
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

/// Artifact location and format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
    #[serde(default)]
    pub proof_bytes_format: ProofBytesFormat,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            build_dir: DEFAULT_BUILD_DIR.into(),
            proof_bytes_format: ProofBytesFormat::Binary,
        }
    }
}

fn default_build_dir() -> String {
    DEFAULT_BUILD_DIR.into()
}

/// On-disk form of `proof.bytes`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProofBytesFormat {
    /// Raw ABI bytes
    #[default]
    Binary,
    /// `0x`-prefixed hex text of the ABI bytes
    Hex,
}

impl FromStr for ProofBytesFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "hex" => Ok(Self::Hex),
            other => Err(format!("expected \"binary\" or \"hex\", got {other:?}")),
        }
    }
}

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Trimmed value of `key`; empty counts as unset
fn lookup_trimmed(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Set Option<String> from env var if present
fn env_option_string(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    field: &mut Option<String>,
) {
    if let Some(v) = lookup_trimmed(lookup, key) {
        *field = Some(v);
    }
}

/// Set field from env var if present; a value that does not parse is an error
fn env_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, field: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: ToString,
{
    if let Some(v) = lookup_trimmed(lookup, key) {
        *field = v.parse().map_err(|e: T::Err| invalid(key, &v, e))?;
    }
    Ok(())
}

/// Set Option<T> from env var if present and parseable
fn env_parse_option<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    field: &mut Option<T>,
) -> Result<()>
where
    T: FromStr,
    T::Err: ToString,
{
    if let Some(v) = lookup_trimmed(lookup, key) {
        *field = Some(v.parse().map_err(|e: T::Err| invalid(key, &v, e))?);
    }
    Ok(())
}

/// Check if env var is set to a truthy value ("1" or "true")
fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    lookup_trimmed(lookup, key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

// ============================================================================
// Implementation
// ============================================================================

impl PoolConfig {
    /// Load configuration from config file with env var overrides
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }

        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                Self::read_file(&path)?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find the config file path
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check POOL_CONFIG env var
        if let Ok(path) = env::var("POOL_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check ./pool.toml (current directory)
        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Some(local_path);
        }

        // 3. Check ~/.privacy-pool/config.toml
        Self::default_config_path().filter(|p| p.exists())
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(GLOBAL_CONFIG_FILE_NAME))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup` (the process environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        // Network
        env_option_string(&lookup, "JSC_RPC_KEY", &mut self.network.rpc);
        env_option_string(&lookup, "RPC_URL", &mut self.network.rpc);
        env_option_string(&lookup, "PRIVATE_KEY", &mut self.network.private_key);
        env_parse(&lookup, "RPC_TIMEOUT_SECS", &mut self.network.timeout_secs)?;

        // Pool
        env_option_string(&lookup, "PRIVACY_POOL_ADDRESS", &mut self.pool.address);
        env_option_string(&lookup, "ERC20_TOKEN_ADDRESS", &mut self.pool.token_address);
        env_parse_option(&lookup, "FROM_BLOCK", &mut self.pool.from_block)?;
        env_parse_option(&lookup, "TO_BLOCK", &mut self.pool.to_block)?;
        if let Some(v) = env_bool(&lookup, "PUBLISH") {
            self.pool.publish = v;
        }
        env_option_string(&lookup, "ROOT", &mut self.pool.root);

        // Note
        env_option_string(&lookup, "NOTE_SECRET", &mut self.note.secret);
        env_parse(&lookup, "DENOM_INDEX", &mut self.note.denom_index)?;
        env_parse(&lookup, "HEIGHT", &mut self.note.height)?;
        env_parse(&lookup, "HASH_ORDER", &mut self.note.hash_order)?;

        // Deposit (POOL targets the deposit only)
        env_option_string(&lookup, "POOL", &mut self.deposit.pool);
        env_option_string(&lookup, "AMOUNT", &mut self.deposit.amount_wei);
        env_option_string(&lookup, "AMOUNT_UNITS", &mut self.deposit.amount_units);
        env_parse(&lookup, "DECIMALS", &mut self.deposit.decimals)?;
        env_option_string(&lookup, "COMMITMENT", &mut self.deposit.commitment);

        // Artifacts
        if let Some(v) = lookup_trimmed(&lookup, "BUILD_DIR") {
            self.artifacts.build_dir = v;
        }
        env_parse(&lookup, "PROOF_BYTES_FORMAT", &mut self.artifacts.proof_bytes_format)?;

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Typed settings
    // ------------------------------------------------------------------------

    /// Note, height and Merkle ordering for input generation
    pub fn note_settings(&self) -> Result<NoteSettings> {
        let secret = match &self.note.secret {
            Some(raw) => SecretSource::Provided(
                parse_decimal(raw).map_err(|e| invalid("NOTE_SECRET", raw, e))?,
            ),
            None => SecretSource::DemoRandom,
        };

        if self.note.height == 0 {
            return Err(invalid("HEIGHT", "0", "must be at least 1"));
        }

        Ok(NoteSettings {
            secret,
            denom_index: self.note.denom_index,
            height: self.note.height,
            hash_order: self.note.hash_order.into(),
        })
    }

    pub fn artifact_settings(&self) -> ArtifactSettings {
        ArtifactSettings {
            build_dir: PathBuf::from(&self.artifacts.build_dir),
            proof_bytes_format: self.artifacts.proof_bytes_format,
        }
    }

    /// RPC endpoint, signer and timeout
    pub fn ledger_settings(&self) -> Result<LedgerSettings> {
        if self.network.timeout_secs == 0 {
            return Err(invalid("RPC_TIMEOUT_SECS", "0", "must be at least 1"));
        }

        Ok(LedgerSettings {
            endpoint: RpcEndpoint::resolve(self.network.rpc.as_deref()),
            signer_key: self.network.private_key.clone(),
            timeout: Duration::from_secs(self.network.timeout_secs),
        })
    }

    /// Pool address and block range for the association root
    pub fn association_settings(&self) -> Result<AssociationSettings> {
        let pool = self.required_pool()?;
        let range = BlockRange {
            from: self.pool.from_block.unwrap_or(0),
            to: self.pool.to_block,
        };
        if let Some(to) = range.to
            && range.from > to
        {
            return Err(invalid(
                "FROM_BLOCK",
                &range.from.to_string(),
                format!("greater than TO_BLOCK {to}"),
            ));
        }

        Ok(AssociationSettings {
            pool,
            range,
            publish: self.pool.publish,
        })
    }

    /// Pool address and root; `root_override` (argv) wins over `ROOT`
    pub fn publish_settings(&self, root_override: Option<&str>) -> Result<PublishSettings> {
        let pool = self.required_pool()?;
        let raw = root_override
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or(self.pool.root.as_deref())
            .ok_or(ConfigError::Missing("ROOT"))?;

        Ok(PublishSettings {
            pool,
            root: parse_bytes32("ROOT", raw)?,
        })
    }

    /// Pool, token, resolved amount and commitment for a deposit
    pub fn deposit_settings(&self) -> Result<DepositSettings> {
        let pool = match self.deposit.pool.as_deref() {
            Some(raw) => parse_address("POOL", raw)?,
            None => self.required_pool()?,
        };
        let token_raw = self
            .pool
            .token_address
            .as_deref()
            .ok_or(ConfigError::Missing("ERC20_TOKEN_ADDRESS"))?;
        let token = parse_address("ERC20_TOKEN_ADDRESS", token_raw)?;

        let decimals = self.deposit.decimals;
        let amount = DepositAmount::resolve(
            self.deposit.amount_wei.as_deref(),
            self.deposit.amount_units.as_deref(),
            decimals,
        )?;

        let commitment = parse_bytes32(
            "COMMITMENT",
            self.deposit
                .commitment
                .as_deref()
                .unwrap_or(DEFAULT_DEPOSIT_COMMITMENT),
        )?;

        Ok(DepositSettings {
            pool,
            token,
            amount: amount.to_wei()?,
            decimals,
            commitment,
        })
    }

    fn required_pool(&self) -> Result<Address> {
        let raw = self
            .pool
            .address
            .as_deref()
            .ok_or(ConfigError::Missing("PRIVACY_POOL_ADDRESS"))?;
        parse_address("PRIVACY_POOL_ADDRESS", raw)
    }
}

// ============================================================================
// Validated Settings
// ============================================================================

/// Where the note secret comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    Provided(BigUint),
    /// Synthesize a pseudo-random demo secret (not for real value)
    DemoRandom,
}

#[derive(Debug, Clone)]
pub struct NoteSettings {
    pub secret: SecretSource,
    pub denom_index: u64,
    pub height: usize,
    pub hash_order: HashOrder,
}

#[derive(Debug, Clone)]
pub struct ArtifactSettings {
    pub build_dir: PathBuf,
    pub proof_bytes_format: ProofBytesFormat,
}

/// RPC endpoint, resolved once from the raw setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcEndpoint {
    /// No endpoint configured: the local development node
    Local,
    /// A full `http(s)://` URL
    Url(String),
    /// A bare JSC access token
    Token(String),
}

impl RpcEndpoint {
    /// Anything starting with `http://` or `https://` is a full URL;
    /// any other non-empty value is treated as a token.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::Local,
            Some(s) => {
                let lower = s.to_ascii_lowercase();
                if lower.starts_with("http://") || lower.starts_with("https://") {
                    Self::Url(s.to_string())
                } else {
                    Self::Token(s.to_string())
                }
            }
        }
    }

    pub fn url(&self) -> String {
        match self {
            Self::Local => DEFAULT_RPC_URL.to_string(),
            Self::Url(url) => url.clone(),
            Self::Token(token) => format!("{JSC_RPC_TOKEN_URL}{token}"),
        }
    }

    /// URL safe for logs (tokens are masked)
    pub fn redacted(&self) -> String {
        match self {
            Self::Token(_) => format!("{JSC_RPC_TOKEN_URL}***"),
            _ => self.url(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LedgerSettings {
    pub endpoint: RpcEndpoint,
    pub signer_key: Option<String>,
    pub timeout: Duration,
}

impl LedgerSettings {
    /// Signer key, required for any state-mutating call
    pub fn require_signer(&self) -> Result<&str> {
        self.signer_key
            .as_deref()
            .ok_or(ConfigError::Missing("PRIVATE_KEY"))
    }
}

/// Inclusive block range; `to = None` means the ledger head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from: u64,
    pub to: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AssociationSettings {
    pub pool: Address,
    pub range: BlockRange,
    pub publish: bool,
}

#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub pool: Address,
    pub root: B256,
}

/// Deposit amount as supplied: wei, or human units with decimals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositAmount {
    Wei(String),
    Units { amount: String, decimals: u8 },
}

impl DepositAmount {
    /// `AMOUNT` (wei) wins over `AMOUNT_UNITS`; one of them is required
    pub fn resolve(wei: Option<&str>, units: Option<&str>, decimals: u8) -> Result<Self> {
        match (wei, units) {
            (Some(wei), _) => Ok(Self::Wei(wei.to_string())),
            (None, Some(units)) => Ok(Self::Units {
                amount: units.to_string(),
                decimals,
            }),
            (None, None) => Err(ConfigError::Missing("AMOUNT (wei) or AMOUNT_UNITS")),
        }
    }

    pub fn to_wei(&self) -> Result<U256> {
        match self {
            Self::Wei(raw) => U256::from_str(raw).map_err(|e| invalid("AMOUNT", raw, e)),
            Self::Units { amount, decimals } => {
                match parse_units(amount, *decimals).map_err(|e| invalid("AMOUNT_UNITS", amount, e))? {
                    ParseUnits::U256(wei) => Ok(wei),
                    ParseUnits::I256(_) => Err(invalid("AMOUNT_UNITS", amount, "must not be negative")),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DepositSettings {
    pub pool: Address,
    pub token: Address,
    pub amount: U256,
    pub decimals: u8,
    pub commitment: B256,
}

/// Parse a `0x`-prefixed 20-byte account address.
///
/// All-lowercase or all-uppercase hex is accepted as is; mixed case must be
/// a valid EIP-55 checksum.
pub fn parse_address(key: &'static str, raw: &str) -> Result<Address> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| invalid(key, raw, "must be 0x-prefixed"))?;
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid(key, raw, "must be exactly 20 bytes (40 hex digits)"));
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(raw, None).map_err(|e| invalid(key, raw, e))
    } else {
        Address::from_str(raw).map_err(|e| invalid(key, raw, e))
    }
}

/// Parse a `0x`-prefixed, exactly 32-byte hex value
pub fn parse_bytes32(key: &'static str, raw: &str) -> Result<B256> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| invalid(key, raw, "must be 0x-prefixed"))?;
    if digits.len() != 64 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid(key, raw, "must be exactly 32 bytes (64 hex digits)"));
    }
    B256::from_str(raw).map_err(|e| invalid(key, raw, e))
}

// ============================================================================
// Tests
// ============================================================================
