//! Ledger access
//!
//! The pool contract surface and the [`Ledger`] trait the scripts are written
//! against. [`EvmLedger`] talks JSON-RPC through alloy; every call is bounded
//! by the configured timeout and never retried.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log, TransactionReceipt};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::sol_types::SolEvent;
use alloy::transports::http::reqwest::Url;
use pool_config::LedgerSettings;
use thiserror::Error;
use tokio::time::timeout;

sol! {
    #[sol(rpc)]
    contract PrivacyPool {
        event Deposit(uint256 indexed denomination, bytes32 indexed commitment, uint256 timestamp);

        function publishAssociationRoot(bytes32 root) external;
        function deposit(uint256 amount, bytes32 commitment) external;
    }

    #[sol(rpc)]
    interface DemoERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Bad input detected before anything was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider or transport failure
    #[error("{op} failed: {message}")]
    Network { op: &'static str, message: String },

    #[error("{op} timed out after {secs}s")]
    Timeout { op: &'static str, secs: u64 },

    /// Mined, but with a failed status
    #[error("{op} reverted in transaction {tx_hash}")]
    Reverted { op: &'static str, tx_hash: B256 },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

// ============================================================================
// Ledger Types
// ============================================================================

/// One `Deposit` event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositLog {
    pub block_number: u64,
    pub log_index: u64,
    pub denomination: U256,
    pub commitment: B256,
}

/// A confirmed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

/// What the scripts need from a chain.
///
/// State-mutating calls resolve only once the transaction is confirmed.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    async fn chain_id(&self) -> Result<u64>;

    /// Current head block number
    async fn head_block(&self) -> Result<u64>;

    /// `Deposit` events emitted by `pool` in `[from, to]`, in any order
    async fn deposit_logs(&self, pool: Address, from: u64, to: u64) -> Result<Vec<DepositLog>>;

    async fn publish_association_root(&self, pool: Address, root: B256) -> Result<TxOutcome>;

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxOutcome>;

    async fn deposit(&self, pool: Address, amount: U256, commitment: B256) -> Result<TxOutcome>;
}

// ============================================================================
// EVM Ledger
// ============================================================================

/// JSON-RPC ledger backed by an alloy provider
pub struct EvmLedger {
    provider: DynProvider,
    sender: Option<Address>,
    timeout: Duration,
}

impl EvmLedger {
    /// Build the provider. A signer is attached only when a key is configured;
    /// without one the ledger is read-only.
    pub fn connect(settings: &LedgerSettings) -> Result<Self> {
        let url: Url = settings.endpoint.url().parse().map_err(|e| {
            LedgerError::Validation(format!(
                "invalid RPC URL {}: {e}",
                settings.endpoint.redacted()
            ))
        })?;

        let (provider, sender) = match settings.signer_key.as_deref() {
            Some(key) => {
                let signer = PrivateKeySigner::from_str(key.trim())
                    .map_err(|e| LedgerError::Validation(format!("invalid PRIVATE_KEY: {e}")))?;
                let sender = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(url)
                    .erased();
                (provider, Some(sender))
            }
            None => (ProviderBuilder::new().connect_http(url).erased(), None),
        };

        log::info!(
            "Connected to {} (signer: {})",
            settings.endpoint.redacted(),
            sender.map_or_else(|| "none".to_string(), |a| a.to_string())
        );

        Ok(Self {
            provider,
            sender,
            timeout: settings.timeout,
        })
    }

    /// Address transactions are sent from, if a signer is attached
    pub fn sender(&self) -> Option<Address> {
        self.sender
    }

    fn require_signer(&self, op: &'static str) -> Result<()> {
        match self.sender {
            Some(_) => Ok(()),
            None => Err(LedgerError::Validation(format!(
                "{op} needs a signer; set PRIVATE_KEY"
            ))),
        }
    }

    async fn bounded<T, E, F>(&self, op: &'static str, call: F) -> Result<T>
    where
        F: IntoFuture<Output = std::result::Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(LedgerError::Network {
                op,
                message: e.to_string(),
            }),
            Err(_) => Err(LedgerError::Timeout {
                op,
                secs: self.timeout.as_secs(),
            }),
        }
    }

    /// A mined receipt with a failed status becomes `Reverted`
    fn outcome(op: &'static str, receipt: TransactionReceipt) -> Result<TxOutcome> {
        if !receipt.status() {
            return Err(LedgerError::Reverted {
                op,
                tx_hash: receipt.transaction_hash,
            });
        }
        log::info!(
            "{op} confirmed: tx={} block={:?}",
            receipt.transaction_hash,
            receipt.block_number
        );
        Ok(TxOutcome {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }
}

fn decode_deposit(log: &Log) -> Result<DepositLog> {
    let malformed = |what: &str| LedgerError::Network {
        op: "eth_getLogs",
        message: format!("malformed Deposit log: {what}"),
    };

    let decoded = log
        .log_decode::<PrivacyPool::Deposit>()
        .map_err(|e| malformed(&e.to_string()))?;
    let event = decoded.inner.data;

    Ok(DepositLog {
        block_number: log.block_number.ok_or_else(|| malformed("pending block"))?,
        log_index: log.log_index.ok_or_else(|| malformed("missing log index"))?,
        denomination: event.denomination,
        commitment: event.commitment,
    })
}

impl Ledger for EvmLedger {
    async fn chain_id(&self) -> Result<u64> {
        self.bounded("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn head_block(&self) -> Result<u64> {
        self.bounded("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    async fn deposit_logs(&self, pool: Address, from: u64, to: u64) -> Result<Vec<DepositLog>> {
        let filter = Filter::new()
            .address(pool)
            .event_signature(PrivacyPool::Deposit::SIGNATURE_HASH)
            .from_block(from)
            .to_block(to);

        let logs = self
            .bounded("eth_getLogs", self.provider.get_logs(&filter))
            .await?;
        log::debug!("eth_getLogs returned {} logs for {pool} in [{from}, {to}]", logs.len());

        logs.iter().map(decode_deposit).collect()
    }

    async fn publish_association_root(&self, pool: Address, root: B256) -> Result<TxOutcome> {
        const OP: &str = "publishAssociationRoot";
        self.require_signer(OP)?;

        let contract = PrivacyPool::new(pool, self.provider.clone());
        let receipt = self
            .bounded(OP, async {
                let pending = contract
                    .publishAssociationRoot(root)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;
                log::info!("{OP} sent: tx={}", pending.tx_hash());
                pending.get_receipt().await.map_err(|e| e.to_string())
            })
            .await?;
        Self::outcome(OP, receipt)
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxOutcome> {
        const OP: &str = "approve";
        self.require_signer(OP)?;

        let erc20 = DemoERC20::new(token, self.provider.clone());
        let receipt = self
            .bounded(OP, async {
                let pending = erc20
                    .approve(spender, amount)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;
                log::info!("{OP} sent: tx={}", pending.tx_hash());
                pending.get_receipt().await.map_err(|e| e.to_string())
            })
            .await?;
        Self::outcome(OP, receipt)
    }

    async fn deposit(&self, pool: Address, amount: U256, commitment: B256) -> Result<TxOutcome> {
        const OP: &str = "deposit";
        self.require_signer(OP)?;

        let contract = PrivacyPool::new(pool, self.provider.clone());
        let receipt = self
            .bounded(OP, async {
                let pending = contract
                    .deposit(amount, commitment)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;
                log::info!("{OP} sent: tx={}", pending.tx_hash());
                pending.get_receipt().await.map_err(|e| e.to_string())
            })
            .await?;
        Self::outcome(OP, receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{LogData, keccak256};
    use pool_config::RpcEndpoint;

    fn settings(key: Option<&str>) -> LedgerSettings {
        LedgerSettings {
            endpoint: RpcEndpoint::Local,
            signer_key: key.map(str::to_string),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_deposit_event_signature() {
        assert_eq!(
            PrivacyPool::Deposit::SIGNATURE_HASH,
            keccak256("Deposit(uint256,bytes32,uint256)")
        );
    }

    #[test]
    fn test_decode_deposit_log() {
        let commitment = B256::repeat_byte(0xab);
        let denomination = U256::from(3u64);
        let data = LogData::new_unchecked(
            vec![
                PrivacyPool::Deposit::SIGNATURE_HASH,
                B256::from(denomination),
                commitment,
            ],
            U256::from(1_700_000_000u64).to_be_bytes::<32>().to_vec().into(),
        );
        let log = Log {
            inner: alloy::primitives::Log {
                address: Address::ZERO,
                data,
            },
            block_number: Some(42),
            log_index: Some(7),
            ..Default::default()
        };

        let decoded = decode_deposit(&log).unwrap();
        assert_eq!(decoded.commitment, commitment);
        assert_eq!(decoded.denomination, denomination);
        assert_eq!((decoded.block_number, decoded.log_index), (42, 7));
    }

    #[tokio::test]
    async fn test_read_only_ledger_refuses_transactions() {
        let ledger = EvmLedger::connect(&settings(None)).unwrap();
        assert!(ledger.sender().is_none());

        let err = ledger
            .publish_association_root(Address::ZERO, B256::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn test_bad_private_key_rejected() {
        let err = EvmLedger::connect(&settings(Some("not-a-key"))).err().unwrap();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_signer_address_exposed() {
        // Anvil's first dev account
        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let ledger = EvmLedger::connect(&settings(Some(key))).unwrap();
        assert_eq!(
            ledger.sender(),
            Some(Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap())
        );
    }
}
