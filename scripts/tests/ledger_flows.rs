use std::sync::Mutex;

use alloy::primitives::{Address, B256, U256, b256, keccak256};
use pool_config::{BlockRange, DepositSettings};
use pool_scripts::{
    AssociationRootAggregator, DepositFlow, DepositLog, Ledger, LedgerError, Result,
    RootPublisher, TxOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Head,
    Logs { from: u64, to: u64 },
    Publish(B256),
    Approve { spender: Address, amount: U256 },
    Deposit { amount: U256, commitment: B256 },
}

/// In-memory ledger recording every call
#[derive(Default)]
struct MockLedger {
    head: u64,
    logs: Vec<DepositLog>,
    revert_approve: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockLedger {
    fn with_logs(head: u64, logs: Vec<DepositLog>) -> Self {
        Self {
            head,
            logs,
            ..Default::default()
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn tx(&self) -> TxOutcome {
        let n = self.calls.lock().unwrap().len() as u8;
        TxOutcome {
            tx_hash: B256::repeat_byte(n),
            block_number: Some(self.head + 1),
        }
    }
}

impl Ledger for MockLedger {
    async fn chain_id(&self) -> Result<u64> {
        Ok(31337)
    }

    async fn head_block(&self) -> Result<u64> {
        self.record(Call::Head);
        Ok(self.head)
    }

    async fn deposit_logs(&self, _pool: Address, from: u64, to: u64) -> Result<Vec<DepositLog>> {
        self.record(Call::Logs { from, to });
        Ok(self
            .logs
            .iter()
            .filter(|l| (from..=to).contains(&l.block_number))
            .copied()
            .collect())
    }

    async fn publish_association_root(&self, _pool: Address, root: B256) -> Result<TxOutcome> {
        self.record(Call::Publish(root));
        Ok(self.tx())
    }

    async fn approve(&self, _token: Address, spender: Address, amount: U256) -> Result<TxOutcome> {
        self.record(Call::Approve { spender, amount });
        if self.revert_approve {
            return Err(LedgerError::Reverted {
                op: "approve",
                tx_hash: B256::ZERO,
            });
        }
        Ok(self.tx())
    }

    async fn deposit(&self, _pool: Address, amount: U256, commitment: B256) -> Result<TxOutcome> {
        self.record(Call::Deposit { amount, commitment });
        Ok(self.tx())
    }
}

fn deposit_log(block_number: u64, log_index: u64, byte: u8) -> DepositLog {
    DepositLog {
        block_number,
        log_index,
        denomination: U256::ZERO,
        commitment: B256::repeat_byte(byte),
    }
}

const POOL: Address = Address::new([0x99; 20]);

#[tokio::test]
async fn empty_range_yields_hash_of_nothing() {
    let ledger = MockLedger::with_logs(10, vec![]);
    let report = AssociationRootAggregator::new(&ledger)
        .aggregate(POOL, BlockRange { from: 0, to: None })
        .await
        .unwrap();

    assert!(report.commitments.is_empty());
    assert_eq!(
        report.root,
        b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
    );
    assert_eq!(report.to_block, 10);
}

#[tokio::test]
async fn commitments_sorted_by_block_then_log_index() {
    let ledger = MockLedger::with_logs(
        100,
        vec![
            deposit_log(7, 0, 3),
            deposit_log(5, 2, 2),
            deposit_log(5, 1, 1),
        ],
    );
    let report = AssociationRootAggregator::new(&ledger)
        .aggregate(POOL, BlockRange { from: 0, to: Some(50) })
        .await
        .unwrap();

    let expected: Vec<B256> = (1..=3).map(B256::repeat_byte).collect();
    assert_eq!(report.commitments, expected);

    let packed: Vec<u8> = expected.iter().flat_map(|c| c.to_vec()).collect();
    assert_eq!(report.root, keccak256(&packed));

    // Explicit upper bound: no head lookup
    assert_eq!(ledger.calls(), vec![Call::Logs { from: 0, to: 50 }]);
}

#[tokio::test]
async fn open_range_resolves_head() {
    let ledger = MockLedger::with_logs(42, vec![deposit_log(43, 0, 9)]);
    let report = AssociationRootAggregator::new(&ledger)
        .aggregate(POOL, BlockRange { from: 3, to: None })
        .await
        .unwrap();

    assert_eq!(ledger.calls(), vec![Call::Head, Call::Logs { from: 3, to: 42 }]);
    assert!(report.commitments.is_empty());
}

#[tokio::test]
async fn from_after_head_is_rejected() {
    let ledger = MockLedger::with_logs(5, vec![]);
    let err = AssociationRootAggregator::new(&ledger)
        .aggregate(POOL, BlockRange { from: 6, to: None })
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(ledger.calls(), vec![Call::Head]);
}

#[tokio::test]
async fn publisher_sends_root_each_time() {
    let ledger = MockLedger::default();
    let root = B256::repeat_byte(0x42);
    let publisher = RootPublisher::new(&ledger);

    publisher.publish(POOL, root).await.unwrap();
    publisher.publish(POOL, root).await.unwrap();

    assert_eq!(ledger.calls(), vec![Call::Publish(root), Call::Publish(root)]);
}

fn deposit_settings() -> DepositSettings {
    DepositSettings {
        pool: POOL,
        token: Address::repeat_byte(0x77),
        amount: U256::from(10u64).pow(U256::from(18u64)),
        decimals: 18,
        commitment: B256::repeat_byte(0x11),
    }
}

#[tokio::test]
async fn deposit_approves_then_deposits() {
    let ledger = MockLedger::default();
    let settings = deposit_settings();

    let receipts = DepositFlow::new(&ledger).run(&settings).await.unwrap();

    assert_eq!(
        ledger.calls(),
        vec![
            Call::Approve {
                spender: POOL,
                amount: settings.amount
            },
            Call::Deposit {
                amount: settings.amount,
                commitment: settings.commitment
            },
        ]
    );
    assert_ne!(receipts.approve.tx_hash, receipts.deposit.tx_hash);
}

#[tokio::test]
async fn failed_approve_skips_deposit() {
    let ledger = MockLedger {
        revert_approve: true,
        ..Default::default()
    };

    let err = DepositFlow::new(&ledger).run(&deposit_settings()).await.unwrap_err();

    assert!(matches!(err, LedgerError::Reverted { op: "approve", .. }));
    assert_eq!(ledger.calls().len(), 1);
}
