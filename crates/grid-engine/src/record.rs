//! Order lifecycle records.
//!
//! The lifecycle is a small state machine:
//!
//! ```text
//! Ready --OrderBuilt--> Created --SubmissionAccepted--> Submitted
//!   |                      |
//!   +-----StepFailed-------+--> Failed
//! ```
//!
//! `Submitted` and `Failed` are terminal. The transition function is
//! pure; [`crate::store::RecordStore`] owns mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use grid_core::TradeIntent;
use grid_order::{LimitOrder, SignedOrder};

use crate::error::{EngineError, Result};

/// Where a record stands in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Intent accepted, nothing executed yet.
    Ready,
    /// Order built and signed, not yet submitted.
    Created,
    /// The orderbook accepted the order. Terminal.
    Submitted,
    /// A pipeline step failed. Terminal.
    Failed,
}

impl RecordStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Submitted | Self::Failed)
    }
}

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    OrderBuilt,
    SubmissionAccepted,
    StepFailed,
}

/// Pure transition function for the record lifecycle.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTransition`] when the current status
/// does not accept the event, including any event on a terminal
/// status.
pub fn apply(status: RecordStatus, event: LifecycleEvent) -> Result<RecordStatus> {
    use LifecycleEvent::*;
    use RecordStatus::*;

    match (status, event) {
        (Ready, OrderBuilt) => Ok(Created),
        (Created, SubmissionAccepted) => Ok(Submitted),
        (Ready | Created, StepFailed) => Ok(Failed),
        (from, event) => Err(EngineError::InvalidTransition { from, event }),
    }
}

/// Identifier for a lifecycle record: `grid_<epoch_ms>_<uuid8>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("grid_{millis}_{}", &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One intent's journey through the pipeline.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: RecordId,
    pub intent: TradeIntent,
    pub status: RecordStatus,
    /// Present once the record reaches `Created`.
    pub order: Option<LimitOrder>,
    pub signature: Option<String>,
    pub order_hash: Option<alloy::primitives::B256>,
    /// Present only on `Failed`.
    pub error_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn new(intent: TradeIntent) -> Self {
        Self {
            id: RecordId::generate(),
            intent,
            status: RecordStatus::Ready,
            order: None,
            signature: None,
            order_hash: None,
            error_reason: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the built order, moving `Ready -> Created`.
    ///
    /// Signing happens while the record already sits in `Created`, so a
    /// sign failure leaves the built order visible on the failed record.
    ///
    /// # Errors
    ///
    /// Propagates the transition error when the record is not `Ready`.
    pub fn attach_order(&mut self, order: LimitOrder) -> Result<()> {
        self.status = apply(self.status, LifecycleEvent::OrderBuilt)?;
        self.order = Some(order);
        Ok(())
    }

    /// Record the signature and canonical hash of the attached order.
    /// No status change; the record stays `Created` until submission.
    pub fn record_signature(&mut self, signed: &SignedOrder) {
        self.signature = Some(signed.signature.clone());
        self.order_hash = Some(signed.order_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_core::OrderSide;
    use rust_decimal_macros::dec;

    fn intent() -> TradeIntent {
        TradeIntent::new(OrderSide::Sell, dec!(2340), dec!(0.1), "WETH", "test")
    }

    #[test]
    fn test_happy_path_transitions() {
        let s = apply(RecordStatus::Ready, LifecycleEvent::OrderBuilt).unwrap();
        assert_eq!(s, RecordStatus::Created);
        let s = apply(s, LifecycleEvent::SubmissionAccepted).unwrap();
        assert_eq!(s, RecordStatus::Submitted);
        assert!(s.is_terminal());
    }

    #[test]
    fn test_failure_from_either_live_status() {
        assert_eq!(
            apply(RecordStatus::Ready, LifecycleEvent::StepFailed).unwrap(),
            RecordStatus::Failed
        );
        assert_eq!(
            apply(RecordStatus::Created, LifecycleEvent::StepFailed).unwrap(),
            RecordStatus::Failed
        );
    }

    #[test]
    fn test_terminal_statuses_reject_events() {
        for terminal in [RecordStatus::Submitted, RecordStatus::Failed] {
            for event in [
                LifecycleEvent::OrderBuilt,
                LifecycleEvent::SubmissionAccepted,
                LifecycleEvent::StepFailed,
            ] {
                assert!(apply(terminal, event).is_err());
            }
        }
    }

    #[test]
    fn test_skipping_created_is_rejected() {
        assert!(apply(RecordStatus::Ready, LifecycleEvent::SubmissionAccepted).is_err());
    }

    #[test]
    fn test_record_id_shape() {
        let id = RecordId::generate();
        let parts: Vec<&str> = id.as_str().splitn(3, '_').collect();
        assert_eq!(parts[0], "grid");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_new_record_starts_ready() {
        let record = OrderRecord::new(intent());
        assert_eq!(record.status, RecordStatus::Ready);
        assert!(record.order.is_none());
        assert!(record.error_reason.is_none());
    }

    fn sample_order() -> LimitOrder {
        LimitOrder {
            salt: alloy::primitives::U256::from(7u64),
            maker: alloy::primitives::address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            receiver: alloy::primitives::address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            maker_asset: alloy::primitives::address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
            taker_asset: alloy::primitives::address!("dac17f958d2ee523a2206206994597c13d831ec7"),
            making_amount: alloy::primitives::U256::from(100u64),
            taking_amount: alloy::primitives::U256::from(200u64),
            maker_traits: grid_order::MakerTraits::new(),
        }
    }

    #[test]
    fn test_attach_order_enters_created_before_signing() {
        let mut record = OrderRecord::new(intent());
        record.attach_order(sample_order()).unwrap();

        assert_eq!(record.status, RecordStatus::Created);
        assert!(record.order.is_some());
        // Not signed yet.
        assert!(record.signature.is_none());
        assert!(record.order_hash.is_none());
    }

    #[test]
    fn test_record_signature_keeps_created() {
        let mut record = OrderRecord::new(intent());
        let order = sample_order();
        record.attach_order(order.clone()).unwrap();

        let signed = SignedOrder {
            order,
            signature: format!("0x{}", "ab".repeat(65)),
            order_hash: alloy::primitives::B256::repeat_byte(0x11),
        };
        record.record_signature(&signed);

        assert_eq!(record.status, RecordStatus::Created);
        assert!(record.signature.is_some());
        assert!(record.order_hash.is_some());
    }

    #[test]
    fn test_attach_order_rejected_after_failure() {
        let mut record = OrderRecord::new(intent());
        record.status = apply(record.status, LifecycleEvent::StepFailed).unwrap();
        assert!(record.attach_order(sample_order()).is_err());
    }
}
