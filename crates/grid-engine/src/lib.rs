//! Batch execution engine: lifecycle records, preflight checks, and the
//! session that drives a suggestion batch through build, sign and
//! submit.

pub mod config;
pub mod error;
pub mod logging;
pub mod preflight;
pub mod record;
pub mod session;
pub mod store;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use preflight::check_sell_sufficiency;
pub use record::{apply, LifecycleEvent, OrderRecord, RecordId, RecordStatus};
pub use session::{BatchReport, GridSession};
pub use store::RecordStore;
