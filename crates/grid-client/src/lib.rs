//! HTTP client for the order aggregation service.
//!
//! Three surfaces: the orderbook (submit and list limit orders), the
//! token registry, and the quote/suggestion endpoints. All requests go
//! through one [`ApiClient`] holding a shared `reqwest` client.

pub mod api;
pub mod error;
pub mod orderbook;
pub mod wire;

pub use api::{ApiClient, GridSuggestions};
pub use error::{ClientError, Result};
pub use orderbook::{map_order_status, RemoteOrder, RemoteOrderStatus};
pub use wire::ApiOrder;
