//! Core domain types for the grid limit-order pipeline.
//!
//! This crate provides the types shared by every stage of the order
//! lifecycle:
//! - `OrderSide`, `TradeIntent`: trade intentions from the suggestion service
//! - `TokenRef`: chain-scoped token identity (address + decimals)
//! - `units`: exact decimal <-> integer base-unit conversion

pub mod error;
pub mod types;
pub mod units;

pub use error::{CoreError, Result};
pub use types::{parse_address, OrderSide, TokenRef, TradeIntent, NATIVE_TOKEN_SENTINEL};
pub use units::{decimal_from_f64, from_base_units, to_base_units};
