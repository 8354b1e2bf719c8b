#![deny(missing_docs)]

//! BTC transaction SDK - Complete SDK.
//!
//! Re-exports all SDK components for convenient single-crate usage.

pub use btc_primitives as primitives;
pub use btc_transaction as transaction;
