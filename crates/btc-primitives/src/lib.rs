/// BTC transaction SDK - Hashing and wire-format primitives.
///
/// This crate provides the foundational building blocks for the SDK:
/// - Hash functions (SHA-256, double SHA-256)
/// - Chain hash type for transaction identification
/// - Variable-length integer encoding and binary read/write cursors

pub mod hash;
pub mod chainhash;
pub mod util;

mod error;
pub use error::PrimitivesError;
