//! # Valuator Core Types
//!
//! Layer 0 of the workspace: the plain data exchanged between the data provider,
//! the valuation pipeline and the reporting layer. No logic beyond display lives
//! here.

pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{BetaSource, Rating};
pub use structs::{MarketSnapshot, RawRow, RawTable};
