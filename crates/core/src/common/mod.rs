//! Common types and constants shared by the generator.
//!
//! This module provides:
//! 1. **Constants:** Block-loader protocol words, bit positions, and settle-latency parameters.
//! 2. **Error Handling:** The crate-wide `Error` enum and `Result` alias.

/// Block-loader protocol constants.
pub mod constants;

/// Error types.
pub mod error;

pub use constants::{FROM_CPU, HEADER_BASE, MODE_3D};
pub use error::{Error, Result};
