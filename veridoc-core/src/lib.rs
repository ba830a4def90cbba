//! # VERIDOC Core
//!
//! Core types, errors, and constants for the VERIDOC credential metadata
//! resolution pipeline.
//!
//! This crate provides the foundational building blocks used by all other
//! VERIDOC crates:
//!
//! - **Types**: Normalized pointers, resolved metadata, the proxy envelope
//! - **Errors**: Comprehensive error types with context
//! - **Constants**: Gateway order, pointer search keys, timeouts
//!
//! ## Example
//!
//! ```rust
//! use veridoc_core::{NormalizedPointer, PointerScheme};
//!
//! let ptr = NormalizedPointer::raw_cid("bafyExampleCID1234567890123456789012345");
//! assert_eq!(ptr.scheme, PointerScheme::RawCid);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, VeridocError};
pub use types::*;
