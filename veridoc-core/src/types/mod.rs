//! Domain types for VERIDOC.
//!
//! This module provides the core data structures of the resolution pipeline:
//!
//! - [`NormalizedPointer`]: A raw metadata pointer reduced to a canonical form
//! - [`ResolvedMetadata`]: The outcome of a successful resolution
//! - [`Attribute`]: One `{trait_type, value}` entry of a metadata record
//! - [`ProxyEnvelope`]: Wire contract of the trusted proxy endpoint

mod envelope;
mod metadata;
mod pointer;

pub use envelope::*;
pub use metadata::*;
pub use pointer::*;
