//! Error types for VERIDOC.
//!
//! This module provides the error hierarchy for the resolution pipeline
//! using `thiserror`. The taxonomy distinguishes "nothing to look up"
//! (handled with `Option`, never an error) from "lookup attempted and
//! exhausted all gateways" (`GatewaysExhausted`).

use thiserror::Error;

/// Result type alias using `VeridocError`.
pub type Result<T> = std::result::Result<T, VeridocError>;

/// Main error type for all VERIDOC operations.
#[derive(Debug, Error)]
pub enum VeridocError {
    // ═══════════════════════════════════════════════════════════════════════════
    // POINTER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A pointer was supplied but could not be normalized into anything
    /// fetchable.
    #[error("Invalid metadata pointer: {0}")]
    InvalidPointer(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // RESOLUTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The trusted proxy hop failed. Always recovered locally by falling
    /// back to gateway mirrors; never surfaced to callers directly.
    #[error("Proxy unavailable: {0}")]
    ProxyUnavailable(String),

    /// Every candidate URL failed during the single fallback pass.
    ///
    /// Carries the attempted URLs so callers can render them as manual
    /// fallback links.
    #[error("All gateways exhausted for '{pointer}' ({} candidates tried)", .attempted.len())]
    GatewaysExhausted {
        /// The normalized pointer value that was being resolved.
        pointer: String,
        /// Every candidate URL attempted, in the order tried.
        attempted: Vec<String>,
    },

    /// A resolution was superseded by a newer one before it could commit.
    #[error("Resolution superseded by a newer request")]
    Superseded,

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// A bounded network attempt timed out and was aborted.
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// The bound that was exceeded.
        seconds: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl VeridocError {
    /// Returns true if this error is recoverable (a caller-triggered retry
    /// may succeed; gateways go up and down routinely).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VeridocError::HttpError(_)
                | VeridocError::Timeout { .. }
                | VeridocError::ProxyUnavailable(_)
                | VeridocError::GatewaysExhausted { .. }
        )
    }

    /// Returns true if this error means the resolution pass completed but
    /// found no reachable mirror.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, VeridocError::GatewaysExhausted { .. })
    }
}
