//! # VERIDOC Resolution Pipeline
//!
//! Turns heterogeneous metadata pointers from upstream credential records
//! into resolved, displayable metadata:
//!
//! 1. **Normalization** ([`normalize`]): any raw pointer shape → canonical
//!    [`NormalizedPointer`](veridoc_core::NormalizedPointer), or nothing.
//! 2. **Candidate expansion** ([`candidates`]): a normalized pointer → a
//!    deterministic, ordered list of gateway URLs.
//! 3. **Fetching** ([`MetadataResolver`]): trusted proxy first, then a
//!    single serial pass over the candidates; first success wins.
//! 4. **Extraction** ([`extract_field`]): resolved metadata + label →
//!    display value, via the attributes list then flat-field synonyms.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod candidates;
mod extract;
mod fetch;
mod normalize;
mod session;

pub use candidates::{candidates, default_gateways, GatewayEndpoint};
pub use extract::{extract_display, extract_field, format_date, FIELD_SYNONYMS};
pub use fetch::{GatewayFailure, MetadataResolver, ResolverConfig};
pub use normalize::normalize;
pub use session::{ResolutionSession, ResolutionTicket};
