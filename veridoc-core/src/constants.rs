//! Resolution constants for VERIDOC.
//!
//! The gateway order and the pointer search-key list are behavioral
//! contracts: candidate URL sequences must be reproducible across runs, and
//! the key list is the full compatibility surface with upstream credential
//! records.

// ═══════════════════════════════════════════════════════════════════════════════
// GATEWAY MIRRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default public gateway mirrors, in preference order.
///
/// The second tuple element marks gateways that also serve the
/// `<cid>.ipfs.<host>` subdomain style. Order matters: candidate URL
/// sequences are built by walking this list front to back.
pub const DEFAULT_GATEWAYS: &[(&str, bool)] = &[
    ("ipfs.io", false),
    ("dweb.link", true),
    ("cloudflare-ipfs.com", true),
    ("gateway.pinata.cloud", false),
];

/// HTTPS base used to rewrite `ar://` pointers.
pub const ARWEAVE_GATEWAY: &str = "https://arweave.net";

// ═══════════════════════════════════════════════════════════════════════════════
// POINTER EXTRACTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Key names searched, in priority order, when a pointer arrives as a
/// nested object instead of a plain string.
///
/// This list is the compatibility contract with upstream credential
/// records; extending it widens the set of record shapes we can resolve.
pub const POINTER_SEARCH_KEYS: &[&str] = &[
    "ipfs_link",
    "ipfs",
    "tokenURI",
    "url",
    "uri",
    "href",
    "link",
    "src",
    "path",
    "image",
    "animation_url",
    "metadata_uri",
    "gateway",
    "cid",
    "hash",
];

/// Keys whose string values are only trusted when they look like a content
/// identifier (or carry an explicit `ipfs://` prefix). Bare `hash` fields in
/// upstream records frequently hold transaction hashes, not CIDs.
pub const GUARDED_POINTER_KEYS: &[&str] = &["cid", "hash"];

/// Key used by the content-identifier link object convention: `{"/": "<cid>"}`.
pub const CID_LINK_KEY: &str = "/";

// ═══════════════════════════════════════════════════════════════════════════════
// CID SHAPE THRESHOLDS
// ═══════════════════════════════════════════════════════════════════════════════

/// CIDv0 identifiers are base58, start with "Qm", and are exactly 46 chars.
pub const CIDV0_LENGTH: usize = 46;

/// Minimum length for base32 CIDv1 identifiers ("bafy…"/"bafk…").
pub const CIDV1_MIN_LENGTH: usize = 50;

// ═══════════════════════════════════════════════════════════════════════════════
// TIMEOUTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Bound on the single proxy attempt, in seconds. A timed-out proxy call is
/// aborted and the pipeline falls through to gateway mirrors.
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 8;

/// Bound on each individual gateway attempt, in seconds.
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

// ═══════════════════════════════════════════════════════════════════════════════
// DISPLAY
// ═══════════════════════════════════════════════════════════════════════════════

/// Placeholder rendered for absent metadata fields.
pub const ABSENT_FIELD_PLACEHOLDER: &str = "—";
