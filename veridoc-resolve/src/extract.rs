//! Attribute extraction.
//!
//! Maps a display label to a value inside resolved metadata: the
//! attributes list is checked first (exact label match), then a fixed
//! label→synonyms table of flat field names. Extraction never fails; an
//! absent field is `None`, rendered as an em-dash by the display layer.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use veridoc_core::constants::ABSENT_FIELD_PLACEHOLDER;
use veridoc_core::types::ResolvedMetadata;

/// Flat-field synonyms per display label, evaluated in order.
///
/// This table is the whole compatibility story for records that carry flat
/// fields instead of an attributes list; keep additions here rather than in
/// ad hoc lookups.
pub const FIELD_SYNONYMS: &[(&str, &[&str])] = &[
    ("Recipient Name", &["recipientName", "studentName", "holder"]),
    (
        "Issuing Institution",
        &["institution", "universityName", "issuer", "organization"],
    ),
    ("Degree", &["degree", "degreeName", "title", "credential"]),
    ("Major", &["major", "fieldOfStudy", "specialization"]),
    ("GPA", &["gpa", "grade", "score"]),
    (
        "Issue Date",
        &["issueDate", "issuedOn", "dateIssued", "completionDate"],
    ),
    ("Expiry Date", &["expiryDate", "validUntil", "expiresAt"]),
    ("Certificate ID", &["certificateId", "serialNumber", "id"]),
];

/// Labels whose values pass through the date display formatter.
const DATE_LABELS: &[&str] = &["Issue Date", "Expiry Date"];

/// Looks up a display label in resolved metadata.
///
/// Returns `None` when neither the attributes list nor the flat-field
/// synonyms carry a value; never panics on any payload shape.
pub fn extract_field(meta: &ResolvedMetadata, label: &str) -> Option<String> {
    for attribute in &meta.attributes {
        if attribute.trait_type == label {
            if let Some(value) = stringify(&attribute.value) {
                return Some(value);
            }
        }
    }

    let synonyms = FIELD_SYNONYMS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, keys)| *keys)?;

    for key in synonyms {
        if let Some(value) = meta.data.get(*key).and_then(stringify) {
            return Some(value);
        }
    }

    None
}

/// Extraction plus display formatting: date labels are formatted, absent
/// fields become the em-dash placeholder.
pub fn extract_display(meta: &ResolvedMetadata, label: &str) -> String {
    match extract_field(meta, label) {
        Some(value) if DATE_LABELS.contains(&label) => format_date(&value),
        Some(value) => value,
        None => ABSENT_FIELD_PLACEHOLDER.to_string(),
    }
}

/// Formats a date-valued string for display.
///
/// Accepts RFC 3339 timestamps and a handful of plain calendar formats; an
/// unparsable value is displayed unchanged rather than failing.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %-d, %Y").to_string();
    }

    const FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%B %d, %Y"];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.format("%b %-d, %Y").to_string();
        }
    }

    raw.to_string()
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        // Structured values are shown as compact JSON.
        other => Some(other.to_string()),
    }
}
