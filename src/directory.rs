//! Synthetic directory fields shown in a node's detail view
//!
//! Both values are derived from `name` and `title` only and are never
//! persisted.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Domain appended to contact handles when none is configured
pub const DEFAULT_CONTACT_DOMAIN: &str = "company.com";

/// Local part used when a name has no usable letters
const FALLBACK_LOCAL_PART: &str = "contact";

/// Title keywords that put a node in the senior location range
const SENIOR_KEYWORDS: &[&str] = &[
    "ceo",
    "cto",
    "cfo",
    "coo",
    "chief",
    "director",
    "directeur",
    "directrice",
    "head",
    "vp",
    "president",
    "manager",
    "responsable",
    "lead",
];

/// Base code for senior titles; everyone else starts at 0
const SENIOR_BASE: u32 = 100;

/// Deterministic pseudo e-mail address for `name`.
///
/// Diacritics and non-letters are stripped, the result is lowercased, and
/// the first and last tokens are joined with a period:
/// `"Marc Évrard"` → `marc.evrard@company.com`.
pub fn contact_handle(name: &str, domain: &str) -> String {
    let cleaned: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let local = match tokens.as_slice() {
        [] => FALLBACK_LOCAL_PART.to_string(),
        [only] => (*only).to_string(),
        [first, .., last] => format!("{}.{}", first, last),
    };

    format!("{}@{}", local, domain)
}

/// Three-digit location code for a person.
///
/// Senior titles get base 100, others base 0. The offset is the sum of the
/// name's UTF-16 code units modulo 100, raised to at least 1, so a
/// character outside the Basic Multilingual Plane counts as its two
/// surrogate units.
pub fn location_code(name: &str, title: &str) -> String {
    let title = title.to_lowercase();
    let base = if SENIOR_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        SENIOR_BASE
    } else {
        0
    };

    let sum: u64 = name.encode_utf16().map(u64::from).sum();
    let offset = ((sum % 100) as u32).max(1);

    format!("{:03}", base + offset)
}
