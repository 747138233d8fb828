//! Syntactic checks for contact fields collected during handoff.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// Optional `+`, then 10 to 15 ASCII digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid phone pattern"));

/// `local-part@domain.tld` shape. No DNS or mailbox check.
pub fn is_valid_email(input: &str) -> bool {
    EMAIL_RE.is_match(input)
}

/// Removes whitespace users group digits with ("+1 555 123 4567"), including tabs and
/// the no-break spaces some mobile keyboards insert.
pub fn normalize_phone(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Phone check on already-normalized input.
pub fn is_valid_phone(input: &str) -> bool {
    PHONE_RE.is_match(input)
}
