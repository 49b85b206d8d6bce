//! Email shape checks for registration, invites and sharing.
//!
//! ## Summary
//! This is a structural check only (one `@`, a non-empty local part, a dotted
//! domain, no whitespace). Deliverability is never verified.

/// Returns `true` if `candidate` looks like an email address.
///
/// Examples:
/// - "ana@example.com" -> true
/// - "ana@localhost" -> false
/// - "ana example@example.com" -> false
#[must_use]
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Lowercases and trims an email so lookups are case-insensitive.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
