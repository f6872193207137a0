// Input format checks shared by the modules.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Loose email check: one `@` and a dotted domain, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
