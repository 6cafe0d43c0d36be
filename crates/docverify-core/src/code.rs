//! Verification code extraction and normalization
//!
//! A [`Code`] can only be obtained through [`normalize_code`], so holding one
//! guarantees the value is trimmed, non-empty and (optionally) upper-cased.

use std::fmt;

use serde::Serialize;
use url::form_urlencoded;

/// Query parameter that carries the code in QR links (`?code=XXXX`)
pub const CODE_PARAM: &str = "code";

/// A normalized, non-empty document verification code
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize raw user input into a code
///
/// Trims surrounding whitespace and upper-cases when `uppercase` is set.
/// Returns `None` when nothing is left, which callers treat as "absent".
pub fn normalize_code(raw: &str, uppercase: bool) -> Option<Code> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value = if uppercase {
        trimmed.to_uppercase()
    } else {
        trimmed.to_string()
    };

    Some(Code(value))
}

/// Extract the raw `code` parameter from a URL query string
///
/// Accepts the string with or without the leading `?`. Values are decoded
/// like `URLSearchParams` does: `+` reads as a space and invalid UTF-8
/// escapes become U+FFFD. The first occurrence wins; a missing parameter
/// yields an empty string.
pub fn code_from_query(query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == CODE_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}
