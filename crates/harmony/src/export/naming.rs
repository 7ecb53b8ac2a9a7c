//! Reversible escaping of free-text names into container identifiers.
//!
//! Container field names and enum symbols may only use letters, digits and
//! `_`, may not start with a digit, and treat `.` as a namespace separator.
//! Column names and harmonized labels are arbitrary text, so they are escaped:
//! ASCII letters and `.` are kept, and every other code point becomes
//! `_<hex>_` with the code point in lowercase hexadecimal.
//!
//! ```
//! use harmony::export::naming::{decode, encode};
//!
//! assert_eq!(encode("Body Mass 2"), "Body_20_Mass_20__32_");
//! assert_eq!(decode("Body_20_Mass_20__32_").unwrap(), "Body Mass 2");
//! ```

use std::fmt::Write;

use crate::error::{HarmonyError, Result};

/// Escape a name. Letters and `.` pass through unchanged.
pub fn encode(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for c in name.chars() {
        if is_verbatim(c) {
            encoded.push(c);
        } else {
            // Writing to a String cannot fail
            let _ = write!(encoded, "_{:x}_", c as u32);
        }
    }
    encoded
}

/// Reverse [`encode`].
///
/// Only strings that `encode` can produce are accepted, so
/// `encode(&decode(s)?) == s` holds for every `s` that decodes.
pub fn decode(encoded: &str) -> Result<String> {
    let mut decoded = String::with_capacity(encoded.len());
    let mut chars = encoded.chars();

    while let Some(c) = chars.next() {
        if is_verbatim(c) {
            decoded.push(c);
            continue;
        }
        if c != '_' {
            return Err(invalid(encoded, format!("'{c}' outside an escape run")));
        }

        let mut hex = String::new();
        loop {
            match chars.next() {
                Some('_') => break,
                Some(h) if matches!(h, '0'..='9' | 'a'..='f') => hex.push(h),
                Some(other) => {
                    return Err(invalid(encoded, format!("'{other}' inside an escape run")));
                }
                None => return Err(invalid(encoded, "unterminated escape run".to_string())),
            }
        }

        if hex.is_empty() {
            return Err(invalid(encoded, "empty escape run".to_string()));
        }
        if hex.len() > 1 && hex.starts_with('0') {
            return Err(invalid(encoded, format!("non-canonical escape '_{hex}_'")));
        }
        let code = u32::from_str_radix(&hex, 16)
            .map_err(|_| invalid(encoded, format!("escape '_{hex}_' is too large")))?;
        let original = char::from_u32(code)
            .ok_or_else(|| invalid(encoded, format!("'_{hex}_' is not a code point")))?;
        if is_verbatim(original) {
            return Err(invalid(
                encoded,
                format!("'{original}' must not be escaped"),
            ));
        }
        decoded.push(original);
    }

    Ok(decoded)
}

fn is_verbatim(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '.'
}

fn invalid(name: &str, reason: String) -> HarmonyError {
    HarmonyError::InvalidEncodedName {
        name: name.to_string(),
        reason,
    }
}
