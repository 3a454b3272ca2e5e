//! Key token normalization shared by patterns and incoming events.

use crate::PatternError;

/// Lower-case a raw key name and map the keys that cannot be written in a pattern.
///
/// The literal space key becomes `space` and the literal plus key becomes `plus`,
/// since both characters are separators in the pattern grammar.
pub fn normalize_key(raw: &str) -> String {
    match raw {
        " " => "space".to_string(),
        "+" => "plus".to_string(),
        _ => raw.to_lowercase(),
    }
}

/// Validate a key token from a pattern and return its normalized form.
pub(crate) fn parse_token(token: &str) -> Result<String, PatternError> {
    if token.is_empty() || token.contains('+') || token.chars().any(char::is_whitespace) {
        return Err(PatternError::InvalidKey {
            token: token.to_string(),
        });
    }
    Ok(token.to_lowercase())
}
