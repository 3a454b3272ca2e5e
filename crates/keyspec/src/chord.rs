use std::fmt;

use crate::{Modifier, Modifiers, PatternError, key};

/// A key chord: a set of modifiers plus a single key.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Chord {
    /// Modifiers held down for this chord.
    pub modifiers: Modifiers,
    /// The normalized, lower-cased key token.
    pub key: String,
}

impl Chord {
    /// Build a chord from held modifiers and a raw key name.
    pub fn new(modifiers: Modifiers, key: &str) -> Self {
        Self {
            modifiers,
            key: key::normalize_key(key),
        }
    }

    /// Parses a chord pattern of the form `[cmd+][shift+]<key>`.
    ///
    /// - The key token is case-insensitive; modifier prefixes are not.
    /// - Only the canonical modifier names are accepted, `cmd` before `shift`.
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        if s.is_empty() {
            return Err(PatternError::Empty);
        }
        let mut parts: Vec<&str> = s.split('+').collect();
        let key_raw = parts.pop().unwrap_or_default();
        if key_raw.is_empty() {
            return Err(PatternError::MissingKey {
                pattern: s.to_string(),
            });
        }
        let key = key::parse_token(key_raw)?;

        let mut modifiers = Modifiers::NONE;
        let mut last: Option<Modifier> = None;
        for token in parts {
            let m = Modifier::from_spec(token).ok_or_else(|| PatternError::UnknownModifier {
                token: token.to_string(),
            })?;
            if token != m.to_spec() {
                return Err(PatternError::NonCanonicalModifier {
                    found: token.to_string(),
                    expected: m.to_spec(),
                });
            }
            if !modifiers.insert(m) {
                return Err(PatternError::DuplicateModifier {
                    token: token.to_string(),
                });
            }
            if let Some(prev) = last
                && prev == Modifier::Shift
                && m == Modifier::Command
            {
                return Err(PatternError::ModifierOrder {
                    token: token.to_string(),
                    after: prev.to_spec().to_string(),
                });
            }
            last = Some(m);
        }
        Ok(Self { modifiers, key })
    }

    /// Parses a loose description of a key press, e.g. `Ctrl+Shift+P` or `shift+cmd+k`.
    ///
    /// Unlike [`Chord::parse`], modifier aliases and any modifier order are accepted,
    /// and a trailing literal space or plus is taken as the key. Returns `None` for
    /// unknown modifiers or an empty key.
    pub fn parse_event(s: &str) -> Option<Self> {
        let (mods_raw, key_raw) = match s.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match s.rsplit_once('+') {
                Some((mods, k)) => (mods, k),
                None => ("", s),
            },
        };
        if key_raw.is_empty() {
            return None;
        }
        let key_raw = if key_raw == " " { key_raw } else { key_raw.trim() };
        let mut modifiers = Modifiers::NONE;
        if !mods_raw.is_empty() {
            for token in mods_raw.split('+') {
                modifiers.insert(Modifier::from_spec(token.trim())?);
            }
        }
        Some(Self::new(modifiers, key_raw))
    }

    /// True when the chord has no modifiers.
    pub fn is_bare(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Returns the canonical string form, e.g. `cmd+shift+k`.
    pub fn to_string_canonical(&self) -> String {
        format!("{}{}", self.modifiers.prefix(), self.key)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_canonical())
    }
}
