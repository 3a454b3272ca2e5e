use std::fmt;

use crate::{Chord, PatternError, key};

/// Two unmodified keys pressed one after the other, e.g. `g d`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Sequence {
    /// Key that arms the sequence.
    pub first: String,
    /// Key that completes it.
    pub second: String,
}

impl Sequence {
    /// Parses `<key> <key>`: exactly two key tokens separated by a single space.
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        if s.is_empty() {
            return Err(PatternError::Empty);
        }
        let tokens: Vec<&str> = s.split(' ').collect();
        if tokens.len() != 2 {
            return Err(PatternError::SequenceLength {
                pattern: s.to_string(),
                found: tokens.len(),
            });
        }
        if tokens.iter().any(|t| t.contains('+')) {
            return Err(PatternError::ModifierInSequence {
                pattern: s.to_string(),
            });
        }
        Ok(Self {
            first: key::parse_token(tokens[0])?,
            second: key::parse_token(tokens[1])?,
        })
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.second)
    }
}

/// A parsed shortcut pattern.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Pattern {
    /// Satisfied by a single key event.
    Chord(Chord),
    /// Satisfied by two consecutive key events.
    Sequence(Sequence),
}

impl Pattern {
    /// Parses a pattern string; anything containing a space is read as a sequence.
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        if s.contains(' ') {
            Sequence::parse(s).map(Self::Sequence)
        } else {
            Chord::parse(s).map(Self::Chord)
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chord(c) => write!(f, "{}", c),
            Self::Sequence(s) => write!(f, "{}", s),
        }
    }
}
