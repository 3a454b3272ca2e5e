use thiserror::Error;

/// Reasons a string fails the shortcut pattern grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PatternError {
    /// The pattern is the empty string.
    #[error("empty pattern")]
    Empty,

    /// A chord ends in `+` or consists only of separators.
    #[error("missing key in '{pattern}'")]
    MissingKey { pattern: String },

    /// A key token contains whitespace or a `+`.
    #[error("invalid key token '{token}'")]
    InvalidKey { token: String },

    /// A modifier prefix is not a known modifier name.
    #[error("unknown modifier '{token}'")]
    UnknownModifier { token: String },

    /// A known modifier alias was used where the canonical spelling is required.
    #[error("modifier '{found}' must be written '{expected}'")]
    NonCanonicalModifier {
        found: String,
        expected: &'static str,
    },

    /// The same modifier appears twice.
    #[error("duplicate modifier '{token}'")]
    DuplicateModifier { token: String },

    /// Modifiers appear out of canonical order (`cmd` before `shift`).
    #[error("modifier '{token}' must come before '{after}'")]
    ModifierOrder { token: String, after: String },

    /// A sequence token carries a modifier prefix.
    #[error("sequence '{pattern}' cannot carry modifiers")]
    ModifierInSequence { pattern: String },

    /// A sequence does not split into exactly two keys on a single space.
    #[error("sequence '{pattern}' must have exactly two keys, found {found}")]
    SequenceLength { pattern: String, found: usize },
}
