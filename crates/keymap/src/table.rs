use std::collections::HashMap;

use keyspec::{Pattern, PatternError};
use tracing::{debug, trace, warn};

use crate::ActionId;

/// A registered pattern that failed the grammar. It is kept for reporting and never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InertPattern {
    /// The pattern exactly as registered.
    pub pattern: String,
    /// The action it was bound to.
    pub action: ActionId,
    /// Why it does not parse.
    pub error: PatternError,
}

/// Immutable mapping from shortcut patterns to actions.
///
/// Patterns are stored in canonical form, so lookups are exact string comparisons
/// against the canonical strings the dispatcher builds from events.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    /// Canonical chord string (e.g. `cmd+k`, `n`) → action.
    chords: HashMap<String, ActionId>,
    /// First key → second key → action. The outer keys are the sequence prefixes.
    sequences: HashMap<String, HashMap<String, ActionId>>,
    /// Patterns that were registered but do not parse.
    inert: Vec<InertPattern>,
}

impl BindingTable {
    /// An empty table; every query misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from `(pattern, action)` pairs.
    ///
    /// A later pair for the same canonical pattern replaces an earlier one. Malformed
    /// patterns are logged and kept aside as inert.
    pub fn new<I, P, A>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (P, A)>,
        P: AsRef<str>,
        A: Into<ActionId>,
    {
        let mut table = Self::default();
        for (pattern, action) in bindings {
            table.insert(pattern.as_ref(), action.into());
        }
        debug!(
            "Binding table built: {} chords, {} sequence prefixes, {} inert",
            table.chords.len(),
            table.sequences.len(),
            table.inert.len()
        );
        table
    }

    /// Register a single binding; only used while building.
    fn insert(&mut self, raw: &str, action: ActionId) {
        let replaced = match Pattern::parse(raw) {
            Ok(Pattern::Chord(chord)) => self.chords.insert(chord.to_string(), action),
            Ok(Pattern::Sequence(seq)) => self
                .sequences
                .entry(seq.first)
                .or_default()
                .insert(seq.second, action),
            Err(error) => {
                warn!("Ignoring malformed shortcut '{}': {}", raw, error);
                self.inert.push(InertPattern {
                    pattern: raw.to_string(),
                    action,
                    error,
                });
                return;
            }
        };
        if let Some(prev) = replaced {
            debug!("Shortcut '{}' registered twice; dropping {}", raw, prev);
        } else {
            trace!("Registered shortcut '{}'", raw);
        }
    }

    /// Exact match against chord patterns, with or without modifiers.
    pub fn lookup_chord(&self, pattern: &str) -> Option<&ActionId> {
        self.chords.get(pattern)
    }

    /// Exact match against two-key sequence patterns.
    pub fn lookup_sequence(&self, first: &str, second: &str) -> Option<&ActionId> {
        self.sequences.get(first)?.get(second)
    }

    /// True if any sequence begins with `first`.
    pub fn has_sequence_prefix(&self, first: &str) -> bool {
        self.sequences.contains_key(first)
    }

    /// Patterns that failed to parse, in registration order.
    pub fn inert(&self) -> &[InertPattern] {
        &self.inert
    }

    /// Number of live bindings (chords plus sequences).
    pub fn len(&self) -> usize {
        self.chords.len() + self.sequences.values().map(HashMap::len).sum::<usize>()
    }

    /// True when no binding can ever match.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot live bindings as sorted `(canonical pattern, action)` pairs.
    pub fn snapshot(&self) -> Vec<(String, ActionId)> {
        let mut pairs: Vec<(String, ActionId)> = self
            .chords
            .iter()
            .map(|(p, a)| (p.clone(), a.clone()))
            .collect();
        for (first, seconds) in &self.sequences {
            for (second, action) in seconds {
                pairs.push((format!("{} {}", first, second), action.clone()));
            }
        }
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }
}
