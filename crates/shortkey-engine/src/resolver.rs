//! Pure classification state machine.
//!
//! The resolver owns the binding table and the pending-sequence state and decides,
//! for one normalized key press at a given instant, what happens. It performs no I/O
//! and schedules nothing; the dispatcher turns its answers into timer operations and
//! action invocations.

use std::{sync::Arc, time::Duration};

use keymap::{ActionId, BindingTable};
use keyspec::Modifiers;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Which rule produced a fired action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A chord with at least one modifier.
    Chord,
    /// A single unmodified key bound on its own.
    Key,
    /// The second key of a two-key sequence.
    Sequence,
}

/// Outcome of resolving one key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Invoke `action`.
    Fire {
        /// Action to invoke.
        action: ActionId,
        /// Rule that matched.
        trigger: Trigger,
    },
    /// A sequence was armed with this first key.
    Armed {
        /// The pending first key.
        first: String,
    },
    /// Nothing matched.
    Pass,
}

/// In-progress sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    /// First key of the sequence.
    first: String,
    /// Instant after which the sequence can no longer complete.
    deadline: Instant,
    /// Generation this pending state was created under.
    generation: u64,
}

/// Binding table plus the `Idle` / `PendingSequence` state.
#[derive(Debug)]
pub(crate) struct Resolver {
    /// Current bindings; replaced wholesale on rebind.
    table: Arc<BindingTable>,
    /// `None` is `Idle`.
    pending: Option<Pending>,
    /// Bumped every time a sequence is armed.
    generation: u64,
    /// Sequence completion window.
    timeout: Duration,
}

impl Resolver {
    /// Create an idle resolver.
    pub(crate) fn new(table: Arc<BindingTable>, timeout: Duration) -> Self {
        Self {
            table,
            pending: None,
            generation: 0,
            timeout,
        }
    }

    /// Replace the binding table. Any pending sequence is abandoned, since its
    /// prefix may not exist in the new table.
    pub(crate) fn set_table(&mut self, table: Arc<BindingTable>) {
        self.table = table;
        self.reset();
    }

    /// Clear pending state. Returns true if a sequence was pending.
    pub(crate) fn reset(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// The pending first key, if any.
    pub(crate) fn pending_key(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.first.as_str())
    }

    /// Generation of the pending state, if any.
    pub(crate) fn pending_generation(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.generation)
    }

    /// Sequence completion window.
    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Deadline expiry for `generation`. A stale generation is a no-op.
    /// Returns true if the pending state was cleared.
    pub(crate) fn expire(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(p) if p.generation == generation => {
                debug!("Sequence '{}' timed out", p.first);
                self.pending = None;
                true
            }
            _ => {
                trace!("stale_deadline" = generation);
                false
            }
        }
    }

    /// Resolve one normalized, non-modifier key press at `now`.
    pub(crate) fn resolve(&mut self, key: &str, mods: Modifiers, now: Instant) -> Resolution {
        if let Some(p) = &self.pending
            && now >= p.deadline
        {
            debug!("Sequence '{}' expired before next key", p.first);
            self.pending = None;
        }

        // With no modifiers held the canonical chord is the bare key, so this lookup
        // covers both modified chords and single-key bindings.
        let combo = format!("{}{}", mods.prefix(), key);
        if let Some(action) = self.table.lookup_chord(&combo) {
            if let Some(p) = self.pending.take() {
                trace!("Chord '{}' preempts pending '{}'", combo, p.first);
            }
            let trigger = if mods.is_empty() {
                Trigger::Key
            } else {
                Trigger::Chord
            };
            return Resolution::Fire {
                action: action.clone(),
                trigger,
            };
        }

        if let Some(p) = self.pending.take() {
            if mods.is_empty()
                && let Some(action) = self.table.lookup_sequence(&p.first, key)
            {
                return Resolution::Fire {
                    action: action.clone(),
                    trigger: Trigger::Sequence,
                };
            }
            debug!("Sequence '{}' abandoned by '{}'", p.first, combo);
        }

        if mods.is_empty() && self.table.has_sequence_prefix(key) {
            self.generation += 1;
            self.pending = Some(Pending {
                first: key.to_string(),
                deadline: now + self.timeout,
                generation: self.generation,
            });
            trace!("Sequence armed by '{}' (generation {})", key, self.generation);
            return Resolution::Armed {
                first: key.to_string(),
            };
        }

        Resolution::Pass
    }
}
