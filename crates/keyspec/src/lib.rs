//! keyspec: the shortcut pattern grammar.
//!
//! - [`Modifier`] and [`Modifiers`]: the two modifiers a pattern can carry. Meta and
//!   control are fused into a single primary modifier spelled `cmd`.
//! - [`Chord`]: `[cmd+][shift+]<key>`, satisfied by one key event.
//! - [`Sequence`]: `<key> <key>`, two unmodified key events in a row.
//! - [`Pattern`]: either of the above, parsed from the string form used in bindings.
//!
//! Key tokens are case-insensitive and stored lower-cased. Modifier prefixes are
//! strict: only `cmd+` and `shift+`, in that order.

mod chord;
mod error;
mod key;
mod modifiers;
mod pattern;

pub use chord::Chord;
pub use error::PatternError;
pub use key::normalize_key;
pub use modifiers::{Modifier, Modifiers};
pub use pattern::{Pattern, Sequence};
