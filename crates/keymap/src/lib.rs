//! Binding table and configuration for shortkey.
//!
//! A [`BindingTable`] maps shortcut patterns to opaque [`ActionId`]s and answers the
//! three queries the dispatcher needs: chord lookup, sequence lookup, and whether a
//! key can start a sequence. Tables are immutable; reconfiguration builds a new one.
//!
//! [`Config`] is the on-disk form, read from RON.

mod action;
mod config;
mod error;
mod table;

pub use action::ActionId;
pub use config::{Config, DEFAULT_SEQUENCE_TIMEOUT_MS};
pub use error::Error;
pub use table::{BindingTable, InertPattern};
