//! Parse and load shortcut configuration.

use std::{fs, path::Path, time::Duration};

use keyspec::Pattern;
use serde::{Deserialize, Serialize};

use crate::{ActionId, BindingTable, Error};

/// Default window for completing a two-key sequence.
pub const DEFAULT_SEQUENCE_TIMEOUT_MS: u64 = 800;

/// Serde default for `sequence_timeout_ms`.
fn default_timeout_ms() -> u64 {
    DEFAULT_SEQUENCE_TIMEOUT_MS
}

/// User configuration: the bindings plus engine tunables.
///
/// ```text
/// (
///     sequence_timeout_ms: 800,
///     bindings: [
///         ("cmd+k", "palette.open"),
///         ("g d", "nav.dashboard"),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Window for completing a sequence, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub sequence_timeout_ms: u64,

    /// `(pattern, action)` pairs in registration order.
    #[serde(default)]
    pub bindings: Vec<(String, ActionId)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sequence_timeout_ms: DEFAULT_SEQUENCE_TIMEOUT_MS,
            bindings: Vec::new(),
        }
    }
}

impl Config {
    /// Load a config from a RON file at `path`.
    pub fn load_from_path(path: &Path) -> Result<Self, Error> {
        let src = fs::read_to_string(path).map_err(|e| Error::Read {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })?;
        Self::load_from_str(&src, Some(path))
    }

    /// Parse a config from RON text; `path` is only used for error reporting.
    pub fn load_from_str(src: &str, path: Option<&Path>) -> Result<Self, Error> {
        ron::from_str(src).map_err(|e| Error::Parse {
            path: path.map(Path::to_path_buf),
            message: e.to_string(),
        })
    }

    /// Sequence completion window.
    pub fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.sequence_timeout_ms)
    }

    /// Build the binding table. Malformed patterns end up inert rather than failing.
    pub fn table(&self) -> BindingTable {
        BindingTable::new(self.bindings.iter().map(|(p, a)| (p.as_str(), a.clone())))
    }

    /// Strict check: fail if any binding does not follow the pattern grammar.
    pub fn validate(&self, path: Option<&Path>) -> Result<(), Error> {
        let problems: Vec<String> = self
            .bindings
            .iter()
            .filter_map(|(p, _)| Pattern::parse(p).err().map(|e| format!("'{}': {}", p, e)))
            .collect();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation {
                path: path.map(Path::to_path_buf),
                message: problems.join("\n"),
            })
        }
    }
}
