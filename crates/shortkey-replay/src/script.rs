//! Key script parsing.
//!
//! One step per line:
//! - an event description such as `cmd+k`, `Ctrl+Shift+P` or `g`
//! - `wait <ms>` to let time pass
//! - `input <event>`, `textarea <event>` or `editable <event>` to deliver the key
//!   to an editable target
//! - `rebind <path>` to swap in the bindings from another config file, resolved
//!   against the script's directory
//!
//! Blank lines and lines starting with `#` are skipped.

use std::{path::PathBuf, time::Duration};

use keyspec::Chord;
use shortkey_engine::{KeyEvent, Target};
use thiserror::Error;

/// A script line that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("script line {line}: {message}")]
pub struct ScriptError {
    /// 1-based line number.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

/// One action in a key script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Deliver a key event.
    Key {
        /// The event text as written, for echoing.
        spec: String,
        /// The event to deliver.
        event: KeyEvent,
    },
    /// Let time pass.
    Wait(Duration),
    /// Replace the bindings with those from another config.
    Rebind(PathBuf),
}

/// A parsed step and the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// The step on that line.
    pub step: Step,
}

/// Parse a whole script.
pub fn parse(src: &str) -> Result<Vec<Line>, ScriptError> {
    let mut out = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let number = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let step = parse_step(text).map_err(|message| ScriptError {
            line: number,
            message,
        })?;
        out.push(Line { number, step });
    }
    Ok(out)
}

/// Parse one non-empty line.
fn parse_step(text: &str) -> Result<Step, String> {
    let (word, rest) = match text.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (text, ""),
    };
    let target = match word {
        "wait" => {
            let ms: u64 = rest
                .parse()
                .map_err(|_| format!("expected milliseconds after 'wait', got '{}'", rest))?;
            return Ok(Step::Wait(Duration::from_millis(ms)));
        }
        "rebind" if !rest.is_empty() => return Ok(Step::Rebind(PathBuf::from(rest))),
        "rebind" => return Err("expected a config path after 'rebind'".to_string()),
        "input" => Some(Target::TextField),
        "textarea" => Some(Target::TextArea),
        "editable" => Some(Target::ContentEditable),
        _ => None,
    };
    let spec = match target {
        Some(_) if rest.is_empty() => return Err(format!("expected a key after '{}'", word)),
        Some(_) => rest,
        None => text,
    };
    let chord = Chord::parse_event(spec).ok_or_else(|| format!("cannot parse key '{}'", spec))?;
    let event = KeyEvent::from_chord(&chord).with_target(target.unwrap_or_default());
    Ok(Step::Key {
        spec: text.to_string(),
        event,
    })
}
