use keyspec::{Chord, Modifiers};

/// The UI element a key event originated from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
    /// Anything that does not consume keystrokes as text.
    #[default]
    Other,
    /// A native single-line text field.
    TextField,
    /// A native multi-line text area.
    TextArea,
    /// Any element marked content-editable.
    ContentEditable,
}

impl Target {
    /// True when keystrokes aimed at this element are text input.
    pub fn is_editable(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// One physical key press as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key identifier as reported by the host (any case).
    pub key: String,
    /// Platform meta modifier held.
    pub meta: bool,
    /// Control modifier held.
    pub ctrl: bool,
    /// Shift held.
    pub shift: bool,
    /// Originating element.
    pub target: Target,
}

impl KeyEvent {
    /// An unmodified key press on a non-editable target.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            meta: false,
            ctrl: false,
            shift: false,
            target: Target::Other,
        }
    }

    /// Mark the platform meta modifier as held.
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Mark control as held.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Mark shift as held.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Set the originating element.
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Build an event that reproduces `chord`; the primary modifier is sent as meta.
    pub fn from_chord(chord: &Chord) -> Self {
        Self {
            key: chord.key.clone(),
            meta: chord.modifiers.primary,
            ctrl: false,
            shift: chord.modifiers.shift,
            target: Target::Other,
        }
    }

    /// Held modifiers, with meta and control folded together.
    pub fn modifiers(&self) -> Modifiers {
        Modifiers::from_flags(self.meta, self.ctrl, self.shift)
    }
}
