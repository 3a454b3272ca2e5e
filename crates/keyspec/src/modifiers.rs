/// Modifiers that can appear in a shortcut pattern.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Modifier {
    /// The primary modifier: platform meta or control, which are treated as one.
    Command,
    /// Shift.
    Shift,
}

impl Modifier {
    /// Parses a modifier name, case-insensitively.
    ///
    /// Accepts the canonical names plus common aliases for the primary modifier
    /// (`command`, `meta`, `ctrl`, `control`). Pattern parsing only accepts the
    /// canonical spelling; the aliases exist for describing events.
    pub fn from_spec(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cmd" | "command" | "meta" | "ctrl" | "control" => Some(Self::Command),
            "shift" => Some(Self::Shift),
            _ => None,
        }
    }

    /// Returns the canonical spec string for this modifier.
    pub fn to_spec(self) -> &'static str {
        match self {
            Self::Command => "cmd",
            Self::Shift => "shift",
        }
    }
}

/// The set of modifiers held for a chord.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Modifiers {
    /// Primary modifier (meta or control) held.
    pub primary: bool,
    /// Shift held.
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        primary: false,
        shift: false,
    };

    /// Fold raw event flags into a modifier set. Meta and control are not distinguished.
    pub fn from_flags(meta: bool, ctrl: bool, shift: bool) -> Self {
        Self {
            primary: meta || ctrl,
            shift,
        }
    }

    /// True when no modifier is held.
    pub fn is_empty(self) -> bool {
        !self.primary && !self.shift
    }

    /// True when `m` is held.
    pub fn contains(self, m: Modifier) -> bool {
        match m {
            Modifier::Command => self.primary,
            Modifier::Shift => self.shift,
        }
    }

    /// Add `m` to the set; returns false if it was already present.
    pub fn insert(&mut self, m: Modifier) -> bool {
        let slot = match m {
            Modifier::Command => &mut self.primary,
            Modifier::Shift => &mut self.shift,
        };
        let added = !*slot;
        *slot = true;
        added
    }

    /// Canonical prefix for this set, e.g. `cmd+shift+`.
    pub fn prefix(self) -> String {
        let mut out = String::new();
        if self.primary {
            out.push_str("cmd+");
        }
        if self.shift {
            out.push_str("shift+");
        }
        out
    }
}
