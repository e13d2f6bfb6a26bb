//! Literal substitution table for common scoresheet misreads.
//!
//! Rules run once, in table order, each replacing every occurrence across the
//! whole transcription (headers included). No pattern matching beyond plain
//! substrings: a later rule sees the output of the earlier ones.

const LEGACY_FIXES: [(&str, &str); 20] = [
    // Queenside first: the kingside rules below would otherwise leave `O-O-0`.
    ("0-0-0", "O-O-O"),
    ("0-0-O", "O-O-O"),
    ("0-O-0", "O-O-O"),
    ("0-O-O", "O-O-O"),
    ("O-0-0", "O-O-O"),
    ("O-0-O", "O-O-O"),
    ("O-O-0", "O-O-O"),
    ("@", "Q"),       // @ often misread as Q
    ("O-0", "O-O"),   // castling
    ("0-0", "O-O"),   // castling
    ("NC", "Nc"),     // uppercase file
    ("NB", "Nb"),     // uppercase file
    ("es", "e5"),
    ("Rfci", "Rfc1"),
    ("43", "g3"),
    ("662", "Qb2"),
    ("RC", "Rc"),     // uppercase file
    ("BX", "Bx"),     // capture marker
    ("RXC", "Rxc"),   // capture marker
    ("GX", "Qx"),     // G read for Q on captures
];

/// Legacy table without the entries tuned to one particular scoresheet
/// (`es`, `Rfci`, `43`, `662`).
const GENERAL_FIXES: [(&str, &str); 16] = [
    ("0-0-0", "O-O-O"),
    ("0-0-O", "O-O-O"),
    ("0-O-0", "O-O-O"),
    ("0-O-O", "O-O-O"),
    ("O-0-0", "O-O-O"),
    ("O-0-O", "O-O-O"),
    ("O-O-0", "O-O-O"),
    ("@", "Q"),
    ("O-0", "O-O"),
    ("0-0", "O-O"),
    ("NC", "Nc"),
    ("NB", "Nb"),
    ("RC", "Rc"),
    ("BX", "Bx"),
    ("RXC", "Rxc"),
    ("GX", "Qx"),
];

/// An ordered list of `(pattern, replacement)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotationTable {
    name: &'static str,
    fixes: &'static [(&'static str, &'static str)],
}

impl Default for NotationTable {
    fn default() -> Self {
        Self::legacy()
    }
}

impl NotationTable {
    pub fn legacy() -> Self {
        Self {
            name: "legacy",
            fixes: &LEGACY_FIXES,
        }
    }

    pub fn general() -> Self {
        Self {
            name: "general",
            fixes: &GENERAL_FIXES,
        }
    }

    /// Look a table up by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::legacy()),
            "general" => Some(Self::general()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fixes(&self) -> &'static [(&'static str, &'static str)] {
        self.fixes
    }

    /// Apply every rule once, in order, to the whole text.
    pub fn apply(&self, text: &str) -> String {
        let mut fixed = text.to_string();
        for &(old, new) in self.fixes {
            if fixed.contains(old) {
                fixed = fixed.replace(old, new);
            }
        }
        fixed
    }
}

/// Normalize with the default (legacy) table.
pub fn fix_notation_issues(text: &str) -> String {
    NotationTable::legacy().apply(text)
}
