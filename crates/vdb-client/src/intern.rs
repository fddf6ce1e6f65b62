//! String table for labels
//!
//! Keys are assigned from 0 in first-seen order and never change.

use std::collections::HashMap;

/// Outcome of interning a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interned {
    /// Seen before; nothing needs to be sent
    Existing(u32),
    /// First sighting; the definition must precede any use of the key
    New(u32),
}

impl Interned {
    pub fn key(self) -> u32 {
        match self {
            Interned::Existing(key) | Interned::New(key) => key,
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, Interned::New(_))
    }
}

#[derive(Debug, Default)]
pub struct StringTable {
    keys: HashMap<String, u32>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, label: &str) -> Interned {
        if let Some(&key) = self.keys.get(label) {
            return Interned::Existing(key);
        }
        let key = self.keys.len() as u32;
        self.keys.insert(label.to_string(), key);
        Interned::New(key)
    }
}
