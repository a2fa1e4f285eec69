//! String interner for categorical columns.
//!
//! Each distinct label is stored once and addressed by a dense integer ID.
//! IDs are assigned in first-interned order starting at zero, so a column can
//! keep one `StringId` per row and group-by can accumulate into a `Vec`
//! indexed by ID instead of hashing strings per row.
//!
//! The interner only grows while a table is being built. Once the table is
//! constructed it is never mutated, which keeps it `Send + Sync` without locks.
//!
//! # Examples
//!
//! ```
//! use usagetable::StringInterner;
//!
//! let mut interner = StringInterner::new();
//!
//! let seoul = interner.intern("Seoul");
//! let busan = interner.intern("Busan");
//! assert_eq!(interner.intern("Seoul"), seoul);
//! assert_ne!(seoul, busan);
//!
//! assert_eq!(interner.resolve(busan), Some("Busan"));
//! assert_eq!(interner.len(), 2);
//! ```

use std::collections::HashMap;

/// Interned string ID type
pub type StringId = u32;

#[derive(Debug, Clone, Default)]
pub struct StringInterner {
    string_to_id: HashMap<String, StringId>,
    /// Index = ID
    id_to_string: Vec<String>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        StringInterner {
            string_to_id: HashMap::with_capacity(capacity),
            id_to_string: Vec::with_capacity(capacity),
        }
    }

    /// Intern a string, returning its ID. Existing strings keep their ID.
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.string_to_id.get(s) {
            return id;
        }

        let id = self.id_to_string.len() as StringId;
        self.id_to_string.push(s.to_string());
        self.string_to_id.insert(s.to_string(), id);
        id
    }

    pub fn resolve(&self, id: StringId) -> Option<&str> {
        self.id_to_string.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.id_to_string.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_string.is_empty()
    }

    /// All `(id, label)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (StringId, &str)> {
        self.id_to_string
            .iter()
            .enumerate()
            .map(|(id, s)| (id as StringId, s.as_str()))
    }
}
