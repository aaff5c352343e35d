//! The dictionary: an append-only table of named definitions.
//!
//! An execution token ([`Xt`]) is a definition's slot in the table. Entries
//! are never removed; they can only be hidden or shadowed by a newer entry
//! with the same name. Lookup scans newest to oldest.

use crate::error::Halt;
use crate::machine::Vm;
use forthkern_common::{Fault, Primitive};
use std::fmt;

/// Execution token: index of a definition in the dictionary.
pub type Xt = usize;

/// Native function supplied by the host through
/// [`Vm::define_code_word`](crate::Vm::define_code_word).
pub type HostFn = fn(&mut Vm) -> Result<(), Halt>;

/// Longest name that fits a one-byte length prefix.
pub const MAX_NAME_LEN: usize = 255;

/// What invoking a definition does.
#[derive(Clone, Copy)]
pub enum Action {
    /// Run a built-in primitive.
    Primitive(Primitive),
    /// Run a host-supplied native function.
    Host(HostFn),
    /// The body is threaded code: a sequence of execution tokens and
    /// inline operands run by the inner interpreter.
    Nested,
}

impl Action {
    /// True for threaded-code bodies.
    pub fn is_nested(&self) -> bool {
        matches!(self, Action::Nested)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Primitive(p) => f.debug_tuple("Primitive").field(p).finish(),
            Action::Host(_) => f.write_str("Host(..)"),
            Action::Nested => f.write_str("Nested"),
        }
    }
}

/// Per-definition flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Skipped by lookup.
    pub hidden: bool,
    /// Runs even while compiling.
    pub immediate: bool,
}

/// A named dictionary entry.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Name as registered, case preserved.
    pub name: String,
    /// What invoking the definition does.
    pub action: Action,
    /// Data-space address where the body starts.
    pub body: usize,
    /// Lookup and compilation flags.
    pub flags: Flags,
}

/// Fixed-capacity, append-only table of definitions.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: Vec<Definition>,
    capacity: usize,
}

impl Dictionary {
    /// Create an empty dictionary holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of entries, hidden ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before any entry is appended.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recently appended entry.
    pub fn latest(&self) -> Option<Xt> {
        self.entries.len().checked_sub(1)
    }

    /// The entry for `xt`, if it exists.
    pub fn get(&self, xt: Xt) -> Option<&Definition> {
        self.entries.get(xt)
    }

    /// Mutable access to the entry for `xt`.
    pub fn get_mut(&mut self, xt: Xt) -> Option<&mut Definition> {
        self.entries.get_mut(xt)
    }

    /// Check that a definition called `name` could be appended.
    pub fn check_append(&self, name: &str) -> Result<(), Fault> {
        if name.len() > MAX_NAME_LEN {
            return Err(Fault::NameTooLong { len: name.len() });
        }
        if self.entries.len() >= self.capacity {
            return Err(Fault::DictionaryFull {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append a definition and make it the latest.
    pub fn append(&mut self, definition: Definition) -> Result<Xt, Fault> {
        self.check_append(&definition.name)?;
        self.entries.push(definition);
        Ok(self.entries.len() - 1)
    }

    /// Find the newest visible definition whose name matches `name`,
    /// ignoring ASCII case. Lengths must match exactly.
    pub fn find(&self, name: &[u8]) -> Option<Xt> {
        self.entries
            .iter()
            .rposition(|def| !def.flags.hidden && def.name.as_bytes().eq_ignore_ascii_case(name))
    }

    /// Every entry, newest first, hidden ones included.
    pub fn iter_latest_first(&self) -> impl Iterator<Item = (Xt, &Definition)> {
        self.entries.iter().enumerate().rev()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str) -> Definition {
        Definition {
            name: name.to_string(),
            action: Action::Nested,
            body: 0,
            flags: Flags::default(),
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        let mut dict = Dictionary::new(8);
        let xt = dict.append(def("SWAP")).unwrap();
        assert_eq!(dict.find(b"swap"), Some(xt));
        assert_eq!(dict.find(b"SwAp"), Some(xt));
    }

    #[test]
    fn find_requires_exact_length() {
        let mut dict = Dictionary::new(8);
        dict.append(def("DUP")).unwrap();
        assert_eq!(dict.find(b"DU"), None);
        assert_eq!(dict.find(b"DUPE"), None);
    }

    #[test]
    fn newer_definition_shadows_older() {
        let mut dict = Dictionary::new(8);
        let old = dict.append(def("X")).unwrap();
        let new = dict.append(def("x")).unwrap();
        assert_ne!(old, new);
        assert_eq!(dict.find(b"X"), Some(new));
        assert!(dict.get(old).is_some());
    }

    #[test]
    fn hidden_definitions_are_skipped() {
        let mut dict = Dictionary::new(8);
        let old = dict.append(def("X")).unwrap();
        let new = dict.append(def("X")).unwrap();
        dict.get_mut(new).unwrap().flags.hidden = true;
        assert_eq!(dict.find(b"X"), Some(old));
        dict.get_mut(old).unwrap().flags.hidden = true;
        assert_eq!(dict.find(b"X"), None);
    }

    #[test]
    fn full_dictionary_rejects_append() {
        let mut dict = Dictionary::new(1);
        dict.append(def("A")).unwrap();
        assert_eq!(
            dict.append(def("B")).unwrap_err(),
            Fault::DictionaryFull { capacity: 1 }
        );
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn long_names_rejected() {
        let dict = Dictionary::new(1);
        let name = "N".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            dict.check_append(&name),
            Err(Fault::NameTooLong { len: 256 })
        );
    }

    #[test]
    fn listing_is_newest_first() {
        let mut dict = Dictionary::new(4);
        dict.append(def("A")).unwrap();
        dict.append(def("B")).unwrap();
        let names: Vec<_> = dict
            .iter_latest_first()
            .map(|(_, d)| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(dict.latest(), Some(1));
    }
}
