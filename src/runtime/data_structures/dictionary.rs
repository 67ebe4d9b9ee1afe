use std::collections::HashMap;

/// Maps word names to their index in the word table.  Names are matched case-insensitively, so
/// lookup and insertion both normalize to lower case first, matching the outer interpreter's
/// case-insensitive dispatch.
///
/// The dictionary is intentionally flat (unlike a nested lexical-scope dictionary): a later
/// definition simply overwrites the name-to-index mapping for an earlier one, and `forget`
/// rolls the whole table back to a marked point.
#[derive(Default)]
pub struct Dictionary {
    names: HashMap<String, u16>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary { names: HashMap::new() }
    }

    pub fn define(&mut self, name: &str, index: u16) {
        self.names.insert(name.to_lowercase(), index);
    }

    pub fn lookup(&self, name: &str) -> Option<u16> {
        self.names.get(&name.to_lowercase()).copied()
    }

    /// Removes every entry whose index is `>= marker`.  Does not touch the code segment: a
    /// composite word defined after the marker may still be referenced by code emitted before
    /// it forgets itself, so only the dictionary and word table are rolled back.
    pub fn forget(&mut self, marker: u16) {
        self.names.retain(|_, &mut index| index < marker);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reverse lookup used by the `debug.` disassembler.
    pub fn name_for(&self, index: u16) -> Option<String> {
        self.names.iter().find(|(_, &v)| v == index).map(|(k, _)| k.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut dict = Dictionary::new();
        dict.define("DUP", 7);
        assert_eq!(dict.lookup("dup"), Some(7));
        assert_eq!(dict.lookup("Dup"), Some(7));
    }

    #[test]
    fn forget_removes_entries_at_or_past_marker_only() {
        let mut dict = Dictionary::new();
        dict.define("a", 0);
        dict.define("b", 1);
        dict.define("c", 2);
        dict.forget(1);
        assert_eq!(dict.lookup("a"), Some(0));
        assert_eq!(dict.lookup("b"), None);
        assert_eq!(dict.lookup("c"), None);
    }

    #[test]
    fn later_definition_shadows_earlier_one() {
        let mut dict = Dictionary::new();
        dict.define("foo", 0);
        dict.define("foo", 5);
        assert_eq!(dict.lookup("foo"), Some(5));
    }
}
