use std::collections::HashMap;

/// Two-way table between label strings and dense ids.
///
/// Ids are handed out in insertion order, so a quark built from a sorted
/// iterator enumerates its labels in sorted order. Decoders index their
/// trellis rows with these ids.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Quark {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl Quark {
    /// Returns the id of `key`, inserting it if it is new.
    pub fn find_or_insert(&mut self, key: &str) -> usize {
        if let Some(&id) = self.m.get(key) {
            return id;
        }
        let id = self.v.len();
        self.m.insert(key.to_string(), id);
        self.v.push(key.to_string());
        id
    }

    pub fn to_id(&self, key: &str) -> Option<usize> {
        self.m.get(key).copied()
    }

    pub fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.v.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Quark {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut quark = Quark::default();
        for s in iter {
            quark.find_or_insert(s.as_ref());
        }
        quark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_str() {
        let mut quark = Quark::default();
        for (s, id) in [("NN", 0), ("VB", 1), ("JJ", 2), ("VB", 1), ("NN", 0), ("RB", 3)] {
            assert_eq!(id, quark.find_or_insert(s), "{} != {}", s, id);
        }
        assert_eq!(quark.len(), 4);
    }

    #[test]
    fn find_by_id() {
        let quark: Quark = ["B-NP", "I-NP", "O"].into_iter().collect();
        assert_eq!(quark.to_str(0), Some("B-NP"));
        assert_eq!(quark.to_str(2), Some("O"));
        assert_eq!(quark.to_str(3), None);
        assert_eq!(quark.to_id("I-NP"), Some(1));
        assert_eq!(quark.to_id("B-PP"), None);
    }

    #[test]
    fn keeps_insertion_order() {
        let quark: Quark = ["O", "B-NP", "O", "I-NP"].into_iter().collect();
        assert_eq!(quark.iter().collect::<Vec<_>>(), vec!["O", "B-NP", "I-NP"]);
    }
}
