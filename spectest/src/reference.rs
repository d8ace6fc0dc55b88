use std::collections::BTreeMap;

/// An expected-output fragment lifted from a reference module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub number: u32,
    /// The fragment text, including its closing bracket line.
    pub html: String,
}

/// Reference entries keyed by example number. Numbers with no entry are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMap {
    entries: BTreeMap<u32, ReferenceEntry>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        ReferenceMap::default()
    }

    /// Insert an entry, returning the one it replaced, if any.
    pub fn insert(&mut self, entry: ReferenceEntry) -> Option<ReferenceEntry> {
        self.entries.insert(entry.number, entry)
    }

    pub fn get(&self, number: u32) -> Option<&ReferenceEntry> {
        self.entries.get(&number)
    }

    pub fn contains(&self, number: u32) -> bool {
        self.entries.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.values()
    }
}

impl FromIterator<ReferenceEntry> for ReferenceMap {
    fn from_iter<I: IntoIterator<Item = ReferenceEntry>>(iter: I) -> Self {
        let mut map = ReferenceMap::new();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}
