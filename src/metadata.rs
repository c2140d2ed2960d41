//! The document metadata queue.

/// One metadata entry, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// The key, as written in the source.
    pub key: String,
    /// The rendered value.
    pub value: String,
}

/// An ordered collection of metadata entries.
///
/// Renderers append an entry for every meta node not tagged as deleted, in
/// tree-walk order; the document header consumes the queue when emitting
/// standalone framing.
#[derive(Debug, Clone, Default)]
pub struct MetadataQueue {
    entries: Vec<Metadata>,
}

impl MetadataQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        MetadataQueue::default()
    }

    /// Append an entry.
    pub fn push(&mut self, key: String, value: String) {
        self.entries.push(Metadata { key, value });
    }

    /// The entries, in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Metadata> {
        self.entries.iter()
    }

    /// Look up a value by ASCII-case-insensitive key.  When a key was
    /// given more than once, the last value wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|m| m.key.eq_ignore_ascii_case(key))
            .map(|m| m.value.as_str())
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a MetadataQueue {
    type Item = &'a Metadata;
    type IntoIter = std::slice::Iter<'a, Metadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
