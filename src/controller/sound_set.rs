use serde::Serialize;

/// Insertion-ordered set of sound ids.
///
/// Order only matters for resume/pause iteration, which walks sounds in the
/// order they entered the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SoundSet {
    ids: Vec<String>,
}

impl SoundSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the id was not present before.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Returns `true` when the id was present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|existing| existing == id) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Empties the set, handing back its ids in insertion order.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ids)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.clone()
    }
}
