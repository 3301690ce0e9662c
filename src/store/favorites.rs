//! Favorites list
//!
//! Ordered, duplicate-free list of formatted quote strings, persisted as a
//! JSON array under the `quoteFavs` key after every mutation.
//! Storage failures are logged and swallowed: the in-memory list stays the
//! source of truth for the rest of the session.

use super::{SharedStorage, StorageError, FAVORITES_KEY};

/// Placeholder row shown when the list is empty
pub const EMPTY_PLACEHOLDER: &str = "No favorites yet.";

/// One row of the rendered favorites list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteRow<'a> {
    Placeholder(&'static str),
    Entry { index: usize, text: &'a str },
}

pub struct Favorites {
    items: Vec<String>,
    storage: SharedStorage,
}

impl Favorites {
    /// Load the persisted list, falling back to an empty one on any failure
    pub fn load(storage: SharedStorage) -> Self {
        let items = match read_list(&storage) {
            Ok(items) => dedup_preserving_order(items),
            Err(e) => {
                tracing::warn!("Failed to load favorites: {}", e);
                Vec::new()
            }
        };
        tracing::debug!("Loaded {} favorite(s)", items.len());
        Self { items, storage }
    }

    /// Persist the current list; failures are logged only
    pub fn save(&self) {
        if let Err(e) = write_list(&self.storage, &self.items) {
            tracing::warn!("Failed to save favorites: {}", e);
        }
    }

    /// Append a quote unless it is empty or already saved.
    /// Returns true when the list changed.
    pub fn add(&mut self, quote: &str) -> bool {
        if quote.is_empty() || self.contains(quote) {
            return false;
        }
        self.items.push(quote.to_string());
        self.save();
        true
    }

    /// Remove the entry at `index`; out-of-range indices are ignored
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.save();
        Some(removed)
    }

    /// Empty the list. Callers are responsible for asking the user first.
    pub fn clear(&mut self) {
        self.items.clear();
        self.save();
    }

    /// Display rows: every entry with its index, or a single placeholder
    pub fn render(&self) -> Vec<FavoriteRow<'_>> {
        if self.items.is_empty() {
            return vec![FavoriteRow::Placeholder(EMPTY_PLACEHOLDER)];
        }
        self.items
            .iter()
            .enumerate()
            .map(|(index, text)| FavoriteRow::Entry { index, text })
            .collect()
    }

    pub fn contains(&self, quote: &str) -> bool {
        self.items.iter().any(|q| q == quote)
    }

    #[cfg(test)]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn read_list(storage: &SharedStorage) -> Result<Vec<String>, StorageError> {
    match storage.get_item(FAVORITES_KEY)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Decode {
            key: FAVORITES_KEY.to_string(),
            source,
        }),
        None => Ok(Vec::new()),
    }
}

fn write_list(storage: &SharedStorage, items: &[String]) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items).map_err(|source| StorageError::Encode {
        key: FAVORITES_KEY.to_string(),
        source,
    })?;
    storage.set_item(FAVORITES_KEY, &raw)
}

/// Hand-edited files may contain repeats; keep the first occurrence
fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::BrokenStorage;
    use crate::store::{MemoryStorage, Storage};
    use std::sync::Arc;

    fn memory() -> (MemoryStorage, SharedStorage) {
        let storage = MemoryStorage::new();
        let shared: SharedStorage = Arc::new(storage.clone());
        (storage, shared)
    }

    fn persisted(storage: &MemoryStorage) -> Vec<String> {
        let raw = storage.get_item(FAVORITES_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_load_missing_is_empty() {
        let (_, shared) = memory();
        let favs = Favorites::load(shared);
        assert!(favs.is_empty());
    }

    #[test]
    fn test_load_corrupt_falls_back_to_empty() {
        let (storage, shared) = memory();
        storage.set_item(FAVORITES_KEY, "{not json").unwrap();

        let favs = Favorites::load(shared);
        assert!(favs.is_empty());
    }

    #[test]
    fn test_load_unreadable_storage_falls_back_to_empty() {
        let favs = Favorites::load(Arc::new(BrokenStorage));
        assert!(favs.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let (storage, shared) = memory();
        let mut favs = Favorites::load(shared);

        assert!(favs.add("Life is short – Anon"));
        assert!(!favs.add("Life is short – Anon"));
        assert_eq!(favs.len(), 1);
        assert_eq!(persisted(&storage), vec!["Life is short – Anon".to_string()]);
    }

    #[test]
    fn test_add_ignores_empty() {
        let (_, shared) = memory();
        let mut favs = Favorites::load(shared);
        assert!(!favs.add(""));
        assert!(favs.is_empty());
    }

    #[test]
    fn test_remove_by_index() {
        let (storage, shared) = memory();
        storage.set_item(FAVORITES_KEY, r#"["A","B"]"#).unwrap();
        let mut favs = Favorites::load(shared);

        assert_eq!(favs.remove(0).as_deref(), Some("A"));
        assert_eq!(favs.items(), &["B".to_string()]);
        assert_eq!(persisted(&storage), vec!["B".to_string()]);

        assert_eq!(favs.remove(5), None);
        assert_eq!(favs.len(), 1);
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let (storage, shared) = memory();
        storage.set_item(FAVORITES_KEY, r#"["A","B"]"#).unwrap();
        let mut favs = Favorites::load(shared);

        favs.clear();
        assert!(favs.is_empty());
        assert!(persisted(&storage).is_empty());
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let mut favs = Favorites::load(Arc::new(BrokenStorage));
        assert!(favs.add("kept for the session"));
        assert!(favs.contains("kept for the session"));
    }

    #[test]
    fn test_load_drops_duplicates() {
        let (storage, shared) = memory();
        storage.set_item(FAVORITES_KEY, r#"["A","B","A"]"#).unwrap();

        let favs = Favorites::load(shared);
        assert_eq!(favs.items(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_render_placeholder_and_entries() {
        let (_, shared) = memory();
        let mut favs = Favorites::load(shared);
        assert_eq!(favs.render(), vec![FavoriteRow::Placeholder(EMPTY_PLACEHOLDER)]);

        favs.add("A");
        favs.add("B");
        assert_eq!(
            favs.render(),
            vec![
                FavoriteRow::Entry { index: 0, text: "A" },
                FavoriteRow::Entry { index: 1, text: "B" },
            ]
        );
    }
}
