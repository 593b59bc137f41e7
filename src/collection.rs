/// The saved-tab collection and its persistence under `savedTabs`
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bookmark::Bookmark;
use crate::error::TabManError;
use crate::host::KeyValueStore;

/// Storage key holding the whole collection.
pub const SAVED_TABS_KEY: &str = "savedTabs";

/// Insertion-ordered list of bookmarks. Stored as a bare JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Collection {
    pub tabs: Vec<Bookmark>,
}

impl Collection {
    pub fn new() -> Self {
        Collection { tabs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.tabs.iter()
    }

    pub fn push(&mut self, bookmark: Bookmark) {
        self.tabs.push(bookmark);
    }

    pub fn find(&self, id: i64) -> Option<&Bookmark> {
        self.tabs.iter().find(|b| b.id == id)
    }

    /// Overwrite category and description of the record with `id`.
    pub fn update_details(&mut self, id: i64, category: String, description: String) -> bool {
        self.tabs
            .iter_mut()
            .find(|b| b.id == id)
            .map(|bookmark| {
                bookmark.category = category;
                bookmark.description = description;
            })
            .is_some()
    }

    /// Remove the first record with `id`.
    pub fn remove(&mut self, id: i64) -> bool {
        match self.tabs.iter().position(|b| b.id == id) {
            Some(index) => {
                self.tabs.remove(index);
                true
            }
            None => false,
        }
    }

    /// Id for a record created at `now_millis`. Stays time-derived, but never
    /// repeats or precedes an id already in the collection.
    pub fn next_id(&self, now_millis: i64) -> i64 {
        match self.tabs.iter().map(|b| b.id).max() {
            Some(max) if max >= now_millis => max.saturating_add(1),
            _ => now_millis,
        }
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tabs
            .iter()
            .filter(|b| seen.insert(b.category.as_str()))
            .map(|b| b.category.clone())
            .collect()
    }

    /// Parse a stored value. `null` counts as an empty collection.
    pub fn from_value(value: Option<Value>) -> Result<Collection, TabManError> {
        match value {
            None | Some(Value::Null) => Ok(Collection::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    pub fn to_value(&self) -> Result<Value, TabManError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<Vec<Bookmark>> for Collection {
    fn from(tabs: Vec<Bookmark>) -> Self {
        Collection { tabs }
    }
}

/// Read the full collection from the store.
pub async fn load_collection<S: KeyValueStore>(store: &S) -> Result<Collection, TabManError> {
    let value = store.get(SAVED_TABS_KEY).await?;
    Collection::from_value(value)
}

/// Write the full collection back, replacing whatever was stored.
pub async fn save_collection<S: KeyValueStore>(store: &S, collection: &Collection) -> Result<(), TabManError> {
    store.set(SAVED_TABS_KEY, collection.to_value()?).await
}
