//! Host platform boundary.
//!
//! The extension talks to the browser through three capabilities: a
//! persistent key-value store with a change feed, a tab source, and a
//! context-menu registry. `chrome` implements them over the extension APIs;
//! `memory` implements the same contracts in-process for tests.
#![allow(async_fn_in_trait)]

pub mod chrome;
pub mod memory;

use std::collections::BTreeMap;

use futures::channel::mpsc::UnboundedReceiver;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bookmark::TabContext;
use crate::error::TabManError;

/// Storage area name used for everything TabMan persists.
pub const LOCAL_AREA: &str = "local";

/// Asynchronous key-value store (`chrome.storage.local`).
pub trait KeyValueStore {
    /// Value stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, TabManError>;

    /// Overwrite `key` with `value`. Subscribers are notified afterwards.
    async fn set(&self, key: &str, value: Value) -> Result<(), TabManError>;

    /// New change feed. Every successful `set` delivers one `StorageChanges`.
    fn subscribe(&self) -> UnboundedReceiver<StorageChanges>;
}

/// Tab and window queries (`chrome.tabs`).
pub trait TabSource {
    /// Active tab in the current window.
    async fn active_tab(&self) -> Result<Option<TabContext>, TabManError>;

    /// Open `url` in a new tab.
    async fn open_url(&self, url: &str) -> Result<(), TabManError>;
}

/// Context-menu registry (`chrome.contextMenus`).
pub trait MenuSource {
    fn create(&self, item: &MenuItem) -> Result<(), TabManError>;
}

/// One context-menu entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<String>,
}

/// Old and new value for one changed key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueChange {
    #[serde(default)]
    pub old_value: Option<Value>,
    #[serde(default)]
    pub new_value: Option<Value>,
}

/// One notification from the store's change feed.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChanges {
    pub area: String,
    pub changes: BTreeMap<String, ValueChange>,
}

impl StorageChanges {
    pub fn new(area: impl Into<String>) -> Self {
        StorageChanges {
            area: area.into(),
            changes: BTreeMap::new(),
        }
    }

    pub fn with_change(mut self, key: impl Into<String>, change: ValueChange) -> Self {
        self.changes.insert(key.into(), change);
        self
    }

    pub fn is_local(&self) -> bool {
        self.area == LOCAL_AREA
    }

    pub fn get(&self, key: &str) -> Option<&ValueChange> {
        self.changes.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_change_from_host_shape() {
        let raw = json!({ "newValue": [1, 2] });
        let change: ValueChange = serde_json::from_value(raw).unwrap();

        assert_eq!(change.old_value, None);
        assert_eq!(change.new_value, Some(json!([1, 2])));
    }

    #[test]
    fn test_storage_changes_lookup() {
        let changes = StorageChanges::new(LOCAL_AREA).with_change("savedTabs", ValueChange::default());

        assert!(changes.is_local());
        assert!(changes.get("savedTabs").is_some());
        assert!(changes.get("other").is_none());
        assert!(!StorageChanges::new("sync").is_local());
    }

    #[test]
    fn test_menu_item_serialization() {
        let item = MenuItem {
            id: "addToTabMan".to_string(),
            title: "Add to TabMan".to_string(),
            contexts: vec!["page".to_string()],
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, json!({ "id": "addToTabMan", "title": "Add to TabMan", "contexts": ["page"] }));
    }
}
