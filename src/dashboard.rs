//! Dashboard state and mutations.
//!
//! A `Dashboard` owns its in-memory copy of the collection together with
//! the filter, sort, layout and edit state. The copy is only a cache: every
//! mutation writes the whole collection back to the store, and
//! [`Dashboard::apply_changes`] replaces the copy whenever the store reports
//! a new value (for example after a capture from the background).

use futures::channel::mpsc::UnboundedReceiver;

use crate::bookmark::{Bookmark, TabContext};
use crate::capture::capture;
use crate::clock::Clock;
use crate::collection::{Collection, SAVED_TABS_KEY, load_collection, save_collection};
use crate::config::{DashboardConfig, ViewMode, load_config};
use crate::error::TabManError;
use crate::host::{KeyValueStore, StorageChanges, TabSource};
use crate::view::{CategoryFilter, CategoryOption, SortKey, View, ViewQuery, category_options, compute_view};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification. `id` lets a delayed clear skip a newer toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// Values pre-filled into the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: i64,
    pub category: String,
    pub description: String,
}

/// Everything the page needs to render one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub view: View,
    pub categories: Vec<CategoryOption>,
    pub search: String,
    pub category: String,
    pub sort: SortKey,
    pub view_mode: ViewMode,
    pub editing: Option<EditDraft>,
    pub toast: Option<Toast>,
    pub config: DashboardConfig,
}

pub struct Dashboard<S, T, C> {
    store: S,
    tabs: T,
    clock: C,
    config: DashboardConfig,
    collection: Collection,
    search: String,
    category: CategoryFilter,
    sort: SortKey,
    view_mode: ViewMode,
    editing: Option<EditDraft>,
    toast: Option<Toast>,
    next_toast_id: u32,
}

impl<S, T, C> Dashboard<S, T, C>
where
    S: KeyValueStore,
    T: TabSource,
    C: Clock,
{
    pub fn new(store: S, tabs: T, clock: C, config: DashboardConfig) -> Self {
        Dashboard {
            store,
            tabs,
            clock,
            sort: config.default_sort,
            view_mode: config.default_view,
            config,
            collection: Collection::new(),
            search: String::new(),
            category: CategoryFilter::All,
            editing: None,
            toast: None,
            next_toast_id: 0,
        }
    }

    /// Subscribe to the store, then load. Writes that land while the load is
    /// in flight still arrive on the returned feed.
    pub async fn start(&mut self) -> (UnboundedReceiver<StorageChanges>, Result<(), TabManError>) {
        let feed = self.store.subscribe();
        let loaded = self.load().await;
        (feed, loaded)
    }

    /// Apply any stored settings override, then read the collection.
    pub async fn load(&mut self) -> Result<(), TabManError> {
        match load_config(&self.store).await {
            Ok(Some(config)) => self.set_config(config),
            Ok(None) => {}
            Err(e) => log::warn!("Error loading settings: {}", e),
        }

        match load_collection(&self.store).await {
            Ok(collection) => {
                self.collection = collection;
                Ok(())
            }
            Err(e) => {
                log::error!("Error loading tabs: {}", e);
                Err(e)
            }
        }
    }

    pub fn set_config(&mut self, config: DashboardConfig) {
        self.sort = config.default_sort;
        self.view_mode = config.default_view;
        self.config = config;
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn query(&self) -> ViewQuery {
        ViewQuery {
            search: self.search.clone(),
            category: self.category.clone(),
            sort: self.config.sorting.then_some(self.sort),
        }
    }

    pub fn view(&self) -> View {
        compute_view(&self.collection, &self.query())
    }

    pub fn category_options(&self) -> Vec<CategoryOption> {
        category_options(&self.collection, self.config.category_order)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            view: self.view(),
            categories: self.category_options(),
            search: self.search.clone(),
            category: self.category.as_value().to_string(),
            sort: self.sort,
            view_mode: self.view_mode,
            editing: self.editing.clone(),
            toast: self.toast.clone(),
            config: self.config.clone(),
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.category = filter;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch layout. Ignored when the config has a single layout.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.config.view_modes {
            self.view_mode = mode;
        }
    }

    /// Open the edit form for `id`. Nothing happens for an unknown id.
    pub fn begin_edit(&mut self, id: i64) -> Option<&EditDraft> {
        let bookmark = self.collection.find(id)?;
        self.editing = Some(EditDraft {
            id,
            category: bookmark.category.clone(),
            description: bookmark.description.clone(),
        });
        self.editing.as_ref()
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save the open edit form. The form stays open if the write fails.
    pub async fn commit_edit(&mut self, category: String, description: String) -> Result<bool, TabManError> {
        let Some(id) = self.editing.as_ref().map(|draft| draft.id) else {
            return Ok(false);
        };

        let updated = self.edit(id, category, description).await?;
        self.editing = None;
        Ok(updated)
    }

    /// Overwrite category and description of one record and persist.
    /// Returns `Ok(false)` without writing when `id` is unknown.
    pub async fn edit(&mut self, id: i64, category: String, description: String) -> Result<bool, TabManError> {
        let mut updated = self.collection.clone();
        if !updated.update_details(id, category, description) {
            log::warn!("Edit target {} not found", id);
            return Ok(false);
        }

        match save_collection(&self.store, &updated).await {
            Ok(()) => {
                self.collection = updated;
                log::info!("Updated tab {}", id);
                self.notify(ToastKind::Success, "Tab updated successfully");
                Ok(true)
            }
            Err(e) => {
                log::error!("Error saving tab: {}", e);
                self.notify(ToastKind::Error, "Failed to update tab");
                Err(e)
            }
        }
    }

    /// Remove one record and persist. The write happens even when `id` is unknown.
    pub async fn delete(&mut self, id: i64) -> Result<bool, TabManError> {
        let mut updated = self.collection.clone();
        let removed = updated.remove(id);

        match save_collection(&self.store, &updated).await {
            Ok(()) => {
                self.collection = updated;
                if removed {
                    log::info!("Deleted tab {}", id);
                    self.notify(ToastKind::Success, "Tab deleted");
                }
                Ok(removed)
            }
            Err(e) => {
                log::error!("Error deleting tab: {}", e);
                self.notify(ToastKind::Error, "Failed to delete tab");
                Err(e)
            }
        }
    }

    /// Open `url` in a new tab.
    pub async fn open(&self, url: &str) -> Result<(), TabManError> {
        self.tabs.open_url(url).await.map_err(|e| {
            log::error!("Error opening tab: {}", e);
            e
        })
    }

    /// Capture the active tab of the current window.
    pub async fn save_current_tab(&mut self) -> Result<Bookmark, TabManError> {
        match self.capture_active_tab().await {
            Ok(bookmark) => {
                self.notify(ToastKind::Success, "Tab saved successfully");
                Ok(bookmark)
            }
            Err(e) => {
                log::error!("Error saving current tab: {}", e);
                self.notify(ToastKind::Error, "Failed to save tab");
                Err(e)
            }
        }
    }

    async fn capture_active_tab(&mut self) -> Result<Bookmark, TabManError> {
        let tab: TabContext = self.tabs.active_tab().await?.ok_or(TabManError::NoActiveTab)?;
        let captured = capture(&self.store, &self.clock, &tab).await?;
        self.collection = captured.collection;
        Ok(captured.bookmark)
    }

    /// Reconcile with a store notification. Returns true when the collection was replaced.
    pub fn apply_changes(&mut self, changes: &StorageChanges) -> Result<bool, TabManError> {
        if !changes.is_local() {
            return Ok(false);
        }
        let Some(change) = changes.get(SAVED_TABS_KEY) else {
            return Ok(false);
        };

        match Collection::from_value(change.new_value.clone()) {
            Ok(collection) => {
                log::debug!("Reloaded {} saved tabs from storage change", collection.len());
                self.collection = collection;
                Ok(true)
            }
            Err(e) => {
                log::error!("Ignoring malformed storage change: {}", e);
                Err(e)
            }
        }
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Clear the toast if it is still the one with `id`.
    pub fn clear_toast(&mut self, id: u32) {
        if self.toast.as_ref().is_some_and(|toast| toast.id == id) {
            self.toast = None;
        }
    }

    fn notify(&mut self, kind: ToastKind, message: &str) {
        if !self.config.toasts {
            return;
        }
        self.next_toast_id = self.next_toast_id.wrapping_add(1);
        self.toast = Some(Toast {
            id: self.next_toast_id,
            kind,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::SETTINGS_KEY;
    use crate::host::memory::{MemoryStore, MemoryTabs};
    use crate::host::{LOCAL_AREA, ValueChange};
    use crate::view::CategoryOrder;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;
    use time::Duration;
    use time::macros::datetime;

    type TestDashboard = Dashboard<MemoryStore, MemoryTabs, ManualClock>;

    fn test_clock() -> ManualClock {
        ManualClock::new(datetime!(2024-01-01 0:00 UTC), Duration::seconds(1))
    }

    fn dashboard_with(store: &MemoryStore, tabs: &MemoryTabs, config: DashboardConfig) -> TestDashboard {
        let mut dashboard = Dashboard::new(store.clone(), tabs.clone(), test_clock(), config);
        block_on(dashboard.load()).unwrap();
        dashboard
    }

    fn dashboard(store: &MemoryStore) -> TestDashboard {
        dashboard_with(store, &MemoryTabs::new(), DashboardConfig::default())
    }

    fn seed(store: &MemoryStore, value: serde_json::Value) {
        block_on(store.set(SAVED_TABS_KEY, value)).unwrap();
    }

    fn stored(store: &MemoryStore) -> Collection {
        Collection::from_value(store.peek(SAVED_TABS_KEY)).unwrap()
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        seed(
            &store,
            json!([
                { "id": 1, "url": "https://a.com", "title": "JavaScript Tutorial", "category": "Work", "description": "", "dateAdded": "2024-01-02T00:00:00.000Z" },
                { "id": 2, "url": "https://b.com", "title": "JavaScript Games", "category": "Personal", "description": "", "dateAdded": "2024-01-03T00:00:00.000Z" },
                { "id": 3, "url": "https://c.com", "title": "Python Guide", "category": "Work", "description": "", "dateAdded": "2024-01-01T00:00:00.000Z" }
            ]),
        );
        store
    }

    fn view_ids(dashboard: &TestDashboard) -> Vec<i64> {
        dashboard.view().items.iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_load_from_storage() {
        let store = seeded_store();
        let dashboard = dashboard(&store);

        assert_eq!(dashboard.collection().len(), 3);
        let view = dashboard.view();
        assert_eq!(view.total, 3);
        assert_eq!(view.visible, 3);
    }

    #[test]
    fn test_load_empty_storage() {
        let store = MemoryStore::new();
        let dashboard = dashboard(&store);

        assert!(dashboard.collection().is_empty());
        assert_eq!(dashboard.category_options().len(), 1);
    }

    #[test]
    fn test_load_failure() {
        let store = seeded_store();
        store.fail_reads(true);
        let mut dashboard = Dashboard::new(store.clone(), MemoryTabs::new(), test_clock(), DashboardConfig::default());

        assert!(block_on(dashboard.load()).is_err());
        assert!(dashboard.collection().is_empty());
    }

    #[test]
    fn test_load_applies_stored_settings() {
        let store = seeded_store();
        block_on(store.set(SETTINGS_KEY, json!({ "defaultSort": "title-az", "categoryOrder": "first-seen" }))).unwrap();

        let dashboard = dashboard(&store);

        assert_eq!(dashboard.config().category_order, CategoryOrder::FirstSeen);
        assert_eq!(view_ids(&dashboard), vec![2, 1, 3]);
    }

    #[test]
    fn test_search_and_category_filter() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);

        dashboard.set_search("javascript");
        dashboard.set_category_filter(CategoryFilter::from_value("Work"));

        assert_eq!(view_ids(&dashboard), vec![1]);
        let view = dashboard.view();
        assert_eq!((view.visible, view.total), (1, 3));
    }

    #[test]
    fn test_sort_changes_order() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);
        assert_eq!(view_ids(&dashboard), vec![2, 1, 3]);

        dashboard.set_sort(SortKey::Oldest);
        assert_eq!(view_ids(&dashboard), vec![3, 1, 2]);
    }

    #[test]
    fn test_classic_config_keeps_stored_order() {
        let store = seeded_store();
        let mut dashboard = dashboard_with(&store, &MemoryTabs::new(), DashboardConfig::classic());

        dashboard.set_sort(SortKey::TitleAz);
        dashboard.set_view_mode(ViewMode::Grid);

        assert_eq!(view_ids(&dashboard), vec![1, 2, 3]);
        assert_eq!(dashboard.view_mode(), ViewMode::List);
        let values: Vec<String> = dashboard.category_options().into_iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["all", "Work", "Personal"]);
    }

    #[test]
    fn test_view_mode_toggle() {
        let store = MemoryStore::new();
        let mut dashboard = dashboard(&store);
        assert_eq!(dashboard.view_mode(), ViewMode::Grid);

        dashboard.set_view_mode(ViewMode::List);
        assert_eq!(dashboard.view_mode(), ViewMode::List);
    }

    #[test]
    fn test_edit_updates_only_details() {
        let store = MemoryStore::new();
        seed(
            &store,
            json!([{
                "id": 1,
                "url": "https://example.com",
                "title": "Example",
                "favIconUrl": "https://example.com/icon.png",
                "category": "Uncategorized",
                "description": "",
                "dateAdded": "2024-01-01T00:00:00.000Z"
            }]),
        );
        let mut dashboard = dashboard(&store);
        let original = dashboard.collection().tabs[0].clone();

        let updated = block_on(dashboard.edit(1, "Work".to_string(), "Important work resource".to_string())).unwrap();

        assert!(updated);
        let saved = stored(&store).tabs[0].clone();
        assert_eq!(saved.category, "Work");
        assert_eq!(saved.description, "Important work resource");
        assert_eq!(saved.id, original.id);
        assert_eq!(saved.url, original.url);
        assert_eq!(saved.title, original.title);
        assert_eq!(saved.fav_icon_url, original.fav_icon_url);
        assert_eq!(saved.date_added, original.date_added);
        assert_eq!(dashboard.collection(), &stored(&store));
    }

    #[test]
    fn test_edit_missing_id_is_noop() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);
        let mut feed = store.subscribe();

        let updated = block_on(dashboard.edit(99, "X".to_string(), "Y".to_string())).unwrap();

        assert!(!updated);
        assert_eq!(stored(&store).len(), 3);
        // Nothing was written
        assert!(feed.try_next().is_err());
        assert!(dashboard.toast().is_none());
    }

    #[test]
    fn test_edit_write_failure_keeps_memory() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);
        store.fail_writes(true);

        let result = block_on(dashboard.edit(1, "Changed".to_string(), String::new()));

        assert!(result.is_err());
        assert_eq!(dashboard.collection().find(1).unwrap().category, "Work");
        assert_eq!(dashboard.toast().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn test_edit_session() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);

        let draft = dashboard.begin_edit(2).cloned().unwrap();
        assert_eq!(draft.category, "Personal");

        let updated = block_on(dashboard.commit_edit("Games".to_string(), "fun".to_string())).unwrap();

        assert!(updated);
        assert!(dashboard.editing().is_none());
        assert_eq!(stored(&store).find(2).unwrap().category, "Games");
    }

    #[test]
    fn test_edit_session_unknown_id() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);

        assert!(dashboard.begin_edit(42).is_none());
        assert!(!block_on(dashboard.commit_edit("x".to_string(), "y".to_string())).unwrap());
    }

    #[test]
    fn test_edit_session_stays_open_on_failure() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);
        dashboard.begin_edit(1);
        store.fail_writes(true);

        assert!(block_on(dashboard.commit_edit("x".to_string(), "y".to_string())).is_err());
        assert_eq!(dashboard.editing().unwrap().id, 1);

        dashboard.cancel_edit();
        assert!(dashboard.editing().is_none());
    }

    #[test]
    fn test_delete_twice() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);

        assert!(block_on(dashboard.delete(2)).unwrap());
        let after_first = stored(&store);
        assert_eq!(after_first.len(), 2);
        assert_eq!(after_first.tabs[0].id, 1);
        assert_eq!(after_first.tabs[1].id, 3);

        let mut feed = store.subscribe();
        assert!(!block_on(dashboard.delete(2)).unwrap());
        assert_eq!(stored(&store).len(), 2);
        // Still persisted
        assert!(feed.try_next().unwrap().is_some());
    }

    #[test]
    fn test_delete_write_failure_keeps_memory() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);
        store.fail_writes(true);

        assert!(block_on(dashboard.delete(1)).is_err());
        assert_eq!(dashboard.collection().len(), 3);
    }

    #[test]
    fn test_open_url() {
        let store = MemoryStore::new();
        let tabs = MemoryTabs::new();
        let dashboard = dashboard_with(&store, &tabs, DashboardConfig::default());

        block_on(dashboard.open("https://example.com/page")).unwrap();

        assert_eq!(tabs.opened(), vec!["https://example.com/page".to_string()]);
        assert_eq!(store.peek(SAVED_TABS_KEY), None);
    }

    #[test]
    fn test_save_current_tab() {
        let store = seeded_store();
        let tabs = MemoryTabs::new();
        tabs.set_active(Some(TabContext::new("https://current.com", "Current")));
        let mut dashboard = dashboard_with(&store, &tabs, DashboardConfig::default());

        let bookmark = block_on(dashboard.save_current_tab()).unwrap();

        assert_eq!(bookmark.url, "https://current.com");
        assert_eq!(bookmark.category, "Uncategorized");
        assert_eq!(dashboard.collection().len(), 4);
        assert_eq!(stored(&store).len(), 4);
        assert_eq!(dashboard.toast().unwrap().kind, ToastKind::Success);
    }

    #[test]
    fn test_save_current_tab_without_active_tab() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);
        let mut feed = store.subscribe();

        let result = block_on(dashboard.save_current_tab());

        assert!(matches!(result, Err(TabManError::NoActiveTab)));
        assert!(feed.try_next().is_err());
        assert_eq!(stored(&store).len(), 3);
    }

    #[test]
    fn test_classic_config_has_no_toasts() {
        let store = seeded_store();
        let mut dashboard = dashboard_with(&store, &MemoryTabs::new(), DashboardConfig::classic());

        block_on(dashboard.delete(1)).unwrap();

        assert!(dashboard.toast().is_none());
    }

    #[test]
    fn test_clear_toast_only_matching() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);

        block_on(dashboard.delete(1)).unwrap();
        let first = dashboard.toast().unwrap().id;
        block_on(dashboard.delete(2)).unwrap();
        let second = dashboard.toast().unwrap().id;

        dashboard.clear_toast(first);
        assert!(dashboard.toast().is_some());

        dashboard.clear_toast(second);
        assert!(dashboard.toast().is_none());
    }

    #[test]
    fn test_reconciles_external_capture() {
        let store = MemoryStore::new();
        let mut dashboard = dashboard(&store);
        let mut feed = store.subscribe();

        // Another writer (the background) captures while the page is open
        block_on(capture(&store, &test_clock(), &TabContext::new("https://a.com", "A"))).unwrap();

        let changes = feed.try_next().unwrap().unwrap();
        assert!(dashboard.apply_changes(&changes).unwrap());
        assert_eq!(dashboard.collection().len(), 1);
        assert_eq!(dashboard.view().items[0].url, "https://a.com");
    }

    /// Store whose first collection read is followed by another writer's save.
    struct ConcurrentWriteStore {
        inner: MemoryStore,
        pending: RefCell<Option<serde_json::Value>>,
    }

    impl KeyValueStore for ConcurrentWriteStore {
        async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, TabManError> {
            let value = self.inner.get(key).await?;
            if key == SAVED_TABS_KEY {
                let pending = self.pending.borrow_mut().take();
                if let Some(pending) = pending {
                    self.inner.set(key, pending).await?;
                }
            }
            Ok(value)
        }

        async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), TabManError> {
            self.inner.set(key, value).await
        }

        fn subscribe(&self) -> UnboundedReceiver<StorageChanges> {
            self.inner.subscribe()
        }
    }

    #[test]
    fn test_start_sees_write_during_load() {
        let inner = seeded_store();
        let store = ConcurrentWriteStore {
            inner: inner.clone(),
            pending: RefCell::new(Some(json!([
                { "id": 9, "url": "https://late.com", "title": "Late", "dateAdded": "2024-01-04T00:00:00.000Z" }
            ]))),
        };
        let mut dashboard = Dashboard::new(store, MemoryTabs::new(), test_clock(), DashboardConfig::default());

        let (mut feed, loaded) = block_on(dashboard.start());
        loaded.unwrap();
        assert_eq!(dashboard.collection().len(), 3);

        while let Ok(Some(changes)) = feed.try_next() {
            dashboard.apply_changes(&changes).unwrap();
        }

        assert_eq!(dashboard.collection().len(), 1);
        assert_eq!(dashboard.collection().tabs[0].url, "https://late.com");
    }

    #[test]
    fn test_apply_changes_ignores_other_keys_and_areas() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);

        let other_key = StorageChanges::new(LOCAL_AREA).with_change("unrelated", ValueChange::default());
        assert!(!dashboard.apply_changes(&other_key).unwrap());

        let other_area = StorageChanges::new("sync").with_change(
            SAVED_TABS_KEY,
            ValueChange {
                old_value: None,
                new_value: Some(json!([])),
            },
        );
        assert!(!dashboard.apply_changes(&other_area).unwrap());
        assert_eq!(dashboard.collection().len(), 3);
    }

    #[test]
    fn test_apply_changes_removed_key_empties() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);

        let removed = StorageChanges::new(LOCAL_AREA).with_change(SAVED_TABS_KEY, ValueChange::default());

        assert!(dashboard.apply_changes(&removed).unwrap());
        assert!(dashboard.collection().is_empty());
    }

    #[test]
    fn test_apply_changes_malformed_keeps_state() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);

        let bad = StorageChanges::new(LOCAL_AREA).with_change(
            SAVED_TABS_KEY,
            ValueChange {
                old_value: None,
                new_value: Some(json!("garbage")),
            },
        );

        assert!(dashboard.apply_changes(&bad).is_err());
        assert_eq!(dashboard.collection().len(), 3);
    }

    #[test]
    fn test_full_lifecycle() {
        let store = MemoryStore::new();
        seed(&store, json!([]));
        let tabs = MemoryTabs::new();
        tabs.set_active(Some(TabContext::new("https://a.com", "A")));
        let mut dashboard = dashboard_with(&store, &tabs, DashboardConfig::default());

        let bookmark = block_on(dashboard.save_current_tab()).unwrap();
        assert_eq!(stored(&store).len(), 1);
        assert_eq!(bookmark.category, "Uncategorized");

        block_on(dashboard.edit(bookmark.id, "Work".to_string(), "x".to_string())).unwrap();
        let saved = stored(&store).tabs[0].clone();
        assert_eq!(saved.category, "Work");
        assert_eq!(saved.url, "https://a.com");

        block_on(dashboard.delete(bookmark.id)).unwrap();
        assert_eq!(stored(&store).len(), 0);
    }

    #[test]
    fn test_snapshot() {
        let store = seeded_store();
        let mut dashboard = dashboard(&store);
        dashboard.set_search("guide");

        let snapshot = dashboard.snapshot();

        assert_eq!(snapshot.view.visible, 1);
        assert_eq!(snapshot.search, "guide");
        assert_eq!(snapshot.category, "all");
        assert_eq!(snapshot.sort, SortKey::Newest);
        assert_eq!(snapshot.categories.len(), 3);
    }
}
