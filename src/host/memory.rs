//! In-process host used by tests and headless runs.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use serde_json::Value;

use super::{KeyValueStore, LOCAL_AREA, MenuItem, MenuSource, StorageChanges, TabSource, ValueChange};
use crate::bookmark::TabContext;
use crate::error::TabManError;

#[derive(Default)]
struct StoreInner {
    data: HashMap<String, Value>,
    listeners: Vec<UnboundedSender<StorageChanges>>,
}

/// Shared in-memory store. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<StoreInner>>,
    fail_reads: Rc<Cell<bool>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` reject.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make every subsequent `set` reject without touching the data.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Raw stored value, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.inner.borrow().data.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, TabManError> {
        if self.fail_reads.get() {
            return Err(TabManError::StorageRead(format!("read of {} rejected", key)));
        }
        Ok(self.inner.borrow().data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), TabManError> {
        if self.fail_writes.get() {
            return Err(TabManError::StorageWrite(format!("write of {} rejected", key)));
        }

        let mut inner = self.inner.borrow_mut();
        let old_value = inner.data.insert(key.to_string(), value.clone());
        let changes = StorageChanges::new(LOCAL_AREA).with_change(
            key,
            ValueChange {
                old_value,
                new_value: Some(value),
            },
        );

        inner
            .listeners
            .retain(|listener| listener.unbounded_send(changes.clone()).is_ok());
        Ok(())
    }

    fn subscribe(&self) -> UnboundedReceiver<StorageChanges> {
        let (tx, rx) = mpsc::unbounded();
        self.inner.borrow_mut().listeners.push(tx);
        rx
    }
}

/// Tabs known to the fake browser plus every URL opened through it.
#[derive(Clone, Default)]
pub struct MemoryTabs {
    active: Rc<RefCell<Option<TabContext>>>,
    opened: Rc<RefCell<Vec<String>>>,
}

impl MemoryTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&self, tab: Option<TabContext>) {
        *self.active.borrow_mut() = tab;
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl TabSource for MemoryTabs {
    async fn active_tab(&self) -> Result<Option<TabContext>, TabManError> {
        Ok(self.active.borrow().clone())
    }

    async fn open_url(&self, url: &str) -> Result<(), TabManError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

/// Records registered menu entries.
#[derive(Clone, Default)]
pub struct MemoryMenus {
    items: Rc<RefCell<Vec<MenuItem>>>,
    fail_creates: Rc<Cell<bool>>,
}

impl MemoryMenus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create` reject.
    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.set(fail);
    }

    pub fn items(&self) -> Vec<MenuItem> {
        self.items.borrow().clone()
    }
}

impl MenuSource for MemoryMenus {
    fn create(&self, item: &MenuItem) -> Result<(), TabManError> {
        if self.fail_creates.get() {
            return Err(TabManError::Host(format!("menu {} rejected", item.id)));
        }
        self.items.borrow_mut().push(item.clone());
        Ok(())
    }
}
