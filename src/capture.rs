//! Capture component: turns a tab into a saved bookmark.
//!
//! Both the context-menu click and the toolbar-icon fallback go through
//! [`capture`], so every record is shaped the same way.

use crate::bookmark::{Bookmark, TabContext};
use crate::clock::{Clock, epoch_millis, iso_timestamp};
use crate::collection::{Collection, load_collection, save_collection};
use crate::error::TabManError;
use crate::host::{KeyValueStore, MenuItem, MenuSource};

pub const MENU_ITEM_ID: &str = "addToTabMan";
pub const MENU_TITLE: &str = "Add to TabMan";
pub const MENU_CONTEXTS: [&str; 8] = [
    "page", "frame", "selection", "link", "editable", "image", "video", "audio",
];

/// Schemes where context menus never show, so the toolbar icon captures instead.
pub const SPECIAL_PREFIXES: [&str; 8] = [
    "chrome://",
    "chrome-extension://",
    "edge://",
    "about:",
    "data:",
    "view-source:",
    "chrome-search://",
    "devtools://",
];

pub const BADGE_SUCCESS_TEXT: &str = "✓";
pub const BADGE_SUCCESS_COLOR: &str = "#4CAF50";
pub const BADGE_ERROR_TEXT: &str = "✗";
pub const BADGE_ERROR_COLOR: &str = "#f44336";

pub fn menu_item() -> MenuItem {
    MenuItem {
        id: MENU_ITEM_ID.to_string(),
        title: MENU_TITLE.to_string(),
        contexts: MENU_CONTEXTS.iter().map(|c| c.to_string()).collect(),
    }
}

/// True when the page cannot show the context menu.
pub fn is_special_tab(url: &str) -> bool {
    !url.is_empty() && SPECIAL_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// A new bookmark for `tab`, with an id that is unique within `existing`.
pub fn build_bookmark<C: Clock>(
    tab: &TabContext,
    existing: &Collection,
    clock: &C,
) -> Result<Bookmark, TabManError> {
    let now = clock.now();
    let id = existing.next_id(epoch_millis(now));
    Ok(Bookmark::from_tab(tab, id, iso_timestamp(now)?))
}

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Captured {
    pub bookmark: Bookmark,
    /// The collection as written back to the store.
    pub collection: Collection,
}

/// Append a bookmark for `tab` to the stored collection.
///
/// Read-modify-write of the whole collection with no version check: a
/// writer that lands between the read and the write is overwritten.
pub async fn capture<S, C>(store: &S, clock: &C, tab: &TabContext) -> Result<Captured, TabManError>
where
    S: KeyValueStore,
    C: Clock,
{
    let mut collection = load_collection(store).await?;
    let bookmark = build_bookmark(tab, &collection, clock)?;

    collection.push(bookmark.clone());
    save_collection(store, &collection).await?;

    log::info!("Tab added to TabMan: {}", bookmark.title);
    Ok(Captured { bookmark, collection })
}

/// Background trigger delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundEvent {
    Installed,
    MenuClicked {
        menu_item_id: String,
        tab: Option<TabContext>,
    },
    ActionClicked {
        tab: TabContext,
    },
}

/// What the background did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundOutcome {
    MenuRegistered,
    Captured(Bookmark),
    /// Not ours to handle (foreign menu id, missing tab).
    Ignored,
    /// Icon click on a normal page: the popup handles it.
    Deferred,
}

/// Background event handler.
pub struct Background<S, M, C> {
    store: S,
    menus: M,
    clock: C,
}

impl<S, M, C> Background<S, M, C>
where
    S: KeyValueStore,
    M: MenuSource,
    C: Clock,
{
    pub fn new(store: S, menus: M, clock: C) -> Self {
        Background { store, menus, clock }
    }

    pub async fn handle(&self, event: BackgroundEvent) -> Result<BackgroundOutcome, TabManError> {
        let outcome = match event {
            BackgroundEvent::Installed => {
                if let Err(e) = self.menus.create(&menu_item()) {
                    log::error!("Error creating context menu: {}", e);
                    return Err(e);
                }
                BackgroundOutcome::MenuRegistered
            }
            BackgroundEvent::MenuClicked { menu_item_id, tab } => match tab {
                Some(tab) if menu_item_id == MENU_ITEM_ID => self.capture_tab(&tab).await?,
                Some(_) => {
                    log::warn!("Ignoring click on unknown menu item: {}", menu_item_id);
                    BackgroundOutcome::Ignored
                }
                None => {
                    log::warn!("Menu click without a tab");
                    BackgroundOutcome::Ignored
                }
            },
            BackgroundEvent::ActionClicked { tab } => {
                if is_special_tab(&tab.url) {
                    self.capture_tab(&tab).await?
                } else {
                    BackgroundOutcome::Deferred
                }
            }
        };
        Ok(outcome)
    }

    async fn capture_tab(&self, tab: &TabContext) -> Result<BackgroundOutcome, TabManError> {
        match capture(&self.store, &self.clock, tab).await {
            Ok(captured) => Ok(BackgroundOutcome::Captured(captured.bookmark)),
            Err(e) => {
                log::error!("Error saving tab: {}", e);
                Err(e)
            }
        }
    }
}
