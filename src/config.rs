/// Dashboard feature toggles
use serde::{Deserialize, Serialize};

use crate::error::TabManError;
use crate::host::KeyValueStore;
use crate::view::{CategoryOrder, SortKey};

/// Storage key for an optional settings override.
pub const SETTINGS_KEY: &str = "tabmanSettings";

/// How long toolbar badge and button feedback stays visible.
pub const FEEDBACK_CLEAR_MS: i32 = 2000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Allow switching between grid and list layouts.
    pub view_modes: bool,
    /// Apply a sort key; when off, records show in stored order.
    pub sorting: bool,
    /// Transient success/error notifications.
    pub toasts: bool,
    pub category_order: CategoryOrder,
    pub default_view: ViewMode,
    pub default_sort: SortKey,
    pub toast_duration_ms: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            view_modes: true,
            sorting: true,
            toasts: true,
            category_order: CategoryOrder::Alphabetical,
            default_view: ViewMode::Grid,
            default_sort: SortKey::Newest,
            toast_duration_ms: 3000,
        }
    }
}

impl DashboardConfig {
    /// The first-generation dashboard: one table, stored order, no toasts.
    pub fn classic() -> Self {
        DashboardConfig {
            view_modes: false,
            sorting: false,
            toasts: false,
            category_order: CategoryOrder::FirstSeen,
            default_view: ViewMode::List,
            ..Self::default()
        }
    }
}

/// Settings override stored under `SETTINGS_KEY`, if any. Unreadable values are ignored.
pub async fn load_config<S: KeyValueStore>(store: &S) -> Result<Option<DashboardConfig>, TabManError> {
    let Some(value) = store.get(SETTINGS_KEY).await? else {
        return Ok(None);
    };

    match serde_json::from_value(value) {
        Ok(config) => Ok(Some(config)),
        Err(e) => {
            log::warn!("Ignoring unreadable settings: {}", e);
            Ok(None)
        }
    }
}
