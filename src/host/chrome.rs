//! Extension API bindings (`chrome.*`).
use std::collections::BTreeMap;

use futures::channel::mpsc::{self, UnboundedReceiver};
use serde::Serialize;
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{KeyValueStore, MenuItem, MenuSource, StorageChanges, TabSource, ValueChange};
use crate::bookmark::TabContext;
use crate::error::TabManError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    async fn storage_local_get(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    async fn storage_local_set(items: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "onChanged"], js_name = addListener)]
    fn add_storage_listener(callback: &Closure<dyn FnMut(JsValue, String)>);

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    async fn tabs_query(query_info: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = create)]
    async fn tabs_create(properties: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "contextMenus"], js_name = create)]
    fn context_menus_create(properties: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "action"], js_name = setBadgeText)]
    async fn action_set_badge_text(details: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "action"], js_name = setBadgeBackgroundColor)]
    async fn action_set_badge_background_color(details: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onInstalled"], js_name = addListener)]
    pub fn add_installed_listener(callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "contextMenus", "onClicked"], js_name = addListener)]
    pub fn add_menu_clicked_listener(callback: &Closure<dyn FnMut(JsValue, JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "action", "onClicked"], js_name = addListener)]
    pub fn add_action_clicked_listener(callback: &Closure<dyn FnMut(JsValue)>);

    // Global in both pages and service workers
    #[wasm_bindgen(js_name = setTimeout)]
    fn set_timeout(handler: &js_sys::Function, timeout: i32) -> JsValue;
}

/// Plain JS object (not `Map`) for a JSON-shaped value.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, TabManError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| TabManError::Host(format!("Failed to serialize: {:?}", e)))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, TabManError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| TabManError::Host(format!("Failed to parse: {:?}", e)))
}

/// `chrome.storage.local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStore;

impl KeyValueStore for ChromeStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, TabManError> {
        let result = storage_local_get(JsValue::from_str(key))
            .await
            .map_err(|e| TabManError::StorageRead(format!("{:?}", e)))?;

        let value = js_sys::Reflect::get(&result, &JsValue::from_str(key))
            .map_err(|e| TabManError::StorageRead(format!("{:?}", e)))?;

        if value.is_null() || value.is_undefined() {
            Ok(None)
        } else {
            from_js(value).map(Some)
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), TabManError> {
        let mut items = serde_json::Map::new();
        items.insert(key.to_string(), value);
        let items = to_js(&Value::Object(items))?;
        storage_local_set(items)
            .await
            .map_err(|e| TabManError::StorageWrite(format!("{:?}", e)))?;
        Ok(())
    }

    fn subscribe(&self) -> UnboundedReceiver<StorageChanges> {
        let (tx, rx) = mpsc::unbounded();

        let listener = Closure::<dyn FnMut(JsValue, String)>::new(move |changes: JsValue, area: String| {
            match from_js::<BTreeMap<String, ValueChange>>(changes) {
                Ok(changes) => {
                    let _ = tx.unbounded_send(StorageChanges { area, changes });
                }
                Err(e) => log::error!("Dropping storage change notification: {}", e),
            }
        });
        add_storage_listener(&listener);
        // Lives as long as the page or worker
        listener.forget();

        rx
    }
}

/// `chrome.tabs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

impl TabSource for ChromeTabs {
    async fn active_tab(&self) -> Result<Option<TabContext>, TabManError> {
        let query = to_js(&json!({ "active": true, "currentWindow": true }))?;
        let tabs_js = tabs_query(query)
            .await
            .map_err(|e| TabManError::Host(format!("Failed to query tabs: {:?}", e)))?;

        let tabs: Vec<TabContext> = from_js(tabs_js)?;
        Ok(tabs.into_iter().next())
    }

    async fn open_url(&self, url: &str) -> Result<(), TabManError> {
        let properties = to_js(&json!({ "url": url }))?;
        tabs_create(properties)
            .await
            .map_err(|e| TabManError::Host(format!("Failed to open tab: {:?}", e)))?;
        Ok(())
    }
}

/// `chrome.contextMenus`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeMenus;

impl MenuSource for ChromeMenus {
    fn create(&self, item: &MenuItem) -> Result<(), TabManError> {
        context_menus_create(to_js(item)?)
            .map_err(|e| TabManError::Host(format!("Failed to create menu: {:?}", e)))?;
        Ok(())
    }
}

fn badge_details(field: &str, value: &str, tab_id: Option<i32>) -> Result<JsValue, TabManError> {
    let mut details = serde_json::Map::new();
    details.insert(field.to_string(), Value::from(value));
    if let Some(tab_id) = tab_id {
        details.insert("tabId".to_string(), Value::from(tab_id));
    }
    to_js(&Value::Object(details))
}

/// Show `text` on the toolbar icon for one tab, then clear it after `clear_after_ms`.
pub async fn flash_badge(tab_id: Option<i32>, text: &str, color: &str, clear_after_ms: i32) {
    let shown = async {
        action_set_badge_text(badge_details("text", text, tab_id)?)
            .await
            .map_err(|e| TabManError::Host(format!("{:?}", e)))?;
        action_set_badge_background_color(badge_details("color", color, tab_id)?)
            .await
            .map_err(|e| TabManError::Host(format!("{:?}", e)))?;
        Ok::<(), TabManError>(())
    };
    if let Err(e) = shown.await {
        log::error!("Failed to set badge: {}", e);
        return;
    }

    sleep_ms(clear_after_ms).await;

    let cleared = async {
        action_set_badge_text(badge_details("text", "", tab_id)?)
            .await
            .map_err(|e| TabManError::Host(format!("{:?}", e)))?;
        Ok::<(), TabManError>(())
    };
    if let Err(e) = cleared.await {
        log::error!("Failed to clear badge: {}", e);
    }
}

/// Resolve after `ms` milliseconds.
pub async fn sleep_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        set_timeout(&resolve, ms);
    });
    let _ = JsFuture::from(promise).await;
}

/// Decode an event payload coming from a listener.
pub fn decode<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, TabManError> {
    from_js(value)
}
