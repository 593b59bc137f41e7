/// TabMan - bookmark open tabs into a searchable, categorized list
/// Built with Rust + WASM + Yew

pub mod bookmark;
pub mod capture;
pub mod clock;
pub mod collection;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod host;
pub mod ui;
pub mod view;

use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::bookmark::TabContext;
use crate::capture::{
    BADGE_ERROR_COLOR, BADGE_ERROR_TEXT, BADGE_SUCCESS_COLOR, BADGE_SUCCESS_TEXT, Background,
    BackgroundEvent, BackgroundOutcome,
};
use crate::clock::SystemClock;
use crate::config::FEEDBACK_CLEAR_MS;
use crate::host::chrome::{self, ChromeMenus, ChromeStore};

type ChromeBackground = Background<ChromeStore, ChromeMenus, SystemClock>;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the dashboard page
#[wasm_bindgen]
pub fn start_dashboard() {
    yew::Renderer::<ui::DashboardApp>::new().render();
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuClickInfo {
    #[serde(default)]
    menu_item_id: Value,
}

impl MenuClickInfo {
    // Menu ids may be numbers
    fn menu_item_id(&self) -> String {
        match &self.menu_item_id {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        }
    }
}

fn dispatch(background: &Rc<ChromeBackground>, event: BackgroundEvent) {
    let background = background.clone();
    spawn_local(async move {
        let badge_tab = match &event {
            BackgroundEvent::ActionClicked { tab } => Some(tab.id),
            _ => None,
        };

        let result = background.handle(event).await;

        // Only icon clicks report through the badge
        let Some(tab_id) = badge_tab else {
            return;
        };
        match result {
            Ok(BackgroundOutcome::Captured(_)) => {
                chrome::flash_badge(tab_id, BADGE_SUCCESS_TEXT, BADGE_SUCCESS_COLOR, FEEDBACK_CLEAR_MS).await;
            }
            Ok(_) => {}
            Err(_) => {
                chrome::flash_badge(tab_id, BADGE_ERROR_TEXT, BADGE_ERROR_COLOR, FEEDBACK_CLEAR_MS).await;
            }
        }
    });
}

// Wire the extension events into the background handler
#[wasm_bindgen]
pub fn start_background() {
    let background = Rc::new(Background::new(ChromeStore, ChromeMenus, SystemClock));

    let on_installed = {
        let background = background.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |_details: JsValue| {
            dispatch(&background, BackgroundEvent::Installed);
        })
    };
    chrome::add_installed_listener(&on_installed);
    on_installed.forget();

    let on_menu_clicked = {
        let background = background.clone();
        Closure::<dyn FnMut(JsValue, JsValue)>::new(move |info: JsValue, tab: JsValue| {
            let info: MenuClickInfo = match chrome::decode(info) {
                Ok(info) => info,
                Err(e) => {
                    log::error!("Unreadable menu click: {}", e);
                    return;
                }
            };
            let tab = chrome::decode::<Option<TabContext>>(tab).unwrap_or_else(|e| {
                log::warn!("Unreadable tab in menu click: {}", e);
                None
            });
            dispatch(
                &background,
                BackgroundEvent::MenuClicked {
                    menu_item_id: info.menu_item_id(),
                    tab,
                },
            );
        })
    };
    chrome::add_menu_clicked_listener(&on_menu_clicked);
    on_menu_clicked.forget();

    let on_action_clicked = Closure::<dyn FnMut(JsValue)>::new(move |tab: JsValue| {
        match chrome::decode::<TabContext>(tab) {
            Ok(tab) => dispatch(&background, BackgroundEvent::ActionClicked { tab }),
            Err(e) => log::error!("Unreadable tab in icon click: {}", e),
        }
    });
    chrome::add_action_clicked_listener(&on_action_clicked);
    on_action_clicked.forget();

    log::info!("TabMan background ready");
}
