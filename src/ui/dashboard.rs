/// Dashboard page

use std::rc::Rc;

use futures::StreamExt;
use futures::lock::Mutex;
use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::clock::SystemClock;
use crate::config::{DashboardConfig, FEEDBACK_CLEAR_MS, ViewMode};
use crate::dashboard::{Dashboard, Snapshot};
use crate::host::chrome::{ChromeStore, ChromeTabs, sleep_ms};
use crate::ui::components::{BookmarkCard, EditModal, ToastBanner, Toolbar};
use crate::view::{CategoryFilter, SortKey};

type PageDashboard = Dashboard<ChromeStore, ChromeTabs, SystemClock>;
type SharedDashboard = Rc<Mutex<PageDashboard>>;

#[derive(Clone, Copy, PartialEq)]
enum SaveFeedback {
    Idle,
    Saved,
    Failed,
}

/// Push the latest state to the page and schedule the toast, if any, to go away.
fn publish(dashboard: &PageDashboard, shared: &SharedDashboard, snapshot: &UseStateHandle<Option<Snapshot>>) {
    snapshot.set(Some(dashboard.snapshot()));

    if let Some(toast) = dashboard.toast() {
        let id = toast.id;
        let after_ms = i32::try_from(dashboard.config().toast_duration_ms).unwrap_or(i32::MAX);
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        spawn_local(async move {
            sleep_ms(after_ms).await;
            let mut dashboard = shared.lock().await;
            dashboard.clear_toast(id);
            snapshot.set(Some(dashboard.snapshot()));
        });
    }
}

fn confirm_delete() -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message("Are you sure you want to delete this tab?").ok())
        .unwrap_or(false)
}

#[function_component(DashboardApp)]
pub fn dashboard_app() -> Html {
    let shared: SharedDashboard = use_memo((), |_| {
        Mutex::new(Dashboard::new(ChromeStore, ChromeTabs, SystemClock, DashboardConfig::default()))
    });
    let snapshot = use_state(|| None::<Snapshot>);
    let load_error = use_state(|| None::<String>);
    let save_feedback = use_state(|| SaveFeedback::Idle);

    // Load on mount, then follow the store
    {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        let load_error = load_error.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let mut feed = {
                    let mut dashboard = shared.lock().await;
                    let (feed, loaded) = dashboard.start().await;
                    if let Err(e) = loaded {
                        load_error.set(Some(format!("Failed to load saved tabs: {}", e)));
                    }
                    snapshot.set(Some(dashboard.snapshot()));
                    feed
                };

                while let Some(changes) = feed.next().await {
                    let mut dashboard = shared.lock().await;
                    if let Ok(true) = dashboard.apply_changes(&changes) {
                        snapshot.set(Some(dashboard.snapshot()));
                    }
                }
            });
            || ()
        });
    }

    let on_search = {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |term: String| {
            let shared = shared.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                let mut dashboard = shared.lock().await;
                dashboard.set_search(term);
                snapshot.set(Some(dashboard.snapshot()));
            });
        })
    };

    let on_category = {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |value: String| {
            let shared = shared.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                let mut dashboard = shared.lock().await;
                dashboard.set_category_filter(CategoryFilter::from_value(&value));
                snapshot.set(Some(dashboard.snapshot()));
            });
        })
    };

    let on_sort = {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |key: SortKey| {
            let shared = shared.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                let mut dashboard = shared.lock().await;
                dashboard.set_sort(key);
                snapshot.set(Some(dashboard.snapshot()));
            });
        })
    };

    let on_view_mode = {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |mode: ViewMode| {
            let shared = shared.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                let mut dashboard = shared.lock().await;
                dashboard.set_view_mode(mode);
                snapshot.set(Some(dashboard.snapshot()));
            });
        })
    };

    let on_open = {
        let shared = shared.clone();
        Callback::from(move |url: String| {
            let shared = shared.clone();
            spawn_local(async move {
                // Failure is already logged
                let _ = shared.lock().await.open(&url).await;
            });
        })
    };

    let on_edit = {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |id: i64| {
            let shared = shared.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                let mut dashboard = shared.lock().await;
                dashboard.begin_edit(id);
                snapshot.set(Some(dashboard.snapshot()));
            });
        })
    };

    let on_save_edit = {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |(category, description): (String, String)| {
            let shared = shared.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                let mut dashboard = shared.lock().await;
                let _ = dashboard.commit_edit(category, description).await;
                publish(&dashboard, &shared, &snapshot);
            });
        })
    };

    let on_cancel_edit = {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |_| {
            let shared = shared.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                let mut dashboard = shared.lock().await;
                dashboard.cancel_edit();
                snapshot.set(Some(dashboard.snapshot()));
            });
        })
    };

    let on_delete = {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |id: i64| {
            if !confirm_delete() {
                return;
            }
            let shared = shared.clone();
            let snapshot = snapshot.clone();
            spawn_local(async move {
                let mut dashboard = shared.lock().await;
                let _ = dashboard.delete(id).await;
                publish(&dashboard, &shared, &snapshot);
            });
        })
    };

    let on_save_current = {
        let shared = shared.clone();
        let snapshot = snapshot.clone();
        let save_feedback = save_feedback.clone();
        Callback::from(move |_| {
            let shared = shared.clone();
            let snapshot = snapshot.clone();
            let save_feedback = save_feedback.clone();
            spawn_local(async move {
                let saved = {
                    let mut dashboard = shared.lock().await;
                    let saved = dashboard.save_current_tab().await.is_ok();
                    publish(&dashboard, &shared, &snapshot);
                    saved
                };

                save_feedback.set(if saved { SaveFeedback::Saved } else { SaveFeedback::Failed });
                sleep_ms(FEEDBACK_CLEAR_MS).await;
                save_feedback.set(SaveFeedback::Idle);
            });
        })
    };

    let Some(current) = (*snapshot).clone() else {
        return html! {
            <div class="loading-text-center">
                <Spinner />
                <p class="loading-text">{"Loading saved tabs..."}</p>
            </div>
        };
    };

    let save_label = match *save_feedback {
        SaveFeedback::Idle => "+ Save Current Tab",
        SaveFeedback::Saved => "✅ Saved!",
        SaveFeedback::Failed => "❌ Error",
    };

    let container_class = match current.view_mode {
        ViewMode::Grid => "tabs-grid",
        ViewMode::List => "tabs-list",
    };

    html! {
        <div class="container">
            <div class="header">
                <h1 class="main-title">{"TabMan"}</h1>
                <Button
                    onclick={on_save_current}
                    disabled={*save_feedback != SaveFeedback::Idle}
                    variant={ButtonVariant::Primary}
                >
                    {save_label}
                </Button>
            </div>

            if let Some(err) = &*load_error {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {err.clone()}
                </Alert>
            }

            <Toolbar
                config={current.config.clone()}
                search={current.search.clone()}
                category={current.category.clone()}
                categories={current.categories.clone()}
                sort={current.sort}
                view_mode={current.view_mode}
                on_search={on_search}
                on_category={on_category}
                on_sort={on_sort}
                on_view_mode={on_view_mode}
            />

            <p class="tab-count">
                {format!("Showing {} of {} tabs", current.view.visible, current.view.total)}
            </p>

            if current.view.items.is_empty() {
                <div class="empty-state">
                    if current.view.total == 0 {
                        <p>{"No saved tabs yet."}</p>
                        <p class="empty-state-hint">{"Right-click a page and choose \"Add to TabMan\", or click the toolbar icon."}</p>
                    } else {
                        <p>{"No tabs match your search."}</p>
                    }
                </div>
            } else {
                <div class={classes!("tabs-container", container_class)}>
                    {for current.view.items.iter().map(|bookmark| html! {
                        <BookmarkCard
                            key={bookmark.id.to_string()}
                            bookmark={bookmark.clone()}
                            mode={current.view_mode}
                            on_open={on_open.clone()}
                            on_edit={on_edit.clone()}
                            on_delete={on_delete.clone()}
                        />
                    })}
                </div>
            }

            if let Some(draft) = &current.editing {
                <EditModal
                    key={draft.id.to_string()}
                    draft={draft.clone()}
                    on_save={on_save_edit}
                    on_cancel={on_cancel_edit}
                />
            }

            if let Some(toast) = &current.toast {
                <ToastBanner toast={toast.clone()} />
            }
        </div>
    }
}
