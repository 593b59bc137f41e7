/// Building blocks of the dashboard page

use yew::prelude::*;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use patternfly_yew::prelude::*;
use crate::bookmark::{Bookmark, truncate_url};
use crate::config::{DashboardConfig, ViewMode};
use crate::dashboard::{EditDraft, Toast, ToastKind};
use crate::view::{CategoryOption, SortKey};

#[derive(Properties, PartialEq)]
pub struct BookmarkCardProps {
    pub bookmark: Bookmark,
    pub mode: ViewMode,
    pub on_open: Callback<String>,
    pub on_edit: Callback<i64>,
    pub on_delete: Callback<i64>,
}

#[function_component(BookmarkCard)]
pub fn bookmark_card(props: &BookmarkCardProps) -> Html {
    let bookmark = &props.bookmark;
    let id = bookmark.id;

    let favicon = if bookmark.fav_icon_url.is_empty() {
        html! { <div class="favicon-placeholder">{"🔖"}</div> }
    } else {
        html! { <img class="favicon" src={bookmark.fav_icon_url.clone()} alt="" /> }
    };

    let title = if bookmark.title.is_empty() {
        bookmark.url.clone()
    } else {
        bookmark.title.clone()
    };

    let actions = html! {
        <div class="tab-actions">
            <Button
                onclick={props.on_open.reform({
                    let url = bookmark.url.clone();
                    move |_| url.clone()
                })}
                size={ButtonSize::Small}
            >
                {"Open"}
            </Button>
            <Button
                onclick={props.on_edit.reform(move |_| id)}
                variant={ButtonVariant::Secondary}
                size={ButtonSize::Small}
            >
                {"Edit"}
            </Button>
            <Button
                onclick={props.on_delete.reform(move |_| id)}
                variant={ButtonVariant::Danger}
                size={ButtonSize::Small}
            >
                {"Delete"}
            </Button>
        </div>
    };

    match props.mode {
        ViewMode::Grid => html! {
            <div class="tab-card">
                <div class="tab-card-header">
                    {favicon}
                    <div class="tab-title" title={bookmark.title.clone()}>{title}</div>
                </div>
                <div class="tab-host">{bookmark.display_host().unwrap_or_default()}</div>
                <span class="category-badge">{&bookmark.category}</span>
                if !bookmark.description.is_empty() {
                    <p class="tab-description">{&bookmark.description}</p>
                }
                <div class="tab-date">{bookmark.added_on()}</div>
                {actions}
            </div>
        },
        ViewMode::List => html! {
            <div class="tab-row">
                {favicon}
                <div class="tab-content">
                    <div class="tab-title">{title}</div>
                    <a class="tab-url" href={bookmark.url.clone()} title={bookmark.url.clone()}>
                        {truncate_url(&bookmark.url)}
                    </a>
                </div>
                <span class="category-badge">{&bookmark.category}</span>
                <div class="tab-description">{&bookmark.description}</div>
                <div class="tab-date">{bookmark.added_on()}</div>
                {actions}
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
    pub config: DashboardConfig,
    pub search: String,
    pub category: String,
    pub categories: Vec<CategoryOption>,
    pub sort: SortKey,
    pub view_mode: ViewMode,
    pub on_search: Callback<String>,
    pub on_category: Callback<String>,
    pub on_sort: Callback<SortKey>,
    pub on_view_mode: Callback<ViewMode>,
}

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let on_search_input = props.on_search.reform(|e: InputEvent| {
        e.target_dyn_into::<HtmlInputElement>()
            .map(|input| input.value())
            .unwrap_or_default()
    });

    let on_category_change = props.on_category.reform(|e: Event| {
        e.target_dyn_into::<HtmlSelectElement>()
            .map(|select| select.value())
            .unwrap_or_default()
    });

    let on_sort_change = {
        let on_sort = props.on_sort.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                match select.value().parse::<SortKey>() {
                    Ok(key) => on_sort.emit(key),
                    Err(e) => log::warn!("{}", e),
                }
            }
        })
    };

    html! {
        <div class="toolbar">
            <input
                type="text"
                class="search-input"
                placeholder="Search tabs..."
                value={props.search.clone()}
                oninput={on_search_input}
            />
            <select class="category-filter" onchange={on_category_change}>
                {for props.categories.iter().map(|option| html! {
                    <option
                        key={option.value.clone()}
                        value={option.value.clone()}
                        selected={option.value == props.category}
                    >
                        {&option.label}
                    </option>
                })}
            </select>
            if props.config.sorting {
                <select class="sort-select" onchange={on_sort_change}>
                    {for SortKey::ALL.iter().map(|key| html! {
                        <option key={key.as_str()} value={key.as_str()} selected={*key == props.sort}>
                            {key.label()}
                        </option>
                    })}
                </select>
            }
            if props.config.view_modes {
                <div class="view-toggle">
                    <Button
                        onclick={props.on_view_mode.reform(|_| ViewMode::Grid)}
                        variant={if props.view_mode == ViewMode::Grid { ButtonVariant::Primary } else { ButtonVariant::Secondary }}
                        size={ButtonSize::Small}
                    >
                        {"Grid"}
                    </Button>
                    <Button
                        onclick={props.on_view_mode.reform(|_| ViewMode::List)}
                        variant={if props.view_mode == ViewMode::List { ButtonVariant::Primary } else { ButtonVariant::Secondary }}
                        size={ButtonSize::Small}
                    >
                        {"List"}
                    </Button>
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EditModalProps {
    pub draft: EditDraft,
    pub on_save: Callback<(String, String)>,
    pub on_cancel: Callback<()>,
}

/// Category and description form for one record.
#[function_component(EditModal)]
pub fn edit_modal(props: &EditModalProps) -> Html {
    let category = use_state(|| props.draft.category.clone());
    let description = use_state(|| props.draft.description.clone());

    let on_category_input = {
        let category = category.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                category.set(input.value());
            }
        })
    };

    let on_description_input = {
        let description = description.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                description.set(area.value());
            }
        })
    };

    let on_save_click = {
        let category = category.clone();
        let description = description.clone();
        let on_save = props.on_save.clone();
        Callback::from(move |_: MouseEvent| {
            on_save.emit(((*category).clone(), (*description).clone()));
        })
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <h2 class="modal-title">{"Edit Tab"}</h2>
                <label for="edit-category">{"Category"}</label>
                <input
                    id="edit-category"
                    type="text"
                    value={(*category).clone()}
                    oninput={on_category_input}
                />
                <label for="edit-description">{"Description"}</label>
                <textarea
                    id="edit-description"
                    rows="4"
                    value={(*description).clone()}
                    oninput={on_description_input}
                />
                <div class="modal-actions">
                    <Button onclick={on_save_click} variant={ButtonVariant::Primary}>
                        {"Save"}
                    </Button>
                    <Button onclick={props.on_cancel.reform(|_| ())} variant={ButtonVariant::Secondary}>
                        {"Cancel"}
                    </Button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastBannerProps {
    pub toast: Toast,
}

#[function_component(ToastBanner)]
pub fn toast_banner(props: &ToastBannerProps) -> Html {
    let alert_type = match props.toast.kind {
        ToastKind::Success => AlertType::Success,
        ToastKind::Error => AlertType::Danger,
    };

    html! {
        <div class="toast">
            <Alert r#type={alert_type} title={props.toast.message.clone()} inline={true}>
            </Alert>
        </div>
    }
}
