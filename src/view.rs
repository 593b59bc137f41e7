/// Dashboard query pipeline: search, category filter, sorting
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};

use crate::bookmark::Bookmark;
use crate::collection::Collection;

/// Filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    TitleAz,
    TitleZa,
    Category,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::TitleAz,
        SortKey::TitleZa,
        SortKey::Category,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::TitleAz => "title-az",
            SortKey::TitleZa => "title-za",
            SortKey::Category => "category",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest First",
            SortKey::Oldest => "Oldest First",
            SortKey::TitleAz => "Title (A-Z)",
            SortKey::TitleZa => "Title (Z-A)",
            SortKey::Category => "Category",
        }
    }

    /// Comparator for this key. Ties compare `Equal` so a stable sort keeps input order.
    pub fn compare(&self, a: &Bookmark, b: &Bookmark) -> Ordering {
        match self {
            SortKey::Newest => date_key(b).cmp(&date_key(a)),
            SortKey::Oldest => date_key(a).cmp(&date_key(b)),
            SortKey::TitleAz => locale_cmp(&a.title, &b.title),
            SortKey::TitleZa => locale_cmp(&b.title, &a.title),
            SortKey::Category => locale_cmp(&a.category, &b.category),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key: {}", s))
    }
}

/// Unparsable dates sort as the oldest.
fn date_key(bookmark: &Bookmark) -> Option<i128> {
    bookmark.added_at().map(|at| at.unix_timestamp_nanos())
}

thread_local! {
    // Root-locale collation, built once per thread
    static COLLATOR: Option<Collator> = Collator::try_new(&Default::default(), CollatorOptions::new())
        .map_err(|e| log::error!("Falling back to plain text ordering: {:?}", e))
        .ok();
}

/// Locale-aware text ordering, the way `localeCompare` orders titles and categories.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| b.cmp(a)),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a `<select>` value.
    pub fn from_value(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }

    pub fn matches(&self, bookmark: &Bookmark) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => &bookmark.category == category,
        }
    }
}

/// Order of the derived category options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryOrder {
    FirstSeen,
    #[default]
    Alphabetical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// Filter options: the "all" sentinel followed by every distinct category.
pub fn category_options(collection: &Collection, order: CategoryOrder) -> Vec<CategoryOption> {
    let mut categories = collection.categories();
    if order == CategoryOrder::Alphabetical {
        categories.sort_by(|a, b| locale_cmp(a, b));
    }

    std::iter::once(CategoryOption {
        value: ALL_CATEGORIES.to_string(),
        label: ALL_CATEGORIES_LABEL.to_string(),
    })
    .chain(categories.into_iter().map(|category| CategoryOption {
        value: category.clone(),
        label: category,
    }))
    .collect()
}

/// Current filter and sort state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    pub search: String,
    pub category: CategoryFilter,
    /// `None` keeps stored order.
    pub sort: Option<SortKey>,
}

/// Case-insensitive substring match on title, url or description. `term` is already lowercased.
fn matches_search(bookmark: &Bookmark, term: &str) -> bool {
    term.is_empty()
        || bookmark.title.to_lowercase().contains(term)
        || bookmark.url.to_lowercase().contains(term)
        || bookmark.description.to_lowercase().contains(term)
}

/// Visible records in display order plus the counts shown beside them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub items: Vec<Bookmark>,
    pub visible: usize,
    pub total: usize,
}

/// Filter and sort a copy of the collection.
pub fn compute_view(collection: &Collection, query: &ViewQuery) -> View {
    let term = query.search.to_lowercase();

    let mut items: Vec<Bookmark> = collection
        .iter()
        .filter(|bookmark| matches_search(bookmark, &term) && query.category.matches(bookmark))
        .cloned()
        .collect();

    if let Some(sort) = query.sort {
        // sort_by is stable
        items.sort_by(|a, b| sort.compare(a, b));
    }

    View {
        visible: items.len(),
        total: collection.len(),
        items,
    }
}
