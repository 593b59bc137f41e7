/// Data structures for TabMan
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// URLs longer than this are shortened for display.
pub const URL_DISPLAY_LIMIT: usize = 50;

/// A saved tab. Field names on the wire match the extension's stored layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: i64,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub fav_icon_url: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date_added: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// The part of a host tab that capture cares about.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabContext {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
}

impl TabContext {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> TabContext {
        TabContext {
            id: None,
            url: url.into(),
            title: title.into(),
            fav_icon_url: None,
        }
    }

    pub fn with_fav_icon(mut self, fav_icon_url: impl Into<String>) -> TabContext {
        self.fav_icon_url = Some(fav_icon_url.into());
        self
    }
}

impl Bookmark {
    /// Fresh record for a tab: default category, empty description, no favicon unless given.
    pub fn from_tab(tab: &TabContext, id: i64, date_added: String) -> Bookmark {
        Bookmark {
            id,
            url: tab.url.clone(),
            title: tab.title.clone(),
            fav_icon_url: tab.fav_icon_url.clone().unwrap_or_default(),
            category: default_category(),
            description: String::new(),
            date_added,
        }
    }

    /// Parsed `dateAdded`, if it is a valid RFC 3339 timestamp.
    pub fn added_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.date_added, &Rfc3339).ok()
    }

    /// `YYYY-MM-DD` for display, falling back to the raw stored string.
    pub fn added_on(&self) -> String {
        let format = format_description!("[year]-[month]-[day]");
        self.added_at()
            .and_then(|at| at.format(&format).ok())
            .unwrap_or_else(|| self.date_added.clone())
    }

    /// Hostname shown under the title on cards.
    pub fn display_host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(|host| host.to_string()))
    }
}

/// Shorten a URL to `URL_DISPLAY_LIMIT` characters plus an ellipsis.
pub fn truncate_url(url: &str) -> String {
    match url.char_indices().nth(URL_DISPLAY_LIMIT) {
        Some((cut, _)) => format!("{}...", &url[..cut]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tab_defaults() {
        let tab = TabContext::new("https://example.com", "Test Page");
        let bookmark = Bookmark::from_tab(&tab, 42, "2024-01-01T00:00:00.000Z".to_string());

        assert_eq!(bookmark.id, 42);
        assert_eq!(bookmark.url, "https://example.com");
        assert_eq!(bookmark.title, "Test Page");
        assert_eq!(bookmark.fav_icon_url, "");
        assert_eq!(bookmark.category, "Uncategorized");
        assert_eq!(bookmark.description, "");
        assert_eq!(bookmark.date_added, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_from_tab_keeps_favicon() {
        let tab = TabContext::new("https://example.com/test", "Test Page")
            .with_fav_icon("https://example.com/favicon.ico");
        let bookmark = Bookmark::from_tab(&tab, 1, String::new());

        assert_eq!(bookmark.fav_icon_url, "https://example.com/favicon.ico");
    }

    #[test]
    fn test_wire_field_names() {
        let tab = TabContext::new("https://a.com", "A");
        let bookmark = Bookmark::from_tab(&tab, 7, "2024-01-01T00:00:00.000Z".to_string());

        let json = serde_json::to_value(&bookmark).unwrap();

        assert_eq!(json["favIconUrl"], "");
        assert_eq!(json["dateAdded"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_deserialize_sparse_record() {
        // Records seeded by hand often omit the optional fields
        let json = r#"{"id": 1, "url": "https://existing.com", "title": "Existing Tab"}"#;
        let bookmark: Bookmark = serde_json::from_str(json).unwrap();

        assert_eq!(bookmark.category, "Uncategorized");
        assert_eq!(bookmark.description, "");
        assert_eq!(bookmark.fav_icon_url, "");
        assert_eq!(bookmark.date_added, "");
    }

    #[test]
    fn test_tab_context_from_host_payload() {
        let json = r#"{"id": 9, "url": "chrome://settings", "title": "Settings", "active": true, "pinned": false}"#;
        let tab: TabContext = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, Some(9));
        assert_eq!(tab.url, "chrome://settings");
        assert_eq!(tab.fav_icon_url, None);
    }

    #[test]
    fn test_special_characters_survive() {
        let title = "Test <script>alert(\"xss\")</script> & \"quotes\" 'single'";
        let tab = TabContext::new("https://example.com", title);
        let bookmark = Bookmark::from_tab(&tab, 1, String::new());

        let json = serde_json::to_string(&bookmark).unwrap();
        let back: Bookmark = serde_json::from_str(&json).unwrap();

        assert_eq!(back.title, title);
    }

    #[test]
    fn test_added_on() {
        let mut bookmark = Bookmark::from_tab(
            &TabContext::new("https://a.com", "A"),
            1,
            "2024-03-05T17:45:00.000Z".to_string(),
        );
        assert_eq!(bookmark.added_on(), "2024-03-05");

        bookmark.date_added = "yesterday".to_string();
        assert_eq!(bookmark.added_on(), "yesterday");
        assert!(bookmark.added_at().is_none());
    }

    #[test]
    fn test_display_host() {
        let bookmark = Bookmark::from_tab(
            &TabContext::new("https://github.com/user/repo", "Repo"),
            1,
            String::new(),
        );
        assert_eq!(bookmark.display_host(), Some("github.com".to_string()));

        let bookmark = Bookmark::from_tab(&TabContext::new("not a url", "x"), 2, String::new());
        assert_eq!(bookmark.display_host(), None);
    }

    #[test]
    fn test_truncate_url() {
        let short_url = "https://example.com";
        assert_eq!(truncate_url(short_url), short_url);

        let long_url = format!("https://example.com/{}", "a".repeat(100));
        let truncated = truncate_url(&long_url);
        assert_eq!(truncated.len(), 53);
        assert!(truncated.ends_with("..."));

        let exact = "a".repeat(50);
        assert_eq!(truncate_url(&exact), exact);
    }
}
