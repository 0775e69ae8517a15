use rocket::serde::Serialize;

use crate::indexer::{DocumentRef, ALL_GROUP};

/// The two filter inputs of the index page, mirrored by `assets/js/filter.js`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub selected_group: String,
    pub search_text: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_group: ALL_GROUP.to_string(),
            search_text: String::new(),
        }
    }
}

impl FilterState {
    pub fn new(group: Option<&str>, query: Option<&str>) -> Self {
        let default = Self::default();
        Self {
            selected_group: group.map_or(default.selected_group, str::to_string),
            search_text: query.map_or(default.search_text, str::to_string),
        }
    }
}

pub fn matches_group(document: &DocumentRef<'_>, selected_group: &str) -> bool {
    selected_group == ALL_GROUP || document.group() == selected_group
}

pub fn matches_search(document: &DocumentRef<'_>, search_text: &str) -> bool {
    if search_text.is_empty() {
        return true;
    }

    let needle = search_text.to_lowercase();
    document.file_name().to_lowercase().contains(&needle)
        || document.path().to_lowercase().contains(&needle)
}

pub fn is_visible(document: &DocumentRef<'_>, state: &FilterState) -> bool {
    matches_group(document, &state.selected_group) && matches_search(document, &state.search_text)
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchMatch {
    pub path: String,
    pub name: String,
    pub group: String,
}

impl From<DocumentRef<'_>> for SearchMatch {
    fn from(document: DocumentRef<'_>) -> Self {
        Self {
            path: document.path().to_string(),
            name: document.file_name().to_string(),
            group: document.group().to_string(),
        }
    }
}

/// Visible documents for `state`, in index order.
pub fn filter_documents(paths: &[String], state: &FilterState) -> Vec<SearchMatch> {
    paths
        .iter()
        .map(|path| DocumentRef::new(path))
        .filter(|document| is_visible(document, state))
        .map(SearchMatch::from)
        .collect()
}
