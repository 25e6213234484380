//! Data models for linkman
//!
//! Defines the `Link` record persisted by the store.

use serde::{Deserialize, Serialize};
use url::Url;

/// List a link belongs to when none is given
pub const DEFAULT_LIST: &str = "default";

/// A saved link with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Store-assigned identifier, `None` until the first save
    id: Option<i64>,
    /// The URL
    pub url: Url,
    /// Registrable domain label of the URL's host
    pub source: String,
    /// Page title, possibly empty
    pub title: String,
    /// Name of the list the link belongs to
    pub list: String,
    /// Whether the link has been archived
    archived: bool,
}

impl Link {
    /// Create a new, unsaved link
    ///
    /// An empty `list` is replaced with [`DEFAULT_LIST`].
    pub fn new(
        url: Url,
        source: impl Into<String>,
        title: impl Into<String>,
        list: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            url,
            source: source.into(),
            title: title.into(),
            list: normalize_list(list.into()),
            archived: false,
        }
    }

    /// Rebuild a link from a stored record
    pub(crate) fn from_storage(
        id: i64,
        url: Url,
        source: String,
        title: String,
        list: String,
        archived: bool,
    ) -> Self {
        Self {
            id: Some(id),
            url,
            source,
            title,
            list,
            archived,
        }
    }

    /// The identifier, once the link has been saved
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn is_archived(&self) -> bool {
        self.archived
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        debug_assert!(self.id.is_none(), "link id is immutable once assigned");
        self.id = Some(id);
    }
}

/// Coerce an empty list name to [`DEFAULT_LIST`]
pub(crate) fn normalize_list(list: String) -> String {
    if list.is_empty() {
        DEFAULT_LIST.to_string()
    } else {
        list
    }
}
