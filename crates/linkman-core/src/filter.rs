//! Link filters
//!
//! A [`LinkFilter`] is an immutable description of which links a query
//! should return. It is built by folding [`FilterCondition`]s over an empty
//! filter:
//!
//! ```text
//! let filter = LinkFilter::new([from_list("*"), with_source("youtube"), only_archived()]);
//! let links = store.find_links(&filter)?;
//! ```
//!
//! Conditions are ANDed together. Without a list condition the filter is
//! restricted to the `default` list, and without an archived condition
//! archived links are excluded.

use std::fmt;

use thiserror::Error;

use crate::models::DEFAULT_LIST;

/// List name that matches links from every list
pub const ALL_LISTS: &str = "*";

/// How archived links are treated by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchivedMode {
    /// Archived and non-archived links
    Include,
    /// Archived links only
    Only,
    /// Non-archived links only
    Exclude,
}

impl fmt::Display for ArchivedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchivedMode::Include => "include_archived",
            ArchivedMode::Only => "only_archived",
            ArchivedMode::Exclude => "no_archived",
        };
        f.write_str(name)
    }
}

/// Errors raised while building a filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A second archived condition was applied to the same filter
    #[error("Conflicting filter state: archived filter can be applied only once ({first} already set, got {second})")]
    ConflictingFilterState {
        first: ArchivedMode,
        second: ArchivedMode,
    },
}

/// A single restriction applied to a [`LinkFilter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCondition {
    Source(String),
    Title(String),
    List(String),
    TitleNotEmpty,
    Archived(ArchivedMode),
}

/// Only links whose source equals `source`
pub fn with_source(source: impl Into<String>) -> FilterCondition {
    FilterCondition::Source(source.into())
}

/// Only links whose title contains `title`
pub fn with_title(title: impl Into<String>) -> FilterCondition {
    FilterCondition::Title(title.into())
}

/// Only links from `list`; `"*"` selects every list
pub fn from_list(list: impl Into<String>) -> FilterCondition {
    FilterCondition::List(list.into())
}

/// Only links with a non-empty title
pub fn title_not_empty() -> FilterCondition {
    FilterCondition::TitleNotEmpty
}

/// Archived and non-archived links alike
pub fn include_archived() -> FilterCondition {
    FilterCondition::Archived(ArchivedMode::Include)
}

/// Archived links only
pub fn only_archived() -> FilterCondition {
    FilterCondition::Archived(ArchivedMode::Only)
}

/// Non-archived links only (the default)
pub fn no_archived() -> FilterCondition {
    FilterCondition::Archived(ArchivedMode::Exclude)
}

/// Immutable filter specification consumed by the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    source: Option<String>,
    title: Option<String>,
    list: Option<String>,
    require_title: bool,
    archived: Option<ArchivedMode>,
}

impl LinkFilter {
    /// Build a filter from conditions, applied in order
    ///
    /// # Panics
    ///
    /// Panics if more than one archived condition is given. That is a
    /// programming error in the caller; use [`LinkFilter::try_new`] to get
    /// a [`FilterError`] instead.
    pub fn new(conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        match Self::try_new(conditions) {
            Ok(filter) => filter,
            Err(err) => panic!("{}", err),
        }
    }

    /// Build a filter from conditions, reporting conflicting archived conditions
    pub fn try_new(
        conditions: impl IntoIterator<Item = FilterCondition>,
    ) -> Result<Self, FilterError> {
        conditions
            .into_iter()
            .try_fold(Self::default(), |filter, condition| filter.apply(condition))
    }

    /// Return a new filter with `condition` applied
    pub fn apply(self, condition: FilterCondition) -> Result<Self, FilterError> {
        let filter = match condition {
            FilterCondition::Source(source) => Self {
                source: non_empty(source),
                ..self
            },
            FilterCondition::Title(title) => Self {
                title: non_empty(title),
                ..self
            },
            FilterCondition::List(list) => Self {
                list: non_empty(list),
                ..self
            },
            FilterCondition::TitleNotEmpty => Self {
                require_title: true,
                ..self
            },
            FilterCondition::Archived(mode) => {
                if let Some(first) = self.archived {
                    return Err(FilterError::ConflictingFilterState {
                        first,
                        second: mode,
                    });
                }
                Self {
                    archived: Some(mode),
                    ..self
                }
            }
        };
        Ok(filter)
    }

    pub(crate) fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub(crate) fn has_title(&self) -> bool {
        self.title.is_some()
    }

    pub(crate) fn source(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }

    pub(crate) fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub(crate) fn requires_title(&self) -> bool {
        self.require_title
    }

    /// The list to restrict to, `default` when none was given
    pub(crate) fn list(&self) -> &str {
        self.list.as_deref().unwrap_or(DEFAULT_LIST)
    }

    pub(crate) fn is_all_lists(&self) -> bool {
        self.list() == ALL_LISTS
    }

    /// The archived mode, `Exclude` when none was given
    pub(crate) fn archived_mode(&self) -> ArchivedMode {
        self.archived.unwrap_or(ArchivedMode::Exclude)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
