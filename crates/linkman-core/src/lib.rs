//! linkman core library
//!
//! This crate provides the link storage and query engine for linkman,
//! a personal bookmark manager.
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open_with_config(&Config::load()?)?;
//!
//! // Add a link
//! let url = parse_url("https://www.youtube.com/watch?v=abc")?;
//! let mut link = store.new_link(url.clone(), source_of(&url)?, "A video", "default");
//! store.save_link(&mut link)?;
//!
//! // Query links
//! let links = store.find_links(&LinkFilter::new([with_source("youtube")]))?;
//! ```
//!
//! # Modules
//!
//! - `store`: the link store (main entry point)
//! - `filter`: composable filter conditions
//! - `models`: the `Link` record
//! - `urls`: URL validation and source extraction
//! - `storage`: SQLite schema, connections and query translation
//! - `config`: application configuration

pub mod config;
pub mod filter;
pub mod models;
pub mod storage;
pub mod store;
pub mod urls;

pub use config::Config;
pub use filter::{
    from_list, include_archived, no_archived, only_archived, title_not_empty, with_source,
    with_title, ArchivedMode, FilterCondition, FilterError, LinkFilter, ALL_LISTS,
};
pub use models::{Link, DEFAULT_LIST};
pub use storage::{StorageError, StorageResult};
pub use store::Store;
pub use urls::{extract_source, parse_url, source_of, UrlError};
