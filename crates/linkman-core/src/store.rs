//! Link store
//!
//! The `Store` owns the SQLite file holding all links. It keeps only the
//! file path: every operation opens the database, does its work and closes
//! it again (see [`crate::storage::database`]). Nothing is cached between
//! calls and two calls are not isolated from each other.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::open(&config.ensure_data_dir()?)?;
//!
//! let url = parse_url("https://www.wikipedia.org/")?;
//! let mut link = store.new_link(url.clone(), source_of(&url)?, "Wikipedia", "default");
//! store.save_link(&mut link)?;
//!
//! let links = store.find_links(&LinkFilter::new([from_list("*")]))?;
//! ```
//!
//! The store does not prevent duplicate URLs. Callers that want unique
//! links check [`Store::link_exists`] before saving.

use std::path::{Path, PathBuf};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::filter::LinkFilter;
use crate::models::{normalize_list, Link};
use crate::storage::query::{select_links, translate, LINK_COLUMNS};
use crate::storage::{with_connection, StorageError, StorageResult};

/// Persistent store of links
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open the store backed by the database file at `path`
    ///
    /// Creates the file, its parent directory and the schema when missing.
    /// The database is closed again before this returns.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        with_connection(&path, |_| Ok(()))?;
        debug!("Link store ready at {:?}", path);
        Ok(Self { path })
    }

    /// Open the store at the configured database path
    pub fn open_with_config(config: &Config) -> StorageResult<Self> {
        Self::open(config.database_path())
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Construct a new, unsaved link
    pub fn new_link(
        &self,
        url: Url,
        source: impl Into<String>,
        title: impl Into<String>,
        list: impl Into<String>,
    ) -> Link {
        Link::new(url, source, title, list)
    }

    /// Persist a link
    ///
    /// Inserts the link and assigns its id on first save. A link that
    /// already has an id overwrites the stored record with that id, except
    /// that an archived record stays archived.
    pub fn save_link(&self, link: &mut Link) -> StorageResult<()> {
        link.list = normalize_list(std::mem::take(&mut link.list));

        with_connection(&self.path, |conn| match link.id() {
            Some(id) => {
                conn.execute(
                    r#"
                    INSERT INTO links (id, url, source, title, list, archived)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(id) DO UPDATE SET
                        url = excluded.url,
                        source = excluded.source,
                        title = excluded.title,
                        list = excluded.list,
                        archived = MAX(links.archived, excluded.archived)
                    "#,
                    params![
                        id,
                        link.url.as_str(),
                        link.source,
                        link.title,
                        link.list,
                        link.is_archived()
                    ],
                )?;
                info!("Updated link {}: {}", id, link.url);
                Ok(())
            }
            None => {
                conn.execute(
                    "INSERT INTO links (url, source, title, list, archived) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        link.url.as_str(),
                        link.source,
                        link.title,
                        link.list,
                        link.is_archived()
                    ],
                )?;
                let id = conn.last_insert_rowid();
                link.assign_id(id);
                info!("Saved link {}: {}", id, link.url);
                Ok(())
            }
        })
    }

    /// Check whether any link has exactly this URL
    pub fn link_exists(&self, url: &Url) -> StorageResult<bool> {
        with_connection(&self.path, |conn| {
            let exists = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM links WHERE url = ?)",
                params![url.as_str()],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    /// Find all links matching a filter, ordered by id
    pub fn find_links(&self, filter: &LinkFilter) -> StorageResult<Vec<Link>> {
        let predicates = translate(filter);
        debug!("Finding links with predicates {:?}", predicates);
        let (sql, values) = select_links(&predicates);

        with_connection(&self.path, |conn| query_links(conn, &sql, params_from_iter(values)))
    }

    /// Every stored link, across all lists and archived states
    pub fn find_all_links(&self) -> StorageResult<Vec<Link>> {
        let (sql, _) = select_links(&[]);
        with_connection(&self.path, |conn| query_links(conn, &sql, []))
    }

    /// Get a link by id
    pub fn get_link(&self, id: i64) -> StorageResult<Option<Link>> {
        with_connection(&self.path, |conn| {
            let sql = format!("SELECT {} FROM links WHERE id = ?", LINK_COLUMNS);
            conn.query_row(&sql, params![id], read_row)
                .optional()?
                .map(into_link)
                .transpose()
        })
    }

    /// Mark the link with this id as archived
    ///
    /// Archiving is idempotent and an unknown id is not an error.
    pub fn archive_by_id(&self, id: i64) -> StorageResult<()> {
        with_connection(&self.path, |conn| {
            let updated = conn.execute("UPDATE links SET archived = 1 WHERE id = ?", params![id])?;
            if updated == 0 {
                debug!("No link with id {} to archive", id);
            } else {
                info!("Archived link {}", id);
            }
            Ok(())
        })
    }

    /// Get count of links
    pub fn link_count(&self) -> StorageResult<i64> {
        with_connection(&self.path, |conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?)
        })
    }
}

/// A `links` row before its URL is parsed
struct LinkRow {
    id: i64,
    url: String,
    source: String,
    title: String,
    list: String,
    archived: bool,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<LinkRow> {
    Ok(LinkRow {
        id: row.get(0)?,
        url: row.get(1)?,
        source: row.get(2)?,
        title: row.get(3)?,
        list: row.get(4)?,
        archived: row.get(5)?,
    })
}

fn into_link(row: LinkRow) -> StorageResult<Link> {
    let url = Url::parse(&row.url).map_err(|e| StorageError::CorruptRecord {
        id: row.id,
        details: format!("invalid URL '{}': {}", row.url, e),
    })?;
    Ok(Link::from_storage(
        row.id,
        url,
        row.source,
        row.title,
        row.list,
        row.archived,
    ))
}

fn query_links(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> StorageResult<Vec<Link>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, read_row)?;

    let mut links = Vec::new();
    for row in rows {
        links.push(into_link(row?)?);
    }
    Ok(links)
}
