//! Scoped database access
//!
//! The store never keeps a connection around. Each operation opens the
//! SQLite file, runs, and closes it again, so the file lock is only held
//! for the duration of a single operation and other processes can
//! interleave between calls.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{init_schema, needs_init};

/// How long to wait on a lock held by another process
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the database at `path`, creating the file and schema if needed
pub fn open_connection(path: &Path) -> StorageResult<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
    }

    let conn = Connection::open(path).map_err(|source| StorageError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    conn.busy_timeout(BUSY_TIMEOUT)?;

    if needs_init(&conn) {
        debug!("Initializing schema in {:?}", path);
        init_schema(&conn)?;
    }

    debug!("Opened database {:?}", path);
    Ok(conn)
}

/// Run `op` against a freshly opened connection and close it afterwards
///
/// The connection is released on every path: explicitly when `op` returns,
/// and through `Drop` if it unwinds. The result of `op` is returned as is;
/// a failure to close is only logged, since by then any write has been
/// committed.
pub fn with_connection<T>(
    path: &Path,
    op: impl FnOnce(&Connection) -> StorageResult<T>,
) -> StorageResult<T> {
    let conn = open_connection(path)?;
    let result = op(&conn);
    let closed = conn.close().map_err(|(_conn, err)| err);
    settle(path, result, closed)
}

fn settle<T>(
    path: &Path,
    result: StorageResult<T>,
    closed: Result<(), rusqlite::Error>,
) -> StorageResult<T> {
    match closed {
        Ok(()) => debug!("Closed database {:?}", path),
        Err(err) => warn!("Failed to close database {:?}: {}", path, err),
    }
    result
}
