//! Archive command handler

use anyhow::{Context, Result};

use linkman_core::Store;

use crate::output::Output;

/// Archive the links with the given ids
///
/// Values that are not ids are reported and skipped. Unknown ids are not
/// an error.
pub fn run(store: &Store, ids: &[String], output: &Output) -> Result<()> {
    for raw in ids {
        let Ok(id) = raw.trim().parse::<i64>() else {
            output.warn(&format!("Value {} is not an ID", raw));
            continue;
        };

        store
            .archive_by_id(id)
            .with_context(|| format!("Unable to archive link {}", id))?;
        output.success(&format!("Archived link: {}", id));
    }
    Ok(())
}
