//! On-disk snapshot of the bubble index
//!
//! A single JSON array of `{id, symbol}` objects. Writes go to a temp file in
//! the destination directory which is then renamed over the old snapshot, so
//! readers only ever see a complete file.

use super::entry::CatalogEntry;
use crate::logger::{self, LogTag};
use std::io::Write as _;
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a snapshot; any failure yields an empty list
pub fn load_from_disk(path: &Path) -> Vec<CatalogEntry> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            logger::debug(
                LogTag::Index,
                &format!("No bubble index snapshot at {}: {}", path.display(), e),
            );
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Vec<CatalogEntry>>(&data) {
        Ok(entries) => entries,
        Err(e) => {
            logger::debug(
                LogTag::Index,
                &format!("Ignoring unreadable snapshot {}: {}", path.display(), e),
            );
            Vec::new()
        }
    }
}

/// Atomically replace the snapshot with `entries`
pub fn persist(path: &Path, entries: &[CatalogEntry]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let encoded = serde_json::to_vec(entries)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&encoded)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
