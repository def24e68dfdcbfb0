//! Cache store: persistence of the most recently built snapshot.
//!
//! One JSON file at a fixed configuration-scoped path, fully overwritten on
//! every sync. Writes are not atomic - a crash mid-write may corrupt the
//! cache, which is acceptable because the cache is always rebuildable from
//! the remote source. In the serialized form, numeric identifiers used as
//! map keys become JSON object keys (strings); the id newtypes convert back
//! on load so in-memory logic never sees string ids.

use std::fs;
use std::io::ErrorKind;

use tracing::debug;

use crate::config::Config;
use crate::models::Snapshot;
use crate::{Error, Result};

/// Write the snapshot to the cache file, replacing prior content.
pub fn persist(config: &Config, snapshot: &Snapshot) -> Result<()> {
    fs::create_dir_all(config.dir())?;
    let json = serde_json::to_string(snapshot)?;
    let path = config.cache_path();
    fs::write(&path, json)?;
    debug!(path = %path.display(), "persisted snapshot");
    Ok(())
}

/// Load the cached snapshot.
pub fn load(config: &Config) -> Result<Snapshot> {
    let path = config.cache_path();
    let raw = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::Other(format!(
                "No cache at {} - run `tm sync` first",
                path.display()
            ))
        } else {
            Error::Io(e)
        }
    })?;
    Ok(serde_json::from_str(&raw)?)
}
