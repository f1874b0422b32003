//! Persistence of UI state across application restarts.
//!
//! Both stores keep a small JSON file under an explicit state directory
//! chosen by the embedding app. A corrupt file (e.g. written by an
//! incompatible older version) is backed up and replaced with defaults
//! instead of failing startup.

use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

mod backstack;
mod ui_state;

pub use backstack::SpaceBackstackStore;
pub use ui_state::UiStateStore;

/// Errors from the on-disk UI state stores.
#[derive(Debug, thiserror::Error)]
pub enum StateStoreError {
    #[error("UI state file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("UI state (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a JSON state file, returning defaults if it doesn't exist.
///
/// Deserialization failures back up the old file (preserving whatever it
/// held) and return defaults, so an incompatible format change never
/// prevents the app from starting.
fn load_or_default<T>(path: &Path) -> Result<T, StateStoreError>
where
    T: DeserializeOwned + Default,
{
    let file_bytes = match std::fs::read(path) {
        Ok(fb) => fb,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_slice(&file_bytes) {
        Ok(state) => Ok(state),
        Err(e) => {
            error!("Failed to deserialize {}: {e}. Starting from defaults.", path.display());
            let backup_path = path.with_extension("json.bak");
            if let Err(backup_err) = std::fs::rename(path, &backup_path) {
                warn!("Failed to back up old state file: {backup_err}");
            }
            Ok(T::default())
        }
    }
}

/// Writes a JSON state file, creating parent directories as needed.
fn save<T: Serialize>(path: &Path, state: &T) -> Result<(), StateStoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer(&mut writer, state)?;
    writer.flush()?;
    Ok(())
}
