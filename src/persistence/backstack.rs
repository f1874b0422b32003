//! The persisted space navigation backstack.

use std::path::PathBuf;
use std::sync::Mutex;

use ruma::OwnedRoomId;

use super::{load_or_default, save, StateStoreError};

const BACKSTACK_FILE_NAME: &str = "space_backstack.json";

/// Ordered history of previously-selected space IDs, used for
/// back-navigation. A `None` entry is a previous "all chats" (no space
/// filter) selection.
///
/// The backstack is stored globally, not per session: switching accounts
/// keeps one shared navigation history. This matches the behavior of
/// previous releases.
pub struct SpaceBackstackStore {
    path: PathBuf,
    state: Mutex<Vec<Option<OwnedRoomId>>>,
}

impl SpaceBackstackStore {
    /// Opens (or initializes) the store inside the given state directory.
    pub fn open(state_dir: impl Into<PathBuf>) -> Result<Self, StateStoreError> {
        let path = state_dir.into().join(BACKSTACK_FILE_NAME);
        let state = load_or_default(&path)?;
        Ok(Self { path, state: Mutex::new(state) })
    }

    /// A snapshot of the persisted backstack, oldest entry first.
    pub fn get(&self) -> Vec<Option<OwnedRoomId>> {
        self.state.lock().unwrap().clone()
    }

    /// Replaces the persisted backstack.
    pub fn set(&self, backstack: Vec<Option<OwnedRoomId>>) -> Result<(), StateStoreError> {
        let mut state = self.state.lock().unwrap();
        *state = backstack;
        save(&self.path, &*state)
    }
}

#[cfg(test)]
mod tests {
    use ruma::room_id;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn backstack_starts_empty_and_survives_a_reopen() {
        let dir = tempdir().unwrap();

        let store = SpaceBackstackStore::open(dir.path()).unwrap();
        assert!(store.get().is_empty());

        store
            .set(vec![None, Some(room_id!("!space:example.org").to_owned())])
            .unwrap();

        let reopened = SpaceBackstackStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get(),
            vec![None, Some(room_id!("!space:example.org").to_owned())],
        );
    }

    #[test]
    fn set_replaces_the_whole_backstack() {
        let dir = tempdir().unwrap();
        let store = SpaceBackstackStore::open(dir.path()).unwrap();

        store.set(vec![None, None]).unwrap();
        store.set(Vec::new()).unwrap();
        assert!(store.get().is_empty());
    }
}
