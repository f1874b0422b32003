//! Per-session UI state: last-selected space, display mode, and custom
//! room directory servers.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Mutex;

use ruma::{OwnedRoomId, OwnedUserId, RoomId, UserId};
use serde::{Deserialize, Serialize};

use super::{load_or_default, save, StateStoreError};
use crate::space::DisplayMode;

const UI_STATE_FILE_NAME: &str = "ui_state.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct UiState {
    /// The last-selected space per session. A `None` value is an explicit
    /// "all chats" selection; a missing key means nothing was stored yet.
    /// Both read back as no selected space.
    #[serde(default)]
    selected_spaces: BTreeMap<OwnedUserId, Option<OwnedRoomId>>,
    /// Stored integer encoding of the room list display mode (global,
    /// not session-scoped).
    #[serde(default)]
    display_mode: Option<u8>,
    /// Custom room directory homeservers per session.
    #[serde(default)]
    custom_directory_homeservers: BTreeMap<OwnedUserId, BTreeSet<String>>,
}

/// Persists UI state across application restarts, keyed by session.
///
/// All writes go straight to disk; reads are served from memory.
pub struct UiStateStore {
    path: PathBuf,
    state: Mutex<UiState>,
}

impl UiStateStore {
    /// Opens (or initializes) the store inside the given state directory.
    pub fn open(state_dir: impl Into<PathBuf>) -> Result<Self, StateStoreError> {
        let path = state_dir.into().join(UI_STATE_FILE_NAME);
        let state = load_or_default(&path)?;
        Ok(Self { path, state: Mutex::new(state) })
    }

    pub fn selected_space(&self, session_id: &UserId) -> Option<OwnedRoomId> {
        self.state
            .lock()
            .unwrap()
            .selected_spaces
            .get(session_id)
            .cloned()
            .flatten()
    }

    pub fn store_selected_space(
        &self,
        space_id: Option<&RoomId>,
        session_id: &UserId,
    ) -> Result<(), StateStoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .selected_spaces
            .insert(session_id.to_owned(), space_id.map(ToOwned::to_owned));
        save(&self.path, &*state)
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.state
            .lock()
            .unwrap()
            .display_mode
            .map(DisplayMode::from_stored)
            .unwrap_or_default()
    }

    pub fn store_display_mode(&self, mode: DisplayMode) -> Result<(), StateStoreError> {
        let mut state = self.state.lock().unwrap();
        state.display_mode = Some(mode.to_stored());
        save(&self.path, &*state)
    }

    /// Clears the stored display mode. Selected spaces are kept.
    pub fn reset(&self) -> Result<(), StateStoreError> {
        let mut state = self.state.lock().unwrap();
        state.display_mode = None;
        save(&self.path, &*state)
    }

    pub fn custom_directory_homeservers(&self, session_id: &UserId) -> BTreeSet<String> {
        self.state
            .lock()
            .unwrap()
            .custom_directory_homeservers
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_custom_directory_homeservers(
        &self,
        session_id: &UserId,
        servers: BTreeSet<String>,
    ) -> Result<(), StateStoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .custom_directory_homeservers
            .insert(session_id.to_owned(), servers);
        save(&self.path, &*state)
    }
}
