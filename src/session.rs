//! The session abstraction consumed by the space state handler.
//!
//! A [`Session`] bundles the identity of a logged-in user with access to
//! that session's space directory. The Matrix protocol machinery lives
//! behind the [`SpaceDirectory`] trait, so the handler (and its tests)
//! never depend on a concrete client SDK.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ruma::{OwnedUserId, RoomId, UserId};
use tokio::sync::watch;

use crate::space::SpaceSummary;

/// Read access to the spaces known to a session.
#[async_trait]
pub trait SpaceDirectory: Send + Sync {
    /// Returns the summary for the given space, if the session knows about it.
    fn space_summary(&self, space_id: &RoomId) -> Option<SpaceSummary>;

    /// Loads the member list of the given space, if it hasn't been loaded yet.
    async fn load_space_members(&self, space_id: &RoomId) -> anyhow::Result<()>;
}

/// A logged-in user session, as seen by the space state handler.
pub struct Session {
    user_id: OwnedUserId,
    directory: Arc<dyn SpaceDirectory>,
}

impl Session {
    pub fn new(user_id: OwnedUserId, directory: Arc<dyn SpaceDirectory>) -> Self {
        Self { user_id, directory }
    }

    /// The user ID that identifies this session, also used as the key for
    /// per-session persisted UI state.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn space_summary(&self, space_id: &RoomId) -> Option<SpaceSummary> {
        self.directory.space_summary(space_id)
    }

    pub async fn load_space_members(&self, space_id: &RoomId) -> anyhow::Result<()> {
        self.directory.load_space_members(space_id).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("user_id", &self.user_id).finish_non_exhaustive()
    }
}

/// Holds the currently active session and lets observers watch it change.
pub struct ActiveSessionHolder {
    active: watch::Sender<Option<Arc<Session>>>,
}

impl ActiveSessionHolder {
    pub fn new() -> Self {
        Self { active: watch::Sender::new(None) }
    }

    pub fn set_active_session(&self, session: Arc<Session>) {
        self.active.send_replace(Some(session));
    }

    /// Clears the active session, e.g. on logout.
    pub fn clear_active_session(&self) {
        self.active.send_replace(None);
    }

    /// Returns the active session, or `None` if no user is logged in.
    /// Never fails; absence of a session is an expected state.
    pub fn get_safe_active_session(&self) -> Option<Arc<Session>> {
        self.active.borrow().clone()
    }

    /// Subscribes to active-session changes. Wrap the receiver in a
    /// `WatchStream` to also observe the value current at subscribe time.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.active.subscribe()
    }
}

impl Default for ActiveSessionHolder {
    fn default() -> Self {
        Self::new()
    }
}
