//! Tracks which space is currently selected, app-wide.
//!
//! The handler owns the selection as a single-writer watch cell, keeps a
//! persisted backstack of previously-selected spaces for back-navigation,
//! and restores the stored selection whenever a different session becomes
//! active. It is constructed and owned explicitly by the navigation layer;
//! there is no process-wide singleton.

use std::sync::{Arc, Mutex};

use futures_util::{Stream, StreamExt};
use ruma::{OwnedRoomId, RoomId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, error};

use crate::analytics::{AnalyticsEvent, AnalyticsTracker};
use crate::persistence::{SpaceBackstackStore, StateStoreError, UiStateStore};
use crate::session::{ActiveSessionHolder, Session};
use crate::space::SpaceSummary;

/// Why the current space selection changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// Restored at startup, or when a session became active.
    Init,
    /// Swiped in the home pager.
    Swipe,
    /// A swipe in the home pager that has since been persisted.
    PersistedSwipe,
    /// Selected from non-pager UI, e.g. the space list.
    Select,
}

/// The currently selected space and how it came to be selected.
///
/// A `None` summary means "all chats", i.e. no space filter is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedSpace {
    pub summary: Option<SpaceSummary>,
    pub origin: SelectionOrigin,
}

/// Handles the app-wide space selection state.
///
/// Cheap to clone; clones share the same state. The handler is
/// constructed and owned explicitly by the navigation layer. The
/// embedding app should call [`resume`](Self::resume) /
/// [`pause`](Self::pause) from its lifecycle callbacks so that the
/// selection is rehydrated on session switches and persisted before the
/// process goes to the background.
#[derive(Clone)]
pub struct SpaceStateHandler {
    inner: Arc<Inner>,
}

struct Inner {
    sessions: Arc<ActiveSessionHolder>,
    ui_state: Arc<UiStateStore>,
    backstack: Arc<SpaceBackstackStore>,
    analytics: Arc<dyn AnalyticsTracker>,
    /// The selection cell. `None` means no selection has happened yet,
    /// which is distinct from an explicit "all chats" selection.
    selected_space: watch::Sender<Option<SelectedSpace>>,
    /// Background tasks owned by this handler: the active-session observer
    /// and in-flight member prefetches. All of them are aborted on
    /// [`SpaceStateHandler::pause`], so no observer survives a
    /// pause/resume cycle. Finished prefetch handles are reaped whenever
    /// a new one is pushed.
    background_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SpaceStateHandler {
    pub fn new(
        sessions: Arc<ActiveSessionHolder>,
        ui_state: Arc<UiStateStore>,
        backstack: Arc<SpaceBackstackStore>,
        analytics: Arc<dyn AnalyticsTracker>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions,
                ui_state,
                backstack,
                analytics,
                selected_space: watch::Sender::new(None),
                background_tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns the summary of the currently selected space, re-resolved
    /// against the active session's directory, or `None` if no space is
    /// selected or no session is active.
    pub fn current_space(&self) -> Option<SpaceSummary> {
        let current = self.inner.selected_space.borrow().clone()?;
        let space_id = current.summary?.room_id;
        self.inner.sessions
            .get_safe_active_session()?
            .space_summary(&space_id)
    }

    /// Changes the current space selection.
    ///
    /// * `space_id`: the space to select; `None` selects "all chats".
    /// * `session`: the session to resolve the space against; falls back
    ///   to the active session. Without either, this is a silent no-op.
    /// * `persist_now`: synchronously write the new selection to the
    ///   [`UiStateStore`] for the session.
    /// * `is_forward_navigation`: whether this counts as forward
    ///   navigation for the backstack. Only `Select` and `Init` origin
    ///   forward navigations push a backstack entry.
    ///
    /// Re-selecting the currently selected space is a complete no-op:
    /// no emission, no persistence, no analytics, no backstack entry.
    ///
    /// Persistence failures abort the remainder of this call; already
    /// applied side effects (analytics, backstack) are not rolled back.
    pub fn set_current_space(
        &self,
        space_id: Option<&RoomId>,
        session: Option<&Arc<Session>>,
        persist_now: bool,
        is_forward_navigation: bool,
        origin: SelectionOrigin,
    ) -> anyhow::Result<()> {
        let active_session = match session
            .cloned()
            .or_else(|| self.inner.sessions.get_safe_active_session())
        {
            Some(session) => session,
            // Expected during logout and session switches, not an error.
            None => return Ok(()),
        };

        let current = self.inner.selected_space.borrow().clone();
        let space_to_leave = current.as_ref().and_then(|c| c.summary.clone());
        let space_to_set = space_id.and_then(|id| active_session.space_summary(id));

        let same_space_selected =
            current.is_some() && space_id == space_to_leave.as_ref().map(|s| &*s.room_id);
        if same_space_selected {
            return Ok(());
        }

        if origin == SelectionOrigin::Select {
            debug!("home pager: explicit space selection: {space_id:?}");
        }

        self.inner.analytics.capture(AnalyticsEvent::ViewRoom {
            is_dm: false,
            is_space: true,
        });

        if is_forward_navigation
            && matches!(origin, SelectionOrigin::Select | SelectionOrigin::Init)
        {
            self.add_to_backstack(space_to_leave.as_ref(), space_to_set.as_ref())?;
        }

        if persist_now {
            self.inner.ui_state.store_selected_space(
                space_to_set.as_ref().map(|s| &*s.room_id),
                active_session.user_id(),
            )?;
        }

        self.inner.selected_space.send_replace(Some(SelectedSpace {
            summary: space_to_set,
            origin,
        }));

        if let Some(space_id) = space_id.map(ToOwned::to_owned) {
            // Best-effort member prefetch for the newly selected space.
            // Failures are discarded on purpose: the member list will be
            // fetched again when a room inside the space is opened.
            let task = tokio::spawn(async move {
                if let Err(e) = active_session.load_space_members(&space_id).await {
                    debug!("Member prefetch for space {space_id} failed: {e}");
                }
            });
            let mut tasks = self.inner.background_tasks.lock().unwrap();
            tasks.retain(|task| !task.is_finished());
            tasks.push(task);
        }

        Ok(())
    }

    /// Pushes the space being left onto the persisted backstack, unless the
    /// new selection is "all chats", which clears the backstack instead:
    /// All Chats is the unwindable root of space navigation.
    fn add_to_backstack(
        &self,
        space_to_leave: Option<&SpaceSummary>,
        space_to_set: Option<&SpaceSummary>,
    ) -> Result<(), StateStoreError> {
        if space_to_set.is_some() {
            let mut persisted = self.inner.backstack.get();
            persisted.push(space_to_leave.map(|s| s.room_id.clone()));
            self.inner.backstack.set(persisted)
        } else {
            self.inner.backstack.set(Vec::new())
        }
    }

    /// Removes and returns the most recent backstack entry, or `None` when
    /// the backstack is empty. A `Some(None)` entry is a previous
    /// "all chats" selection. Failure to persist the shortened backstack
    /// propagates to the caller, like every other persistence write here.
    ///
    /// Callers driving back-navigation should still check
    /// [`space_backstack`](Self::space_backstack) for emptiness first to
    /// decide whether back means "previous space" or "leave space
    /// navigation".
    pub fn pop_space_backstack(&self) -> anyhow::Result<Option<Option<OwnedRoomId>>> {
        let mut persisted = self.inner.backstack.get();
        let Some(popped) = persisted.pop() else {
            return Ok(None);
        };
        self.inner.backstack.set(persisted)?;
        Ok(Some(popped))
    }

    /// A read-only snapshot of the persisted backstack.
    pub fn space_backstack(&self) -> Vec<Option<OwnedRoomId>> {
        self.inner.backstack.get()
    }

    /// The stream of selected space summaries.
    ///
    /// New subscribers immediately receive the current value; afterwards
    /// only the latest value is retained, so slow consumers observe the
    /// newest selection rather than every intermediate one. The stream
    /// never completes.
    pub fn selected_space_stream(&self) -> impl Stream<Item = Option<SpaceSummary>> {
        WatchStream::new(self.inner.selected_space.subscribe())
            .map(|selection| selection.and_then(|s| s.summary))
    }

    /// Like [`selected_space_stream`](Self::selected_space_stream), but
    /// transient `Swipe`-origin selections are not surfaced, for listeners
    /// that only care about settled selections. The origin tag is included
    /// so that restores can be told apart from explicit selections.
    pub fn selected_space_stream_ignore_swipe(
        &self,
    ) -> impl Stream<Item = Option<SelectedSpace>> {
        WatchStream::new(self.inner.selected_space.subscribe()).filter(|selection| {
            std::future::ready(
                selection
                    .as_ref()
                    .map_or(true, |s| s.origin != SelectionOrigin::Swipe),
            )
        })
    }

    /// The ID of the currently selected space, without re-resolving it
    /// against the session. May be stale if the space was since deleted.
    pub fn safe_active_space_id(&self) -> Option<OwnedRoomId> {
        let selected = self.inner.selected_space.borrow();
        selected.as_ref()?.summary.as_ref().map(|s| s.room_id.clone())
    }

    /// Starts observing the active session. Each time a different session
    /// becomes active, the selection stored for it is restored with origin
    /// [`SelectionOrigin::Init`].
    pub fn resume(&self) {
        let handler = self.clone();
        let mut sessions = WatchStream::new(self.inner.sessions.subscribe());
        let task = tokio::spawn(async move {
            let mut last_session_id = None;
            while let Some(active) = sessions.next().await {
                let Some(session) = active else {
                    // Logged out. Forget the last session so that logging
                    // back into the same account rehydrates again.
                    last_session_id = None;
                    continue;
                };
                // The holder may re-publish the same session; only react
                // to actual session switches.
                if last_session_id.as_deref() == Some(session.user_id()) {
                    continue;
                }
                last_session_id = Some(session.user_id().to_owned());

                let restored = handler.inner.ui_state.selected_space(session.user_id());
                if let Err(e) = handler.set_current_space(
                    restored.as_deref(),
                    Some(&session),
                    false,
                    true,
                    SelectionOrigin::Init,
                ) {
                    error!("Failed to restore selected space for {}: {e}", session.user_id());
                }
            }
        });
        self.inner.background_tasks.lock().unwrap().push(task);
    }

    /// Stops the session observer and any in-flight member prefetches,
    /// then persists the current selection for the active session.
    /// Best-effort: without an active session nothing is written, and
    /// write failures are logged rather than propagated (a lifecycle
    /// callback has no caller to fail).
    pub fn pause(&self) {
        for task in self.inner.background_tasks.lock().unwrap().drain(..) {
            task.abort();
        }

        let Some(session) = self.inner.sessions.get_safe_active_session() else {
            return;
        };
        let selected = self.inner.selected_space.borrow().clone();
        let space_id = selected.and_then(|s| s.summary).map(|s| s.room_id);
        if let Err(e) = self
            .inner
            .ui_state
            .store_selected_space(space_id.as_deref(), session.user_id())
        {
            error!("Failed to persist selected space on pause: {e}");
        }
    }

    /// Explicit persistence checkpoint, e.g. before expected process death.
    ///
    /// A provisional `Swipe` selection is promoted to `PersistedSwipe`
    /// first, marking it as confirmed, without re-running any navigation
    /// side effect (no backstack push, no analytics).
    pub fn persist_selected_space(&self) -> anyhow::Result<()> {
        let Some(current) = self.inner.selected_space.borrow().clone() else {
            return Ok(());
        };
        let Some(session) = self.inner.sessions.get_safe_active_session() else {
            return Ok(());
        };

        if current.origin == SelectionOrigin::Swipe {
            self.inner.selected_space.send_replace(Some(SelectedSpace {
                summary: current.summary.clone(),
                origin: SelectionOrigin::PersistedSwipe,
            }));
        }

        self.inner.ui_state.store_selected_space(
            current.summary.as_ref().map(|s| &*s.room_id),
            session.user_id(),
        )?;
        Ok(())
    }
}
