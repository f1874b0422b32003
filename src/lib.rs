//! Space selection state handling for a Matrix chat client.
//!
//! A *space* is a Matrix room-grouping construct, analogous to a folder of
//! rooms. This crate owns "which space is currently selected" as app-wide,
//! session-scoped UI state: the [`SpaceStateHandler`] exposes the selection
//! as observable streams, maintains a persisted backstack of previously
//! selected spaces for back-navigation, and restores the selection across
//! session switches and app restarts.
//!
//! The actual Matrix protocol machinery (sync, encryption, federation) is
//! not part of this crate; space resolution is delegated to the
//! [`SpaceDirectory`] trait implemented on top of whatever client SDK the
//! app embeds.

pub mod analytics;
pub mod persistence;
pub mod session;
pub mod space;
pub mod space_state_handler;

pub use analytics::{AnalyticsEvent, AnalyticsTracker, ChannelAnalyticsTracker, LoggingAnalyticsTracker};
pub use persistence::{SpaceBackstackStore, StateStoreError, UiStateStore};
pub use session::{ActiveSessionHolder, Session, SpaceDirectory};
pub use space::{DisplayMode, SpaceSummary};
pub use space_state_handler::{SelectedSpace, SelectionOrigin, SpaceStateHandler};
