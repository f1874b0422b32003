//! Fire-and-forget analytics events emitted on space navigation.

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

/// An analytics event captured by the UI layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyticsEvent {
    /// The user navigated to a room, or to a space when `is_space` is set.
    ViewRoom { is_dm: bool, is_space: bool },
}

/// Sink for analytics events.
///
/// Capture is strictly fire-and-forget: implementations must never block
/// or fail the caller, since events are captured in the middle of UI state
/// transitions.
pub trait AnalyticsTracker: Send + Sync {
    fn capture(&self, event: AnalyticsEvent);
}

/// A tracker that only logs events, for builds with analytics disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingAnalyticsTracker;

impl AnalyticsTracker for LoggingAnalyticsTracker {
    fn capture(&self, event: AnalyticsEvent) {
        debug!("analytics: {event:?}");
    }
}

/// A tracker that enqueues events onto an unbounded channel, for apps that
/// drain and upload them from a background task.
pub struct ChannelAnalyticsTracker {
    sender: Sender<AnalyticsEvent>,
}

impl ChannelAnalyticsTracker {
    /// Returns the tracker together with the receiving end of its queue.
    pub fn new() -> (Self, Receiver<AnalyticsEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl AnalyticsTracker for ChannelAnalyticsTracker {
    fn capture(&self, event: AnalyticsEvent) {
        // A dropped receiver just means nobody is uploading analytics.
        let _ = self.sender.send(event);
    }
}
