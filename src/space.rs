//! Value types describing a space and the room-list display mode.

use ruma::{OwnedRoomAliasId, OwnedRoomId};
use serde::{Deserialize, Serialize};

/// Summary info about a space, as resolved from a session's space directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSummary {
    /// The room ID of the space itself.
    pub room_id: OwnedRoomId,
    pub canonical_alias: Option<OwnedRoomAliasId>,
    pub display_name: String,
    pub topic: Option<String>,
    pub num_joined_members: u64,
    /// The number of direct children (rooms and sub-spaces) of this space.
    pub children_count: u64,
}

/// How the room list is displayed.
///
/// Persisted globally (not per session), using the same stored integer
/// encoding as previous releases; see [`DisplayMode::from_stored`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// The unified "catch-up" view of all unread activity.
    #[default]
    Catchup,
    People,
    Rooms,
    /// People and rooms combined into one list.
    All,
}

const STORED_CATCHUP: u8 = 0;
const STORED_PEOPLE: u8 = 1;
const STORED_ROOMS: u8 = 2;
const STORED_ALL: u8 = 42;

impl DisplayMode {
    /// Decodes the stored integer value. Unknown values fall back to
    /// [`DisplayMode::Catchup`] rather than failing, so that state files
    /// written by newer versions still load.
    pub(crate) fn from_stored(value: u8) -> Self {
        match value {
            STORED_PEOPLE => Self::People,
            STORED_ROOMS => Self::Rooms,
            STORED_ALL => Self::All,
            _ => Self::Catchup,
        }
    }

    pub(crate) fn to_stored(self) -> u8 {
        match self {
            Self::Catchup => STORED_CATCHUP,
            Self::People => STORED_PEOPLE,
            Self::Rooms => STORED_ROOMS,
            Self::All => STORED_ALL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mode_round_trips_through_stored_encoding() {
        for mode in [DisplayMode::Catchup, DisplayMode::People, DisplayMode::Rooms, DisplayMode::All] {
            assert_eq!(DisplayMode::from_stored(mode.to_stored()), mode);
        }
    }

    #[test]
    fn display_mode_keeps_legacy_value_for_combined_list() {
        assert_eq!(DisplayMode::All.to_stored(), 42);
    }

    #[test]
    fn unknown_stored_display_mode_falls_back_to_catchup() {
        assert_eq!(DisplayMode::from_stored(7), DisplayMode::Catchup);
    }
}
