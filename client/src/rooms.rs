//! Room catalog: list, pure filtering, details view, background refresh.

use crate::environment::ClientEnvironment;
use crate::types::Room;
use concierge_core::effect::Effect;
use concierge_core::reducer::Reducer;
use concierge_core::{SmallVec, smallvec};

/// Pure room filter.
///
/// Unset fields always match. Filtering never mutates the underlying list
/// or triggers a fetch; it is applied at read time via
/// [`RoomsState::visible_rooms`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFilter {
    /// Exact room-type match ("Single", "Double", "Suite")
    pub room_type: Option<String>,
    /// Minimum capacity
    pub min_capacity: Option<u32>,
}

impl RoomFilter {
    /// Whether a room passes the filter.
    #[must_use]
    pub fn matches(&self, room: &Room) -> bool {
        let type_ok = self
            .room_type
            .as_ref()
            .is_none_or(|t| room.room_type == *t);
        let capacity_ok = self.min_capacity.is_none_or(|min| room.capacity >= min);
        type_ok && capacity_ok
    }
}

/// Room catalog state.
#[derive(Debug, Clone, Default)]
pub struct RoomsState {
    /// Rooms in server order
    pub rooms: Vec<Room>,
    /// Current filter inputs
    pub filter: RoomFilter,
    /// Filter applies only after an explicit search
    pub searched: bool,
    /// The room open in the details view, if any
    pub selected: Option<Room>,
    /// A fetch is in flight
    pub is_loading: bool,
    /// Background refresh is active
    pub polling: bool,
    /// Timer generation
    pub poll_epoch: u64,
    /// Last failure message for display
    pub last_error: Option<String>,
    /// Last success notice for display
    pub last_notice: Option<String>,
}

impl RoomsState {
    /// Rooms to render: the full list until a search was issued, the
    /// filtered list after.
    #[must_use]
    pub fn visible_rooms(&self) -> Vec<&Room> {
        if self.searched {
            self.rooms.iter().filter(|r| self.filter.matches(r)).collect()
        } else {
            self.rooms.iter().collect()
        }
    }
}

/// Room catalog actions.
#[derive(Debug, Clone)]
pub enum RoomsAction {
    /// Fetch the room list
    Fetch,
    /// Fetch the list and surface a refresh notice
    Refresh,
    /// List arrived
    Loaded(Vec<Room>),
    /// List fetch failed
    FetchFailed,
    /// Update filter inputs (does not apply them)
    SetFilter(RoomFilter),
    /// Apply the current filter
    Search,
    /// Fetch one room for the details view
    FetchRoom {
        /// Room id
        id: u64,
    },
    /// Details room arrived
    RoomLoaded(Room),
    /// Details fetch failed
    RoomFetchFailed,
    /// Begin background refresh
    StartPolling,
    /// Timer fired
    Tick {
        /// Generation the timer was armed in
        epoch: u64,
    },
    /// Stop background refresh
    StopPolling,
}

/// Room catalog reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomsReducer;

impl RoomsReducer {
    fn fetch_effect(env: &ClientEnvironment) -> Effect<RoomsAction> {
        let api = env.api.clone();
        Effect::Future(Box::pin(async move {
            match api.rooms().await {
                Ok(rooms) => Some(RoomsAction::Loaded(rooms)),
                Err(_) => Some(RoomsAction::FetchFailed),
            }
        }))
    }

    fn tick_effect(env: &ClientEnvironment, epoch: u64) -> Effect<RoomsAction> {
        Effect::Delay {
            duration: env.config.poll_interval,
            action: Box::new(RoomsAction::Tick { epoch }),
        }
    }
}

impl Reducer for RoomsReducer {
    type State = RoomsState;
    type Action = RoomsAction;
    type Environment = ClientEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RoomsAction::Fetch => {
                state.is_loading = true;
                smallvec![Self::fetch_effect(env)]
            },

            RoomsAction::Refresh => {
                state.is_loading = true;
                state.last_notice = Some("Room list refreshed".to_string());
                smallvec![Self::fetch_effect(env)]
            },

            RoomsAction::Loaded(rooms) => {
                state.rooms = rooms;
                state.is_loading = false;
                smallvec![Effect::None]
            },

            RoomsAction::FetchFailed => {
                state.is_loading = false;
                state.last_error = Some("Failed to fetch rooms".to_string());
                smallvec![Effect::None]
            },

            RoomsAction::SetFilter(filter) => {
                state.filter = filter;
                smallvec![Effect::None]
            },

            RoomsAction::Search => {
                state.searched = true;
                smallvec![Effect::None]
            },

            RoomsAction::FetchRoom { id } => {
                state.is_loading = true;
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.room(id).await {
                        Ok(room) => Some(RoomsAction::RoomLoaded(room)),
                        Err(_) => Some(RoomsAction::RoomFetchFailed),
                    }
                }))]
            },

            RoomsAction::RoomLoaded(room) => {
                state.is_loading = false;
                // Keep the cached list entry in sync with the fresh copy.
                if let Some(entry) = state.rooms.iter_mut().find(|r| r.id == room.id) {
                    *entry = room.clone();
                }
                state.selected = Some(room);
                smallvec![Effect::None]
            },

            RoomsAction::RoomFetchFailed => {
                state.is_loading = false;
                state.last_error = Some("Failed to fetch room details".to_string());
                smallvec![Effect::None]
            },

            RoomsAction::StartPolling => {
                state.poll_epoch = state.poll_epoch.wrapping_add(1);
                state.polling = true;
                state.is_loading = true;
                smallvec![
                    Self::fetch_effect(env),
                    Self::tick_effect(env, state.poll_epoch),
                ]
            },

            RoomsAction::Tick { epoch } => {
                if !state.polling || epoch != state.poll_epoch {
                    return smallvec![Effect::None];
                }
                state.is_loading = true;
                smallvec![Self::fetch_effect(env), Self::tick_effect(env, epoch)]
            },

            RoomsAction::StopPolling => {
                state.polling = false;
                smallvec![Effect::None]
            },
        }
    }
}
