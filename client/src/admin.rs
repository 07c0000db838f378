//! Admin inventory: room creation, status changes, full reservation view.
//!
//! Mutations are fire-and-refetch: the server applies the change and the
//! client reloads, never updating optimistically.

use crate::environment::ClientEnvironment;
use crate::types::{NewRoom, Reservation, Room, RoomStatus};
use concierge_core::effect::Effect;
use concierge_core::reducer::Reducer;
use concierge_core::{SmallVec, smallvec};

/// Editable new-room form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRoomForm {
    /// Human-readable room number
    pub room_number: String,
    /// Category label
    pub room_type: String,
    /// Price per night
    pub price: Option<f64>,
    /// Maximum number of guests
    pub capacity: Option<u32>,
    /// Free-form amenities description
    pub amenities: String,
    /// Optional photo URL
    pub image_url: String,
}

impl NewRoomForm {
    /// Validate the form into a request body.
    ///
    /// Everything except `image_url` is required; price must be
    /// non-negative and capacity at least 1.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message for the first failing rule.
    pub fn validate(&self) -> Result<NewRoom, String> {
        if self.room_number.trim().is_empty()
            || self.room_type.trim().is_empty()
            || self.amenities.trim().is_empty()
        {
            return Err("Please fill in all required fields".to_string());
        }
        let Some(price) = self.price else {
            return Err("Please fill in all required fields".to_string());
        };
        if price < 0.0 {
            return Err("Price must be zero or greater".to_string());
        }
        let Some(capacity) = self.capacity else {
            return Err("Please fill in all required fields".to_string());
        };
        if capacity < 1 {
            return Err("Capacity must be at least 1".to_string());
        }

        let image_url = self.image_url.trim();
        Ok(NewRoom {
            room_number: self.room_number.trim().to_string(),
            room_type: self.room_type.trim().to_string(),
            price,
            capacity,
            amenities: self.amenities.trim().to_string(),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        })
    }
}

/// Admin dashboard state.
#[derive(Debug, Clone, Default)]
pub struct AdminState {
    /// Rooms in server order
    pub rooms: Vec<Room>,
    /// All reservations (the server scopes the list to admins)
    pub reservations: Vec<Reservation>,
    /// The new-room form
    pub form: NewRoomForm,
    /// A fetch is in flight
    pub is_loading: bool,
    /// Last failure message for display
    pub last_error: Option<String>,
    /// Last success notice for display
    pub last_notice: Option<String>,
}

/// Admin actions.
#[derive(Debug, Clone)]
pub enum AdminAction {
    /// Fetch rooms and reservations in parallel
    FetchAll,
    /// Room list arrived
    RoomsLoaded(Vec<Room>),
    /// Reservation list arrived
    ReservationsLoaded(Vec<Reservation>),
    /// Either fetch failed
    FetchFailed,
    /// Replace the form contents (edit)
    SetForm(NewRoomForm),
    /// Validate and submit the form
    CreateRoom,
    /// Create call succeeded
    RoomCreated,
    /// Create call failed
    CreateRoomFailed {
        /// Message for display
        message: String,
    },
    /// Change a room's status; only Available and Occupied are settable
    SetRoomStatus {
        /// Room id
        id: u64,
        /// New status
        status: RoomStatus,
    },
    /// Status call succeeded
    StatusUpdated,
    /// Status call failed
    StatusUpdateFailed {
        /// Message for display
        message: String,
    },
}

/// Admin reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminReducer;

impl AdminReducer {
    fn rooms_effect(env: &ClientEnvironment) -> Effect<AdminAction> {
        let api = env.api.clone();
        Effect::Future(Box::pin(async move {
            match api.rooms().await {
                Ok(rooms) => Some(AdminAction::RoomsLoaded(rooms)),
                Err(_) => Some(AdminAction::FetchFailed),
            }
        }))
    }

    fn reservations_effect(env: &ClientEnvironment) -> Effect<AdminAction> {
        let api = env.api.clone();
        Effect::Future(Box::pin(async move {
            match api.reservations().await {
                Ok(reservations) => Some(AdminAction::ReservationsLoaded(reservations)),
                Err(_) => Some(AdminAction::FetchFailed),
            }
        }))
    }
}

impl Reducer for AdminReducer {
    type State = AdminState;
    type Action = AdminAction;
    type Environment = ClientEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AdminAction::FetchAll => {
                state.is_loading = true;
                smallvec![Effect::Parallel(vec![
                    Self::rooms_effect(env),
                    Self::reservations_effect(env),
                ])]
            },

            AdminAction::RoomsLoaded(rooms) => {
                state.rooms = rooms;
                state.is_loading = false;
                smallvec![Effect::None]
            },

            AdminAction::ReservationsLoaded(reservations) => {
                state.reservations = reservations;
                state.is_loading = false;
                smallvec![Effect::None]
            },

            AdminAction::FetchFailed => {
                state.is_loading = false;
                state.last_error = Some("Failed to fetch data".to_string());
                smallvec![Effect::None]
            },

            AdminAction::SetForm(form) => {
                state.form = form;
                smallvec![Effect::None]
            },

            AdminAction::CreateRoom => {
                // Validation failures never reach the network.
                let room = match state.form.validate() {
                    Ok(room) => room,
                    Err(message) => {
                        state.last_error = Some(message);
                        return smallvec![Effect::None];
                    },
                };

                state.last_error = None;
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.create_room(room).await {
                        Ok(()) => Some(AdminAction::RoomCreated),
                        Err(e) => Some(AdminAction::CreateRoomFailed {
                            message: e.user_message("Failed to add room"),
                        }),
                    }
                }))]
            },

            AdminAction::RoomCreated => {
                tracing::info!("room created");
                state.form = NewRoomForm::default();
                state.last_notice = Some("Room added successfully".to_string());
                state.is_loading = true;
                smallvec![Effect::Parallel(vec![
                    Self::rooms_effect(env),
                    Self::reservations_effect(env),
                ])]
            },

            AdminAction::CreateRoomFailed { message } => {
                state.last_error = Some(message);
                smallvec![Effect::None]
            },

            AdminAction::SetRoomStatus { id, status } => {
                if status == RoomStatus::Maintenance {
                    tracing::warn!(id, "maintenance is not settable from the dashboard");
                    return smallvec![Effect::None];
                }

                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.set_room_status(id, status).await {
                        Ok(()) => Some(AdminAction::StatusUpdated),
                        Err(e) => Some(AdminAction::StatusUpdateFailed {
                            message: e.user_message("Failed to update room status"),
                        }),
                    }
                }))]
            },

            AdminAction::StatusUpdated => {
                state.last_notice = Some("Room status updated successfully".to_string());
                state.is_loading = true;
                smallvec![Effect::Parallel(vec![
                    Self::rooms_effect(env),
                    Self::reservations_effect(env),
                ])]
            },

            AdminAction::StatusUpdateFailed { message } => {
                state.last_error = Some(message);
                smallvec![Effect::None]
            },
        }
    }
}
