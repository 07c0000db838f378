//! Mock implementations for tests and development.
//!
//! [`MockApiClient`] is a tiny in-memory booking server: mutations update
//! its scripted data the way the real server would, so flows that mutate
//! and then refetch observe the expected transitions. Every call is
//! recorded for assertions.

use crate::api::{ApiClient, ApiFuture};
use crate::config::Config;
use crate::environment::ClientEnvironment;
use crate::error::ApiError;
use crate::session::TokenStore;
use crate::types::{
    AuthResponse, NewReservation, NewRoom, Payment, PaymentRecordStatus, PaymentStatus,
    Registration, Reservation, ReservationStatus, Role, Room, RoomStatus, User,
};
use chrono::{NaiveDate, Utc};
use concierge_core::environment::Clock;
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory token store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a token already persisted.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[derive(Debug, Default)]
struct MockApiState {
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
    payments: Vec<Payment>,
    user: Option<User>,
    /// When set, payment calls fail with this error
    pay_error: Option<ApiError>,
    /// When set, list fetches fail with this error
    fetch_error: Option<ApiError>,
    next_reservation_id: u64,
    next_room_id: u64,
    calls: Vec<String>,
}

/// Scriptable in-memory API client.
#[derive(Debug, Clone, Default)]
pub struct MockApiClient {
    inner: Arc<Mutex<MockApiState>>,
}

impl MockApiClient {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockApiState {
                next_reservation_id: 1,
                next_room_id: 1,
                ..MockApiState::default()
            })),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockApiState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed the room list.
    #[must_use]
    pub fn with_rooms(self, rooms: Vec<Room>) -> Self {
        {
            let mut state = self.state();
            state.next_room_id = rooms.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            state.rooms = rooms;
        }
        self
    }

    /// Seed the reservation list.
    #[must_use]
    pub fn with_reservations(self, reservations: Vec<Reservation>) -> Self {
        {
            let mut state = self.state();
            state.next_reservation_id =
                reservations.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            state.reservations = reservations;
        }
        self
    }

    /// Seed the authenticated identity; login then succeeds with any
    /// credentials and `me` resolves to this user.
    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        self.state().user = Some(user);
        self
    }

    /// Script payment calls to fail.
    #[must_use]
    pub fn with_payment_failure(self, error: ApiError) -> Self {
        self.state().pay_error = Some(error);
        self
    }

    /// Script list fetches to fail.
    #[must_use]
    pub fn with_fetch_failure(self, error: ApiError) -> Self {
        self.state().fetch_error = Some(error);
        self
    }

    /// Every call recorded so far, as `"METHOD path"` strings.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of recorded calls matching the given prefix.
    #[must_use]
    pub fn call_count(&self, prefix: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Current reservation list (for asserting server-side transitions).
    #[must_use]
    pub fn server_reservations(&self) -> Vec<Reservation> {
        self.state().reservations.clone()
    }

    /// Wrap this mock into a full test environment.
    #[must_use]
    pub fn into_environment(self, clock: Arc<dyn Clock>) -> ClientEnvironment {
        self.into_environment_with(clock, Config::default())
    }

    /// Wrap this mock into a test environment with a custom config
    /// (shorter delays, different poll interval).
    #[must_use]
    pub fn into_environment_with(self, clock: Arc<dyn Clock>, config: Config) -> ClientEnvironment {
        ClientEnvironment {
            api: Arc::new(self),
            tokens: Arc::new(MemoryTokenStore::new()),
            clock,
            config,
        }
    }
}

impl ApiClient for MockApiClient {
    fn login(&self, email: String, _password: String) -> ApiFuture<AuthResponse> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push("POST /auth/login".to_string());
            if state.user.as_ref().is_some_and(|u| u.email == email) {
                Ok(AuthResponse {
                    access_token: "test-token".to_string(),
                    token_type: "bearer".to_string(),
                })
            } else {
                Err(ApiError::Status {
                    status: 401,
                    message: "Invalid credentials".to_string(),
                })
            }
        })
    }

    fn register(&self, _registration: Registration) -> ApiFuture<()> {
        let this = self.clone();
        Box::pin(async move {
            this.state().calls.push("POST /auth/register".to_string());
            Ok(())
        })
    }

    fn me(&self) -> ApiFuture<User> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push("GET /auth/me".to_string());
            state.user.clone().ok_or(ApiError::Status {
                status: 401,
                message: "Not authenticated".to_string(),
            })
        })
    }

    fn rooms(&self) -> ApiFuture<Vec<Room>> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push("GET /rooms".to_string());
            match &state.fetch_error {
                Some(e) => Err(e.clone()),
                None => Ok(state.rooms.clone()),
            }
        })
    }

    fn room(&self, id: u64) -> ApiFuture<Room> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push(format!("GET /rooms/{id}"));
            state
                .rooms
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or(ApiError::Status {
                    status: 404,
                    message: "Room not found".to_string(),
                })
        })
    }

    fn create_room(&self, room: NewRoom) -> ApiFuture<()> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push("POST /rooms".to_string());
            let id = state.next_room_id;
            state.next_room_id += 1;
            state.rooms.push(Room {
                id,
                room_number: room.room_number,
                room_type: room.room_type,
                price: room.price,
                capacity: room.capacity,
                amenities: room.amenities,
                status: RoomStatus::Available,
                image_url: room.image_url,
            });
            Ok(())
        })
    }

    fn set_room_status(&self, id: u64, status: RoomStatus) -> ApiFuture<()> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push(format!("PUT /rooms/{id}/status"));
            match state.rooms.iter_mut().find(|r| r.id == id) {
                Some(room) => {
                    room.status = status;
                    Ok(())
                },
                None => Err(ApiError::Status {
                    status: 404,
                    message: "Room not found".to_string(),
                }),
            }
        })
    }

    fn reservations(&self) -> ApiFuture<Vec<Reservation>> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push("GET /reservations".to_string());
            match &state.fetch_error {
                Some(e) => Err(e.clone()),
                None => Ok(state.reservations.clone()),
            }
        })
    }

    fn create_reservation(&self, reservation: NewReservation) -> ApiFuture<()> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push("POST /reservations".to_string());

            let nights = (reservation.check_out_date - reservation.check_in_date).num_days();
            let id = state.next_reservation_id;
            state.next_reservation_id += 1;

            let room_number = state
                .rooms
                .iter()
                .find(|r| r.id == reservation.room_id)
                .map(|r| r.room_number.clone());
            if let Some(room) = state
                .rooms
                .iter_mut()
                .find(|r| r.id == reservation.room_id)
            {
                room.status = RoomStatus::Occupied;
            }

            #[allow(clippy::cast_precision_loss)]
            state.reservations.push(Reservation {
                id,
                user_id: reservation.user_id,
                room_id: reservation.room_id,
                check_in_date: reservation.check_in_date,
                check_out_date: reservation.check_out_date,
                total_price: reservation.price * nights as f64,
                status: ReservationStatus::Confirmed,
                payment_status: PaymentStatus::Pending,
                created_at: Utc::now(),
                room_number,
                user_name: None,
                user_phone: None,
            });
            Ok(())
        })
    }

    fn pay_reservation(&self, id: u64) -> ApiFuture<()> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push(format!("POST /reservations/{id}/pay"));

            if let Some(e) = &state.pay_error {
                return Err(e.clone());
            }

            let Some(index) = state.reservations.iter().position(|r| r.id == id) else {
                return Err(ApiError::Status {
                    status: 404,
                    message: "Reservation not found".to_string(),
                });
            };
            let (amount, already_paid, cancelled) = {
                let r = &state.reservations[index];
                (
                    r.total_price,
                    r.payment_status == PaymentStatus::Completed,
                    r.status == ReservationStatus::Cancelled,
                )
            };
            if already_paid {
                return Err(ApiError::Status {
                    status: 400,
                    message: "Reservation already paid".to_string(),
                });
            }
            if cancelled {
                return Err(ApiError::Status {
                    status: 400,
                    message: "Reservation is cancelled".to_string(),
                });
            }

            state.reservations[index].payment_status = PaymentStatus::Completed;
            state.payments.push(Payment {
                reservation_id: id,
                amount,
                payment_method: "card".to_string(),
                transaction_id: format!("txn_{}", uuid::Uuid::new_v4()),
                status: PaymentRecordStatus::Completed,
                created_at: Utc::now(),
            });
            Ok(())
        })
    }

    fn cancel_reservation(&self, id: u64) -> ApiFuture<()> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state.calls.push(format!("DELETE /reservations/{id}"));

            let Some(index) = state.reservations.iter().position(|r| r.id == id) else {
                return Err(ApiError::Status {
                    status: 404,
                    message: "Reservation not found".to_string(),
                });
            };
            if state.reservations[index].status == ReservationStatus::Cancelled {
                return Err(ApiError::Status {
                    status: 400,
                    message: "Reservation is already cancelled".to_string(),
                });
            }

            // payment_status stays frozen at whatever it was.
            state.reservations[index].status = ReservationStatus::Cancelled;
            Ok(())
        })
    }

    fn payments(&self, reservation_id: u64) -> ApiFuture<Vec<Payment>> {
        let this = self.clone();
        Box::pin(async move {
            let mut state = this.state();
            state
                .calls
                .push(format!("GET /payments?reservation_id={reservation_id}"));
            Ok(state
                .payments
                .iter()
                .filter(|p| p.reservation_id == reservation_id)
                .cloned()
                .collect())
        })
    }
}

/// Fixture: a user with the given role.
#[must_use]
pub fn test_user(role: Role) -> User {
    User {
        id: 7,
        email: "guest@example.com".to_string(),
        full_name: "Test Guest".to_string(),
        role,
        contact_number: "+1 555 0100".to_string(),
        created_at: Utc::now(),
    }
}

/// Fixture: an available room.
#[must_use]
pub fn test_room(id: u64, room_type: &str, capacity: u32) -> Room {
    Room {
        id,
        room_number: format!("{}{id:02}", capacity),
        room_type: room_type.to_string(),
        price: 120.0,
        capacity,
        amenities: "WiFi, AC".to_string(),
        status: RoomStatus::Available,
        image_url: None,
    }
}

/// Fixture: a reservation for room 12, June 1-5.
///
/// # Panics
///
/// Never; the dates are valid constants.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn test_reservation(
    id: u64,
    status: ReservationStatus,
    payment_status: PaymentStatus,
) -> Reservation {
    #[allow(clippy::unwrap_used)]
    let (check_in, check_out) = (
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
    );
    Reservation {
        id,
        user_id: 7,
        room_id: 12,
        check_in_date: check_in,
        check_out_date: check_out,
        total_price: 480.0,
        status,
        payment_status,
        created_at: Utc::now(),
        room_number: Some("204".to_string()),
        user_name: None,
        user_phone: None,
    }
}
