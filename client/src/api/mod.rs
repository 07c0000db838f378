//! Remote API boundary.
//!
//! [`ApiClient`] abstracts the booking server behind one method per remote
//! operation so reducers can run against the real HTTP adapter or an
//! in-memory mock. Methods return boxed futures to keep the trait dyn-safe;
//! effects hold the client as `Arc<dyn ApiClient>`.

use crate::error::ApiError;
use crate::types::{
    AuthResponse, NewReservation, NewRoom, Payment, Registration, Reservation, Room, RoomStatus,
    User,
};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;

pub mod http;

pub use http::HttpApiClient;

/// Boxed future returned by every [`ApiClient`] method.
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send>>;

/// One method per remote operation.
///
/// Implementations must not retry; a failure (including 401) is surfaced
/// to the caller unchanged.
pub trait ApiClient: Send + Sync {
    /// `POST /auth/login` — exchange credentials for a bearer token.
    fn login(&self, email: String, password: String) -> ApiFuture<AuthResponse>;

    /// `POST /auth/register` — create an account.
    fn register(&self, registration: Registration) -> ApiFuture<()>;

    /// `GET /auth/me` — resolve the current identity from the stored token.
    fn me(&self) -> ApiFuture<User>;

    /// `GET /rooms` — list rooms.
    fn rooms(&self) -> ApiFuture<Vec<Room>>;

    /// `GET /rooms/:id` — fetch one room.
    fn room(&self, id: u64) -> ApiFuture<Room>;

    /// `POST /rooms` — create a room (admin).
    fn create_room(&self, room: NewRoom) -> ApiFuture<()>;

    /// `PUT /rooms/:id/status` — set a room's status (admin).
    fn set_room_status(&self, id: u64, status: RoomStatus) -> ApiFuture<()>;

    /// `GET /reservations` — list reservations visible to the caller
    /// (own reservations for guests, all for admins).
    fn reservations(&self) -> ApiFuture<Vec<Reservation>>;

    /// `POST /reservations` — create a reservation.
    fn create_reservation(&self, reservation: NewReservation) -> ApiFuture<()>;

    /// `POST /reservations/:id/pay` — settle a pending payment.
    fn pay_reservation(&self, id: u64) -> ApiFuture<()>;

    /// `DELETE /reservations/:id` — cancel a reservation.
    fn cancel_reservation(&self, id: u64) -> ApiFuture<()>;

    /// `GET /payments?reservation_id=:id` — payment records for a reservation.
    fn payments(&self, reservation_id: u64) -> ApiFuture<Vec<Payment>>;
}

/// List endpoints answer either a wrapped object (`{"rooms": [...]}`) or a
/// bare array depending on server version. These untagged enums normalize
/// both shapes at the adapter boundary; reducers only ever see `Vec<T>`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RoomsEnvelope {
    /// `{"rooms": [...]}`
    Wrapped {
        /// The wrapped list
        rooms: Vec<Room>,
    },
    /// Bare `[...]`
    Bare(Vec<Room>),
}

impl RoomsEnvelope {
    /// Unwrap to the room list.
    #[must_use]
    pub fn into_rooms(self) -> Vec<Room> {
        match self {
            Self::Wrapped { rooms } | Self::Bare(rooms) => rooms,
        }
    }
}

/// Single-room envelope for `GET /rooms/:id` (`{"room": {...}}` or bare).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RoomEnvelope {
    /// `{"room": {...}}`
    Wrapped {
        /// The wrapped room
        room: Room,
    },
    /// Bare object
    Bare(Room),
}

impl RoomEnvelope {
    /// Unwrap to the room.
    #[must_use]
    pub fn into_room(self) -> Room {
        match self {
            Self::Wrapped { room } | Self::Bare(room) => room,
        }
    }
}

/// Envelope for `GET /reservations`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReservationsEnvelope {
    /// `{"reservations": [...]}`
    Wrapped {
        /// The wrapped list
        reservations: Vec<Reservation>,
    },
    /// Bare `[...]`
    Bare(Vec<Reservation>),
}

impl ReservationsEnvelope {
    /// Unwrap to the reservation list.
    #[must_use]
    pub fn into_reservations(self) -> Vec<Reservation> {
        match self {
            Self::Wrapped { reservations } | Self::Bare(reservations) => reservations,
        }
    }
}

/// Envelope for `GET /payments`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PaymentsEnvelope {
    /// `{"payments": [...]}`
    Wrapped {
        /// The wrapped list
        payments: Vec<Payment>,
    },
    /// Bare `[...]`
    Bare(Vec<Payment>),
}

impl PaymentsEnvelope {
    /// Unwrap to the payment list.
    #[must_use]
    pub fn into_payments(self) -> Vec<Payment> {
        match self {
            Self::Wrapped { payments } | Self::Bare(payments) => payments,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const RESERVATION: &str = r#"{
        "id": 1, "user_id": 7, "room_id": 12,
        "check_in_date": "2026-06-01", "check_out_date": "2026-06-05",
        "total_price": 480.0, "status": "confirmed", "payment_status": "pending",
        "created_at": "2026-05-20T10:00:00Z"
    }"#;

    #[test]
    fn reservations_parse_from_wrapped_object() {
        let body = format!(r#"{{"reservations": [{RESERVATION}]}}"#);
        let envelope: ReservationsEnvelope = serde_json::from_str(&body).unwrap();
        let list = envelope.into_reservations();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 1);
    }

    #[test]
    fn reservations_parse_from_bare_array() {
        let body = format!("[{RESERVATION}]");
        let envelope: ReservationsEnvelope = serde_json::from_str(&body).unwrap();
        assert_eq!(envelope.into_reservations().len(), 1);
    }

    #[test]
    fn rooms_parse_from_both_shapes() {
        let room = r#"{
            "id": 12, "room_number": "204", "room_type": "Double",
            "price": 120.0, "capacity": 2, "amenities": "WiFi", "status": "available"
        }"#;

        let wrapped: RoomsEnvelope =
            serde_json::from_str(&format!(r#"{{"rooms": [{room}]}}"#)).unwrap();
        assert_eq!(wrapped.into_rooms().len(), 1);

        let bare: RoomsEnvelope = serde_json::from_str(&format!("[{room}]")).unwrap();
        assert_eq!(bare.into_rooms()[0].room_number, "204");

        let single: RoomEnvelope = serde_json::from_str(&format!(r#"{{"room": {room}}}"#)).unwrap();
        assert_eq!(single.into_room().id, 12);
    }

    #[test]
    fn empty_bare_list_is_accepted() {
        let envelope: PaymentsEnvelope = serde_json::from_str("[]").unwrap();
        assert!(envelope.into_payments().is_empty());
    }
}
