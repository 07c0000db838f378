//! Domain types shared across the booking client.
//!
//! These mirror the server's wire format: status enums serialize lowercase,
//! reservation dates travel as `YYYY-MM-DD` strings, timestamps as RFC 3339.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned account id
    pub id: u64,
    /// Login email
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Access level
    pub role: Role,
    /// Contact phone number
    pub contact_number: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Account access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full inventory and reservation visibility
    Admin,
    /// Regular guest account
    User,
}

/// A bookable room as exposed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Server-assigned room id
    pub id: u64,
    /// Human-readable room number (e.g. "204")
    pub room_number: String,
    /// Category label ("Single", "Double", "Suite")
    pub room_type: String,
    /// Price per night
    pub price: f64,
    /// Maximum number of guests
    pub capacity: u32,
    /// Free-form amenities description
    pub amenities: String,
    /// Current availability
    pub status: RoomStatus,
    /// Optional photo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Room availability as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Open for booking
    Available,
    /// Currently booked
    Occupied,
    /// Taken out of service
    Maintenance,
}

/// A reservation row as returned by the server.
///
/// `room_number`, `user_name`, and `user_phone` are denormalized columns
/// the server joins in for display; they may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Server-assigned reservation id
    pub id: u64,
    /// Owning account id
    pub user_id: u64,
    /// Booked room id
    pub room_id: u64,
    /// First night
    pub check_in_date: NaiveDate,
    /// Morning of departure (exclusive)
    pub check_out_date: NaiveDate,
    /// Total price for the stay
    pub total_price: f64,
    /// Booking status
    pub status: ReservationStatus,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Joined room number, when the server provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    /// Joined guest name, when the server provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Joined guest phone, when the server provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
}

impl Reservation {
    /// A reservation can be paid while it is confirmed and still unpaid.
    #[must_use]
    pub fn is_payable(&self) -> bool {
        self.status == ReservationStatus::Confirmed
            && self.payment_status == PaymentStatus::Pending
    }

    /// A reservation can be cancelled while it is confirmed. Cancelling
    /// freezes `payment_status` at whatever it was.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }
}

/// Booking status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Active booking
    Confirmed,
    /// Terminal state; no further transitions
    Cancelled,
}

/// Payment status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not yet paid
    Pending,
    /// Paid in full
    Completed,
}

/// A payment record; read-only projection served by the payments endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// The reservation this payment belongs to
    pub reservation_id: u64,
    /// Amount charged
    pub amount: f64,
    /// Method label recorded by the server ("card", "upi")
    pub payment_method: String,
    /// Gateway transaction id
    pub transaction_id: String,
    /// Record status
    pub status: PaymentRecordStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Status of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordStatus {
    /// Initiated but not settled
    Pending,
    /// Settled
    Completed,
    /// Refunded after settlement
    Refunded,
}

/// Payment instrument captured by the payment form.
///
/// Validation is shape-only: all fields present. No checksum or expiry
/// parsing happens client-side; the gateway is simulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Card payment
    Card {
        /// Card number
        number: String,
        /// Expiry, `MM/YY`
        expiry: String,
        /// Security code
        cvv: String,
    },
    /// UPI payment
    Upi {
        /// UPI handle, e.g. `username@bank`
        id: String,
    },
}

impl PaymentMethod {
    /// Check that the instrument is complete.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message for the missing input.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            Self::Card { number, expiry, cvv } => {
                if number.trim().is_empty() || expiry.trim().is_empty() || cvv.trim().is_empty() {
                    Err("Please fill in all card details")
                } else {
                    Ok(())
                }
            },
            Self::Upi { id } => {
                if id.trim().is_empty() {
                    Err("Please enter UPI ID")
                } else {
                    Ok(())
                }
            },
        }
    }

    /// Method label as recorded by the server.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Card { .. } => "card",
            Self::Upi { .. } => "upi",
        }
    }
}

/// Response body of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub access_token: String,
    /// Token scheme, always "bearer"
    pub token_type: String,
}

/// Request body for creating a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReservation {
    /// Booking account id
    pub user_id: u64,
    /// Room to book
    pub room_id: u64,
    /// First night
    pub check_in_date: NaiveDate,
    /// Morning of departure
    pub check_out_date: NaiveDate,
    /// Nightly price quoted at booking time
    pub price: f64,
}

/// Request body for creating a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoom {
    /// Human-readable room number
    pub room_number: String,
    /// Category label
    pub room_type: String,
    /// Price per night, non-negative
    pub price: f64,
    /// Maximum number of guests, at least 1
    pub capacity: u32,
    /// Free-form amenities description
    pub amenities: String,
    /// Optional photo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Request body for account registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
    /// Display name
    pub full_name: String,
    /// Contact phone number
    pub contact_number: String,
}
