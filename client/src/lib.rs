//! # Concierge Client
//!
//! Hotel-booking client over a remote REST API, built in the reducer/effect
//! style: guests search rooms, create reservations and simulate payments;
//! administrators manage room inventory and see every reservation.
//!
//! The client owns no durable state beyond one persisted bearer token; the
//! server is the sole source of truth and every successful mutation is
//! followed by a refetch.
//!
//! ## Features
//!
//! - [`session`] — token persistence, login/registration, identity
//!   bootstrap, pure route guard
//! - [`reservations`] — the reservation lifecycle and mock payment flow
//! - [`rooms`] — room catalog with pure filtering and background refresh
//! - [`admin`] — inventory management and the all-reservations view
//!
//! ## Example
//!
//! ```ignore
//! use concierge_client::config::Config;
//! use concierge_client::environment::ClientEnvironment;
//! use concierge_client::reservations::{ReservationsAction, ReservationsReducer, ReservationsState};
//! use concierge_runtime::Store;
//!
//! let env = ClientEnvironment::live(Config::from_env());
//! let store = Store::new(ReservationsState::default(), ReservationsReducer, env);
//! store.send(ReservationsAction::StartPolling).await?;
//! ```

pub mod admin;
pub mod api;
pub mod config;
pub mod environment;
pub mod error;
pub mod mocks;
pub mod reservations;
pub mod rooms;
pub mod session;
pub mod types;

pub use api::{ApiClient, HttpApiClient};
pub use config::Config;
pub use environment::ClientEnvironment;
pub use error::ApiError;
