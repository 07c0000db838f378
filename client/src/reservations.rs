//! Reservation lifecycle and mock payment flow.
//!
//! This is the heart of the client. Per-reservation transitions:
//!
//! ```text
//! (create) -> Confirmed+Pending -> (pay)    -> Confirmed+Completed
//!                               -> (cancel) -> Cancelled (payment frozen)
//! ```
//!
//! The server is the sole source of truth: every successful mutation is
//! followed by a refetch rather than an optimistic update. Payment is
//! simulated with a configured gateway delay before the settle call.

use crate::environment::ClientEnvironment;
use crate::types::{NewReservation, Payment, PaymentMethod, Reservation};
use chrono::NaiveDate;
use concierge_core::effect::Effect;
use concierge_core::reducer::Reducer;
use concierge_core::{SmallVec, smallvec};

/// Reservation list state.
#[derive(Debug, Clone, Default)]
pub struct ReservationsState {
    /// Reservations in server order
    pub reservations: Vec<Reservation>,
    /// A list fetch is in flight
    pub is_loading: bool,
    /// Reservation id with a payment in flight, if any
    pub processing_payment: Option<u64>,
    /// Reservation id with a cancellation in flight, if any
    pub cancelling: Option<u64>,
    /// A create call is in flight
    pub booking_in_flight: bool,
    /// Background refresh is active
    pub polling: bool,
    /// Timer generation; a tick from an older generation is discarded
    pub poll_epoch: u64,
    /// Payment records for the last-inspected reservation
    pub payment_details: Vec<Payment>,
    /// A payment-details fetch is in flight
    pub details_loading: bool,
    /// Last failure message for display
    pub last_error: Option<String>,
    /// Last success notice for display
    pub last_notice: Option<String>,
}

impl ReservationsState {
    /// Look up a reservation by id.
    #[must_use]
    pub fn reservation(&self, id: u64) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }
}

/// Reservation actions: user intents plus effect completions.
#[derive(Debug, Clone)]
pub enum ReservationsAction {
    /// Fetch the reservation list
    Fetch,
    /// Fetch the list and surface a refresh notice
    Refresh,
    /// List arrived
    Loaded(Vec<Reservation>),
    /// List fetch failed
    FetchFailed {
        /// Message for display
        message: String,
    },
    /// Create a reservation
    Book {
        /// The authenticated account id; `None` means not logged in
        user_id: Option<u64>,
        /// Room to book
        room_id: u64,
        /// First night
        check_in: Option<NaiveDate>,
        /// Morning of departure
        check_out: Option<NaiveDate>,
        /// Nightly price quoted by the room view
        price: f64,
    },
    /// Create call succeeded
    BookingConfirmed {
        /// Booked room, so observers can refresh its status
        room_id: u64,
    },
    /// Create call failed
    BookingFailed {
        /// Message for display
        message: String,
    },
    /// Start a payment: validate the instrument, then wait out the
    /// simulated gateway delay
    SubmitPayment {
        /// Reservation to pay
        reservation_id: u64,
        /// Instrument from the payment form
        method: PaymentMethod,
    },
    /// Gateway delay elapsed; settle with the server
    ProcessPayment {
        /// Reservation being paid
        reservation_id: u64,
    },
    /// Settle call succeeded
    PaymentSucceeded {
        /// Reservation that was paid
        reservation_id: u64,
    },
    /// Settle call failed (including "already paid" from another session)
    PaymentFailed {
        /// Reservation whose payment failed
        reservation_id: u64,
        /// Message for display
        message: String,
    },
    /// Cancel a reservation; the caller has already confirmed the intent
    Cancel {
        /// Reservation to cancel
        id: u64,
    },
    /// Cancel call succeeded
    CancelSucceeded {
        /// Cancelled reservation
        id: u64,
    },
    /// Cancel call failed
    CancelFailed {
        /// Reservation whose cancel failed
        id: u64,
        /// Message for display
        message: String,
    },
    /// Fetch payment records for a completed reservation
    FetchPaymentDetails {
        /// Reservation to inspect
        reservation_id: u64,
    },
    /// Payment records arrived
    PaymentDetailsLoaded(Vec<Payment>),
    /// Payment records fetch failed
    PaymentDetailsFailed {
        /// Message for display
        message: String,
    },
    /// Begin background refresh: fetch now and arm the timer
    StartPolling,
    /// Timer fired
    Tick {
        /// Generation the timer was armed in
        epoch: u64,
    },
    /// Stop background refresh (view teardown)
    StopPolling,
}

/// Reservation lifecycle reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationsReducer;

impl ReservationsReducer {
    fn fetch_effect(env: &ClientEnvironment) -> Effect<ReservationsAction> {
        let api = env.api.clone();
        Effect::Future(Box::pin(async move {
            match api.reservations().await {
                Ok(list) => Some(ReservationsAction::Loaded(list)),
                Err(e) => Some(ReservationsAction::FetchFailed {
                    message: e.user_message("Failed to fetch reservations"),
                }),
            }
        }))
    }

    fn tick_effect(
        env: &ClientEnvironment,
        epoch: u64,
    ) -> Effect<ReservationsAction> {
        Effect::Delay {
            duration: env.config.poll_interval,
            action: Box::new(ReservationsAction::Tick { epoch }),
        }
    }
}

impl Reducer for ReservationsReducer {
    type State = ReservationsState;
    type Action = ReservationsAction;
    type Environment = ClientEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ReservationsAction::Fetch => {
                state.is_loading = true;
                smallvec![Self::fetch_effect(env)]
            },

            ReservationsAction::Refresh => {
                state.is_loading = true;
                state.last_notice = Some("Reservations refreshed".to_string());
                smallvec![Self::fetch_effect(env)]
            },

            ReservationsAction::Loaded(reservations) => {
                // Server order is preserved as-is.
                state.reservations = reservations;
                state.is_loading = false;
                smallvec![Effect::None]
            },

            ReservationsAction::FetchFailed { message } => {
                state.is_loading = false;
                state.last_error = Some(message);
                smallvec![Effect::None]
            },

            ReservationsAction::Book {
                user_id,
                room_id,
                check_in,
                check_out,
                price,
            } => {
                // All validation happens before any network call.
                let Some(user_id) = user_id else {
                    state.last_error = Some("Please login to make a reservation".to_string());
                    return smallvec![Effect::None];
                };
                let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
                    state.last_error =
                        Some("Please select check-in and check-out dates".to_string());
                    return smallvec![Effect::None];
                };
                if check_in >= check_out {
                    state.last_error =
                        Some("Check-out date must be after check-in date".to_string());
                    return smallvec![Effect::None];
                }
                if check_in < env.clock.now().date_naive() {
                    state.last_error = Some("Check-in date cannot be in the past".to_string());
                    return smallvec![Effect::None];
                }

                state.booking_in_flight = true;
                state.last_error = None;
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    let request = NewReservation {
                        user_id,
                        room_id,
                        check_in_date: check_in,
                        check_out_date: check_out,
                        price,
                    };
                    match api.create_reservation(request).await {
                        Ok(()) => Some(ReservationsAction::BookingConfirmed { room_id }),
                        Err(e) => Some(ReservationsAction::BookingFailed {
                            message: e.user_message("Failed to create reservation"),
                        }),
                    }
                }))]
            },

            ReservationsAction::BookingConfirmed { room_id } => {
                tracing::info!(room_id, "reservation created");
                state.booking_in_flight = false;
                state.last_notice = Some("Reservation created successfully!".to_string());
                // The room refetch is driven by observers of this action at
                // the store-composition layer; here the reservation list is
                // refreshed from the server.
                state.is_loading = true;
                smallvec![Self::fetch_effect(env)]
            },

            ReservationsAction::BookingFailed { message } => {
                state.booking_in_flight = false;
                state.last_error = Some(message);
                smallvec![Effect::None]
            },

            ReservationsAction::SubmitPayment {
                reservation_id,
                method,
            } => {
                let Some(reservation) = state.reservation(reservation_id) else {
                    tracing::warn!(reservation_id, "payment for unknown reservation ignored");
                    return smallvec![Effect::None];
                };
                if !reservation.is_payable() {
                    tracing::warn!(reservation_id, "payment for non-payable reservation ignored");
                    return smallvec![Effect::None];
                }
                if let Err(message) = method.validate() {
                    state.last_error = Some(message.to_string());
                    return smallvec![Effect::None];
                }
                if state.processing_payment.is_some() {
                    tracing::warn!(reservation_id, "payment already in flight, ignored");
                    return smallvec![Effect::None];
                }

                tracing::debug!(reservation_id, method = method.label(), "payment started");
                state.processing_payment = Some(reservation_id);
                state.last_error = None;
                // Simulated gateway: hold the processing state for the
                // configured delay, then settle.
                smallvec![Effect::Delay {
                    duration: env.config.payment_delay,
                    action: Box::new(ReservationsAction::ProcessPayment { reservation_id }),
                }]
            },

            ReservationsAction::ProcessPayment { reservation_id } => {
                // Stale timer: the flag was cleared or moved since the delay
                // was armed.
                if state.processing_payment != Some(reservation_id) {
                    return smallvec![Effect::None];
                }

                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.pay_reservation(reservation_id).await {
                        Ok(()) => Some(ReservationsAction::PaymentSucceeded { reservation_id }),
                        Err(e) => Some(ReservationsAction::PaymentFailed {
                            reservation_id,
                            message: e.user_message("Payment failed. Please try again."),
                        }),
                    }
                }))]
            },

            ReservationsAction::PaymentSucceeded { reservation_id } => {
                tracing::info!(reservation_id, "payment settled");
                // Both completion paths clear the flag unconditionally.
                state.processing_payment = None;
                state.last_notice = Some("Payment processed!".to_string());
                state.is_loading = true;
                smallvec![Self::fetch_effect(env)]
            },

            ReservationsAction::PaymentFailed {
                reservation_id,
                message,
            } => {
                tracing::warn!(reservation_id, %message, "payment failed");
                state.processing_payment = None;
                state.last_error = Some(message);
                smallvec![Effect::None]
            },

            ReservationsAction::Cancel { id } => {
                let Some(reservation) = state.reservation(id) else {
                    tracing::warn!(id, "cancel for unknown reservation ignored");
                    return smallvec![Effect::None];
                };
                if !reservation.is_cancellable() {
                    tracing::warn!(id, "cancel for non-cancellable reservation ignored");
                    return smallvec![Effect::None];
                }

                state.cancelling = Some(id);
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.cancel_reservation(id).await {
                        Ok(()) => Some(ReservationsAction::CancelSucceeded { id }),
                        Err(e) => Some(ReservationsAction::CancelFailed {
                            id,
                            message: e.user_message("Failed to cancel reservation"),
                        }),
                    }
                }))]
            },

            ReservationsAction::CancelSucceeded { id } => {
                tracing::info!(id, "reservation cancelled");
                state.cancelling = None;
                state.last_notice = Some("Reservation cancelled successfully".to_string());
                state.is_loading = true;
                smallvec![Self::fetch_effect(env)]
            },

            ReservationsAction::CancelFailed { id, message } => {
                tracing::warn!(id, %message, "cancel failed");
                state.cancelling = None;
                state.last_error = Some(message);
                smallvec![Effect::None]
            },

            ReservationsAction::FetchPaymentDetails { reservation_id } => {
                let completed = state
                    .reservation(reservation_id)
                    .is_some_and(|r| r.payment_status == crate::types::PaymentStatus::Completed);
                if !completed {
                    tracing::warn!(reservation_id, "details requested before payment completed");
                    return smallvec![Effect::None];
                }

                state.details_loading = true;
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.payments(reservation_id).await {
                        Ok(payments) => {
                            Some(ReservationsAction::PaymentDetailsLoaded(payments))
                        },
                        Err(e) => Some(ReservationsAction::PaymentDetailsFailed {
                            message: e.user_message("Failed to load payment details"),
                        }),
                    }
                }))]
            },

            ReservationsAction::PaymentDetailsLoaded(payments) => {
                state.payment_details = payments;
                state.details_loading = false;
                smallvec![Effect::None]
            },

            ReservationsAction::PaymentDetailsFailed { message } => {
                state.details_loading = false;
                state.last_error = Some(message);
                smallvec![Effect::None]
            },

            ReservationsAction::StartPolling => {
                state.poll_epoch = state.poll_epoch.wrapping_add(1);
                state.polling = true;
                state.is_loading = true;
                smallvec![
                    Self::fetch_effect(env),
                    Self::tick_effect(env, state.poll_epoch),
                ]
            },

            ReservationsAction::Tick { epoch } => {
                if !state.polling || epoch != state.poll_epoch {
                    // Stale timer from a previous generation or a stopped view.
                    return smallvec![Effect::None];
                }
                state.is_loading = true;
                smallvec![
                    Self::fetch_effect(env),
                    Self::tick_effect(env, epoch),
                ]
            },

            ReservationsAction::StopPolling => {
                state.polling = false;
                smallvec![Effect::None]
            },
        }
    }
}
