//! End-to-end reservation flows through the store runtime:
//! book, pay with the simulated gateway, cancel, and compose the
//! post-booking room refresh across stores.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use concierge_client::config::Config;
use concierge_client::error::ApiError;
use concierge_client::mocks::{MockApiClient, test_reservation, test_room};
use concierge_client::reservations::{
    ReservationsAction, ReservationsReducer, ReservationsState,
};
use concierge_client::rooms::{RoomsAction, RoomsReducer, RoomsState};
use concierge_client::types::{
    PaymentMethod, PaymentStatus, ReservationStatus, RoomStatus,
};
use concierge_runtime::Store;
use concierge_testing::{eventually, test_clock};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn fast_config() -> Config {
    Config {
        payment_delay: Duration::from_millis(20),
        poll_interval: Duration::from_millis(50),
        ..Config::default()
    }
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
}

fn card() -> PaymentMethod {
    PaymentMethod::Card {
        number: "4242424242424242".to_string(),
        expiry: "12/27".to_string(),
        cvv: "123".to_string(),
    }
}

type ReservationsStore =
    Store<ReservationsState, ReservationsAction, concierge_client::ClientEnvironment, ReservationsReducer>;

fn reservations_store(mock: &MockApiClient) -> ReservationsStore {
    let env = mock
        .clone()
        .into_environment_with(Arc::new(test_clock()), fast_config());
    Store::new(ReservationsState::default(), ReservationsReducer, env)
}

/// Fetch the list and wait until it lands in state.
async fn load_list(store: &ReservationsStore) {
    store
        .send_and_wait_for(
            ReservationsAction::Fetch,
            |a| matches!(a, ReservationsAction::Loaded(_)),
            WAIT,
        )
        .await
        .unwrap();
    assert!(eventually(store, WAIT, |s| !s.reservations.is_empty()).await);
}

#[tokio::test]
async fn booking_then_card_payment_completes_the_lifecycle() {
    let mock = MockApiClient::new().with_rooms(vec![test_room(12, "Double", 2)]);
    let store = reservations_store(&mock);

    // Book room 12 for June 1-5; success refetches the list.
    let outcome = store
        .send_and_wait_for(
            ReservationsAction::Book {
                user_id: Some(7),
                room_id: 12,
                check_in: Some(june(1)),
                check_out: Some(june(5)),
                price: 120.0,
            },
            |a| {
                matches!(
                    a,
                    ReservationsAction::Loaded(_) | ReservationsAction::BookingFailed { .. }
                )
            },
            WAIT,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, ReservationsAction::Loaded(_)));
    assert!(eventually(&store, WAIT, |s| !s.reservations.is_empty()).await);

    let id = store.state(|s| s.reservations[0].id).await;
    store
        .state(|s| {
            assert_eq!(s.reservations.len(), 1);
            assert_eq!(s.reservations[0].status, ReservationStatus::Confirmed);
            assert_eq!(s.reservations[0].payment_status, PaymentStatus::Pending);
            assert_eq!(s.reservations[0].total_price, 480.0);
            assert!(!s.booking_in_flight);
        })
        .await;

    // Pay by card; the simulated gateway delay runs before the settle call.
    let outcome = store
        .send_and_wait_for(
            ReservationsAction::SubmitPayment {
                reservation_id: id,
                method: card(),
            },
            |a| {
                matches!(
                    a,
                    ReservationsAction::Loaded(_) | ReservationsAction::PaymentFailed { .. }
                )
            },
            WAIT,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, ReservationsAction::Loaded(_)));
    assert!(
        eventually(&store, WAIT, |s| {
            s.reservations[0].payment_status == PaymentStatus::Completed
        })
        .await
    );

    store
        .state(|s| {
            assert!(s.processing_payment.is_none());
            assert_eq!(s.last_notice.as_deref(), Some("Payment processed!"));
        })
        .await;
    assert_eq!(mock.call_count(&format!("POST /reservations/{id}/pay")), 1);
}

#[tokio::test]
async fn empty_upi_id_never_reaches_the_gateway() {
    let mock = MockApiClient::new().with_reservations(vec![test_reservation(
        1,
        ReservationStatus::Confirmed,
        PaymentStatus::Pending,
    )]);
    let store = reservations_store(&mock);
    load_list(&store).await;

    let mut handle = store
        .send(ReservationsAction::SubmitPayment {
            reservation_id: 1,
            method: PaymentMethod::Upi { id: String::new() },
        })
        .await
        .unwrap();
    handle.wait().await;

    store
        .state(|s| {
            assert_eq!(s.last_error.as_deref(), Some("Please enter UPI ID"));
            assert!(s.processing_payment.is_none());
        })
        .await;
    assert_eq!(mock.call_count("POST /reservations/1/pay"), 0);
}

#[tokio::test]
async fn server_rejected_payment_surfaces_detail_and_clears_the_flag() {
    let mock = MockApiClient::new()
        .with_reservations(vec![test_reservation(
            1,
            ReservationStatus::Confirmed,
            PaymentStatus::Pending,
        )])
        .with_payment_failure(ApiError::Status {
            status: 400,
            message: "Reservation already paid".to_string(),
        });
    let store = reservations_store(&mock);
    load_list(&store).await;

    let outcome = store
        .send_and_wait_for(
            ReservationsAction::SubmitPayment {
                reservation_id: 1,
                method: PaymentMethod::Upi {
                    id: "guest@bank".to_string(),
                },
            },
            |a| matches!(a, ReservationsAction::PaymentFailed { .. }),
            WAIT,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, ReservationsAction::PaymentFailed { .. }));
    assert!(eventually(&store, WAIT, |s| s.last_error.is_some()).await);

    store
        .state(|s| {
            assert_eq!(s.last_error.as_deref(), Some("Reservation already paid"));
            assert!(s.processing_payment.is_none());
            // The list is untouched by the failure.
            assert_eq!(s.reservations[0].payment_status, PaymentStatus::Pending);
        })
        .await;
}

#[tokio::test]
async fn cancel_after_payment_freezes_payment_status() {
    let mock = MockApiClient::new().with_reservations(vec![test_reservation(
        1,
        ReservationStatus::Confirmed,
        PaymentStatus::Completed,
    )]);
    let store = reservations_store(&mock);
    load_list(&store).await;

    let outcome = store
        .send_and_wait_for(
            ReservationsAction::Cancel { id: 1 },
            |a| {
                matches!(
                    a,
                    ReservationsAction::Loaded(_) | ReservationsAction::CancelFailed { .. }
                )
            },
            WAIT,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, ReservationsAction::Loaded(_)));
    assert!(
        eventually(&store, WAIT, |s| {
            s.reservations[0].status == ReservationStatus::Cancelled
        })
        .await
    );

    store
        .state(|s| {
            assert_eq!(s.reservations[0].payment_status, PaymentStatus::Completed);
            assert!(s.cancelling.is_none());
        })
        .await;
}

#[tokio::test]
async fn successful_booking_drives_exactly_one_room_refetch() {
    let mock = MockApiClient::new().with_rooms(vec![test_room(12, "Double", 2)]);
    let env = mock
        .clone()
        .into_environment_with(Arc::new(test_clock()), fast_config());

    let reservations = Store::new(
        ReservationsState::default(),
        ReservationsReducer,
        env.clone(),
    );
    let rooms = Store::new(RoomsState::default(), RoomsReducer, env);

    // App-shell composition: observers of the reservations store forward
    // each confirmed booking into a room refresh.
    let mut actions = reservations.subscribe_actions();
    reservations
        .send(ReservationsAction::Book {
            user_id: Some(7),
            room_id: 12,
            check_in: Some(june(1)),
            check_out: Some(june(5)),
            price: 120.0,
        })
        .await
        .unwrap();

    let room_id = tokio::time::timeout(WAIT, async {
        loop {
            if let ReservationsAction::BookingConfirmed { room_id } = actions.recv().await.unwrap()
            {
                return room_id;
            }
        }
    })
    .await
    .unwrap();

    rooms
        .send_and_wait_for(
            RoomsAction::FetchRoom { id: room_id },
            |a| matches!(a, RoomsAction::RoomLoaded(_)),
            WAIT,
        )
        .await
        .unwrap();
    assert!(eventually(&rooms, WAIT, |s| s.selected.is_some()).await);

    rooms
        .state(|s| {
            assert_eq!(s.selected.as_ref().unwrap().status, RoomStatus::Occupied);
        })
        .await;
    assert_eq!(mock.call_count("GET /rooms/12"), 1);
}

#[tokio::test]
async fn refresh_is_idempotent() {
    let mock = MockApiClient::new().with_reservations(vec![test_reservation(
        1,
        ReservationStatus::Confirmed,
        PaymentStatus::Pending,
    )]);
    let store = reservations_store(&mock);

    load_list(&store).await;
    load_list(&store).await;

    assert!(eventually(&store, WAIT, |s| !s.is_loading).await);
    store.state(|s| assert_eq!(s.reservations.len(), 1)).await;
    assert_eq!(mock.call_count("GET /reservations"), 2);
}

#[tokio::test]
async fn polling_refetches_until_stopped() {
    let mock = MockApiClient::new();
    let store = reservations_store(&mock);

    store
        .send_and_wait_for(
            ReservationsAction::StartPolling,
            |a| matches!(a, ReservationsAction::Loaded(_)),
            WAIT,
        )
        .await
        .unwrap();

    // Let at least one timer generation fire, then stop.
    tokio::time::sleep(Duration::from_millis(120)).await;
    let mut handle = store.send(ReservationsAction::StopPolling).await.unwrap();
    handle.wait().await;

    let fetches = mock.call_count("GET /reservations");
    assert!(fetches >= 2, "expected the timer to refetch, saw {fetches}");

    // After teardown the remaining tick is stale and fetches stop.
    tokio::time::sleep(Duration::from_millis(150)).await;
    let after = mock.call_count("GET /reservations");
    assert!(
        after <= fetches + 1,
        "fetches kept arriving after StopPolling: {after} > {fetches} + 1"
    );
    store.state(|s| assert!(!s.polling)).await;
}
