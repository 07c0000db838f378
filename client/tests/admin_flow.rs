//! Admin dashboard flows through the store runtime: the parallel
//! initial fetch, room creation, and status changes.

#![allow(clippy::unwrap_used)]

use concierge_client::ClientEnvironment;
use concierge_client::admin::{AdminAction, AdminReducer, AdminState, NewRoomForm};
use concierge_client::mocks::{MockApiClient, test_reservation, test_room};
use concierge_client::types::{PaymentStatus, ReservationStatus, RoomStatus};
use concierge_runtime::Store;
use concierge_testing::{eventually, test_clock};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn admin_store(
    mock: &MockApiClient,
) -> Store<AdminState, AdminAction, ClientEnvironment, AdminReducer> {
    let env = mock.clone().into_environment(Arc::new(test_clock()));
    Store::new(AdminState::default(), AdminReducer, env)
}

fn valid_form() -> NewRoomForm {
    NewRoomForm {
        room_number: "310".to_string(),
        room_type: "Suite".to_string(),
        price: Some(260.0),
        capacity: Some(4),
        amenities: "WiFi, Minibar".to_string(),
        image_url: String::new(),
    }
}

async fn wait_for_both_lists(
    store: &Store<AdminState, AdminAction, ClientEnvironment, AdminReducer>,
) {
    let mut actions = store.subscribe_actions();
    let mut handle = store.send(AdminAction::FetchAll).await.unwrap();
    tokio::time::timeout(WAIT, async {
        let (mut rooms, mut reservations) = (false, false);
        while !(rooms && reservations) {
            match actions.recv().await.unwrap() {
                AdminAction::RoomsLoaded(_) => rooms = true,
                AdminAction::ReservationsLoaded(_) => reservations = true,
                _ => {},
            }
        }
    })
    .await
    .unwrap();
    handle.wait().await;
}

#[tokio::test]
async fn fetch_all_loads_rooms_and_reservations_in_parallel() {
    let mock = MockApiClient::new()
        .with_rooms(vec![test_room(1, "Single", 1), test_room(2, "Double", 2)])
        .with_reservations(vec![test_reservation(
            1,
            ReservationStatus::Confirmed,
            PaymentStatus::Pending,
        )]);
    let store = admin_store(&mock);

    wait_for_both_lists(&store).await;

    store
        .state(|s| {
            assert_eq!(s.rooms.len(), 2);
            assert_eq!(s.reservations.len(), 1);
            assert!(!s.is_loading);
        })
        .await;
    assert_eq!(mock.call_count("GET /rooms"), 1);
    assert_eq!(mock.call_count("GET /reservations"), 1);
}

#[tokio::test]
async fn creating_a_room_clears_the_form_and_refreshes_both_lists() {
    let mock = MockApiClient::new();
    let store = admin_store(&mock);

    let mut handle = store
        .send(AdminAction::SetForm(valid_form()))
        .await
        .unwrap();
    handle.wait().await;

    let outcome = store
        .send_and_wait_for(
            AdminAction::CreateRoom,
            |a| {
                matches!(
                    a,
                    AdminAction::RoomsLoaded(_) | AdminAction::CreateRoomFailed { .. }
                )
            },
            WAIT,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, AdminAction::RoomsLoaded(_)));
    assert!(eventually(&store, WAIT, |s| s.rooms.len() == 1).await);

    store
        .state(|s| {
            assert_eq!(s.rooms[0].room_number, "310");
            assert!(s.form.room_number.is_empty());
            assert_eq!(s.last_notice.as_deref(), Some("Room added successfully"));
        })
        .await;
    assert_eq!(mock.call_count("POST /rooms"), 1);
}

#[tokio::test]
async fn invalid_form_is_rejected_before_the_network() {
    let mock = MockApiClient::new();
    let store = admin_store(&mock);

    let mut handle = store.send(AdminAction::CreateRoom).await.unwrap();
    handle.wait().await;

    store
        .state(|s| {
            assert_eq!(
                s.last_error.as_deref(),
                Some("Please fill in all required fields")
            );
        })
        .await;
    assert_eq!(mock.call_count("POST /rooms"), 0);
}

#[tokio::test]
async fn setting_a_room_occupied_refetches_the_lists() {
    let mock = MockApiClient::new().with_rooms(vec![test_room(1, "Single", 1)]);
    let store = admin_store(&mock);

    let outcome = store
        .send_and_wait_for(
            AdminAction::SetRoomStatus {
                id: 1,
                status: RoomStatus::Occupied,
            },
            |a| {
                matches!(
                    a,
                    AdminAction::RoomsLoaded(_) | AdminAction::StatusUpdateFailed { .. }
                )
            },
            WAIT,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, AdminAction::RoomsLoaded(_)));
    assert!(
        eventually(&store, WAIT, |s| {
            s.rooms.first().is_some_and(|r| r.status == RoomStatus::Occupied)
        })
        .await
    );

    store
        .state(|s| {
            assert_eq!(
                s.last_notice.as_deref(),
                Some("Room status updated successfully")
            );
        })
        .await;
    assert_eq!(mock.call_count("PUT /rooms/1/status"), 1);
}

#[tokio::test]
async fn maintenance_is_not_settable_from_the_dashboard() {
    let mock = MockApiClient::new().with_rooms(vec![test_room(1, "Single", 1)]);
    let store = admin_store(&mock);

    let mut handle = store
        .send(AdminAction::SetRoomStatus {
            id: 1,
            status: RoomStatus::Maintenance,
        })
        .await
        .unwrap();
    handle.wait().await;

    assert_eq!(mock.call_count("PUT /rooms/1/status"), 0);
}
