//! Booking lifecycle tests over the in-memory store.

mod common;

use std::sync::Arc;

use readygo_core::error::ErrorKind;
use readygo_core::types::UserId;
use readygo_database::store::{BookingStore, Stores};
use readygo_entity::booking::{BookingStatus, CreateBooking};
use readygo_service::booking::CreateBookingRequest;
use readygo_service::review::FeedbackRequest;

use common::*;

#[tokio::test]
async fn test_rental_round_trip_with_feedback() {
    let (app, media) = TestServices::new();
    let vehicle = app.seed_vehicle(500).await;
    let renter = customer();
    let owner = as_owner(vehicle.owner_id);

    let booking = app
        .bookings
        .create_booking(
            &renter,
            CreateBookingRequest {
                vehicle_id: vehicle.id,
                owner_id: vehicle.owner_id,
                start_date: day(2024, 1, 1),
                end_date: day(2024, 1, 3),
                client_price: Some(1),
            },
        )
        .await
        .unwrap();
    assert_eq!(booking.total_price, 1500);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert!(app.vehicle(&vehicle).await.is_available);

    let confirmed = app
        .bookings
        .confirm_booking(&owner, booking.id, video("v1.mp4"))
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    let v1 = confirmed.pre_ride_video.clone().expect("evidence stored");
    assert!(v1.starts_with("http://media.test/readygo-videos/"));
    assert_eq!(media.len(), 1);
    assert!(!app.vehicle(&vehicle).await.is_available);

    let completed = app
        .bookings
        .complete_booking(&owner, booking.id)
        .await
        .unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);
    assert_eq!(completed.pre_ride_video.as_deref(), Some(v1.as_str()));
    assert!(app.vehicle(&vehicle).await.is_available);

    let feedback = || FeedbackRequest {
        booking_id: booking.id,
        vehicle_rating: 5,
        owner_rating: 4,
        comment: Some("  Smooth ride  ".into()),
    };
    let reviews = app
        .reviews
        .submit_feedback(&renter, feedback())
        .await
        .unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].comment.as_deref(), Some("Smooth ride"));
    assert!(app.booking(booking.id).await.feedback_given);

    let err = app
        .reviews
        .submit_feedback(&renter, feedback())
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(app.reviews.owner_ratings(&owner).await.unwrap().len(), 2);

    let stats = app.stats.customer_stats(&renter).await.unwrap();
    assert_eq!((stats.upcoming, stats.completed), (0, 1));
}

#[tokio::test]
async fn test_create_requires_customer_role() {
    let (app, _) = TestServices::new();
    let vehicle = app.seed_vehicle(100).await;
    let err = app
        .bookings
        .create_booking(
            &as_owner(vehicle.owner_id),
            CreateBookingRequest {
                vehicle_id: vehicle.id,
                owner_id: vehicle.owner_id,
                start_date: day(2024, 1, 1),
                end_date: day(2024, 1, 1),
                client_price: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));
}

#[tokio::test]
async fn test_create_validates_request() {
    let (app, _) = TestServices::new();
    let vehicle = app.seed_vehicle(100).await;
    let request = |owner_id: UserId, start, end| CreateBookingRequest {
        vehicle_id: vehicle.id,
        owner_id,
        start_date: start,
        end_date: end,
        client_price: None,
    };

    let reversed = app
        .bookings
        .create_booking(&customer(), request(vehicle.owner_id, day(2024, 1, 5), day(2024, 1, 4)))
        .await
        .unwrap_err();
    assert!(reversed.is(ErrorKind::Validation));

    let mismatch = app
        .bookings
        .create_booking(&customer(), request(UserId::new(), day(2024, 1, 1), day(2024, 1, 2)))
        .await
        .unwrap_err();
    assert!(mismatch.is(ErrorKind::Validation));

    let mut unknown = request(vehicle.owner_id, day(2024, 1, 1), day(2024, 1, 2));
    unknown.vehicle_id = readygo_core::types::VehicleId::new();
    let missing = app
        .bookings
        .create_booking(&customer(), unknown)
        .await
        .unwrap_err();
    assert!(missing.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_confirmed_vehicle_rejects_new_requests() {
    let (app, _) = TestServices::new();
    let vehicle = app.seed_vehicle(200).await;
    let first = app.request(&vehicle, day(2024, 2, 1), day(2024, 2, 2)).await;
    let second = app.request(&vehicle, day(2024, 2, 1), day(2024, 2, 2)).await;
    assert_eq!(second.status, BookingStatus::Pending);

    app.bookings
        .confirm_booking(&as_owner(vehicle.owner_id), first.id, video("a.mp4"))
        .await
        .unwrap();

    let err = app
        .bookings
        .create_booking(
            &customer(),
            CreateBookingRequest {
                vehicle_id: vehicle.id,
                owner_id: vehicle.owner_id,
                start_date: day(2024, 3, 1),
                end_date: day(2024, 3, 1),
                client_price: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_second_confirmation_on_held_vehicle_is_discarded() {
    let (app, media) = TestServices::new();
    let vehicle = app.seed_vehicle(200).await;
    let owner = as_owner(vehicle.owner_id);
    let first = app.request(&vehicle, day(2024, 2, 1), day(2024, 2, 2)).await;
    let second = app.request(&vehicle, day(2024, 2, 1), day(2024, 2, 2)).await;

    app.bookings
        .confirm_booking(&owner, first.id, video("a.mp4"))
        .await
        .unwrap();
    let err = app
        .bookings
        .confirm_booking(&owner, second.id, video("b.mp4"))
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(media.len(), 1, "losing video must be deleted");
    let stored = app.booking(second.id).await;
    assert_eq!(stored.status, BookingStatus::Pending);
    assert!(stored.pre_ride_video.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_confirm_and_reject_have_one_winner() {
    let (app, media) = TestServices::new();
    let vehicle = app.seed_vehicle(300).await;
    let booking = app.request(&vehicle, day(2024, 4, 1), day(2024, 4, 3)).await;
    let owner = as_owner(vehicle.owner_id);

    let (confirm, reject) = tokio::join!(
        app.bookings.confirm_booking(&owner, booking.id, video("race.mp4")),
        app.bookings.reject_booking(&owner, booking.id),
    );

    assert!(confirm.is_ok() ^ reject.is_ok());
    let stored = app.booking(booking.id).await;
    match (confirm, reject) {
        (Ok(_), Err(e)) => {
            assert!(e.is(ErrorKind::Conflict));
            assert_eq!(stored.status, BookingStatus::Confirmed);
            assert_eq!(media.len(), 1);
            assert!(!app.vehicle(&vehicle).await.is_available);
        }
        (Err(e), Ok(_)) => {
            assert!(e.is(ErrorKind::Conflict));
            assert_eq!(stored.status, BookingStatus::Cancelled);
            assert!(stored.pre_ride_video.is_none());
            assert!(media.is_empty());
            assert!(app.vehicle(&vehicle).await.is_available);
        }
        _ => unreachable!(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_confirms_have_one_winner() {
    let (app, media) = TestServices::new();
    let vehicle = app.seed_vehicle(300).await;
    let booking = app.request(&vehicle, day(2024, 4, 1), day(2024, 4, 3)).await;
    let owner = as_owner(vehicle.owner_id);

    let (a, b) = tokio::join!(
        app.bookings.confirm_booking(&owner, booking.id, video("a.mp4")),
        app.bookings.confirm_booking(&owner, booking.id, video("b.mp4")),
    );

    let winner = match (a, b) {
        (Ok(w), Err(e)) | (Err(e), Ok(w)) => {
            assert!(e.is(ErrorKind::Conflict));
            w
        }
        _ => panic!("exactly one confirmation must succeed"),
    };
    assert_eq!(media.len(), 1);
    assert_eq!(
        app.booking(booking.id).await.pre_ride_video,
        winner.pre_ride_video
    );
}

#[tokio::test]
async fn test_failed_upload_leaves_booking_pending() {
    let failing = Arc::new(FailingMediaStore::default());
    let app = TestServices::with_media(failing.clone());
    let vehicle = app.seed_vehicle(100).await;
    let booking = app.request(&vehicle, day(2024, 5, 1), day(2024, 5, 1)).await;

    let err = app
        .bookings
        .confirm_booking(&as_owner(vehicle.owner_id), booking.id, video("pre.mp4"))
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::ExternalService));
    assert_eq!(failing.deleted.lock().unwrap().len(), 1);
    let stored = app.booking(booking.id).await;
    assert_eq!(stored.status, BookingStatus::Pending);
    assert!(stored.pre_ride_video.is_none());
    assert!(app.vehicle(&vehicle).await.is_available);
}

#[tokio::test(start_paused = true)]
async fn test_upload_timeout_behaves_like_failure() {
    let stalled = Arc::new(StalledMediaStore::default());
    let app = TestServices::with_media(stalled.clone());
    let vehicle = app.seed_vehicle(100).await;
    let booking = app.request(&vehicle, day(2024, 5, 1), day(2024, 5, 1)).await;

    let err = app
        .bookings
        .confirm_booking(&as_owner(vehicle.owner_id), booking.id, video("pre.mov"))
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::ExternalService));
    let deleted = stalled.deleted.lock().unwrap().clone();
    assert_eq!(deleted.len(), 1);
    assert!(deleted[0].ends_with(".mov"));
    assert_eq!(app.booking(booking.id).await.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_store_failure_after_upload_discards_video() {
    let media = Arc::new(readygo_storage::MemoryMediaStore::new("http://media.test"));
    let store = Arc::new(readygo_database::MemoryStore::new());
    let mut stores = Stores::memory(store.clone());
    stores.bookings = Arc::new(BrokenTransitions(store.clone()));
    let app = TestServices::build(store, stores, media.clone());

    let vehicle = app.seed_vehicle(100).await;
    let booking = app.request(&vehicle, day(2024, 5, 1), day(2024, 5, 1)).await;

    let err = app
        .bookings
        .confirm_booking(&as_owner(vehicle.owner_id), booking.id, video("pre.mp4"))
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::Database));
    assert!(media.is_empty());
    assert_eq!(app.booking(booking.id).await.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_invalid_video_is_rejected_before_upload() {
    let (app, media) = TestServices::new();
    let vehicle = app.seed_vehicle(100).await;
    let booking = app.request(&vehicle, day(2024, 5, 1), day(2024, 5, 1)).await;
    let owner = as_owner(vehicle.owner_id);

    let missing = app
        .bookings
        .confirm_booking(&owner, booking.id, None)
        .await
        .unwrap_err();
    assert!(missing.is(ErrorKind::Validation));

    let wrong_ext = app
        .bookings
        .confirm_booking(&owner, booking.id, video("pre.gif"))
        .await
        .unwrap_err();
    assert!(wrong_ext.is(ErrorKind::Validation));
    assert!(media.is_empty());
}

#[tokio::test]
async fn test_owner_actions_on_foreign_booking_are_not_found() {
    let (app, media) = TestServices::new();
    let vehicle = app.seed_vehicle(100).await;
    let booking = app.request(&vehicle, day(2024, 5, 1), day(2024, 5, 1)).await;
    let stranger = as_owner(UserId::new());

    let confirm = app
        .bookings
        .confirm_booking(&stranger, booking.id, video("pre.mp4"))
        .await
        .unwrap_err();
    let reject = app
        .bookings
        .reject_booking(&stranger, booking.id)
        .await
        .unwrap_err();
    assert!(confirm.is(ErrorKind::NotFound));
    assert!(reject.is(ErrorKind::NotFound));
    assert!(media.is_empty());
}

#[tokio::test]
async fn test_complete_only_from_confirmed() {
    let (app, _) = TestServices::new();
    let vehicle = app.seed_vehicle(100).await;
    let owner = as_owner(vehicle.owner_id);
    let booking = app.request(&vehicle, day(2024, 5, 1), day(2024, 5, 1)).await;

    let pending = app
        .bookings
        .complete_booking(&owner, booking.id)
        .await
        .unwrap_err();
    assert!(pending.is(ErrorKind::Conflict));

    app.bookings.reject_booking(&owner, booking.id).await.unwrap();
    let cancelled = app
        .bookings
        .complete_booking(&owner, booking.id)
        .await
        .unwrap_err();
    assert!(cancelled.is(ErrorKind::Conflict));

    let again = app
        .bookings
        .reject_booking(&owner, booking.id)
        .await
        .unwrap_err();
    assert!(again.is(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_legacy_upcoming_booking_completes() {
    let (app, _) = TestServices::new();
    let vehicle = app.seed_vehicle(100).await;
    let mut legacy = CreateBooking {
        customer_id: UserId::new(),
        owner_id: vehicle.owner_id,
        vehicle_id: vehicle.id,
        start_date: day(2023, 12, 1),
        end_date: day(2023, 12, 2),
        total_price: 200,
    }
    .into_booking();
    legacy.status = BookingStatus::Upcoming;
    app.stores.bookings.insert_booking(&legacy).await.unwrap();

    let done = app
        .bookings
        .complete_booking(&as_owner(vehicle.owner_id), legacy.id)
        .await
        .unwrap();
    assert_eq!(done.status, BookingStatus::Completed);
    assert!(app.vehicle(&vehicle).await.is_available);
}

#[tokio::test]
async fn test_feedback_guards() {
    let (app, _) = TestServices::new();
    let vehicle = app.seed_vehicle(100).await;
    let renter = customer();
    let booking = app
        .bookings
        .create_booking(
            &renter,
            CreateBookingRequest {
                vehicle_id: vehicle.id,
                owner_id: vehicle.owner_id,
                start_date: day(2024, 6, 1),
                end_date: day(2024, 6, 1),
                client_price: None,
            },
        )
        .await
        .unwrap();
    let request = |vehicle_rating| FeedbackRequest {
        booking_id: booking.id,
        vehicle_rating,
        owner_rating: 3,
        comment: None,
    };

    let out_of_range = app
        .reviews
        .submit_feedback(&renter, request(6))
        .await
        .unwrap_err();
    assert!(out_of_range.is(ErrorKind::Validation));

    let not_completed = app
        .reviews
        .submit_feedback(&renter, request(4))
        .await
        .unwrap_err();
    assert!(not_completed.is(ErrorKind::Conflict));

    let someone_else = app
        .reviews
        .submit_feedback(&as_customer(UserId::new()), request(4))
        .await
        .unwrap_err();
    assert!(someone_else.is(ErrorKind::Authorization));
    assert!(!app.booking(booking.id).await.feedback_given);
}

#[tokio::test]
async fn test_notifications_follow_transitions() {
    let (app, _) = TestServices::new();
    let vehicle = app.seed_vehicle(100).await;
    let renter = customer();
    let booking = app
        .bookings
        .create_booking(
            &renter,
            CreateBookingRequest {
                vehicle_id: vehicle.id,
                owner_id: vehicle.owner_id,
                start_date: day(2024, 7, 1),
                end_date: day(2024, 7, 2),
                client_price: None,
            },
        )
        .await
        .unwrap();

    let owner_inbox = app.notifications(vehicle.owner_id).await;
    assert_eq!(owner_inbox.len(), 1);
    assert_eq!(owner_inbox[0].link.as_deref(), Some("/owner/orders"));
    assert!(owner_inbox[0].message.contains("Toyota Vios"));

    app.bookings
        .reject_booking(&as_owner(vehicle.owner_id), booking.id)
        .await
        .unwrap();
    let customer_inbox = app.notifications(renter.user_id).await;
    assert_eq!(customer_inbox.len(), 1);
    assert_eq!(customer_inbox[0].link.as_deref(), Some("/vehicle-search"));
}

#[tokio::test]
async fn test_notification_outage_does_not_fail_transition() {
    let media = Arc::new(readygo_storage::MemoryMediaStore::new("http://media.test"));
    let store = Arc::new(readygo_database::MemoryStore::new());
    let mut stores = Stores::memory(store.clone());
    stores.notifications = Arc::new(DownNotifications);
    let app = TestServices::build(store, stores, media);

    let vehicle = app.seed_vehicle(100).await;
    let booking = app.request(&vehicle, day(2024, 8, 1), day(2024, 8, 1)).await;
    let confirmed = app
        .bookings
        .confirm_booking(&as_owner(vehicle.owner_id), booking.id, video("pre.mp4"))
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_role_scoped_listings() {
    let (app, _) = TestServices::new();
    let vehicle = app.seed_vehicle(100).await;
    let renter = customer();
    for start in [day(2024, 1, 1), day(2024, 3, 1)] {
        app.bookings
            .create_booking(
                &renter,
                CreateBookingRequest {
                    vehicle_id: vehicle.id,
                    owner_id: vehicle.owner_id,
                    start_date: start,
                    end_date: start,
                    client_price: None,
                },
            )
            .await
            .unwrap();
    }

    let mine = app.bookings.list_for_customer(&renter).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].start_date, day(2024, 3, 1));

    let owned = app
        .bookings
        .list_for_owner(&as_owner(vehicle.owner_id))
        .await
        .unwrap();
    assert_eq!(owned.len(), 2);
    assert_eq!(app.bookings.list_all(&admin()).await.unwrap().len(), 2);

    let denied = app.bookings.list_all(&renter).await.unwrap_err();
    assert!(denied.is(ErrorKind::Authorization));
}
