//! Shared helpers for service integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{NaiveDate, TimeZone, Utc};

use readygo_core::config::MediaConfig;
use readygo_core::error::AppError;
use readygo_core::result::AppResult;
use readygo_core::traits::media::{MediaStore, StoredMedia};
use readygo_core::types::{BookingId, UserId};
use readygo_database::store::{
    BookingStore, BookingTransition, NotificationStore, Stores, TransitionOutcome, VehicleStore,
};
use readygo_database::MemoryStore;
use readygo_entity::booking::Booking;
use readygo_entity::notification::Notification;
use readygo_entity::user::UserRole;
use readygo_entity::vehicle::{CreateVehicle, Vehicle, VehicleKind};
use readygo_service::booking::CreateBookingRequest;
use readygo_service::{
    BookingService, DisputeService, EvidenceUpload, EvidenceUploader, Notifier, RequestContext,
    ReviewService, StatsService,
};
use readygo_storage::MemoryMediaStore;

/// All services wired over one in-memory store.
pub struct TestServices {
    pub store: Arc<MemoryStore>,
    pub stores: Stores,
    pub bookings: BookingService,
    pub disputes: DisputeService,
    pub reviews: ReviewService,
    pub stats: StatsService,
}

impl TestServices {
    /// Services over a healthy in-memory media store.
    pub fn new() -> (Self, Arc<MemoryMediaStore>) {
        let media = Arc::new(MemoryMediaStore::new("http://media.test"));
        (Self::with_media(media.clone()), media)
    }

    /// Services over an arbitrary media store.
    pub fn with_media(media: Arc<dyn MediaStore>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::build(store.clone(), Stores::memory(store), media)
    }

    /// Services over arbitrary stores.
    pub fn build(store: Arc<MemoryStore>, stores: Stores, media: Arc<dyn MediaStore>) -> Self {
        let config = MediaConfig {
            upload_timeout_seconds: 5,
            ..MediaConfig::default()
        };
        let uploader = Arc::new(EvidenceUploader::new(media, config));
        let notifier = Notifier::new(stores.notifications.clone());
        Self {
            bookings: BookingService::new(&stores, uploader.clone(), notifier.clone()),
            disputes: DisputeService::new(&stores, uploader, notifier),
            reviews: ReviewService::new(&stores),
            stats: StatsService::new(&stores),
            store,
            stores,
        }
    }

    /// Lists a vehicle for a fresh owner.
    pub async fn seed_vehicle(&self, daily_rate: i64) -> Vehicle {
        let vehicle = CreateVehicle {
            owner_id: UserId::new(),
            name: "Toyota Vios".into(),
            kind: VehicleKind::Car,
            plate: format!("30a-{}", &UserId::new().to_string()[..5]),
            daily_rate,
            location: "Da Nang".into(),
        }
        .into_vehicle();
        self.stores.vehicles.insert_vehicle(&vehicle).await.unwrap();
        vehicle
    }

    /// Creates a pending booking for a fresh customer.
    pub async fn request(&self, vehicle: &Vehicle, start: NaiveDate, end: NaiveDate) -> Booking {
        self.bookings
            .create_booking(
                &customer(),
                CreateBookingRequest {
                    vehicle_id: vehicle.id,
                    owner_id: vehicle.owner_id,
                    start_date: start,
                    end_date: end,
                    client_price: None,
                },
            )
            .await
            .unwrap()
    }

    pub async fn vehicle(&self, vehicle: &Vehicle) -> Vehicle {
        self.stores
            .vehicles
            .find_vehicle(vehicle.id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn booking(&self, id: BookingId) -> Booking {
        self.stores.bookings.find_booking(id).await.unwrap().unwrap()
    }

    pub async fn notifications(&self, user: UserId) -> Vec<Notification> {
        self.stores
            .notifications
            .list_notifications_for_user(user)
            .await
            .unwrap()
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn customer() -> RequestContext {
    RequestContext::new(UserId::new(), UserRole::Customer)
}

pub fn as_customer(id: UserId) -> RequestContext {
    RequestContext::new(id, UserRole::Customer)
}

pub fn as_owner(id: UserId) -> RequestContext {
    RequestContext::new(id, UserRole::Owner)
}

pub fn admin() -> RequestContext {
    RequestContext::new(UserId::new(), UserRole::Admin)
}

/// Context for `user` on the given calendar day.
pub fn on(ctx: RequestContext, date: NaiveDate) -> RequestContext {
    let noon = date.and_hms_opt(12, 0, 0).unwrap();
    ctx.at(Utc.from_utc_datetime(&noon))
}

pub fn video(name: &str) -> Option<EvidenceUpload> {
    Some(EvidenceUpload {
        file_name: name.into(),
        content_type: "video/mp4".into(),
        data: Bytes::from_static(b"\x00\x00\x00\x18ftypmp42"),
    })
}

/// Media store whose uploads always fail; records deletes.
#[derive(Debug, Default)]
pub struct FailingMediaStore {
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaStore for FailingMediaStore {
    fn provider_type(&self) -> &str {
        "failing"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }

    async fn upload(&self, _key: &str, _ct: &str, _data: Bytes) -> AppResult<StoredMedia> {
        Err(AppError::external_service("media host returned 503"))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Ok(false)
    }
}

/// Media store that never answers an upload in time; records deletes.
#[derive(Debug, Default)]
pub struct StalledMediaStore {
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaStore for StalledMediaStore {
    fn provider_type(&self) -> &str {
        "stalled"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn upload(&self, key: &str, _ct: &str, data: Bytes) -> AppResult<StoredMedia> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(StoredMedia {
            key: key.to_string(),
            url: key.to_string(),
            size_bytes: data.len() as u64,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Ok(false)
    }
}

/// Booking store whose transitions fail with a database error.
#[derive(Debug)]
pub struct BrokenTransitions(pub Arc<MemoryStore>);

#[async_trait]
impl BookingStore for BrokenTransitions {
    async fn insert_booking(&self, booking: &Booking) -> AppResult<()> {
        self.0.insert_booking(booking).await
    }

    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>> {
        self.0.find_booking(id).await
    }

    async fn list_bookings_for_customer(&self, customer: UserId) -> AppResult<Vec<Booking>> {
        self.0.list_bookings_for_customer(customer).await
    }

    async fn list_bookings_for_owner(&self, owner: UserId) -> AppResult<Vec<Booking>> {
        self.0.list_bookings_for_owner(owner).await
    }

    async fn list_all_bookings(&self) -> AppResult<Vec<Booking>> {
        self.0.list_all_bookings().await
    }

    async fn transition(&self, _change: BookingTransition) -> AppResult<TransitionOutcome> {
        Err(AppError::database("connection reset by peer"))
    }
}

/// Notification store that is always down.
#[derive(Debug)]
pub struct DownNotifications;

#[async_trait]
impl NotificationStore for DownNotifications {
    async fn insert_notification(&self, _notification: &Notification) -> AppResult<()> {
        Err(AppError::database("notifications table locked"))
    }

    async fn list_notifications_for_user(&self, _user: UserId) -> AppResult<Vec<Notification>> {
        Ok(Vec::new())
    }
}
