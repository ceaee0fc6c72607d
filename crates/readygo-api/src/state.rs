//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use readygo_core::config::AppConfig;
use readygo_core::traits::media::MediaStore;
use readygo_database::store::Stores;
use readygo_service::{
    BookingService, DisputeService, EvidenceUploader, Notifier, ReviewService, StatsService,
};

use crate::auth::JwtDecoder;

/// Application state passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Evidence video host
    pub media: Arc<dyn MediaStore>,
    /// Bearer token verifier
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Booking lifecycle
    pub booking_service: BookingService,
    /// Dashboard aggregates
    pub stats_service: StatsService,
    /// Damage disputes
    pub dispute_service: DisputeService,
    /// Feedback
    pub review_service: ReviewService,
}

impl AppState {
    /// Wires the services over `stores` and `media`.
    pub fn new(config: AppConfig, stores: &Stores, media: Arc<dyn MediaStore>) -> Self {
        let uploader = Arc::new(EvidenceUploader::new(media.clone(), config.media.clone()));
        let notifier = Notifier::new(stores.notifications.clone());

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            booking_service: BookingService::new(stores, uploader.clone(), notifier.clone()),
            stats_service: StatsService::new(stores),
            dispute_service: DisputeService::new(stores, uploader, notifier),
            review_service: ReviewService::new(stores),
            media,
            config: Arc::new(config),
        }
    }
}
