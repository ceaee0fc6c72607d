//! Shared helpers for HTTP tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use readygo_api::auth::{Claims, JwtEncoder};
use readygo_api::{AppState, build_router};
use readygo_core::config::{
    AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, MediaConfig, ServerConfig,
};
use readygo_core::types::UserId;
use readygo_database::MemoryStore;
use readygo_database::store::Stores;
use readygo_entity::user::UserRole;
use readygo_entity::vehicle::{CreateVehicle, Vehicle, VehicleKind};
use readygo_storage::MemoryMediaStore;

pub const BOUNDARY: &str = "readygo-test-boundary";

/// Router over in-memory stores and an in-memory media host.
pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
    pub media: Arc<MemoryMediaStore>,
    encoder: JwtEncoder,
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "memory".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
            run_migrations: false,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            leeway_seconds: 0,
        },
        media: MediaConfig {
            provider: "memory".to_string(),
            upload_timeout_seconds: 5,
            ..MediaConfig::default()
        },
        logging: LoggingConfig::default(),
    }
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let stores = Stores::memory(Arc::new(MemoryStore::new()));
        let media = Arc::new(MemoryMediaStore::new("http://media.test"));
        let encoder = JwtEncoder::new(&config.auth);
        let state = AppState::new(config, &stores, media.clone());

        Self {
            router: build_router(state),
            stores,
            media,
            encoder,
        }
    }

    /// A bearer token for `user` acting as `role`.
    pub fn token(&self, user: UserId, role: UserRole) -> String {
        self.encoder
            .encode(&Claims::new(user, role, Duration::minutes(15)))
            .expect("sign token")
    }

    /// Lists a vehicle for a fresh owner.
    pub async fn seed_vehicle(&self, daily_rate: i64) -> Vehicle {
        let vehicle = CreateVehicle {
            owner_id: UserId::new(),
            name: "Honda Air Blade".into(),
            kind: VehicleKind::Bike,
            plate: "43B1-12345".into(),
            daily_rate,
            location: "Hue".into(),
        }
        .into_vehicle();
        self.stores
            .vehicles
            .insert_vehicle(&vehicle)
            .await
            .expect("seed vehicle");
        vehicle
    }

    /// Sends a JSON (or empty) request.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        self.send(req.body(Body::from(body_str)).expect("build request"))
            .await
    }

    /// Sends a multipart form with one file field and optional text fields.
    pub async fn upload(
        &self,
        path: &str,
        file_field: &str,
        file_name: &str,
        text_fields: &[(&str, &str)],
        token: &str,
    ) -> TestResponse {
        let mut body = String::new();
        for (name, value) in text_fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{file_field}\"; filename=\"{file_name}\"\r\nContent-Type: video/mp4\r\n\r\nftypmp42-bytes\r\n--{BOUNDARY}--\r\n"
        ));

        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("build request");

        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}
