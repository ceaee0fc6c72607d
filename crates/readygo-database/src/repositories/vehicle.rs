//! Vehicle repository.

use async_trait::async_trait;
use sqlx::PgPool;

use readygo_core::result::AppResult;
use readygo_core::types::{UserId, VehicleId};
use readygo_entity::vehicle::Vehicle;

use super::db_error;
use crate::store::VehicleStore;

/// PostgreSQL-backed [`VehicleStore`].
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    /// Create a new vehicle repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for VehicleRepository {
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO vehicles (id, owner_id, name, kind, plate, daily_rate, location, \
             is_available, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(vehicle.id)
        .bind(vehicle.owner_id)
        .bind(&vehicle.name)
        .bind(vehicle.kind)
        .bind(&vehicle.plate)
        .bind(vehicle.daily_rate)
        .bind(&vehicle.location)
        .bind(vehicle.is_available)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to create vehicle"))?;
        Ok(())
    }

    async fn find_vehicle(&self, id: VehicleId) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find vehicle"))
    }

    async fn count_vehicles_for_owner(&self, owner: UserId) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE owner_id = $1")
            .bind(owner)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count vehicles"))
    }
}
