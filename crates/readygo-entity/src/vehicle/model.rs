//! Vehicle entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use readygo_core::types::{UserId, VehicleId};

/// Kind of rentable vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vehicle_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    /// Motorcycle.
    Bike,
    /// Scooter.
    Scooter,
    /// Car.
    Car,
}

/// A vehicle listed by an owner.
///
/// `is_available` is maintained by the booking and dispute transitions only;
/// it is `false` while the vehicle carries a confirmed booking or an open
/// damage dispute.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    /// Unique vehicle identifier.
    pub id: VehicleId,
    /// Owner who listed the vehicle.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Vehicle kind.
    pub kind: VehicleKind,
    /// Registration plate (upper-case).
    pub plate: String,
    /// Rental price per day in whole currency units.
    pub daily_rate: i64,
    /// Pickup location.
    pub location: String,
    /// Whether the vehicle can accept a new booking request.
    pub is_available: bool,
    /// When the vehicle was listed.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to list a new vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicle {
    /// Owner listing the vehicle.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Vehicle kind.
    pub kind: VehicleKind,
    /// Registration plate.
    pub plate: String,
    /// Rental price per day.
    pub daily_rate: i64,
    /// Pickup location.
    pub location: String,
}

impl CreateVehicle {
    /// Build the stored row for this listing.
    pub fn into_vehicle(self) -> Vehicle {
        let now = Utc::now();
        Vehicle {
            id: VehicleId::new(),
            owner_id: self.owner_id,
            name: self.name.trim().to_string(),
            kind: self.kind,
            plate: self.plate.trim().to_uppercase(),
            daily_rate: self.daily_rate,
            location: self.location.trim().to_string(),
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }
}
