//! Vehicle domain entities.

pub mod model;

pub use model::{CreateVehicle, Vehicle, VehicleKind};
