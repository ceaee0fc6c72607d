//! Vehicle availability ledger.
//!
//! A vehicle is unavailable exactly when it carries a confirmed (or legacy
//! upcoming) booking or an open damage dispute. The flag is only ever written
//! by [`recompute`], called from inside the transaction that changed one of
//! those inputs. Every such transaction takes [`lock_vehicle`] before its
//! first write, so the recompute sees every other committed change.

use sqlx::PgConnection;

use readygo_core::result::AppResult;
use readygo_core::types::{BookingId, DisputeId, UserId, VehicleId};

use super::db_error;

/// Take the row lock on a vehicle for the rest of the transaction.
pub async fn lock_vehicle(conn: &mut PgConnection, vehicle: VehicleId) -> AppResult<()> {
    sqlx::query("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
        .bind(vehicle)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to lock vehicle"))?;
    Ok(())
}

/// Lock the vehicle of an owner's booking. `None` when no such booking exists.
pub async fn lock_for_booking(
    conn: &mut PgConnection,
    booking: BookingId,
    owner: UserId,
) -> AppResult<Option<VehicleId>> {
    let vehicle: Option<VehicleId> =
        sqlx::query_scalar("SELECT vehicle_id FROM bookings WHERE id = $1 AND owner_id = $2")
            .bind(booking)
            .bind(owner)
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_error("Failed to find booking vehicle"))?;
    if let Some(vehicle) = vehicle {
        lock_vehicle(conn, vehicle).await?;
    }
    Ok(vehicle)
}

/// Lock the vehicle a dispute is about. `None` when the dispute does not exist.
pub async fn lock_for_dispute(
    conn: &mut PgConnection,
    dispute: DisputeId,
) -> AppResult<Option<VehicleId>> {
    let vehicle: Option<VehicleId> =
        sqlx::query_scalar("SELECT vehicle_id FROM damage_disputes WHERE id = $1")
            .bind(dispute)
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_error("Failed to find dispute vehicle"))?;
    if let Some(vehicle) = vehicle {
        lock_vehicle(conn, vehicle).await?;
    }
    Ok(vehicle)
}

/// Whether a booking other than `except`, or an open dispute, holds the vehicle.
pub async fn is_held_elsewhere(
    conn: &mut PgConnection,
    vehicle: VehicleId,
    except: BookingId,
) -> AppResult<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM bookings \
             WHERE vehicle_id = $1 AND id <> $2 AND status IN ('confirmed', 'upcoming')) \
         OR EXISTS (SELECT 1 FROM damage_disputes \
             WHERE vehicle_id = $1 AND status = 'pending_review')",
    )
    .bind(vehicle)
    .bind(except)
    .fetch_one(conn)
    .await
    .map_err(db_error("Failed to check vehicle locks"))
}

/// Rewrite the stored availability flag from current bookings and disputes.
pub async fn recompute(conn: &mut PgConnection, vehicle: VehicleId) -> AppResult<()> {
    sqlx::query(
        "UPDATE vehicles SET updated_at = NOW(), is_available = NOT ( \
             EXISTS (SELECT 1 FROM bookings \
                 WHERE vehicle_id = $1 AND status IN ('confirmed', 'upcoming')) \
             OR EXISTS (SELECT 1 FROM damage_disputes \
                 WHERE vehicle_id = $1 AND status = 'pending_review')) \
         WHERE id = $1",
    )
    .bind(vehicle)
    .execute(conn)
    .await
    .map_err(db_error("Failed to recompute vehicle availability"))?;
    Ok(())
}
