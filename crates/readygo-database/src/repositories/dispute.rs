//! Damage dispute repository.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use readygo_core::result::AppResult;
use readygo_core::types::{BookingId, DisputeId, UserId};
use readygo_entity::booking::{Booking, BookingStatus};
use readygo_entity::dispute::{DamageDispute, DisputeReply, NewDispute};

use super::booking::status_names;
use super::{availability, db_error};
use crate::store::DisputeStore;

/// PostgreSQL-backed [`DisputeStore`].
#[derive(Debug, Clone)]
pub struct DisputeRepository {
    pool: PgPool,
}

impl DisputeRepository {
    /// Create a new dispute repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load replies for `disputes` and attach them in creation order.
    async fn with_replies(&self, mut disputes: Vec<DamageDispute>) -> AppResult<Vec<DamageDispute>> {
        if disputes.is_empty() {
            return Ok(disputes);
        }
        let ids: Vec<Uuid> = disputes.iter().map(|d| d.id.into_uuid()).collect();
        let replies = sqlx::query_as::<_, DisputeReply>(
            "SELECT * FROM dispute_replies WHERE dispute_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load dispute replies"))?;

        let mut by_dispute: HashMap<DisputeId, Vec<DisputeReply>> = HashMap::new();
        for reply in replies {
            by_dispute.entry(reply.dispute_id).or_default().push(reply);
        }
        for dispute in &mut disputes {
            dispute.replies = by_dispute.remove(&dispute.id).unwrap_or_default();
        }
        Ok(disputes)
    }
}

#[async_trait]
impl DisputeStore for DisputeRepository {
    async fn open_dispute(
        &self,
        booking_id: BookingId,
        owner: UserId,
        dispute: NewDispute,
    ) -> AppResult<Option<DamageDispute>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        if availability::lock_for_booking(&mut *tx, booking_id, owner).await?.is_none() {
            return Ok(None);
        }

        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 AND status::text = ANY($4) \
             RETURNING *",
        )
        .bind(booking_id)
        .bind(owner)
        .bind(BookingStatus::Disputed)
        .bind(status_names(BookingStatus::DISPUTABLE))
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to mark booking disputed"))?;

        let Some(booking) = booking else {
            return Ok(None);
        };

        let record = dispute.into_dispute(&booking);
        let created = sqlx::query_as::<_, DamageDispute>(
            "INSERT INTO damage_disputes (id, booking_id, owner_id, customer_id, vehicle_id, \
             description, pre_ride_video, damage_video, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(record.id)
        .bind(record.booking_id)
        .bind(record.owner_id)
        .bind(record.customer_id)
        .bind(record.vehicle_id)
        .bind(&record.description)
        .bind(&record.pre_ride_video)
        .bind(&record.damage_video)
        .bind(record.status)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to create dispute"))?;

        availability::recompute(&mut *tx, booking.vehicle_id).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit dispute"))?;
        Ok(Some(created))
    }

    async fn find_dispute(&self, id: DisputeId) -> AppResult<Option<DamageDispute>> {
        let found = sqlx::query_as::<_, DamageDispute>("SELECT * FROM damage_disputes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find dispute"))?;
        match found {
            Some(dispute) => Ok(self.with_replies(vec![dispute]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_disputes_for_owner(&self, owner: UserId) -> AppResult<Vec<DamageDispute>> {
        let disputes = sqlx::query_as::<_, DamageDispute>(
            "SELECT * FROM damage_disputes WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list owner disputes"))?;
        self.with_replies(disputes).await
    }

    async fn list_all_disputes(&self) -> AppResult<Vec<DamageDispute>> {
        let disputes = sqlx::query_as::<_, DamageDispute>(
            "SELECT * FROM damage_disputes ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list disputes"))?;
        self.with_replies(disputes).await
    }

    async fn add_reply(&self, reply: &DisputeReply) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO dispute_replies (id, dispute_id, admin_id, message, created_at) \
             SELECT $1, $2, $3, $4, $5 WHERE EXISTS (SELECT 1 FROM damage_disputes WHERE id = $2)",
        )
        .bind(reply.id)
        .bind(reply.dispute_id)
        .bind(reply.admin_id)
        .bind(&reply.message)
        .bind(reply.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to add dispute reply"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn resolve_dispute(&self, id: DisputeId) -> AppResult<Option<DamageDispute>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        if availability::lock_for_dispute(&mut *tx, id).await?.is_none() {
            return Ok(None);
        }

        let resolved = sqlx::query_as::<_, DamageDispute>(
            "UPDATE damage_disputes SET status = 'resolved', updated_at = NOW() \
             WHERE id = $1 AND status = 'pending_review' RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to resolve dispute"))?;

        let Some(dispute) = resolved else {
            return Ok(None);
        };

        availability::recompute(&mut *tx, dispute.vehicle_id).await?;
        tx.commit()
            .await
            .map_err(db_error("Failed to commit dispute resolution"))?;

        Ok(self.with_replies(vec![dispute]).await?.pop())
    }
}
