use crate::domain::models::registration::{EventStats, Registration};
use crate::domain::ports::RegistrationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresRegistrationRepo {
    pool: PgPool,
}

impl PostgresRegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepo {
    async fn reserve(&self, registration: &Registration) -> Result<Registration, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Conditional increment doubles as the capacity check; the row lock
        // taken by the UPDATE holds until commit, so concurrent reservations
        // serialize on the ticket row.
        let bumped = sqlx::query(
            "UPDATE tickets SET booked_seats = booked_seats + $1
             WHERE id = $2 AND is_deleted = FALSE AND booked_seats + $1 <= total_seats",
        )
        .bind(registration.quantity)
        .bind(&registration.ticket_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if bumped.rows_affected() == 0 {
            return Err(AppError::CapacityExceeded);
        }

        let created = sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (id, event_id, ticket_id, user_id, full_name, email, phone, quantity, total_amount_cents, special_requests, status, transaction_ref, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING *"
        )
            .bind(&registration.id).bind(&registration.event_id).bind(&registration.ticket_id)
            .bind(&registration.user_id).bind(&registration.full_name).bind(&registration.email)
            .bind(&registration.phone).bind(registration.quantity).bind(registration.total_amount_cents)
            .bind(&registration.special_requests).bind(registration.status.as_str())
            .bind(&registration.transaction_ref).bind(registration.created_at).bind(registration.updated_at)
            .fetch_one(&mut *tx).await
            .map_err(|e| {
                if AppError::is_unique_violation(&e) {
                    AppError::Conflict("Already registered for this ticket".into())
                } else {
                    AppError::Database(e)
                }
            })?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn cancel(&self, id: &str) -> Result<Registration, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = 'cancelled', updated_at = $1
             WHERE id = $2 AND status = 'confirmed'
             RETURNING *",
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Conflict("Registration is not confirmed".into()))?;

        sqlx::query("UPDATE tickets SET booked_seats = booked_seats - $1 WHERE id = $2")
            .bind(cancelled.quantity)
            .bind(&cancelled.ticket_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 ORDER BY created_at DESC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn stats_by_event(&self, event_id: &str) -> Result<EventStats, AppError> {
        sqlx::query_as::<_, EventStats>(
            "SELECT
                COUNT(*) AS total_registrations,
                COALESCE(SUM(CASE WHEN status = 'confirmed' THEN 1 ELSE 0 END), 0)::BIGINT AS confirmed_registrations,
                COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0)::BIGINT AS pending_registrations,
                COALESCE(SUM(CASE WHEN status = 'cancelled' THEN 1 ELSE 0 END), 0)::BIGINT AS cancelled_registrations,
                COALESCE(SUM(CASE WHEN status = 'confirmed' THEN quantity ELSE 0 END), 0)::BIGINT AS total_tickets_sold,
                COALESCE(SUM(CASE WHEN status = 'confirmed' THEN total_amount_cents ELSE 0 END), 0)::BIGINT AS total_revenue_cents
             FROM registrations WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn reconcile_counters(&self) -> Result<u64, AppError> {
        // Clamped to total_seats so a surplus of confirmed rows can never
        // make the repair itself trip the booked <= total CHECK.
        let result = sqlx::query(
            "UPDATE tickets SET booked_seats = LEAST(total_seats, COALESCE(
                (SELECT SUM(r.quantity) FROM registrations r
                 WHERE r.ticket_id = tickets.id AND r.status = 'confirmed'), 0))
             WHERE booked_seats != LEAST(total_seats, COALESCE(
                (SELECT SUM(r.quantity) FROM registrations r
                 WHERE r.ticket_id = tickets.id AND r.status = 'confirmed'), 0))",
        )
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
