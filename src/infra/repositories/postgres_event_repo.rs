use crate::domain::models::{event::{Event, EventStatus}, ticket::Ticket};
use crate::domain::ports::EventRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event, tickets: &[Ticket]) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, title, category, description, start_time, end_time, location, contact_name, contact_email, contact_phone, is_free, status, organizer_id, agenda_json, is_deleted, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.title).bind(&event.category).bind(&event.description)
            .bind(event.start_time).bind(event.end_time).bind(&event.location)
            .bind(&event.contact_name).bind(&event.contact_email).bind(&event.contact_phone)
            .bind(event.is_free).bind(event.status.as_str()).bind(&event.organizer_id)
            .bind(&event.agenda_json)
            .bind(event.is_deleted).bind(event.created_at).bind(event.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for ticket in tickets {
            sqlx::query(
                "INSERT INTO tickets (id, event_id, name, price_cents, total_seats, booked_seats, benefits_json, is_deleted, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
            )
                .bind(&ticket.id).bind(&ticket.event_id).bind(&ticket.name)
                .bind(ticket.price_cents).bind(ticket.total_seats).bind(ticket.booked_seats)
                .bind(&ticket.benefits_json).bind(ticket.is_deleted).bind(ticket.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE status = $1 AND is_deleted = FALSE ORDER BY created_at DESC",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE organizer_id = $1 AND is_deleted = FALSE ORDER BY created_at DESC",
        )
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event, tickets: &[Ticket]) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Event>(
            "UPDATE events SET title=$1, category=$2, description=$3, start_time=$4, end_time=$5, location=$6, contact_name=$7, contact_email=$8, contact_phone=$9, is_free=$10, status=$11, agenda_json=$12, updated_at=$13
             WHERE id=$14 AND is_deleted = FALSE
             RETURNING *"
        )
            .bind(&event.title).bind(&event.category).bind(&event.description)
            .bind(event.start_time).bind(event.end_time).bind(&event.location)
            .bind(&event.contact_name).bind(&event.contact_email).bind(&event.contact_phone)
            .bind(event.is_free).bind(event.status.as_str()).bind(&event.agenda_json).bind(Utc::now())
            .bind(&event.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        sqlx::query("UPDATE tickets SET is_deleted = TRUE WHERE event_id = $1 AND is_deleted = FALSE")
            .bind(&event.id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        for ticket in tickets {
            sqlx::query(
                "INSERT INTO tickets (id, event_id, name, price_cents, total_seats, booked_seats, benefits_json, is_deleted, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
            )
                .bind(&ticket.id).bind(&ticket.event_id).bind(&ticket.name)
                .bind(ticket.price_cents).bind(ticket.total_seats).bind(ticket.booked_seats)
                .bind(&ticket.benefits_json).bind(ticket.is_deleted).bind(ticket.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn set_status(&self, id: &str, status: EventStatus) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET status = $1, updated_at = $2 WHERE id = $3 AND is_deleted = FALSE RETURNING *",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn soft_delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE events SET is_deleted = TRUE, updated_at = $1 WHERE id = $2 AND is_deleted = FALSE",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}
