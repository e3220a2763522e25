use crate::domain::models::{event::{Event, EventStatus}, ticket::Ticket};
use crate::domain::ports::EventRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event, tickets: &[Ticket]) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, title, category, description, start_time, end_time, location, contact_name, contact_email, contact_phone, is_free, status, organizer_id, agenda_json, is_deleted, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE status = ? AND is_deleted = 0 ORDER BY created_at DESC",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE organizer_id = ? AND is_deleted = 0 ORDER BY created_at DESC",
        )
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event, tickets: &[Ticket]) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Event>(
            "UPDATE events SET title=?, category=?, description=?, start_time=?, end_time=?, location=?, contact_name=?, contact_email=?, contact_phone=?, is_free=?, status=?, agenda_json=?, updated_at=?
             WHERE id=? AND is_deleted = 0
             RETURNING *"
        )
            .bind(&event.title).bind(&event.category).bind(&event.description)
            .bind(event.start_time).bind(event.end_time).bind(&event.location)
            .bind(&event.contact_name).bind(&event.contact_email).bind(&event.contact_phone)
            .bind(event.is_free).bind(event.status.as_str()).bind(&event.agenda_json).bind(Utc::now())
            .bind(&event.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        // Wholesale ticket replacement: retire the old set, keep the rows so
        // existing registrations keep their foreign keys.
        sqlx::query("UPDATE tickets SET is_deleted = 1 WHERE event_id = ? AND is_deleted = 0")
            .bind(&event.id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        for ticket in tickets {
            sqlx::query(
                "INSERT INTO tickets (id, event_id, name, price_cents, total_seats, booked_seats, benefits_json, is_deleted, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
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
            "UPDATE events SET status = ?, updated_at = ? WHERE id = ? AND is_deleted = 0 RETURNING *",
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
            "UPDATE events SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0",
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
