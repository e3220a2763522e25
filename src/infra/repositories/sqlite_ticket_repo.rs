use crate::domain::models::ticket::Ticket;
use crate::domain::ports::TicketRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTicketRepo {
    pool: SqlitePool,
}

impl SqliteTicketRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for SqliteTicketRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE event_id = ? AND is_deleted = 0 ORDER BY price_cents ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
