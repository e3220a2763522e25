use crate::domain::models::ticket::Ticket;
use crate::domain::ports::TicketRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresTicketRepo {
    pool: PgPool,
}

impl PostgresTicketRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE event_id = $1 AND is_deleted = FALSE ORDER BY price_cents ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
