use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::ConnectOptions;
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::inventory::InventoryService;
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo, postgres_registration_repo::PostgresRegistrationRepo,
    postgres_ticket_repo::PostgresTicketRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_registration_repo::SqliteRegistrationRepo, sqlite_ticket_repo::SqliteTicketRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        sqlx::migrate!("./migrations/postgres")
            .run(&pool)
            .await
            .expect("Failed to run Postgres migrations");

        let event_repo = Arc::new(PostgresEventRepo::new(pool.clone()));
        let ticket_repo = Arc::new(PostgresTicketRepo::new(pool.clone()));
        let registration_repo = Arc::new(PostgresRegistrationRepo::new(pool.clone()));

        let inventory = Arc::new(InventoryService::new(
            event_repo.clone(),
            ticket_repo.clone(),
            registration_repo.clone(),
        ));

        AppState {
            config: config.clone(),
            event_repo,
            ticket_repo,
            registration_repo,
            inventory,
        }
    } else {
        info!("Initializing SQLite connection...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite URL")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to run SQLite migrations");

        let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
        let ticket_repo = Arc::new(SqliteTicketRepo::new(pool.clone()));
        let registration_repo = Arc::new(SqliteRegistrationRepo::new(pool.clone()));

        let inventory = Arc::new(InventoryService::new(
            event_repo.clone(),
            ticket_repo.clone(),
            registration_repo.clone(),
        ));

        AppState {
            config: config.clone(),
            event_repo,
            ticket_repo,
            registration_repo,
            inventory,
        }
    }
}
