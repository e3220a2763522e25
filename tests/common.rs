use event_backend::{
    api::router::create_router,
    config::Config,
    domain::services::inventory::InventoryService,
    infra::repositories::{
        sqlite_event_repo::SqliteEventRepo,
        sqlite_registration_repo::SqliteRegistrationRepo,
        sqlite_ticket_repo::SqliteTicketRepo,
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
        };

        let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
        let ticket_repo = Arc::new(SqliteTicketRepo::new(pool.clone()));
        let registration_repo = Arc::new(SqliteRegistrationRepo::new(pool.clone()));
        let inventory = Arc::new(InventoryService::new(
            event_repo.clone(),
            ticket_repo.clone(),
            registration_repo.clone(),
        ));

        let state = Arc::new(AppState {
            config,
            event_repo,
            ticket_repo,
            registration_repo,
            inventory,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a request with identity-provider headers attached.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        actor: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some((id, role)) = actor {
            builder = builder
                .header("x-actor-id", id)
                .header("x-actor-role", role);
        }

        let body = match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
