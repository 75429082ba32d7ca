use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request},
    middleware, Router,
};
use salonflow_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    events::{self, EventSender},
    services::insights::InsightsClient,
    AppState,
};
use sea_orm::{ConnectionTrait, DatabaseBackend as DbBackend, Statement};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

const TEST_JWT_SECRET: &str =
    "integration_test_secret_key_that_is_at_least_sixty_four_characters_long";

/// A registered salon account inside a test application
#[allow(dead_code)]
pub struct TestSalon {
    pub salon_id: Uuid,
    pub slug: String,
    pub token: String,
}

/// Helper harness that spins up the full router backed by a SQLite
/// database on disk.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new(db_file: &str) -> Self {
        let _ = std::fs::remove_file(db_file);

        let mut cfg = AppConfig::new(
            format!("sqlite://{db_file}?mode=rwc"),
            TEST_JWT_SECRET.to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        // Clean schema per run
        let reset_statements = [
            "DROP TABLE IF EXISTS messages;",
            "DROP TABLE IF EXISTS payment_methods;",
            "DROP TABLE IF EXISTS inventory_items;",
            "DROP TABLE IF EXISTS appointments;",
            "DROP TABLE IF EXISTS staff;",
            "DROP TABLE IF EXISTS services;",
            "DROP TABLE IF EXISTS users;",
            "DROP TABLE IF EXISTS salons;",
            "DROP TABLE IF EXISTS seaql_migrations;",
        ];
        for sql in reset_statements {
            let _ = pool
                .execute(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
                .await;
        }

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth_cfg = AuthConfig::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
        );
        let auth_service = Arc::new(AuthService::new(auth_cfg, db_arc.clone()));

        let state = AppState {
            db: db_arc,
            config: Arc::new(cfg),
            event_sender: Some(event_sender),
            insights: InsightsClient::new(None, None, Duration::from_secs(1)),
        };

        let auth_layer = middleware::from_fn_with_state(
            auth_service.clone(),
            |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
             mut req: Request<Body>,
             next: axum::middleware::Next| async move {
                req.extensions_mut().insert(auth);
                next.run(req).await
            },
        );

        let router = Router::new()
            .nest("/api/v1", salonflow_api::api_v1_routes())
            .nest("/public", salonflow_api::public_routes())
            .nest("/auth", salonflow_api::auth::auth_routes().with_state(auth_service))
            .layer(auth_layer)
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Registers a salon and returns its id, slug and session token.
    pub async fn register_salon(&self, salon_name: &str, email: &str) -> TestSalon {
        let response = self
            .request(
                Method::POST,
                "/auth/register",
                Some(serde_json::json!({
                    "salon_name": salon_name,
                    "name": "Owner",
                    "email": email,
                    "password": "correct horse battery",
                })),
                None,
            )
            .await;
        assert!(
            response.status().is_success(),
            "registration failed: {}",
            response.status()
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read register response");
        let body: Value = serde_json::from_slice(&bytes).expect("parse register response");

        TestSalon {
            salon_id: body["salon_id"]
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .expect("salon id in register response"),
            slug: body["salon_slug"]
                .as_str()
                .expect("slug in register response")
                .to_string(),
            token: body["token"]["access_token"]
                .as_str()
                .expect("token in register response")
                .to_string(),
        }
    }
}

/// Reads a JSON body from a response
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}
