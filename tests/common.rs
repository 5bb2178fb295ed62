use setlist_backend::{
    api::router::create_router,
    config::Config,
    domain::models::user::{NewUser, Permission, User},
    infra::factory::sqlite_repositories,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
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
            jwt_access_secret: "test-access-secret".to_string(),
            jwt_refresh_secret: "test-refresh-secret".to_string(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 3600,
            cors_allowed_origin: None,
            admin_email: None,
            admin_password: None,
        };

        let state = Arc::new(AppState::new(config, sqlite_repositories(pool.clone())));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Stores a user directly through the service layer, bypassing guest-only registration.
    pub async fn create_user(&self, email: &str, permission: Permission) -> User {
        self.state.user_service.store(&NewUser {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            permission,
            profile_color: "#336699".to_string(),
        }).await.expect("Failed to create test user")
    }

    /// Logs in and returns the access token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let payload = serde_json::json!({
            "email": email,
            "password": password
        });

        let response = self.request("POST", "/api/v1/users/login", None, Some(payload)).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let body = parse_body(response).await;
        body["access"].as_str().expect("No access token in body").to_string()
    }

    /// Creates a user with the given permission and returns it with a fresh access token.
    pub async fn user_with_token(&self, email: &str, permission: Permission) -> (User, String) {
        let user = self.create_user(email, permission).await;
        let token = self.login(email, TEST_PASSWORD).await;
        (user, token)
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
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
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
