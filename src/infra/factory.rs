use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::{AppState, Repositories};
use crate::infra::repositories::{
    postgres_bundle_repo::PostgresBundleRepo, postgres_role_repo::PostgresRoleRepo,
    postgres_setlist_entry_repo::PostgresSetlistEntryRepo, postgres_setlist_repo::PostgresSetlistRepo,
    postgres_setlist_role_repo::PostgresSetlistRoleRepo, postgres_song_repo::PostgresSongRepo,
    postgres_token_repo::PostgresTokenRepo, postgres_user_repo::PostgresUserRepo,
    postgres_user_role_repo::PostgresUserRoleRepo,
    sqlite_bundle_repo::SqliteBundleRepo, sqlite_role_repo::SqliteRoleRepo,
    sqlite_setlist_entry_repo::SqliteSetlistEntryRepo, sqlite_setlist_repo::SqliteSetlistRepo,
    sqlite_setlist_role_repo::SqliteSetlistRoleRepo, sqlite_song_repo::SqliteSongRepo,
    sqlite_token_repo::SqliteTokenRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_user_role_repo::SqliteUserRoleRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let repos = if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_repositories(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_repositories(pool)
    };

    AppState::new(config.clone(), repos)
}

pub fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

pub fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        users: Arc::new(SqliteUserRepo::new(pool.clone())),
        roles: Arc::new(SqliteRoleRepo::new(pool.clone())),
        user_roles: Arc::new(SqliteUserRoleRepo::new(pool.clone())),
        bundles: Arc::new(SqliteBundleRepo::new(pool.clone())),
        songs: Arc::new(SqliteSongRepo::new(pool.clone())),
        setlists: Arc::new(SqliteSetlistRepo::new(pool.clone())),
        setlist_entries: Arc::new(SqliteSetlistEntryRepo::new(pool.clone())),
        setlist_roles: Arc::new(SqliteSetlistRoleRepo::new(pool.clone())),
        tokens: Arc::new(SqliteTokenRepo::new(pool)),
    }
}

pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        users: Arc::new(PostgresUserRepo::new(pool.clone())),
        roles: Arc::new(PostgresRoleRepo::new(pool.clone())),
        user_roles: Arc::new(PostgresUserRoleRepo::new(pool.clone())),
        bundles: Arc::new(PostgresBundleRepo::new(pool.clone())),
        songs: Arc::new(PostgresSongRepo::new(pool.clone())),
        setlists: Arc::new(PostgresSetlistRepo::new(pool.clone())),
        setlist_entries: Arc::new(PostgresSetlistEntryRepo::new(pool.clone())),
        setlist_roles: Arc::new(PostgresSetlistRoleRepo::new(pool.clone())),
        tokens: Arc::new(PostgresTokenRepo::new(pool)),
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
