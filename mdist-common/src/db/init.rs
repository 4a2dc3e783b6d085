//! Database initialization
//!
//! Creates the database on first run, brings the schema up to date and
//! ensures default settings exist. Safe to call on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::settings::{ensure_setting, EVENT_BUS_CAPACITY, RELEASE_MIN_LEAD_DAYS};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // foreign_keys is a per-connection pragma
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Idempotent - safe to call multiple times
    create_schema_version_table(&pool).await?;
    create_settings_table(&pool).await?;
    create_users_table(&pool).await?;
    create_releases_table(&pool).await?;
    create_release_documents_table(&pool).await?;
    create_tracks_table(&pool).await?;
    create_track_artists_table(&pool).await?;
    create_track_writers_table(&pool).await?;
    create_library_tables(&pool).await?;
    create_admin_actions_table(&pool).await?;
    create_notifications_table(&pool).await?;

    // Complex transformations for databases created by older versions
    crate::db::migrations::run_migrations(&pool).await?;

    init_default_settings(&pool).await?;

    Ok(pool)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// User profiles
///
/// Authentication lives elsewhere; only the profile fields the release
/// workflow reads or writes are kept here.
async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            guid TEXT PRIMARY KEY,
            display_name TEXT NOT NULL DEFAULT '',
            spotify_url TEXT,
            apple_id TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_releases_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS releases (
            guid TEXT PRIMARY KEY,
            user_guid TEXT NOT NULL,
            title TEXT NOT NULL,
            release_type TEXT,
            genre TEXT,
            sub_genre TEXT,
            c_line TEXT,
            c_year INTEGER,
            p_line TEXT,
            p_year INTEGER,
            record_label TEXT,
            upc TEXT,
            wupc TEXT UNIQUE,
            cover_url TEXT,
            selected_stores TEXT NOT NULL DEFAULT '[]',
            monetization TEXT NOT NULL DEFAULT '{}',
            territory_policy TEXT NOT NULL DEFAULT 'GLOBAL',
            release_timing TEXT NOT NULL DEFAULT 'ASAP',
            release_date TEXT,
            distributed_before INTEGER NOT NULL DEFAULT 0,
            original_release_date TEXT,
            status TEXT NOT NULL,
            rejection_reason TEXT,
            confirm_rights INTEGER NOT NULL DEFAULT 0,
            confirm_accuracy INTEGER NOT NULL DEFAULT 0,
            confirm_commission INTEGER NOT NULL DEFAULT 0,
            confirm_liability INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_releases_status ON releases(status)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_releases_user ON releases(user_guid)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_release_documents_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS release_documents (
            release_guid TEXT NOT NULL REFERENCES releases(guid) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            url TEXT NOT NULL,
            PRIMARY KEY (release_guid, position)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Track ids are scoped to their release; credit rows key on the pair
async fn create_tracks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            guid TEXT NOT NULL,
            release_guid TEXT NOT NULL REFERENCES releases(guid) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            title TEXT NOT NULL,
            version TEXT,
            isrc TEXT,
            iswc TEXT,
            file_url TEXT,
            language TEXT,
            is_instrumental INTEGER NOT NULL DEFAULT 0,
            is_explicit INTEGER NOT NULL DEFAULT 0,
            composition_type TEXT NOT NULL DEFAULT 'ORIGINAL',
            copyright_type TEXT NOT NULL DEFAULT 'ORIGINAL',
            ai_usage TEXT NOT NULL DEFAULT 'NONE',
            PRIMARY KEY (release_guid, guid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tracks_release ON tracks(release_guid, position)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_track_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS track_artists (
            release_guid TEXT NOT NULL,
            track_guid TEXT NOT NULL,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            legal_name TEXT,
            role TEXT NOT NULL,
            spotify_url TEXT,
            apple_id TEXT,
            PRIMARY KEY (release_guid, track_guid, position),
            FOREIGN KEY (release_guid, track_guid)
                REFERENCES tracks(release_guid, guid) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_track_writers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS track_writers (
            release_guid TEXT NOT NULL,
            track_guid TEXT NOT NULL,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            legal_name TEXT,
            role TEXT,
            share REAL,
            PRIMARY KEY (release_guid, track_guid, position),
            FOREIGN KEY (release_guid, track_guid)
                REFERENCES tracks(release_guid, guid) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Artist/writer pre-fill cache
///
/// Never referenced by foreign key from releases or tracks.
async fn create_library_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artist_library (
            user_guid TEXT NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            legal_name TEXT,
            spotify_url TEXT,
            apple_id TEXT,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_guid, name, role)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS writer_library (
            user_guid TEXT NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            legal_name TEXT,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_guid, name, role)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_admin_actions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_actions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            actor_guid TEXT NOT NULL,
            action TEXT NOT NULL,
            target_guid TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_notifications_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_guid TEXT NOT NULL,
            notice TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_guid)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// NULL values are reset to defaults; existing values are left alone.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(pool, RELEASE_MIN_LEAD_DAYS, "20").await?;
    ensure_setting(pool, EVENT_BUS_CAPACITY, "100").await?;
    Ok(())
}
