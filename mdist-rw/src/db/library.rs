//! Artist and writer library rows
//!
//! Keyed by (owner, name, role). Later uses overwrite the optional details.

use mdist_common::{time, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{enum_from_text, enum_to_text};
use crate::models::{ArtistLibraryEntry, ReleaseArtist, TrackWriter, WriterLibraryEntry};

pub async fn upsert_artists(pool: &SqlitePool, user_id: Uuid, artists: &[ReleaseArtist]) -> Result<()> {
    let now = time::now().to_rfc3339();
    let user_guid = user_id.to_string();
    let mut tx = pool.begin().await?;

    for artist in artists.iter().filter(|a| !a.name.trim().is_empty()) {
        sqlx::query(
            r#"
            INSERT INTO artist_library (user_guid, name, role, legal_name, spotify_url, apple_id, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_guid, name, role) DO UPDATE SET
                legal_name = COALESCE(excluded.legal_name, artist_library.legal_name),
                spotify_url = COALESCE(excluded.spotify_url, artist_library.spotify_url),
                apple_id = COALESCE(excluded.apple_id, artist_library.apple_id),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&user_guid)
        .bind(artist.name.trim())
        .bind(enum_to_text(&artist.role)?)
        .bind(&artist.legal_name)
        .bind(&artist.spotify_url)
        .bind(&artist.apple_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn upsert_writers(pool: &SqlitePool, user_id: Uuid, writers: &[TrackWriter]) -> Result<()> {
    let now = time::now().to_rfc3339();
    let user_guid = user_id.to_string();
    let mut tx = pool.begin().await?;

    for writer in writers {
        let Some(role) = writer.role else {
            continue;
        };
        if writer.name.trim().is_empty() {
            continue;
        }
        sqlx::query(
            r#"
            INSERT INTO writer_library (user_guid, name, role, legal_name, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_guid, name, role) DO UPDATE SET
                legal_name = COALESCE(excluded.legal_name, writer_library.legal_name),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&user_guid)
        .bind(writer.name.trim())
        .bind(enum_to_text(&role)?)
        .bind(&writer.legal_name)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn list_artists(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<ArtistLibraryEntry>> {
    let rows = sqlx::query(
        "SELECT * FROM artist_library WHERE user_guid = ? ORDER BY updated_at DESC, name",
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<ArtistLibraryEntry> {
            let role: String = row.try_get("role")?;
            let updated_at: String = row.try_get("updated_at")?;
            Ok(ArtistLibraryEntry {
                name: row.try_get("name")?,
                legal_name: row.try_get("legal_name")?,
                role: enum_from_text("artist_library.role", &role)?,
                spotify_url: row.try_get("spotify_url")?,
                apple_id: row.try_get("apple_id")?,
                updated_at: time::parse_timestamp(&updated_at)?,
            })
        })
        .collect()
}

pub async fn list_writers(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<WriterLibraryEntry>> {
    let rows = sqlx::query(
        "SELECT * FROM writer_library WHERE user_guid = ? ORDER BY updated_at DESC, name",
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<WriterLibraryEntry> {
            let role: String = row.try_get("role")?;
            let updated_at: String = row.try_get("updated_at")?;
            Ok(WriterLibraryEntry {
                name: row.try_get("name")?,
                legal_name: row.try_get("legal_name")?,
                role: enum_from_text("writer_library.role", &role)?,
                updated_at: time::parse_timestamp(&updated_at)?,
            })
        })
        .collect()
}
