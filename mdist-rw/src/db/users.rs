//! User profile rows

use mdist_common::{time, uuid_utils, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::{SocialLinks, UserProfile};

pub async fn load_profile(pool: &SqlitePool, user_id: Uuid) -> Result<Option<UserProfile>> {
    let row = sqlx::query("SELECT guid, display_name, spotify_url, apple_id FROM users WHERE guid = ?")
        .bind(user_id.to_string())
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let guid: String = row.try_get("guid")?;
    Ok(Some(UserProfile {
        user_id: uuid_utils::parse_column("users.guid", &guid)?,
        display_name: row.try_get("display_name")?,
        links: SocialLinks {
            spotify_url: row.try_get("spotify_url")?,
            apple_id: row.try_get("apple_id")?,
        },
    }))
}

/// Create or update a profile row
pub async fn upsert_profile(pool: &SqlitePool, profile: &UserProfile) -> Result<()> {
    let now = time::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO users (guid, display_name, spotify_url, apple_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(guid) DO UPDATE SET
            display_name = excluded.display_name,
            spotify_url = excluded.spotify_url,
            apple_id = excluded.apple_id,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(profile.user_id.to_string())
    .bind(&profile.display_name)
    .bind(&profile.links.spotify_url)
    .bind(&profile.links.apple_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Set each provided link; `None` leaves the stored value alone
pub async fn update_social_links(pool: &SqlitePool, user_id: Uuid, links: &SocialLinks) -> Result<()> {
    let now = time::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO users (guid, spotify_url, apple_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(guid) DO UPDATE SET
            spotify_url = COALESCE(excluded.spotify_url, users.spotify_url),
            apple_id = COALESCE(excluded.apple_id, users.apple_id),
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id.to_string())
    .bind(&links.spotify_url)
    .bind(&links.apple_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}
