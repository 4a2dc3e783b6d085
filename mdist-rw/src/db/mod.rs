//! SQLite persistence for the release workflow
//!
//! Plain functions over `&SqlitePool`, grouped per table family, with
//! [`SqliteRepository`] exposing them through the repository traits.

pub mod admin_actions;
pub mod library;
pub mod notifications;
pub mod releases;
pub mod users;

use async_trait::async_trait;
use mdist_common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    ArtistLibraryEntry, Release, ReleaseArtist, SocialLinks, TrackWriter, UserProfile,
    WriterLibraryEntry,
};
use crate::repository::{LibraryRepository, ReleaseFilter, ReleaseRepository, UserRepository};

/// Column text for a unit enum, using its serde name (`"PRIMARY_ARTIST"`)
pub(crate) fn enum_to_text<T: Serialize>(value: &T) -> Result<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(text) => Ok(text),
        other => Err(Error::Internal(format!(
            "Expected a string enum, got {}",
            other
        ))),
    }
}

pub(crate) fn enum_from_text<T: DeserializeOwned>(column: &str, text: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(text.to_string())).map_err(|e| {
        Error::Internal(format!("Invalid {} value '{}': {}", column, text, e))
    })
}

/// Repository traits backed by the service database
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReleaseRepository for SqliteRepository {
    async fn load_release(&self, id: Uuid) -> Result<Release> {
        releases::load_release(&self.pool, id).await
    }

    async fn save_release(&self, release: &Release) -> Result<Release> {
        releases::save_release(&self.pool, release).await
    }

    async fn delete_release(&self, id: Uuid) -> Result<()> {
        releases::delete_release(&self.pool, id).await
    }

    async fn list_releases(&self, filter: &ReleaseFilter) -> Result<Vec<Release>> {
        releases::list_releases(&self.pool, filter).await
    }

    async fn count_releases(&self, filter: &ReleaseFilter) -> Result<i64> {
        releases::count_releases(&self.pool, filter).await
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn load_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        users::load_profile(&self.pool, user_id).await
    }

    async fn update_social_links(&self, user_id: Uuid, links: &SocialLinks) -> Result<()> {
        users::update_social_links(&self.pool, user_id, links).await
    }
}

#[async_trait]
impl LibraryRepository for SqliteRepository {
    async fn upsert_artists(&self, user_id: Uuid, artists: &[ReleaseArtist]) -> Result<()> {
        library::upsert_artists(&self.pool, user_id, artists).await
    }

    async fn upsert_writers(&self, user_id: Uuid, writers: &[TrackWriter]) -> Result<()> {
        library::upsert_writers(&self.pool, user_id, writers).await
    }

    async fn list_artists(&self, user_id: Uuid) -> Result<Vec<ArtistLibraryEntry>> {
        library::list_artists(&self.pool, user_id).await
    }

    async fn list_writers(&self, user_id: Uuid) -> Result<Vec<WriterLibraryEntry>> {
        library::list_writers(&self.pool, user_id).await
    }
}
