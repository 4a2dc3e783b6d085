//! Persistence interfaces
//!
//! Controllers receive these as `Arc<dyn ...>` so tests can swap in
//! failing or in-memory implementations. [`crate::db::SqliteRepository`]
//! implements all of them on the shared pool.

use async_trait::async_trait;
use mdist_common::{ReleaseStatus, Result};
use uuid::Uuid;

use crate::models::{
    ArtistLibraryEntry, Release, ReleaseArtist, SocialLinks, TrackWriter, UserProfile,
    WriterLibraryEntry,
};

/// Which releases to list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseFilter {
    /// Empty means every status
    pub statuses: Vec<ReleaseStatus>,
    pub owner: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl ReleaseFilter {
    pub fn owned_by(user_id: Uuid) -> Self {
        Self {
            owner: Some(user_id),
            ..Self::default()
        }
    }

    pub fn with_statuses(statuses: &[ReleaseStatus]) -> Self {
        Self {
            statuses: statuses.to_vec(),
            ..Self::default()
        }
    }

    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }
}

#[async_trait]
pub trait ReleaseRepository: Send + Sync {
    /// `Error::NotFound` when no release has this id
    async fn load_release(&self, id: Uuid) -> Result<Release>;

    /// Insert or replace the release with all of its tracks and documents
    async fn save_release(&self, release: &Release) -> Result<Release>;

    /// Hard delete; cascades to tracks and credits
    async fn delete_release(&self, id: Uuid) -> Result<()>;

    /// Newest first
    async fn list_releases(&self, filter: &ReleaseFilter) -> Result<Vec<Release>>;

    /// Count ignoring `limit` and `offset`
    async fn count_releases(&self, filter: &ReleaseFilter) -> Result<i64>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn load_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    /// Write every `Some` link onto the profile, creating it if needed
    async fn update_social_links(&self, user_id: Uuid, links: &SocialLinks) -> Result<()>;
}

/// Pre-fill cache of previously used credits
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    async fn upsert_artists(&self, user_id: Uuid, artists: &[ReleaseArtist]) -> Result<()>;

    /// Writers without a role are skipped
    async fn upsert_writers(&self, user_id: Uuid, writers: &[TrackWriter]) -> Result<()>;

    async fn list_artists(&self, user_id: Uuid) -> Result<Vec<ArtistLibraryEntry>>;

    async fn list_writers(&self, user_id: Uuid) -> Result<Vec<WriterLibraryEntry>>;
}
