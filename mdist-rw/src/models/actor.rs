//! Acting user and profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::release::Release;
use super::track::{ArtistRole, WriterRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Artist,
    Admin,
}

impl FromStr for Role {
    type Err = mdist_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "artist" => Ok(Role::Artist),
            "admin" => Ok(Role::Admin),
            other => Err(mdist_common::Error::InvalidInput(format!(
                "Unknown role: {}",
                other
            ))),
        }
    }
}

/// The authenticated user performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn artist(user_id: Uuid) -> Self {
        Self { user_id, role: Role::Artist }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self { user_id, role: Role::Admin }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn owns(&self, release: &Release) -> bool {
        self.user_id == release.user_id
    }

    /// Owner or any admin
    pub fn can_view(&self, release: &Release) -> bool {
        self.is_admin() || self.owns(release)
    }
}

/// Links that may be copied from a release's primary artist to a profile
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    pub spotify_url: Option<String>,
    pub apple_id: Option<String>,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self.spotify_url.is_none() && self.apple_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub display_name: String,
    pub links: SocialLinks,
}

/// Previously used artist credit, offered for pre-fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistLibraryEntry {
    pub name: String,
    pub legal_name: Option<String>,
    pub role: ArtistRole,
    pub spotify_url: Option<String>,
    pub apple_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Previously used writer credit, offered for pre-fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriterLibraryEntry {
    pub name: String,
    pub legal_name: Option<String>,
    pub role: WriterRole,
    pub updated_at: DateTime<Utc>,
}
