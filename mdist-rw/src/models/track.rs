//! Track and credit types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtistRole {
    PrimaryArtist,
    Featured,
    Remixer,
    Producer,
    Contributor,
    Composer,
    Lyricist,
    Songwriter,
}

impl Default for ArtistRole {
    fn default() -> Self {
        ArtistRole::PrimaryArtist
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WriterRole {
    Composer,
    Lyricist,
    Songwriter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositionType {
    #[default]
    Original,
    Cover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CopyrightType {
    #[default]
    Original,
    RoyaltyFree,
    /// Contains licensed material or samples; needs clearance documents
    Licensed,
    PublicDomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiUsage {
    #[default]
    None,
    Partial,
    Full,
}

/// Artist credit on a track
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseArtist {
    pub name: String,
    pub legal_name: Option<String>,
    pub role: ArtistRole,
    pub spotify_url: Option<String>,
    pub apple_id: Option<String>,
}

/// Songwriting credit on a track
///
/// `share` is informational; nothing requires shares to sum to 100.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackWriter {
    pub name: String,
    pub legal_name: Option<String>,
    pub role: Option<WriterRole>,
    pub share: Option<f64>,
}

impl TrackWriter {
    /// True when either the credited or the legal name is filled in
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty() || !is_blank(self.legal_name.as_deref())
    }
}

/// A track belonging to exactly one release
///
/// Position in `Release::tracks` is the track number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub isrc: Option<String>,
    #[serde(default)]
    pub iswc: Option<String>,
    /// Reference returned by the asset store; the bytes live there
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub is_instrumental: bool,
    #[serde(default)]
    pub is_explicit: bool,
    #[serde(default)]
    pub composition_type: CompositionType,
    #[serde(default)]
    pub copyright_type: CopyrightType,
    #[serde(default)]
    pub ai_usage: AiUsage,
    #[serde(default)]
    pub artists: Vec<ReleaseArtist>,
    #[serde(default)]
    pub writers: Vec<TrackWriter>,
}

impl Track {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            version: None,
            isrc: None,
            iswc: None,
            file_url: None,
            language: None,
            is_instrumental: false,
            is_explicit: false,
            composition_type: CompositionType::default(),
            copyright_type: CopyrightType::default(),
            ai_usage: AiUsage::default(),
            artists: Vec::new(),
            writers: Vec::new(),
        }
    }

    pub fn has_producer(&self) -> bool {
        self.artists.iter().any(|a| a.role == ArtistRole::Producer)
    }
}

/// True for `None`, empty and whitespace-only strings
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
