//! Release aggregate
//!
//! A `Release` owns its tracks and documents. Identity fields (`id`,
//! `user_id`, `created_date`), the system identifier `wupc` and lifecycle
//! fields (`status`, `rejection_reason`) are never taken from client input:
//! clients send a [`ReleaseForm`], which only carries editable fields.

use chrono::{DateTime, NaiveDate, Utc};
use mdist_common::ReleaseStatus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use uuid::Uuid;

use super::track::{ArtistRole, CopyrightType, ReleaseArtist, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseType {
    Single,
    #[serde(rename = "EP")]
    Ep,
    Album,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerritoryPolicy {
    #[default]
    Global,
    Restricted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseTiming {
    #[default]
    Asap,
    Specific,
}

/// Per-platform monetization opt-ins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Monetization {
    pub youtube_content_id: bool,
    pub meta_rights_manager: bool,
    pub tiktok_library: bool,
}

/// Legal attestations confirmed on the review step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Confirmations {
    pub rights: bool,
    pub accuracy: bool,
    pub commission: bool,
    pub liability: bool,
}

impl Confirmations {
    pub fn all_confirmed(&self) -> bool {
        self.rights && self.accuracy && self.commission && self.liability
    }
}

/// Stored reference to a supporting document (license, sample clearance)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub release_type: Option<ReleaseType>,
    pub genre: Option<String>,
    pub sub_genre: Option<String>,
    pub c_line: Option<String>,
    pub c_year: Option<i32>,
    pub p_line: Option<String>,
    pub p_year: Option<i32>,
    pub record_label: Option<String>,
    pub upc: Option<String>,
    pub wupc: Option<String>,
    pub cover_url: Option<String>,
    pub selected_stores: BTreeSet<String>,
    pub monetization: Monetization,
    pub territory_policy: TerritoryPolicy,
    pub release_timing: ReleaseTiming,
    pub release_date: Option<NaiveDate>,
    pub distributed_before: bool,
    pub original_release_date: Option<NaiveDate>,
    pub status: ReleaseStatus,
    pub rejection_reason: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tracks: Vec<Track>,
    pub documents: Vec<DocumentRef>,
    pub confirmations: Confirmations,
}

impl Release {
    /// Blank release in DRAFT owned by `user_id`
    pub fn new_draft(id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            title: String::new(),
            release_type: None,
            genre: None,
            sub_genre: None,
            c_line: None,
            c_year: None,
            p_line: None,
            p_year: None,
            record_label: None,
            upc: None,
            wupc: None,
            cover_url: None,
            selected_stores: BTreeSet::new(),
            monetization: Monetization::default(),
            territory_policy: TerritoryPolicy::default(),
            release_timing: ReleaseTiming::default(),
            release_date: None,
            distributed_before: false,
            original_release_date: None,
            status: ReleaseStatus::Draft,
            rejection_reason: None,
            created_date: now,
            updated_at: now,
            tracks: Vec::new(),
            documents: Vec::new(),
            confirmations: Confirmations::default(),
        }
    }

    /// Copy every owner-editable field from `form`
    ///
    /// Confirmations are only taken while the release is still a draft; once
    /// captured by the first submit they stay as they are. The same goes for
    /// track ISRCs: after the release leaves draft a track keeps the ISRC it
    /// already has, whatever the form says.
    pub fn apply_form(&mut self, form: ReleaseForm) {
        if self.status == ReleaseStatus::Draft {
            self.confirmations = form.confirmations;
            self.apply_metadata(form);
            return;
        }

        let mut assigned: HashMap<Uuid, String> = self
            .tracks
            .iter()
            .filter_map(|t| match t.isrc.as_deref() {
                Some(isrc) if !isrc.trim().is_empty() => Some((t.id, isrc.to_string())),
                _ => None,
            })
            .collect();
        self.apply_metadata(form);
        for track in &mut self.tracks {
            if let Some(isrc) = assigned.remove(&track.id) {
                track.isrc = Some(isrc);
            }
        }
    }

    /// Copy editable fields for an admin override; confirmations are untouched
    pub fn apply_admin_override(&mut self, form: ReleaseForm) {
        self.apply_metadata(form);
    }

    fn apply_metadata(&mut self, form: ReleaseForm) {
        self.title = form.title;
        self.release_type = form.release_type;
        self.genre = form.genre;
        self.sub_genre = form.sub_genre;
        self.c_line = form.c_line;
        self.c_year = form.c_year;
        self.p_line = form.p_line;
        self.p_year = form.p_year;
        self.record_label = form.record_label;
        self.upc = form.upc;
        self.cover_url = form.cover_url;
        self.selected_stores = form.selected_stores;
        self.monetization = form.monetization;
        self.territory_policy = form.territory_policy;
        self.release_timing = form.release_timing;
        self.release_date = form.release_date;
        self.distributed_before = form.distributed_before;
        self.original_release_date = form.original_release_date;
        self.tracks = form.tracks;
        self.documents = form.documents;
    }

    /// Editable view of this release, used to seed a wizard buffer
    pub fn to_form(&self) -> ReleaseForm {
        ReleaseForm {
            title: self.title.clone(),
            release_type: self.release_type,
            genre: self.genre.clone(),
            sub_genre: self.sub_genre.clone(),
            c_line: self.c_line.clone(),
            c_year: self.c_year,
            p_line: self.p_line.clone(),
            p_year: self.p_year,
            record_label: self.record_label.clone(),
            upc: self.upc.clone(),
            cover_url: self.cover_url.clone(),
            selected_stores: self.selected_stores.clone(),
            monetization: self.monetization,
            territory_policy: self.territory_policy,
            release_timing: self.release_timing,
            release_date: self.release_date,
            distributed_before: self.distributed_before,
            original_release_date: self.original_release_date,
            tracks: self.tracks.clone(),
            documents: self.documents.clone(),
            confirmations: self.confirmations,
        }
    }

    /// Assign the internal catalog identifier if none exists yet
    ///
    /// Returns true when a new value was assigned. An existing WUPC is never
    /// replaced.
    pub fn assign_wupc(&mut self, generate: impl FnOnce() -> String) -> bool {
        if self.wupc.is_some() {
            return false;
        }
        self.wupc = Some(generate());
        true
    }

    /// First Primary Artist credit on the first track that has one, falling
    /// back to the first artist of the first track
    pub fn primary_artist(&self) -> Option<&ReleaseArtist> {
        self.tracks
            .iter()
            .flat_map(|t| t.artists.iter())
            .find(|a| a.role == ArtistRole::PrimaryArtist)
            .or_else(|| self.tracks.first().and_then(|t| t.artists.first()))
    }

    pub fn has_licensed_content(&self) -> bool {
        self.tracks
            .iter()
            .any(|t| t.copyright_type == CopyrightType::Licensed)
    }

    /// First track id used by more than one track, if any
    pub fn duplicate_track_id(&self) -> Option<Uuid> {
        first_duplicate_id(&self.tracks)
    }

    /// True when both releases carry the same tracks in the same order with
    /// the same audio
    pub fn same_track_layout(&self, other: &Release) -> bool {
        self.tracks.len() == other.tracks.len()
            && self
                .tracks
                .iter()
                .zip(other.tracks.iter())
                .all(|(a, b)| a.id == b.id && a.file_url == b.file_url)
    }
}

fn first_duplicate_id(tracks: &[Track]) -> Option<Uuid> {
    let mut seen = HashSet::with_capacity(tracks.len());
    tracks.iter().map(|t| t.id).find(|id| !seen.insert(*id))
}

/// Owner- or admin-editable release fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseForm {
    pub title: String,
    pub release_type: Option<ReleaseType>,
    pub genre: Option<String>,
    pub sub_genre: Option<String>,
    pub c_line: Option<String>,
    pub c_year: Option<i32>,
    pub p_line: Option<String>,
    pub p_year: Option<i32>,
    pub record_label: Option<String>,
    pub upc: Option<String>,
    pub cover_url: Option<String>,
    pub selected_stores: BTreeSet<String>,
    pub monetization: Monetization,
    pub territory_policy: TerritoryPolicy,
    pub release_timing: ReleaseTiming,
    pub release_date: Option<NaiveDate>,
    pub distributed_before: bool,
    pub original_release_date: Option<NaiveDate>,
    pub tracks: Vec<Track>,
    pub documents: Vec<DocumentRef>,
    pub confirmations: Confirmations,
}

impl ReleaseForm {
    pub fn duplicate_track_id(&self) -> Option<Uuid> {
        first_duplicate_id(&self.tracks)
    }
}
