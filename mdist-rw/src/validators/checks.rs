//! Individual release checks
//!
//! Each check returns every failure it finds, in a stable order. The caller
//! decides whether to keep only the first one (fail-fast) or all of them.

use crate::models::{is_blank, Release, ReleaseTiming};

use super::{ValidationContext, ValidationError};

/// Required descriptive fields, then per-track essentials, then history
pub fn required_fields(release: &Release) -> Vec<ValidationError> {
    let mut missing = Vec::new();
    let mut require = |present: bool, field: &'static str| {
        if !present {
            missing.push(ValidationError::missing(field));
        }
    };

    require(!release.title.trim().is_empty(), "title");
    require(release.release_type.is_some(), "type");
    require(!is_blank(release.genre.as_deref()), "genre");
    require(!is_blank(release.c_line.as_deref()), "c_line");
    require(!is_blank(release.p_line.as_deref()), "p_line");
    require(!is_blank(release.cover_url.as_deref()), "cover_url");
    require(!release.selected_stores.is_empty(), "selected_stores");
    require(!release.tracks.is_empty(), "tracks");

    for (index, track) in release.tracks.iter().enumerate() {
        let position = index + 1;
        if track.title.trim().is_empty() {
            missing.push(ValidationError::missing_on_track("track_title", position));
        }
        if is_blank(track.file_url.as_deref()) {
            missing.push(ValidationError::missing_on_track("track_audio", position));
        }
        let named_artist = track.artists.iter().any(|a| !a.name.trim().is_empty());
        if !named_artist || track.artists.iter().any(|a| a.name.trim().is_empty()) {
            missing.push(ValidationError::missing_on_track("track_artists", position));
        }
    }

    if release.distributed_before && release.original_release_date.is_none() {
        missing.push(ValidationError::missing("original_release_date"));
    }

    missing
}

/// At least one Producer credit anywhere on the release
pub fn producer_credit(release: &Release) -> Vec<ValidationError> {
    if release.tracks.iter().any(|t| t.has_producer()) {
        Vec::new()
    } else {
        vec![ValidationError::MissingProducerCredit]
    }
}

/// Every non-instrumental track has writers, and every writer is complete
pub fn writer_credit(release: &Release) -> Vec<ValidationError> {
    release
        .tracks
        .iter()
        .enumerate()
        .filter(|(_, track)| !track.is_instrumental)
        .filter(|(_, track)| {
            let any_named = track.writers.iter().any(|w| w.has_name());
            let all_complete = track.writers.iter().all(|w| w.role.is_some() && w.has_name());
            !(any_named && all_complete)
        })
        .map(|(index, track)| ValidationError::MissingWriterCredit {
            track_id: track.id,
            position: index + 1,
            title: track.title.clone(),
        })
        .collect()
}

/// Licensed content needs at least one clearance document
pub fn sample_clearance(release: &Release) -> Vec<ValidationError> {
    if release.has_licensed_content() && release.documents.is_empty() {
        vec![ValidationError::MissingClearanceDocuments]
    } else {
        Vec::new()
    }
}

pub fn attestations(release: &Release) -> Vec<ValidationError> {
    if release.confirmations.all_confirmed() {
        Vec::new()
    } else {
        vec![ValidationError::AttestationIncomplete]
    }
}

/// Specific-date releases need enough lead time
///
/// A date equal to the one already accepted for this release passes, so
/// later metadata edits are not blocked by the calendar moving on.
pub fn release_date(release: &Release, ctx: &ValidationContext) -> Vec<ValidationError> {
    if release.release_timing != ReleaseTiming::Specific {
        return Vec::new();
    }

    let earliest = ctx.earliest_release_date();
    match release.release_date {
        Some(date) if date >= earliest => Vec::new(),
        Some(date) if ctx.accepted_release_date == Some(date) => Vec::new(),
        _ => vec![ValidationError::ReleaseDateTooSoon { earliest }],
    }
}
