//! Release metadata validators
//!
//! Pure checks over a candidate release. They run in a fixed order:
//! required fields, producer credit, writer credit, sample clearance,
//! attestations, release date. Submission reports the first failure; the
//! review summary reports all of them, each pointing at the wizard step that
//! fixes it.

pub mod checks;

use chrono::NaiveDate;
use mdist_common::time;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Release, WizardStep};

/// Default minimum days between submission and a scheduled release date
pub const DEFAULT_MIN_LEAD_DAYS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    /// A required field is empty; `track` is the 1-based track number for
    /// per-track fields
    #[error("Incomplete metadata: {field} is required{}", track_suffix(.track))]
    IncompleteMetadata {
        field: &'static str,
        track: Option<usize>,
    },

    #[error("At least one track must credit an artist with the Producer role")]
    MissingProducerCredit,

    #[error("Track {position} ({title}) needs complete writer credits")]
    MissingWriterCredit {
        track_id: Uuid,
        position: usize,
        title: String,
    },

    #[error("Licensed content requires at least one clearance document")]
    MissingClearanceDocuments,

    #[error("All four legal confirmations must be accepted")]
    AttestationIncomplete,

    #[error("Release date must be on or after {earliest}")]
    ReleaseDateTooSoon { earliest: NaiveDate },
}

fn track_suffix(track: &Option<usize>) -> String {
    track.map(|n| format!(" on track {}", n)).unwrap_or_default()
}

impl ValidationError {
    pub(crate) fn missing(field: &'static str) -> Self {
        ValidationError::IncompleteMetadata { field, track: None }
    }

    pub(crate) fn missing_on_track(field: &'static str, position: usize) -> Self {
        ValidationError::IncompleteMetadata {
            field,
            track: Some(position),
        }
    }

    /// Wizard step where the user fixes this error
    pub fn step(&self) -> WizardStep {
        match self {
            ValidationError::IncompleteMetadata { field, .. } => match *field {
                "type" => WizardStep::Type,
                "tracks" | "track_title" | "track_audio" => WizardStep::Upload,
                "track_artists" => WizardStep::Metadata,
                "cover_url" => WizardStep::Artwork,
                "selected_stores" => WizardStep::Stores,
                _ => WizardStep::Details,
            },
            ValidationError::MissingProducerCredit
            | ValidationError::MissingWriterCredit { .. }
            | ValidationError::MissingClearanceDocuments => WizardStep::Metadata,
            ValidationError::AttestationIncomplete => WizardStep::Review,
            ValidationError::ReleaseDateTooSoon { .. } => WizardStep::Details,
        }
    }
}

/// Inputs the checks need besides the release itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub today: NaiveDate,
    pub min_lead_days: u32,
    /// Release date that already passed the date check for this release
    pub accepted_release_date: Option<NaiveDate>,
}

impl ValidationContext {
    pub fn new(today: NaiveDate, min_lead_days: u32) -> Self {
        Self {
            today,
            min_lead_days,
            accepted_release_date: None,
        }
    }

    /// Context for the current UTC date
    pub fn current(min_lead_days: u32) -> Self {
        Self::new(time::today(), min_lead_days)
    }

    pub fn with_accepted_date(mut self, date: Option<NaiveDate>) -> Self {
        self.accepted_release_date = date;
        self
    }

    pub fn earliest_release_date(&self) -> NaiveDate {
        time::earliest_release_date(self.today, self.min_lead_days)
    }
}

/// One validator family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    RequiredFields,
    ProducerCredit,
    WriterCredit,
    SampleClearance,
    Attestation,
    ReleaseDate,
}

impl Check {
    /// Full submission chain
    pub const SUBMISSION: [Check; 6] = [
        Check::RequiredFields,
        Check::ProducerCredit,
        Check::WriterCredit,
        Check::SampleClearance,
        Check::Attestation,
        Check::ReleaseDate,
    ];

    /// Checks every persisted non-draft release must keep passing
    pub const PERSISTED: [Check; 5] = [
        Check::RequiredFields,
        Check::ProducerCredit,
        Check::WriterCredit,
        Check::SampleClearance,
        Check::ReleaseDate,
    ];

    fn run(self, release: &Release, ctx: &ValidationContext) -> Vec<ValidationError> {
        match self {
            Check::RequiredFields => checks::required_fields(release),
            Check::ProducerCredit => checks::producer_credit(release),
            Check::WriterCredit => checks::writer_credit(release),
            Check::SampleClearance => checks::sample_clearance(release),
            Check::Attestation => checks::attestations(release),
            Check::ReleaseDate => checks::release_date(release, ctx),
        }
    }
}

/// All failures from `chain`, in chain order
pub fn collect(release: &Release, ctx: &ValidationContext, chain: &[Check]) -> Vec<ValidationError> {
    chain.iter().flat_map(|check| check.run(release, ctx)).collect()
}

/// First failure from `chain`
pub fn first_failure(
    release: &Release,
    ctx: &ValidationContext,
    chain: &[Check],
) -> Result<(), ValidationError> {
    for check in chain {
        if let Some(error) = check.run(release, ctx).into_iter().next() {
            return Err(error);
        }
    }
    Ok(())
}

/// Fail-fast submission validation
pub fn validate_for_submit(release: &Release, ctx: &ValidationContext) -> Result<(), ValidationError> {
    first_failure(release, ctx, &Check::SUBMISSION)
}

/// Fail-fast validation for saving a release that already left DRAFT
pub fn validate_persisted(release: &Release, ctx: &ValidationContext) -> Result<(), ValidationError> {
    first_failure(release, ctx, &Check::PERSISTED)
}

/// First failure owned by `step`, used when advancing the wizard
pub fn validate_step(
    release: &Release,
    ctx: &ValidationContext,
    step: WizardStep,
) -> Result<(), ValidationError> {
    // Attestations are accepted together with the final submit
    if step == WizardStep::Review {
        return Ok(());
    }
    match collect(release, ctx, &Check::SUBMISSION)
        .into_iter()
        .find(|error| error.step() == step)
    {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Review-summary entry with a deep link to the step that fixes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub step: WizardStep,
    pub step_number: u8,
    pub message: String,
    pub error: ValidationError,
}

impl From<ValidationError> for ReviewItem {
    fn from(error: ValidationError) -> Self {
        let step = error.step();
        Self {
            step,
            step_number: step.number(),
            message: error.to_string(),
            error,
        }
    }
}

/// Collect-all review of the full submission chain
pub fn review(release: &Release, ctx: &ValidationContext) -> Vec<ReviewItem> {
    collect(release, ctx, &Check::SUBMISSION)
        .into_iter()
        .map(ReviewItem::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ArtistRole, Confirmations, CopyrightType, DocumentRef, ReleaseArtist, ReleaseTiming,
        ReleaseType, Track, TrackWriter, WriterRole,
    };
    use chrono::{Duration, Utc};

    fn ctx() -> ValidationContext {
        ValidationContext::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), DEFAULT_MIN_LEAD_DAYS)
    }

    fn credited_track(title: &str) -> Track {
        let mut track = Track::new(title);
        track.file_url = Some("asset://audio/abc".to_string());
        track.artists.push(ReleaseArtist {
            name: "Main Act".to_string(),
            role: ArtistRole::PrimaryArtist,
            ..ReleaseArtist::default()
        });
        track.artists.push(ReleaseArtist {
            name: "Pat Producer".to_string(),
            role: ArtistRole::Producer,
            ..ReleaseArtist::default()
        });
        track.writers.push(TrackWriter {
            name: "Wren Writer".to_string(),
            role: Some(WriterRole::Songwriter),
            ..TrackWriter::default()
        });
        track
    }

    fn complete_release() -> Release {
        let mut release = Release::new_draft(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        release.title = "First Light".to_string();
        release.release_type = Some(ReleaseType::Single);
        release.genre = Some("Electronic".to_string());
        release.c_line = Some("2026 Main Act".to_string());
        release.p_line = Some("2026 Main Act".to_string());
        release.cover_url = Some("asset://image/cover".to_string());
        release.selected_stores.insert("spotify".to_string());
        release.tracks.push(credited_track("First Light"));
        release.confirmations = Confirmations {
            rights: true,
            accuracy: true,
            commission: true,
            liability: true,
        };
        release
    }

    #[test]
    fn test_complete_release_passes() {
        let release = complete_release();
        assert_eq!(validate_for_submit(&release, &ctx()), Ok(()));
        assert!(review(&release, &ctx()).is_empty());
    }

    #[test]
    fn test_first_missing_field_reported() {
        let mut release = complete_release();
        release.genre = None;
        release.cover_url = Some("  ".to_string());

        assert_eq!(
            validate_for_submit(&release, &ctx()),
            Err(ValidationError::missing("genre"))
        );
        let items = review(&release, &ctx());
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].step, WizardStep::Artwork);
    }

    #[test]
    fn test_fail_fast_order_follows_chain() {
        let mut release = complete_release();
        release.tracks[0].artists.retain(|a| a.role != ArtistRole::Producer);
        release.confirmations.liability = false;

        assert_eq!(
            validate_for_submit(&release, &ctx()),
            Err(ValidationError::MissingProducerCredit)
        );
        let codes: Vec<_> = review(&release, &ctx()).into_iter().map(|i| i.error).collect();
        assert_eq!(
            codes,
            vec![ValidationError::MissingProducerCredit, ValidationError::AttestationIncomplete]
        );
    }

    #[test]
    fn test_writer_credit_identifies_track() {
        let mut release = complete_release();
        let mut second = credited_track("Second");
        second.writers.clear();
        let second_id = second.id;
        release.tracks.push(second);

        match validate_for_submit(&release, &ctx()) {
            Err(ValidationError::MissingWriterCredit { track_id, position, .. }) => {
                assert_eq!(track_id, second_id);
                assert_eq!(position, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_writer_without_role_fails() {
        let mut release = complete_release();
        release.tracks[0].writers.push(TrackWriter {
            name: "No Role".to_string(),
            ..TrackWriter::default()
        });
        assert!(matches!(
            validate_for_submit(&release, &ctx()),
            Err(ValidationError::MissingWriterCredit { .. })
        ));
    }

    #[test]
    fn test_instrumental_skips_writer_check() {
        let mut release = complete_release();
        release.tracks[0].writers.clear();
        release.tracks[0].is_instrumental = true;
        assert_eq!(validate_for_submit(&release, &ctx()), Ok(()));
    }

    #[test]
    fn test_licensed_content_needs_documents() {
        let mut release = complete_release();
        release.tracks[0].copyright_type = CopyrightType::Licensed;
        assert_eq!(
            validate_for_submit(&release, &ctx()),
            Err(ValidationError::MissingClearanceDocuments)
        );

        release.documents.push(DocumentRef {
            name: "sample-license.pdf".to_string(),
            url: "asset://document/lic".to_string(),
        });
        assert_eq!(validate_for_submit(&release, &ctx()), Ok(()));
    }

    #[test]
    fn test_release_date_lead_time() {
        let ctx = ctx();
        let mut release = complete_release();
        release.release_timing = ReleaseTiming::Specific;

        release.release_date = None;
        assert!(matches!(
            validate_for_submit(&release, &ctx),
            Err(ValidationError::ReleaseDateTooSoon { .. })
        ));

        release.release_date = Some(ctx.today + Duration::days(1));
        assert_eq!(
            validate_for_submit(&release, &ctx),
            Err(ValidationError::ReleaseDateTooSoon {
                earliest: ctx.today + Duration::days(20)
            })
        );

        release.release_date = Some(ctx.today + Duration::days(20));
        assert_eq!(validate_for_submit(&release, &ctx), Ok(()));
    }

    #[test]
    fn test_accepted_date_is_not_rechecked() {
        let mut release = complete_release();
        release.release_timing = ReleaseTiming::Specific;
        let past = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        release.release_date = Some(past);

        assert!(validate_persisted(&release, &ctx()).is_err());
        let ctx = ctx().with_accepted_date(Some(past));
        assert_eq!(validate_persisted(&release, &ctx), Ok(()));
    }

    #[test]
    fn test_original_date_required_when_distributed_before() {
        let mut release = complete_release();
        release.distributed_before = true;
        let error = validate_for_submit(&release, &ctx()).unwrap_err();
        assert_eq!(error, ValidationError::missing("original_release_date"));
        assert_eq!(error.step(), WizardStep::Details);
    }

    #[test]
    fn test_persisted_chain_ignores_attestation() {
        let mut release = complete_release();
        release.confirmations = Confirmations::default();
        assert_eq!(validate_persisted(&release, &ctx()), Ok(()));
        assert_eq!(
            validate_for_submit(&release, &ctx()),
            Err(ValidationError::AttestationIncomplete)
        );
    }

    #[test]
    fn test_step_scoped_validation() {
        let mut release = complete_release();
        release.cover_url = None;
        release.tracks[0].artists.retain(|a| a.role != ArtistRole::Producer);

        assert_eq!(validate_step(&release, &ctx(), WizardStep::Details), Ok(()));
        assert_eq!(
            validate_step(&release, &ctx(), WizardStep::Metadata),
            Err(ValidationError::MissingProducerCredit)
        );
        assert_eq!(
            validate_step(&release, &ctx(), WizardStep::Artwork),
            Err(ValidationError::missing("cover_url"))
        );
    }

    #[test]
    fn test_validators_are_idempotent() {
        let mut release = complete_release();
        release.tracks[0].writers.clear();
        let first = collect(&release, &ctx(), &Check::SUBMISSION);
        let second = collect(&release, &ctx(), &Check::SUBMISSION);
        assert_eq!(first, second);
    }

    #[test]
    fn test_error_serializes_with_code() {
        let json = serde_json::to_value(ValidationError::missing_on_track("track_audio", 2)).unwrap();
        assert_eq!(json["code"], "INCOMPLETE_METADATA");
        assert_eq!(json["field"], "track_audio");
        assert_eq!(json["track"], 2);
    }
}
