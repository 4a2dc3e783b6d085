//! Workflow controllers
//!
//! [`SubmissionWorkflow`] drives the owner-facing wizard and
//! [`AdminReview`] the back office. Both request status changes through
//! [`crate::state_machine::attempt_transition`] and hand the resulting side
//! effects to [`effects`].

pub mod admin_review;
pub mod effects;
pub mod submission;
pub mod wizard;

use mdist_common::EventBus;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::collaborators::{AuditLog, IdentifierGenerator, Notifier};
use crate::models::WizardStep;
use crate::repository::{LibraryRepository, ReleaseRepository, UserRepository};
use crate::state_machine::TransitionError;
use crate::validators::{ReviewItem, ValidationError};

pub use admin_review::{AdminReview, ReleasePage, ReviewQueue};
pub use submission::SubmissionWorkflow;
pub use wizard::{WizardSession, WizardSessions};

/// Injected persistence and collaborator handles
#[derive(Clone)]
pub struct Collaborators {
    pub releases: Arc<dyn ReleaseRepository>,
    pub users: Arc<dyn UserRepository>,
    pub library: Arc<dyn LibraryRepository>,
    pub identifiers: Arc<dyn IdentifierGenerator>,
    pub notifier: Arc<dyn Notifier>,
    pub audit: Arc<dyn AuditLog>,
    pub event_bus: EventBus,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Final submit found outstanding problems; nothing was persisted
    #[error("Submission blocked by {} validation error(s)", .0.len())]
    SubmissionBlocked(Vec<ReviewItem>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Step {requested} is not reachable; furthest step is {furthest}")]
    StepNotReachable {
        requested: WizardStep,
        furthest: WizardStep,
    },

    #[error("Wizard session {0} not found")]
    SessionNotFound(Uuid),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Repository error: {0}")]
    Repository(mdist_common::Error),
}

impl From<mdist_common::Error> for WorkflowError {
    fn from(err: mdist_common::Error) -> Self {
        match err {
            mdist_common::Error::NotFound(what) => WorkflowError::NotFound(what),
            other => WorkflowError::Repository(other),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Denial for reads and session access by someone other than the owner
pub(crate) fn not_authorized(event: &'static str) -> WorkflowError {
    WorkflowError::Transition(TransitionError::ActorNotAuthorized { event })
}
