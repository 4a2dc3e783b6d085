//! Release lifecycle types shared by events and persistence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a release
///
/// Stored in the `releases.status` column using [`ReleaseStatus::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatus {
    /// Saved mid-wizard, not yet validated
    Draft,
    /// Submitted, waiting for admin review
    Pending,
    /// Live in the catalog
    Approved,
    /// Rejected by an admin, with a reason
    Rejected,
    /// Approved release with metadata changes awaiting re-review
    Editing,
    /// Owner asked for removal from storefronts
    TakedownRequested,
    /// Removed from storefronts
    TakedownComplete,
}

impl ReleaseStatus {
    pub const ALL: [ReleaseStatus; 7] = [
        ReleaseStatus::Draft,
        ReleaseStatus::Pending,
        ReleaseStatus::Approved,
        ReleaseStatus::Rejected,
        ReleaseStatus::Editing,
        ReleaseStatus::TakedownRequested,
        ReleaseStatus::TakedownComplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStatus::Draft => "DRAFT",
            ReleaseStatus::Pending => "PENDING",
            ReleaseStatus::Approved => "APPROVED",
            ReleaseStatus::Rejected => "REJECTED",
            ReleaseStatus::Editing => "EDITING",
            ReleaseStatus::TakedownRequested => "TAKEDOWN_REQUESTED",
            ReleaseStatus::TakedownComplete => "TAKEDOWN_COMPLETE",
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReleaseStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("Unknown release status: {}", s)))
    }
}

/// Notification payload delivered to a user (or to the admin review queue)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A release entered the review queue
    ReviewRequested { release_id: uuid::Uuid, title: String },
    /// An approved release has metadata changes awaiting review
    EditReviewRequested { release_id: uuid::Uuid, title: String },
    /// The owner asked for a takedown
    TakedownReviewRequested { release_id: uuid::Uuid, title: String },
    ReleaseApproved { release_id: uuid::Uuid, title: String },
    ReleaseRejected { release_id: uuid::Uuid, title: String, reason: String },
    TakedownCompleted { release_id: uuid::Uuid, title: String },
    TakedownDeclined { release_id: uuid::Uuid, title: String },
}
