//! Event types for the mdist event system
//!
//! Provides shared event definitions and an EventBus for all mdist services.

mod release_types;

pub use release_types::{Notice, ReleaseStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// mdist event types
///
/// Events are broadcast via EventBus and can be serialized for SSE transmission.
/// They are emitted only after the change they describe has been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MdistEvent {
    /// A release changed lifecycle status
    ///
    /// Triggers:
    /// - SSE: Refresh admin review queues
    /// - SSE: Refresh owner dashboard
    ReleaseStatusChanged {
        release_id: Uuid,
        /// Release owner
        user_id: Uuid,
        /// Status before change (None when first persisted)
        old_status: Option<ReleaseStatus>,
        new_status: ReleaseStatus,
        /// User who caused the change
        actor_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A release was hard-deleted by an admin
    ReleaseDeleted {
        release_id: Uuid,
        user_id: Uuid,
        actor_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A notification was recorded for a user or the admin review queue
    NotificationRecorded {
        /// Recipient
        user_id: Uuid,
        notice: Notice,
        timestamp: DateTime<Utc>,
    },

    /// An admin action was written to the audit trail
    AdminActionLogged {
        actor_id: Uuid,
        action: String,
        target_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Social links were copied from a release onto the owner's profile
    SocialLinksSynced {
        user_id: Uuid,
        spotify_url: Option<String>,
        apple_id: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl MdistEvent {
    /// Event type name used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            MdistEvent::ReleaseStatusChanged { .. } => "ReleaseStatusChanged",
            MdistEvent::ReleaseDeleted { .. } => "ReleaseDeleted",
            MdistEvent::NotificationRecorded { .. } => "NotificationRecorded",
            MdistEvent::AdminActionLogged { .. } => "AdminActionLogged",
            MdistEvent::SocialLinksSynced { .. } => "SocialLinksSynced",
        }
    }
}

/// Broadcast bus for [`MdistEvent`]s
///
/// Cloning is cheap; all clones share one channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<MdistEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    ///
    /// # Examples
    ///
    /// ```
    /// use mdist_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx, capacity: capacity.max(1) }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<MdistEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: MdistEvent,
    ) -> Result<usize, broadcast::error::SendError<MdistEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: MdistEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
