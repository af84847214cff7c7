//! User notification records and the expiry predicate the cleanup job runs on.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::outcome::{run_guarded, ValidationOutcome};
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Notifications with no explicit expiry fall back to this retention window.
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

/// Maximum allowed length for a notification title.
pub const MAX_TITLE_LENGTH: usize = 200;

pub const CODE_MISSING_RECIPIENT: &str = "missing_recipient";
pub const CODE_TITLE_REQUIRED: &str = "title_required";
pub const CODE_TITLE_TOO_LONG: &str = "title_too_long";
pub const CODE_EXPIRY_IN_PAST: &str = "expiry_in_past";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// What the notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ReleaseStatusChanged,
    SplitInvitation,
    CollaborationInvitation,
    VersionPublished,
    RoyaltyStatement,
    System,
}

/// Delivery urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
    Urgent,
}

/// A notification addressed to one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub recipient_id: EntityId,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub body: Option<String>,
    /// Entity the notification points back at, when there is one.
    pub subject_id: Option<EntityId>,
    pub read_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Whether the cleanup job may physically remove this record.
    ///
    /// Explicit expiry wins; otherwise the default retention window applies
    /// from creation time.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => now >= self.created_at + Duration::days(DEFAULT_RETENTION_DAYS),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a notification before it is handed to the persistence layer.
pub fn validate_notification_for_creation(
    notification: &Notification,
    now: Timestamp,
) -> ValidationOutcome {
    run_guarded(|acc| {
        if notification.recipient_id.is_nil() {
            acc.error(
                CODE_MISSING_RECIPIENT,
                "recipient_id",
                "A notification must have a recipient",
            );
        }
        let title = notification.title.trim();
        if title.is_empty() {
            acc.error(CODE_TITLE_REQUIRED, "title", "Title must not be empty");
        } else if notification.title.chars().count() > MAX_TITLE_LENGTH {
            acc.error(
                CODE_TITLE_TOO_LONG,
                "title",
                format!(
                    "Title must not exceed {MAX_TITLE_LENGTH} characters, got {}",
                    notification.title.chars().count()
                ),
            );
        }
        if let Some(expires_at) = notification.expires_at {
            if expires_at <= now {
                acc.warning(
                    CODE_EXPIRY_IN_PAST,
                    "expires_at",
                    "Notification expires immediately",
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn notification() -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            notification_type: NotificationType::SplitInvitation,
            priority: NotificationPriority::Normal,
            title: "You have been added to a split".to_string(),
            body: None,
            subject_id: Some(Uuid::new_v4()),
            read_at: None,
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn well_formed_notification_passes() {
        let outcome = validate_notification_for_creation(&notification(), Utc::now());
        assert!(outcome.is_valid);
        assert!(!outcome.has_warnings);
    }

    #[test]
    fn nil_recipient_is_an_error() {
        let mut n = notification();
        n.recipient_id = Uuid::nil();
        let outcome = validate_notification_for_creation(&n, Utc::now());
        assert!(outcome.has_error_code(CODE_MISSING_RECIPIENT));
    }

    #[test]
    fn blank_title_is_an_error() {
        let mut n = notification();
        n.title = "   ".to_string();
        let outcome = validate_notification_for_creation(&n, Utc::now());
        assert!(outcome.has_error_code(CODE_TITLE_REQUIRED));
    }

    #[test]
    fn oversized_title_is_an_error() {
        let mut n = notification();
        n.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        let outcome = validate_notification_for_creation(&n, Utc::now());
        assert!(outcome.has_error_code(CODE_TITLE_TOO_LONG));
    }

    #[test]
    fn title_length_is_measured_in_characters_not_bytes() {
        // Multibyte title at the limit: over the byte count, within the
        // character count.
        let mut n = notification();
        n.title = "ü".repeat(MAX_TITLE_LENGTH);
        let outcome = validate_notification_for_creation(&n, Utc::now());
        assert!(!outcome.has_code(CODE_TITLE_TOO_LONG));
        assert!(outcome.is_valid);
    }

    #[test]
    fn past_expiry_is_only_a_warning() {
        let mut n = notification();
        n.expires_at = Some(Utc::now() - Duration::hours(1));
        let outcome = validate_notification_for_creation(&n, Utc::now());
        assert!(outcome.is_valid);
        assert!(outcome.has_code(CODE_EXPIRY_IN_PAST));
    }

    #[test]
    fn explicit_expiry_controls_cleanup() {
        let now = Utc::now();
        let mut n = notification();
        n.expires_at = Some(now - Duration::seconds(1));
        assert!(n.is_expired(now));
        n.expires_at = Some(now + Duration::seconds(1));
        assert!(!n.is_expired(now));
    }

    #[test]
    fn default_retention_applies_without_explicit_expiry() {
        let now = Utc::now();
        let mut n = notification();
        n.created_at = now - Duration::days(DEFAULT_RETENTION_DAYS + 1);
        assert!(n.is_expired(now));
        n.created_at = now - Duration::days(DEFAULT_RETENTION_DAYS - 1);
        assert!(!n.is_expired(now));
    }

    #[test]
    fn priorities_order_by_urgency() {
        assert!(NotificationPriority::Urgent > NotificationPriority::High);
        assert!(NotificationPriority::High > NotificationPriority::Normal);
        assert!(NotificationPriority::Normal > NotificationPriority::Low);
    }
}
