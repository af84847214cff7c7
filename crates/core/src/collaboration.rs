//! Publication collaborations: who works on a publication, in what role, with
//! which permissions.
//!
//! Permissions are always a subset of what the collaboration type allows.
//! Extras are dropped during normalization rather than rejected, so a caller
//! sending a stale permission set degrades quietly instead of failing.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::outcome::{run_guarded, ValidationOutcome};
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CODE_SELF_COLLABORATION: &str = "self_collaboration";
pub const CODE_MISSING_PARTICIPANT: &str = "missing_participant";
pub const CODE_NO_PERMISSIONS: &str = "no_permissions";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Role a collaborator plays on a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationType {
    CoAuthor,
    Editor,
    Reviewer,
    Consultant,
    Translator,
}

/// Individual capability a collaboration grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Read,
    Comment,
    Edit,
    Approve,
    Translate,
    Invite,
}

/// Permissions a collaboration type may carry.
pub fn allowed_permissions(kind: CollaborationType) -> &'static [Permission] {
    use Permission::*;
    match kind {
        CollaborationType::CoAuthor => &[Read, Comment, Edit, Invite],
        CollaborationType::Editor => &[Read, Comment, Edit, Approve],
        CollaborationType::Reviewer => &[Read, Comment, Approve],
        CollaborationType::Consultant => &[Read, Comment],
        CollaborationType::Translator => &[Read, Comment, Translate],
    }
}

/// Collaboration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
    Suspended,
}

impl CollaborationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CollaborationStatus::Pending => "pending",
            CollaborationStatus::Active => "active",
            CollaborationStatus::Completed => "completed",
            CollaborationStatus::Cancelled => "cancelled",
            CollaborationStatus::Suspended => "suspended",
        }
    }
}

/// Returns the set of statuses reachable from `from`.
pub fn valid_status_transitions(from: CollaborationStatus) -> &'static [CollaborationStatus] {
    use CollaborationStatus::*;
    match from {
        Pending => &[Active, Cancelled],
        Active => &[Completed, Suspended, Cancelled],
        Suspended => &[Active, Cancelled],
        Completed => &[],
        Cancelled => &[],
    }
}

/// Validate a collaboration status transition.
pub fn validate_status_transition(
    from: CollaborationStatus,
    to: CollaborationStatus,
) -> Result<(), CoreError> {
    if valid_status_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition collaboration from '{}' to '{}'",
            from.as_str(),
            to.as_str()
        )))
    }
}

/// A collaborator attached to a publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaboration {
    pub id: EntityId,
    pub publication_id: EntityId,
    pub owner_id: EntityId,
    pub collaborator_id: EntityId,
    pub collaboration_type: CollaborationType,
    pub permissions: Vec<Permission>,
    pub status: CollaborationStatus,
    pub invited_at: Timestamp,
    pub responded_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Permission normalization
// ---------------------------------------------------------------------------

/// Reduce a requested permission set to what the type allows.
///
/// Duplicates collapse and ordering follows the type's allowed list, so the
/// operation is idempotent and the result is always a subset of
/// [`allowed_permissions`].
pub fn normalize_permissions(
    kind: CollaborationType,
    requested: &[Permission],
) -> Vec<Permission> {
    let allowed = allowed_permissions(kind);
    let dropped = requested.iter().filter(|p| !allowed.contains(*p)).count();
    if dropped > 0 {
        tracing::debug!(?kind, dropped, "dropping permissions not allowed for type");
    }
    allowed
        .iter()
        .copied()
        .filter(|p| requested.contains(p))
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a collaboration before it is handed to the persistence layer.
pub fn validate_collaboration_for_creation(collab: &Collaboration) -> ValidationOutcome {
    run_guarded(|acc| {
        if collab.owner_id == collab.collaborator_id {
            acc.error(
                CODE_SELF_COLLABORATION,
                "collaborator_id",
                "A user cannot collaborate with themselves",
            );
        }
        if collab.owner_id.is_nil() || collab.collaborator_id.is_nil() {
            acc.error(
                CODE_MISSING_PARTICIPANT,
                "collaborator_id",
                "Both owner and collaborator must be set",
            );
        }
        let effective = normalize_permissions(collab.collaboration_type, &collab.permissions);
        if effective.is_empty() {
            acc.warning(
                CODE_NO_PERMISSIONS,
                "permissions",
                "No effective permissions remain for this collaboration type",
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn collaboration(kind: CollaborationType, permissions: Vec<Permission>) -> Collaboration {
        Collaboration {
            id: Uuid::new_v4(),
            publication_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            collaborator_id: Uuid::new_v4(),
            collaboration_type: kind,
            permissions,
            status: CollaborationStatus::Pending,
            invited_at: Utc::now(),
            responded_at: None,
        }
    }

    // -- permission normalization --------------------------------------------

    #[test]
    fn extras_are_silently_dropped() {
        let normalized = normalize_permissions(
            CollaborationType::Reviewer,
            &[Permission::Read, Permission::Edit, Permission::Approve],
        );
        assert_eq!(normalized, vec![Permission::Read, Permission::Approve]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let requested = [
            Permission::Translate,
            Permission::Invite,
            Permission::Read,
            Permission::Read,
        ];
        let once = normalize_permissions(CollaborationType::Translator, &requested);
        let twice = normalize_permissions(CollaborationType::Translator, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn result_is_always_a_subset_of_the_allowed_set() {
        let everything = [
            Permission::Read,
            Permission::Comment,
            Permission::Edit,
            Permission::Approve,
            Permission::Translate,
            Permission::Invite,
        ];
        for kind in [
            CollaborationType::CoAuthor,
            CollaborationType::Editor,
            CollaborationType::Reviewer,
            CollaborationType::Consultant,
            CollaborationType::Translator,
        ] {
            let normalized = normalize_permissions(kind, &everything);
            let allowed = allowed_permissions(kind);
            assert!(normalized.iter().all(|p| allowed.contains(p)), "{kind:?}");
        }
    }

    #[test]
    fn duplicates_collapse() {
        let normalized = normalize_permissions(
            CollaborationType::Consultant,
            &[Permission::Comment, Permission::Comment, Permission::Comment],
        );
        assert_eq!(normalized, vec![Permission::Comment]);
    }

    // -- creation validation -------------------------------------------------

    #[test]
    fn well_formed_collaboration_passes() {
        let c = collaboration(
            CollaborationType::Editor,
            vec![Permission::Read, Permission::Edit],
        );
        let outcome = validate_collaboration_for_creation(&c);
        assert!(outcome.is_valid, "{:?}", outcome.errors);
        assert!(!outcome.has_warnings);
    }

    #[test]
    fn self_collaboration_is_an_error() {
        let mut c = collaboration(CollaborationType::CoAuthor, vec![Permission::Read]);
        c.collaborator_id = c.owner_id;
        assert!(validate_collaboration_for_creation(&c).has_error_code(CODE_SELF_COLLABORATION));
    }

    #[test]
    fn nil_participant_is_an_error() {
        let mut c = collaboration(CollaborationType::CoAuthor, vec![Permission::Read]);
        c.collaborator_id = Uuid::nil();
        assert!(validate_collaboration_for_creation(&c).has_error_code(CODE_MISSING_PARTICIPANT));
    }

    #[test]
    fn permissions_outside_the_type_leave_a_warning_when_nothing_remains() {
        let c = collaboration(CollaborationType::Consultant, vec![Permission::Edit]);
        let outcome = validate_collaboration_for_creation(&c);
        assert!(outcome.is_valid);
        assert!(outcome.has_code(CODE_NO_PERMISSIONS));
    }

    // -- status machine ------------------------------------------------------

    #[test]
    fn invitation_lifecycle_is_reachable() {
        use CollaborationStatus::*;
        for (from, to) in [
            (Pending, Active),
            (Active, Suspended),
            (Suspended, Active),
            (Active, Completed),
        ] {
            assert!(validate_status_transition(from, to).is_ok());
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        use CollaborationStatus::*;
        for terminal in [Completed, Cancelled] {
            assert!(valid_status_transitions(terminal).is_empty());
        }
    }

    #[test]
    fn pending_cannot_jump_to_completed() {
        assert!(validate_status_transition(
            CollaborationStatus::Pending,
            CollaborationStatus::Completed
        )
        .is_err());
    }
}
