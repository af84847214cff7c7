//! Royalty split model and validator.
//!
//! Structural checks (required fields, array shape, per-entry bounds) run
//! before the semantic checks, but nothing short-circuits: one pass reports
//! every problem. Percentage reconciliation uses a fixed floating tolerance;
//! changing it would silently shift which splits reconcile, so it is a named
//! constant.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::outcome::{run_guarded, Accumulator, ValidationOutcome};
use crate::territories::{is_valid_territory, mixes_worldwide_with_specific};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Tolerance applied when reconciling the percentage sum against 100.
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

/// A max/min share ratio above this triggers the unequal-distribution notice.
pub const UNEQUAL_DISTRIBUTION_RATIO: f64 = 20.0;

/// A participant at or above this share gets the majority-control notice.
pub const MAJORITY_SHARE_PERCENT: f64 = 50.0;

pub const CODE_MISSING_PARENT: &str = "missing_parent_reference";
pub const CODE_NO_PARTICIPANTS: &str = "no_participants";
pub const CODE_INVALID_PERCENTAGE: &str = "invalid_percentage";
pub const CODE_INVALID_AMOUNT_BOUNDS: &str = "invalid_amount_bounds";
pub const CODE_INVALID_DATE_RANGE: &str = "invalid_date_range";
pub const CODE_PERCENTAGE_EXCEEDS_100: &str = "percentage_exceeds_100";
pub const CODE_PERCENTAGE_UNDER_100: &str = "percentage_under_100";
pub const CODE_DUPLICATE_PARTICIPANT: &str = "duplicate_participant";
pub const CODE_MISSING_ESSENTIAL_ROLES: &str = "missing_essential_roles";
pub const CODE_DUPLICATE_UNIQUE_ROLE: &str = "duplicate_unique_role";
pub const CODE_MISSING_SONGWRITER_RIGHTS: &str = "missing_songwriter_rights";
pub const CODE_MISSING_PERFORMER_RIGHTS: &str = "missing_performer_rights";
pub const CODE_INVALID_TERRITORY: &str = "invalid_territory";
pub const CODE_CONFLICTING_TERRITORIES: &str = "conflicting_territories";
pub const CODE_UNEQUAL_DISTRIBUTION: &str = "unequal_distribution";
pub const CODE_MAJORITY_CONTROL: &str = "majority_control";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Which revenue stream the split governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    MasterRecording,
    Publishing,
    Performance,
    Mechanical,
    Sync,
}

/// Role a participant plays in the recording or composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Artist,
    FeaturedArtist,
    Songwriter,
    Composer,
    Producer,
    Performer,
    Remixer,
    Arranger,
    Label,
    Publisher,
    Distributor,
}

impl ParticipantRole {
    /// Roles that normally appear at most once in a split.
    pub fn is_typically_unique(self) -> bool {
        matches!(
            self,
            ParticipantRole::Label | ParticipantRole::Publisher | ParticipantRole::Distributor
        )
    }

    /// Roles that hold composition rights.
    pub fn holds_writing_rights(self) -> bool {
        matches!(self, ParticipantRole::Songwriter | ParticipantRole::Composer)
    }

    /// Roles that hold performance rights.
    pub fn holds_performance_rights(self) -> bool {
        matches!(
            self,
            ParticipantRole::Artist
                | ParticipantRole::FeaturedArtist
                | ParticipantRole::Performer
        )
    }
}

/// Split lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStatus {
    Draft,
    Pending,
    Active,
    Suspended,
    Terminated,
}

impl SplitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitStatus::Draft => "draft",
            SplitStatus::Pending => "pending",
            SplitStatus::Active => "active",
            SplitStatus::Suspended => "suspended",
            SplitStatus::Terminated => "terminated",
        }
    }
}

/// Returns the set of statuses reachable from `from`.
pub fn valid_status_transitions(from: SplitStatus) -> &'static [SplitStatus] {
    use SplitStatus::*;
    match from {
        Draft => &[Pending, Terminated],
        Pending => &[Active, Draft, Terminated],
        Active => &[Suspended, Terminated],
        Suspended => &[Active, Terminated],
        Terminated => &[],
    }
}

/// Validate a split status transition.
pub fn validate_status_transition(from: SplitStatus, to: SplitStatus) -> Result<(), CoreError> {
    if valid_status_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition split from '{}' to '{}'",
            from.as_str(),
            to.as_str()
        )))
    }
}

/// One participant's stake in a split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEntry {
    pub participant_id: EntityId,
    pub percentage: f64,
    pub role: ParticipantRole,
    /// Payout ordering; higher values are settled first.
    pub priority: Option<i32>,
    pub min_amount_cents: Option<i64>,
    pub max_amount_cents: Option<i64>,
}

/// A revenue-sharing configuration attached to a release and/or track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Split {
    pub id: EntityId,
    pub release_id: Option<EntityId>,
    pub track_id: Option<EntityId>,
    pub split_type: SplitType,
    pub entries: Vec<SplitEntry>,
    /// Territory scope; empty means unspecified, `WW` means worldwide.
    pub territories: Vec<String>,
    pub status: SplitStatus,
    pub effective_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub exclusive: bool,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a split before it is handed to the persistence layer.
pub fn validate_split_for_creation(split: &Split) -> ValidationOutcome {
    run_guarded(|acc| {
        // Structural checks first, semantic checks after; all of them run.
        validate_structure(split, acc);
        validate_percentages(&split.entries, acc);
        validate_participants(&split.entries, acc);
        validate_roles(&split.entries, acc);
        validate_rights(split.split_type, &split.entries, acc);
        validate_territories(&split.territories, acc);
        validate_fairness(&split.entries, acc);
    })
}

fn validate_structure(split: &Split, acc: &mut Accumulator) {
    if split.release_id.is_none() && split.track_id.is_none() {
        acc.error(
            CODE_MISSING_PARENT,
            "release_id",
            "A split must reference a release or a track",
        );
    }
    if split.entries.is_empty() {
        acc.error(
            CODE_NO_PARTICIPANTS,
            "entries",
            "A split must have at least one participant",
        );
    }
    for (index, entry) in split.entries.iter().enumerate() {
        if !(0.0..=100.0).contains(&entry.percentage) || !entry.percentage.is_finite() {
            acc.error(
                CODE_INVALID_PERCENTAGE,
                "entries",
                format!(
                    "Participant {index} has percentage {}, outside the 0-100 range",
                    entry.percentage
                ),
            );
        }
        if let (Some(min), Some(max)) = (entry.min_amount_cents, entry.max_amount_cents) {
            if min > max {
                acc.error(
                    CODE_INVALID_AMOUNT_BOUNDS,
                    "entries",
                    format!("Participant {index} has min amount {min} above max amount {max}"),
                );
            }
        }
    }
    if let (Some(effective), Some(expiry)) = (split.effective_date, split.expiry_date) {
        if effective >= expiry {
            acc.error(
                CODE_INVALID_DATE_RANGE,
                "effective_date",
                format!("Effective date {effective} must be before expiry date {expiry}"),
            );
        }
    }
}

fn validate_percentages(entries: &[SplitEntry], acc: &mut Accumulator) {
    if entries.is_empty() {
        return;
    }
    let total: f64 = entries.iter().map(|e| e.percentage).sum();
    if total > 100.0 + PERCENTAGE_TOLERANCE {
        acc.error(
            CODE_PERCENTAGE_EXCEEDS_100,
            "entries",
            format!("Percentages sum to {total}, which exceeds 100"),
        );
    } else if total < 100.0 - PERCENTAGE_TOLERANCE {
        acc.error(
            CODE_PERCENTAGE_UNDER_100,
            "entries",
            format!("Percentages sum to {total}, which falls short of 100"),
        );
    }
}

fn validate_participants(entries: &[SplitEntry], acc: &mut Accumulator) {
    use std::collections::HashSet;

    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.participant_id) {
            acc.error(
                CODE_DUPLICATE_PARTICIPANT,
                "entries",
                format!("Participant {} appears more than once", entry.participant_id),
            );
        }
    }
}

fn validate_roles(entries: &[SplitEntry], acc: &mut Accumulator) {
    if entries.is_empty() {
        return;
    }

    let has_artist = entries.iter().any(|e| e.role == ParticipantRole::Artist);
    let has_songwriter = entries.iter().any(|e| e.role == ParticipantRole::Songwriter);
    if !has_artist && !has_songwriter {
        acc.warning(
            CODE_MISSING_ESSENTIAL_ROLES,
            "entries",
            "Neither an artist nor a songwriter participates in this split",
        );
    }

    for role in [
        ParticipantRole::Label,
        ParticipantRole::Publisher,
        ParticipantRole::Distributor,
    ] {
        let count = entries.iter().filter(|e| e.role == role).count();
        if count > 1 {
            acc.warning(
                CODE_DUPLICATE_UNIQUE_ROLE,
                "entries",
                format!("Role '{role:?}' appears {count} times but is typically unique"),
            );
        }
    }
}

/// Split-type-specific rights requirements.
fn validate_rights(split_type: SplitType, entries: &[SplitEntry], acc: &mut Accumulator) {
    if entries.is_empty() {
        return;
    }
    let has_writer = entries.iter().any(|e| e.role.holds_writing_rights());
    let has_performer = entries.iter().any(|e| e.role.holds_performance_rights());

    match split_type {
        SplitType::Publishing | SplitType::Mechanical => {
            if !has_writer {
                acc.error(
                    CODE_MISSING_SONGWRITER_RIGHTS,
                    "entries",
                    "Publishing and mechanical splits require a songwriter or composer",
                );
            }
        }
        SplitType::Performance => {
            if !has_performer {
                acc.error(
                    CODE_MISSING_PERFORMER_RIGHTS,
                    "entries",
                    "Performance splits require a performing participant",
                );
            }
        }
        SplitType::MasterRecording => {
            if !has_performer {
                acc.warning(
                    CODE_MISSING_PERFORMER_RIGHTS,
                    "entries",
                    "Master recording splits usually include a performing participant",
                );
            }
        }
        SplitType::Sync => {}
    }
}

fn validate_territories(territories: &[String], acc: &mut Accumulator) {
    for code in territories {
        if !is_valid_territory(code) {
            acc.error(
                CODE_INVALID_TERRITORY,
                "territories",
                format!("'{code}' is not a territory code"),
            );
        }
    }
    if mixes_worldwide_with_specific(territories) {
        acc.warning(
            CODE_CONFLICTING_TERRITORIES,
            "territories",
            "Worldwide scope (WW) combined with specific territories is ambiguous",
        );
    }
}

/// Distribution-shape heuristics: advisory only, never blocking.
fn validate_fairness(entries: &[SplitEntry], acc: &mut Accumulator) {
    let positive: Vec<f64> = entries
        .iter()
        .map(|e| e.percentage)
        .filter(|p| *p > 0.0)
        .collect();

    if let (Some(max), Some(min)) = (
        positive.iter().cloned().reduce(f64::max),
        positive.iter().cloned().reduce(f64::min),
    ) {
        if min > 0.0 && max / min > UNEQUAL_DISTRIBUTION_RATIO {
            acc.warning(
                CODE_UNEQUAL_DISTRIBUTION,
                "entries",
                format!(
                    "Largest share ({max}%) is more than {UNEQUAL_DISTRIBUTION_RATIO}x the smallest ({min}%)"
                ),
            );
        }
    }

    // At most one notice, attached to the largest stake.
    if let Some(largest) = entries
        .iter()
        .max_by(|a, b| a.percentage.total_cmp(&b.percentage))
    {
        if largest.percentage >= MAJORITY_SHARE_PERCENT {
            acc.info(
                CODE_MAJORITY_CONTROL,
                "entries",
                format!(
                    "Participant {} holds a controlling {}% share",
                    largest.participant_id, largest.percentage
                ),
            );
        }
    }
}
