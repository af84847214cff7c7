//! Release lifecycle state machine.
//!
//! Transitions outside the fixed adjacency list are rejected, never
//! auto-corrected. Entering certain states additionally requires the release
//! to satisfy state-entry requirements, checked against the release and its
//! tracks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::outcome::{run_guarded, Accumulator, ValidationOutcome};
use crate::release::Release;
use crate::track::Track;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Scheduling a release closer than this to its street date warns.
pub const RELEASE_LEAD_TIME_DAYS: i64 = 14;

pub const CODE_INVALID_TRANSITION: &str = "invalid_transition";
pub const CODE_MISSING_RELEASE_DATE: &str = "missing_release_date";
pub const CODE_RELEASE_DATE_IN_PAST: &str = "release_date_in_past";
pub const CODE_RELEASE_DATE_TOO_SOON: &str = "release_date_too_soon";
pub const CODE_MISSING_MASTERING_ENGINEER: &str = "missing_mastering_engineer";
pub const CODE_MISSING_FINAL_AUDIO: &str = "missing_final_audio";
pub const CODE_NO_DISTRIBUTION_CHANNELS: &str = "no_distribution_channels";

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    Draft,
    InReview,
    Rejected,
    Approved,
    Scheduled,
    Postponed,
    Mastered,
    Distributed,
    Released,
    Withdrawn,
    Cancelled,
}

impl ReleaseStatus {
    /// All states, in lifecycle order. Used by exhaustive transition tests.
    pub const ALL: &'static [ReleaseStatus] = &[
        ReleaseStatus::Draft,
        ReleaseStatus::InReview,
        ReleaseStatus::Rejected,
        ReleaseStatus::Approved,
        ReleaseStatus::Scheduled,
        ReleaseStatus::Postponed,
        ReleaseStatus::Mastered,
        ReleaseStatus::Distributed,
        ReleaseStatus::Released,
        ReleaseStatus::Withdrawn,
        ReleaseStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseStatus::Draft => "draft",
            ReleaseStatus::InReview => "in_review",
            ReleaseStatus::Rejected => "rejected",
            ReleaseStatus::Approved => "approved",
            ReleaseStatus::Scheduled => "scheduled",
            ReleaseStatus::Postponed => "postponed",
            ReleaseStatus::Mastered => "mastered",
            ReleaseStatus::Distributed => "distributed",
            ReleaseStatus::Released => "released",
            ReleaseStatus::Withdrawn => "withdrawn",
            ReleaseStatus::Cancelled => "cancelled",
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Returns the set of states reachable from `from`.
///
/// `Cancelled` is terminal and returns an empty slice.
pub fn valid_transitions(from: ReleaseStatus) -> &'static [ReleaseStatus] {
    use ReleaseStatus::*;
    match from {
        Draft => &[InReview, Cancelled],
        InReview => &[Approved, Rejected, Draft],
        Rejected => &[Draft],
        Approved => &[Scheduled, Cancelled],
        Scheduled => &[Mastered, Cancelled, Postponed],
        Postponed => &[Scheduled, Cancelled],
        Mastered => &[Distributed, Scheduled],
        Distributed => &[Released, Withdrawn],
        Released => &[Withdrawn],
        Withdrawn => &[Released],
        Cancelled => &[],
    }
}

/// Check whether a transition from `from` to `to` is in the adjacency list.
pub fn can_transition(from: ReleaseStatus, to: ReleaseStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a status transition plus the target state's entry requirements.
///
/// `today` is supplied by the caller so date rules stay deterministic.
pub fn validate_status_transition(
    current: ReleaseStatus,
    next: ReleaseStatus,
    release: &Release,
    tracks: &[Track],
    today: NaiveDate,
) -> ValidationOutcome {
    run_guarded(|acc| {
        if !can_transition(current, next) {
            tracing::debug!(
                from = current.as_str(),
                to = next.as_str(),
                "rejected release status transition"
            );
            acc.error(
                CODE_INVALID_TRANSITION,
                "status",
                format!(
                    "Cannot transition release from '{}' to '{}'",
                    current.as_str(),
                    next.as_str()
                ),
            );
        }
        // Entry requirements run regardless, so one call surfaces everything.
        check_entry_requirements(next, release, tracks, today, acc);
    })
}

fn check_entry_requirements(
    next: ReleaseStatus,
    release: &Release,
    tracks: &[Track],
    today: NaiveDate,
    acc: &mut Accumulator,
) {
    match next {
        ReleaseStatus::Scheduled => check_schedule_requirements(release, today, acc),
        ReleaseStatus::Mastered => check_mastering_requirements(tracks, acc),
        ReleaseStatus::Distributed => check_distribution_requirements(release, acc),
        _ => {}
    }
}

fn check_schedule_requirements(release: &Release, today: NaiveDate, acc: &mut Accumulator) {
    match release.release_date {
        None => {
            acc.error(
                CODE_MISSING_RELEASE_DATE,
                "release_date",
                "A release date is required before scheduling",
            );
        }
        Some(date) if date <= today => {
            acc.error(
                CODE_RELEASE_DATE_IN_PAST,
                "release_date",
                format!("Release date {date} is not in the future"),
            );
        }
        Some(date) => {
            let lead = (date - today).num_days();
            if lead < RELEASE_LEAD_TIME_DAYS {
                acc.warning(
                    CODE_RELEASE_DATE_TOO_SOON,
                    "release_date",
                    format!(
                        "Only {lead} day(s) of lead time; {RELEASE_LEAD_TIME_DAYS} days are recommended"
                    ),
                );
            }
        }
    }
}

fn check_mastering_requirements(tracks: &[Track], acc: &mut Accumulator) {
    for track in tracks {
        if track
            .credits
            .mastering_engineer
            .as_deref()
            .map_or(true, |e| e.trim().is_empty())
        {
            acc.error(
                CODE_MISSING_MASTERING_ENGINEER,
                "tracks",
                format!("Track '{}' has no mastering engineer credit", track.title),
            );
        }
        if track.audio_file.as_deref().map_or(true, |f| f.trim().is_empty()) {
            acc.error(
                CODE_MISSING_FINAL_AUDIO,
                "tracks",
                format!("Track '{}' has no final audio file", track.title),
            );
        }
    }
}

fn check_distribution_requirements(release: &Release, acc: &mut Accumulator) {
    if release.distribution_channels.is_empty() {
        acc.error(
            CODE_NO_DISTRIBUTION_CHANNELS,
            "distribution_channels",
            "At least one distribution channel must be configured",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::ReleaseType;
    use crate::track::TrackCredits;
    use uuid::Uuid;

    fn mastered_track(title: &str) -> Track {
        Track {
            id: Uuid::new_v4(),
            title: title.to_string(),
            version_title: None,
            track_number: 1,
            disc_number: 1,
            duration_ms: 200_000,
            isrc: None,
            audio: None,
            audio_file: Some("masters/final.wav".to_string()),
            atmos_file: None,
            credits: TrackCredits {
                mastering_engineer: Some("M. Engineer".to_string()),
                ..TrackCredits::default()
            },
            lyrics: None,
            explicit: false,
            tempo_bpm: None,
            key: None,
            time_signature: None,
            language: None,
        }
    }

    fn release() -> Release {
        Release {
            id: Uuid::new_v4(),
            title: "Night Drive".to_string(),
            artist_id: Uuid::new_v4(),
            release_type: ReleaseType::Single,
            status: ReleaseStatus::Draft,
            release_date: NaiveDate::from_ymd_opt(2027, 3, 12),
            original_release_date: None,
            preorder_date: None,
            upc: None,
            catalog_number: None,
            genre: None,
            subgenre: None,
            language: None,
            copyright_c: None,
            copyright_p: None,
            artwork_id: None,
            territories: vec![],
            distribution_channels: vec!["spotify".to_string()],
            dolby_atmos: false,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2027, 1, 15).unwrap()
    }

    // -- adjacency list ------------------------------------------------------

    #[test]
    fn every_listed_edge_is_accepted() {
        for &from in ReleaseStatus::ALL {
            for &to in valid_transitions(from) {
                assert!(can_transition(from, to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn every_unlisted_pair_is_rejected_with_invalid_transition() {
        let r = release();
        for &from in ReleaseStatus::ALL {
            for &to in ReleaseStatus::ALL {
                if valid_transitions(from).contains(&to) {
                    continue;
                }
                let outcome = validate_status_transition(from, to, &r, &[], today());
                assert!(
                    outcome.has_error_code(CODE_INVALID_TRANSITION),
                    "{from:?} -> {to:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(valid_transitions(ReleaseStatus::Cancelled).is_empty());
    }

    #[test]
    fn withdrawn_release_can_return_to_released() {
        assert!(can_transition(ReleaseStatus::Withdrawn, ReleaseStatus::Released));
    }

    #[test]
    fn self_transitions_are_rejected() {
        for &s in ReleaseStatus::ALL {
            assert!(!can_transition(s, s), "{s:?} -> {s:?}");
        }
    }

    // -- scheduled entry requirements ----------------------------------------

    #[test]
    fn scheduling_without_release_date_is_an_error() {
        let mut r = release();
        r.release_date = None;
        let outcome = validate_status_transition(
            ReleaseStatus::Approved,
            ReleaseStatus::Scheduled,
            &r,
            &[],
            today(),
        );
        assert!(outcome.has_error_code(CODE_MISSING_RELEASE_DATE));
    }

    #[test]
    fn scheduling_with_past_release_date_is_an_error() {
        let r = release();
        let outcome = validate_status_transition(
            ReleaseStatus::Approved,
            ReleaseStatus::Scheduled,
            &r,
            &[],
            NaiveDate::from_ymd_opt(2027, 6, 1).unwrap(),
        );
        assert!(outcome.has_error_code(CODE_RELEASE_DATE_IN_PAST));
    }

    #[test]
    fn scheduling_on_the_release_date_is_an_error() {
        let r = release();
        let outcome = validate_status_transition(
            ReleaseStatus::Approved,
            ReleaseStatus::Scheduled,
            &r,
            &[],
            r.release_date.unwrap(),
        );
        assert!(outcome.has_error_code(CODE_RELEASE_DATE_IN_PAST));
    }

    #[test]
    fn short_lead_time_warns_but_allows() {
        let r = release();
        let outcome = validate_status_transition(
            ReleaseStatus::Approved,
            ReleaseStatus::Scheduled,
            &r,
            &[],
            NaiveDate::from_ymd_opt(2027, 3, 5).unwrap(), // 7 days out
        );
        assert!(outcome.is_valid);
        assert!(outcome.has_code(CODE_RELEASE_DATE_TOO_SOON));
    }

    #[test]
    fn exactly_fourteen_days_of_lead_time_passes_clean() {
        let r = release();
        let outcome = validate_status_transition(
            ReleaseStatus::Approved,
            ReleaseStatus::Scheduled,
            &r,
            &[],
            NaiveDate::from_ymd_opt(2027, 2, 26).unwrap(),
        );
        assert!(outcome.is_valid);
        assert!(!outcome.has_code(CODE_RELEASE_DATE_TOO_SOON));
    }

    // -- mastered entry requirements -----------------------------------------

    #[test]
    fn mastering_requires_engineer_and_final_audio_on_every_track() {
        let good = mastered_track("Done");
        let mut no_engineer = mastered_track("No Engineer");
        no_engineer.credits.mastering_engineer = None;
        let mut no_audio = mastered_track("No Audio");
        no_audio.audio_file = None;

        let outcome = validate_status_transition(
            ReleaseStatus::Scheduled,
            ReleaseStatus::Mastered,
            &release(),
            &[good, no_engineer, no_audio],
            today(),
        );
        assert!(outcome.has_error_code(CODE_MISSING_MASTERING_ENGINEER));
        assert!(outcome.has_error_code(CODE_MISSING_FINAL_AUDIO));
        assert_eq!(outcome.summary.error_count, 2);
    }

    #[test]
    fn fully_mastered_tracks_enter_mastered_clean() {
        let outcome = validate_status_transition(
            ReleaseStatus::Scheduled,
            ReleaseStatus::Mastered,
            &release(),
            &[mastered_track("A"), mastered_track("B")],
            today(),
        );
        assert!(outcome.is_valid);
    }

    // -- distributed entry requirements --------------------------------------

    #[test]
    fn distribution_requires_a_channel() {
        let mut r = release();
        r.distribution_channels.clear();
        let outcome = validate_status_transition(
            ReleaseStatus::Mastered,
            ReleaseStatus::Distributed,
            &r,
            &[],
            today(),
        );
        assert!(outcome.has_error_code(CODE_NO_DISTRIBUTION_CHANNELS));
    }

    #[test]
    fn entry_requirements_reported_alongside_invalid_transition() {
        // Invalid edge AND unmet entry requirements surface together.
        let mut r = release();
        r.release_date = None;
        let outcome = validate_status_transition(
            ReleaseStatus::Draft,
            ReleaseStatus::Scheduled,
            &r,
            &[],
            today(),
        );
        assert!(outcome.has_error_code(CODE_INVALID_TRANSITION));
        assert!(outcome.has_error_code(CODE_MISSING_RELEASE_DATE));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ReleaseStatus::InReview).unwrap();
        assert_eq!(json, "\"in_review\"");
        let back: ReleaseStatus = serde_json::from_str("\"postponed\"").unwrap();
        assert_eq!(back, ReleaseStatus::Postponed);
    }
}
