//! Hard commercial rules for releases.
//!
//! The metadata validator in [`crate::release`] flags the same format rules at
//! warning level so a draft can still be saved; this pass is what gates the
//! move toward distribution, so the overlapping rules become errors here.

use crate::outcome::{run_guarded, Accumulator, ValidationOptions, ValidationOutcome};
use crate::release::{Release, ReleaseType, EP_MAX_TRACKS, SINGLE_MAX_TRACKS};
use crate::track::Track;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// No track on a commercial release may be shorter than this.
pub const MIN_RELEASE_TRACK_DURATION_MS: u64 = 30_000;

pub const CODE_SINGLE_TOO_MANY_TRACKS: &str = "single_too_many_tracks";
pub const CODE_EP_TOO_MANY_TRACKS: &str = "ep_too_many_tracks";
pub const CODE_TRACK_BELOW_RELEASE_MINIMUM: &str = "track_below_release_minimum";
pub const CODE_MISSING_ATMOS_FILE: &str = "missing_atmos_file";

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Validate the hard business rules for a release and its tracks.
pub fn validate_release_business_rules(
    release: &Release,
    tracks: &[Track],
    opts: ValidationOptions,
) -> ValidationOutcome {
    run_guarded(|acc| {
        enforce_format_limits(release.release_type, tracks.len(), acc);
        enforce_duration_floor(tracks, acc);
        if opts.strict {
            enforce_atmos_deliverables(release, tracks, acc);
        }
    })
}

fn enforce_format_limits(release_type: ReleaseType, count: usize, acc: &mut Accumulator) {
    match release_type {
        ReleaseType::Single if count > SINGLE_MAX_TRACKS => {
            acc.error(
                CODE_SINGLE_TOO_MANY_TRACKS,
                "tracks",
                format!("A single must not carry more than {SINGLE_MAX_TRACKS} tracks, got {count}"),
            );
        }
        ReleaseType::Ep if count > EP_MAX_TRACKS => {
            acc.error(
                CODE_EP_TOO_MANY_TRACKS,
                "tracks",
                format!("An EP must not carry more than {EP_MAX_TRACKS} tracks, got {count}"),
            );
        }
        _ => {}
    }
}

fn enforce_duration_floor(tracks: &[Track], acc: &mut Accumulator) {
    for track in tracks {
        if track.duration_ms < MIN_RELEASE_TRACK_DURATION_MS {
            acc.error(
                CODE_TRACK_BELOW_RELEASE_MINIMUM,
                "tracks",
                format!(
                    "Track '{}' is {} ms, below the {MIN_RELEASE_TRACK_DURATION_MS} ms release minimum",
                    track.title, track.duration_ms
                ),
            );
        }
    }
}

/// An Atmos-marketed release must ship an Atmos deliverable for every track.
fn enforce_atmos_deliverables(release: &Release, tracks: &[Track], acc: &mut Accumulator) {
    if !release.dolby_atmos {
        return;
    }
    for track in tracks {
        if track.atmos_file.as_deref().map_or(true, |f| f.trim().is_empty()) {
            acc.error(
                CODE_MISSING_ATMOS_FILE,
                "tracks",
                format!("Track '{}' has no Dolby Atmos deliverable", track.title),
            );
        }
    }
}
