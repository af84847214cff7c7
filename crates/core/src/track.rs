//! Track model, credits, and track-level validator.
//!
//! The track validator enforces the 15-second minimum; the stricter
//! 30-second release floor lives in [`crate::business_rules`] and the
//! channel-specific floors in [`crate::distribution`].

use serde::{Deserialize, Serialize};

use crate::audio::{validate_audio_quality, validate_audio_specs, AudioSpecs};
use crate::identifiers::is_valid_isrc;
use crate::outcome::{run_guarded, Accumulator, ValidationOptions, ValidationOutcome};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for a track title.
pub const MAX_TRACK_TITLE_LENGTH: usize = 200;

/// Tracks shorter than this are rejected.
pub const MIN_TRACK_DURATION_MS: u64 = 15_000;

/// Tracks longer than this warn (podcast-length uploads are usually mistakes).
pub const LONG_TRACK_DURATION_MS: u64 = 20 * 60 * 1000;

pub const CODE_MISSING_TITLE: &str = "missing_track_title";
pub const CODE_TITLE_TOO_LONG: &str = "track_title_too_long";
pub const CODE_INVALID_TRACK_NUMBER: &str = "invalid_track_number";
pub const CODE_INVALID_DISC_NUMBER: &str = "invalid_disc_number";
pub const CODE_TRACK_TOO_SHORT: &str = "track_too_short";
pub const CODE_TRACK_UNUSUALLY_LONG: &str = "track_unusually_long";
pub const CODE_INVALID_ISRC: &str = "invalid_isrc";
pub const CODE_MISSING_ISRC: &str = "missing_isrc";
pub const CODE_MISSING_SONGWRITER: &str = "missing_songwriter_credit";
pub const CODE_EXPLICIT_WITHOUT_LYRICS: &str = "explicit_without_lyrics";
pub const CODE_INVALID_TEMPO: &str = "invalid_tempo";
pub const CODE_MISSING_AUDIO: &str = "missing_audio_specs";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// People credited on a track, by role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackCredits {
    pub songwriters: Vec<String>,
    pub producers: Vec<String>,
    pub performers: Vec<String>,
    pub mastering_engineer: Option<String>,
    pub mixing_engineer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: EntityId,
    pub title: String,
    /// Version qualifier ("Live", "Acoustic", ...), kept out of the title.
    pub version_title: Option<String>,
    pub track_number: u32,
    pub disc_number: u32,
    pub duration_ms: u64,
    pub isrc: Option<String>,
    pub audio: Option<AudioSpecs>,
    /// Reference to the final delivery master, set once mastering completes.
    pub audio_file: Option<String>,
    /// Reference to the Dolby Atmos deliverable, when produced.
    pub atmos_file: Option<String>,
    pub credits: TrackCredits,
    pub lyrics: Option<String>,
    pub explicit: bool,
    pub tempo_bpm: Option<f32>,
    pub key: Option<String>,
    pub time_signature: Option<String>,
    pub language: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a track before it is handed to the persistence layer.
pub fn validate_track_for_creation(track: &Track, opts: ValidationOptions) -> ValidationOutcome {
    run_guarded(|acc| {
        validate_title(&track.title, acc);
        validate_numbering(track, acc);
        validate_duration(track.duration_ms, acc);
        validate_isrc_field(track.isrc.as_deref(), acc);
        validate_credits(&track.credits, acc);
        validate_content_flags(track, acc);
        validate_technical(track, opts, acc);
    })
}

fn validate_title(title: &str, acc: &mut Accumulator) {
    if title.trim().is_empty() {
        acc.error(CODE_MISSING_TITLE, "title", "Track title must not be empty");
    } else if title.chars().count() > MAX_TRACK_TITLE_LENGTH {
        acc.error(
            CODE_TITLE_TOO_LONG,
            "title",
            format!(
                "Track title must not exceed {MAX_TRACK_TITLE_LENGTH} characters, got {}",
                title.chars().count()
            ),
        );
    }
}

fn validate_numbering(track: &Track, acc: &mut Accumulator) {
    if track.track_number == 0 {
        acc.error(
            CODE_INVALID_TRACK_NUMBER,
            "track_number",
            "Track number must be 1 or greater",
        );
    }
    if track.disc_number == 0 {
        acc.error(
            CODE_INVALID_DISC_NUMBER,
            "disc_number",
            "Disc number must be 1 or greater",
        );
    }
}

fn validate_duration(duration_ms: u64, acc: &mut Accumulator) {
    if duration_ms < MIN_TRACK_DURATION_MS {
        acc.error(
            CODE_TRACK_TOO_SHORT,
            "duration_ms",
            format!(
                "Track duration {duration_ms} ms is below the {MIN_TRACK_DURATION_MS} ms minimum"
            ),
        );
    } else if duration_ms > LONG_TRACK_DURATION_MS {
        acc.warning(
            CODE_TRACK_UNUSUALLY_LONG,
            "duration_ms",
            format!("Track duration {duration_ms} ms is unusually long"),
        );
    }
}

fn validate_isrc_field(isrc: Option<&str>, acc: &mut Accumulator) {
    match isrc {
        Some(code) if !is_valid_isrc(code) => {
            acc.error(
                CODE_INVALID_ISRC,
                "isrc",
                format!("'{code}' is not a valid ISRC"),
            );
        }
        Some(_) => {}
        None => {
            acc.warning(
                CODE_MISSING_ISRC,
                "isrc",
                "ISRC is required before distribution",
            );
        }
    }
}

fn validate_credits(credits: &TrackCredits, acc: &mut Accumulator) {
    if credits.songwriters.iter().all(|s| s.trim().is_empty()) {
        acc.warning(
            CODE_MISSING_SONGWRITER,
            "credits.songwriters",
            "At least one songwriter credit is expected",
        );
    }
}

fn validate_content_flags(track: &Track, acc: &mut Accumulator) {
    let has_lyrics = track.lyrics.as_deref().is_some_and(|l| !l.trim().is_empty());
    if track.explicit && !has_lyrics {
        acc.info(
            CODE_EXPLICIT_WITHOUT_LYRICS,
            "explicit",
            "Track is flagged explicit but carries no lyrics",
        );
    }
    if let Some(bpm) = track.tempo_bpm {
        if !(20.0..=400.0).contains(&bpm) {
            acc.error(
                CODE_INVALID_TEMPO,
                "tempo_bpm",
                format!("Tempo {bpm} BPM is outside the plausible 20-400 range"),
            );
        }
    }
}

fn validate_technical(track: &Track, opts: ValidationOptions, acc: &mut Accumulator) {
    match &track.audio {
        Some(specs) => {
            validate_audio_specs(specs, "audio", acc);
            if opts.strict {
                validate_audio_quality(specs, "audio", acc);
            }
        }
        None => {
            acc.warning(
                CODE_MISSING_AUDIO,
                "audio",
                "Audio specifications are required before mastering",
            );
        }
    }
}
