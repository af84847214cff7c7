//! Release model and metadata validator.
//!
//! The metadata validator flags quality problems at warning level wherever a
//! release can still be saved as a draft; the hard commercial rules on the
//! same fields live in [`crate::business_rules`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::identifiers::is_valid_upc;
use crate::outcome::{run_guarded, Accumulator, ValidationOptions, ValidationOutcome};
use crate::release_status::ReleaseStatus;
use crate::territories::{is_valid_territory, mixes_worldwide_with_specific};
use crate::track::Track;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for a release title.
pub const MAX_RELEASE_TITLE_LENGTH: usize = 200;

/// A single carries at most this many tracks.
pub const SINGLE_MAX_TRACKS: usize = 3;

/// An EP carries between these many tracks.
pub const EP_MIN_TRACKS: usize = 4;
pub const EP_MAX_TRACKS: usize = 6;

/// An album is expected to carry at least this many tracks.
pub const ALBUM_MIN_TRACKS: usize = 7;

pub const CODE_MISSING_TITLE: &str = "missing_release_title";
pub const CODE_TITLE_TOO_LONG: &str = "release_title_too_long";
pub const CODE_MISSING_ARTIST: &str = "missing_artist_reference";
pub const CODE_NO_TRACKS: &str = "no_tracks";
pub const CODE_SINGLE_TOO_MANY_TRACKS: &str = "single_too_many_tracks";
pub const CODE_EP_TRACK_COUNT: &str = "ep_track_count_out_of_range";
pub const CODE_ALBUM_TOO_FEW_TRACKS: &str = "album_too_few_tracks";
pub const CODE_PREORDER_AFTER_RELEASE: &str = "preorder_after_release";
pub const CODE_ORIGINAL_AFTER_RELEASE: &str = "original_after_release";
pub const CODE_INVALID_UPC: &str = "invalid_upc";
pub const CODE_MISSING_UPC: &str = "missing_upc";
pub const CODE_MISSING_GENRE: &str = "missing_genre";
pub const CODE_INVALID_LANGUAGE: &str = "invalid_language";
pub const CODE_MISSING_COPYRIGHT: &str = "missing_copyright";
pub const CODE_EMPTY_CATALOG_NUMBER: &str = "empty_catalog_number";
pub const CODE_INVALID_TERRITORY: &str = "invalid_territory";
pub const CODE_CONFLICTING_TERRITORIES: &str = "conflicting_territories";
pub const CODE_DUPLICATE_TRACK_NUMBER: &str = "duplicate_track_number";
pub const CODE_TRACK_NUMBER_GAP: &str = "track_number_gap";
pub const CODE_MISSING_ARTWORK: &str = "missing_artwork";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Commercial format of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Single,
    Ep,
    Album,
    Compilation,
    Mixtape,
    Live,
    Remix,
    Soundtrack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub id: EntityId,
    pub title: String,
    pub artist_id: EntityId,
    pub release_type: ReleaseType,
    pub status: ReleaseStatus,
    pub release_date: Option<NaiveDate>,
    /// First publication date, for re-releases of older material.
    pub original_release_date: Option<NaiveDate>,
    pub preorder_date: Option<NaiveDate>,
    pub upc: Option<String>,
    pub catalog_number: Option<String>,
    pub genre: Option<String>,
    pub subgenre: Option<String>,
    /// ISO 639-1 language of the primary metadata.
    pub language: Option<String>,
    /// Composition copyright line ("© 2026 ...").
    pub copyright_c: Option<String>,
    /// Phonogram copyright line ("℗ 2026 ...").
    pub copyright_p: Option<String>,
    pub artwork_id: Option<EntityId>,
    /// Empty means unrestricted.
    pub territories: Vec<String>,
    /// Channel names as configured by the label; resolved by
    /// [`crate::distribution::Channel::from_name`].
    pub distribution_channels: Vec<String>,
    /// Release is marketed as a Dolby Atmos title.
    pub dolby_atmos: bool,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate release metadata before it is handed to the persistence layer.
///
/// All checks run; nothing short-circuits on the first problem.
pub fn validate_release_for_creation(
    release: &Release,
    tracks: &[Track],
    _opts: ValidationOptions,
) -> ValidationOutcome {
    run_guarded(|acc| {
        validate_title(&release.title, acc);
        validate_artist_ref(release, acc);
        validate_track_count(release.release_type, tracks.len(), acc);
        validate_dates(release, acc);
        validate_upc_field(release.upc.as_deref(), acc);
        validate_descriptors(release, acc);
        validate_territories(&release.territories, acc);
        validate_track_numbering(tracks, acc);
    })
}

fn validate_title(title: &str, acc: &mut Accumulator) {
    if title.trim().is_empty() {
        acc.error(CODE_MISSING_TITLE, "title", "Release title must not be empty");
    } else if title.chars().count() > MAX_RELEASE_TITLE_LENGTH {
        acc.error(
            CODE_TITLE_TOO_LONG,
            "title",
            format!(
                "Release title must not exceed {MAX_RELEASE_TITLE_LENGTH} characters, got {}",
                title.chars().count()
            ),
        );
    }
}

fn validate_artist_ref(release: &Release, acc: &mut Accumulator) {
    if release.artist_id.is_nil() {
        acc.error(
            CODE_MISSING_ARTIST,
            "artist_id",
            "Release must reference a primary artist",
        );
    }
}

/// Format/track-count coherence. Warning level here; the business-rules pass
/// repeats the single-format check as a hard error.
fn validate_track_count(release_type: ReleaseType, count: usize, acc: &mut Accumulator) {
    if count == 0 {
        acc.warning(CODE_NO_TRACKS, "tracks", "Release has no tracks yet");
        return;
    }
    match release_type {
        ReleaseType::Single if count > SINGLE_MAX_TRACKS => {
            acc.warning(
                CODE_SINGLE_TOO_MANY_TRACKS,
                "tracks",
                format!("A single is expected to carry at most {SINGLE_MAX_TRACKS} tracks, got {count}"),
            );
        }
        ReleaseType::Ep if !(EP_MIN_TRACKS..=EP_MAX_TRACKS).contains(&count) => {
            acc.warning(
                CODE_EP_TRACK_COUNT,
                "tracks",
                format!("An EP is expected to carry {EP_MIN_TRACKS}-{EP_MAX_TRACKS} tracks, got {count}"),
            );
        }
        ReleaseType::Album | ReleaseType::Compilation if count < ALBUM_MIN_TRACKS => {
            acc.warning(
                CODE_ALBUM_TOO_FEW_TRACKS,
                "tracks",
                format!("An album is expected to carry at least {ALBUM_MIN_TRACKS} tracks, got {count}"),
            );
        }
        _ => {}
    }
}

fn validate_dates(release: &Release, acc: &mut Accumulator) {
    if let (Some(preorder), Some(date)) = (release.preorder_date, release.release_date) {
        if preorder >= date {
            acc.error(
                CODE_PREORDER_AFTER_RELEASE,
                "preorder_date",
                format!("Pre-order date {preorder} must be before the release date {date}"),
            );
        }
    }
    if let (Some(original), Some(date)) = (release.original_release_date, release.release_date) {
        if original > date {
            acc.error(
                CODE_ORIGINAL_AFTER_RELEASE,
                "original_release_date",
                format!("Original release date {original} must not be after the release date {date}"),
            );
        }
    }
}

fn validate_upc_field(upc: Option<&str>, acc: &mut Accumulator) {
    match upc {
        Some(code) if !is_valid_upc(code) => {
            acc.error(
                CODE_INVALID_UPC,
                "upc",
                format!("'{code}' is not a valid UPC"),
            );
        }
        Some(_) => {}
        None => {
            acc.warning(CODE_MISSING_UPC, "upc", "UPC is required before distribution");
        }
    }
}

fn validate_descriptors(release: &Release, acc: &mut Accumulator) {
    if release.genre.as_deref().map_or(true, |g| g.trim().is_empty()) {
        acc.warning(CODE_MISSING_GENRE, "genre", "Primary genre is not set");
    }

    if let Some(lang) = release.language.as_deref() {
        let well_formed = lang.len() == 2 && lang.chars().all(|c| c.is_ascii_lowercase());
        if !well_formed {
            acc.error(
                CODE_INVALID_LANGUAGE,
                "language",
                format!("'{lang}' is not an ISO 639-1 language code"),
            );
        }
    }

    for (field, value) in [
        ("copyright_c", &release.copyright_c),
        ("copyright_p", &release.copyright_p),
    ] {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            acc.warning(
                CODE_MISSING_COPYRIGHT,
                field,
                "Copyright line is required before distribution",
            );
        }
    }

    if let Some(catalog) = release.catalog_number.as_deref() {
        if catalog.trim().is_empty() {
            acc.error(
                CODE_EMPTY_CATALOG_NUMBER,
                "catalog_number",
                "Catalog number must not be empty when present",
            );
        }
    }

    if release.artwork_id.is_none() {
        acc.warning(
            CODE_MISSING_ARTWORK,
            "artwork_id",
            "Cover artwork is required before distribution",
        );
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

/// `(disc_number, track_number)` pairs must be unique; gaps in the sequence
/// per disc are tolerated but flagged.
fn validate_track_numbering(tracks: &[Track], acc: &mut Accumulator) {
    use std::collections::BTreeMap;

    let mut by_disc: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for track in tracks {
        by_disc.entry(track.disc_number).or_default().push(track.track_number);
    }

    for (disc, mut numbers) in by_disc {
        numbers.sort_unstable();
        for pair in numbers.windows(2) {
            if pair[0] == pair[1] {
                acc.error(
                    CODE_DUPLICATE_TRACK_NUMBER,
                    "tracks",
                    format!("Track number {} appears more than once on disc {disc}", pair[0]),
                );
            } else if pair[1] != pair[0] + 1 {
                acc.warning(
                    CODE_TRACK_NUMBER_GAP,
                    "tracks",
                    format!(
                        "Track numbering on disc {disc} jumps from {} to {}",
                        pair[0], pair[1]
                    ),
                );
            }
        }
        if numbers.first().is_some_and(|&n| n > 1) {
            acc.warning(
                CODE_TRACK_NUMBER_GAP,
                "tracks",
                format!("Track numbering on disc {disc} does not start at 1"),
            );
        }
    }
}
