//! Distribution channel compliance rules.
//!
//! Channel names arrive as free-form strings configured by the label; known
//! names resolve to a [`Channel`] and unknown names are silently ignored, so a
//! new storefront in the configuration never breaks validation of the others.

use serde::{Deserialize, Serialize};

use crate::outcome::{run_guarded, Accumulator, ValidationOptions, ValidationOutcome};
use crate::release::Release;
use crate::track::Track;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Spotify rejects tracks shorter than 30 seconds.
pub const SPOTIFY_MIN_TRACK_DURATION_MS: u64 = 30_000;

/// Apple Music requires at least CD-quality sample rates.
pub const APPLE_MIN_SAMPLE_RATE_HZ: u32 = 44_100;

/// Tidal requires at least CD-quality sample rates.
pub const TIDAL_MIN_SAMPLE_RATE_HZ: u32 = 44_100;

/// Tidal's HiRes tier expects 24-bit masters.
pub const TIDAL_HIRES_BIT_DEPTH: u16 = 24;

pub const CODE_SPOTIFY_TRACK_TOO_SHORT: &str = "spotify_track_too_short";
pub const CODE_SPOTIFY_MISSING_ISRC: &str = "spotify_missing_isrc";
pub const CODE_APPLE_SAMPLE_RATE_TOO_LOW: &str = "apple_sample_rate_too_low";
pub const CODE_APPLE_MISSING_ARTWORK: &str = "apple_missing_artwork";
pub const CODE_YOUTUBE_MISSING_COPYRIGHT: &str = "youtube_missing_copyright";
pub const CODE_TIDAL_SAMPLE_RATE_TOO_LOW: &str = "tidal_sample_rate_too_low";
pub const CODE_TIDAL_NOT_HIRES: &str = "tidal_not_hires";
pub const CODE_AMAZON_MISSING_UPC: &str = "amazon_missing_upc";
pub const CODE_AMAZON_MISSING_GENRE: &str = "amazon_missing_genre";

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Spotify,
    AppleMusic,
    YoutubeMusic,
    Tidal,
    AmazonMusic,
}

impl Channel {
    /// Resolve a configured channel name. Matching is case-insensitive and
    /// accepts the aliases storefronts are configured under in practice.
    /// Unknown names yield `None` and are skipped by the compliance pass.
    pub fn from_name(name: &str) -> Option<Channel> {
        match name.to_ascii_lowercase().as_str() {
            "spotify" => Some(Channel::Spotify),
            "apple" | "apple_music" => Some(Channel::AppleMusic),
            "youtube" | "youtube_music" => Some(Channel::YoutubeMusic),
            "tidal" => Some(Channel::Tidal),
            "amazon_music" => Some(Channel::AmazonMusic),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Spotify => "spotify",
            Channel::AppleMusic => "apple_music",
            Channel::YoutubeMusic => "youtube_music",
            Channel::Tidal => "tidal",
            Channel::AmazonMusic => "amazon_music",
        }
    }
}

// ---------------------------------------------------------------------------
// Compliance rules
// ---------------------------------------------------------------------------

/// Validate a release and its tracks against each requested channel.
pub fn validate_distribution_requirements(
    release: &Release,
    tracks: &[Track],
    channels: &[String],
    opts: ValidationOptions,
) -> ValidationOutcome {
    run_guarded(|acc| {
        for name in channels {
            match Channel::from_name(name) {
                Some(Channel::Spotify) => check_spotify(tracks, acc),
                Some(Channel::AppleMusic) => check_apple(release, tracks, acc),
                Some(Channel::YoutubeMusic) => check_youtube(release, acc),
                Some(Channel::Tidal) => check_tidal(tracks, opts, acc),
                Some(Channel::AmazonMusic) => check_amazon(release, acc),
                None => {
                    tracing::debug!(channel = %name, "skipping unknown distribution channel");
                }
            }
        }
    })
}

fn check_spotify(tracks: &[Track], acc: &mut Accumulator) {
    for track in tracks {
        if track.duration_ms < SPOTIFY_MIN_TRACK_DURATION_MS {
            acc.error(
                CODE_SPOTIFY_TRACK_TOO_SHORT,
                "tracks",
                format!(
                    "Track '{}' is {} ms; Spotify requires at least {SPOTIFY_MIN_TRACK_DURATION_MS} ms",
                    track.title, track.duration_ms
                ),
            );
        }
        if track.isrc.is_none() {
            acc.error(
                CODE_SPOTIFY_MISSING_ISRC,
                "tracks",
                format!("Track '{}' has no ISRC; Spotify requires one", track.title),
            );
        }
    }
}

fn check_apple(release: &Release, tracks: &[Track], acc: &mut Accumulator) {
    for track in tracks {
        if let Some(audio) = &track.audio {
            if audio.sample_rate_hz < APPLE_MIN_SAMPLE_RATE_HZ {
                acc.error(
                    CODE_APPLE_SAMPLE_RATE_TOO_LOW,
                    "tracks",
                    format!(
                        "Track '{}' is {} Hz; Apple Music requires at least {APPLE_MIN_SAMPLE_RATE_HZ} Hz",
                        track.title, audio.sample_rate_hz
                    ),
                );
            }
        }
    }
    if release.artwork_id.is_none() {
        acc.error(
            CODE_APPLE_MISSING_ARTWORK,
            "artwork_id",
            "Apple Music requires cover artwork",
        );
    }
}

fn check_youtube(release: &Release, acc: &mut Accumulator) {
    let has_copyright = release
        .copyright_c
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty())
        || release
            .copyright_p
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());
    if !has_copyright {
        acc.error(
            CODE_YOUTUBE_MISSING_COPYRIGHT,
            "copyright_c",
            "YouTube Music requires a copyright notice",
        );
    }
}

fn check_tidal(tracks: &[Track], opts: ValidationOptions, acc: &mut Accumulator) {
    for track in tracks {
        if let Some(audio) = &track.audio {
            if audio.sample_rate_hz < TIDAL_MIN_SAMPLE_RATE_HZ {
                acc.error(
                    CODE_TIDAL_SAMPLE_RATE_TOO_LOW,
                    "tracks",
                    format!(
                        "Track '{}' is {} Hz; Tidal requires at least {TIDAL_MIN_SAMPLE_RATE_HZ} Hz",
                        track.title, audio.sample_rate_hz
                    ),
                );
            }
            if opts.strict && audio.bit_depth.is_some_and(|d| d < TIDAL_HIRES_BIT_DEPTH) {
                acc.warning(
                    CODE_TIDAL_NOT_HIRES,
                    "tracks",
                    format!(
                        "Track '{}' is below {TIDAL_HIRES_BIT_DEPTH}-bit; it will not qualify for Tidal HiRes",
                        track.title
                    ),
                );
            }
        }
    }
}

fn check_amazon(release: &Release, acc: &mut Accumulator) {
    if release.upc.is_none() {
        acc.error(
            CODE_AMAZON_MISSING_UPC,
            "upc",
            "Amazon Music requires a UPC",
        );
    }
    if release.genre.as_deref().map_or(true, |g| g.trim().is_empty()) {
        acc.warning(
            CODE_AMAZON_MISSING_GENRE,
            "genre",
            "Amazon Music expects a primary genre",
        );
    }
}
