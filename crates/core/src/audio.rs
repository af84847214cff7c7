//! Audio specification model and technical delivery rules.
//!
//! Covers the sample-rate/bit-depth/bitrate thresholds applied by the track
//! validator and the per-channel compliance rules.

use serde::{Deserialize, Serialize};

use crate::outcome::Accumulator;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Sample rates considered standard for delivery. Anything else warns even
/// when the number itself is plausible.
pub const STANDARD_SAMPLE_RATES_HZ: &[u32] =
    &[22_050, 44_100, 48_000, 88_200, 96_000, 176_400, 192_000];

/// Accepted PCM bit depths.
pub const VALID_BIT_DEPTHS: &[u16] = &[16, 24, 32];

/// MP3 bitrates below this are rejected outright.
pub const MP3_MIN_BITRATE_KBPS: u32 = 128;

/// MP3 bitrates below this (but at or above the minimum) warn.
pub const MP3_RECOMMENDED_BITRATE_KBPS: u32 = 320;

/// Streaming loudness target; louder masters warn under strict validation.
pub const STREAMING_LOUDNESS_TARGET_LUFS: f32 = -14.0;

/// Minimum dynamic range (dB) before strict validation warns.
pub const MIN_DYNAMIC_RANGE_DB: f32 = 4.0;

// ---------------------------------------------------------------------------
// Issue codes
// ---------------------------------------------------------------------------

pub const CODE_INVALID_SAMPLE_RATE: &str = "invalid_sample_rate";
pub const CODE_NONSTANDARD_SAMPLE_RATE: &str = "nonstandard_sample_rate";
pub const CODE_INVALID_BIT_DEPTH: &str = "invalid_bit_depth";
pub const CODE_INVALID_CHANNEL_COUNT: &str = "invalid_channel_count";
pub const CODE_UNUSUAL_CHANNEL_COUNT: &str = "unusual_channel_count";
pub const CODE_BITRATE_TOO_LOW: &str = "bitrate_too_low";
pub const CODE_BITRATE_BELOW_RECOMMENDED: &str = "bitrate_below_recommended";
pub const CODE_MISSING_BITRATE: &str = "missing_bitrate";
pub const CODE_LOUDNESS_ABOVE_TARGET: &str = "loudness_above_target";
pub const CODE_LOW_DYNAMIC_RANGE: &str = "low_dynamic_range";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Delivery format of an audio master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Flac,
    Aiff,
    Alac,
    Mp3,
    Aac,
    Ogg,
}

impl AudioFormat {
    /// Lossy formats carry a bitrate instead of a bit depth.
    pub fn is_lossy(self) -> bool {
        matches!(self, AudioFormat::Mp3 | AudioFormat::Aac | AudioFormat::Ogg)
    }
}

/// Technical description of a track's audio master.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSpecs {
    pub format: AudioFormat,
    pub sample_rate_hz: u32,
    pub bit_depth: Option<u16>,
    pub channels: u8,
    pub bitrate_kbps: Option<u32>,
    /// Integrated loudness measurement, when available.
    pub loudness_lufs: Option<f32>,
    /// Dynamic range measurement in dB, when available.
    pub dynamic_range_db: Option<f32>,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Apply all audio technical rules, pushing issues under `field`.
pub fn validate_audio_specs(specs: &AudioSpecs, field: &str, acc: &mut Accumulator) {
    if specs.sample_rate_hz == 0 {
        acc.error(
            CODE_INVALID_SAMPLE_RATE,
            field,
            "Sample rate must be greater than zero",
        );
    } else if !STANDARD_SAMPLE_RATES_HZ.contains(&specs.sample_rate_hz) {
        acc.warning(
            CODE_NONSTANDARD_SAMPLE_RATE,
            field,
            format!(
                "Sample rate {} Hz is not a standard delivery rate",
                specs.sample_rate_hz
            ),
        );
    }

    if let Some(depth) = specs.bit_depth {
        if !VALID_BIT_DEPTHS.contains(&depth) {
            acc.error(
                CODE_INVALID_BIT_DEPTH,
                field,
                format!("Bit depth must be one of 16, 24 or 32, got {depth}"),
            );
        }
    }

    if specs.channels == 0 {
        acc.error(
            CODE_INVALID_CHANNEL_COUNT,
            field,
            "Channel count must be at least 1",
        );
    } else if specs.channels > 2 {
        acc.warning(
            CODE_UNUSUAL_CHANNEL_COUNT,
            field,
            format!(
                "{} channels is unusual for a stereo delivery master",
                specs.channels
            ),
        );
    }

    if specs.format == AudioFormat::Mp3 {
        match specs.bitrate_kbps {
            Some(kbps) if kbps < MP3_MIN_BITRATE_KBPS => {
                acc.error(
                    CODE_BITRATE_TOO_LOW,
                    field,
                    format!("MP3 bitrate {kbps} kbps is below the {MP3_MIN_BITRATE_KBPS} kbps minimum"),
                );
            }
            Some(kbps) if kbps < MP3_RECOMMENDED_BITRATE_KBPS => {
                acc.warning(
                    CODE_BITRATE_BELOW_RECOMMENDED,
                    field,
                    format!(
                        "MP3 bitrate {kbps} kbps is below the recommended {MP3_RECOMMENDED_BITRATE_KBPS} kbps"
                    ),
                );
            }
            Some(_) => {}
            None => {
                acc.warning(CODE_MISSING_BITRATE, field, "MP3 master has no bitrate recorded");
            }
        }
    }
}

/// Strict-mode loudness and dynamic-range checks.
pub fn validate_audio_quality(specs: &AudioSpecs, field: &str, acc: &mut Accumulator) {
    if let Some(lufs) = specs.loudness_lufs {
        if lufs > STREAMING_LOUDNESS_TARGET_LUFS {
            acc.warning(
                CODE_LOUDNESS_ABOVE_TARGET,
                field,
                format!(
                    "Integrated loudness {lufs:.1} LUFS is above the {STREAMING_LOUDNESS_TARGET_LUFS:.0} LUFS streaming target"
                ),
            );
        }
    }
    if let Some(dr) = specs.dynamic_range_db {
        if dr < MIN_DYNAMIC_RANGE_DB {
            acc.warning(
                CODE_LOW_DYNAMIC_RANGE,
                field,
                format!("Dynamic range {dr:.1} dB is below {MIN_DYNAMIC_RANGE_DB:.0} dB"),
            );
        }
    }
}
