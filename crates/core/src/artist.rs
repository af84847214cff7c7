//! Artist model and creation validator.

use serde::{Deserialize, Serialize};

use crate::outcome::{run_guarded, Accumulator, ValidationOutcome};
use crate::territories::is_valid_territory;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for an artist name.
pub const MAX_ARTIST_NAME_LENGTH: usize = 100;

pub const CODE_MISSING_NAME: &str = "missing_artist_name";
pub const CODE_NAME_TOO_LONG: &str = "artist_name_too_long";
pub const CODE_NAME_WHITESPACE: &str = "artist_name_whitespace";
pub const CODE_INVALID_COUNTRY: &str = "invalid_country_code";
pub const CODE_MISSING_COUNTRY: &str = "missing_country";
pub const CODE_EMPTY_EXTERNAL_ID: &str = "empty_external_id";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Kind of act behind an artist profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistType {
    Individual,
    Group,
    Band,
    Orchestra,
    Choir,
    Other,
}

/// External platform identifiers attached to an artist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalIds {
    pub spotify_id: Option<String>,
    pub apple_id: Option<String>,
    pub isni: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: EntityId,
    pub name: String,
    pub artist_type: ArtistType,
    /// ISO 3166-1 alpha-2 country of origin.
    pub country: Option<String>,
    pub external_ids: ExternalIds,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an artist before it is handed to the persistence layer.
pub fn validate_artist_for_creation(artist: &Artist) -> ValidationOutcome {
    run_guarded(|acc| {
        validate_name(&artist.name, acc);
        validate_country(artist.country.as_deref(), acc);
        validate_external_ids(&artist.external_ids, acc);
    })
}

fn validate_name(name: &str, acc: &mut Accumulator) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        acc.error(CODE_MISSING_NAME, "name", "Artist name must not be empty");
        return;
    }
    if trimmed.len() != name.len() {
        acc.warning(
            CODE_NAME_WHITESPACE,
            "name",
            "Artist name has leading or trailing whitespace",
        );
    }
    if name.chars().count() > MAX_ARTIST_NAME_LENGTH {
        acc.error(
            CODE_NAME_TOO_LONG,
            "name",
            format!(
                "Artist name must not exceed {MAX_ARTIST_NAME_LENGTH} characters, got {}",
                name.chars().count()
            ),
        );
    }
}

fn validate_country(country: Option<&str>, acc: &mut Accumulator) {
    match country {
        Some(code) if !is_valid_territory(code) || code == crate::territories::WORLDWIDE => {
            acc.error(
                CODE_INVALID_COUNTRY,
                "country",
                format!("'{code}' is not an ISO 3166-1 alpha-2 country code"),
            );
        }
        Some(_) => {}
        None => {
            acc.warning(
                CODE_MISSING_COUNTRY,
                "country",
                "Country of origin is recommended for royalty territory mapping",
            );
        }
    }
}

fn validate_external_ids(ids: &ExternalIds, acc: &mut Accumulator) {
    let fields = [
        ("external_ids.spotify_id", &ids.spotify_id),
        ("external_ids.apple_id", &ids.apple_id),
        ("external_ids.isni", &ids.isni),
        ("external_ids.website", &ids.website),
    ];
    for (field, value) in fields {
        if let Some(v) = value {
            if v.trim().is_empty() {
                acc.error(
                    CODE_EMPTY_EXTERNAL_ID,
                    field,
                    "External identifier must not be empty when present",
                );
            }
        }
    }
}
