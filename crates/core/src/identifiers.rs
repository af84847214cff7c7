//! Standard catalog identifier checks: UPC, ISRC, ISBN-10, ISBN-13.
//!
//! All functions are pure; entity validators wrap them and attach issue codes.
//! Inputs are normalized (hyphens and spaces stripped, uppercased) before any
//! pattern or checksum math.

use std::sync::OnceLock;

use regex::Regex;

/// Pattern an ISRC must match after normalization: two-letter country code,
/// three-character registrant, two-digit year + five-digit designation.
const ISRC_PATTERN: &str = "^[A-Z]{2}[A-Z0-9]{3}[0-9]{7}$";

fn isrc_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ISRC_PATTERN).expect("ISRC pattern is valid"))
}

/// Strip hyphens and spaces and uppercase, the form identifiers are stored in.
pub fn normalize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// UPC (12-digit, modulo-10 weighted checksum)
// ---------------------------------------------------------------------------

/// Compute the UPC check digit for an 11-digit prefix.
///
/// Weights alternate 3/1 starting with 3 at index 0. Returns `None` if the
/// prefix is not exactly 11 ASCII digits.
pub fn upc_check_digit(prefix: &str) -> Option<u32> {
    if prefix.len() != 11 || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let sum: u32 = prefix
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let d = c.to_digit(10).unwrap_or(0);
            if i % 2 == 0 {
                d * 3
            } else {
                d
            }
        })
        .sum();
    Some((10 - sum % 10) % 10)
}

/// Returns `true` if the input is a 12-digit UPC with a valid checksum.
pub fn is_valid_upc(raw: &str) -> bool {
    let upc = normalize_identifier(raw);
    if upc.len() != 12 || !upc.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let expected = upc_check_digit(&upc[..11]);
    let actual = upc.chars().nth(11).and_then(|c| c.to_digit(10));
    expected.is_some() && expected == actual
}

// ---------------------------------------------------------------------------
// ISRC
// ---------------------------------------------------------------------------

/// Returns `true` if the input is a well-formed ISRC after normalization.
pub fn is_valid_isrc(raw: &str) -> bool {
    isrc_regex().is_match(&normalize_identifier(raw))
}

// ---------------------------------------------------------------------------
// ISBN-13 (weights 1/3 alternating)
// ---------------------------------------------------------------------------

/// Compute the ISBN-13 check digit for a 12-digit prefix.
pub fn isbn13_check_digit(prefix: &str) -> Option<u32> {
    if prefix.len() != 12 || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let sum: u32 = prefix
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let d = c.to_digit(10).unwrap_or(0);
            if i % 2 == 0 {
                d
            } else {
                d * 3
            }
        })
        .sum();
    Some((10 - sum % 10) % 10)
}

/// Returns `true` if the input is a 13-digit ISBN with a valid checksum.
pub fn is_valid_isbn13(raw: &str) -> bool {
    let isbn = normalize_identifier(raw);
    if isbn.len() != 13 || !isbn.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let expected = isbn13_check_digit(&isbn[..12]);
    let actual = isbn.chars().nth(12).and_then(|c| c.to_digit(10));
    expected.is_some() && expected == actual
}

// ---------------------------------------------------------------------------
// ISBN-10 (weights 10..1, 'X' represents check value 10)
// ---------------------------------------------------------------------------

/// Returns `true` if the input is a valid ISBN-10.
pub fn is_valid_isbn10(raw: &str) -> bool {
    let isbn = normalize_identifier(raw);
    if isbn.len() != 10 {
        return false;
    }
    let mut sum: u32 = 0;
    for (i, c) in isbn.chars().enumerate() {
        let value = match c {
            '0'..='9' => c.to_digit(10).unwrap_or(0),
            // 'X' is only legal as the check character.
            'X' if i == 9 => 10,
            _ => return false,
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

/// Convert a valid ISBN-10 to its ISBN-13 form (978 prefix, recomputed check).
///
/// Returns `None` for anything that is not a valid ISBN-10.
pub fn isbn10_to_isbn13(raw: &str) -> Option<String> {
    if !is_valid_isbn10(raw) {
        return None;
    }
    let isbn = normalize_identifier(raw);
    let prefix = format!("978{}", &isbn[..9]);
    let check = isbn13_check_digit(&prefix)?;
    Some(format!("{prefix}{check}"))
}
