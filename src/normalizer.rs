//! Phone and address normalization.
//!
//! Both entry points are total and idempotent: anything they cannot make
//! sense of collapses to the `N/A` sentinel, and feeding their output back
//! in returns it unchanged. Enrichment relies on the latter because it
//! re-normalizes addresses that discovery already normalized.
//!
//! Address normalization runs as an ordered pipeline:
//!
//! 1. separate a region token glued to a postal code (`ONP3A1B2`)
//! 2. split on commas, trim, drop empty segments
//! 3. per segment: canonical region, `District` suffix, title case,
//!    postal code casing
//! 4. drop case-insensitive duplicates, keeping the first
//! 5. join with `", "` and settle postal code casing across the string
//! 6. infer a missing city from the postal code's FSA

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::lead::NOT_AVAILABLE;
use crate::postal_directory;

static GLUED_REGION_POSTAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b((?i:ontario|on))([A-Za-z][0-9][A-Za-z])").unwrap());

static REGION_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:ontario|on)$").unwrap());

static REGION_WITH_POSTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:ontario|on)\s*([A-Za-z][0-9][A-Za-z])\s?([0-9][A-Za-z][0-9])\b").unwrap()
});

static DISTRICT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:\s+district)+$").unwrap());

static POSTAL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z][0-9][A-Za-z])\s?([0-9][A-Za-z][0-9])").unwrap());

// Only matches settled output: canonical region directly before a canonical FSA.
static REGION_BEFORE_POSTAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*(ON)\s*([A-Z][0-9][A-Z])").unwrap());

const REGION: &str = "ON";

fn is_sentinel(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE)
}

/// Formats a North American number as `(XXX) XXX-XXXX`, or `N/A`.
pub fn normalize_phone(raw: &str) -> String {
    if is_sentinel(raw) {
        return NOT_AVAILABLE.to_string();
    }

    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let national = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return NOT_AVAILABLE.to_string(),
    };

    format!("({}) {}-{}", &national[..3], &national[3..6], &national[6..])
}

/// Canonicalizes a free-form Ontario street address.
pub fn normalize_address(raw: &str) -> String {
    if is_sentinel(raw) {
        return NOT_AVAILABLE.to_string();
    }

    let separated = separate_region_from_postal(raw);
    let segments = dedup_segments(
        split_segments(&separated)
            .into_iter()
            .map(|segment| canonicalize_segment(&segment))
            .collect(),
    );
    if segments.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let joined = canonicalize_postal_codes(&segments.join(", "));
    infer_city_from_postal(joined)
}

pub(crate) fn separate_region_from_postal(address: &str) -> String {
    GLUED_REGION_POSTAL
        .replace_all(address, "$1 $2")
        .into_owned()
}

pub(crate) fn split_segments(address: &str) -> Vec<String> {
    address
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn canonicalize_segment(segment: &str) -> String {
    let without_district = DISTRICT_SUFFIX.replace(segment, "");
    let without_district = without_district.trim();
    if REGION_ONLY.is_match(without_district) {
        return REGION.to_string();
    }

    let titled = title_case(without_district);
    let with_region = REGION_WITH_POSTAL.replace_all(&titled, |caps: &Captures| {
        format!(
            "{} {} {}",
            REGION,
            caps[1].to_ascii_uppercase(),
            caps[2].to_ascii_uppercase()
        )
    });
    canonicalize_postal_codes(&with_region)
}

pub(crate) fn dedup_segments(segments: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    segments
        .into_iter()
        .filter(|segment| !segment.is_empty() && seen.insert(segment.to_lowercase()))
        .collect()
}

pub(crate) fn canonicalize_postal_codes(text: &str) -> String {
    POSTAL_CODE
        .replace_all(text, |caps: &Captures| {
            format!(
                "{} {}",
                caps[1].to_ascii_uppercase(),
                caps[2].to_ascii_uppercase()
            )
        })
        .into_owned()
}

/// Splices `, <place>, ON` in front of a region marker that directly
/// precedes the first postal code, when the code's FSA is known and the
/// place is not already named somewhere in the address.
pub(crate) fn infer_city_from_postal(address: String) -> String {
    match city_splice(&address) {
        Some((marker_start, marker_end, place)) => format!(
            "{}, {}, {}{}",
            &address[..marker_start],
            place,
            REGION,
            &address[marker_end..]
        ),
        None => address,
    }
}

/// Byte range of the `, ON` marker to replace, and the place to insert.
fn city_splice(address: &str) -> Option<(usize, usize, &'static str)> {
    let first_postal = POSTAL_CODE.find(address)?;
    let marker = REGION_BEFORE_POSTAL
        .captures_iter(address)
        .find(|caps| caps.get(2).map(|fsa| fsa.start()) == Some(first_postal.start()))?;
    let place = postal_directory::place_for_fsa(&marker[2])?;

    let place_lower = place.to_lowercase();
    if address
        .split(',')
        .any(|segment| segment.to_lowercase().contains(&place_lower))
    {
        return None;
    }

    Some((marker.get(0)?.start(), marker.get(1)?.end(), place))
}

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts after any character that is not a letter, except that an
/// apostrophe does not start a new word (`Bob's`, not `Bob'S`).
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            let mapped = if in_word {
                single_char(c.to_lowercase())
            } else {
                single_char(c.to_uppercase())
            };
            out.push(mapped.unwrap_or(c));
            in_word = true;
        } else {
            out.push(c);
            in_word = in_word && (c == '\'' || c == '\u{2019}');
        }
    }
    out
}

// Multi-character case mappings (`ß` -> `SS`) are skipped so that title
// casing stays idempotent.
fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}
