//! Forward Sortation Area (FSA) lookup for northern Ontario.
//!
//! The first three characters of a Canadian postal code identify a rough
//! delivery area. Directory listings regularly drop the city from the
//! address, so the normalizer uses this table to put it back.

const FSA_PLACES: &[(&str, &str)] = &[
    ("K0M", "Central Ontario"),
    ("P0A", "Parry Sound"),
    ("P0B", "Muskoka"),
    ("P0C", "Mactier"),
    ("P0E", "Manitoulin"),
    ("P0G", "Parry Sound"),
    ("P0H", "Nipissing"),
    ("P0J", "Timiskaming"),
    ("P0K", "Cochrane"),
    ("P0L", "Hearst"),
    ("P0M", "Sudbury"),
    ("P0N", "Cochrane"),
    ("P0P", "Manitoulin"),
    ("P0R", "Algoma"),
    ("P0S", "Algoma"),
    ("P0T", "Nipigon"),
    ("P0V", "Red Lake"),
    ("P0W", "Rainy River"),
    ("P1A", "North Bay"),
    ("P1B", "North Bay"),
    ("P1C", "North Bay"),
    ("P1H", "Huntsville"),
    ("P2A", "Parry Sound"),
    ("P2B", "Sturgeon Falls"),
    ("P2N", "Kirkland Lake"),
    ("P3A", "Sudbury"),
    ("P3B", "Sudbury"),
    ("P3C", "Sudbury"),
    ("P3E", "Sudbury"),
    ("P3G", "Sudbury"),
    ("P3L", "Garson"),
    ("P3N", "Val Caron"),
    ("P3P", "Hanmer"),
    ("P3Y", "Lively"),
    ("P4N", "Timmins"),
    ("P4P", "Timmins"),
    ("P4R", "Timmins"),
    ("P5A", "Elliot Lake"),
    ("P5E", "Espanola"),
    ("P5N", "Kapuskasing"),
    ("P6A", "Sault Ste. Marie"),
    ("P6B", "Sault Ste. Marie"),
    ("P6C", "Sault Ste. Marie"),
    ("P7A", "Thunder Bay"),
    ("P7B", "Thunder Bay"),
    ("P7C", "Thunder Bay"),
    ("P7E", "Thunder Bay"),
    ("P8N", "Dryden"),
    ("P8T", "Sioux Lookout"),
    ("P9A", "Fort Frances"),
    ("P9N", "Kenora"),
];

/// Returns the canonical place name for a three character FSA code.
///
/// Matching ignores case; anything that is not a known FSA yields `None`.
pub fn place_for_fsa(fsa: &str) -> Option<&'static str> {
    if fsa.len() != 3 {
        return None;
    }
    let wanted = fsa.to_ascii_uppercase();
    FSA_PLACES
        .binary_search_by(|(code, _)| (*code).cmp(wanted.as_str()))
        .ok()
        .map(|idx| FSA_PLACES[idx].1)
}
