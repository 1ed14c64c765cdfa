use serde::Serialize;

pub const CATALOG_VERSION: &str = "1.0";

pub const CATEGORIES: &[&str] = &[
    "Convenience Stores",
    "Grocery Stores",
    "Gas Stations",
    "Gift Shops",
    "Pharmacies",
    "Candy Stores",
    "General Stores",
    "Variety Stores",
    "Trading Posts",
    "Tourist Attractions",
    "Sports Complexes",
    "Sports Venues",
    "Museums",
    "Art Galleries",
    "Bookstores",
    "Music Stores",
    "Sports Stores",
    "Electronics Stores",
    "Fashion Stores",
    "Pet Stores",
];

// Kept in alphabetical order.
pub const LOCATIONS: &[&str] = &[
    "Blind River, ON",
    "Britt, ON",
    "Chapleau, ON",
    "Cochrane, ON",
    "Dryden, ON",
    "Elliot Lake, ON",
    "Espanola, ON",
    "Foleyet, ON",
    "Fort Frances, ON",
    "Gogama, ON",
    "Hearst, ON",
    "Iroquois Falls, ON",
    "Kapuskasing, ON",
    "Kenora, ON",
    "Kirkland Lake, ON",
    "Little Current, ON",
    "Manitouwadge, ON",
    "Marathon, ON",
    "Nipigon, ON",
    "North Bay, ON",
    "Parry Sound, ON",
    "Red Lake, ON",
    "Sault Ste. Marie, ON",
    "Sioux Lookout, ON",
    "Sturgeon Falls, ON",
    "Sudbury, ON",
    "Temiskaming Shores, ON",
    "Thunder Bay, ON",
    "Timmins, ON",
    "Wawa, ON",
];

/// What the server advertises for discovery.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub categories: Vec<&'static str>,
    pub locations: Vec<&'static str>,
    pub version: &'static str,
}

impl Catalog {
    pub fn current() -> Self {
        Catalog {
            categories: CATEGORIES.to_vec(),
            locations: LOCATIONS.to_vec(),
            version: CATALOG_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_are_sorted_and_unique() {
        let mut sorted = LOCATIONS.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, LOCATIONS.to_vec());
    }

    #[test]
    fn catalog_sizes() {
        let catalog = Catalog::current();
        assert_eq!(catalog.categories.len(), 20);
        assert_eq!(catalog.locations.len(), 30);
        assert_eq!(catalog.version, "1.0");
    }
}
