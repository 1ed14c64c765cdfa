use serde::{Deserialize, Serialize};

/// Placeholder used for any field whose value is unknown.
pub const NOT_AVAILABLE: &str = "N/A";

/// Where a lead's contact details came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LeadSource {
    Primary,
    Fallback,
    Kept,
    #[default]
    Unknown,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Primary => "Primary",
            LeadSource::Fallback => "Fallback",
            LeadSource::Kept => "Kept",
            LeadSource::Unknown => "Unknown",
        }
    }
}

/// One business record flowing through discovery, dedup and enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lead {
    pub name: String,
    pub address: String,
    #[serde(default = "not_available")]
    pub phone: String,
    #[serde(default = "not_available")]
    pub website: String,
    #[serde(default)]
    pub source: LeadSource,
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

impl Lead {
    /// A freshly discovered lead: contact fields unknown, source not yet decided.
    pub fn discovered(name: impl Into<String>, address: impl Into<String>) -> Self {
        Lead {
            name: name.into(),
            address: address.into(),
            phone: not_available(),
            website: not_available(),
            source: LeadSource::Unknown,
        }
    }

    /// True when the lead already carries a phone worth keeping instead of
    /// looking one up.
    pub fn has_usable_phone(&self) -> bool {
        !self.phone.is_empty() && self.phone != NOT_AVAILABLE && self.phone.len() > 5
    }
}

/// A name/address pair as it comes back from directory discovery, before
/// any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub name: String,
    pub address: String,
}

/// Best-effort contact details returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub phone: String,
    pub website: String,
}

impl ContactDetails {
    pub fn unavailable() -> Self {
        ContactDetails {
            phone: not_available(),
            website: not_available(),
        }
    }

    pub fn has_phone(&self) -> bool {
        self.phone != NOT_AVAILABLE
    }
}
