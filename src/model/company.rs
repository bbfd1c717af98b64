use serde::{Deserialize, Serialize};

use super::ids::Id;

pub const COMPANY_STAGES: &[&str] = &[
    "Pre-Seed", "Seed", "Series A", "Series B", "Series C", "Series D", "Public", "Private",
];

pub const COMPANY_TYPES: &[&str] = &[
    "Investment Bank",
    "Private Equity",
    "Venture Capital",
    "Startup",
    "Corporate",
    "Family Office",
    "Hedge Fund",
    "Real Estate",
    "Other",
];

pub const COMPANY_SECTORS: &[&str] = &[
    "Technology",
    "Healthcare",
    "Finance",
    "Real Estate",
    "Consumer",
    "Energy",
    "Industrial",
    "Telecom",
    "Education",
    "Other",
];

/// An organisation contacts work at. Matched to contacts by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default = "Id::generate")]
    pub id: Id<Company>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Company {
    pub fn create(name: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            location: None,
            state: None,
            stage: None,
            kind: None,
            sector: None,
            website: None,
            description: None,
        }
    }

    /// Normalised matching key: trimmed, lowercase.
    pub fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        Company::key(&self.name) == Company::key(name)
    }
}
