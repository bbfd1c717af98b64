use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::ids::Id;
use super::interaction::Interaction;
use super::relationship::Relationship;
use crate::validation;

/// A person being tracked.
///
/// Dates are kept exactly as stored so a malformed value survives a
/// load/save cycle; it is simply ignored by the follow-up calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default = "Id::generate")]
    pub id: Id<Contact>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_met: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    history: Vec<Interaction>,
}

impl Contact {
    pub fn create(name: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            email: None,
            phone: None,
            company: None,
            job_title: None,
            career: None,
            role: None,
            relationship: Relationship::Passive,
            relationship_level: None,
            state: None,
            city: None,
            location: None,
            linkedin: None,
            website: None,
            how_met: None,
            birthday: None,
            last_contact: None,
            tags: Vec::new(),
            notes: None,
            history: Vec::new(),
        }
    }

    /// Logged interactions, oldest first.
    pub fn history(&self) -> &[Interaction] {
        &self.history
    }

    /// Parsed last-contact date. `None` when absent or malformed.
    pub fn last_contact_date(&self) -> Option<NaiveDate> {
        self.last_contact.as_deref().and_then(validation::parse_date)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Where the contact is based: city if known, else the free-form location.
    pub fn place(&self) -> Option<&str> {
        self.city.as_deref().or(self.location.as_deref())
    }

    /// Appends to the history. Existing records are never edited.
    pub(crate) fn record(&mut self, interaction: Interaction) {
        self.history.push(interaction);
    }

    /// Copies history from an earlier version of the same contact, used when
    /// a form submission replaces the record.
    pub(crate) fn inherit_history(&mut self, previous: &Contact) {
        self.history = previous.history.clone();
    }
}

/// Tags were stored as a comma-separated string by older versions and as a
/// list by newer ones. Either reads back as a list.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TagsRepr {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<TagsRepr>::deserialize(deserializer)? {
        Some(TagsRepr::List(tags)) => tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Some(TagsRepr::Joined(s)) => validation::split_tags(&s),
        None => Vec::new(),
    })
}
