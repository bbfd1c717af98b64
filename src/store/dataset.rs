use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::model::{Company, Contact, Id};

/// The whole persisted document: every contact and company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub companies: Vec<Company>,
}

impl Dataset {
    pub fn contact_index(&self, id: Id<Contact>) -> TrackerResult<usize> {
        self.contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| TrackerError::NotFound {
                entity_type: "Contact".into(),
                id: id.to_string(),
            })
    }

    pub fn company_index(&self, id: Id<Company>) -> TrackerResult<usize> {
        self.companies
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| TrackerError::NotFound {
                entity_type: "Company".into(),
                id: id.to_string(),
            })
    }

    pub fn contact(&self, id: Id<Contact>) -> TrackerResult<&Contact> {
        self.contact_index(id).map(|i| &self.contacts[i])
    }

    pub fn company(&self, id: Id<Company>) -> TrackerResult<&Company> {
        self.company_index(id).map(|i| &self.companies[i])
    }

    pub fn company_named(&self, name: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.matches_name(name))
    }
}
