use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::relationship::LeadStage;
use crate::validation::{self, TIMESTAMP_FORMAT};

/// Interaction kinds offered when logging by hand.
pub const INTERACTION_KINDS: &[&str] = &["Meeting", "Call", "Email", "Other"];

/// Kind recorded when a recurring check-in is completed.
pub const MAINTENANCE_KIND: &str = "Maintenance";

/// A single logged event with a contact. Records are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// `YYYY-MM-DD HH:MM`; older records carry a bare `YYYY-MM-DD`.
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, alias = "summary")]
    pub note: String,
}

impl Interaction {
    /// A manually logged meeting, call, email, etc.
    pub fn logged(at: NaiveDateTime, kind: String, note: String) -> Self {
        Self {
            date: at.format(TIMESTAMP_FORMAT).to_string(),
            kind,
            stage: None,
            note,
        }
    }

    /// Completion record for a lead stage.
    pub fn stage_completed(stage: LeadStage, due: NaiveDate, at: NaiveDateTime) -> Self {
        let name = stage.display_name();
        Self {
            date: at.format(TIMESTAMP_FORMAT).to_string(),
            kind: name.to_string(),
            stage: Some(name.to_string()),
            note: format!("Completed {} scheduled for {}", name, due),
        }
    }

    /// Completion record for a recurring check-in.
    pub fn maintenance_completed(due: NaiveDate, at: NaiveDateTime) -> Self {
        Self {
            date: at.format(TIMESTAMP_FORMAT).to_string(),
            kind: MAINTENANCE_KIND.to_string(),
            stage: Some(MAINTENANCE_KIND.to_string()),
            note: format!("Completed {} scheduled for {}", MAINTENANCE_KIND, due),
        }
    }

    /// Calendar day of the record, if its date parses.
    pub fn day(&self) -> Option<NaiveDate> {
        validation::parse_date(&self.date)
    }

    pub fn completes(&self, stage: LeadStage) -> bool {
        self.stage.as_deref() == Some(stage.display_name())
    }
}
