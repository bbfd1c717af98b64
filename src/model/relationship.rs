use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// A step in the lead outreach sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadStage {
    #[serde(rename = "First Outreach")]
    FirstOutreach,
    #[serde(rename = "First Follow-up")]
    FirstFollowUp,
    #[serde(rename = "Second Follow-up")]
    SecondFollowUp,
    #[serde(rename = "Third Follow-up")]
    ThirdFollowUp,
}

impl LeadStage {
    pub const ALL: &'static [LeadStage] = &[
        LeadStage::FirstOutreach,
        LeadStage::FirstFollowUp,
        LeadStage::SecondFollowUp,
        LeadStage::ThirdFollowUp,
    ];

    /// Stage assumed for a lead stored without one.
    pub const DEFAULT: LeadStage = LeadStage::FirstFollowUp;

    pub fn display_name(&self) -> &'static str {
        match self {
            LeadStage::FirstOutreach => "First Outreach",
            LeadStage::FirstFollowUp => "First Follow-up",
            LeadStage::SecondFollowUp => "Second Follow-up",
            LeadStage::ThirdFollowUp => "Third Follow-up",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.display_name().eq_ignore_ascii_case(s))
    }

    /// Days between completing the previous stage and this one falling due.
    pub fn offset_days(&self) -> i64 {
        match self {
            LeadStage::FirstOutreach => 0,
            LeadStage::FirstFollowUp => 7,
            LeadStage::SecondFollowUp => 7,
            LeadStage::ThirdFollowUp => 7,
        }
    }

    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Option<LeadStage> {
        Self::ALL.get(self.position() + 1).copied()
    }

    pub fn previous(&self) -> Option<LeadStage> {
        self.position()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Resolves the answer to "did you get a response?" after this stage.
    pub fn respond(self, response: Response) -> StageOutcome {
        match response {
            Response::Cancel => StageOutcome::Unchanged,
            Response::Yes => StageOutcome::Converted,
            Response::No => match self.next() {
                Some(next) => StageOutcome::Advanced(next),
                None => StageOutcome::Exhausted,
            },
        }
    }
}

/// The classification names as they appear in the stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    PassiveFriendship,
    Lead,
    ProfessionalRelationship,
    DeadLead,
}

impl RelationshipType {
    pub const ALL: &'static [RelationshipType] = &[
        RelationshipType::PassiveFriendship,
        RelationshipType::Lead,
        RelationshipType::ProfessionalRelationship,
        RelationshipType::DeadLead,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            RelationshipType::PassiveFriendship => "Passive Friendship",
            RelationshipType::Lead => "Lead",
            RelationshipType::ProfessionalRelationship => "Professional Relationship",
            RelationshipType::DeadLead => "Dead Lead",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.display_name().eq_ignore_ascii_case(s))
    }
}

/// A contact's classification. The lead stage only exists inside the
/// `Lead` variant, so a stage can never outlive the lead classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RelationshipRecord", into = "RelationshipRecord")]
pub enum Relationship {
    #[default]
    Passive,
    Lead {
        stage: LeadStage,
    },
    Professional,
    DeadLead,
}

impl Relationship {
    /// Labels offered when picking a classification, one per lead stage.
    pub fn options() -> Vec<Relationship> {
        let mut options = vec![Relationship::Passive];
        options.extend(LeadStage::ALL.iter().map(|&stage| Relationship::Lead { stage }));
        options.push(Relationship::Professional);
        options.push(Relationship::DeadLead);
        options
    }

    pub fn lead(stage: LeadStage) -> Self {
        Relationship::Lead { stage }
    }

    pub fn relationship_type(&self) -> RelationshipType {
        match self {
            Relationship::Passive => RelationshipType::PassiveFriendship,
            Relationship::Lead { .. } => RelationshipType::Lead,
            Relationship::Professional => RelationshipType::ProfessionalRelationship,
            Relationship::DeadLead => RelationshipType::DeadLead,
        }
    }

    pub fn lead_stage(&self) -> Option<LeadStage> {
        match self {
            Relationship::Lead { stage } => Some(*stage),
            _ => None,
        }
    }

    /// Human-readable label, e.g. "Lead - Second Follow-up".
    pub fn label(&self) -> String {
        match self {
            Relationship::Lead { stage } => format!("Lead - {}", stage.display_name()),
            other => other.relationship_type().display_name().to_string(),
        }
    }

    /// Parses either a bare classification name or a combined
    /// "Lead - <stage>" label. Blank means passive.
    pub fn parse_label(label: &str) -> Result<Self, TrackerError> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(Relationship::Passive);
        }
        if let Some((head, tail)) = label.split_once(" - ") {
            if RelationshipType::from_name(head) == Some(RelationshipType::Lead) {
                return LeadStage::from_name(tail)
                    .map(Relationship::lead)
                    .ok_or_else(|| TrackerError::UnknownClassification(label.to_string()));
            }
        }
        let kind = RelationshipType::from_name(label)
            .ok_or_else(|| TrackerError::UnknownClassification(label.to_string()))?;
        Ok(Self::from_parts(kind, None))
    }

    fn from_parts(kind: RelationshipType, stage: Option<LeadStage>) -> Self {
        match kind {
            RelationshipType::PassiveFriendship => Relationship::Passive,
            RelationshipType::Lead => Relationship::Lead {
                stage: stage.unwrap_or(LeadStage::DEFAULT),
            },
            RelationshipType::ProfessionalRelationship => Relationship::Professional,
            RelationshipType::DeadLead => Relationship::DeadLead,
        }
    }
}

/// Flat storage shape: `relationship_type` plus an optional `lead_stage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RelationshipRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relationship_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lead_stage: Option<String>,
}

impl TryFrom<RelationshipRecord> for Relationship {
    type Error = TrackerError;

    fn try_from(record: RelationshipRecord) -> Result<Self, Self::Error> {
        let parsed = Relationship::parse_label(record.relationship_type.as_deref().unwrap_or(""))?;
        let stage_name = record
            .lead_stage
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match (parsed, stage_name) {
            // An explicit lead_stage wins over the default (or a combined label).
            (Relationship::Lead { .. }, Some(name)) => LeadStage::from_name(name)
                .map(Relationship::lead)
                .ok_or_else(|| TrackerError::UnknownClassification(format!("Lead - {}", name))),
            (Relationship::Lead { stage }, None) => Ok(Relationship::Lead { stage }),
            (other, Some(name)) => {
                tracing::warn!(
                    stage = name,
                    relationship = other.relationship_type().display_name(),
                    "dropping lead stage stored on a non-lead contact"
                );
                Ok(other)
            }
            (other, None) => Ok(other),
        }
    }
}

impl From<Relationship> for RelationshipRecord {
    fn from(rel: Relationship) -> Self {
        RelationshipRecord {
            relationship_type: Some(rel.relationship_type().display_name().to_string()),
            lead_stage: rel.lead_stage().map(|s| s.display_name().to_string()),
        }
    }
}

/// Answer to "did you get a response?" after completing a lead stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Yes,
    No,
    Cancel,
}

/// Result of feeding a response into the stage machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Cancelled; the task stays open.
    Unchanged,
    /// The lead replied and becomes a professional relationship.
    Converted,
    /// No reply yet; move on to the given stage.
    Advanced(LeadStage),
    /// No reply after the final stage.
    Exhausted,
}

impl StageOutcome {
    pub fn apply_to(self, current: Relationship) -> Relationship {
        match self {
            StageOutcome::Unchanged => current,
            StageOutcome::Converted => Relationship::Professional,
            StageOutcome::Advanced(stage) => Relationship::Lead { stage },
            StageOutcome::Exhausted => Relationship::DeadLead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_sequence_is_linear() {
        assert_eq!(LeadStage::FirstOutreach.next(), Some(LeadStage::FirstFollowUp));
        assert_eq!(LeadStage::ThirdFollowUp.next(), None);
        assert_eq!(LeadStage::FirstOutreach.previous(), None);
        assert_eq!(LeadStage::SecondFollowUp.previous(), Some(LeadStage::FirstFollowUp));
    }

    #[test]
    fn first_outreach_is_immediate() {
        assert_eq!(LeadStage::FirstOutreach.offset_days(), 0);
        assert!(LeadStage::ALL[1..].iter().all(|s| s.offset_days() == 7));
    }

    #[test]
    fn parse_label_accepts_combined_lead_labels() {
        assert_eq!(
            Relationship::parse_label("Lead - Second Follow-up").unwrap(),
            Relationship::lead(LeadStage::SecondFollowUp)
        );
    }

    #[test]
    fn parse_label_defaults_bare_lead_stage() {
        assert_eq!(
            Relationship::parse_label("Lead").unwrap(),
            Relationship::lead(LeadStage::FirstFollowUp)
        );
    }

    #[test]
    fn parse_label_blank_is_passive() {
        assert_eq!(Relationship::parse_label("").unwrap(), Relationship::Passive);
    }

    #[test]
    fn parse_label_rejects_unknown() {
        assert!(Relationship::parse_label("Nemesis").is_err());
        assert!(Relationship::parse_label("Lead - Fifth Follow-up").is_err());
    }

    #[test]
    fn labels_roundtrip_through_parse() {
        for option in Relationship::options() {
            assert_eq!(Relationship::parse_label(&option.label()).unwrap(), option);
        }
    }

    #[test]
    fn respond_cancel_leaves_state() {
        let outcome = LeadStage::SecondFollowUp.respond(Response::Cancel);
        let current = Relationship::lead(LeadStage::SecondFollowUp);
        assert_eq!(outcome.apply_to(current), current);
    }

    #[test]
    fn respond_no_on_last_stage_exhausts() {
        assert_eq!(
            LeadStage::ThirdFollowUp.respond(Response::No),
            StageOutcome::Exhausted
        );
    }
}
