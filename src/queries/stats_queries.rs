use chrono::NaiveDate;

use super::task_queries;
use crate::config::Settings;
use crate::store::Dataset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_contacts: usize,
    pub total_companies: usize,
    pub leads: usize,
    pub professionals: usize,
    pub follow_ups_overdue: usize,
    pub follow_ups_upcoming: usize,
    /// Contacts with no readable last-contact date.
    pub never_contacted: usize,
    /// Up to five most recently contacted, newest first.
    pub recent: Vec<(String, NaiveDate)>,
}

pub fn dashboard(dataset: &Dataset, settings: &Settings, as_of: NaiveDate) -> DashboardStats {
    use crate::model::Relationship;
    use crate::queries::followup_queries::FollowUpStatus;

    let contacts = &dataset.contacts;
    let worklist = task_queries::worklist(contacts, settings, as_of);

    let mut recent: Vec<(String, NaiveDate)> = contacts
        .iter()
        .filter_map(|c| c.last_contact_date().map(|d| (c.name.clone(), d)))
        .collect();
    recent.sort_by(|a, b| b.1.cmp(&a.1));
    recent.truncate(5);

    DashboardStats {
        total_contacts: contacts.len(),
        total_companies: dataset.companies.len(),
        leads: contacts
            .iter()
            .filter(|c| matches!(c.relationship, Relationship::Lead { .. }))
            .count(),
        professionals: contacts
            .iter()
            .filter(|c| c.relationship == Relationship::Professional)
            .count(),
        follow_ups_overdue: worklist.overdue_count,
        follow_ups_upcoming: worklist.with_status(FollowUpStatus::Upcoming).count(),
        never_contacted: contacts.iter().filter(|c| c.last_contact_date().is_none()).count(),
        recent,
    }
}
