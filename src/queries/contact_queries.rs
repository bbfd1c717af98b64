use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::followup_queries::{self, FollowUpStatus};
use crate::config::Settings;
use crate::model::{Contact, RelationshipType};

/// Criteria for narrowing the contact list. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    /// Case-insensitive substring of name, company, or any tag.
    pub text: Option<String>,
    pub tag: Option<String>,
    pub relationship_type: Option<RelationshipType>,
    pub company: Option<String>,
    pub state: Option<String>,
    pub career: Option<String>,
    pub status: Option<FollowUpStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Name,
    /// Most recently contacted first.
    RecentContact,
    /// Soonest follow-up first; contacts without one last.
    NextFollowUp,
}

pub fn filter_contacts<'a>(
    contacts: &'a [Contact],
    filter: &ContactFilter,
    settings: &Settings,
    as_of: NaiveDate,
) -> Vec<&'a Contact> {
    let text = filter.text.as_deref().map(str::to_lowercase);
    contacts
        .iter()
        .filter(|c| text.as_deref().map_or(true, |q| matches_text(c, q)))
        .filter(|c| filter.tag.as_deref().map_or(true, |t| c.has_tag(t)))
        .filter(|c| {
            filter
                .relationship_type
                .map_or(true, |t| c.relationship.relationship_type() == t)
        })
        .filter(|c| field_matches(c.company.as_deref(), filter.company.as_deref()))
        .filter(|c| field_matches(c.state.as_deref(), filter.state.as_deref()))
        .filter(|c| field_matches(c.career.as_deref(), filter.career.as_deref()))
        .filter(|c| {
            filter.status.map_or(true, |status| {
                followup_queries::follow_up_for(c, settings, as_of).map(|f| f.status) == Some(status)
            })
        })
        .collect()
}

pub fn sort_contacts(contacts: &mut [&Contact], order: SortOrder, settings: &Settings, as_of: NaiveDate) {
    match order {
        SortOrder::Name => contacts.sort_by_key(|c| c.name.to_lowercase()),
        SortOrder::RecentContact => {
            contacts.sort_by(|a, b| b.last_contact_date().cmp(&a.last_contact_date()))
        }
        SortOrder::NextFollowUp => contacts.sort_by_key(|c| {
            followup_queries::follow_up_for(c, settings, as_of)
                .map(|f| f.due_date)
                .unwrap_or(NaiveDate::MAX)
        }),
    }
}

/// Contacts whose name contains `query`, ignoring case. An exact match,
/// if there is one, is returned alone.
pub fn find_by_name<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    if let Some(exact) = contacts.iter().find(|c| c.name.eq_ignore_ascii_case(query)) {
        return vec![exact];
    }
    let lower = query.to_lowercase();
    contacts
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&lower))
        .collect()
}

/// Every distinct tag in use, sorted.
pub fn all_tags(contacts: &[Contact]) -> Vec<String> {
    contacts
        .iter()
        .flat_map(|c| c.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn matches_text(contact: &Contact, query: &str) -> bool {
    contact.name.to_lowercase().contains(query)
        || contact
            .company
            .as_ref()
            .map_or(false, |c| c.to_lowercase().contains(query))
        || contact.tags.iter().any(|t| t.to_lowercase().contains(query))
}

fn field_matches(value: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(w) => value.map_or(false, |v| v.trim().eq_ignore_ascii_case(w.trim())),
    }
}
