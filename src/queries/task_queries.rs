use chrono::NaiveDate;

use super::followup_queries::{self, FollowUp, FollowUpStatus, TaskKind};
use crate::config::Settings;
use crate::model::{Contact, Id};

/// One row of the follow-up worklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpTask {
    pub contact_id: Id<Contact>,
    pub contact_name: String,
    pub follow_up: FollowUp,
}

impl FollowUpTask {
    pub fn description(&self) -> String {
        match self.follow_up.kind {
            TaskKind::Stage(stage) => format!("{} for {}", stage.display_name(), self.contact_name),
            TaskKind::Maintenance => format!("Regular check-in with {}", self.contact_name),
        }
    }
}

/// Sorted tasks plus the overdue count shown in the notification banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worklist {
    pub tasks: Vec<FollowUpTask>,
    pub overdue_count: usize,
}

impl Worklist {
    pub fn banner(&self) -> String {
        if self.overdue_count > 0 {
            format!("You have {} overdue follow-up task(s)!", self.overdue_count)
        } else {
            "All tasks are up to date!".to_string()
        }
    }

    pub fn with_status(&self, status: FollowUpStatus) -> impl Iterator<Item = &FollowUpTask> {
        self.tasks.iter().filter(move |t| t.follow_up.status == status)
    }
}

pub fn task_for(contact: &Contact, settings: &Settings, as_of: NaiveDate) -> Option<FollowUpTask> {
    followup_queries::follow_up_for(contact, settings, as_of).map(|follow_up| FollowUpTask {
        contact_id: contact.id,
        contact_name: contact.name.clone(),
        follow_up,
    })
}

/// Builds the worklist: overdue first, then upcoming, then done, each
/// ordered by days remaining. Contacts without a schedulable follow-up are
/// left out.
pub fn worklist(contacts: &[Contact], settings: &Settings, as_of: NaiveDate) -> Worklist {
    let mut tasks: Vec<FollowUpTask> = contacts
        .iter()
        .filter_map(|contact| {
            let task = task_for(contact, settings, as_of);
            if task.is_none() && contact.last_contact.is_some() && contact.last_contact_date().is_none() {
                tracing::debug!(contact = %contact.name, "skipping contact with unreadable last_contact");
            }
            task
        })
        .collect();

    tasks.sort_by_key(|t| (t.follow_up.status, t.follow_up.days_remaining));

    let overdue_count = tasks
        .iter()
        .filter(|t| t.follow_up.status == FollowUpStatus::Overdue)
        .count();

    Worklist {
        tasks,
        overdue_count,
    }
}
