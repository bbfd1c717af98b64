use chrono::{Days, NaiveDate};

use crate::config::Settings;
use crate::model::{Contact, Interaction, LeadStage, Relationship};

/// How a classification schedules follow-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpPolicy {
    /// No follow-ups at all.
    None,
    /// Timed outreach sequence; the contact is at the given stage.
    Staged(LeadStage),
    /// Periodic check-ins at a fixed interval.
    Recurring { interval_days: u32 },
}

/// Where a follow-up sits relative to today. Declaration order is the
/// worklist order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FollowUpStatus {
    Overdue,
    Upcoming,
    Done,
}

impl FollowUpStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            FollowUpStatus::Overdue => "Overdue",
            FollowUpStatus::Upcoming => "Upcoming",
            FollowUpStatus::Done => "Done",
        }
    }
}

/// What the next follow-up is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Stage(LeadStage),
    Maintenance,
}

impl TaskKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskKind::Stage(stage) => stage.display_name(),
            TaskKind::Maintenance => "Maintenance",
        }
    }
}

/// The computed next follow-up for one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUp {
    pub kind: TaskKind,
    pub due_date: NaiveDate,
    /// Negative when overdue.
    pub days_remaining: i64,
    pub status: FollowUpStatus,
}

pub fn policy_for(contact: &Contact, settings: &Settings) -> FollowUpPolicy {
    match contact.relationship {
        Relationship::Passive | Relationship::DeadLead => FollowUpPolicy::None,
        Relationship::Lead { stage } => FollowUpPolicy::Staged(stage),
        Relationship::Professional => FollowUpPolicy::Recurring {
            interval_days: settings.maintenance_interval(&contact.tags),
        },
    }
}

/// Next follow-up for a contact as of `as_of`.
///
/// `None` for passive classifications and for contacts whose last-contact
/// date is missing or does not parse.
pub fn follow_up_for(contact: &Contact, settings: &Settings, as_of: NaiveDate) -> Option<FollowUp> {
    let policy = policy_for(contact, settings);
    if policy == FollowUpPolicy::None {
        return None;
    }
    let last_contact = contact.last_contact_date()?;

    let (kind, due_date) = match policy {
        FollowUpPolicy::None => return None,
        FollowUpPolicy::Staged(stage) => (
            TaskKind::Stage(stage),
            stage_due_date(stage, last_contact, contact.history()),
        ),
        FollowUpPolicy::Recurring { interval_days } => (
            TaskKind::Maintenance,
            recurring_due_date(last_contact, interval_days, as_of),
        ),
    };

    let days_remaining = (due_date - as_of).num_days();
    Some(FollowUp {
        kind,
        due_date,
        days_remaining,
        status: status_for(due_date, as_of, settings.upcoming_window_days),
    })
}

/// Due date of `stage`: the most recent completion of the previous stage
/// plus this stage's offset. Falls back to the last-contact date when
/// there is no previous stage or it was never recorded.
pub fn stage_due_date(stage: LeadStage, last_contact: NaiveDate, history: &[Interaction]) -> NaiveDate {
    let base = stage
        .previous()
        .and_then(|prev| {
            history
                .iter()
                .rev()
                .find(|record| record.completes(prev))
                .and_then(Interaction::day)
        })
        .unwrap_or(last_contact);
    add_days(base, stage.offset_days())
}

/// First check-in after `last_contact` that falls strictly after `as_of`.
pub fn recurring_due_date(last_contact: NaiveDate, interval_days: u32, as_of: NaiveDate) -> NaiveDate {
    let interval = i64::from(interval_days.max(1));
    let first = add_days(last_contact, interval);
    if first > as_of {
        return first;
    }
    let behind = (as_of - first).num_days();
    let periods = behind / interval + 1;
    add_days(first, periods * interval)
}

pub fn status_for(due_date: NaiveDate, as_of: NaiveDate, upcoming_window_days: u32) -> FollowUpStatus {
    let days = (due_date - as_of).num_days();
    if days <= 0 {
        FollowUpStatus::Overdue
    } else if days <= i64::from(upcoming_window_days) {
        FollowUpStatus::Upcoming
    } else {
        FollowUpStatus::Done
    }
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let result = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    result.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_boundaries() {
        let today = day(2024, 1, 10);
        assert_eq!(status_for(day(2024, 1, 9), today, 2), FollowUpStatus::Overdue);
        assert_eq!(status_for(today, today, 2), FollowUpStatus::Overdue);
        assert_eq!(status_for(day(2024, 1, 11), today, 2), FollowUpStatus::Upcoming);
        assert_eq!(status_for(day(2024, 1, 12), today, 2), FollowUpStatus::Upcoming);
        assert_eq!(status_for(day(2024, 1, 13), today, 2), FollowUpStatus::Done);
    }

    #[test]
    fn recurring_rolls_forward_whole_intervals() {
        // 2024-01-01 + 120 = 2024-04-30, + 240 = 2024-08-28
        assert_eq!(recurring_due_date(day(2024, 1, 1), 120, day(2024, 6, 1)), day(2024, 8, 28));
    }

    #[test]
    fn recurring_on_exact_boundary_moves_to_next() {
        assert_eq!(recurring_due_date(day(2024, 1, 1), 10, day(2024, 1, 11)), day(2024, 1, 21));
    }

    #[test]
    fn recurring_is_always_after_today() {
        let last = day(2020, 2, 29);
        for interval in [1, 7, 30, 120] {
            for offset in 0..400 {
                let today = day(2020, 2, 1) + chrono::Duration::days(offset);
                assert!(recurring_due_date(last, interval, today) > today);
            }
        }
    }

    #[test]
    fn first_outreach_is_due_on_last_contact() {
        assert_eq!(stage_due_date(LeadStage::FirstOutreach, day(2024, 1, 1), &[]), day(2024, 1, 1));
    }

    #[test]
    fn stage_without_recorded_previous_uses_last_contact() {
        assert_eq!(stage_due_date(LeadStage::SecondFollowUp, day(2024, 1, 1), &[]), day(2024, 1, 8));
    }
}
