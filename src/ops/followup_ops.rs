use chrono::NaiveDateTime;

use crate::config::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::model::{Contact, Id, Interaction, LeadStage, Response, StageOutcome};
use crate::queries::followup_queries::{self, TaskKind};
use crate::store::{Change, Workspace};
use crate::validation::DATE_FORMAT;

/// What marking a follow-up complete did to the contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Cancelled at the response prompt; nothing changed.
    Cancelled,
    /// A recurring check-in was logged.
    CheckedIn,
    /// The lead answered and is now a professional relationship.
    Converted,
    /// No answer yet; the lead moved to the given stage.
    Advanced(LeadStage),
    /// No answer after the last stage; the lead is dead.
    MarkedDead,
}

/// Marks the contact's current follow-up as done.
///
/// For a lead, `response` answers "did you get a response?" and drives
/// the stage machine. For a recurring check-in any answer other than
/// `Cancel` logs the check-in. Every non-cancelled completion appends a
/// history record and moves the last-contact date to `now`.
pub fn complete_task(
    ws: &mut Workspace,
    settings: &Settings,
    id: Id<Contact>,
    response: Response,
    now: NaiveDateTime,
) -> TrackerResult<Completion> {
    let index = ws.dataset().contact_index(id)?;
    let before = ws.contacts()[index].clone();

    let follow_up = followup_queries::follow_up_for(&before, settings, now.date())
        .ok_or_else(|| TrackerError::NoFollowUp {
            name: before.name.clone(),
        })?;

    if response == Response::Cancel {
        return Ok(Completion::Cancelled);
    }

    let mut after = before.clone();
    let completion = match follow_up.kind {
        TaskKind::Stage(stage) => {
            after.record(Interaction::stage_completed(stage, follow_up.due_date, now));
            let outcome = stage.respond(response);
            after.relationship = outcome.apply_to(before.relationship);
            match outcome {
                StageOutcome::Converted => Completion::Converted,
                StageOutcome::Advanced(next) => Completion::Advanced(next),
                StageOutcome::Exhausted => Completion::MarkedDead,
                StageOutcome::Unchanged => Completion::Cancelled,
            }
        }
        TaskKind::Maintenance => {
            after.record(Interaction::maintenance_completed(follow_up.due_date, now));
            Completion::CheckedIn
        }
    };
    after.last_contact = Some(now.date().format(DATE_FORMAT).to_string());

    tracing::info!(
        contact = %before.name,
        task = follow_up.kind.display_name(),
        from = %before.relationship.label(),
        to = %after.relationship.label(),
        "follow-up completed"
    );

    ws.commit(Change::ReplaceContact {
        index,
        before: Box::new(before),
        after: Box::new(after),
    })?;
    Ok(completion)
}
