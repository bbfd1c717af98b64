use std::collections::VecDeque;

use super::dataset::Dataset;
use crate::error::{TrackerError, TrackerResult};
use crate::model::{Company, Contact};

/// A reversible edit to the dataset. Each variant carries exactly the
/// records needed to apply it and to build its inverse.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    InsertContact { index: usize, contact: Box<Contact> },
    RemoveContact { index: usize, contact: Box<Contact> },
    ReplaceContact { index: usize, before: Box<Contact>, after: Box<Contact> },
    InsertCompany { index: usize, company: Company },
    RemoveCompany { index: usize, company: Company },
    ReplaceCompany { index: usize, before: Company, after: Company },
    Batch(Vec<Change>),
}

impl Change {
    pub fn apply(&self, dataset: &mut Dataset) -> TrackerResult<()> {
        match self {
            Change::InsertContact { index, contact } => {
                check_bounds(*index, dataset.contacts.len() + 1)?;
                dataset.contacts.insert(*index, (**contact).clone());
            }
            Change::RemoveContact { index, .. } => {
                check_bounds(*index, dataset.contacts.len())?;
                dataset.contacts.remove(*index);
            }
            Change::ReplaceContact { index, after, .. } => {
                check_bounds(*index, dataset.contacts.len())?;
                dataset.contacts[*index] = (**after).clone();
            }
            Change::InsertCompany { index, company } => {
                check_bounds(*index, dataset.companies.len() + 1)?;
                dataset.companies.insert(*index, company.clone());
            }
            Change::RemoveCompany { index, .. } => {
                check_bounds(*index, dataset.companies.len())?;
                dataset.companies.remove(*index);
            }
            Change::ReplaceCompany { index, after, .. } => {
                check_bounds(*index, dataset.companies.len())?;
                dataset.companies[*index] = after.clone();
            }
            Change::Batch(changes) => {
                for change in changes {
                    change.apply(dataset)?;
                }
            }
        }
        Ok(())
    }

    pub fn inverse(&self) -> Change {
        match self {
            Change::InsertContact { index, contact } => Change::RemoveContact {
                index: *index,
                contact: contact.clone(),
            },
            Change::RemoveContact { index, contact } => Change::InsertContact {
                index: *index,
                contact: contact.clone(),
            },
            Change::ReplaceContact { index, before, after } => Change::ReplaceContact {
                index: *index,
                before: after.clone(),
                after: before.clone(),
            },
            Change::InsertCompany { index, company } => Change::RemoveCompany {
                index: *index,
                company: company.clone(),
            },
            Change::RemoveCompany { index, company } => Change::InsertCompany {
                index: *index,
                company: company.clone(),
            },
            Change::ReplaceCompany { index, before, after } => Change::ReplaceCompany {
                index: *index,
                before: after.clone(),
                after: before.clone(),
            },
            Change::Batch(changes) => Change::Batch(changes.iter().rev().map(Change::inverse).collect()),
        }
    }
}

fn check_bounds(index: usize, len: usize) -> TrackerResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(TrackerError::Other(format!(
            "change refers to position {} but only {} records exist",
            index, len
        )))
    }
}

/// Bounded undo log plus a redo stack.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Change>,
    redo: Vec<Change>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Records an applied change. Clears anything that could be redone.
    pub fn record(&mut self, change: Change) {
        self.undo.push_back(change);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Reverts the most recent change. Returns false if there was none.
    pub fn undo(&mut self, dataset: &mut Dataset) -> TrackerResult<bool> {
        let Some(change) = self.undo.pop_back() else {
            return Ok(false);
        };
        change.inverse().apply(dataset)?;
        self.redo.push(change);
        Ok(true)
    }

    /// Re-applies the most recently undone change.
    pub fn redo(&mut self, dataset: &mut Dataset) -> TrackerResult<bool> {
        let Some(change) = self.redo.pop() else {
            return Ok(false);
        };
        change.apply(dataset)?;
        self.undo.push_back(change);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}
