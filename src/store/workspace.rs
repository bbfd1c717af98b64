use std::path::{Path, PathBuf};

use super::dataset::Dataset;
use super::document;
use super::history::{Change, History};
use crate::config::DEFAULT_UNDO_LIMIT;
use crate::error::TrackerResult;
use crate::model::{Company, Contact};

/// The open dataset plus its backing file and undo history.
///
/// Every mutation goes through [`Workspace::commit`], which applies the
/// change to a copy, rewrites the whole file, and only then swaps the copy
/// in and records the change for undo. A failed save leaves memory as it was.
#[derive(Debug)]
pub struct Workspace {
    dataset: Dataset,
    path: Option<PathBuf>,
    history: History,
}

impl Workspace {
    pub fn open(path: &Path, undo_limit: usize) -> TrackerResult<Self> {
        let dataset = document::load(path)?;
        Ok(Self {
            dataset,
            path: Some(path.to_path_buf()),
            history: History::new(undo_limit),
        })
    }

    /// A workspace that never touches the filesystem.
    pub fn in_memory(dataset: Dataset) -> Self {
        Self {
            dataset,
            path: None,
            history: History::new(DEFAULT_UNDO_LIMIT),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.dataset.contacts
    }

    pub fn companies(&self) -> &[Company] {
        &self.dataset.companies
    }

    pub(crate) fn commit(&mut self, change: Change) -> TrackerResult<()> {
        let mut staged = self.dataset.clone();
        change.apply(&mut staged)?;
        self.persist(&staged)?;
        tracing::debug!(change = change_name(&change), "committed change");
        self.dataset = staged;
        self.history.record(change);
        Ok(())
    }

    pub fn undo(&mut self) -> TrackerResult<bool> {
        self.step(History::undo)
    }

    pub fn redo(&mut self) -> TrackerResult<bool> {
        self.step(History::redo)
    }

    /// Runs an undo or redo against copies of the dataset and history.
    /// Neither is replaced unless the file was written.
    fn step(&mut self, op: fn(&mut History, &mut Dataset) -> TrackerResult<bool>) -> TrackerResult<bool> {
        let mut staged = self.dataset.clone();
        let mut history = self.history.clone();
        if !op(&mut history, &mut staged)? {
            return Ok(false);
        }
        self.persist(&staged)?;
        self.dataset = staged;
        self.history = history;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn persist(&self, dataset: &Dataset) -> TrackerResult<()> {
        match &self.path {
            Some(path) => document::save(path, dataset),
            None => Ok(()),
        }
    }
}

fn change_name(change: &Change) -> &'static str {
    match change {
        Change::InsertContact { .. } => "insert contact",
        Change::RemoveContact { .. } => "remove contact",
        Change::ReplaceContact { .. } => "replace contact",
        Change::InsertCompany { .. } => "insert company",
        Change::RemoveCompany { .. } => "remove company",
        Change::ReplaceCompany { .. } => "replace company",
        Change::Batch(_) => "batch",
    }
}
