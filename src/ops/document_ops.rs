use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TrackerError, TrackerResult};
use crate::model::Contact;

/// Directory holding a contact's attached files under `docs_root`.
pub fn documents_dir(docs_root: &Path, contact: &Contact) -> PathBuf {
    docs_root.join(contact.name.trim().replace(' ', "_"))
}

/// File names attached to a contact, sorted.
pub fn list_documents(docs_root: &Path, contact: &Contact) -> TrackerResult<Vec<String>> {
    let dir = documents_dir(docs_root, contact);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                if !name.ends_with(PARTIAL_SUFFIX) {
                    names.push(name.to_string());
                }
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Copies `source` into the contact's directory and returns the new path.
/// The copy lands under a temporary name first, so a failed copy leaves
/// nothing behind.
pub fn attach_document(docs_root: &Path, contact: &Contact, source: &Path) -> TrackerResult<PathBuf> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TrackerError::InvalidFileName(source.display().to_string()))?;
    let file_name = plain_file_name(file_name)?;

    let dir = documents_dir(docs_root, contact);
    fs::create_dir_all(&dir)?;

    let target = dir.join(file_name);
    let partial = dir.join(format!("{}{}", file_name, PARTIAL_SUFFIX));
    if let Err(e) = fs::copy(source, &partial).and_then(|_| fs::rename(&partial, &target)) {
        let _ = fs::remove_file(&partial);
        tracing::warn!(contact = %contact.name, file = file_name, error = %e, "attach failed");
        return Err(e.into());
    }
    tracing::info!(contact = %contact.name, file = file_name, "document attached");
    Ok(target)
}

pub fn remove_document(docs_root: &Path, contact: &Contact, file_name: &str) -> TrackerResult<()> {
    let file_name = plain_file_name(file_name)?;
    let path = documents_dir(docs_root, contact).join(file_name);
    fs::remove_file(&path).map_err(|e| {
        tracing::warn!(contact = %contact.name, file = file_name, error = %e, "remove failed");
        TrackerError::Io(e)
    })?;
    tracing::info!(contact = %contact.name, file = file_name, "document removed");
    Ok(())
}

const PARTIAL_SUFFIX: &str = ".partial";

fn plain_file_name(name: &str) -> TrackerResult<&str> {
    let name = name.trim();
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\');
    if is_plain {
        Ok(name)
    } else {
        Err(TrackerError::InvalidFileName(name.to_string()))
    }
}
