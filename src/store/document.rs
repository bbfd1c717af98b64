use std::path::Path;

use serde_json::Value;

use super::dataset::Dataset;
use crate::error::TrackerResult;
use crate::migrate;

/// Reads the document at `path`. A missing file is an empty dataset.
/// Older layouts are upgraded and written back straight away.
pub fn load(path: &Path) -> TrackerResult<Dataset> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no data file yet, starting empty");
        return Ok(Dataset::default());
    }

    let text = std::fs::read_to_string(path)?;
    let (dataset, upgraded) = parse(&text)?;
    if upgraded {
        tracing::info!(path = %path.display(), "rewriting data file in current format");
        save(path, &dataset)?;
    }
    tracing::info!(
        contacts = dataset.contacts.len(),
        companies = dataset.companies.len(),
        "loaded data file"
    );
    Ok(dataset)
}

/// Parses document text. The flag reports whether an upgrade was applied.
pub fn parse(text: &str) -> TrackerResult<(Dataset, bool)> {
    let raw: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(text)?
    };
    let upgrade = migrate::upgrade_document(raw)?;
    for note in &upgrade.notes {
        tracing::debug!("upgrade: {}", note);
    }
    let changed = upgrade.changed();
    let dataset: Dataset = serde_json::from_value(upgrade.document)?;
    Ok((dataset, changed))
}

/// Overwrites the whole document at `path`.
pub fn save(path: &Path, dataset: &Dataset) -> TrackerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let text = render(dataset)?;
    std::fs::write(path, text)?;
    tracing::debug!(path = %path.display(), "data file written");
    Ok(())
}

/// Pretty-printed JSON with two-space indentation.
pub fn render(dataset: &Dataset) -> TrackerResult<String> {
    Ok(serde_json::to_string_pretty(dataset)?)
}
