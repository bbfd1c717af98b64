use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

pub const DEFAULT_MAINTENANCE_DAYS: u32 = 120;
pub const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 2;
pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// Follow-up timing and session settings, stored as TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Check-in interval for professional relationships without a tag override.
    pub maintenance_days: u32,
    /// A task due within this many days is shown as upcoming.
    pub upcoming_window_days: u32,
    /// Maximum number of undoable changes kept in memory.
    pub undo_limit: usize,
    /// Per-tag check-in intervals. The first of a contact's tags found here wins.
    pub tag_intervals: BTreeMap<String, u32>,
}

impl Default for Settings {
    fn default() -> Self {
        let tag_intervals = [("VC", 60), ("Banking", 30), ("Friend", 90)]
            .into_iter()
            .map(|(tag, days)| (tag.to_string(), days))
            .collect();
        Self {
            maintenance_days: DEFAULT_MAINTENANCE_DAYS,
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
            undo_limit: DEFAULT_UNDO_LIMIT,
            tag_intervals,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> TrackerResult<Self> {
        let settings = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Self::default()
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> TrackerResult<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn validate(&self) -> TrackerResult<()> {
        let mut errors = Vec::new();

        if self.maintenance_days == 0 {
            errors.push("maintenance_days must be greater than 0".to_string());
        }
        if self.undo_limit == 0 {
            errors.push("undo_limit must be greater than 0".to_string());
        }
        for (tag, days) in &self.tag_intervals {
            if *days == 0 {
                errors.push(format!("interval for tag '{}' must be greater than 0", tag));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TrackerError::InvalidSettings(errors.join("; ")))
        }
    }

    /// Check-in interval for a contact with the given tags.
    pub fn maintenance_interval(&self, tags: &[String]) -> u32 {
        tags.iter()
            .find_map(|tag| self.tag_intervals.get(tag).copied())
            .unwrap_or(self.maintenance_days)
    }

    /// Sets or, with `None`, removes a tag's interval.
    pub fn set_tag_interval(&mut self, tag: &str, days: Option<u32>) -> TrackerResult<()> {
        let tag = crate::validation::non_blank(tag, "tag")?;
        match days {
            Some(0) => Err(TrackerError::OutOfRange {
                field: "interval".into(),
                min: 1,
                max: u32::MAX as i64,
            }),
            Some(d) => {
                self.tag_intervals.insert(tag, d);
                Ok(())
            }
            None => {
                self.tag_intervals.remove(&tag);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn first_matching_tag_wins() {
        let settings = Settings::default();
        let tags = vec!["Golf".to_string(), "Banking".to_string(), "VC".to_string()];
        assert_eq!(settings.maintenance_interval(&tags), 30);
    }

    #[test]
    fn untagged_uses_maintenance_days() {
        assert_eq!(Settings::default().maintenance_interval(&[]), 120);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let settings: Settings = toml::from_str("maintenance_days = 90").unwrap();
        assert_eq!(settings.maintenance_days, 90);
        assert_eq!(settings.upcoming_window_days, 2);
        assert_eq!(settings.tag_intervals.get("VC"), Some(&60));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut settings = Settings::default();
        settings.tag_intervals.insert("Weekly".into(), 0);
        assert!(settings.validate().is_err());
        assert!(settings.set_tag_interval("Daily", Some(0)).is_err());
    }
}
