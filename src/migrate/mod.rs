pub mod csv_io;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};
use crate::model::RelationshipType;

/// Outcome of bringing a raw document up to the current layout.
#[derive(Debug)]
pub struct Upgrade {
    pub document: Value,
    /// One line per fix applied. Empty when the document was already current.
    pub notes: Vec<String>,
}

impl Upgrade {
    pub fn changed(&self) -> bool {
        !self.notes.is_empty()
    }
}

/// Upgrades older document layouts in memory:
/// - a bare list of contacts becomes `{ "contacts": [...], "companies": [] }`
/// - companies stored as plain strings become `{ "name": ... }` records
/// - contact keys `interactions` and `last_interaction` are renamed to
///   `history` and `last_contact`; the derived `next_followup` is dropped
/// - a combined `"Lead - <stage>"` classification is split into
///   `relationship_type` and `lead_stage`; a stage on a non-lead is dropped
/// - records without an `id` are given one, so ids survive the next load
pub fn upgrade_document(raw: Value) -> TrackerResult<Upgrade> {
    let mut notes = Vec::new();

    let mut root = match raw {
        Value::Array(contacts) => {
            notes.push(format!("wrapped bare list of {} contacts", contacts.len()));
            let mut root = Map::new();
            root.insert("contacts".into(), Value::Array(contacts));
            root.insert("companies".into(), Value::Array(Vec::new()));
            root
        }
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(TrackerError::Other(format!(
                "unrecognised document: expected an object or a list, found {}",
                type_name(&other)
            )))
        }
    };

    if let Some(Value::Array(companies)) = root.get_mut("companies") {
        let mut converted = 0;
        for company in companies.iter_mut() {
            if let Value::String(name) = company {
                let mut record = Map::new();
                record.insert("name".into(), Value::String(std::mem::take(name)));
                *company = Value::Object(record);
                converted += 1;
            }
        }
        if converted > 0 {
            notes.push(format!("converted {} company names to records", converted));
        }
    }

    if let Some(Value::Array(contacts)) = root.get_mut("contacts") {
        for contact in contacts.iter_mut().filter_map(Value::as_object_mut) {
            upgrade_contact(contact, &mut notes);
        }
    }

    let mut assigned = 0;
    for key in ["contacts", "companies"] {
        if let Some(Value::Array(records)) = root.get_mut(key) {
            for record in records.iter_mut().filter_map(Value::as_object_mut) {
                if !record.contains_key("id") {
                    record.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
                    assigned += 1;
                }
            }
        }
    }
    if assigned > 0 {
        notes.push(format!("assigned ids to {} records", assigned));
    }

    Ok(Upgrade {
        document: Value::Object(root),
        notes,
    })
}

fn upgrade_contact(contact: &mut Map<String, Value>, notes: &mut Vec<String>) {
    let name = contact
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string();

    if let Some(interactions) = contact.remove("interactions") {
        if contact.contains_key("history") {
            tracing::warn!(contact = %name, "both history and interactions present, keeping history");
        } else {
            contact.insert("history".into(), interactions);
        }
        notes.push(format!("{}: moved interactions to history", name));
    }

    if let Some(last) = contact.remove("last_interaction") {
        if !contact.contains_key("last_contact") && !last.is_null() {
            contact.insert("last_contact".into(), last);
        }
        notes.push(format!("{}: renamed last_interaction to last_contact", name));
    }

    if contact.remove("next_followup").is_some() {
        notes.push(format!("{}: dropped stored next_followup", name));
    }

    split_combined_classification(contact, &name, notes);

    let is_lead = contact
        .get("relationship_type")
        .and_then(Value::as_str)
        .and_then(RelationshipType::from_name)
        == Some(RelationshipType::Lead);
    if !is_lead && contact.get("lead_stage").map_or(false, |v| !v.is_null()) {
        contact.remove("lead_stage");
        notes.push(format!("{}: dropped lead_stage on a non-lead", name));
    }
}

/// `"Lead - Second Follow-up"` becomes `Lead` plus the stage. A stage
/// already stored in `lead_stage` is kept.
fn split_combined_classification(contact: &mut Map<String, Value>, name: &str, notes: &mut Vec<String>) {
    let Some((head, tail)) = contact
        .get("relationship_type")
        .and_then(Value::as_str)
        .and_then(|label| label.split_once(" - "))
        .map(|(head, tail)| (head.trim().to_string(), tail.trim().to_string()))
    else {
        return;
    };
    if RelationshipType::from_name(&head) != Some(RelationshipType::Lead) {
        return;
    }

    contact.insert(
        "relationship_type".into(),
        Value::String(RelationshipType::Lead.display_name().to_string()),
    );
    let has_stage = contact
        .get("lead_stage")
        .and_then(Value::as_str)
        .map_or(false, |s| !s.trim().is_empty());
    if !has_stage {
        contact.insert("lead_stage".into(), Value::String(tail));
    }
    notes.push(format!("{}: split combined classification", name));
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_list_is_wrapped() {
        let upgrade = upgrade_document(json!([{ "name": "Ana" }])).unwrap();
        assert!(upgrade.changed());
        assert_eq!(upgrade.document["contacts"][0]["name"], "Ana");
        assert_eq!(upgrade.document["companies"], json!([]));
    }

    #[test]
    fn current_document_is_untouched() {
        let doc = json!({
            "contacts": [{ "id": "6f1c2f64-4c3e-4a7e-9d7a-2b1f0c9e8a11", "name": "Ana", "history": [] }],
            "companies": []
        });
        let upgrade = upgrade_document(doc.clone()).unwrap();
        assert!(!upgrade.changed());
        assert_eq!(upgrade.document, doc);
    }

    #[test]
    fn string_companies_become_records() {
        let upgrade = upgrade_document(json!({ "contacts": [], "companies": ["Acme"] })).unwrap();
        assert_eq!(upgrade.document["companies"][0]["name"], "Acme");
        assert!(upgrade.document["companies"][0]["id"].is_string());
    }

    #[test]
    fn legacy_contact_keys_are_renamed() {
        let upgrade = upgrade_document(json!([{
            "name": "Ana",
            "last_interaction": "2024-01-01",
            "next_followup": "2024-02-01",
            "interactions": [{ "date": "2024-01-01", "type": "Call", "summary": "hi" }]
        }]))
        .unwrap();
        let contact = &upgrade.document["contacts"][0];
        assert_eq!(contact["last_contact"], "2024-01-01");
        assert_eq!(contact["history"][0]["summary"], "hi");
        assert!(contact.get("next_followup").is_none());
        assert!(contact.get("interactions").is_none());
    }

    #[test]
    fn combined_classification_is_split() {
        let upgrade = upgrade_document(json!({
            "contacts": [{ "id": "6f1c2f64-4c3e-4a7e-9d7a-2b1f0c9e8a11", "name": "Ana",
                           "relationship_type": "Lead - Second Follow-up" }],
            "companies": []
        }))
        .unwrap();
        assert!(upgrade.changed());
        let contact = &upgrade.document["contacts"][0];
        assert_eq!(contact["relationship_type"], "Lead");
        assert_eq!(contact["lead_stage"], "Second Follow-up");
    }

    #[test]
    fn explicit_stage_beats_combined_label() {
        let upgrade = upgrade_document(json!([{
            "name": "Ana",
            "relationship_type": "Lead - Second Follow-up",
            "lead_stage": "Third Follow-up"
        }]))
        .unwrap();
        assert_eq!(upgrade.document["contacts"][0]["lead_stage"], "Third Follow-up");
    }

    #[test]
    fn stage_on_non_lead_is_dropped() {
        let upgrade = upgrade_document(json!({
            "contacts": [{ "id": "6f1c2f64-4c3e-4a7e-9d7a-2b1f0c9e8a11", "name": "Bo",
                           "relationship_type": "Dead Lead", "lead_stage": "First Outreach" }],
            "companies": []
        }))
        .unwrap();
        assert!(upgrade.changed());
        assert!(upgrade.document["contacts"][0].get("lead_stage").is_none());
    }

    #[test]
    fn scalar_document_is_rejected() {
        assert!(upgrade_document(json!(42)).is_err());
    }
}
