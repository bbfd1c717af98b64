use chrono::NaiveDate;
use nettrack::model::*;
use serde_json::json;

fn contact_from(value: serde_json::Value) -> Contact {
    serde_json::from_value(value).unwrap()
}

// ==========================================================================
// ID TESTS
// ==========================================================================

#[test]
fn id_generate_creates_unique_ids() {
    let id1 = Id::<Contact>::generate();
    let id2 = Id::<Contact>::generate();
    assert_ne!(id1, id2);
}

#[test]
fn id_is_type_safe() {
    let contact_id = Id::<Contact>::generate();
    let company_id = Id::<Company>::generate();
    assert_ne!(contact_id.value, company_id.value);
}

#[test]
fn id_serializes_as_plain_uuid() {
    let id = Id::<Contact>::generate();
    let value = serde_json::to_value(id).unwrap();
    assert_eq!(value, json!(id.value.to_string()));
}

// ==========================================================================
// CLASSIFICATION TESTS
// ==========================================================================

#[test]
fn lead_without_stage_defaults_to_first_follow_up() {
    let contact = contact_from(json!({ "name": "Ana", "relationship_type": "Lead" }));
    assert_eq!(contact.relationship, Relationship::lead(LeadStage::FirstFollowUp));
}

#[test]
fn stored_stage_is_kept_for_leads() {
    let contact = contact_from(json!({
        "name": "Ana",
        "relationship_type": "Lead",
        "lead_stage": "Third Follow-up"
    }));
    assert_eq!(contact.relationship.lead_stage(), Some(LeadStage::ThirdFollowUp));
}

#[test]
fn stage_on_non_lead_is_dropped() {
    let contact = contact_from(json!({
        "name": "Ana",
        "relationship_type": "Professional Relationship",
        "lead_stage": "Second Follow-up"
    }));
    assert_eq!(contact.relationship, Relationship::Professional);
    assert_eq!(contact.relationship.lead_stage(), None);
}

#[test]
fn combined_label_is_split() {
    let contact = contact_from(json!({ "name": "Ana", "relationship_type": "Lead - Second Follow-up" }));
    assert_eq!(contact.relationship, Relationship::lead(LeadStage::SecondFollowUp));
}

#[test]
fn missing_classification_is_passive() {
    let contact = contact_from(json!({ "name": "Ana" }));
    assert_eq!(contact.relationship, Relationship::Passive);
}

#[test]
fn unknown_classification_fails_to_load() {
    let result: Result<Contact, _> =
        serde_json::from_value(json!({ "name": "Ana", "relationship_type": "Nemesis" }));
    assert!(result.is_err());
}

#[test]
fn classification_is_written_flat() {
    let mut contact = Contact::create("Ana".into());
    contact.relationship = Relationship::lead(LeadStage::FirstOutreach);
    let value = serde_json::to_value(&contact).unwrap();
    assert_eq!(value["relationship_type"], "Lead");
    assert_eq!(value["lead_stage"], "First Outreach");

    contact.relationship = Relationship::DeadLead;
    let value = serde_json::to_value(&contact).unwrap();
    assert_eq!(value["relationship_type"], "Dead Lead");
    assert!(value.get("lead_stage").is_none());
}

#[test]
fn relationship_options_cover_every_stage() {
    let options = Relationship::options();
    assert_eq!(options.len(), 3 + LeadStage::ALL.len());
    assert!(options.contains(&Relationship::lead(LeadStage::ThirdFollowUp)));
}

#[test]
fn labels_round_trip_through_parse() {
    for option in Relationship::options() {
        assert_eq!(Relationship::parse_label(&option.label()).unwrap(), option);
    }
}

// ==========================================================================
// STAGE MACHINE TESTS
// ==========================================================================

#[test]
fn yes_converts_at_every_stage() {
    for &stage in LeadStage::ALL {
        let outcome = stage.respond(Response::Yes);
        assert_eq!(outcome, StageOutcome::Converted);
        assert_eq!(outcome.apply_to(Relationship::lead(stage)), Relationship::Professional);
    }
}

#[test]
fn no_advances_until_exhausted() {
    let mut rel = Relationship::lead(LeadStage::FirstOutreach);
    let mut steps = 0;
    while let Some(stage) = rel.lead_stage() {
        rel = stage.respond(Response::No).apply_to(rel);
        steps += 1;
    }
    assert_eq!(steps, LeadStage::ALL.len());
    assert_eq!(rel, Relationship::DeadLead);
}

#[test]
fn cancel_leaves_stage_alone() {
    let rel = Relationship::lead(LeadStage::SecondFollowUp);
    assert_eq!(LeadStage::SecondFollowUp.respond(Response::Cancel).apply_to(rel), rel);
}

// ==========================================================================
// CONTACT TESTS
// ==========================================================================

#[test]
fn malformed_last_contact_is_kept_but_unreadable() {
    let contact = contact_from(json!({ "name": "Ana", "last_contact": "last tuesday" }));
    assert_eq!(contact.last_contact.as_deref(), Some("last tuesday"));
    assert_eq!(contact.last_contact_date(), None);
}

#[test]
fn last_contact_date_parses() {
    let contact = contact_from(json!({ "name": "Ana", "last_contact": "2024-03-05" }));
    assert_eq!(contact.last_contact_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
}

#[test]
fn tags_accept_joined_string() {
    let contact = contact_from(json!({ "name": "Ana", "tags": "VC, Banking ,," }));
    assert_eq!(contact.tags, vec!["VC", "Banking"]);
}

#[test]
fn tags_accept_list() {
    let contact = contact_from(json!({ "name": "Ana", "tags": ["VC", " "] }));
    assert_eq!(contact.tags, vec!["VC"]);
}

#[test]
fn history_accepts_legacy_summary_key() {
    let contact = contact_from(json!({
        "name": "Ana",
        "history": [{ "date": "2024-01-01", "type": "Call", "summary": "caught up" }]
    }));
    assert_eq!(contact.history().len(), 1);
    assert_eq!(contact.history()[0].note, "caught up");
    assert_eq!(contact.history()[0].day(), NaiveDate::from_ymd_opt(2024, 1, 1));
}

#[test]
fn place_prefers_city() {
    let mut contact = Contact::create("Ana".into());
    contact.location = Some("East coast".into());
    assert_eq!(contact.place(), Some("East coast"));
    contact.city = Some("Boston".into());
    assert_eq!(contact.place(), Some("Boston"));
}

// ==========================================================================
// COMPANY TESTS
// ==========================================================================

#[test]
fn company_name_matching_ignores_case_and_spaces() {
    let company = Company::create("Acme Capital".into());
    assert!(company.matches_name("  acme capital "));
    assert!(!company.matches_name("Acme"));
}

#[test]
fn company_type_is_stored_as_type() {
    let mut company = Company::create("Acme".into());
    company.kind = Some("Startup".into());
    let value = serde_json::to_value(&company).unwrap();
    assert_eq!(value["type"], "Startup");
}
