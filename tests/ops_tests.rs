use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use nettrack::model::*;
use nettrack::ops::company_ops::{self, CompanyForm};
use nettrack::ops::contact_ops::{self, ContactForm};
use nettrack::ops::document_ops;
use nettrack::ops::followup_ops::{self, Completion};
use nettrack::migrate::csv_io;
use nettrack::store::{Dataset, Workspace};
use nettrack::{Settings, TrackerError};

fn setup() -> (Workspace, Settings) {
    (Workspace::in_memory(Dataset::default()), Settings::default())
}

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn lead(ws: &mut Workspace, name: &str, stage: LeadStage, last_contact: &str) -> Contact {
    let form = ContactForm {
        relationship: Relationship::lead(stage),
        last_contact: Some(last_contact.into()),
        ..ContactForm::named(name)
    };
    contact_ops::add_contact(ws, form).unwrap()
}

fn current(ws: &Workspace, id: Id<Contact>) -> Contact {
    ws.dataset().contact(id).unwrap().clone()
}

// ==========================================================================
// CONTACT OPS TESTS
// ==========================================================================

#[test]
fn add_contact_trims_name() {
    let (mut ws, _) = setup();
    let contact = contact_ops::add_contact(&mut ws, ContactForm::named("  Ana Lee  ")).unwrap();
    assert_eq!(contact.name, "Ana Lee");
    assert_eq!(ws.contacts().len(), 1);
}

#[test]
fn add_contact_rejects_blank_name() {
    let (mut ws, _) = setup();
    let result = contact_ops::add_contact(&mut ws, ContactForm::named("   "));
    assert!(matches!(result, Err(TrackerError::BlankField { .. })));
    assert!(ws.contacts().is_empty());
}

#[test]
fn add_contact_rejects_bad_last_contact() {
    let (mut ws, _) = setup();
    let form = ContactForm {
        last_contact: Some("01/02/2024".into()),
        ..ContactForm::named("Ana")
    };
    let result = contact_ops::add_contact(&mut ws, form);
    assert!(matches!(result, Err(TrackerError::InvalidDate { .. })));
    assert!(ws.contacts().is_empty());
}

#[test]
fn add_contact_rejects_level_out_of_range() {
    let (mut ws, _) = setup();
    let form = ContactForm {
        relationship_level: Some(6),
        ..ContactForm::named("Ana")
    };
    assert!(matches!(
        contact_ops::add_contact(&mut ws, form),
        Err(TrackerError::OutOfRange { .. })
    ));
}

#[test]
fn add_contact_creates_missing_company() {
    let (mut ws, _) = setup();
    let form = ContactForm {
        company: Some("Acme".into()),
        city: Some("Boston".into()),
        ..ContactForm::named("Ana")
    };
    contact_ops::add_contact(&mut ws, form).unwrap();

    assert_eq!(ws.companies().len(), 1);
    assert_eq!(ws.companies()[0].name, "Acme");
    assert_eq!(ws.companies()[0].location.as_deref(), Some("Boston"));
}

#[test]
fn add_contact_reuses_existing_company_ignoring_case() {
    let (mut ws, _) = setup();
    company_ops::add_company(&mut ws, CompanyForm::named("Acme")).unwrap();
    let form = ContactForm {
        company: Some(" ACME ".into()),
        ..ContactForm::named("Ana")
    };
    contact_ops::add_contact(&mut ws, form).unwrap();
    assert_eq!(ws.companies().len(), 1);
}

#[test]
fn undo_removes_contact_and_auto_created_company() {
    let (mut ws, _) = setup();
    let form = ContactForm {
        company: Some("Acme".into()),
        ..ContactForm::named("Ana")
    };
    contact_ops::add_contact(&mut ws, form).unwrap();
    assert!(ws.undo().unwrap());
    assert!(ws.contacts().is_empty());
    assert!(ws.companies().is_empty());
}

#[test]
fn update_contact_keeps_id_and_history() {
    let (mut ws, _) = setup();
    let ana = contact_ops::add_contact(&mut ws, ContactForm::named("Ana")).unwrap();
    contact_ops::log_interaction(&mut ws, ana.id, "Call", "intro", at(2024, 1, 5)).unwrap();

    let mut form = ContactForm::from_contact(&current(&ws, ana.id));
    form.name = "Ana Lee".into();
    form.email = Some("ana@example.com".into());
    let updated = contact_ops::update_contact(&mut ws, ana.id, form).unwrap();

    assert_eq!(updated.id, ana.id);
    assert_eq!(updated.name, "Ana Lee");
    assert_eq!(updated.history().len(), 1);
    assert_eq!(current(&ws, ana.id).email.as_deref(), Some("ana@example.com"));
}

#[test]
fn update_missing_contact_is_not_found() {
    let (mut ws, _) = setup();
    let result = contact_ops::update_contact(&mut ws, Id::generate(), ContactForm::named("Ghost"));
    assert!(matches!(result, Err(TrackerError::NotFound { .. })));
}

#[test]
fn delete_contact_removes_it() {
    let (mut ws, _) = setup();
    let ana = contact_ops::add_contact(&mut ws, ContactForm::named("Ana")).unwrap();
    contact_ops::add_contact(&mut ws, ContactForm::named("Bo")).unwrap();
    contact_ops::delete_contact(&mut ws, ana.id).unwrap();
    assert_eq!(ws.contacts().len(), 1);
    assert_eq!(ws.contacts()[0].name, "Bo");

    ws.undo().unwrap();
    assert_eq!(ws.contacts()[0].name, "Ana");
}

#[test]
fn log_interaction_appends_and_moves_last_contact_forward() {
    let (mut ws, _) = setup();
    let form = ContactForm {
        last_contact: Some("2024-03-01".into()),
        ..ContactForm::named("Ana")
    };
    let ana = contact_ops::add_contact(&mut ws, form).unwrap();

    let entry = contact_ops::log_interaction(&mut ws, ana.id, "Meeting", "coffee", at(2024, 3, 10)).unwrap();
    assert_eq!(entry.date, "2024-03-10 10:00");
    assert_eq!(current(&ws, ana.id).last_contact.as_deref(), Some("2024-03-10"));

    // An older interaction does not pull the date back.
    contact_ops::log_interaction(&mut ws, ana.id, "Email", "", at(2024, 2, 1)).unwrap();
    let ana = current(&ws, ana.id);
    assert_eq!(ana.last_contact.as_deref(), Some("2024-03-10"));
    assert_eq!(ana.history().len(), 2);
}

#[test]
fn log_interaction_requires_a_type() {
    let (mut ws, _) = setup();
    let ana = contact_ops::add_contact(&mut ws, ContactForm::named("Ana")).unwrap();
    assert!(contact_ops::log_interaction(&mut ws, ana.id, " ", "x", at(2024, 1, 1)).is_err());
}

// ==========================================================================
// COMPANY OPS TESTS
// ==========================================================================

#[test]
fn add_company_rejects_duplicate_name() {
    let (mut ws, _) = setup();
    company_ops::add_company(&mut ws, CompanyForm::named("Acme")).unwrap();
    let result = company_ops::add_company(&mut ws, CompanyForm::named("acme "));
    assert!(matches!(result, Err(TrackerError::AlreadyExists { .. })));
}

#[test]
fn update_company_can_keep_its_own_name() {
    let (mut ws, _) = setup();
    let acme = company_ops::add_company(&mut ws, CompanyForm::named("Acme")).unwrap();
    let mut form = CompanyForm::from_company(&acme);
    form.sector = Some("Technology".into());
    let updated = company_ops::update_company(&mut ws, acme.id, form).unwrap();
    assert_eq!(updated.id, acme.id);
    assert_eq!(updated.sector.as_deref(), Some("Technology"));
}

#[test]
fn rename_company_to_taken_name_fails() {
    let (mut ws, _) = setup();
    company_ops::add_company(&mut ws, CompanyForm::named("Acme")).unwrap();
    let globex = company_ops::add_company(&mut ws, CompanyForm::named("Globex")).unwrap();
    let result = company_ops::update_company(&mut ws, globex.id, CompanyForm::named("ACME"));
    assert!(matches!(result, Err(TrackerError::AlreadyExists { .. })));
}

#[test]
fn delete_company_leaves_contacts() {
    let (mut ws, _) = setup();
    let form = ContactForm {
        company: Some("Acme".into()),
        ..ContactForm::named("Ana")
    };
    contact_ops::add_contact(&mut ws, form).unwrap();
    let acme = ws.companies()[0].clone();
    company_ops::delete_company(&mut ws, acme.id).unwrap();
    assert!(ws.companies().is_empty());
    assert_eq!(ws.contacts()[0].company.as_deref(), Some("Acme"));
}

// ==========================================================================
// LEAD STAGE MACHINE TESTS
// ==========================================================================

#[test]
fn four_no_answers_from_first_outreach_end_dead() {
    let (mut ws, settings) = setup();
    let ana = lead(&mut ws, "Ana", LeadStage::FirstOutreach, "2024-01-01");

    let mut outcomes = Vec::new();
    for day in 1..=4 {
        outcomes.push(followup_ops::complete_task(&mut ws, &settings, ana.id, Response::No, at(2024, 1, day * 7)).unwrap());
    }

    assert_eq!(
        outcomes,
        vec![
            Completion::Advanced(LeadStage::FirstFollowUp),
            Completion::Advanced(LeadStage::SecondFollowUp),
            Completion::Advanced(LeadStage::ThirdFollowUp),
            Completion::MarkedDead,
        ]
    );
    let ana = current(&ws, ana.id);
    assert_eq!(ana.relationship, Relationship::DeadLead);
    assert_eq!(ana.history().len(), 4);

    let result = followup_ops::complete_task(&mut ws, &settings, ana.id, Response::No, at(2024, 2, 1));
    assert!(matches!(result, Err(TrackerError::NoFollowUp { .. })));
}

#[test]
fn three_no_answers_from_default_stage_end_dead() {
    let (mut ws, settings) = setup();
    let ana = lead(&mut ws, "Ana", LeadStage::DEFAULT, "2024-01-01");
    for day in [8, 15, 22] {
        followup_ops::complete_task(&mut ws, &settings, ana.id, Response::No, at(2024, 1, day)).unwrap();
    }
    assert_eq!(current(&ws, ana.id).relationship, Relationship::DeadLead);
}

#[test]
fn yes_converts_from_any_stage() {
    for &stage in LeadStage::ALL {
        let (mut ws, settings) = setup();
        let ana = lead(&mut ws, "Ana", stage, "2024-01-01");
        let outcome = followup_ops::complete_task(&mut ws, &settings, ana.id, Response::Yes, at(2024, 1, 9)).unwrap();
        assert_eq!(outcome, Completion::Converted);
        let ana = current(&ws, ana.id);
        assert_eq!(ana.relationship, Relationship::Professional);
        assert_eq!(ana.relationship.lead_stage(), None);
    }
}

#[test]
fn completion_records_stage_and_resets_last_contact() {
    let (mut ws, settings) = setup();
    let ana = lead(&mut ws, "Ana", LeadStage::FirstFollowUp, "2024-01-01");
    followup_ops::complete_task(&mut ws, &settings, ana.id, Response::No, at(2024, 1, 10)).unwrap();

    let ana = current(&ws, ana.id);
    let record = ana.history().last().unwrap();
    assert_eq!(record.date, "2024-01-10 10:00");
    assert_eq!(record.kind, "First Follow-up");
    assert_eq!(record.stage.as_deref(), Some("First Follow-up"));
    assert_eq!(record.note, "Completed First Follow-up scheduled for 2024-01-08");
    assert_eq!(ana.last_contact.as_deref(), Some("2024-01-10"));
    assert_eq!(ana.relationship, Relationship::lead(LeadStage::SecondFollowUp));
}

#[test]
fn cancel_changes_nothing() {
    let (mut ws, settings) = setup();
    let ana = lead(&mut ws, "Ana", LeadStage::SecondFollowUp, "2024-01-01");
    let before = current(&ws, ana.id);

    let outcome = followup_ops::complete_task(&mut ws, &settings, ana.id, Response::Cancel, at(2024, 1, 20)).unwrap();
    assert_eq!(outcome, Completion::Cancelled);
    assert_eq!(current(&ws, ana.id), before);

    // Only the add is undoable.
    assert!(ws.undo().unwrap());
    assert!(ws.contacts().is_empty());
}

#[test]
fn completion_can_be_undone() {
    let (mut ws, settings) = setup();
    let ana = lead(&mut ws, "Ana", LeadStage::FirstFollowUp, "2024-01-01");
    let before = current(&ws, ana.id);
    followup_ops::complete_task(&mut ws, &settings, ana.id, Response::Yes, at(2024, 1, 9)).unwrap();
    ws.undo().unwrap();
    assert_eq!(current(&ws, ana.id), before);
}

#[test]
fn maintenance_completion_logs_check_in() {
    let (mut ws, settings) = setup();
    let form = ContactForm {
        relationship: Relationship::Professional,
        last_contact: Some("2024-01-01".into()),
        ..ContactForm::named("Bo")
    };
    let bo = contact_ops::add_contact(&mut ws, form).unwrap();

    let outcome = followup_ops::complete_task(&mut ws, &settings, bo.id, Response::Yes, at(2024, 4, 30)).unwrap();
    assert_eq!(outcome, Completion::CheckedIn);
    let bo = current(&ws, bo.id);
    assert_eq!(bo.relationship, Relationship::Professional);
    assert_eq!(bo.history().last().unwrap().kind, MAINTENANCE_KIND);
    assert_eq!(bo.last_contact.as_deref(), Some("2024-04-30"));
}

#[test]
fn passive_contact_has_no_task_to_complete() {
    let (mut ws, settings) = setup();
    let form = ContactForm {
        last_contact: Some("2024-01-01".into()),
        ..ContactForm::named("Cy")
    };
    let cy = contact_ops::add_contact(&mut ws, form).unwrap();
    let result = followup_ops::complete_task(&mut ws, &settings, cy.id, Response::Yes, at(2024, 1, 9));
    assert!(matches!(result, Err(TrackerError::NoFollowUp { .. })));
}

// ==========================================================================
// IMPORT TESTS
// ==========================================================================

#[test]
fn csv_import_is_one_undoable_batch() {
    let (mut ws, _) = setup();
    let data = "name,company,tags\nAna,Acme,\"VC, Banking\"\nBo,,\n";
    let forms = csv_io::import_contacts(data.as_bytes()).unwrap();
    let added = contact_ops::import_contacts(&mut ws, forms).unwrap();

    assert_eq!(added, 2);
    assert_eq!(ws.companies().len(), 1);
    assert_eq!(ws.contacts()[0].tags, vec!["VC", "Banking"]);

    assert!(ws.undo().unwrap());
    assert!(ws.contacts().is_empty());
    assert!(ws.companies().is_empty());
}

#[test]
fn csv_import_with_bad_row_adds_nothing() {
    let (mut ws, _) = setup();
    let data = "name,email\nAna,a@x.com\n,b@x.com\n";
    assert!(csv_io::import_contacts(data.as_bytes()).is_err());

    let forms = vec![ContactForm::named("Ana"), ContactForm::named(" ")];
    assert!(contact_ops::import_contacts(&mut ws, forms).is_err());
    assert!(ws.contacts().is_empty());
    assert!(!ws.can_undo());
}

#[test]
fn csv_export_then_import_keeps_contacts() {
    let (mut ws, _) = setup();
    let form = ContactForm {
        email: Some("ana@example.com".into()),
        tags: vec!["VC".into()],
        ..ContactForm::named("Ana")
    };
    contact_ops::add_contact(&mut ws, form).unwrap();

    let mut buf = Vec::new();
    csv_io::export_contacts(ws.contacts(), &mut buf).unwrap();
    let forms = csv_io::import_contacts(buf.as_slice()).unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].name, "Ana");
    assert_eq!(forms[0].email.as_deref(), Some("ana@example.com"));
    assert_eq!(forms[0].tags, vec!["VC"]);
}

// ==========================================================================
// DOCUMENT OPS TESTS
// ==========================================================================

#[test]
fn attach_list_and_remove_documents() {
    let dir = tempfile::tempdir().unwrap();
    let docs_root = dir.path().join("docs");
    let source = dir.path().join("resume.pdf");
    fs::write(&source, b"pdf").unwrap();
    let ana = Contact::create("Ana Lee".into());

    assert!(document_ops::list_documents(&docs_root, &ana).unwrap().is_empty());

    let stored = document_ops::attach_document(&docs_root, &ana, &source).unwrap();
    assert_eq!(stored, docs_root.join("Ana_Lee").join("resume.pdf"));
    assert_eq!(fs::read(&stored).unwrap(), b"pdf");
    assert_eq!(document_ops::list_documents(&docs_root, &ana).unwrap(), vec!["resume.pdf"]);

    document_ops::remove_document(&docs_root, &ana, "resume.pdf").unwrap();
    assert!(document_ops::list_documents(&docs_root, &ana).unwrap().is_empty());
}

#[test]
fn attach_missing_source_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let docs_root = dir.path().join("docs");
    let ana = Contact::create("Ana".into());

    let result = document_ops::attach_document(&docs_root, &ana, &dir.path().join("nope.txt"));
    assert!(matches!(result, Err(TrackerError::Io(_))));
    let dir_entries = fs::read_dir(document_ops::documents_dir(&docs_root, &ana)).unwrap().count();
    assert_eq!(dir_entries, 0);
}

#[test]
fn remove_rejects_paths() {
    let dir = tempfile::tempdir().unwrap();
    let ana = Contact::create("Ana".into());
    let result = document_ops::remove_document(dir.path(), &ana, "../contacts.json");
    assert!(matches!(result, Err(TrackerError::InvalidFileName(_))));
}
