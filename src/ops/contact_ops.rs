use chrono::NaiveDateTime;

use crate::error::TrackerResult;
use crate::model::{Company, Contact, Id, Interaction, Relationship};
use crate::store::{Change, Dataset, Workspace};
use crate::validation::{self, trim_optional};

/// A submitted contact form. Also the shape of one imported CSV row.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub career: Option<String>,
    pub role: Option<String>,
    pub relationship: Relationship,
    pub relationship_level: Option<u8>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub how_met: Option<String>,
    pub birthday: Option<String>,
    pub last_contact: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

impl ContactForm {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Pre-fills a form from an existing record, for editing.
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            company: contact.company.clone(),
            job_title: contact.job_title.clone(),
            career: contact.career.clone(),
            role: contact.role.clone(),
            relationship: contact.relationship,
            relationship_level: contact.relationship_level,
            state: contact.state.clone(),
            city: contact.city.clone(),
            location: contact.location.clone(),
            linkedin: contact.linkedin.clone(),
            website: contact.website.clone(),
            how_met: contact.how_met.clone(),
            birthday: contact.birthday.clone(),
            last_contact: contact.last_contact.clone(),
            tags: contact.tags.clone(),
            notes: contact.notes.clone(),
        }
    }

    /// Validates the form and builds a fresh record from it.
    pub fn into_contact(self) -> TrackerResult<Contact> {
        let mut contact = Contact::create(validation::non_blank(&self.name, "name")?);
        contact.last_contact = validation::optional_date(self.last_contact.as_deref(), "last_contact")?;
        contact.relationship_level = match self.relationship_level {
            Some(level) => Some(validation::in_range(i64::from(level), 1, 5, "relationship_level")? as u8),
            None => None,
        };
        contact.email = trim_optional(self.email.as_deref());
        contact.phone = trim_optional(self.phone.as_deref());
        contact.company = trim_optional(self.company.as_deref());
        contact.job_title = trim_optional(self.job_title.as_deref());
        contact.career = trim_optional(self.career.as_deref());
        contact.role = trim_optional(self.role.as_deref());
        contact.relationship = self.relationship;
        contact.state = trim_optional(self.state.as_deref());
        contact.city = trim_optional(self.city.as_deref());
        contact.location = trim_optional(self.location.as_deref());
        contact.linkedin = trim_optional(self.linkedin.as_deref());
        contact.website = trim_optional(self.website.as_deref());
        contact.how_met = trim_optional(self.how_met.as_deref());
        contact.birthday = trim_optional(self.birthday.as_deref());
        contact.tags = self
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        contact.notes = trim_optional(self.notes.as_deref());
        Ok(contact)
    }
}

pub fn add_contact(ws: &mut Workspace, form: ContactForm) -> TrackerResult<Contact> {
    let contact = form.into_contact()?;
    let mut changes = Vec::new();
    if let Some(company) = missing_company(ws.dataset(), &contact) {
        changes.push(Change::InsertCompany {
            index: ws.companies().len(),
            company,
        });
    }
    changes.push(Change::InsertContact {
        index: ws.contacts().len(),
        contact: Box::new(contact.clone()),
    });
    ws.commit(batch(changes))?;
    tracing::info!(contact = %contact.name, "contact added");
    Ok(contact)
}

/// Replaces every editable field of a contact with the form's values.
/// The id and interaction history carry over.
pub fn update_contact(ws: &mut Workspace, id: Id<Contact>, form: ContactForm) -> TrackerResult<Contact> {
    let index = ws.dataset().contact_index(id)?;
    let before = ws.contacts()[index].clone();

    let mut after = form.into_contact()?;
    after.id = before.id;
    after.inherit_history(&before);

    let mut changes = Vec::new();
    if let Some(company) = missing_company(ws.dataset(), &after) {
        changes.push(Change::InsertCompany {
            index: ws.companies().len(),
            company,
        });
    }
    changes.push(Change::ReplaceContact {
        index,
        before: Box::new(before),
        after: Box::new(after.clone()),
    });
    ws.commit(batch(changes))?;
    Ok(after)
}

pub fn delete_contact(ws: &mut Workspace, id: Id<Contact>) -> TrackerResult<Contact> {
    let index = ws.dataset().contact_index(id)?;
    let contact = ws.contacts()[index].clone();
    ws.commit(Change::RemoveContact {
        index,
        contact: Box::new(contact.clone()),
    })?;
    tracing::info!(contact = %contact.name, "contact deleted");
    Ok(contact)
}

/// Appends a manually logged interaction and moves the last-contact date
/// to the day it happened.
pub fn log_interaction(
    ws: &mut Workspace,
    id: Id<Contact>,
    kind: &str,
    note: &str,
    at: NaiveDateTime,
) -> TrackerResult<Interaction> {
    let kind = validation::non_blank(kind, "type")?;
    let index = ws.dataset().contact_index(id)?;
    let before = ws.contacts()[index].clone();

    let interaction = Interaction::logged(at, kind, note.trim().to_string());
    let mut after = before.clone();
    after.record(interaction.clone());
    let day = at.date();
    if before.last_contact_date().map_or(true, |last| day >= last) {
        after.last_contact = Some(day.format(validation::DATE_FORMAT).to_string());
    }

    ws.commit(Change::ReplaceContact {
        index,
        before: Box::new(before),
        after: Box::new(after),
    })?;
    Ok(interaction)
}

/// Adds every imported contact as a single undoable step. Any invalid row
/// aborts the whole import.
pub fn import_contacts(ws: &mut Workspace, forms: Vec<ContactForm>) -> TrackerResult<usize> {
    let mut staged = ws.dataset().clone();
    let mut changes = Vec::new();

    for form in forms {
        let contact = form.into_contact()?;
        if let Some(company) = missing_company(&staged, &contact) {
            let change = Change::InsertCompany {
                index: staged.companies.len(),
                company,
            };
            change.apply(&mut staged)?;
            changes.push(change);
        }
        let change = Change::InsertContact {
            index: staged.contacts.len(),
            contact: Box::new(contact),
        };
        change.apply(&mut staged)?;
        changes.push(change);
    }

    let added = changes
        .iter()
        .filter(|c| matches!(c, Change::InsertContact { .. }))
        .count();
    if added > 0 {
        ws.commit(Change::Batch(changes))?;
    }
    tracing::info!(added, "contacts imported");
    Ok(added)
}

/// A company record to create when the contact names an unknown company.
fn missing_company(dataset: &Dataset, contact: &Contact) -> Option<Company> {
    let name = contact.company.as_deref()?;
    if dataset.company_named(name).is_some() {
        return None;
    }
    let mut company = Company::create(name.to_string());
    company.location = contact.place().map(str::to_string);
    Some(company)
}

fn batch(mut changes: Vec<Change>) -> Change {
    if changes.len() == 1 {
        changes.remove(0)
    } else {
        Change::Batch(changes)
    }
}
