use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::model::Contact;
use crate::ops::contact_ops::ContactForm;
use crate::validation;

/// Column order for exported files. Imports match columns by name.
pub const CSV_HEADER: &[&str] = &[
    "name", "email", "phone", "company", "role", "tags", "linkedin", "website", "how_met",
    "notes", "location", "birthday",
];

#[derive(Debug, Default, Serialize, Deserialize)]
struct CsvRow {
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    linkedin: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    how_met: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    birthday: Option<String>,
}

impl From<&Contact> for CsvRow {
    fn from(c: &Contact) -> Self {
        CsvRow {
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            company: c.company.clone(),
            role: c.role.clone(),
            tags: Some(c.tags.join(", ")),
            linkedin: c.linkedin.clone(),
            website: c.website.clone(),
            how_met: c.how_met.clone(),
            notes: c.notes.clone(),
            location: c.location.clone(),
            birthday: c.birthday.clone(),
        }
    }
}

impl From<CsvRow> for ContactForm {
    fn from(row: CsvRow) -> Self {
        ContactForm {
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            role: row.role,
            tags: row.tags.as_deref().map(validation::split_tags).unwrap_or_default(),
            linkedin: row.linkedin,
            website: row.website,
            how_met: row.how_met,
            notes: row.notes,
            location: row.location,
            birthday: row.birthday,
            ..ContactForm::default()
        }
    }
}

/// Writes contacts as CSV under [`CSV_HEADER`]. Returns the row count.
pub fn export_contacts<W: Write>(contacts: &[Contact], out: W) -> TrackerResult<usize> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for contact in contacts {
        writer.serialize(CsvRow::from(contact))?;
    }
    writer.flush()?;
    Ok(contacts.len())
}

pub fn export_to_path(contacts: &[Contact], path: &Path) -> TrackerResult<usize> {
    let file = std::fs::File::create(path)?;
    let count = export_contacts(contacts, file)?;
    tracing::info!(path = %path.display(), count, "contacts exported");
    Ok(count)
}

/// Reads CSV rows into contact forms. A `name` column is required and every
/// row must have a non-blank name; the first bad row fails the whole read.
pub fn import_contacts<R: Read>(input: R) -> TrackerResult<Vec<ContactForm>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);

    let has_name = reader.headers()?.iter().any(|h| h == "name");
    if !has_name {
        return Err(TrackerError::Other("CSV file has no 'name' column".into()));
    }

    let mut forms = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        // Line 1 is the header.
        validation::non_blank(&row.name, &format!("name on line {}", i + 2))?;
        forms.push(ContactForm::from(row));
    }
    Ok(forms)
}

pub fn import_from_path(path: &Path) -> TrackerResult<Vec<ContactForm>> {
    let file = std::fs::File::open(path)?;
    import_contacts(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_fixed_header_even_when_empty() {
        let mut buf = Vec::new();
        export_contacts(&[], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap().trim_end(),
            "name,email,phone,company,role,tags,linkedin,website,how_met,notes,location,birthday"
        );
    }

    #[test]
    fn import_tolerates_missing_columns() {
        let data = "name,email\nAna,ana@example.com\nBo,\n";
        let forms = import_contacts(data.as_bytes()).unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].email.as_deref(), Some("ana@example.com"));
        assert_eq!(forms[1].email, None);
    }

    #[test]
    fn import_splits_tags() {
        let data = "name,tags\nAna,\"VC, Banking\"\n";
        let forms = import_contacts(data.as_bytes()).unwrap();
        assert_eq!(forms[0].tags, vec!["VC", "Banking"]);
    }

    #[test]
    fn import_requires_name_column() {
        let data = "email\nana@example.com\n";
        assert!(import_contacts(data.as_bytes()).is_err());
    }

    #[test]
    fn import_rejects_blank_name() {
        let data = "name,email\nAna,a@x.com\n ,b@x.com\n";
        let err = import_contacts(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }
}
