use crate::error::{TrackerError, TrackerResult};
use crate::model::{Company, Id};
use crate::store::{Change, Workspace};
use crate::validation::{self, trim_optional};

/// A submitted company form.
#[derive(Debug, Clone, Default)]
pub struct CompanyForm {
    pub name: String,
    pub location: Option<String>,
    pub state: Option<String>,
    pub stage: Option<String>,
    pub kind: Option<String>,
    pub sector: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

impl CompanyForm {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn from_company(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            location: company.location.clone(),
            state: company.state.clone(),
            stage: company.stage.clone(),
            kind: company.kind.clone(),
            sector: company.sector.clone(),
            website: company.website.clone(),
            description: company.description.clone(),
        }
    }

    fn into_company(self) -> TrackerResult<Company> {
        let mut company = Company::create(validation::non_blank(&self.name, "company name")?);
        company.location = trim_optional(self.location.as_deref());
        company.state = trim_optional(self.state.as_deref());
        company.stage = trim_optional(self.stage.as_deref());
        company.kind = trim_optional(self.kind.as_deref());
        company.sector = trim_optional(self.sector.as_deref());
        company.website = trim_optional(self.website.as_deref());
        company.description = trim_optional(self.description.as_deref());
        Ok(company)
    }
}

pub fn add_company(ws: &mut Workspace, form: CompanyForm) -> TrackerResult<Company> {
    let company = form.into_company()?;
    ensure_name_free(ws, &company.name, None)?;
    ws.commit(Change::InsertCompany {
        index: ws.companies().len(),
        company: company.clone(),
    })?;
    tracing::info!(company = %company.name, "company added");
    Ok(company)
}

pub fn update_company(ws: &mut Workspace, id: Id<Company>, form: CompanyForm) -> TrackerResult<Company> {
    let index = ws.dataset().company_index(id)?;
    let before = ws.companies()[index].clone();

    let mut after = form.into_company()?;
    after.id = before.id;
    ensure_name_free(ws, &after.name, Some(id))?;

    ws.commit(Change::ReplaceCompany {
        index,
        before,
        after: after.clone(),
    })?;
    Ok(after)
}

pub fn delete_company(ws: &mut Workspace, id: Id<Company>) -> TrackerResult<Company> {
    let index = ws.dataset().company_index(id)?;
    let company = ws.companies()[index].clone();
    ws.commit(Change::RemoveCompany {
        index,
        company: company.clone(),
    })?;
    tracing::info!(company = %company.name, "company deleted");
    Ok(company)
}

fn ensure_name_free(ws: &Workspace, name: &str, except: Option<Id<Company>>) -> TrackerResult<()> {
    let taken = ws
        .companies()
        .iter()
        .any(|c| c.matches_name(name) && Some(c.id) != except);
    if taken {
        Err(TrackerError::AlreadyExists {
            entity_type: "Company".into(),
            identifier: name.to_string(),
        })
    } else {
        Ok(())
    }
}
