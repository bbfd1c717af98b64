use crate::model::{Company, Contact, Relationship};

/// Derived counts for one company. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanyStats {
    pub contacts: usize,
    pub leads: usize,
    pub professionals: usize,
}

/// Criteria for narrowing the company list. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    pub state: Option<String>,
    pub sector: Option<String>,
    pub kind: Option<String>,
    pub stage: Option<String>,
}

pub fn stats_for(company: &Company, contacts: &[Contact]) -> CompanyStats {
    contacts
        .iter()
        .filter(|c| c.company.as_deref().map_or(false, |name| company.matches_name(name)))
        .fold(CompanyStats::default(), |mut stats, contact| {
            stats.contacts += 1;
            match contact.relationship {
                Relationship::Lead { .. } => stats.leads += 1,
                Relationship::Professional => stats.professionals += 1,
                _ => {}
            }
            stats
        })
}

pub fn filter_companies<'a>(companies: &'a [Company], filter: &CompanyFilter) -> Vec<&'a Company> {
    companies
        .iter()
        .filter(|c| matches(c.state.as_deref(), filter.state.as_deref()))
        .filter(|c| matches(c.sector.as_deref(), filter.sector.as_deref()))
        .filter(|c| matches(c.kind.as_deref(), filter.kind.as_deref()))
        .filter(|c| matches(c.stage.as_deref(), filter.stage.as_deref()))
        .collect()
}

/// Companies whose name contains `query`, ignoring case; an exact match
/// wins outright.
pub fn find_by_name<'a>(companies: &'a [Company], query: &str) -> Vec<&'a Company> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    if let Some(exact) = companies.iter().find(|c| c.matches_name(query)) {
        return vec![exact];
    }
    let lower = query.to_lowercase();
    companies
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&lower))
        .collect()
}

/// Contacts working at `company`.
pub fn members<'a>(company: &Company, contacts: &'a [Contact]) -> Vec<&'a Contact> {
    contacts
        .iter()
        .filter(|c| c.company.as_deref().map_or(false, |name| company.matches_name(name)))
        .collect()
}

fn matches(value: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(w) => value.map_or(false, |v| v.trim().eq_ignore_ascii_case(w.trim())),
    }
}
