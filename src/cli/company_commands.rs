use crate::cli::context::{parse_filters, CLIContext};
use crate::model::*;
use crate::ops::company_ops::{self, CompanyForm};
use crate::queries::company_queries::{self, CompanyFilter};

pub fn list(ctx: &CLIContext, args: &str) {
    let (filters, _) = parse_filters(args);
    let mut filter = CompanyFilter::default();
    for (key, value) in filters {
        match key.as_str() {
            "state" => filter.state = Some(value),
            "sector" => filter.sector = Some(value),
            "type" => filter.kind = Some(value),
            "stage" => filter.stage = Some(value),
            other => {
                println!("Unknown filter '{}'.", other);
                return;
            }
        }
    }

    let companies = company_queries::filter_companies(ctx.ws.companies(), &filter);
    if companies.is_empty() {
        if ctx.ws.companies().is_empty() {
            println!("No companies yet. Use 'add-company' to add one.");
        } else {
            println!("No companies match.");
        }
        return;
    }

    println!("Companies ({}):", companies.len());
    println!();
    for company in companies {
        let stats = company_queries::stats_for(company, ctx.ws.contacts());
        let details: Vec<&str> = [company.kind.as_deref(), company.sector.as_deref(), company.state.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        let details = if details.is_empty() {
            String::new()
        } else {
            format!(" ({})", details.join(", "))
        };
        println!(
            "  {}{} - {} contact(s), {} lead(s), {} professional",
            company.name, details, stats.contacts, stats.leads, stats.professionals
        );
    }
}

pub fn add(ctx: &mut CLIContext, args: &str) {
    let name = if !args.is_empty() {
        args.to_string()
    } else {
        match ctx.prompt("Company name (required): ") {
            Some(s) if s.is_empty() => {
                println!("Name is required.");
                return;
            }
            Some(s) => s,
            None => return,
        }
    };

    let mut form = CompanyForm::named(&name);
    if fill_form(ctx, &mut form).is_none() {
        return;
    }

    match company_ops::add_company(&mut ctx.ws, form) {
        Ok(c) => println!("Added company {}.", c.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn show(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: show-company <name>");
        return;
    }
    let company = match ctx.find_company(args) {
        Some(c) => c,
        None => return,
    };

    println!();
    println!("  {}", company.name);
    let fields = [
        ("Location", company.location.as_deref()),
        ("State", company.state.as_deref()),
        ("Stage", company.stage.as_deref()),
        ("Type", company.kind.as_deref()),
        ("Sector", company.sector.as_deref()),
        ("Website", company.website.as_deref()),
        ("Description", company.description.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(v) = value {
            println!("  {}: {}", label, v);
        }
    }

    let stats = company_queries::stats_for(&company, ctx.ws.contacts());
    println!(
        "  Contacts: {} ({} lead(s), {} professional)",
        stats.contacts, stats.leads, stats.professionals
    );
    for contact in company_queries::members(&company, ctx.ws.contacts()) {
        println!("    {} ({})", contact.name, contact.relationship.label());
    }
    println!();
}

pub fn edit(ctx: &mut CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: edit-company <name>");
        return;
    }
    let company = match ctx.find_company(args) {
        Some(c) => c,
        None => return,
    };

    println!("Editing {} (Enter keeps the current value, '-' clears it)", company.name);
    let mut form = CompanyForm::from_company(&company);
    match ctx.prompt_edit("Name", Some(form.name.as_str())) {
        Some(Some(name)) => form.name = name,
        Some(None) => {
            println!("Name is required.");
            return;
        }
        None => return,
    }
    if fill_form(ctx, &mut form).is_none() {
        return;
    }

    match company_ops::update_company(&mut ctx.ws, company.id, form) {
        Ok(c) => println!("Saved {}.", c.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn delete(ctx: &mut CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: delete-company <name>");
        return;
    }
    let company = match ctx.find_company(args) {
        Some(c) => c,
        None => return,
    };
    let stats = company_queries::stats_for(&company, ctx.ws.contacts());
    if stats.contacts > 0 {
        println!("{} contact(s) still name this company; they keep the name.", stats.contacts);
    }
    if !ctx.confirm(&format!("Delete {}?", company.name)) {
        println!("Cancelled.");
        return;
    }
    match company_ops::delete_company(&mut ctx.ws, company.id) {
        Ok(c) => println!("Deleted {}. Use 'undo' to restore.", c.name),
        Err(e) => ctx.print_error(&e),
    }
}

/// Prompts for every field but the name. None on EOF.
fn fill_form(ctx: &CLIContext, form: &mut CompanyForm) -> Option<()> {
    form.location = ctx.prompt_edit("Location", form.location.as_deref())?;
    form.state = ctx.prompt_edit("State", form.state.as_deref())?;
    form.stage = pick(ctx, "Stage", COMPANY_STAGES, form.stage.as_deref())?;
    form.kind = pick(ctx, "Type", COMPANY_TYPES, form.kind.as_deref())?;
    form.sector = pick(ctx, "Sector", COMPANY_SECTORS, form.sector.as_deref())?;
    form.website = ctx.prompt_edit("Website", form.website.as_deref())?;
    form.description = ctx.prompt_edit("Description", form.description.as_deref())?;
    Some(())
}

/// Numbered choice from `options`; free text is accepted as-is.
fn pick(ctx: &CLIContext, label: &str, options: &[&str], current: Option<&str>) -> Option<Option<String>> {
    let menu: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("{}={}", i + 1, o))
        .collect();
    println!("  {}", menu.join("  "));
    let value = ctx.prompt_edit(label, current)?;
    Some(value.map(|v| match v.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => options[n - 1].to_string(),
        _ => v,
    }))
}
