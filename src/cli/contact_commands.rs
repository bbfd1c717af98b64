use std::path::Path;

use crate::cli::context::{parse_filters, CLIContext};
use crate::migrate::csv_io;
use crate::model::*;
use crate::ops::contact_ops::{self, ContactForm};
use crate::ops::document_ops;
use crate::queries::contact_queries::{self, ContactFilter, SortOrder};
use crate::queries::followup_queries::{self, FollowUpStatus};
use crate::validation;

pub fn list(ctx: &CLIContext, args: &str) {
    let (filters, text) = parse_filters(args);
    let mut filter = ContactFilter::default();
    let mut order = SortOrder::Name;
    if !text.is_empty() {
        filter.text = Some(text);
    }
    for (key, value) in filters {
        match key.as_str() {
            "tag" => filter.tag = Some(value),
            "company" => filter.company = Some(value),
            "state" => filter.state = Some(value),
            "career" => filter.career = Some(value),
            "type" => match parse_type(&value) {
                Some(t) => filter.relationship_type = Some(t),
                None => {
                    println!("Unknown type '{}'. Use lead, professional, passive or dead.", value);
                    return;
                }
            },
            "status" => match parse_status(&value) {
                Some(s) => filter.status = Some(s),
                None => {
                    println!("Unknown status '{}'. Use overdue, upcoming or done.", value);
                    return;
                }
            },
            "sort" => match value.to_lowercase().as_str() {
                "name" => order = SortOrder::Name,
                "recent" => order = SortOrder::RecentContact,
                "followup" | "next" => order = SortOrder::NextFollowUp,
                _ => {
                    println!("Unknown sort '{}'. Use name, recent or followup.", value);
                    return;
                }
            },
            other => {
                println!("Unknown filter '{}'.", other);
                return;
            }
        }
    }

    let today = CLIContext::today();
    let mut contacts = contact_queries::filter_contacts(ctx.ws.contacts(), &filter, &ctx.settings, today);
    if contacts.is_empty() {
        if ctx.ws.contacts().is_empty() {
            println!("No contacts yet. Use 'add' to add someone.");
        } else {
            println!("No contacts match.");
        }
        return;
    }
    contact_queries::sort_contacts(&mut contacts, order, &ctx.settings, today);

    println!("Contacts ({}):", contacts.len());
    println!();
    for contact in contacts {
        print_summary_line(ctx, contact);
    }
}

pub fn add(ctx: &mut CLIContext, args: &str) {
    println!("Adding a new contact (press Enter to skip optional fields, 's' to save now)");
    println!();

    let name = if !args.is_empty() {
        args.to_string()
    } else {
        match ctx.prompt("Name (required): ") {
            Some(s) if s.is_empty() => {
                println!("Name is required.");
                return;
            }
            Some(s) => s,
            None => return,
        }
    };

    let mut form = ContactForm::named(&name);
    fill_new_form(ctx, &mut form);

    match contact_ops::add_contact(&mut ctx.ws, form) {
        Ok(c) => println!("Added {} ({})", c.name, c.relationship.label()),
        Err(e) => ctx.print_error(&e),
    }
}

/// Optional prompts for a new contact. Returns early, keeping what was
/// entered, when the user types 's'.
fn fill_new_form(ctx: &CLIContext, form: &mut ContactForm) {
    macro_rules! prompt_or_save {
        ($prompt:expr) => {
            match ctx.prompt($prompt) {
                Some(s) if s.eq_ignore_ascii_case("s") => return,
                Some(s) if s.is_empty() => None,
                Some(s) => Some(s),
                None => return,
            }
        };
    }

    form.email = prompt_or_save!("Email: ");
    form.phone = prompt_or_save!("Phone: ");
    form.company = prompt_or_save!("Company: ");
    form.job_title = prompt_or_save!("Job title: ");
    form.career = prompt_or_save!("Career: ");
    form.city = prompt_or_save!("City: ");
    form.state = prompt_or_save!("State: ");

    match pick_relationship(ctx, form.relationship) {
        Some(rel) => form.relationship = rel,
        None => return,
    }

    if let Some(level) = prompt_or_save!("Relationship level (1-5): ") {
        match level.parse::<u8>() {
            Ok(n) => form.relationship_level = Some(n),
            Err(_) => println!("Not a number, skipping."),
        }
    }
    if let Some(tags) = prompt_or_save!("Tags (comma separated): ") {
        form.tags = validation::split_tags(&tags);
    }
    form.last_contact = prompt_or_save!("Last contact (YYYY-MM-DD): ");
    form.how_met = prompt_or_save!("How did you meet: ");
    form.notes = prompt_or_save!("Notes: ");
}

pub fn show(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: show <name>");
        return;
    }
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };

    println!();
    println!("  {}", contact.name);
    println!("  {}", "-".repeat(contact.name.len().max(8)));
    println!("  Classification: {}", contact.relationship.label());

    let fields: [(&str, Option<&str>); 13] = [
        ("Email", contact.email.as_deref()),
        ("Phone", contact.phone.as_deref()),
        ("Company", contact.company.as_deref()),
        ("Job title", contact.job_title.as_deref()),
        ("Career", contact.career.as_deref()),
        ("Role", contact.role.as_deref()),
        ("City", contact.city.as_deref()),
        ("State", contact.state.as_deref()),
        ("Location", contact.location.as_deref()),
        ("LinkedIn", contact.linkedin.as_deref()),
        ("Website", contact.website.as_deref()),
        ("How met", contact.how_met.as_deref()),
        ("Birthday", contact.birthday.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(v) = value {
            println!("  {}: {}", label, v);
        }
    }
    if let Some(level) = contact.relationship_level {
        println!("  Level: {}/5", level);
    }
    if !contact.tags.is_empty() {
        println!("  Tags: {}", contact.tags.join(", "));
    }

    let today = CLIContext::today();
    match (contact.last_contact.as_deref(), contact.last_contact_date()) {
        (_, Some(date)) => println!(
            "  Last contact: {} ({})",
            date,
            CLIContext::format_days_ago((today - date).num_days())
        ),
        (Some(raw), None) => println!("  Last contact: {} (unreadable)", raw),
        (None, None) => println!("  Last contact: never"),
    }
    if let Some(f) = followup_queries::follow_up_for(&contact, &ctx.settings, today) {
        println!(
            "  Next: {} due {} [{}]",
            f.kind.display_name(),
            f.due_date,
            f.status.display_name()
        );
    }
    if let Some(notes) = &contact.notes {
        println!("  Notes: {}", notes);
    }

    let history = contact.history();
    if !history.is_empty() {
        println!();
        println!("  History ({}):", history.len());
        for entry in history.iter().rev().take(10) {
            if entry.note.is_empty() {
                println!("    {} {}", entry.date, entry.kind);
            } else {
                println!("    {} {}: {}", entry.date, entry.kind, entry.note);
            }
        }
        if history.len() > 10 {
            println!("    ... and {} older", history.len() - 10);
        }
    }
    println!();
}

pub fn edit(ctx: &mut CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: edit <name>");
        return;
    }
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };

    println!("Editing {} (Enter keeps the current value, '-' clears it)", contact.name);
    let mut form = ContactForm::from_contact(&contact);

    macro_rules! edit_field {
        ($label:expr, $field:expr) => {
            match ctx.prompt_edit($label, $field.as_deref()) {
                Some(v) => $field = v,
                None => return,
            }
        };
    }

    match ctx.prompt_edit("Name", Some(form.name.as_str())) {
        Some(Some(name)) => form.name = name,
        Some(None) => {
            println!("Name is required.");
            return;
        }
        None => return,
    }
    edit_field!("Email", form.email);
    edit_field!("Phone", form.phone);
    edit_field!("Company", form.company);
    edit_field!("Job title", form.job_title);
    edit_field!("Career", form.career);
    edit_field!("Role", form.role);
    edit_field!("City", form.city);
    edit_field!("State", form.state);
    edit_field!("Location", form.location);
    edit_field!("LinkedIn", form.linkedin);
    edit_field!("Website", form.website);
    edit_field!("How met", form.how_met);
    edit_field!("Birthday", form.birthday);
    edit_field!("Last contact", form.last_contact);
    edit_field!("Notes", form.notes);

    let level = form.relationship_level.map(|l| l.to_string());
    match ctx.prompt_edit("Level (1-5)", level.as_deref()) {
        Some(Some(v)) => match v.parse::<u8>() {
            Ok(n) => form.relationship_level = Some(n),
            Err(_) => println!("Not a number, keeping {:?}.", form.relationship_level),
        },
        Some(None) => form.relationship_level = None,
        None => return,
    }

    let tags = (!form.tags.is_empty()).then(|| form.tags.join(", "));
    match ctx.prompt_edit("Tags", tags.as_deref()) {
        Some(v) => form.tags = v.as_deref().map(validation::split_tags).unwrap_or_default(),
        None => return,
    }

    match pick_relationship(ctx, form.relationship) {
        Some(rel) => form.relationship = rel,
        None => return,
    }

    match contact_ops::update_contact(&mut ctx.ws, contact.id, form) {
        Ok(c) => println!("Saved {}.", c.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn delete(ctx: &mut CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: delete <name>");
        return;
    }
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };
    if !ctx.confirm(&format!("Delete {}?", contact.name)) {
        println!("Cancelled.");
        return;
    }
    match contact_ops::delete_contact(&mut ctx.ws, contact.id) {
        Ok(c) => println!("Deleted {}. Use 'undo' to restore.", c.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn log(ctx: &mut CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: log <name>");
        return;
    }
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };

    println!("Interaction type:");
    for (i, kind) in INTERACTION_KINDS.iter().enumerate() {
        println!("  {}. {}", i + 1, kind);
    }
    let kind = match ctx.prompt("Choice or type name [1]: ") {
        Some(s) if s.is_empty() => INTERACTION_KINDS[0].to_string(),
        Some(s) => match s.parse::<usize>() {
            Ok(n) if (1..=INTERACTION_KINDS.len()).contains(&n) => INTERACTION_KINDS[n - 1].to_string(),
            _ => s,
        },
        None => return,
    };
    let note = match ctx.prompt("Note: ") {
        Some(s) => s,
        None => return,
    };

    match contact_ops::log_interaction(&mut ctx.ws, contact.id, &kind, &note, CLIContext::now()) {
        Ok(entry) => println!("Logged {} with {} at {}.", entry.kind, contact.name, entry.date),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn find(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: find <query>");
        return;
    }
    let filter = ContactFilter {
        text: Some(args.to_string()),
        ..ContactFilter::default()
    };
    let found = contact_queries::filter_contacts(ctx.ws.contacts(), &filter, &ctx.settings, CLIContext::today());
    if found.is_empty() {
        println!("No matches for '{}'.", args);
        return;
    }
    for contact in found {
        print_summary_line(ctx, contact);
    }
}

pub fn tags(ctx: &CLIContext) {
    let tags = contact_queries::all_tags(ctx.ws.contacts());
    if tags.is_empty() {
        println!("No tags in use.");
        return;
    }
    for tag in tags {
        let count = ctx.ws.contacts().iter().filter(|c| c.has_tag(&tag)).count();
        println!("  {} ({})", tag, count);
    }
}

pub fn docs(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: docs <name>");
        return;
    }
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };
    match document_ops::list_documents(&ctx.docs_root, &contact) {
        Ok(names) if names.is_empty() => println!("No documents for {}.", contact.name),
        Ok(names) => {
            println!("Documents for {}:", contact.name);
            for name in names {
                println!("  {}", name);
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}

pub fn attach(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: attach <name>");
        return;
    }
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };
    let source = match ctx.prompt("File to attach: ") {
        Some(s) if !s.is_empty() => s,
        _ => return,
    };
    match document_ops::attach_document(&ctx.docs_root, &contact, Path::new(&source)) {
        Ok(path) => println!("Attached {}.", path.display()),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn detach(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: detach <name>");
        return;
    }
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };
    let names = match document_ops::list_documents(&ctx.docs_root, &contact) {
        Ok(names) => names,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    if names.is_empty() {
        println!("No documents for {}.", contact.name);
        return;
    }
    for (i, name) in names.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    let file_name = match ctx.prompt("Remove which file? ") {
        Some(s) => match s.parse::<usize>() {
            Ok(n) if (1..=names.len()).contains(&n) => names[n - 1].clone(),
            _ => s,
        },
        None => return,
    };
    if file_name.is_empty() {
        return;
    }
    match document_ops::remove_document(&ctx.docs_root, &contact, &file_name) {
        Ok(()) => println!("Removed {}.", file_name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn import(ctx: &mut CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: import <file.csv>");
        return;
    }
    let result = csv_io::import_from_path(Path::new(args))
        .and_then(|forms| contact_ops::import_contacts(&mut ctx.ws, forms));
    match result {
        Ok(n) => println!("Imported {} contact(s).", n),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn export(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: export <file.csv>");
        return;
    }
    match csv_io::export_to_path(ctx.ws.contacts(), Path::new(args)) {
        Ok(n) => println!("Exported {} contact(s) to {}.", n, args),
        Err(e) => ctx.print_error(&e),
    }
}

fn print_summary_line(ctx: &CLIContext, contact: &Contact) {
    let today = CLIContext::today();
    let company = contact
        .company
        .as_deref()
        .map(|c| format!(" @ {}", c))
        .unwrap_or_default();
    let last = contact
        .last_contact_date()
        .map(|d| format!(" - last contact: {}", CLIContext::format_days_ago((today - d).num_days())))
        .unwrap_or_default();
    let due = followup_queries::follow_up_for(contact, &ctx.settings, today)
        .filter(|f| f.status != FollowUpStatus::Done)
        .map(|f| format!(" [{}]", f.status.display_name()))
        .unwrap_or_default();
    println!(
        "  {}{} ({}){}{}",
        contact.name,
        company,
        contact.relationship.label(),
        last,
        due
    );
}

/// Numbered classification menu. Enter keeps `current`; None on EOF.
fn pick_relationship(ctx: &CLIContext, current: Relationship) -> Option<Relationship> {
    let options = Relationship::options();
    println!("Classification:");
    for (i, rel) in options.iter().enumerate() {
        let marker = if *rel == current { " *" } else { "" };
        println!("  {}. {}{}", i + 1, rel.label(), marker);
    }
    loop {
        let input = ctx.prompt("Choice (Enter keeps current): ")?;
        if input.is_empty() {
            return Some(current);
        }
        match input.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Some(options[n - 1]),
            _ => match Relationship::parse_label(&input) {
                Ok(rel) => return Some(rel),
                Err(_) => println!("Pick a number from 1 to {}.", options.len()),
            },
        }
    }
}

fn parse_type(value: &str) -> Option<RelationshipType> {
    match value.to_lowercase().as_str() {
        "lead" => Some(RelationshipType::Lead),
        "professional" | "pro" => Some(RelationshipType::ProfessionalRelationship),
        "passive" | "friend" => Some(RelationshipType::PassiveFriendship),
        "dead" => Some(RelationshipType::DeadLead),
        _ => RelationshipType::from_name(value),
    }
}

fn parse_status(value: &str) -> Option<FollowUpStatus> {
    match value.to_lowercase().as_str() {
        "overdue" => Some(FollowUpStatus::Overdue),
        "upcoming" => Some(FollowUpStatus::Upcoming),
        "done" => Some(FollowUpStatus::Done),
        _ => None,
    }
}
