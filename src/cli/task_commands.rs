use crate::cli::context::CLIContext;
use crate::model::*;
use crate::ops::followup_ops::{self, Completion};
use crate::queries::followup_queries::{FollowUpStatus, TaskKind};
use crate::queries::{stats_queries, task_queries};

/// Prints the overdue notification line.
pub fn banner(ctx: &CLIContext) {
    let worklist = task_queries::worklist(ctx.ws.contacts(), &ctx.settings, CLIContext::today());
    println!("{}", worklist.banner());
}

pub fn tasks(ctx: &CLIContext, args: &str) {
    let only = match args.to_lowercase().as_str() {
        "" | "all" => None,
        "overdue" => Some(FollowUpStatus::Overdue),
        "upcoming" => Some(FollowUpStatus::Upcoming),
        "done" => Some(FollowUpStatus::Done),
        other => {
            println!("Unknown filter '{}'. Use overdue, upcoming or done.", other);
            return;
        }
    };

    let worklist = task_queries::worklist(ctx.ws.contacts(), &ctx.settings, CLIContext::today());
    println!("{}", worklist.banner());
    if worklist.tasks.is_empty() {
        println!("No follow-ups scheduled. Leads and professional contacts need a last-contact date.");
        return;
    }

    for status in [FollowUpStatus::Overdue, FollowUpStatus::Upcoming, FollowUpStatus::Done] {
        if only.map_or(false, |s| s != status) {
            continue;
        }
        let rows: Vec<_> = worklist.with_status(status).collect();
        if rows.is_empty() {
            continue;
        }
        println!();
        println!("{} ({}):", status.display_name(), rows.len());
        for task in rows {
            let when = match task.follow_up.days_remaining {
                0 => "due today".to_string(),
                d if d < 0 => format!("{} day(s) late", -d),
                d => format!("in {} day(s)", d),
            };
            println!(
                "  {} - {} ({})",
                task.follow_up.due_date,
                task.description(),
                when
            );
        }
    }
}

pub fn done(ctx: &mut CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: done <name>");
        return;
    }
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };
    let task = match task_queries::task_for(&contact, &ctx.settings, CLIContext::today()) {
        Some(t) => t,
        None => {
            println!("{} has no follow-up to complete.", contact.name);
            return;
        }
    };

    println!("{} (due {})", task.description(), task.follow_up.due_date);
    let response = match task.follow_up.kind {
        TaskKind::Stage(_) => ctx.ask_response("Did you get a response?"),
        TaskKind::Maintenance => {
            if ctx.confirm("Mark the check-in as done?") {
                Response::Yes
            } else {
                Response::Cancel
            }
        }
    };

    let settings = ctx.settings.clone();
    match followup_ops::complete_task(&mut ctx.ws, &settings, contact.id, response, CLIContext::now()) {
        Ok(Completion::Cancelled) => println!("Cancelled; nothing changed."),
        Ok(Completion::CheckedIn) => println!("Check-in logged for {}.", contact.name),
        Ok(Completion::Converted) => {
            println!("{} is now a Professional Relationship.", contact.name)
        }
        Ok(Completion::Advanced(stage)) => {
            println!("{} moved to {}.", contact.name, stage.display_name())
        }
        Ok(Completion::MarkedDead) => println!("No response after the last stage; {} is a Dead Lead.", contact.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn stats(ctx: &CLIContext) {
    let stats = stats_queries::dashboard(ctx.ws.dataset(), &ctx.settings, CLIContext::today());
    println!();
    println!("  Contacts:         {}", stats.total_contacts);
    println!("  Companies:        {}", stats.total_companies);
    println!("  Leads:            {}", stats.leads);
    println!("  Professional:     {}", stats.professionals);
    println!("  Overdue:          {}", stats.follow_ups_overdue);
    println!("  Upcoming:         {}", stats.follow_ups_upcoming);
    println!("  Never contacted:  {}", stats.never_contacted);
    if !stats.recent.is_empty() {
        println!();
        println!("  Recently contacted:");
        let today = CLIContext::today();
        for (name, date) in &stats.recent {
            println!("    {} ({})", name, CLIContext::format_days_ago((today - *date).num_days()));
        }
    }
    println!();
}

pub fn settings(ctx: &CLIContext) {
    let s = &ctx.settings;
    println!("Settings ({}):", ctx.settings_path.display());
    println!("  Default check-in interval: {} day(s)", s.maintenance_days);
    println!("  Upcoming window:           {} day(s)", s.upcoming_window_days);
    println!("  Undo limit:                {}", s.undo_limit);
    if s.tag_intervals.is_empty() {
        println!("  No per-tag intervals.");
    } else {
        println!("  Per-tag intervals:");
        for (tag, days) in &s.tag_intervals {
            println!("    {}: {} day(s)", tag, days);
        }
    }
}

pub fn set_interval(ctx: &mut CLIContext, args: &str) {
    let (tag, days) = match args.rsplit_once(char::is_whitespace) {
        Some((tag, days)) => (tag.trim(), days.trim()),
        None => {
            println!("Usage: set-interval <tag> <days>   ('-' for days removes the tag)");
            return;
        }
    };
    let days = if days == "-" {
        None
    } else {
        match days.parse::<u32>() {
            Ok(d) => Some(d),
            Err(_) => {
                println!("'{}' is not a number of days.", days);
                return;
            }
        }
    };

    let mut updated = ctx.settings.clone();
    let result = updated
        .set_tag_interval(tag, days)
        .and_then(|_| updated.save(&ctx.settings_path));
    match result {
        Ok(()) => {
            ctx.settings = updated;
            match days {
                Some(d) => println!("Contacts tagged {} are now due every {} day(s).", tag, d),
                None => println!("Removed the interval for {}.", tag),
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}

pub fn undo(ctx: &mut CLIContext) {
    match ctx.ws.undo() {
        Ok(true) => println!("Undone."),
        Ok(false) => println!("Nothing to undo."),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn redo(ctx: &mut CLIContext) {
    match ctx.ws.redo() {
        Ok(true) => println!("Redone."),
        Ok(false) => println!("Nothing to redo."),
        Err(e) => ctx.print_error(&e),
    }
}
