pub mod company_commands;
pub mod contact_commands;
pub mod context;
pub mod task_commands;

use std::path::Path;

use crate::config::Settings;
use crate::store::Workspace;
use context::CLIContext;

/// Run the interactive REPL.
pub fn run(data_path: &Path, settings_path: &Path, settings: Settings) {
    println!("nettrack - contacts and follow-ups");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    let ws = match Workspace::open(data_path, settings.undo_limit) {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("Error opening {}: {}", data_path.display(), e);
            return;
        }
    };

    let docs_root = data_path
        .parent()
        .map(|dir| dir.join("docs"))
        .unwrap_or_else(|| Path::new("docs").to_path_buf());

    let mut ctx = CLIContext::new(ws, settings, settings_path.to_path_buf(), docs_root);
    println!(
        "Loaded {} contact(s) and {} compan(ies) from {}",
        ctx.ws.contacts().len(),
        ctx.ws.companies().len(),
        data_path.display()
    );
    task_commands::banner(&ctx);
    println!();

    repl_loop(&mut ctx);
}

fn repl_loop(ctx: &mut CLIContext) {
    loop {
        let input = match ctx.read_line("> ") {
            Some(s) => s,
            None => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, args) = parse_command(input);

        match command {
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,

            // Contacts
            "contacts" | "list" | "ls" => contact_commands::list(ctx, args),
            "add" | "add-contact" => contact_commands::add(ctx, args),
            "show" | "view" => contact_commands::show(ctx, args),
            "edit" | "edit-contact" => contact_commands::edit(ctx, args),
            "delete" | "delete-contact" => contact_commands::delete(ctx, args),
            "log" => contact_commands::log(ctx, args),
            "find" => contact_commands::find(ctx, args),
            "tags" => contact_commands::tags(ctx),

            // Documents
            "docs" => contact_commands::docs(ctx, args),
            "attach" => contact_commands::attach(ctx, args),
            "detach" => contact_commands::detach(ctx, args),

            // CSV
            "import" => contact_commands::import(ctx, args),
            "export" => contact_commands::export(ctx, args),

            // Companies
            "companies" => company_commands::list(ctx, args),
            "add-company" => company_commands::add(ctx, args),
            "show-company" => company_commands::show(ctx, args),
            "edit-company" => company_commands::edit(ctx, args),
            "delete-company" => company_commands::delete(ctx, args),

            // Follow-ups
            "tasks" | "todo" => task_commands::tasks(ctx, args),
            "done" | "complete" => task_commands::done(ctx, args),

            // Other
            "stats" => task_commands::stats(ctx),
            "settings" => task_commands::settings(ctx),
            "set-interval" => task_commands::set_interval(ctx, args),
            "undo" => task_commands::undo(ctx),
            "redo" => task_commands::redo(ctx),

            _ => println!("Unknown command: {}. Type 'help' for commands.", command),
        }
    }
}

/// Split input into command and the rest of the line.
fn parse_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(|c: char| c == ' ' || c == '\t') {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

fn print_help() {
    println!(r#"
COMMANDS:

  Contacts:
    contacts [filters] [text]   List contacts (filters below)
    add [name]                  Add a contact (interactive)
    show <name>                 Show contact details and history
    edit <name>                 Edit a contact (Enter keeps, '-' clears)
    delete <name>               Delete a contact
    log <name>                  Log a meeting, call, email...
    find <query>                Search names, companies and tags
    tags                        List every tag in use

  Documents:
    docs <name>                 List files attached to a contact
    attach <name>               Attach a file (prompts for its path)
    detach <name>               Remove an attached file

  Companies:
    companies [filters]         List companies with contact counts
    add-company [name]          Add a company
    show-company <name>         Show a company and its contacts
    edit-company <name>         Edit a company
    delete-company <name>       Delete a company

  Follow-ups:
    tasks [overdue|upcoming]    Show the follow-up worklist
    done <name>                 Complete a contact's follow-up (y/n/c)

  Data:
    import <file.csv>           Import contacts from CSV
    export <file.csv>           Export contacts to CSV
    undo / redo                 Undo or redo the last change

  Other:
    stats                       Show dashboard statistics
    settings                    Show follow-up settings
    set-interval <tag> <days>   Set a tag's check-in interval ('-' removes)
    help                        Show this help
    exit / quit / q             Exit

FILTERS:
  contacts: tag:<tag> type:<lead|professional|passive|dead> company:<name>
            state:<state> career:<career> status:<overdue|upcoming|done>
            sort:<name|recent|followup>
  companies: state:<state> sector:<sector> type:<type> stage:<stage>
  Quote values with spaces: state:"New York"

TIPS:
  - Names are case-insensitive and partial matches work
  - Dates are YYYY-MM-DD"#);
}
