use chrono::{Local, NaiveDate, NaiveDateTime};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::Settings;
use crate::error::TrackerError;
use crate::model::*;
use crate::queries::{company_queries, contact_queries};
use crate::store::Workspace;

pub struct CLIContext {
    pub ws: Workspace,
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub docs_root: PathBuf,
}

impl CLIContext {
    pub fn new(ws: Workspace, settings: Settings, settings_path: PathBuf, docs_root: PathBuf) -> Self {
        Self {
            ws,
            settings,
            settings_path,
            docs_root,
        }
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Read a line, trimmed.
    pub fn prompt(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).map(|s| s.trim().to_string())
    }

    /// Prompt showing the current value in brackets. Enter keeps it, '-' clears it.
    pub fn prompt_edit(&self, label: &str, current: Option<&str>) -> Option<Option<String>> {
        let shown = current.map(|c| format!(" [{}]", c)).unwrap_or_default();
        let input = self.prompt(&format!("{}{}: ", label, shown))?;
        Some(match input.as_str() {
            "" => current.map(str::to_string),
            "-" => None,
            _ => Some(input),
        })
    }

    /// Yes / no / cancel question. Anything unrecognised counts as cancel.
    pub fn ask_response(&self, question: &str) -> Response {
        match self.prompt(&format!("{} (y/n/c): ", question)) {
            Some(s) if s.eq_ignore_ascii_case("y") || s.eq_ignore_ascii_case("yes") => Response::Yes,
            Some(s) if s.eq_ignore_ascii_case("n") || s.eq_ignore_ascii_case("no") => Response::No,
            _ => Response::Cancel,
        }
    }

    pub fn confirm(&self, question: &str) -> bool {
        self.ask_response(question) == Response::Yes
    }

    /// Find a contact by name query. Prints why when none or several match.
    pub fn find_contact(&self, args: &str) -> Option<Contact> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }
        let matches = contact_queries::find_by_name(self.ws.contacts(), query);
        match matches.len() {
            0 => {
                println!("No contact found matching '{}'", query);
                None
            }
            1 => Some(matches[0].clone()),
            _ => {
                println!("Multiple matches found:");
                for c in &matches {
                    println!("  {}", c.name);
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    pub fn find_company(&self, args: &str) -> Option<Company> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }
        let matches = company_queries::find_by_name(self.ws.companies(), query);
        match matches.len() {
            0 => {
                println!("No company found matching '{}'", query);
                None
            }
            1 => Some(matches[0].clone()),
            _ => {
                println!("Multiple matches found:");
                for c in &matches {
                    println!("  {}", c.name);
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    pub fn format_days_ago(days: i64) -> String {
        match days {
            0 => "today".into(),
            1 => "yesterday".into(),
            n if n < 0 => format!("in {} days", -n),
            n if n < 7 => format!("{} days ago", n),
            n if n < 30 => format!("{} week(s) ago", n / 7),
            n if n < 365 => format!("{} month(s) ago", n / 30),
            n => format!("{} year(s) ago", n / 365),
        }
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    pub fn print_error(&self, e: &TrackerError) {
        println!("Error: {}", e);
    }
}

/// Splits command arguments into `key:value` filters and free text.
/// Double quotes group words, so `city:"New York"` is one filter.
pub fn parse_filters(args: &str) -> (Vec<(String, String)>, String) {
    let mut filters = Vec::new();
    let mut text = Vec::new();
    for token in tokenize(args) {
        match token.split_once(':') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                filters.push((key.to_lowercase(), value.to_string()))
            }
            _ => text.push(token),
        }
    }
    (filters, text.join(" "))
}

fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in input.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
