use crate::argument::Role;
use itertools::Itertools;

const INDENTATION: &str = "    ";

/// What one argument contributes to help
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) role: Role,
    pub(crate) required: bool,
    pub(crate) short_name: Option<char>,
    pub(crate) short_usage: String,
    pub(crate) long_usage: Vec<String>,
}

/// Help for one parser, captured at the moment it was requested
#[derive(Debug, Clone)]
pub(crate) struct HelpRequest {
    pub(crate) full_name: String,
    pub(crate) entries: Vec<Entry>,
}

pub(crate) fn help_lines(request: &HelpRequest, verb_term: &str, screen_width: usize) -> Vec<String> {
    let mut lines = vec![];
    write_usage(&mut lines, request, verb_term, screen_width);
    write_options(&mut lines, request, verb_term, screen_width);
    write_combining_hint(&mut lines, &request.entries);
    lines
}

fn write_usage(lines: &mut Vec<String>, request: &HelpRequest, verb_term: &str, screen_width: usize) {
    lines.push("Usage:".to_string());

    let prefix = format!("{INDENTATION}{} ", request.full_name);
    let prefix_width = width_of(&prefix);
    let summary = usage_summary(&request.entries, verb_term);
    for (i, line) in word_break(&summary, screen_width.saturating_sub(prefix_width))
        .into_iter()
        .enumerate()
    {
        if i == 0 {
            lines.push(format!("{prefix}{line}"));
        } else {
            lines.push(format!("{:prefix_width$}{line}", ""));
        }
    }
}

fn usage_summary(entries: &[Entry], verb_term: &str) -> String {
    let mut summary = String::new();

    let optional_named = entries
        .iter()
        .filter(|e| e.role == Role::Named && !e.required)
        .collect_vec();
    match optional_named.as_slice() {
        [] => {}
        [only] => summary.push_str(&format!(" [{}]", only.short_usage)),
        _ => summary.push_str(" [<options>]"),
    }

    for role in [Role::Named, Role::Positional] {
        for entry in entries.iter().filter(|e| e.role == role && e.required) {
            summary.push(' ');
            summary.push_str(&entry.short_usage);
        }
    }

    // [<a> [<b> [<c>]]]
    let optional_positionals = entries
        .iter()
        .filter(|e| e.role == Role::Positional && !e.required)
        .collect_vec();
    for entry in &optional_positionals {
        summary.push_str(&format!(" [{}", entry.short_usage));
    }
    summary.push_str(&"]".repeat(optional_positionals.len()));

    if entries.iter().any(|e| e.role == Role::Verb) {
        summary.push_str(&format!(" <{verb_term}> ..."));
    }
    summary
}

fn write_options(lines: &mut Vec<String>, request: &HelpRequest, verb_term: &str, screen_width: usize) {
    lines.push("Options:".to_string());

    let col_width = calculate_col_width(&request.entries);
    let (verbs, others): (Vec<_>, Vec<_>) = request
        .entries
        .iter()
        .partition(|e| e.role == Role::Verb);

    for entry in others {
        write_entry(lines, entry, col_width, screen_width);
    }

    if verbs.is_empty() {
        return;
    }
    lines.push(format!("Where <{verb_term}> is one of:"));
    for entry in verbs {
        write_entry(lines, entry, col_width, screen_width);
    }
    lines.push(format!(
        "Try '{} <{verb_term}> --help' for more information on a specific {verb_term}.",
        request.full_name
    ));
}

fn write_entry(lines: &mut Vec<String>, entry: &Entry, col_width: usize, screen_width: usize) {
    let available = screen_width.saturating_sub(width_of(INDENTATION) + col_width + 1);
    let mut label = entry.short_usage.as_str();
    for line in entry.long_usage.iter().flat_map(|l| word_break(l, available)) {
        lines.push(format!("{INDENTATION}{label:col_width$} {line}"));
        label = "";
    }
}

fn write_combining_hint(lines: &mut Vec<String>, entries: &[Entry]) {
    let letters = entries
        .iter()
        .filter(|e| e.role == Role::Named)
        .filter_map(|e| e.short_name)
        .filter(|&c| c != 'h')
        .collect_vec();
    if let [a, b, ..] = letters.as_slice() {
        lines.push(format!(
            "Single-letter arguments can be combined. For example, -{a} -{b} can be replaced with -{a}{b}."
        ));
    }
}

/// Width of the short usage column, shared by options and verbs
fn calculate_col_width(entries: &[Entry]) -> usize {
    entries.iter().map(|e| width_of(&e.short_usage)).max().unwrap_or(0)
}

/// Columns taken by `text`, one per character as `format!` padding counts them
fn width_of(text: &str) -> usize {
    text.chars().count()
}

/// Fills lines of at most `width` greedily; a word longer than `width` gets a line of its own
fn word_break(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut line = String::new();

    for word in text.split(' ').map(str::trim).filter(|w| !w.is_empty()) {
        if !line.is_empty() && width_of(&line) + 1 + width_of(word) > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
