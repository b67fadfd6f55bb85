//! Terminal rendering of notes and notifications.

use notesphere_core::view::highlight::highlight_matches;
use notesphere_core::view::preview::NoteSummary;
use notesphere_core::{Note, Notification, NotificationLevel, Outcome};

const TITLE_WIDTH: usize = 28;
const OBJECTIVE_WIDTH: usize = 36;

pub fn notification(notification: &Notification) {
    match notification.level {
        NotificationLevel::Error | NotificationLevel::Warning => eprintln!("{notification}"),
        NotificationLevel::Info | NotificationLevel::Success => println!("{notification}"),
    }
}

/// Prints the outcome notification plus any persistence warning.
pub fn outcome<T>(outcome: &Outcome<T>) {
    notification(&outcome.notification);
    if let Some(warning) = &outcome.persistence_warning {
        notification(warning);
    }
}

pub fn list_entry(note: &Note, term: &str) {
    let pin = if note.is_pinned { "*" } else { " " };
    println!(
        "{pin} {}  {}",
        note.id,
        highlight_matches(&note.title, term)
    );
    println!("    {}", highlight_matches(&note.objective, term));
    let summary = NoteSummary::of(note);
    if let Some(preview) = summary.preview {
        println!("    {}", highlight_matches(&preview, term));
    }
    if summary.image_count > 0 {
        println!("    [{} images]", summary.image_count);
    }
}

pub fn table(rows: &[&Note]) {
    println!(
        "{:<10} {:<title$} {:<objective$} {:<24} {}",
        "ID",
        "TITLE",
        "OBJECTIVE",
        "CREATED",
        "PINNED",
        title = TITLE_WIDTH,
        objective = OBJECTIVE_WIDTH
    );
    for note in rows {
        println!(
            "{:<10} {:<title$} {:<objective$} {:<24} {}",
            note.id.as_str(),
            clip(&note.title, TITLE_WIDTH),
            clip(&note.objective, OBJECTIVE_WIDTH),
            note.created_at,
            if note.is_pinned { "yes" } else { "no" },
            title = TITLE_WIDTH,
            objective = OBJECTIVE_WIDTH
        );
    }
}

pub fn full(note: &Note) {
    println!("id:        {}", note.id);
    println!("title:     {}", note.title);
    println!("objective: {}", note.objective);
    println!("created:   {}", note.created_at);
    println!("pinned:    {}", note.is_pinned);
    println!("images:    {}", note.images.len());
    println!();
    println!("{}", note.notes_area);
}

fn clip(value: &str, width: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= width {
        return flat;
    }
    let mut clipped = flat.chars().take(width.saturating_sub(3)).collect::<String>();
    clipped.push_str("...");
    clipped
}
