//! Terminal rendering for notes and the calendar.

use chrono::{DateTime, Local, NaiveDate, Utc};
use owo_colors::OwoColorize;
use slotnote_core::Note;
use slotnote_core::view::{Day, NoteWidget};

/// Shortest id prefix shown, even when a shorter one would be unique.
const MIN_ID_LEN: usize = 6;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Note {
    fn render(&self) -> String {
        format!(
            "{}  {}  {}",
            render_time_range(self.start, self.end).dimmed(),
            render_checkboxes(self),
            self.title.bold()
        )
    }
}

fn render_checkbox(checked: bool, label: &str) -> String {
    if checked {
        format!("[x] {}", label).green().to_string()
    } else {
        format!("[ ] {}", label)
    }
}

fn render_checkboxes(note: &Note) -> String {
    format!(
        "{} {}",
        render_checkbox(note.checked_yes(), "yes"),
        render_checkbox(note.checked_no(), "no")
    )
}

/// Format a slot as "10:00-10:30" (UTC)
pub fn render_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    if start.date_naive() == end.date_naive() {
        format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
    } else {
        format!("{}-{}", start.format("%H:%M"), end.format("%b %-d %H:%M"))
    }
}

/// A note as its widget shows it: the note line in viewing mode, the draft
/// and the save/cancel choices in editing mode.
pub fn render_widget(note: &Note, widget: Option<&NoteWidget>, id_len: usize) -> String {
    let id = short_id(&note.id, id_len).dimmed().to_string();

    match widget.and_then(NoteWidget::draft) {
        Some(draft) => format!(
            "{} {}  {} {}",
            id,
            render_time_range(note.start, note.end).dimmed(),
            format!("editing: {}", draft).yellow(),
            "(save / cancel)".dimmed()
        ),
        None => format!("{} {}", id, note.render()),
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Thu Mar 20")
pub fn format_date_label(date: NaiveDate) -> String {
    let today = Local::now().date_naive();

    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}

/// Render notes grouped by day.
pub fn render_days<'w>(
    days: &[Day<'_>],
    id_len: usize,
    widget_for: impl Fn(&str) -> Option<&'w NoteWidget>,
) -> String {
    if days.is_empty() {
        return "No notes".dimmed().to_string();
    }

    let mut lines = Vec::new();
    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format_date_label(day.date).bold().to_string());
        for note in &day.notes {
            let widget = widget_for(&note.id);
            lines.push(format!("  {}", render_widget(note, widget, id_len)));
        }
    }

    lines.join("\n")
}

pub fn short_id(id: &str, len: usize) -> &str {
    match id.char_indices().nth(len) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Length of the shortest prefix that tells every id apart (at least
/// `MIN_ID_LEN`).
pub fn unique_prefix_len<'a>(ids: impl IntoIterator<Item = &'a str>) -> usize {
    let mut ids: Vec<&str> = ids.into_iter().collect();
    ids.sort_unstable();

    let shared = ids
        .windows(2)
        .map(|pair| {
            pair[0]
                .chars()
                .zip(pair[1].chars())
                .take_while(|(a, b)| a == b)
                .count()
        })
        .max()
        .unwrap_or(0);

    (shared + 1).max(MIN_ID_LEN)
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 { word.to_string() } else { format!("{}s", word) }
}
