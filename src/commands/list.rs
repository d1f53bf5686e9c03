use anyhow::Result;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use slotnote_core::Note;
use slotnote_core::view::days;

use super::Session;
use crate::render::{pluralize, render_days, unique_prefix_len};

pub fn run(session: Session, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<()> {
    let store = &session.store;

    let notes: Vec<Note> = match (from, to) {
        (None, None) => store.notes().to_vec(),
        (from, to) => store
            .notes_between(
                from.unwrap_or(DateTime::<Utc>::MIN_UTC),
                to.unwrap_or(DateTime::<Utc>::MAX_UTC),
            )
            .cloned()
            .collect(),
    };

    let id_len = unique_prefix_len(store.notes().iter().map(|n| n.id.as_str()));
    println!("{}", render_days(&days(&notes), id_len, |_| None));

    if !notes.is_empty() {
        println!();
        println!(
            "{}",
            format!("{} {}", notes.len(), pluralize("note", notes.len())).dimmed()
        );
    }

    Ok(())
}
