//! Interactive calendar session.

use anyhow::Result;
use dialoguer::Select;
use owo_colors::OwoColorize;
use slotnote_core::storage::KeyValueStore;
use slotnote_core::view::{CalendarView, WidgetAction, days};
use slotnote_core::{Flag, NoteStore, Slot};

use super::Session;
use super::edit::edit_interactively;
use crate::prompt::{TerminalTitle, prompt_with_retry};
use crate::render::{Render, render_days, render_widget, unique_prefix_len};
use crate::when::{parse_datetime, parse_end};

const NOTE_ACTIONS: &[&str] = &["Mark yes", "Mark no", "Edit", "Delete", "Back"];

enum Choice {
    Note(String),
    New,
    Quit,
}

pub fn run(mut session: Session) -> Result<()> {
    let mut view = CalendarView::new(&session.store);

    loop {
        let choice = choose(&view, &session.store)?;

        let result = match choice {
            Choice::Quit => break,
            Choice::New => new_note(&mut view, &mut session),
            Choice::Note(id) => note_menu(&mut view, &mut session.store, &id),
        };

        // Keep the session alive; the list in memory is still current.
        if let Err(e) = result {
            eprintln!("  {}", format!("{:#}", e).red());
        }
    }

    Ok(())
}

fn choose<S: KeyValueStore>(view: &CalendarView, store: &NoteStore<S>) -> Result<Choice> {
    let id_len = unique_prefix_len(store.notes().iter().map(|n| n.id.as_str()));
    let grouped = days(store.notes());

    println!();
    println!("{}", render_days(&grouped, id_len, |id| view.widget(id)));
    if !store.is_synced() {
        println!("{}", "  Last save failed; changes are only in memory".yellow());
    }
    println!();

    let ids: Vec<String> = grouped
        .iter()
        .flat_map(|day| day.notes.iter().map(|note| note.id.clone()))
        .collect();

    let mut items: Vec<String> = grouped
        .iter()
        .flat_map(|day| {
            day.notes.iter().map(|note| {
                format!(
                    "{} {}",
                    day.date.format("%b %-d"),
                    render_widget(note, view.widget(&note.id), id_len)
                )
            })
        })
        .collect();
    items.push("+ New note".to_string());
    items.push("Quit".to_string());

    let selection = Select::new()
        .with_prompt("  Select a note")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(match selection {
        i if i < ids.len() => Choice::Note(ids[i].clone()),
        i if i == ids.len() => Choice::New,
        _ => Choice::Quit,
    })
}

fn note_menu<S: KeyValueStore>(
    view: &mut CalendarView,
    store: &mut NoteStore<S>,
    id: &str,
) -> Result<()> {
    if let Some(note) = store.get(id) {
        println!("  {}", note.render());
    }

    let selection = Select::new()
        .with_prompt("  Action")
        .items(NOTE_ACTIONS)
        .default(0)
        .interact()?;

    match NOTE_ACTIONS[selection] {
        "Mark yes" => {
            view.act(store, id, WidgetAction::Check(Flag::Yes))?;
        }
        "Mark no" => {
            view.act(store, id, WidgetAction::Check(Flag::No))?;
        }
        "Edit" => {
            edit_interactively(view, store, id)?;
        }
        "Delete" => {
            view.act(store, id, WidgetAction::Delete)?;
        }
        _ => {}
    }

    Ok(())
}

/// Pick a slot and create a note on it.
fn new_note(view: &mut CalendarView, session: &mut Session) -> Result<()> {
    let start = prompt_with_retry("  Start (YYYY-MM-DD HH:MM)", None, parse_datetime)?;
    let default_length = session.config.default_duration.clone();
    let end = prompt_with_retry("  End or duration", Some(default_length.as_str()), |input| {
        parse_end(input, start)
    })?;

    let slot = Slot::new(start, end)?;
    match view.select_slot(&mut session.store, &slot, &mut TerminalTitle)? {
        Some(note) => println!("{}", format!("  Created: {}", note.title).green()),
        None => println!("{}", "  Cancelled".dimmed()),
    }

    Ok(())
}
