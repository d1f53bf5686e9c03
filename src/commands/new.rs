use anyhow::Result;
use owo_colors::OwoColorize;
use slotnote_core::Slot;
use slotnote_core::prompt::FixedTitle;
use slotnote_core::view::CalendarView;

use super::Session;
use crate::prompt::TerminalTitle;
use crate::render::Render;
use crate::when::{add_length, parse_datetime, parse_duration, parse_end};

pub fn run(
    mut session: Session,
    title: Option<String>,
    start: String,
    end: Option<String>,
    duration: Option<String>,
) -> Result<()> {
    let start = parse_datetime(&start)?;

    let end = match (end, duration) {
        (Some(end), _) => parse_end(&end, start)?,
        (None, Some(duration)) => add_length(start, parse_duration(&duration)?)?,
        (None, None) => add_length(start, session.config.slot_length()?)?,
    };

    let slot = Slot::new(start, end)?;
    let mut view = CalendarView::new(&session.store);

    let created = match title {
        Some(title) => view.select_slot(&mut session.store, &slot, &mut FixedTitle(Some(title)))?,
        None => view.select_slot(&mut session.store, &slot, &mut TerminalTitle)?,
    };

    match created {
        Some(note) => println!(
            "{} {}",
            format!("  Created {}:", note.id).green(),
            note.render()
        ),
        None => println!("{}", "  Cancelled, nothing saved".dimmed()),
    }

    Ok(())
}
