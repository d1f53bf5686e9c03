use anyhow::Result;
use owo_colors::OwoColorize;
use slotnote_core::Flag;
use slotnote_core::view::{CalendarView, WidgetAction};

use super::Session;
use crate::render::Render;

pub fn run(mut session: Session, id: &str, flag: Flag) -> Result<()> {
    let id = session.resolve_id(id)?;
    let mut view = CalendarView::new(&session.store);

    view.act(&mut session.store, &id, WidgetAction::Check(flag))?;

    if let Some(note) = session.store.get(&id) {
        println!("{} {}", format!("  Marked {}:", flag).green(), note.render());
    }

    Ok(())
}
