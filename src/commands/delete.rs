use anyhow::Result;
use owo_colors::OwoColorize;
use slotnote_core::view::{CalendarView, WidgetAction};

use super::Session;

pub fn run(mut session: Session, id: &str) -> Result<()> {
    let id = session.resolve_id(id)?;
    let title = session
        .store
        .get(&id)
        .map(|note| note.title.clone())
        .unwrap_or_default();

    let mut view = CalendarView::new(&session.store);
    view.act(&mut session.store, &id, WidgetAction::Delete)?;

    println!("{}", format!("  Deleted: {}", title).red());
    Ok(())
}
