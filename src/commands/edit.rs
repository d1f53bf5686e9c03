use anyhow::Result;
use owo_colors::OwoColorize;
use slotnote_core::NoteStore;
use slotnote_core::storage::KeyValueStore;
use slotnote_core::view::{CalendarView, Intent, WidgetAction};

use super::Session;
use crate::prompt::{confirm, edit_text};

pub fn run(mut session: Session, id: &str, title: Option<String>) -> Result<()> {
    let id = session.resolve_id(id)?;
    let mut view = CalendarView::new(&session.store);

    let saved = match title {
        Some(title) => {
            view.act(&mut session.store, &id, WidgetAction::Edit)?;
            view.act(&mut session.store, &id, WidgetAction::SetDraft(title.clone()))?;
            let saved = view.act(&mut session.store, &id, WidgetAction::Save)?.is_some();
            if saved {
                println!("{}", format!("  Saved: {}", title).green());
            }
            saved
        }
        None => edit_interactively(&mut view, &mut session.store, &id)?,
    };

    if !saved {
        println!("{}", "  Edit cancelled".dimmed());
    }

    Ok(())
}

/// Run the widget's editing flow on the terminal: show the draft, then save
/// or cancel. Returns whether the title was saved.
pub fn edit_interactively<S: KeyValueStore>(
    view: &mut CalendarView,
    store: &mut NoteStore<S>,
    id: &str,
) -> Result<bool> {
    view.act(store, id, WidgetAction::Edit)?;

    let Some(draft) = view.widget(id).and_then(|w| w.draft()).map(str::to_string) else {
        return Ok(false);
    };

    let text = edit_text("  Title", &draft)?;
    view.act(store, id, WidgetAction::SetDraft(text))?;

    let action = if confirm("  Save?")? {
        WidgetAction::Save
    } else {
        WidgetAction::Cancel
    };

    match view.act(store, id, action)? {
        Some(Intent::Rename { title, .. }) => {
            println!("{}", format!("  Saved: {}", title).green());
            Ok(true)
        }
        _ => Ok(false),
    }
}
