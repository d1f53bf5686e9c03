//! Calendar view state: one widget per note plus the controller that turns
//! widget input into store mutations.
//!
//! Widgets hold only ephemeral UI state (viewing vs. editing and the draft
//! title). They never write to storage; they emit [`Intent`]s which the
//! [`CalendarView`] applies to a [`NoteStore`].

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::SlotnoteResult;
use crate::note::{Flag, Note};
use crate::prompt::TitlePrompt;
use crate::slot::Slot;
use crate::storage::KeyValueStore;
use crate::store::NoteStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Editing { draft: String },
}

/// User input on a single note widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    Check(Flag),
    Edit,
    SetDraft(String),
    Save,
    Cancel,
    Delete,
}

/// A store mutation requested by a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Toggle { id: String, flag: Flag },
    Rename { id: String, title: String },
    Delete { id: String },
}

#[derive(Debug, Clone)]
pub struct NoteWidget {
    note_id: String,
    title: String,
    mode: Mode,
}

impl NoteWidget {
    pub fn new(note: &Note) -> Self {
        NoteWidget {
            note_id: note.id.clone(),
            title: note.title.clone(),
            mode: Mode::Viewing,
        }
    }

    pub fn note_id(&self) -> &str {
        &self.note_id
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing { .. })
    }

    /// The draft title, if editing.
    pub fn draft(&self) -> Option<&str> {
        match &self.mode {
            Mode::Editing { draft } => Some(draft),
            Mode::Viewing => None,
        }
    }

    /// Pick up a new title from the store. A changed title drops any edit
    /// in progress.
    pub fn refresh(&mut self, note: &Note) {
        if note.title != self.title {
            self.title = note.title.clone();
            self.mode = Mode::Viewing;
        }
    }

    /// Apply one action. Actions that do not fit the current mode are
    /// ignored.
    pub fn handle(&mut self, action: WidgetAction) -> Option<Intent> {
        let editing = self.is_editing();

        match action {
            WidgetAction::Check(flag) if !editing => Some(Intent::Toggle {
                id: self.note_id.clone(),
                flag,
            }),
            WidgetAction::Delete if !editing => Some(Intent::Delete {
                id: self.note_id.clone(),
            }),
            WidgetAction::Edit if !editing => {
                self.mode = Mode::Editing {
                    draft: self.title.clone(),
                };
                None
            }
            WidgetAction::SetDraft(text) if editing => {
                self.mode = Mode::Editing { draft: text };
                None
            }
            WidgetAction::Save if editing => match std::mem::replace(&mut self.mode, Mode::Viewing) {
                Mode::Editing { draft } => Some(Intent::Rename {
                    id: self.note_id.clone(),
                    title: draft,
                }),
                Mode::Viewing => None,
            },
            WidgetAction::Cancel if editing => {
                self.mode = Mode::Viewing;
                None
            }
            action => {
                tracing::trace!(mode = ?self.mode, ?action, "ignored widget action");
                None
            }
        }
    }
}

/// One calendar day and the notes starting on it, ordered by start.
#[derive(Debug)]
pub struct Day<'a> {
    pub date: NaiveDate,
    pub notes: Vec<&'a Note>,
}

/// Group notes by the UTC date they start on.
pub fn days(notes: &[Note]) -> Vec<Day<'_>> {
    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by_key(|note| note.start);

    let mut days: Vec<Day<'_>> = Vec::new();
    for note in sorted {
        let date = note.start.date_naive();
        if let Some(day) = days.last_mut().filter(|day| day.date == date) {
            day.notes.push(note);
            continue;
        }
        days.push(Day {
            date,
            notes: vec![note],
        });
    }

    days
}

/// Apply `intent` to `store`. Returns whether a note matched.
pub fn apply<S: KeyValueStore>(store: &mut NoteStore<S>, intent: &Intent) -> SlotnoteResult<bool> {
    match intent {
        Intent::Toggle { id, flag } => store.toggle_flag(id, *flag),
        Intent::Rename { id, title } => store.rename_note(id, title.as_str()),
        Intent::Delete { id } => store.delete_note(id),
    }
}

/// Widgets for every note in a store, kept in step with it.
#[derive(Debug, Default)]
pub struct CalendarView {
    widgets: HashMap<String, NoteWidget>,
}

impl CalendarView {
    pub fn new<S: KeyValueStore>(store: &NoteStore<S>) -> Self {
        let mut view = CalendarView::default();
        view.sync(store.notes());
        view
    }

    /// Reconcile widgets with `notes`: add missing ones, drop widgets of
    /// deleted notes, refresh titles.
    pub fn sync(&mut self, notes: &[Note]) {
        self.widgets
            .retain(|id, _| notes.iter().any(|note| &note.id == id));

        for note in notes {
            self.widgets
                .entry(note.id.clone())
                .and_modify(|widget| widget.refresh(note))
                .or_insert_with(|| NoteWidget::new(note));
        }
    }

    pub fn widget(&self, id: &str) -> Option<&NoteWidget> {
        self.widgets.get(id)
    }

    /// A slot was selected: create a note there if the prompt confirms.
    pub fn select_slot<S: KeyValueStore>(
        &mut self,
        store: &mut NoteStore<S>,
        slot: &Slot,
        prompt: &mut impl TitlePrompt,
    ) -> SlotnoteResult<Option<Note>> {
        let result = store.create_note(slot, prompt);
        self.sync(store.notes());
        result
    }

    /// Feed `action` to the widget of note `id` and apply whatever it asks
    /// for. Returns the applied intent, if any.
    pub fn act<S: KeyValueStore>(
        &mut self,
        store: &mut NoteStore<S>,
        id: &str,
        action: WidgetAction,
    ) -> SlotnoteResult<Option<Intent>> {
        let Some(widget) = self.widgets.get_mut(id) else {
            return Ok(None);
        };

        let Some(intent) = widget.handle(action) else {
            return Ok(None);
        };

        let result = apply(store, &intent);
        // The in-memory list changed even if the write failed.
        self.sync(store.notes());
        result?;

        Ok(Some(intent))
    }
}
