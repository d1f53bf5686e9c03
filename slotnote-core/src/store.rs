//! The note store: the note list, its mutations, and persistence.
//!
//! Every mutation is applied in memory first and then the whole list is
//! written back under [`NOTES_KEY`]. There is no rollback: if the write
//! fails the error is returned, the in-memory list keeps the change, and
//! [`NoteStore::is_synced`] reports `false` until a later write succeeds.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{SlotnoteError, SlotnoteResult};
use crate::id::generate_id;
use crate::note::{Flag, Note};
use crate::prompt::{TitlePrompt, confirmed_title};
use crate::slot::{Slot, overlaps};
use crate::storage::KeyValueStore;

/// Storage key holding the serialized note list.
pub const NOTES_KEY: &str = "notes";

/// Storage key a corrupt note list is moved to under [`CorruptPolicy::Reset`].
pub const CORRUPT_KEY: &str = "notes.corrupt";

/// What to do when the stored note list cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Refuse to load.
    #[default]
    Fail,
    /// Keep a copy of the bad value under [`CORRUPT_KEY`] and start empty.
    Reset,
}

pub struct NoteStore<S: KeyValueStore> {
    storage: S,
    notes: Vec<Note>,
    synced: bool,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Load the note list and write it straight back.
    pub fn open(storage: S, policy: CorruptPolicy) -> SlotnoteResult<Self> {
        let mut store = Self::load(storage, policy)?;
        store.save()?;
        Ok(store)
    }

    /// Read the note list from storage without writing anything back
    /// (except the corrupt copy under [`CorruptPolicy::Reset`]).
    pub fn load(mut storage: S, policy: CorruptPolicy) -> SlotnoteResult<Self> {
        let notes = match storage.get(NOTES_KEY)? {
            None => Vec::new(),
            Some(raw) => match parse_notes(&raw) {
                Ok(notes) => notes,
                Err(e) => match policy {
                    CorruptPolicy::Fail => return Err(e),
                    CorruptPolicy::Reset => {
                        tracing::warn!(
                            error = %e,
                            backup = CORRUPT_KEY,
                            "stored notes are corrupt, starting with an empty list"
                        );
                        storage.set(CORRUPT_KEY, &raw)?;
                        Vec::new()
                    }
                },
            },
        };

        tracing::debug!(count = notes.len(), "loaded notes");

        Ok(NoteStore {
            storage,
            notes,
            synced: false,
        })
    }

    /// Serialize the full list and overwrite the stored copy.
    pub fn save(&mut self) -> SlotnoteResult<()> {
        let content = serde_json::to_string(&self.notes)
            .map_err(|e| SlotnoteError::Serialization(e.to_string()))?;

        match self.storage.set(NOTES_KEY, &content) {
            Ok(()) => {
                self.synced = true;
                Ok(())
            }
            Err(e) => {
                self.synced = false;
                tracing::error!(error = %e, "failed to save notes");
                Err(e)
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Ask `prompt` for a title and append a note on `slot`.
    ///
    /// Returns `Ok(None)` without touching storage when the prompt is
    /// cancelled or answered with an empty title.
    pub fn create_note(
        &mut self,
        slot: &Slot,
        prompt: &mut impl TitlePrompt,
    ) -> SlotnoteResult<Option<Note>> {
        let Some(title) = confirmed_title(prompt.request_title(slot)?) else {
            tracing::debug!("note creation cancelled");
            return Ok(None);
        };

        let note = Note::new(generate_id(), slot, title);
        tracing::info!(id = %note.id, start = %note.start, "created note");
        self.notes.push(note.clone());

        self.save()?;
        Ok(Some(note))
    }

    /// Check `flag` on the note with `id` and clear the other box.
    ///
    /// Returns `Ok(false)` if no note has that id.
    pub fn toggle_flag(&mut self, id: &str, flag: Flag) -> SlotnoteResult<bool> {
        let Some(note) = self.find_mut(id) else {
            return Ok(false);
        };

        note.mark(flag);
        tracing::debug!(id, %flag, "marked note");

        self.save()?;
        Ok(true)
    }

    /// Replace the title of the note with `id`. Any string is accepted.
    pub fn rename_note(&mut self, id: &str, title: impl Into<String>) -> SlotnoteResult<bool> {
        let Some(note) = self.find_mut(id) else {
            return Ok(false);
        };

        note.title = title.into();
        tracing::debug!(id, "renamed note");

        self.save()?;
        Ok(true)
    }

    pub fn delete_note(&mut self, id: &str) -> SlotnoteResult<bool> {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);

        if self.notes.len() == before {
            return Ok(false);
        }

        tracing::info!(id, "deleted note");
        self.save()?;
        Ok(true)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes overlapping `[from, to)`, in insertion order.
    pub fn notes_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Iterator<Item = &Note> {
        self.notes
            .iter()
            .filter(move |note| overlaps(note.start, note.end, from, to))
    }

    /// Notes whose id starts with `prefix`. An exact id match is returned
    /// alone even if it is also a prefix of other ids.
    pub fn matching_prefix(&self, prefix: &str) -> Vec<&Note> {
        if let Some(exact) = self.get(prefix) {
            return vec![exact];
        }

        self.notes
            .iter()
            .filter(|note| note.id.starts_with(prefix))
            .collect()
    }

    /// `false` after a failed write, until the next successful one.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| note.id == id)
    }
}

/// Parse a stored note list. Ids must be unique.
fn parse_notes(raw: &str) -> SlotnoteResult<Vec<Note>> {
    let notes: Vec<Note> =
        serde_json::from_str(raw).map_err(|source| SlotnoteError::PersistenceParse {
            key: NOTES_KEY.to_string(),
            source,
        })?;

    let duplicate = {
        let mut seen = HashSet::new();
        notes
            .iter()
            .find(|note| !seen.insert(note.id.as_str()))
            .map(|note| note.id.clone())
    };
    if let Some(id) = duplicate {
        return Err(SlotnoteError::DuplicateId {
            key: NOTES_KEY.to_string(),
            id,
        });
    }

    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Disposition;
    use crate::prompt::FixedTitle;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn slot_at(hour: u32, minute: u32) -> Slot {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, hour, minute, 0).unwrap();
        Slot::starting_at(start, Duration::minutes(30)).unwrap()
    }

    fn empty_store() -> NoteStore<MemoryStore> {
        NoteStore::open(MemoryStore::new(), CorruptPolicy::Fail).unwrap()
    }

    fn create(store: &mut NoteStore<MemoryStore>, title: &str) -> Note {
        store
            .create_note(&slot_at(10, 0), &mut FixedTitle::confirm(title))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_open_missing_key_writes_empty_list() {
        let store = empty_store();
        assert!(store.is_empty());
        assert!(store.is_synced());
        assert_eq!(store.storage().raw(NOTES_KEY), Some("[]"));
    }

    #[test]
    fn test_create_note_persists_one_element_array() {
        let mut store = empty_store();
        let note = create(&mut store, "Standup");

        assert_eq!(store.len(), 1);
        let stored = &store.notes()[0];
        assert_eq!(stored.title, "Standup");
        assert_eq!(stored.start, Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap());
        assert_eq!(stored.end, Utc.with_ymd_and_hms(2025, 3, 20, 10, 30, 0).unwrap());
        assert!(!stored.checked_yes() && !stored.checked_no());

        let raw = store.storage().raw(NOTES_KEY).unwrap();
        let persisted: Vec<Note> = serde_json::from_str(raw).unwrap();
        assert_eq!(persisted, vec![note]);
    }

    #[test]
    fn test_cancelled_or_empty_title_changes_nothing() {
        let mut store = empty_store();
        let writes = store.storage().writes();

        let cancelled = store
            .create_note(&slot_at(10, 0), &mut FixedTitle::cancel())
            .unwrap();
        let empty = store
            .create_note(&slot_at(10, 0), &mut FixedTitle::confirm(""))
            .unwrap();

        assert!(cancelled.is_none());
        assert!(empty.is_none());
        assert!(store.is_empty());
        assert_eq!(store.storage().writes(), writes);
        assert_eq!(store.storage().raw(NOTES_KEY), Some("[]"));
    }

    #[test]
    fn test_toggle_flag_sets_exactly_one() {
        let mut store = empty_store();
        let note = create(&mut store, "Lunch");

        assert!(store.toggle_flag(&note.id, Flag::Yes).unwrap());
        let n = store.get(&note.id).unwrap();
        assert!(n.checked_yes() && !n.checked_no());

        assert!(store.toggle_flag(&note.id, Flag::No).unwrap());
        let n = store.get(&note.id).unwrap();
        assert!(!n.checked_yes() && n.checked_no());

        assert!(store.storage().raw(NOTES_KEY).unwrap().contains(r#""checkedYes":false,"checkedNo":true"#));
    }

    #[test]
    fn test_toggle_leaves_other_notes_alone() {
        let mut store = empty_store();
        let a = create(&mut store, "A");
        let b = create(&mut store, "B");

        store.toggle_flag(&a.id, Flag::Yes).unwrap();

        assert_eq!(store.get(&b.id).unwrap().disposition(), Disposition::Undecided);
    }

    #[test]
    fn test_rename_and_order_preserved() {
        let mut store = empty_store();
        let a = create(&mut store, "A");
        let b = create(&mut store, "B");
        let c = create(&mut store, "C");

        store.rename_note(&b.id, "").unwrap();
        store.toggle_flag(&a.id, Flag::No).unwrap();

        let ids: Vec<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![a.id.as_str(), b.id.as_str(), c.id.as_str()]);
        assert_eq!(store.get(&b.id).unwrap().title, "");
    }

    #[test]
    fn test_delete_then_mutations_do_not_resurrect() {
        let mut store = empty_store();
        let note = create(&mut store, "Gone");

        assert!(store.delete_note(&note.id).unwrap());
        let writes = store.storage().writes();

        assert!(!store.toggle_flag(&note.id, Flag::Yes).unwrap());
        assert!(!store.rename_note(&note.id, "Back").unwrap());
        assert!(!store.delete_note(&note.id).unwrap());

        assert!(store.get(&note.id).is_none());
        assert_eq!(store.storage().writes(), writes);
        assert_eq!(store.storage().raw(NOTES_KEY), Some("[]"));
    }

    #[test]
    fn test_ids_unique_across_creations() {
        let mut store = empty_store();
        for i in 0..50 {
            create(&mut store, &format!("note {i}"));
        }
        let ids: HashSet<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_flags_never_both_set_over_mixed_operations() {
        let mut store = empty_store();
        let ids: Vec<String> = (0..4).map(|i| create(&mut store, &format!("n{i}")).id).collect();

        for step in 0..40usize {
            let id = &ids[step * 7 % ids.len()];
            match step % 5 {
                0 | 3 => store.toggle_flag(id, Flag::Yes).map(|_| ()).unwrap(),
                1 | 4 => store.toggle_flag(id, Flag::No).map(|_| ()).unwrap(),
                _ => store.rename_note(id, format!("step {step}")).map(|_| ()).unwrap(),
            }

            let raw = store.storage().raw(NOTES_KEY).unwrap();
            let records: Vec<serde_json::Value> = serde_json::from_str(raw).unwrap();
            for record in records {
                assert!(!(record["checkedYes"] == true && record["checkedNo"] == true));
            }
        }
    }

    #[test]
    fn test_load_then_save_is_byte_identical() {
        let mut store = empty_store();
        let a = create(&mut store, "Standup");
        create(&mut store, "Retro");
        store.toggle_flag(&a.id, Flag::Yes).unwrap();
        let before = store.storage().raw(NOTES_KEY).unwrap().to_string();

        let storage = MemoryStore::with_value(NOTES_KEY, &before);
        let reopened = NoteStore::open(storage, CorruptPolicy::Fail).unwrap();

        assert_eq!(reopened.storage().raw(NOTES_KEY).unwrap(), before);
        assert_eq!(reopened.notes(), store.notes());
    }

    #[test]
    fn test_corrupt_data_fails_by_default() {
        let storage = MemoryStore::with_value(NOTES_KEY, "{not json");
        let result = NoteStore::open(storage, CorruptPolicy::Fail);
        assert!(matches!(result, Err(SlotnoteError::PersistenceParse { .. })));
    }

    #[test]
    fn test_corrupt_data_reset_keeps_backup() {
        let storage = MemoryStore::with_value(NOTES_KEY, "{not json");
        let store = NoteStore::open(storage, CorruptPolicy::Reset).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.storage().raw(CORRUPT_KEY), Some("{not json"));
        assert_eq!(store.storage().raw(NOTES_KEY), Some("[]"));
    }

    #[test]
    fn test_write_failure_keeps_change_in_memory() {
        let mut store = empty_store();
        let note = create(&mut store, "Draft");

        store.storage_mut().set_fail_writes(true);
        let result = store.rename_note(&note.id, "Final");

        assert!(matches!(result, Err(SlotnoteError::PersistenceWrite { .. })));
        assert_eq!(store.get(&note.id).unwrap().title, "Final");
        assert!(!store.is_synced());
        assert!(store.storage().raw(NOTES_KEY).unwrap().contains("Draft"));

        store.storage_mut().set_fail_writes(false);
        store.toggle_flag(&note.id, Flag::Yes).unwrap();
        assert!(store.is_synced());
        assert!(store.storage().raw(NOTES_KEY).unwrap().contains("Final"));
    }

    #[test]
    fn test_notes_between() {
        let mut store = empty_store();
        store
            .create_note(&slot_at(9, 0), &mut FixedTitle::confirm("early"))
            .unwrap();
        store
            .create_note(&slot_at(14, 0), &mut FixedTitle::confirm("late"))
            .unwrap();

        let from = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 3, 21, 0, 0, 0).unwrap();
        let titles: Vec<&str> = store
            .notes_between(from, to)
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(titles, vec!["late"]);
    }

    #[test]
    fn test_notes_between_excludes_note_ending_at_from() {
        let mut store = empty_store();
        store
            .create_note(&slot_at(23, 30), &mut FixedTitle::confirm("late night"))
            .unwrap();

        let from = Utc.with_ymd_and_hms(2025, 3, 21, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 3, 22, 0, 0, 0).unwrap();
        assert_eq!(store.notes_between(from, to).count(), 0);

        let from = Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap();
        assert_eq!(store.notes_between(from, to).count(), 1);
    }

    const DUPLICATE_IDS: &str = r#"[
        {"id":"dup","start":"2025-03-20T10:00:00.000Z","end":"2025-03-20T10:30:00.000Z","title":"one","checkedYes":false,"checkedNo":false},
        {"id":"dup","start":"2025-03-20T11:00:00.000Z","end":"2025-03-20T11:30:00.000Z","title":"two","checkedYes":false,"checkedNo":false}
    ]"#;

    #[test]
    fn test_duplicate_ids_fail_by_default() {
        let storage = MemoryStore::with_value(NOTES_KEY, DUPLICATE_IDS);
        let result = NoteStore::load(storage, CorruptPolicy::Fail);

        assert!(matches!(
            result,
            Err(SlotnoteError::DuplicateId { ref id, .. }) if id == "dup"
        ));
    }

    #[test]
    fn test_duplicate_ids_reset_keeps_backup() {
        let storage = MemoryStore::with_value(NOTES_KEY, DUPLICATE_IDS);
        let mut store = NoteStore::open(storage, CorruptPolicy::Reset).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.storage().raw(CORRUPT_KEY), Some(DUPLICATE_IDS));
        assert!(!store.delete_note("dup").unwrap());
    }

    #[test]
    fn test_matching_prefix() {
        let raw = r#"[
            {"id":"abc","start":"2025-03-20T10:00:00.000Z","end":"2025-03-20T10:30:00.000Z","title":"one","checkedYes":false,"checkedNo":false},
            {"id":"abcd","start":"2025-03-20T11:00:00.000Z","end":"2025-03-20T11:30:00.000Z","title":"two","checkedYes":false,"checkedNo":false},
            {"id":"xyz","start":"2025-03-20T12:00:00.000Z","end":"2025-03-20T12:30:00.000Z","title":"three","checkedYes":false,"checkedNo":false}
        ]"#;
        let store = NoteStore::load(MemoryStore::with_value(NOTES_KEY, raw), CorruptPolicy::Fail).unwrap();

        assert_eq!(store.matching_prefix("abc").len(), 1);
        assert_eq!(store.matching_prefix("ab").len(), 2);
        assert_eq!(store.matching_prefix("x")[0].title, "three");
        assert!(store.matching_prefix("q").is_empty());
    }
}
