//! Core of slotnote: notes on calendar slots.
//!
//! - `note`, `slot`: the data model
//! - `store`: the note list, its mutations and persistence
//! - `storage`: the key-value string store the list is saved to
//! - `view`: per-note widget state and the calendar controller
//! - `prompt`: the title request made when a slot is selected

pub mod error;
pub mod id;
pub mod note;
pub mod prompt;
pub mod slot;
pub mod storage;
pub mod store;
pub mod view;

pub use error::{SlotnoteError, SlotnoteResult};
pub use note::{Disposition, Flag, Note};
pub use slot::Slot;
pub use store::{CorruptPolicy, NoteStore};
