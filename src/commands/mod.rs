pub mod delete;
pub mod edit;
pub mod list;
pub mod mark;
pub mod new;
pub mod view;

use std::path::PathBuf;

use anyhow::{Context, Result};
use slotnote_core::NoteStore;
use slotnote_core::storage::FileStore;

use crate::config::Config;
use crate::render::short_id;

/// Everything a command needs: the loaded config and the opened store.
pub struct Session {
    pub config: Config,
    pub store: NoteStore<FileStore>,
}

impl Session {
    /// Open the note store in `data_dir` (or the configured directory).
    pub fn open(config: Config, data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(|| config.data_path());
        tracing::debug!(dir = %dir.display(), "opening note store");

        let store = NoteStore::open(FileStore::new(&dir), config.on_corrupt)
            .with_context(|| format!("Failed to open notes in {}", dir.display()))?;

        Ok(Session { config, store })
    }

    /// Find the id of the note whose id starts with `prefix`.
    pub fn resolve_id(&self, prefix: &str) -> Result<String> {
        let matches = self.store.matching_prefix(prefix);

        match matches.as_slice() {
            [note] => Ok(note.id.clone()),
            [] => anyhow::bail!("No note with id '{}'", prefix),
            many => {
                let candidates: Vec<String> = many
                    .iter()
                    .map(|n| format!("{} ({})", short_id(&n.id, prefix.len() + 4), n.title))
                    .collect();
                anyhow::bail!(
                    "Id '{}' is ambiguous. Candidates: {}",
                    prefix,
                    candidates.join(", ")
                )
            }
        }
    }
}
