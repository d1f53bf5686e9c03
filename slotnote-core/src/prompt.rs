//! Asking the user for a note title.

use crate::error::SlotnoteResult;
use crate::slot::Slot;

/// The blocking "enter a title" step of note creation.
///
/// `Ok(None)` means the user cancelled. Implementations may return an empty
/// string; the store treats that as cancelled too.
pub trait TitlePrompt {
    fn request_title(&mut self, slot: &Slot) -> SlotnoteResult<Option<String>>;
}

/// Answers every request with a fixed value.
pub struct FixedTitle(pub Option<String>);

impl FixedTitle {
    pub fn confirm(title: &str) -> Self {
        FixedTitle(Some(title.to_string()))
    }

    pub fn cancel() -> Self {
        FixedTitle(None)
    }
}

impl TitlePrompt for FixedTitle {
    fn request_title(&mut self, _slot: &Slot) -> SlotnoteResult<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Drop cancelled and empty answers.
pub(crate) fn confirmed_title(answer: Option<String>) -> Option<String> {
    answer.filter(|title| !title.is_empty())
}
