//! Interactive prompts backed by dialoguer.

use anyhow::Result;
use chrono::{DateTime, Utc};
use dialoguer::{Confirm, Input};
use owo_colors::OwoColorize;
use slotnote_core::prompt::TitlePrompt;
use slotnote_core::{Slot, SlotnoteError, SlotnoteResult};

use crate::render::render_time_range;

/// Asks for a note title on the terminal. An empty answer cancels.
pub struct TerminalTitle;

impl TitlePrompt for TerminalTitle {
    fn request_title(&mut self, slot: &Slot) -> SlotnoteResult<Option<String>> {
        let title: String = Input::new()
            .with_prompt(format!(
                "  Title for {} {} (empty to cancel)",
                slot.start().format("%a %b %-d"),
                render_time_range(slot.start(), slot.end())
            ))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| SlotnoteError::Io(std::io::Error::other(e)))?;

        Ok(Some(title))
    }
}

/// Ask for a line of text pre-filled with `initial`.
pub fn edit_text(prompt: &str, initial: &str) -> Result<String> {
    let text = Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(text)
}

pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
}

/// Prompt the user with retry on parse errors.
pub fn prompt_with_retry<F>(prompt: &str, default: Option<&str>, parse: F) -> Result<DateTime<Utc>>
where
    F: Fn(&str) -> Result<DateTime<Utc>>,
{
    loop {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        let answer = input.interact_text()?;

        match parse(&answer) {
            Ok(result) => return Ok(result),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}
