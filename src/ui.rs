use std::io::{self, Write};

use dialoguer::{Confirm, MultiSelect};
use tracing::warn;

use crate::error::InstallError;

pub const CONFIRM_PROMPT: &str = "Do you want to proceed with the installation?";

/// Interactive backend. `None` means the user cancelled the prompt.
pub trait Prompter {
    fn multi_select(
        &mut self,
        prompt: &str,
        items: &[String],
    ) -> Result<Option<Vec<usize>>, InstallError>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, InstallError>;
}

#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn multi_select(
        &mut self,
        prompt: &str,
        items: &[String],
    ) -> Result<Option<Vec<usize>>, InstallError> {
        MultiSelect::new()
            .with_prompt(prompt)
            .items(items)
            .interact_opt()
            .map_err(|err| InstallError::Prompt(err.to_string()))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, InstallError> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact_opt()
            .map_err(|err| InstallError::Prompt(err.to_string()))
    }
}

/// Never fails: prompt errors and cancellation both yield an empty selection.
pub fn multi_select(
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
    prompt: &str,
    catalog: &[String],
) -> io::Result<Vec<String>> {
    match prompter.multi_select(prompt, catalog) {
        Ok(Some(indices)) => Ok(indices
            .into_iter()
            .filter_map(|idx| catalog.get(idx).cloned())
            .collect()),
        Ok(None) => Ok(Vec::new()),
        Err(err) => {
            warn!(prompt, error = %err, "selection failed");
            writeln!(out, "Error in selection: {err}")?;
            Ok(Vec::new())
        }
    }
}

/// Prints the summary, then asks; anything but an explicit yes is a no.
pub fn confirm(
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
    apt: &[String],
    snap: &[String],
    scripts: &[String],
) -> io::Result<bool> {
    write!(out, "{}", render_summary(apt, snap, scripts))?;
    out.flush()?;

    match prompter.confirm(CONFIRM_PROMPT, false) {
        Ok(answer) => Ok(answer.unwrap_or(false)),
        Err(err) => {
            warn!(error = %err, "confirmation failed");
            writeln!(out, "Error in confirmation: {err}")?;
            Ok(false)
        }
    }
}

pub fn render_summary(apt: &[String], snap: &[String], scripts: &[String]) -> String {
    format!(
        "\nSummary of selected items:\nAPT packages: {}\nSNAP packages: {}\nShell scripts: {}\n",
        joined_or_none(apt),
        joined_or_none(snap),
        joined_or_none(scripts)
    )
}

fn joined_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;

    use super::*;

    /// Replays canned answers; an exhausted queue behaves like a closed terminal.
    #[derive(Default)]
    pub struct ScriptedPrompter {
        pub selections: VecDeque<Result<Option<Vec<usize>>, InstallError>>,
        pub confirmations: VecDeque<Result<Option<bool>, InstallError>>,
        pub prompts: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn select(mut self, indices: &[usize]) -> Self {
            self.selections.push_back(Ok(Some(indices.to_vec())));
            self
        }

        pub fn answer(mut self, yes: bool) -> Self {
            self.confirmations.push_back(Ok(Some(yes)));
            self
        }
    }

    fn closed() -> InstallError {
        InstallError::Prompt("not a terminal".to_string())
    }

    impl Prompter for ScriptedPrompter {
        fn multi_select(
            &mut self,
            prompt: &str,
            _items: &[String],
        ) -> Result<Option<Vec<usize>>, InstallError> {
            self.prompts.push(prompt.to_string());
            self.selections.pop_front().unwrap_or_else(|| Err(closed()))
        }

        fn confirm(&mut self, prompt: &str, _default: bool) -> Result<Option<bool>, InstallError> {
            self.prompts.push(prompt.to_string());
            self.confirmations.pop_front().unwrap_or_else(|| Err(closed()))
        }
    }
}
