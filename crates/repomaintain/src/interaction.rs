use dialoguer::{Confirm, Input, MultiSelect, Select};
use repomaintain_operations::traits::InteractionProvider;
use repomaintain_operations::{OperationError, Result};

/// Prompts the user on the terminal via dialoguer.
///
/// Escape on a prompt maps to `None`, which the operations treat as a
/// cancellation of that prompt.
pub struct TerminalInteraction;

impl InteractionProvider for TerminalInteraction {
    fn confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact_opt()
            .map_err(prompt_error)
    }

    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)
    }

    fn multi_select(&self, prompt: &str, items: &[String]) -> Result<Option<Vec<usize>>> {
        MultiSelect::new()
            .with_prompt(prompt)
            .items(items)
            .interact_opt()
            .map_err(prompt_error)
    }

    fn input(&self, prompt: &str) -> Result<Option<String>> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map(Some)
            .map_err(prompt_error)
    }
}

fn prompt_error(e: dialoguer::Error) -> OperationError {
    match e {
        dialoguer::Error::IO(source) => OperationError::Prompt(source),
    }
}
