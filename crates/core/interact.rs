use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use eyre::{eyre, Context, Result};
use log::warn;
use shelfscan::interact::{Notice, Notifier, Prompter};

/// Prints notices to stdout before the next prompt is shown.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, notice: Notice) {
        println!("{notice}");
    }
}

/// Asks for text with a dialoguer prompt, pre-filled with the suggested value.
///
/// Clearing the line cancels the prompt.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        match user_edit(message, default) {
            Ok(answer) => Some(answer).filter(|a| !a.is_empty()),
            Err(err) => {
                warn!("{err:#}");
                None
            }
        }
    }
}

/// The index of the chosen item, or `None` when the user backs out with Esc or `q`.
pub fn user_select<S: ToString>(prompt: &str, items: &[S]) -> Result<Option<usize>> {
    dialoguer::Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(0)
        .items(items)
        .interact_opt()
        .wrap_err_with(|| eyre!("User selection cancelled"))
}

pub fn user_input(prompt: &str) -> Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
        .wrap_err_with(|| eyre!("User input cancelled"))
}

/// Prompt with `initial` already typed in; an empty answer is allowed.
pub fn user_edit(prompt: &str, initial: &str) -> Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .wrap_err_with(|| eyre!("User input cancelled"))
}

pub fn user_confirm(prompt: &str, default: bool) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .wrap_err_with(|| eyre!("User confirmation cancelled"))
}
