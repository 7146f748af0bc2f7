//! Interactive prompts.

use dialoguer::{Confirm, FuzzySelect, Input, Password, theme::ColorfulTheme};
use std::fmt::Display;

/// Non-empty, trimmed text.
pub fn input(prompt: &str) -> Result<String, dialoguer::Error> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|v: &String| {
            if v.trim().is_empty() {
                Err("A value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// Hidden input for secrets.
pub fn secret(prompt: &str) -> Result<String, dialoguer::Error> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact()
}

/// Yes/no, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool, dialoguer::Error> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
}

/// Pick one of `options` by typing part of its name.
pub fn choose<T: Copy + Display>(prompt: &str, options: &[T]) -> Result<T, dialoguer::Error> {
    let index = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact()?;
    options
        .get(index)
        .copied()
        .ok_or_else(|| dialoguer::Error::IO(std::io::Error::other("no option selected")))
}
