//! Formatted output utilities.

use console::{StyledObject, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

#[derive(Clone, Copy)]
enum Mark {
    Ok,
    Fail,
    Warn,
    Note,
}

impl Mark {
    fn glyph(self) -> StyledObject<&'static str> {
        match self {
            Self::Ok => style("✓").green().bold(),
            Self::Fail => style("✗").red().bold(),
            Self::Warn => style("⚠").yellow().bold(),
            Self::Note => style("ℹ").blue().bold(),
        }
    }
}

fn line(mark: Mark, msg: &str) {
    match mark {
        Mark::Fail => eprintln!("{} {msg}", mark.glyph()),
        _ => println!("{} {msg}", mark.glyph()),
    }
}

/// Print a success line.
pub fn success(msg: &str) {
    line(Mark::Ok, msg);
}

/// Print an error line to stderr.
pub fn error(msg: &str) {
    line(Mark::Fail, msg);
}

/// Print a warning line.
pub fn warning(msg: &str) {
    line(Mark::Warn, msg);
}

/// Print an info line.
pub fn info(msg: &str) {
    line(Mark::Note, msg);
}

/// Print a section title.
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a labelled value. Leading spaces in `key` indent the line.
pub fn kv(key: &str, value: &str) {
    let label = key.trim_start();
    let indent = &key[..key.len() - label.len()];
    println!("  {indent}{} {value}", style(format!("{label}:")).bold());
}

/// A target value, flagged when the user has not confirmed it yet.
pub fn confirmation(value: &str, confirmed: bool) -> String {
    if confirmed {
        value.to_string()
    } else {
        format!("{value} {}", style("(unconfirmed)").yellow())
    }
}

/// Run `future` behind a spinner labelled `msg`.
pub async fn with_spinner<F: Future>(msg: &str, future: F) -> F::Output {
    let bar = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(template);
    }
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    let output = future.await;
    bar.finish_and_clear();
    output
}
