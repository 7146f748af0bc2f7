//! Terminal output and prompts.

mod output;
pub mod prompts;

pub use output::{confirmation, error, header, info, kv, success, warning, with_spinner};
