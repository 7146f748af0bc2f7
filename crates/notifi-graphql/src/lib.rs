//! # Notifi GraphQL
//!
//! Typed operations against the Notifi GraphQL API.
//!
//! Every operation is a zero-sized type implementing [`Operation`]: it names
//! its document, its variables and its response. [`NotifiService`] executes
//! them over a [`GraphQlTransport`] with the current session token.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod fragments;
pub mod models;
pub mod operations;
mod service;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{GqlError, GraphQlErrorEntry};
pub use fragments::{Fragment, collect_dependencies};
pub use operations::Operation;
pub use service::NotifiService;
pub use transport::{GraphQlRequest, GraphQlTransport, HttpTransport};
