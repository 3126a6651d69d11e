//! NerdGraph entities - the polymorphic entity model, entity search and tagging.
//!
//! Operations live on [`EntitiesClient`], which runs each call through a
//! [`nerdgraph::QueryExecutor`] and reports failures as [`EntitiesError`].

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod client;
mod entity;
mod error;
mod outline;
pub mod queries;
mod search;
mod tagging;
mod types;

pub use client::{EntitiesClient, MAX_ENTITIES_PER_REQUEST};
pub use entity::*;
pub use error::{EntitiesError, Result};
pub use outline::*;
pub use search::*;
pub use tagging::*;
pub use types::*;
