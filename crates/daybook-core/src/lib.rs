//! Core domain model for the diary duplication service.
//!
//! Provides the typed views of diary entry data, the error taxonomy, the
//! same-day duplicate guard, and the property transformer. The API and
//! client crates depend on these foundational types; nothing in this crate
//! performs I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod guard;
pub mod models;
pub mod transform;

pub use error::{DiaryError, Result};
pub use models::{ContentBlock, DiaryEntry, FieldSet};
