//! Authenticated client for the external document database (Notion).
//!
//! Wraps the three API calls the duplication workflow needs behind a typed
//! client: query the most recent diary entry, list an entry's child blocks,
//! and create a new entry. All failures map into the shared
//! [`daybook_core::DiaryError`] taxonomy.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;

pub use client::{ClientConfig, NotionClient};
