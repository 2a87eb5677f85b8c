//! HTTP request handlers for the Daybook API.
//!
//! One real route exists: `duplicate` drives the diary duplication workflow
//! end to end. Handlers log each step, convert any workflow error into a
//! JSON 500 body, and never retry.

pub mod duplicate;

pub use duplicate::duplicate_diary;
