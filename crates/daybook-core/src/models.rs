//! Typed views of diary entry data.
//!
//! A diary entry is one page in the external document database: an id plus a
//! property bag keyed by field name. The service only rewrites two
//! properties ("Name" and "Entry date"), so only those get typed views;
//! every other field is carried as opaque JSON. Each view keeps a flattened
//! `extra` map so fields this service does not understand survive a
//! parse, mutate, serialize round trip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DiaryError, Result};

/// Property holding the entry title.
pub const NAME_FIELD: &str = "Name";
/// Property holding the entry date.
pub const ENTRY_DATE_FIELD: &str = "Entry date";
/// Server-managed creation timestamp, rejected on create.
pub const CREATED_FIELD: &str = "Created";
/// Server-managed update timestamp, rejected on create.
pub const UPDATED_FIELD: &str = "Updated";

/// Named-field property bag attached to a diary entry.
pub type FieldSet = Map<String, Value>;

/// One unit of an entry's body content, opaque to this service.
///
/// Blocks are copied verbatim onto the new entry in the order they were
/// fetched and never interpreted.
pub type ContentBlock = Value;

/// A single record in the external work-diary database.
///
/// Entries are read-only to this service: the workflow reads the most
/// recent one, clones its fields, and creates a brand-new entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DiaryEntry {
    /// Unique identifier assigned by the database.
    pub id: String,
    /// Mapping of field name to property value.
    #[serde(default)]
    pub properties: FieldSet,
}

/// A title-type property: a list of rich-text fragments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleProperty {
    /// Title fragments; the first one carries the display text.
    pub title: Vec<TitleFragment>,
    /// Fields this service does not interpret (property id, type tag, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One rich-text fragment of a title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleFragment {
    /// The underlying text content.
    pub text: TextContent,
    /// Plain-text mirror of the content.
    #[serde(default)]
    pub plain_text: String,
    /// Uninterpreted sibling fields (annotations, href, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The text payload of a rich-text fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    /// Display text.
    pub content: String,
    /// Uninterpreted sibling fields (link, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A date-type property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateProperty {
    /// The date value; `None` when the property is empty.
    pub date: Option<DateValue>,
    /// Uninterpreted sibling fields (property id, type tag, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The value of a date property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateValue {
    /// Start date, either `YYYY-MM-DD` or a full RFC 3339 timestamp.
    pub start: String,
    /// Uninterpreted sibling fields (end, time_zone, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TitleProperty {
    /// Parses a property value into a title view, rejecting other shapes.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::MalformedEntry` when the value's type tag names
    /// a different property kind or the value does not deserialize as a
    /// title property.
    pub fn parse(value: &Value) -> Result<Self> {
        expect_kind(value, "title")?;
        serde_json::from_value(value.clone()).map_err(|e| {
            DiaryError::malformed(format!("Name is not a valid title property: {e}"))
        })
    }
}

impl DateProperty {
    /// Parses a property value into a date view, rejecting other shapes.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::MalformedEntry` when the value's type tag names
    /// a different property kind or the value does not deserialize as a
    /// date property.
    pub fn parse(value: &Value) -> Result<Self> {
        expect_kind(value, "date")?;
        serde_json::from_value(value.clone()).map_err(|e| {
            DiaryError::malformed(format!("Entry date is not a valid date property: {e}"))
        })
    }
}

/// Rejects property values whose type tag contradicts the expected kind.
///
/// Values without a type tag are left to the serde parse, which still
/// enforces the expected structure.
fn expect_kind(value: &Value, kind: &str) -> Result<()> {
    match value.get("type").and_then(Value::as_str) {
        Some(actual) if actual != kind => Err(DiaryError::malformed(format!(
            "expected a {kind} property, found {actual}"
        ))),
        _ => Ok(()),
    }
}
