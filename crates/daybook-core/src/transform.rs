//! Field-set transformation for a new diary entry.
//!
//! Clones the most recent entry's fields into a set ready to submit:
//! server-managed timestamps are stripped, the title is rewritten to a
//! human-readable label for today, and the entry date moves to today. The
//! transformation is pure; schema drift in the source entry is rejected
//! rather than silently patched.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{DiaryError, Result};
use crate::models::{
    DateProperty, FieldSet, TitleProperty, CREATED_FIELD, ENTRY_DATE_FIELD, NAME_FIELD,
    UPDATED_FIELD,
};

/// Format of the rewritten entry date start value.
const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format of the rewritten title, e.g. `Monday, 03 June`.
const TITLE_FORMAT: &str = "%A, %d %B";

/// Formats the display label for a diary entry on `today`.
pub fn entry_title(today: NaiveDate) -> String {
    today.format(TITLE_FORMAT).to_string()
}

/// Builds the property set for today's entry from the most recent entry's
/// fields.
///
/// The `Created` and `Updated` fields are removed (fields already absent
/// stay absent), the first title fragment of `Name` is rewritten to the
/// formatted label in both its text content and plain-text mirror, and the
/// `Entry date` start value becomes `today` in `YYYY-MM-DD` form. All other
/// fields pass through untouched, including unrecognized sub-fields of the
/// two rewritten properties.
///
/// # Errors
///
/// Returns `DiaryError::MalformedEntry` when `Name` is missing, is not
/// title-shaped, or holds no title fragment, and when `Entry date` is
/// missing, is not date-shaped, or holds no date value. These indicate the
/// source entry's schema changed unexpectedly.
pub fn duplicate_properties(source: &FieldSet, today: NaiveDate) -> Result<FieldSet> {
    let mut fields = source.clone();

    fields.remove(CREATED_FIELD);
    fields.remove(UPDATED_FIELD);

    let name = fields
        .get(NAME_FIELD)
        .ok_or_else(|| DiaryError::malformed("entry has no Name property"))?;
    let mut title = TitleProperty::parse(name)?;
    let fragment = title
        .title
        .first_mut()
        .ok_or_else(|| DiaryError::malformed("Name property holds no title fragment"))?;
    let label = entry_title(today);
    fragment.text.content.clone_from(&label);
    fragment.plain_text = label;
    fields.insert(NAME_FIELD.to_string(), rebuild(&title)?);

    let entry_date = fields
        .get(ENTRY_DATE_FIELD)
        .ok_or_else(|| DiaryError::malformed("entry has no Entry date property"))?;
    let mut date = DateProperty::parse(entry_date)?;
    let value = date
        .date
        .as_mut()
        .ok_or_else(|| DiaryError::malformed("Entry date property holds no date value"))?;
    value.start = today.format(DATE_FORMAT).to_string();
    fields.insert(ENTRY_DATE_FIELD.to_string(), rebuild(&date)?);

    debug!(field_count = fields.len(), "prepared properties for today's entry");

    Ok(fields)
}

/// Serializes a typed property view back into its JSON form.
fn rebuild<T: serde::Serialize>(property: &T) -> Result<serde_json::Value> {
    serde_json::to_value(property)
        .map_err(|e| DiaryError::malformed(format!("failed to rebuild property: {e}")))
}
