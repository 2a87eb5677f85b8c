//! Same-day duplicate detection.
//!
//! The guard is pure: it inspects an entry's date property and compares it
//! to a caller-supplied calendar date. A missing, mistyped, or empty date
//! property logs a validation warning and counts as "no entry for today"
//! rather than failing the workflow. Callers supply `today` so the check is
//! deterministic under test; the HTTP handler passes the local calendar
//! date.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;

use crate::models::{DiaryEntry, ENTRY_DATE_FIELD};

/// Returns true when `entry` was written on `today`.
///
/// Comparison is at calendar-day granularity: a start value carrying a time
/// component (`2024-06-03T09:30:00.000+02:00`) matches the date 2024-06-03.
pub fn written_on(entry: &DiaryEntry, today: NaiveDate) -> bool {
    let Some(property) = entry.properties.get(ENTRY_DATE_FIELD) else {
        warn!(entry_id = %entry.id, "entry has no Entry date property");
        return false;
    };

    if property.get("type").and_then(Value::as_str) != Some("date") {
        warn!(entry_id = %entry.id, "Entry date is not a date property");
        return false;
    }

    let Some(start) =
        property.get("date").and_then(|date| date.get("start")).and_then(Value::as_str)
    else {
        warn!(entry_id = %entry.id, "Entry date has no start value");
        return false;
    };

    match start_date(start) {
        Some(date) => date == today,
        None => {
            warn!(entry_id = %entry.id, start, "Entry date start value is not a date");
            false
        },
    }
}

/// Extracts the calendar date from a start value, which is either a plain
/// `YYYY-MM-DD` date or a full RFC 3339 timestamp.
fn start_date(start: &str) -> Option<NaiveDate> {
    let date_part = start.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::FieldSet;

    fn entry_with_date(value: Value) -> DiaryEntry {
        let mut properties = FieldSet::new();
        properties.insert(ENTRY_DATE_FIELD.to_string(), value);
        DiaryEntry { id: "entry-1".to_string(), properties }
    }

    fn date_property(start: &str) -> Value {
        json!({ "id": "d", "type": "date", "date": { "start": start, "end": null } })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date")
    }

    #[test]
    fn matches_plain_date_for_today() {
        let entry = entry_with_date(date_property("2024-06-03"));
        assert!(written_on(&entry, today()));
    }

    #[test]
    fn matches_datetime_on_the_same_day() {
        let entry = entry_with_date(date_property("2024-06-03T09:30:00.000+02:00"));
        assert!(written_on(&entry, today()));
    }

    #[test]
    fn rejects_other_days() {
        let entry = entry_with_date(date_property("2024-06-02"));
        assert!(!written_on(&entry, today()));

        let entry = entry_with_date(date_property("2023-06-03"));
        assert!(!written_on(&entry, today()));
    }

    #[test]
    fn missing_property_is_not_a_match() {
        let entry = DiaryEntry { id: "entry-1".to_string(), properties: FieldSet::new() };
        assert!(!written_on(&entry, today()));
    }

    #[test]
    fn non_date_property_is_not_a_match() {
        let entry = entry_with_date(json!({ "id": "x", "type": "checkbox", "checkbox": true }));
        assert!(!written_on(&entry, today()));
    }

    #[test]
    fn empty_date_value_is_not_a_match() {
        let entry = entry_with_date(json!({ "id": "d", "type": "date", "date": null }));
        assert!(!written_on(&entry, today()));
    }

    #[test]
    fn unparseable_start_is_not_a_match() {
        let entry = entry_with_date(date_property("last tuesday"));
        assert!(!written_on(&entry, today()));

        let entry = entry_with_date(date_property(""));
        assert!(!written_on(&entry, today()));
    }
}
