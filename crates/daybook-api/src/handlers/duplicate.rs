//! Diary duplication handler.
//!
//! Runs the workflow in strict sequence: configuration check, client
//! construction, latest-entry query, same-day guard, block fetch, property
//! transformation, entry creation. Each remote call begins only after the
//! previous one resolved; there is no fan-out and no retry. A guard hit and
//! a successful duplication both answer 200; every failure is rendered as a
//! 500 JSON body carrying the error.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use daybook_core::{guard, transform};
use daybook_notion::NotionClient;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::server::AppState;

/// Body answered when the guard finds today's entry already present.
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    /// Human-readable outcome description.
    pub message: &'static str,
}

/// Body answered after a successful duplication.
#[derive(Debug, Serialize)]
pub struct DuplicatedResponse {
    /// Always true on this path.
    pub success: bool,
    /// Human-readable outcome description.
    pub message: &'static str,
}

/// Error body carrying the failed step's error.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Display form of the failure.
    pub error: String,
}

/// Duplicates the most recent diary entry into a new entry dated today.
///
/// Idempotent per calendar day: when the most recent entry already carries
/// today's date, no entry is created and the "already exists" body is
/// returned.
#[instrument(name = "duplicate_diary", skip(state))]
pub async fn duplicate_diary(State(state): State<AppState>) -> Response {
    let config = &state.config;

    if config.diary_database_id.is_empty() {
        error!("diary database id is not configured");
        return error_response("Database ID not configured");
    }

    let client = match NotionClient::new(config.to_client_config()) {
        Ok(client) => client,
        Err(e) => return error_response(e.to_string()),
    };

    let entry = match client.find_most_recent_entry(&config.diary_database_id).await {
        Ok(entry) => entry,
        Err(e) => return error_response(e.to_string()),
    };

    let today = Local::now().date_naive();

    if guard::written_on(&entry, today) {
        info!(entry_id = %entry.id, "diary entry for today already exists");
        return (
            StatusCode::OK,
            Json(ExistsResponse { message: "Diary entry for today already exists." }),
        )
            .into_response();
    }

    let blocks = match client.list_children(&entry.id).await {
        Ok(blocks) => blocks,
        Err(e) => return error_response(e.to_string()),
    };

    let properties = match transform::duplicate_properties(&entry.properties, today) {
        Ok(properties) => properties,
        Err(e) => {
            error!(entry_id = %entry.id, error = %e, "failed to prepare today's properties");
            return error_response(e.to_string());
        },
    };

    let created_id =
        match client.create_entry(&config.diary_database_id, &properties, &blocks).await {
            Ok(id) => id,
            Err(e) => return error_response(e.to_string()),
        };

    info!(entry_id = %created_id, "created today's diary entry");

    (
        StatusCode::OK,
        Json(DuplicatedResponse { success: true, message: "Diary entry duplicated successfully." }),
    )
        .into_response()
}

/// Renders a workflow failure as the 500 JSON body.
fn error_response(error: impl Into<String>) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: error.into() }))
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_uses_the_error_key() {
        let body = serde_json::to_value(ErrorResponse { error: "boom".to_string() })
            .expect("serialize");

        assert_eq!(body, serde_json::json!({ "error": "boom" }));
    }

    #[test]
    fn error_response_is_a_server_error() {
        let response = error_response("Database ID not configured");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn success_bodies_match_the_published_contract() {
        let exists = serde_json::to_value(ExistsResponse {
            message: "Diary entry for today already exists.",
        })
        .expect("serialize");
        assert_eq!(
            exists,
            serde_json::json!({ "message": "Diary entry for today already exists." })
        );

        let duplicated = serde_json::to_value(DuplicatedResponse {
            success: true,
            message: "Diary entry duplicated successfully.",
        })
        .expect("serialize");
        assert_eq!(
            duplicated,
            serde_json::json!({ "success": true, "message": "Diary entry duplicated successfully." })
        );
    }
}
