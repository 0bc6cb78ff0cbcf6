use rocket::http::Status;
use rocket::serde::json::Json;
use serde::Serialize;
use serde_json::{json, Value};

pub mod bugs;
pub mod downloads;
pub mod news;
pub mod pages;
pub mod portfolio;
pub mod sections;
pub mod services;
pub mod theme;

/// Every admin API handler answers with a status and a JSON body.
pub type ApiResponse = (Status, Json<Value>);

pub(crate) fn ok(body: Value) -> ApiResponse {
    (Status::Ok, Json(body))
}

pub(crate) fn created(id: i64) -> ApiResponse {
    (Status::Created, Json(json!({"ok": true, "id": id})))
}

pub(crate) fn record<T: Serialize>(value: &T) -> ApiResponse {
    match serde_json::to_value(value) {
        Ok(v) => ok(v),
        Err(e) => failed("serialize record", e.to_string()),
    }
}

pub(crate) fn invalid(errors: Vec<String>) -> ApiResponse {
    (
        Status::UnprocessableEntity,
        Json(json!({"ok": false, "errors": errors})),
    )
}

pub(crate) fn not_found(what: &str) -> ApiResponse {
    (
        Status::NotFound,
        Json(json!({"ok": false, "error": format!("{} not found", what)})),
    )
}

pub(crate) fn failed(context: &str, err: String) -> ApiResponse {
    log::error!("{}: {}", context, err);
    (
        Status::InternalServerError,
        Json(json!({"ok": false, "error": err})),
    )
}

/// Write-and-acknowledge helper for handlers whose model call returns `Result<(), String>`.
pub(crate) fn done(context: &str, result: Result<(), String>) -> ApiResponse {
    match result {
        Ok(()) => ok(json!({"ok": true})),
        Err(e) => failed(context, e),
    }
}

/// Like `failed`, but a unique-index violation is the client's fault.
pub(crate) fn write_failed(context: &str, err: String) -> ApiResponse {
    if err.contains("UNIQUE constraint failed") {
        return invalid(vec!["Slug is already in use".to_string()]);
    }
    failed(context, err)
}

pub fn routes() -> Vec<rocket::Route> {
    let mut all = Vec::new();
    all.extend(theme::routes());
    all.extend(sections::routes());
    all.extend(news::routes());
    all.extend(downloads::routes());
    all.extend(portfolio::routes());
    all.extend(services::routes());
    all.extend(bugs::routes());
    all.extend(pages::routes());
    all
}
