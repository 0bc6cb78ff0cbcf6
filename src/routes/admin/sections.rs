use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use super::{created, done, failed, invalid, not_found, ok, record, ApiResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::models::landing::{validate_patch, LandingSection, LandingSectionForm};

#[get("/sections")]
pub fn sections_list(_admin: AdminUser, pool: &State<DbPool>) -> ApiResponse {
    record(&LandingSection::list(pool))
}

#[get("/sections/<id>")]
pub fn sections_get(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    match LandingSection::find_by_id(pool, id) {
        Some(section) => record(&section),
        None => not_found("Section"),
    }
}

#[post("/sections", format = "json", data = "<form>")]
pub fn sections_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    form: Json<LandingSectionForm>,
) -> ApiResponse {
    if let Err(errors) = form.validate() {
        return invalid(errors);
    }
    let key = form.section_key.as_deref().unwrap_or("").trim();
    if LandingSection::find_by_key(pool, key).is_some() {
        return invalid(vec![format!("Section key '{}' is already in use", key)]);
    }
    match LandingSection::create(pool, &form) {
        Ok(id) => {
            log::info!("Landing section '{}' created", key);
            created(id)
        }
        Err(e) => failed("create landing section", e),
    }
}

#[put("/sections/<id>", format = "json", data = "<body>")]
pub fn sections_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    id: i64,
    body: Json<Value>,
) -> ApiResponse {
    if let Err(errors) = validate_patch(&body) {
        return invalid(errors);
    }
    match LandingSection::patch(pool, id, &body) {
        Ok(Some(section)) => record(&section),
        Ok(None) => not_found("Section"),
        Err(e) => failed("update landing section", e),
    }
}

/// Batch partial update, e.g. `[{"id": 3, "sort_order": 0}, ...]` after a drag reorder.
/// Every entry is validated and resolved before anything is written.
#[put("/sections", format = "json", data = "<body>")]
pub fn sections_batch(_admin: AdminUser, pool: &State<DbPool>, body: Json<Vec<Value>>) -> ApiResponse {
    let mut errors = Vec::new();
    let mut ids = Vec::with_capacity(body.len());
    for (i, entry) in body.iter().enumerate() {
        match entry.get("id").and_then(Value::as_i64) {
            Some(id) if LandingSection::find_by_id(pool, id).is_some() => ids.push(id),
            Some(id) => errors.push(format!("Entry {}: section {} not found", i, id)),
            None => errors.push(format!("Entry {}: id is required", i)),
        }
        if let Err(entry_errors) = validate_patch(entry) {
            errors.extend(entry_errors.into_iter().map(|e| format!("Entry {}: {}", i, e)));
        }
    }
    if !errors.is_empty() {
        return invalid(errors);
    }

    for (id, entry) in ids.iter().zip(body.iter()) {
        if let Err(e) = LandingSection::patch(pool, *id, entry) {
            return failed("batch update landing sections", e);
        }
    }
    ok(json!({"ok": true, "updated": ids.len()}))
}

#[delete("/sections/<id>")]
pub fn sections_delete(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    if LandingSection::find_by_id(pool, id).is_none() {
        return not_found("Section");
    }
    done("delete landing section", LandingSection::delete(pool, id))
}

fn moved(result: Result<bool, String>) -> ApiResponse {
    match result {
        Ok(changed) => ok(json!({"ok": true, "moved": changed})),
        Err(e) => failed("reorder landing section", e),
    }
}

#[post("/sections/<id>/move-up")]
pub fn sections_move_up(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    if LandingSection::find_by_id(pool, id).is_none() {
        return not_found("Section");
    }
    moved(LandingSection::move_up(pool, id))
}

#[post("/sections/<id>/move-down")]
pub fn sections_move_down(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    if LandingSection::find_by_id(pool, id).is_none() {
        return not_found("Section");
    }
    moved(LandingSection::move_down(pool, id))
}

#[post("/sections/<id>/toggle")]
pub fn sections_toggle(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    let Some(section) = LandingSection::find_by_id(pool, id) else {
        return not_found("Section");
    };
    let active = !section.is_active;
    match LandingSection::set_active(pool, id, active) {
        Ok(()) => ok(json!({"ok": true, "is_active": active})),
        Err(e) => failed("toggle landing section", e),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        sections_list,
        sections_get,
        sections_create,
        sections_update,
        sections_batch,
        sections_delete,
        sections_move_up,
        sections_move_down,
        sections_toggle,
    ]
}
