use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::json;

use super::{done, failed, invalid, not_found, ok, ApiResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::models::bug_report::{BugReport, BugStatus};

#[get("/bugs?<status>")]
pub fn bugs_list(_admin: AdminUser, pool: &State<DbPool>, status: Option<String>) -> ApiResponse {
    let filter = match status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match BugStatus::parse(raw) {
            Some(s) => Some(s),
            None => return invalid(vec![format!("Unknown status '{}'", raw)]),
        },
        None => None,
    };
    ok(json!({
        "items": BugReport::list(pool, filter),
        "open": BugReport::count_by_status(pool, BugStatus::Open),
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

#[put("/bugs/<id>/status", format = "json", data = "<body>")]
pub fn bugs_set_status(
    _admin: AdminUser,
    pool: &State<DbPool>,
    id: i64,
    body: Json<StatusBody>,
) -> ApiResponse {
    let Some(status) = BugStatus::parse(&body.status) else {
        return invalid(vec![
            "Status must be open, triaged, in_progress, resolved or closed".to_string(),
        ]);
    };
    match BugReport::update_status(pool, id, status) {
        Ok(true) => ok(json!({"ok": true, "status": status.as_str()})),
        Ok(false) => not_found("Bug report"),
        Err(e) => failed("update bug status", e),
    }
}

#[delete("/bugs/<id>")]
pub fn bugs_delete(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    if BugReport::find_by_id(pool, id).is_none() {
        return not_found("Bug report");
    }
    done("delete bug report", BugReport::delete(pool, id))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![bugs_list, bugs_set_status, bugs_delete]
}
