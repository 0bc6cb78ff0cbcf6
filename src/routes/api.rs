use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use crate::auth::ClientIp;
use crate::db::DbPool;
use crate::models::bug_report::{BugReport, BugReportForm};
use crate::models::landing::LandingSection;
use crate::models::settings::Setting;
use crate::rate_limit::{RateLimiter, WINDOW};
use crate::theme::ThemeSettings;

/// Normalized theme settings for client-side rendering.
#[get("/theme")]
pub fn theme(pool: &State<DbPool>) -> Json<Value> {
    Json(serde_json::to_value(ThemeSettings::load(pool)).unwrap_or_default())
}

#[get("/sections")]
pub fn sections(pool: &State<DbPool>) -> Json<Value> {
    Json(serde_json::to_value(LandingSection::list_active(pool)).unwrap_or_default())
}

#[post("/bugs", format = "json", data = "<form>")]
pub fn bug_submit(
    form: Json<BugReportForm>,
    pool: &State<DbPool>,
    limiter: &State<RateLimiter>,
    client: ClientIp,
) -> (Status, Json<Value>) {
    limiter.cleanup(WINDOW);
    let max = Setting::get_i64_or(pool, "bug_report_rate_limit", 3).max(1) as u64;
    if !limiter.check_and_record(&format!("bug:{}", client.0), max, WINDOW) {
        return (
            Status::TooManyRequests,
            Json(json!({"ok": false, "error": "Too many reports. Please try again later."})),
        );
    }

    if let Err(errors) = form.validate() {
        return (
            Status::UnprocessableEntity,
            Json(json!({"ok": false, "errors": errors})),
        );
    }

    match BugReport::create(pool, &form) {
        Ok(id) => {
            log::info!("Bug report {} submitted", id);
            (Status::Created, Json(json!({"ok": true, "id": id})))
        }
        Err(e) => {
            log::error!("Bug report insert failed: {}", e);
            (
                Status::InternalServerError,
                Json(json!({"ok": false, "error": "Could not save the report"})),
            )
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![theme, sections, bug_submit]
}
