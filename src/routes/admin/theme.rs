use rocket::serde::json::Json;
use rocket::State;
use serde_json::Value;

use super::{failed, record, ApiResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::theme::ThemeSettings;

#[get("/settings/theme")]
pub fn theme_get(_admin: AdminUser, pool: &State<DbPool>) -> ApiResponse {
    record(&ThemeSettings::load(pool))
}

/// Partial update: fields left out of the body keep their stored value,
/// invalid values fall back to it. Responds with the full stored record.
#[put("/settings/theme", format = "json", data = "<body>")]
pub fn theme_update(_admin: AdminUser, pool: &State<DbPool>, body: Json<Value>) -> ApiResponse {
    match ThemeSettings::apply_update(pool, &body, chrono::Utc::now()) {
        Ok(next) => {
            log::info!("Theme settings updated");
            record(&next)
        }
        Err(e) => failed("update theme settings", e),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![theme_get, theme_update]
}
