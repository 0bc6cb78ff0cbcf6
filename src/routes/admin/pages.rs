use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::json;

use super::{failed, invalid, ok, ApiResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::forms::Validator;
use crate::models::settings::Setting;

const STATEMENT_KEY: &str = "accessibility_statement";

#[derive(Debug, Deserialize)]
pub struct StatementBody {
    #[serde(default)]
    pub statement: String,
}

#[get("/settings/accessibility")]
pub fn accessibility_get(_admin: AdminUser, pool: &State<DbPool>) -> ApiResponse {
    ok(json!({"statement": Setting::get_or(pool, STATEMENT_KEY, "")}))
}

#[put("/settings/accessibility", format = "json", data = "<body>")]
pub fn accessibility_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    body: Json<StatementBody>,
) -> ApiResponse {
    if let Err(errors) = Validator::new()
        .required("Statement", &body.statement)
        .max_len("Statement", &body.statement, 20_000)
        .finish()
    {
        return invalid(errors);
    }
    match Setting::set(pool, STATEMENT_KEY, body.statement.trim()) {
        Ok(()) => ok(json!({"ok": true})),
        Err(e) => failed("save accessibility statement", e),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![accessibility_get, accessibility_update]
}
