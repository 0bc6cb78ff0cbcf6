use rocket::serde::json::Json;
use rocket::State;
use serde_json::json;

use super::{created, done, invalid, not_found, ok, record, write_failed, ApiResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::models::portfolio::{PortfolioForm, PortfolioItem};

#[get("/portfolio")]
pub fn portfolio_list(_admin: AdminUser, pool: &State<DbPool>) -> ApiResponse {
    record(&PortfolioItem::list(pool, false))
}

#[get("/portfolio/<id>")]
pub fn portfolio_get(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    match PortfolioItem::find_by_id(pool, id) {
        Some(item) => record(&item),
        None => not_found("Portfolio item"),
    }
}

#[post("/portfolio", format = "json", data = "<form>")]
pub fn portfolio_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    form: Json<PortfolioForm>,
) -> ApiResponse {
    if let Err(errors) = form.validate() {
        return invalid(errors);
    }
    match PortfolioItem::create(pool, &form) {
        Ok(id) => created(id),
        Err(e) => write_failed("create portfolio item", e),
    }
}

#[put("/portfolio/<id>", format = "json", data = "<form>")]
pub fn portfolio_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    id: i64,
    form: Json<PortfolioForm>,
) -> ApiResponse {
    if PortfolioItem::find_by_id(pool, id).is_none() {
        return not_found("Portfolio item");
    }
    if let Err(errors) = form.validate() {
        return invalid(errors);
    }
    match PortfolioItem::update(pool, id, &form) {
        Ok(()) => ok(json!({"ok": true})),
        Err(e) => write_failed("update portfolio item", e),
    }
}

#[delete("/portfolio/<id>")]
pub fn portfolio_delete(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    if PortfolioItem::find_by_id(pool, id).is_none() {
        return not_found("Portfolio item");
    }
    done("delete portfolio item", PortfolioItem::delete(pool, id))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        portfolio_list,
        portfolio_get,
        portfolio_create,
        portfolio_update,
        portfolio_delete,
    ]
}
