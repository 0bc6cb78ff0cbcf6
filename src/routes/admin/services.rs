use rocket::serde::json::Json;
use rocket::State;
use serde_json::json;

use super::{created, done, invalid, not_found, ok, record, write_failed, ApiResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::models::service::{Service, ServiceForm};

#[get("/services")]
pub fn services_list(_admin: AdminUser, pool: &State<DbPool>) -> ApiResponse {
    record(&Service::list(pool, false))
}

#[get("/services/<id>")]
pub fn services_get(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    match Service::find_by_id(pool, id) {
        Some(s) => record(&s),
        None => not_found("Service"),
    }
}

#[post("/services", format = "json", data = "<form>")]
pub fn services_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    form: Json<ServiceForm>,
) -> ApiResponse {
    if let Err(errors) = form.validate() {
        return invalid(errors);
    }
    match Service::create(pool, &form) {
        Ok(id) => created(id),
        Err(e) => write_failed("create service", e),
    }
}

#[put("/services/<id>", format = "json", data = "<form>")]
pub fn services_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    id: i64,
    form: Json<ServiceForm>,
) -> ApiResponse {
    if Service::find_by_id(pool, id).is_none() {
        return not_found("Service");
    }
    if let Err(errors) = form.validate() {
        return invalid(errors);
    }
    match Service::update(pool, id, &form) {
        Ok(()) => ok(json!({"ok": true})),
        Err(e) => write_failed("update service", e),
    }
}

#[delete("/services/<id>")]
pub fn services_delete(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    if Service::find_by_id(pool, id).is_none() {
        return not_found("Service");
    }
    done("delete service", Service::delete(pool, id))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        services_list,
        services_get,
        services_create,
        services_update,
        services_delete,
    ]
}
