use rocket::serde::json::Json;
use rocket::State;

use super::{created, done, invalid, not_found, record, write_failed, ApiResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::models::download::{Download, DownloadForm};

#[get("/downloads")]
pub fn downloads_list(_admin: AdminUser, pool: &State<DbPool>) -> ApiResponse {
    record(&Download::list(pool))
}

#[get("/downloads/<id>")]
pub fn downloads_get(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    match Download::find_by_id(pool, id) {
        Some(d) => record(&d),
        None => not_found("Download"),
    }
}

#[post("/downloads", format = "json", data = "<form>")]
pub fn downloads_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    form: Json<DownloadForm>,
) -> ApiResponse {
    if let Err(errors) = form.validate() {
        return invalid(errors);
    }
    match Download::create(pool, &form) {
        Ok(id) => {
            log::info!("Download '{}' {} published", form.name.trim(), form.version.trim());
            created(id)
        }
        Err(e) => write_failed("create download", e),
    }
}

/// Responds with the stored record so the client sees the new changelog digest.
#[put("/downloads/<id>", format = "json", data = "<form>")]
pub fn downloads_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    id: i64,
    form: Json<DownloadForm>,
) -> ApiResponse {
    if Download::find_by_id(pool, id).is_none() {
        return not_found("Download");
    }
    if let Err(errors) = form.validate() {
        return invalid(errors);
    }
    if let Err(e) = Download::update(pool, id, &form) {
        return write_failed("update download", e);
    }
    match Download::find_by_id(pool, id) {
        Some(d) => record(&d),
        None => not_found("Download"),
    }
}

#[delete("/downloads/<id>")]
pub fn downloads_delete(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    if Download::find_by_id(pool, id).is_none() {
        return not_found("Download");
    }
    done("delete download", Download::delete(pool, id))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        downloads_list,
        downloads_get,
        downloads_create,
        downloads_update,
        downloads_delete,
    ]
}
