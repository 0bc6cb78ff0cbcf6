use rocket::serde::json::Json;
use rocket::State;
use serde_json::json;

use super::{created, done, invalid, not_found, ok, record, write_failed, ApiResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::models::news::{page_offset, NewsForm, NewsPost};

#[get("/news?<status>&<page>")]
pub fn news_list(
    _admin: AdminUser,
    pool: &State<DbPool>,
    status: Option<String>,
    page: Option<i64>,
) -> ApiResponse {
    let per_page = 25;
    let page = page.unwrap_or(1).max(1);
    let status = status.as_deref().filter(|s| !s.is_empty());
    let posts = NewsPost::list(pool, status, per_page, page_offset(page, per_page));
    ok(json!({
        "items": posts,
        "total": NewsPost::count(pool, status),
        "page": page,
    }))
}

#[get("/news/<id>")]
pub fn news_get(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    match NewsPost::find_by_id(pool, id) {
        Some(post) => record(&post),
        None => not_found("News post"),
    }
}

#[post("/news", format = "json", data = "<form>")]
pub fn news_create(_admin: AdminUser, pool: &State<DbPool>, form: Json<NewsForm>) -> ApiResponse {
    if let Err(errors) = form.validate() {
        return invalid(errors);
    }
    match NewsPost::create(pool, &form) {
        Ok(id) => created(id),
        Err(e) => write_failed("create news post", e),
    }
}

#[put("/news/<id>", format = "json", data = "<form>")]
pub fn news_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    id: i64,
    form: Json<NewsForm>,
) -> ApiResponse {
    if NewsPost::find_by_id(pool, id).is_none() {
        return not_found("News post");
    }
    if let Err(errors) = form.validate() {
        return invalid(errors);
    }
    match NewsPost::update(pool, id, &form) {
        Ok(()) => ok(json!({"ok": true})),
        Err(e) => write_failed("update news post", e),
    }
}

#[delete("/news/<id>")]
pub fn news_delete(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> ApiResponse {
    if NewsPost::find_by_id(pool, id).is_none() {
        return not_found("News post");
    }
    done("delete news post", NewsPost::delete(pool, id))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![news_list, news_get, news_create, news_update, news_delete]
}
