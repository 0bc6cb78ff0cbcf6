use rocket::http::{CookieJar, Status};
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::json;

use super::admin::{failed, ok, ApiResponse};
use crate::auth::{self, ClientIp};
use crate::db::DbPool;
use crate::models::settings::Setting;
use crate::rate_limit::{RateLimiter, WINDOW};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn rejected(status: Status, message: &str) -> ApiResponse {
    (status, Json(json!({"ok": false, "error": message})))
}

#[post("/login", format = "json", data = "<form>")]
pub fn login_submit(
    form: Json<LoginForm>,
    pool: &State<DbPool>,
    limiter: &State<RateLimiter>,
    client: ClientIp,
    cookies: &CookieJar<'_>,
) -> ApiResponse {
    limiter.cleanup(WINDOW);
    let rate_key = format!("login:{}", client.0);
    let max_attempts = Setting::get_i64_or(pool, "login_rate_limit", 5).max(1) as u64;

    if !limiter.check_and_record(&rate_key, max_attempts, WINDOW) {
        log::warn!("Login rate limit hit");
        return rejected(
            Status::TooManyRequests,
            "Too many login attempts. Please try again in 15 minutes.",
        );
    }

    let admin_email = Setting::get_or(pool, "admin_email", "");
    let stored_hash = Setting::get(pool, "admin_password_hash").unwrap_or_default();

    if !form.email.trim().eq_ignore_ascii_case(&admin_email)
        || !auth::verify_password(&form.password, &stored_hash)
    {
        let remaining = limiter.remaining(&rate_key, max_attempts, WINDOW);
        return (
            Status::Unauthorized,
            Json(json!({"ok": false, "error": "Invalid credentials", "remaining": remaining})),
        );
    }

    if let Err(e) = auth::cleanup_expired_sessions(pool) {
        log::warn!("Session cleanup failed: {}", e);
    }
    match auth::create_session(pool, Some(&client.0)) {
        Ok(session_id) => {
            auth::set_session_cookie(cookies, &session_id);
            limiter.reset(&rate_key);
            log::info!("Admin signed in");
            ok(json!({"ok": true}))
        }
        Err(e) => failed("create session", e),
    }
}

#[post("/logout")]
pub fn logout(pool: &State<DbPool>, cookies: &CookieJar<'_>) -> ApiResponse {
    if let Some(session_id) = auth::session_id(cookies) {
        if let Err(e) = auth::destroy_session(pool, &session_id) {
            log::warn!("Session delete failed: {}", e);
        }
    }
    auth::clear_session_cookie(cookies);
    ok(json!({"ok": true}))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login_submit, logout]
}
