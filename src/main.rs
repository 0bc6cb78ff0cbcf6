#[macro_use]
extern crate rocket;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::FileServer;
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use serde_json::{json, Value};

mod auth;
mod boot;
mod config;
mod db;
mod forms;
mod models;
mod rate_limit;
mod render;
mod routes;
mod sections;
mod theme;

#[cfg(test)]
mod tests;

use config::SiteConfig;
use models::settings::Setting;
use rate_limit::RateLimiter;

/// Holds the admin URL slug, read from DB at startup.
pub struct AdminSlug(pub String);

pub struct NoCacheAdmin;

#[rocket::async_trait]
impl Fairing for NoCacheAdmin {
    fn info(&self) -> Info {
        Info { name: "No-Cache Admin Responses", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        let slug = req.rocket().state::<AdminSlug>()
            .map(|s| s.0.as_str())
            .unwrap_or("admin");
        let prefix = format!("/{}/", slug);
        let path = req.uri().path();
        if path.starts_with(&*prefix) || path == prefix.trim_end_matches('/') {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(401)]
fn unauthorized() -> Json<Value> {
    Json(json!({"ok": false, "error": "Sign in required"}))
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(422)]
fn unprocessable() -> Json<Value> {
    Json(json!({"ok": false, "errors": ["Request body is not valid JSON for this endpoint"]}))
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = SiteConfig::from_figment(&rocket::Config::figment())
        .expect("Invalid [arcane] configuration");

    if let Err(e) = boot::run(&config) {
        log::error!("{}. Aborting.", e);
        std::process::exit(1);
    }

    let pool = db::init_pool(&config.db_path).expect("Failed to initialize database pool");
    db::run_migrations(&pool).expect("Failed to run database migrations");
    db::seed_defaults(&pool).expect("Failed to seed default settings");

    match auth::cleanup_expired_sessions(&pool) {
        Ok(n) if n > 0 => log::info!("Removed {} expired session(s)", n),
        Ok(_) => {}
        Err(e) => log::warn!("Session cleanup failed: {}", e),
    }

    let admin_slug = Setting::get_or(&pool, "admin_slug", "admin");
    let admin_mount = format!("/{}", admin_slug);
    let admin_api_mount = format!("/{}/api", admin_slug);

    log::info!("Admin API mounted at: {}", admin_api_mount);

    rocket::build()
        .manage(pool)
        .manage(AdminSlug(admin_slug))
        .manage(RateLimiter::new())
        .attach(NoCacheAdmin)
        .mount("/static", FileServer::from(config.static_dir.as_str()))
        .mount("/uploads", FileServer::from(config.uploads_dir.as_str()))
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .mount(&admin_mount, routes::auth::routes())
        .mount(&admin_api_mount, routes::admin::routes())
        .register("/", catchers![unauthorized, not_found, unprocessable, server_error])
}
