use chrono::{Duration, NaiveDateTime, Utc};
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use rusqlite::{params, Row};
use sha2::{Digest, Sha256};

use crate::db::DbPool;
use crate::models::settings::Setting;

const SESSION_COOKIE: &str = "arcanepixels_session";

/// Guard for admin routes: a live session issued to this client address.
pub struct AdminUser;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let pool = match request.guard::<&State<DbPool>>().await {
            Outcome::Success(p) => p,
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };
        let client = match request.guard::<ClientIp>().await {
            Outcome::Success(c) => c,
            _ => return Outcome::Error((Status::Unauthorized, ())),
        };

        let cookies = request.cookies();
        let Some(session_id) = session_id(cookies) else {
            return Outcome::Error((Status::Unauthorized, ()));
        };

        if validate_session(pool, &session_id, &client.0) {
            Outcome::Success(AdminUser)
        } else {
            clear_session_cookie(cookies);
            Outcome::Error((Status::Unauthorized, ()))
        }
    }
}

/// Hashed client address, used for rate limiting and session bookkeeping.
/// Raw addresses are never stored.
pub struct ClientIp(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let ip = request
            .client_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Outcome::Success(ClientIp(hash_ip(&ip)))
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| e.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// A row of the `sessions` table.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub ip_hash: Option<String>,
}

impl Session {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Session {
            id: row.get("id")?,
            created_at: row.get("created_at")?,
            expires_at: row.get("expires_at")?,
            ip_hash: row.get("ip_hash")?,
        })
    }

    pub fn find(pool: &DbPool, id: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM sessions WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    /// Sessions only authenticate the address they were issued to.
    /// Rows without an address accept any client.
    pub fn issued_to(&self, ip_hash: &str) -> bool {
        self.ip_hash.as_deref().map_or(true, |h| h == ip_hash)
    }

    pub fn is_live(&self, now: NaiveDateTime) -> bool {
        self.expires_at > now
    }
}

/// Start a session. Signing in again from the same address replaces the
/// earlier session for it.
pub fn create_session(pool: &DbPool, ip_hash: Option<&str>) -> Result<String, String> {
    let expiry_hours = Setting::get_i64_or(pool, "session_expiry_hours", 24).max(1);
    let conn = pool.get().map_err(|e| e.to_string())?;

    if let Some(hash) = ip_hash {
        conn.execute("DELETE FROM sessions WHERE ip_hash = ?1", params![hash])
            .map_err(|e| e.to_string())?;
    }

    let session_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().naive_utc();
    conn.execute(
        "INSERT INTO sessions (id, created_at, expires_at, ip_hash) VALUES (?1, ?2, ?3, ?4)",
        params![session_id, now, now + Duration::hours(expiry_hours), ip_hash],
    )
    .map_err(|e| e.to_string())?;

    Ok(session_id)
}

pub fn validate_session(pool: &DbPool, session_id: &str, ip_hash: &str) -> bool {
    let now = Utc::now().naive_utc();
    Session::find(pool, session_id)
        .is_some_and(|s| s.is_live(now) && s.issued_to(ip_hash))
}

pub fn destroy_session(pool: &DbPool, session_id: &str) -> Result<(), String> {
    let conn = pool.get().map_err(|e| e.to_string())?;
    conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])
        .map_err(|e| e.to_string())?;
    Ok(())
}

pub fn session_id(cookies: &CookieJar<'_>) -> Option<String> {
    cookies
        .get_private(SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

pub fn set_session_cookie(cookies: &CookieJar<'_>, session_id: &str) {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id.to_string());
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookies.add_private(cookie);
}

pub fn clear_session_cookie(cookies: &CookieJar<'_>) {
    cookies.remove_private(Cookie::from(SESSION_COOKIE));
}

pub fn hash_ip(ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns the number of sessions removed.
pub fn cleanup_expired_sessions(pool: &DbPool) -> Result<usize, String> {
    let conn = pool.get().map_err(|e| e.to_string())?;
    let now = Utc::now().naive_utc();
    conn.execute("DELETE FROM sessions WHERE expires_at < ?1", params![now])
        .map_err(|e| e.to_string())
}
