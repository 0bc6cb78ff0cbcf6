use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::db::DbPool;
use crate::forms::{self, Validator};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Download {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub version: String,
    pub platforms: Vec<String>,
    pub file_url: String,
    pub file_size: Option<i64>,
    pub changelog: String,
    /// Lowercase hex SHA-256 of `changelog`, so players can verify release notes.
    pub changelog_sha256: String,
    pub is_active: bool,
    pub sort_order: i64,
    pub released_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    pub name: String,
    pub slug: Option<String>,
    pub version: String,
    #[serde(default, deserialize_with = "crate::forms::list_field")]
    pub platforms: Vec<String>,
    pub file_url: String,
    pub file_size: Option<i64>,
    #[serde(default)]
    pub changelog: String,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
    /// `YYYY-MM-DD`
    pub released_at: Option<String>,
}

impl DownloadForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        Validator::new()
            .required("Name", &self.name)
            .max_len("Name", &self.name, 120)
            .required("Version", &self.version)
            .max_len("Version", &self.version, 40)
            .required("File URL", &self.file_url)
            .link("File URL", Some(&self.file_url))
            .check(
                self.file_size.map_or(true, |s| s >= 0),
                "File size cannot be negative",
            )
            .check(
                self.released_at
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map_or(true, |s| parse_release_date(s).is_some()),
                "Release date must look like 2024-05-01",
            )
            .finish()
    }

    fn released_at(&self) -> Option<NaiveDateTime> {
        self.released_at
            .as_deref()
            .map(str::trim)
            .and_then(parse_release_date)
    }
}

fn parse_release_date(s: &str) -> Option<NaiveDateTime> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn changelog_digest(changelog: &str) -> String {
    hex::encode(Sha256::digest(changelog.as_bytes()))
}

impl Download {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let platforms: String = row.get("platforms")?;
        Ok(Download {
            id: row.get("id")?,
            name: row.get("name")?,
            slug: row.get("slug")?,
            version: row.get("version")?,
            platforms: serde_json::from_str(&platforms).unwrap_or_default(),
            file_url: row.get("file_url")?,
            file_size: row.get("file_size")?,
            changelog: row.get("changelog")?,
            changelog_sha256: row.get("changelog_sha256")?,
            is_active: row.get::<_, i64>("is_active")? != 0,
            sort_order: row.get("sort_order")?,
            released_at: row.get("released_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM downloads WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    fn query(pool: &DbPool, sql: &str) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        Self::query(pool, "SELECT * FROM downloads ORDER BY sort_order, id")
    }

    pub fn list_active(pool: &DbPool) -> Vec<Self> {
        Self::query(
            pool,
            "SELECT * FROM downloads WHERE is_active = 1 ORDER BY sort_order, id",
        )
    }

    pub fn create(pool: &DbPool, form: &DownloadForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let platforms = serde_json::to_string(&form.platforms).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO downloads (name, slug, version, platforms, file_url, file_size,
             changelog, changelog_sha256, is_active, sort_order, released_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                form.name.trim(),
                forms::resolve_slug(form.slug.as_deref(), &form.name),
                form.version.trim(),
                platforms,
                form.file_url.trim(),
                form.file_size,
                form.changelog,
                changelog_digest(&form.changelog),
                form.is_active.unwrap_or(true) as i32,
                form.sort_order.unwrap_or(0),
                form.released_at(),
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &DownloadForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let platforms = serde_json::to_string(&form.platforms).map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE downloads SET name = ?1, slug = ?2, version = ?3, platforms = ?4,
             file_url = ?5, file_size = ?6, changelog = ?7, changelog_sha256 = ?8,
             is_active = ?9, sort_order = ?10, released_at = ?11,
             updated_at = CURRENT_TIMESTAMP WHERE id = ?12",
            params![
                form.name.trim(),
                forms::resolve_slug(form.slug.as_deref(), &form.name),
                form.version.trim(),
                platforms,
                form.file_url.trim(),
                form.file_size,
                form.changelog,
                changelog_digest(&form.changelog),
                form.is_active.unwrap_or(true) as i32,
                form.sort_order.unwrap_or(0),
                form.released_at(),
                id,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM downloads WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Human readable size for the downloads page.
    pub fn size_label(&self) -> Option<String> {
        let bytes = self.file_size? as f64;
        let label = if bytes >= 1024.0 * 1024.0 * 1024.0 {
            format!("{:.1} GB", bytes / (1024.0 * 1024.0 * 1024.0))
        } else if bytes >= 1024.0 * 1024.0 {
            format!("{:.1} MB", bytes / (1024.0 * 1024.0))
        } else if bytes >= 1024.0 {
            format!("{:.0} KB", bytes / 1024.0)
        } else {
            format!("{} B", bytes as i64)
        };
        Some(label)
    }
}
