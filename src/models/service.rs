use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::forms::{self, Validator};

/// A studio offering shown on /services.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub icon: Option<String>,
    pub features: Vec<String>,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ServiceForm {
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "crate::forms::list_field")]
    pub features: Vec<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}

impl ServiceForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        Validator::new()
            .required("Title", &self.title)
            .max_len("Title", &self.title, 120)
            .max_len("Icon", self.icon.as_deref().unwrap_or(""), 64)
            .check(self.features.len() <= 20, "A service can list at most 20 features")
            .finish()
    }
}

impl Service {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let features: String = row.get("features")?;
        Ok(Service {
            id: row.get("id")?,
            title: row.get("title")?,
            slug: row.get("slug")?,
            summary: row.get("summary")?,
            icon: row.get("icon")?,
            features: serde_json::from_str(&features).unwrap_or_default(),
            is_active: row.get::<_, i64>("is_active")? != 0,
            sort_order: row.get("sort_order")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM services WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool, active_only: bool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let sql = if active_only {
            "SELECT * FROM services WHERE is_active = 1 ORDER BY sort_order, id"
        } else {
            "SELECT * FROM services ORDER BY sort_order, id"
        };
        let mut stmt = match conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn list_active(pool: &DbPool) -> Vec<Self> {
        Self::list(pool, true)
    }

    pub fn create(pool: &DbPool, form: &ServiceForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let features = serde_json::to_string(&form.features).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO services (title, slug, summary, icon, features, is_active, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                form.title.trim(),
                forms::resolve_slug(form.slug.as_deref(), &form.title),
                forms::clean_opt(&form.summary),
                forms::clean_opt(&form.icon),
                features,
                form.is_active.unwrap_or(true) as i32,
                form.sort_order.unwrap_or(0),
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &ServiceForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let features = serde_json::to_string(&form.features).map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE services SET title = ?1, slug = ?2, summary = ?3, icon = ?4, features = ?5,
             is_active = ?6, sort_order = ?7, updated_at = CURRENT_TIMESTAMP WHERE id = ?8",
            params![
                form.title.trim(),
                forms::resolve_slug(form.slug.as_deref(), &form.title),
                forms::clean_opt(&form.summary),
                forms::clean_opt(&form.icon),
                features,
                form.is_active.unwrap_or(true) as i32,
                form.sort_order.unwrap_or(0),
                id,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM services WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
