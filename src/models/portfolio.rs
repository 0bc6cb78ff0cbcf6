use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::forms::{self, Validator};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PortfolioItem {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body_markdown: String,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub sort_order: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioForm {
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub body_markdown: String,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    #[serde(default, deserialize_with = "crate::forms::list_field")]
    pub tags: Vec<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i64>,
}

impl PortfolioForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        Validator::new()
            .required("Title", &self.title)
            .max_len("Title", &self.title, 200)
            .max_len("Summary", self.summary.as_deref().unwrap_or(""), 500)
            .link("Image URL", self.image_url.as_deref())
            .link("Project URL", self.project_url.as_deref())
            .finish()
    }
}

impl PortfolioItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let tags: String = row.get("tags")?;
        Ok(PortfolioItem {
            id: row.get("id")?,
            title: row.get("title")?,
            slug: row.get("slug")?,
            summary: row.get("summary")?,
            body_markdown: row.get("body_markdown")?,
            image_url: row.get("image_url")?,
            project_url: row.get("project_url")?,
            tags: serde_json::from_str(&tags).unwrap_or_default(),
            is_published: row.get::<_, i64>("is_published")? != 0,
            sort_order: row.get("sort_order")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM portfolio WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn find_by_slug(pool: &DbPool, slug: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM portfolio WHERE slug = ?1",
            params![slug],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool, published_only: bool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let sql = if published_only {
            "SELECT * FROM portfolio WHERE is_published = 1 ORDER BY sort_order, id"
        } else {
            "SELECT * FROM portfolio ORDER BY sort_order, id"
        };
        let mut stmt = match conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn published(pool: &DbPool) -> Vec<Self> {
        Self::list(pool, true)
    }

    /// Published items carrying `tag`, compared case-insensitively.
    pub fn with_tag(pool: &DbPool, tag: &str) -> Vec<Self> {
        Self::published(pool)
            .into_iter()
            .filter(|item| item.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }

    pub fn create(pool: &DbPool, form: &PortfolioForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let tags = serde_json::to_string(&form.tags).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO portfolio (title, slug, summary, body_markdown, image_url, project_url,
             tags, is_published, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                form.title.trim(),
                forms::resolve_slug(form.slug.as_deref(), &form.title),
                forms::clean_opt(&form.summary),
                form.body_markdown,
                forms::clean_opt(&form.image_url),
                forms::clean_opt(&form.project_url),
                tags,
                form.is_published.unwrap_or(false) as i32,
                form.sort_order.unwrap_or(0),
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &PortfolioForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let tags = serde_json::to_string(&form.tags).map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE portfolio SET title = ?1, slug = ?2, summary = ?3, body_markdown = ?4,
             image_url = ?5, project_url = ?6, tags = ?7, is_published = ?8, sort_order = ?9,
             updated_at = CURRENT_TIMESTAMP WHERE id = ?10",
            params![
                form.title.trim(),
                forms::resolve_slug(form.slug.as_deref(), &form.title),
                forms::clean_opt(&form.summary),
                form.body_markdown,
                forms::clean_opt(&form.image_url),
                forms::clean_opt(&form.project_url),
                tags,
                form.is_published.unwrap_or(false) as i32,
                form.sort_order.unwrap_or(0),
                id,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM portfolio WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
