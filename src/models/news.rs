use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::forms::{self, Validator};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewsPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body_markdown: String,
    pub status: String,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewsForm {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub body_markdown: String,
    pub status: Option<String>,
    /// `YYYY-MM-DDTHH:MM`, as sent by a datetime-local input.
    pub published_at: Option<String>,
}

const STATUSES: &[&str] = &["draft", "published"];

impl NewsForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        Validator::new()
            .required("Title", &self.title)
            .max_len("Title", &self.title, 200)
            .max_len("Excerpt", self.excerpt.as_deref().unwrap_or(""), 500)
            .check(
                self.status.as_deref().map_or(true, |s| STATUSES.contains(&s)),
                "Status must be draft or published",
            )
            .check(
                self.published_at
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map_or(true, |s| parse_local(s).is_some()),
                "Publish date must look like 2024-05-01T09:30",
            )
            .finish()
    }

    fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("draft")
    }

    /// Published posts without an explicit date are stamped now.
    fn resolved_published_at(&self) -> Option<NaiveDateTime> {
        let explicit = self
            .published_at
            .as_deref()
            .map(str::trim)
            .and_then(parse_local);
        match (self.status(), explicit) {
            (_, Some(dt)) => Some(dt),
            ("published", None) => Some(chrono::Utc::now().naive_utc()),
            _ => None,
        }
    }
}

fn parse_local(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Row offset of a 1-based page. Pages past what `i64` can address clamp
/// to `i64::MAX`, which simply reads as an empty page.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    page.max(1).saturating_sub(1).saturating_mul(per_page.max(0))
}

impl NewsPost {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(NewsPost {
            id: row.get("id")?,
            title: row.get("title")?,
            slug: row.get("slug")?,
            excerpt: row.get("excerpt")?,
            body_markdown: row.get("body_markdown")?,
            status: row.get("status")?,
            published_at: row.get("published_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM news WHERE id = ?1", params![id], Self::from_row)
            .ok()
    }

    pub fn find_by_slug(pool: &DbPool, slug: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM news WHERE slug = ?1",
            params![slug],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool, status: Option<&str>, limit: i64, offset: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let (sql, params_vec): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match status {
            Some(s) => (
                "SELECT * FROM news WHERE status = ?1
                 ORDER BY COALESCE(published_at, created_at) DESC LIMIT ?2 OFFSET ?3",
                vec![Box::new(s.to_string()), Box::new(limit), Box::new(offset)],
            ),
            None => (
                "SELECT * FROM news ORDER BY COALESCE(published_at, created_at) DESC LIMIT ?1 OFFSET ?2",
                vec![Box::new(limit), Box::new(offset)],
            ),
        };
        let mut stmt = match conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        stmt.query_map(params_refs.as_slice(), Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    /// Published posts whose publish date has passed, newest first.
    pub fn published(pool: &DbPool, limit: i64, offset: i64) -> Vec<Self> {
        let now = chrono::Utc::now().naive_utc();
        Self::list(pool, Some("published"), limit, offset)
            .into_iter()
            .filter(|p| p.published_at.map_or(true, |at| at <= now))
            .collect()
    }

    pub fn count(pool: &DbPool, status: Option<&str>) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        match status {
            Some(s) => conn.query_row(
                "SELECT COUNT(*) FROM news WHERE status = ?1",
                params![s],
                |row| row.get(0),
            ),
            None => conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0)),
        }
        .unwrap_or(0)
    }

    pub fn is_visible(&self) -> bool {
        self.status == "published"
            && self
                .published_at
                .map_or(true, |at| at <= chrono::Utc::now().naive_utc())
    }

    pub fn create(pool: &DbPool, form: &NewsForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO news (title, slug, excerpt, body_markdown, status, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                form.title.trim(),
                forms::resolve_slug(form.slug.as_deref(), &form.title),
                forms::clean_opt(&form.excerpt),
                form.body_markdown,
                form.status(),
                form.resolved_published_at(),
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &NewsForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE news SET title = ?1, slug = ?2, excerpt = ?3, body_markdown = ?4,
             status = ?5, published_at = ?6, updated_at = CURRENT_TIMESTAMP WHERE id = ?7",
            params![
                form.title.trim(),
                forms::resolve_slug(form.slug.as_deref(), &form.title),
                forms::clean_opt(&form.excerpt),
                form.body_markdown,
                form.status(),
                form.resolved_published_at(),
                id,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM news WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(-5, 10), 0);
        assert_eq!(page_offset(i64::MAX, 10), i64::MAX);
    }
}
