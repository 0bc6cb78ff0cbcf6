use chrono::{DateTime, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, OptionalExtension, Row};
use serde_json::{Map, Value};

use crate::db::DbPool;
use crate::theme::{self, ThemeSettings, THEME_ROW_ID};

/// Column as text. Any other storage class reads as absent so only
/// that field falls back.
fn text_column(row: &Row, column: &str) -> rusqlite::Result<Option<String>> {
    match row.get::<_, SqlValue>(column)? {
        SqlValue::Text(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Turn the stored row into the camelCase shape the normalizer reads.
/// NULL or mistyped list/scalar columns are left out so they fall back to
/// defaults; a NULL description is an explicit "no description".
fn row_to_json(row: &Row) -> rusqlite::Result<Value> {
    let mut obj = Map::new();

    let scalars = [
        ("site_title", "siteTitle"),
        ("primary_color", "primaryColor"),
        ("accent_color", "accentColor"),
        ("navigation_style", "navigationStyle"),
        ("footer_layout", "footerLayout"),
        ("footer_brand_name", "footerBrandName"),
        ("created_at", "createdAt"),
        ("updated_at", "updatedAt"),
    ];
    for (column, key) in scalars {
        if let Some(v) = text_column(row, column)? {
            obj.insert(key.to_string(), Value::String(v));
        }
    }

    match row.get::<_, SqlValue>("footer_brand_description")? {
        SqlValue::Text(s) => {
            obj.insert("footerBrandDescription".to_string(), Value::String(s));
        }
        SqlValue::Null => {
            obj.insert("footerBrandDescription".to_string(), Value::Null);
        }
        _ => {}
    }

    let lists = [
        ("footer_badges", "footerBadges"),
        ("footer_sections", "footerSections"),
        ("footer_meta_lines", "footerMetaLines"),
    ];
    for (column, key) in lists {
        let raw = text_column(row, column)?;
        if let Some(v) = raw.and_then(|s| serde_json::from_str::<Value>(&s).ok()) {
            obj.insert(key.to_string(), v);
        }
    }

    match row.get::<_, SqlValue>("footer_show_updated_at")? {
        SqlValue::Integer(flag) => {
            obj.insert("footerShowUpdatedAt".to_string(), Value::Bool(flag != 0));
        }
        // "true"/"false" text is coerced by the normalizer, anything else falls back
        SqlValue::Text(s) => {
            obj.insert("footerShowUpdatedAt".to_string(), Value::String(s));
        }
        _ => {}
    }

    Ok(Value::Object(obj))
}

impl ThemeSettings {
    /// The stored row, `Ok(None)` when it does not exist.
    /// Pool and query failures are errors, never defaults.
    pub fn find(pool: &DbPool) -> Result<Option<Self>, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let row = conn
            .query_row(
                "SELECT * FROM theme_settings WHERE id = ?1",
                params![THEME_ROW_ID],
                row_to_json,
            )
            .optional()
            .map_err(|e| e.to_string())?;
        Ok(row.map(|r| theme::from_stored(&r)))
    }

    /// Settings for rendering: the stored row, or the defaults when it is
    /// missing or unreadable. Writers use `find` instead.
    pub fn load(pool: &DbPool) -> Self {
        match Self::find(pool) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                log::warn!("theme_settings row missing, serving defaults");
                Self::default()
            }
            Err(e) => {
                log::error!("theme_settings read failed, serving defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Apply a partial update on top of the stored row and persist it.
    /// A missing row starts from the defaults; an unreadable one is an error
    /// so stored fields are never overwritten with defaults.
    pub fn apply_update(
        pool: &DbPool,
        input: &Value,
        now: DateTime<Utc>,
    ) -> Result<Self, String> {
        let current = Self::find(pool)?.unwrap_or_default();
        let next = theme::sanitize_update(input, &current, now);
        next.save(pool)?;
        Ok(next)
    }

    /// Upsert the singleton row. Concurrent saves are last-write-wins.
    pub fn save(&self, pool: &DbPool) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let badges = serde_json::to_string(&self.footer_badges).map_err(|e| e.to_string())?;
        let sections = serde_json::to_string(&self.footer_sections).map_err(|e| e.to_string())?;
        let meta_lines =
            serde_json::to_string(&self.footer_meta_lines).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO theme_settings (
                id, site_title, primary_color, accent_color, navigation_style, footer_layout,
                footer_brand_name, footer_brand_description, footer_badges, footer_sections,
                footer_meta_lines, footer_show_updated_at, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(id) DO UPDATE SET
                site_title = ?2, primary_color = ?3, accent_color = ?4,
                navigation_style = ?5, footer_layout = ?6, footer_brand_name = ?7,
                footer_brand_description = ?8, footer_badges = ?9, footer_sections = ?10,
                footer_meta_lines = ?11, footer_show_updated_at = ?12, updated_at = ?14",
            params![
                THEME_ROW_ID,
                self.site_title,
                self.primary_color,
                self.accent_color,
                self.navigation_style.as_str(),
                self.footer_layout.as_str(),
                self.footer_brand_name,
                self.footer_brand_description,
                badges,
                sections,
                meta_lines,
                self.footer_show_updated_at as i64,
                self.created_at.to_rfc3339(),
                self.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}
