use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::db::DbPool;
use crate::forms::{self, Validator};
use crate::sections::{ImagePosition, SectionType};
use crate::theme::Patch;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LandingSection {
    pub id: i64,
    pub section_key: String,
    pub section_type: String,
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    pub description: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub secondary_cta_label: Option<String>,
    pub secondary_cta_url: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub image_position: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub content: Value,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Default)]
pub struct LandingSectionForm {
    pub section_key: Option<String>,
    pub section_type: Option<String>,
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    pub description: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub secondary_cta_label: Option<String>,
    pub secondary_cta_url: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub image_position: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub content: Option<Value>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}

fn valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn known_type(raw: &str) -> bool {
    !matches!(SectionType::parse(raw), SectionType::Unknown(_))
}

impl LandingSectionForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let key = self.section_key.as_deref().unwrap_or("").trim();
        let kind = self.section_type.as_deref().unwrap_or("").trim();
        Validator::new()
            .required("Section key", key)
            .check(
                key.is_empty() || valid_key(key),
                "Section key may only contain lowercase letters, digits, '-' and '_'",
            )
            .max_len("Section key", key, 64)
            .check(known_type(kind), "Section type is not recognised")
            .check(
                self.image_position
                    .as_deref()
                    .map_or(true, |p| p.trim().is_empty() || ImagePosition::parse(p).is_some()),
                "Image position must be left, right, top, bottom or background",
            )
            .check(
                self.content.as_ref().map_or(true, Value::is_object),
                "Content must be a JSON object",
            )
            .link("CTA URL", self.cta_url.as_deref())
            .link("Secondary CTA URL", self.secondary_cta_url.as_deref())
            .finish()
    }
}

/// Validate a partial update body before it reaches `LandingSection::patch`.
pub fn validate_patch(input: &Value) -> Result<(), Vec<String>> {
    let text = |key: &str| input.get(key).and_then(Value::as_str);
    let mut v = Validator::new();
    v.check(input.is_object(), "Body must be a JSON object");
    if let Some(kind) = text("section_type") {
        v.check(known_type(kind.trim()), "Section type is not recognised");
    }
    if let Some(p) = text("image_position") {
        v.check(
            p.trim().is_empty() || ImagePosition::parse(p).is_some(),
            "Image position must be left, right, top, bottom or background",
        );
    }
    if let Some(content) = input.get("content") {
        v.check(
            content.is_object() || content.is_null(),
            "Content must be a JSON object",
        );
    }
    v.link("CTA URL", text("cta_url"))
        .link("Secondary CTA URL", text("secondary_cta_url"))
        .finish()
}

fn patch_text(current: &Option<String>, patch: Patch<&Value>) -> Option<String> {
    match patch {
        Patch::Unset => current.clone(),
        Patch::Clear => None,
        Patch::Value(Value::String(s)) => forms::clean_opt(&Some(s.clone())),
        Patch::Value(_) => current.clone(),
    }
}

impl LandingSection {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let content_raw: String = row.get("content")?;
        let active_raw: i64 = row.get("is_active")?;
        Ok(LandingSection {
            id: row.get("id")?,
            section_key: row.get("section_key")?,
            section_type: row.get("section_type")?,
            headline: row.get("headline")?,
            subheadline: row.get("subheadline")?,
            description: row.get("description")?,
            cta_label: row.get("cta_label")?,
            cta_url: row.get("cta_url")?,
            secondary_cta_label: row.get("secondary_cta_label")?,
            secondary_cta_url: row.get("secondary_cta_url")?,
            image_url: row.get("image_url")?,
            image_alt: row.get("image_alt")?,
            image_position: row.get("image_position")?,
            background_color: row.get("background_color")?,
            text_color: row.get("text_color")?,
            content: serde_json::from_str(&content_raw).unwrap_or_else(|_| json!({})),
            is_active: active_raw != 0,
            sort_order: row.get("sort_order")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn kind(&self) -> SectionType {
        SectionType::parse(&self.section_type)
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM landing_sections WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn find_by_key(pool: &DbPool, key: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM landing_sections WHERE section_key = ?1",
            params![key],
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

    /// All sections in display order.
    pub fn list(pool: &DbPool) -> Vec<Self> {
        Self::query(pool, "SELECT * FROM landing_sections ORDER BY sort_order, id")
    }

    pub fn list_active(pool: &DbPool) -> Vec<Self> {
        Self::query(
            pool,
            "SELECT * FROM landing_sections WHERE is_active = 1 ORDER BY sort_order, id",
        )
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM landing_sections", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn next_sort_order(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM landing_sections",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0)
    }

    pub fn create(pool: &DbPool, form: &LandingSectionForm) -> Result<i64, String> {
        let key = form.section_key.as_deref().unwrap_or("").trim().to_string();
        let kind = form
            .section_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("custom")
            .to_string();
        let content = form.content.clone().unwrap_or_else(|| json!({}));
        let sort_order = form
            .sort_order
            .unwrap_or_else(|| Self::next_sort_order(pool));

        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO landing_sections (
                section_key, section_type, headline, subheadline, description,
                cta_label, cta_url, secondary_cta_label, secondary_cta_url,
                image_url, image_alt, image_position, background_color, text_color,
                content, is_active, sort_order
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                key,
                kind,
                forms::clean_opt(&form.headline),
                forms::clean_opt(&form.subheadline),
                forms::clean_opt(&form.description),
                forms::clean_opt(&form.cta_label),
                forms::clean_opt(&form.cta_url),
                forms::clean_opt(&form.secondary_cta_label),
                forms::clean_opt(&form.secondary_cta_url),
                forms::clean_opt(&form.image_url),
                forms::clean_opt(&form.image_alt),
                forms::clean_opt(&form.image_position),
                forms::clean_opt(&form.background_color),
                forms::clean_opt(&form.text_color),
                content.to_string(),
                form.is_active.unwrap_or(true) as i64,
                sort_order,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    /// Merge a partial body over this record. `section_key` never changes;
    /// keys absent from `input` keep their value, `null` clears optional text.
    pub fn merged(&self, input: &Value) -> Self {
        let field = |key: &str| Patch::field(input, key);
        let mut next = self.clone();

        if let Some(kind) = input.get("section_type").and_then(Value::as_str) {
            if !kind.trim().is_empty() {
                next.section_type = kind.trim().to_string();
            }
        }
        next.headline = patch_text(&self.headline, field("headline"));
        next.subheadline = patch_text(&self.subheadline, field("subheadline"));
        next.description = patch_text(&self.description, field("description"));
        next.cta_label = patch_text(&self.cta_label, field("cta_label"));
        next.cta_url = patch_text(&self.cta_url, field("cta_url"));
        next.secondary_cta_label =
            patch_text(&self.secondary_cta_label, field("secondary_cta_label"));
        next.secondary_cta_url = patch_text(&self.secondary_cta_url, field("secondary_cta_url"));
        next.image_url = patch_text(&self.image_url, field("image_url"));
        next.image_alt = patch_text(&self.image_alt, field("image_alt"));
        next.image_position = patch_text(&self.image_position, field("image_position"));
        next.background_color = patch_text(&self.background_color, field("background_color"));
        next.text_color = patch_text(&self.text_color, field("text_color"));

        match field("content") {
            Patch::Clear => next.content = json!({}),
            Patch::Value(v) if v.is_object() => next.content = v.clone(),
            _ => {}
        }
        if let Some(active) = input.get("is_active").and_then(Value::as_bool) {
            next.is_active = active;
        }
        if let Some(order) = input.get("sort_order").and_then(Value::as_i64) {
            next.sort_order = order;
        }
        next
    }

    fn write(&self, pool: &DbPool) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE landing_sections SET
                section_type = ?1, headline = ?2, subheadline = ?3, description = ?4,
                cta_label = ?5, cta_url = ?6, secondary_cta_label = ?7, secondary_cta_url = ?8,
                image_url = ?9, image_alt = ?10, image_position = ?11,
                background_color = ?12, text_color = ?13, content = ?14,
                is_active = ?15, sort_order = ?16, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?17",
            params![
                self.section_type,
                self.headline,
                self.subheadline,
                self.description,
                self.cta_label,
                self.cta_url,
                self.secondary_cta_label,
                self.secondary_cta_url,
                self.image_url,
                self.image_alt,
                self.image_position,
                self.background_color,
                self.text_color,
                self.content.to_string(),
                self.is_active as i64,
                self.sort_order,
                self.id,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Apply a partial update. `Ok(None)` when the section does not exist.
    pub fn patch(pool: &DbPool, id: i64, input: &Value) -> Result<Option<Self>, String> {
        let Some(current) = Self::find_by_id(pool, id) else {
            return Ok(None);
        };
        current.merged(input).write(pool)?;
        Ok(Self::find_by_id(pool, id))
    }

    pub fn set_active(pool: &DbPool, id: i64, active: bool) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE landing_sections SET is_active = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
            params![active as i64, id],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM landing_sections WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Exchange the `sort_order` values of two sections in one transaction.
    pub fn swap_sort_order(pool: &DbPool, a: i64, b: i64) -> Result<(), String> {
        let mut conn = pool.get().map_err(|e| e.to_string())?;
        let tx = conn.transaction().map_err(|e| e.to_string())?;
        let order = |id: i64| -> Result<i64, String> {
            tx.query_row(
                "SELECT sort_order FROM landing_sections WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("landing section {} not found", id))
        };
        let (order_a, order_b) = (order(a)?, order(b)?);
        for (id, value) in [(a, order_b), (b, order_a)] {
            tx.execute(
                "UPDATE landing_sections SET sort_order = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                params![value, id],
            )
            .map_err(|e| e.to_string())?;
        }
        tx.commit().map_err(|e| e.to_string())
    }

    /// Swap with the previous (`up`) or next neighbour in display order.
    /// Returns `false` when there is no neighbour in that direction.
    fn shift(pool: &DbPool, id: i64, up: bool) -> Result<bool, String> {
        let all = Self::list(pool);
        let Some(pos) = all.iter().position(|s| s.id == id) else {
            return Err(format!("landing section {} not found", id));
        };
        let neighbour = if up {
            pos.checked_sub(1).and_then(|i| all.get(i))
        } else {
            all.get(pos + 1)
        };
        let Some(neighbour) = neighbour else {
            return Ok(false);
        };

        let current = &all[pos];
        if current.sort_order != neighbour.sort_order {
            Self::swap_sort_order(pool, current.id, neighbour.id)?;
        } else {
            // Equal orders fall back to id order; nudge past the neighbour.
            let nudged = if up {
                neighbour.sort_order - 1
            } else {
                neighbour.sort_order + 1
            };
            Self::patch(pool, current.id, &json!({ "sort_order": nudged }))?;
        }
        Ok(true)
    }

    pub fn move_up(pool: &DbPool, id: i64) -> Result<bool, String> {
        Self::shift(pool, id, true)
    }

    pub fn move_down(pool: &DbPool, id: i64) -> Result<bool, String> {
        Self::shift(pool, id, false)
    }
}
