use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::forms::{self, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
    Open,
    Triaged,
    InProgress,
    Resolved,
    Closed,
}

impl BugStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Some(BugStatus::Open),
            "triaged" => Some(BugStatus::Triaged),
            "in_progress" => Some(BugStatus::InProgress),
            "resolved" => Some(BugStatus::Resolved),
            "closed" => Some(BugStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BugStatus::Open => "open",
            BugStatus::Triaged => "triaged",
            BugStatus::InProgress => "in_progress",
            BugStatus::Resolved => "resolved",
            BugStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct BugReport {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub reporter_email: Option<String>,
    pub severity: Severity,
    pub status: BugStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Submitted by visitors through the public bug tracker.
#[derive(Debug, Deserialize)]
pub struct BugReportForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub reporter_email: Option<String>,
    pub severity: Option<String>,
}

impl BugReportForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        Validator::new()
            .required("Title", &self.title)
            .max_len("Title", &self.title, 200)
            .required("Description", &self.description)
            .max_len("Description", &self.description, 10_000)
            .email("Email", self.reporter_email.as_deref())
            .check(
                self.severity
                    .as_deref()
                    .map_or(true, |s| s.trim().is_empty() || Severity::parse(s).is_some()),
                "Severity must be low, medium, high or critical",
            )
            .finish()
    }

    fn severity(&self) -> Severity {
        self.severity
            .as_deref()
            .and_then(Severity::parse)
            .unwrap_or(Severity::Medium)
    }
}

impl BugReport {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let severity: String = row.get("severity")?;
        let status: String = row.get("status")?;
        Ok(BugReport {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            reporter_email: row.get("reporter_email")?,
            severity: Severity::parse(&severity).unwrap_or(Severity::Medium),
            status: BugStatus::parse(&status).unwrap_or(BugStatus::Open),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM bug_reports WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool, status: Option<BugStatus>) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let (sql, filter) = match status {
            Some(s) => (
                "SELECT * FROM bug_reports WHERE status = ?1 ORDER BY created_at DESC, id DESC",
                Some(s.as_str()),
            ),
            None => (
                "SELECT * FROM bug_reports WHERE ?1 IS NULL ORDER BY created_at DESC, id DESC",
                None,
            ),
        };
        let mut stmt = match conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![filter], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn count_by_status(pool: &DbPool, status: BugStatus) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row(
            "SELECT COUNT(*) FROM bug_reports WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )
        .unwrap_or(0)
    }

    pub fn create(pool: &DbPool, form: &BugReportForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO bug_reports (title, description, reporter_email, severity, status)
             VALUES (?1, ?2, ?3, ?4, 'open')",
            params![
                form.title.trim(),
                form.description.trim(),
                forms::clean_opt(&form.reporter_email),
                form.severity().as_str(),
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns false when no report has this id.
    pub fn update_status(pool: &DbPool, id: i64, status: BugStatus) -> Result<bool, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let changed = conn
            .execute(
                "UPDATE bug_reports SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                params![status.as_str(), id],
            )
            .map_err(|e| e.to_string())?;
        Ok(changed > 0)
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM bug_reports WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
