use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::models::landing::{LandingSection, LandingSectionForm};
use crate::theme::ThemeSettings;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool(path: &str) -> Result<DbPool, Box<dyn std::error::Error>> {
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    // WAL keeps public reads going while the admin writes
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Settings (key-value)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        );

        -- Admin sessions
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            created_at DATETIME NOT NULL,
            expires_at DATETIME NOT NULL,
            ip_hash TEXT
        );

        -- Theme / footer configuration (single row, id = 'default')
        CREATE TABLE IF NOT EXISTS theme_settings (
            id TEXT PRIMARY KEY,
            site_title TEXT,
            primary_color TEXT,
            accent_color TEXT,
            navigation_style TEXT,
            footer_layout TEXT,
            footer_brand_name TEXT,
            footer_brand_description TEXT,
            footer_badges TEXT,
            footer_sections TEXT,
            footer_meta_lines TEXT,
            footer_show_updated_at INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Landing page sections
        CREATE TABLE IF NOT EXISTS landing_sections (
            id INTEGER PRIMARY KEY,
            section_key TEXT UNIQUE NOT NULL,
            section_type TEXT NOT NULL DEFAULT 'custom',
            headline TEXT,
            subheadline TEXT,
            description TEXT,
            cta_label TEXT,
            cta_url TEXT,
            secondary_cta_label TEXT,
            secondary_cta_url TEXT,
            image_url TEXT,
            image_alt TEXT,
            image_position TEXT,
            background_color TEXT,
            text_color TEXT,
            content TEXT NOT NULL DEFAULT '{}',
            is_active INTEGER NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_landing_order ON landing_sections(sort_order);

        -- News
        CREATE TABLE IF NOT EXISTS news (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            excerpt TEXT,
            body_markdown TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'draft',
            published_at DATETIME,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Downloads
        CREATE TABLE IF NOT EXISTS downloads (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            version TEXT NOT NULL,
            platforms TEXT NOT NULL DEFAULT '[]',
            file_url TEXT NOT NULL,
            file_size INTEGER,
            changelog TEXT NOT NULL DEFAULT '',
            changelog_sha256 TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0,
            released_at DATETIME,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Portfolio
        CREATE TABLE IF NOT EXISTS portfolio (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            summary TEXT,
            body_markdown TEXT NOT NULL DEFAULT '',
            image_url TEXT,
            project_url TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            is_published INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Services
        CREATE TABLE IF NOT EXISTS services (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            summary TEXT,
            icon TEXT,
            features TEXT NOT NULL DEFAULT '[]',
            is_active INTEGER NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Public bug tracker
        CREATE TABLE IF NOT EXISTS bug_reports (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            reporter_email TEXT,
            severity TEXT NOT NULL DEFAULT 'medium',
            status TEXT NOT NULL DEFAULT 'open',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_bugs_status ON bug_reports(status);
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        ("admin_email", "admin@arcanepixels.local"),
        ("admin_slug", "admin"),
        ("session_expiry_hours", "24"),
        ("login_rate_limit", "5"),
        ("bug_report_rate_limit", "3"),
        (
            "accessibility_statement",
            "ArcanePixels aims to meet WCAG 2.1 AA across this site.\n\n\
             If something is hard to use, please tell us through the bug tracker.",
        ),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    let admin_exists: i64 = conn.query_row(
        "SELECT COUNT(*) FROM settings WHERE key = 'admin_password_hash'",
        [],
        |row| row.get(0),
    )?;

    if admin_exists == 0 {
        // Default password: "admin"
        let hash = crate::auth::hash_password("admin")?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES ('admin_password_hash', ?1)",
            params![hash],
        )?;
        log::warn!("Seeded default admin password; change it before going live");
    }

    let theme_exists: i64 =
        conn.query_row("SELECT COUNT(*) FROM theme_settings", [], |row| row.get(0))?;
    drop(conn);

    if theme_exists == 0 {
        ThemeSettings::seeded(chrono::Utc::now()).save(pool)?;
    }

    if LandingSection::count(pool) == 0 {
        let hero = LandingSectionForm {
            section_key: Some("hero".to_string()),
            section_type: Some("hero".to_string()),
            headline: Some("Worlds built one pixel at a time".to_string()),
            subheadline: Some("ArcanePixels".to_string()),
            description: Some("Games, tools and pixel art from a small independent studio.".to_string()),
            cta_label: Some("See our work".to_string()),
            cta_url: Some("/portfolio".to_string()),
            ..LandingSectionForm::default()
        };
        LandingSection::create(pool, &hero)?;
    }

    Ok(())
}
