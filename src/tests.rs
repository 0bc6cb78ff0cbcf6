#![cfg(test)]

use chrono::{TimeZone, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde_json::json;

use crate::auth;
use crate::db::{run_migrations, seed_defaults, DbPool};
use crate::models::bug_report::{BugReport, BugReportForm, BugStatus, Severity};
use crate::models::download::{changelog_digest, Download, DownloadForm};
use crate::models::landing::{LandingSection, LandingSectionForm};
use crate::models::news::{NewsForm, NewsPost};
use crate::models::portfolio::{PortfolioForm, PortfolioItem};
use crate::models::service::{Service, ServiceForm};
use crate::models::settings::Setting;
use crate::rate_limit::{RateLimiter, WINDOW};
use crate::sections::{render_sections, RenderState};
use crate::theme::{self, NavigationStyle, ThemeSettings};

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Fresh in-memory SQLite pool with migrations and seed defaults applied.
/// Named shared-cache so every pooled connection sees the same data.
/// The admin hash is pre-inserted at cost 4 so seeding skips the slow bcrypt call.
fn test_pool() -> DbPool {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:arcane_testdb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("Failed to create test pool");
    run_migrations(&pool).expect("Failed to run migrations");
    {
        let conn = pool.get().unwrap();
        let fast = bcrypt::hash("admin", 4).unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES ('admin_password_hash', ?1)",
            rusqlite::params![fast],
        )
        .unwrap();
    }
    seed_defaults(&pool).expect("Failed to seed defaults");
    pool
}

fn section_form(key: &str, kind: &str) -> LandingSectionForm {
    LandingSectionForm {
        section_key: Some(key.to_string()),
        section_type: Some(kind.to_string()),
        headline: Some(format!("{} headline", key)),
        ..LandingSectionForm::default()
    }
}

/// Section keys in display order.
fn order(pool: &DbPool) -> Vec<String> {
    LandingSection::list(pool)
        .into_iter()
        .map(|s| s.section_key)
        .collect()
}

// ═══════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════

#[test]
fn settings_seeded_defaults() {
    let pool = test_pool();
    assert_eq!(Setting::get_or(&pool, "admin_slug", "x"), "admin");
    assert_eq!(Setting::get_i64_or(&pool, "login_rate_limit", 0), 5);
    assert!(Setting::get(&pool, "accessibility_statement").is_some());
}

#[test]
fn settings_upsert_and_numeric_fallback() {
    let pool = test_pool();
    Setting::set(&pool, "key", "first").unwrap();
    Setting::set(&pool, "key", "second").unwrap();
    assert_eq!(Setting::get(&pool, "key"), Some("second".to_string()));
    Setting::set(&pool, "limit", "many").unwrap();
    assert_eq!(Setting::get_i64_or(&pool, "limit", 7), 7);
    assert_eq!(Setting::get_i64_or(&pool, "missing", 3), 3);
}

#[test]
fn seed_is_idempotent() {
    let pool = test_pool();
    seed_defaults(&pool).unwrap();
    assert_eq!(LandingSection::count(&pool), 1);
    assert_eq!(order(&pool), vec!["hero"]);
}

// ═══════════════════════════════════════════════════════════
// Theme settings
// ═══════════════════════════════════════════════════════════

#[test]
fn theme_seeded_row_loads() {
    let pool = test_pool();
    let loaded = ThemeSettings::find(&pool).unwrap().expect("seeded row");
    let defaults = ThemeSettings::default();
    assert_eq!(loaded.primary_color, defaults.primary_color);
    assert_eq!(loaded.footer_sections, defaults.footer_sections);
    assert_eq!(loaded.created_at, loaded.updated_at);
}

#[test]
fn theme_save_then_load_round_trips() {
    let pool = test_pool();
    let t = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
    let current = ThemeSettings::load(&pool);
    let next = theme::sanitize_update(
        &json!({
            "primaryColor": "#ABC123",
            "navigationStyle": "split",
            "footerBrandName": "",
            "footerBrandDescription": null,
            "footerBadges": ["Indie", "Indie", "Open source"],
            "footerMetaLines": [],
            "footerShowUpdatedAt": "true"
        }),
        &current,
        t,
    );
    next.save(&pool).unwrap();

    let loaded = ThemeSettings::load(&pool);
    assert_eq!(loaded, next);
    assert_eq!(loaded.primary_color, "#ABC123");
    assert_eq!(loaded.navigation_style, NavigationStyle::Split);
    assert_eq!(loaded.footer_brand_name, "");
    assert_eq!(loaded.footer_brand_description, None);
    assert_eq!(loaded.footer_badges, vec!["Indie", "Open source"]);
    assert!(loaded.footer_meta_lines.is_empty());
    assert!(loaded.footer_show_updated_at);
    assert_eq!(loaded.updated_at, t);
    assert_eq!(loaded.created_at, current.created_at);
}

#[test]
fn theme_reads_never_touch_updated_at() {
    let pool = test_pool();
    let first = ThemeSettings::load(&pool);
    let second = ThemeSettings::load(&pool);
    assert_eq!(first.updated_at, second.updated_at);
    assert_eq!(first, second);
}

#[test]
fn theme_invalid_update_keeps_stored_values() {
    let pool = test_pool();
    let current = ThemeSettings::load(&pool);
    let next = theme::sanitize_update(
        &json!({"primaryColor": "red", "footerLayout": "mega", "siteTitle": "   "}),
        &current,
        Utc::now(),
    );
    next.save(&pool).unwrap();
    let loaded = ThemeSettings::load(&pool);
    assert_eq!(loaded.primary_color, current.primary_color);
    assert_eq!(loaded.footer_layout, current.footer_layout);
    assert_eq!(loaded.site_title, current.site_title);
}

#[test]
fn theme_corrupt_columns_fall_back_to_defaults() {
    let pool = test_pool();
    {
        let conn = pool.get().unwrap();
        conn.execute(
            "UPDATE theme_settings SET primary_color = 'purple', footer_sections = 'not json',
             footer_badges = NULL, navigation_style = 'zigzag'",
            [],
        )
        .unwrap();
    }
    let loaded = ThemeSettings::load(&pool);
    let defaults = ThemeSettings::default();
    assert_eq!(loaded.primary_color, defaults.primary_color);
    assert_eq!(loaded.footer_sections, defaults.footer_sections);
    assert_eq!(loaded.footer_badges, defaults.footer_badges);
    assert_eq!(loaded.navigation_style, defaults.navigation_style);
}

#[test]
fn theme_missing_row_serves_defaults() {
    let pool = test_pool();
    {
        let conn = pool.get().unwrap();
        conn.execute("DELETE FROM theme_settings", []).unwrap();
    }
    assert!(ThemeSettings::find(&pool).unwrap().is_none());
    assert_eq!(ThemeSettings::load(&pool), ThemeSettings::default());
}

#[test]
fn theme_mistyped_column_only_resets_that_field() {
    let pool = test_pool();
    ThemeSettings::apply_update(
        &pool,
        &json!({"siteTitle": "Pixel Lab", "primaryColor": "#123456", "footerShowUpdatedAt": true}),
        Utc::now(),
    )
    .unwrap();
    {
        let conn = pool.get().unwrap();
        conn.execute("UPDATE theme_settings SET footer_show_updated_at = 'yes'", [])
            .unwrap();
    }

    let stored = ThemeSettings::find(&pool).unwrap().expect("row");
    assert_eq!(stored.site_title, "Pixel Lab");
    assert_eq!(stored.footer_show_updated_at, ThemeSettings::default().footer_show_updated_at);

    let next = ThemeSettings::apply_update(&pool, &json!({"accentColor": "#000000"}), Utc::now())
        .unwrap();
    assert_eq!(next.site_title, "Pixel Lab");
    assert_eq!(next.primary_color, "#123456");
    assert_eq!(next.accent_color, "#000000");

    let loaded = ThemeSettings::load(&pool);
    assert_eq!(loaded.site_title, "Pixel Lab");
    assert_eq!(loaded.primary_color, "#123456");
}

#[test]
fn theme_text_flag_column_is_coerced() {
    let pool = test_pool();
    {
        let conn = pool.get().unwrap();
        conn.execute("UPDATE theme_settings SET footer_show_updated_at = 'true'", [])
            .unwrap();
    }
    assert!(ThemeSettings::load(&pool).footer_show_updated_at);
}

#[test]
fn theme_update_refuses_unreadable_store() {
    let pool = test_pool();
    {
        let conn = pool.get().unwrap();
        conn.execute("DROP TABLE theme_settings", []).unwrap();
    }
    assert!(ThemeSettings::find(&pool).is_err());
    assert!(ThemeSettings::apply_update(&pool, &json!({"siteTitle": "X"}), Utc::now()).is_err());
    // readers still get a page
    assert_eq!(ThemeSettings::load(&pool), ThemeSettings::default());
}

// ═══════════════════════════════════════════════════════════
// Landing sections
// ═══════════════════════════════════════════════════════════

#[test]
fn landing_create_appends_in_order() {
    let pool = test_pool();
    LandingSection::create(&pool, &section_form("features", "features")).unwrap();
    LandingSection::create(&pool, &section_form("faq", "faq")).unwrap();
    assert_eq!(order(&pool), vec!["hero", "features", "faq"]);

    let faq = LandingSection::find_by_key(&pool, "faq").unwrap();
    assert_eq!(faq.sort_order, 2);
    assert_eq!(faq.content, json!({}));
    assert!(faq.is_active);
}

#[test]
fn landing_duplicate_key_rejected() {
    let pool = test_pool();
    assert!(LandingSection::create(&pool, &section_form("hero", "cta")).is_err());
}

#[test]
fn landing_patch_keeps_key_and_absent_fields() {
    let pool = test_pool();
    let id = LandingSection::create(&pool, &section_form("cta", "cta")).unwrap();
    let updated = LandingSection::patch(
        &pool,
        id,
        &json!({
            "section_key": "renamed",
            "subheadline": "Ready?",
            "headline": null,
            "content": {"note": 1}
        }),
    )
    .unwrap()
    .unwrap();
    assert_eq!(updated.section_key, "cta");
    assert_eq!(updated.subheadline.as_deref(), Some("Ready?"));
    assert_eq!(updated.headline, None);
    assert_eq!(updated.content, json!({"note": 1}));
    assert_eq!(updated.section_type, "cta");
}

#[test]
fn landing_patch_missing_is_none() {
    let pool = test_pool();
    assert_eq!(LandingSection::patch(&pool, 999, &json!({})).unwrap(), None);
}

#[test]
fn landing_move_up_and_down() {
    let pool = test_pool();
    LandingSection::create(&pool, &section_form("a", "cta")).unwrap();
    let b = LandingSection::create(&pool, &section_form("b", "cta")).unwrap();
    assert_eq!(order(&pool), vec!["hero", "a", "b"]);

    assert!(LandingSection::move_up(&pool, b).unwrap());
    assert_eq!(order(&pool), vec!["hero", "b", "a"]);

    assert!(LandingSection::move_down(&pool, b).unwrap());
    assert_eq!(order(&pool), vec!["hero", "a", "b"]);
}

#[test]
fn landing_move_at_edges_is_noop() {
    let pool = test_pool();
    let last = LandingSection::create(&pool, &section_form("last", "cta")).unwrap();
    let hero = LandingSection::find_by_key(&pool, "hero").unwrap();
    let before = LandingSection::list(&pool);

    assert!(!LandingSection::move_up(&pool, hero.id).unwrap());
    assert!(!LandingSection::move_down(&pool, last).unwrap());
    assert_eq!(LandingSection::list(&pool), before);
}

#[test]
fn landing_move_changes_exactly_two_rows() {
    let pool = test_pool();
    for key in ["a", "b", "c"] {
        LandingSection::create(&pool, &section_form(key, "cta")).unwrap();
    }
    let before = LandingSection::list(&pool);
    let b = LandingSection::find_by_key(&pool, "b").unwrap();
    LandingSection::move_down(&pool, b.id).unwrap();
    let after = LandingSection::list(&pool);

    let changed = before
        .iter()
        .filter(|old| {
            after
                .iter()
                .find(|new| new.id == old.id)
                .map_or(true, |new| new.sort_order != old.sort_order)
        })
        .count();
    assert_eq!(changed, 2);
    assert_eq!(order(&pool), vec!["hero", "a", "c", "b"]);
}

#[test]
fn landing_move_with_equal_orders() {
    let pool = test_pool();
    let mut a = section_form("a", "cta");
    a.sort_order = Some(5);
    let mut b = section_form("b", "cta");
    b.sort_order = Some(5);
    LandingSection::create(&pool, &a).unwrap();
    let b_id = LandingSection::create(&pool, &b).unwrap();
    assert_eq!(order(&pool), vec!["hero", "a", "b"]);

    assert!(LandingSection::move_up(&pool, b_id).unwrap());
    assert_eq!(order(&pool), vec!["hero", "b", "a"]);
}

#[test]
fn landing_swap_missing_section_errors() {
    let pool = test_pool();
    let hero = LandingSection::find_by_key(&pool, "hero").unwrap();
    assert!(LandingSection::swap_sort_order(&pool, hero.id, 404).is_err());
    // the transaction rolled back
    assert_eq!(LandingSection::find_by_id(&pool, hero.id).unwrap().sort_order, hero.sort_order);
}

#[test]
fn landing_list_active_and_render() {
    let pool = test_pool();
    let mut faq = section_form("help", "faq");
    faq.content = Some(json!({"faqs": [
        {"question": "Q1", "answer": "A1"},
        {"question": "Q2", "answer": "A2"}
    ]}));
    LandingSection::create(&pool, &faq).unwrap();
    let hidden = LandingSection::create(&pool, &section_form("hidden", "cta")).unwrap();
    LandingSection::set_active(&pool, hidden, false).unwrap();

    let active = LandingSection::list_active(&pool);
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|s| s.section_key != "hidden"));

    let html = render_sections(&active, &RenderState::from_query(Some("help:1")));
    assert!(html.find("section-hero").unwrap() < html.find("section-help").unwrap());
    assert!(!html.contains("section-hidden"));
    assert!(html.contains("faq-item open\" data-index=\"1\""));
}

#[test]
fn landing_unknown_type_from_storage_renders_custom() {
    let pool = test_pool();
    let id = LandingSection::create(&pool, &section_form("legacy", "cta")).unwrap();
    {
        let conn = pool.get().unwrap();
        conn.execute(
            "UPDATE landing_sections SET section_type = 'carousel', content = 'broken' WHERE id = ?1",
            rusqlite::params![id],
        )
        .unwrap();
    }
    let section = LandingSection::find_by_id(&pool, id).unwrap();
    assert_eq!(section.content, json!({}));
    let html = render_sections(&[section], &RenderState::default());
    assert!(html.contains("data-variant=\"custom\""));
}

// ═══════════════════════════════════════════════════════════
// News
// ═══════════════════════════════════════════════════════════

fn news_form(title: &str, status: &str) -> NewsForm {
    NewsForm {
        title: title.to_string(),
        slug: None,
        excerpt: Some("  ".to_string()),
        body_markdown: "Body".to_string(),
        status: Some(status.to_string()),
        published_at: None,
    }
}

#[test]
fn news_create_and_publish() {
    let pool = test_pool();
    let id = NewsPost::create(&pool, &news_form("Patch 1.2 is out!", "published")).unwrap();
    NewsPost::create(&pool, &news_form("Secret draft", "draft")).unwrap();

    let post = NewsPost::find_by_id(&pool, id).unwrap();
    assert_eq!(post.slug, "patch-1-2-is-out");
    assert_eq!(post.excerpt, None);
    assert!(post.published_at.is_some());
    assert!(post.is_visible());

    let published = NewsPost::published(&pool, 10, 0);
    assert_eq!(published.len(), 1);
    assert_eq!(NewsPost::count(&pool, None), 2);
    assert!(NewsPost::find_by_slug(&pool, "secret-draft").map_or(false, |p| !p.is_visible()));
}

#[test]
fn news_future_post_hidden() {
    let pool = test_pool();
    let mut form = news_form("Coming soon", "published");
    form.published_at = Some("2999-01-01T00:00".to_string());
    assert!(form.validate().is_ok());
    NewsPost::create(&pool, &form).unwrap();
    assert!(NewsPost::published(&pool, 10, 0).is_empty());
}

#[test]
fn news_update_and_delete() {
    let pool = test_pool();
    let id = NewsPost::create(&pool, &news_form("Draft", "draft")).unwrap();
    let mut form = news_form("Draft", "published");
    form.slug = Some("Launch Day".to_string());
    NewsPost::update(&pool, id, &form).unwrap();
    assert_eq!(NewsPost::find_by_id(&pool, id).unwrap().slug, "launch-day");
    NewsPost::delete(&pool, id).unwrap();
    assert!(NewsPost::find_by_id(&pool, id).is_none());
}

#[test]
fn news_page_number_out_of_range_is_empty_page() {
    use rocket::http::Status;
    use rocket::local::blocking::Client;

    let pool = test_pool();
    NewsPost::create(&pool, &news_form("Launch day", "published")).unwrap();
    let rocket = rocket::build()
        .manage(pool)
        .mount("/", crate::routes::public::routes());
    let client = Client::untracked(rocket).expect("valid rocket");

    let res = client.get("/news?page=9223372036854775807").dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body = res.into_string().unwrap_or_default();
    assert!(body.contains("No news yet."));

    let first = client.get("/news?page=1").dispatch();
    assert!(first.into_string().unwrap_or_default().contains("Launch day"));
}

// ═══════════════════════════════════════════════════════════
// Downloads
// ═══════════════════════════════════════════════════════════

fn download_form(changelog: &str) -> DownloadForm {
    serde_json::from_value(json!({
        "name": "Pixel Forge",
        "version": "1.0.0",
        "platforms": "Windows, Linux\nmacOS",
        "file_url": "/uploads/pixel-forge-1.0.0.zip",
        "file_size": 2_500_000,
        "changelog": changelog,
        "released_at": "2024-05-01"
    }))
    .unwrap()
}

#[test]
fn download_changelog_digest_tracks_changelog() {
    let pool = test_pool();
    let id = Download::create(&pool, &download_form("- first release")).unwrap();
    let d = Download::find_by_id(&pool, id).unwrap();
    assert_eq!(d.changelog_sha256, changelog_digest("- first release"));
    assert_eq!(d.platforms, vec!["Windows", "Linux", "macOS"]);
    assert_eq!(d.slug, "pixel-forge");
    assert_eq!(d.size_label().as_deref(), Some("2.4 MB"));

    Download::update(&pool, id, &download_form("- fixed saves")).unwrap();
    let d = Download::find_by_id(&pool, id).unwrap();
    assert_eq!(d.changelog, "- fixed saves");
    assert_eq!(d.changelog_sha256, changelog_digest("- fixed saves"));
}

#[test]
fn download_inactive_hidden_from_public_list() {
    let pool = test_pool();
    let mut form = download_form("");
    form.is_active = Some(false);
    Download::create(&pool, &form).unwrap();
    assert!(Download::list_active(&pool).is_empty());
    assert_eq!(Download::list(&pool).len(), 1);
}

// ═══════════════════════════════════════════════════════════
// Portfolio & services
// ═══════════════════════════════════════════════════════════

#[test]
fn portfolio_publish_and_tags() {
    let pool = test_pool();
    let form: PortfolioForm = serde_json::from_value(json!({
        "title": "Starfall",
        "tags": ["Pixel Art", "Games"],
        "is_published": true
    }))
    .unwrap();
    let id = PortfolioItem::create(&pool, &form).unwrap();
    let draft: PortfolioForm = serde_json::from_value(json!({"title": "Draft"})).unwrap();
    PortfolioItem::create(&pool, &draft).unwrap();

    assert_eq!(PortfolioItem::published(&pool).len(), 1);
    assert_eq!(PortfolioItem::with_tag(&pool, "pixel art").len(), 1);
    assert!(PortfolioItem::with_tag(&pool, "tools").is_empty());
    assert_eq!(PortfolioItem::find_by_slug(&pool, "starfall").unwrap().id, id);
}

#[test]
fn service_crud() {
    let pool = test_pool();
    let form: ServiceForm = serde_json::from_value(json!({
        "title": "Game art",
        "features": "Sprites, Tilesets, Sprites"
    }))
    .unwrap();
    let id = Service::create(&pool, &form).unwrap();
    let s = Service::find_by_id(&pool, id).unwrap();
    assert_eq!(s.features, vec!["Sprites", "Tilesets"]);

    let hide: ServiceForm =
        serde_json::from_value(json!({"title": "Game art", "is_active": false})).unwrap();
    Service::update(&pool, id, &hide).unwrap();
    assert!(Service::list_active(&pool).is_empty());
    Service::delete(&pool, id).unwrap();
    assert!(Service::find_by_id(&pool, id).is_none());
}

// ═══════════════════════════════════════════════════════════
// Bug reports
// ═══════════════════════════════════════════════════════════

#[test]
fn bug_report_lifecycle() {
    let pool = test_pool();
    let form = BugReportForm {
        title: "Crash on save".to_string(),
        description: "Steps...".to_string(),
        reporter_email: Some("".to_string()),
        severity: Some("HIGH".to_string()),
    };
    let id = BugReport::create(&pool, &form).unwrap();
    let report = BugReport::find_by_id(&pool, id).unwrap();
    assert_eq!(report.severity, Severity::High);
    assert_eq!(report.status, BugStatus::Open);
    assert_eq!(report.reporter_email, None);

    assert!(BugReport::update_status(&pool, id, BugStatus::Resolved).unwrap());
    assert!(!BugReport::update_status(&pool, 999, BugStatus::Closed).unwrap());
    assert!(BugReport::list(&pool, Some(BugStatus::Open)).is_empty());
    assert_eq!(BugReport::list(&pool, Some(BugStatus::Resolved)).len(), 1);
    assert_eq!(BugReport::list(&pool, None).len(), 1);

    BugReport::delete(&pool, id).unwrap();
    assert_eq!(BugReport::count_by_status(&pool, BugStatus::Resolved), 0);
}

#[test]
fn bug_submit_prunes_stale_rate_limit_entries() {
    use rocket::http::{ContentType, Status};
    use rocket::local::blocking::Client;
    use std::time::Instant;

    let limiter = RateLimiter::new();
    if let Some(old) = Instant::now().checked_sub(WINDOW * 2) {
        limiter.record_at("bug:stale", old);
    }
    let rocket = rocket::build()
        .manage(test_pool())
        .manage(limiter)
        .mount("/api", crate::routes::api::routes());
    let client = Client::untracked(rocket).expect("valid rocket");

    let res = client
        .post("/api/bugs")
        .header(ContentType::JSON)
        .body(r#"{"title": "Crash on save", "description": "Steps to reproduce"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Created);

    let limiter = client.rocket().state::<RateLimiter>().expect("managed limiter");
    assert!(!limiter.is_tracked("bug:stale"));
    assert!(limiter.is_tracked(&format!("bug:{}", auth::hash_ip("unknown"))));
}

// ═══════════════════════════════════════════════════════════
// Sessions
// ═══════════════════════════════════════════════════════════

#[test]
fn session_create_validate_destroy() {
    let pool = test_pool();
    let ip = auth::hash_ip("203.0.113.7");
    let sid = auth::create_session(&pool, Some(&ip)).unwrap();
    assert!(auth::validate_session(&pool, &sid, &ip));
    assert!(!auth::validate_session(&pool, "nope", &ip));
    auth::destroy_session(&pool, &sid).unwrap();
    assert!(!auth::validate_session(&pool, &sid, &ip));
}

#[test]
fn session_bound_to_issuing_address() {
    let pool = test_pool();
    let home = auth::hash_ip("203.0.113.7");
    let other = auth::hash_ip("198.51.100.2");
    let sid = auth::create_session(&pool, Some(&home)).unwrap();
    assert!(!auth::validate_session(&pool, &sid, &other));

    let session = auth::Session::find(&pool, &sid).expect("stored session");
    assert_eq!(session.id, sid);
    assert_eq!(session.ip_hash.as_deref(), Some(home.as_str()));
    assert!(session.created_at < session.expires_at);

    // sessions created without an address are not bound
    let open = auth::create_session(&pool, None).unwrap();
    assert!(auth::validate_session(&pool, &open, &other));
}

#[test]
fn session_new_sign_in_replaces_earlier_one() {
    let pool = test_pool();
    let ip = auth::hash_ip("203.0.113.7");
    let first = auth::create_session(&pool, Some(&ip)).unwrap();
    let second = auth::create_session(&pool, Some(&ip)).unwrap();
    assert!(!auth::validate_session(&pool, &first, &ip));
    assert!(auth::validate_session(&pool, &second, &ip));
}

#[test]
fn session_expired_is_invalid_and_cleaned() {
    let pool = test_pool();
    let sid = auth::create_session(&pool, None).unwrap();
    {
        let conn = pool.get().unwrap();
        let past = Utc::now().naive_utc() - chrono::Duration::hours(1);
        conn.execute(
            "UPDATE sessions SET expires_at = ?1 WHERE id = ?2",
            rusqlite::params![past, sid],
        )
        .unwrap();
    }
    assert!(!auth::validate_session(&pool, &sid, &auth::hash_ip("unknown")));
    assert_eq!(auth::cleanup_expired_sessions(&pool).unwrap(), 1);
}

#[test]
fn password_hash_verifies() {
    let stored = Setting::get(&test_pool(), "admin_password_hash").unwrap();
    assert!(auth::verify_password("admin", &stored));
    assert!(!auth::verify_password("wrong", &stored));
    assert_eq!(auth::hash_ip("1.2.3.4").len(), 64);
}
