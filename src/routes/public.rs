use rocket::response::content::RawHtml;
use rocket::State;

use crate::db::DbPool;
use crate::models::bug_report::{BugReport, BugStatus};
use crate::models::download::Download;
use crate::models::landing::LandingSection;
use crate::models::news::{page_offset, NewsPost};
use crate::models::portfolio::PortfolioItem;
use crate::models::service::Service;
use crate::models::settings::Setting;
use crate::render::{self, format_date, html_escape, markdown_to_html};
use crate::sections::{self, RenderState};
use crate::theme::ThemeSettings;

const NEWS_PER_PAGE: i64 = 10;

fn themed(pool: &DbPool, title: Option<&str>, body: &str, path: &str) -> RawHtml<String> {
    let theme = ThemeSettings::load(pool);
    RawHtml(render::render_page(&theme, title, body, path))
}

// ── Landing ────────────────────────────────────────────

#[get("/?<faq>")]
pub fn landing(pool: &State<DbPool>, faq: Option<String>) -> RawHtml<String> {
    let state = RenderState::from_query(faq.as_deref());
    let body = sections::render_sections(&LandingSection::list_active(pool), &state);
    themed(pool, None, &body, "/")
}

// ── News ───────────────────────────────────────────────

#[get("/news?<page>")]
pub fn news_list(pool: &State<DbPool>, page: Option<i64>) -> RawHtml<String> {
    let current = page.unwrap_or(1).max(1);
    let posts = NewsPost::published(pool, NEWS_PER_PAGE, page_offset(current, NEWS_PER_PAGE));
    let total = NewsPost::count(pool, Some("published"));
    let total_pages = (total.saturating_add(NEWS_PER_PAGE - 1) / NEWS_PER_PAGE).max(1);

    let mut body = String::from("<section class=\"page news-list\"><h1>News</h1>");
    if posts.is_empty() {
        body.push_str("<p class=\"empty\">No news yet.</p>");
    }
    for post in &posts {
        body.push_str(&format!(
            "<article class=\"news-card\"><h2><a href=\"/news/{slug}\">{title}</a></h2>{date}{excerpt}</article>",
            slug = html_escape(&post.slug),
            title = html_escape(&post.title),
            date = post
                .published_at
                .map(|d| format!("<time>{}</time>", format_date(&d)))
                .unwrap_or_default(),
            excerpt = post
                .excerpt
                .as_deref()
                .map(|e| format!("<p>{}</p>", html_escape(e)))
                .unwrap_or_default(),
        ));
    }
    if total_pages > 1 {
        body.push_str("<nav class=\"pagination\">");
        if current > 1 {
            body.push_str(&format!("<a href=\"/news?page={}\">Newer</a>", current - 1));
        }
        if current < total_pages {
            body.push_str(&format!("<a href=\"/news?page={}\">Older</a>", current + 1));
        }
        body.push_str("</nav>");
    }
    body.push_str("</section>");
    themed(pool, Some("News"), &body, "/news")
}

#[get("/news/<slug>")]
pub fn news_single(pool: &State<DbPool>, slug: &str) -> Option<RawHtml<String>> {
    let post = NewsPost::find_by_slug(pool, slug).filter(NewsPost::is_visible)?;
    let body = format!(
        "<article class=\"page news-post\"><h1>{}</h1>{}<div class=\"prose\">{}</div></article>",
        html_escape(&post.title),
        post.published_at
            .map(|d| format!("<time>{}</time>", format_date(&d)))
            .unwrap_or_default(),
        markdown_to_html(&post.body_markdown),
    );
    Some(themed(pool, Some(&post.title), &body, &format!("/news/{}", post.slug)))
}

// ── Downloads ──────────────────────────────────────────

#[get("/downloads")]
pub fn downloads(pool: &State<DbPool>) -> RawHtml<String> {
    let mut body = String::from("<section class=\"page downloads\"><h1>Downloads</h1>");
    let items = Download::list_active(pool);
    if items.is_empty() {
        body.push_str("<p class=\"empty\">Nothing to download yet.</p>");
    }
    for d in &items {
        let platforms: Vec<String> = d.platforms.iter().map(|p| html_escape(p)).collect();
        body.push_str(&format!(
            "<article class=\"download\" id=\"{slug}\">\
             <h2>{name} <span class=\"version\">{version}</span></h2>\
             <p class=\"platforms\">{platforms}</p>\
             <a class=\"button\" href=\"{url}\">Download{size}</a>\
             <details class=\"changelog\"><summary>Changelog</summary>{changelog}\
             <p class=\"checksum\">SHA-256 <code>{sha}</code></p></details></article>",
            slug = html_escape(&d.slug),
            name = html_escape(&d.name),
            version = html_escape(&d.version),
            platforms = platforms.join(" · "),
            url = html_escape(&d.file_url),
            size = d.size_label().map(|s| format!(" ({})", s)).unwrap_or_default(),
            changelog = markdown_to_html(&d.changelog),
            sha = d.changelog_sha256,
        ));
    }
    body.push_str("</section>");
    themed(pool, Some("Downloads"), &body, "/downloads")
}

// ── Portfolio ──────────────────────────────────────────

#[get("/portfolio?<tag>")]
pub fn portfolio_list(pool: &State<DbPool>, tag: Option<String>) -> RawHtml<String> {
    let items = match tag.as_deref().filter(|t| !t.is_empty()) {
        Some(t) => PortfolioItem::with_tag(pool, t),
        None => PortfolioItem::published(pool),
    };
    let mut body = String::from("<section class=\"page portfolio\"><h1>Portfolio</h1><div class=\"portfolio-grid\">");
    for item in &items {
        let image = item
            .image_url
            .as_deref()
            .map(|url| format!("<img src=\"{}\" alt=\"\" loading=\"lazy\">", html_escape(url)))
            .unwrap_or_default();
        let tags: String = item
            .tags
            .iter()
            .map(|t| format!("<a class=\"tag\" href=\"/portfolio?tag={0}\">{0}</a>", html_escape(t)))
            .collect();
        body.push_str(&format!(
            "<article class=\"portfolio-card\">{image}<h2><a href=\"/portfolio/{slug}\">{title}</a></h2>{summary}<div class=\"tags\">{tags}</div></article>",
            image = image,
            slug = html_escape(&item.slug),
            title = html_escape(&item.title),
            summary = item
                .summary
                .as_deref()
                .map(|s| format!("<p>{}</p>", html_escape(s)))
                .unwrap_or_default(),
            tags = tags,
        ));
    }
    body.push_str("</div></section>");
    themed(pool, Some("Portfolio"), &body, "/portfolio")
}

#[get("/portfolio/<slug>")]
pub fn portfolio_single(pool: &State<DbPool>, slug: &str) -> Option<RawHtml<String>> {
    let item = PortfolioItem::find_by_slug(pool, slug).filter(|i| i.is_published)?;
    let mut body = format!("<article class=\"page portfolio-item\"><h1>{}</h1>", html_escape(&item.title));
    if let Some(url) = &item.image_url {
        body.push_str(&format!(
            "<img class=\"portfolio-hero\" src=\"{}\" alt=\"{}\">",
            html_escape(url),
            html_escape(&item.title)
        ));
    }
    body.push_str(&format!("<div class=\"prose\">{}</div>", markdown_to_html(&item.body_markdown)));
    if let Some(url) = &item.project_url {
        body.push_str(&format!(
            "<p><a class=\"button\" href=\"{}\" rel=\"noopener\">Visit project</a></p>",
            html_escape(url)
        ));
    }
    body.push_str("</article>");
    Some(themed(pool, Some(&item.title), &body, &format!("/portfolio/{}", item.slug)))
}

// ── Services ───────────────────────────────────────────

#[get("/services")]
pub fn services(pool: &State<DbPool>) -> RawHtml<String> {
    let mut body = String::from("<section class=\"page services\"><h1>Services</h1><div class=\"services-grid\">");
    for s in Service::list_active(pool) {
        let features: String = s
            .features
            .iter()
            .map(|f| format!("<li>{}</li>", html_escape(f)))
            .collect();
        body.push_str(&format!(
            "<article class=\"service\" id=\"{slug}\">{icon}<h2>{title}</h2>{summary}{features}</article>",
            slug = html_escape(&s.slug),
            icon = s
                .icon
                .as_deref()
                .map(|i| format!("<span class=\"service-icon\" aria-hidden=\"true\">{}</span>", html_escape(i)))
                .unwrap_or_default(),
            title = html_escape(&s.title),
            summary = s
                .summary
                .as_deref()
                .map(|t| format!("<p>{}</p>", html_escape(t)))
                .unwrap_or_default(),
            features = if features.is_empty() {
                String::new()
            } else {
                format!("<ul class=\"service-features\">{}</ul>", features)
            },
        ));
    }
    body.push_str("</div></section>");
    themed(pool, Some("Services"), &body, "/services")
}

// ── Bug tracker ────────────────────────────────────────

#[get("/bugs?<status>")]
pub fn bugs(pool: &State<DbPool>, status: Option<String>) -> RawHtml<String> {
    let filter = status.as_deref().and_then(BugStatus::parse);
    let reports = BugReport::list(pool, filter);

    let mut body = String::from(
        "<section class=\"page bugs\"><h1>Bug tracker</h1>\
         <p>Found a problem? Submit it with <code>POST /api/bugs</code> or the form below.</p>\
         <form class=\"bug-form\" data-endpoint=\"/api/bugs\">\
         <label>Title <input name=\"title\" required maxlength=\"200\"></label>\
         <label>Description <textarea name=\"description\" required></textarea></label>\
         <label>Email (optional) <input name=\"reporter_email\" type=\"email\"></label>\
         <label>Severity <select name=\"severity\">\
         <option>low</option><option selected>medium</option><option>high</option><option>critical</option>\
         </select></label><button type=\"submit\">Report bug</button></form>",
    );
    body.push_str("<table class=\"bug-list\"><thead><tr><th>#</th><th>Title</th><th>Severity</th><th>Status</th><th>Reported</th></tr></thead><tbody>");
    for r in &reports {
        body.push_str(&format!(
            "<tr><td>{}</td><td><details><summary>{}</summary>{}</details></td><td>{}</td><td>{}</td><td>{}</td></tr>",
            r.id,
            html_escape(&r.title),
            render::text_paragraphs(&r.description),
            r.severity.as_str(),
            r.status.as_str().replace('_', " "),
            format_date(&r.created_at),
        ));
    }
    body.push_str("</tbody></table></section>");
    themed(pool, Some("Bug tracker"), &body, "/bugs")
}

// ── Accessibility ──────────────────────────────────────

#[get("/accessibility")]
pub fn accessibility(pool: &State<DbPool>) -> RawHtml<String> {
    let statement = Setting::get_or(pool, "accessibility_statement", "");
    let body = format!(
        "<article class=\"page accessibility\"><h1>Accessibility</h1><div class=\"prose\">{}</div></article>",
        markdown_to_html(&statement)
    );
    themed(pool, Some("Accessibility"), &body, "/accessibility")
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        landing,
        news_list,
        news_single,
        downloads,
        portfolio_list,
        portfolio_single,
        services,
        bugs,
        accessibility,
    ]
}
