use chrono::NaiveDateTime;
use pulldown_cmark::{html, Options, Parser};

use crate::theme::{FooterLayout, NavigationStyle, ThemeSettings};

/// Primary navigation, in display order.
const NAV_LINKS: &[(&str, &str)] = &[
    ("News", "/news"),
    ("Portfolio", "/portfolio"),
    ("Services", "/services"),
    ("Downloads", "/downloads"),
];

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render admin-authored markdown (news, portfolio, changelogs, statements).
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format("%B %d, %Y").to_string()
}

/// Plain-text paragraphs from untrusted input (bug reports).
pub fn text_paragraphs(s: &str) -> String {
    s.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", html_escape(p).replace('\n', "<br>")))
        .collect()
}

fn nav_links(current_path: &str) -> String {
    NAV_LINKS
        .iter()
        .map(|(label, href)| {
            let active = current_path == *href || current_path.starts_with(&format!("{}/", href));
            format!(
                "<a href=\"{}\"{}>{}</a>",
                href,
                if active { " class=\"active\" aria-current=\"page\"" } else { "" },
                label
            )
        })
        .collect()
}

fn build_navigation(theme: &ThemeSettings, current_path: &str) -> String {
    let brand = format!(
        "<a class=\"site-brand\" href=\"/\">{}</a>",
        html_escape(&theme.site_title)
    );
    let style = theme.navigation_style;
    let inner = match style {
        NavigationStyle::Classic => format!("{}<nav class=\"site-nav\">{}</nav>", brand, nav_links(current_path)),
        NavigationStyle::Minimal => format!(
            "{}<details class=\"site-nav-menu\"><summary>Menu</summary><nav class=\"site-nav\">{}</nav></details>",
            brand,
            nav_links(current_path)
        ),
        NavigationStyle::Split => {
            let (left, right) = NAV_LINKS.split_at(NAV_LINKS.len() / 2);
            let side = |items: &[(&str, &str)]| -> String {
                items
                    .iter()
                    .map(|(label, href)| format!("<a href=\"{}\">{}</a>", href, label))
                    .collect()
            };
            format!(
                "<nav class=\"site-nav site-nav-left\">{}</nav>{}<nav class=\"site-nav site-nav-right\">{}</nav>",
                side(left),
                brand,
                side(right)
            )
        }
    };
    format!(
        "<header class=\"site-header nav-{}\">{}</header>",
        style.as_str(),
        inner
    )
}

fn build_footer_links(theme: &ThemeSettings) -> String {
    let mut html = String::new();
    for section in &theme.footer_sections {
        html.push_str("<div class=\"footer-section\">");
        if !section.title.is_empty() {
            html.push_str(&format!("<h4>{}</h4>", html_escape(&section.title)));
        }
        if !section.links.is_empty() {
            html.push_str("<ul>");
            for link in &section.links {
                let target = if link.external {
                    " target=\"_blank\" rel=\"noopener\""
                } else {
                    ""
                };
                html.push_str(&format!(
                    "<li><a href=\"{}\"{}>{}</a></li>",
                    html_escape(&link.href),
                    target,
                    html_escape(&link.label)
                ));
            }
            html.push_str("</ul>");
        }
        html.push_str("</div>");
    }
    html
}

fn build_footer(theme: &ThemeSettings) -> String {
    let mut brand = String::new();
    if !theme.footer_brand_name.is_empty() {
        brand.push_str(&format!(
            "<p class=\"footer-brand-name\">{}</p>",
            html_escape(&theme.footer_brand_name)
        ));
    }
    if let Some(desc) = &theme.footer_brand_description {
        brand.push_str(&format!(
            "<p class=\"footer-brand-description\">{}</p>",
            html_escape(desc)
        ));
    }
    if !theme.footer_badges.is_empty() {
        brand.push_str("<ul class=\"footer-badges\">");
        for badge in &theme.footer_badges {
            brand.push_str(&format!("<li>{}</li>", html_escape(badge)));
        }
        brand.push_str("</ul>");
    }

    let mut meta = String::new();
    for line in &theme.footer_meta_lines {
        meta.push_str(&format!("<p>{}</p>", html_escape(line)));
    }
    if theme.footer_show_updated_at {
        meta.push_str(&format!(
            "<p class=\"footer-updated\">Last updated <time datetime=\"{}\">{}</time></p>",
            theme.updated_at.to_rfc3339(),
            theme.updated_at.format("%B %d, %Y")
        ));
    }

    let body = match theme.footer_layout {
        FooterLayout::Columns => format!(
            "<div class=\"footer-columns\"><div class=\"footer-brand\">{}</div>{}</div>",
            brand,
            build_footer_links(theme)
        ),
        FooterLayout::Compact => format!(
            "<div class=\"footer-compact\"><div class=\"footer-brand\">{}</div><nav class=\"footer-inline\">{}</nav></div>",
            brand,
            build_footer_links(theme)
        ),
    };

    format!(
        "<footer class=\"site-footer footer-{}\">{}<div class=\"footer-meta\">{}</div></footer>",
        theme.footer_layout.as_str(),
        body,
        meta
    )
}

/// Wrap a page body in the site chrome driven by the theme settings.
pub fn render_page(theme: &ThemeSettings, title: Option<&str>, body: &str, current_path: &str) -> String {
    let full_title = match title {
        Some(t) if !t.is_empty() => format!("{} | {}", t, theme.site_title),
        _ => theme.site_title.clone(),
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/static/site.css\">\n\
         <style>:root{{--color-primary:{primary};--color-accent:{accent};}}</style>\n\
         </head>\n<body>\n\
         <a class=\"skip-link\" href=\"#main\">Skip to content</a>\n\
         {nav}\n<main id=\"main\">\n{body}\n</main>\n{footer}\n</body>\n</html>",
        title = html_escape(&full_title),
        primary = theme.primary_color,
        accent = theme.accent_color,
        nav = build_navigation(theme, current_path),
        body = body,
        footer = build_footer(theme),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{FooterLink, FooterSection};

    #[test]
    fn test_markdown_renders() {
        let html = markdown_to_html("# Patch\n\n- fixed ~~bug~~");
        assert!(html.contains("<h1>Patch</h1>"));
        assert!(html.contains("<del>bug</del>"));
    }

    #[test]
    fn test_text_paragraphs_escape() {
        assert_eq!(
            text_paragraphs("a <b>\nline\n\n\nsecond"),
            "<p>a &lt;b&gt;<br>line</p><p>second</p>"
        );
    }

    #[test]
    fn test_page_uses_theme_colors_and_styles() {
        let theme = ThemeSettings {
            primary_color: "#ABC".into(),
            navigation_style: NavigationStyle::Split,
            footer_layout: FooterLayout::Compact,
            ..ThemeSettings::default()
        };
        let html = render_page(&theme, Some("News"), "<p>x</p>", "/news");
        assert!(html.contains("--color-primary:#ABC;"));
        assert!(html.contains("nav-split"));
        assert!(html.contains("footer-compact"));
        assert!(html.contains("<title>News | ArcanePixels</title>"));
    }

    #[test]
    fn test_footer_links_and_meta() {
        let theme = ThemeSettings {
            footer_badges: vec!["Indie".into()],
            footer_sections: vec![FooterSection {
                title: "Elsewhere".into(),
                links: vec![FooterLink {
                    label: "Itch".into(),
                    href: "https://itch.io".into(),
                    external: true,
                }],
            }],
            footer_meta_lines: vec![],
            footer_show_updated_at: true,
            ..ThemeSettings::default()
        };
        let html = build_footer(&theme);
        assert!(html.contains("<h4>Elsewhere</h4>"));
        assert!(html.contains("href=\"https://itch.io\" target=\"_blank\""));
        assert!(html.contains("<ul class=\"footer-badges\"><li>Indie</li></ul>"));
        assert!(html.contains("Last updated"));
    }

    #[test]
    fn test_active_nav_link() {
        let html = build_navigation(&ThemeSettings::default(), "/news/launch");
        assert!(html.contains("<a href=\"/news\" class=\"active\" aria-current=\"page\">News</a>"));
        assert!(html.contains("<a href=\"/portfolio\">Portfolio</a>"));
    }
}
