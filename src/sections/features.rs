use crate::models::landing::LandingSection;
use crate::render::html_escape;

use super::{content_items, cta_row, header, open_section, text};

/// `content.features: [{title, description?, icon?}]`
pub(super) fn render(section: &LandingSection) -> String {
    let mut html = open_section(section, "features", "");
    html.push_str(&header(section, "h2"));

    if let Some(items) = content_items(section, "features") {
        let mut grid = String::new();
        for item in items {
            let Some(title) = text(item, "title") else {
                continue;
            };
            grid.push_str("<article class=\"feature-card\">");
            if let Some(icon) = text(item, "icon") {
                grid.push_str(&format!(
                    "<span class=\"feature-icon\" aria-hidden=\"true\">{}</span>",
                    html_escape(icon)
                ));
            }
            grid.push_str(&format!("<h3>{}</h3>", html_escape(title)));
            if let Some(desc) = text(item, "description") {
                grid.push_str(&format!("<p>{}</p>", html_escape(desc)));
            }
            grid.push_str("</article>");
        }
        if !grid.is_empty() {
            html.push_str(&format!("<div class=\"feature-grid\">{}</div>", grid));
        }
    }

    html.push_str(&cta_row(section));
    html.push_str("</section>");
    html
}

#[cfg(test)]
mod tests {
    use crate::sections::tests::section;
    use serde_json::json;

    #[test]
    fn test_cards_for_valid_entries_only() {
        let s = section(
            "features",
            json!({"features": [
                {"title": "Fast", "description": "Really", "icon": "⚡"},
                {"description": "no title"},
                "junk",
                {"title": "Open"}
            ]}),
        );
        let html = super::render(&s);
        assert_eq!(html.matches("class=\"feature-card\"").count(), 2);
        assert!(html.contains("<h3>Fast</h3><p>Really</p>"));
    }

    #[test]
    fn test_missing_or_wrong_shape_omits_grid() {
        for content in [json!({}), json!({"features": "Fast"}), json!({"features": {}}), json!([])] {
            let html = super::render(&section("features", content));
            assert!(!html.contains("feature-grid"));
            assert!(html.contains("Headline"));
            assert!(html.contains("href=\"/go\""));
        }
    }
}
