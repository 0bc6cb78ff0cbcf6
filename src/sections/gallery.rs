use crate::models::landing::LandingSection;
use crate::render::html_escape;

use super::{content_items, cta_row, header, open_section, text};

/// `content.images: [{url, alt?, caption?}]`
pub(super) fn render(section: &LandingSection) -> String {
    let mut html = open_section(section, "gallery", "");
    html.push_str(&header(section, "h2"));

    let figures: Vec<String> = content_items(section, "images")
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let url = text(item, "url")?;
                    let mut fig = format!(
                        "<figure class=\"gallery-item\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                        html_escape(url),
                        html_escape(text(item, "alt").unwrap_or(""))
                    );
                    if let Some(caption) = text(item, "caption") {
                        fig.push_str(&format!("<figcaption>{}</figcaption>", html_escape(caption)));
                    }
                    fig.push_str("</figure>");
                    Some(fig)
                })
                .collect()
        })
        .unwrap_or_default();

    if !figures.is_empty() {
        html.push_str(&format!("<div class=\"gallery-grid\">{}</div>", figures.concat()));
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
    fn test_images_need_url() {
        let s = section(
            "gallery",
            json!({"images": [
                {"url": "/a.png", "alt": "A", "caption": "First"},
                {"alt": "missing url"},
                {"url": "  "},
                {"url": "/b.png"}
            ]}),
        );
        let html = super::render(&s);
        assert_eq!(html.matches("class=\"gallery-item\"").count(), 2);
        assert!(html.contains("<figcaption>First</figcaption>"));
        assert!(html.contains("src=\"/b.png\" alt=\"\""));
    }

    #[test]
    fn test_no_images_no_grid() {
        let html = super::render(&section("gallery", json!({"images": null})));
        assert!(!html.contains("gallery-grid"));
        assert!(html.contains("Headline"));
    }
}
