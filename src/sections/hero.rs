use crate::models::landing::LandingSection;
use crate::render::html_escape;

use super::{cta_row, header, non_empty, open_section, section_image, ImagePosition};

pub(super) fn render(section: &LandingSection) -> String {
    let position = section
        .image_position
        .as_deref()
        .and_then(ImagePosition::parse)
        .unwrap_or(ImagePosition::Background);

    let background = match (position, non_empty(&section.image_url)) {
        (ImagePosition::Background, Some(url)) => format!(
            "background-image:url('{}');background-size:cover;background-position:center;",
            url.replace('\'', "%27")
        ),
        _ => String::new(),
    };

    let mut html = open_section(section, "hero", &background);
    html.push_str(&format!(
        "<div class=\"hero-inner hero-image-{}\">",
        position.as_str()
    ));
    if position == ImagePosition::Top {
        html.push_str(&section_image(section, "hero-image"));
    }
    html.push_str("<div class=\"hero-copy\">");
    html.push_str(&header(section, "h1"));
    html.push_str(&cta_row(section));
    html.push_str("</div>");
    if matches!(
        position,
        ImagePosition::Left | ImagePosition::Right | ImagePosition::Bottom
    ) {
        html.push_str(&section_image(section, "hero-image"));
    }
    html.push_str("</div></section>");

    if background.is_empty() {
        return html;
    }
    // Background heroes keep the alt text for screen readers.
    match non_empty(&section.image_alt) {
        Some(alt) => html.replacen(
            "<div class=\"hero-copy\">",
            &format!(
                "<span class=\"sr-only\">{}</span><div class=\"hero-copy\">",
                html_escape(alt)
            ),
            1,
        ),
        None => html,
    }
}

#[cfg(test)]
mod tests {
    use crate::sections::tests::section;
    use serde_json::json;

    #[test]
    fn test_background_image_goes_into_style() {
        let mut s = section("hero", json!({}));
        s.image_url = Some("/uploads/sky.png".into());
        s.image_alt = Some("Night sky".into());
        let html = super::render(&s);
        assert!(html.contains("background-image:url('/uploads/sky.png')"));
        assert!(html.contains("<span class=\"sr-only\">Night sky</span>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("<h1 class=\"section-headline\">Headline</h1>"));
    }

    #[test]
    fn test_side_image_renders_img() {
        let mut s = section("hero", json!({}));
        s.image_url = Some("/uploads/p.png".into());
        s.image_position = Some("right".into());
        let html = super::render(&s);
        assert!(html.contains("hero-image-right"));
        assert!(html.contains("<img class=\"hero-image\" src=\"/uploads/p.png\""));
    }
}
