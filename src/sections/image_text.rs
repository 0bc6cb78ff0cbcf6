use crate::models::landing::LandingSection;

use super::{cta_row, header, non_empty, open_section, section_image, ImagePosition};

pub(super) fn render(section: &LandingSection) -> String {
    // Background makes no sense beside text; treat it as the default side.
    let position = match section.image_position.as_deref().and_then(ImagePosition::parse) {
        Some(ImagePosition::Background) | None => ImagePosition::Right,
        Some(p) => p,
    };

    let mut copy = String::from("<div class=\"image-text-copy\">");
    copy.push_str(&header(section, "h2"));
    copy.push_str(&cta_row(section));
    copy.push_str("</div>");

    let media = if non_empty(&section.image_url).is_some() {
        format!(
            "<figure class=\"image-text-media\">{}</figure>",
            section_image(section, "image-text-image")
        )
    } else {
        String::new()
    };

    let mut html = open_section(section, "image-text", "");
    html.push_str(&format!(
        "<div class=\"image-text image-{}\">",
        position.as_str()
    ));
    match position {
        ImagePosition::Left | ImagePosition::Top => {
            html.push_str(&media);
            html.push_str(&copy);
        }
        _ => {
            html.push_str(&copy);
            html.push_str(&media);
        }
    }
    html.push_str("</div></section>");
    html
}
