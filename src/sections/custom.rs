use crate::models::landing::LandingSection;

use super::{cta_row, header, open_section, text};

/// `content: {html?}`. The markup is authored by site admins and emitted as is.
pub(super) fn render(section: &LandingSection) -> String {
    let mut html = open_section(section, "custom", "");
    html.push_str(&header(section, "h2"));
    if let Some(body) = text(&section.content, "html") {
        html.push_str(&format!("<div class=\"custom-body\">{}</div>", body));
    }
    html.push_str(&cta_row(section));
    html.push_str("</section>");
    html
}
