use crate::models::landing::LandingSection;

use super::{cta_row, header, open_section};

pub(super) fn render(section: &LandingSection) -> String {
    let mut html = open_section(section, "cta", "");
    html.push_str("<div class=\"cta-banner\">");
    html.push_str(&header(section, "h2"));
    html.push_str(&cta_row(section));
    html.push_str("</div></section>");
    html
}
