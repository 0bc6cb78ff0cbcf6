use crate::models::landing::LandingSection;
use crate::render::html_escape;

use super::{cta_row, header, open_section, text};

/// `content: {email?, phone?, address?}`
pub(super) fn render(section: &LandingSection) -> String {
    let content = &section.content;
    let mut details = String::new();

    if let Some(email) = text(content, "email") {
        details.push_str(&format!(
            "<div class=\"contact-detail contact-email\"><dt>Email</dt><dd><a href=\"mailto:{}\">{}</a></dd></div>",
            html_escape(email),
            html_escape(email)
        ));
    }
    if let Some(phone) = text(content, "phone") {
        let dial: String = phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        details.push_str(&format!(
            "<div class=\"contact-detail contact-phone\"><dt>Phone</dt><dd><a href=\"tel:{}\">{}</a></dd></div>",
            dial,
            html_escape(phone)
        ));
    }
    if let Some(address) = text(content, "address") {
        details.push_str(&format!(
            "<div class=\"contact-detail contact-address\"><dt>Address</dt><dd>{}</dd></div>",
            html_escape(address).replace('\n', "<br>")
        ));
    }

    let mut html = open_section(section, "contact", "");
    html.push_str(&header(section, "h2"));
    if !details.is_empty() {
        html.push_str(&format!("<dl class=\"contact-details\">{}</dl>", details));
    }
    html.push_str(&cta_row(section));
    html.push_str("</section>");
    html
}
