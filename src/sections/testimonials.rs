use crate::models::landing::LandingSection;
use crate::render::html_escape;

use super::{content_items, cta_row, header, open_section, text};

/// `content.testimonials: [{quote, author, role?, company?, avatar?}]`
pub(super) fn render(section: &LandingSection) -> String {
    let mut html = open_section(section, "testimonials", "");
    html.push_str(&header(section, "h2"));

    let mut cards = String::new();
    for item in content_items(section, "testimonials").into_iter().flatten() {
        let (Some(quote), Some(author)) = (text(item, "quote"), text(item, "author")) else {
            continue;
        };
        cards.push_str("<figure class=\"testimonial\">");
        cards.push_str(&format!(
            "<blockquote>{}</blockquote><figcaption>",
            html_escape(quote)
        ));
        if let Some(avatar) = text(item, "avatar") {
            cards.push_str(&format!(
                "<img class=\"testimonial-avatar\" src=\"{}\" alt=\"\" loading=\"lazy\">",
                html_escape(avatar)
            ));
        }
        cards.push_str(&format!(
            "<span class=\"testimonial-author\">{}</span>",
            html_escape(author)
        ));
        let affiliation: Vec<&str> = [text(item, "role"), text(item, "company")]
            .into_iter()
            .flatten()
            .collect();
        if !affiliation.is_empty() {
            cards.push_str(&format!(
                "<span class=\"testimonial-role\">{}</span>",
                html_escape(&affiliation.join(", "))
            ));
        }
        cards.push_str("</figcaption></figure>");
    }

    if !cards.is_empty() {
        html.push_str(&format!("<div class=\"testimonial-list\">{}</div>", cards));
    }
    html.push_str(&cta_row(section));
    html.push_str("</section>");
    html
}
