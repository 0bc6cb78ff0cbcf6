use serde_json::Value;

use crate::models::landing::LandingSection;
use crate::render::html_escape;

use super::{content_items, cta_row, header, link_button, open_section, text};

/// Prices may be authored as text ("$9") or as a bare number.
fn price_label(plan: &Value) -> Option<String> {
    match plan.get("price")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn plan_card(plan: &Value) -> Option<String> {
    let name = text(plan, "name")?;
    let highlighted = plan
        .get("highlighted")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut card = format!(
        "<article class=\"pricing-card{}\"><h3>{}</h3>",
        if highlighted { " highlighted" } else { "" },
        html_escape(name)
    );
    if let Some(price) = price_label(plan) {
        card.push_str(&format!(
            "<p class=\"pricing-price\">{}",
            html_escape(&price)
        ));
        if let Some(period) = text(plan, "period") {
            card.push_str(&format!(
                "<span class=\"pricing-period\">/{}</span>",
                html_escape(period)
            ));
        }
        card.push_str("</p>");
    }
    if let Some(desc) = text(plan, "description") {
        card.push_str(&format!("<p class=\"pricing-description\">{}</p>", html_escape(desc)));
    }
    let features: Vec<&str> = plan
        .get("features")
        .and_then(Value::as_array)
        .map(|f| {
            f.iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if !features.is_empty() {
        card.push_str("<ul class=\"pricing-features\">");
        for f in features {
            card.push_str(&format!("<li>{}</li>", html_escape(f)));
        }
        card.push_str("</ul>");
    }
    if let (Some(label), Some(url)) = (text(plan, "cta_label"), text(plan, "cta_url")) {
        card.push_str(&link_button(label, url, "btn pricing-cta"));
    }
    card.push_str("</article>");
    Some(card)
}

/// `content.plans: [{name, price, period?, description?, features[], highlighted?, cta_label?, cta_url?}]`
pub(super) fn render(section: &LandingSection) -> String {
    let mut html = open_section(section, "pricing", "");
    html.push_str(&header(section, "h2"));

    let cards: Vec<String> = content_items(section, "plans")
        .map(|plans| plans.iter().filter_map(plan_card).collect())
        .unwrap_or_default();
    if !cards.is_empty() {
        html.push_str(&format!("<div class=\"pricing-grid\">{}</div>", cards.concat()));
    }

    html.push_str(&cta_row(section));
    html.push_str("</section>");
    html
}
