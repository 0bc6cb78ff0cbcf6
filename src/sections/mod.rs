//! Landing page sections.
//!
//! Each stored section names its presentation through `section_type`.
//! `render_section` matches on the parsed type and hands the record, unchanged,
//! to exactly one variant. Types this build does not know render as `custom`.

use serde_json::Value;

use crate::models::landing::LandingSection;
use crate::render::html_escape;

mod contact;
mod cta;
mod custom;
mod faq;
mod features;
mod gallery;
mod hero;
mod image_text;
mod pricing;
mod testimonials;

pub use faq::Accordion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionType {
    Hero,
    Features,
    Cta,
    ImageText,
    Gallery,
    Testimonials,
    Pricing,
    Faq,
    Contact,
    Custom,
    /// Stored value this build does not recognise (empty when missing).
    Unknown(String),
}

impl SectionType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "hero" => Self::Hero,
            "features" => Self::Features,
            "cta" => Self::Cta,
            "image-text" => Self::ImageText,
            "gallery" => Self::Gallery,
            "testimonials" => Self::Testimonials,
            "pricing" => Self::Pricing,
            "faq" => Self::Faq,
            "contact" => Self::Contact,
            "custom" => Self::Custom,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Hero => "hero",
            Self::Features => "features",
            Self::Cta => "cta",
            Self::ImageText => "image-text",
            Self::Gallery => "gallery",
            Self::Testimonials => "testimonials",
            Self::Pricing => "pricing",
            Self::Faq => "faq",
            Self::Contact => "contact",
            Self::Custom => "custom",
            Self::Unknown(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePosition {
    Left,
    Right,
    Top,
    Bottom,
    Background,
}

impl ImagePosition {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "background" => Some(Self::Background),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Background => "background",
        }
    }
}

/// Per-request interactive state: which FAQ entry is open, by section key.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    open_faq: Option<(String, usize)>,
}

impl RenderState {
    /// Parse the `faq` query value, `<section_key>:<index>`.
    pub fn from_query(faq: Option<&str>) -> Self {
        let open_faq = faq.and_then(|raw| {
            let (key, idx) = raw.rsplit_once(':')?;
            Some((key.to_string(), idx.parse().ok()?))
        });
        RenderState { open_faq }
    }

    pub fn accordion_for(&self, section_key: &str) -> Accordion {
        match &self.open_faq {
            Some((key, idx)) if key == section_key => Accordion::with_open(Some(*idx)),
            _ => Accordion::default(),
        }
    }
}

/// Render one section, or nothing when it is inactive.
pub fn render_section(section: &LandingSection, state: &RenderState) -> Option<String> {
    if !section.is_active {
        return None;
    }
    let html = match section.kind() {
        SectionType::Hero => hero::render(section),
        SectionType::Features => features::render(section),
        SectionType::Cta => cta::render(section),
        SectionType::ImageText => image_text::render(section),
        SectionType::Gallery => gallery::render(section),
        SectionType::Testimonials => testimonials::render(section),
        SectionType::Pricing => pricing::render(section),
        SectionType::Faq => faq::render(section, state.accordion_for(&section.section_key)),
        SectionType::Contact => contact::render(section),
        SectionType::Custom | SectionType::Unknown(_) => custom::render(section),
    };
    Some(html)
}

/// Render the active sections in display order.
pub fn render_sections(sections: &[LandingSection], state: &RenderState) -> String {
    let mut ordered: Vec<&LandingSection> = sections.iter().filter(|s| s.is_active).collect();
    ordered.sort_by_key(|s| (s.sort_order, s.id));
    ordered
        .into_iter()
        .filter_map(|s| render_section(s, state))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Shared pieces ──────────────────────────────────────

/// Opening `<section>` tag. `variant` is the presentation actually used.
pub(crate) fn open_section(section: &LandingSection, variant: &str, extra_style: &str) -> String {
    let mut style = String::new();
    if let Some(bg) = non_empty(&section.background_color) {
        style.push_str(&format!("background-color:{};", bg));
    }
    if let Some(fg) = non_empty(&section.text_color) {
        style.push_str(&format!("color:{};", fg));
    }
    style.push_str(extra_style);
    let style_attr = if style.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", html_escape(&style))
    };
    format!(
        "<section id=\"section-{key}\" class=\"landing-section section-{variant}\" data-variant=\"{variant}\"{style_attr}>",
        key = html_escape(&section.section_key),
        variant = variant,
        style_attr = style_attr,
    )
}

/// Headline, subheadline and description, whichever are set.
pub(crate) fn header(section: &LandingSection, heading_tag: &str) -> String {
    let mut html = String::new();
    if let Some(sub) = non_empty(&section.subheadline) {
        html.push_str(&format!("<p class=\"section-eyebrow\">{}</p>", html_escape(sub)));
    }
    if let Some(h) = non_empty(&section.headline) {
        html.push_str(&format!(
            "<{tag} class=\"section-headline\">{}</{tag}>",
            html_escape(h),
            tag = heading_tag
        ));
    }
    if let Some(d) = non_empty(&section.description) {
        html.push_str(&format!("<p class=\"section-description\">{}</p>", html_escape(d)));
    }
    if html.is_empty() {
        return html;
    }
    format!("<header class=\"section-header\">{}</header>", html)
}

/// Primary and secondary call-to-action links. A CTA needs both label and URL.
pub(crate) fn cta_row(section: &LandingSection) -> String {
    let mut html = String::new();
    let pairs = [
        (&section.cta_label, &section.cta_url, "btn btn-primary"),
        (&section.secondary_cta_label, &section.secondary_cta_url, "btn btn-secondary"),
    ];
    for (label, url, class) in pairs {
        if let (Some(label), Some(url)) = (non_empty(label), non_empty(url)) {
            html.push_str(&link_button(label, url, class));
        }
    }
    if html.is_empty() {
        return html;
    }
    format!("<div class=\"section-ctas\">{}</div>", html)
}

pub(crate) fn link_button(label: &str, url: &str, class: &str) -> String {
    let external = if url.starts_with("http") {
        " target=\"_blank\" rel=\"noopener\""
    } else {
        ""
    };
    format!(
        "<a class=\"{}\" href=\"{}\"{}>{}</a>",
        class,
        html_escape(url),
        external,
        html_escape(label)
    )
}

pub(crate) fn section_image(section: &LandingSection, class: &str) -> String {
    match non_empty(&section.image_url) {
        Some(url) => format!(
            "<img class=\"{}\" src=\"{}\" alt=\"{}\" loading=\"lazy\">",
            class,
            html_escape(url),
            html_escape(non_empty(&section.image_alt).unwrap_or(""))
        ),
        None => String::new(),
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `content[key]` when it is an array; anything else counts as absent.
pub(crate) fn content_items<'a>(section: &'a LandingSection, key: &str) -> Option<&'a Vec<Value>> {
    section.content.get(key).and_then(Value::as_array)
}

/// Non-blank string field of a content entry.
pub(crate) fn text<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    pub(crate) fn section(kind: &str, content: Value) -> LandingSection {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        LandingSection {
            id: 1,
            section_key: "block".to_string(),
            section_type: kind.to_string(),
            headline: Some("Headline".to_string()),
            subheadline: None,
            description: Some("Description".to_string()),
            cta_label: Some("Go".to_string()),
            cta_url: Some("/go".to_string()),
            secondary_cta_label: None,
            secondary_cta_url: None,
            image_url: None,
            image_alt: None,
            image_position: None,
            background_color: None,
            text_color: None,
            content,
            is_active: true,
            sort_order: 0,
            created_at: t,
            updated_at: t,
        }
    }

    fn variant_of(html: &str) -> &str {
        let start = html.find("data-variant=\"").unwrap() + "data-variant=\"".len();
        let end = html[start..].find('"').unwrap();
        &html[start..start + end]
    }

    #[test]
    fn test_parse_known_types() {
        for raw in [
            "hero", "features", "cta", "image-text", "gallery", "testimonials", "pricing",
            "faq", "contact", "custom",
        ] {
            let t = SectionType::parse(raw);
            assert!(!matches!(t, SectionType::Unknown(_)), "{}", raw);
            assert_eq!(t.as_str(), raw);
        }
        assert_eq!(SectionType::parse("Hero"), SectionType::Unknown("Hero".to_string()));
    }

    #[test]
    fn test_each_type_renders_its_own_variant() {
        let state = RenderState::default();
        for raw in [
            "hero", "features", "cta", "image-text", "gallery", "testimonials", "pricing",
            "faq", "contact", "custom",
        ] {
            let html = render_section(&section(raw, json!({})), &state).unwrap();
            assert_eq!(variant_of(&html), raw);
        }
    }

    #[test]
    fn test_unknown_or_missing_type_renders_custom() {
        let state = RenderState::default();
        let content = json!({"html": "<p>raw</p>"});
        let custom = render_section(&section("custom", content.clone()), &state).unwrap();
        for raw in ["", "carousel", "FAQ"] {
            let html = render_section(&section(raw, content.clone()), &state).unwrap();
            assert_eq!(variant_of(&html), "custom");
            assert_eq!(html, custom);
        }
    }

    #[test]
    fn test_inactive_renders_nothing() {
        let state = RenderState::default();
        for raw in ["hero", "faq", "bogus"] {
            let mut s = section(raw, json!({"faqs": [{"question": "q", "answer": "a"}]}));
            s.is_active = false;
            assert!(render_section(&s, &state).is_none());
        }
    }

    #[test]
    fn test_render_sections_orders_and_skips_inactive() {
        let mut a = section("cta", json!({}));
        a.id = 1;
        a.section_key = "a".into();
        a.sort_order = 2;
        let mut b = section("cta", json!({}));
        b.id = 2;
        b.section_key = "b".into();
        b.sort_order = 1;
        let mut c = section("cta", json!({}));
        c.id = 3;
        c.section_key = "c".into();
        c.is_active = false;
        let html = render_sections(&[a, b, c], &RenderState::default());
        let pos_a = html.find("section-a\"").unwrap();
        let pos_b = html.find("section-b\"").unwrap();
        assert!(pos_b < pos_a);
        assert!(!html.contains("section-c\""));
    }

    #[test]
    fn test_color_overrides_pass_through() {
        let mut s = section("cta", json!({}));
        s.background_color = Some("rebeccapurple".into());
        s.text_color = Some("var(--ink)".into());
        let html = render_section(&s, &RenderState::default()).unwrap();
        assert!(html.contains("style=\"background-color:rebeccapurple;color:var(--ink);\""));
    }

    #[test]
    fn test_render_does_not_mutate_record() {
        let s = section("pricing", json!({"plans": "not-a-list"}));
        let before = s.clone();
        let _ = render_section(&s, &RenderState::default());
        assert_eq!(s, before);
    }

    #[test]
    fn test_render_state_from_query() {
        let state = RenderState::from_query(Some("help:faq:2"));
        assert_eq!(state.accordion_for("help:faq").open(), Some(2));
        assert_eq!(state.accordion_for("other").open(), None);
        assert_eq!(RenderState::from_query(Some("x:y")).accordion_for("x").open(), None);
        assert_eq!(RenderState::from_query(None).accordion_for("x").open(), None);
    }

    #[test]
    fn test_header_escapes_text() {
        let mut s = section("cta", json!({}));
        s.headline = Some("<b>Bold</b>".into());
        let html = render_section(&s, &RenderState::default()).unwrap();
        assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt;"));
    }
}
