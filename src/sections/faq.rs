use crate::models::landing::LandingSection;
use crate::render::html_escape;

use super::{content_items, cta_row, header, open_section, text};

/// Single-open accordion: at most one entry is expanded at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accordion {
    open: Option<usize>,
}

impl Accordion {
    pub fn with_open(open: Option<usize>) -> Self {
        Accordion { open }
    }

    pub fn open(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Clicking the open entry closes it; clicking any other entry opens
    /// that one and closes the previous.
    pub fn toggle(&mut self, index: usize) {
        self.open = if self.is_open(index) { None } else { Some(index) };
    }

    /// State after a click on `index`, leaving `self` untouched.
    pub fn toggled(mut self, index: usize) -> Self {
        self.toggle(index);
        self
    }
}

/// Link that moves the page to the state a click would produce.
fn toggle_href(section_key: &str, next: Accordion) -> String {
    let anchor = format!("#section-{}", section_key);
    match next.open() {
        Some(i) => format!("/?faq={}:{}{}", section_key, i, anchor),
        None => format!("/{}", anchor),
    }
}

/// `content.faqs: [{question, answer}]`
pub(super) fn render(section: &LandingSection, state: Accordion) -> String {
    let mut html = open_section(section, "faq", "");
    html.push_str(&header(section, "h2"));

    let entries: Vec<(&str, &str)> = content_items(section, "faqs")
        .map(|items| {
            items
                .iter()
                .filter_map(|item| Some((text(item, "question")?, text(item, "answer")?)))
                .collect()
        })
        .unwrap_or_default();

    if !entries.is_empty() {
        html.push_str("<div class=\"faq-list\">");
        for (i, (question, answer)) in entries.into_iter().enumerate() {
            let open = state.is_open(i);
            html.push_str(&format!(
                "<div class=\"faq-item{open_class}\" data-index=\"{i}\">\
                 <a class=\"faq-question\" href=\"{href}\" aria-expanded=\"{open}\" \
                 aria-controls=\"faq-{key}-{i}\">{q}</a>\
                 <div class=\"faq-answer\" id=\"faq-{key}-{i}\"{hidden}>{a}</div></div>",
                open_class = if open { " open" } else { "" },
                i = i,
                href = html_escape(&toggle_href(&section.section_key, state.toggled(i))),
                open = open,
                key = html_escape(&section.section_key),
                q = html_escape(question),
                hidden = if open { "" } else { " hidden" },
                a = html_escape(answer),
            ));
        }
        html.push_str("</div>");
    }

    html.push_str(&cta_row(section));
    html.push_str("</section>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::tests::section;
    use serde_json::json;

    #[test]
    fn test_accordion_single_open() {
        let mut acc = Accordion::default();
        assert_eq!(acc.open(), None);
        acc.toggle(0);
        assert_eq!(acc.open(), Some(0));
        acc.toggle(1);
        assert_eq!(acc.open(), Some(1));
        assert!(!acc.is_open(0));
        acc.toggle(1);
        assert_eq!(acc.open(), None);
    }

    #[test]
    fn test_toggled_leaves_original() {
        let acc = Accordion::with_open(Some(2));
        assert_eq!(acc.toggled(2).open(), None);
        assert_eq!(acc.toggled(0).open(), Some(0));
        assert_eq!(acc.open(), Some(2));
    }

    fn faq_section() -> LandingSection {
        section(
            "faq",
            json!({"faqs": [
                {"question": "Linux?", "answer": "Yes."},
                {"question": "No answer"},
                {"question": "Refunds?", "answer": "Within 14 days."}
            ]}),
        )
    }

    #[test]
    fn test_render_closed_state() {
        let html = render(&faq_section(), Accordion::default());
        assert_eq!(html.matches("class=\"faq-item").count(), 2);
        assert_eq!(html.matches(" hidden>").count(), 2);
        assert!(html.contains("href=\"/?faq=block:0#section-block\""));
        assert!(html.contains("href=\"/?faq=block:1#section-block\""));
    }

    #[test]
    fn test_render_open_state_links_close_and_switch() {
        let html = render(&faq_section(), Accordion::with_open(Some(1)));
        assert_eq!(html.matches("class=\"faq-item open\"").count(), 1);
        assert_eq!(html.matches(" hidden>").count(), 1);
        assert!(html.contains("aria-expanded=\"true\""));
        // open entry links back to "none open", the other switches to itself
        assert!(html.contains("href=\"/#section-block\""));
        assert!(html.contains("href=\"/?faq=block:0#section-block\""));
    }

    #[test]
    fn test_malformed_faqs_omit_list() {
        let html = render(&section("faq", json!({"faqs": {"q": "a"}})), Accordion::default());
        assert!(!html.contains("faq-list"));
        assert!(html.contains("Headline"));
    }
}
