use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Trim items, dropping blanks and repeats. First occurrence wins.
fn collect_items<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items.map(str::trim) {
        if !item.is_empty() && !out.iter().any(|seen| seen == item) {
            out.push(item.to_string());
        }
    }
    out
}

/// Split an admin-entered list on commas and newlines.
pub fn split_list(raw: &str) -> Vec<String> {
    collect_items(raw.split([',', '\n']))
}

/// A list field as sent by the admin client: either a JSON array of
/// strings, kept item by item, or one comma/newline separated string.
pub fn parse_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_list(s),
        Value::Array(items) => collect_items(items.iter().filter_map(Value::as_str)),
        _ => Vec::new(),
    }
}

/// `deserialize_with` adapter for list fields on form structs.
pub fn list_field<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_list(&value))
}

/// Optional text: blank input is stored as NULL.
pub fn clean_opt(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Use the explicit slug when given, otherwise derive one from the title.
pub fn resolve_slug(explicit: Option<&str>, title: &str) -> String {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    }
}

pub fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

/// Absolute http(s) URL or a site-relative path.
pub fn is_link(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    s.starts_with('/') || s.starts_with("https://") || s.starts_with("http://")
        || s.starts_with("mailto:") || s.starts_with('#')
}

/// Collects field errors so one response can report all of them.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, label: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(format!("{} is required", label));
        }
        self
    }

    pub fn max_len(&mut self, label: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.errors
                .push(format!("{} must be at most {} characters", label, max));
        }
        self
    }

    pub fn email(&mut self, label: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !is_email(v) {
                self.errors.push(format!("{} is not a valid email address", label));
            }
        }
        self
    }

    pub fn link(&mut self, label: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !is_link(v) {
                self.errors.push(format!("{} must be a URL or a path starting with /", label));
            }
        }
        self
    }

    pub fn check(&mut self, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(message.to_string());
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), Vec<String>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}
