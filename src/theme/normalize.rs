//! Merge an untrusted partial theme payload over a base record.
//!
//! Every function here is total: bad input never produces an error, it
//! produces the fallback. Fields absent from the payload keep the base value.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use super::{FooterLayout, FooterLink, FooterSection, NavigationStyle, ThemeSettings};

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#(?:[0-9a-f]{3}|[0-9a-f]{6})$").expect("hex color pattern")
});

/// One field of a partial update.
///
/// `Unset` is a key missing from the payload, `Clear` is an explicit `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Patch<T> {
    Unset,
    Clear,
    Value(T),
}

impl<'a> Patch<&'a Value> {
    pub fn field(input: &'a Value, key: &str) -> Self {
        match input.get(key) {
            None => Patch::Unset,
            Some(Value::Null) => Patch::Clear,
            Some(v) => Patch::Value(v),
        }
    }

    fn as_str(&self) -> Option<&'a str> {
        match self {
            Patch::Value(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

pub fn is_hex_color(s: &str) -> bool {
    HEX_COLOR.is_match(s)
}

fn color(patch: Patch<&Value>, fallback: &str) -> String {
    match patch.as_str().map(str::trim) {
        Some(s) if is_hex_color(s) => s.to_string(),
        _ => fallback.to_string(),
    }
}

fn enumerated<T: Copy>(patch: Patch<&Value>, fallback: T, parse: fn(&str) -> Option<T>) -> T {
    patch.as_str().and_then(parse).unwrap_or(fallback)
}

/// Blank input reverts to the fallback.
fn required_string(patch: Patch<&Value>, fallback: &str) -> String {
    match patch.as_str().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

/// Blank input is kept as an explicit empty value.
fn string_allow_empty(patch: Patch<&Value>, fallback: &str) -> String {
    match patch.as_str() {
        Some(s) => s.trim().to_string(),
        None => fallback.to_string(),
    }
}

fn nullable_string(patch: Patch<&Value>, fallback: Option<&str>) -> Option<String> {
    match patch {
        Patch::Unset => fallback.map(str::to_string),
        Patch::Clear => None,
        Patch::Value(Value::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Patch::Value(_) => None,
    }
}

fn boolean(patch: Patch<&Value>, fallback: bool) -> bool {
    match patch {
        Patch::Value(Value::Bool(b)) => *b,
        Patch::Value(Value::String(s)) if s == "true" => true,
        Patch::Value(Value::String(s)) if s == "false" => false,
        _ => fallback,
    }
}

fn string_list(patch: Patch<&Value>, fallback: &[String], dedupe: bool) -> Vec<String> {
    let items = match patch {
        Patch::Unset => return fallback.to_vec(),
        Patch::Clear => return Vec::new(),
        Patch::Value(Value::Array(items)) => items,
        Patch::Value(_) => return fallback.to_vec(),
    };

    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for s in items.iter().filter_map(Value::as_str).map(str::trim) {
        if s.is_empty() || (dedupe && out.iter().any(|seen| seen == s)) {
            continue;
        }
        out.push(s.to_string());
    }
    out
}

fn footer_link(v: &Value) -> Option<FooterLink> {
    let text = |key: &str| {
        v.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };
    let label = text("label")?;
    let href = text("href")?;
    let external = v
        .get("external")
        .and_then(Value::as_bool)
        .unwrap_or_else(|| href.starts_with("http"));
    Some(FooterLink {
        label: label.to_string(),
        href: href.to_string(),
        external,
    })
}

fn footer_section(v: &Value) -> Option<FooterSection> {
    let title = v
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    let links: Vec<FooterLink> = v
        .get("links")
        .and_then(Value::as_array)
        .map(|links| links.iter().filter_map(footer_link).collect())
        .unwrap_or_default();

    if title.is_empty() && links.is_empty() {
        return None;
    }
    Some(FooterSection {
        title: title.to_string(),
        links,
    })
}

fn footer_sections(patch: Patch<&Value>, fallback: &[FooterSection]) -> Vec<FooterSection> {
    match patch {
        Patch::Unset => fallback.to_vec(),
        Patch::Clear => Vec::new(),
        Patch::Value(Value::Array(items)) => items.iter().filter_map(footer_section).collect(),
        Patch::Value(_) => fallback.to_vec(),
    }
}

fn timestamp(patch: Patch<&Value>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    patch
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(fallback)
}

/// Apply `input` over `base`. Timestamps are carried over from `base` unchanged.
pub fn normalize(input: &Value, base: &ThemeSettings) -> ThemeSettings {
    let field = |key: &str| Patch::field(input, key);

    ThemeSettings {
        site_title: required_string(field("siteTitle"), &base.site_title),
        primary_color: color(field("primaryColor"), &base.primary_color),
        accent_color: color(field("accentColor"), &base.accent_color),
        navigation_style: enumerated(
            field("navigationStyle"),
            base.navigation_style,
            NavigationStyle::parse,
        ),
        footer_layout: enumerated(field("footerLayout"), base.footer_layout, FooterLayout::parse),
        footer_brand_name: string_allow_empty(field("footerBrandName"), &base.footer_brand_name),
        footer_brand_description: nullable_string(
            field("footerBrandDescription"),
            base.footer_brand_description.as_deref(),
        ),
        footer_badges: string_list(field("footerBadges"), &base.footer_badges, true),
        footer_sections: footer_sections(field("footerSections"), &base.footer_sections),
        footer_meta_lines: string_list(field("footerMetaLines"), &base.footer_meta_lines, false),
        footer_show_updated_at: boolean(
            field("footerShowUpdatedAt"),
            base.footer_show_updated_at,
        ),
        created_at: base.created_at,
        updated_at: base.updated_at,
    }
}

/// Write path: normalize an incoming update and stamp it with `now`.
pub fn sanitize_update(input: &Value, base: &ThemeSettings, now: DateTime<Utc>) -> ThemeSettings {
    ThemeSettings {
        updated_at: now,
        ..normalize(input, base)
    }
}

/// Read path: map a stored row (camelCase keys) onto the defaults.
///
/// Keys missing from `row` take the default; the row's own timestamps are
/// kept as stored.
pub fn from_stored(row: &Value) -> ThemeSettings {
    let defaults = ThemeSettings::default();
    let mut settings = normalize(row, &defaults);
    settings.created_at = timestamp(Patch::field(row, "createdAt"), defaults.created_at);
    settings.updated_at = timestamp(Patch::field(row, "updatedAt"), settings.created_at);
    settings
}
