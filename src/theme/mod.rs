use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod normalize;

pub use normalize::{from_stored, normalize, sanitize_update, Patch};

/// Key of the single persisted theme row.
pub const THEME_ROW_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationStyle {
    Classic,
    Minimal,
    Split,
}

impl NavigationStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "classic" => Some(Self::Classic),
            "minimal" => Some(Self::Minimal),
            "split" => Some(Self::Split),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Minimal => "minimal",
            Self::Split => "split",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterLayout {
    Compact,
    Columns,
}

impl FooterLayout {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compact" => Some(Self::Compact),
            "columns" => Some(Self::Columns),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Columns => "columns",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
    pub external: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterSection {
    pub title: String,
    pub links: Vec<FooterLink>,
}

/// Site-wide look and footer configuration.
/// Always complete: every field carries a valid value after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub site_title: String,
    pub primary_color: String,
    pub accent_color: String,
    pub navigation_style: NavigationStyle,
    pub footer_layout: FooterLayout,
    pub footer_brand_name: String,
    pub footer_brand_description: Option<String>,
    pub footer_badges: Vec<String>,
    pub footer_sections: Vec<FooterSection>,
    pub footer_meta_lines: Vec<String>,
    pub footer_show_updated_at: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        let link = |label: &str, href: &str| FooterLink {
            label: label.to_string(),
            href: href.to_string(),
            external: href.starts_with("http"),
        };
        ThemeSettings {
            site_title: "ArcanePixels".to_string(),
            primary_color: "#6d28d9".to_string(),
            accent_color: "#f59e0b".to_string(),
            navigation_style: NavigationStyle::Classic,
            footer_layout: FooterLayout::Columns,
            footer_brand_name: "ArcanePixels".to_string(),
            footer_brand_description: Some(
                "Independent studio crafting games, tools and pixel art.".to_string(),
            ),
            footer_badges: Vec::new(),
            footer_sections: vec![
                FooterSection {
                    title: "Studio".to_string(),
                    links: vec![
                        link("News", "/news"),
                        link("Portfolio", "/portfolio"),
                        link("Services", "/services"),
                    ],
                },
                FooterSection {
                    title: "Support".to_string(),
                    links: vec![
                        link("Downloads", "/downloads"),
                        link("Bug tracker", "/bugs"),
                        link("Accessibility", "/accessibility"),
                    ],
                },
            ],
            footer_meta_lines: vec!["© ArcanePixels. All rights reserved.".to_string()],
            footer_show_updated_at: false,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

impl ThemeSettings {
    /// Defaults stamped with a creation time, used when seeding the row.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        ThemeSettings {
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }
}
