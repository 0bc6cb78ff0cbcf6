use rocket::figment::Figment;
use serde::Deserialize;

/// Deployment paths, read from the `[default.arcane]` table of Rocket.toml
/// or `ROCKET_ARCANE={db_path="..."}`. Runtime knobs (admin slug, rate
/// limits, session expiry) live in the settings table instead.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub db_path: String,
    pub uploads_dir: String,
    pub static_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            db_path: "website/db/arcanepixels.db".to_string(),
            uploads_dir: "website/uploads".to_string(),
            static_dir: "website/static".to_string(),
        }
    }
}

impl SiteConfig {
    /// A missing `arcane` table yields the defaults; a malformed one is an error.
    pub fn from_figment(figment: &Figment) -> Result<Self, String> {
        if !figment.contains("arcane") {
            return Ok(Self::default());
        }
        figment
            .extract_inner::<SiteConfig>("arcane")
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::providers::Serialized;

    #[test]
    fn test_missing_table_uses_defaults() {
        let figment = Figment::new();
        assert_eq!(SiteConfig::from_figment(&figment), Ok(SiteConfig::default()));
    }

    #[test]
    fn test_partial_table_fills_defaults() {
        let figment = Figment::from(Serialized::default(
            "arcane",
            serde_json::json!({"db_path": "/tmp/site.db"}),
        ));
        let config = SiteConfig::from_figment(&figment).unwrap();
        assert_eq!(config.db_path, "/tmp/site.db");
        assert_eq!(config.uploads_dir, "website/uploads");
    }
}
