use log::{error, info, warn};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;

/// Prepare the filesystem before Rocket launches: create missing
/// directories and confirm the writable ones accept writes.
/// Returns the number of warnings, or an error summary when the site
/// cannot run.
pub fn run(config: &SiteConfig) -> Result<u32, String> {
    info!("ArcanePixels boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    let db_dir = Path::new(&config.db_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let uploads = Path::new(&config.uploads_dir);
    let statics = Path::new(&config.static_dir);

    // ── 1. Directories ─────────────────────────────────
    for dir in [db_dir, uploads, statics] {
        if !dir.exists() {
            match fs::create_dir_all(dir) {
                Ok(_) => info!("  Created directory: {}", dir.display()),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir.display(), e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Stylesheet ──────────────────────────────────
    if !statics.join("site.css").exists() {
        warn!("  Missing {}/site.css (public pages will be unstyled)", config.static_dir);
        warnings += 1;
    }

    // ── 3. Writable directories ────────────────────────
    for (dir, fatal) in [(db_dir, true), (uploads, false)] {
        if !dir.exists() {
            continue;
        }
        let probe = dir.join(".write_test");
        match fs::write(&probe, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&probe);
            }
            Err(e) if fatal => {
                error!("  Database directory not writable: {}", e);
                errors += 1;
            }
            Err(e) => {
                warn!("  Uploads directory not writable: {}", e);
                warnings += 1;
            }
        }
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        return Err(format!(
            "boot check failed: {} error(s), {} warning(s)",
            errors, warnings
        ));
    }
    if warnings > 0 {
        warn!("Boot check passed with {} warning(s).", warnings);
    } else {
        info!("Boot check passed.");
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_missing_directories() {
        let root = std::env::temp_dir().join(format!("arcane_boot_{}", std::process::id()));
        let config = SiteConfig {
            db_path: root.join("db/site.db").to_string_lossy().into_owned(),
            uploads_dir: root.join("uploads").to_string_lossy().into_owned(),
            static_dir: root.join("static").to_string_lossy().into_owned(),
        };
        // site.css is missing, so exactly one warning
        assert_eq!(run(&config), Ok(1));
        assert!(root.join("db").is_dir());
        assert!(root.join("uploads").is_dir());
        let _ = fs::remove_dir_all(&root);
    }
}
