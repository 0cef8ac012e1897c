//! `apex.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use apex_data::Defaults;
use apex_static::{AnchorSet, BuildConfig, Rewrite};

/// Configuration file structure (apex.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    build: BuildSettings,
    #[serde(default)]
    anchors: AnchorsConfig,
    /// Replaces the built-in branding rewrites when present
    branding: Option<Vec<Rewrite>>,
    #[serde(default)]
    defaults: Defaults,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SiteConfig {
    data: PathBuf,
    landing_template: PathBuf,
    demo_template: PathBuf,
    assets: PathBuf,
    output: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let build = BuildConfig::default();
        Self {
            data: build.data_path,
            landing_template: build.landing_template,
            demo_template: build.demo_template,
            assets: build.assets_dir,
            output: build.output_dir,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_minify")]
    minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_minify() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
struct AnchorsConfig {
    head: Option<Vec<String>>,
    section: Option<Vec<String>>,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

impl ConfigFile {
    /// Turn the file settings into a build configuration.
    pub fn into_build_config(self) -> BuildConfig {
        let base = BuildConfig::default();

        BuildConfig {
            data_path: self.site.data,
            landing_template: self.site.landing_template,
            demo_template: self.site.demo_template,
            assets_dir: self.site.assets,
            output_dir: self.site.output,
            minify: self.build.minify,
            head_anchors: self.anchors.head.map(AnchorSet::new).unwrap_or(base.head_anchors),
            section_anchors: self
                .anchors
                .section
                .map(AnchorSet::new)
                .unwrap_or(base.section_anchors),
            branding: self.branding.unwrap_or(base.branding),
            defaults: self.defaults,
            live_reload: false,
        }
    }
}
