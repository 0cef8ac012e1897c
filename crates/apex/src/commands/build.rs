//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use apex_static::{BuildError, SiteBuilder};

use crate::config::load_config;

/// Run the build command.
///
/// A missing landing template is logged and stops the build, but is not a
/// failing exit; every other error is.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building site...");

    let mut config = load_config(config_path)?.into_build_config();
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }

    let result = match SiteBuilder::new(config)?.build() {
        Ok(result) => result,
        Err(BuildError::LandingTemplateMissing(path)) => {
            tracing::error!("Landing template {} not found!", path);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        "Built {} demo pages and copied {} assets in {}ms",
        result.demos,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
