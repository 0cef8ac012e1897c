//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use apex_data::{duplicate_slugs, load_clients, ClientRecord, Defaults};

use crate::anchors::{AnchorError, AnchorSet};
use crate::assets::AssetPipeline;
use crate::branding::{default_rewrites, BrandingError, BrandingMap, Rewrite};
use crate::templates::{CardContext, DemoContext, TemplateEngine};

/// URL the dev server serves its live-reload client from.
pub const LIVE_RELOAD_SCRIPT: &str = "/__apex/reload.js";

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Client data file (JSON array)
    pub data_path: PathBuf,

    /// Landing page base template
    pub landing_template: PathBuf,

    /// Per-client demo page template
    pub demo_template: PathBuf,

    /// Static assets copied to `<output>/assets`
    pub assets_dir: PathBuf,

    /// Output directory, wiped on every build
    pub output_dir: PathBuf,

    /// Minify the injected landing CSS
    pub minify: bool,

    /// Anchors for the landing page style block
    pub head_anchors: AnchorSet,

    /// Anchors for the landing page demo section
    pub section_anchors: AnchorSet,

    /// Rewrites applied to the finished landing page
    pub branding: Vec<Rewrite>,

    /// Fallbacks for optional client fields
    pub defaults: Defaults,

    /// Add the dev server's live-reload script to every page
    pub live_reload: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("clients.json"),
            landing_template: PathBuf::from("tallygo/index.html"),
            demo_template: PathBuf::from("templates/demo.html"),
            assets_dir: PathBuf::from("public/assets"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            head_anchors: AnchorSet::head(),
            section_anchors: AnchorSet::section(),
            branding: default_rewrites(),
            defaults: Defaults::default(),
            live_reload: false,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of demo pages written
    pub demos: usize,

    /// Number of asset files copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Landing template not found: {0}")]
    LandingTemplateMissing(String),

    #[error("Demo template not found: {0}")]
    DemoTemplateMissing(String),

    #[error(transparent)]
    Data(#[from] apex_data::LoadError),

    #[error(transparent)]
    Branding(#[from] BrandingError),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to copy assets to {path}: {message}")]
    AssetError { path: String, message: String },

    #[error("Client '{0}' has an empty company_name")]
    EmptyCompanyName(String),

    #[error("Client slug {0:?} is not a single path segment")]
    InvalidSlug(String),

    #[error("Landing template {path}: {source}")]
    AnchorError {
        path: String,
        source: AnchorError,
    },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    branding: BrandingMap,
}

impl SiteBuilder {
    /// Create a new site builder.
    ///
    /// Fails when the branding rewrites cannot be compiled.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let branding = BrandingMap::new(&config.branding)?;
        Ok(Self { config, branding })
    }

    /// Build the site: reset output, copy assets, load clients, render pages.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        self.reset_output()?;
        let assets = self.copy_assets()?;

        let clients = load_clients(&self.config.data_path)?;
        for slug in duplicate_slugs(&clients) {
            tracing::warn!("Duplicate slug '{}', the last record wins", slug);
        }
        if let Some(client) = clients.iter().find(|c| !c.has_valid_slug()) {
            return Err(BuildError::InvalidSlug(client.slug.clone()));
        }

        if !self.config.landing_template.is_file() {
            return Err(BuildError::LandingTemplateMissing(
                self.config.landing_template.display().to_string(),
            ));
        }

        let engine = self.demo_engine()?;

        self.build_index(&engine, &clients)?;
        let demos = self.build_demos(&engine, &clients)?;

        Ok(BuildResult {
            demos,
            assets,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Delete and recreate the output directory, including an empty `demos/`.
    fn reset_output(&self) -> Result<(), BuildError> {
        let out = &self.config.output_dir;

        if out.exists() {
            fs::remove_dir_all(out).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        fs::create_dir_all(out.join("demos"))
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::info!("Cleaned {}", out.display());
        Ok(())
    }

    /// Copy the assets directory into the output tree, if it exists.
    fn copy_assets(&self) -> Result<usize, BuildError> {
        let src = &self.config.assets_dir;
        if !src.is_dir() {
            tracing::debug!("No assets directory at {}", src.display());
            return Ok(0);
        }

        let dest = self.config.output_dir.join("assets");
        let copied = AssetPipeline::copy_dir(src, &dest).map_err(|e| BuildError::AssetError {
            path: dest.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::info!("Copied {} assets to {}", copied, dest.display());
        Ok(copied)
    }

    fn demo_engine(&self) -> Result<TemplateEngine, BuildError> {
        let path = &self.config.demo_template;
        if !path.is_file() {
            return Err(BuildError::DemoTemplateMissing(path.display().to_string()));
        }

        TemplateEngine::with_demo_template(path)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", path.display(), e)))
    }

    /// Render the landing page into `<output>/index.html`.
    fn build_index(&self, engine: &TemplateEngine, clients: &[ClientRecord]) -> Result<(), BuildError> {
        let path = &self.config.landing_template;
        let source = fs::read_to_string(path).map_err(|e| BuildError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let html = self.render_index(engine, &source, clients)?;
        let html = self.with_live_reload(html);

        fs::write(self.config.output_dir.join("index.html"), html)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::info!("Built index.html with {} demo cards", clients.len());
        Ok(())
    }

    /// Insert the style block and demo section into `source`, then apply branding.
    pub fn render_index(
        &self,
        engine: &TemplateEngine,
        source: &str,
        clients: &[ClientRecord],
    ) -> Result<String, BuildError> {
        let anchor_error = |err: AnchorError| BuildError::AnchorError {
            path: self.config.landing_template.display().to_string(),
            source: err,
        };

        let cards: Vec<CardContext> = clients
            .iter()
            .map(|c| CardContext::from_client(c, &self.config.defaults.landing))
            .collect();
        let section = engine
            .render_section(&cards)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let html = self
            .config
            .head_anchors
            .insert_before(source, &AssetPipeline::style_block(self.config.minify))
            .map_err(anchor_error)?;
        let html = self
            .config
            .section_anchors
            .insert_before(&html, &section)
            .map_err(anchor_error)?;

        Ok(self.branding.apply(&html))
    }

    /// Render and write one page per client under `<output>/demos/<slug>/`.
    fn build_demos(&self, engine: &TemplateEngine, clients: &[ClientRecord]) -> Result<usize, BuildError> {
        // Render in parallel, write in input order so duplicate slugs resolve the same way every build.
        let pages: Vec<Result<(&str, String), BuildError>> = clients
            .par_iter()
            .map(|client| {
                self.render_demo(engine, client)
                    .map(|html| (client.slug.as_str(), html))
            })
            .collect();

        let mut written = 0;
        for page in pages {
            let (slug, html) = page?;
            let dir = self.config.output_dir.join("demos").join(slug);

            fs::create_dir_all(&dir).map_err(|e| BuildError::WriteError(e.to_string()))?;
            fs::write(dir.join("index.html"), html)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;

            tracing::info!("Built demo for {}", slug);
            written += 1;
        }

        Ok(written)
    }

    /// Render the demo page for one client.
    pub fn render_demo(&self, engine: &TemplateEngine, client: &ClientRecord) -> Result<String, BuildError> {
        if !client.has_valid_slug() {
            return Err(BuildError::InvalidSlug(client.slug.clone()));
        }

        let demo = DemoContext::from_client(client, &self.config.defaults.demo)
            .ok_or_else(|| BuildError::EmptyCompanyName(client.slug.clone()))?;

        let html = engine
            .render_demo(&demo)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", client.slug, e)))?;

        Ok(self.with_live_reload(html))
    }

    fn with_live_reload(&self, html: String) -> String {
        if !self.config.live_reload {
            return html;
        }

        let tag = format!("<script src=\"{}\"></script>\n", LIVE_RELOAD_SCRIPT);
        AnchorSet::new(["</body>"])
            .insert_before(&html, &tag)
            .unwrap_or(html)
    }
}

/// Paths of every file under `root`, relative to it.
pub fn output_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}
