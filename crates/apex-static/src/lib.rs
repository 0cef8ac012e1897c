//! Static site generator for apex demo sites.
//!
//! Builds a branded landing page listing every client as a card, plus one demo
//! page per client rendered from a user-supplied template.

pub mod anchors;
pub mod assets;
pub mod branding;
pub mod builder;
pub mod templates;

pub use anchors::{AnchorError, AnchorSet};
pub use branding::{default_rewrites, BrandingError, BrandingMap, Rewrite};
pub use builder::{output_files, BuildConfig, BuildError, BuildResult, SiteBuilder, LIVE_RELOAD_SCRIPT};
