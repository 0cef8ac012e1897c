//! Single-pass branding rewrites for the landing page.

use std::collections::HashMap;

use regex::{Captures, Regex};
use serde::Deserialize;

/// One literal find→replace pair.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Rewrite {
    pub find: String,
    pub replace: String,
}

impl Rewrite {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

/// Rewrites applied to the landing page when no others are configured.
pub fn default_rewrites() -> Vec<Rewrite> {
    vec![
        Rewrite::new(
            "<title>Tallygo — The Ultimate B2B SaaS for Messaging Based Business</title>",
            "<title>Apex Builder — The Ultimate Real Estate Cloud</title>",
        ),
        Rewrite::new("Tallygo", "Apex Builder"),
    ]
}

/// The rewrite patterns could not be compiled.
#[derive(Debug, thiserror::Error)]
#[error("Branding rewrites could not be compiled: {0}")]
pub struct BrandingError(#[from] regex::Error);

/// A compiled set of literal rewrites.
///
/// All patterns are matched in one left-to-right scan. Where several patterns
/// match at the same position the longest wins, and replaced text is never
/// scanned again.
#[derive(Debug, Clone)]
pub struct BrandingMap {
    pattern: Option<Regex>,
    replacements: HashMap<String, String>,
}

impl BrandingMap {
    pub fn new(rewrites: &[Rewrite]) -> Result<Self, BrandingError> {
        let mut replacements = HashMap::new();

        for rewrite in rewrites {
            if rewrite.find.is_empty() {
                tracing::warn!("Ignoring branding rewrite with an empty pattern");
                continue;
            }
            if replacements.contains_key(&rewrite.find) {
                tracing::warn!("Duplicate branding rewrite for {:?}, keeping the first", rewrite.find);
                continue;
            }
            replacements.insert(rewrite.find.clone(), rewrite.replace.clone());
        }

        let mut finds: Vec<&str> = replacements.keys().map(String::as_str).collect();
        // Regex alternation is leftmost-first, so longer literals must come first.
        finds.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let pattern = if finds.is_empty() {
            None
        } else {
            let alternation = finds
                .iter()
                .map(|f| regex::escape(f))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation)?)
        };

        Ok(Self {
            pattern,
            replacements,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Apply every rewrite to `document`.
    pub fn apply(&self, document: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return document.to_string();
        };

        pattern
            .replace_all(document, |caps: &Captures| {
                self.replacements
                    .get(&caps[0])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
