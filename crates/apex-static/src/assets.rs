//! Asset pipeline: the landing page style block and static asset copying.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// CSS for the injected demo section.
    pub fn landing_css() -> String {
        LANDING_CSS.to_string()
    }

    /// The `<style>` block inserted into the landing page head.
    pub fn style_block(minify: bool) -> String {
        let css = Self::landing_css();
        let css = if minify {
            Self::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Falling back to unminified landing CSS: {}", e);
                css
            })
        } else {
            css
        };
        format!("<style>\n{}\n</style>\n", css.trim())
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Recursively copy `src` to `dest`, returning the number of files copied.
    ///
    /// `dest` must not exist yet.
    pub fn copy_dir(src: &Path, dest: &Path) -> std::io::Result<usize> {
        if dest.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("destination already exists: {}", dest.display()),
            ));
        }

        let mut copied = 0;
        for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::other)?;
            let relative = entry.path().strip_prefix(src).map_err(std::io::Error::other)?;
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                fs::copy(entry.path(), &target)?;
                copied += 1;
            }
        }

        Ok(copied)
    }
}

const LANDING_CSS: &str = r#"
#demos {
  position: relative;
  z-index: 10;
  padding: 100px 0;
  background: linear-gradient(180deg, #0A0E11 0%, #0F1419 100%);
}
.demo-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(340px, 1fr));
  gap: 32px;
  margin-top: 48px;
  padding: 0 24px;
  max-width: 1400px;
  margin-left: auto;
  margin-right: auto;
}
.demo-card {
  background: rgba(255, 255, 255, 0.03);
  border: 1px solid rgba(255, 255, 255, 0.1);
  border-radius: 20px;
  overflow: hidden;
  transition: all 0.4s cubic-bezier(0.25, 0.8, 0.25, 1);
  position: relative;
  display: flex;
  flex-direction: column;
  backdrop-filter: blur(10px);
  min-height: 400px;
}
.demo-card:hover {
  transform: translateY(-10px) scale(1.02);
  border-color: rgba(212, 175, 55, 0.5);
  box-shadow: 0 20px 40px rgba(0,0,0,0.4);
}
.demo-card__img {
  height: 240px;
  width: 100%;
  position: relative;
  overflow: hidden;
}
.demo-card__img img {
  width: 100%;
  height: 100%;
  object-fit: cover;
  transition: transform 0.6s ease;
}
.demo-card:hover .demo-card__img img {
  transform: scale(1.1);
}
.demo-card__overlay {
  position: absolute;
  inset: 0;
  background: linear-gradient(to top, #0F1419 0%, transparent 100%);
}
.demo-card__body {
  padding: 24px;
  flex-grow: 1;
  display: flex;
  flex-direction: column;
  justify-content: space-between;
}
.demo-chip {
  display: inline-block;
  padding: 4px 12px;
  border-radius: 50px;
  font-size: 0.75rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 1px;
  margin-bottom: 12px;
  background: rgba(255,255,255,0.05);
  border: 1px solid rgba(255,255,255,0.1);
}
.demo-title {
  font-size: 1.5rem;
  margin: 0 0 8px 0;
  font-family: 'Outfit', sans-serif;
  color: #fff;
}
.demo-meta {
  font-size: 0.9rem;
  color: #8899A6;
  margin-bottom: 20px;
}
.demo-btn {
  display: block;
  width: 100%;
  padding: 14px;
  text-align: center;
  background: linear-gradient(135deg, #D4AF37, #B8860B);
  color: #000;
  font-weight: 700;
  text-decoration: none;
  border-radius: 12px;
  text-transform: uppercase;
  letter-spacing: 1px;
  font-size: 0.9rem;
  transition: opacity 0.3s;
}
.demo-btn:hover {
  opacity: 0.9;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn style_block_wraps_css() {
        let block = AssetPipeline::style_block(false);

        assert!(block.starts_with("<style>"));
        assert!(block.contains(".demo-grid {"));
        assert!(block.trim_end().ends_with("</style>"));
    }

    #[test]
    fn minified_style_block_is_compact() {
        let block = AssetPipeline::style_block(true);

        assert!(block.contains(".demo-grid{"));
        assert!(block.len() < AssetPipeline::style_block(false).len());
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }

    #[test]
    fn copies_nested_tree() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("assets");
        fs::create_dir_all(src.join("img/projects")).unwrap();
        fs::write(src.join("hero-1.jpg"), b"jpg").unwrap();
        fs::write(src.join("img/projects/tower.jpg"), b"tower").unwrap();

        let dest = temp.path().join("dist/assets");
        let copied = AssetPipeline::copy_dir(&src, &dest).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read(dest.join("img/projects/tower.jpg")).unwrap(), b"tower");
    }

    #[test]
    fn refuses_existing_destination() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("assets");
        let dest = temp.path().join("out");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dest).unwrap();

        let err = AssetPipeline::copy_dir(&src, &dest).unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
    }
}
