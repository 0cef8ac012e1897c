//! Scaffold a new apex project in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing apex project...");

    write_starter(config_path, DEFAULT_CONFIG, yes)?;
    write_starter(Path::new("clients.json"), DEFAULT_CLIENTS, yes)?;
    write_starter(Path::new("tallygo/index.html"), DEFAULT_LANDING, yes)?;
    write_starter(Path::new("templates/demo.html"), DEFAULT_DEMO, yes)?;

    let assets = Path::new("public/assets");
    if !assets.exists() {
        fs::create_dir_all(assets).context("Failed to create public/assets")?;
        tracing::info!("Created public/assets/");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'apex' to build, or 'apex dev' to start the development server.");

    Ok(())
}

/// Write `content` to `path` unless it exists and `overwrite` is off.
fn write_starter(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Created {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG: &str = r##"# Apex Configuration

[site]
# Client records (JSON array)
data = "clients.json"

# Landing page base template and per-client demo template
landing_template = "tallygo/index.html"
demo_template = "templates/demo.html"

# Copied to <output>/assets when present
assets = "public/assets"

# Output directory, wiped on every build
output = "dist"

[build]
# Minify the injected landing CSS
minify = true

[anchors]
# Tried in order; the first marker found is the insertion point
head = ["</head>"]
section = ["<!-- Problem Section -->", "</main>"]

[[branding]]
find = "<title>Tallygo — The Ultimate B2B SaaS for Messaging Based Business</title>"
replace = "<title>Apex Builder — The Ultimate Real Estate Cloud</title>"

[[branding]]
find = "Tallygo"
replace = "Apex Builder"

[defaults.landing]
bg_image = "assets/hero-1.jpg"
primary_color = "#D4AF37"
theme = "Modern"

[defaults.demo]
tagline = "Excellence in Construction"
location_base = "Premium Location"
"##;

const DEFAULT_CLIENTS: &str = r##"[
  {
    "slug": "skyline-builders",
    "company_name": "Skyline Builders",
    "owner_name": "Rhea Kapoor",
    "tagline": "Homes above the rest",
    "established": "1998",
    "phone": "+91 98000 00000",
    "theme": "Luxury",
    "primary_color": "#C0A062",
    "stats": [
      { "value": "150+", "label": "Homes delivered" },
      { "value": "25", "label": "Years of trust" }
    ],
    "projects": [
      {
        "name": "Sky Towers",
        "cover_image": "assets/hero-1.jpg",
        "status": "Ongoing",
        "typology": "3 BHK",
        "location": "Pune"
      }
    ]
  },
  {
    "slug": "acme",
    "company_name": "Acme Co"
  }
]
"##;

const DEFAULT_LANDING: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Tallygo — The Ultimate B2B SaaS for Messaging Based Business</title>
</head>
<body>
  <main>
    <section class="hero">
      <h1>Tallygo</h1>
      <p>Websites for builders, generated in seconds.</p>
    </section>

    <!-- Problem Section -->
    <section class="problem">
      <h2>Why Tallygo?</h2>
    </section>
  </main>
</body>
</html>
"##;

const DEFAULT_DEMO: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{company_name}} | {{tagline}}</title>
</head>
<body class="theme-{{theme}}">
  <header>
    <span class="logo">{{company_initial}}</span>
    <strong>{{company_name}}</strong>
    <a href="tel:{{phone}}">{{phone}}</a>
  </header>

  <section class="hero" style="background-image:url('../../{{bg_image}}')">
    <h1>{{tagline}}</h1>
    <p>Led by {{owner_name}} since {{established_year}}, building in {{location_base}}.</p>
  </section>

  <section class="stats">
    {{stats_html}}
  </section>

  <section class="projects">
    {{projects_html}}
  </section>
</body>
</html>
"##;
