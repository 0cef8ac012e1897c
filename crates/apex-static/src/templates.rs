//! Template engine for rendering landing cards and demo pages.

use std::fmt;
use std::path::Path;

use minijinja::{context, AutoEscape, Environment, Output, State, UndefinedBehavior, Value};

use apex_data::{ClientRecord, DemoDefaults, LandingDefaults};

/// Name under which the user's demo template is registered.
pub const DEMO_TEMPLATE: &str = "demo.html";

/// A landing page card.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CardContext {
    pub slug: String,
    pub company_name: String,
    pub owner_name: String,
    pub established: String,
    pub theme: String,
    /// Chip color; also used with alpha suffixes (`44`, `11`) for border and fill
    pub primary_color: String,
    pub image: String,
    /// Typologies of the first two projects
    pub tags: Vec<String>,
}

impl CardContext {
    pub fn from_client(client: &ClientRecord, defaults: &LandingDefaults) -> Self {
        Self {
            slug: client.slug.clone(),
            company_name: client.company_name.clone(),
            owner_name: or_default(&client.owner_name, &defaults.owner_name),
            established: or_default(&client.established, &defaults.established),
            theme: or_default(&client.theme, &defaults.theme),
            primary_color: or_default(&client.primary_color, &defaults.primary_color),
            image: or_default(&client.bg_image, &defaults.bg_image),
            tags: client
                .projects
                .iter()
                .take(2)
                .map(|p| or_default(&p.typology, &defaults.typology))
                .collect(),
        }
    }
}

/// A stat block on a demo page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StatContext {
    pub value: String,
    pub label: String,
}

/// A project card on a demo page. Missing fields are empty strings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProjectContext {
    pub name: String,
    /// Cover image path relative to `demos/<slug>/`
    pub image: String,
    pub status: String,
    pub typology: String,
    pub location: String,
}

/// Everything substituted into the demo template for one client.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DemoContext {
    pub slug: String,
    pub company_name: String,
    pub owner_name: String,
    pub tagline: String,
    pub established_year: String,
    pub location_base: String,
    pub phone: String,
    pub theme: String,
    pub company_initial: String,
    pub bg_image: String,
    pub primary_color: String,
    pub stats: Vec<StatContext>,
    pub projects: Vec<ProjectContext>,
}

impl DemoContext {
    /// Resolve fallbacks for `client`. Returns `None` when the company name is empty.
    pub fn from_client(client: &ClientRecord, defaults: &DemoDefaults) -> Option<Self> {
        let initial = client.company_initial()?;

        Some(Self {
            slug: client.slug.clone(),
            company_name: client.company_name.clone(),
            owner_name: or_default(&client.owner_name, &defaults.owner_name),
            tagline: or_default(&client.tagline, &defaults.tagline),
            established_year: or_default(&client.established, &defaults.established),
            location_base: defaults.location_base.clone(),
            phone: or_default(&client.phone, &defaults.phone),
            theme: or_default(&client.theme, &defaults.theme),
            company_initial: initial.to_string(),
            bg_image: or_default(&client.bg_image, &defaults.bg_image),
            primary_color: or_default(&client.primary_color, &defaults.primary_color),
            stats: client
                .stats
                .iter()
                .map(|s| StatContext {
                    value: s.value.clone(),
                    label: s.label.clone(),
                })
                .collect(),
            projects: client
                .projects
                .iter()
                .map(|p| ProjectContext {
                    name: p.name.clone().unwrap_or_default(),
                    image: format!("../../{}", p.cover_image.as_deref().unwrap_or_default()),
                    status: p.status.clone().unwrap_or_default(),
                    typology: p.typology.clone().unwrap_or_default(),
                    location: p.location.clone().unwrap_or_default(),
                })
                .collect(),
        })
    }
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    value.clone().unwrap_or_else(|| fallback.to_string())
}

/// Template engine using minijinja.
///
/// Every template is HTML-escaped on output regardless of its file name, and
/// referencing an undefined variable is an error.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in fragment templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_formatter(html_formatter);

        env.add_template("apex/section.html", SECTION_TEMPLATE)
            .expect("Failed to add section template");
        env.add_template("apex/card.html", CARD_TEMPLATE)
            .expect("Failed to add card template");
        env.add_template("apex/stats.html", STATS_TEMPLATE)
            .expect("Failed to add stats template");
        env.add_template("apex/projects.html", PROJECTS_TEMPLATE)
            .expect("Failed to add projects template");

        Self { env }
    }

    /// Create an engine that also knows the demo template at `path`.
    ///
    /// The template's directory becomes the loader root so it can include siblings.
    pub fn with_demo_template(path: &Path) -> Result<Self, minijinja::Error> {
        let mut engine = Self::new();

        let source = std::fs::read_to_string(path).map_err(|e| {
            minijinja::Error::new(
                minijinja::ErrorKind::TemplateNotFound,
                format!("{}: {}", path.display(), e),
            )
        })?;

        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        engine.env.set_loader(minijinja::path_loader(root));
        engine.env.add_template_owned(DEMO_TEMPLATE, source)?;

        Ok(engine)
    }

    /// Render the `<section id="demos">` block holding one card per client.
    pub fn render_section(&self, cards: &[CardContext]) -> Result<String, minijinja::Error> {
        self.env
            .get_template("apex/section.html")?
            .render(context! { cards => cards })
    }

    /// Render a demo page for one client.
    pub fn render_demo(&self, demo: &DemoContext) -> Result<String, minijinja::Error> {
        let stats_html = self
            .env
            .get_template("apex/stats.html")?
            .render(context! { stats => &demo.stats })?;
        let projects_html = self
            .env
            .get_template("apex/projects.html")?
            .render(context! { projects => &demo.projects })?;

        let tmpl = self.env.get_template(DEMO_TEMPLATE)?;

        tmpl.render(context! {
            slug => &demo.slug,
            company_name => &demo.company_name,
            owner_name => &demo.owner_name,
            tagline => &demo.tagline,
            established_year => &demo.established_year,
            location_base => &demo.location_base,
            phone => &demo.phone,
            theme => &demo.theme,
            company_initial => &demo.company_initial,
            bg_image => &demo.bg_image,
            primary_color => &demo.primary_color,
            stats => &demo.stats,
            projects => &demo.projects,
            stats_html => Value::from_safe_string(stats_html),
            projects_html => Value::from_safe_string(projects_html),
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape like minijinja's default formatter, but leave `/` alone so paths and
/// URLs stay readable in attributes.
fn html_formatter(out: &mut Output<'_>, _state: &State<'_, '_>, value: &Value) -> Result<(), minijinja::Error> {
    if value.is_safe() {
        out.write_str(&value.to_string())?;
        return Ok(());
    }

    match value.as_str() {
        Some(s) => write_escaped(out, s)?,
        None => write_escaped(out, &value.to_string())?,
    }
    Ok(())
}

fn write_escaped(out: &mut Output<'_>, text: &str) -> fmt::Result {
    let mut last = 0;
    for (idx, ch) in text.char_indices() {
        let entity = match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#39;",
            _ => continue,
        };
        out.write_str(&text[last..idx])?;
        out.write_str(entity)?;
        last = idx + ch.len_utf8();
    }
    out.write_str(&text[last..])
}

const SECTION_TEMPLATE: &str = r##"
    <section id="demos" aria-label="Builder Demos">
        <div class="container" style="text-align:center; max-width:800px; margin:0 auto;">
          <h2 class="section__title" style="font-size:3rem; margin-bottom:16px;">Live Builder Demos</h2>
          <p class="section__sub" style="font-size:1.2rem; color:#8899A6;">
            Explore premium generated sites powered by Apex Engine. <br>
            Each demo is a fully functional, high-performance static site.
          </p>
        </div>
        <div class="demo-grid">
            {%- for card in cards %}{% include "apex/card.html" %}{% endfor %}
        </div>
    </section>
    "##;

const CARD_TEMPLATE: &str = r##"
        <div class="demo-card">
            <div class="demo-card__img">
                <img src="{{ card.image }}" alt="{{ card.company_name }}" loading="lazy">
                <div class="demo-card__overlay"></div>
            </div>
            <div class="demo-card__body">
                <div>
                    <span class="demo-chip" style="color:{{ card.primary_color }}; border-color:{{ card.primary_color }}44; background:{{ card.primary_color }}11;">
                        {{ card.theme }}
                    </span>
                    <h3 class="demo-title">{{ card.company_name }}</h3>
                    <p class="demo-meta">by {{ card.owner_name }} • {{ card.established }}</p>
                    <div style="display:flex; gap:8px; flex-wrap:wrap; margin-bottom:20px;">
                        {% for tag in card.tags %}<span style="font-size:0.75rem; color:#666;">#{{ tag }}</span>{% if not loop.last %} {% endif %}{% endfor %}
                    </div>
                </div>
                <a href="demos/{{ card.slug }}/index.html" class="demo-btn">
                    Launch Demo
                </a>
            </div>
        </div>
"##;

const STATS_TEMPLATE: &str = r##"{% for stat in stats %}
            <div class="stat-item">
                <h4>{{ stat.value }}</h4>
                <span>{{ stat.label }}</span>
            </div>
{% endfor %}"##;

const PROJECTS_TEMPLATE: &str = r##"{% for project in projects %}
            <div class="project-card scroll-trigger">
                <div class="project-img">
                    <img src="{{ project.image }}" alt="{{ project.name }}" loading="lazy">
                </div>
                <div class="project-info">
                    <div class="project-meta">
                        <span class="chip" style="color:var(--primary); border:1px solid var(--primary);">{{ project.status }}</span>
                        <span class="chip">{{ project.typology }}</span>
                    </div>
                    <h3>{{ project.name }}</h3>
                    <p style="margin-bottom:0; font-size:0.95rem;">{{ project.location }}</p>
                </div>
            </div>
{% endfor %}"##;
