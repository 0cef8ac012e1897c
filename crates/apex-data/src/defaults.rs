//! Fallback values for optional client fields.
//!
//! The landing card and the demo page historically use different fallbacks
//! for the same field (`theme` is "Modern" on the card and "Custom" on the
//! page), so each surface has its own table.

use serde::Deserialize;

/// Fallbacks used when rendering a landing page card.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LandingDefaults {
    pub bg_image: String,
    pub primary_color: String,
    pub theme: String,
    pub owner_name: String,
    pub established: String,
    /// Tag shown for a project without a typology
    pub typology: String,
}

impl Default for LandingDefaults {
    fn default() -> Self {
        Self {
            bg_image: "assets/hero-1.jpg".to_string(),
            primary_color: "#D4AF37".to_string(),
            theme: "Modern".to_string(),
            owner_name: "Builder".to_string(),
            established: "2020".to_string(),
            typology: "project".to_string(),
        }
    }
}

/// Fallbacks used when rendering a demo page.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoDefaults {
    pub owner_name: String,
    pub tagline: String,
    pub established: String,
    /// Always used for the `location_base` placeholder; never read from client data
    pub location_base: String,
    pub phone: String,
    pub theme: String,
    pub bg_image: String,
    /// Accent colour; matches the landing card fallback
    pub primary_color: String,
}

impl Default for DemoDefaults {
    fn default() -> Self {
        Self {
            owner_name: String::new(),
            tagline: "Excellence in Construction".to_string(),
            established: "2000".to_string(),
            location_base: "Premium Location".to_string(),
            phone: String::new(),
            theme: "Custom".to_string(),
            bg_image: String::new(),
            primary_color: "#D4AF37".to_string(),
        }
    }
}

/// All fallback tables, as read from the `[defaults]` config section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Defaults {
    pub landing: LandingDefaults,
    pub demo: DemoDefaults,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_overrides_keep_other_fallbacks() {
        let defaults: Defaults =
            serde_json::from_str(r#"{"landing": {"theme": "Classic"}}"#).unwrap();

        assert_eq!(defaults.landing.theme, "Classic");
        assert_eq!(defaults.landing.bg_image, "assets/hero-1.jpg");
        assert_eq!(defaults.demo, DemoDefaults::default());
    }

    #[test]
    fn demo_colour_override() {
        let defaults: Defaults =
            serde_json::from_str(r##"{"demo": {"primary_color": "#112233"}}"##).unwrap();

        assert_eq!(defaults.demo.primary_color, "#112233");
        assert_eq!(defaults.landing.primary_color, "#D4AF37");
    }
}
