//! Client record model.

use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the client data file: everything needed to render a demo site.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ClientRecord {
    /// Output path segment under `demos/`
    pub slug: String,

    /// Company display name (required)
    pub company_name: String,

    #[serde(default)]
    pub owner_name: Option<String>,

    #[serde(default)]
    pub tagline: Option<String>,

    /// Year the company was established; accepts a string or a number
    #[serde(default, deserialize_with = "optional_text")]
    pub established: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    /// Theme label shown on the landing card and the demo page
    #[serde(default)]
    pub theme: Option<String>,

    /// CSS color used for the landing card chip
    #[serde(default)]
    pub primary_color: Option<String>,

    /// Hero/background image path, relative to the output root
    #[serde(default)]
    pub bg_image: Option<String>,

    #[serde(default, deserialize_with = "sequence_or_null")]
    pub stats: Vec<Stat>,

    #[serde(default, deserialize_with = "sequence_or_null")]
    pub projects: Vec<Project>,
}

/// A headline figure such as `150+ / Homes delivered`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Stat {
    #[serde(deserialize_with = "text")]
    pub value: String,

    #[serde(deserialize_with = "text")]
    pub label: String,
}

/// A showcased project.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub name: Option<String>,

    /// Cover image path, relative to the output root
    #[serde(default)]
    pub cover_image: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub typology: Option<String>,

    #[serde(default)]
    pub location: Option<String>,
}

impl ClientRecord {
    /// First character of the company name, if there is one.
    pub fn company_initial(&self) -> Option<char> {
        self.company_name.chars().next()
    }

    /// Whether the slug is usable as a single directory name.
    pub fn has_valid_slug(&self) -> bool {
        !self.slug.is_empty()
            && self.slug != "."
            && self.slug != ".."
            && !self.slug.contains(['/', '\\'])
    }
}

/// Scalar JSON values that data authors write interchangeably as text.
///
/// Numbers keep their JSON spelling, so `2004.0` stays `"2004.0"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scalar>::deserialize(deserializer).map(|value| value.map(String::from))
}

fn sequence_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_record() {
        let json = r##"{
            "slug": "skyline",
            "company_name": "Skyline Builders",
            "owner_name": "Rhea Kapoor",
            "tagline": "Homes above the rest",
            "established": "1998",
            "phone": "+91 98000 00000",
            "theme": "Luxury",
            "primary_color": "#C0A062",
            "bg_image": "assets/skyline.jpg",
            "stats": [{"value": "150+", "label": "Homes delivered"}],
            "projects": [{
                "name": "Sky Towers",
                "cover_image": "assets/towers.jpg",
                "status": "Ongoing",
                "typology": "3 BHK",
                "location": "Pune"
            }]
        }"##;

        let client: ClientRecord = serde_json::from_str(json).unwrap();

        assert_eq!(client.slug, "skyline");
        assert_eq!(client.established.as_deref(), Some("1998"));
        assert_eq!(client.stats[0].label, "Homes delivered");
        assert_eq!(client.projects[0].typology.as_deref(), Some("3 BHK"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let client: ClientRecord =
            serde_json::from_str(r#"{"slug": "acme", "company_name": "Acme Co"}"#).unwrap();

        assert_eq!(client.owner_name, None);
        assert_eq!(client.bg_image, None);
        assert!(client.stats.is_empty());
        assert!(client.projects.is_empty());
    }

    #[test]
    fn accepts_numbers_for_text_scalars() {
        let client: ClientRecord = serde_json::from_str(
            r#"{"slug": "a", "company_name": "A", "established": 2004,
                "stats": [{"value": 4.5, "label": "Rating"}]}"#,
        )
        .unwrap();

        assert_eq!(client.established.as_deref(), Some("2004"));
        assert_eq!(client.stats[0].value, "4.5");
    }

    #[test]
    fn whole_floats_keep_their_decimal() {
        let client: ClientRecord = serde_json::from_str(
            r#"{"slug": "a", "company_name": "A", "established": 2004.0,
                "stats": [{"value": 18446744073709551615, "label": "Bricks"}]}"#,
        )
        .unwrap();

        assert_eq!(client.established.as_deref(), Some("2004.0"));
        assert_eq!(client.stats[0].value, "18446744073709551615");
    }

    #[test]
    fn null_is_treated_as_missing() {
        let client: ClientRecord = serde_json::from_str(
            r#"{"slug": "a", "company_name": "A", "theme": null, "established": null, "stats": null}"#,
        )
        .unwrap();

        assert_eq!(client.theme, None);
        assert_eq!(client.established, None);
        assert!(client.stats.is_empty());
    }

    #[test]
    fn requires_slug_and_company_name() {
        assert!(serde_json::from_str::<ClientRecord>(r#"{"company_name": "A"}"#).is_err());
        assert!(serde_json::from_str::<ClientRecord>(r#"{"slug": "a"}"#).is_err());
    }

    #[test]
    fn company_initial_is_first_char() {
        let client = ClientRecord {
            company_name: "Élan Homes".to_string(),
            ..Default::default()
        };
        assert_eq!(client.company_initial(), Some('É'));

        assert_eq!(ClientRecord::default().company_initial(), None);
    }

    #[test]
    fn validates_slug_as_single_segment() {
        let with_slug = |slug: &str| ClientRecord {
            slug: slug.to_string(),
            ..Default::default()
        };

        assert!(with_slug("acme-co").has_valid_slug());
        assert!(!with_slug("").has_valid_slug());
        assert!(!with_slug("..").has_valid_slug());
        assert!(!with_slug("a/b").has_valid_slug());
        assert!(!with_slug("a\\b").has_valid_slug());
    }
}
