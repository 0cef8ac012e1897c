//! Anchored insertion into foreign templates.
//!
//! The landing template is a hand-written page, not a template we control.
//! Generated content goes in front of a marker string the page is required to
//! contain. Markers are tried in priority order; the first one present wins.

/// An ordered list of marker strings acting as insertion points.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSet {
    markers: Vec<String>,
}

/// No marker from the set was found in the document.
#[derive(Debug, thiserror::Error)]
#[error("No insertion anchor found, expected one of: {}", .expected.join(", "))]
pub struct AnchorError {
    pub expected: Vec<String>,
}

impl AnchorSet {
    /// Create an anchor set; earlier markers take priority.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(Into::into)
                .filter(|m: &String| !m.is_empty())
                .collect(),
        }
    }

    /// The `</head>` anchor used for the landing page style block.
    pub fn head() -> Self {
        Self::new(["</head>"])
    }

    /// Section anchors: the marker comment ahead of the problem section, then `</main>`.
    pub fn section() -> Self {
        Self::new(["<!-- Problem Section -->", "</main>"])
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Find the highest-priority marker present and its first byte offset.
    pub fn locate<'a>(&'a self, document: &str) -> Option<(&'a str, usize)> {
        self.markers
            .iter()
            .find_map(|marker| document.find(marker.as_str()).map(|pos| (marker.as_str(), pos)))
    }

    /// Insert `content` immediately before the first occurrence of the chosen marker.
    pub fn insert_before(&self, document: &str, content: &str) -> Result<String, AnchorError> {
        let Some((marker, pos)) = self.locate(document) else {
            return Err(AnchorError {
                expected: self.markers.clone(),
            });
        };

        tracing::debug!("Inserting {} bytes before anchor {:?}", content.len(), marker);

        let mut out = String::with_capacity(document.len() + content.len());
        out.push_str(&document[..pos]);
        out.push_str(content);
        out.push_str(&document[pos..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefers_earlier_marker() {
        let doc = "<main><!-- Problem Section --><p>x</p></main>";

        let out = AnchorSet::section().insert_before(doc, "[S]").unwrap();

        assert_eq!(out, "<main>[S]<!-- Problem Section --><p>x</p></main>");
    }

    #[test]
    fn falls_back_to_later_marker() {
        let doc = "<main><p>x</p></main>";

        let out = AnchorSet::section().insert_before(doc, "[S]").unwrap();

        assert_eq!(out, "<main><p>x</p>[S]</main>");
    }

    #[test]
    fn inserts_only_at_first_occurrence() {
        let doc = "a</head>b</head>";

        let out = AnchorSet::head().insert_before(doc, "[H]").unwrap();

        assert_eq!(out, "a[H]</head>b</head>");
    }

    #[test]
    fn reports_missing_anchor() {
        let err = AnchorSet::section()
            .insert_before("<body></body>", "[S]")
            .unwrap_err();

        assert_eq!(err.expected.len(), 2);
        assert!(err.to_string().contains("</main>"));
    }

    #[test]
    fn ignores_empty_markers() {
        let anchors = AnchorSet::new(["", "</main>"]);

        assert_eq!(anchors.markers(), ["</main>".to_string()]);
    }
}
