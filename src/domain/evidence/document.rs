//! Retrieved document variants

use serde::{Deserialize, Serialize};

/// Where a piece of evidence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceOrigin {
    Collection,
    Web,
    Unknown,
}

/// A document as returned by an evidence adapter.
///
/// Backends hand back different shapes: bare strings, vector store rows with
/// ids and distances, or search hits with titles and URLs. Adapters resolve
/// them into one of these variants so the rest of the pipeline only ever
/// calls [`RetrievedDocument::text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetrievedDocument {
    /// Plain text with no provenance beyond its position
    Text { content: String },
    /// A row from a vector collection
    Collection {
        collection: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        distance: Option<f32>,
    },
    /// A web search hit
    Web {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        content: String,
    },
}

impl RetrievedDocument {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn collection(collection: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Collection {
            collection: collection.into(),
            id: None,
            content: content.into(),
            distance: None,
        }
    }

    pub fn web(content: impl Into<String>) -> Self {
        Self::Web {
            title: None,
            url: None,
            content: content.into(),
        }
    }

    /// Attach an id (collection rows only)
    pub fn with_id(mut self, new_id: impl Into<String>) -> Self {
        if let Self::Collection { id, .. } = &mut self {
            *id = Some(new_id.into());
        }
        self
    }

    /// Attach a vector distance (collection rows only)
    pub fn with_distance(mut self, value: f32) -> Self {
        if let Self::Collection { distance, .. } = &mut self {
            *distance = Some(value);
        }
        self
    }

    /// Attach title and url (web hits only)
    pub fn with_link(mut self, new_title: Option<String>, new_url: Option<String>) -> Self {
        if let Self::Web { title, url, .. } = &mut self {
            *title = new_title;
            *url = new_url;
        }
        self
    }

    /// The text content used for grading, prompting and evidence lists
    pub fn content(&self) -> &str {
        match self {
            Self::Text { content } => content,
            Self::Collection { content, .. } => content,
            Self::Web { content, .. } => content,
        }
    }

    pub fn origin(&self) -> EvidenceOrigin {
        match self {
            Self::Text { .. } => EvidenceOrigin::Unknown,
            Self::Collection { .. } => EvidenceOrigin::Collection,
            Self::Web { .. } => EvidenceOrigin::Web,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content().trim().is_empty()
    }
}

impl From<String> for RetrievedDocument {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}

impl From<&str> for RetrievedDocument {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_is_uniform_across_variants() {
        let docs = vec![
            RetrievedDocument::text("plain"),
            RetrievedDocument::collection("rag_docs", "row").with_id("doc_1").with_distance(0.2),
            RetrievedDocument::web("snippet")
                .with_link(Some("Title".into()), Some("https://example.com".into())),
        ];

        let texts: Vec<&str> = docs.iter().map(|d| d.content()).collect();
        assert_eq!(texts, vec!["plain", "row", "snippet"]);
    }

    #[test]
    fn test_origin() {
        assert_eq!(RetrievedDocument::text("a").origin(), EvidenceOrigin::Unknown);
        assert_eq!(
            RetrievedDocument::collection("c", "a").origin(),
            EvidenceOrigin::Collection
        );
        assert_eq!(RetrievedDocument::web("a").origin(), EvidenceOrigin::Web);
    }

    #[test]
    fn test_builders_ignore_other_variants() {
        let doc = RetrievedDocument::web("snippet").with_id("ignored").with_distance(0.5);
        assert_eq!(doc, RetrievedDocument::web("snippet"));
    }

    #[test]
    fn test_serialization_is_tagged() {
        let doc = RetrievedDocument::collection("rag_docs", "row").with_id("doc_0");
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"kind\":\"collection\""));
        assert!(json.contains("\"id\":\"doc_0\""));
        assert!(!json.contains("distance"));
    }

    #[test]
    fn test_is_blank() {
        assert!(RetrievedDocument::text("   ").is_blank());
        assert!(!RetrievedDocument::text("x").is_blank());
    }
}
