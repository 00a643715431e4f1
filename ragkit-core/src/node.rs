//! Data types for documents, retrieved nodes, and scored results.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A source document submitted for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a new document with a generated UUID identifier.
    pub fn new(text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), text: text.into(), metadata: HashMap::new() }
    }

    /// Create a new document with an explicit identifier.
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new() }
    }
}

/// Where an image payload lives before it is inlined into a prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ImageSource {
    /// An already-inline `data:` URL, passed through unchanged.
    DataUrl(String),
    /// A local file, read and encoded at synthesis time.
    Path(PathBuf),
    /// Raw image bytes with an explicit mime type.
    Bytes {
        /// The raw image data.
        data: Vec<u8>,
        /// The mime type of the data, e.g. `image/png`.
        mime_type: String,
    },
}

/// The payload of a retrieved [`Node`].
///
/// This is a closed set: retrieval can only produce text or image content,
/// and consumers match exhaustively so a future kind cannot be silently
/// misclassified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum NodeContent {
    /// Plain text content.
    Text {
        /// The text of the node.
        text: String,
    },
    /// An image payload.
    Image {
        /// Where the image data lives.
        source: ImageSource,
    },
}

/// Controls how much metadata is rendered alongside a node's text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MetadataMode {
    /// Render content only, no metadata.
    #[default]
    None,
    /// Render all metadata entries above the content.
    All,
    /// Render metadata intended for the language model: all entries except
    /// the node's `excluded_llm_metadata_keys`.
    Llm,
    /// Render metadata intended for embedding: all entries except the
    /// node's `excluded_embed_metadata_keys`.
    Embed,
}

/// A unit of retrieved content, text or image, with metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique identifier for the node.
    pub id: String,
    /// The content payload.
    pub content: NodeContent,
    /// Key-value metadata associated with the node.
    pub metadata: HashMap<String, String>,
    /// Metadata keys hidden from the model prompt ([`MetadataMode::Llm`]).
    #[serde(default)]
    pub excluded_llm_metadata_keys: Vec<String>,
    /// Metadata keys hidden from embedding input ([`MetadataMode::Embed`]).
    #[serde(default)]
    pub excluded_embed_metadata_keys: Vec<String>,
}

impl Node {
    /// Create a text node with a generated UUID identifier.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: NodeContent::Text { text: text.into() },
            metadata: HashMap::new(),
            excluded_llm_metadata_keys: Vec::new(),
            excluded_embed_metadata_keys: Vec::new(),
        }
    }

    /// Create an image node with a generated UUID identifier.
    pub fn image(source: ImageSource) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: NodeContent::Image { source },
            metadata: HashMap::new(),
            excluded_llm_metadata_keys: Vec::new(),
            excluded_embed_metadata_keys: Vec::new(),
        }
    }

    /// Attach a metadata entry, returning the node for chaining.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Hide a metadata key from [`MetadataMode::Llm`] rendering.
    pub fn exclude_from_llm(mut self, key: impl Into<String>) -> Self {
        self.excluded_llm_metadata_keys.push(key.into());
        self
    }

    /// Hide a metadata key from [`MetadataMode::Embed`] rendering.
    pub fn exclude_from_embed(mut self, key: impl Into<String>) -> Self {
        self.excluded_embed_metadata_keys.push(key.into());
        self
    }

    /// Render the node's text content under the given metadata mode.
    ///
    /// Image nodes render as an empty string; their payload is carried
    /// separately as prompt image parts.
    pub fn text_content(&self, mode: MetadataMode) -> String {
        let text = match &self.content {
            NodeContent::Text { text } => text.as_str(),
            NodeContent::Image { .. } => "",
        };

        let excluded: &[String] = match mode {
            MetadataMode::None => return text.to_string(),
            MetadataMode::All => &[],
            MetadataMode::Llm => &self.excluded_llm_metadata_keys,
            MetadataMode::Embed => &self.excluded_embed_metadata_keys,
        };

        let mut entries: Vec<(&String, &String)> = self
            .metadata
            .iter()
            .filter(|(k, _)| !excluded.contains(*k))
            .collect();
        if entries.is_empty() {
            return text.to_string();
        }
        entries.sort_by_key(|(k, _)| k.as_str());
        let header = entries
            .into_iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{header}\n\n{text}")
    }
}

/// A retrieved [`Node`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeWithScore {
    /// The retrieved node.
    pub node: Node,
    /// The relevance score (higher is more relevant).
    pub score: f32,
}

impl NodeWithScore {
    /// Pair a node with a relevance score.
    pub fn new(node: Node, score: f32) -> Self {
        Self { node, score }
    }
}

/// Partition nodes into text nodes and image nodes, preserving the relative
/// order of each kind. The input is borrowed and never mutated.
pub fn split_nodes_by_kind<'a, I>(nodes: I) -> (Vec<&'a Node>, Vec<&'a Node>)
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut text_nodes = Vec::new();
    let mut image_nodes = Vec::new();
    for node in nodes {
        match node.content {
            NodeContent::Text { .. } => text_nodes.push(node),
            NodeContent::Image { .. } => image_nodes.push(node),
        }
    }
    (text_nodes, image_nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_preserves_relative_order() {
        let nodes = vec![
            Node::text("a"),
            Node::image(ImageSource::DataUrl("data:image/png;base64,x".into())),
            Node::text("b"),
            Node::image(ImageSource::DataUrl("data:image/png;base64,y".into())),
        ];
        let (text_nodes, image_nodes) = split_nodes_by_kind(&nodes);
        assert_eq!(text_nodes.len(), 2);
        assert_eq!(image_nodes.len(), 2);
        assert_eq!(text_nodes[0].id, nodes[0].id);
        assert_eq!(text_nodes[1].id, nodes[2].id);
        assert_eq!(image_nodes[0].id, nodes[1].id);
        assert_eq!(image_nodes[1].id, nodes[3].id);
    }

    #[test]
    fn text_content_renders_metadata_when_requested() {
        let node = Node::text("body").with_metadata("title", "T");
        assert_eq!(node.text_content(MetadataMode::None), "body");
        assert_eq!(node.text_content(MetadataMode::All), "title: T\n\nbody");
    }

    #[test]
    fn llm_mode_omits_keys_excluded_from_the_model() {
        let node = Node::text("body")
            .with_metadata("title", "T")
            .with_metadata("file_path", "/tmp/a")
            .exclude_from_llm("file_path");
        assert_eq!(node.text_content(MetadataMode::Llm), "title: T\n\nbody");
        assert_eq!(
            node.text_content(MetadataMode::All),
            "file_path: /tmp/a\ntitle: T\n\nbody",
            "All must still render excluded keys"
        );
    }

    #[test]
    fn embed_mode_omits_keys_excluded_from_embedding() {
        let node = Node::text("body")
            .with_metadata("title", "T")
            .with_metadata("url", "https://example.com")
            .exclude_from_embed("url");
        assert_eq!(node.text_content(MetadataMode::Embed), "title: T\n\nbody");
    }

    #[test]
    fn fully_excluded_metadata_renders_content_only() {
        let node = Node::text("body").with_metadata("title", "T").exclude_from_llm("title");
        assert_eq!(node.text_content(MetadataMode::Llm), "body");
    }

    #[test]
    fn image_nodes_render_empty_text() {
        let node = Node::image(ImageSource::DataUrl("data:image/png;base64,x".into()));
        assert_eq!(node.text_content(MetadataMode::All), "");
    }
}
