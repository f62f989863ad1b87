//! Defines the node types that live in the content graph: rendered markdown
//! ([`ContentNode`]), structured snippet metadata ([`SnippetDataCollection`])
//! and the synthesized [`SnippetNode`]. Ingestion validates frontmatter into
//! these typed records so that the build hooks never see an open-ended bag of
//! values.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The identity of a node in the content graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> NodeId {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A path-shaped identifier derived from a node's source file, e.g. `/foo/`.
/// See [`crate::slug::file_path_slug`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub(crate) fn new(slug: String) -> Slug {
        Slug(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The frontmatter of a markdown document. Both fields are optional since
/// some documents (e.g., `README.md`) carry no frontmatter at all.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Frontmatter {
    /// The document title. Snippet metadata joins on this field.
    #[serde(default)]
    pub title: Option<String>,

    /// A comma-separated list of tags. The first entry is the primary tag.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Option<String>,
}

impl Frontmatter {
    /// Returns the first comma-separated token of `tags`, or `None` if the
    /// document has no tags.
    pub fn primary_tag(&self) -> Option<&str> {
        match self.tags.as_deref() {
            None | Some("") => None,
            Some(tags) => tags.split(',').next(),
        }
    }
}

// Anything other than a string is treated as "no tags" so that a single
// malformed document can't fail the build.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(tags) => Ok(Some(tags)),
        serde_yaml::Value::Null => Ok(None),
        other => {
            tracing::warn!(value = ?other, "ignoring non-string `tags` frontmatter");
            Ok(None)
        }
    }
}

/// Fields derived by the build hooks and attached to a [`ContentNode`] after
/// it is created.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeFields {
    pub slug: Option<Slug>,
}

/// A rendered markdown document.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentNode {
    pub id: NodeId,

    /// The absolute path of the source file.
    pub file_absolute_path: PathBuf,

    /// The path of the source file relative to the content source it was
    /// loaded from (e.g., `foo/index.md`).
    pub relative_path: PathBuf,

    pub frontmatter: Frontmatter,

    /// The rendered HTML body.
    pub html: String,

    pub fields: NodeFields,
}

/// One snippet's structured metadata.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SnippetDatum {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub attributes: SnippetAttributes,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SnippetAttributes {
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Identifies which logical collection a [`SnippetDataCollection`] belongs
/// to.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CollectionMeta {
    /// The scope marker, e.g. `./snippets` or `./snippets_archive`.
    pub scope: String,
}

/// A structured metadata file, as loaded from the snippet data directory.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SnippetDataCollection {
    /// Assigned on ingestion; not part of the file.
    #[serde(skip)]
    pub id: NodeId,
    pub data: Vec<SnippetDatum>,
    pub meta: CollectionMeta,
}

/// Host bookkeeping for a synthesized node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Internal {
    #[serde(rename = "type")]
    pub type_name: String,

    /// Digest over the node's content, used for change detection.
    pub content_digest: String,
}

/// A snippet synthesized from a [`SnippetDatum`] and the html of its
/// matching [`ContentNode`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SnippetNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub internal: Internal,
    pub title: String,
    pub html: String,
    pub tags: Vec<String>,
}

/// Any node the content graph can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphNode {
    Markdown(ContentNode),
    SnippetData(SnippetDataCollection),
    Snippet(SnippetNode),
}

impl GraphNode {
    pub fn id(&self) -> &NodeId {
        match self {
            GraphNode::Markdown(node) => &node.id,
            GraphNode::SnippetData(node) => &node.id,
            GraphNode::Snippet(node) => &node.id,
        }
    }

    /// The host type name of the node.
    pub fn type_name(&self) -> &str {
        match self {
            GraphNode::Markdown(_) => "MarkdownRemark",
            GraphNode::SnippetData(_) => "SnippetDataJson",
            GraphNode::Snippet(node) => &node.internal.type_name,
        }
    }
}

#[cfg(test)]
impl ContentNode {
    /// Builds a markdown node for tests. The source root is taken to be
    /// `/site`, so `relative_path` should be relative to that.
    pub(crate) fn fixture(
        relative_path: &str,
        title: Option<&str>,
        tags: Option<&str>,
        slug: Option<&str>,
    ) -> ContentNode {
        ContentNode {
            id: NodeId::new(relative_path),
            file_absolute_path: PathBuf::from("/site").join(relative_path),
            relative_path: PathBuf::from(relative_path),
            frontmatter: Frontmatter {
                title: title.map(str::to_owned),
                tags: tags.map(str::to_owned),
            },
            html: format!("<p>{}</p>", title.unwrap_or_default()),
            fields: NodeFields {
                slug: slug.map(|s| Slug::new(s.to_owned())),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_primary_tag() {
        let frontmatter = |tags: Option<&str>| Frontmatter {
            title: None,
            tags: tags.map(str::to_owned),
        };
        assert_eq!(Some("array"), frontmatter(Some("array,function")).primary_tag());
        assert_eq!(Some("array"), frontmatter(Some("array")).primary_tag());
        assert_eq!(Some(" a"), frontmatter(Some(" a, b")).primary_tag());
        assert_eq!(None, frontmatter(Some("")).primary_tag());
        assert_eq!(None, frontmatter(None).primary_tag());
    }

    #[test]
    fn test_frontmatter_ignores_malformed_tags() -> Result<(), serde_yaml::Error> {
        let frontmatter: Frontmatter = serde_yaml::from_str("title: foo\ntags: [a, b]\n")?;
        assert_eq!(Some("foo"), frontmatter.title.as_deref());
        assert_eq!(None, frontmatter.tags);

        let frontmatter: Frontmatter = serde_yaml::from_str("title: foo\ntags: a,b\n")?;
        assert_eq!(Some("a,b"), frontmatter.tags.as_deref());
        Ok(())
    }

    #[test]
    fn test_snippet_data_defaults() -> Result<(), serde_json::Error> {
        let collection: SnippetDataCollection = serde_json::from_str(
            r#"{"data": [{"id": "x", "title": "X"}], "meta": {"scope": "./snippets"}}"#,
        )?;
        assert_eq!("./snippets", collection.meta.scope);
        assert!(collection.data[0].attributes.tags.is_empty());
        Ok(())
    }
}
