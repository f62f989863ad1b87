//! An in-memory content graph. [`SiteGraph`] answers the build hooks'
//! queries and applies the [`Action`]s they dispatch, acting as the page
//! registry and node store of a build.

use crate::host::{Action, ContentGraph, NodeField, QueryError};
use crate::node::{ContentNode, GraphNode, NodeId, SnippetDataCollection, SnippetNode};
use crate::pages::PageRequest;
use crate::schema::TypeDefinition;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The content graph of a single build. Nothing persists across builds.
///
/// Markdown and snippet data nodes are handed back in creation order, so a
/// hook that takes the first match sees the node that was loaded first.
#[derive(Debug, Default)]
pub struct SiteGraph {
    markdown: BTreeMap<NodeId, ContentNode>,
    markdown_order: Vec<NodeId>,
    snippet_data: BTreeMap<NodeId, SnippetDataCollection>,
    snippet_data_order: Vec<NodeId>,
    snippets: BTreeMap<NodeId, SnippetNode>,
    pages: BTreeMap<String, PageRequest>,
    types: BTreeMap<String, TypeDefinition>,
}

impl SiteGraph {
    /// Adds `node` to the graph, replacing any node with the same id.
    pub fn insert(&mut self, node: GraphNode) {
        tracing::debug!(id = %node.id(), kind = node.type_name(), "creating node");
        let replaced = match node {
            GraphNode::Markdown(node) => {
                insert_ordered(&mut self.markdown, &mut self.markdown_order, node.id.clone(), node)
            }
            GraphNode::SnippetData(node) => insert_ordered(
                &mut self.snippet_data,
                &mut self.snippet_data_order,
                node.id.clone(),
                node,
            ),
            GraphNode::Snippet(node) => self.snippets.insert(node.id.clone(), node).is_some(),
        };
        if replaced {
            tracing::debug!("replaced existing node");
        }
    }

    /// Applies a single action. Pages are keyed by route, so a later page at
    /// the same route replaces an earlier one.
    pub fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::CreateNodeField { node, field } => self.set_field(node, field),
            Action::CreatePage(page) => {
                if let Some(previous) = self.pages.insert(page.path.clone(), page) {
                    tracing::warn!(path = %previous.path, "page replaced by a later request");
                }
                Ok(())
            }
            Action::CreateNode(node) => {
                self.insert(GraphNode::Snippet(node));
                Ok(())
            }
            Action::CreateTypes(definition) => {
                self.types.insert(definition.name.clone(), definition);
                Ok(())
            }
        }
    }

    fn set_field(&mut self, id: NodeId, field: NodeField) -> Result<()> {
        let node = match self.markdown.get_mut(&id) {
            Some(node) => node,
            None => {
                return Err(Error::UnknownNode {
                    node: id,
                    field: field.name(),
                })
            }
        };
        match field {
            NodeField::Slug(slug) => match &node.fields.slug {
                Some(existing) if *existing != slug => Err(Error::FieldReassigned {
                    node: id,
                    field: "slug",
                    existing: existing.to_string(),
                    attempted: slug.to_string(),
                }),
                _ => {
                    node.fields.slug = Some(slug);
                    Ok(())
                }
            },
        }
    }

    /// The registered pages, ordered by route.
    pub fn pages(&self) -> impl Iterator<Item = &PageRequest> {
        self.pages.values()
    }

    pub fn page(&self, path: &str) -> Option<&PageRequest> {
        self.pages.get(path)
    }

    /// The synthesized snippet nodes, ordered by id.
    pub fn snippets(&self) -> impl Iterator<Item = &SnippetNode> {
        self.snippets.values()
    }

    pub fn markdown(&self, id: &NodeId) -> Option<&ContentNode> {
        self.markdown.get(id)
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Everything the template renderer needs from a finished build.
    pub fn manifest(&self) -> Manifest<'_> {
        Manifest {
            types: self.types.values().map(ToString::to_string).collect(),
            pages: self.pages().collect(),
            snippets: self.snippets().collect(),
        }
    }
}

/// The serializable output of a build. See [`SiteGraph::manifest`].
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    /// Type definitions, as SDL.
    pub types: Vec<String>,
    pub pages: Vec<&'a PageRequest>,
    pub snippets: Vec<&'a SnippetNode>,
}

// A replaced node keeps its original position.
fn insert_ordered<T>(
    nodes: &mut BTreeMap<NodeId, T>,
    order: &mut Vec<NodeId>,
    id: NodeId,
    node: T,
) -> bool {
    let replaced = nodes.insert(id.clone(), node).is_some();
    if !replaced {
        order.push(id);
    }
    replaced
}

fn in_order<'a, T>(nodes: &'a BTreeMap<NodeId, T>, order: &[NodeId]) -> Vec<&'a T> {
    order.iter().filter_map(|id| nodes.get(id)).collect()
}

// Untitled documents sort after titled ones.
fn by_title(a: &ContentNode, b: &ContentNode) -> Ordering {
    match (&a.frontmatter.title, &b.frontmatter.title) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl ContentGraph for SiteGraph {
    fn query_markdown(&self, limit: usize) -> std::result::Result<Vec<ContentNode>, QueryError> {
        let mut nodes = self.markdown_nodes();
        // Stable, so equal titles stay in creation order.
        nodes.sort_by(|a, b| by_title(a, b));
        Ok(nodes.into_iter().take(limit).cloned().collect())
    }

    fn markdown_nodes(&self) -> Vec<&ContentNode> {
        in_order(&self.markdown, &self.markdown_order)
    }

    fn snippet_data(&self) -> Vec<&SnippetDataCollection> {
        in_order(&self.snippet_data, &self.snippet_data_order)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error applying an [`Action`] to the graph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a field is attached to a node the graph doesn't hold.
    #[error("can't set `{field}` on unknown node `{node}`")]
    UnknownNode { node: NodeId, field: &'static str },

    /// Returned when a field that was already set is set to a different
    /// value.
    #[error("`{field}` of node `{node}` is already `{existing}`; refusing `{attempted}`")]
    FieldReassigned {
        node: NodeId,
        field: &'static str,
        existing: String,
        attempted: String,
    },
}
