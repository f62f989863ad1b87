//! Exports the [`build_site`] function which stitches together the build
//! hooks in lifecycle order: declaring the schema ([`crate::schema`]),
//! loading content ([`crate::source`]) and assigning slugs as each node is
//! created ([`crate::slug`]), synthesizing snippet nodes
//! ([`crate::snippet`]), and finally synthesizing pages ([`crate::pages`]).

use crate::config::Config;
use crate::digest::NodeIdFactory;
use crate::graph::{Error as GraphError, SiteGraph};
use crate::host::{Action, ActionLog, HookContext};
use crate::node::GraphNode;
use crate::pages::{self, Error as PagesError};
use crate::schema;
use crate::slug::{self, Error as SlugError};
use crate::snippet::{self, Error as SnippetError};
use crate::source::{Error as SourceError, Loader};
use std::io::Write;

/// Builds the content graph for the project described by `config`. Every
/// stage runs to completion before the next one starts, and the first error
/// aborts the build.
pub fn build_site(config: &Config) -> Result<SiteGraph> {
    let ids = NodeIdFactory::new(config.id_namespace.as_str());
    let mut graph = SiteGraph::default();
    let mut log = ActionLog::default();

    schema::create_schema_customization(&mut log);
    commit(&mut graph, &mut log)?;

    let nodes = Loader::new(config, &ids).load()?;
    tracing::info!(nodes = nodes.len(), "loaded content");
    for node in nodes {
        create_node(&mut graph, node)?;
    }

    snippet::source_nodes(HookContext {
        graph: &graph,
        actions: &mut log,
        ids: &ids,
        config,
    })?;
    commit(&mut graph, &mut log)?;

    pages::create_pages(HookContext {
        graph: &graph,
        actions: &mut log,
        ids: &ids,
        config,
    })?;
    commit(&mut graph, &mut log)?;

    tracing::info!(
        pages = graph.pages().count(),
        snippets = graph.snippets().count(),
        "built site"
    );
    Ok(graph)
}

/// Writes the graph's [`crate::graph::Manifest`] to `w` as pretty-printed
/// JSON.
pub fn write_manifest<W: Write>(graph: &SiteGraph, w: W) -> Result<()> {
    serde_json::to_writer_pretty(w, &graph.manifest())?;
    Ok(())
}

// Applies the recorded actions. Created nodes go through `create_node` so
// they see the same node-creation hook as loaded ones.
fn commit(graph: &mut SiteGraph, log: &mut ActionLog) -> Result<()> {
    for action in log.take() {
        match action {
            Action::CreateNode(node) => create_node(graph, GraphNode::Snippet(node))?,
            action => graph.apply(action)?,
        }
    }
    Ok(())
}

fn create_node(graph: &mut SiteGraph, node: GraphNode) -> Result<()> {
    let mut log = ActionLog::default();
    slug::on_create_node(&node, &mut log)?;
    graph.insert(node);
    for action in log.take() {
        graph.apply(action)?;
    }
    Ok(())
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Each variant wraps the error of one
/// stage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned for errors loading content from disk.
    #[error("loading content: {0}")]
    Source(#[from] SourceError),

    /// Returned for errors deriving slugs.
    #[error("assigning slugs: {0}")]
    Slug(#[from] SlugError),

    /// Returned for errors synthesizing snippet nodes.
    #[error("sourcing snippet nodes: {0}")]
    Snippet(#[from] SnippetError),

    /// Returned for errors synthesizing pages.
    #[error("creating pages: {0}")]
    Pages(#[from] PagesError),

    /// Returned when the graph rejects an action.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Returned when the manifest can't be written.
    #[error("writing manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
