//! Snippet node synthesis: joins the current snippet metadata collection with
//! the rendered markdown nodes on title and creates one `Snippet` node per
//! metadata record.

use crate::digest::{self, content_digest};
use crate::host::HookContext;
use crate::node::{Internal, SnippetNode};
use serde::Serialize;

/// The type name of synthesized snippet nodes.
pub const SNIPPET_TYPE: &str = "Snippet";

/// The record a snippet node's content digest is computed over.
#[derive(Serialize)]
struct SnippetRecord<'a> {
    title: &'a str,
    html: &'a str,
    tags: &'a [String],
    id: &'a str,
}

/// Creates a `Snippet` node for each record of the current-scope metadata
/// collection. Every record must have a markdown node with the same title;
/// the first such node supplies the html.
pub fn source_nodes(ctx: HookContext<'_>) -> Result<()> {
    let scope = ctx.config.snippet_scope();
    let collection = ctx
        .graph
        .snippet_data()
        .into_iter()
        .find(|collection| collection.meta.scope == scope)
        .ok_or_else(|| Error::MissingCollection(scope.clone()))?;
    let markdown = ctx.graph.markdown_nodes();

    let mut snippets = Vec::with_capacity(collection.data.len());
    for datum in &collection.data {
        let html = markdown
            .iter()
            .find(|node| node.frontmatter.title.as_deref() == Some(datum.title.as_str()))
            .map(|node| node.html.as_str())
            .ok_or_else(|| Error::UnmatchedTitle(datum.title.clone()))?;

        let record = SnippetRecord {
            title: &datum.title,
            html,
            tags: &datum.attributes.tags,
            id: &datum.id,
        };
        snippets.push(SnippetNode {
            id: ctx.ids.create(&format!("snp-{}", datum.id)),
            parent: None,
            children: Vec::new(),
            internal: Internal {
                type_name: SNIPPET_TYPE.to_owned(),
                content_digest: content_digest(&record)?,
            },
            title: datum.title.clone(),
            html: html.to_owned(),
            tags: datum.attributes.tags.clone(),
        });
    }

    tracing::info!(scope = %scope, snippets = snippets.len(), "sourcing snippet nodes");
    for snippet in snippets {
        ctx.actions.create_node(snippet);
    }
    Ok(())
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error synthesizing snippet nodes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when no metadata collection carries the current scope.
    #[error("no snippet data collection with scope `{0}`")]
    MissingCollection(String),

    /// Returned when a metadata record's title matches no markdown node.
    #[error("no markdown node titled `{0}`")]
    UnmatchedTitle(String),

    /// Returned when a snippet's digest can't be computed.
    #[error(transparent)]
    Digest(#[from] digest::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::digest::NodeIdFactory;
    use crate::host::{ActionLog, ContentGraph, QueryError};
    use crate::node::{
        CollectionMeta, ContentNode, NodeId, SnippetAttributes, SnippetDataCollection,
        SnippetDatum,
    };
    use std::path::Path;

    struct Graph {
        markdown: Vec<ContentNode>,
        data: Vec<SnippetDataCollection>,
    }

    impl ContentGraph for Graph {
        fn query_markdown(
            &self,
            _limit: usize,
        ) -> std::result::Result<Vec<ContentNode>, QueryError> {
            Ok(self.markdown.clone())
        }

        fn markdown_nodes(&self) -> Vec<&ContentNode> {
            self.markdown.iter().collect()
        }

        fn snippet_data(&self) -> Vec<&SnippetDataCollection> {
            self.data.iter().collect()
        }
    }

    fn collection(scope: &str, data: &[(&str, &str)]) -> SnippetDataCollection {
        SnippetDataCollection {
            id: NodeId::new(scope),
            data: data
                .iter()
                .map(|(id, title)| SnippetDatum {
                    id: id.to_string(),
                    title: title.to_string(),
                    attributes: SnippetAttributes {
                        tags: vec!["array".to_owned(), "beginner".to_owned()],
                    },
                })
                .collect(),
            meta: CollectionMeta {
                scope: scope.to_owned(),
            },
        }
    }

    fn run(graph: &Graph) -> Result<ActionLog> {
        let config = Config::from_yaml_str(Path::new("/site"), "{}").expect("config");
        let ids = NodeIdFactory::new("test");
        let mut log = ActionLog::default();
        source_nodes(HookContext {
            graph,
            actions: &mut log,
            ids: &ids,
            config: &config,
        })?;
        Ok(log)
    }

    #[test]
    fn test_join_on_title() -> Result<()> {
        let graph = Graph {
            markdown: vec![ContentNode::fixture("snippets/foo.md", Some("Foo"), None, None)],
            data: vec![collection("./snippets", &[("foo", "Foo")])],
        };
        let log = run(&graph)?;
        let nodes: Vec<&SnippetNode> = log.nodes().collect();

        assert_eq!(1, nodes.len());
        let node = nodes[0];
        assert_eq!(graph.markdown[0].html, node.html);
        assert_eq!(NodeIdFactory::new("test").create("snp-foo"), node.id);
        assert_eq!("Foo", node.title);
        assert_eq!(vec!["array", "beginner"], node.tags);
        assert_eq!(SNIPPET_TYPE, node.internal.type_name);
        assert_eq!(None, node.parent);
        assert!(node.children.is_empty());
        Ok(())
    }

    #[test]
    fn test_join_uses_first_match() -> Result<()> {
        let mut second = ContentNode::fixture("snippets_archive/foo.md", Some("Foo"), None, None);
        second.html = "<p>archived</p>".to_owned();
        let graph = Graph {
            markdown: vec![
                ContentNode::fixture("snippets/foo.md", Some("Foo"), None, None),
                second,
            ],
            data: vec![collection("./snippets", &[("foo", "Foo")])],
        };
        let log = run(&graph)?;
        assert_eq!(
            vec![graph.markdown[0].html.as_str()],
            log.nodes().map(|n| n.html.as_str()).collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_unmatched_title_is_fatal() {
        let graph = Graph {
            markdown: vec![ContentNode::fixture("snippets/foo.md", Some("Foo"), None, None)],
            data: vec![collection("./snippets", &[("foo", "Foo"), ("bar", "Bar")])],
        };
        match run(&graph) {
            Err(Error::UnmatchedTitle(title)) => assert_eq!("Bar", title),
            other => panic!("wanted UnmatchedTitle, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_only_current_scope_is_sourced() -> Result<()> {
        let graph = Graph {
            markdown: vec![ContentNode::fixture("snippets/foo.md", Some("Foo"), None, None)],
            data: vec![
                // The archived record has no markdown node; sourcing it would fail.
                collection("./snippets_archive", &[("old", "Old")]),
                collection("./snippets", &[("foo", "Foo")]),
            ],
        };
        assert_eq!(1, run(&graph)?.nodes().count());
        Ok(())
    }

    #[test]
    fn test_missing_collection() {
        let graph = Graph {
            markdown: Vec::new(),
            data: vec![collection("./snippets_archive", &[])],
        };
        assert!(matches!(run(&graph), Err(Error::MissingCollection(_))));
    }

    #[test]
    fn test_digest_is_stable_and_tracks_content() -> Result<()> {
        let graph = Graph {
            markdown: vec![ContentNode::fixture("snippets/foo.md", Some("Foo"), None, None)],
            data: vec![collection("./snippets", &[("foo", "Foo")])],
        };
        let digest = |log: &ActionLog| {
            log.nodes()
                .map(|n| n.internal.content_digest.clone())
                .collect::<Vec<_>>()
        };
        let first = digest(&run(&graph)?);
        assert_eq!(first, digest(&run(&graph)?));

        let mut changed = graph;
        changed.markdown[0].html = "<p>changed</p>".to_owned();
        assert_ne!(first, digest(&run(&changed)?));
        Ok(())
    }
}
