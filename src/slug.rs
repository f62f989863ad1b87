//! Slug assignment. Every markdown node receives a `slug` field derived from
//! its source path as soon as it enters the content graph, which is before
//! any page is synthesized.

use crate::host::{Actions, NodeField};
use crate::node::{GraphNode, Slug};
use std::path::{Component, Path, PathBuf};

/// Handles a node entering the content graph. Markdown nodes get a slug
/// field; every other kind of node is ignored.
pub fn on_create_node(node: &GraphNode, actions: &mut dyn Actions) -> Result<()> {
    if let GraphNode::Markdown(markdown) = node {
        let slug = file_path_slug(&markdown.relative_path)?;
        tracing::debug!(node = %markdown.id, slug = %slug, "assigning slug");
        actions.create_node_field(&markdown.id, NodeField::Slug(slug));
    }
    Ok(())
}

/// Derives a slug from a source path relative to its content root. The
/// extension is dropped, an `index` file stands for its directory, and the
/// result is wrapped in slashes:
///
/// | relative path    | slug       |
/// |------------------|------------|
/// | `foo.md`         | `/foo/`    |
/// | `a/b.md`         | `/a/b/`    |
/// | `a/index.md`     | `/a/`      |
/// | `index.md`       | `/`        |
pub fn file_path_slug(relative_path: &Path) -> Result<Slug> {
    let stem = relative_path
        .file_stem()
        .ok_or_else(|| Error::InvalidPath(relative_path.to_owned()))?;
    let parent = relative_path.parent().unwrap_or_else(|| Path::new(""));
    let path = if stem == "index" {
        parent.to_owned()
    } else {
        parent.join(stem)
    };

    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => segments.push(
                segment
                    .to_str()
                    .ok_or_else(|| Error::InvalidPath(relative_path.to_owned()))?,
            ),
            Component::CurDir => {}
            _ => return Err(Error::InvalidPath(relative_path.to_owned())),
        }
    }

    Ok(Slug::new(match segments.is_empty() {
        true => String::from("/"),
        false => format!("/{}/", segments.join("/")),
    }))
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error deriving a slug.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the path has no file name, isn't relative, or isn't
    /// valid UTF-8.
    #[error("can't derive a slug from `{}`", .0.display())]
    InvalidPath(PathBuf),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::host::{Action, ActionLog};
    use crate::node::{ContentNode, NodeId};

    fn slug(path: &str) -> Result<String> {
        Ok(file_path_slug(Path::new(path))?.as_str().to_owned())
    }

    #[test]
    fn test_file_path_slug() -> Result<()> {
        assert_eq!("/foo/", slug("foo.md")?);
        assert_eq!("/a/b/", slug("a/b.md")?);
        assert_eq!("/a/", slug("a/index.md")?);
        assert_eq!("/", slug("index.md")?);
        assert_eq!("/README/", slug("README.md")?);
        assert_eq!("/foo/", slug("./foo.md")?);
        Ok(())
    }

    #[test]
    fn test_file_path_slug_rejects_escaping_paths() {
        assert!(matches!(
            file_path_slug(Path::new("../foo.md")),
            Err(Error::InvalidPath(_))
        ));
        assert!(file_path_slug(Path::new("")).is_err());
    }

    #[test]
    fn test_on_create_node_assigns_slug_to_markdown() -> Result<()> {
        let mut log = ActionLog::default();
        let node = GraphNode::Markdown(ContentNode::fixture("all-equal.md", None, None, None));
        on_create_node(&node, &mut log)?;

        assert_eq!(
            &[Action::CreateNodeField {
                node: NodeId::new("all-equal.md"),
                field: NodeField::Slug(file_path_slug(Path::new("all-equal.md"))?),
            }],
            log.actions()
        );
        Ok(())
    }

    #[test]
    fn test_on_create_node_ignores_other_nodes() -> Result<()> {
        use crate::node::{CollectionMeta, SnippetDataCollection};

        let mut log = ActionLog::default();
        let node = GraphNode::SnippetData(SnippetDataCollection {
            id: NodeId::new("data"),
            data: Vec::new(),
            meta: CollectionMeta {
                scope: "./snippets".to_owned(),
            },
        });
        on_create_node(&node, &mut log)?;
        assert!(log.actions().is_empty());
        Ok(())
    }
}
