//! Page synthesis. Builds one page per snippet (split between the current
//! and archive sections), one page per distinct primary tag, and the fixed
//! `/beginner` page, then hands all of them to the host as
//! [`PageRequest`]s.

use crate::config::Config;
use crate::host::{HookContext, QueryError};
use crate::node::{ContentNode, Slug};
use crate::tag::{primary_tags, Tag, TagMatcher};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Source paths containing this are never turned into snippet pages.
const README: &str = "README";

/// The route of the fixed beginner page.
pub const BEGINNER_ROUTE: &str = "/beginner";

/// A request for the host to render `template` at `path` with `context`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageRequest {
    /// The route of the page, e.g. `/snippet/all-equal/`.
    pub path: String,

    /// The template the page is rendered with.
    pub template: PathBuf,

    pub context: PageContext,
}

/// The values handed to a page's template.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageContext {
    /// Context for snippet pages. `scope` tells the template which snippet
    /// collection the slug belongs to.
    Snippet { slug: Slug, scope: String },

    /// Context for tag pages. Serializes `tag_regex` as `tagRegex`.
    Tag {
        tag: String,
        #[serde(rename = "tagRegex")]
        tag_regex: TagMatcher,
    },
}

/// Queries the markdown nodes and creates every page. Either every page is
/// created or, on error, none are.
pub fn create_pages(ctx: HookContext<'_>) -> Result<()> {
    let nodes = ctx.graph.query_markdown(ctx.config.query_limit)?;

    let mut pages = snippet_pages(&nodes, ctx.config)?;
    // Tags are aggregated over every queried node, README files included.
    pages.extend(tag_pages(&primary_tags(&nodes), &ctx.config.tag_template));
    pages.push(beginner_page(&ctx.config.tag_template));

    tracing::info!(
        nodes = nodes.len(),
        pages = pages.len(),
        "creating pages"
    );
    for page in pages {
        tracing::debug!(path = %page.path, "creating page");
        ctx.actions.create_page(page);
    }
    Ok(())
}

/// Creates one page per node, skipping `README` files. A node whose source
/// path contains the archive marker goes under `/archive`; any other node
/// goes under `/snippet`.
pub fn snippet_pages(nodes: &[ContentNode], config: &Config) -> Result<Vec<PageRequest>> {
    let mut pages = Vec::with_capacity(nodes.len());
    for node in nodes {
        let source = node.file_absolute_path.to_string_lossy();
        if source.contains(README) {
            continue;
        }

        let slug = node
            .fields
            .slug
            .clone()
            .ok_or_else(|| Error::MissingSlug(node.file_absolute_path.clone()))?;
        let (section, scope) = match source.contains(config.snippet_archive_path.as_str()) {
            true => ("/archive", config.archive_scope()),
            false => ("/snippet", config.snippet_scope()),
        };
        pages.push(PageRequest {
            path: format!("{}{}", section, slug),
            template: config.snippet_template.clone(),
            context: PageContext::Snippet { slug, scope },
        });
    }
    Ok(pages)
}

/// Creates one page per tag at `/tag/{kebab(tag)}/`. Tags with nothing to
/// route on (empty, or only punctuation) are skipped.
pub fn tag_pages(tags: &[&str], template: &Path) -> Vec<PageRequest> {
    tags.iter()
        .filter_map(|name| match Tag::new(name) {
            Some(tag) => Some(tag),
            None => {
                tracing::warn!(tag = %name, "skipping tag that can't be turned into a route");
                None
            }
        })
        .map(|tag| PageRequest {
            path: tag.route.clone(),
            template: template.to_owned(),
            context: PageContext::Tag {
                tag_regex: tag.matcher(),
                tag: tag.name,
            },
        })
        .collect()
}

/// The fixed page listing every snippet tagged `beginner` anywhere in its
/// tags.
pub fn beginner_page(template: &Path) -> PageRequest {
    PageRequest {
        path: BEGINNER_ROUTE.to_owned(),
        template: template.to_owned(),
        context: PageContext::Tag {
            tag: "beginner snippets".to_owned(),
            tag_regex: TagMatcher::Contains("beginner".to_owned()),
        },
    }
}

/// The result of a fallible page-synthesis operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error synthesizing pages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the markdown query fails.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Returned when a node reaches page synthesis without a slug.
    #[error("node `{}` has no slug", .0.display())]
    MissingSlug(PathBuf),
}
