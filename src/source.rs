//! Defines the [`Loader`], which ingests content from the file system:
//! markdown documents from the current and archived snippet directories, and
//! the structured snippet metadata files from the data directory.

use crate::config::Config;
use crate::digest::NodeIdFactory;
use crate::markdown;
use crate::node::{ContentNode, Frontmatter, GraphNode, NodeFields, SnippetDataCollection};
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKDOWN_EXTENSION: &str = "md";
const JSON_EXTENSION: &str = "json";

/// Loads content nodes from the directories named by a [`Config`].
pub struct Loader<'a> {
    config: &'a Config,
    ids: &'a NodeIdFactory,
}

impl<'a> Loader<'a> {
    pub fn new(config: &'a Config, ids: &'a NodeIdFactory) -> Loader<'a> {
        Loader { config, ids }
    }

    /// Loads every markdown node (current snippets first, then archived
    /// ones) followed by every snippet data collection. Missing directories
    /// are skipped.
    pub fn load(&self) -> Result<Vec<GraphNode>> {
        let mut nodes = Vec::new();
        for dir in &[self.config.snippet_directory(), self.config.archive_directory()] {
            nodes.extend(self.load_markdown(dir)?.into_iter().map(GraphNode::Markdown));
        }
        nodes.extend(
            self.load_snippet_data(&self.config.snippet_data_directory)?
                .into_iter()
                .map(GraphNode::SnippetData),
        );
        Ok(nodes)
    }

    /// Walks `source_directory` for markdown files in file-name order.
    pub fn load_markdown(&self, source_directory: &Path) -> Result<Vec<ContentNode>> {
        if !source_directory.is_dir() {
            tracing::warn!(dir = %source_directory.display(), "skipping missing content directory");
            return Ok(Vec::new());
        }
        let root = source_directory.canonicalize()?;

        let mut nodes = Vec::new();
        for path in files_with_extension(&root, MARKDOWN_EXTENSION)? {
            nodes.push(self.parse_markdown(&root, &path)?);
        }
        tracing::debug!(dir = %root.display(), nodes = nodes.len(), "loaded markdown");
        Ok(nodes)
    }

    fn parse_markdown(&self, root: &Path, path: &Path) -> Result<ContentNode> {
        match self._parse_markdown(root, path) {
            Ok(node) => Ok(node),
            Err(e) => Err(Error::Annotated(
                format!("parsing markdown `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_markdown(&self, root: &Path, path: &Path) -> Result<ContentNode> {
        let contents = std::fs::read_to_string(path)?;
        let (frontmatter, body) = split_frontmatter(&contents)?;

        let mut html = String::new();
        markdown::to_html(&mut html, body);

        Ok(ContentNode {
            id: self.ids.create(&format!("markdown:{}", path.display())),
            file_absolute_path: path.to_owned(),
            // `path` was found by walking `root`, so this can't fail.
            relative_path: path.strip_prefix(root).unwrap_or(path).to_owned(),
            frontmatter,
            html,
            fields: NodeFields::default(),
        })
    }

    /// Reads every JSON file in `data_directory` as a
    /// [`SnippetDataCollection`].
    pub fn load_snippet_data(&self, data_directory: &Path) -> Result<Vec<SnippetDataCollection>> {
        if !data_directory.is_dir() {
            tracing::warn!(dir = %data_directory.display(), "skipping missing snippet data directory");
            return Ok(Vec::new());
        }

        let mut collections = Vec::new();
        for path in files_with_extension(data_directory, JSON_EXTENSION)? {
            let mut collection: SnippetDataCollection = serde_json::from_reader(File::open(&path)?)
                .map_err(|e| {
                    Error::Annotated(
                        format!("parsing snippet data `{}`", path.display()),
                        Box::new(Error::DeserializeJson(e)),
                    )
                })?;
            collection.id = self.ids.create(&format!("data:{}", path.display()));
            tracing::debug!(
                path = %path.display(),
                scope = %collection.meta.scope,
                records = collection.data.len(),
                "loaded snippet data"
            );
            collections.push(collection);
        }
        Ok(collections)
    }
}

fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for result in WalkDir::new(dir).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
        let entry = result?;
        if entry.file_type().is_file()
            && entry.path().extension().map_or(false, |ext| ext == extension)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Splits a markdown document into its YAML frontmatter and its body. The
/// frontmatter is optional, but once a document opens with a `---` fence it
/// must also close one.
///
/// ```md
/// ---
/// title: allEqual
/// tags: array,function,beginner
/// ---
/// Checks if all elements in an array are equal.
/// ```
pub fn split_frontmatter(input: &str) -> Result<(Frontmatter, &str)> {
    const FENCE: &str = "---";
    match input.strip_prefix(FENCE) {
        Some(rest) if rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n") => {}
        _ => return Ok((Frontmatter::default(), input)),
    }
    let yaml_start = FENCE.len();
    let yaml_stop = match input[yaml_start..].find("\n---") {
        None => return Err(Error::FrontmatterMissingEndFence),
        Some(offset) => yaml_start + offset + 1,
    };
    let body_start = yaml_stop + FENCE.len();

    let yaml = &input[yaml_start..yaml_stop];
    let frontmatter = match yaml.trim().is_empty() {
        true => Frontmatter::default(),
        false => serde_yaml::from_str(yaml)?,
    };
    Ok((frontmatter, &input[body_start..]))
}

/// Represents the result of a content-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading content.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a document opens a frontmatter fence (`---`) but never
    /// closes it.
    #[error("missing closing `---`")]
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    #[error(transparent)]
    DeserializeYaml(#[from] serde_yaml::Error),

    /// Returned when a snippet data file isn't valid JSON for a collection.
    #[error(transparent)]
    DeserializeJson(#[from] serde_json::Error),

    /// Returned for other I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Returned for WalkDir I/O errors.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// An error with an annotation.
    #[error("{0}: {1}")]
    Annotated(String, Box<Error>),
}
