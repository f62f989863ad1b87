//! Loads the project configuration from `snipsite.yaml`. The configuration
//! names the content directories (and therefore the scope markers that
//! distinguish current snippets from archived ones) as well as the templates
//! that page requests point at.

use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "snipsite.yaml";

#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_snippet_path")]
    snippet_path: String,

    #[serde(default = "default_snippet_archive_path")]
    snippet_archive_path: String,

    #[serde(default = "default_snippet_data_path")]
    snippet_data_path: PathBuf,

    #[serde(default = "default_query_limit")]
    query_limit: usize,

    #[serde(default = "default_id_namespace")]
    id_namespace: String,

    #[serde(default)]
    templates: Templates,
}

#[derive(Deserialize)]
struct Templates {
    #[serde(default = "default_snippet_template")]
    snippet: PathBuf,

    #[serde(default = "default_tag_template")]
    tag: PathBuf,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            snippet: default_snippet_template(),
            tag: default_tag_template(),
        }
    }
}

fn default_snippet_path() -> String {
    "snippets".to_owned()
}

fn default_snippet_archive_path() -> String {
    "snippets_archive".to_owned()
}

fn default_snippet_data_path() -> PathBuf {
    PathBuf::from("snippet_data")
}

fn default_query_limit() -> usize {
    1000
}

fn default_id_namespace() -> String {
    "snipsite".to_owned()
}

fn default_snippet_template() -> PathBuf {
    PathBuf::from("templates/SnippetPage.js")
}

fn default_tag_template() -> PathBuf {
    PathBuf::from("templates/TagPage.js")
}

/// The resolved project configuration. All paths are joined onto the
/// project root.
#[derive(Clone, Debug)]
pub struct Config {
    pub root_directory: PathBuf,

    /// The directory name of current snippets. Also the "current" scope
    /// marker (as `./{snippet_path}`).
    pub snippet_path: String,

    /// The directory name of archived snippets. Any source path containing
    /// this string is routed under `/archive`.
    pub snippet_archive_path: String,

    /// The directory holding the structured snippet metadata files.
    pub snippet_data_directory: PathBuf,

    pub snippet_template: PathBuf,
    pub tag_template: PathBuf,

    /// The maximum number of markdown nodes fetched for page synthesis.
    pub query_limit: usize,

    /// The namespace for synthesized node ids.
    pub id_namespace: String,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for [`PROJECT_FILE`]
    /// and loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.is_file() {
            return Config::from_project_file(&path);
        }
        match dir.parent() {
            Some(parent) => Config::from_directory(parent),
            None => Err(Error::NotFound),
        }
    }

    /// Loads the project file at `path`. The project root is the file's
    /// parent directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project = serde_yaml::from_reader(file)?;
        Ok(Config::from_project(
            path.parent().unwrap_or_else(|| Path::new(".")),
            project,
        ))
    }

    /// Parses a project from a YAML string, rooted at `root_directory`.
    pub fn from_yaml_str(root_directory: &Path, yaml: &str) -> Result<Config> {
        Ok(Config::from_project(root_directory, serde_yaml::from_str(yaml)?))
    }

    fn from_project(root: &Path, project: Project) -> Config {
        Config {
            root_directory: root.to_owned(),
            snippet_data_directory: root.join(&project.snippet_data_path),
            snippet_template: root.join(&project.templates.snippet),
            tag_template: root.join(&project.templates.tag),
            snippet_path: project.snippet_path,
            snippet_archive_path: project.snippet_archive_path,
            query_limit: project.query_limit,
            id_namespace: project.id_namespace,
        }
    }

    /// The scope marker of the current snippet collection.
    pub fn snippet_scope(&self) -> String {
        format!("./{}", self.snippet_path)
    }

    /// The scope marker of the archived snippet collection.
    pub fn archive_scope(&self) -> String {
        format!("./{}", self.snippet_archive_path)
    }

    pub fn snippet_directory(&self) -> PathBuf {
        self.root_directory.join(&self.snippet_path)
    }

    pub fn archive_directory(&self) -> PathBuf {
        self.root_directory.join(&self.snippet_archive_path)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the project configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when no project file exists in the directory or any of its
    /// ancestors.
    #[error("could not find `{}` in any parent directory", PROJECT_FILE)]
    NotFound,

    /// Returned when the project file can't be opened.
    #[error("opening project file `{}`: {err}", .path.display())]
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML for a project.
    #[error("parsing project file: {0}")]
    DeserializeYaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() -> Result<()> {
        let config = Config::from_yaml_str(Path::new("/site"), "{}")?;
        assert_eq!("./snippets", config.snippet_scope());
        assert_eq!("./snippets_archive", config.archive_scope());
        assert_eq!(PathBuf::from("/site/snippets"), config.snippet_directory());
        assert_eq!(PathBuf::from("/site/snippet_data"), config.snippet_data_directory);
        assert_eq!(
            PathBuf::from("/site/templates/TagPage.js"),
            config.tag_template
        );
        assert_eq!(1000, config.query_limit);
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let config = Config::from_yaml_str(
            Path::new("/site"),
            "snippet_path: current\nquery_limit: 5\ntemplates:\n  tag: t/Tag.html\n",
        )?;
        assert_eq!("./current", config.snippet_scope());
        assert_eq!(5, config.query_limit);
        assert_eq!(PathBuf::from("/site/t/Tag.html"), config.tag_template);
        assert_eq!(
            PathBuf::from("/site/templates/SnippetPage.js"),
            config.snippet_template
        );
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_ancestors() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        std::fs::write(root.path().join(PROJECT_FILE), "snippet_path: current\n")?;
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(root.path(), config.root_directory);
        assert_eq!("current", config.snippet_path);
        Ok(())
    }
}
