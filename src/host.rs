//! The seam between the build hooks and whatever hosts them. Hooks read the
//! content graph through [`ContentGraph`] and never mutate it directly;
//! every side effect is an [`Action`] dispatched to an [`Actions`] sink, and
//! the host decides when and how to apply it (see
//! [`crate::graph::SiteGraph::apply`]).

use crate::config::Config;
use crate::digest::NodeIdFactory;
use crate::node::{ContentNode, NodeId, SnippetDataCollection, SnippetNode, Slug};
use crate::pages::PageRequest;
use crate::schema::TypeDefinition;

/// Read access to the content graph.
pub trait ContentGraph {
    /// Returns up to `limit` markdown nodes sorted ascending by frontmatter
    /// title.
    fn query_markdown(&self, limit: usize) -> Result<Vec<ContentNode>, QueryError>;

    /// Returns every markdown node in creation order.
    fn markdown_nodes(&self) -> Vec<&ContentNode>;

    /// Returns every snippet metadata collection in creation order.
    fn snippet_data(&self) -> Vec<&SnippetDataCollection>;
}

/// A field derived by a hook and attached to an existing node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeField {
    Slug(Slug),
}

impl NodeField {
    pub fn name(&self) -> &'static str {
        match self {
            NodeField::Slug(_) => "slug",
        }
    }
}

/// A side effect requested by a hook.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    CreateNodeField { node: NodeId, field: NodeField },
    CreatePage(PageRequest),
    CreateNode(SnippetNode),
    CreateTypes(TypeDefinition),
}

/// A sink for [`Action`]s. Only [`Actions::dispatch`] is required; the other
/// methods are conveniences.
pub trait Actions {
    fn dispatch(&mut self, action: Action);

    fn create_node_field(&mut self, node: &NodeId, field: NodeField) {
        self.dispatch(Action::CreateNodeField {
            node: node.clone(),
            field,
        })
    }

    fn create_page(&mut self, page: PageRequest) {
        self.dispatch(Action::CreatePage(page))
    }

    fn create_node(&mut self, node: SnippetNode) {
        self.dispatch(Action::CreateNode(node))
    }

    fn create_types(&mut self, definition: TypeDefinition) {
        self.dispatch(Action::CreateTypes(definition))
    }
}

/// Records dispatched actions in order.
#[derive(Debug, Default)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Removes and returns every recorded action.
    pub fn take(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    /// The page requests recorded so far.
    pub fn pages(&self) -> impl Iterator<Item = &PageRequest> {
        self.actions.iter().filter_map(|action| match action {
            Action::CreatePage(page) => Some(page),
            _ => None,
        })
    }

    /// The node creation requests recorded so far.
    pub fn nodes(&self) -> impl Iterator<Item = &SnippetNode> {
        self.actions.iter().filter_map(|action| match action {
            Action::CreateNode(node) => Some(node),
            _ => None,
        })
    }
}

impl Actions for ActionLog {
    fn dispatch(&mut self, action: Action) {
        self.actions.push(action)
    }
}

/// Everything a build hook may touch.
pub struct HookContext<'a> {
    pub graph: &'a dyn ContentGraph,
    pub actions: &'a mut dyn Actions,
    pub ids: &'a NodeIdFactory,
    pub config: &'a Config,
}

/// Returned by [`ContentGraph::query_markdown`] when the query can't be
/// answered.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("content query failed: {}", .errors.join("; "))]
pub struct QueryError {
    pub errors: Vec<String>,
}

impl QueryError {
    pub fn new(error: impl Into<String>) -> QueryError {
        QueryError {
            errors: vec![error.into()],
        }
    }
}
