//! Declares the schema of synthesized `Snippet` nodes ahead of time so that
//! the host doesn't infer it from whatever nodes happen to exist.

use crate::host::Actions;
use crate::snippet::SNIPPET_TYPE;
use std::fmt;

/// The type of a schema field. Every field type is nullable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    List(Box<FieldType>),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "String"),
            FieldType::List(item) => write!(f, "[{}]", item),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
}

/// A node type declaration. Renders as SDL, e.g.
///
/// ```text
/// type Snippet implements Node @dontInfer {
///   title: String
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub interfaces: Vec<String>,

    /// Whether the host may extend the type with fields inferred from node
    /// data.
    pub infer: bool,

    pub fields: Vec<FieldDefinition>,
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "type {}", self.name)?;
        if !self.interfaces.is_empty() {
            write!(f, " implements {}", self.interfaces.join(" & "))?;
        }
        if !self.infer {
            write!(f, " @dontInfer")?;
        }
        writeln!(f, " {{")?;
        for field in &self.fields {
            writeln!(f, "  {}: {}", field.name, field.field_type)?;
        }
        write!(f, "}}")
    }
}

/// The declaration of the `Snippet` node type.
pub fn snippet_type() -> TypeDefinition {
    let field = |name: &str, field_type| FieldDefinition {
        name: name.to_owned(),
        field_type,
    };
    TypeDefinition {
        name: SNIPPET_TYPE.to_owned(),
        interfaces: vec!["Node".to_owned()],
        infer: false,
        fields: vec![
            field("title", FieldType::String),
            field("html", FieldType::String),
            field("tags", FieldType::List(Box::new(FieldType::String))),
            field("id", FieldType::String),
        ],
    }
}

/// Declares the node types this crate creates.
pub fn create_schema_customization(actions: &mut dyn Actions) {
    actions.create_types(snippet_type());
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::host::{Action, ActionLog};

    #[test]
    fn test_snippet_type_sdl() {
        assert_eq!(
            "type Snippet implements Node @dontInfer {\n  title: String\n  html: String\n  tags: [String]\n  id: String\n}",
            snippet_type().to_string()
        );
    }

    #[test]
    fn test_create_schema_customization() {
        let mut log = ActionLog::default();
        create_schema_customization(&mut log);
        assert_eq!(&[Action::CreateTypes(snippet_type())], log.actions());
    }
}
