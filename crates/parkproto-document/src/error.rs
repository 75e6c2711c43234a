use std::fmt;

use parkproto_schema::SchemaError;
use serde_json::Value;
use thiserror::Error;

/// Mutation layer that passed a failure on to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    AddValue,
    AddElementTo,
    AddElementToId,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layer::AddValue => "add_value",
            Layer::AddElementTo => "add_element_to",
            Layer::AddElementToId => "add_element_to_id",
        })
    }
}

/// Coarse failure category, stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SchemaLookupFailure,
    StructuralMismatch,
    MissingIntermediateNode,
    IdentityProtectionViolation,
    IdentityNotFound,
    InvalidArgument,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no schema entry owns field `{tag}`")]
    UnknownField { tag: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(
        "cannot add `{tag}` to `{root}`: `{parent}` is neither `{root}` nor one of its direct children"
    )]
    StructuralMismatch {
        root: String,
        parent: String,
        tag: String,
    },

    #[error("node has no `type` field")]
    UntypedNode,

    #[error("`{tag}` holds {found}, expected an object")]
    NotAnObject { tag: String, found: &'static str },

    #[error("`{root}` is missing a `{segment}` node")]
    MissingIntermediateNode { root: String, segment: String },

    #[error(
        "identity field `{tag}` is already assigned ({current}); force the overwrite to replace it with {attempted}"
    )]
    IdentityProtected {
        tag: String,
        current: Value,
        attempted: Value,
    },

    #[error("could not find {parent_type} with id {id}")]
    IdentityNotFound { parent_type: String, id: String },

    #[error("missing {what}")]
    MissingArgument { what: &'static str },

    #[error("{layer}: {source}")]
    Rejected {
        layer: Layer,
        #[source]
        source: Box<DocumentError>,
    },
}

impl DocumentError {
    pub(crate) fn rejected_by(self, layer: Layer) -> Self {
        DocumentError::Rejected {
            layer,
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            DocumentError::UnknownField { .. } | DocumentError::Schema(_) => {
                ErrorKind::SchemaLookupFailure
            }
            DocumentError::StructuralMismatch { .. }
            | DocumentError::UntypedNode
            | DocumentError::NotAnObject { .. } => ErrorKind::StructuralMismatch,
            DocumentError::MissingIntermediateNode { .. } => ErrorKind::MissingIntermediateNode,
            DocumentError::IdentityProtected { .. } => ErrorKind::IdentityProtectionViolation,
            DocumentError::IdentityNotFound { .. } => ErrorKind::IdentityNotFound,
            DocumentError::MissingArgument { .. } => ErrorKind::InvalidArgument,
            // root_cause never stops on a wrapper
            DocumentError::Rejected { source, .. } => source.kind(),
        }
    }

    /// Innermost failure, with all layer wrappers removed.
    pub fn root_cause(&self) -> &DocumentError {
        let mut current = self;
        while let DocumentError::Rejected { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// Layers the failure passed through, innermost first.
    pub fn failure_path(&self) -> Vec<Layer> {
        let mut layers = Vec::new();
        let mut current = self;
        while let DocumentError::Rejected { layer, source } = current {
            layers.push(*layer);
            current = source.as_ref();
        }
        layers.reverse();
        layers
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
