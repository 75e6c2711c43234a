use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no schema entry owns `{tag}`")]
    UnknownTag { tag: String },

    #[error("could not find path from {from} to {to}: {stuck} has no parent")]
    NoPath {
        from: String,
        to: String,
        stuck: String,
    },

    #[error("schema type `{type_name}` is declared more than once")]
    DuplicateType { type_name: String },

    #[error("schema entry #{index} has an empty type name")]
    EmptyTypeName { index: usize },

    #[error("invalid schema config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read schema config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
