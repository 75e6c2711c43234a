//! Source column -> schema tag lookup tables.
//!
//! Each source format names its columns differently (`starttime_element`,
//! `intervall_von`, ...). A field map renames them to protocol tags before
//! the values are routed into a document.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};

use crate::rows::Row;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    pairs: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new<I, C, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
        T: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(c, t)| (c.into(), t.into()))
                .collect(),
        }
    }

    /// Reads a JSON object of `"source column": "tag"` entries.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let object: Map<String, Value> =
            serde_json::from_str(text).context("field map must be a JSON object")?;
        let pairs = object
            .into_iter()
            .map(|(column, tag)| match tag {
                Value::String(tag) => Ok((column, tag)),
                other => Err(anyhow!("field map entry `{column}` must be a string, got {other}")),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pairs })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read field map {}", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn tag_for(&self, column: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, t)| t.as_str())
    }

    /// `(tag, cell)` for every mapped, non-empty cell of `row`, in row order.
    pub fn apply<'r>(&'r self, row: &'r Row) -> impl Iterator<Item = (&'r str, &'r str)> + 'r {
        row.iter().filter_map(move |(column, cell)| {
            let tag = self.tag_for(column)?;
            (!cell.trim().is_empty()).then_some((tag, cell))
        })
    }
}
