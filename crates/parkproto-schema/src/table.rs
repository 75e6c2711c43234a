//! Schema table and resolvers.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::builtin;
use crate::error::SchemaError;
use crate::identity_tag;
use crate::kind::TagKind;

/// Placeholder used in errors when a path is resolved from the top of the tree.
const ROOT: &str = "root";

/// Declarative form of a [`SchemaTable`], as stored in a JSON config file.
///
/// `entries` is a list of `[type, [tags...]]` pairs rather than a map because
/// entry order decides which parent wins when a tag is listed twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub entries: Vec<(String, Vec<String>)>,
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default)]
    pub booleans: Vec<String>,
    #[serde(default)]
    pub timestamps: Vec<String>,
}

impl SchemaConfig {
    pub fn builtin() -> Self {
        let owned = |tags: &[&str]| tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        Self {
            entries: builtin::ENTRIES
                .iter()
                .map(|(name, children)| (name.to_string(), owned(children)))
                .collect(),
            collections: owned(builtin::COLLECTIONS),
            booleans: owned(builtin::BOOLEANS),
            timestamps: owned(builtin::TIMESTAMPS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub type_name: String,
    pub children: Vec<String>,
}

/// Immutable `type -> ordered child tags` table with per-tag kinds.
///
/// Built once and shared by reference; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct SchemaTable {
    entries: Vec<SchemaEntry>,
    index: HashMap<String, usize>,
    kinds: HashMap<String, TagKind>,
}

impl SchemaTable {
    /// The compiled-in parking protocol table.
    pub fn builtin() -> &'static SchemaTable {
        static BUILTIN: OnceLock<SchemaTable> = OnceLock::new();
        BUILTIN.get_or_init(|| SchemaTable::assemble(SchemaConfig::builtin()))
    }

    pub fn from_config(config: SchemaConfig) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for (index, (name, _)) in config.entries.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::EmptyTypeName { index });
            }
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateType {
                    type_name: name.clone(),
                });
            }
        }
        Ok(Self::assemble(config))
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let config: SchemaConfig = serde_json::from_str(text)?;
        Self::from_config(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    fn assemble(config: SchemaConfig) -> Self {
        let entries: Vec<SchemaEntry> = config
            .entries
            .into_iter()
            .map(|(type_name, children)| SchemaEntry {
                type_name,
                children,
            })
            .collect();

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.type_name.clone(), i))
            .collect();

        // Lowest precedence first, so later inserts win:
        // Scalar < Boolean < Timestamp < Identity < List.
        let mut kinds: HashMap<String, TagKind> = HashMap::new();
        for entry in &entries {
            for child in &entry.children {
                kinds.entry(child.clone()).or_insert(TagKind::Scalar);
            }
        }
        for tag in &config.booleans {
            kinds.insert(tag.clone(), TagKind::Boolean);
        }
        for tag in &config.timestamps {
            kinds.insert(tag.clone(), TagKind::Timestamp);
        }
        for entry in &entries {
            kinds.insert(identity_tag(&entry.type_name), TagKind::Identity);
            for child in entry.children.iter().filter(|c| c.contains("Id")) {
                kinds.insert(child.clone(), TagKind::Identity);
            }
        }
        for tag in &config.collections {
            kinds.insert(tag.clone(), TagKind::List);
        }

        Self {
            entries,
            index,
            kinds,
        }
    }

    pub fn to_config(&self) -> SchemaConfig {
        let mut config = SchemaConfig {
            entries: self
                .entries
                .iter()
                .map(|e| (e.type_name.clone(), e.children.clone()))
                .collect(),
            ..SchemaConfig::default()
        };
        for (tag, kind) in &self.kinds {
            match kind {
                TagKind::List => config.collections.push(tag.clone()),
                TagKind::Boolean => config.booleans.push(tag.clone()),
                TagKind::Timestamp => config.timestamps.push(tag.clone()),
                TagKind::Scalar | TagKind::Identity => {}
            }
        }
        config.collections.sort();
        config.booleans.sort();
        config.timestamps.sort();
        config
    }

    pub fn entries(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.iter()
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.index.contains_key(type_name)
    }

    pub fn children(&self, type_name: &str) -> Option<&[String]> {
        self.index
            .get(type_name)
            .map(|&i| self.entries[i].children.as_slice())
    }

    /// `true` if `child` is listed directly under `parent`.
    pub fn is_direct_child(&self, parent: &str, child: &str) -> bool {
        self.children(parent)
            .is_some_and(|children| children.iter().any(|c| c == child))
    }

    /// Kind of `tag`. Tags the table does not know are plain scalars, except
    /// names containing `Id`, which are identities wherever they appear.
    pub fn kind(&self, tag: &str) -> TagKind {
        match self.kinds.get(tag) {
            Some(&kind) => kind,
            None if tag.contains("Id") => TagKind::Identity,
            None => TagKind::Scalar,
        }
    }

    /// Type owning `tag`.
    ///
    /// A table key named `tag + "s"` wins (collection wrappers: `rate` ->
    /// `rates`); otherwise the first entry in table order listing `tag`.
    pub fn find_parent(&self, tag: &str) -> Option<&str> {
        if let Some(&i) = self.index.get(&format!("{tag}s")) {
            return Some(self.entries[i].type_name.as_str());
        }
        self.entries
            .iter()
            .find(|entry| entry.children.iter().any(|c| c == tag))
            .map(|entry| entry.type_name.as_str())
    }

    pub fn require_parent(&self, tag: &str) -> Result<&str, SchemaError> {
        self.find_parent(tag).ok_or_else(|| SchemaError::UnknownTag {
            tag: tag.to_string(),
        })
    }

    /// Chain of types from `from` down to `to`, both ends included.
    ///
    /// With `from = None` the chain starts at the first ancestor of `to` that
    /// has no parent; reaching the top of the tree without an anchor is a
    /// result, not a [`SchemaError::NoPath`]. The upward walk is bounded by the
    /// table size, so a cyclic table fails with [`SchemaError::NoPath`] instead
    /// of spinning.
    pub fn path(&self, from: Option<&str>, to: &str) -> Result<Vec<String>, SchemaError> {
        if from == Some(to) {
            return Ok(vec![to.to_string()]);
        }

        let no_path = |stuck: &str| SchemaError::NoPath {
            from: from.unwrap_or(ROOT).to_string(),
            to: to.to_string(),
            stuck: stuck.to_string(),
        };

        let mut path = vec![to.to_string()];
        let mut current = to;
        for _ in 0..=self.entries.len() {
            match self.find_parent(current) {
                Some(parent) => {
                    path.push(parent.to_string());
                    if from == Some(parent) {
                        path.reverse();
                        return Ok(path);
                    }
                    current = parent;
                }
                None if from.is_none() => {
                    path.reverse();
                    return Ok(path);
                }
                None => return Err(no_path(current)),
            }
        }
        Err(no_path(current))
    }
}
