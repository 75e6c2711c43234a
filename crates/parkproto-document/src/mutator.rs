//! Schema-routed insertion into document trees.
//!
//! Two entry points:
//! - [`add_element_to`]: one hop. The field's parent type must be the root
//!   itself or one of the root's direct children; a missing child object is
//!   created on the way.
//! - [`add_element_to_id`]: many hops. Walks the schema path down to a parent
//!   type, then picks the element whose `<type>Id` matches. Nothing is created
//!   on the way.

use parkproto_schema::{identity_tag, SchemaTable};
use serde_json::Value;
use tracing::debug;

use crate::error::{json_kind, DocumentError, Layer};
use crate::writer::add_value;
use crate::{node_type, Node};

/// Adds `tag = value` to `root` or to one of its direct children.
///
/// `expected_parent` names the type owning `tag`; when `None` it is resolved
/// through [`SchemaTable::find_parent`].
pub fn add_element_to(
    schema: &SchemaTable,
    root: &mut Node,
    expected_parent: Option<&str>,
    tag: &str,
    value: Value,
    force: bool,
) -> Result<(), DocumentError> {
    one_hop(schema, root, expected_parent, tag, value, force)
        .map_err(|e| e.rejected_by(Layer::AddElementTo))
}

fn one_hop(
    schema: &SchemaTable,
    root: &mut Node,
    expected_parent: Option<&str>,
    tag: &str,
    value: Value,
    force: bool,
) -> Result<(), DocumentError> {
    let parent_type = match expected_parent {
        Some(parent) => parent.to_string(),
        None => schema
            .find_parent(tag)
            .ok_or_else(|| DocumentError::UnknownField {
                tag: tag.to_string(),
            })?
            .to_string(),
    };
    let root_type = node_type(root)
        .ok_or(DocumentError::UntypedNode)?
        .to_string();

    if parent_type == root_type {
        debug!(root = %root_type, tag, "writing on root");
        return add_value(schema, root, tag, value, force);
    }

    if !schema.is_direct_child(&root_type, &parent_type) {
        return Err(DocumentError::StructuralMismatch {
            root: root_type,
            parent: parent_type,
            tag: tag.to_string(),
        });
    }

    debug!(root = %root_type, parent = %parent_type, tag, "writing on direct child");
    let slot = root
        .entry(parent_type.clone())
        .or_insert_with(|| Value::Object(Node::new()));
    if slot.is_null() {
        *slot = Value::Object(Node::new());
    }
    match slot {
        Value::Object(child) => add_value(schema, child, tag, value, force),
        other => Err(DocumentError::NotAnObject {
            tag: parent_type,
            found: json_kind(other),
        }),
    }
}

/// Adds `tag = value` to the `parent_type` node whose identity is `parent_id`.
///
/// The node is found by walking the schema path from the root's type down to
/// `parent_type`; the last hop may land on the collection holding the
/// candidates. Intermediate nodes must already exist.
pub fn add_element_to_id(
    schema: &SchemaTable,
    root: &mut Node,
    parent_type: &str,
    parent_id: &str,
    tag: &str,
    value: Value,
) -> Result<(), DocumentError> {
    by_id(schema, root, parent_type, parent_id, tag, value)
        .map_err(|e| e.rejected_by(Layer::AddElementToId))
}

enum Cursor<'a> {
    Object(&'a mut Node),
    Array(&'a mut Vec<Value>),
}

fn by_id(
    schema: &SchemaTable,
    root: &mut Node,
    parent_type: &str,
    parent_id: &str,
    tag: &str,
    value: Value,
) -> Result<(), DocumentError> {
    if parent_type.is_empty() || parent_id.is_empty() {
        return Err(DocumentError::MissingArgument {
            what: "parent type or id",
        });
    }
    if tag.is_empty() {
        return Err(DocumentError::MissingArgument { what: "element tag" });
    }

    let root_type = node_type(root)
        .ok_or(DocumentError::UntypedNode)?
        .to_string();
    let path = schema.path(Some(root_type.as_str()), parent_type)?;
    debug!(root = %root_type, path = ?path, "walking to {parent_type} {parent_id}");

    let last = path.len() - 1;
    let mut cursor = Cursor::Object(root);
    for (i, segment) in path.iter().enumerate().skip(1) {
        let missing = || DocumentError::MissingIntermediateNode {
            root: root_type.clone(),
            segment: segment.clone(),
        };
        cursor = match cursor {
            Cursor::Object(node) => match node.get_mut(segment) {
                Some(Value::Object(child)) => Cursor::Object(child),
                Some(Value::Array(items)) => Cursor::Array(items),
                _ => return Err(missing()),
            },
            // The collection holding the candidates stands in for the last hop.
            Cursor::Array(items) if i == last => Cursor::Array(items),
            Cursor::Array(_) => return Err(missing()),
        };
    }

    let id_tag = identity_tag(parent_type);
    let matches_id = |node: &Node| node.get(&id_tag).is_some_and(|v| same_id(v, parent_id));
    let target = match cursor {
        Cursor::Array(items) => items
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|node| matches_id(&**node)),
        Cursor::Object(node) => Some(node).filter(|node| matches_id(&**node)),
    };

    match target {
        Some(node) => add_element_to(schema, node, None, tag, value, false),
        None => Err(DocumentError::IdentityNotFound {
            parent_type: parent_type.to_string(),
            id: parent_id.to_string(),
        }),
    }
}

/// Ids arrive as text from tabular sources; numeric ids compare by their
/// decimal rendering.
fn same_id(value: &Value, id: &str) -> bool {
    match value {
        Value::String(s) => s == id,
        Value::Number(n) => n.to_string() == id,
        _ => false,
    }
}
