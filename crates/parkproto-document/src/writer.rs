//! Single-value writes onto one node.

use parkproto_schema::{SchemaTable, TagKind};
use serde_json::Value;

use crate::error::{DocumentError, Layer};
use crate::Node;

/// `true` once an identity holds a real value.
///
/// Absent, `null`, `-1`, `"-1"`, `0` and `""` all count as "not assigned yet".
pub fn is_assigned(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Number(n) => !matches!(n.as_i64(), Some(-1) | Some(0)),
        Value::String(s) => !(s.is_empty() || s == "-1"),
        _ => true,
    }
}

/// Applies `value` to `parent[tag]` according to the tag's kind.
///
/// - list tags: appended unless an equal element is already present;
///   with `force` the whole list is replaced
/// - identity tags: written once; a different value needs `force`
/// - everything else: overwritten
pub fn add_value(
    schema: &SchemaTable,
    parent: &mut Node,
    tag: &str,
    value: Value,
    force: bool,
) -> Result<(), DocumentError> {
    write(schema.kind(tag), parent, tag, value, force).map_err(|e| e.rejected_by(Layer::AddValue))
}

fn write(
    kind: TagKind,
    parent: &mut Node,
    tag: &str,
    value: Value,
    force: bool,
) -> Result<(), DocumentError> {
    match kind {
        TagKind::List if force => {
            let list = match value {
                Value::Array(_) => value,
                single => Value::Array(vec![single]),
            };
            parent.insert(tag.to_string(), list);
        }
        TagKind::List => match parent.get_mut(tag) {
            Some(Value::Array(items)) => {
                if !items.contains(&value) {
                    items.push(value);
                }
            }
            _ => {
                parent.insert(tag.to_string(), Value::Array(vec![value]));
            }
        },
        TagKind::Identity if !force => {
            if let Some(current) = parent.get(tag).filter(|v| is_assigned(v)) {
                if *current == value {
                    return Ok(());
                }
                return Err(DocumentError::IdentityProtected {
                    tag: tag.to_string(),
                    current: current.clone(),
                    attempted: value,
                });
            }
            parent.insert(tag.to_string(), value);
        }
        _ => {
            parent.insert(tag.to_string(), value);
        }
    }
    Ok(())
}
