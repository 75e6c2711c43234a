//! Field-by-field document population.
//!
//! A rejected field never aborts the document: it is logged, collected and the
//! loop moves on to the next field.

use parkproto_document::{add_element_to, DocumentError, Node};
use parkproto_schema::SchemaTable;
use serde_json::Value;
use tracing::{debug, warn};

use crate::coerce::coerce;
use crate::field_map::FieldMap;
use crate::rows::Row;

#[derive(Debug)]
pub struct RejectedField {
    pub tag: String,
    pub error: DocumentError,
}

/// Routes each `(tag, value)` into `root` with one-hop insertion.
pub fn populate<I, T>(schema: &SchemaTable, root: &mut Node, fields: I) -> Vec<RejectedField>
where
    I: IntoIterator<Item = (T, Value)>,
    T: AsRef<str>,
{
    let mut rejected = Vec::new();
    for (tag, value) in fields {
        let tag = tag.as_ref();
        match add_element_to(schema, root, None, tag, value, false) {
            Ok(()) => debug!(tag, "field applied"),
            Err(error) => {
                warn!(tag, %error, "skipping field");
                rejected.push(RejectedField {
                    tag: tag.to_string(),
                    error,
                });
            }
        }
    }
    rejected
}

/// Renames, coerces and populates one CSV row.
pub fn populate_row(
    schema: &SchemaTable,
    root: &mut Node,
    map: &FieldMap,
    row: &Row,
) -> Vec<RejectedField> {
    let fields = map
        .apply(row)
        .map(|(tag, cell)| (tag, coerce(schema, tag, cell)));
    populate(schema, root, fields)
}
