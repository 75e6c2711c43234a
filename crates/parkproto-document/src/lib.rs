//! Parking protocol documents
//!
//! Builds and populates JSON documents shaped by a [`SchemaTable`]:
//!
//! ```text
//!   factory ──► skeleton node ──► mutator ──► writer ──► populated node
//!                                   │
//!                                   └── SchemaTable (parent / path lookup)
//! ```
//!
//! - [`factory`]: skeletons with sentinel defaults, aggregate roots
//!   (tariff/location/occupancy) and always-valid default schedules
//! - [`writer`]: applies one value to one node (list / identity / scalar rules)
//! - [`mutator`]: one-hop insertion by field tag, multi-hop insertion by id
//!
//! Every mutating call returns a [`DocumentError`] on failure; nothing panics
//! and nothing is retried. Whether a failed field aborts the document is up to
//! the caller.

pub mod audit;
pub mod day;
pub mod error;
pub mod factory;
pub mod mutator;
pub mod writer;


pub use audit::{format_timestamp, now_timestamp, AuditLog};
pub use day::Day;
pub use error::{DocumentError, ErrorKind, Layer};
pub use factory::{
    create_location_base, create_object_base, create_occupancy_base, create_tariff_base,
    get_default, unique_id,
};
pub use mutator::{add_element_to, add_element_to_id};
pub use parkproto_schema::SchemaTable;
pub use writer::add_value;

use parkproto_schema::TYPE_FIELD;
use serde_json::{Map, Value};

/// A document node: an insertion-ordered JSON object.
pub type Node = Map<String, Value>;

/// Schema type recorded on `node`, if any.
pub fn node_type(node: &Node) -> Option<&str> {
    node.get(TYPE_FIELD).and_then(Value::as_str)
}
