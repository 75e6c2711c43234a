//! Parking protocol schema
//!
//! The dynamic pricing protocol describes every document as a tree:
//!
//! ```text
//! location ─┬─ address / contact / auxiliary
//!           ├─ geoLocations ── geoLocation
//!           ├─ occupancies ── occupancy ── parkingSpaces ── parkingSpace
//!           └─ tariffs ── tariff ─┬─ restrictions
//!                                 ├─ rates ── rate
//!                                 ├─ activeSchedules ── activeSchedule
//!                                 ├─ validSchedules ── validSchedule
//!                                 └─ log
//! ```
//!
//! This crate owns the declarative side of that tree:
//! - [`SchemaTable`]: ordered `type -> child tags` entries plus per-tag [`TagKind`]
//! - parent resolution (`tag -> owning type`) and path resolution between types
//! - loading/dumping the table as a JSON [`SchemaConfig`]
//!
//! Documents themselves are built and mutated by `parkproto-document`.

pub mod builtin;
pub mod error;
pub mod kind;
pub mod table;

pub use error::SchemaError;
pub use kind::TagKind;
pub use table::{SchemaConfig, SchemaEntry, SchemaTable};

/// Field every document node carries to name its schema entry.
pub const TYPE_FIELD: &str = "type";

/// Identity field name for nodes of `type_name` (`rate` -> `rateId`).
pub fn identity_tag(type_name: &str) -> String {
    format!("{type_name}Id")
}
