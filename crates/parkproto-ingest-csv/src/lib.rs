//! Delimited-text ingestion for parking protocol documents
//!
//! Turns CSV exports into populated documents:
//! - [`rows`]: header-keyed rows (`;` or `,` separated, quote aware)
//! - [`field_map`]: source column -> schema tag renaming
//! - [`coerce`]: raw cell text -> typed JSON value by tag kind
//! - [`populate`]: log-and-continue field loop over a document
//! - [`span_rates`]: tariffs from interval/value span tables

pub mod coerce;
pub mod field_map;
pub mod populate;
pub mod rows;
pub mod span_rates;

pub use coerce::coerce;
pub use field_map::FieldMap;
pub use populate::{populate, populate_row, RejectedField};
pub use rows::{parse_rows, read_rows, Row};
pub use span_rates::{convert_span_rates, SpanColumns};
