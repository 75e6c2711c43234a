//! Per-tag metadata.
//!
//! Every tag gets exactly one kind when the table is built, so writers never
//! have to guess from the spelling of a field name.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    /// Plain value, overwritten on every write.
    Scalar,
    /// Always stored as an ordered, duplicate-free sequence.
    List,
    /// Write-once identity (`tariffId`, `rateId`, ...).
    Identity,
    /// Date/time value rendered with an explicit UTC offset.
    Timestamp,
    /// `true` / `false` flag.
    Boolean,
}
