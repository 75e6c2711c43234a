//! Audit (`log`) sub-documents.
//!
//! Timestamps always carry an explicit `±HH:MM` offset taken from the clock's
//! time zone at format time, e.g. `2018-03-13T14:05:09+01:00`, never a bare `Z`.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Node;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Author and user recorded on machine-generated documents.
pub const AUTO_AUTHOR: &str = "auto";

pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    format_timestamp(&Local::now())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    pub updated: String,
    pub user: String,
    pub created: String,
    pub author: String,
}

impl AuditLog {
    pub fn new<Tz>(updated: &DateTime<Tz>, user: &str, created: &DateTime<Tz>, author: &str) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            updated: format_timestamp(updated),
            user: user.to_string(),
            created: format_timestamp(created),
            author: author.to_string(),
        }
    }

    /// Created and updated now by [`AUTO_AUTHOR`].
    pub fn auto() -> Self {
        let now = Local::now();
        Self::new(&now, AUTO_AUTHOR, &now, AUTO_AUTHOR)
    }

    pub fn into_node(self) -> Node {
        let mut node = Node::new();
        node.insert("updated".into(), Value::String(self.updated));
        node.insert("user".into(), Value::String(self.user));
        node.insert("created".into(), Value::String(self.created));
        node.insert("author".into(), Value::String(self.author));
        node
    }
}
