//! Skeleton nodes.
//!
//! Skeletons carry sentinel values (`-1`, `0`, empty lists) for the fields a
//! consumer of the protocol expects to find, so a partially populated document
//! still has the right shape. Every call builds a fresh node.

use chrono::{Local, TimeZone};
use parkproto_schema::{identity_tag, TYPE_FIELD};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::audit::{format_timestamp, now_timestamp, AuditLog};
use crate::day::Day;
use crate::Node;

/// Minute-of-day bounds of a full day.
pub const DAY_START: u32 = 0;
pub const DAY_END: u32 = 1440;

/// Fresh random identity.
pub fn unique_id() -> String {
    Uuid::new_v4().to_string()
}

fn typed(type_name: &str) -> Node {
    let mut node = Node::new();
    node.insert(TYPE_FIELD.into(), Value::String(type_name.to_string()));
    node
}

fn every_day() -> Value {
    Value::Array(
        Day::ALL
            .iter()
            .map(|d| Value::String(d.as_str().to_string()))
            .collect(),
    )
}

/// Node of `type_name` with that type's mandatory sentinel fields.
///
/// Types without mandatory fields get only `type` (and `<type>Id` when `id`
/// is given).
pub fn create_object_base(type_name: &str, id: Option<&str>) -> Node {
    let mut node = typed(type_name);
    if let Some(id) = id {
        node.insert(identity_tag(type_name), Value::String(id.to_string()));
    }

    let defaults: Vec<(&str, Value)> = match type_name {
        "rate" => vec![
            ("order", json!(-1)),
            ("value", json!(0)),
            ("interval", json!(1)),
            ("intervals", json!(1)),
            ("unit", json!("MIN")),
            ("repeat", json!(false)),
            ("max", json!(false)),
        ],
        "restrictions" => vec![("tariffType", json!("")), ("targetGroup", json!([]))],
        "activeSchedule" => vec![
            ("startTime", json!(0)),
            ("endTime", json!(0)),
            ("days", json!([])),
        ],
        "validSchedule" => vec![
            ("validFrom", json!(-1)),
            ("validTo", json!(-1)),
            ("validTimeFrom", json!(-1)),
            ("validTimeTo", json!(-1)),
            ("validDays", json!([])),
        ],
        _ => Vec::new(),
    };
    for (tag, value) in defaults {
        node.insert(tag.to_string(), value);
    }
    node
}

/// Tariff root: empty restrictions and collections plus an audit log.
pub fn create_tariff_base(id: Option<&str>, location_id: &str) -> Node {
    let mut tariff = typed("tariff");
    tariff.insert(
        "tariffId".into(),
        Value::String(id.map_or_else(unique_id, str::to_string)),
    );
    tariff.insert("locationId".into(), Value::String(location_id.to_string()));
    tariff.insert("restrictions".into(), Value::Object(Node::new()));
    tariff.insert("rates".into(), json!([]));
    tariff.insert("activeSchedules".into(), json!([]));
    tariff.insert("validSchedules".into(), json!([]));
    tariff.insert("log".into(), Value::Object(AuditLog::auto().into_node()));
    tariff
}

pub fn create_location_base(id: Option<&str>, name: Option<&str>, area_number: Option<&str>) -> Node {
    let mut location = typed("location");
    location.insert(
        "locationId".into(),
        Value::String(id.map_or_else(unique_id, str::to_string)),
    );
    location.insert("name".into(), Value::String(name.unwrap_or("unnamed").to_string()));
    if let Some(area_number) = area_number {
        location.insert("areaNumber".into(), Value::String(area_number.to_string()));
    }
    location.insert("address".into(), Value::Object(Node::new()));
    location.insert("contact".into(), Value::Object(Node::new()));
    location.insert("auxiliary".into(), Value::Object(Node::new()));
    location.insert("log".into(), Value::Object(AuditLog::auto().into_node()));
    location
}

pub fn create_occupancy_base(location_id: &str) -> Node {
    let mut occupancy = typed("occupancy");
    occupancy.insert("locationId".into(), Value::String(location_id.to_string()));
    occupancy.insert("areaName".into(), json!(""));
    occupancy.insert("supply".into(), json!(0));
    occupancy.insert("occupied".into(), json!(0));
    occupancy.insert("log".into(), Value::Object(AuditLog::auto().into_node()));
    occupancy
}

/// Always-valid stand-in for schedule nodes without source data.
///
/// `activeSchedule`: every day, 00:00-24:00. `validSchedule`: from now until
/// the end of 2099, every day. Other types yield an empty node; checking that
/// a type is schedule-shaped is the caller's job.
pub fn get_default(type_name: &str) -> Node {
    let mut node = Node::new();
    match type_name {
        "activeSchedule" => {
            node.insert("activeScheduleId".into(), json!(0));
            node.insert("startTime".into(), json!(DAY_START));
            node.insert("endTime".into(), json!(DAY_END));
            node.insert("days".into(), every_day());
        }
        "validSchedule" => {
            node.insert("validScheduleId".into(), json!(0));
            node.insert("validFrom".into(), Value::String(now_timestamp()));
            node.insert("validTo".into(), Value::String(far_future()));
            node.insert("validTimeFrom".into(), json!(DAY_START));
            node.insert("validTimeTo".into(), json!(DAY_END));
            node.insert("validDays".into(), every_day());
        }
        _ => {}
    }
    node
}

/// 2099-12-31T23:59:59 in local time.
fn far_future() -> String {
    Local
        .with_ymd_and_hms(2099, 12, 31, 23, 59, 59)
        .earliest()
        .map(|at| format_timestamp(&at))
        .unwrap_or_else(|| "2099-12-31T23:59:59+00:00".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(node: &Node) -> Vec<&str> {
        node.keys().map(String::as_str).collect()
    }

    #[test]
    fn rate_skeleton_has_sentinels() {
        let rate = create_object_base("rate", None);
        assert_eq!(
            keys(&rate),
            ["type", "order", "value", "interval", "intervals", "unit", "repeat", "max"]
        );
        assert_eq!(rate["type"], "rate");
        assert_eq!(rate["order"], -1);
        assert_eq!(rate["value"], 0);
        assert_eq!(rate["unit"], "MIN");
        assert_eq!(rate["repeat"], false);
    }

    #[test]
    fn restrictions_skeleton_has_sentinels() {
        let restrictions = create_object_base("restrictions", None);
        assert_eq!(keys(&restrictions), ["type", "tariffType", "targetGroup"]);
        assert_eq!(
            Value::Object(restrictions),
            json!({"type": "restrictions", "tariffType": "", "targetGroup": []})
        );
    }

    #[test]
    fn active_schedule_skeleton_has_sentinels() {
        let schedule = create_object_base("activeSchedule", None);
        assert_eq!(keys(&schedule), ["type", "startTime", "endTime", "days"]);
        assert_eq!(
            Value::Object(schedule),
            json!({"type": "activeSchedule", "startTime": 0, "endTime": 0, "days": []})
        );
    }

    #[test]
    fn valid_schedule_skeleton_has_sentinels() {
        let schedule = create_object_base("validSchedule", None);
        assert_eq!(
            keys(&schedule),
            ["type", "validFrom", "validTo", "validTimeFrom", "validTimeTo", "validDays"]
        );
        assert_eq!(
            Value::Object(schedule),
            json!({
                "type": "validSchedule",
                "validFrom": -1,
                "validTo": -1,
                "validTimeFrom": -1,
                "validTimeTo": -1,
                "validDays": []
            })
        );
    }

    #[test]
    fn rate_skeleton_values_are_exact() {
        assert_eq!(
            Value::Object(create_object_base("rate", None)),
            json!({
                "type": "rate",
                "order": -1,
                "value": 0,
                "interval": 1,
                "intervals": 1,
                "unit": "MIN",
                "repeat": false,
                "max": false
            })
        );
    }

    #[test]
    fn id_lands_on_type_id_field() {
        let rate = create_object_base("rate", Some("r-1"));
        assert_eq!(rate["rateId"], "r-1");
        let schedule = create_object_base("activeSchedule", Some("a-1"));
        assert_eq!(schedule["activeScheduleId"], "a-1");
    }

    #[test]
    fn unknown_type_only_carries_type() {
        let node = create_object_base("surcharges", None);
        assert_eq!(keys(&node), ["type"]);
    }

    #[test]
    fn tariff_gets_generated_id_and_log() {
        let a = create_tariff_base(None, "loc-1");
        let b = create_tariff_base(None, "loc-1");
        assert_ne!(a["tariffId"], b["tariffId"]);
        assert!(Uuid::parse_str(a["tariffId"].as_str().unwrap()).is_ok());
        assert_eq!(a["locationId"], "loc-1");
        assert_eq!(a["rates"], json!([]));
        assert_eq!(a["restrictions"], json!({}));
        assert_eq!(a["log"]["author"], "auto");
        assert_eq!(a["log"]["created"], a["log"]["updated"]);

        let given = create_tariff_base(Some("t-9"), "loc-1");
        assert_eq!(given["tariffId"], "t-9");
    }

    #[test]
    fn location_defaults_name_and_skips_missing_area_number() {
        let location = create_location_base(Some("l-1"), None, None);
        assert_eq!(location["name"], "unnamed");
        assert!(!location.contains_key("areaNumber"));
        assert_eq!(location["address"], json!({}));

        let numbered = create_location_base(None, Some("Centrum"), Some("1234"));
        assert_eq!(numbered["areaNumber"], "1234");
        assert_eq!(numbered["name"], "Centrum");
    }

    #[test]
    fn occupancy_skeleton() {
        let occupancy = create_occupancy_base("l-1");
        assert_eq!(occupancy["type"], "occupancy");
        assert_eq!(occupancy["supply"], 0);
        assert_eq!(occupancy["areaName"], "");
        assert!(occupancy["log"].is_object());
    }

    #[test]
    fn default_schedules_cover_everything() {
        let active = get_default("activeSchedule");
        assert_eq!(active["startTime"], 0);
        assert_eq!(active["endTime"], 1440);
        assert_eq!(active["days"].as_array().unwrap().len(), 9);
        assert_eq!(active["days"][7], "DAY_BEFORE_RED_DAY");

        let valid = get_default("validSchedule");
        assert!(valid["validTo"].as_str().unwrap().starts_with("2099-12-31T23:59:59"));
        assert_eq!(valid["validDays"], active["days"]);

        assert!(get_default("rate").is_empty());
    }

    #[test]
    fn defaults_are_not_shared() {
        let mut first = get_default("activeSchedule");
        first.insert("endTime".into(), json!(600));
        let second = get_default("activeSchedule");
        assert_eq!(second["endTime"], 1440);
    }
}
