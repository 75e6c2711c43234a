//! Integration tests for the complete parkproto pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Schema table → factory skeletons → one-hop / multi-hop insertion
//! - CSV rows → field map → coerced document fields
//! - Span table on disk → tariff documents → JSON file
//!
//! Run with: cargo test --test integration_tests

use std::fs;

use parkproto_document::{
    add_element_to, add_element_to_id, create_location_base, create_object_base,
    create_tariff_base, get_default, ErrorKind, Layer, Node,
};
use parkproto_ingest_csv::{convert_span_rates, parse_rows, populate_row, read_rows, FieldMap};
use parkproto_schema::SchemaTable;
use serde_json::{json, Value};
use tempfile::tempdir;

fn schema() -> &'static SchemaTable {
    SchemaTable::builtin()
}

fn rate_with_value(id: &str, value: i64) -> Node {
    let mut rate = create_object_base("rate", Some(id));
    add_element_to(schema(), &mut rate, None, "value", json!(value), false).unwrap();
    rate
}

// ============================================================================
// Tariff assembly
// ============================================================================

#[test]
fn test_rate_attached_under_rates() {
    let mut tariff = create_tariff_base(None, "loc-1");
    let rate = rate_with_value("r-1", 10);

    add_element_to(schema(), &mut tariff, None, "rates", Value::Object(rate), false).unwrap();

    let rates = tariff["rates"].as_array().unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0]["value"], 10);
    assert_eq!(rates[0]["type"], "rate");
}

#[test]
fn test_days_are_deduplicated() {
    let mut schedule = create_object_base("activeSchedule", None);
    add_element_to(schema(), &mut schedule, None, "days", json!("MONDAY"), false).unwrap();
    add_element_to(schema(), &mut schedule, None, "days", json!("MONDAY"), false).unwrap();
    assert_eq!(schedule["days"], json!(["MONDAY"]));
}

#[test]
fn test_update_rate_by_id() {
    let mut tariff = create_tariff_base(Some("t-1"), "loc-1");
    for (id, value) in [("r-1", 10), ("r-2", 20)] {
        let rate = rate_with_value(id, value);
        add_element_to(schema(), &mut tariff, None, "rates", Value::Object(rate), false).unwrap();
    }

    add_element_to_id(schema(), &mut tariff, "rate", "r-2", "value", json!(99)).unwrap();
    assert_eq!(tariff["rates"][0]["value"], 10);
    assert_eq!(tariff["rates"][1]["value"], 99);

    let err = add_element_to_id(schema(), &mut tariff, "rate", "r-9", "value", json!(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentityNotFound);
    assert_eq!(err.failure_path(), [Layer::AddElementToId]);
    assert_eq!(tariff["rates"][1]["value"], 99);
}

#[test]
fn test_default_schedules_attach_once() {
    let mut tariff = create_tariff_base(Some("t-1"), "loc-1");
    for _ in 0..2 {
        add_element_to(
            schema(),
            &mut tariff,
            None,
            "activeSchedules",
            Value::Object(get_default("activeSchedule")),
            false,
        )
        .unwrap();
    }
    let active = tariff["activeSchedules"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["endTime"], 1440);
}

#[test]
fn test_tariff_identity_is_protected() {
    let mut tariff = create_tariff_base(Some("abc"), "loc-1");
    let err = add_element_to(schema(), &mut tariff, None, "tariffId", json!("xyz"), false)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentityProtectionViolation);
    assert_eq!(err.failure_path(), [Layer::AddValue, Layer::AddElementTo]);
    assert_eq!(tariff["tariffId"], "abc");

    add_element_to(schema(), &mut tariff, None, "tariffId", json!("xyz"), true).unwrap();
    assert_eq!(tariff["tariffId"], "xyz");
}

// ============================================================================
// CSV ingestion
// ============================================================================

#[test]
fn test_location_rows_populate_documents() {
    let text = "id;name;street;city;lat;lon;public\n\
L1;Centrum;Sveavägen;Stockholm;59.33;18.06;true\n\
L2;Hamnen;Kajen;Göteborg;57.70;11.97;no\n";
    let map = FieldMap::new([
        ("street", "street"),
        ("city", "city"),
        ("public", "public"),
        ("lat", "latitude"),
    ]);

    let rows = parse_rows(text, None).unwrap();
    let locations: Vec<Node> = rows
        .iter()
        .map(|row| {
            let mut location =
                create_location_base(row.get("id"), row.get("name"), None);
            let rejected = populate_row(schema(), &mut location, &map, row);
            // latitude lives under geoLocation, two levels below location.
            assert_eq!(rejected.len(), 1);
            assert_eq!(rejected[0].tag, "latitude");
            assert_eq!(rejected[0].error.kind(), ErrorKind::StructuralMismatch);
            location
        })
        .collect();

    assert_eq!(locations[0]["locationId"], "L1");
    assert_eq!(locations[0]["address"]["street"], "Sveavägen");
    assert_eq!(locations[0]["auxiliary"]["public"], true);
    assert_eq!(locations[1]["address"]["city"], "Göteborg");
    assert_eq!(locations[1]["auxiliary"]["public"], false);
}

// ============================================================================
// Files on disk
// ============================================================================

#[test]
fn test_span_table_file_to_tariffs_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("spans.csv");
    fs::write(
        &input,
        "gebuehrenmodell;intervall_von;intervall_bis;gebuehr_von;gebuehr_bis\n\
0;0;1440;0;240\n",
    )
    .unwrap();

    let rows = read_rows(&input, None).unwrap();
    let tariffs = convert_span_rates(schema(), &rows, &Default::default()).unwrap();
    let out = dir.path().join("tariffs.json");
    fs::write(&out, serde_json::to_string_pretty(&json!({ "tariffs": tariffs })).unwrap()).unwrap();

    let written: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let rate = &written["tariffs"][0]["rates"][0];
    assert_eq!(rate["interval"], 60);
    assert_eq!(rate["value"], 10);
    assert_eq!(rate["repeat"], true);
}

#[test]
fn test_schema_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schema.json");
    fs::write(
        &path,
        r#"{
            "entries": [
                ["garage", ["name", "levels"]],
                ["levels", ["level"]],
                ["level", ["levelId", "spots", "open"]]
            ],
            "collections": ["levels"],
            "booleans": ["open"]
        }"#,
    )
    .unwrap();

    let table = SchemaTable::from_path(&path).unwrap();
    assert_eq!(table.find_parent("level"), Some("levels"));
    assert_eq!(table.path(None, "level").unwrap(), ["garage", "levels", "level"]);

    let mut garage = create_object_base("garage", None);
    let mut level = create_object_base("level", Some("L1"));
    add_element_to(&table, &mut level, None, "spots", json!(40), false).unwrap();
    add_element_to(&table, &mut garage, None, "levels", Value::Object(level), false).unwrap();
    add_element_to_id(&table, &mut garage, "level", "L1", "open", json!(true)).unwrap();
    assert_eq!(garage["levels"][0]["open"], true);
    assert_eq!(garage["levels"][0]["spots"], 40);

    assert!(SchemaTable::from_path(&dir.path().join("missing.json")).is_err());
}
