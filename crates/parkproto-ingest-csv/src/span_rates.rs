//! Tariffs from span tables.
//!
//! A span table describes each fee model as cumulative price points over
//! parking duration, one row per span:
//!
//! ```text
//! gebuehrenmodell;intervall_von;intervall_bis;gebuehr_von;gebuehr_bis
//! 1;0;60;10;10          first hour costs 10 up front
//! 1;60;120;20;20        second hour costs 10 up front
//! 1;120;720;20;120      then 10 per hour until 12h
//! 1;720;1440;120;120    flat afterwards
//! ```
//!
//! Intervals are minutes since arrival, fees are cumulative. Each model
//! becomes one tariff whose rates reproduce the same price curve.

use anyhow::{anyhow, bail, Context, Result};
use parkproto_document::{
    add_element_to, add_value, create_object_base, create_tariff_base, get_default, Node,
};
use parkproto_schema::SchemaTable;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::rows::Row;

/// Column names of a span table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanColumns {
    pub model: String,
    pub interval_from: String,
    pub interval_to: String,
    pub fee_from: String,
    pub fee_to: String,
}

impl Default for SpanColumns {
    fn default() -> Self {
        Self {
            model: "gebuehrenmodell".into(),
            interval_from: "intervall_von".into(),
            interval_to: "intervall_bis".into(),
            fee_from: "gebuehr_von".into(),
            fee_to: "gebuehr_bis".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    from: i64,
    to: i64,
    fee_from: i64,
    fee_to: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rate {
    order: usize,
    value: i64,
    interval: i64,
    intervals: i64,
    repeat: bool,
}

impl Rate {
    fn new(order: usize, value: i64, interval: i64, intervals: i64) -> Self {
        Self {
            order,
            value,
            interval,
            intervals,
            repeat: false,
        }
    }

    /// Equal apart from position and repetition count.
    fn is_similar(&self, other: &Rate) -> bool {
        self.value == other.value && self.interval == other.interval && self.repeat == other.repeat
    }

    fn into_node(self, schema: &SchemaTable) -> Result<Node> {
        let mut node = create_object_base("rate", None);
        add_value(schema, &mut node, "order", json!(self.order), false)?;
        add_value(schema, &mut node, "value", json!(self.value), false)?;
        add_value(schema, &mut node, "interval", json!(self.interval), false)?;
        add_value(schema, &mut node, "intervals", json!(self.intervals), false)?;
        add_value(schema, &mut node, "repeat", json!(self.repeat), false)?;
        Ok(node)
    }
}

/// Per-model result of [`spans_to_rates`].
#[derive(Debug, Default)]
struct RatePlan {
    rates: Vec<Rate>,
    fixed: bool,
    min_fee: Option<i64>,
    max_parking_time: Option<i64>,
}

/// Leading integer of `cell`, the way spreadsheet exports write amounts
/// (`"120"`, `" 15 "`, `"1,50"` -> 1).
fn leading_int(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    let digits_end = cell
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(cell.len(), |(i, _)| i);
    cell[..digits_end].parse().ok()
}

/// Largest accepted minute or fee magnitude. Keeps every span difference and
/// rate product well inside `i64`.
const MAX_CELL: i64 = 1_000_000_000;

fn read_span(row: &Row, columns: &SpanColumns) -> Result<Span> {
    let line = row.line();
    let field = |name: &str| -> Result<i64> {
        let cell = row
            .get(name)
            .ok_or_else(|| anyhow!("row {line}: missing column `{name}`"))?;
        let n = leading_int(cell)
            .ok_or_else(|| anyhow!("row {line}: `{name}` is not a number: {cell:?}"))?;
        if !(-MAX_CELL..=MAX_CELL).contains(&n) {
            bail!("row {line}: `{name}` is out of range: {n}");
        }
        Ok(n)
    };
    Ok(Span {
        from: field(&columns.interval_from)?,
        to: field(&columns.interval_to)?,
        fee_from: field(&columns.fee_from)?,
        fee_to: field(&columns.fee_to)?,
    })
}

/// Position of a model key in output order: canonical non-negative integers
/// first, ascending, then every other key in first-seen order.
fn model_rank(key: &str) -> (u8, u32) {
    match key.parse::<u32>() {
        Ok(n) if n != u32::MAX && n.to_string() == key => (0, n),
        _ => (1, 0),
    }
}

/// Groups spans by model key, each group sorted by interval start.
fn group_spans(rows: &[Row], columns: &SpanColumns) -> Result<Vec<(String, Vec<Span>)>> {
    let mut models: Vec<(String, Vec<Span>)> = Vec::new();
    for row in rows {
        let model = row
            .get(&columns.model)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| anyhow!("row {}: missing column `{}`", row.line(), columns.model))?;
        let span = read_span(row, columns)?;
        match models.iter_mut().find(|(key, _)| key == model) {
            Some((_, spans)) => spans.push(span),
            None => models.push((model.to_string(), vec![span])),
        }
    }
    models.sort_by_key(|(key, _)| model_rank(key));
    for (_, spans) in &mut models {
        spans.sort_by_key(|s| s.from);
    }
    Ok(models)
}

/// Splits `interval` minutes costing `value` into equal repeating units.
///
/// Prefers whole-hour style units (60, 30, 20, 15, 5 minutes) when the value
/// divides evenly across them, then per-minute units, else one block.
fn shorten(order: usize, interval: i64, value: i64) -> Rate {
    for unit in [60, 30, 20, 15, 5] {
        let count = interval / unit;
        if interval % unit == 0 && count != 0 && value % count == 0 {
            return Rate::new(order, value / count, unit, count);
        }
    }
    if interval != 0 && value != 0 && value % interval == 0 {
        return Rate::new(order, value / interval, 1, interval);
    }
    Rate::new(order, value, interval, 1)
}

/// Rates for spans that never change fee inside a span.
fn fixed_rates(spans: &[Span]) -> Vec<Rate> {
    let mut rates = Vec::with_capacity(spans.len());
    for (i, span) in spans.iter().enumerate() {
        let previous = i.checked_sub(1).map(|p| spans[p]);
        let prev_to = previous.map_or(0, |p| p.to);
        let prev_fee = previous.map_or(0, |p| p.fee_to);

        let from = if prev_to != 0 && prev_to != span.from {
            prev_to
        } else {
            span.from
        };
        rates.push(Rate::new(
            rates.len(),
            span.fee_from - prev_fee,
            span.to - from,
            1,
        ));
    }
    rates
}

/// Rates for spans with at least one growing fee.
fn graded_rates(spans: &[Span], plan: &mut RatePlan) {
    let rates = &mut plan.rates;
    for (i, span) in spans.iter().enumerate() {
        let mut interval = span.to - span.from;
        let mut value = span.fee_to - span.fee_from;
        let (prev_fee, prev_to) = i
            .checked_sub(1)
            .map_or((0, 0), |p| (spans[p].fee_to, spans[p].to));

        if value == 0 && span.fee_from > 0 {
            // Flat span whose jump is charged on the first minute.
            value = span.fee_from - prev_fee;
            if value > 0 {
                rates.push(Rate::new(rates.len(), value, 1, 1));
                value = 0;
                if span.from == prev_to {
                    interval -= 1;
                }
            }
        } else if span.from != prev_to && span.fee_from != prev_fee {
            // Gap before the span followed by a price jump.
            let gap = span.from - prev_to;
            if gap > 1 {
                rates.push(Rate::new(0, 0, gap - 1, 1));
            }
            rates.push(Rate::new(1, span.fee_from - prev_fee, 1, 1));
        } else if span.from != prev_to {
            // Free lead-in block.
            rates.push(Rate::new(0, 0, span.from - prev_to, 1));
        } else if span.fee_from != prev_fee {
            // Minimum fee charged on the first minute.
            if i == 0 {
                plan.min_fee = Some(span.fee_from);
            }
            rates.push(Rate::new(0, span.fee_from - prev_fee, 1, 1));
            interval -= 1;
        }

        let value = value.max(0);
        rates.push(shorten(rates.len(), interval, value));
    }
}

/// Merges neighbours that differ only in order and repetition count.
fn merge_similar(rates: Vec<Rate>) -> Vec<Rate> {
    let mut merged: Vec<Rate> = Vec::with_capacity(rates.len());
    for rate in rates {
        match merged.last_mut() {
            Some(last) if last.is_similar(&rate) => {
                last.intervals = last.intervals.saturating_add(rate.intervals)
            }
            _ => merged.push(rate),
        }
    }
    merged
}

fn spans_to_rates(spans: &[Span]) -> RatePlan {
    let mut plan = RatePlan::default();
    let total: i64 = spans.iter().map(|s| s.fee_to - s.fee_from).sum();
    if total == 0 {
        plan.rates = fixed_rates(spans);
        plan.fixed = true;
    } else {
        graded_rates(spans, &mut plan);
    }

    let max = spans.last().map(|s| s.to);
    plan.max_parking_time = max;
    plan.rates = merge_similar(std::mem::take(&mut plan.rates));

    // A single rate spanning the whole stay repeats instead of counting.
    if let ([only], Some(max)) = (plan.rates.as_mut_slice(), max) {
        if only.interval.saturating_mul(only.intervals) >= max {
            only.intervals = 1;
            only.repeat = true;
        }
    }
    plan
}

fn build_tariff(
    schema: &SchemaTable,
    model: &str,
    location_id: usize,
    spans: &[Span],
) -> Result<Node> {
    let mut tariff = create_tariff_base(Some(model), &location_id.to_string());

    add_element_to(
        schema,
        &mut tariff,
        None,
        "restrictions",
        Value::Object(create_object_base("restrictions", None)),
        false,
    )?;
    add_element_to(schema, &mut tariff, Some("restrictions"), "prepaid", json!(false), false)?;
    add_element_to(schema, &mut tariff, Some("restrictions"), "tariffType", json!("REGULAR"), false)?;
    add_element_to(schema, &mut tariff, Some("restrictions"), "targetGroup", json!("PUBLIC"), false)?;

    let plan = spans_to_rates(spans);
    if plan.fixed {
        add_element_to(schema, &mut tariff, None, "tariffType", json!("FIXED"), false)?;
    }
    if let Some(min_fee) = plan.min_fee {
        add_element_to(schema, &mut tariff, None, "minFee", json!(min_fee), false)?;
    }
    if let Some(max) = plan.max_parking_time {
        add_element_to(schema, &mut tariff, Some("restrictions"), "maxParkingTime", json!(max), false)?;
    }

    let rates = plan
        .rates
        .into_iter()
        .map(|rate| rate.into_node(schema).map(Value::Object))
        .collect::<Result<Vec<_>>>()?;
    debug!(model, rates = rates.len(), "rates built");
    add_element_to(schema, &mut tariff, None, "rates", Value::Array(rates), true)?;

    add_element_to(
        schema,
        &mut tariff,
        None,
        "activeSchedules",
        Value::Object(get_default("activeSchedule")),
        false,
    )?;
    add_element_to(
        schema,
        &mut tariff,
        None,
        "validSchedules",
        Value::Object(get_default("validSchedule")),
        false,
    )?;
    Ok(tariff)
}

/// One tariff per fee model. Integer model keys come first in numeric order,
/// other keys follow in the order they first appear.
///
/// Tariffs take the model key as `tariffId` and a running counter as
/// `locationId`. Restrictions default to a public, post-paid `REGULAR` tariff
/// (`FIXED` when no span ever grows its fee); schedules are the always-valid
/// defaults.
pub fn convert_span_rates(
    schema: &SchemaTable,
    rows: &[Row],
    columns: &SpanColumns,
) -> Result<Vec<Node>> {
    let models = group_spans(rows, columns)?;
    let tariffs = models
        .iter()
        .enumerate()
        .map(|(location_id, (model, spans))| {
            build_tariff(schema, model, location_id, spans)
                .with_context(|| format!("fee model `{model}`"))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(rows = rows.len(), tariffs = tariffs.len(), "span table converted");
    Ok(tariffs)
}
