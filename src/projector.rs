//! Projection of a parsed status document into samples.
//!
//! Tables are dispatched by name. `system_stat` is flat: every numeric field
//! becomes one unlabelled gauge. `XBResourceRealTimeStatList` holds one
//! [`TrunkRecord`] per row, and group rows become eight labelled gauges.
//! Failures stay local to the field that caused them.

use crate::document::{Document, Table};
use crate::error::{ProjectionError, SansayError};
use crate::metrics::Sample;
use crate::record::{get_by_name, set_by_name, TrunkRecord, TRUNK_COUNTERS};
use std::time::Instant;
use tracing::debug;

pub const METRIC_PREFIX: &str = "sansay_";
pub const TRUNK_METRIC_PREFIX: &str = "sansay_trunk_";
pub const SCRAPE_DURATION_METRIC: &str = "sansay_scrape_duration_seconds";

/// Status flags in `system_stat` that are text, not numbers.
const NON_NUMERIC_SYSTEM_FIELDS: [&str; 2] = ["ha_pre_state", "ha_current_state"];

/// Known table shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    SystemStat,
    TrunkResources,
    Unrecognized,
}

impl TableKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "system_stat" => TableKind::SystemStat,
            "XBResourceRealTimeStatList" => TableKind::TrunkResources,
            _ => TableKind::Unrecognized,
        }
    }
}

/// Project every table of `document` onto `sink`, then the duration of the
/// whole cycle measured from `started_at`.
pub fn project(document: &Document, started_at: Instant, sink: &mut Vec<Sample>) {
    for table in &document.database.tables {
        match TableKind::from_name(&table.name) {
            TableKind::SystemStat => project_system_stat(table, sink),
            TableKind::TrunkResources => project_trunks(table, sink),
            TableKind::Unrecognized => debug!("Skipping table {:?}", table.name),
        }
    }

    sink.push(Sample::gauge(
        SCRAPE_DURATION_METRIC,
        "Total sansay time scrape took (walk and processing).",
        started_at.elapsed().as_secs_f64(),
    ));
}

fn project_system_stat(table: &Table, sink: &mut Vec<Sample>) {
    for row in &table.rows {
        for field in row.unique_fields() {
            if NON_NUMERIC_SYSTEM_FIELDS.contains(&field.name.as_str()) {
                continue;
            }
            // Best effort: unparsable values are dropped without a marker.
            match parse_value(&field.name, &field.value) {
                Ok(value) => sink.push(Sample::gauge(
                    format!("{}{}", METRIC_PREFIX, field.name),
                    format!("Sansay system_stat field {}", field.name),
                    value,
                )),
                Err(e) => debug!("Skipping system_stat field: {}", e),
            }
        }
    }
}

fn project_trunks(table: &Table, sink: &mut Vec<Sample>) {
    for row in &table.rows {
        let mut trunk = TrunkRecord::default();
        for field in row.unique_fields() {
            if let Err(e) = set_by_name(&mut trunk, &field.name, &field.value) {
                debug!("Trunk field rejected: {}", e);
                sink.push(Sample::invalid(e));
            }
        }

        if trunk.is_group() {
            project_trunk_group(&trunk, sink);
        }
    }
}

fn project_trunk_group(trunk: &TrunkRecord, sink: &mut Vec<Sample>) {
    for counter in TRUNK_COUNTERS {
        let value = get_by_name(trunk, counter)
            .map_err(SansayError::from)
            .and_then(|text| parse_value(counter, &text).map_err(SansayError::from));

        match value {
            Ok(value) => sink.push(Sample::labelled_gauge(
                format!("{}{}", TRUNK_METRIC_PREFIX, counter.to_lowercase()),
                format!("Sansay trunk group {} counter", counter),
                vec![
                    ("trunkgroup", trunk.trunk_id.clone()),
                    ("alias", trunk.alias.clone()),
                ],
                value,
            )),
            Err(e) => {
                debug!("Trunk {} counter {} rejected: {}", trunk.trunk_id, counter, e);
                sink.push(Sample::invalid(e));
            }
        }
    }
}

/// Parse a field as `f64`. Literals that overflow to infinity are rejected;
/// only an explicit `inf`/`infinity` yields one.
fn parse_value(field: &str, value: &str) -> Result<f64, ProjectionError> {
    let parsed = value
        .parse::<f64>()
        .map_err(|source| ProjectionError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
            source,
        })?;

    if parsed.is_infinite() && !is_infinity_literal(value) {
        return Err(ProjectionError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

fn is_infinity_literal(value: &str) -> bool {
    let unsigned = value
        .strip_prefix('+')
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
