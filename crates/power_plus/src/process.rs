//! Raw table → processed [`Dataset`].

use common::{Dataset, PlayerRecord, RawTable, ResolutionError};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::calculator;
use crate::resolver::{resolve, ResolvedColumns};

/// Resolve columns once for the whole table, then build one record per row.
///
/// A resolution failure aborts the batch; rows are never dropped
/// individually. Unparsable numeric cells become `None`.
pub fn process_table(table: &RawTable) -> Result<Dataset, ResolutionError> {
    let resolved = resolve(&table.columns)?;

    debug!(
        "Resolved columns: bat_speed='{}' swing_length='{}'",
        table.columns[resolved.bat_speed], table.columns[resolved.swing_length]
    );

    Ok(table
        .rows
        .iter()
        .map(|row| build_record(&table.columns, &resolved, row))
        .collect())
}

fn build_record(columns: &[String], resolved: &ResolvedColumns, row: &[String]) -> PlayerRecord {
    let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");

    let bat_speed = parse_number(cell(resolved.bat_speed));
    let swing_length = parse_number(cell(resolved.swing_length));
    let (power_plus, grade) = calculator::compute(bat_speed, swing_length);

    let mut extra = BTreeMap::new();
    for (idx, name) in columns.iter().enumerate() {
        if resolved.consumes(idx) || PlayerRecord::FIELD_NAMES.contains(&name.as_str()) {
            continue;
        }
        extra.insert(name.clone(), passthrough_value(cell(idx)));
    }

    PlayerRecord {
        player_name: resolved
            .player_name
            .map(|i| cell(i).trim().to_string())
            .unwrap_or_default(),
        team: resolved
            .team
            .map(|i| cell(i).trim().to_string())
            .unwrap_or_default(),
        swings: resolved.swings.and_then(|i| parse_count(cell(i))),
        bat_speed,
        swing_length,
        power_plus,
        grade,
        extra,
    }
}

/// Coerce a cell to a finite number; anything else is absent.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a cell to a non-negative whole count (`"312.0"` → 312).
pub fn parse_count(raw: &str) -> Option<u64> {
    parse_number(raw)
        .filter(|v| *v >= 0.0)
        .map(|v| v.trunc() as u64)
}

fn passthrough_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    if let Some(f) = parse_number(trimmed) {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}
