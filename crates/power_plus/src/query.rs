//! Read-only projections over a processed dataset.

use chrono::{DateTime, Utc};
use common::{Grade, PlayerRecord};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::calculator::{round_to, ABOVE_AVERAGE_THRESHOLD, ELITE_THRESHOLD};

/// Minimum swings for a player to count as qualified.
pub const QUALIFIED_MIN_SWINGS: u64 = 300;

pub fn qualified(data: &[PlayerRecord]) -> Vec<&PlayerRecord> {
    data.iter()
        .filter(|p| p.swing_count() >= QUALIFIED_MIN_SWINGS)
        .collect()
}

pub fn elite(data: &[PlayerRecord]) -> Vec<&PlayerRecord> {
    data.iter()
        .filter(|p| p.power_plus.is_some_and(|v| v >= ELITE_THRESHOLD))
        .collect()
}

/// First record (in source order) whose name contains `needle`, ignoring case.
pub fn find_player<'a>(data: &'a [PlayerRecord], needle: &str) -> Option<&'a PlayerRecord> {
    let needle = needle.to_lowercase();
    data.iter()
        .find(|p| p.player_name.to_lowercase().contains(&needle))
}

pub fn by_team<'a>(data: &'a [PlayerRecord], code: &str) -> Vec<&'a PlayerRecord> {
    data.iter()
        .filter(|p| p.team.eq_ignore_ascii_case(code.trim()))
        .collect()
}

/// Aggregate statistics over a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_players: usize,
    /// Means skip absent values and are `null` when nothing is present.
    pub avg_bat_speed: Option<f64>,
    pub avg_swing_length: Option<f64>,
    pub avg_power_plus: Option<f64>,
    pub grade_counts: BTreeMap<Grade, usize>,
    pub elite_count: usize,
    pub above_avg_count: usize,
    pub qualified_count: usize,
    pub last_updated: DateTime<Utc>,
}

/// Summarize `data`, or `None` if there is nothing to summarize.
pub fn summarize(data: &[PlayerRecord], last_updated: DateTime<Utc>) -> Option<Summary> {
    if data.is_empty() {
        return None;
    }

    let mut grade_counts: BTreeMap<Grade, usize> = Grade::ALL.iter().map(|g| (*g, 0)).collect();
    for record in data {
        *grade_counts.entry(record.grade).or_insert(0) += 1;
    }

    let elite_count = data
        .iter()
        .filter(|p| p.power_plus.is_some_and(|v| v >= ELITE_THRESHOLD))
        .count();
    let above_avg_count = data
        .iter()
        .filter(|p| {
            p.power_plus
                .is_some_and(|v| (ABOVE_AVERAGE_THRESHOLD..ELITE_THRESHOLD).contains(&v))
        })
        .count();

    Some(Summary {
        total_players: data.len(),
        avg_bat_speed: mean(data.iter().filter_map(|p| p.bat_speed)).map(|m| round_to(m, 2)),
        avg_swing_length: mean(data.iter().filter_map(|p| p.swing_length))
            .map(|m| round_to(m, 2)),
        avg_power_plus: mean(data.iter().filter_map(|p| p.power_plus)).map(|m| round_to(m, 1)),
        grade_counts,
        elite_count,
        above_avg_count,
        qualified_count: qualified(data).len(),
        last_updated,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
