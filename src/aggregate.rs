// Grouping and summarizing filtered chart entries into summary tables

use crate::data::ChartEntry;
use crate::error::{DashboardError, Result};
use crate::schema::{Field, Value};
use crate::table::{FilteredTable, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Share of each `inner` value within its `outer` group.
///
/// Rows are counted per `(outer, inner)` pair and divided by the total count
/// of the `outer` group, so proportions sum to 1 within every outer value.
/// Output columns: `[outer, inner, count, total, proportion]`, sorted by key.
pub fn proportion_by_group(table: &FilteredTable, outer: Field, inner: Field) -> Result<Table> {
    ensure_row_field(outer)?;
    ensure_row_field(inner)?;

    let mut counts: BTreeMap<(Value, Value), usize> = BTreeMap::new();
    let mut totals: BTreeMap<Value, usize> = BTreeMap::new();
    for entry in table.iter() {
        let (o, i) = match (entry.value(outer), entry.value(inner)) {
            (Some(o), Some(i)) => (o, i),
            _ => continue,
        };
        *totals.entry(o.clone()).or_default() += 1;
        *counts.entry((o, i)).or_default() += 1;
    }

    let rows: Vec<Vec<Value>> = counts
        .into_iter()
        .map(|((o, i), count)| {
            let total = totals.get(&o).copied().unwrap_or(count);
            vec![
                o,
                i,
                Value::Int(count as i64),
                Value::Int(total as i64),
                Value::Float(count as f64 / total as f64),
            ]
        })
        .collect();

    debug!(%outer, %inner, groups = rows.len(), "proportion by group");
    Ok(Table::new(
        vec![outer, inner, Field::Count, Field::Total, Field::Proportion],
        rows,
    ))
}

/// Fraction of rows per group whose `indicator` equals `match_value`.
///
/// Output columns: `[keys..., output]`, one row per key tuple present.
pub fn mean_indicator_by_group(
    table: &FilteredTable,
    keys: &[Field],
    indicator: Field,
    match_value: &str,
    output: Field,
) -> Result<Table> {
    for &key in keys {
        ensure_row_field(key)?;
    }
    ensure_row_field(indicator)?;
    if Field::ROW_FIELDS.contains(&output) || keys.contains(&output) {
        return Err(DashboardError::UnknownField(output.to_string()));
    }

    // key tuple -> (matches, rows)
    let mut groups: BTreeMap<Vec<Value>, (usize, usize)> = BTreeMap::new();
    for entry in table.iter() {
        let key = key_of(entry, keys);
        let hit = entry
            .value(indicator)
            .map(|v| v.to_string() == match_value)
            .unwrap_or(false);
        let slot = groups.entry(key).or_default();
        slot.1 += 1;
        if hit {
            slot.0 += 1;
        }
    }

    let rows: Vec<Vec<Value>> = groups
        .into_iter()
        .map(|(mut key, (hits, n))| {
            key.push(Value::Float(hits as f64 / n as f64));
            key
        })
        .collect();

    debug!(%indicator, groups = rows.len(), "mean indicator by group");
    let mut columns = keys.to_vec();
    columns.push(output);
    Ok(Table::new(columns, rows))
}

/// Headline numbers for the overview tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_songs: usize,
    /// `None` when the selection is empty
    pub avg_weeks_on_chart: Option<f64>,
}

impl Overview {
    pub fn avg_weeks_label(&self) -> String {
        match self.avg_weeks_on_chart {
            Some(avg) => format!("{:.1} weeks", avg),
            None => "no data".to_string(),
        }
    }
}

pub fn overview(table: &FilteredTable) -> Overview {
    let total_songs = table.len();
    let avg_weeks_on_chart = if total_songs == 0 {
        None
    } else {
        let sum: u64 = table.iter().map(|e| e.weeks_on_chart as u64).sum();
        Some(sum as f64 / total_songs as f64)
    };
    Overview {
        total_songs,
        avg_weeks_on_chart,
    }
}

fn ensure_row_field(field: Field) -> Result<()> {
    if Field::ROW_FIELDS.contains(&field) {
        Ok(())
    } else {
        Err(DashboardError::UnknownField(field.to_string()))
    }
}

fn key_of(entry: &ChartEntry, keys: &[Field]) -> Vec<Value> {
    keys.iter().filter_map(|&k| entry.value(k)).collect()
}
