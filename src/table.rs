use crate::data::ChartEntry;
use crate::schema::{Field, Value};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Chart entries that passed the current selection, in dataset order
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTable<'a> {
    rows: Vec<&'a ChartEntry>,
}

impl<'a> FilteredTable<'a> {
    pub fn new(rows: Vec<&'a ChartEntry>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[&'a ChartEntry] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ChartEntry> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Materialize every chart-entry column, for charts drawn from raw rows
    pub fn to_table(&self) -> Table {
        let columns = Field::ROW_FIELDS.to_vec();
        let rows = self
            .rows
            .iter()
            .map(|entry| {
                columns
                    .iter()
                    .filter_map(|&f| entry.value(f))
                    .collect()
            })
            .collect();
        Table::new(columns, rows)
    }
}

/// Column-labelled rows of cells; the shape handed to the chart builder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Field>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<Field>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, field: Field) -> bool {
        self.columns.contains(&field)
    }

    pub fn column_index(&self, field: Field) -> Option<usize> {
        self.columns.iter().position(|&c| c == field)
    }

    pub fn get(&self, row: usize, field: Field) -> Option<&Value> {
        let idx = self.column_index(field)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_records(&self) -> Vec<Map<String, JsonValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row.iter())
                    .map(|(field, value)| (field.name().to_string(), cell_to_json(value)))
                    .collect()
            })
            .collect()
    }
}

fn cell_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Int(i) => JsonValue::from(*i),
        Value::Float(f) => JsonValue::from(*f),
        Value::Text(s) => JsonValue::from(s.as_str()),
    }
}
