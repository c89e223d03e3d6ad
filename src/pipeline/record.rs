//! Raw, untransformed values: one customer record or a whole labeled table

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use polars::prelude::*;

use super::error::PipelineResult;

/// A single raw cell: text for categoricals, a number for numerics
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    /// Interpret the value as a category label.
    ///
    /// Integral numbers render without a fractional part so that a numeric
    /// `1` read from a CSV matches the label `"1"`.
    pub fn as_category(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            RawValue::Number(n) => n.to_string(),
        }
    }

    /// Interpret the value as a finite number, parsing text if needed.
    ///
    /// NaN and infinities (including the text forms `"NaN"` and `"inf"`)
    /// yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{}", s),
            RawValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Number(value as f64)
    }
}

/// One customer's attributes keyed by column name.
///
/// Key order is irrelevant: the inference transform always walks the
/// persisted column schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    values: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: &str, value: impl Into<RawValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: impl Into<RawValue>) {
        self.values.insert(column.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.values.get(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Hashable image of a cell, used for exact-duplicate detection
#[derive(Hash, PartialEq, Eq)]
enum CellKey {
    Null,
    Text(String),
    Bits(u64),
}

impl From<&Option<RawValue>> for CellKey {
    fn from(cell: &Option<RawValue>) -> Self {
        match cell {
            None => CellKey::Null,
            Some(RawValue::Text(s)) => CellKey::Text(s.clone()),
            Some(RawValue::Number(n)) => CellKey::Bits(n.to_bits()),
        }
    }
}

/// Row-major copy of a labeled dataset, detached from polars
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<RawValue>>>,
}

impl RawTable {
    /// Build a table from explicit column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<RawValue>>>) -> Self {
        Self { columns, rows }
    }

    /// Convert a polars frame into raw rows.
    ///
    /// Numeric and boolean dtypes become `Number` (NaN counts as missing),
    /// everything else is cast to string.
    pub fn from_dataframe(df: &DataFrame) -> PipelineResult<Self> {
        let height = df.height();
        let mut columns = Vec::with_capacity(df.width());
        let mut cells: Vec<Vec<Option<RawValue>>> = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            columns.push(column.name().to_string());

            let values: Vec<Option<RawValue>> =
                if column.dtype().is_primitive_numeric() || column.dtype() == &DataType::Boolean {
                    let cast = column.cast(&DataType::Float64)?;
                    cast.f64()?
                        .into_iter()
                        .map(|v| v.filter(|n| !n.is_nan()).map(RawValue::Number))
                        .collect()
                } else {
                    let cast = column.cast(&DataType::String)?;
                    cast.str()?
                        .into_iter()
                        .map(|v| v.map(|s| RawValue::Text(s.to_string())))
                        .collect()
                };
            cells.push(values);
        }

        let rows = (0..height)
            .map(|i| cells.iter().map(|col| col[i].clone()).collect())
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<RawValue>>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Remove exact-duplicate rows, keeping the first occurrence.
    /// Returns the number of rows removed.
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(before);
        self.rows
            .retain(|row| seen.insert(row.iter().map(CellKey::from).collect()));
        before - self.rows.len()
    }

    /// Remove rows holding any missing value. Returns the number of rows removed.
    pub fn drop_incomplete(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().all(Option::is_some));
        before - self.rows.len()
    }

    /// Drop the named columns; names that are absent are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !names.contains(&c.as_str()))
            .collect();

        self.columns = self
            .columns
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(c, _)| c.clone())
            .collect();

        for row in &mut self.rows {
            let mut flags = keep.iter();
            row.retain(|_| *flags.next().unwrap_or(&true));
        }
    }
}
