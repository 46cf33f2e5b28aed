//! Column-oriented recording of economy events.
//!
//! A `tracing` subscriber files every event under its target: one table per
//! target, one column per field, one row per event. The schema is whatever
//! the simulation emits; a field missing from an event is padded with the
//! column's zero value.
//!
//! # Usage
//!
//! ```ignore
//! // In simulation code:
//! tracing::info!(target: "month", month, employed, mean_wage);
//!
//! // In a test or reporting layer:
//! instrument::install_subscriber();
//! // ... step the economy ...
//! let months = instrument::drain().tables.remove("month");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Level, Metadata, Subscriber};

// === COLUMNS ===

/// A column of typed values.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedColumn {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl TypedColumn {
    pub fn len(&self) -> usize {
        match self {
            TypedColumn::U64(v) => v.len(),
            TypedColumn::I64(v) => v.len(),
            TypedColumn::F64(v) => v.len(),
            TypedColumn::Bool(v) => v.len(),
            TypedColumn::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pad_to(&mut self, rows: usize) {
        let missing = rows.saturating_sub(self.len());
        if missing == 0 {
            return;
        }
        match self {
            TypedColumn::U64(v) => v.extend(std::iter::repeat_n(0, missing)),
            TypedColumn::I64(v) => v.extend(std::iter::repeat_n(0, missing)),
            TypedColumn::F64(v) => v.extend(std::iter::repeat_n(0.0, missing)),
            TypedColumn::Bool(v) => v.extend(std::iter::repeat_n(false, missing)),
            TypedColumn::Str(v) => v.extend(std::iter::repeat_n(String::new(), missing)),
        }
    }

    /// Numeric view of the column. Integers widen to f64; other kinds are
    /// `None`.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            TypedColumn::U64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            TypedColumn::I64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            TypedColumn::F64(v) => Some(v.clone()),
            TypedColumn::Bool(_) | TypedColumn::Str(_) => None,
        }
    }
}

/// A table with dynamically-typed columns.
#[derive(Debug, Clone, Default)]
pub struct DynamicTable {
    pub columns: HashMap<String, TypedColumn>,
    pub row_count: usize,
}

impl DynamicTable {
    /// Pad every column to the current row count.
    fn pad_columns_to_row_count(&mut self) {
        let rows = self.row_count;
        for col in self.columns.values_mut() {
            col.pad_to(rows);
        }
    }

    /// Existing column, or a new one pre-padded for the rows before it.
    fn column_mut(&mut self, name: &str, empty: impl FnOnce(usize) -> TypedColumn) -> &mut TypedColumn {
        let rows = self.row_count;
        self.columns
            .entry(name.to_string())
            .or_insert_with(|| empty(rows))
    }

    pub fn column(&self, name: &str) -> Option<&TypedColumn> {
        self.columns.get(name)
    }
}

/// Collection of tables, keyed by tracing target.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub tables: HashMap<String, DynamicTable>,
}

impl Recorder {
    pub fn table(&self, target: &str) -> Option<&DynamicTable> {
        self.tables.get(target)
    }

    /// Rows recorded under `target`; zero if nothing was emitted there.
    pub fn rows(&self, target: &str) -> usize {
        self.tables.get(target).map_or(0, |t| t.row_count)
    }
}

thread_local! {
    static RECORDER: RefCell<Recorder> = RefCell::default();
}

// === SUBSCRIBER ===

/// Files event fields into the columns of one table.
struct ColumnVisitor<'a> {
    table: &'a mut DynamicTable,
}

impl Visit for ColumnVisitor<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if let TypedColumn::U64(v) = self
            .table
            .column_mut(field.name(), |n| TypedColumn::U64(vec![0; n]))
        {
            v.push(value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if let TypedColumn::I64(v) = self
            .table
            .column_mut(field.name(), |n| TypedColumn::I64(vec![0; n]))
        {
            v.push(value);
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let TypedColumn::F64(v) = self
            .table
            .column_mut(field.name(), |n| TypedColumn::F64(vec![0.0; n]))
        {
            v.push(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if let TypedColumn::Bool(v) = self
            .table
            .column_mut(field.name(), |n| TypedColumn::Bool(vec![false; n]))
        {
            v.push(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if let TypedColumn::Str(v) = self
            .table
            .column_mut(field.name(), |n| TypedColumn::Str(vec![String::new(); n]))
        {
            v.push(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }
}

/// Tracing subscriber that collects events into column-oriented tables.
///
/// Spans are ignored. Events more verbose than `max_level` are dropped, so
/// the default (`INFO`) keeps the monthly summaries and skips per-agent
/// decision events.
#[derive(Debug, Clone, Copy)]
pub struct DataFrameSubscriber {
    pub max_level: Level,
}

impl Default for DataFrameSubscriber {
    fn default() -> Self {
        Self { max_level: Level::INFO }
    }
}

impl DataFrameSubscriber {
    pub fn with_max_level(max_level: Level) -> Self {
        Self { max_level }
    }
}

impl Subscriber for DataFrameSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= self.max_level
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let target = event.metadata().target().to_string();

        RECORDER.with(|r| {
            let mut recorder = r.borrow_mut();
            let table = recorder.tables.entry(target).or_default();

            table.pad_columns_to_row_count();
            event.record(&mut ColumnVisitor { table: &mut *table });
            table.row_count += 1;
            // Fields this event did not carry
            table.pad_columns_to_row_count();
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Install an INFO-level `DataFrameSubscriber` as the global default.
/// Later calls are no-ops.
pub fn install_subscriber() {
    let _ = tracing::subscriber::set_global_default(DataFrameSubscriber::default());
}

/// Drain all recorded data from the thread-local recorder.
pub fn drain() -> Recorder {
    RECORDER.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

/// Clear all recorded data without returning it.
pub fn clear() {
    RECORDER.with(|r| *r.borrow_mut() = Recorder::default());
}

// === POLARS ===

use polars::prelude::*;

impl DynamicTable {
    /// Convert this table to a polars DataFrame. Columns come out sorted by
    /// name so the layout does not depend on event order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut names: Vec<&String> = self.columns.keys().collect();
        names.sort();

        let columns: Vec<Column> = names
            .into_iter()
            .map(|name| match &self.columns[name] {
                TypedColumn::U64(v) => Column::new(name.into(), v),
                TypedColumn::I64(v) => Column::new(name.into(), v),
                TypedColumn::F64(v) => Column::new(name.into(), v),
                TypedColumn::Bool(v) => Column::new(name.into(), v),
                TypedColumn::Str(v) => Column::new(name.into(), v),
            })
            .collect();

        DataFrame::new(columns)
    }
}

impl Recorder {
    /// Convert all tables to polars DataFrames. Tables that fail to convert
    /// are left out.
    pub fn to_dataframes(&self) -> HashMap<String, DataFrame> {
        self.tables
            .iter()
            .filter_map(|(name, table)| table.to_dataframe().ok().map(|df| (name.clone(), df)))
            .collect()
    }
}

/// Drain all recorded data and convert to polars DataFrames.
pub fn drain_to_dataframes() -> HashMap<String, DataFrame> {
    drain().to_dataframes()
}
