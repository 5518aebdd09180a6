// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Results of statement execution.
//!
//! Query results are drained from the native reader into a [`ResultSet`]
//! immediately, so a result never borrows the statement that produced it.

mod row;

pub use row::{ColumnIndex, Row};

use crate::error::{self, FluentErrorHelper, Result};
use arrow_array::{RecordBatch, RecordBatchReader};
use arrow_schema::SchemaRef;
use driverbase::error::ErrorHelper;

/// Represents a result set from a query execution.
#[derive(Debug)]
pub struct ResultSet {
    schema: Option<SchemaRef>,
    batches: Vec<RecordBatch>,
    current_index: usize,
}

impl ResultSet {
    /// Creates an empty result set.
    pub fn empty() -> Self {
        Self {
            schema: None,
            batches: Vec::new(),
            current_index: 0,
        }
    }

    /// Creates a result set with the given schema and batches.
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self {
            schema: Some(schema),
            batches,
            current_index: 0,
        }
    }

    /// Drains `reader`, keeping at most `max_rows` rows.
    pub fn collect(reader: impl RecordBatchReader, max_rows: Option<usize>) -> Result<Self> {
        let schema = reader.schema();
        let mut remaining = max_rows;
        let mut batches = Vec::new();
        for batch in reader {
            if remaining == Some(0) {
                break;
            }
            let mut batch = batch.map_err(|e| error::arrow(e, "read query results"))?;
            if let Some(left) = remaining.as_mut() {
                if batch.num_rows() > *left {
                    batch = batch.slice(0, *left);
                }
                *left -= batch.num_rows();
            }
            batches.push(batch);
        }
        Ok(Self::new(schema, batches))
    }

    /// Returns the schema of the result set.
    pub fn schema(&self) -> Option<&SchemaRef> {
        self.schema.as_ref()
    }

    /// Returns all collected batches.
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Returns the total number of batches.
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Returns the total number of rows across all batches.
    pub fn row_count(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    /// Iterates over every row, independent of the batch cursor.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.batches
            .iter()
            .flat_map(|batch| (0..batch.num_rows()).map(move |index| Row::new(batch, index)))
    }

    /// Maps every row.
    pub fn list<T>(&self, mut mapper: impl FnMut(&Row<'_>) -> Result<T>) -> Result<Vec<T>> {
        self.rows().map(|row| mapper(&row)).collect()
    }

    /// Maps the first row, if any.
    pub fn first<T>(&self, mapper: impl FnOnce(&Row<'_>) -> Result<T>) -> Result<Option<T>> {
        self.rows().next().map(|row| mapper(&row)).transpose()
    }

    /// Maps the only row, failing unless there is exactly one.
    pub fn single<T>(&self, mapper: impl FnOnce(&Row<'_>) -> Result<T>) -> Result<T> {
        let mut rows = self.rows();
        let (Some(row), None) = (rows.next(), rows.next()) else {
            let message = format!("expected exactly one row, found {}", self.row_count());
            return Err(FluentErrorHelper::invalid_state()
                .message(&message)
                .to_adbc());
        };
        mapper(&row)
    }

    /// Fetches the next record batch.
    pub fn next_batch(&mut self) -> Result<Option<&RecordBatch>> {
        if self.current_index >= self.batches.len() {
            return Ok(None);
        }
        let batch = &self.batches[self.current_index];
        self.current_index += 1;
        Ok(Some(batch))
    }

    /// Resets the iterator to the beginning.
    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    /// Closes the result set and releases resources.
    pub fn close(&mut self) -> Result<()> {
        self.batches.clear();
        self.current_index = 0;
        Ok(())
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Outcome of an update statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Rows affected as reported by the driver, if it knows.
    pub affected_rows: Option<i64>,
}

/// Outcome of a batch.
///
/// Static batches report one count per command. Prepared batches are bound
/// in one call, so the driver reports a single count for all `rows`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    counts: Vec<Option<i64>>,
    rows: usize,
}

impl BatchResult {
    pub(crate) fn new(counts: Vec<Option<i64>>, rows: usize) -> Self {
        Self { counts, rows }
    }

    /// Counts in execution order.
    pub fn counts(&self) -> &[Option<i64>] {
        &self.counts
    }

    /// Number of commands or parameter rows executed.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Sum of all counts, or `None` if any count is unknown.
    pub fn total(&self) -> Option<i64> {
        self.counts.iter().copied().sum()
    }
}

/// Outcome of a statement of unknown kind.
#[derive(Debug)]
pub struct ExecuteResult {
    result_set: ResultSet,
}

impl ExecuteResult {
    pub(crate) fn new(result_set: ResultSet) -> Self {
        Self { result_set }
    }

    /// True if the statement produced columns.
    pub fn has_result_set(&self) -> bool {
        self.result_set
            .schema()
            .is_some_and(|schema| !schema.fields().is_empty())
    }

    pub fn result_set(&self) -> &ResultSet {
        &self.result_set
    }

    pub fn into_result_set(self) -> ResultSet {
        self.result_set
    }
}
