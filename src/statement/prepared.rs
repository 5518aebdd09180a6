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

//! Prepared statements bound by position.

use super::Handle;
use crate::error::{self, FluentErrorHelper, Result};
use crate::result::{BatchResult, ExecuteResult, ResultSet, UpdateResult};
use crate::value::{build_parameter_batch, Value};
use adbc_core::error::Status;
use driverbase::error::ErrorHelper;
use tracing::{debug, trace};

/// A statement prepared once and executed with bound parameters.
///
/// Parameters are addressed by their 1-based position among the `?` markers.
#[derive(Debug)]
pub struct PreparedStatement<S> {
    pub(super) handle: Handle<S>,
    parameter_count: Option<usize>,
    current: Vec<Option<Value>>,
    rows: Vec<Vec<Value>>,
}

impl<S: adbc_core::Statement> PreparedStatement<S> {
    /// Prepares `handle`'s SQL.
    ///
    /// Without an explicit `parameter_count` the driver's parameter schema is
    /// consulted; if the driver cannot describe it, any position is accepted.
    pub(crate) fn prepare(mut handle: Handle<S>, parameter_count: Option<usize>) -> Result<Self> {
        let sql = handle.sql().to_string();
        debug!(sql = %sql, "preparing statement");
        handle.set_sql_query(&sql)?;
        let statement = handle.statement()?;
        statement
            .prepare()
            .map_err(error::native("prepare statement"))?;
        let parameter_count = match parameter_count {
            Some(count) => Some(count),
            None => match statement.get_parameter_schema() {
                Ok(schema) => Some(schema.fields().len()),
                Err(e) if e.status == Status::NotImplemented => None,
                Err(e) => return Err(error::translate(e, "describe parameters")),
            },
        };
        Ok(Self {
            handle,
            parameter_count,
            current: Vec::new(),
            rows: Vec::new(),
        })
    }

    /// Number of parameters, when known.
    pub fn parameter_count(&self) -> Option<usize> {
        self.parameter_count
    }

    /// Binds `value` at the 1-based `index`.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self> {
        let out_of_range = index == 0 || self.parameter_count.is_some_and(|count| index > count);
        if out_of_range {
            let message = match self.parameter_count {
                Some(count) => format!("parameter index {index} out of range 1..={count}"),
                None => format!("parameter index {index} out of range"),
            };
            return Err(FluentErrorHelper::invalid_argument()
                .message(&message)
                .to_adbc());
        }
        let value = value.into();
        trace!(index, ?value, "binding parameter");
        if self.current.len() < index {
            self.current.resize(index, None);
        }
        self.current[index - 1] = Some(value);
        Ok(self)
    }

    pub fn set_null(&mut self, index: usize) -> Result<&mut Self> {
        self.set(index, Value::Null)
    }

    /// Forgets every bound value of the current row.
    pub fn clear_parameters(&mut self) -> &mut Self {
        self.current.clear();
        self
    }

    fn width(&self) -> usize {
        self.parameter_count.unwrap_or(self.current.len())
    }

    fn current_row(&self) -> Result<Vec<Value>> {
        (0..self.width())
            .map(|i| {
                self.current.get(i).cloned().flatten().ok_or_else(|| {
                    let message = format!("parameter {} is not bound", i + 1);
                    FluentErrorHelper::invalid_state()
                        .message(&message)
                        .to_adbc()
                })
            })
            .collect()
    }

    fn bind_current(&mut self) -> Result<()> {
        let width = self.width();
        if width == 0 {
            return Ok(());
        }
        let row = self.current_row()?;
        let batch = build_parameter_batch(&[row], width)?;
        self.handle.bind(batch)
    }

    /// Adds the current parameters as a row of the next [`batch`](Self::batch).
    ///
    /// Bound values are kept, so the next row only needs the values that change.
    pub fn add_batch(&mut self) -> Result<&mut Self> {
        let row = self.current_row()?;
        self.rows.push(row);
        Ok(self)
    }

    /// Number of queued parameter rows.
    pub fn pending(&self) -> usize {
        self.rows.len()
    }

    pub fn query(&mut self) -> Result<ResultSet> {
        self.bind_current()?;
        self.handle.query()
    }

    pub fn update(&mut self) -> Result<UpdateResult> {
        self.bind_current()?;
        self.handle.update()
    }

    pub fn execute(&mut self) -> Result<ExecuteResult> {
        self.bind_current()?;
        self.handle.execute()
    }

    /// Binds every queued row in one call and executes the statement once.
    ///
    /// The queue is emptied whether or not execution succeeds.
    pub fn batch(&mut self) -> Result<BatchResult> {
        let rows = std::mem::take(&mut self.rows);
        if rows.is_empty() {
            return Ok(BatchResult::default());
        }
        let width = self
            .parameter_count
            .unwrap_or_else(|| rows.iter().map(Vec::len).max().unwrap_or(0));
        if let Some((row, short)) = rows.iter().enumerate().find(|(_, row)| row.len() < width) {
            let message = format!(
                "parameter {} is not bound in batch row {}",
                short.len() + 1,
                row + 1
            );
            return Err(FluentErrorHelper::invalid_state()
                .message(&message)
                .to_adbc());
        }
        debug!(rows = rows.len(), width, "executing prepared batch");
        let batch = build_parameter_batch(&rows, width)?;
        self.handle.bind(batch)?;
        let update = self.handle.update()?;
        Ok(BatchResult::new(vec![update.affected_rows], rows.len()))
    }
}

statement_common!(PreparedStatement, handle);
