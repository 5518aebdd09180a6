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

//! Fluent statements over native ADBC statements.
//!
//! Four kinds are provided:
//! - [`StaticStatement`] - SQL executed as given, plus static batches
//! - [`PreparedStatement`] - prepared once, bound by 1-based position
//! - [`NamedStatement`] - prepared from `:name` placeholders, bound by name
//! - [`CallableStatement`] - stored procedure invocation
//!
//! All kinds share option handling and execution through one native handle.

/// Methods shared by every statement kind, reaching the handle at `$handle`.
macro_rules! statement_common {
    ($kind:ident, $($handle:ident).+) => {
        impl<S: adbc_core::Statement> $kind<S> {
            /// The SQL text sent to the driver.
            pub fn sql(&self) -> &str {
                self.$($handle).+.sql()
            }

            pub fn options(&self) -> &crate::options::StatementOptions {
                self.$($handle).+.options()
            }

            /// Limits query results to `rows` rows; `0` removes the limit.
            pub fn max_rows(&mut self, rows: usize) -> &mut Self {
                self.$($handle).+.options_mut().max_rows = (rows > 0).then_some(rows);
                self
            }

            /// Sets an option on the native statement.
            pub fn set_option(
                &mut self,
                key: adbc_core::options::OptionStatement,
                value: adbc_core::options::OptionValue,
            ) -> crate::error::Result<&mut Self> {
                self.$($handle).+.set_option(key, value)?;
                Ok(self)
            }

            pub fn option_string(
                &self,
                key: adbc_core::options::OptionStatement,
            ) -> crate::error::Result<String> {
                self.$($handle).+.option_string(key)
            }

            pub fn option_bytes(
                &self,
                key: adbc_core::options::OptionStatement,
            ) -> crate::error::Result<Vec<u8>> {
                self.$($handle).+.option_bytes(key)
            }

            pub fn option_int(
                &self,
                key: adbc_core::options::OptionStatement,
            ) -> crate::error::Result<i64> {
                self.$($handle).+.option_int(key)
            }

            pub fn option_double(
                &self,
                key: adbc_core::options::OptionStatement,
            ) -> crate::error::Result<f64> {
                self.$($handle).+.option_double(key)
            }

            /// Requests cancellation of a running execution.
            pub fn cancel(&mut self) -> crate::error::Result<()> {
                self.$($handle).+.cancel()
            }

            /// Releases the native statement. Later calls fail.
            pub fn close(&mut self) {
                self.$($handle).+.close()
            }

            pub fn is_closed(&self) -> bool {
                self.$($handle).+.is_closed()
            }
        }
    };
}

mod callable;
mod named;
mod prepared;
mod simple;

pub use callable::{rewrite_call_escape, CallableStatement};
pub use named::NamedStatement;
pub use prepared::PreparedStatement;
pub use simple::StaticStatement;

use crate::error::{self, Result};
use crate::options::StatementOptions;
use crate::result::{ExecuteResult, ResultSet, UpdateResult};
use crate::telemetry::{TelemetryCollector, Timer};
use adbc_core::options::{OptionStatement, OptionValue};
use adbc_core::Optionable;
use arrow_array::RecordBatch;
use tracing::debug;

/// Owns the native statement and runs executions against it.
#[derive(Debug)]
pub(crate) struct Handle<S> {
    statement: Option<S>,
    sql: String,
    options: StatementOptions,
    telemetry: TelemetryCollector,
}

impl<S: adbc_core::Statement> Handle<S> {
    pub(crate) fn new(
        statement: S,
        sql: String,
        options: StatementOptions,
        telemetry: TelemetryCollector,
    ) -> Self {
        Self {
            statement: Some(statement),
            sql,
            options,
            telemetry,
        }
    }

    pub(crate) fn sql(&self) -> &str {
        &self.sql
    }

    pub(crate) fn options(&self) -> &StatementOptions {
        &self.options
    }

    pub(crate) fn options_mut(&mut self) -> &mut StatementOptions {
        &mut self.options
    }

    pub(crate) fn statement(&mut self) -> Result<&mut S> {
        self.statement.as_mut().ok_or_else(error::statement_closed)
    }

    fn statement_ref(&self) -> Result<&S> {
        self.statement.as_ref().ok_or_else(error::statement_closed)
    }

    pub(crate) fn set_sql_query(&mut self, sql: &str) -> Result<()> {
        self.statement()?
            .set_sql_query(sql)
            .map_err(error::native("set SQL query"))
    }

    pub(crate) fn bind(&mut self, batch: RecordBatch) -> Result<()> {
        self.statement()?
            .bind(batch)
            .map_err(error::native("bind parameters"))
    }

    fn finish<T>(
        &self,
        timer: Timer,
        result: Result<T>,
        rows: impl FnOnce(&T) -> u64,
    ) -> Result<T> {
        match &result {
            Ok(value) => {
                let rows = rows(value);
                let elapsed = timer.elapsed();
                debug!(sql = %self.sql, rows, ?elapsed, "statement executed");
                self.telemetry.record_execution(elapsed, rows);
            }
            Err(e) => {
                debug!(sql = %self.sql, error = %e.message, "statement failed");
                self.telemetry.record_error();
            }
        }
        result
    }

    pub(crate) fn query(&mut self) -> Result<ResultSet> {
        let timer = Timer::start();
        let max_rows = self.options.max_rows;
        let result = self
            .statement()?
            .execute()
            .map_err(error::native("execute query"))
            .and_then(|reader| ResultSet::collect(reader, max_rows));
        self.finish(timer, result, |rs| rs.row_count() as u64)
    }

    pub(crate) fn update(&mut self) -> Result<UpdateResult> {
        let timer = Timer::start();
        let result = self
            .statement()?
            .execute_update()
            .map_err(error::native("execute update"))
            .map(|affected_rows| UpdateResult { affected_rows });
        self.finish(timer, result, |_| 0)
    }

    pub(crate) fn execute(&mut self) -> Result<ExecuteResult> {
        self.query().map(ExecuteResult::new)
    }

    pub(crate) fn set_option(&mut self, key: OptionStatement, value: OptionValue) -> Result<()> {
        self.statement()?
            .set_option(key, value)
            .map_err(error::native("set statement option"))
    }

    pub(crate) fn option_string(&self, key: OptionStatement) -> Result<String> {
        self.statement_ref()?
            .get_option_string(key)
            .map_err(error::native("get statement option"))
    }

    pub(crate) fn option_bytes(&self, key: OptionStatement) -> Result<Vec<u8>> {
        self.statement_ref()?
            .get_option_bytes(key)
            .map_err(error::native("get statement option"))
    }

    pub(crate) fn option_int(&self, key: OptionStatement) -> Result<i64> {
        self.statement_ref()?
            .get_option_int(key)
            .map_err(error::native("get statement option"))
    }

    pub(crate) fn option_double(&self, key: OptionStatement) -> Result<f64> {
        self.statement_ref()?
            .get_option_double(key)
            .map_err(error::native("get statement option"))
    }

    pub(crate) fn cancel(&mut self) -> Result<()> {
        self.statement()?
            .cancel()
            .map_err(error::native("cancel statement"))
    }

    pub(crate) fn close(&mut self) {
        if self.statement.take().is_some() {
            debug!(sql = %self.sql, "statement closed");
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.statement.is_none()
    }
}
