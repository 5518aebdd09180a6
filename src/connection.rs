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

//! Fluent connection over a native ADBC connection.

use crate::error::{self, Result};
use crate::named::NamedParameterPlan;
use crate::options::FluentConfig;
use crate::statement::{
    rewrite_call_escape, CallableStatement, Handle, NamedStatement, PreparedStatement,
    StaticStatement,
};
use crate::telemetry::{TelemetryCollector, TelemetrySnapshot};
use adbc_core::options::{OptionConnection, OptionValue};
use adbc_core::Optionable;
use tracing::{debug, warn};

/// Represents an active connection wrapped for fluent use.
///
/// A connection creates the statements of every kind. Statements own their
/// native handle, so they do not borrow the connection once created.
#[derive(Debug)]
pub struct FluentConnection<C> {
    native: C,
    config: FluentConfig,
    telemetry: TelemetryCollector,
    auto_commit: bool,
}

impl<C: adbc_core::Connection> FluentConnection<C> {
    /// Wraps `native`. ADBC connections start in auto-commit mode.
    pub fn new(native: C, config: FluentConfig) -> Self {
        let telemetry = TelemetryCollector::new(config.telemetry.clone());
        Self {
            native,
            config,
            telemetry,
            auto_commit: true,
        }
    }

    pub fn config(&self) -> &FluentConfig {
        &self.config
    }

    pub fn native(&self) -> &C {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut C {
        &mut self.native
    }

    pub fn into_native(self) -> C {
        self.native
    }

    /// Counters collected so far, all zero unless telemetry is enabled.
    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    fn handle(&mut self, sql: String) -> Result<Handle<C::StatementType>> {
        let statement = self
            .native
            .new_statement()
            .map_err(error::native("create statement"))?;
        Ok(Handle::new(
            statement,
            sql,
            self.config.statement.clone(),
            self.telemetry.clone(),
        ))
    }

    /// Creates a statement that runs `sql` as is.
    ///
    /// An empty `sql` gives a statement usable only for static batches.
    pub fn statement(
        &mut self,
        sql: impl Into<String>,
    ) -> Result<StaticStatement<C::StatementType>> {
        let handle = self.handle(sql.into())?;
        StaticStatement::new(handle)
    }

    /// Prepares `sql`, whose parameters are written as `?`.
    pub fn prepare(
        &mut self,
        sql: impl Into<String>,
    ) -> Result<PreparedStatement<C::StatementType>> {
        let handle = self.handle(sql.into())?;
        PreparedStatement::prepare(handle, None)
    }

    /// Prepares `sql`, whose parameters are written as `:name`.
    pub fn prepare_named(
        &mut self,
        sql: impl Into<String>,
    ) -> Result<NamedStatement<C::StatementType>> {
        self.prepare_plan(NamedParameterPlan::parse(sql))
    }

    /// Prepares an already parsed command.
    pub fn prepare_plan(
        &mut self,
        plan: NamedParameterPlan,
    ) -> Result<NamedStatement<C::StatementType>> {
        let handle = self.handle(plan.converted().to_string())?;
        NamedStatement::prepare(handle, plan)
    }

    /// Prepares a stored procedure call.
    ///
    /// `sql` may use the `{call proc(...)}` escape and either `?` or `:name`
    /// arguments.
    pub fn call(&mut self, sql: &str) -> Result<CallableStatement<C::StatementType>> {
        let plan = NamedParameterPlan::parse(rewrite_call_escape(sql)?);
        let handle = self.handle(plan.converted().to_string())?;
        CallableStatement::prepare(handle, plan)
    }

    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    pub fn set_auto_commit(&mut self, enabled: bool) -> Result<()> {
        let value = if enabled { "true" } else { "false" };
        self.native
            .set_option(OptionConnection::AutoCommit, OptionValue::String(value.into()))
            .map_err(error::native("set auto-commit"))?;
        self.auto_commit = enabled;
        Ok(())
    }

    pub fn commit(&mut self) -> Result<()> {
        self.native.commit().map_err(error::native("commit"))
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.native.rollback().map_err(error::native("roll back"))
    }

    fn rollback_quietly(&mut self) {
        if let Err(e) = self.rollback() {
            warn!(error = %e.message, "rollback failed");
        }
    }

    /// Runs `f` inside a transaction.
    ///
    /// Auto-commit is switched off for the duration of `f`. The transaction
    /// commits when `f` succeeds and rolls back when `f` or the commit fails.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let restore = self.auto_commit;
        if restore {
            self.set_auto_commit(false)?;
        }
        debug!("transaction started");
        let outcome = match f(self) {
            Ok(value) => match self.commit() {
                Ok(()) => Ok(value),
                Err(e) => {
                    self.rollback_quietly();
                    Err(e)
                }
            },
            Err(e) => {
                self.rollback_quietly();
                Err(e)
            }
        };
        debug!(committed = outcome.is_ok(), "transaction finished");
        if restore {
            if let Err(e) = self.set_auto_commit(true) {
                if outcome.is_ok() {
                    return Err(e);
                }
                warn!(error = %e.message, "could not restore auto-commit");
            }
        }
        outcome
    }

    /// Cancels any execution running on this connection.
    pub fn cancel(&mut self) -> Result<()> {
        self.native.cancel().map_err(error::native("cancel"))
    }

    /// Sets an option on the native connection.
    pub fn set_option(&mut self, key: OptionConnection, value: OptionValue) -> Result<()> {
        self.native
            .set_option(key, value)
            .map_err(error::native("set connection option"))
    }

    pub fn option_string(&self, key: OptionConnection) -> Result<String> {
        self.native
            .get_option_string(key)
            .map_err(error::native("get connection option"))
    }
}
