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

//! Statements executed from their SQL text without preparation.

use super::Handle;
use crate::error::Result;
use crate::result::{BatchResult, ExecuteResult, ResultSet, UpdateResult};
use tracing::{debug, warn};

/// A statement whose SQL is sent to the driver as is.
///
/// Besides its own SQL, a static statement can queue further commands with
/// [`add_batch`](Self::add_batch) and run them one after another.
#[derive(Debug)]
pub struct StaticStatement<S> {
    handle: Handle<S>,
    batch: Vec<String>,
}

impl<S: adbc_core::Statement> StaticStatement<S> {
    pub(crate) fn new(mut handle: Handle<S>) -> Result<Self> {
        let sql = handle.sql().to_string();
        if !sql.is_empty() {
            handle.set_sql_query(&sql)?;
        }
        Ok(Self {
            handle,
            batch: Vec::new(),
        })
    }

    pub fn query(&mut self) -> Result<ResultSet> {
        self.handle.query()
    }

    pub fn update(&mut self) -> Result<UpdateResult> {
        self.handle.update()
    }

    pub fn execute(&mut self) -> Result<ExecuteResult> {
        self.handle.execute()
    }

    /// Queues `sql` for the next [`batch`](Self::batch).
    pub fn add_batch(&mut self, sql: impl Into<String>) -> &mut Self {
        self.batch.push(sql.into());
        self
    }

    /// Number of queued commands.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    pub fn clear_batch(&mut self) -> &mut Self {
        self.batch.clear();
        self
    }

    /// Runs the queued commands in order, stopping at the first failure.
    ///
    /// The queue is emptied either way. The statement's own SQL is restored
    /// afterwards so [`query`](Self::query) and friends keep working.
    pub fn batch(&mut self) -> Result<BatchResult> {
        let commands = std::mem::take(&mut self.batch);
        debug!(commands = commands.len(), "executing static batch");
        let mut counts = Vec::with_capacity(commands.len());
        let mut outcome = Ok(());
        for command in &commands {
            let result = self
                .handle
                .set_sql_query(command)
                .and_then(|()| self.handle.update());
            match result {
                Ok(update) => counts.push(update.affected_rows),
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        let sql = self.handle.sql().to_string();
        if !sql.is_empty() && !self.handle.is_closed() {
            if let Err(e) = self.handle.set_sql_query(&sql) {
                warn!(error = %e.message, "could not restore statement SQL after batch");
            }
        }
        outcome.map(|()| BatchResult::new(counts, commands.len()))
    }
}

statement_common!(StaticStatement, handle);
