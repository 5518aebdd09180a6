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

//! Prepared statements bound by parameter name.

use super::prepared::PreparedStatement;
use super::Handle;
use crate::error::Result;
use crate::named::NamedParameterPlan;
use crate::result::{BatchResult, ExecuteResult, ResultSet, UpdateResult};
use crate::value::Value;
use tracing::{trace, warn};

/// A statement written with `:name` placeholders.
///
/// The command is converted once, when the statement is created, and the
/// converted text is what the driver prepares. Binding a name writes the
/// value to every position the name occupies.
#[derive(Debug)]
pub struct NamedStatement<S> {
    prepared: PreparedStatement<S>,
    plan: NamedParameterPlan,
}

impl<S: adbc_core::Statement> NamedStatement<S> {
    pub(crate) fn prepare(handle: Handle<S>, plan: NamedParameterPlan) -> Result<Self> {
        if plan.literal_placeholders() > 0 && plan.parameter_count() > 0 {
            warn!(
                sql = plan.source(),
                literal = plan.literal_placeholders(),
                "command mixes '?' and named parameters; named positions ignore the '?' markers"
            );
        }
        let prepared = PreparedStatement::prepare(handle, Some(plan.parameter_count()))?;
        Ok(Self { prepared, plan })
    }

    /// The parsed command.
    pub fn plan(&self) -> &NamedParameterPlan {
        &self.plan
    }

    /// Binds `value` to every occurrence of `:name`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let positions = self.plan.bind_positions(name)?;
        let value = value.into();
        trace!(name, ?positions, "binding named parameter");
        for &position in positions {
            self.prepared.set(position, value.clone())?;
        }
        Ok(self)
    }

    pub fn set_null(&mut self, name: &str) -> Result<&mut Self> {
        self.set(name, Value::Null)
    }

    pub fn clear_parameters(&mut self) -> &mut Self {
        self.prepared.clear_parameters();
        self
    }

    /// See [`PreparedStatement::add_batch`].
    pub fn add_batch(&mut self) -> Result<&mut Self> {
        self.prepared.add_batch()?;
        Ok(self)
    }

    pub fn pending(&self) -> usize {
        self.prepared.pending()
    }

    pub fn query(&mut self) -> Result<ResultSet> {
        self.prepared.query()
    }

    pub fn update(&mut self) -> Result<UpdateResult> {
        self.prepared.update()
    }

    pub fn execute(&mut self) -> Result<ExecuteResult> {
        self.prepared.execute()
    }

    pub fn batch(&mut self) -> Result<BatchResult> {
        self.prepared.batch()
    }
}

statement_common!(NamedStatement, prepared.handle);
