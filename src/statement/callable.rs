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

//! Stored procedure calls.

use super::prepared::PreparedStatement;
use super::Handle;
use crate::error::{FluentErrorHelper, Result};
use crate::named::NamedParameterPlan;
use crate::result::{ExecuteResult, ResultSet, UpdateResult};
use crate::value::Value;
use driverbase::error::ErrorHelper;
use std::borrow::Cow;
use tracing::warn;

/// Rewrites the `{call proc(...)}` escape into `CALL proc(...)`.
///
/// Text that is not a call escape is returned unchanged. The `{? = call ...}`
/// form needs an output parameter, which ADBC cannot express.
pub fn rewrite_call_escape(sql: &str) -> Result<Cow<'_, str>> {
    let trimmed = sql.trim();
    let Some(inner) = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Ok(Cow::Borrowed(sql));
    };
    let inner = inner.trim();
    if inner.starts_with('?') {
        return Err(FluentErrorHelper::not_implemented()
            .message("output parameters in call escapes")
            .to_adbc());
    }
    match inner.get(..4) {
        Some(keyword) if keyword.eq_ignore_ascii_case("call") => {
            let rest = &inner[4..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return Ok(Cow::Owned(format!("CALL{rest}")));
            }
            Ok(Cow::Borrowed(sql))
        }
        _ => Ok(Cow::Borrowed(sql)),
    }
}

/// A stored procedure invocation.
///
/// Arguments may be written as `?` and bound by position, or as `:name` and
/// bound by name. Results come back as an [`ExecuteResult`].
#[derive(Debug)]
pub struct CallableStatement<S> {
    prepared: PreparedStatement<S>,
    plan: NamedParameterPlan,
}

impl<S: adbc_core::Statement> CallableStatement<S> {
    /// Prepares the converted form of `plan`, whose source is already rewritten.
    pub(crate) fn prepare(handle: Handle<S>, plan: NamedParameterPlan) -> Result<Self> {
        if plan.literal_placeholders() > 0 && plan.parameter_count() > 0 {
            warn!(
                sql = plan.source(),
                literal = plan.literal_placeholders(),
                "call mixes '?' and named arguments; named positions ignore the '?' markers"
            );
        }
        let parameter_count = (plan.parameter_count() > 0).then(|| plan.parameter_count());
        let prepared = PreparedStatement::prepare(handle, parameter_count)?;
        Ok(Self { prepared, plan })
    }

    pub fn plan(&self) -> &NamedParameterPlan {
        &self.plan
    }

    /// Binds an argument by 1-based position.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self> {
        self.prepared.set(index, value)?;
        Ok(self)
    }

    /// Binds an argument written as `:name`.
    pub fn set_named(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let positions = self.plan.bind_positions(name)?;
        let value = value.into();
        for &position in positions {
            self.prepared.set(position, value.clone())?;
        }
        Ok(self)
    }

    pub fn clear_parameters(&mut self) -> &mut Self {
        self.prepared.clear_parameters();
        self
    }

    /// Invokes the procedure.
    pub fn call(&mut self) -> Result<ExecuteResult> {
        self.prepared.execute()
    }

    /// Invokes a procedure known to return rows.
    pub fn query(&mut self) -> Result<ResultSet> {
        self.prepared.query()
    }

    /// Invokes a procedure for its side effects.
    pub fn update(&mut self) -> Result<UpdateResult> {
        self.prepared.update()
    }
}

statement_common!(CallableStatement, prepared.handle);
