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

//! Configuration for the fluent layer.
//!
//! Options owned by this crate use `fluent.*` keys and are set through
//! [`FluentDatabase`](crate::FluentDatabase) like any other ADBC database
//! option. Everything else is forwarded to the native driver.

use crate::error::{FluentErrorHelper, Result};
use crate::telemetry::TelemetryConfig;
use adbc_core::options::{OptionDatabase, OptionValue};
use driverbase::error::ErrorHelper;

/// Default row limit for query results. Integer, `0` meaning unlimited.
pub const MAX_ROWS: &str = "fluent.statement.max_rows";
/// Enables telemetry collection, `"true"` or `"false"`.
pub const TELEMETRY_ENABLED: &str = "fluent.telemetry.enabled";

/// Options applied by the fluent layer to every statement execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementOptions {
    /// Rows beyond this limit are dropped from query results.
    pub max_rows: Option<usize>,
}

/// Configuration shared by a database and the connections it opens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FluentConfig {
    /// Defaults for new statements.
    pub statement: StatementOptions,
    pub telemetry: TelemetryConfig,
}

fn parse_max_rows(value: &OptionValue) -> Option<Option<usize>> {
    let rows = match value {
        OptionValue::Int(rows) => usize::try_from(*rows).ok()?,
        OptionValue::String(rows) => rows.trim().parse().ok()?,
        _ => return None,
    };
    Some((rows > 0).then_some(rows))
}

fn parse_bool(value: &OptionValue) -> Option<bool> {
    match value {
        OptionValue::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl FluentConfig {
    /// Returns true if `key` is handled by the fluent layer.
    pub fn owns(key: &OptionDatabase) -> bool {
        matches!(key, OptionDatabase::Other(s) if s == MAX_ROWS || s == TELEMETRY_ENABLED)
    }

    /// Applies a `fluent.*` option.
    pub fn set_option(&mut self, key: &OptionDatabase, value: &OptionValue) -> Result<()> {
        let OptionDatabase::Other(name) = key else {
            return Err(FluentErrorHelper::set_unknown_option(key).to_adbc());
        };
        match name.as_str() {
            MAX_ROWS => {
                self.statement.max_rows = parse_max_rows(value)
                    .ok_or_else(|| FluentErrorHelper::set_invalid_option(key, value).to_adbc())?;
            }
            TELEMETRY_ENABLED => {
                self.telemetry.enabled = parse_bool(value)
                    .ok_or_else(|| FluentErrorHelper::set_invalid_option(key, value).to_adbc())?;
            }
            _ => return Err(FluentErrorHelper::set_unknown_option(key).to_adbc()),
        }
        Ok(())
    }

    pub fn get_option_string(&self, key: &OptionDatabase) -> Result<String> {
        match key {
            OptionDatabase::Other(name) if name == MAX_ROWS => {
                Ok(self.statement.max_rows.unwrap_or(0).to_string())
            }
            OptionDatabase::Other(name) if name == TELEMETRY_ENABLED => {
                Ok(self.telemetry.enabled.to_string())
            }
            _ => Err(FluentErrorHelper::get_unknown_option(key).to_adbc()),
        }
    }

    pub fn get_option_int(&self, key: &OptionDatabase) -> Result<i64> {
        match key {
            OptionDatabase::Other(name) if name == MAX_ROWS => {
                let rows = self.statement.max_rows.unwrap_or(0);
                Ok(i64::try_from(rows).unwrap_or(i64::MAX))
            }
            _ => Err(FluentErrorHelper::get_unknown_option(key).to_adbc()),
        }
    }
}
