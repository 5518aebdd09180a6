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

//! Error types and native error translation.
//!
//! Errors raised by this crate are built with the driverbase error framework
//! and surface as ADBC errors, so callers see a single error type whether a
//! failure came from argument validation here or from the wrapped driver.

use arrow_schema::ArrowError;
use driverbase::error::ErrorHelper;

/// Error helper for errors originating in the fluent layer.
#[derive(Debug, Clone)]
pub struct FluentErrorHelper;

impl ErrorHelper for FluentErrorHelper {
    const NAME: &'static str = "Fluent";
}

/// The error type returned by every fallible operation in this crate.
pub type Error = adbc_core::error::Error;

/// A convenient alias for Results with fluent-layer errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Wraps an error returned by the native driver.
///
/// The message gains the `[Fluent] could not <context>` prefix. Status,
/// vendor code, SQLSTATE and details are kept as reported by the driver.
pub fn translate(mut error: Error, context: &str) -> Error {
    error.message = format!(
        "[{}] could not {context}: {}",
        FluentErrorHelper::NAME,
        error.message
    );
    error
}

/// Returns a closure suitable for `map_err` that translates with `context`.
pub(crate) fn native(context: &'static str) -> impl Fn(Error) -> Error {
    move |error| translate(error, context)
}

/// Converts a failure while reading an Arrow stream.
pub(crate) fn arrow(error: ArrowError, context: &'static str) -> Error {
    let message = error.to_string();
    FluentErrorHelper::io()
        .message(&message)
        .context(context)
        .to_adbc()
}

/// The error returned for a name absent from a parameter table.
pub fn parameter_not_found(name: &str) -> Error {
    let message = format!("parameter '{name}' not found");
    FluentErrorHelper::invalid_argument()
        .message(&message)
        .to_adbc()
}

pub(crate) fn statement_closed() -> Error {
    FluentErrorHelper::invalid_state()
        .message("statement is closed")
        .to_adbc()
}
