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

//! Fluent statements and named parameters for ADBC drivers
//!
//! This crate wraps any driver implementing the `adbc_core` traits with a
//! fluent statement API: static, prepared, named and callable statements,
//! result builders with typed row access, option management and uniform
//! error translation.
//!
//! ## Overview
//!
//! - [`FluentDatabase`] - Wraps a native database and the fluent configuration
//! - [`FluentConnection`] - Creates statements and manages transactions
//! - [`statement`] - The statement kinds
//! - [`named`] - Conversion of `:name` placeholders into `?` markers
//! - [`result`] - Result sets, rows and update counts
//!
//! ## Example
//!
//! ```ignore
//! use fluent_adbc::FluentDatabase;
//!
//! let mut db = FluentDatabase::open(&mut driver, [(OptionDatabase::Uri, uri.into())])?;
//! let mut conn = db.connect()?;
//!
//! let names = conn
//!     .prepare_named("SELECT name FROM users WHERE team = :team AND age > :age")?
//!     .set("team", "core")?
//!     .set("age", 30)?
//!     .query()?
//!     .list(|row| Ok(row.get_str("name")?.to_string()))?;
//! ```

pub mod connection;
pub mod database;
pub mod error;
pub mod named;
pub mod options;
pub mod result;
pub mod statement;
pub mod telemetry;
pub mod value;

#[cfg(test)]
mod testing;

pub use connection::FluentConnection;
pub use database::FluentDatabase;
pub use error::{Error, FluentErrorHelper, Result};
pub use named::NamedParameterPlan;
pub use options::{FluentConfig, StatementOptions};
pub use result::{BatchResult, ExecuteResult, ResultSet, Row, UpdateResult};
pub use statement::{CallableStatement, NamedStatement, PreparedStatement, StaticStatement};
pub use value::Value;
