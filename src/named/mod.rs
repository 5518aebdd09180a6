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

//! Named parameter support.
//!
//! SQL text written with `:name` placeholders is rewritten into the
//! positional `?` form that native drivers prepare, together with a table
//! recording which positions each name occupies.
//!
//! ```
//! use fluent_adbc::named::NamedParameterPlan;
//!
//! let plan = NamedParameterPlan::parse("SELECT * FROM t WHERE a = :id OR b = :id");
//! assert_eq!(plan.converted(), "SELECT * FROM t WHERE a = ? OR b = ?");
//! assert_eq!(plan.positions("id"), Some(&[1, 2][..]));
//! ```

mod plan;
mod scanner;

pub use plan::{NamedParameterPlan, ParameterTable};
pub use scanner::{is_identifier_part, is_identifier_start, parse, Scan};
