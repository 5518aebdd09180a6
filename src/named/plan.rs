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

//! Parameter tables and parsed named-parameter commands.

use super::scanner;
use crate::error::{self, Result};
use std::collections::HashMap;

/// Ordered mapping from parameter name to its 1-based positions.
///
/// Names iterate in first-occurrence order. Positions for a name are strictly
/// increasing, and the positions of all names together cover `1..=N` exactly
/// once, where `N` is [`ParameterTable::parameter_count`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTable {
    entries: Vec<(String, Vec<usize>)>,
    index: HashMap<String, usize>,
    count: usize,
}

impl ParameterTable {
    pub(super) fn record(&mut self, name: String, position: usize) {
        self.count += 1;
        if let Some(&slot) = self.index.get(&name) {
            self.entries[slot].1.push(position);
            return;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, vec![position]));
    }

    /// Returns the positions recorded for `name`, or `None` if it never occurred.
    pub fn positions(&self, name: &str) -> Option<&[usize]> {
        self.index
            .get(name)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    /// Returns true if `name` occurred in the command.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over the recorded names in first-occurrence order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(name, positions)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> + '_ {
        self.entries
            .iter()
            .map(|(name, positions)| (name.as_str(), positions.as_slice()))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of substitutions, i.e. the highest recorded position.
    pub fn parameter_count(&self) -> usize {
        self.count
    }
}

/// A command parsed once for named binding.
///
/// Holds the source text, its positional conversion and the parameter table.
/// The plan is immutable and can be shared freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedParameterPlan {
    source: String,
    converted: String,
    table: ParameterTable,
    literal_placeholders: usize,
}

impl NamedParameterPlan {
    /// Scans `source` and builds the plan.
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let scan = scanner::parse(&source);
        Self {
            source,
            converted: scan.converted,
            table: scan.table,
            literal_placeholders: scan.literal_placeholders,
        }
    }

    /// The command exactly as supplied.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The command in positional `?` form.
    pub fn converted(&self) -> &str {
        &self.converted
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    pub fn positions(&self, name: &str) -> Option<&[usize]> {
        self.table.positions(name)
    }

    /// Like [`positions`](Self::positions), failing for unknown names.
    pub fn bind_positions(&self, name: &str) -> Result<&[usize]> {
        self.positions(name)
            .ok_or_else(|| error::parameter_not_found(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.table.names()
    }

    /// Number of `?` markers produced from named placeholders.
    pub fn parameter_count(&self) -> usize {
        self.table.parameter_count()
    }

    /// Number of `?` markers that were already in the source.
    ///
    /// Named positions do not account for them.
    pub fn literal_placeholders(&self) -> usize {
        self.literal_placeholders
    }
}
