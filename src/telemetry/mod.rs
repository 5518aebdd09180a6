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

//! Execution telemetry for fluent connections.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for telemetry collection.
///
/// Telemetry is disabled by default. When enabled, each connection counts
/// executed statements, fetched rows, failures and time spent executing.
/// No SQL text or parameter values are retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Whether telemetry collection is enabled (default: false).
    pub enabled: bool,
}

#[derive(Debug, Default)]
struct Counters {
    executions: AtomicU64,
    rows_fetched: AtomicU64,
    errors: AtomicU64,
    elapsed_micros: AtomicU64,
}

/// A point-in-time copy of the collected counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub executions: u64,
    pub rows_fetched: u64,
    pub errors: u64,
    pub elapsed: Duration,
}

/// Collects driver telemetry data.
///
/// Clones share the same counters, so statements can report into the
/// collector of the connection that created them.
#[derive(Debug, Clone)]
pub struct TelemetryCollector {
    config: TelemetryConfig,
    counters: Arc<Counters>,
}

impl TelemetryCollector {
    /// Creates a new telemetry collector with the given configuration.
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            config,
            counters: Arc::default(),
        }
    }

    /// Returns whether telemetry is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Records a statement execution.
    pub fn record_execution(&self, duration: Duration, rows_fetched: u64) {
        if self.config.enabled {
            let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
            self.counters.executions.fetch_add(1, Ordering::Relaxed);
            self.counters
                .rows_fetched
                .fetch_add(rows_fetched, Ordering::Relaxed);
            self.counters
                .elapsed_micros
                .fetch_add(micros, Ordering::Relaxed);
        }
    }

    /// Records a failed execution.
    pub fn record_error(&self) {
        if self.config.enabled {
            self.counters.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            executions: self.counters.executions.load(Ordering::Relaxed),
            rows_fetched: self.counters.rows_fetched.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
            elapsed: Duration::from_micros(self.counters.elapsed_micros.load(Ordering::Relaxed)),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(TelemetryConfig::default())
    }
}

/// A timer for measuring operation durations.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Starts a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Returns the elapsed duration since the timer was started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
