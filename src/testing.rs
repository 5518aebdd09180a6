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

//! In-memory ADBC driver for unit tests.
//!
//! Every object created from one [`MockDriver`] shares a [`MockState`] that
//! records what the fluent layer sent and holds canned responses.

use crate::connection::FluentConnection;
use crate::options::FluentConfig;
use adbc_core::error::{Error, Result, Status};
use adbc_core::options::{
    InfoCode, ObjectDepth, OptionConnection, OptionDatabase, OptionStatement, OptionValue,
};
use adbc_core::Optionable;
use arrow_array::{
    Array, ArrayRef, Int64Array, RecordBatch, RecordBatchIterator, RecordBatchReader,
};
use arrow_schema::{ArrowError, DataType, Field, Schema};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

type MockReader =
    RecordBatchIterator<std::vec::IntoIter<std::result::Result<RecordBatch, ArrowError>>>;

#[derive(Debug, Default)]
pub struct MockState {
    /// Every `set_sql_query` call.
    pub queries: Vec<String>,
    /// SQL of every `prepare` call.
    pub prepared: Vec<String>,
    /// Every bound parameter batch.
    pub bound: Vec<RecordBatch>,
    /// Returned by successive `execute` calls.
    pub results: VecDeque<Vec<RecordBatch>>,
    /// Returned by successive `execute_update` calls, `Some(1)` when empty.
    pub update_counts: VecDeque<Option<i64>>,
    pub parameter_schema: Option<Schema>,
    /// Fails `get_parameter_schema` with this status instead of not-implemented.
    pub fail_parameter_schema: Option<Status>,
    pub fail_prepare: Option<Status>,
    /// Rejects `set_sql_query` for exactly this text.
    pub fail_sql: Option<String>,
    /// Fails the execution after this many successful ones.
    pub fail_after: Option<(usize, Status)>,
    pub fail_commit: bool,
    pub executions: usize,
    pub options: HashMap<String, OptionValue>,
    pub commits: usize,
    pub rollbacks: usize,
    pub cancels: usize,
}

impl MockState {
    fn check_failure(&mut self) -> Result<()> {
        match self.fail_after.take() {
            Some((after, status)) if after == self.executions => {
                return Err(Error::with_message_and_status("injected failure", status));
            }
            pending => self.fail_after = pending,
        }
        self.executions += 1;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<&OptionValue> {
        self.options.get(key).ok_or_else(|| {
            Error::with_message_and_status(format!("unknown option {key}"), Status::NotFound)
        })
    }
}

pub type Shared = Arc<Mutex<MockState>>;

fn unsupported(what: &str) -> Error {
    Error::with_message_and_status(format!("{what} not supported"), Status::NotImplemented)
}

macro_rules! mock_optionable {
    ($ty:ident, $option:ty) => {
        impl Optionable for $ty {
            type Option = $option;

            fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
                let key = key.as_ref().to_string();
                self.state.lock().unwrap().options.insert(key, value);
                Ok(())
            }

            fn get_option_string(&self, key: Self::Option) -> Result<String> {
                match self.state.lock().unwrap().get(key.as_ref())? {
                    OptionValue::String(value) => Ok(value.clone()),
                    _ => Err(Error::with_message_and_status("not a string", Status::NotFound)),
                }
            }

            fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
                match self.state.lock().unwrap().get(key.as_ref())? {
                    OptionValue::Bytes(value) => Ok(value.clone()),
                    _ => Err(Error::with_message_and_status("not bytes", Status::NotFound)),
                }
            }

            fn get_option_int(&self, key: Self::Option) -> Result<i64> {
                match self.state.lock().unwrap().get(key.as_ref())? {
                    OptionValue::Int(value) => Ok(*value),
                    _ => Err(Error::with_message_and_status("not an int", Status::NotFound)),
                }
            }

            fn get_option_double(&self, key: Self::Option) -> Result<f64> {
                match self.state.lock().unwrap().get(key.as_ref())? {
                    OptionValue::Double(value) => Ok(*value),
                    _ => Err(Error::with_message_and_status("not a double", Status::NotFound)),
                }
            }
        }
    };
}

#[derive(Debug, Default)]
pub struct MockDriver {
    pub state: Shared,
}

#[derive(Debug)]
pub struct MockDatabase {
    state: Shared,
}

#[derive(Debug)]
pub struct MockConnection {
    state: Shared,
}

#[derive(Debug)]
pub struct MockStatement {
    state: Shared,
    sql: Option<String>,
}

mock_optionable!(MockDatabase, OptionDatabase);
mock_optionable!(MockConnection, OptionConnection);
mock_optionable!(MockStatement, OptionStatement);

impl adbc_core::Driver for MockDriver {
    type DatabaseType = MockDatabase;

    fn new_database(&mut self) -> Result<Self::DatabaseType> {
        Ok(MockDatabase {
            state: self.state.clone(),
        })
    }

    fn new_database_with_opts(
        &mut self,
        opts: impl IntoIterator<Item = (OptionDatabase, OptionValue)>,
    ) -> Result<Self::DatabaseType> {
        let mut database = self.new_database()?;
        for (key, value) in opts {
            database.set_option(key, value)?;
        }
        Ok(database)
    }
}

impl adbc_core::Database for MockDatabase {
    type ConnectionType = MockConnection;

    fn new_connection(&self) -> Result<Self::ConnectionType> {
        Ok(MockConnection {
            state: self.state.clone(),
        })
    }

    fn new_connection_with_opts(
        &self,
        opts: impl IntoIterator<Item = (OptionConnection, OptionValue)>,
    ) -> Result<Self::ConnectionType> {
        let mut connection = self.new_connection()?;
        for (key, value) in opts {
            connection.set_option(key, value)?;
        }
        Ok(connection)
    }
}

impl adbc_core::Connection for MockConnection {
    type StatementType = MockStatement;

    fn new_statement(&mut self) -> Result<Self::StatementType> {
        Ok(MockStatement {
            state: self.state.clone(),
            sql: None,
        })
    }

    fn cancel(&mut self) -> Result<()> {
        self.state.lock().unwrap().cancels += 1;
        Ok(())
    }

    fn get_info(&self, _codes: Option<HashSet<InfoCode>>) -> Result<impl RecordBatchReader + Send> {
        Err::<MockReader, _>(unsupported("get_info"))
    }

    fn get_objects(
        &self,
        _depth: ObjectDepth,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: Option<&str>,
        _table_type: Option<Vec<&str>>,
        _column_name: Option<&str>,
    ) -> Result<impl RecordBatchReader + Send> {
        Err::<MockReader, _>(unsupported("get_objects"))
    }

    fn get_table_schema(
        &self,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: &str,
    ) -> Result<Schema> {
        Err(unsupported("get_table_schema"))
    }

    fn get_table_types(&self) -> Result<impl RecordBatchReader + Send> {
        Err::<MockReader, _>(unsupported("get_table_types"))
    }

    fn read_partition(
        &self,
        _partition: impl AsRef<[u8]>,
    ) -> Result<impl RecordBatchReader + Send> {
        Err::<MockReader, _>(unsupported("read_partition"))
    }

    fn commit(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_commit {
            return Err(Error::with_message_and_status("commit refused", Status::IO));
        }
        state.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }

    fn get_statistic_names(&self) -> Result<impl RecordBatchReader + Send> {
        Err::<MockReader, _>(unsupported("get_statistic_names"))
    }

    fn get_statistics(
        &self,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: Option<&str>,
        _approximate: bool,
    ) -> Result<impl RecordBatchReader + Send> {
        Err::<MockReader, _>(unsupported("get_statistics"))
    }
}

impl adbc_core::Statement for MockStatement {
    fn set_sql_query(&mut self, query: impl AsRef<str>) -> Result<()> {
        let query = query.as_ref().to_string();
        let mut state = self.state.lock().unwrap();
        if state.fail_sql.as_deref() == Some(query.as_str()) {
            return Err(Error::with_message_and_status("rejected", Status::InvalidState));
        }
        state.queries.push(query.clone());
        drop(state);
        self.sql = Some(query);
        Ok(())
    }

    fn set_substrait_plan(&mut self, _plan: impl AsRef<[u8]>) -> Result<()> {
        Err(unsupported("substrait"))
    }

    fn prepare(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.fail_prepare.take() {
            return Err(Error::with_message_and_status("syntax error", status));
        }
        let sql = self
            .sql
            .clone()
            .ok_or_else(|| Error::with_message_and_status("no query", Status::InvalidState))?;
        state.prepared.push(sql);
        Ok(())
    }

    fn get_parameter_schema(&self) -> Result<Schema> {
        let state = self.state.lock().unwrap();
        if let Some(status) = &state.fail_parameter_schema {
            return Err(Error::with_message_and_status("describe failed", status.clone()));
        }
        state
            .parameter_schema
            .clone()
            .ok_or_else(|| unsupported("get_parameter_schema"))
    }

    fn bind(&mut self, batch: RecordBatch) -> Result<()> {
        self.state.lock().unwrap().bound.push(batch);
        Ok(())
    }

    fn bind_stream(&mut self, _stream: Box<dyn RecordBatchReader + Send>) -> Result<()> {
        Err(unsupported("bind_stream"))
    }

    fn execute(&mut self) -> Result<impl RecordBatchReader + Send> {
        let mut state = self.state.lock().unwrap();
        state.check_failure()?;
        let batches = state.results.pop_front().unwrap_or_default();
        let schema = batches
            .first()
            .map(|batch| batch.schema())
            .unwrap_or_else(|| Arc::new(Schema::empty()));
        Ok(RecordBatchIterator::new(
            batches.into_iter().map(Ok).collect::<Vec<_>>(),
            schema,
        ))
    }

    fn execute_update(&mut self) -> Result<Option<i64>> {
        let mut state = self.state.lock().unwrap();
        state.check_failure()?;
        Ok(state.update_counts.pop_front().unwrap_or(Some(1)))
    }

    fn execute_schema(&mut self) -> Result<Schema> {
        Err(unsupported("execute_schema"))
    }

    fn execute_partitions(&mut self) -> Result<adbc_core::PartitionedResult> {
        Err(unsupported("execute_partitions"))
    }

    fn cancel(&mut self) -> Result<()> {
        self.state.lock().unwrap().cancels += 1;
        Ok(())
    }
}

/// A fluent connection over a fresh mock, with its shared state.
pub fn mock_connection() -> (FluentConnection<MockConnection>, Shared) {
    let state = Shared::default();
    let native = MockConnection {
        state: state.clone(),
    };
    (FluentConnection::new(native, FluentConfig::default()), state)
}

/// A single `id: Int64` column batch.
pub fn ids(values: &[i64]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
    let column: ArrayRef = Arc::new(Int64Array::from(values.to_vec()));
    RecordBatch::try_new(schema, vec![column]).unwrap()
}

/// Reads an Int64 column of a bound parameter batch.
pub fn int_column(batch: &RecordBatch, index: usize) -> Vec<Option<i64>> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap()
        .iter()
        .collect()
}
