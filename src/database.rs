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

//! Fluent entry point over a native ADBC database.

use crate::connection::FluentConnection;
use crate::error::{self, Result};
use crate::options::FluentConfig;
use adbc_core::options::{OptionConnection, OptionDatabase, OptionValue};
use adbc_core::Optionable;
use tracing::debug;

/// Holds a native database together with the fluent configuration.
///
/// Options with `fluent.*` keys configure this layer (see
/// [`options`](crate::options)); all other options are passed to the
/// native database unchanged.
#[derive(Debug)]
pub struct FluentDatabase<D> {
    native: D,
    config: FluentConfig,
}

impl<D: adbc_core::Database> FluentDatabase<D> {
    /// Wraps `native` with the default configuration.
    pub fn new(native: D) -> Self {
        Self::with_config(native, FluentConfig::default())
    }

    pub fn with_config(native: D, config: FluentConfig) -> Self {
        Self { native, config }
    }

    /// Creates the native database from `driver` and applies `opts`.
    pub fn open<Drv>(
        driver: &mut Drv,
        opts: impl IntoIterator<Item = (OptionDatabase, OptionValue)>,
    ) -> Result<Self>
    where
        Drv: adbc_core::Driver<DatabaseType = D>,
    {
        let native = driver
            .new_database()
            .map_err(error::native("create database"))?;
        let mut database = Self::new(native);
        for (key, value) in opts {
            database.set_option(key, value)?;
        }
        Ok(database)
    }

    /// Returns the fluent configuration.
    pub fn config(&self) -> &FluentConfig {
        &self.config
    }

    pub fn native(&self) -> &D {
        &self.native
    }

    /// Opens a connection.
    pub fn connect(&self) -> Result<FluentConnection<D::ConnectionType>> {
        self.connect_with_opts([])
    }

    /// Opens a connection with native connection options.
    pub fn connect_with_opts(
        &self,
        opts: impl IntoIterator<Item = (OptionConnection, OptionValue)>,
    ) -> Result<FluentConnection<D::ConnectionType>> {
        let native = self
            .native
            .new_connection_with_opts(opts)
            .map_err(error::native("connect"))?;
        debug!("connection opened");
        Ok(FluentConnection::new(native, self.config.clone()))
    }
}

impl<D: adbc_core::Database> Optionable for FluentDatabase<D> {
    type Option = OptionDatabase;

    fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
        if FluentConfig::owns(&key) {
            return self.config.set_option(&key, &value);
        }
        self.native
            .set_option(key, value)
            .map_err(error::native("set database option"))
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        if FluentConfig::owns(&key) {
            return self.config.get_option_string(&key);
        }
        self.native
            .get_option_string(key)
            .map_err(error::native("get database option"))
    }

    fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
        self.native
            .get_option_bytes(key)
            .map_err(error::native("get database option"))
    }

    fn get_option_int(&self, key: Self::Option) -> Result<i64> {
        if FluentConfig::owns(&key) {
            return self.config.get_option_int(&key);
        }
        self.native
            .get_option_int(key)
            .map_err(error::native("get database option"))
    }

    fn get_option_double(&self, key: Self::Option) -> Result<f64> {
        self.native
            .get_option_double(key)
            .map_err(error::native("get database option"))
    }
}
