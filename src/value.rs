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

//! Parameter values and their Arrow encoding.
//!
//! ADBC binds parameters as a record batch with one column per `?` marker.
//! Values bound through the fluent API are collected row by row and turned
//! into such a batch right before execution.

use crate::error::{FluentErrorHelper, Result};
use arrow_array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Float32Array, Float64Array,
    Int32Array, Int64Array, NullArray, RecordBatch, RecordBatchOptions, StringArray,
    TimestampMicrosecondArray,
};
use arrow_schema::{DataType, Field, Schema, TimeUnit};
use driverbase::error::ErrorHelper;
use std::sync::Arc;

/// A single parameter or column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Utf8(String),
    Binary(Vec<u8>),
    /// Days since the Unix epoch.
    Date32(i32),
    /// Microseconds since the Unix epoch, without time zone.
    TimestampMicros(i64),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The Arrow type this value is encoded as.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Boolean(_) => DataType::Boolean,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Float32(_) => DataType::Float32,
            Value::Float64(_) => DataType::Float64,
            Value::Utf8(_) => DataType::Utf8,
            Value::Binary(_) => DataType::Binary,
            Value::Date32(_) => DataType::Date32,
            Value::TimestampMicros(_) => DataType::Timestamp(TimeUnit::Microsecond, None),
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Boolean,
    i8 => Int32,
    i16 => Int32,
    i32 => Int32,
    u8 => Int32,
    u16 => Int32,
    i64 => Int64,
    u32 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => Utf8,
    &str => Utf8,
    Vec<u8> => Binary,
    &[u8] => Binary,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

macro_rules! primitive_column {
    ($values:expr, $array:ty, $variant:ident) => {
        Arc::new(
            $values
                .iter()
                .map(|value| match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                })
                .collect::<$array>(),
        ) as ArrayRef
    };
}

/// Builds one Arrow array from a column of values.
///
/// The first non-null value decides the type. A column holding only nulls
/// becomes a [`NullArray`].
pub fn build_column(values: &[&Value]) -> Result<ArrayRef> {
    let Some(first) = values.iter().find(|value| !value.is_null()) else {
        return Ok(Arc::new(NullArray::new(values.len())));
    };
    let data_type = first.data_type();
    if let Some(other) = values
        .iter()
        .find(|value| !value.is_null() && value.data_type() != data_type)
    {
        let message = format!(
            "cannot mix {} and {} values for the same parameter",
            data_type,
            other.data_type()
        );
        return Err(FluentErrorHelper::invalid_argument()
            .message(&message)
            .to_adbc());
    }
    let array = match first {
        Value::Null => unreachable!("first non-null value"),
        Value::Boolean(_) => primitive_column!(values, BooleanArray, Boolean),
        Value::Int32(_) => primitive_column!(values, Int32Array, Int32),
        Value::Int64(_) => primitive_column!(values, Int64Array, Int64),
        Value::Float32(_) => primitive_column!(values, Float32Array, Float32),
        Value::Float64(_) => primitive_column!(values, Float64Array, Float64),
        Value::Date32(_) => primitive_column!(values, Date32Array, Date32),
        Value::TimestampMicros(_) => {
            primitive_column!(values, TimestampMicrosecondArray, TimestampMicros)
        }
        Value::Utf8(_) => Arc::new(
            values
                .iter()
                .map(|value| match value {
                    Value::Utf8(v) => Some(v.as_str()),
                    _ => None,
                })
                .collect::<StringArray>(),
        ) as ArrayRef,
        Value::Binary(_) => Arc::new(
            values
                .iter()
                .map(|value| match value {
                    Value::Binary(v) => Some(v.as_slice()),
                    _ => None,
                })
                .collect::<BinaryArray>(),
        ) as ArrayRef,
    };
    Ok(array)
}

/// Builds the parameter batch for `rows`, each holding `width` values.
///
/// Column `i` (named `"i+1"`) carries the values bound at position `i + 1`.
pub fn build_parameter_batch(rows: &[Vec<Value>], width: usize) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(width);
    let mut columns = Vec::with_capacity(width);
    for index in 0..width {
        let column = rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                values.get(index).ok_or_else(|| {
                    let message = format!(
                        "parameter {} is missing from row {}",
                        index + 1,
                        row + 1
                    );
                    FluentErrorHelper::invalid_argument()
                        .message(&message)
                        .to_adbc()
                })
            })
            .collect::<Result<Vec<&Value>>>()?;
        let array = build_column(&column)?;
        fields.push(Field::new(
            (index + 1).to_string(),
            array.data_type().clone(),
            true,
        ));
        columns.push(array);
    }
    let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options).map_err(
        |error| {
            let message = error.to_string();
            FluentErrorHelper::invalid_argument()
                .message(&message)
                .to_adbc()
        },
    )
}
