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

//! Typed access to a single row of a result set.

use crate::error::{FluentErrorHelper, Result};
use crate::value::Value;
use arrow_array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, LargeBinaryArray, LargeStringArray,
    RecordBatch, StringArray, TimestampMicrosecondArray, UInt16Array, UInt32Array, UInt8Array,
};
use arrow_schema::{DataType, Schema, TimeUnit};
use driverbase::error::ErrorHelper;

/// Something that identifies a column: its 0-based index or its name.
pub trait ColumnIndex {
    fn column_index(&self, schema: &Schema) -> Result<usize>;
}

impl ColumnIndex for usize {
    fn column_index(&self, schema: &Schema) -> Result<usize> {
        if *self < schema.fields().len() {
            return Ok(*self);
        }
        let message = format!(
            "column index {} out of range for {} columns",
            self,
            schema.fields().len()
        );
        Err(FluentErrorHelper::invalid_argument()
            .message(&message)
            .to_adbc())
    }
}

impl ColumnIndex for &str {
    fn column_index(&self, schema: &Schema) -> Result<usize> {
        schema.index_of(self).map_err(|_| {
            let message = format!("no column named '{self}'");
            FluentErrorHelper::invalid_argument()
                .message(&message)
                .to_adbc()
        })
    }
}

/// A row borrowed from a [`ResultSet`](super::ResultSet).
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    batch: &'a RecordBatch,
    index: usize,
}

fn downcast<'a, T: Array + 'static>(array: &'a ArrayRef) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        let message = format!("unexpected array layout for {}", array.data_type());
        FluentErrorHelper::invalid_state()
            .message(&message)
            .to_adbc()
    })
}

fn mismatch(wanted: &str, found: &DataType) -> crate::error::Error {
    let message = format!("cannot read {found} column as {wanted}");
    FluentErrorHelper::invalid_argument()
        .message(&message)
        .to_adbc()
}

macro_rules! required {
    ($(#[$doc:meta])* $name:ident => $optional:ident -> $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self, column: impl ColumnIndex) -> Result<$ty> {
            let index = self.resolve(&column)?;
            self.$optional(index)?.ok_or_else(|| self.null_error(index))
        }
    };
}

impl<'a> Row<'a> {
    pub(crate) fn new(batch: &'a RecordBatch, index: usize) -> Self {
        Self { batch, index }
    }

    /// Position of this row inside its batch.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column_count(&self) -> usize {
        self.batch.num_columns()
    }

    fn resolve(&self, column: &impl ColumnIndex) -> Result<usize> {
        column.column_index(self.batch.schema_ref())
    }

    fn null_error(&self, index: usize) -> crate::error::Error {
        let message = format!(
            "column '{}' is null",
            self.batch.schema_ref().field(index).name()
        );
        FluentErrorHelper::invalid_argument()
            .message(&message)
            .to_adbc()
    }

    /// The column array when the value at this row is not null.
    fn present(&self, column: impl ColumnIndex) -> Result<Option<&'a ArrayRef>> {
        let index = self.resolve(&column)?;
        let array = self.batch.column(index);
        Ok((!array.is_null(self.index)).then_some(array))
    }

    pub fn is_null(&self, column: impl ColumnIndex) -> Result<bool> {
        Ok(self.present(column)?.is_none())
    }

    pub fn get_opt_bool(&self, column: impl ColumnIndex) -> Result<Option<bool>> {
        let Some(array) = self.present(column)? else {
            return Ok(None);
        };
        match array.data_type() {
            DataType::Boolean => Ok(Some(downcast::<BooleanArray>(array)?.value(self.index))),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn get_opt_i32(&self, column: impl ColumnIndex) -> Result<Option<i32>> {
        let Some(array) = self.present(column)? else {
            return Ok(None);
        };
        let i = self.index;
        let value = match array.data_type() {
            DataType::Int8 => i32::from(downcast::<Int8Array>(array)?.value(i)),
            DataType::Int16 => i32::from(downcast::<Int16Array>(array)?.value(i)),
            DataType::Int32 => downcast::<Int32Array>(array)?.value(i),
            DataType::UInt8 => i32::from(downcast::<UInt8Array>(array)?.value(i)),
            DataType::UInt16 => i32::from(downcast::<UInt16Array>(array)?.value(i)),
            other => return Err(mismatch("i32", other)),
        };
        Ok(Some(value))
    }

    /// Reads an integer column, widening smaller integer types.
    pub fn get_opt_i64(&self, column: impl ColumnIndex) -> Result<Option<i64>> {
        let Some(array) = self.present(column)? else {
            return Ok(None);
        };
        let i = self.index;
        let value = match array.data_type() {
            DataType::Int8 => i64::from(downcast::<Int8Array>(array)?.value(i)),
            DataType::Int16 => i64::from(downcast::<Int16Array>(array)?.value(i)),
            DataType::Int32 => i64::from(downcast::<Int32Array>(array)?.value(i)),
            DataType::Int64 => downcast::<Int64Array>(array)?.value(i),
            DataType::UInt8 => i64::from(downcast::<UInt8Array>(array)?.value(i)),
            DataType::UInt16 => i64::from(downcast::<UInt16Array>(array)?.value(i)),
            DataType::UInt32 => i64::from(downcast::<UInt32Array>(array)?.value(i)),
            other => return Err(mismatch("i64", other)),
        };
        Ok(Some(value))
    }

    pub fn get_opt_f64(&self, column: impl ColumnIndex) -> Result<Option<f64>> {
        let Some(array) = self.present(column)? else {
            return Ok(None);
        };
        let value = match array.data_type() {
            DataType::Float32 => f64::from(downcast::<Float32Array>(array)?.value(self.index)),
            DataType::Float64 => downcast::<Float64Array>(array)?.value(self.index),
            other => return Err(mismatch("f64", other)),
        };
        Ok(Some(value))
    }

    pub fn get_opt_str(&self, column: impl ColumnIndex) -> Result<Option<&'a str>> {
        let Some(array) = self.present(column)? else {
            return Ok(None);
        };
        let value = match array.data_type() {
            DataType::Utf8 => downcast::<StringArray>(array)?.value(self.index),
            DataType::LargeUtf8 => downcast::<LargeStringArray>(array)?.value(self.index),
            other => return Err(mismatch("string", other)),
        };
        Ok(Some(value))
    }

    pub fn get_opt_bytes(&self, column: impl ColumnIndex) -> Result<Option<&'a [u8]>> {
        let Some(array) = self.present(column)? else {
            return Ok(None);
        };
        let value = match array.data_type() {
            DataType::Binary => downcast::<BinaryArray>(array)?.value(self.index),
            DataType::LargeBinary => downcast::<LargeBinaryArray>(array)?.value(self.index),
            other => return Err(mismatch("bytes", other)),
        };
        Ok(Some(value))
    }

    required!(get_bool => get_opt_bool -> bool);
    required!(get_i32 => get_opt_i32 -> i32);
    required!(
        /// Like [`get_opt_i64`](Self::get_opt_i64), failing on null.
        get_i64 => get_opt_i64 -> i64
    );
    required!(get_f64 => get_opt_f64 -> f64);
    required!(get_str => get_opt_str -> &'a str);
    required!(get_bytes => get_opt_bytes -> &'a [u8]);

    /// Reads any supported column as a [`Value`].
    pub fn get_value(&self, column: impl ColumnIndex) -> Result<Value> {
        let index = self.resolve(&column)?;
        let array = self.batch.column(index);
        if array.is_null(self.index) {
            return Ok(Value::Null);
        }
        let value = match array.data_type() {
            DataType::Boolean => Value::Boolean(self.get_bool(index)?),
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::UInt8
            | DataType::UInt16 => Value::Int32(self.get_i32(index)?),
            DataType::Int64 | DataType::UInt32 => Value::Int64(self.get_i64(index)?),
            DataType::Float32 => Value::Float32(downcast::<Float32Array>(array)?.value(self.index)),
            DataType::Float64 => Value::Float64(self.get_f64(index)?),
            DataType::Utf8 | DataType::LargeUtf8 => Value::Utf8(self.get_str(index)?.to_string()),
            DataType::Binary | DataType::LargeBinary => {
                Value::Binary(self.get_bytes(index)?.to_vec())
            }
            DataType::Date32 => Value::Date32(downcast::<Date32Array>(array)?.value(self.index)),
            DataType::Timestamp(TimeUnit::Microsecond, _) => Value::TimestampMicros(
                downcast::<TimestampMicrosecondArray>(array)?.value(self.index),
            ),
            other => {
                let message = format!("reading {other} columns");
                return Err(FluentErrorHelper::not_implemented()
                    .message(&message)
                    .to_adbc());
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adbc_core::error::Status;
    use arrow_schema::Field;
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("small", DataType::Int16, true),
            Field::new("name", DataType::Utf8, true),
            Field::new("score", DataType::Float32, true),
            Field::new("active", DataType::Boolean, true),
            Field::new("blob", DataType::Binary, true),
            Field::new("day", DataType::Date32, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![1, 2])),
            Arc::new(Int16Array::from(vec![Some(7), None])),
            Arc::new(StringArray::from(vec![Some("ada"), None])),
            Arc::new(Float32Array::from(vec![Some(0.5), None])),
            Arc::new(BooleanArray::from(vec![Some(true), None])),
            Arc::new(BinaryArray::from(vec![Some(&b"\x01\x02"[..]), None])),
            Arc::new(Date32Array::from(vec![Some(19_000), None])),
        ];
        RecordBatch::try_new(schema, columns).unwrap()
    }

    #[test]
    fn test_typed_getters() {
        let batch = batch();
        let row = Row::new(&batch, 0);
        assert_eq!(row.get_i64("id").unwrap(), 1);
        assert_eq!(row.get_i64("small").unwrap(), 7);
        assert_eq!(row.get_i32(1).unwrap(), 7);
        assert_eq!(row.get_str("name").unwrap(), "ada");
        assert_eq!(row.get_f64("score").unwrap(), 0.5);
        assert!(row.get_bool("active").unwrap());
        assert_eq!(row.get_bytes("blob").unwrap(), &[1, 2]);
        assert_eq!(row.column_count(), 7);
    }

    #[test]
    fn test_null_handling() {
        let batch = batch();
        let row = Row::new(&batch, 1);
        assert!(row.is_null("name").unwrap());
        assert!(!row.is_null("id").unwrap());
        assert_eq!(row.get_opt_str("name").unwrap(), None);
        assert_eq!(row.get_opt_i64("small").unwrap(), None);
        let error = row.get_str("name").unwrap_err();
        assert_eq!(error.status, Status::InvalidArguments);
        assert!(error.message.contains("column 'name' is null"));
    }

    #[test]
    fn test_type_mismatch() {
        let batch = batch();
        let row = Row::new(&batch, 0);
        let error = row.get_i64("name").unwrap_err();
        assert!(error.message.contains("cannot read Utf8 column as i64"));
        assert!(row.get_i32("id").is_err());
    }

    #[test]
    fn test_unknown_column() {
        let batch = batch();
        let row = Row::new(&batch, 0);
        assert!(row
            .get_i64("missing")
            .unwrap_err()
            .message
            .contains("no column named 'missing'"));
        assert!(row
            .get_i64(99)
            .unwrap_err()
            .message
            .contains("out of range"));
    }

    #[test]
    fn test_get_value() {
        let batch = batch();
        let row = Row::new(&batch, 0);
        assert_eq!(row.get_value("id").unwrap(), Value::Int64(1));
        assert_eq!(row.get_value("small").unwrap(), Value::Int32(7));
        assert_eq!(row.get_value("name").unwrap(), Value::from("ada"));
        assert_eq!(row.get_value("score").unwrap(), Value::Float32(0.5));
        assert_eq!(row.get_value("day").unwrap(), Value::Date32(19_000));
        assert_eq!(Row::new(&batch, 1).get_value("name").unwrap(), Value::Null);
    }
}
