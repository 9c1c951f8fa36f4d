use lariat_core::stmt::Value;
use lariat_core::{Error, Result};

use tokio_postgres::{types::Type, Column, Row};

/// Converts a PostgreSQL value within a row to a [`lariat_core::stmt::Value`].
pub(crate) fn from_row(row: &Row, index: usize, column: &Column) -> Result<Value> {
    // Gets the value from the row as Option<T> and maps None to Value::Null.
    macro_rules! get {
        ($ty:ty) => {
            row.try_get::<usize, Option<$ty>>(index)
                .map_err(Error::driver_operation_failed)?
        };
    }

    // NOTE: the inner representation of the PostgreSQL type enum is not
    // accessible, so each type is matched manually.
    let ty = column.type_();
    Ok(if ty == &Type::TEXT || ty == &Type::VARCHAR || ty == &Type::BPCHAR {
        get!(String).map(Value::String).unwrap_or(Value::Null)
    } else if ty == &Type::BOOL {
        get!(bool).map(Value::Bool).unwrap_or(Value::Null)
    } else if ty == &Type::INT2 {
        get!(i16).map(|v| Value::I64(v as i64)).unwrap_or(Value::Null)
    } else if ty == &Type::INT4 {
        get!(i32).map(|v| Value::I64(v as i64)).unwrap_or(Value::Null)
    } else if ty == &Type::INT8 {
        get!(i64).map(Value::I64).unwrap_or(Value::Null)
    } else if ty == &Type::FLOAT4 {
        get!(f32).map(|v| Value::F64(v as f64)).unwrap_or(Value::Null)
    } else if ty == &Type::FLOAT8 {
        get!(f64).map(Value::F64).unwrap_or(Value::Null)
    } else {
        return Err(Error::from_args(format_args!(
            "unsupported PostgreSQL column type `{ty}` for column `{}`",
            column.name()
        )));
    })
}
