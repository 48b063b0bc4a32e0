// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared types and their value coercion.

use crate::errors::ConversionError;
use crate::record::Value;
use crate::schema::{Multiplicity, StorageKind};
use crate::types::StructType;
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// Coarse type category, used by dispatch code upstream of the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Primitive,
    Array,
    Map,
    Struct,
}

/// A declared attribute type.
///
/// Closed set: every variant knows how to coerce a runtime value into its
/// canonical representation and how to render one for diagnostics.
/// Scalars accept their own variant, lossless numeric widenings, and a
/// textual form; anything lossy is rejected.
#[derive(Debug, Clone)]
pub enum DataType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    BigInt,
    Timestamp,
    Text,
    Array(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
    Struct(Arc<StructType>),
}

impl DataType {
    /// Display name of this type.
    pub fn name(&self) -> String {
        match self {
            Self::Boolean => "boolean".to_string(),
            Self::Byte => "byte".to_string(),
            Self::Short => "short".to_string(),
            Self::Int => "int".to_string(),
            Self::Long => "long".to_string(),
            Self::Float => "float".to_string(),
            Self::Double => "double".to_string(),
            Self::Decimal => "decimal".to_string(),
            Self::BigInt => "bigint".to_string(),
            Self::Timestamp => "timestamp".to_string(),
            Self::Text => "text".to_string(),
            Self::Array(element) => format!("array<{}>", element.name()),
            Self::Map(key, value) => format!("map<{},{}>", key.name(), value.name()),
            Self::Struct(st) => st.name().to_string(),
        }
    }

    /// Storage lane values of this type occupy.
    pub fn storage_kind(&self) -> StorageKind {
        match self {
            Self::Boolean => StorageKind::Bool,
            Self::Byte => StorageKind::Byte,
            Self::Short => StorageKind::Short,
            Self::Int => StorageKind::Int,
            Self::Long => StorageKind::Long,
            Self::Float => StorageKind::Float,
            Self::Double => StorageKind::Double,
            Self::Decimal => StorageKind::Decimal,
            Self::BigInt => StorageKind::BigInt,
            Self::Timestamp => StorageKind::Timestamp,
            Self::Text => StorageKind::Text,
            Self::Array(_) => StorageKind::Array,
            Self::Map(_, _) => StorageKind::Map,
            Self::Struct(_) => StorageKind::Record,
        }
    }

    /// Type category for upstream dispatch.
    pub fn category(&self) -> TypeCategory {
        match self {
            Self::Array(_) => TypeCategory::Array,
            Self::Map(_, _) => TypeCategory::Map,
            Self::Struct(_) => TypeCategory::Struct,
            _ => TypeCategory::Primitive,
        }
    }

    /// Coerce a value into this type's canonical representation.
    ///
    /// `None` and `Value::Null` both stand for null and are accepted only
    /// when `multiplicity` permits it, in which case the result is
    /// `Ok(None)`.
    pub fn convert(
        &self,
        value: Option<Value>,
        multiplicity: Multiplicity,
    ) -> Result<Option<Value>, ConversionError> {
        let value = match value {
            None | Some(Value::Null) => return self.convert_null(multiplicity),
            Some(v) => v,
        };
        match self {
            Self::Struct(st) => Ok(st
                .convert(Some(value), multiplicity)?
                .map(|r| Value::Record(Box::new(r)))),
            Self::Array(element) => self.convert_array(element, value),
            Self::Map(key, val) => self.convert_map(key, val, value),
            _ => self.convert_scalar(value).map(Some),
        }
    }

    /// Render a value of this type into `buf`, after `prefix`.
    ///
    /// Absent and null values render as `<null>`. Struct values delegate
    /// to their own handler's rendering.
    pub fn output(
        &self,
        value: Option<&Value>,
        buf: &mut dyn fmt::Write,
        prefix: &str,
    ) -> fmt::Result {
        match self {
            Self::Struct(st) => match value {
                Some(Value::Record(r)) => st.output(Some(r), buf, prefix),
                Some(Value::Struct(g)) => write!(buf, "{prefix}{g}"),
                _ => st.output(None, buf, prefix),
            },
            _ => match value {
                None => write!(buf, "{prefix}<null>"),
                Some(v) => write!(buf, "{prefix}{v}"),
            },
        }
    }

    fn convert_null(&self, multiplicity: Multiplicity) -> Result<Option<Value>, ConversionError> {
        if multiplicity.nullable() {
            Ok(None)
        } else {
            Err(ConversionError::NullNotAllowed { multiplicity })
        }
    }

    fn convert_array(
        &self,
        element: &DataType,
        value: Value,
    ) -> Result<Option<Value>, ConversionError> {
        match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let converted = element.convert(Some(item), Multiplicity::OPTIONAL)?;
                    out.push(converted.unwrap_or(Value::Null));
                }
                Ok(Some(Value::Array(out)))
            }
            other => Err(self.mismatch(&other)),
        }
    }

    fn convert_map(
        &self,
        key: &DataType,
        val: &DataType,
        value: Value,
    ) -> Result<Option<Value>, ConversionError> {
        match value {
            Value::Map(entries) => {
                let mut out = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let ck = key
                        .convert(Some(k), Multiplicity::REQUIRED)?
                        .unwrap_or(Value::Null);
                    let cv = val
                        .convert(Some(v), Multiplicity::OPTIONAL)?
                        .unwrap_or(Value::Null);
                    out.push((ck, cv));
                }
                Ok(Some(Value::Map(out)))
            }
            other => Err(self.mismatch(&other)),
        }
    }

    fn convert_scalar(&self, value: Value) -> Result<Value, ConversionError> {
        match (self, value) {
            (Self::Boolean, Value::Bool(v)) => Ok(Value::Bool(v)),
            (Self::Boolean, Value::Text(s)) => self.parse_text(s, Value::Bool),

            (Self::Byte, Value::Byte(v)) => Ok(Value::Byte(v)),
            (Self::Byte, Value::Text(s)) => self.parse_text(s, Value::Byte),

            (Self::Short, Value::Byte(v)) => Ok(Value::Short(v.into())),
            (Self::Short, Value::Short(v)) => Ok(Value::Short(v)),
            (Self::Short, Value::Text(s)) => self.parse_text(s, Value::Short),

            (Self::Int, Value::Byte(v)) => Ok(Value::Int(v.into())),
            (Self::Int, Value::Short(v)) => Ok(Value::Int(v.into())),
            (Self::Int, Value::Int(v)) => Ok(Value::Int(v)),
            (Self::Int, Value::Text(s)) => self.parse_text(s, Value::Int),

            (Self::Long, Value::Byte(v)) => Ok(Value::Long(v.into())),
            (Self::Long, Value::Short(v)) => Ok(Value::Long(v.into())),
            (Self::Long, Value::Int(v)) => Ok(Value::Long(v.into())),
            (Self::Long, Value::Long(v)) => Ok(Value::Long(v)),
            (Self::Long, Value::Text(s)) => self.parse_text(s, Value::Long),

            (Self::Float, Value::Byte(v)) => Ok(Value::Float(v.into())),
            (Self::Float, Value::Short(v)) => Ok(Value::Float(v.into())),
            (Self::Float, Value::Float(v)) => Ok(Value::Float(v)),
            (Self::Float, Value::Text(s)) => self.parse_text(s, Value::Float),

            (Self::Double, Value::Byte(v)) => Ok(Value::Double(v.into())),
            (Self::Double, Value::Short(v)) => Ok(Value::Double(v.into())),
            (Self::Double, Value::Int(v)) => Ok(Value::Double(v.into())),
            (Self::Double, Value::Float(v)) => Ok(Value::Double(v.into())),
            (Self::Double, Value::Double(v)) => Ok(Value::Double(v)),
            (Self::Double, Value::Text(s)) => self.parse_text(s, Value::Double),

            (Self::Decimal, Value::Byte(v)) => Ok(Value::Decimal(Decimal::from(v))),
            (Self::Decimal, Value::Short(v)) => Ok(Value::Decimal(Decimal::from(v))),
            (Self::Decimal, Value::Int(v)) => Ok(Value::Decimal(Decimal::from(v))),
            (Self::Decimal, Value::Long(v)) => Ok(Value::Decimal(Decimal::from(v))),
            (Self::Decimal, Value::Float(v)) => Decimal::try_from(v)
                .map(Value::Decimal)
                .map_err(|_| self.mismatch(&Value::Float(v))),
            (Self::Decimal, Value::Double(v)) => Decimal::try_from(v)
                .map(Value::Decimal)
                .map_err(|_| self.mismatch(&Value::Double(v))),
            (Self::Decimal, Value::Decimal(v)) => Ok(Value::Decimal(v)),
            (Self::Decimal, Value::Text(s)) => self.parse_text(s, Value::Decimal),

            (Self::BigInt, Value::Byte(v)) => Ok(Value::BigInt(BigInt::from(v))),
            (Self::BigInt, Value::Short(v)) => Ok(Value::BigInt(BigInt::from(v))),
            (Self::BigInt, Value::Int(v)) => Ok(Value::BigInt(BigInt::from(v))),
            (Self::BigInt, Value::Long(v)) => Ok(Value::BigInt(BigInt::from(v))),
            (Self::BigInt, Value::BigInt(v)) => Ok(Value::BigInt(v)),
            (Self::BigInt, Value::Text(s)) => self.parse_text(s, Value::BigInt),

            (Self::Timestamp, Value::Timestamp(v)) => Ok(Value::Timestamp(v)),
            (Self::Timestamp, Value::Long(v)) => chrono::DateTime::from_timestamp_millis(v)
                .map(Value::Timestamp)
                .ok_or_else(|| self.mismatch(&Value::Long(v))),
            (Self::Timestamp, Value::Text(s)) => self.parse_text(s, Value::Timestamp),

            (Self::Text, Value::Text(s)) => Ok(Value::Text(s)),

            (_, other) => Err(self.mismatch(&other)),
        }
    }

    fn parse_text<T: std::str::FromStr>(
        &self,
        s: String,
        wrap: fn(T) -> Value,
    ) -> Result<Value, ConversionError> {
        match s.trim().parse::<T>() {
            Ok(v) => Ok(wrap(v)),
            Err(_) => Err(self.mismatch(&Value::Text(s))),
        }
    }

    fn mismatch(&self, value: &Value) -> ConversionError {
        ConversionError::mismatch(self.name(), value)
    }
}
