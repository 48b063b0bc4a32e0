// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema building and value conversion.

use crate::schema::Multiplicity;
use std::error::Error;
use std::fmt;

/// Errors raised while converting values into typed records.
#[derive(Debug)]
pub enum ConversionError {
    /// A null value was supplied where the multiplicity forbids it.
    NullNotAllowed { multiplicity: Multiplicity },
    /// The value cannot be coerced to the expected declared type.
    TypeMismatch { expected: String, value: String },
    /// An attribute of a struct failed its own type conversion.
    ///
    /// The per-attribute cause is kept reachable through
    /// [`Error::source`], never flattened into the message.
    FieldConversion {
        type_name: String,
        value: String,
        source: Box<ConversionError>,
    },
    /// The attribute name is not declared by the schema.
    UnknownAttribute { name: String },
}

impl ConversionError {
    /// Build a [`ConversionError::TypeMismatch`] from an expected type name
    /// and the offending value.
    pub fn mismatch<V: fmt::Debug>(expected: impl Into<String>, value: &V) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            value: format!("{value:?}"),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullNotAllowed { multiplicity } => {
                write!(f, "null value not allowed by multiplicity {multiplicity}")
            }
            Self::TypeMismatch { expected, value } => {
                write!(f, "cannot convert {value} to {expected}")
            }
            Self::FieldConversion { type_name, value, .. } => {
                write!(f, "cannot convert {value} to struct type {type_name}")
            }
            Self::UnknownAttribute { name } => write!(f, "unknown attribute: {name}"),
        }
    }
}

impl Error for ConversionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FieldConversion { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Errors raised while building a schema descriptor.
#[derive(Debug)]
pub enum SchemaError {
    /// Two attributes share one name within a type.
    DuplicateAttribute { type_name: String, name: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAttribute { type_name, name } => {
                write!(f, "duplicate attribute {name} in type {type_name}")
            }
        }
    }
}

impl Error for SchemaError {}
