// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct type handlers: conversion of generic records into typed ones.

use crate::errors::{ConversionError, SchemaError};
use crate::record::{TypedRecord, Value};
use crate::schema::{AttributeDescriptor, Multiplicity, SchemaBuilder, SchemaDescriptor};
use crate::types::TypeCategory;
use std::fmt;
use std::sync::Arc;

/// Handler for one struct type.
///
/// Owns the type's shared schema descriptor and drives the conversion of
/// generic records into typed ones. One handler per declared type; every
/// record it produces shares the same descriptor.
///
/// Type names compare by string content everywhere, including the
/// already-typed pass-through check; no interning is assumed.
#[derive(Debug)]
pub struct StructType {
    schema: Arc<SchemaDescriptor>,
}

impl StructType {
    /// Start a fluent builder for a struct type.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Create a struct type from its attribute declarations.
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<AttributeDescriptor>,
    ) -> Result<Self, SchemaError> {
        Ok(Self::from_schema(SchemaDescriptor::new(name, attributes)?))
    }

    /// Wrap an already-built schema descriptor.
    pub fn from_schema(schema: SchemaDescriptor) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    /// Declared type name.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// The shared schema descriptor.
    pub fn schema(&self) -> &Arc<SchemaDescriptor> {
        &self.schema
    }

    /// Constant category of this handler, for upstream dispatch.
    pub fn category(&self) -> TypeCategory {
        TypeCategory::Struct
    }

    /// Allocate an empty record of this type: every used lane pre-sized
    /// from the descriptor, nothing assigned yet.
    pub fn create_instance(&self) -> TypedRecord {
        TypedRecord::new(Arc::clone(&self.schema))
    }

    /// Convert a value into a typed record of this type.
    ///
    /// Null is accepted only when `multiplicity` permits it. A record
    /// that is already of this type passes through unchanged. A generic
    /// record must carry this type's name; it is then converted attribute
    /// by attribute in declaration order, stopping at the first failure,
    /// which is wrapped with struct-level context and kept as the cause.
    pub fn convert(
        &self,
        value: Option<Value>,
        multiplicity: Multiplicity,
    ) -> Result<Option<TypedRecord>, ConversionError> {
        let value = match value {
            None | Some(Value::Null) => return self.convert_null(multiplicity),
            Some(v) => v,
        };
        match value {
            Value::Record(r) if r.type_name() == self.name() => Ok(Some(*r)),
            Value::Struct(g) => {
                if g.type_name() != self.name() {
                    return Err(ConversionError::mismatch(self.name(), &g));
                }
                let mut record = self.create_instance();
                for attr in self.schema.attributes() {
                    let field = g.get(&attr.name).cloned();
                    if let Err(cause) = record.set(&attr.name, field) {
                        log::debug!(
                            "[metarec] conversion to {} failed at attribute {}: {cause}",
                            self.name(),
                            attr.name
                        );
                        return Err(ConversionError::FieldConversion {
                            type_name: self.name().to_string(),
                            value: format!("{g:?}"),
                            source: Box::new(cause),
                        });
                    }
                }
                Ok(Some(record))
            }
            other => Err(ConversionError::mismatch(self.name(), &other)),
        }
    }

    /// Write the diagnostic rendering of `record` into `buf`.
    ///
    /// A null record renders as an open brace followed by the null
    /// marker; a populated one renders one line per declared attribute,
    /// in declaration order, indented one tab past `prefix`.
    pub fn output(
        &self,
        record: Option<&TypedRecord>,
        buf: &mut dyn fmt::Write,
        prefix: &str,
    ) -> fmt::Result {
        match record {
            Some(r) => r.output(buf, prefix),
            None => {
                write!(buf, "{prefix}{{")?;
                writeln!(buf, "<null>")
            }
        }
    }

    fn convert_null(
        &self,
        multiplicity: Multiplicity,
    ) -> Result<Option<TypedRecord>, ConversionError> {
        if multiplicity.nullable() {
            Ok(None)
        } else {
            Err(ConversionError::NullNotAllowed { multiplicity })
        }
    }
}
