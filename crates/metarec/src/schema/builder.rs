// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder for struct types.

use crate::errors::SchemaError;
use crate::schema::{AttributeDescriptor, Multiplicity, SchemaDescriptor};
use crate::types::{DataType, StructType};

/// Builder for declaring a struct type attribute by attribute.
///
/// Declaration order is significant: it fixes slot assignment and the
/// order attributes appear in rendered output.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    attributes: Vec<AttributeDescriptor>,
}

impl SchemaBuilder {
    /// Start a builder for the named struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute with an explicit multiplicity.
    pub fn attribute(
        mut self,
        name: impl Into<String>,
        data_type: DataType,
        multiplicity: Multiplicity,
    ) -> Self {
        self.attributes
            .push(AttributeDescriptor::new(name, data_type, multiplicity));
        self
    }

    /// Add a required (non-nullable) attribute.
    pub fn required(self, name: impl Into<String>, data_type: DataType) -> Self {
        self.attribute(name, data_type, Multiplicity::REQUIRED)
    }

    /// Add an optional (nullable) attribute.
    pub fn optional(self, name: impl Into<String>, data_type: DataType) -> Self {
        self.attribute(name, data_type, Multiplicity::OPTIONAL)
    }

    /// Add a collection attribute holding an array of `element`.
    pub fn collection(self, name: impl Into<String>, element: DataType) -> Self {
        self.attribute(
            name,
            DataType::Array(Box::new(element)),
            Multiplicity::COLLECTION,
        )
    }

    /// Freeze the declaration into a schema descriptor.
    pub fn build_schema(self) -> Result<SchemaDescriptor, SchemaError> {
        SchemaDescriptor::new(self.name, self.attributes)
    }

    /// Freeze the declaration into a ready-to-use struct type handler.
    pub fn build(self) -> Result<StructType, SchemaError> {
        Ok(StructType::from_schema(self.build_schema()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StorageKind;

    #[test]
    fn test_builder_preserves_order() {
        let schema = SchemaBuilder::new("Reading")
            .required("sensor", DataType::Text)
            .required("value", DataType::Double)
            .optional("note", DataType::Text)
            .build_schema()
            .expect("schema");

        let names: Vec<_> = schema.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["sensor", "value", "note"]);
        assert_eq!(schema.lane_count(StorageKind::Text), 2);
        assert_eq!(schema.lane_count(StorageKind::Double), 1);
    }

    #[test]
    fn test_collection_uses_array_lane() {
        let schema = SchemaBuilder::new("Bag")
            .collection("items", DataType::Int)
            .build_schema()
            .expect("schema");

        assert_eq!(schema.lane_count(StorageKind::Array), 1);
        let attr = schema.attribute("items").expect("items");
        assert_eq!(attr.multiplicity, Multiplicity::COLLECTION);
    }

    #[test]
    fn test_duplicate_name_fails_build() {
        let result = SchemaBuilder::new("Dup")
            .required("x", DataType::Int)
            .required("x", DataType::Long)
            .build();
        assert!(result.is_err());
    }
}
