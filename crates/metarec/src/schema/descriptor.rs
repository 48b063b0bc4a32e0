// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable per-type layout descriptors.

use crate::errors::SchemaError;
use crate::schema::{Multiplicity, StorageKind};
use crate::types::DataType;
use std::collections::HashSet;

/// One declared attribute of a struct type.
#[derive(Debug, Clone)]
pub struct AttributeDescriptor {
    pub name: String,
    pub data_type: DataType,
    pub multiplicity: Multiplicity,
}

impl AttributeDescriptor {
    /// Create a new attribute descriptor.
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            multiplicity,
        }
    }
}

/// Storage coordinate of one attribute: which lane, and where in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub kind: StorageKind,
    pub index: usize,
}

/// Immutable layout of a struct type.
///
/// Holds the declared attributes in declaration order, the slot each one
/// was assigned, and how many slots each lane needs. Built once when a
/// type is registered and shared by every record of that type; declaration
/// order fixes both slot assignment and output order.
#[derive(Debug)]
pub struct SchemaDescriptor {
    name: String,
    attributes: Vec<AttributeDescriptor>,
    slots: Vec<Slot>,
    lane_counts: [usize; StorageKind::COUNT],
}

impl SchemaDescriptor {
    /// Build a descriptor, assigning every attribute a `(lane, index)`
    /// slot by walking the attributes in declaration order.
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<AttributeDescriptor>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut seen = HashSet::new();
        let mut lane_counts = [0usize; StorageKind::COUNT];
        let mut slots = Vec::with_capacity(attributes.len());

        for attr in &attributes {
            if !seen.insert(attr.name.as_str()) {
                return Err(SchemaError::DuplicateAttribute {
                    type_name: name,
                    name: attr.name.clone(),
                });
            }
            let kind = attr.data_type.storage_kind();
            slots.push(Slot {
                kind,
                index: lane_counts[kind.lane()],
            });
            lane_counts[kind.lane()] += 1;
        }
        drop(seen);

        log::debug!(
            "[metarec] schema {name}: {} attributes over {} lanes",
            attributes.len(),
            lane_counts.iter().filter(|&&c| c > 0).count()
        );

        Ok(Self {
            name,
            attributes,
            slots,
            lane_counts,
        })
    }

    /// Declared type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attributes, in declaration order.
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the type declares no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Get attribute position by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    /// Storage slot of the attribute at `position`.
    pub fn slot(&self, position: usize) -> Slot {
        self.slots[position]
    }

    /// Number of slots the given lane needs.
    pub fn lane_count(&self, kind: StorageKind) -> usize {
        self.lane_counts[kind.lane()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn sample() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "Sample",
            vec![
                AttributeDescriptor::new("a", DataType::Int, Multiplicity::REQUIRED),
                AttributeDescriptor::new("b", DataType::Text, Multiplicity::OPTIONAL),
                AttributeDescriptor::new("c", DataType::Int, Multiplicity::OPTIONAL),
                AttributeDescriptor::new("d", DataType::Boolean, Multiplicity::REQUIRED),
            ],
        )
        .expect("schema")
    }

    #[test]
    fn test_slot_assignment_follows_declaration_order() {
        let schema = sample();
        assert_eq!(schema.slot(0), Slot { kind: StorageKind::Int, index: 0 });
        assert_eq!(schema.slot(1), Slot { kind: StorageKind::Text, index: 0 });
        assert_eq!(schema.slot(2), Slot { kind: StorageKind::Int, index: 1 });
        assert_eq!(schema.slot(3), Slot { kind: StorageKind::Bool, index: 0 });
    }

    #[test]
    fn test_lane_counts_match_assignments() {
        let schema = sample();
        assert_eq!(schema.lane_count(StorageKind::Int), 2);
        assert_eq!(schema.lane_count(StorageKind::Text), 1);
        assert_eq!(schema.lane_count(StorageKind::Bool), 1);
        assert_eq!(schema.lane_count(StorageKind::Double), 0);

        let total: usize = StorageKind::ALL
            .iter()
            .map(|k| schema.lane_count(*k))
            .sum();
        assert_eq!(total, schema.len());
    }

    #[test]
    fn test_lookup_by_name() {
        let schema = sample();
        assert_eq!(schema.position("c"), Some(2));
        assert!(schema.attribute("b").is_some());
        assert!(schema.attribute("missing").is_none());
        assert_eq!(schema.position("missing"), None);
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let result = SchemaDescriptor::new(
            "Dup",
            vec![
                AttributeDescriptor::new("x", DataType::Int, Multiplicity::REQUIRED),
                AttributeDescriptor::new("x", DataType::Text, Multiplicity::OPTIONAL),
            ],
        );
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateAttribute { ref name, .. }) if name == "x"
        ));
    }
}
