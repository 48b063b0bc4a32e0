// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry of struct types by name.

use crate::types::StructType;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Name-keyed registry of struct types.
///
/// Registration happens once per type; lookups are read-mostly and may
/// run from any number of threads concurrently.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, Arc<StructType>>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a struct type under its declared name.
    ///
    /// Re-registering a name replaces the previous entry.
    pub fn register(&self, struct_type: Arc<StructType>) {
        let name = struct_type.name().to_string();
        let previous = self.types.write().insert(name.clone(), struct_type);
        if previous.is_some() {
            log::warn!("[metarec] replacing registered type {name}");
        } else {
            log::debug!("[metarec] registered type {name}");
        }
    }

    /// Look up a struct type by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<StructType>> {
        self.types.read().get(name).cloned()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Returns `true` if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn sample_type(name: &str) -> Arc<StructType> {
        Arc::new(
            StructType::builder(name)
                .required("id", DataType::Long)
                .build()
                .expect("type"),
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());

        registry.register(sample_type("Asset"));
        assert_eq!(registry.len(), 1);

        let found = registry.lookup("Asset").expect("registered");
        assert_eq!(found.name(), "Asset");
        assert!(registry.lookup("Unknown").is_none());
    }

    #[test]
    fn test_reregistration_replaces() {
        let registry = TypeRegistry::new();
        registry.register(sample_type("Asset"));
        registry.register(sample_type("Asset"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_instances_share_descriptor() {
        let registry = TypeRegistry::new();
        registry.register(sample_type("Asset"));

        let t = registry.lookup("Asset").expect("registered");
        let a = t.create_instance();
        let b = t.create_instance();
        assert!(Arc::ptr_eq(a.schema(), b.schema()));
    }
}
