// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # metarec - Schema-driven typed records
//!
//! A typed record model for dynamically-schema'd metadata repositories:
//! untyped generic records (field name to arbitrary value) are converted
//! into strongly-typed, memory-compact records whose storage layout is
//! fixed once per type by an immutable schema descriptor.
//!
//! Instead of boxing every field, a typed record packs its attributes
//! into one dense array per storage kind (bool, the integer and float
//! widths, decimal, bigint, timestamp, text, array, map, nested record).
//! The schema descriptor assigns every attribute a `(lane, index)`
//! coordinate at build time; records only ever look it up. Lanes no
//! attribute uses are not allocated at all.
//!
//! ## Quick Start
//!
//! ```rust
//! use metarec::{DataType, GenericRecord, Multiplicity, StructType, Value};
//!
//! // Declare a type. Declaration order fixes both the storage layout
//! // and the order attributes render in.
//! let person = StructType::builder("Person")
//!     .required("name", DataType::Text)
//!     .optional("age", DataType::Int)
//!     .build()
//!     .unwrap();
//!
//! // Convert an untyped record into a typed one.
//! let mut input = GenericRecord::new("Person");
//! input.set("name", "Ada");
//! input.set("age", 36i32);
//!
//! let record = person
//!     .convert(Some(Value::Struct(input)), Multiplicity::REQUIRED)
//!     .unwrap()
//!     .expect("non-null input");
//!
//! assert_eq!(record.get_as::<String>("name").unwrap(), Some("Ada".to_string()));
//! assert_eq!(record.get_as::<i32>("age").unwrap(), Some(36));
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StructType`] | Per-type handler: conversion, instance factory, rendering |
//! | [`SchemaDescriptor`] | Immutable per-type layout, shared by all records of the type |
//! | [`TypedRecord`] | Lane-packed runtime record |
//! | [`GenericRecord`] | Untyped conversion input |
//! | [`TypeRegistry`] | Name-keyed registry of struct types |
//!
//! Conversion is fail-fast and synchronous: the first attribute that
//! fails aborts the whole conversion, and the per-attribute cause stays
//! reachable through [`std::error::Error::source`].

/// Error types for schema building and value conversion.
pub mod errors;
/// Runtime records: untyped conversion input and lane-packed typed output.
pub mod record;
/// Schema descriptors: immutable per-type storage layout.
pub mod schema;
/// Declared types: per-kind coercion, struct handlers, and the registry.
pub mod types;

pub use errors::{ConversionError, SchemaError};
pub use record::{FromValue, GenericRecord, TypedRecord, Value};
pub use schema::{
    AttributeDescriptor, Multiplicity, SchemaBuilder, SchemaDescriptor, Slot, StorageKind,
};
pub use types::{DataType, StructType, TypeCategory, TypeRegistry};

/// metarec version string.
pub const VERSION: &str = "0.3.2";
