// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lane-packed typed records.
//!
//! A [`TypedRecord`] stores its attribute values in one dense array per
//! storage lane instead of one boxed cell per attribute. Lane sizes come
//! straight from the schema descriptor; a lane whose count is zero is not
//! allocated at all. Two bit planes, one word-packed bit per attribute
//! each, track which attributes have ever been assigned and which hold an
//! explicit null, so absence never needs a boxed representation inside
//! the lanes themselves.

use crate::errors::ConversionError;
use crate::record::Value;
use crate::schema::{SchemaDescriptor, Slot, StorageKind};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use num_traits::Zero;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

const LANE: &str = "lane sized by schema";

/// A schema-conformant record with struct-of-arrays storage.
///
/// Created empty from a schema, populated field by field, then usable as
/// an independent value. Lane sizes are fixed for the record's lifetime.
#[derive(Debug, Clone)]
pub struct TypedRecord {
    schema: Arc<SchemaDescriptor>,
    assigned: Box<[u64]>,
    nulls: Box<[u64]>,
    bools: Option<Box<[bool]>>,
    bytes: Option<Box<[i8]>>,
    shorts: Option<Box<[i16]>>,
    ints: Option<Box<[i32]>>,
    longs: Option<Box<[i64]>>,
    floats: Option<Box<[f32]>>,
    doubles: Option<Box<[f64]>>,
    decimals: Option<Box<[Decimal]>>,
    bigints: Option<Box<[BigInt]>>,
    timestamps: Option<Box<[DateTime<Utc>]>>,
    texts: Option<Box<[String]>>,
    arrays: Option<Box<[Vec<Value>]>>,
    maps: Option<Box<[Vec<(Value, Value)>]>>,
    records: Option<Box<[Option<TypedRecord>]>>,
}

fn lane_of<T: Clone>(count: usize, fill: T) -> Option<Box<[T]>> {
    (count > 0).then(|| vec![fill; count].into_boxed_slice())
}

impl TypedRecord {
    /// Allocate an empty record for the given schema: every used lane
    /// sized exactly, zero-count lanes absent, both bit planes clear.
    pub fn new(schema: Arc<SchemaDescriptor>) -> Self {
        let words = schema.len().div_ceil(64);
        Self {
            assigned: vec![0u64; words].into_boxed_slice(),
            nulls: vec![0u64; words].into_boxed_slice(),
            bools: lane_of(schema.lane_count(StorageKind::Bool), false),
            bytes: lane_of(schema.lane_count(StorageKind::Byte), 0i8),
            shorts: lane_of(schema.lane_count(StorageKind::Short), 0i16),
            ints: lane_of(schema.lane_count(StorageKind::Int), 0i32),
            longs: lane_of(schema.lane_count(StorageKind::Long), 0i64),
            floats: lane_of(schema.lane_count(StorageKind::Float), 0f32),
            doubles: lane_of(schema.lane_count(StorageKind::Double), 0f64),
            decimals: lane_of(schema.lane_count(StorageKind::Decimal), Decimal::ZERO),
            bigints: lane_of(schema.lane_count(StorageKind::BigInt), BigInt::zero()),
            timestamps: lane_of(
                schema.lane_count(StorageKind::Timestamp),
                DateTime::<Utc>::UNIX_EPOCH,
            ),
            texts: lane_of(schema.lane_count(StorageKind::Text), String::new()),
            arrays: lane_of(schema.lane_count(StorageKind::Array), Vec::new()),
            maps: lane_of(schema.lane_count(StorageKind::Map), Vec::new()),
            records: lane_of(schema.lane_count(StorageKind::Record), None),
            schema,
        }
    }

    /// Declared type name.
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// The shared schema descriptor of this record's type.
    pub fn schema(&self) -> &Arc<SchemaDescriptor> {
        &self.schema
    }

    /// Whether the named attribute has ever been assigned.
    pub fn is_set(&self, name: &str) -> Result<bool, ConversionError> {
        let pos = self.position(name)?;
        Ok(self.is_assigned(pos))
    }

    /// Read an attribute value.
    ///
    /// Returns `Ok(None)` for an attribute that was never assigned and
    /// `Ok(Some(Value::Null))` for one explicitly assigned null.
    pub fn get(&self, name: &str) -> Result<Option<Value>, ConversionError> {
        let pos = self.position(name)?;
        if !self.is_assigned(pos) {
            return Ok(None);
        }
        if self.null_bit(pos) {
            return Ok(Some(Value::Null));
        }
        Ok(Some(self.load(self.schema.slot(pos))))
    }

    /// Read an attribute as a concrete Rust type.
    ///
    /// Unset and explicit-null attributes both read as `Ok(None)`; use
    /// [`TypedRecord::get`] or [`TypedRecord::is_set`] to tell them apart.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<Option<T>, ConversionError> {
        match self.get(name)? {
            None | Some(Value::Null) => Ok(None),
            Some(v) => T::from_value(&v).map(Some),
        }
    }

    /// Assign an attribute, coercing the value through the attribute's
    /// declared type first. `None` assigns an explicit null, accepted
    /// only when the attribute's multiplicity permits it.
    pub fn set(&mut self, name: &str, value: Option<Value>) -> Result<(), ConversionError> {
        let schema = Arc::clone(&self.schema);
        let pos = match schema.position(name) {
            Some(pos) => pos,
            None => {
                return Err(ConversionError::UnknownAttribute {
                    name: name.to_string(),
                })
            }
        };
        let attr = &schema.attributes()[pos];
        let converted = attr.data_type.convert(value, attr.multiplicity)?;
        self.store(pos, schema.slot(pos), converted);
        Ok(())
    }

    /// Capacity of one storage lane, `None` when the lane is absent.
    pub fn lane_capacity(&self, kind: StorageKind) -> Option<usize> {
        match kind {
            StorageKind::Bool => self.bools.as_ref().map(|l| l.len()),
            StorageKind::Byte => self.bytes.as_ref().map(|l| l.len()),
            StorageKind::Short => self.shorts.as_ref().map(|l| l.len()),
            StorageKind::Int => self.ints.as_ref().map(|l| l.len()),
            StorageKind::Long => self.longs.as_ref().map(|l| l.len()),
            StorageKind::Float => self.floats.as_ref().map(|l| l.len()),
            StorageKind::Double => self.doubles.as_ref().map(|l| l.len()),
            StorageKind::Decimal => self.decimals.as_ref().map(|l| l.len()),
            StorageKind::BigInt => self.bigints.as_ref().map(|l| l.len()),
            StorageKind::Timestamp => self.timestamps.as_ref().map(|l| l.len()),
            StorageKind::Text => self.texts.as_ref().map(|l| l.len()),
            StorageKind::Array => self.arrays.as_ref().map(|l| l.len()),
            StorageKind::Map => self.maps.as_ref().map(|l| l.len()),
            StorageKind::Record => self.records.as_ref().map(|l| l.len()),
        }
    }

    /// Write the indented diagnostic rendering of this record.
    pub fn output(&self, buf: &mut dyn fmt::Write, prefix: &str) -> fmt::Result {
        writeln!(buf, "{prefix}{{")?;
        for attr in self.schema.attributes() {
            write!(buf, "{prefix}\t{} : ", attr.name)?;
            let value = self.get(&attr.name).ok().flatten();
            attr.data_type.output(value.as_ref(), buf, "")?;
            writeln!(buf)?;
        }
        writeln!(buf, "{prefix}}}")
    }

    fn position(&self, name: &str) -> Result<usize, ConversionError> {
        self.schema
            .position(name)
            .ok_or_else(|| ConversionError::UnknownAttribute {
                name: name.to_string(),
            })
    }

    fn is_assigned(&self, pos: usize) -> bool {
        self.assigned[pos / 64] & (1u64 << (pos % 64)) != 0
    }

    fn null_bit(&self, pos: usize) -> bool {
        self.nulls[pos / 64] & (1u64 << (pos % 64)) != 0
    }

    /// Store an already-converted value. A value that does not match its
    /// slot's lane is a caller bug, not a runtime condition.
    fn store(&mut self, pos: usize, slot: Slot, value: Option<Value>) {
        self.assigned[pos / 64] |= 1u64 << (pos % 64);
        let i = slot.index;

        let Some(value) = value else {
            self.nulls[pos / 64] |= 1u64 << (pos % 64);
            if slot.kind == StorageKind::Record {
                self.records.as_mut().expect(LANE)[i] = None;
            }
            return;
        };
        self.nulls[pos / 64] &= !(1u64 << (pos % 64));

        match (slot.kind, value) {
            (StorageKind::Bool, Value::Bool(v)) => self.bools.as_mut().expect(LANE)[i] = v,
            (StorageKind::Byte, Value::Byte(v)) => self.bytes.as_mut().expect(LANE)[i] = v,
            (StorageKind::Short, Value::Short(v)) => self.shorts.as_mut().expect(LANE)[i] = v,
            (StorageKind::Int, Value::Int(v)) => self.ints.as_mut().expect(LANE)[i] = v,
            (StorageKind::Long, Value::Long(v)) => self.longs.as_mut().expect(LANE)[i] = v,
            (StorageKind::Float, Value::Float(v)) => self.floats.as_mut().expect(LANE)[i] = v,
            (StorageKind::Double, Value::Double(v)) => self.doubles.as_mut().expect(LANE)[i] = v,
            (StorageKind::Decimal, Value::Decimal(v)) => {
                self.decimals.as_mut().expect(LANE)[i] = v;
            }
            (StorageKind::BigInt, Value::BigInt(v)) => self.bigints.as_mut().expect(LANE)[i] = v,
            (StorageKind::Timestamp, Value::Timestamp(v)) => {
                self.timestamps.as_mut().expect(LANE)[i] = v;
            }
            (StorageKind::Text, Value::Text(v)) => self.texts.as_mut().expect(LANE)[i] = v,
            (StorageKind::Array, Value::Array(v)) => self.arrays.as_mut().expect(LANE)[i] = v,
            (StorageKind::Map, Value::Map(v)) => self.maps.as_mut().expect(LANE)[i] = v,
            (StorageKind::Record, Value::Record(v)) => {
                self.records.as_mut().expect(LANE)[i] = Some(*v);
            }
            (kind, value) => unreachable!("converted value {value:?} does not fit lane {kind}"),
        }
    }

    fn load(&self, slot: Slot) -> Value {
        let i = slot.index;
        match slot.kind {
            StorageKind::Bool => Value::Bool(self.bools.as_ref().expect(LANE)[i]),
            StorageKind::Byte => Value::Byte(self.bytes.as_ref().expect(LANE)[i]),
            StorageKind::Short => Value::Short(self.shorts.as_ref().expect(LANE)[i]),
            StorageKind::Int => Value::Int(self.ints.as_ref().expect(LANE)[i]),
            StorageKind::Long => Value::Long(self.longs.as_ref().expect(LANE)[i]),
            StorageKind::Float => Value::Float(self.floats.as_ref().expect(LANE)[i]),
            StorageKind::Double => Value::Double(self.doubles.as_ref().expect(LANE)[i]),
            StorageKind::Decimal => Value::Decimal(self.decimals.as_ref().expect(LANE)[i]),
            StorageKind::BigInt => Value::BigInt(self.bigints.as_ref().expect(LANE)[i].clone()),
            StorageKind::Timestamp => {
                Value::Timestamp(self.timestamps.as_ref().expect(LANE)[i])
            }
            StorageKind::Text => Value::Text(self.texts.as_ref().expect(LANE)[i].clone()),
            StorageKind::Array => Value::Array(self.arrays.as_ref().expect(LANE)[i].clone()),
            StorageKind::Map => Value::Map(self.maps.as_ref().expect(LANE)[i].clone()),
            StorageKind::Record => match &self.records.as_ref().expect(LANE)[i] {
                Some(r) => Value::Record(Box::new(r.clone())),
                None => Value::Null,
            },
        }
    }
}

impl PartialEq for TypedRecord {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name()
            && self.assigned == other.assigned
            && self.nulls == other.nulls
            && self.bools == other.bools
            && self.bytes == other.bytes
            && self.shorts == other.shorts
            && self.ints == other.ints
            && self.longs == other.longs
            && self.floats == other.floats
            && self.doubles == other.doubles
            && self.decimals == other.decimals
            && self.bigints == other.bigints
            && self.timestamps == other.timestamps
            && self.texts == other.texts
            && self.arrays == other.arrays
            && self.maps == other.maps
            && self.records == other.records
    }
}

impl fmt::Display for TypedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.output(f, "")
    }
}

/// Trait for reading lane values as concrete Rust types.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ConversionError>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, ConversionError> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(ConversionError::mismatch($name, other)),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(i8, Byte, "byte");
impl_from_value!(i16, Short, "short");
impl_from_value!(i32, Int, "int");
impl_from_value!(i64, Long, "long");
impl_from_value!(f32, Float, "float");
impl_from_value!(f64, Double, "double");
impl_from_value!(Decimal, Decimal, "decimal");
impl_from_value!(DateTime<Utc>, Timestamp, "timestamp");

impl FromValue for BigInt {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::BigInt(v) => Ok(v.clone()),
            other => Err(ConversionError::mismatch("bigint", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            other => Err(ConversionError::mismatch("text", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Multiplicity, SchemaBuilder};
    use crate::types::DataType;

    fn point_schema() -> Arc<SchemaDescriptor> {
        Arc::new(
            SchemaBuilder::new("Point")
                .required("x", DataType::Int)
                .required("y", DataType::Int)
                .optional("label", DataType::Text)
                .build_schema()
                .expect("schema"),
        )
    }

    #[test]
    fn test_unset_reads_as_none() {
        let record = TypedRecord::new(point_schema());
        assert_eq!(record.get("x").expect("get x"), None);
        assert!(!record.is_set("x").expect("is_set"));
    }

    #[test]
    fn test_set_then_get() {
        let mut record = TypedRecord::new(point_schema());
        record.set("x", Some(Value::Int(3))).expect("set x");
        record.set("label", Some(Value::from("origin"))).expect("set label");

        assert_eq!(record.get("x").expect("get"), Some(Value::Int(3)));
        assert_eq!(record.get_as::<i32>("x").expect("get_as"), Some(3));
        assert_eq!(
            record.get_as::<String>("label").expect("get_as"),
            Some("origin".to_string())
        );
        assert!(record.is_set("x").expect("is_set"));
        assert_eq!(record.get("y").expect("get y"), None);
    }

    #[test]
    fn test_explicit_null_distinct_from_unset() {
        let mut record = TypedRecord::new(point_schema());
        record.set("label", None).expect("set null");

        assert!(record.is_set("label").expect("is_set"));
        assert_eq!(record.get("label").expect("get"), Some(Value::Null));
        assert_eq!(record.get_as::<String>("label").expect("get_as"), None);
    }

    #[test]
    fn test_value_overwrites_null() {
        let mut record = TypedRecord::new(point_schema());
        record.set("label", None).expect("set null");
        record.set("label", Some(Value::from("p"))).expect("set value");
        assert_eq!(record.get("label").expect("get"), Some(Value::from("p")));
    }

    #[test]
    fn test_unknown_attribute() {
        let mut record = TypedRecord::new(point_schema());
        let err = record.set("z", Some(Value::Int(1))).expect_err("unknown");
        assert!(matches!(err, ConversionError::UnknownAttribute { .. }));
        assert!(record.get("z").is_err());
    }

    #[test]
    fn test_unused_lanes_absent() {
        let record = TypedRecord::new(point_schema());
        assert_eq!(record.lane_capacity(StorageKind::Int), Some(2));
        assert_eq!(record.lane_capacity(StorageKind::Text), Some(1));
        assert_eq!(record.lane_capacity(StorageKind::Double), None);
        assert_eq!(record.lane_capacity(StorageKind::Record), None);
    }

    #[test]
    fn test_equality_ignores_shared_schema_identity() {
        let schema = point_schema();
        let mut a = TypedRecord::new(Arc::clone(&schema));
        let mut b = TypedRecord::new(schema);
        a.set("x", Some(Value::Int(1))).expect("set");
        assert_ne!(a, b);
        b.set("x", Some(Value::Int(1))).expect("set");
        assert_eq!(a, b);
    }

    #[test]
    fn test_multiplicity_rejects_null() {
        let mut record = TypedRecord::new(point_schema());
        let err = record.set("x", None).expect_err("required");
        assert!(matches!(err, ConversionError::NullNotAllowed { .. }));

        // Failed set leaves the attribute untouched.
        assert_eq!(record.get("x").expect("get"), None);
        assert!(!record.is_set("x").expect("is_set"));
    }

    #[test]
    fn test_widening_through_declared_type() {
        let schema = Arc::new(
            SchemaBuilder::new("Wide")
                .attribute("n", DataType::Long, Multiplicity::REQUIRED)
                .build_schema()
                .expect("schema"),
        );
        let mut record = TypedRecord::new(schema);
        record.set("n", Some(Value::Short(7))).expect("widen");
        assert_eq!(record.get_as::<i64>("n").expect("get_as"), Some(7));
    }
}
