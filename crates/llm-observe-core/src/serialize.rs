//! Best-effort conversion of call arguments and results into JSON.
//!
//! Provider SDK values can carry state that does not survive a plain
//! structural copy (open handles, custom serializers that refuse to run,
//! maps keyed by composite types). [`serialize`] therefore walks a ladder,
//! richest form first, and never fails:
//!
//! 1. the value's own `Serialize` output through `serde_json`;
//! 2. a lenient structural copy that drops members which refuse to serialize
//!    and stringifies non-string map keys;
//! 3. the value's `Debug` representation.

use std::fmt;

use serde::Serialize;
use serde::ser;
use serde_json::{Map, Number, Value};

use crate::TRACING_TARGET;

/// Converts `value` into a transmittable JSON value. Never fails.
pub fn serialize<T>(value: &T) -> Value
where
    T: Serialize + fmt::Debug + ?Sized,
{
    let canonical_err = match serde_json::to_value(value) {
        Ok(value) => return value,
        Err(err) => err,
    };

    match value.serialize(LenientSerializer) {
        Ok(value) => {
            tracing::trace!(
                target: TRACING_TARGET,
                error = %canonical_err,
                "Canonical serialization failed, recorded structural copy"
            );
            value
        }
        Err(err) => {
            tracing::trace!(
                target: TRACING_TARGET,
                error = %err,
                "Structural copy failed, recorded debug representation"
            );
            Value::String(format!("{value:?}"))
        }
    }
}

#[derive(Debug)]
struct LenientError(String);

impl fmt::Display for LenientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for LenientError {}

impl ser::Error for LenientError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

type LenientResult = Result<Value, LenientError>;

/// Structural copy into `serde_json::Value` that tolerates failing members.
struct LenientSerializer;

fn copy<T: Serialize + ?Sized>(value: &T) -> LenientResult {
    value.serialize(LenientSerializer)
}

fn key_string<T: Serialize + ?Sized>(key: &T) -> Result<String, LenientError> {
    match copy(key)? {
        Value::String(key) => Ok(key),
        other => Ok(other.to_string()),
    }
}

fn tagged(variant: &'static str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(variant.to_string(), value);
    Value::Object(map)
}

impl ser::Serializer for LenientSerializer {
    type Ok = Value;
    type Error = LenientError;

    type SerializeSeq = SeqCopy;
    type SerializeTuple = SeqCopy;
    type SerializeTupleStruct = SeqCopy;
    type SerializeTupleVariant = SeqCopy;
    type SerializeMap = MapCopy;
    type SerializeStruct = MapCopy;
    type SerializeStructVariant = MapCopy;

    fn serialize_bool(self, v: bool) -> LenientResult {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> LenientResult {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> LenientResult {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> LenientResult {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> LenientResult {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> LenientResult {
        Ok(i64::try_from(v)
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(v.to_string())))
    }

    fn serialize_u8(self, v: u8) -> LenientResult {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> LenientResult {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> LenientResult {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> LenientResult {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> LenientResult {
        Ok(u64::try_from(v)
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(v.to_string())))
    }

    fn serialize_f32(self, v: f32) -> LenientResult {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> LenientResult {
        Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    fn serialize_char(self, v: char) -> LenientResult {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> LenientResult {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> LenientResult {
        Ok(Value::Array(v.iter().map(|b| Value::from(*b)).collect()))
    }

    fn serialize_none(self) -> LenientResult {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> LenientResult {
        copy(value)
    }

    fn serialize_unit(self) -> LenientResult {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> LenientResult {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> LenientResult {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> LenientResult {
        copy(value)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> LenientResult {
        Ok(tagged(variant, copy(value).unwrap_or(Value::Null)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCopy, LenientError> {
        Ok(SeqCopy::new(None, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCopy, LenientError> {
        Ok(SeqCopy::new(None, len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqCopy, LenientError> {
        Ok(SeqCopy::new(None, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqCopy, LenientError> {
        Ok(SeqCopy::new(Some(variant), len))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapCopy, LenientError> {
        Ok(MapCopy::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<MapCopy, LenientError> {
        Ok(MapCopy::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<MapCopy, LenientError> {
        Ok(MapCopy::new(Some(variant)))
    }
}

/// Sequence under construction; failing elements become `null` so positions
/// are preserved.
struct SeqCopy {
    variant: Option<&'static str>,
    items: Vec<Value>,
}

impl SeqCopy {
    fn new(variant: Option<&'static str>, len: usize) -> Self {
        Self {
            variant,
            items: Vec::with_capacity(len),
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) {
        self.items.push(copy(value).unwrap_or(Value::Null));
    }

    fn finish(self) -> LenientResult {
        let array = Value::Array(self.items);
        Ok(match self.variant {
            Some(variant) => tagged(variant, array),
            None => array,
        })
    }
}

impl ser::SerializeSeq for SeqCopy {
    type Ok = Value;
    type Error = LenientError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), LenientError> {
        self.push(value);
        Ok(())
    }

    fn end(self) -> LenientResult {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqCopy {
    type Ok = Value;
    type Error = LenientError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), LenientError> {
        self.push(value);
        Ok(())
    }

    fn end(self) -> LenientResult {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqCopy {
    type Ok = Value;
    type Error = LenientError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), LenientError> {
        self.push(value);
        Ok(())
    }

    fn end(self) -> LenientResult {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SeqCopy {
    type Ok = Value;
    type Error = LenientError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), LenientError> {
        self.push(value);
        Ok(())
    }

    fn end(self) -> LenientResult {
        self.finish()
    }
}

/// Map or struct under construction; members that fail to serialize are
/// dropped.
struct MapCopy {
    variant: Option<&'static str>,
    entries: Map<String, Value>,
    pending_key: Option<String>,
}

impl MapCopy {
    fn new(variant: Option<&'static str>) -> Self {
        Self {
            variant,
            entries: Map::new(),
            pending_key: None,
        }
    }

    fn insert<T: Serialize + ?Sized>(&mut self, key: String, value: &T) {
        if let Ok(value) = copy(value) {
            self.entries.insert(key, value);
        }
    }

    fn finish(self) -> LenientResult {
        let object = Value::Object(self.entries);
        Ok(match self.variant {
            Some(variant) => tagged(variant, object),
            None => object,
        })
    }
}

impl ser::SerializeMap for MapCopy {
    type Ok = Value;
    type Error = LenientError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), LenientError> {
        self.pending_key = key_string(key).ok();
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), LenientError> {
        if let Some(key) = self.pending_key.take() {
            self.insert(key, value);
        }
        Ok(())
    }

    fn end(self) -> LenientResult {
        self.finish()
    }
}

impl ser::SerializeStruct for MapCopy {
    type Ok = Value;
    type Error = LenientError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), LenientError> {
        self.insert(key.to_string(), value);
        Ok(())
    }

    fn end(self) -> LenientResult {
        self.finish()
    }
}

impl ser::SerializeStructVariant for MapCopy {
    type Ok = Value;
    type Error = LenientError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), LenientError> {
        self.insert(key.to_string(), value);
        Ok(())
    }

    fn end(self) -> LenientResult {
        self.finish()
    }
}
