//! Shape-directed JSON codec.
//!
//! Same wire format as the generated Go code: structs are objects keyed by
//! their `json` tags in declaration order, and a union value is
//! `{"$type": "<pkg>.<Variant>", "<pkg>.<Variant>": {...}}`.
//!
//! Named references resolve in this order: a custom codec registered for
//! the name, then the registered shape, otherwise [`CodecError::NoCodec`].
//! Collections are coded element by element, so union-typed elements
//! resolve individually.

use serde_json::{Map, Value as Json};
use sumgen_core::{
    ListLike, MapLike, NumberKind, PrimitiveKind, RefName, Shape, StructLike, TypeParam, UnionLike,
};

use crate::error::CodecError;
use crate::registry::Registry;
use crate::value::{Record, Value};

/// Key of the discriminator entry in a union object.
pub const TYPE_KEY: &str = "$type";

/// Record field carrying the payload of a non-struct union variant.
pub const VARIANT_VALUE_FIELD: &str = "Value";

/// Type parameter name → bound argument.
type Bindings = [(String, Shape)];

#[derive(Clone, Copy)]
pub struct JsonCodec<'r> {
    registry: &'r Registry,
}

impl<'r> JsonCodec<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn encode(&self, shape: &Shape, value: &Value) -> Result<Json, CodecError> {
        self.encode_in(shape, value, &[])
            .map_err(|e| at_root(shape.name(), e))
    }

    pub fn decode(&self, shape: &Shape, json: &Json) -> Result<Value, CodecError> {
        self.decode_in(shape, json, &[])
            .map_err(|e| at_root(shape.name(), e))
    }

    /// Encode a value of the registered type `full_name`.
    pub fn encode_named(&self, full_name: &str, value: &Value) -> Result<Json, CodecError> {
        self.encode_registered(full_name, &[], value)
            .map_err(|e| at_root(Some(short_name(full_name)), e))
    }

    /// Decode a value of the registered type `full_name`.
    pub fn decode_named(&self, full_name: &str, json: &Json) -> Result<Value, CodecError> {
        self.decode_registered(full_name, &[], json)
            .map_err(|e| at_root(Some(short_name(full_name)), e))
    }

    pub fn encode_string(&self, shape: &Shape, value: &Value) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&self.encode(shape, value)?)?)
    }

    pub fn decode_str(&self, shape: &Shape, text: &str) -> Result<Value, CodecError> {
        let json: Json = serde_json::from_str(text)?;
        self.decode(shape, &json)
    }

    fn encode_in(&self, shape: &Shape, value: &Value, bindings: &Bindings) -> Result<Json, CodecError> {
        if let Value::Node(id) = value {
            return Err(CodecError::mismatch("inline value", format!("node {id}")));
        }

        match shape {
            Shape::Any => Ok(serde_json::to_value(value)?),
            Shape::PrimitiveLike(p) => encode_primitive(p.kind, value),
            Shape::PointerLike(p) => match value {
                Value::Null => Ok(Json::Null),
                _ => self.encode_in(&p.inner, value, bindings),
            },
            Shape::ListLike(list) => self.encode_list(list, value, bindings),
            Shape::MapLike(map) => self.encode_map(map, value, bindings),
            Shape::RefName(r) => self.encode_ref(r, value, bindings),
            Shape::AliasLike(alias) => self.encode_in(&alias.target, value, bindings),
            Shape::StructLike(st) => self.encode_struct(st, value, bindings),
            Shape::UnionLike(union) => self.encode_union(union, value, bindings),
        }
    }

    fn decode_in(&self, shape: &Shape, json: &Json, bindings: &Bindings) -> Result<Value, CodecError> {
        match shape {
            Shape::Any => Ok(Value::from_json(json)),
            Shape::PrimitiveLike(p) => decode_primitive(p.kind, json),
            Shape::PointerLike(p) => match json {
                Json::Null => Ok(Value::Null),
                _ => self.decode_in(&p.inner, json, bindings),
            },
            Shape::ListLike(list) => self.decode_list(list, json, bindings),
            Shape::MapLike(map) => self.decode_map(map, json, bindings),
            Shape::RefName(r) => self.decode_ref(r, json, bindings),
            Shape::AliasLike(alias) => self.decode_in(&alias.target, json, bindings),
            Shape::StructLike(st) => self.decode_struct(st, json, bindings),
            Shape::UnionLike(union) => self.decode_union(union, json, bindings),
        }
    }

    fn encode_ref(&self, r: &RefName, value: &Value, bindings: &Bindings) -> Result<Json, CodecError> {
        if is_type_param(r) {
            return match bound(bindings, &r.name) {
                Some(shape) => self.encode_in(shape, value, &[]),
                None => self.encode_in(&Shape::Any, value, &[]),
            };
        }
        let args: Vec<Shape> = r.indexed.iter().map(|a| substitute(a, bindings)).collect();
        self.encode_registered(&r.full_name(), &args, value)
    }

    fn decode_ref(&self, r: &RefName, json: &Json, bindings: &Bindings) -> Result<Value, CodecError> {
        if is_type_param(r) {
            return match bound(bindings, &r.name) {
                Some(shape) => self.decode_in(shape, json, &[]),
                None => self.decode_in(&Shape::Any, json, &[]),
            };
        }
        let args: Vec<Shape> = r.indexed.iter().map(|a| substitute(a, bindings)).collect();
        self.decode_registered(&r.full_name(), &args, json)
    }

    fn encode_registered(&self, full_name: &str, args: &[Shape], value: &Value) -> Result<Json, CodecError> {
        if let Some(custom) = self.registry.codec(full_name) {
            return custom.encode(self, value);
        }
        let shape = self
            .registry
            .shape(full_name)
            .ok_or_else(|| CodecError::NoCodec(full_name.to_string()))?;
        let bindings = bind(shape.type_params(), args);
        self.encode_in(shape, value, &bindings)
    }

    fn decode_registered(&self, full_name: &str, args: &[Shape], json: &Json) -> Result<Value, CodecError> {
        if let Some(custom) = self.registry.codec(full_name) {
            return custom.decode(self, json);
        }
        let shape = self
            .registry
            .shape(full_name)
            .ok_or_else(|| CodecError::NoCodec(full_name.to_string()))?;
        let bindings = bind(shape.type_params(), args);
        self.decode_in(shape, json, &bindings)
    }

    fn encode_list(&self, list: &ListLike, value: &Value, bindings: &Bindings) -> Result<Json, CodecError> {
        let items = match value {
            Value::Null => return Ok(Json::Null),
            Value::List(items) => items,
            other => return Err(CodecError::mismatch("list", other.kind())),
        };
        check_len(list, items.len())?;
        items
            .iter()
            .map(|item| self.encode_in(&list.element, item, bindings))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }

    fn decode_list(&self, list: &ListLike, json: &Json, bindings: &Bindings) -> Result<Value, CodecError> {
        let items = match json {
            Json::Null => return Ok(Value::Null),
            Json::Array(items) => items,
            other => return Err(CodecError::mismatch("array", json_kind(other))),
        };
        check_len(list, items.len())?;
        items
            .iter()
            .map(|item| self.decode_in(&list.element, item, bindings))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }

    /// Keys are written in sorted order, like `encoding/json`.
    fn encode_map(&self, map: &MapLike, value: &Value, bindings: &Bindings) -> Result<Json, CodecError> {
        let entries = match value {
            Value::Null => return Ok(Json::Null),
            Value::Map(entries) => entries,
            other => return Err(CodecError::mismatch("map", other.kind())),
        };

        let mut encoded = Vec::with_capacity(entries.len());
        for (key, item) in entries {
            let key = match self.encode_in(&map.key, key, bindings)? {
                Json::String(s) => s,
                other => other.to_string(),
            };
            let item = self
                .encode_in(&map.value, item, bindings)
                .map_err(|e| e.at(&key))?;
            encoded.push((key, item));
        }
        encoded.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Json::Object(encoded.into_iter().collect()))
    }

    fn decode_map(&self, map: &MapLike, json: &Json, bindings: &Bindings) -> Result<Value, CodecError> {
        let object = match json {
            Json::Null => return Ok(Value::Null),
            Json::Object(object) => object,
            other => return Err(CodecError::mismatch("object", json_kind(other))),
        };

        let mut entries = Vec::with_capacity(object.len());
        for (raw, item) in object {
            let key = self.decode_key(&map.key, raw, bindings)?;
            let item = self
                .decode_in(&map.value, item, bindings)
                .map_err(|e| e.at(raw))?;
            entries.push((key, item));
        }
        Ok(Value::Map(entries))
    }

    /// A key is first tried as a JSON string, then as the JSON text it holds.
    fn decode_key(&self, shape: &Shape, raw: &str, bindings: &Bindings) -> Result<Value, CodecError> {
        match self.decode_in(shape, &Json::String(raw.to_string()), bindings) {
            Ok(key) => Ok(key),
            Err(first) => match serde_json::from_str::<Json>(raw) {
                Ok(parsed) => self.decode_in(shape, &parsed, bindings),
                Err(_) => Err(first),
            },
        }
    }

    fn encode_struct(&self, st: &StructLike, value: &Value, bindings: &Bindings) -> Result<Json, CodecError> {
        let record = expect_record(&st.name, value)?;
        if let Some((name, _)) = record.fields.iter().find(|(n, _)| st.field(n).is_none()) {
            return Err(CodecError::UnknownKey {
                key: name.clone(),
                type_name: st.name.clone(),
            });
        }

        let mut object = Map::new();
        for field in wire_fields(st) {
            let Some(item) = record.get(field.name) else {
                continue;
            };
            if field.omit_empty && item.is_empty() {
                continue;
            }
            let json = self
                .encode_in(field.shape, item, bindings)
                .map_err(|e| e.at(field.name))?;
            object.insert(field.key, json);
        }
        Ok(Json::Object(object))
    }

    fn decode_struct(&self, st: &StructLike, json: &Json, bindings: &Bindings) -> Result<Value, CodecError> {
        let object = match json {
            Json::Null => return Ok(Value::Null),
            Json::Object(object) => object,
            other => {
                return Err(CodecError::mismatch(
                    format!("object for {}", st.name),
                    json_kind(other),
                ));
            }
        };

        let fields = wire_fields(st);
        if let Some(key) = object.keys().find(|k| !fields.iter().any(|f| f.key == **k)) {
            return Err(CodecError::UnknownKey {
                key: key.clone(),
                type_name: st.name.clone(),
            });
        }

        let mut record = Record::new(&st.name);
        for field in &fields {
            let Some(item) = object.get(&field.key) else {
                continue;
            };
            let value = self
                .decode_in(field.shape, item, bindings)
                .map_err(|e| e.at(field.name))?;
            record.fields.push((field.name.to_string(), value));
        }
        Ok(Value::Record(record))
    }

    fn encode_union(&self, union: &UnionLike, value: &Value, bindings: &Bindings) -> Result<Json, CodecError> {
        let record = match value {
            Value::Null => return Ok(Json::Null),
            Value::Record(record) => record,
            other => {
                return Err(CodecError::mismatch(
                    format!("union {}", union.name),
                    other.kind(),
                ));
            }
        };
        let variant = union
            .variants
            .iter()
            .find(|v| v.name() == Some(record.type_name.as_str()))
            .ok_or_else(|| CodecError::UnknownVariant {
                union: union.name.clone(),
                variant: record.type_name.clone(),
            })?;

        let payload = match variant {
            Shape::StructLike(st) => self.encode_struct(st, value, bindings),
            other => {
                let inner = record.get(VARIANT_VALUE_FIELD).unwrap_or(&Value::Null);
                self.encode_in(other, inner, bindings)
            }
        }
        .map_err(|e| e.at(&record.type_name))?;

        let key = wire_key(variant);
        let mut object = Map::new();
        object.insert(TYPE_KEY.to_string(), Json::String(key.clone()));
        object.insert(key, payload);
        Ok(Json::Object(object))
    }

    /// Without `$type`, the first variant whose payload key is present wins.
    /// Keys other than `$type` and the variants' payload keys are rejected.
    fn decode_union(&self, union: &UnionLike, json: &Json, bindings: &Bindings) -> Result<Value, CodecError> {
        let object = match json {
            Json::Null => return Ok(Value::Null),
            Json::Object(object) => object,
            other => {
                return Err(CodecError::mismatch(
                    format!("object for {}", union.name),
                    json_kind(other),
                ));
            }
        };

        // Only the discriminator and variant payload keys may appear.
        if let Some(key) = object
            .keys()
            .find(|k| *k != TYPE_KEY && !union.variants.iter().any(|v| wire_key(v) == **k))
        {
            return Err(CodecError::UnknownKey {
                key: key.clone(),
                type_name: union.name.clone(),
            });
        }

        let variant = match object.get(TYPE_KEY) {
            Some(Json::String(tag)) => union
                .variants
                .iter()
                .find(|v| wire_key(v) == *tag)
                .ok_or_else(|| CodecError::UnknownVariant {
                    union: union.name.clone(),
                    variant: tag.clone(),
                })?,
            Some(other) => return Err(CodecError::mismatch("string $type", json_kind(other))),
            None => union
                .variants
                .iter()
                .find(|v| object.contains_key(&wire_key(v)))
                .ok_or_else(|| CodecError::MissingPayload {
                    union: union.name.clone(),
                })?,
        };

        let name = variant.name().unwrap_or_default();
        let payload = object
            .get(&wire_key(variant))
            .ok_or_else(|| CodecError::MissingPayload {
                union: union.name.clone(),
            })?;

        let decoded = match variant {
            Shape::StructLike(st) => self.decode_struct(st, payload, bindings),
            other => self
                .decode_in(other, payload, bindings)
                .map(|inner| Value::Record(Record::new(name).with(VARIANT_VALUE_FIELD, inner))),
        };
        decoded.map_err(|e| e.at(name))
    }
}

struct WireField<'s> {
    name: &'s str,
    key: String,
    shape: &'s Shape,
    omit_empty: bool,
}

fn wire_fields(st: &StructLike) -> Vec<WireField<'_>> {
    st.fields
        .iter()
        .filter_map(|f| {
            let json = f.tags.get("json");
            let key = match json {
                Some(tag) if tag.value == "-" && tag.options.is_empty() => return None,
                Some(tag) if !tag.value.is_empty() => tag.value.clone(),
                _ => f.name.clone(),
            };
            Some(WireField {
                name: &f.name,
                key,
                shape: &f.shape,
                omit_empty: json.is_some_and(|t| t.has_option("omitempty")),
            })
        })
        .collect()
}

/// `<pkg>.<Variant>`, the discriminator and payload key of a variant.
pub fn wire_key(variant: &Shape) -> String {
    let name = variant.name().unwrap_or_default();
    match variant.pkg_name() {
        Some(pkg) if !pkg.is_empty() => format!("{pkg}.{name}"),
        _ => name.to_string(),
    }
}

fn expect_record<'v>(type_name: &str, value: &'v Value) -> Result<&'v Record, CodecError> {
    match value {
        Value::Record(record) if record.type_name == type_name => Ok(record),
        other => Err(CodecError::mismatch(format!("struct {type_name}"), other.kind())),
    }
}

fn encode_primitive(kind: PrimitiveKind, value: &Value) -> Result<Json, CodecError> {
    match (kind, value) {
        (PrimitiveKind::Boolean, Value::Bool(b)) => Ok(Json::Bool(*b)),
        (PrimitiveKind::String, Value::String(s)) => Ok(Json::String(s.clone())),
        (PrimitiveKind::Number(n), value) => encode_number(n, value),
        (kind, other) => Err(CodecError::mismatch(kind.go_name(), other.kind())),
    }
}

fn decode_primitive(kind: PrimitiveKind, json: &Json) -> Result<Value, CodecError> {
    match (kind, json) {
        (PrimitiveKind::Boolean, Json::Bool(b)) => Ok(Value::Bool(*b)),
        (PrimitiveKind::String, Json::String(s)) => Ok(Value::String(s.clone())),
        (PrimitiveKind::Number(n), Json::Number(num)) => decode_number(n, num),
        (kind, other) => Err(CodecError::mismatch(kind.go_name(), json_kind(other))),
    }
}

fn encode_number(kind: NumberKind, value: &Value) -> Result<Json, CodecError> {
    let mismatch = || CodecError::mismatch(kind.go_name(), value.kind());

    if kind.is_float() {
        let f = match value {
            Value::Float(f) => *f,
            Value::Int(i) => *i as f64,
            Value::Uint(u) => *u as f64,
            _ => return Err(mismatch()),
        };
        return serde_json::Number::from_f64(f)
            .map(Json::Number)
            .ok_or_else(mismatch);
    }

    if kind.is_unsigned() {
        let u = match value {
            Value::Uint(u) => *u,
            Value::Int(i) => u64::try_from(*i).map_err(|_| mismatch())?,
            _ => return Err(mismatch()),
        };
        return fits_unsigned(kind, u).then(|| Json::from(u)).ok_or_else(mismatch);
    }

    let i = match value {
        Value::Int(i) => *i,
        Value::Uint(u) => i64::try_from(*u).map_err(|_| mismatch())?,
        _ => return Err(mismatch()),
    };
    fits_signed(kind, i).then(|| Json::from(i)).ok_or_else(mismatch)
}

fn decode_number(kind: NumberKind, num: &serde_json::Number) -> Result<Value, CodecError> {
    let mismatch = || CodecError::mismatch(kind.go_name(), num.to_string());

    if kind.is_float() {
        return num.as_f64().map(Value::Float).ok_or_else(mismatch);
    }
    if kind.is_unsigned() {
        return num
            .as_u64()
            .filter(|u| fits_unsigned(kind, *u))
            .map(Value::Uint)
            .ok_or_else(mismatch);
    }
    num.as_i64()
        .filter(|i| fits_signed(kind, *i))
        .map(Value::Int)
        .ok_or_else(mismatch)
}

fn fits_unsigned(kind: NumberKind, u: u64) -> bool {
    let bits = kind.bits();
    bits >= 64 || u < (1u64 << bits)
}

fn fits_signed(kind: NumberKind, i: i64) -> bool {
    let bits = kind.bits();
    if bits >= 64 {
        return true;
    }
    let limit = 1i64 << (bits - 1);
    (-limit..limit).contains(&i)
}

fn check_len(list: &ListLike, actual: usize) -> Result<(), CodecError> {
    match list.array_len {
        Some(expected) if expected != actual => Err(CodecError::Length { expected, actual }),
        _ => Ok(()),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// A bare reference: a type parameter of the enclosing declaration.
fn is_type_param(r: &RefName) -> bool {
    r.pkg_name.is_empty() && r.pkg_import_name.is_empty() && r.indexed.is_empty()
}

fn bound<'b>(bindings: &'b Bindings, name: &str) -> Option<&'b Shape> {
    bindings.iter().find(|(n, _)| n == name).map(|(_, s)| s)
}

/// Pair declared params with arguments; missing arguments bind to `Any`.
fn bind(params: &[TypeParam], args: &[Shape]) -> Vec<(String, Shape)> {
    params
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.clone(), args.get(i).cloned().unwrap_or(Shape::Any)))
        .collect()
}

/// Replace bound type parameters inside a type argument.
fn substitute(shape: &Shape, bindings: &Bindings) -> Shape {
    match shape {
        Shape::RefName(r) if is_type_param(r) => match bound(bindings, &r.name) {
            Some(shape) if r.is_pointer => Shape::pointer(shape.clone()),
            Some(shape) => shape.clone(),
            None => shape.clone(),
        },
        Shape::RefName(r) => {
            let mut r = r.clone();
            r.indexed = r.indexed.iter().map(|a| substitute(a, bindings)).collect();
            Shape::RefName(r)
        }
        Shape::ListLike(list) => {
            let mut list = list.clone();
            list.element = Box::new(substitute(&list.element, bindings));
            Shape::ListLike(list)
        }
        Shape::MapLike(map) => {
            let mut map = map.clone();
            map.key = Box::new(substitute(&map.key, bindings));
            map.value = Box::new(substitute(&map.value, bindings));
            Shape::MapLike(map)
        }
        Shape::PointerLike(p) => Shape::pointer(substitute(&p.inner, bindings)),
        other => other.clone(),
    }
}

fn short_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

fn at_root(name: Option<&str>, err: CodecError) -> CodecError {
    match name {
        Some(name) => err.at(name),
        None => err,
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod codec_tests;
