//! JSON form of record keys and values.
//!
//! Without schemas a key or value is plain JSON. With schemas it is an envelope
//! `{"schema": ..., "payload": ...}` where the schema uses the Kafka Connect JSON layout.

use std::num::NonZeroUsize;

use enricher::data::Schema;
use enricher::data::SchemaBuilder;
use enricher::data::SchemaRef;
use enricher::data::Struct;
use enricher::data::Type;
use enricher::data::Value;
use lru::LruCache;
use serde_json::json;
use serde_json::Map;
use serde_json::Number;

use crate::error::Error;
use crate::error::Result;

pub const DEFAULT_INTERNED_SCHEMAS: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(v) => v,
    None => unreachable!(),
};

pub struct JsonConverter {
    schemas_enable: bool,
    // identical schema text resolves to the same instance while it stays cached
    interned: LruCache<String, SchemaRef>,
}

impl JsonConverter {
    pub fn new(schemas_enable: bool) -> Self {
        Self::with_capacity(schemas_enable, DEFAULT_INTERNED_SCHEMAS)
    }

    pub fn with_capacity(schemas_enable: bool, cap: NonZeroUsize) -> Self {
        Self {
            schemas_enable,
            interned: LruCache::new(cap),
        }
    }

    pub fn interned(&self) -> usize {
        self.interned.len()
    }

    pub fn to_connect(&mut self, json: serde_json::Value) -> Result<(Option<SchemaRef>, Value)> {
        if !self.schemas_enable {
            return Ok((None, schemaless_value(json)?));
        }

        let mut envelope = match json {
            serde_json::Value::Object(obj) => obj,
            serde_json::Value::Null => return Ok((None, Value::Null)),
            other => {
                return Err(Error::Convert(format!(
                    "expected schema envelope, got {other}"
                )));
            }
        };
        let payload = envelope
            .remove("payload")
            .ok_or_else(|| Error::Convert("envelope without payload".to_string()))?;
        let schema = match envelope.remove("schema") {
            None | Some(serde_json::Value::Null) => return Ok((None, schemaless_value(payload)?)),
            Some(schema) => self.intern(&schema)?,
        };

        let value = value_with_schema(&schema, &payload)?;
        Ok((Some(schema), value))
    }

    pub fn from_connect(
        &self,
        schema: Option<&SchemaRef>,
        value: &Value,
    ) -> Result<serde_json::Value> {
        let payload = json_value(value)?;
        if !self.schemas_enable {
            return Ok(payload);
        }

        let schema = match schema {
            Some(schema) => schema_json(schema),
            None => serde_json::Value::Null,
        };
        Ok(json!({ "schema": schema, "payload": payload }))
    }

    fn intern(&mut self, json: &serde_json::Value) -> Result<SchemaRef> {
        let text = json.to_string();
        if let Some(schema) = self.interned.get(&text) {
            return Ok(schema.clone());
        }

        let schema = parse_schema(json)?;
        self.interned.put(text, schema.clone());
        Ok(schema)
    }
}

fn type_from_name(name: &str) -> Result<Type> {
    Ok(match name {
        "int8" => Type::Int8,
        "int16" => Type::Int16,
        "int32" => Type::Int32,
        "int64" => Type::Int64,
        "float" => Type::Float32,
        "double" => Type::Float64,
        "boolean" => Type::Boolean,
        "string" => Type::String,
        "bytes" => Type::Bytes,
        "struct" => Type::Struct,
        other => return Err(Error::Convert(format!("unsupported schema type {other:?}"))),
    })
}

fn type_name(typ: Type) -> &'static str {
    match typ {
        Type::Int8 => "int8",
        Type::Int16 => "int16",
        Type::Int32 => "int32",
        Type::Int64 => "int64",
        Type::Float32 => "float",
        Type::Float64 => "double",
        Type::Boolean => "boolean",
        Type::String => "string",
        Type::Bytes => "bytes",
        Type::Struct => "struct",
    }
}

fn parse_schema(json: &serde_json::Value) -> Result<SchemaRef> {
    let obj = json
        .as_object()
        .ok_or_else(|| Error::Convert(format!("schema must be an object, got {json}")))?;
    let typ = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Convert("schema without type".to_string()))?;

    let mut builder = SchemaBuilder::new(type_from_name(typ)?);
    if obj.get("optional").and_then(|v| v.as_bool()) == Some(true) {
        builder = builder.optional();
    }
    if let Some(name) = obj.get("name").and_then(|v| v.as_str()) {
        builder = builder.name(name);
    }
    if let Some(version) = obj.get("version").and_then(|v| v.as_i64()) {
        let version = i32::try_from(version)
            .map_err(|_| Error::Convert(format!("schema version {version} out of range")))?;
        builder = builder.version(version);
    }
    if let Some(doc) = obj.get("doc").and_then(|v| v.as_str()) {
        builder = builder.doc(doc);
    }

    if let Some(fields) = obj.get("fields").and_then(|v| v.as_array()) {
        for field in fields {
            let name = field
                .get("field")
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::Convert("struct field without name".to_string()))?;
            builder = builder.field(name, parse_schema(field)?)?;
        }
    }

    Ok(builder.build())
}

fn schema_json(schema: &Schema) -> serde_json::Value {
    let mut obj = Map::new();
    obj.insert("type".to_string(), type_name(schema.typ()).into());
    obj.insert("optional".to_string(), schema.is_optional().into());
    if let Some(name) = schema.name() {
        obj.insert("name".to_string(), name.into());
    }
    if let Some(version) = schema.version() {
        obj.insert("version".to_string(), version.into());
    }
    if let Some(doc) = schema.doc() {
        obj.insert("doc".to_string(), doc.into());
    }
    if !schema.typ().is_primitive() {
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                let mut v = schema_json(field.schema());
                if let serde_json::Value::Object(obj) = &mut v {
                    obj.insert("field".to_string(), field.name().into());
                }
                v
            })
            .collect();
        obj.insert("fields".to_string(), serde_json::Value::Array(fields));
    }

    serde_json::Value::Object(obj)
}

fn schemaless_value(json: serde_json::Value) -> Result<Value> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Boolean(v),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(v) => Value::Int64(v),
            None => Value::Float64(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(v) => Value::String(v),
        serde_json::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(schemaless_value)
                .collect::<Result<_>>()?,
        ),
        serde_json::Value::Object(obj) => Value::Map(
            obj.into_iter()
                .map(|(k, v)| schemaless_value(v).map(|v| (k, v)))
                .collect::<Result<_>>()?,
        ),
    })
}

fn mismatch(schema: &Schema, json: &serde_json::Value) -> Error {
    Error::Convert(format!(
        "expected {} payload, got {json}",
        type_name(schema.typ())
    ))
}

fn value_with_schema(schema: &SchemaRef, json: &serde_json::Value) -> Result<Value> {
    if json.is_null() {
        return Ok(Value::Null);
    }

    let int = || json.as_i64().ok_or_else(|| mismatch(schema, json));
    let out_of_range = || {
        Error::Convert(format!(
            "{json} out of range for {}",
            type_name(schema.typ())
        ))
    };
    let value = match schema.typ() {
        Type::Int8 => Value::Int8(i8::try_from(int()?).map_err(|_| out_of_range())?),
        Type::Int16 => Value::Int16(i16::try_from(int()?).map_err(|_| out_of_range())?),
        Type::Int32 => Value::Int32(i32::try_from(int()?).map_err(|_| out_of_range())?),
        Type::Int64 => Value::Int64(int()?),
        Type::Float32 => {
            Value::Float32(json.as_f64().ok_or_else(|| mismatch(schema, json))? as f32)
        }
        Type::Float64 => Value::Float64(json.as_f64().ok_or_else(|| mismatch(schema, json))?),
        Type::Boolean => Value::Boolean(json.as_bool().ok_or_else(|| mismatch(schema, json))?),
        Type::String => Value::String(
            json.as_str()
                .ok_or_else(|| mismatch(schema, json))?
                .to_string(),
        ),
        Type::Bytes => return Err(Error::Convert("bytes payloads are not supported".to_string())),
        Type::Struct => {
            let obj = json.as_object().ok_or_else(|| mismatch(schema, json))?;
            let mut s = Struct::try_new(schema.clone())?;
            for field in schema.fields() {
                let v = obj.get(field.name()).unwrap_or(&serde_json::Value::Null);
                s.put(field.name(), value_with_schema(field.schema(), v)?)?;
            }
            Value::Struct(s)
        }
    };

    Ok(value)
}

// floats go through their shortest text form so 37.405f32 prints as 37.405
fn float_json(text: String) -> serde_json::Value {
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

fn json_value(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(v) => (*v).into(),
        Value::Int8(v) => (*v).into(),
        Value::Int16(v) => (*v).into(),
        Value::Int32(v) => (*v).into(),
        Value::Int64(v) => (*v).into(),
        Value::Float32(v) => float_json(v.to_string()),
        Value::Float64(v) => float_json(v.to_string()),
        Value::String(v) => v.as_str().into(),
        Value::Bytes(_) => {
            return Err(Error::Convert("bytes payloads are not supported".to_string()));
        }
        Value::Array(items) => serde_json::Value::Array(
            items.iter().map(json_value).collect::<Result<_>>()?,
        ),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| json_value(v).map(|v| (k.clone(), v)))
                .collect::<Result<_>>()?,
        ),
        Value::Struct(s) => {
            let mut obj = Map::new();
            for field in s.schema().fields() {
                obj.insert(field.name().to_string(), json_value(s.get(field.name())?)?);
            }
            serde_json::Value::Object(obj)
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn envelope() -> serde_json::Value {
        json!({
            "schema": {
                "type": "struct",
                "name": "request",
                "version": 2,
                "fields": [
                    {"field": "ip_address", "type": "string"},
                    {"field": "bytes_sent", "type": "int32", "optional": true},
                    {"field": "ratio", "type": "float"}
                ]
            },
            "payload": {"ip_address": "8.8.8.8", "ratio": 0.5}
        })
    }

    #[test]
    fn schemaless_object_is_map() {
        let mut conv = JsonConverter::new(false);
        let (schema, value) = conv
            .to_connect(json!({"ip_address": "8.8.8.8", "n": 3, "x": 1.5, "ok": true}))
            .unwrap();
        assert!(schema.is_none());

        let map = match value {
            Value::Map(map) => map,
            other => panic!("expected map, got {other:?}"),
        };
        assert_eq!(map["ip_address"], Value::from("8.8.8.8"));
        assert_eq!(map["n"], Value::Int64(3));
        assert_eq!(map["x"], Value::Float64(1.5));
        assert_eq!(map["ok"], Value::Boolean(true));
    }

    #[test]
    fn envelope_to_struct() {
        let mut conv = JsonConverter::new(true);
        let (schema, value) = conv.to_connect(envelope()).unwrap();
        let schema = schema.unwrap();
        assert_eq!(schema.typ(), Type::Struct);
        assert_eq!(schema.name(), Some("request"));
        assert_eq!(schema.version(), Some(2));
        assert_eq!(schema.fields().len(), 3);
        assert!(schema.field("bytes_sent").unwrap().schema().is_optional());

        let s = match value {
            Value::Struct(s) => s,
            other => panic!("expected struct, got {other:?}"),
        };
        assert!(Arc::ptr_eq(s.schema(), &schema));
        assert_eq!(s.get("ip_address").unwrap(), &Value::from("8.8.8.8"));
        assert_eq!(s.get("bytes_sent").unwrap(), &Value::Null);
        assert_eq!(s.get("ratio").unwrap(), &Value::Float32(0.5));
    }

    #[test]
    fn identical_schemas_are_interned() {
        let mut conv = JsonConverter::new(true);
        let (a, _) = conv.to_connect(envelope()).unwrap();
        let (b, _) = conv.to_connect(envelope()).unwrap();
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    }

    fn named_envelope(name: &str) -> serde_json::Value {
        json!({
            "schema": {
                "type": "struct",
                "name": name,
                "fields": [{"field": "ip", "type": "string"}]
            },
            "payload": {"ip": "8.8.8.8"}
        })
    }

    #[test]
    fn interned_schemas_are_bounded() {
        let mut conv = JsonConverter::with_capacity(true, NonZeroUsize::new(2).unwrap());
        let (first, _) = conv.to_connect(named_envelope("a")).unwrap();
        for name in ["b", "c", "d"] {
            conv.to_connect(named_envelope(name)).unwrap();
        }
        assert_eq!(conv.interned(), 2);

        // evicted text parses into a fresh instance
        let (again, _) = conv.to_connect(named_envelope("a")).unwrap();
        assert!(!Arc::ptr_eq(&first.unwrap(), &again.unwrap()));
        assert_eq!(conv.interned(), 2);
    }

    #[test]
    fn default_capacity_holds_many_schemas() {
        let mut conv = JsonConverter::new(true);
        for i in 0..DEFAULT_INTERNED_SCHEMAS.get() * 4 {
            conv.to_connect(named_envelope(&format!("s{i}"))).unwrap();
        }
        assert_eq!(conv.interned(), DEFAULT_INTERNED_SCHEMAS.get());
    }

    #[test]
    fn null_schema_is_schemaless() {
        let mut conv = JsonConverter::new(true);
        let (schema, value) = conv
            .to_connect(json!({"schema": null, "payload": {"ip_address": "1.1.1.1"}}))
            .unwrap();
        assert!(schema.is_none());
        assert!(matches!(value, Value::Map(_)));
    }

    #[test]
    fn bad_payloads() {
        let mut conv = JsonConverter::new(true);
        assert!(conv.to_connect(json!("no envelope")).is_err());
        assert!(conv.to_connect(json!({"schema": {"type": "string"}})).is_err());
        assert!(conv
            .to_connect(json!({"schema": {"type": "int8"}, "payload": 300}))
            .is_err());
        assert!(conv
            .to_connect(json!({"schema": {"type": "array"}, "payload": []}))
            .is_err());
        // required field left out
        assert!(conv
            .to_connect(json!({
                "schema": {"type": "struct", "fields": [{"field": "ip", "type": "string"}]},
                "payload": {}
            }))
            .is_err());
    }

    #[test]
    fn struct_back_to_envelope() {
        let mut conv = JsonConverter::new(true);
        let (schema, value) = conv.to_connect(envelope()).unwrap();
        let out = conv.from_connect(schema.as_ref(), &value).unwrap();

        assert_eq!(
            out["payload"],
            json!({"ip_address": "8.8.8.8", "bytes_sent": null, "ratio": 0.5})
        );
        assert_eq!(out["schema"]["type"], "struct");
        assert_eq!(out["schema"]["name"], "request");
        assert_eq!(out["schema"]["version"], 2);
        assert_eq!(out["schema"]["fields"][1]["field"], "bytes_sent");
        assert_eq!(out["schema"]["fields"][1]["optional"], true);
        assert_eq!(out["schema"]["fields"][2]["type"], "float");
    }

    #[test]
    fn float32_prints_short() {
        assert_eq!(json_value(&Value::Float32(37.405)).unwrap(), json!(37.405));
        assert_eq!(json_value(&Value::Float32(f32::NAN)).unwrap(), json!(null));
    }

    #[test]
    fn schemaless_from_connect_is_plain() {
        let conv = JsonConverter::new(false);
        let out = conv.from_connect(None, &Value::from("x")).unwrap();
        assert_eq!(out, json!("x"));
    }
}
