use std::collections::HashMap;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::data::SchemaRef;
use crate::data::Type;
use crate::error::EnricherError;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(HashMap<String, Value>),
    Struct(Struct),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    fn matches(&self, typ: Type) -> bool {
        matches!(
            (self, typ),
            (Value::Boolean(_), Type::Boolean)
                | (Value::Int8(_), Type::Int8)
                | (Value::Int16(_), Type::Int16)
                | (Value::Int32(_), Type::Int32)
                | (Value::Int64(_), Type::Int64)
                | (Value::Float32(_), Type::Float32)
                | (Value::Float64(_), Type::Float64)
                | (Value::String(_), Type::String)
                | (Value::Bytes(_), Type::Bytes)
                | (Value::Struct(_), Type::Struct)
        )
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Bytes(v) => write!(f, "{v:?}"),
            Value::Array(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(v) => write!(f, "{v:?}"),
            Value::Struct(v) => write!(f, "{v:?}"),
        }
    }
}

/// A value laid out according to a struct schema. Fields that were never set read as `Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    schema: SchemaRef,
    values: Vec<Value>,
}

impl Struct {
    pub fn try_new(schema: SchemaRef) -> Result<Self> {
        if schema.typ() != Type::Struct {
            return Err(EnricherError::NotAStruct(schema.typ()));
        }
        let values = vec![Value::Null; schema.fields().len()];

        Ok(Struct { schema, values })
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| EnricherError::UnknownField(name.to_string()))?;

        Ok(&self.values[field.index()])
    }

    pub fn put(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| EnricherError::UnknownField(name.to_string()))?;
        let field_schema = field.schema();
        let valid = if value.is_null() {
            field_schema.is_optional()
        } else {
            value.matches(field_schema.typ())
        };
        if !valid {
            return Err(EnricherError::InvalidValue {
                field: name.to_string(),
                expected: field_schema.typ(),
                found: value.type_name(),
            });
        }

        let idx = field.index();
        self.values[idx] = value;
        Ok(self)
    }

    /// Builder-style `put`.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.put(name, value.into())?;
        Ok(self)
    }
}
