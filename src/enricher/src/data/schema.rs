use std::sync::Arc;

use lazy_static::lazy_static;

use crate::error::EnricherError;
use crate::error::Result;

pub type SchemaRef = Arc<Schema>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    String,
    Bytes,
    Struct,
}

impl Type {
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Type::Struct)
    }
}

lazy_static! {
    pub static ref INT8_SCHEMA: SchemaRef = SchemaBuilder::new(Type::Int8).build();
    pub static ref INT16_SCHEMA: SchemaRef = SchemaBuilder::new(Type::Int16).build();
    pub static ref INT32_SCHEMA: SchemaRef = SchemaBuilder::new(Type::Int32).build();
    pub static ref INT64_SCHEMA: SchemaRef = SchemaBuilder::new(Type::Int64).build();
    pub static ref FLOAT32_SCHEMA: SchemaRef = SchemaBuilder::new(Type::Float32).build();
    pub static ref FLOAT64_SCHEMA: SchemaRef = SchemaBuilder::new(Type::Float64).build();
    pub static ref BOOLEAN_SCHEMA: SchemaRef = SchemaBuilder::new(Type::Boolean).build();
    pub static ref STRING_SCHEMA: SchemaRef = SchemaBuilder::new(Type::String).build();
    pub static ref BYTES_SCHEMA: SchemaRef = SchemaBuilder::new(Type::Bytes).build();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    index: usize,
    schema: SchemaRef,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }
}

/// Describes a value. Equality is structural; caches that need identity compare the
/// surrounding `Arc`s with `Arc::ptr_eq`.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    typ: Type,
    optional: bool,
    name: Option<String>,
    version: Option<i32>,
    doc: Option<String>,
    fields: Vec<Field>,
}

impl Schema {
    pub fn typ(&self) -> Type {
        self.typ
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version(&self) -> Option<i32> {
        self.version
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    typ: Type,
    optional: bool,
    name: Option<String>,
    version: Option<i32>,
    doc: Option<String>,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    pub fn new(typ: Type) -> Self {
        SchemaBuilder {
            typ,
            optional: false,
            name: None,
            version: None,
            doc: None,
            fields: vec![],
        }
    }

    pub fn struct_builder() -> Self {
        Self::new(Type::Struct)
    }

    /// Starts a builder of the same type carrying over name, version and doc. Fields and the
    /// optional flag are not copied.
    pub fn copy_basics(schema: &Schema) -> Self {
        SchemaBuilder {
            typ: schema.typ,
            optional: false,
            name: schema.name.clone(),
            version: schema.version,
            doc: schema.doc.clone(),
            fields: vec![],
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: i32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, schema: SchemaRef) -> Result<Self> {
        if self.typ != Type::Struct {
            return Err(EnricherError::NotAStruct(self.typ));
        }
        let name = name.into();
        if self.fields.iter().any(|f| f.name == name) {
            return Err(EnricherError::DuplicateField(name));
        }
        let index = self.fields.len();
        self.fields.push(Field {
            name,
            index,
            schema,
        });

        Ok(self)
    }

    pub fn build(self) -> SchemaRef {
        Arc::new(Schema {
            typ: self.typ,
            optional: self.optional,
            name: self.name,
            version: self.version,
            doc: self.doc,
            fields: self.fields,
        })
    }
}
