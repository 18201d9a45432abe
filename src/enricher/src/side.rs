//! The two orientations of a transform: rewriting a record's key or its value.

use crate::data;
use crate::data::SchemaRef;
use crate::record::Record;

pub trait RecordSide: Send + Sync {
    fn operating_schema<'a>(&self, record: &'a Record) -> Option<&'a SchemaRef>;

    fn operating_value<'a>(&self, record: &'a Record) -> &'a data::Value;

    /// Builds the outgoing record with the operating side replaced and the other side copied.
    fn new_record(
        &self,
        record: &Record,
        schema: Option<SchemaRef>,
        value: data::Value,
    ) -> Record;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Key;

impl RecordSide for Key {
    fn operating_schema<'a>(&self, record: &'a Record) -> Option<&'a SchemaRef> {
        record.key_schema()
    }

    fn operating_value<'a>(&self, record: &'a Record) -> &'a data::Value {
        record.key()
    }

    fn new_record(
        &self,
        record: &Record,
        schema: Option<SchemaRef>,
        value: data::Value,
    ) -> Record {
        record.new_record(
            schema,
            value,
            record.value_schema().cloned(),
            record.value().clone(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Value;

impl RecordSide for Value {
    fn operating_schema<'a>(&self, record: &'a Record) -> Option<&'a SchemaRef> {
        record.value_schema()
    }

    fn operating_value<'a>(&self, record: &'a Record) -> &'a data::Value {
        record.value()
    }

    fn new_record(
        &self,
        record: &Record,
        schema: Option<SchemaRef>,
        value: data::Value,
    ) -> Record {
        record.new_record(
            record.key_schema().cloned(),
            record.key().clone(),
            schema,
            value,
        )
    }
}
