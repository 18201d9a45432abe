use crate::data::SchemaRef;
use crate::data::Value;

/// A keyed message as delivered by the host pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    topic: String,
    partition: Option<i32>,
    key_schema: Option<SchemaRef>,
    key: Value,
    value_schema: Option<SchemaRef>,
    value: Value,
    timestamp: Option<i64>,
}

impl Record {
    pub fn new(
        topic: impl Into<String>,
        partition: Option<i32>,
        key_schema: Option<SchemaRef>,
        key: Value,
        value_schema: Option<SchemaRef>,
        value: Value,
        timestamp: Option<i64>,
    ) -> Self {
        Record {
            topic: topic.into(),
            partition,
            key_schema,
            key,
            value_schema,
            value,
            timestamp,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn partition(&self) -> Option<i32> {
        self.partition
    }

    pub fn key_schema(&self) -> Option<&SchemaRef> {
        self.key_schema.as_ref()
    }

    pub fn key(&self) -> &Value {
        &self.key
    }

    pub fn value_schema(&self) -> Option<&SchemaRef> {
        self.value_schema.as_ref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Rebuilds the record around new key and value parts, keeping topic, partition and
    /// timestamp.
    pub fn new_record(
        &self,
        key_schema: Option<SchemaRef>,
        key: Value,
        value_schema: Option<SchemaRef>,
        value: Value,
    ) -> Record {
        Record {
            topic: self.topic.clone(),
            partition: self.partition,
            key_schema,
            key,
            value_schema,
            value,
            timestamp: self.timestamp,
        }
    }
}
