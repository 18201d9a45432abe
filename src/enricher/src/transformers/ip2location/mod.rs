//! Inserts geolocation data looked up from an IP address field of the record.

pub mod fields;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use common::config;
use tracing::debug;
use tracing::warn;

use crate::data::SchemaRef;
use crate::data::Struct;
use crate::data::Value;
use crate::error::EnricherError;
use crate::error::Result;
use crate::lookup;
use crate::lookup::Locator;
use crate::record::Record;
use crate::schema_cache::SchemaCache;
use crate::side;
use crate::side::RecordSide;
use crate::transformers::ip2location::fields::derive_schema;
use crate::transformers::ip2location::fields::merge;
use crate::transformers::ip2location::fields::Enrichment;
use crate::Transformer;

const PURPOSE: &str = "inserting IP2Location data into record";

pub struct InsertIp2Location<S> {
    side: S,
    bin_path: PathBuf,
    input_field: String,
    locator: Arc<dyn Locator>,
    schema_cache: SchemaCache,
}

impl InsertIp2Location<side::Key> {
    pub fn key(cfg: &config::Ip2Location, locator: Arc<dyn Locator>) -> Self {
        Self::new(side::Key, cfg, locator)
    }
}

impl InsertIp2Location<side::Value> {
    pub fn value(cfg: &config::Ip2Location, locator: Arc<dyn Locator>) -> Self {
        Self::new(side::Value, cfg, locator)
    }
}

impl<S: RecordSide> InsertIp2Location<S> {
    pub fn new(side: S, cfg: &config::Ip2Location, locator: Arc<dyn Locator>) -> Self {
        Self {
            side,
            bin_path: cfg.bin_path.clone(),
            input_field: cfg.input.clone(),
            locator,
            schema_cache: SchemaCache::default(),
        }
    }

    pub fn schema_cache(&self) -> &SchemaCache {
        &self.schema_cache
    }

    fn locate(&self, ip: &str) -> Enrichment {
        let outcome = lookup::lookup(self.locator.as_ref(), &self.bin_path, ip);
        match &outcome {
            Ok(res) if !res.is_ok() => debug!("lookup of {:?} returned {}", ip, res.status()),
            Err(err) => warn!("failed to open database {:?}: {}", self.bin_path, err),
            _ => {}
        }

        Enrichment::from_outcome(outcome)
    }

    fn apply_schemaless(&self, record: &Record) -> Result<Record> {
        let value = match self.side.operating_value(record) {
            Value::Map(map) => map,
            other => {
                return Err(EnricherError::TypeMismatch {
                    expected: "Map",
                    purpose: PURPOSE,
                    found: other.type_name(),
                });
            }
        };

        let updated: HashMap<String, Value> = value.clone();
        let ip = ip_text(updated.get(&self.input_field));
        let updated = merge(updated, &self.locate(&ip))?;

        Ok(self.side.new_record(record, None, Value::Map(updated)))
    }

    fn apply_with_schema(&self, record: &Record, schema: &SchemaRef) -> Result<Record> {
        let value = match self.side.operating_value(record) {
            Value::Struct(v) if Arc::ptr_eq(v.schema(), schema) || v.schema() == schema => v,
            Value::Struct(_) => return Err(EnricherError::SchemaMismatch { purpose: PURPOSE }),
            other => {
                return Err(EnricherError::TypeMismatch {
                    expected: "Struct",
                    purpose: PURPOSE,
                    found: other.type_name(),
                });
            }
        };

        let updated_schema = match self.schema_cache.get(value.schema()) {
            Some(schema) => schema,
            None => {
                let updated = derive_schema(value.schema())?;
                debug!(
                    "derived schema {:?} with {} fields",
                    updated.name(),
                    updated.fields().len()
                );
                self.schema_cache.put(value.schema().clone(), updated.clone());
                updated
            }
        };

        let mut updated = Struct::try_new(updated_schema.clone())?;
        for field in value.schema().fields() {
            updated.put(field.name(), value.get(field.name())?.clone())?;
        }

        let ip = ip_text(Some(updated.get(&self.input_field)?));
        let updated = merge(updated, &self.locate(&ip))?;

        Ok(self
            .side
            .new_record(record, Some(updated_schema), Value::Struct(updated)))
    }
}

// null fields, and map entries that are absent, are looked up as a blank address
fn ip_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => v.to_string(),
    }
}

impl<S: RecordSide> Transformer for InsertIp2Location<S> {
    fn apply(&self, record: &Record) -> Result<Record> {
        match self.side.operating_schema(record) {
            None => self.apply_schemaless(record),
            Some(schema) => self.apply_with_schema(record, schema),
        }
    }

    fn close(&self) {
        self.schema_cache.clear();
    }
}
