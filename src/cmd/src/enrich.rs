use std::io::BufRead;
use std::io::Write;
use std::sync::Arc;

use common::config::Config;
use common::config::Side;
use common::types::FIELD_ERROR;
use enricher::data::Value;
use enricher::lookup::Locator;
use enricher::transformers::ip2location::InsertIp2Location;
use enricher::Record;
use enricher::Transformer;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::error;
use tracing::info;

use crate::error::Result;
use crate::json::JsonConverter;

/// One line of input or output.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub partition: Option<i32>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub key: serde_json::Value,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub failed_lookups: usize,
}

pub fn transformer(cfg: &Config, locator: Arc<dyn Locator>) -> Box<dyn Transformer> {
    match cfg.transform.side {
        Side::Key => Box::new(InsertIp2Location::key(&cfg.ip2location, locator)),
        Side::Value => Box::new(InsertIp2Location::value(&cfg.ip2location, locator)),
    }
}

fn lookup_failed(value: &Value) -> bool {
    match value {
        Value::Map(map) => map.contains_key(FIELD_ERROR),
        Value::Struct(s) => s.get(FIELD_ERROR).map(|v| !v.is_null()).unwrap_or(false),
        _ => false,
    }
}

/// Enriches every record read from `input` and writes the results to `output`, one JSON
/// document per line. Stops at the first record that cannot be converted or transformed.
pub fn run<R: BufRead, W: Write>(
    xform: &dyn Transformer,
    converter: &mut JsonConverter,
    input: R,
    mut output: W,
) -> Result<Summary> {
    let mut summary = Summary::default();
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: Line = serde_json::from_str(&line)?;
        let (key_schema, key) = converter.to_connect(parsed.key)?;
        let (value_schema, value) = converter.to_connect(parsed.value)?;
        let record = Record::new(
            parsed.topic,
            parsed.partition,
            key_schema,
            key,
            value_schema,
            value,
            parsed.timestamp,
        );

        let out = xform.apply(&record).map_err(|err| {
            error!("line {}: {}", idx + 1, err);
            err
        })?;
        summary.records += 1;
        if lookup_failed(out.key()) || lookup_failed(out.value()) {
            summary.failed_lookups += 1;
        }

        let written = Line {
            topic: out.topic().to_string(),
            partition: out.partition(),
            timestamp: out.timestamp(),
            key: converter.from_connect(out.key_schema(), out.key())?,
            value: converter.from_connect(out.value_schema(), out.value())?,
        };
        serde_json::to_writer(&mut output, &written)?;
        writeln!(output)?;
        debug!("line {} enriched", idx + 1);
    }
    output.flush()?;

    info!(
        "enriched {} records, {} failed lookups",
        summary.records, summary.failed_lookups
    );
    Ok(summary)
}
