pub mod data;
pub mod error;
pub mod lookup;
pub mod record;
pub mod schema_cache;
pub mod side;
pub mod transformers;

pub use record::Record;

use crate::error::Result;

/// A per-record stage of the host pipeline.
pub trait Transformer: Send + Sync {
    fn apply(&self, record: &Record) -> Result<Record>;

    /// Releases state built up while transforming. The instance is not used afterwards.
    fn close(&self);
}
