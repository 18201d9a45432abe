//! Structured values exchanged with the host pipeline.

pub mod schema;
pub mod value;

pub use schema::Field;
pub use schema::Schema;
pub use schema::SchemaBuilder;
pub use schema::SchemaRef;
pub use schema::Type;
pub use schema::BOOLEAN_SCHEMA;
pub use schema::BYTES_SCHEMA;
pub use schema::FLOAT32_SCHEMA;
pub use schema::FLOAT64_SCHEMA;
pub use schema::INT16_SCHEMA;
pub use schema::INT32_SCHEMA;
pub use schema::INT64_SCHEMA;
pub use schema::INT8_SCHEMA;
pub use schema::STRING_SCHEMA;
pub use value::Struct;
pub use value::Value;
