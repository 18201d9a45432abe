use std::result;

use thiserror::Error;

use crate::data::Type;

pub type Result<T> = result::Result<T, EnricherError>;

#[derive(Error, Debug)]
pub enum EnricherError {
    #[error("only {expected} objects supported for [{purpose}], found: {found}")]
    TypeMismatch {
        expected: &'static str,
        purpose: &'static str,
        found: &'static str,
    },
    #[error("struct schema does not match the record schema for [{purpose}]")]
    SchemaMismatch { purpose: &'static str },
    #[error("{0} is not a valid field name")]
    UnknownField(String),
    #[error("cannot create field because of field name duplication {0}")]
    DuplicateField(String),
    #[error("invalid value for field {field}: expected {expected:?}, found {found}")]
    InvalidValue {
        field: String,
        expected: Type,
        found: &'static str,
    },
    #[error("schema of type {0:?} has no fields")]
    NotAStruct(Type),
}
