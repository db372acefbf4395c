//! Statement-scoped generation errors.
//!
//! Any of these aborts the statement being built and nothing else; the batch
//! generator decides whether to skip it or stop.

use crate::dialect::Dialect;
use sql_datagen::{DataType, StorageClass};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{data_type} cannot be represented by a {requested} value")]
    TypeMismatch {
        data_type: DataType,
        requested: StorageClass,
    },

    #[error("keyword `{keyword}` has no {dialect} mapping")]
    UnmappedKeyword { keyword: String, dialect: Dialect },

    #[error("keyword `{keyword}` is not enabled")]
    DisabledKeyword { keyword: String },

    #[error("table `{table}` has no eligible column ({requirement})")]
    NoEligibleColumn { table: String, requirement: String },

    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),
}

impl From<sql_datagen::Error> for GenError {
    fn from(err: sql_datagen::Error) -> Self {
        match err {
            sql_datagen::Error::InvalidArgument(msg) => GenError::InvalidArgument(msg),
            sql_datagen::Error::TypeMismatch {
                data_type,
                requested,
            } => GenError::TypeMismatch {
                data_type,
                requested,
            },
            sql_datagen::Error::NoEligibleColumn { table, requirement } => {
                GenError::NoEligibleColumn { table, requirement }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
