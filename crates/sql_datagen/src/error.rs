//! Error type for the data model.

use crate::data_type::{DataType, StorageClass};

/// Failures raised while building schemas or generating values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A generator was called with an argument outside its domain
    /// (non-positive length, negative bound, empty choice set, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A storage-class specific generator was asked for a type it cannot represent.
    #[error("{data_type} cannot be represented by a {requested} value")]
    TypeMismatch {
        data_type: DataType,
        requested: StorageClass,
    },

    /// No column in the table satisfies the requested type or role.
    #[error("table `{table}` has no eligible column ({requirement})")]
    NoEligibleColumn { table: String, requirement: String },
}

pub type Result<T> = std::result::Result<T, Error>;
