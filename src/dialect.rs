//! Target SQL dialects.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sql_datagen::DataType;
use std::fmt;

/// SQL surface syntax a statement is rendered in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    BigQuery,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Postgres, Dialect::BigQuery];

    /// File name prefix used by the directory sink.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgre",
            Dialect::BigQuery => "bq",
        }
    }

    /// Types accepted as a bare partitioning column.
    ///
    /// BigQuery takes a bare column only when it is a `DATE`; integer and
    /// timestamp columns need a `RANGE_BUCKET(...)` or `DATE(...)` wrapper,
    /// which partition expressions never render. PostgreSQL range
    /// partitioning accepts any orderable type.
    pub fn can_partition_by(&self, data_type: DataType) -> bool {
        match self {
            Dialect::Postgres => !data_type.is_boolean_type(),
            Dialect::BigQuery => data_type == DataType::Date,
        }
    }

    /// Types accepted as a clustering column.
    pub fn can_cluster_by(&self, data_type: DataType) -> bool {
        match self {
            Dialect::Postgres => true,
            Dialect::BigQuery => !matches!(
                data_type,
                DataType::Real | DataType::BigReal | DataType::Bytes | DataType::Time
            ),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::BigQuery => write!(f, "bigquery"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" | "postgre" => Ok(Dialect::Postgres),
            "bigquery" | "bq" => Ok(Dialect::BigQuery),
            _ => Err(format!(
                "Unknown dialect: {}. Valid options: postgres, bigquery",
                s
            )),
        }
    }
}
