//! Abstract statement constructs and their rendered form.

mod draw;
mod generator;
mod render;

pub use draw::{CompareOp, Draw, SortDirection};
pub use generator::{RenderedPair, TokenGenerator};
pub use render::{Construct, ConstructRegistry, RenderContext};

use crate::dialect::Dialect;
use crate::error::{GenError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sql_datagen::DataType;
use std::fmt;

/// Default upper bound for `count` and `skip_rows` literals.
pub const DEFAULT_BOUND: i64 = 100;

/// Closed set of construct kinds a template can ask for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    TableName,
    TableSchema,
    PartitionExp,
    ClusterExp,
    InsertExp,
    UpdateItem,
    Condition,
    SelectExp,
    FromItem,
    GroupExp,
    WindowExp,
    OrderExp,
    AscDesc,
    Count,
    SkipRows,
}

impl TokenType {
    pub const ALL: [TokenType; 15] = [
        TokenType::TableName,
        TokenType::TableSchema,
        TokenType::PartitionExp,
        TokenType::ClusterExp,
        TokenType::InsertExp,
        TokenType::UpdateItem,
        TokenType::Condition,
        TokenType::SelectExp,
        TokenType::FromItem,
        TokenType::GroupExp,
        TokenType::WindowExp,
        TokenType::OrderExp,
        TokenType::AscDesc,
        TokenType::Count,
        TokenType::SkipRows,
    ];

    /// Placeholder name, also used in templates and keyword configs.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::TableName => "table_name",
            TokenType::TableSchema => "table_schema",
            TokenType::PartitionExp => "partition_exp",
            TokenType::ClusterExp => "cluster_exp",
            TokenType::InsertExp => "insert_exp",
            TokenType::UpdateItem => "update_item",
            TokenType::Condition => "condition",
            TokenType::SelectExp => "select_exp",
            TokenType::FromItem => "from_item",
            TokenType::GroupExp => "group_exp",
            TokenType::WindowExp => "window_exp",
            TokenType::OrderExp => "order_exp",
            TokenType::AscDesc => "asc_desc",
            TokenType::Count => "count",
            TokenType::SkipRows => "skip_rows",
        }
    }

    /// Skeleton placeholder, e.g. `<table_name>`.
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.name())
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TokenType {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        TokenType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| GenError::UnsupportedConstruct(s.to_string()))
    }
}

/// Parameters a construct may read. Unset fields fall back to per-construct defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenParams {
    /// Number of columns to pick. `select_exp` renders `*` for zero.
    pub columns: Option<usize>,
    /// Restrict column choice to one type.
    pub data_type: Option<DataType>,
    /// Inclusive upper bound for integer literals.
    pub bound: Option<i64>,
}

impl TokenParams {
    /// Parse `key=value` pairs separated by commas.
    pub fn parse(text: &str) -> Result<Self> {
        let mut params = TokenParams::default();
        for pair in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                GenError::InvalidArgument(format!("expected key=value, got `{pair}`"))
            })?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "columns" => params.columns = Some(parse_number(key, value)?),
                "bound" => params.bound = Some(parse_number(key, value)?),
                "type" => {
                    params.data_type = Some(value.parse().map_err(GenError::InvalidArgument)?)
                }
                _ => {
                    return Err(GenError::InvalidArgument(format!(
                        "unknown construct parameter `{key}`"
                    )))
                }
            }
        }
        Ok(params)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| GenError::InvalidArgument(format!("`{key}` expects a number, got `{value}`")))
}

/// One construct request inside a statement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub token_type: TokenType,
    pub params: TokenParams,
}

impl TokenInfo {
    pub fn new(token_type: TokenType) -> Self {
        Self {
            token_type,
            params: TokenParams::default(),
        }
    }

    pub fn with_params(token_type: TokenType, params: TokenParams) -> Self {
        Self { token_type, params }
    }
}

/// A construct rendered for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub token_type: TokenType,
    pub dialect: Dialect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_names_round_trip() {
        for t in TokenType::ALL {
            assert_eq!(t.name().parse::<TokenType>().unwrap(), t);
        }
        assert!(matches!(
            "lateral_join".parse::<TokenType>(),
            Err(GenError::UnsupportedConstruct(_))
        ));
    }

    #[test]
    fn test_params_parse() {
        let p = TokenParams::parse("columns=2, type=date,bound=7").unwrap();
        assert_eq!(p.columns, Some(2));
        assert_eq!(p.data_type, Some(DataType::Date));
        assert_eq!(p.bound, Some(7));

        assert_eq!(TokenParams::parse("").unwrap(), TokenParams::default());
        assert!(TokenParams::parse("depth=3").is_err());
        assert!(TokenParams::parse("columns").is_err());
        assert!(TokenParams::parse("bound=x").is_err());
    }
}
