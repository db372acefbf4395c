//! YAML configuration for the generate command.
//!
//! Every field is optional; command-line flags take precedence over values
//! read from the file.

use crate::batch::ErrorPolicy;
use crate::statement::{builtin_templates, Template};
use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sql_datagen::{DataType, RandomTemporal, Table, ValueGenerator};
use std::fs;
use std::path::Path;
use std::sync::Arc;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// How date/time/timestamp values are produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TemporalConfig {
    /// Fixed literals (default)
    #[default]
    Fixed,
    /// Uniform over `[start, end]`, both formatted `YYYY-MM-DD HH:MM:SS`
    Random { start: String, end: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnConfig {
    pub name: String,
    /// Column type, e.g. `big_int` or `BIG_INT`
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableConfig {
    pub name: String,
    #[serde(default)]
    pub rows: usize,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateConfig {
    pub name: String,
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// Complete YAML configuration for the generate command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GenerateYamlConfig {
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Number of statements to generate
    pub statements: Option<usize>,
    /// Worker threads
    pub workers: Option<usize>,
    /// skip or abort on a failed statement
    pub on_error: Option<ErrorPolicy>,
    pub temporal: TemporalConfig,
    /// Explicit tables; random tables are synthesized when empty
    pub tables: Vec<TableConfig>,
    /// Templates; the built-in set is used when empty
    pub templates: Vec<TemplateConfig>,
}

impl GenerateYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: GenerateYamlConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for table in &self.tables {
            if !is_valid_identifier(&table.name) {
                bail!("invalid table name `{}`", table.name);
            }
            if table.columns.is_empty() {
                bail!("table `{}` has no columns", table.name);
            }
            for column in &table.columns {
                if !is_valid_identifier(&column.name) {
                    bail!("invalid column name `{}` in table `{}`", column.name, table.name);
                }
            }
        }
        for template in &self.templates {
            if template.weight == 0 {
                tracing::warn!(
                    template = %template.name,
                    "template has weight 0 and will never be picked"
                );
            }
        }
        Ok(())
    }

    /// Tables declared in the file, in order.
    pub fn build_tables(&self) -> anyhow::Result<Vec<Table>> {
        self.tables
            .iter()
            .map(|t| {
                let mut table = Table::new(&t.name).with_row_count(t.rows);
                for c in &t.columns {
                    table
                        .add_column(&c.name, c.data_type)
                        .with_context(|| format!("table `{}`", t.name))?;
                }
                Ok(table)
            })
            .collect()
    }

    /// Declared templates, or the built-in set when none are declared.
    pub fn build_templates(&self) -> anyhow::Result<Vec<Template>> {
        if self.templates.is_empty() {
            return Ok(builtin_templates()?);
        }
        self.templates
            .iter()
            .map(|t| {
                Template::parse(&t.name, &t.text)
                    .map(|tpl| tpl.with_weight(t.weight))
                    .with_context(|| format!("template `{}`", t.name))
            })
            .collect()
    }

    pub fn value_generator(&self) -> anyhow::Result<ValueGenerator> {
        match &self.temporal {
            TemporalConfig::Fixed => Ok(ValueGenerator::default()),
            TemporalConfig::Random { start, end } => {
                let start = parse_datetime(start)?;
                let end = parse_datetime(end)?;
                let source = RandomTemporal::new(start, end)?;
                Ok(ValueGenerator::with_temporal(Arc::new(source)))
            }
        }
    }
}

fn parse_datetime(text: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .with_context(|| format!("`{text}` is not a {DATETIME_FORMAT} datetime"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("orders"));
        assert!(is_valid_identifier("_tmp1"));
        assert!(!is_valid_identifier("1st"));
        assert!(!is_valid_identifier("drop table"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_temporal_random_requires_valid_window() {
        let config = GenerateYamlConfig {
            temporal: TemporalConfig::Random {
                start: "2024-01-02 00:00:00".to_string(),
                end: "2024-01-01 00:00:00".to_string(),
            },
            ..Default::default()
        };
        assert!(config.value_generator().is_err());
    }
}
