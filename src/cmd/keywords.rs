use crate::dialect::Dialect;
use crate::keywords::{KeywordCatalog, KeywordMap};
use schemars::JsonSchema;
use serde::Serialize;
use sql_datagen::DataType;
use std::path::PathBuf;

/// JSON output for keywords command
#[derive(Serialize, JsonSchema)]
pub struct KeywordsJsonOutput {
    pub keywords: Vec<KeywordEntry>,
    pub data_types: Vec<DataTypeEntry>,
}

#[derive(Serialize, JsonSchema)]
pub struct KeywordEntry {
    pub name: String,
    pub enabled: bool,
    pub variants: Vec<VariantEntry>,
}

#[derive(Serialize, JsonSchema)]
pub struct VariantEntry {
    pub postgres: String,
    pub bigquery: String,
    /// Constructs that conventionally follow the keyword
    pub tokens: Vec<String>,
}

#[derive(Serialize, JsonSchema)]
pub struct DataTypeEntry {
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bigquery: Option<String>,
}

pub fn collect(catalog: &KeywordMap, all: bool) -> KeywordsJsonOutput {
    let names = if all {
        catalog.mapped_keywords()
    } else {
        catalog.enabled_keywords()
    };

    let keywords = names
        .into_iter()
        .map(|name| KeywordEntry {
            name: name.to_string(),
            enabled: catalog.is_enabled(name),
            variants: catalog
                .variants(name)
                .unwrap_or_default()
                .iter()
                .map(|v| VariantEntry {
                    postgres: v.text.postgres.clone(),
                    bigquery: v.text.bigquery.clone(),
                    tokens: v
                        .tokens
                        .iter()
                        .map(|t| t.token_type.name().to_string())
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let data_types = DataType::ALL
        .into_iter()
        .map(|dt| DataTypeEntry {
            data_type: dt.config_key(),
            postgres: catalog
                .resolve_data_type(dt, Dialect::Postgres)
                .ok()
                .map(str::to_string),
            bigquery: catalog
                .resolve_data_type(dt, Dialect::BigQuery)
                .ok()
                .map(str::to_string),
        })
        .collect();

    KeywordsJsonOutput {
        keywords,
        data_types,
    }
}

pub fn run(keywords: Option<PathBuf>, all: bool, json: bool) -> anyhow::Result<()> {
    let catalog = match keywords {
        Some(dir) => KeywordMap::load_dir(&dir)?,
        None => KeywordMap::builtin()?,
    };
    let output = collect(&catalog, all);

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{:<20} {:<8} {:<28} {:<28}",
        "KEYWORD", "ENABLED", "POSTGRES", "BIGQUERY"
    );
    for entry in &output.keywords {
        for (i, v) in entry.variants.iter().enumerate() {
            let name = if i == 0 {
                entry.name.clone()
            } else {
                format!("  #{i}")
            };
            let enabled = match (i, entry.enabled) {
                (0, true) => "yes",
                (0, false) => "no",
                _ => "",
            };
            println!(
                "{:<20} {:<8} {:<28} {:<28}",
                name, enabled, v.postgres, v.bigquery
            );
        }
    }

    println!();
    println!("{:<20} {:<28} {:<28}", "DATA TYPE", "POSTGRES", "BIGQUERY");
    for entry in &output.data_types {
        println!(
            "{:<20} {:<28} {:<28}",
            entry.data_type,
            entry.postgres.as_deref().unwrap_or("-"),
            entry.bigquery.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
