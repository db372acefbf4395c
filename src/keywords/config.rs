//! JSON documents describing keyword enablement and dialect mappings.
//!
//! The layout is split across five files in one directory:
//! `keywords.json` decides which abstract keywords are enabled,
//! `ddl_mapping.json` / `dml_mapping.json` / `dql_mapping.json` give their
//! surface text per dialect, and `datatype_mapping.json` names each column
//! type per dialect. A default set is compiled into the binary.

use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sql_datagen::DataType;
use std::fs;
use std::path::Path;

pub const KEYWORDS_FILE: &str = "keywords.json";
pub const MAPPING_FILES: [&str; 3] = ["ddl_mapping.json", "dml_mapping.json", "dql_mapping.json"];
pub const DATATYPE_FILE: &str = "datatype_mapping.json";

const BUILTIN_KEYWORDS: &str = include_str!("../../config/dialect_config/keywords.json");
const BUILTIN_MAPPINGS: [&str; 3] = [
    include_str!("../../config/dialect_config/ddl_mapping.json"),
    include_str!("../../config/dialect_config/dml_mapping.json"),
    include_str!("../../config/dialect_config/dql_mapping.json"),
];
const BUILTIN_DATATYPES: &str = include_str!("../../config/dialect_config/datatype_mapping.json");

/// `keywords.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeywordsFile {
    pub feature_indicators: Vec<FeatureIndicator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureIndicator {
    pub feature: String,
    pub is_included: bool,
}

/// `ddl_mapping.json`, `dml_mapping.json` and `dql_mapping.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappingFile {
    pub features: Vec<FeatureMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureMapping {
    pub feature: String,
    /// Surface variants; templates pick one with `{KEYWORD#n}`.
    pub all_mappings: Vec<DialectMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DialectMapping {
    #[serde(default)]
    pub postgres: String,
    #[serde(default)]
    pub big_query: String,
    /// Constructs that conventionally follow the keyword.
    #[serde(default)]
    pub tokens: Vec<TokenRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequirement {
    pub token_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_token_count")]
    pub count: usize,
}

fn default_token_count() -> usize {
    1
}

/// `datatype_mapping.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeFile {
    pub data_type_maps: Vec<DataTypeMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeMapping {
    /// Upper snake case, e.g. `SMALL_INT`.
    #[schemars(with = "String")]
    pub data_type: DataType,
    #[serde(default)]
    pub postgres: String,
    #[serde(default)]
    pub big_query: String,
}

/// All five documents, parsed but not yet validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordConfig {
    pub keywords: KeywordsFile,
    pub features: Vec<FeatureMapping>,
    pub data_types: DataTypeFile,
}

impl KeywordConfig {
    /// The mapping bundled with the binary.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_json(BUILTIN_KEYWORDS, &BUILTIN_MAPPINGS, BUILTIN_DATATYPES)
            .context("bundled keyword configuration is invalid")
    }

    /// Parse the documents from JSON text.
    pub fn from_json(
        keywords: &str,
        mappings: &[&str],
        data_types: &str,
    ) -> anyhow::Result<Self> {
        let keywords: KeywordsFile =
            serde_json::from_str(keywords).with_context(|| format!("parsing {KEYWORDS_FILE}"))?;
        let mut features = Vec::new();
        for (i, text) in mappings.iter().enumerate() {
            let file: MappingFile = serde_json::from_str(text)
                .with_context(|| format!("parsing mapping document #{}", i + 1))?;
            features.extend(file.features);
        }
        let data_types: DataTypeFile = serde_json::from_str(data_types)
            .with_context(|| format!("parsing {DATATYPE_FILE}"))?;

        Ok(Self {
            keywords,
            features,
            data_types,
        })
    }

    /// Read the documents from `dir`. Mapping files that do not exist are skipped,
    /// but at least one must be present.
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        let keywords = read(&dir.join(KEYWORDS_FILE))?;
        let data_types = read(&dir.join(DATATYPE_FILE))?;

        let mut mappings = Vec::new();
        for name in MAPPING_FILES {
            let path = dir.join(name);
            if path.exists() {
                mappings.push(read(&path)?);
            } else {
                tracing::debug!(file = %path.display(), "mapping file not present, skipping");
            }
        }
        if mappings.is_empty() {
            anyhow::bail!(
                "no mapping files found in {} (expected one of: {})",
                dir.display(),
                MAPPING_FILES.join(", ")
            );
        }

        let mappings: Vec<&str> = mappings.iter().map(String::as_str).collect();
        Self::from_json(&keywords, &mappings, &data_types)
            .with_context(|| format!("loading keyword configuration from {}", dir.display()))
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
