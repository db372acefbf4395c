//! Abstract keyword to dialect lexeme mapping.
//!
//! [`KeywordCatalog`] is the seam the generator talks to. [`KeywordMap`] is
//! the JSON-backed implementation: loaded once, validated at construction,
//! then read-only.

pub mod config;

pub use config::KeywordConfig;

use crate::dialect::Dialect;
use crate::error::{GenError, Result};
use crate::token::TokenType;
use ahash::{AHashMap, AHashSet};
use config::{DataTypeMapping, DialectMapping, FeatureIndicator, FeatureMapping};
use sql_datagen::DataType;
use std::path::Path;

/// Lookup of keyword enablement and surface text.
pub trait KeywordCatalog: Send + Sync {
    /// Enablement is dialect independent.
    fn is_enabled(&self, keyword: &str) -> bool;

    /// Surface text of variant `variant` of `keyword`.
    ///
    /// Fails with `DisabledKeyword` when the keyword is not enabled and with
    /// `UnmappedKeyword` when it is enabled but has no text for `dialect`.
    fn resolve_variant(&self, keyword: &str, variant: usize, dialect: Dialect) -> Result<&str>;

    fn resolve(&self, keyword: &str, dialect: Dialect) -> Result<&str> {
        self.resolve_variant(keyword, 0, dialect)
    }

    /// Column type name for `dialect`.
    fn resolve_data_type(&self, data_type: DataType, dialect: Dialect) -> Result<&str>;
}

/// Text for each dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectText {
    pub postgres: String,
    pub bigquery: String,
}

impl DialectText {
    pub fn get(&self, dialect: Dialect) -> &str {
        match dialect {
            Dialect::Postgres => &self.postgres,
            Dialect::BigQuery => &self.bigquery,
        }
    }

    fn first_missing(&self) -> Option<Dialect> {
        Dialect::ALL
            .into_iter()
            .find(|d| self.get(*d).trim().is_empty())
    }
}

/// A construct that conventionally follows a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowingToken {
    pub token_type: TokenType,
    pub required: bool,
    pub count: usize,
}

/// One surface form of a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordVariant {
    pub text: DialectText,
    pub tokens: Vec<FollowingToken>,
}

/// Immutable, validated keyword table.
#[derive(Debug, Clone, Default)]
pub struct KeywordMap {
    enabled: AHashSet<String>,
    keywords: AHashMap<String, Vec<KeywordVariant>>,
    data_types: AHashMap<DataType, DialectText>,
}

impl KeywordMap {
    pub fn builder() -> KeywordMapBuilder {
        KeywordMapBuilder::default()
    }

    /// The catalog bundled with the binary.
    pub fn builtin() -> anyhow::Result<Self> {
        Ok(Self::from_config(KeywordConfig::builtin()?)?)
    }

    /// Load and validate the JSON documents in `dir`.
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        Ok(Self::from_config(KeywordConfig::load_dir(dir)?)?)
    }

    /// Validate `config` and build the lookup table.
    ///
    /// Every enabled keyword needs at least one variant, and every variant
    /// needs non-empty text for every dialect. Token names must be known
    /// constructs. Duplicate entries are rejected.
    pub fn from_config(config: KeywordConfig) -> Result<Self> {
        let mut enabled = AHashSet::new();
        let mut seen = AHashSet::new();
        for FeatureIndicator {
            feature,
            is_included,
        } in config.keywords.feature_indicators
        {
            if !seen.insert(feature.clone()) {
                return Err(GenError::InvalidArgument(format!(
                    "keyword `{feature}` is listed more than once"
                )));
            }
            if is_included {
                enabled.insert(feature);
            }
        }

        let mut keywords: AHashMap<String, Vec<KeywordVariant>> = AHashMap::new();
        for FeatureMapping {
            feature,
            all_mappings,
        } in config.features
        {
            if keywords.contains_key(&feature) {
                return Err(GenError::InvalidArgument(format!(
                    "keyword `{feature}` is mapped more than once"
                )));
            }
            let variants = all_mappings
                .into_iter()
                .map(build_variant)
                .collect::<Result<Vec<_>>>()?;
            keywords.insert(feature, variants);
        }

        for keyword in &enabled {
            let variants = keywords
                .get(keyword)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| GenError::UnmappedKeyword {
                    keyword: keyword.clone(),
                    dialect: Dialect::Postgres,
                })?;
            for variant in variants {
                if let Some(dialect) = variant.text.first_missing() {
                    return Err(GenError::UnmappedKeyword {
                        keyword: keyword.clone(),
                        dialect,
                    });
                }
            }
        }

        let mut data_types = AHashMap::new();
        for DataTypeMapping {
            data_type,
            postgres,
            big_query,
        } in config.data_types.data_type_maps
        {
            let text = DialectText {
                postgres,
                bigquery: big_query,
            };
            if let Some(dialect) = text.first_missing() {
                return Err(GenError::UnmappedKeyword {
                    keyword: data_type.config_key(),
                    dialect,
                });
            }
            if data_types.insert(data_type, text).is_some() {
                return Err(GenError::InvalidArgument(format!(
                    "data type {} is mapped more than once",
                    data_type.config_key()
                )));
            }
        }

        let map = Self {
            enabled,
            keywords,
            data_types,
        };
        let missing = map.unmapped_data_types();
        if !missing.is_empty() {
            tracing::warn!(
                ?missing,
                "data types without a dialect mapping cannot appear in a table schema"
            );
        }
        Ok(map)
    }

    /// Enabled keywords, sorted.
    pub fn enabled_keywords(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.enabled.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every mapped keyword, enabled or not, sorted.
    pub fn mapped_keywords(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.keywords.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn variants(&self, keyword: &str) -> Option<&[KeywordVariant]> {
        self.keywords.get(keyword).map(Vec::as_slice)
    }

    pub fn data_type_text(&self, data_type: DataType) -> Option<&DialectText> {
        self.data_types.get(&data_type)
    }

    pub fn unmapped_data_types(&self) -> Vec<DataType> {
        DataType::ALL
            .into_iter()
            .filter(|dt| !self.data_types.contains_key(dt))
            .collect()
    }
}

fn build_variant(mapping: DialectMapping) -> Result<KeywordVariant> {
    let tokens = mapping
        .tokens
        .into_iter()
        .map(|t| -> Result<FollowingToken> {
            Ok(FollowingToken {
                token_type: t.token_name.parse()?,
                required: t.required,
                count: t.count,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(KeywordVariant {
        text: DialectText {
            postgres: mapping.postgres,
            bigquery: mapping.big_query,
        },
        tokens,
    })
}

impl KeywordCatalog for KeywordMap {
    fn is_enabled(&self, keyword: &str) -> bool {
        self.enabled.contains(keyword)
    }

    fn resolve_variant(&self, keyword: &str, variant: usize, dialect: Dialect) -> Result<&str> {
        if !self.is_enabled(keyword) {
            return Err(GenError::DisabledKeyword {
                keyword: keyword.to_string(),
            });
        }
        let unmapped = || GenError::UnmappedKeyword {
            keyword: if variant == 0 {
                keyword.to_string()
            } else {
                format!("{keyword}#{variant}")
            },
            dialect,
        };
        let text = self
            .keywords
            .get(keyword)
            .and_then(|v| v.get(variant))
            .map(|v| v.text.get(dialect))
            .ok_or_else(unmapped)?;
        if text.trim().is_empty() {
            return Err(unmapped());
        }
        Ok(text)
    }

    fn resolve_data_type(&self, data_type: DataType, dialect: Dialect) -> Result<&str> {
        self.data_types
            .get(&data_type)
            .map(|t| t.get(dialect))
            .ok_or_else(|| GenError::UnmappedKeyword {
                keyword: data_type.config_key(),
                dialect,
            })
    }
}

/// In-code construction of a [`KeywordMap`], validated the same way as JSON input.
#[derive(Debug, Default)]
pub struct KeywordMapBuilder {
    config: KeywordConfig,
}

impl KeywordMapBuilder {
    fn indicate(&mut self, keyword: &str, included: bool) {
        let indicators = &mut self.config.keywords.feature_indicators;
        match indicators.iter_mut().find(|i| i.feature == keyword) {
            Some(indicator) => indicator.is_included = included,
            None => indicators.push(FeatureIndicator {
                feature: keyword.to_string(),
                is_included: included,
            }),
        }
    }

    fn add_variant(&mut self, keyword: &str, postgres: &str, bigquery: &str) {
        let mapping = DialectMapping {
            postgres: postgres.to_string(),
            big_query: bigquery.to_string(),
            tokens: Vec::new(),
        };
        match self.config.features.iter_mut().find(|f| f.feature == keyword) {
            Some(feature) => feature.all_mappings.push(mapping),
            None => self.config.features.push(FeatureMapping {
                feature: keyword.to_string(),
                all_mappings: vec![mapping],
            }),
        }
    }

    /// Enable `keyword` and append a variant. Call again for further variants.
    pub fn keyword(mut self, keyword: &str, postgres: &str, bigquery: &str) -> Self {
        self.indicate(keyword, true);
        self.add_variant(keyword, postgres, bigquery);
        self
    }

    /// Map `keyword` but leave it disabled.
    pub fn disabled_keyword(mut self, keyword: &str, postgres: &str, bigquery: &str) -> Self {
        self.indicate(keyword, false);
        self.add_variant(keyword, postgres, bigquery);
        self
    }

    pub fn data_type(mut self, data_type: DataType, postgres: &str, bigquery: &str) -> Self {
        self.config.data_types.data_type_maps.push(DataTypeMapping {
            data_type,
            postgres: postgres.to_string(),
            big_query: bigquery.to_string(),
        });
        self
    }

    pub fn build(self) -> Result<KeywordMap> {
        KeywordMap::from_config(self.config)
    }
}
