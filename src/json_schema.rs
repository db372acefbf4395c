//! JSON Schema generation for config documents and `--json` output.
//!
//! Schemas are generated with schemars and exported via the `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// All schemas by name.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // --json output
    schemas.insert(
        "generate",
        schema_for!(crate::cmd::generate::GenerateJsonOutput),
    );
    schemas.insert(
        "keywords",
        schema_for!(crate::cmd::keywords::KeywordsJsonOutput),
    );

    // input documents
    schemas.insert(
        "generate-config",
        schema_for!(crate::config::GenerateYamlConfig),
    );
    schemas.insert(
        "keywords-config",
        schema_for!(crate::keywords::config::KeywordsFile),
    );
    schemas.insert(
        "mapping-config",
        schema_for!(crate::keywords::config::MappingFile),
    );
    schemas.insert(
        "datatype-config",
        schema_for!(crate::keywords::config::DataTypeFile),
    );

    schemas
}

/// Generate a single schema by name.
pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
