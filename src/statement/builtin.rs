use super::template::Template;
use crate::error::Result;
use crate::keywords::KeywordCatalog;
use crate::token::ConstructRegistry;

/// `(name, text)` of the bundled templates.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("create_table", "{DDL_CREATE_TABLE} <table_name> (<table_schema>)"),
    (
        "create_table_if_not_exists",
        "{DDL_CREATE_TABLE#1} <table_name> (<table_schema>)",
    ),
    (
        "create_partitioned",
        "{DDL_CREATE_TABLE} <table_name> (<table_schema>) {DDL_PARTITION_BY} (<partition_exp>)",
    ),
    (
        "create_clustered",
        "{DDL_CREATE_TABLE} <table_name> (<table_schema>) {DDL_CLUSTER_BY} <cluster_exp>",
    ),
    (
        "insert",
        "{DML_INSERT_INTO} <table_name> {DML_VALUES} (<insert_exp>)",
    ),
    (
        "update",
        "{DML_UPDATE} <table_name> {DML_SET} <update_item> {DQL_WHERE} <condition>",
    ),
    ("delete", "{DML_DELETE_FROM} <table_name> {DQL_WHERE} <condition>"),
    (
        "select_all",
        "{DQL_SELECT} <select_exp:columns=0> {DQL_FROM} <from_item>",
    ),
    (
        "select_where",
        "{DQL_SELECT} <select_exp> {DQL_FROM} <from_item> {DQL_WHERE} <condition>",
    ),
    (
        "select_distinct",
        "{DQL_SELECT#1} <select_exp> {DQL_FROM} <from_item>",
    ),
    (
        "grouped_count",
        "{DQL_SELECT} {DQL_COUNT_ALL} {DQL_FROM} <from_item> {DQL_GROUP_BY} <group_exp>",
    ),
    (
        "ordered_limit",
        "{DQL_SELECT} <select_exp> {DQL_FROM} <from_item> {DQL_ORDER_BY} <order_exp> <asc_desc> {DQL_LIMIT} <count>",
    ),
    (
        "ordered_offset",
        "{DQL_SELECT} <select_exp> {DQL_FROM} <from_item> {DQL_ORDER_BY} <order_exp> {DQL_LIMIT} <count> {DQL_OFFSET} <skip_rows>",
    ),
    (
        "window",
        "{DQL_SELECT} <select_exp>, {DQL_ROW_NUMBER} {DQL_OVER} (<window_exp>) {DQL_FROM} <from_item>",
    ),
];

pub fn builtin_templates() -> Result<Vec<Template>> {
    BUILTIN_TEMPLATES
        .iter()
        .map(|(name, text)| Template::parse(*name, text))
        .collect()
}

/// Drop templates that need a disabled keyword, either directly or through
/// one of their constructs.
pub fn enabled_templates(
    templates: Vec<Template>,
    catalog: &dyn KeywordCatalog,
    registry: &ConstructRegistry,
) -> Vec<Template> {
    templates
        .into_iter()
        .filter(|t| {
            let enabled = t.is_available(catalog, registry);
            if !enabled {
                tracing::debug!(template = t.name(), "template uses a disabled keyword, excluded");
            }
            enabled
        })
        .collect()
}
