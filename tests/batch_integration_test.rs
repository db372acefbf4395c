//! Batch generation across templates, tables and workers.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sql_datagen::{DataType, Table};
use sql_template_gen::statement::{builtin_templates, enabled_templates};
use sql_template_gen::token::ConstructRegistry;
use sql_template_gen::{
    BatchGenerator, BatchOptions, Dialect, DirectorySink, ErrorPolicy, GenError, KeywordMap,
    OutputSink, Template, TokenGenerator,
};
use std::fs;
use tempfile::TempDir;

fn random_tables(seed: u64) -> Vec<Table> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..3)
        .map(|i| Table::random(format!("table_{i}"), 6, 10, &mut rng).unwrap())
        .collect()
}

fn options(seed: u64, workers: usize, on_error: ErrorPolicy) -> BatchOptions {
    BatchOptions {
        seed,
        workers,
        on_error,
    }
}

#[test]
fn test_output_independent_of_worker_count() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let tables = random_tables(1);

    let single = BatchGenerator::new(
        &generator,
        &catalog,
        builtin_templates().unwrap(),
        &tables,
        options(7, 1, ErrorPolicy::Skip),
    )
    .unwrap()
    .generate(150)
    .unwrap();
    let parallel = BatchGenerator::new(
        &generator,
        &catalog,
        builtin_templates().unwrap(),
        &tables,
        options(7, 4, ErrorPolicy::Skip),
    )
    .unwrap()
    .generate(150)
    .unwrap();

    assert_eq!(single.0, parallel.0);
    assert_eq!(single.1.generated, parallel.1.generated);
    assert_eq!(parallel.1.workers, 4);
}

#[test]
fn test_four_lists_stay_aligned() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let tables = random_tables(2);
    let (batch, stats) = BatchGenerator::new(
        &generator,
        &catalog,
        builtin_templates().unwrap(),
        &tables,
        options(99, 3, ErrorPolicy::Skip),
    )
    .unwrap()
    .generate(200)
    .unwrap();

    assert_eq!(stats.generated + stats.skipped, 200);
    assert_eq!(batch.len(), stats.generated);
    for list in [
        &batch.bq_skeleton,
        &batch.bq_tokenized,
        &batch.postgre_skeleton,
        &batch.postgre_tokenized,
    ] {
        assert_eq!(list.len(), stats.generated);
    }
    assert_eq!(
        stats.per_template.values().sum::<usize>(),
        stats.generated
    );

    for i in 0..batch.len() {
        // statement kinds line up across dialects
        let pg_first = batch.postgre_skeleton[i].split(' ').next();
        let bq_first = batch.bq_skeleton[i].split(' ').next();
        assert_eq!(pg_first, bq_first);
        assert!(!batch.tokenized(Dialect::Postgres)[i].contains("CLUSTER BY"));
        assert!(!batch.tokenized(Dialect::BigQuery)[i].contains("CLUSTER BY"));
    }
}

#[test]
fn test_skip_policy_drops_failed_statements() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    // no column can be partitioned in both dialects
    let tables = vec![Table::new("notes").column("body", DataType::Str).unwrap()];

    let (batch, stats) = BatchGenerator::new(
        &generator,
        &catalog,
        builtin_templates().unwrap(),
        &tables,
        options(3, 2, ErrorPolicy::Skip),
    )
    .unwrap()
    .generate(200)
    .unwrap();

    assert!(stats.skipped > 0);
    assert_eq!(batch.len(), 200 - stats.skipped);
    assert!(!stats.per_template.contains_key("create_partitioned"));
    assert!(batch
        .postgre_tokenized
        .iter()
        .all(|s| !s.contains("PARTITION BY RANGE")));
}

#[test]
fn test_abort_policy_returns_first_error() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let tables = vec![Table::new("notes").column("body", DataType::Str).unwrap()];

    let result = BatchGenerator::new(
        &generator,
        &catalog,
        builtin_templates().unwrap(),
        &tables,
        options(3, 2, ErrorPolicy::Abort),
    )
    .unwrap()
    .generate(200);

    assert!(matches!(result, Err(GenError::NoEligibleColumn { .. })));
}

#[test]
fn test_zero_weight_template_never_picked() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let tables = random_tables(4);
    let templates = vec![
        Template::parse("insert", "{DML_INSERT_INTO} <table_name> {DML_VALUES} (<insert_exp>)")
            .unwrap()
            .with_weight(3),
        Template::parse("delete", "{DML_DELETE_FROM} <table_name> {DQL_WHERE} <condition>")
            .unwrap()
            .with_weight(0),
    ];

    let (_, stats) = BatchGenerator::new(
        &generator,
        &catalog,
        templates,
        &tables,
        options(5, 1, ErrorPolicy::Abort),
    )
    .unwrap()
    .generate(50)
    .unwrap();

    assert_eq!(stats.per_template.get("insert"), Some(&50));
    assert!(!stats.per_template.contains_key("delete"));
}

#[test]
fn test_statement_is_reproducible_by_index() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let tables = random_tables(6);
    let batch_gen = BatchGenerator::new(
        &generator,
        &catalog,
        builtin_templates().unwrap(),
        &tables,
        options(11, 1, ErrorPolicy::Skip),
    )
    .unwrap();

    for index in [0, 17, 42] {
        let a = batch_gen.statement(index);
        let b = batch_gen.statement(index);
        assert_eq!(a, b);
    }
}

#[test]
fn test_constructor_rejects_unusable_inputs() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let tables = random_tables(8);

    let no_tables = BatchGenerator::new(
        &generator,
        &catalog,
        builtin_templates().unwrap(),
        &[],
        BatchOptions::default(),
    );
    assert!(matches!(no_tables, Err(GenError::InvalidArgument(_))));

    let only_disabled = vec![Template::parse(
        "clustered",
        "{DDL_CREATE_TABLE} <table_name> (<table_schema>) {DDL_CLUSTER_BY} <cluster_exp>",
    )
    .unwrap()];
    let none_enabled = BatchGenerator::new(
        &generator,
        &catalog,
        only_disabled,
        &tables,
        BatchOptions::default(),
    );
    assert!(matches!(none_enabled, Err(GenError::InvalidArgument(_))));

    let all_zero = vec![Template::parse("t", "{DQL_SELECT} <select_exp> {DQL_FROM} <from_item>")
        .unwrap()
        .with_weight(0)];
    assert!(BatchGenerator::new(
        &generator,
        &catalog,
        all_zero,
        &tables,
        BatchOptions::default()
    )
    .is_err());
}

#[test]
fn test_empty_request() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let tables = random_tables(9);
    let (batch, stats) = BatchGenerator::new(
        &generator,
        &catalog,
        builtin_templates().unwrap(),
        &tables,
        options(1, 8, ErrorPolicy::Abort),
    )
    .unwrap()
    .generate(0)
    .unwrap();
    assert!(batch.is_empty());
    assert_eq!(stats.generated, 0);
}

#[test]
fn test_window_template_dropped_when_window_keyword_disabled() {
    // the template text names no disabled keyword; the window construct does
    let catalog = KeywordMap::builder()
        .keyword("DQL_SELECT", "SELECT", "SELECT")
        .keyword("DQL_FROM", "FROM", "FROM")
        .keyword("DQL_ROW_NUMBER", "ROW_NUMBER()", "ROW_NUMBER()")
        .keyword("DQL_OVER", "OVER", "OVER")
        .keyword("DQL_ORDER_BY", "ORDER BY", "ORDER BY")
        .disabled_keyword("DQL_PARTITION_BY", "PARTITION BY", "PARTITION BY")
        .build()
        .unwrap();
    let generator = TokenGenerator::new();
    let tables = random_tables(12);
    let window = Template::parse(
        "window",
        "{DQL_SELECT} <select_exp>, {DQL_ROW_NUMBER} {DQL_OVER} (<window_exp>) {DQL_FROM} <from_item>",
    )
    .unwrap();
    let select = Template::parse("select", "{DQL_SELECT} <select_exp> {DQL_FROM} <from_item>").unwrap();
    assert!(window.is_enabled(&catalog));
    assert!(!window.is_available(&catalog, generator.registry()));

    let kept = enabled_templates(
        vec![window.clone(), select.clone()],
        &catalog,
        generator.registry(),
    );
    assert_eq!(kept, vec![select.clone()]);

    let only_window = BatchGenerator::new(
        &generator,
        &catalog,
        vec![window.clone()],
        &tables,
        BatchOptions::default(),
    );
    assert!(matches!(only_window, Err(GenError::InvalidArgument(_))));

    let (batch, stats) = BatchGenerator::new(
        &generator,
        &catalog,
        vec![window, select],
        &tables,
        options(2, 2, ErrorPolicy::Abort),
    )
    .unwrap()
    .generate(40)
    .unwrap();
    assert_eq!(batch.len(), 40);
    assert_eq!(stats.per_template.get("select"), Some(&40));
}

#[test]
fn test_template_without_renderer_is_dropped() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new().with_registry(ConstructRegistry::empty());
    let tables = random_tables(13);
    let template = Template::parse("select", "{DQL_SELECT} <select_exp> {DQL_FROM} <from_item>").unwrap();

    let result = BatchGenerator::new(
        &generator,
        &catalog,
        vec![template],
        &tables,
        BatchOptions::default(),
    );
    assert!(matches!(result, Err(GenError::InvalidArgument(_))));
}

#[test]
fn test_multiline_template_keeps_files_aligned() {
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let tables = random_tables(14);
    let template = Template::parse(
        "select_multiline",
        "{DQL_SELECT} <select_exp>\n  {DQL_FROM} <from_item>\r\n",
    )
    .unwrap();

    let (batch, _) = BatchGenerator::new(
        &generator,
        &catalog,
        vec![template],
        &tables,
        options(4, 1, ErrorPolicy::Abort),
    )
    .unwrap()
    .generate(3)
    .unwrap();

    let temp_dir = TempDir::new().unwrap();
    let mut sink = DirectorySink::new(temp_dir.path());
    sink.write_batch(&batch).unwrap();

    for path in sink.file_paths() {
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3, "{}", path.display());
        assert!(lines.iter().all(|l| l.starts_with("SELECT ") && l.contains(" FROM ")));
    }
    assert!(batch.postgre_skeleton[0].starts_with("SELECT <select_exp> FROM <from_item>"));
}
