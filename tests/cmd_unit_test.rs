//! Unit tests for command helpers.

use clap::Parser;
use sql_template_gen::cmd::generate::synthesize_tables;
use sql_template_gen::cmd::keywords::collect;
use sql_template_gen::cmd::{Cli, Commands};
use sql_template_gen::KeywordMap;

#[test]
fn test_synthesized_tables_are_seeded() {
    let a = synthesize_tables(10, 3, 4, 2).unwrap();
    let b = synthesize_tables(10, 3, 4, 2).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 3);
    assert_eq!(a[0].name(), "table_1");
    assert!(a.iter().all(|t| t.len() == 4 && t.row_count() == 2));

    assert!(synthesize_tables(10, 0, 4, 0).is_err());
    assert!(synthesize_tables(10, 2, 0, 0).is_err());
}

#[test]
fn test_keywords_listing() {
    let catalog = KeywordMap::builtin().unwrap();

    let enabled = collect(&catalog, false);
    assert!(enabled.keywords.iter().all(|k| k.enabled));
    assert!(!enabled.keywords.iter().any(|k| k.name == "DDL_CLUSTER_BY"));
    assert_eq!(enabled.data_types.len(), 16);

    let all = collect(&catalog, true);
    let cluster = all
        .keywords
        .iter()
        .find(|k| k.name == "DDL_CLUSTER_BY")
        .unwrap();
    assert!(!cluster.enabled);
    assert_eq!(cluster.variants[0].tokens, vec!["cluster_exp".to_string()]);

    let json = serde_json::to_value(&all).unwrap();
    assert!(json["data_types"].is_array());
}

#[test]
fn test_cli_parses_generate() {
    let cli = Cli::try_parse_from([
        "sql-template-gen",
        "generate",
        "-n",
        "25",
        "--seed",
        "3",
        "--fail-fast",
        "--dry-run",
        "--json",
    ])
    .unwrap();
    match cli.command {
        Commands::Generate {
            statements,
            seed,
            fail_fast,
            dry_run,
            json,
            output,
            ..
        } => {
            assert_eq!(statements, Some(25));
            assert_eq!(seed, Some(3));
            assert!(fail_fast && dry_run && json);
            assert_eq!(output.to_str(), Some("outputs"));
        }
        _ => panic!("expected generate"),
    }
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let out = temp_dir.path().join("outputs");
    sql_template_gen::cmd::generate::run(
        None,
        None,
        out.clone(),
        Some(20),
        Some(1),
        Some(2),
        Some(2),
        Some(4),
        None,
        false,
        false,
        true,
        true,
    )
    .unwrap();
    assert!(!out.exists());
}

#[test]
fn test_generate_writes_aligned_files() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let out = temp_dir.path().join("outputs");
    sql_template_gen::cmd::generate::run(
        None,
        None,
        out.clone(),
        Some(30),
        Some(8),
        Some(1),
        Some(2),
        Some(5),
        None,
        false,
        false,
        false,
        true,
    )
    .unwrap();

    let counts: Vec<usize> = [
        "bq_skeleton.txt",
        "bq_tokenized.txt",
        "postgre_skeleton.txt",
        "postgre_tokenized.txt",
    ]
    .iter()
    .map(|name| {
        std::fs::read_to_string(out.join(name))
            .unwrap()
            .lines()
            .count()
    })
    .collect();
    assert!(counts.iter().all(|c| *c == counts[0]));
    assert!(counts[0] > 0);
}
