//! Unit tests for output sinks.

use sql_template_gen::writer::{OutputKind, StatementWriter};
use sql_template_gen::{Batch, Dialect, DirectorySink, MemorySink, OutputSink};
use std::fs;
use tempfile::TempDir;

fn sample_batch(tag: &str) -> Batch {
    Batch {
        bq_skeleton: vec![format!("SELECT <select_exp> FROM <from_item> -- {tag}")],
        bq_tokenized: vec![format!("SELECT a FROM t -- {tag}")],
        postgre_skeleton: vec![format!("SELECT <select_exp> FROM <from_item> -- {tag}")],
        postgre_tokenized: vec![format!("SELECT a FROM t -- {tag}")],
    }
}

#[test]
fn test_statement_writer() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("out.txt");

    let mut writer = StatementWriter::new(&file_path).unwrap();
    writer.write_statement("CREATE TABLE t1 (id INT64)").unwrap();
    writer.write_statement("SELECT id FROM t1").unwrap();
    writer.flush().unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "CREATE TABLE t1 (id INT64)\nSELECT id FROM t1\n");
}

#[test]
fn test_statement_writer_flush_after_buffer_count() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("many.txt");

    let mut writer = StatementWriter::new(&file_path).unwrap();
    for i in 0..150 {
        writer.write_statement(&format!("SELECT {i}")).unwrap();
    }
    writer.flush().unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content.lines().count(), 150);
}

#[test]
fn test_file_names() {
    assert_eq!(
        OutputKind::Skeleton.file_name(Dialect::BigQuery),
        "bq_skeleton.txt"
    );
    assert_eq!(
        OutputKind::Tokenized.file_name(Dialect::Postgres),
        "postgre_tokenized.txt"
    );
}

#[test]
fn test_directory_sink_writes_four_files() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("nested").join("outputs");
    let mut sink = DirectorySink::new(&out);

    sink.write_batch(&sample_batch("first")).unwrap();
    sink.write_batch(&sample_batch("second")).unwrap();

    for name in [
        "bq_skeleton.txt",
        "bq_tokenized.txt",
        "postgre_skeleton.txt",
        "postgre_tokenized.txt",
    ] {
        let content = fs::read_to_string(out.join(name)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2, "{name}");
        assert!(lines[0].ends_with("-- first"));
        assert!(lines[1].ends_with("-- second"));
        assert!(content.ends_with('\n'));
    }
    assert_eq!(sink.file_paths().len(), 4);
}

#[test]
fn test_directory_sink_truncates_existing_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("bq_tokenized.txt"), "stale\n").unwrap();

    let mut sink = DirectorySink::new(temp_dir.path());
    sink.write_batch(&sample_batch("fresh")).unwrap();

    let content = fs::read_to_string(temp_dir.path().join("bq_tokenized.txt")).unwrap();
    assert_eq!(content, "SELECT a FROM t -- fresh\n");
}

#[test]
fn test_memory_sink_combines_batches() {
    let mut sink = MemorySink::new();
    sink.write_batch(&sample_batch("a")).unwrap();
    sink.write_batch(&sample_batch("b")).unwrap();

    let all = sink.combined();
    assert_eq!(sink.batches.len(), 2);
    assert_eq!(all.len(), 2);
    assert_eq!(all.postgre_tokenized[1], "SELECT a FROM t -- b");
}

#[test]
fn test_statement_writer_rejects_line_breaks() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("out.txt");

    let mut writer = StatementWriter::new(&file_path).unwrap();
    let err = writer
        .write_statement("SELECT a\nFROM t")
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(writer.write_statement("SELECT a\r FROM t").is_err());
    writer.flush().unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "");
}

#[test]
fn test_statement_writer_rollback_to_commit() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("out.txt");

    let mut writer = StatementWriter::new(&file_path).unwrap();
    writer.write_statement("SELECT 1").unwrap();
    writer.commit().unwrap();
    assert_eq!(writer.committed_len(), "SELECT 1\n".len() as u64);

    // enough to reach the file before the rollback
    for i in 0..120 {
        writer.write_statement(&format!("SELECT {i}")).unwrap();
    }
    writer.rollback().unwrap();
    writer.write_statement("SELECT 2").unwrap();
    writer.commit().unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "SELECT 1\nSELECT 2\n");
}

#[test]
fn test_directory_sink_failed_batch_leaves_files_aligned() {
    let temp_dir = TempDir::new().unwrap();
    let mut sink = DirectorySink::new(temp_dir.path());
    sink.write_batch(&sample_batch("first")).unwrap();

    // The last file rejects its final statement after the other three
    // already wrote past their buffer.
    let n = 150;
    let mut bad = Batch {
        bq_skeleton: vec!["SELECT <select_exp>".to_string(); n],
        bq_tokenized: vec!["SELECT a".to_string(); n],
        postgre_skeleton: vec!["SELECT <select_exp>".to_string(); n],
        postgre_tokenized: vec!["SELECT a".to_string(); n],
    };
    bad.postgre_tokenized[n - 1] = "SELECT a\nFROM t".to_string();
    assert!(sink.write_batch(&bad).is_err());

    for path in sink.file_paths() {
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1, "{}", path.display());
        assert!(content.ends_with("-- first\n"));
    }

    sink.write_batch(&sample_batch("second")).unwrap();
    for path in sink.file_paths() {
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("-- second"));
    }
}
