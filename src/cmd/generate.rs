use crate::batch::{BatchGenerator, BatchOptions, ErrorPolicy, GenerateStats};
use crate::config::GenerateYamlConfig;
use crate::keywords::KeywordMap;
use crate::token::TokenGenerator;
use crate::writer::{DirectorySink, OutputSink};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use schemars::JsonSchema;
use serde::Serialize;
use sql_datagen::Table;
use std::path::PathBuf;
use std::time::Instant;

pub const DEFAULT_STATEMENTS: usize = 100;
pub const DEFAULT_TABLES: usize = 3;
pub const DEFAULT_COLUMNS: usize = 6;

/// Stream reserved for schema synthesis; statements use streams `0..n`.
const SCHEMA_STREAM: u64 = u64::MAX;

/// JSON output for generate command
#[derive(Serialize, JsonSchema)]
pub struct GenerateJsonOutput {
    pub output_dir: String,
    pub dry_run: bool,
    pub elapsed_secs: f64,
    pub tables: Vec<String>,
    pub templates: Vec<String>,
    pub files: Vec<String>,
    pub statistics: GenerateStats,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: Option<PathBuf>,
    keywords: Option<PathBuf>,
    output: PathBuf,
    statements: Option<usize>,
    seed: Option<u64>,
    workers: Option<usize>,
    tables: Option<usize>,
    columns: Option<usize>,
    rows: Option<usize>,
    fail_fast: bool,
    progress: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => GenerateYamlConfig::load(&path)?,
        None => GenerateYamlConfig::default(),
    };
    let catalog = match keywords {
        Some(dir) => KeywordMap::load_dir(&dir)?,
        None => KeywordMap::builtin()?,
    };

    let seed = seed.or(config.seed).unwrap_or_else(rand::random);
    let count = statements.or(config.statements).unwrap_or(DEFAULT_STATEMENTS);
    let workers = workers.or(config.workers).unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    let on_error = if fail_fast {
        ErrorPolicy::Abort
    } else {
        config.on_error.unwrap_or_default()
    };
    tracing::debug!(seed, count, workers, %on_error, "generate settings");

    let mut schema = config.build_tables()?;
    if schema.is_empty() {
        schema = synthesize_tables(
            seed,
            tables.unwrap_or(DEFAULT_TABLES),
            columns.unwrap_or(DEFAULT_COLUMNS),
            rows.unwrap_or(0),
        )?;
    } else if tables.is_some() || columns.is_some() {
        tracing::warn!("--tables/--columns ignored: the config file declares its own tables");
    }

    let templates = config.build_templates()?;
    let generator = TokenGenerator::new().with_values(config.value_generator()?);
    let batch_gen = BatchGenerator::new(
        &generator,
        &catalog,
        templates,
        &schema,
        BatchOptions {
            seed,
            workers,
            on_error,
        },
    )?;

    if !json {
        eprintln!(
            "Generating {} statements over {} tables ({} templates, seed {})",
            count,
            schema.len(),
            batch_gen.templates().len(),
            seed
        );
    }

    let start_time = Instant::now();
    let pb = if progress && !json {
        let pb = ProgressBar::new(count as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} statements ({percent}%)",
            )
            .unwrap()
            .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let (batch, stats) = batch_gen.generate_with_progress(count, |done| {
        if let Some(ref pb) = pb {
            pb.set_position(done);
        }
    })?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let sink = DirectorySink::new(&output);
    let files: Vec<String> = sink
        .file_paths()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    if !dry_run {
        let mut sink = sink;
        sink.write_batch(&batch)?;
    }
    let elapsed = start_time.elapsed();

    if json {
        let out = GenerateJsonOutput {
            output_dir: output.display().to_string(),
            dry_run,
            elapsed_secs: elapsed.as_secs_f64(),
            tables: schema.iter().map(|t| t.name().to_string()).collect(),
            templates: batch_gen
                .templates()
                .iter()
                .map(|t| t.name().to_string())
                .collect(),
            files,
            statistics: stats,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    eprintln!(
        "Generated {} statements ({} skipped) in {:.3?}",
        stats.generated, stats.skipped, elapsed
    );
    if dry_run {
        eprintln!("Dry run complete. No files written.");
    } else {
        for file in &files {
            eprintln!("  {}", file);
        }
    }
    Ok(())
}

/// Tables named `table_1..=n` with random columns, drawn from a stream
/// separate from every statement stream.
pub fn synthesize_tables(
    seed: u64,
    tables: usize,
    columns: usize,
    rows: usize,
) -> anyhow::Result<Vec<Table>> {
    if tables == 0 {
        anyhow::bail!("--tables must be at least 1");
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(SCHEMA_STREAM);
    (1..=tables)
        .map(|i| Ok(Table::random(format!("table_{i}"), columns, rows, &mut rng)?))
        .collect()
}
