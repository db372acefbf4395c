pub mod generate;
pub mod keywords;
pub mod schema;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-template-gen")]
#[command(version)]
#[command(
    about = "Generate aligned PostgreSQL and BigQuery statements from SQL templates",
    long_about = None
)]
pub struct Cli {
    /// Verbose output (debug logging; RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate skeleton and tokenized statements for both dialects
    Generate {
        /// YAML config file (seed, tables, templates, temporal mode, ...)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory with keywords.json, *_mapping.json and datatype_mapping.json
        /// (bundled defaults if not specified)
        #[arg(short, long)]
        keywords: Option<PathBuf>,

        /// Output directory for the four statement files
        #[arg(short, long, default_value = "outputs")]
        output: PathBuf,

        /// Number of statements to generate
        #[arg(short = 'n', long)]
        statements: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads (defaults to available parallelism)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Number of random tables to synthesize when the config declares none
        #[arg(short, long)]
        tables: Option<usize>,

        /// Columns per synthesized table
        #[arg(long)]
        columns: Option<usize>,

        /// Row count recorded on synthesized tables
        #[arg(long)]
        rows: Option<usize>,

        /// Stop on the first statement that fails to generate
        #[arg(long)]
        fail_fast: bool,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Generate without writing files (dry run)
        #[arg(long)]
        dry_run: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the keyword and data type mapping per dialect
    Keywords {
        /// Directory with the keyword configuration (bundled defaults if not specified)
        #[arg(short, long)]
        keywords: Option<PathBuf>,

        /// Include disabled keywords
        #[arg(short, long)]
        all: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print JSON schemas for config files and --json output
    Schema {
        /// Schema name (all schemas if not specified)
        name: Option<String>,

        /// Write one <name>.schema.json file per schema into this directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            config,
            keywords,
            output,
            statements,
            seed,
            workers,
            tables,
            columns,
            rows,
            fail_fast,
            progress,
            dry_run,
            json,
        } => generate::run(
            config, keywords, output, statements, seed, workers, tables, columns, rows,
            fail_fast, progress, dry_run, json,
        ),
        Commands::Keywords {
            keywords,
            all,
            json,
        } => keywords::run(keywords, all, json),
        Commands::Schema { name, output_dir } => schema::run(name, output_dir),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "sql-template-gen",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
