//! Batch generation of index-aligned statements.
//!
//! Statement `i` is generated from its own `ChaCha8Rng` stream, so the output
//! depends only on the seed and the inputs, never on how statements were
//! distributed across workers.

use crate::dialect::Dialect;
use crate::error::{GenError, Result};
use crate::keywords::KeywordCatalog;
use crate::statement::{enabled_templates, StatementAssembler, StatementPair, Template};
use crate::token::TokenGenerator;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sql_datagen::Table;
use std::collections::BTreeMap;
use std::fmt;

/// What to do with a statement that fails to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log and drop the statement
    #[default]
    Skip,
    /// Stop at the first failure
    Abort,
}

impl std::str::FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(ErrorPolicy::Skip),
            "abort" => Ok(ErrorPolicy::Abort),
            _ => Err(format!(
                "Unknown error policy: {}. Valid options: skip, abort",
                s
            )),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Skip => write!(f, "skip"),
            ErrorPolicy::Abort => write!(f, "abort"),
        }
    }
}

/// Four index-aligned statement lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub bq_skeleton: Vec<String>,
    pub bq_tokenized: Vec<String>,
    pub postgre_skeleton: Vec<String>,
    pub postgre_tokenized: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.postgre_tokenized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, statement: StatementPair) {
        self.bq_skeleton.push(statement.bigquery.skeleton);
        self.bq_tokenized.push(statement.bigquery.tokenized);
        self.postgre_skeleton.push(statement.postgres.skeleton);
        self.postgre_tokenized.push(statement.postgres.tokenized);
    }

    pub fn skeletons(&self, dialect: Dialect) -> &[String] {
        match dialect {
            Dialect::Postgres => &self.postgre_skeleton,
            Dialect::BigQuery => &self.bq_skeleton,
        }
    }

    pub fn tokenized(&self, dialect: Dialect) -> &[String] {
        match dialect {
            Dialect::Postgres => &self.postgre_tokenized,
            Dialect::BigQuery => &self.bq_tokenized,
        }
    }
}

/// Generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub seed: u64,
    /// Worker threads; 0 or 1 runs on the calling thread.
    pub workers: usize,
    pub on_error: ErrorPolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            workers: 1,
            on_error: ErrorPolicy::Skip,
        }
    }
}

/// Statistics for one generate run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct GenerateStats {
    pub seed: u64,
    pub requested: usize,
    pub generated: usize,
    pub skipped: usize,
    pub workers: usize,
    /// Emitted statements per template name
    pub per_template: BTreeMap<String, usize>,
}

/// `(statement index, template index, result)`
type Outcome = (usize, usize, Result<StatementPair>);

pub struct BatchGenerator<'a> {
    generator: &'a TokenGenerator,
    catalog: &'a dyn KeywordCatalog,
    templates: Vec<Template>,
    weights: WeightedIndex<u32>,
    tables: &'a [Table],
    options: BatchOptions,
}

impl<'a> BatchGenerator<'a> {
    /// Templates needing a disabled keyword are dropped here.
    pub fn new(
        generator: &'a TokenGenerator,
        catalog: &'a dyn KeywordCatalog,
        templates: Vec<Template>,
        tables: &'a [Table],
        options: BatchOptions,
    ) -> Result<Self> {
        if tables.is_empty() {
            return Err(GenError::InvalidArgument(
                "at least one table is required".to_string(),
            ));
        }
        let templates = enabled_templates(templates, catalog, generator.registry());
        if templates.is_empty() {
            return Err(GenError::InvalidArgument(
                "no template has all of its keywords enabled".to_string(),
            ));
        }
        let weights = WeightedIndex::new(templates.iter().map(Template::weight))
            .map_err(|e| GenError::InvalidArgument(format!("template weights: {e}")))?;

        Ok(Self {
            generator,
            catalog,
            templates,
            weights,
            tables,
            options,
        })
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Build statement `index` from its own random stream.
    pub fn statement(&self, index: usize) -> Result<StatementPair> {
        self.outcome(index).2
    }

    fn outcome(&self, index: usize) -> Outcome {
        let mut rng = ChaCha8Rng::seed_from_u64(self.options.seed);
        rng.set_stream(index as u64);

        let template = self.weights.sample(&mut rng);
        let table = &self.tables[rng.random_range(0..self.tables.len())];
        let result = StatementAssembler::new(self.generator, self.catalog).assemble(
            &self.templates[template],
            table,
            &mut rng,
        );
        (index, template, result)
    }

    pub fn generate(&self, count: usize) -> Result<(Batch, GenerateStats)> {
        self.generate_with_progress(count, |_| {})
    }

    /// Generate `count` statements, calling `on_progress` with the number
    /// finished so far.
    pub fn generate_with_progress<F>(
        &self,
        count: usize,
        on_progress: F,
    ) -> Result<(Batch, GenerateStats)>
    where
        F: Fn(u64) + Sync,
    {
        let workers = self.options.workers.max(1).min(count.max(1));
        tracing::debug!(count, workers, seed = self.options.seed, "generating batch");

        let outcomes = if workers == 1 {
            (0..count)
                .map(|i| {
                    let outcome = self.outcome(i);
                    on_progress(i as u64 + 1);
                    outcome
                })
                .collect::<Vec<_>>()
        } else {
            self.generate_parallel(count, workers, &on_progress)
        };

        let mut batch = Batch::default();
        let mut stats = GenerateStats {
            seed: self.options.seed,
            requested: count,
            workers,
            ..Default::default()
        };

        for (index, template, result) in outcomes {
            match result {
                Ok(statement) => {
                    *stats
                        .per_template
                        .entry(statement.template.clone())
                        .or_default() += 1;
                    batch.push(statement);
                    stats.generated += 1;
                }
                Err(e) => match self.options.on_error {
                    ErrorPolicy::Abort => return Err(e),
                    ErrorPolicy::Skip => {
                        let template = self.templates[template].name();
                        tracing::warn!(index, template, error = %e, "skipping statement");
                        stats.skipped += 1;
                    }
                },
            }
        }

        Ok((batch, stats))
    }

    fn generate_parallel<F>(&self, count: usize, workers: usize, on_progress: &F) -> Vec<Outcome>
    where
        F: Fn(u64) + Sync,
    {
        let chunk = count.div_ceil(workers);
        let done = std::sync::atomic::AtomicU64::new(0);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|w| {
                    let start = (w * chunk).min(count);
                    let end = ((w + 1) * chunk).min(count);
                    let done = &done;
                    scope.spawn(move || {
                        tracing::debug!(worker = w, start, end, "worker started");
                        (start..end)
                            .map(|i| {
                                let outcome = self.outcome(i);
                                let n = done.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                                on_progress(n + 1);
                                outcome
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut outcomes = Vec::with_capacity(count);
            for handle in handles {
                match handle.join() {
                    Ok(chunk) => outcomes.extend(chunk),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            outcomes
        })
    }
}
