//! Destinations for generated batches.

use crate::batch::Batch;
use crate::dialect::Dialect;
use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Pending bytes that force a write to the file.
pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;
/// Pending statements that force a write to the file.
pub const STMT_BUFFER_COUNT: usize = 100;

/// Accepts finished, index-aligned statement batches.
pub trait OutputSink {
    fn write_batch(&mut self, batch: &Batch) -> anyhow::Result<()>;
}

/// One statement per line, with a commit point that can be returned to.
///
/// Statements are staged in memory and written out every
/// [`STMT_BUFFER_COUNT`] statements or [`WRITER_BUFFER_SIZE`] bytes.
/// [`commit`](Self::commit) marks everything written so far as kept;
/// [`rollback`](Self::rollback) truncates the file back to that mark.
pub struct StatementWriter {
    file: File,
    pending: Vec<u8>,
    pending_count: usize,
    written: u64,
    committed: u64,
}

impl StatementWriter {
    pub fn new(filename: &Path) -> io::Result<Self> {
        Ok(Self {
            file: File::create(filename)?,
            pending: Vec::with_capacity(WRITER_BUFFER_SIZE),
            pending_count: 0,
            written: 0,
            committed: 0,
        })
    }

    /// Stage one statement. A line break inside it would shift every later
    /// line out of step with the other files, so it is rejected.
    pub fn write_statement(&mut self, stmt: &str) -> io::Result<()> {
        if stmt.contains(['\n', '\r']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("statement spans more than one line: {stmt:?}"),
            ));
        }
        self.pending.extend_from_slice(stmt.as_bytes());
        self.pending.push(b'\n');
        self.pending_count += 1;

        if self.pending_count >= STMT_BUFFER_COUNT || self.pending.len() >= WRITER_BUFFER_SIZE {
            self.write_pending()?;
        }
        Ok(())
    }

    fn write_pending(&mut self) -> io::Result<()> {
        self.file.write_all(&self.pending)?;
        self.written += self.pending.len() as u64;
        self.pending.clear();
        self.pending_count = 0;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.write_pending()?;
        self.file.flush()
    }

    /// Flush and keep everything written so far.
    pub fn commit(&mut self) -> io::Result<()> {
        self.flush()?;
        self.committed = self.written;
        Ok(())
    }

    /// Drop staged statements and truncate the file to the last commit.
    pub fn rollback(&mut self) -> io::Result<()> {
        self.pending.clear();
        self.pending_count = 0;
        self.file.set_len(self.committed)?;
        self.file.seek(SeekFrom::Start(self.committed))?;
        self.written = self.committed;
        Ok(())
    }

    /// Bytes kept by the last commit.
    pub fn committed_len(&self) -> u64 {
        self.committed
    }
}

/// Which of the four files a statement list goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Skeleton,
    Tokenized,
}

impl OutputKind {
    pub fn file_name(&self, dialect: Dialect) -> String {
        let suffix = match self {
            OutputKind::Skeleton => "skeleton",
            OutputKind::Tokenized => "tokenized",
        };
        format!("{}_{}.txt", dialect.file_prefix(), suffix)
    }
}

/// Writes `bq_skeleton.txt`, `bq_tokenized.txt`, `postgre_skeleton.txt`
/// and `postgre_tokenized.txt` into one directory.
///
/// Files are truncated on the first batch and appended to afterwards.
pub struct DirectorySink {
    output_dir: PathBuf,
    writers: Vec<(Dialect, OutputKind, StatementWriter)>,
}

impl DirectorySink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            writers: Vec::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        Self::layout()
            .map(|(dialect, kind)| self.output_dir.join(kind.file_name(dialect)))
            .collect()
    }

    fn layout() -> impl Iterator<Item = (Dialect, OutputKind)> {
        [Dialect::BigQuery, Dialect::Postgres]
            .into_iter()
            .flat_map(|d| [(d, OutputKind::Skeleton), (d, OutputKind::Tokenized)])
    }

    fn open(&mut self) -> std::io::Result<()> {
        if !self.writers.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.output_dir)?;
        for (dialect, kind) in Self::layout() {
            let path = self.output_dir.join(kind.file_name(dialect));
            self.writers
                .push((dialect, kind, StatementWriter::new(&path)?));
        }
        Ok(())
    }

    fn append(&mut self, batch: &Batch) -> io::Result<()> {
        for (dialect, kind, writer) in self.writers.iter_mut() {
            let statements = match kind {
                OutputKind::Skeleton => batch.skeletons(*dialect),
                OutputKind::Tokenized => batch.tokenized(*dialect),
            };
            for stmt in statements {
                writer.write_statement(stmt)?;
            }
        }
        for (_, _, writer) in self.writers.iter_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    fn rollback(&mut self) {
        for (dialect, kind, writer) in self.writers.iter_mut() {
            if let Err(e) = writer.rollback() {
                tracing::warn!(
                    file = %kind.file_name(*dialect),
                    error = %e,
                    "could not truncate output file after a failed batch"
                );
            }
        }
    }
}

impl OutputSink for DirectorySink {
    /// A batch lands in all four files or in none: on failure every file is
    /// truncated back to the end of the previous batch.
    fn write_batch(&mut self, batch: &Batch) -> anyhow::Result<()> {
        use anyhow::Context;

        self.open()
            .with_context(|| format!("opening output files in {}", self.output_dir.display()))?;
        if let Err(e) = self.append(batch) {
            self.rollback();
            return Err(e)
                .with_context(|| format!("writing batch to {}", self.output_dir.display()));
        }
        for (_, _, writer) in self.writers.iter_mut() {
            writer.commit()?;
        }
        Ok(())
    }
}

/// Keeps every batch in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub batches: Vec<Batch>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All batches concatenated.
    pub fn combined(&self) -> Batch {
        let mut all = Batch::default();
        for b in &self.batches {
            all.bq_skeleton.extend_from_slice(&b.bq_skeleton);
            all.bq_tokenized.extend_from_slice(&b.bq_tokenized);
            all.postgre_skeleton.extend_from_slice(&b.postgre_skeleton);
            all.postgre_tokenized.extend_from_slice(&b.postgre_tokenized);
        }
        all
    }
}

impl OutputSink for MemorySink {
    fn write_batch(&mut self, batch: &Batch) -> anyhow::Result<()> {
        self.batches.push(batch.clone());
        Ok(())
    }
}
