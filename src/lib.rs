//! Template-driven SQL generation for PostgreSQL and BigQuery.
//!
//! A statement [`Template`](statement::Template) is walked once per statement.
//! Each construct makes its random choices a single time and is then rendered
//! for both dialects, so statement *i* in one dialect is the same logical
//! request as statement *i* in the other. Keywords come from a
//! [`KeywordCatalog`](keywords::KeywordCatalog); rows, column types and
//! schemas come from [`sql_datagen`].

pub mod batch;
pub mod cmd;
pub mod config;
pub mod dialect;
pub mod error;
pub mod json_schema;
pub mod keywords;
pub mod statement;
pub mod token;
pub mod writer;

pub use batch::{Batch, BatchGenerator, BatchOptions, ErrorPolicy, GenerateStats};
pub use dialect::Dialect;
pub use error::{GenError, Result};
pub use keywords::{KeywordCatalog, KeywordMap};
pub use statement::{StatementAssembler, StatementPair, Template};
pub use token::{Token, TokenGenerator, TokenInfo, TokenParams, TokenType};
pub use writer::{DirectorySink, MemorySink, OutputSink};
