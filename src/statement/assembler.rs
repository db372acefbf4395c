use super::template::{Segment, Template};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::keywords::KeywordCatalog;
use crate::token::{Token, TokenGenerator, TokenType};
use rand::RngCore;
use sql_datagen::Table;

/// What occupies one position of an assembled statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Keyword(String),
    Construct(TokenType),
}

/// One statement in one dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialectStatement {
    /// Keywords resolved, constructs shown as `<token_type>`.
    pub skeleton: String,
    /// Keywords and constructs both resolved.
    pub tokenized: String,
    /// Keyword and construct positions, shared by both strings.
    pub parts: Vec<Part>,
}

impl DialectStatement {
    fn push_text(&mut self, text: &str) {
        self.skeleton.push_str(text);
        self.tokenized.push_str(text);
    }

    fn push_keyword(&mut self, keyword: &str, lexeme: &str) {
        self.push_text(lexeme);
        self.parts.push(Part::Keyword(keyword.to_string()));
    }

    fn push_token(&mut self, token: &Token) {
        self.skeleton.push_str(&token.token_type.placeholder());
        self.tokenized.push_str(&token.text);
        self.parts.push(Part::Construct(token.token_type));
    }
}

/// The same logical statement in both dialects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementPair {
    pub template: String,
    pub postgres: DialectStatement,
    pub bigquery: DialectStatement,
}

impl StatementPair {
    pub fn get(&self, dialect: Dialect) -> &DialectStatement {
        match dialect {
            Dialect::Postgres => &self.postgres,
            Dialect::BigQuery => &self.bigquery,
        }
    }
}

/// Walks a template once, rendering every keyword and construct for both
/// dialects side by side.
///
/// Output is built in local buffers and only returned when every part
/// succeeded, so a failure leaves nothing half-written.
pub struct StatementAssembler<'a> {
    generator: &'a TokenGenerator,
    catalog: &'a dyn KeywordCatalog,
}

impl<'a> StatementAssembler<'a> {
    pub fn new(generator: &'a TokenGenerator, catalog: &'a dyn KeywordCatalog) -> Self {
        Self { generator, catalog }
    }

    pub fn assemble<R: RngCore + ?Sized>(
        &self,
        template: &Template,
        table: &Table,
        rng: &mut R,
    ) -> Result<StatementPair> {
        let mut postgres = DialectStatement::default();
        let mut bigquery = DialectStatement::default();

        for segment in template.segments() {
            match segment {
                Segment::Text(text) => {
                    postgres.push_text(text);
                    bigquery.push_text(text);
                }
                Segment::Keyword { name, variant } => {
                    let pg = self
                        .catalog
                        .resolve_variant(name, *variant, Dialect::Postgres)?;
                    let bq = self
                        .catalog
                        .resolve_variant(name, *variant, Dialect::BigQuery)?;
                    postgres.push_keyword(name, pg);
                    bigquery.push_keyword(name, bq);
                }
                Segment::Construct(info) => {
                    let pair = self.generator.generate(info, table, self.catalog, rng)?;
                    postgres.push_token(&pair.postgres);
                    bigquery.push_token(&pair.bigquery);
                }
            }
        }

        Ok(StatementPair {
            template: template.name().to_string(),
            postgres,
            bigquery,
        })
    }
}
