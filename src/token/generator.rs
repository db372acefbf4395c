use super::draw::Draw;
use super::render::{ConstructRegistry, RenderContext};
use super::{Token, TokenInfo};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::keywords::KeywordCatalog;
use rand::RngCore;
use sql_datagen::{Table, ValueGenerator};

/// One construct rendered for both dialects from a single draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPair {
    pub draw: Draw,
    pub postgres: Token,
    pub bigquery: Token,
}

impl RenderedPair {
    pub fn get(&self, dialect: Dialect) -> &Token {
        match dialect {
            Dialect::Postgres => &self.postgres,
            Dialect::BigQuery => &self.bigquery,
        }
    }
}

/// Turns [`TokenInfo`] requests into dialect tokens.
///
/// Holds no per-statement state: the table and catalog are borrowed per call
/// and the only mutable input is the random source.
#[derive(Default)]
pub struct TokenGenerator {
    values: ValueGenerator,
    registry: ConstructRegistry,
}

impl TokenGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(mut self, values: ValueGenerator) -> Self {
        self.values = values;
        self
    }

    pub fn with_registry(mut self, registry: ConstructRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &ConstructRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ConstructRegistry {
        &mut self.registry
    }

    fn context<'a>(
        &'a self,
        table: &'a Table,
        catalog: &'a dyn KeywordCatalog,
    ) -> RenderContext<'a> {
        RenderContext {
            table,
            catalog,
            values: &self.values,
        }
    }

    /// Make every random choice `info` needs.
    pub fn draw<R: RngCore + ?Sized>(
        &self,
        info: &TokenInfo,
        table: &Table,
        catalog: &dyn KeywordCatalog,
        rng: &mut R,
    ) -> Result<Draw> {
        let construct = self.registry.get(info.token_type)?;
        let mut rng = rng;
        construct.draw(info, &self.context(table, catalog), &mut rng)
    }

    /// Render a previous draw for one dialect. Consumes no randomness.
    pub fn render(
        &self,
        info: &TokenInfo,
        draw: &Draw,
        table: &Table,
        catalog: &dyn KeywordCatalog,
        dialect: Dialect,
    ) -> Result<Token> {
        let construct = self.registry.get(info.token_type)?;
        let text = construct.render(info, draw, &self.context(table, catalog), dialect)?;
        Ok(Token {
            text,
            token_type: info.token_type,
            dialect,
        })
    }

    /// Draw once and render for both dialects.
    pub fn generate<R: RngCore + ?Sized>(
        &self,
        info: &TokenInfo,
        table: &Table,
        catalog: &dyn KeywordCatalog,
        rng: &mut R,
    ) -> Result<RenderedPair> {
        let draw = self.draw(info, table, catalog, rng)?;
        let postgres = self.render(info, &draw, table, catalog, Dialect::Postgres)?;
        let bigquery = self.render(info, &draw, table, catalog, Dialect::BigQuery)?;
        Ok(RenderedPair {
            draw,
            postgres,
            bigquery,
        })
    }
}
