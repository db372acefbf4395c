use super::draw::{CompareOp, Draw, SortDirection};
use super::{TokenInfo, TokenType, DEFAULT_BOUND};
use crate::dialect::Dialect;
use crate::error::{GenError, Result};
use crate::keywords::KeywordCatalog;
use ahash::AHashMap;
use rand::seq::index;
use rand::RngCore;
use sql_datagen::random::{random_element, random_integer};
use sql_datagen::{Column, DataType, Table, ValueGenerator};

const KW_PARTITION_BY: &str = "DQL_PARTITION_BY";
const KW_ORDER_BY: &str = "DQL_ORDER_BY";

/// BigQuery accepts a single partitioning expression.
const MAX_PARTITION_COLUMNS: usize = 1;
/// BigQuery accepts at most four clustering columns.
const MAX_CLUSTER_COLUMNS: usize = 4;

/// Everything a construct may read while drawing or rendering.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub table: &'a Table,
    pub catalog: &'a dyn KeywordCatalog,
    pub values: &'a ValueGenerator,
}

/// Renderer for one [`TokenType`].
///
/// `draw` is the only place randomness is consumed. `render` is a pure
/// function of the draw, so calling it once per dialect cannot diverge.
pub trait Construct: Send + Sync {
    fn token_type(&self) -> TokenType;

    fn draw(
        &self,
        info: &TokenInfo,
        ctx: &RenderContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Draw>;

    fn render(
        &self,
        info: &TokenInfo,
        draw: &Draw,
        ctx: &RenderContext<'_>,
        dialect: Dialect,
    ) -> Result<String>;

    /// Keywords the construct resolves itself while rendering.
    fn keywords(&self) -> &'static [&'static str] {
        &[]
    }

    /// False when the catalog disables a keyword this construct needs.
    fn is_available(&self, catalog: &dyn KeywordCatalog) -> bool {
        self.keywords().iter().all(|k| catalog.is_enabled(k))
    }
}

/// Dispatch table from [`TokenType`] to its renderer.
pub struct ConstructRegistry {
    constructs: AHashMap<TokenType, Box<dyn Construct>>,
}

impl ConstructRegistry {
    /// Registry with no renderers; every lookup fails until one is registered.
    pub fn empty() -> Self {
        Self {
            constructs: AHashMap::new(),
        }
    }

    /// Registry with a renderer for every [`TokenType`].
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TableRef(TokenType::TableName)));
        registry.register(Box::new(TableRef(TokenType::FromItem)));
        registry.register(Box::new(TableSchema));
        registry.register(Box::new(ColumnList {
            token_type: TokenType::PartitionExp,
            role: "partitionable in every dialect",
            eligible: |dt| Dialect::ALL.iter().all(|d| d.can_partition_by(dt)),
            allow_star: false,
            max_columns: Some(MAX_PARTITION_COLUMNS),
        }));
        registry.register(Box::new(ColumnList {
            token_type: TokenType::ClusterExp,
            role: "clusterable in every dialect",
            eligible: |dt| Dialect::ALL.iter().all(|d| d.can_cluster_by(dt)),
            allow_star: false,
            max_columns: Some(MAX_CLUSTER_COLUMNS),
        }));
        registry.register(Box::new(ColumnList {
            token_type: TokenType::SelectExp,
            role: "selectable",
            eligible: |_| true,
            allow_star: true,
            max_columns: None,
        }));
        registry.register(Box::new(ColumnList {
            token_type: TokenType::GroupExp,
            role: "groupable",
            eligible: |_| true,
            allow_star: false,
            max_columns: None,
        }));
        registry.register(Box::new(ColumnList {
            token_type: TokenType::OrderExp,
            role: "orderable",
            eligible: |_| true,
            allow_star: false,
            max_columns: None,
        }));
        registry.register(Box::new(InsertRow));
        registry.register(Box::new(UpdateItem));
        registry.register(Box::new(Condition));
        registry.register(Box::new(WindowSpec));
        registry.register(Box::new(AscDesc));
        registry.register(Box::new(BoundedInteger(TokenType::Count)));
        registry.register(Box::new(BoundedInteger(TokenType::SkipRows)));
        registry
    }

    /// Install `construct`, returning the renderer it replaced.
    pub fn register(&mut self, construct: Box<dyn Construct>) -> Option<Box<dyn Construct>> {
        self.constructs.insert(construct.token_type(), construct)
    }

    pub fn get(&self, token_type: TokenType) -> Result<&dyn Construct> {
        self.constructs
            .get(&token_type)
            .map(|c| &**c)
            .ok_or_else(|| {
                GenError::UnsupportedConstruct(format!("no renderer for `{token_type}`"))
            })
    }

    pub fn contains(&self, token_type: TokenType) -> bool {
        self.constructs.contains_key(&token_type)
    }
}

impl Default for ConstructRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn mismatched(token_type: TokenType, draw: &Draw) -> GenError {
    GenError::InvalidArgument(format!("`{token_type}` cannot render {draw:?}"))
}

fn column_name(table: &Table, index: usize) -> Result<&str> {
    table
        .column_at(index)
        .map(|c| c.name.as_str())
        .ok_or_else(|| {
            GenError::InvalidArgument(format!(
                "column index {index} out of range for `{}`",
                table.name()
            ))
        })
}

fn column_names(table: &Table, indices: &[usize]) -> Result<String> {
    let names = indices
        .iter()
        .map(|&i| column_name(table, i))
        .collect::<Result<Vec<_>>>()?;
    Ok(names.join(", "))
}

fn type_filter(info: &TokenInfo) -> impl Fn(&Column) -> bool + '_ {
    move |c| info.params.data_type.is_none_or(|dt| c.data_type == dt)
}

fn requirement(role: &str, info: &TokenInfo) -> String {
    match info.params.data_type {
        Some(dt) => format!("{role} of type {dt}"),
        None => role.to_string(),
    }
}

fn pick_one(
    info: &TokenInfo,
    ctx: &RenderContext<'_>,
    role: &str,
    rng: &mut dyn RngCore,
) -> Result<usize> {
    Ok(ctx
        .table
        .random_column_where(type_filter(info), &requirement(role, info), rng)?)
}

/// `table_name` and `from_item`.
struct TableRef(TokenType);

impl Construct for TableRef {
    fn token_type(&self) -> TokenType {
        self.0
    }

    fn draw(&self, _: &TokenInfo, _: &RenderContext<'_>, _: &mut dyn RngCore) -> Result<Draw> {
        Ok(Draw::TableName)
    }

    fn render(
        &self,
        _: &TokenInfo,
        draw: &Draw,
        ctx: &RenderContext<'_>,
        _: Dialect,
    ) -> Result<String> {
        match draw {
            Draw::TableName => Ok(ctx.table.name().to_string()),
            other => Err(mismatched(self.0, other)),
        }
    }
}

/// `name TYPE, ...` for every column in schema order.
struct TableSchema;

impl Construct for TableSchema {
    fn token_type(&self) -> TokenType {
        TokenType::TableSchema
    }

    fn draw(&self, _: &TokenInfo, ctx: &RenderContext<'_>, _: &mut dyn RngCore) -> Result<Draw> {
        if ctx.table.is_empty() {
            return Err(GenError::NoEligibleColumn {
                table: ctx.table.name().to_string(),
                requirement: "at least one column".to_string(),
            });
        }
        Ok(Draw::Schema)
    }

    fn render(
        &self,
        _: &TokenInfo,
        draw: &Draw,
        ctx: &RenderContext<'_>,
        dialect: Dialect,
    ) -> Result<String> {
        if *draw != Draw::Schema {
            return Err(mismatched(TokenType::TableSchema, draw));
        }
        let columns = ctx
            .table
            .columns()
            .iter()
            .map(|c| {
                let sql_type = ctx.catalog.resolve_data_type(c.data_type, dialect)?;
                Ok(format!("{} {}", c.name, sql_type))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(columns.join(", "))
    }
}

/// Distinct columns drawn from those whose type passes `eligible`.
struct ColumnList {
    token_type: TokenType,
    role: &'static str,
    eligible: fn(DataType) -> bool,
    allow_star: bool,
    max_columns: Option<usize>,
}

impl Construct for ColumnList {
    fn token_type(&self) -> TokenType {
        self.token_type
    }

    fn draw(
        &self,
        info: &TokenInfo,
        ctx: &RenderContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Draw> {
        let count = info.params.columns.unwrap_or(1);
        if count == 0 {
            if self.allow_star {
                return Ok(Draw::Star);
            }
            return Err(GenError::InvalidArgument(format!(
                "`{}` needs at least one column",
                self.token_type
            )));
        }
        if let Some(max) = self.max_columns.filter(|&max| count > max) {
            return Err(GenError::InvalidArgument(format!(
                "`{}` takes at most {max} column(s), got {count}",
                self.token_type
            )));
        }

        let filter = type_filter(info);
        let candidates = ctx
            .table
            .eligible_columns(|c| (self.eligible)(c.data_type) && filter(c));
        if candidates.len() < count {
            return Err(GenError::NoEligibleColumn {
                table: ctx.table.name().to_string(),
                requirement: format!("{count} x {}", requirement(self.role, info)),
            });
        }

        let picked = index::sample(rng, candidates.len(), count)
            .into_iter()
            .map(|i| candidates[i])
            .collect();
        Ok(Draw::Columns(picked))
    }

    fn render(
        &self,
        _: &TokenInfo,
        draw: &Draw,
        ctx: &RenderContext<'_>,
        _: Dialect,
    ) -> Result<String> {
        match draw {
            Draw::Star if self.allow_star => Ok("*".to_string()),
            Draw::Columns(indices) => column_names(ctx.table, indices),
            other => Err(mismatched(self.token_type, other)),
        }
    }
}

/// One literal per column, in schema order.
struct InsertRow;

impl Construct for InsertRow {
    fn token_type(&self) -> TokenType {
        TokenType::InsertExp
    }

    fn draw(&self, _: &TokenInfo, ctx: &RenderContext<'_>, rng: &mut dyn RngCore) -> Result<Draw> {
        if ctx.table.is_empty() {
            return Err(GenError::NoEligibleColumn {
                table: ctx.table.name().to_string(),
                requirement: "at least one column".to_string(),
            });
        }
        Ok(Draw::Row(ctx.table.generate_row(ctx.values, rng)?))
    }

    fn render(
        &self,
        _: &TokenInfo,
        draw: &Draw,
        _: &RenderContext<'_>,
        _: Dialect,
    ) -> Result<String> {
        match draw {
            Draw::Row(values) => Ok(values
                .iter()
                .map(|v| v.to_literal())
                .collect::<Vec<_>>()
                .join(", ")),
            other => Err(mismatched(TokenType::InsertExp, other)),
        }
    }
}

/// `column = literal`.
struct UpdateItem;

impl Construct for UpdateItem {
    fn token_type(&self) -> TokenType {
        TokenType::UpdateItem
    }

    fn draw(
        &self,
        info: &TokenInfo,
        ctx: &RenderContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Draw> {
        let column = pick_one(info, ctx, "updatable", rng)?;
        let data_type = ctx.table.columns()[column].data_type;
        let value = ctx.values.value(data_type, rng)?;
        Ok(Draw::Assignment { column, value })
    }

    fn render(
        &self,
        _: &TokenInfo,
        draw: &Draw,
        ctx: &RenderContext<'_>,
        _: Dialect,
    ) -> Result<String> {
        match draw {
            Draw::Assignment { column, value } => Ok(format!(
                "{} = {}",
                column_name(ctx.table, *column)?,
                value.to_literal()
            )),
            other => Err(mismatched(TokenType::UpdateItem, other)),
        }
    }
}

/// `column op literal`.
struct Condition;

impl Construct for Condition {
    fn token_type(&self) -> TokenType {
        TokenType::Condition
    }

    fn draw(
        &self,
        info: &TokenInfo,
        ctx: &RenderContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Draw> {
        let column = pick_one(info, ctx, "comparable", rng)?;
        let data_type = ctx.table.columns()[column].data_type;
        let op = *random_element(CompareOp::for_type(data_type), rng)?;
        let value = ctx.values.value(data_type, rng)?;
        Ok(Draw::Predicate { column, op, value })
    }

    fn render(
        &self,
        _: &TokenInfo,
        draw: &Draw,
        ctx: &RenderContext<'_>,
        _: Dialect,
    ) -> Result<String> {
        match draw {
            Draw::Predicate { column, op, value } => Ok(format!(
                "{} {} {}",
                column_name(ctx.table, *column)?,
                op.symbol(),
                value.to_literal()
            )),
            other => Err(mismatched(TokenType::Condition, other)),
        }
    }
}

/// `PARTITION BY a ORDER BY b`, keywords resolved per dialect.
struct WindowSpec;

impl Construct for WindowSpec {
    fn token_type(&self) -> TokenType {
        TokenType::WindowExp
    }

    fn draw(
        &self,
        info: &TokenInfo,
        ctx: &RenderContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Draw> {
        for keyword in self.keywords() {
            if !ctx.catalog.is_enabled(keyword) {
                return Err(GenError::DisabledKeyword {
                    keyword: keyword.to_string(),
                });
            }
        }
        let partition = pick_one(info, ctx, "groupable", rng)?;
        let order = pick_one(info, ctx, "orderable", rng)?;
        Ok(Draw::Window { partition, order })
    }

    fn render(
        &self,
        _: &TokenInfo,
        draw: &Draw,
        ctx: &RenderContext<'_>,
        dialect: Dialect,
    ) -> Result<String> {
        match draw {
            Draw::Window { partition, order } => Ok(format!(
                "{} {} {} {}",
                ctx.catalog.resolve(KW_PARTITION_BY, dialect)?,
                column_name(ctx.table, *partition)?,
                ctx.catalog.resolve(KW_ORDER_BY, dialect)?,
                column_name(ctx.table, *order)?
            )),
            other => Err(mismatched(TokenType::WindowExp, other)),
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        &[KW_PARTITION_BY, KW_ORDER_BY]
    }
}

/// One of the enabled sort direction keywords.
struct AscDesc;

impl Construct for AscDesc {
    fn token_type(&self) -> TokenType {
        TokenType::AscDesc
    }

    fn draw(&self, _: &TokenInfo, ctx: &RenderContext<'_>, rng: &mut dyn RngCore) -> Result<Draw> {
        let enabled: Vec<SortDirection> = [SortDirection::Asc, SortDirection::Desc]
            .into_iter()
            .filter(|d| ctx.catalog.is_enabled(d.keyword()))
            .collect();
        if enabled.is_empty() {
            return Err(GenError::DisabledKeyword {
                keyword: format!(
                    "{}/{}",
                    SortDirection::Asc.keyword(),
                    SortDirection::Desc.keyword()
                ),
            });
        }
        Ok(Draw::Direction(*random_element(&enabled, rng)?))
    }

    fn render(
        &self,
        _: &TokenInfo,
        draw: &Draw,
        ctx: &RenderContext<'_>,
        dialect: Dialect,
    ) -> Result<String> {
        match draw {
            Draw::Direction(direction) => {
                Ok(ctx.catalog.resolve(direction.keyword(), dialect)?.to_string())
            }
            other => Err(mismatched(TokenType::AscDesc, other)),
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        const DIRECTIONS: &[&str] = &[SortDirection::Asc.keyword(), SortDirection::Desc.keyword()];
        DIRECTIONS
    }

    /// Either direction is enough.
    fn is_available(&self, catalog: &dyn KeywordCatalog) -> bool {
        self.keywords().iter().any(|k| catalog.is_enabled(k))
    }
}

/// Integer literal in `[0, bound]` for `count` and `skip_rows`.
struct BoundedInteger(TokenType);

impl Construct for BoundedInteger {
    fn token_type(&self) -> TokenType {
        self.0
    }

    fn draw(&self, info: &TokenInfo, _: &RenderContext<'_>, rng: &mut dyn RngCore) -> Result<Draw> {
        let bound = info.params.bound.unwrap_or(DEFAULT_BOUND);
        Ok(Draw::Integer(random_integer(bound, rng)?))
    }

    fn render(
        &self,
        _: &TokenInfo,
        draw: &Draw,
        _: &RenderContext<'_>,
        _: Dialect,
    ) -> Result<String> {
        match draw {
            Draw::Integer(n) => Ok(n.to_string()),
            other => Err(mismatched(self.0, other)),
        }
    }
}
