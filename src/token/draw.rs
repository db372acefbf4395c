use sql_datagen::{DataType, SqlValue};

/// Comparison operators valid in both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::NotEq,
        CompareOp::Lt,
        CompareOp::Gt,
        CompareOp::LtEq,
        CompareOp::GtEq,
    ];

    pub const EQUALITY: [CompareOp; 2] = [CompareOp::Eq, CompareOp::NotEq];

    /// Operators allowed against a column of `data_type`.
    pub fn for_type(data_type: DataType) -> &'static [CompareOp] {
        if data_type.is_boolean_type() {
            &Self::EQUALITY
        } else {
            &Self::ALL
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::LtEq => "<=",
            CompareOp::GtEq => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "DQL_ASC",
            SortDirection::Desc => "DQL_DESC",
        }
    }
}

/// Random choices made for one construct.
///
/// Drawn once, then rendered for every dialect, so both renderings name the
/// same columns and carry the same literals.
#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    /// The bound table itself.
    TableName,
    /// Every column, in schema order.
    Schema,
    /// Column indices in pick order.
    Columns(Vec<usize>),
    /// `select_exp` with zero columns.
    Star,
    /// One literal per column, in schema order.
    Row(Vec<SqlValue>),
    Assignment {
        column: usize,
        value: SqlValue,
    },
    Predicate {
        column: usize,
        op: CompareOp,
        value: SqlValue,
    },
    Window {
        partition: usize,
        order: usize,
    },
    Direction(SortDirection),
    Integer(i64),
}
