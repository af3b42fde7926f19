//! Module: expr
//! Responsibility: scalar expression trees evaluated against encoded rows.
//! Does not own: planning, parsing, or row storage.
//! Boundary: nodes read rows through `Row` and write encoded results into
//! caller-owned buffers.
//!
//! A built tree is immutable. Derived attributes (result type, decimal
//! width) are fixed at construction, so one tree may be evaluated from many
//! threads at once.

mod arithmetic;
mod column;
mod comparison;
mod literal;
mod precision;


use crate::{
    codec::{DataType, SortOrder, TypeWidth},
    error::InternalError,
    key::KeySchema,
    obs::sink::{MetricsEvent, record},
    row::Row,
    value::Value,
};
use std::{fmt, sync::Arc};

// re-exports
pub use arithmetic::{ArithmeticExpression, ArithmeticOp};
pub use column::{ColumnExpression, RowKeyColumnExpression};
pub use comparison::{CompareOp, ComparisonExpression};
pub use literal::LiteralExpression;

///
/// Expression
///
/// Closed set of scalar operator nodes.
///
/// `evaluate` writes the node's encoding into `out` and returns `true`, or
/// returns `false` for null and leaves `out` untouched.
///

#[derive(Clone, Debug)]
pub enum Expression {
    Literal(LiteralExpression),
    Column(ColumnExpression),
    RowKeyColumn(RowKeyColumnExpression),
    Arithmetic(ArithmeticExpression),
    Comparison(ComparisonExpression),
}

impl Expression {
    /// Ascending constant of `data_type`.
    pub fn literal(value: impl Into<Value>, data_type: DataType) -> Result<Self, InternalError> {
        LiteralExpression::new(value.into(), data_type, SortOrder::Ascending).map(Self::Literal)
    }

    pub fn literal_with_order(
        value: impl Into<Value>,
        data_type: DataType,
        sort_order: SortOrder,
    ) -> Result<Self, InternalError> {
        LiteralExpression::new(value.into(), data_type, sort_order).map(Self::Literal)
    }

    /// Ascending, width-unbounded cell reference.
    pub fn column(family: impl AsRef<[u8]>, qualifier: impl AsRef<[u8]>, data_type: DataType) -> Self {
        Self::Column(ColumnExpression::new(family, qualifier, data_type))
    }

    pub fn row_key_column(schema: Arc<KeySchema>, position: usize) -> Result<Self, InternalError> {
        RowKeyColumnExpression::new(schema, position).map(Self::RowKeyColumn)
    }

    pub fn arithmetic(op: ArithmeticOp, children: Vec<Self>) -> Result<Self, InternalError> {
        ArithmeticExpression::new(op, children).map(Self::Arithmetic)
    }

    pub fn comparison(op: CompareOp, lhs: Self, rhs: Self) -> Result<Self, InternalError> {
        ComparisonExpression::new(op, lhs, rhs).map(Self::Comparison)
    }

    /// Evaluate against `row`; on `true`, `out` holds exactly this node's encoding.
    pub fn evaluate(&self, row: &dyn Row, out: &mut Vec<u8>) -> Result<bool, InternalError> {
        let produced = match self {
            Self::Literal(node) => node.evaluate(out),
            Self::Column(node) => node.evaluate(row, out)?,
            Self::RowKeyColumn(node) => node.evaluate(row, out)?,
            Self::Arithmetic(node) => node.evaluate(row, out)?,
            Self::Comparison(node) => node.evaluate(row, out)?,
        };

        record(MetricsEvent::ExpressionEvaluated {
            node: self.label(),
            produced,
        });

        Ok(produced)
    }

    /// Evaluate and decode the result; null when nothing was produced.
    pub fn evaluate_value(&self, row: &dyn Row) -> Result<Value, InternalError> {
        let mut out = Vec::new();
        if !self.evaluate(row, &mut out)? {
            return Ok(Value::Null);
        }

        self.data_type().decode_native(&out, self.sort_order())
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Literal(node) => node.data_type(),
            Self::Column(node) => node.data_type(),
            Self::RowKeyColumn(node) => node.data_type(),
            Self::Arithmetic(node) => node.data_type(),
            Self::Comparison(_) => DataType::BOOLEAN,
        }
    }

    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        match self {
            Self::Literal(node) => node.sort_order(),
            Self::Column(node) => node.sort_order(),
            Self::RowKeyColumn(node) => node.sort_order(),
            Self::Arithmetic(_) | Self::Comparison(_) => SortOrder::Ascending,
        }
    }

    /// Declared (max length or precision, scale) of the result.
    #[must_use]
    pub const fn width(&self) -> TypeWidth {
        match self {
            Self::Literal(node) => node.width(),
            Self::Column(node) => node.width(),
            Self::Arithmetic(node) => node.width(),
            Self::RowKeyColumn(_) | Self::Comparison(_) => TypeWidth::UNBOUNDED,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Arithmetic(node) => node.children(),
            Self::Comparison(node) => node.operands(),
            Self::Literal(_) | Self::Column(_) | Self::RowKeyColumn(_) => &[],
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Column(_) => "column",
            Self::RowKeyColumn(_) => "row_key_column",
            Self::Arithmetic(_) => "arithmetic",
            Self::Comparison(_) => "comparison",
        }
    }

    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(node) => match node.value() {
                Value::Varchar(text) => write!(f, "'{text}'"),
                value => write!(f, "{value}"),
            },
            Self::Column(node) => write!(
                f,
                "{}.{}",
                String::from_utf8_lossy(node.family()),
                String::from_utf8_lossy(node.qualifier())
            ),
            Self::RowKeyColumn(node) => write!(f, "key[{}]", node.position()),
            Self::Arithmetic(node) => {
                f.write_str("(")?;
                for (index, child) in node.children().iter().enumerate() {
                    if index > 0 {
                        write!(f, " {} ", node.op())?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
            Self::Comparison(node) => write!(f, "{} {} {}", node.lhs(), node.op(), node.rhs()),
        }
    }
}

impl From<LiteralExpression> for Expression {
    fn from(node: LiteralExpression) -> Self {
        Self::Literal(node)
    }
}

impl From<ColumnExpression> for Expression {
    fn from(node: ColumnExpression) -> Self {
        Self::Column(node)
    }
}

impl From<RowKeyColumnExpression> for Expression {
    fn from(node: RowKeyColumnExpression) -> Self {
        Self::RowKeyColumn(node)
    }
}
