use crate::{
    codec::{DataType, SortOrder},
    error::{ErrorOrigin, InternalError},
    expr::Expression,
    row::Row,
    value::Value,
};
use derive_more::Display;
use std::cmp::Ordering;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum CompareOp {
    #[display("=")]
    Equal,
    #[display("!=")]
    NotEqual,
    #[display("<")]
    Less,
    #[display("<=")]
    LessOrEqual,
    #[display(">")]
    Greater,
    #[display(">=")]
    GreaterOrEqual,
}

impl CompareOp {
    /// Operator that holds for `b op' a` exactly when `a op b` holds.
    #[must_use]
    pub const fn invert(self) -> Self {
        match self {
            Self::Equal => Self::Equal,
            Self::NotEqual => Self::NotEqual,
            Self::Less => Self::Greater,
            Self::LessOrEqual => Self::GreaterOrEqual,
            Self::Greater => Self::Less,
            Self::GreaterOrEqual => Self::LessOrEqual,
        }
    }

    #[must_use]
    pub const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => ordering.is_eq(),
            Self::NotEqual => ordering.is_ne(),
            Self::Less => ordering.is_lt(),
            Self::LessOrEqual => ordering.is_le(),
            Self::Greater => ordering.is_gt(),
            Self::GreaterOrEqual => ordering.is_ge(),
        }
    }
}

///
/// ComparisonExpression
///
/// Binary comparison producing a BOOLEAN. Operands sharing a type and sort
/// order compare as raw bytes when their encodings allow it; anything else
/// is decoded and compared through `DataType::compare`.
///

#[derive(Clone, Debug)]
pub struct ComparisonExpression {
    op: CompareOp,
    operands: Box<[Expression; 2]>,
    bytewise: bool,
}

impl ComparisonExpression {
    /// A literal on the left is moved to the right and the operator inverted.
    pub fn new(op: CompareOp, lhs: Expression, rhs: Expression) -> Result<Self, InternalError> {
        let (op, lhs, rhs) = if lhs.is_literal() && !rhs.is_literal() {
            (op.invert(), rhs, lhs)
        } else {
            (op, lhs, rhs)
        };

        let (lhs_type, rhs_type) = (lhs.data_type(), rhs.data_type());
        if lhs_type.common_type(rhs_type).is_none() {
            return Err(InternalError::type_mismatch(ErrorOrigin::Expression, rhs_type, lhs_type));
        }
        let bytewise = lhs_type == rhs_type
            && lhs.sort_order() == rhs.sort_order()
            && is_bytewise_comparable(lhs_type, lhs.sort_order());

        Ok(Self {
            op,
            operands: Box::new([lhs, rhs]),
            bytewise,
        })
    }

    #[must_use]
    pub const fn op(&self) -> CompareOp {
        self.op
    }

    #[must_use]
    pub fn lhs(&self) -> &Expression {
        &self.operands[0]
    }

    #[must_use]
    pub fn rhs(&self) -> &Expression {
        &self.operands[1]
    }

    #[must_use]
    pub fn operands(&self) -> &[Expression] {
        self.operands.as_slice()
    }

    pub(crate) fn evaluate(&self, row: &dyn Row, out: &mut Vec<u8>) -> Result<bool, InternalError> {
        let (lhs, rhs) = (self.lhs(), self.rhs());

        let mut lhs_bytes = Vec::new();
        if !lhs.evaluate(row, &mut lhs_bytes)? {
            return Ok(false);
        }
        let mut rhs_bytes = Vec::new();
        if !rhs.evaluate(row, &mut rhs_bytes)? {
            return Ok(false);
        }

        let ordering = if self.bytewise {
            let ordering = lhs_bytes.cmp(&rhs_bytes);
            if lhs.sort_order().is_descending() {
                ordering.reverse()
            } else {
                ordering
            }
        } else {
            let lhs_value = lhs.data_type().decode_native(&lhs_bytes, lhs.sort_order())?;
            let rhs_value = rhs.data_type().decode_native(&rhs_bytes, rhs.sort_order())?;
            lhs.data_type().compare(&lhs_value, &rhs_value, rhs.data_type())?
        };

        out.clear();
        DataType::BOOLEAN.encode_into(&Value::Boolean(self.op.holds(ordering)), SortOrder::Ascending, out)?;

        Ok(true)
    }
}

// Fixed-width encodings order correctly in either direction. Variable-width
// ones only ascending: a descending prefix would sort before its extension.
const fn is_bytewise_comparable(data_type: DataType, sort_order: SortOrder) -> bool {
    match data_type {
        DataType::Scalar(kind) => kind.is_fixed_width() || !sort_order.is_descending(),
        DataType::Array(_) => false,
    }
}
