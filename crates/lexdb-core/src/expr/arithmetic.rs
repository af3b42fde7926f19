//! Module: expr::arithmetic
//! Responsibility: add/subtract/multiply/divide over decoded operands.
//! Does not own: operand encodings or result-type codecs.
//! Boundary: the numeric domain and result type are chosen once at
//! construction; evaluation decodes, accumulates and re-encodes ascending.

use crate::{
    codec::{DataType, NumericCodec, SortOrder, TypeWidth, set_decimal_width_and_scale, to_decimal},
    error::{ErrorOrigin, InternalError},
    expr::{Expression, precision::fold_width},
    row::Row,
    types::{Date, Decimal, MILLIS_PER_DAY, Time, Timestamp},
    value::Value,
};
use derive_more::Display;
use lexdb_primitives::{ScalarFamily, ScalarKind};
use std::fmt;

///
/// ArithmeticOp
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ArithmeticOp {
    #[display("+")]
    Add,
    #[display("-")]
    Subtract,
    #[display("*")]
    Multiply,
    #[display("/")]
    Divide,
}

///
/// Domain
///
/// Native accumulator an arithmetic node computes in.
///
/// DateDiff   → first two operands are instants; their difference becomes
///              whole days, later operands subtract plain integers.
/// DateShift  → one instant shifted by whole-day integer operands.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Domain {
    Decimal,
    Double,
    Long,
    DateDiff,
    DateShift { temporal: usize },
}

///
/// ArithmeticExpression
///

#[derive(Clone, Debug)]
pub struct ArithmeticExpression {
    op: ArithmeticOp,
    children: Vec<Expression>,
    domain: Domain,
    data_type: DataType,
    width: TypeWidth,
}

impl ArithmeticExpression {
    pub fn new(op: ArithmeticOp, children: Vec<Expression>) -> Result<Self, InternalError> {
        let domain = resolve_domain(op, &children)?;
        let data_type = match domain {
            Domain::Decimal => DataType::DECIMAL,
            Domain::Double => DataType::DOUBLE,
            Domain::Long | Domain::DateDiff => DataType::BIGINT,
            Domain::DateShift { temporal } => children[temporal].data_type(),
        };
        let width = if domain == Domain::Decimal {
            let operands: Vec<_> = children
                .iter()
                .map(|child| (child.data_type(), child.width()))
                .collect();
            fold_width(op, &operands)
        } else {
            TypeWidth::UNBOUNDED
        };

        Ok(Self {
            op,
            children,
            domain,
            data_type,
            width,
        })
    }

    #[must_use]
    pub const fn op(&self) -> ArithmeticOp {
        self.op
    }

    #[must_use]
    pub fn children(&self) -> &[Expression] {
        &self.children
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    #[must_use]
    pub const fn width(&self) -> TypeWidth {
        self.width
    }

    pub(crate) fn evaluate(&self, row: &dyn Row, out: &mut Vec<u8>) -> Result<bool, InternalError> {
        let mut scratch = Vec::new();
        let result = match self.domain {
            Domain::Decimal => self.eval_decimal(row, &mut scratch)?.map(Value::Decimal),
            Domain::Double => self.eval_double(row, &mut scratch)?.map(Value::Double),
            Domain::Long | Domain::DateDiff | Domain::DateShift { .. } => self
                .eval_long(row, &mut scratch)?
                .map(|(acc, nanos)| self.long_result(acc, nanos))
                .transpose()?,
        };
        let Some(result) = result else {
            return Ok(false);
        };

        out.clear();
        self.data_type.encode_into(&result, SortOrder::Ascending, out)?;

        Ok(true)
    }

    fn eval_decimal(&self, row: &dyn Row, scratch: &mut Vec<u8>) -> Result<Option<Decimal>, InternalError> {
        let mut acc: Option<Decimal> = None;

        for child in &self.children {
            if !child.evaluate(row, scratch)? {
                return Ok(None);
            }
            let value = to_decimal(&child.data_type().decode_native(scratch, child.sort_order())?)?;
            acc = Some(match acc {
                None => value,
                Some(acc) => self.apply_decimal(acc, value)?,
            });
        }

        let (precision, scale) = (self.width.max_length, self.width.scale);
        let Some(acc) = acc else {
            return Err(InternalError::decimal_capacity_exceeded(precision, scale, None));
        };

        set_decimal_width_and_scale(acc, precision, scale)
            .map(Some)
            .ok_or_else(|| {
                InternalError::decimal_capacity_exceeded(precision, scale, Some(&acc as &dyn fmt::Display))
            })
    }

    fn apply_decimal(&self, acc: Decimal, value: Decimal) -> Result<Decimal, InternalError> {
        let result = match self.op {
            ArithmeticOp::Add => acc.checked_add(value),
            ArithmeticOp::Subtract => acc.checked_sub(value),
            ArithmeticOp::Multiply => acc.checked_mul(value),
            ArithmeticOp::Divide => {
                if value.is_zero() {
                    return Err(division_by_zero(&acc));
                }
                acc.checked_div(value)
            }
        };

        result.ok_or_else(|| self.overflow(&acc, &value))
    }

    fn eval_double(&self, row: &dyn Row, scratch: &mut Vec<u8>) -> Result<Option<f64>, InternalError> {
        let mut acc: Option<f64> = None;

        for child in &self.children {
            if !child.evaluate(row, scratch)? {
                return Ok(None);
            }
            let value = numeric_codec(child)?.decode_double(scratch, 0, child.sort_order())?;
            acc = Some(match acc {
                None => value,
                Some(acc) => self.apply_double(acc, value)?,
            });
        }

        Ok(acc)
    }

    fn apply_double(&self, acc: f64, value: f64) -> Result<f64, InternalError> {
        let result = match self.op {
            ArithmeticOp::Add => acc + value,
            ArithmeticOp::Subtract => acc - value,
            ArithmeticOp::Multiply => acc * value,
            ArithmeticOp::Divide => {
                if value == 0.0 {
                    return Err(division_by_zero(&acc));
                }
                acc / value
            }
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(self.overflow(&acc, &value))
        }
    }

    // (accumulator, sub-millisecond nanos carried from a shifted timestamp)
    fn eval_long(&self, row: &dyn Row, scratch: &mut Vec<u8>) -> Result<Option<(i64, u32)>, InternalError> {
        let mut acc: Option<i64> = None;
        let mut nanos = 0;

        for (index, child) in self.children.iter().enumerate() {
            if !child.evaluate(row, scratch)? {
                return Ok(None);
            }
            let mut value = numeric_codec(child)?.decode_long(scratch, 0, child.sort_order())?;

            if let Domain::DateShift { temporal } = self.domain {
                if index == temporal {
                    if let Value::Timestamp(ts) = child.data_type().decode_native(scratch, child.sort_order())? {
                        nanos = ts.nanos();
                    }
                } else {
                    value = value
                        .checked_mul(MILLIS_PER_DAY)
                        .ok_or_else(|| self.overflow(&value, &MILLIS_PER_DAY))?;
                }
            }

            let next = match acc {
                None => value,
                Some(acc) => self.apply_long(acc, value)?,
            };
            acc = Some(if index == 1 && self.domain == Domain::DateDiff {
                next / MILLIS_PER_DAY
            } else {
                next
            });
        }

        Ok(acc.map(|acc| (acc, nanos)))
    }

    fn apply_long(&self, acc: i64, value: i64) -> Result<i64, InternalError> {
        let result = match self.op {
            ArithmeticOp::Add => acc.checked_add(value),
            ArithmeticOp::Subtract => acc.checked_sub(value),
            ArithmeticOp::Multiply => acc.checked_mul(value),
            ArithmeticOp::Divide => {
                if value == 0 {
                    return Err(division_by_zero(&acc));
                }
                acc.checked_div(value)
            }
        };

        result.ok_or_else(|| self.overflow(&acc, &value))
    }

    fn long_result(&self, acc: i64, nanos: u32) -> Result<Value, InternalError> {
        let value = match self.data_type.kind() {
            ScalarKind::Date => Value::Date(Date::from_millis(acc)),
            ScalarKind::Time => Value::Time(Time::from_millis(acc)),
            ScalarKind::Timestamp => Value::Timestamp(Timestamp::new(acc, nanos).ok_or_else(|| {
                InternalError::illegal_data(ErrorOrigin::Expression, format!("invalid nanos {nanos}"))
            })?),
            _ => Value::BigInt(acc),
        };

        Ok(value)
    }

    fn overflow(&self, acc: &dyn fmt::Display, value: &dyn fmt::Display) -> InternalError {
        InternalError::capacity_exceeded(
            ErrorOrigin::Expression,
            format!("{acc} {} {value} overflows {}", self.op, self.data_type),
        )
    }
}

fn resolve_domain(op: ArithmeticOp, children: &[Expression]) -> Result<Domain, InternalError> {
    let mut temporals = Vec::new();
    let (mut has_decimal, mut has_float) = (false, false);

    for (index, child) in children.iter().enumerate() {
        let DataType::Scalar(kind) = child.data_type() else {
            return Err(unsupported_operand(op, child.data_type()));
        };
        match kind.family() {
            ScalarFamily::Temporal => temporals.push(index),
            ScalarFamily::Decimal => has_decimal = true,
            ScalarFamily::Floating => has_float = true,
            ScalarFamily::Integral => {}
            _ => return Err(unsupported_operand(op, child.data_type())),
        }
    }

    if temporals.is_empty() {
        return Ok(if has_decimal || children.is_empty() {
            Domain::Decimal
        } else if has_float {
            Domain::Double
        } else {
            Domain::Long
        });
    }

    match (op, temporals.as_slice()) {
        (ArithmeticOp::Subtract, [0, 1]) if !has_decimal && !has_float => Ok(Domain::DateDiff),
        (ArithmeticOp::Add, [temporal]) | (ArithmeticOp::Subtract, [temporal @ 0])
            if !has_decimal && !has_float =>
        {
            Ok(Domain::DateShift {
                temporal: *temporal,
            })
        }
        _ => Err(InternalError::constraint_violation(
            ErrorOrigin::Expression,
            format!("unsupported date arithmetic: {op} over {}", operand_types(children)),
        )),
    }
}

fn numeric_codec(child: &Expression) -> Result<NumericCodec, InternalError> {
    child
        .data_type()
        .codec()
        .ok_or_else(|| unsupported_operand_type(child.data_type()))
}

fn operand_types(children: &[Expression]) -> String {
    children
        .iter()
        .map(|child| child.data_type().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn unsupported_operand(op: ArithmeticOp, data_type: DataType) -> InternalError {
    InternalError::constraint_violation(
        ErrorOrigin::Expression,
        format!("operator {op} does not accept {data_type} operands"),
    )
}

fn unsupported_operand_type(data_type: DataType) -> InternalError {
    InternalError::constraint_violation(
        ErrorOrigin::Expression,
        format!("{data_type} has no numeric codec"),
    )
}

fn division_by_zero(acc: &dyn fmt::Display) -> InternalError {
    InternalError::illegal_data(ErrorOrigin::Expression, format!("division by zero: {acc} / 0"))
}
