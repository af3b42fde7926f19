//! Decimal precision/scale derivation for arithmetic results.
//!
//! Runs once when an arithmetic node is built; evaluation only reads the
//! folded width.

use crate::{
    codec::{DataType, MAX_DECIMAL_PRECISION, TypeWidth},
    expr::ArithmeticOp,
};
use lexdb_primitives::ScalarFamily;

/// Decimal (precision, scale) an operand contributes, if bounded.
pub(crate) fn operand_width(data_type: DataType, width: TypeWidth) -> Option<(u32, u32)> {
    let DataType::Scalar(kind) = data_type else {
        return None;
    };

    match kind.family() {
        ScalarFamily::Decimal => match (width.max_length, width.scale) {
            (Some(precision), scale) => Some((precision, scale.unwrap_or(0))),
            _ => None,
        },
        ScalarFamily::Integral => kind.integral_precision().map(|precision| (precision, 0)),
        _ => None,
    }
}

/// Fold operand widths left to right into the result width.
pub(crate) fn fold_width(op: ArithmeticOp, operands: &[(DataType, TypeWidth)]) -> TypeWidth {
    let mut widths = operands
        .iter()
        .map(|&(data_type, width)| operand_width(data_type, width));

    let Some(Some(mut acc)) = widths.next() else {
        return TypeWidth::UNBOUNDED;
    };

    for next in widths {
        let Some(next) = next else {
            return TypeWidth::UNBOUNDED;
        };
        acc = match op {
            ArithmeticOp::Add | ArithmeticOp::Subtract => additive(acc, next),
            ArithmeticOp::Multiply => multiplicative(acc, next),
            ArithmeticOp::Divide => return TypeWidth::UNBOUNDED,
        };
    }

    TypeWidth::decimal(acc.0, acc.1)
}

// integer digits of the wider side, plus the larger scale, plus one carry digit
fn additive((p1, s1): (u32, u32), (p2, s2): (u32, u32)) -> (u32, u32) {
    let scale = s1.max(s2);
    let integer_digits = p1.saturating_sub(s1).max(p2.saturating_sub(s2));
    let precision = (integer_digits + scale + 1).min(MAX_DECIMAL_PRECISION);

    (precision, scale.min(precision))
}

fn multiplicative((p1, s1): (u32, u32), (p2, s2): (u32, u32)) -> (u32, u32) {
    let precision = (p1 + p2).min(MAX_DECIMAL_PRECISION);
    let scale = (s1 + s2).min(precision);

    (precision, scale)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const DEC_5_2: (DataType, TypeWidth) = (DataType::DECIMAL, TypeWidth::decimal(5, 2));
    const DEC_3_1: (DataType, TypeWidth) = (DataType::DECIMAL, TypeWidth::decimal(3, 1));

    #[test]
    fn addition_keeps_max_scale_and_widest_integer_part() {
        let width = fold_width(ArithmeticOp::Add, &[DEC_5_2, DEC_3_1]);

        assert_eq!(width.scale, Some(2));
        assert_eq!(width.max_length, Some(6));
    }

    #[test]
    fn integral_operands_contribute_their_digit_counts() {
        let width = fold_width(
            ArithmeticOp::Subtract,
            &[(DataType::INTEGER, TypeWidth::UNBOUNDED), DEC_3_1],
        );

        assert_eq!(width, TypeWidth::decimal(12, 1));
    }

    #[test]
    fn multiplication_sums_precision_and_scale() {
        let width = fold_width(ArithmeticOp::Multiply, &[DEC_5_2, DEC_3_1]);
        assert_eq!(width, TypeWidth::decimal(8, 3));

        let capped = fold_width(
            ArithmeticOp::Multiply,
            &[
                (DataType::BIGINT, TypeWidth::UNBOUNDED),
                (DataType::BIGINT, TypeWidth::UNBOUNDED),
            ],
        );
        assert_eq!(capped, TypeWidth::decimal(MAX_DECIMAL_PRECISION, 0));
    }

    #[test]
    fn division_and_unbounded_operands_are_unbounded() {
        assert!(fold_width(ArithmeticOp::Divide, &[DEC_5_2, DEC_3_1]).is_unbounded());
        assert!(
            fold_width(
                ArithmeticOp::Add,
                &[DEC_5_2, (DataType::DECIMAL, TypeWidth::UNBOUNDED)]
            )
            .is_unbounded()
        );
        assert!(
            fold_width(ArithmeticOp::Add, &[DEC_5_2, (DataType::DOUBLE, TypeWidth::UNBOUNDED)])
                .is_unbounded()
        );
    }

    #[test]
    fn single_operand_keeps_its_width() {
        assert_eq!(fold_width(ArithmeticOp::Add, &[DEC_5_2]), TypeWidth::decimal(5, 2));
        assert!(fold_width(ArithmeticOp::Add, &[]).is_unbounded());
    }
}
