use super::*;
use crate::types::Decimal;
use std::cmp::Ordering;

#[test]
fn data_type_reports_native_variant() {
    assert_eq!(Value::BigInt(1).data_type(), Some(DataType::BIGINT));
    assert_eq!(Value::varchar("a").data_type(), Some(DataType::VARCHAR));
    assert_eq!(
        Value::Array(ArrayValue::new(ScalarKind::Integer, vec![])).data_type(),
        Some(DataType::Array(ScalarKind::Integer))
    );
    assert_eq!(Value::Null.data_type(), None);
}

#[test]
fn null_sorts_first() {
    assert_eq!(compare_values(&Value::Null, &Value::BigInt(i64::MIN)), Some(Ordering::Less));
    assert_eq!(compare_values(&Value::varchar(""), &Value::Null), Some(Ordering::Greater));
    assert_eq!(compare_values(&Value::Null, &Value::Null), Some(Ordering::Equal));
}

#[test]
fn mismatched_variants_are_not_comparable() {
    assert_eq!(compare_values(&Value::Integer(1), &Value::BigInt(1)), None);
    assert_eq!(compare_values(&Value::Boolean(true), &Value::varchar("true")), None);
}

#[test]
fn arrays_compare_element_wise_then_by_length() {
    let short = Value::Array(ArrayValue::new(ScalarKind::BigInt, vec![Value::BigInt(1)]));
    let long = Value::Array(ArrayValue::new(
        ScalarKind::BigInt,
        vec![Value::BigInt(1), Value::BigInt(0)],
    ));
    let bigger = Value::Array(ArrayValue::new(ScalarKind::BigInt, vec![Value::BigInt(2)]));

    assert_eq!(compare_values(&short, &long), Some(Ordering::Less));
    assert_eq!(compare_values(&long, &bigger), Some(Ordering::Less));
}

#[test]
fn display_renders_sql_text() {
    assert_eq!(Value::Decimal(Decimal::new(1250, 2)).to_string(), "12.50");
    assert_eq!(Value::Varbinary(vec![0x00, 0xAB]).to_string(), "00ab");
    assert_eq!(
        Value::Array(ArrayValue::new(
            ScalarKind::Integer,
            vec![Value::Integer(1), Value::Null]
        ))
        .to_string(),
        "[1, null]"
    );
}
