//! Whole-pipeline checks: values encoded into cells, expressions evaluated
//! over rows, results folded into composite keys.

use lexdb_core::{
    config::CoreConfig,
    error::ErrorClass,
    prelude::*,
    types::{Date, Decimal, MILLIS_PER_DAY},
};
use std::{str::FromStr, sync::Arc};

fn encoded_row(cells: &[(&str, DataType, Value)]) -> ResultRow {
    ResultRow::new(
        b"r",
        cells.iter().map(|(qualifier, data_type, value)| {
            let bytes = data_type
                .encode(value, SortOrder::Ascending)
                .expect("cell value encodes");
            Cell::new("cf", qualifier, bytes, 1)
        }),
    )
}

fn column(qualifier: &str, data_type: DataType) -> Expression {
    Expression::column("cf", qualifier, data_type)
}

#[test]
fn subtraction_over_encoded_longs() {
    let row = encoded_row(&[
        ("a", DataType::BIGINT, Value::BigInt(5)),
        ("b", DataType::BIGINT, Value::BigInt(3)),
    ]);
    let expression = Expression::arithmetic(
        ArithmeticOp::Subtract,
        vec![column("a", DataType::BIGINT), column("b", DataType::BIGINT)],
    )
    .expect("expression builds");

    let mut out = Vec::new();
    assert!(expression.evaluate(&row, &mut out).expect("evaluates"));
    assert_eq!(out.len(), 8);
    assert_eq!(
        DataType::BIGINT.decode_native(&out, SortOrder::Ascending).expect("decodes"),
        Value::BigInt(2)
    );
}

#[test]
fn two_field_key_matches_manual_concatenation() {
    let config = CoreConfig::from_toml_str("[key]\nmax_key_bytes = 64\n").expect("config parses");
    let codec = CompositeKeyCodec::new(&config.key);
    let row = ResultRow::default();

    let key = codec
        .concatenate(
            &row,
            &[
                Expression::literal("abc", DataType::VARCHAR).expect("literal"),
                Expression::literal(7i32, DataType::INTEGER).expect("literal"),
            ],
        )
        .expect("key builds");

    let mut expected = DataType::VARCHAR
        .encode(&Value::varchar("abc"), SortOrder::Ascending)
        .expect("encodes");
    expected.push(0x00);
    expected.extend(
        DataType::INTEGER
            .encode(&Value::Integer(7), SortOrder::Ascending)
            .expect("encodes"),
    );
    assert_eq!(key.into_bytes(), expected);
}

#[test]
fn date_difference_is_one_day() {
    let row = encoded_row(&[
        ("end", DataType::DATE, Value::Date(Date::from_millis(5 * MILLIS_PER_DAY))),
        ("start", DataType::DATE, Value::Date(Date::from_millis(4 * MILLIS_PER_DAY))),
    ]);
    let expression = Expression::arithmetic(
        ArithmeticOp::Subtract,
        vec![column("end", DataType::DATE), column("start", DataType::DATE)],
    )
    .expect("expression builds");

    assert_eq!(expression.evaluate_value(&row).expect("evaluates"), Value::BigInt(1));
}

#[test]
fn null_operand_propagates() {
    let row = encoded_row(&[("a", DataType::INTEGER, Value::Integer(1))]);
    let expression = Expression::arithmetic(
        ArithmeticOp::Multiply,
        vec![column("a", DataType::INTEGER), column("gone", DataType::INTEGER)],
    )
    .expect("expression builds");

    let mut out = b"untouched".to_vec();
    assert!(!expression.evaluate(&row, &mut out).expect("evaluates"));
    assert_eq!(out, b"untouched");
}

#[test]
fn decimal_sum_respects_folded_width() {
    let price: Expression = lexdb_core::expr::ColumnExpression::new("cf", "price", DataType::DECIMAL)
        .with_width(TypeWidth::decimal(5, 2))
        .into();
    let fee: Expression = lexdb_core::expr::ColumnExpression::new("cf", "fee", DataType::DECIMAL)
        .with_width(TypeWidth::decimal(3, 1))
        .into();
    let sum = Expression::arithmetic(ArithmeticOp::Add, vec![price, fee]).expect("expression builds");
    assert_eq!(sum.width(), TypeWidth::decimal(6, 2));

    let dec = |text: &str| Value::Decimal(Decimal::from_str(text).expect("decimal"));
    let ok = encoded_row(&[
        ("price", DataType::DECIMAL, dec("999.99")),
        ("fee", DataType::DECIMAL, dec("99.9")),
    ]);
    assert_eq!(sum.evaluate_value(&ok).expect("fits"), dec("1099.89"));

    let overflow = encoded_row(&[
        ("price", DataType::DECIMAL, dec("123456.78")),
        ("fee", DataType::DECIMAL, dec("1.5")),
    ]);
    let err = sum.evaluate_value(&overflow).expect_err("does not fit DECIMAL(6,2)");
    assert_eq!(err.class, ErrorClass::CapacityExceeded);
}

#[test]
fn key_built_from_a_row_round_trips_through_its_schema() {
    let row = encoded_row(&[
        ("tenant", DataType::VARCHAR, Value::varchar("acme")),
        ("seq", DataType::BIGINT, Value::BigInt(42)),
    ]);
    let key = CompositeKeyCodec::default()
        .concatenate(
            &row,
            &[column("tenant", DataType::VARCHAR), column("seq", DataType::BIGINT)],
        )
        .expect("key builds");

    let schema = Arc::new(
        KeySchema::new([KeyField::asc(DataType::VARCHAR), KeyField::asc(DataType::BIGINT)])
            .expect("schema"),
    );
    assert_eq!(
        schema.decode(&key).expect("key decodes"),
        vec![Value::varchar("acme"), Value::BigInt(42)]
    );

    let stored = ResultRow::with_key(&*key);
    let filter = Expression::comparison(
        CompareOp::GreaterOrEqual,
        Expression::row_key_column(Arc::clone(&schema), 1).expect("key column"),
        Expression::literal(40i32, DataType::INTEGER).expect("literal"),
    )
    .expect("comparison builds");
    assert_eq!(filter.evaluate_value(&stored).expect("evaluates"), Value::Boolean(true));
}

#[test]
fn non_terminal_null_fixed_width_field_is_a_structural_error() {
    let err = CompositeKeyCodec::default()
        .concatenate(
            &ResultRow::default(),
            &[column("missing", DataType::BIGINT), column("missing", DataType::VARCHAR)],
        )
        .expect_err("structural");

    assert_eq!(err.class, ErrorClass::StructuralKey);
    assert!(!err.is_retryable());
}
