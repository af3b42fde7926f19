use super::*;
use crate::{
    error::ErrorClass,
    types::{Date, Decimal, Time, Timestamp},
    value::ArrayValue,
};
use proptest::prelude::*;
use std::str::FromStr;

fn enc(data_type: DataType, value: &Value, sort: SortOrder) -> Vec<u8> {
    data_type.encode(value, sort).expect("value encodes")
}

fn round_trip(data_type: DataType, value: &Value, sort: SortOrder) -> Value {
    data_type
        .decode_native(&enc(data_type, value, sort), sort)
        .expect("value decodes")
}

// Variable-width encodings are compared as they sit inside a key: followed by
// the sort order's separator.
fn key_field(data_type: DataType, value: &Value, sort: SortOrder) -> Vec<u8> {
    let mut bytes = enc(data_type, value, sort);
    if !data_type.is_fixed_width() {
        bytes.push(sort.separator());
    }
    bytes
}

fn assert_order(data_type: DataType, lower: &Value, higher: &Value) {
    let asc = (
        key_field(data_type, lower, SortOrder::Ascending),
        key_field(data_type, higher, SortOrder::Ascending),
    );
    let desc = (
        key_field(data_type, lower, SortOrder::Descending),
        key_field(data_type, higher, SortOrder::Descending),
    );

    assert!(asc.0 < asc.1, "{data_type}: {lower} < {higher} under ASC");
    assert!(desc.0 > desc.1, "{data_type}: {lower} > {higher} under DESC");
}

#[test]
fn boolean_encoding_is_one_byte_and_inverts() {
    let t = Value::Boolean(true);
    let f = Value::Boolean(false);

    assert_eq!(enc(DataType::BOOLEAN, &t, SortOrder::Ascending), vec![1]);
    assert_eq!(enc(DataType::BOOLEAN, &f, SortOrder::Ascending), vec![0]);
    assert_ne!(
        enc(DataType::BOOLEAN, &t, SortOrder::Ascending),
        enc(DataType::BOOLEAN, &f, SortOrder::Ascending)
    );
    assert_eq!(
        enc(DataType::BOOLEAN, &t, SortOrder::Descending),
        enc(DataType::BOOLEAN, &f, SortOrder::Ascending)
    );
    assert_eq!(
        enc(DataType::BOOLEAN, &f, SortOrder::Descending),
        enc(DataType::BOOLEAN, &t, SortOrder::Ascending)
    );
}

#[test]
fn booleans_round_trip_and_order_under_both_orders() {
    for sort in [SortOrder::Ascending, SortOrder::Descending] {
        for value in [true, false] {
            assert_eq!(
                round_trip(DataType::BOOLEAN, &Value::Boolean(value), sort),
                Value::Boolean(value),
                "{value} {sort}"
            );
        }
    }
    assert_order(DataType::BOOLEAN, &Value::Boolean(false), &Value::Boolean(true));

    let err = DataType::BOOLEAN
        .decode_native(&[0xFE], SortOrder::Descending)
        .expect_err("0xFE is not a descending boolean");
    assert_eq!(err.class, ErrorClass::IllegalData);
}

#[test]
fn descending_boolean_arrays_swap_elements() {
    let data_type = DataType::Array(lexdb_primitives::ScalarKind::Boolean);
    let array = Value::Array(ArrayValue::new(
        lexdb_primitives::ScalarKind::Boolean,
        vec![Value::Boolean(true), Value::Boolean(false)],
    ));

    assert_eq!(enc(data_type, &array, SortOrder::Descending), vec![0, 1]);
    assert_eq!(round_trip(data_type, &array, SortOrder::Descending), array);
}

#[test]
fn boolean_decode_rejects_other_bytes() {
    let err = DataType::BOOLEAN
        .decode_native(&[0x07], SortOrder::Ascending)
        .expect_err("0x07 is not a boolean");
    assert_eq!(err.class, ErrorClass::IllegalData);
}

#[test]
fn boolean_decodes_from_decimal_as_non_zero_test() {
    let bytes = enc(DataType::DECIMAL, &Value::Decimal(Decimal::new(-3, 1)), SortOrder::Ascending);
    let value = DataType::BOOLEAN
        .decode(&bytes, DataType::DECIMAL, SortOrder::Ascending, TypeWidth::UNBOUNDED)
        .expect("decimal is castable to boolean");

    assert_eq!(value, Value::Boolean(true));
}

#[test]
fn zero_length_decodes_to_null_for_every_type() {
    for kind in lexdb_primitives::ALL_SCALAR_KINDS {
        let data_type = DataType::Scalar(kind);
        assert_eq!(
            data_type.decode_native(&[], SortOrder::Descending).expect("null"),
            Value::Null
        );
        assert!(enc(data_type, &Value::Null, SortOrder::Ascending).is_empty());
    }
}

#[test]
fn fixed_width_types_encode_to_declared_width() {
    let samples = [
        (DataType::TINYINT, Value::TinyInt(-3)),
        (DataType::SMALLINT, Value::SmallInt(300)),
        (DataType::INTEGER, Value::Integer(7)),
        (DataType::BIGINT, Value::BigInt(7)),
        (DataType::FLOAT, Value::Float(1.5)),
        (DataType::DOUBLE, Value::Double(-2.5)),
        (DataType::DATE, Value::Date(Date::from_millis(1))),
        (
            DataType::TIMESTAMP,
            Value::Timestamp(Timestamp::new(1, 2).expect("valid")),
        ),
    ];

    for (data_type, value) in samples {
        let width = data_type.byte_width().expect("fixed width");
        assert_eq!(enc(data_type, &value, SortOrder::Ascending).len(), width, "{data_type}");
        assert_eq!(enc(data_type, &value, SortOrder::Descending).len(), width, "{data_type}");
    }
}

#[test]
fn bigint_layout_is_sign_flipped_big_endian() {
    assert_eq!(
        enc(DataType::BIGINT, &Value::BigInt(7), SortOrder::Ascending),
        vec![0x80, 0, 0, 0, 0, 0, 0, 7]
    );
    assert_eq!(
        enc(DataType::BIGINT, &Value::BigInt(7), SortOrder::Descending),
        vec![0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xF8]
    );
}

#[test]
fn encode_converts_castable_values_and_rejects_others() {
    assert_eq!(
        enc(DataType::BIGINT, &Value::Integer(7), SortOrder::Ascending),
        enc(DataType::BIGINT, &Value::BigInt(7), SortOrder::Ascending)
    );

    let err = DataType::INTEGER
        .encode(&Value::varchar("7"), SortOrder::Ascending)
        .expect_err("text is not castable to INTEGER");
    assert_eq!(err.class, ErrorClass::ConstraintViolation);
}

#[test]
fn decode_rejects_incompatible_declared_type() {
    let bytes = enc(DataType::VARCHAR, &Value::varchar("x"), SortOrder::Ascending);
    let err = DataType::BIGINT
        .decode(&bytes, DataType::VARCHAR, SortOrder::Ascending, TypeWidth::UNBOUNDED)
        .expect_err("VARCHAR cannot decode as BIGINT");

    assert_eq!(err.class, ErrorClass::ConstraintViolation);
    assert_eq!(err.origin, ErrorOrigin::Codec);
}

#[test]
fn decode_applies_declared_decimal_scale() {
    let bytes = enc(
        DataType::DECIMAL,
        &Value::Decimal(Decimal::from_str("1.2345").expect("decimal")),
        SortOrder::Descending,
    );
    let value = DataType::DECIMAL
        .decode(&bytes, DataType::DECIMAL, SortOrder::Descending, TypeWidth::decimal(10, 2))
        .expect("decodes");

    assert_eq!(value, Value::Decimal(Decimal::from_str("1.23").expect("decimal")));
}

#[test]
fn widening_decode_reads_narrow_encodings() {
    let bytes = enc(DataType::SMALLINT, &Value::SmallInt(-12), SortOrder::Descending);
    let value = DataType::BIGINT
        .decode(&bytes, DataType::SMALLINT, SortOrder::Descending, TypeWidth::UNBOUNDED)
        .expect("SMALLINT widens to BIGINT");

    assert_eq!(value, Value::BigInt(-12));
}

#[test]
fn compare_orders_null_first_and_coerces() {
    assert_eq!(
        DataType::BIGINT
            .compare(&Value::Null, &Value::BigInt(0), DataType::BIGINT)
            .expect("comparable"),
        Ordering::Less
    );
    assert_eq!(
        DataType::BIGINT
            .compare(&Value::BigInt(5), &Value::Integer(5), DataType::INTEGER)
            .expect("comparable"),
        Ordering::Equal
    );
    assert_eq!(
        DataType::DECIMAL
            .compare(&Value::Decimal(Decimal::new(15, 1)), &Value::Integer(2), DataType::INTEGER)
            .expect("comparable"),
        Ordering::Less
    );
    assert!(
        DataType::BOOLEAN
            .compare(&Value::Boolean(true), &Value::Integer(1), DataType::INTEGER)
            .is_err()
    );
}

#[test]
fn sql_lookup_covers_scalars_and_arrays() {
    assert_eq!(DataType::from_sql_name("bigint"), Some(DataType::BIGINT));
    assert_eq!(
        DataType::from_sql_name("VARCHAR ARRAY"),
        Some(DataType::Array(ScalarKind::Varchar))
    );
    assert_eq!(DataType::from_sql_type_code(-5), Some(DataType::BIGINT));
    assert_eq!(
        DataType::from_sql_type_code(2995),
        Some(DataType::Array(ScalarKind::BigInt))
    );
    assert_eq!(DataType::Array(ScalarKind::Double).sql_type_code(), 3008);
    assert_eq!(DataType::Array(ScalarKind::Double).to_string(), "DOUBLE ARRAY");
    assert!(!DataType::Array(ScalarKind::BigInt).is_fixed_width());
}

#[test]
fn numeric_codec_writes_at_offset_without_allocating() {
    let codec = DataType::INTEGER.codec().expect("integer codec");
    let mut buf = [0u8; 6];

    assert_eq!(codec.encode_int(-2, &mut buf, 2, SortOrder::Ascending).expect("fits"), 4);
    assert_eq!(codec.decode_int(&buf, 2, SortOrder::Ascending).expect("reads"), -2);
    assert_eq!(&buf[2..], &enc(DataType::INTEGER, &Value::Integer(-2), SortOrder::Ascending)[..]);

    codec.encode_long(9, &mut buf, 0, SortOrder::Descending).expect("fits");
    assert_eq!(codec.decode_long(&buf, 0, SortOrder::Descending).expect("reads"), 9);
    assert!(codec.encode_long(i64::MAX, &mut buf, 0, SortOrder::Ascending).is_err());
    assert!(codec.decode_long(&buf, 4, SortOrder::Ascending).is_err());

    let double = DataType::DOUBLE.codec().expect("double codec");
    let mut wide = [0u8; 8];
    double.encode_double(-0.25, &mut wide, 0, SortOrder::Descending).expect("fits");
    assert!((double.decode_double(&wide, 0, SortOrder::Descending).expect("reads") + 0.25).abs() < f64::EPSILON);

    assert!(DataType::VARCHAR.codec().is_none());
    assert!(DataType::BOOLEAN.codec().is_none());
}

#[test]
fn estimate_matches_encoded_length() {
    let samples = [
        (DataType::VARCHAR, Value::varchar("a\0b")),
        (DataType::DECIMAL, Value::Decimal(Decimal::new(-12345, 3))),
        (DataType::BIGINT, Value::BigInt(1)),
        (
            DataType::Array(ScalarKind::Integer),
            Value::Array(ArrayValue::new(ScalarKind::Integer, vec![Value::Integer(1); 3])),
        ),
    ];

    for (data_type, value) in samples {
        assert_eq!(
            data_type.estimate_byte_size(&value),
            enc(data_type, &value, SortOrder::Ascending).len(),
            "{data_type}"
        );
    }
}

#[test]
fn literal_parsing_covers_each_family() {
    assert_eq!(DataType::BOOLEAN.parse_literal("TRUE").expect("parses"), Value::Boolean(true));
    assert_eq!(DataType::TINYINT.parse_literal(" -8 ").expect("parses"), Value::TinyInt(-8));
    assert_eq!(
        DataType::DECIMAL.parse_literal("12.50").expect("parses"),
        Value::Decimal(Decimal::new(1250, 2))
    );
    assert_eq!(
        DataType::DATE.parse_literal("1970-01-02").expect("parses"),
        Value::Date(Date::from_millis(86_400_000))
    );
    assert_eq!(
        DataType::VARBINARY.parse_literal("0x00ff").expect("parses"),
        Value::Varbinary(vec![0x00, 0xFF])
    );
    assert_eq!(
        DataType::Array(ScalarKind::Integer).parse_literal("[1, null, 3]").expect("parses"),
        Value::Array(ArrayValue::new(
            ScalarKind::Integer,
            vec![Value::Integer(1), Value::Null, Value::Integer(3)]
        ))
    );
    assert_eq!(DataType::BIGINT.parse_literal("null").expect("parses"), Value::Null);

    let err = DataType::TINYINT.parse_literal("300").expect_err("out of range");
    assert_eq!(err.class, ErrorClass::IllegalData);
}

#[test]
fn sampling_is_deterministic_per_seed_and_typed() {
    reseed_sampling(42);
    let first: Vec<Value> = (0..4)
        .map(|_| DataType::VARCHAR.sample_value(Some(8), None))
        .collect();
    reseed_sampling(42);
    let second: Vec<Value> = (0..4)
        .map(|_| DataType::VARCHAR.sample_value(Some(8), None))
        .collect();
    assert_eq!(first, second);

    for kind in lexdb_primitives::ALL_SCALAR_KINDS {
        let data_type = DataType::Scalar(kind);
        let sample = data_type.sample_value(Some(4), None);
        assert_eq!(sample.data_type(), Some(data_type));
        assert_eq!(round_trip(data_type, &sample, SortOrder::Descending), sample);
    }

    let array = DataType::Array(ScalarKind::BigInt).sample_value(None, Some(3));
    let Value::Array(array) = array else {
        panic!("array sample expected");
    };
    assert_eq!(array.len(), 3);
}

fn any_sort() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Ascending), Just(SortOrder::Descending)]
}

fn any_decimal() -> impl Strategy<Value = Decimal> {
    (any::<i64>(), 0u32..=18).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn bigint_round_trips_and_orders(a in any::<i64>(), b in any::<i64>(), sort in any_sort()) {
        prop_assert_eq!(round_trip(DataType::BIGINT, &Value::BigInt(a), sort), Value::BigInt(a));
        if a < b {
            assert_order(DataType::BIGINT, &Value::BigInt(a), &Value::BigInt(b));
        }
    }

    #[test]
    fn small_integers_round_trip_and_order(a in any::<i16>(), b in any::<i16>(), t in any::<i8>()) {
        prop_assert_eq!(
            round_trip(DataType::SMALLINT, &Value::SmallInt(a), SortOrder::Descending),
            Value::SmallInt(a)
        );
        prop_assert_eq!(
            round_trip(DataType::TINYINT, &Value::TinyInt(t), SortOrder::Ascending),
            Value::TinyInt(t)
        );
        if a < b {
            assert_order(DataType::SMALLINT, &Value::SmallInt(a), &Value::SmallInt(b));
        }
    }

    #[test]
    fn doubles_round_trip_and_order(
        a in proptest::num::f64::NORMAL | proptest::num::f64::ZERO,
        b in proptest::num::f64::NORMAL,
        sort in any_sort(),
    ) {
        prop_assert_eq!(round_trip(DataType::DOUBLE, &Value::Double(a), sort), Value::Double(a));
        if a < b {
            assert_order(DataType::DOUBLE, &Value::Double(a), &Value::Double(b));
        }
    }

    #[test]
    fn integers_round_trip_and_order(a in any::<i32>(), b in any::<i32>(), sort in any_sort()) {
        prop_assert_eq!(round_trip(DataType::INTEGER, &Value::Integer(a), sort), Value::Integer(a));
        if a < b {
            assert_order(DataType::INTEGER, &Value::Integer(a), &Value::Integer(b));
        }
    }

    #[test]
    fn floats_round_trip_and_order(
        a in proptest::num::f32::NORMAL | proptest::num::f32::ZERO,
        b in proptest::num::f32::NORMAL,
        sort in any_sort(),
    ) {
        prop_assert_eq!(round_trip(DataType::FLOAT, &Value::Float(a), sort), Value::Float(a));
        if a < b {
            assert_order(DataType::FLOAT, &Value::Float(a), &Value::Float(b));
        }
    }

    #[test]
    fn dates_and_times_round_trip_and_order(a in any::<i64>(), b in any::<i64>(), sort in any_sort()) {
        let (date_a, date_b) = (Value::Date(Date::from_millis(a)), Value::Date(Date::from_millis(b)));
        let (time_a, time_b) = (Value::Time(Time::from_millis(a)), Value::Time(Time::from_millis(b)));
        prop_assert_eq!(round_trip(DataType::DATE, &date_a, sort), date_a.clone());
        prop_assert_eq!(round_trip(DataType::TIME, &time_a, sort), time_a.clone());
        if a < b {
            assert_order(DataType::DATE, &date_a, &date_b);
            assert_order(DataType::TIME, &time_a, &time_b);
        }
    }

    #[test]
    fn decimals_round_trip_and_order(a in any_decimal(), b in any_decimal(), sort in any_sort()) {
        prop_assert_eq!(round_trip(DataType::DECIMAL, &Value::Decimal(a), sort), Value::Decimal(a));
        if a < b {
            assert_order(DataType::DECIMAL, &Value::Decimal(a), &Value::Decimal(b));
        }
    }

    #[test]
    fn varchars_round_trip_and_order(a in "\\PC{1,12}", b in "\\PC{1,12}", sort in any_sort()) {
        prop_assert_eq!(round_trip(DataType::VARCHAR, &Value::varchar(a.as_str()), sort), Value::varchar(a.as_str()));
        if a < b {
            assert_order(DataType::VARCHAR, &Value::varchar(a.as_str()), &Value::varchar(b.as_str()));
        }
    }

    #[test]
    fn varbinary_never_contains_separator(
        bytes in proptest::collection::vec(any::<u8>(), 1..24),
        sort in any_sort(),
    ) {
        let encoded = enc(DataType::VARBINARY, &Value::Varbinary(bytes.clone()), sort);
        prop_assert!(!encoded.contains(&sort.separator()));
        prop_assert_eq!(
            DataType::VARBINARY.decode_native(&encoded, sort).expect("decodes"),
            Value::Varbinary(bytes)
        );
    }

    #[test]
    fn timestamps_order_by_millis_then_nanos(
        millis in any::<i64>(),
        a in 0u32..1_000_000,
        b in 0u32..1_000_000,
    ) {
        let lower = Timestamp::new(millis, a.min(b)).expect("valid");
        let higher = Timestamp::new(millis, a.max(b)).expect("valid");
        prop_assert_eq!(
            round_trip(DataType::TIMESTAMP, &Value::Timestamp(lower), SortOrder::Descending),
            Value::Timestamp(lower)
        );
        if a != b {
            assert_order(DataType::TIMESTAMP, &Value::Timestamp(lower), &Value::Timestamp(higher));
        }
    }

    #[test]
    fn arrays_round_trip(
        values in proptest::collection::vec(proptest::option::of("[a-z\\x00\\x01]{0,6}"), 1..6),
        sort in any_sort(),
    ) {
        let elements: Vec<Value> = values
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Varchar))
            .collect();
        let array = Value::Array(ArrayValue::new(ScalarKind::Varchar, elements.clone()));
        let decoded = round_trip(DataType::Array(ScalarKind::Varchar), &array, sort);

        // empty strings are null by length
        let expected: Vec<Value> = elements
            .into_iter()
            .map(|v| match v {
                Value::Varchar(text) if text.is_empty() => Value::Null,
                other => other,
            })
            .collect();
        prop_assert_eq!(decoded, Value::Array(ArrayValue::new(ScalarKind::Varchar, expected)));
    }
}
