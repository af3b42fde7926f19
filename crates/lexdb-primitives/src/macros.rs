#[macro_export]
macro_rules! scalar_kind_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (
                Boolean,
                Boolean,
                sql_name = "BOOLEAN",
                sql_type_code = 16,
                byte_width = Some(1),
                is_date_like = false
            ),
            (
                TinyInt,
                Integral,
                sql_name = "TINYINT",
                sql_type_code = -6,
                byte_width = Some(1),
                is_date_like = false
            ),
            (
                SmallInt,
                Integral,
                sql_name = "SMALLINT",
                sql_type_code = 5,
                byte_width = Some(2),
                is_date_like = false
            ),
            (
                Integer,
                Integral,
                sql_name = "INTEGER",
                sql_type_code = 4,
                byte_width = Some(4),
                is_date_like = false
            ),
            (
                BigInt,
                Integral,
                sql_name = "BIGINT",
                sql_type_code = -5,
                byte_width = Some(8),
                is_date_like = false
            ),
            (
                Float,
                Floating,
                sql_name = "FLOAT",
                sql_type_code = 6,
                byte_width = Some(4),
                is_date_like = false
            ),
            (
                Double,
                Floating,
                sql_name = "DOUBLE",
                sql_type_code = 8,
                byte_width = Some(8),
                is_date_like = false
            ),
            (
                Decimal,
                Decimal,
                sql_name = "DECIMAL",
                sql_type_code = 3,
                byte_width = None,
                is_date_like = false
            ),
            (
                Date,
                Temporal,
                sql_name = "DATE",
                sql_type_code = 91,
                byte_width = Some(8),
                is_date_like = true
            ),
            (
                Time,
                Temporal,
                sql_name = "TIME",
                sql_type_code = 92,
                byte_width = Some(8),
                is_date_like = true
            ),
            (
                Timestamp,
                Temporal,
                sql_name = "TIMESTAMP",
                sql_type_code = 93,
                byte_width = Some(12),
                is_date_like = true
            ),
            (
                Varchar,
                Textual,
                sql_name = "VARCHAR",
                sql_type_code = 12,
                byte_width = None,
                is_date_like = false
            ),
            (
                Varbinary,
                Binary,
                sql_name = "VARBINARY",
                sql_type_code = -3,
                byte_width = None,
                is_date_like = false
            ),
        }
    };
}

#[macro_export]
macro_rules! scalar_kind_registry {
    ($macro:ident) => {
        $crate::scalar_kind_registry_entries!($macro)
    };
    ($macro:ident, $($args:tt)+) => {
        $crate::scalar_kind_registry_entries!($macro, @args $($args)+)
    };
}

macro_rules! metadata_from_registry {
    ( @args $kind:expr; @entries $( ($scalar:ident, $family:ident, sql_name = $sql_name:expr, sql_type_code = $code:literal, byte_width = $width:expr, is_date_like = $is_date_like:expr) ),* $(,)? ) => {
        match $kind {
            $(
                $crate::ScalarKind::$scalar => $crate::ScalarMetadata {
                    family: $crate::ScalarFamily::$family,
                    sql_name: $sql_name,
                    sql_type_code: $code,
                    byte_width: $width,
                    is_date_like: $is_date_like,
                },
            )*
        }
    };
}

macro_rules! all_kinds_from_registry {
    ( @entries $( ($scalar:ident, $family:ident, sql_name = $sql_name:expr, sql_type_code = $code:literal, byte_width = $width:expr, is_date_like = $is_date_like:expr) ),* $(,)? ) => {
        [ $( $crate::ScalarKind::$scalar ),* ]
    };
}

macro_rules! kind_from_sql_type_code_registry {
    ( @args $code_arg:expr; @entries $( ($scalar:ident, $family:ident, sql_name = $sql_name:expr, sql_type_code = $code:literal, byte_width = $width:expr, is_date_like = $is_date_like:expr) ),* $(,)? ) => {
        match $code_arg {
            $( $code => Some($crate::ScalarKind::$scalar), )*
            _ => None,
        }
    };
}
