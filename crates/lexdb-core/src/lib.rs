//! Core of lexdb: order-preserving typed value codecs, scalar expression
//! evaluation over encoded rows, and composite row keys for byte-ordered
//! key/value stores.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod codec;
pub mod config;
pub mod error;
pub mod expr;
pub mod key;
pub mod obs;
pub mod row;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or config types are re-exported here.
///

pub mod prelude {
    pub use crate::{
        codec::{DataType, SortOrder, TypeWidth},
        expr::{ArithmeticOp, CompareOp, Expression},
        key::{CompositeKey, CompositeKeyCodec, KeyField, KeySchema},
        row::{Cell, ResultRow, Row},
        value::Value,
    };
}
