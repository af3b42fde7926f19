//! Native value domains that have no direct std equivalent.

mod temporal;

pub use rust_decimal::Decimal;
pub use temporal::{Date, MILLIS_PER_DAY, Time, Timestamp};
