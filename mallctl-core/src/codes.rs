//! Numeric response codes understood by the admin UI.
//!
//! Every error body carries one of these as `errno`, next to the HTTP
//! status. The values are fixed by the admin front end and must not drift.

/// Request handled.
pub const OK: i32 = 0;

/// Generic failure (unknown resource, unclassified error).
pub const FAIL: i32 = -1;

/// A required field is missing, empty or out of range.
pub const BAD_ARGUMENT: i32 = 401;

/// A field is well-formed but names something that does not exist,
/// or carries a value outside the accepted set.
pub const BAD_ARGUMENT_VALUE: i32 = 402;

/// A write could not be completed.
pub const UPDATE_DATA_FAILED: i32 = 505;

/// Another live goods record already uses this name.
pub const GOODS_NAME_EXIST: i32 = 611;
