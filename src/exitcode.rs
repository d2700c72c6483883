//! Process exit codes

/// Successful termination
pub const OK: i32 = 0;

/// Any failure: unreadable input, unwritable output, decode, merge or serialization error
pub const FAILURE: i32 = 1;
