//! Process exit codes. Stable for CI consumers.

/// All cases completed; non-strict failures may have shrunk the row set.
pub const OK: i32 = 0;
/// At least one strict-mode case failed or timed out.
pub const TEST_FAILURE: i32 = 1;
/// Bad invocation, unreadable suite or settings file.
pub const CONFIG_ERROR: i32 = 2;
