/// Exit codes of the gflogos binary, following the BSD sysexits convention
/// where one applies.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Any failed command: bad arguments, unreadable input, refused login
pub const USAGE: i32 = 64;

/// Interrupted by the user (Ctrl+C or end of input at a prompt)
pub const CANCEL: i32 = 130;
