//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// Parse error - the input is not well-formed YAML
pub const PARSE_ERROR: i32 = 2;

/// Decode error - a CRD document does not decode
pub const DECODE_ERROR: i32 = 3;

/// Schema error - the embedded schema could not be extracted
pub const SCHEMA_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Type generation error - the type engine failed
pub const TYPEGEN_ERROR: i32 = 6;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
