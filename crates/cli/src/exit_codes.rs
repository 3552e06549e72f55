//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, unknown format) |
//! | 3       | Universal        | I/O error (unreadable input, unwritable output) |
//! | 60-69   | recon            | Config and schema codes                  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `exit_code_for`

use placerecon::ReconError;

// =============================================================================
// Universal (0-3)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unsupported file extension.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - input cannot be read or output cannot be written.
pub const EXIT_IO: u8 = 3;

// =============================================================================
// Recon (60-69)
// =============================================================================

/// Config file failed to parse or validate.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 60;

/// Input table lacks a required column.
pub const EXIT_RECON_SCHEMA: u8 = 61;

/// Map an engine error to its exit code.
pub fn exit_code_for(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_RECON_INVALID_CONFIG,
        ReconError::MissingColumns { .. } => EXIT_RECON_SCHEMA,
        ReconError::UnsupportedFormat(_) => EXIT_USAGE,
        ReconError::Io(_) => EXIT_IO,
        ReconError::Serialization(_) => EXIT_ERROR,
    }
}
