//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! | 0    | Success                                      |
//! | 1    | General error (export failure, bad input)    |
//! | 2    | CLI usage error                              |
//! | 3    | Fewer than 3 or more than 6 files supplied   |
//! | 4    | Every supplied file failed to load           |

use kwcompare_engine::error::CompareError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// clap reports its own usage errors with this code; kept here so the
/// registry documents the full shell contract.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// File-count gate failed; nothing was read, no output produced.
pub const EXIT_FILE_COUNT: u8 = 3;

/// All supplied files failed to load; no output produced.
pub const EXIT_NO_VALID_FILES: u8 = 4;

/// Map a fatal engine error to its exit code.
pub fn compare_exit_code(err: &CompareError) -> u8 {
    match err {
        CompareError::FileCount { .. } => EXIT_FILE_COUNT,
        CompareError::NoValidFiles => EXIT_NO_VALID_FILES,
    }
}
