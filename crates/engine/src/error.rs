use std::fmt;

/// Minimum number of input files (client + at least two competitors).
pub const MIN_FILES: usize = 3;
/// Maximum number of input files.
pub const MAX_FILES: usize = 6;

/// Fatal errors. No output is produced when one of these occurs.
#[derive(Debug)]
pub enum CompareError {
    /// Fewer than MIN_FILES or more than MAX_FILES paths supplied.
    /// Checked before any file is opened.
    FileCount { supplied: usize },
    /// Every supplied file failed to load.
    NoValidFiles,
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileCount { supplied } if *supplied < MIN_FILES => {
                write!(f, "please supply at least {MIN_FILES} spreadsheets ({supplied} given)")
            }
            Self::FileCount { supplied } => {
                write!(f, "please supply no more than {MAX_FILES} spreadsheets ({supplied} given)")
            }
            Self::NoValidFiles => {
                write!(f, "no files could be processed; check file formats")
            }
        }
    }
}

impl std::error::Error for CompareError {}
