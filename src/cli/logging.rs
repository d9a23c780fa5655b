//! Sequential status output for the pipeline.
//!
//! The pipeline reports progress as plain status lines; quiet mode
//! suppresses everything, verbose mode adds detail such as the confusion
//! matrix.

/// Output verbosity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output.
    Quiet,
    /// Normal status messages.
    Normal,
    /// Normal plus additional detail.
    Verbose,
}

impl LogLevel {
    /// Derive the level from CLI flags; quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }
}

/// Print `msg` if the current level permits messages at `required` level.
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}
