//! Error type shared by the figure builder, the markup renderer and the save pipeline.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

/// Coarse classification of a [`PlotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input detected before any I/O; the caller can fix it and retry.
    InvalidArgument,
    /// An output or intermediate file could not be written.
    Resource,
    /// The external compiler or the artifact cleanup failed.
    ExternalTool,
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start compiler `{program}`: {source}")]
    CompilerSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lost track of compiler `{program}` while waiting for it: {source}")]
    CompilerWait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compiler `{program}` exited with {status}; see {}", log.display())]
    CompilerFailed {
        program: String,
        status: ExitStatus,
        log: PathBuf,
    },

    #[error("compiler `{program}` did not finish within {}s", timeout.as_secs_f64())]
    CompilerTimedOut { program: String, timeout: Duration },

    #[error("cannot remove intermediate artifact {}: {source}", path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PlotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlotError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PlotError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            PlotError::Io { .. } => ErrorKind::Resource,
            PlotError::CompilerSpawn { .. }
            | PlotError::CompilerWait { .. }
            | PlotError::CompilerFailed { .. }
            | PlotError::CompilerTimedOut { .. }
            | PlotError::CleanupFailed { .. } => ErrorKind::ExternalTool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_failure_is_not_reported_as_spawn_failure() {
        let err = PlotError::CompilerWait {
            program: "pdflatex".into(),
            source: std::io::Error::other("interrupted"),
        };
        assert_eq!(err.kind(), ErrorKind::ExternalTool);
        let msg = err.to_string();
        assert!(msg.contains("waiting"), "{msg}");
        assert!(!msg.contains("failed to start"), "{msg}");
    }
}
