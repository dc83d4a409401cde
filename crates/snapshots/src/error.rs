//! Error types for reading run setup and step files

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a step file's content was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedReason {
    #[error("expected 6 fields (x y z vx vy vz), found {found}")]
    FieldCount { found: usize },

    #[error("field {field} is not a number: `{token}`")]
    Unparsable { field: usize, token: String },

    #[error("field {field} is not finite: {value}")]
    NonFinite { field: usize, value: f64 },
}

/// Failure to produce the frame at a given index
#[derive(Debug, Error)]
pub enum FrameError {
    /// No step file exists for the index
    #[error("no step file for frame {index}")]
    NotFound { index: usize },

    /// The step file exists but its content fails validation
    #[error("frame {index} is malformed at line {line}: {reason}")]
    Malformed {
        index: usize,
        line: usize,
        reason: MalformedReason,
    },

    #[error("failed to read frame {index}: {source}")]
    Io {
        index: usize,
        #[source]
        source: io::Error,
    },

    /// The reader thread stopped before delivering the frame
    #[error("frame producer stopped before frame {index}")]
    ProducerFailed { index: usize },
}

impl FrameError {
    /// Index of the frame that failed
    pub fn index(&self) -> usize {
        match self {
            Self::NotFound { index }
            | Self::Malformed { index, .. }
            | Self::Io { index, .. }
            | Self::ProducerFailed { index } => *index,
        }
    }

    /// True when the frame content was rejected (typically numerical divergence)
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Failure to open a frame source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("step directory {} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
}

/// Failure to load the run-setup record
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read run setup {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("run setup is missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("run setup field `{field}` has invalid value `{value}`")]
    InvalidField { field: &'static str, value: String },
}
