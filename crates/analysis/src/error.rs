use nbody::DiagnosticsError;
use thiserror::Error;

/// Invariant violations found while driving a stream through diagnostics
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("frame {index}: {source}")]
    Diagnostics {
        index: usize,
        #[source]
        source: DiagnosticsError,
    },

    #[error("frame {index} has {found} particles, expected {expected}")]
    ParticleCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("frame {index} has {count} particles, cannot track particle {tracked}")]
    TrackedParticleOutOfRange {
        index: usize,
        tracked: usize,
        count: usize,
    },
}
