//! Reading simulator output
//!
//! - [`setup`] parses the run-setup record
//! - [`source`] locates and parses individual step files
//! - [`stream`] delivers frames in order with bounded read-ahead

pub mod error;
pub mod setup;
pub mod source;
pub mod stream;


pub use error::{FrameError, MalformedReason, SetupError, SourceError};
pub use setup::RunSetup;
pub use source::{FrameSource, InMemorySource, StepDirectory, parse_frame};
pub use stream::{FrameStream, Frames, StreamConfig, Truncation};
