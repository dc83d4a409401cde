//! Frame sources: where a step's particle data lives and how it is parsed

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};
use nbody::frame::Frame;
use nbody::particle::{FIELDS_PER_PARTICLE, ParticleState};

use crate::error::{FrameError, MalformedReason, SourceError};

/// Default extension of step files
pub const STEP_EXTENSION: &str = "txt";

/// A numbered sequence of frames
///
/// Implementations must be shareable with the producer thread of a
/// [`FrameStream`](crate::stream::FrameStream).
pub trait FrameSource: Send + Sync {
    /// Number of frames available, fixed for the lifetime of the source
    fn count(&self) -> usize;

    /// Reads and validates the frame at `index`
    ///
    /// # Errors
    ///
    /// * `NotFound` - nothing exists for `index`
    /// * `Malformed` - the content fails validation
    /// * `Io` - the content could not be read
    fn read(&self, index: usize) -> Result<Frame, FrameError>;
}

/// Parses the text of one step file into a frame
///
/// Every non-blank line must hold exactly six finite numbers,
/// `x y z vx vy vz`. Line order becomes particle order.
///
/// # Examples
///
/// ```
/// use snapshots::source::parse_frame;
///
/// let frame = parse_frame(2, "1 0 0 0 0 0\n-1 0 0 0 0 0\n").unwrap();
/// assert_eq!(frame.index, 2);
/// assert_eq!(frame.particle_count(), 2);
///
/// assert!(parse_frame(3, "nan 0 0 0 0 0\n").is_err());
/// ```
pub fn parse_frame(index: usize, text: &str) -> Result<Frame, FrameError> {
    let particles = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            parse_record(line).map_err(|reason| FrameError::Malformed {
                index,
                line: n + 1,
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Frame::new(index, particles))
}

fn parse_record(line: &str) -> Result<ParticleState, MalformedReason> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != FIELDS_PER_PARTICLE {
        return Err(MalformedReason::FieldCount {
            found: tokens.len(),
        });
    }

    let mut fields = [0.0; FIELDS_PER_PARTICLE];
    for (field, (slot, token)) in fields.iter_mut().zip(&tokens).enumerate() {
        let value = token
            .parse::<f64>()
            .map_err(|_| MalformedReason::Unparsable {
                field,
                token: token.to_string(),
            })?;
        if !value.is_finite() {
            return Err(MalformedReason::NonFinite { field, value });
        }
        *slot = value;
    }

    Ok(ParticleState::from_fields(fields))
}

/// A directory of step files named `<index>.<extension>`
///
/// The frame count is computed on first use and then kept for the lifetime
/// of the value; the directory is assumed not to change during a run.
#[derive(Debug)]
pub struct StepDirectory {
    root: PathBuf,
    extension: String,
    count: OnceLock<usize>,
}

impl StepDirectory {
    /// Opens a step directory using the default `txt` extension
    ///
    /// # Errors
    ///
    /// `NotADirectory` if `root` does not name an existing directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, SourceError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(SourceError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            extension: STEP_EXTENSION.to_string(),
            count: OnceLock::new(),
        })
    }

    /// Uses a different step-file extension
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self.count = OnceLock::new();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the step file for `index`
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.root.join(format!("{}.{}", index, self.extension))
    }

    fn is_step_file(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension);
        let numbered = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.parse::<usize>().is_ok());

        extension_matches && numbered
    }

    fn scan(&self) -> usize {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("cannot list step directory {}: {}", self.root.display(), err);
                return 0;
            }
        };

        let count = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
            .filter(|entry| self.is_step_file(&entry.path()))
            .count();

        debug!("found {} step files in {}", count, self.root.display());
        count
    }
}

impl FrameSource for StepDirectory {
    fn count(&self) -> usize {
        *self.count.get_or_init(|| self.scan())
    }

    fn read(&self, index: usize) -> Result<Frame, FrameError> {
        let path = self.path_for(index);
        let text = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                debug!("step file {} does not exist", path.display());
                FrameError::NotFound { index }
            } else {
                FrameError::Io { index, source }
            }
        })?;

        parse_frame(index, &text)
    }
}

/// Frames held as step-file text in memory, indexed by position
///
/// A `None` entry behaves like a missing step file.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    frames: Vec<Option<String>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a source from one text blob per frame
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: texts.into_iter().map(|t| Some(t.into())).collect(),
        }
    }

    /// Appends a frame given as step-file text
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.frames.push(Some(text.into()));
    }

    /// Appends a frame built from particle states
    pub fn push_particles(&mut self, particles: &[ParticleState]) {
        self.push_text(format_frame(particles));
    }

    /// Appends a slot with no data, counted but unreadable
    pub fn push_missing(&mut self) {
        self.frames.push(None);
    }
}

impl FrameSource for InMemorySource {
    fn count(&self) -> usize {
        self.frames.len()
    }

    fn read(&self, index: usize) -> Result<Frame, FrameError> {
        match self.frames.get(index) {
            Some(Some(text)) => parse_frame(index, text),
            _ => Err(FrameError::NotFound { index }),
        }
    }
}

/// Formats particles the way the simulator writes step files
pub fn format_frame(particles: &[ParticleState]) -> String {
    particles
        .iter()
        .map(|p| {
            format!(
                "{:.14} {:.14} {:.14} {:.14} {:.14} {:.14}\n",
                p.position.x, p.position.y, p.position.z, p.velocity.x, p.velocity.y, p.velocity.z
            )
        })
        .collect()
}
