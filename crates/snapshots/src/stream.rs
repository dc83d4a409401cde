//! Ordered, bounded read-ahead over a frame source
//!
//! A [`FrameStream`] describes which frames to read; each call to
//! [`FrameStream::stream`] starts a producer thread that reads frames in index
//! order into a bounded channel and returns a [`Frames`] iterator over it.
//!
//! ```text
//! producer thread                      consumer
//! read(0) read(1) ... ──► [bounded] ──► Frames::next()
//! ```
//!
//! The channel capacity caps memory at `read_ahead` frames. The first read
//! failure ends the stream: frames before it are delivered, the failure is
//! kept as a [`Truncation`] and nothing after it is read. Dropping the
//! iterator stops and joins the producer.

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, warn};
use nbody::frame::Frame;

use crate::error::FrameError;
use crate::source::FrameSource;

/// Tuning for the producer side of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Maximum frames read ahead of the consumer (clamped to at least 1)
    pub read_ahead: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { read_ahead: 8 }
    }
}

impl StreamConfig {
    pub fn with_read_ahead(mut self, read_ahead: usize) -> Self {
        self.read_ahead = read_ahead;
        self
    }

    fn capacity(&self) -> usize {
        self.read_ahead.max(1)
    }
}

/// The read failure that ended a stream
#[derive(Debug)]
pub struct Truncation {
    /// First index that could not be delivered
    pub index: usize,
    pub cause: FrameError,
}

/// A finite, ordered sequence of frames from a source
pub struct FrameStream {
    source: Arc<dyn FrameSource>,
    range: Range<usize>,
    config: StreamConfig,
}

impl FrameStream {
    /// Streams every frame the source reports, `[0, count())`
    ///
    /// The count is read once here and fixed for every stream started from
    /// this value.
    pub fn new(source: Arc<dyn FrameSource>) -> Self {
        let count = source.count();
        Self::with_range(source, 0..count)
    }

    /// Streams an explicit index range
    pub fn with_range(source: Arc<dyn FrameSource>, range: Range<usize>) -> Self {
        Self {
            source,
            range,
            config: StreamConfig::default(),
        }
    }

    pub fn with_config(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Number of frames the stream will deliver if none fails
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Starts a producer and returns the consuming iterator
    ///
    /// Each call reads the range again from the start.
    pub fn stream(&self) -> Frames {
        let (sender, receiver) = crossbeam_channel::bounded(self.config.capacity());
        let stop = Arc::new(AtomicBool::new(false));

        let producer = {
            let source = Arc::clone(&self.source);
            let range = self.range.clone();
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || produce(source.as_ref(), range, &sender, &stop))
        };

        debug!(
            "started frame producer for {:?} with read-ahead {}",
            self.range,
            self.config.capacity()
        );

        Frames {
            receiver: Some(receiver),
            stop,
            producer: Some(producer),
            next_index: self.range.start,
            expected: self.range.len(),
            delivered: 0,
            truncation: None,
        }
    }
}

fn produce(
    source: &dyn FrameSource,
    range: Range<usize>,
    sender: &Sender<Result<Frame, FrameError>>,
    stop: &AtomicBool,
) {
    for index in range {
        if stop.load(Ordering::Relaxed) {
            debug!("frame producer cancelled before frame {}", index);
            return;
        }

        let result = source.read(index);
        let failed = result.is_err();

        // A send error means the consumer is gone.
        if sender.send(result).is_err() || failed {
            return;
        }
    }
}

/// Consuming side of a [`FrameStream`]
///
/// Yields frames in strictly increasing index order. After it returns
/// `None`, [`truncation`](Frames::truncation) tells whether the whole range
/// was delivered.
pub struct Frames {
    receiver: Option<Receiver<Result<Frame, FrameError>>>,
    stop: Arc<AtomicBool>,
    producer: Option<JoinHandle<()>>,
    next_index: usize,
    expected: usize,
    delivered: usize,
    truncation: Option<Truncation>,
}

impl Frames {
    /// The failure that ended the stream early, if any
    pub fn truncation(&self) -> Option<&Truncation> {
        self.truncation.as_ref()
    }

    /// Takes ownership of the truncation cause
    pub fn take_truncation(&mut self) -> Option<Truncation> {
        self.truncation.take()
    }

    /// Frames delivered so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Frames the range holds
    pub fn expected(&self) -> usize {
        self.expected
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // Dropping the receiver unblocks a producer waiting on a full channel.
        self.receiver = None;

        if let Some(producer) = self.producer.take() {
            if producer.join().is_err() {
                error!("frame producer panicked");
            }
        }
    }
}

impl Iterator for Frames {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let received = self.receiver.as_ref()?.recv();

        match received {
            Ok(Ok(frame)) => {
                debug_assert_eq!(frame.index, self.next_index);
                self.next_index += 1;
                self.delivered += 1;
                Some(frame)
            }
            Ok(Err(cause)) => {
                warn!(
                    "stream truncated at frame {} after {} frames: {}",
                    self.next_index, self.delivered, cause
                );
                self.truncation = Some(Truncation {
                    index: self.next_index,
                    cause,
                });
                self.shutdown();
                None
            }
            Err(_) => {
                // The producer hung up early, which only happens when it panicked.
                if self.delivered < self.expected {
                    let cause = FrameError::ProducerFailed {
                        index: self.next_index,
                    };
                    warn!(
                        "stream truncated at frame {} after {} frames: {}",
                        self.next_index, self.delivered, cause
                    );
                    self.truncation = Some(Truncation {
                        index: self.next_index,
                        cause,
                    });
                }
                self.shutdown();
                None
            }
        }
    }
}

impl Drop for Frames {
    fn drop(&mut self) {
        self.shutdown();
    }
}
