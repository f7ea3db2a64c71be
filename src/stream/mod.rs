//! # Stream Decoding
//!
//! [`StreamDecoder`] turns a byte stream into messages. It splits the stream
//! into line-feed terminated frames, hands each frame to the first registered
//! [`SentenceDecoder`] whose key matches, and passes every decoded message to a
//! callback in stream order.
//!
//! A run is two cooperating loops joined at the end: one reads chunks from the
//! transport, the other splits them into lines and dispatches them. They are
//! connected by a bounded channel, so a slow callback eventually stops the
//! reads. Keep the callback short. Messages that need slow processing can go
//! through [`StreamDecoder::parse_stream_into`], which waits on a bounded
//! channel instead of calling back.
//!
//! Malformed frames never end a run. A frame that no decoder recognizes, or
//! that its decoder rejects, is logged and counted. When
//! [`abort_after_unparsed_lines`](StreamOptions::abort_after_unparsed_lines) is
//! non-zero, that many consecutive unparsed lines end the run with
//! [`ExitReason::TooManySequentialUnparsedLines`].
//!
//! ```rust
//! # #[cfg(feature = "sentences")]
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! use nmea0183_stream::{ExitReason, StreamDecoder, sentences::{NmeaMessage, gps_decoders}};
//! use tokio_util::sync::CancellationToken;
//!
//! let input: &[u8] = b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n\
//!                      $GPGLL,4916.45,N,12311.12,W,225444,A,*1D\r\n";
//!
//! let mut decoder = StreamDecoder::new();
//! decoder.register(gps_decoders()).unwrap();
//!
//! let mut messages = Vec::new();
//! let reason = decoder
//!     .parse_stream(input, |message| messages.push(message), CancellationToken::new())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(reason, ExitReason::StreamEnded);
//! assert!(matches!(messages[..], [NmeaMessage::VTG(_), NmeaMessage::GLL(_)]));
//! # });
//! ```

use std::{fmt, future, io::Read};

use bytes::{Bytes, BytesMut};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{Error, SentenceDecoder};

mod buffer;

use buffer::{Line, LineBuffer};

/// Why a decoding run ended.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitReason {
    /// The cancellation token was triggered. Takes precedence over every other
    /// reason.
    CancellationRequested,
    /// The configured number of consecutive lines could not be decoded.
    TooManySequentialUnparsedLines,
    /// Reading from the transport failed.
    TransportFailed,
    /// The transport reported the end of the stream.
    StreamEnded,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::CancellationRequested => "cancellation requested",
            Self::TooManySequentialUnparsedLines => "too many sequential unparsed lines",
            Self::TransportFailed => "transport failed",
            Self::StreamEnded => "stream ended",
        };
        f.write_str(reason)
    }
}

/// Counters of the current, or last, decoding run.
///
/// Reset when a run starts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Lines dispatched, including empty and unrecognized lines.
    pub line_count: u64,
    /// Bytes read from the transport. Updated when the run completes.
    pub bytes_received: u64,
    /// Bytes of the dispatched lines, line feeds excluded.
    pub bytes_read: u64,
    /// Consecutive lines that produced no message.
    pub unparsed_sequence_length: u32,
}

/// Tuning of a [`StreamDecoder`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Consecutive unparsed lines that end a run, `0` to never abort.
    pub abort_after_unparsed_lines: u32,
    /// Bytes requested from the transport per read. Comfortably larger than
    /// the longest legal sentence.
    pub min_read_size: usize,
    /// Chunks read ahead of the dispatch loop before reads pause.
    pub max_pending_chunks: usize,
    /// Longest partial line kept while waiting for its line feed. Longer
    /// partial lines are dropped and counted as one unparsed line.
    pub max_line_length: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            abort_after_unparsed_lines: 0,
            min_read_size: 512,
            max_pending_chunks: 8,
            max_line_length: 4096,
        }
    }
}

/// Decodes byte streams with an ordered registry of sentence decoders.
///
/// Register decoders before starting a run; a run needs at least one. Frames
/// are matched against the decoders in registration order and the first match
/// decodes the frame.
pub struct StreamDecoder<M> {
    decoders: Vec<Box<dyn SentenceDecoder<M>>>,
    options: StreamOptions,
    stats: DecoderStats,
}

impl<M> StreamDecoder<M> {
    /// Creates a decoder with no registered sentence decoders and default
    /// options.
    pub fn new() -> Self {
        Self::with_options(StreamOptions::default())
    }

    pub fn with_options(options: StreamOptions) -> Self {
        Self {
            decoders: Vec::new(),
            options,
            stats: DecoderStats::default(),
        }
    }

    pub fn builder() -> StreamDecoderBuilder<M> {
        StreamDecoderBuilder::new()
    }

    /// Appends sentence decoders to the registry.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRegistration`] if `decoders` is empty. The registry is
    /// left unchanged.
    pub fn register<I>(&mut self, decoders: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = Box<dyn SentenceDecoder<M>>>,
    {
        let before = self.decoders.len();
        self.decoders.extend(decoders);

        if self.decoders.len() == before {
            return Err(Error::EmptyRegistration);
        }

        Ok(self)
    }

    /// Appends one sentence decoder to the registry.
    pub fn register_decoder<D>(&mut self, decoder: D) -> &mut Self
    where
        D: SentenceDecoder<M> + 'static,
    {
        self.decoders.push(Box::new(decoder));
        self
    }

    /// Number of registered sentence decoders.
    pub fn decoder_count(&self) -> usize {
        self.decoders.len()
    }

    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    pub fn abort_after_unparsed_lines(&self) -> u32 {
        self.options.abort_after_unparsed_lines
    }

    /// Sets the number of consecutive unparsed lines that end a run. `0`
    /// disables the abort policy.
    pub fn set_abort_after_unparsed_lines(&mut self, lines: u32) -> &mut Self {
        self.options.abort_after_unparsed_lines = lines;
        self
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Decodes a single frame with the first registered decoder that handles
    /// it, updating the counters as a run does.
    ///
    /// Returns `None` when no decoder handles the frame or its decoder rejects
    /// it. Rejections are logged.
    pub fn parse_sentence(&mut self, frame: &[u8]) -> Option<M> {
        self.stats.line_count += 1;
        self.stats.bytes_read += frame.len() as u64;
        let line = self.stats.line_count;

        let message = match self.decoders.iter().find(|decoder| decoder.can_handle(frame)) {
            Some(decoder) => match decoder.parse(frame) {
                Ok(message) => {
                    trace!(line, decoder = decoder.name(), "decoded sentence");
                    Some(message)
                }
                Err(err) => {
                    warn!(
                        line,
                        decoder = decoder.name(),
                        frame = %String::from_utf8_lossy(frame).trim_end(),
                        "failed to decode sentence: {err}"
                    );
                    None
                }
            },
            None => {
                trace!(line, "no decoder for sentence");
                None
            }
        };

        if message.is_some() {
            self.stats.unparsed_sequence_length = 0;
        } else {
            self.count_unparsed();
        }

        message
    }

    /// Runs the decoding loop over an asynchronous byte stream until it ends,
    /// fails, is cancelled, or too many consecutive lines go unparsed.
    ///
    /// `on_message` is called for every decoded message, in stream order, before
    /// the next line is dispatched. Bytes after the last line feed are discarded
    /// when the stream ends.
    ///
    /// # Errors
    ///
    /// [`Error::NoDecoders`] if no sentence decoder is registered. Nothing is
    /// read from the stream in that case.
    pub async fn parse_stream<R, F>(
        &mut self,
        stream: R,
        mut on_message: F,
        cancel: CancellationToken,
    ) -> Result<ExitReason, Error>
    where
        R: AsyncRead + Unpin,
        F: FnMut(M),
    {
        self.run(stream, Callback(&mut on_message), cancel).await
    }

    /// Runs the decoding loop like [`parse_stream`](StreamDecoder::parse_stream),
    /// sending every decoded message to a bounded channel.
    ///
    /// Each send waits for room in the channel before the next line is
    /// dispatched, so a receiver that falls behind pauses the reads from the
    /// transport. Dropping the receiver ends the run with
    /// [`ExitReason::CancellationRequested`].
    ///
    /// # Errors
    ///
    /// [`Error::NoDecoders`] if no sentence decoder is registered.
    pub async fn parse_stream_into<R>(
        &mut self,
        stream: R,
        messages: mpsc::Sender<M>,
        cancel: CancellationToken,
    ) -> Result<ExitReason, Error>
    where
        R: AsyncRead + Unpin,
        M: Send,
    {
        self.run(stream, messages, cancel).await
    }

    async fn run<R, D>(
        &mut self,
        stream: R,
        mut sink: D,
        cancel: CancellationToken,
    ) -> Result<ExitReason, Error>
    where
        R: AsyncRead + Unpin,
        D: Deliver<M>,
    {
        self.start_run()?;

        let (tx, rx) = mpsc::channel(self.options.max_pending_chunks.max(1));
        let min_read_size = self.options.min_read_size.max(1);

        let (filled, drained) = tokio::join!(
            fill(stream, tx, min_read_size, &cancel),
            self.drain(rx, &mut sink, &cancel),
        );
        self.stats.bytes_received = filled.bytes_received;

        let reason = if cancel.is_cancelled() {
            ExitReason::CancellationRequested
        } else if let Some(reason) = drained {
            reason
        } else if filled.transport_failed {
            ExitReason::TransportFailed
        } else {
            ExitReason::StreamEnded
        };

        self.finish_run(reason);
        Ok(reason)
    }

    /// Blocking counterpart of [`parse_stream`](StreamDecoder::parse_stream) for
    /// readers opened with the standard library, such as files and serial
    /// ports.
    ///
    /// Cancellation is checked between reads and between lines, so a reader
    /// that blocks indefinitely also delays cancellation.
    ///
    /// # Errors
    ///
    /// [`Error::NoDecoders`] if no sentence decoder is registered.
    pub fn parse_reader<R, F>(
        &mut self,
        mut reader: R,
        mut on_message: F,
        cancel: &CancellationToken,
    ) -> Result<ExitReason, Error>
    where
        R: Read,
        F: FnMut(M),
    {
        self.start_run()?;

        let mut lines = LineBuffer::new(self.options.max_line_length);
        let mut chunk = vec![0; self.options.min_read_size.max(1)];

        let reason = loop {
            if cancel.is_cancelled() {
                break ExitReason::CancellationRequested;
            }

            let read = match reader.read(&mut chunk) {
                Ok(0) => break ExitReason::StreamEnded,
                Ok(read) => read,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!("transport read failed: {err}");
                    break ExitReason::TransportFailed;
                }
            };

            trace!(bytes = read, "transport read");
            self.stats.bytes_received += read as u64;
            lines.extend(&chunk[..read]);

            if let Some(reason) = self.dispatch_lines(&mut lines, &mut on_message, cancel) {
                break reason;
            }
        };

        if reason != ExitReason::CancellationRequested {
            discard_trailing(&lines);
        }

        self.finish_run(reason);
        Ok(reason)
    }

    fn start_run(&mut self) -> Result<(), Error> {
        if self.decoders.is_empty() {
            return Err(Error::NoDecoders);
        }

        self.stats = DecoderStats::default();
        debug!(
            decoders = self.decoders.len(),
            abort_after_unparsed_lines = self.options.abort_after_unparsed_lines,
            "decoding run started"
        );
        Ok(())
    }

    fn finish_run(&self, reason: ExitReason) {
        debug!(
            %reason,
            lines = self.stats.line_count,
            bytes_received = self.stats.bytes_received,
            bytes_read = self.stats.bytes_read,
            "decoding run completed"
        );
    }

    async fn drain<D>(
        &mut self,
        mut rx: mpsc::Receiver<Bytes>,
        sink: &mut D,
        cancel: &CancellationToken,
    ) -> Option<ExitReason>
    where
        D: Deliver<M>,
    {
        let mut lines = LineBuffer::new(self.options.max_line_length);

        loop {
            let Some(step) = self.dispatch_next(&mut lines, cancel) else {
                let chunk = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Some(ExitReason::CancellationRequested),
                    chunk = rx.recv() => chunk,
                };

                let Some(chunk) = chunk else {
                    discard_trailing(&lines);
                    return None;
                };

                lines.extend(&chunk);
                continue;
            };

            let message = match step {
                Step::Message(message) => message,
                Step::Stop(reason) => return Some(reason),
            };

            let delivered = tokio::select! {
                biased;
                _ = cancel.cancelled() => false,
                delivered = sink.deliver(message) => delivered,
            };
            if !delivered {
                return Some(ExitReason::CancellationRequested);
            }
        }
    }

    /// Dispatches every complete line in the buffer. Returns the reason to stop
    /// the run, if any.
    fn dispatch_lines<F>(
        &mut self,
        lines: &mut LineBuffer,
        on_message: &mut F,
        cancel: &CancellationToken,
    ) -> Option<ExitReason>
    where
        F: FnMut(M),
    {
        loop {
            match self.dispatch_next(lines, cancel)? {
                Step::Message(message) => on_message(message),
                Step::Stop(reason) => return Some(reason),
            }
        }
    }

    /// Dispatches buffered lines until one decodes or the run has to stop.
    /// Returns `None` once no complete line is left.
    fn dispatch_next(
        &mut self,
        lines: &mut LineBuffer,
        cancel: &CancellationToken,
    ) -> Option<Step<M>> {
        while let Some(line) = lines.next_line() {
            if cancel.is_cancelled() {
                return Some(Step::Stop(ExitReason::CancellationRequested));
            }

            let message = match line {
                Line::Complete(frame) => self.parse_sentence(&frame),
                Line::Overflowed(dropped) => {
                    warn!(
                        bytes = dropped,
                        max_line_length = self.options.max_line_length,
                        "dropping line without line feed"
                    );
                    self.stats.line_count += 1;
                    self.count_unparsed();
                    None
                }
            };

            if let Some(message) = message {
                return Some(Step::Message(message));
            }

            if self.should_abort() {
                warn!(
                    lines = self.stats.unparsed_sequence_length,
                    "too many sequential unparsed lines, aborting"
                );
                return Some(Step::Stop(ExitReason::TooManySequentialUnparsedLines));
            }
        }

        None
    }

    fn count_unparsed(&mut self) {
        self.stats.unparsed_sequence_length = self.stats.unparsed_sequence_length.saturating_add(1);
    }

    fn should_abort(&self) -> bool {
        let threshold = self.options.abort_after_unparsed_lines;
        threshold != 0 && self.stats.unparsed_sequence_length >= threshold
    }
}

impl<M> Default for StreamDecoder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for StreamDecoder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.decoders.iter().map(|decoder| decoder.name()).collect();

        f.debug_struct("StreamDecoder")
            .field("decoders", &names)
            .field("options", &self.options)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Builds a [`StreamDecoder`] with its options and decoders in one expression.
///
/// ```rust
/// # #[cfg(feature = "sentences")] {
/// use nmea0183_stream::{StreamDecoder, decoder, sentences::{GGA, NmeaMessage, RMC}};
///
/// let stream_decoder = StreamDecoder::<NmeaMessage>::builder()
///     .abort_after_unparsed_lines(10)
///     .max_line_length(1024)
///     .decoder(decoder::<GGA>())
///     .decoder(decoder::<RMC>())
///     .build();
///
/// assert_eq!(stream_decoder.decoder_count(), 2);
/// assert_eq!(stream_decoder.abort_after_unparsed_lines(), 10);
/// # }
/// ```
#[must_use]
pub struct StreamDecoderBuilder<M> {
    options: StreamOptions,
    decoders: Vec<Box<dyn SentenceDecoder<M>>>,
}

impl<M> StreamDecoderBuilder<M> {
    /// Creates a builder with [`StreamOptions::default`] and no decoders.
    pub fn new() -> Self {
        StreamDecoderBuilder {
            options: StreamOptions::default(),
            decoders: Vec::new(),
        }
    }

    /// Replaces every option at once.
    pub fn options(mut self, options: StreamOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the number of consecutive unparsed lines that end a run, `0` to
    /// disable.
    pub fn abort_after_unparsed_lines(mut self, lines: u32) -> Self {
        self.options.abort_after_unparsed_lines = lines;
        self
    }

    /// Sets the number of bytes requested from the transport per read.
    pub fn min_read_size(mut self, bytes: usize) -> Self {
        self.options.min_read_size = bytes;
        self
    }

    /// Sets how many chunks may be read ahead of the dispatch loop.
    pub fn max_pending_chunks(mut self, chunks: usize) -> Self {
        self.options.max_pending_chunks = chunks;
        self
    }

    /// Sets the longest partial line kept while waiting for its line feed.
    pub fn max_line_length(mut self, bytes: usize) -> Self {
        self.options.max_line_length = bytes;
        self
    }

    /// Appends one sentence decoder.
    pub fn decoder<D>(mut self, decoder: D) -> Self
    where
        D: SentenceDecoder<M> + 'static,
    {
        self.decoders.push(Box::new(decoder));
        self
    }

    /// Appends sentence decoders.
    pub fn decoders<I>(mut self, decoders: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SentenceDecoder<M>>>,
    {
        self.decoders.extend(decoders);
        self
    }

    pub fn build(self) -> StreamDecoder<M> {
        StreamDecoder {
            decoders: self.decoders,
            options: self.options,
            stats: DecoderStats::default(),
        }
    }
}

impl<M> Default for StreamDecoderBuilder<M> {
    fn default() -> Self {
        StreamDecoderBuilder::new()
    }
}

enum Step<M> {
    Message(M),
    Stop(ExitReason),
}

/// Receives the messages of a run.
trait Deliver<M> {
    /// Hands one message over. Resolves to `false` once nothing receives
    /// messages any more.
    fn deliver(&mut self, message: M) -> impl Future<Output = bool> + Send;
}

struct Callback<'a, F>(&'a mut F);

impl<M, F> Deliver<M> for Callback<'_, F>
where
    F: FnMut(M),
{
    fn deliver(&mut self, message: M) -> impl Future<Output = bool> + Send {
        (self.0)(message);
        future::ready(true)
    }
}

impl<M> Deliver<M> for mpsc::Sender<M>
where
    M: Send,
{
    fn deliver(&mut self, message: M) -> impl Future<Output = bool> + Send {
        async move { self.send(message).await.is_ok() }
    }
}

struct Filled {
    bytes_received: u64,
    transport_failed: bool,
}

/// Reads the transport into chunks until it ends, fails, the run is cancelled
/// or the dispatch loop hangs up.
async fn fill<R>(
    mut stream: R,
    tx: mpsc::Sender<Bytes>,
    min_read_size: usize,
    cancel: &CancellationToken,
) -> Filled
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::new();
    let mut filled = Filled {
        bytes_received: 0,
        transport_failed: false,
    };

    loop {
        buf.reserve(min_read_size);

        let read = tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tx.closed() => break,
            read = stream.read_buf(&mut buf) => read,
        };

        match read {
            Ok(0) => {
                trace!("transport reached end of stream");
                break;
            }
            Ok(read) => {
                trace!(bytes = read, "transport read");
                filled.bytes_received += read as u64;

                let sent = tokio::select! {
                    _ = cancel.cancelled() => break,
                    sent = tx.send(buf.split().freeze()) => sent,
                };
                if sent.is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!("transport read failed: {err}");
                filled.transport_failed = true;
                break;
            }
        }
    }

    filled
}

fn discard_trailing(lines: &LineBuffer) {
    let pending = lines.pending();
    if pending > 0 {
        debug!(bytes = pending, "discarding bytes after the last line feed");
    }
}

#[cfg(all(test, feature = "sentences"))]
mod tests {
    mod abort;
    mod blocking;
    mod framing;
    mod run;
    mod support;
}
