//! Pull-style access to a decoding run.

use tokio::{io::AsyncRead, sync::mpsc, task::JoinHandle};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{Error, ExitReason, StreamDecoder};

type RunOutput<M> = (StreamDecoder<M>, Result<ExitReason, Error>);

const DEFAULT_CAPACITY: usize = 64;

/// A decoding run on a background task, read one message at a time.
///
/// The run starts when the reader is created. Decoded messages wait in a bounded
/// queue until read; once the queue is full the run pauses, and with it the
/// reads from the transport, until [`read_next`](NmeaReader::read_next) makes
/// room. Dropping the reader cancels the run.
///
/// ```rust
/// # #[cfg(feature = "sentences")]
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// use nmea0183_stream::{ExitReason, NmeaReader, StreamDecoder, sentences::gps_decoders};
///
/// let mut decoder = StreamDecoder::new();
/// decoder.register(gps_decoders()).unwrap();
///
/// let input: &'static [u8] = b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n";
/// let mut reader = NmeaReader::spawn(decoder, input);
///
/// let message = reader.read_next().await.unwrap();
/// assert_eq!(message.identifier(), "GPVTG");
/// assert!(reader.read_next().await.is_none());
///
/// let (decoder, reason) = reader.finish().await.unwrap();
/// assert_eq!(reason, ExitReason::StreamEnded);
/// assert_eq!(decoder.stats().line_count, 1);
/// # });
/// ```
pub struct NmeaReader<M> {
    messages: mpsc::Receiver<M>,
    cancel: CancellationToken,
    guard: DropGuard,
    task: JoinHandle<RunOutput<M>>,
}

impl<M> NmeaReader<M>
where
    M: Send + 'static,
{
    /// Spawns a run of `decoder` over `stream` on the current tokio runtime,
    /// queueing up to 64 messages ahead of the reads.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn spawn<R>(decoder: StreamDecoder<M>, stream: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self::spawn_with_capacity(decoder, stream, DEFAULT_CAPACITY)
    }

    /// Like [`spawn`](NmeaReader::spawn), queueing up to `capacity` messages.
    /// A `capacity` of zero is treated as one.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn spawn_with_capacity<R>(
        mut decoder: StreamDecoder<M>,
        stream: R,
        capacity: usize,
    ) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, messages) = mpsc::channel(capacity.max(1));
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let result = decoder.parse_stream_into(stream, tx, token).await;
            (decoder, result)
        });

        Self {
            messages,
            guard: cancel.clone().drop_guard(),
            cancel,
            task,
        }
    }

    /// Waits for the next decoded message.
    ///
    /// Returns `None` once the run has ended and every message was read.
    pub async fn read_next(&mut self) -> Option<M> {
        self.messages.recv().await
    }

    /// Requests the run to stop. Messages decoded before the request can still
    /// be read.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the run to end and returns the decoder with the reason the run
    /// ended. Messages not read yet are dropped, and the run keeps going until
    /// the stream ends; call [`cancel`](NmeaReader::cancel) first to stop it
    /// early.
    ///
    /// # Errors
    ///
    /// [`Error::NoDecoders`] if the decoder had no sentence decoders, and
    /// [`Error::Task`] if the run panicked or its runtime shut down.
    pub async fn finish(self) -> Result<(StreamDecoder<M>, ExitReason), Error> {
        let Self {
            mut messages,
            guard,
            task,
            ..
        } = self;

        while messages.recv().await.is_some() {}

        let (decoder, result) = task.await?;
        guard.disarm();
        Ok((decoder, result?))
    }
}

#[cfg(all(test, feature = "sentences"))]
mod tests {
    use std::io;

    use super::*;
    use crate::{
        DecoderStats,
        sentences::{NmeaMessage, gps_decoders},
    };

    const VTG: &[u8] = b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n";

    const INPUT: &[u8] = b"$GPGGA,232608.000,5057.1975,N,11134.8332,W,2,8,1.06,781.7,M,-18.1,M,0000,0000*62\r\n\
                           $GPGSV,4,4,13,31,02,340,24*4A\r\n\
                           $GPRMC,174114.00,V,,,,,,,051218,,,N*74\r\n";

    fn gps_decoder() -> StreamDecoder<NmeaMessage> {
        let mut decoder = StreamDecoder::new();
        decoder.register(gps_decoders()).unwrap();
        decoder
    }

    #[tokio::test]
    async fn test_read_all_messages() {
        let mut reader = NmeaReader::spawn(gps_decoder(), INPUT);

        let mut identifiers = Vec::new();
        while let Some(message) = reader.read_next().await {
            identifiers.push(message.identifier());
        }
        assert_eq!(identifiers, ["GPGGA", "GPGSV", "GPRMC"]);

        let (decoder, reason) = reader.finish().await.unwrap();
        assert_eq!(reason, ExitReason::StreamEnded);
        assert_eq!(decoder.stats().line_count, 3);
    }

    #[tokio::test]
    async fn test_full_queue_pauses_run() {
        const LINES: usize = 10_000;
        let input = io::Cursor::new(VTG.repeat(LINES));
        let mut reader = NmeaReader::spawn_with_capacity(gps_decoder(), input, 4);

        for _ in 0..100 {
            tokio::task::yield_now().await;
        }
        assert_eq!(reader.messages.len(), 4);

        let mut count = 0;
        while reader.read_next().await.is_some() {
            count += 1;
        }
        assert_eq!(count, LINES);

        let (decoder, reason) = reader.finish().await.unwrap();
        assert_eq!(reason, ExitReason::StreamEnded);
        assert_eq!(decoder.stats().line_count, LINES as u64);
    }

    #[tokio::test]
    async fn test_finish_discards_unread_messages() {
        let input = io::Cursor::new(VTG.repeat(100));
        let reader = NmeaReader::spawn_with_capacity(gps_decoder(), input, 1);

        let (decoder, reason) = reader.finish().await.unwrap();
        assert_eq!(reason, ExitReason::StreamEnded);
        assert_eq!(decoder.stats().line_count, 100);
    }

    #[tokio::test]
    async fn test_cancel() {
        let (client, _server) = tokio::io::duplex(64);
        let mut reader = NmeaReader::spawn(gps_decoder(), client);

        reader.cancel();
        assert!(reader.read_next().await.is_none());

        let (decoder, reason) = reader.finish().await.unwrap();
        assert_eq!(reason, ExitReason::CancellationRequested);
        assert_eq!(decoder.stats(), DecoderStats::default());
    }

    #[tokio::test]
    async fn test_drop_cancels_run() {
        let (client, _server) = tokio::io::duplex(64);
        let reader = NmeaReader::spawn(gps_decoder(), client);
        let token = reader.cancel.clone();

        drop(reader);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_finish_without_decoders() {
        let reader = NmeaReader::spawn(StreamDecoder::<NmeaMessage>::new(), INPUT);

        let result = reader.finish().await;
        assert!(matches!(result, Err(Error::NoDecoders)), "{result:?}");
    }
}
