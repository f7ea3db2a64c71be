use std::{
    collections::VecDeque,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::{AsyncRead, ReadBuf};

use crate::{
    StreamDecoder,
    sentences::{NmeaMessage, gps_decoders},
};

pub const GGA: &[u8] =
    b"$GPGGA,232608.000,5057.1975,N,11134.8332,W,2,8,1.06,781.7,M,-18.1,M,0000,0000*62\r\n";
pub const RMC: &[u8] = b"$GPRMC,174114.00,V,,,,,,,051218,,,N*74\r\n";
pub const GSV: &[u8] = b"$GPGSV,4,4,13,31,02,340,24*4A\r\n";
pub const VTG: &[u8] = b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n";

pub fn gps_stream_decoder() -> StreamDecoder<NmeaMessage> {
    let mut decoder = StreamDecoder::new();
    decoder.register(gps_decoders()).unwrap();
    decoder
}

pub fn identifiers(messages: &[NmeaMessage]) -> Vec<&'static str> {
    messages.iter().map(NmeaMessage::identifier).collect()
}

/// A transport that hands out predefined reads.
///
/// Each `Ok` entry is returned by one or more reads, never merged with the
/// next entry. Each `Err` entry fails one read. Once the entries run out the
/// reader reports the end of the stream, or never completes if it hangs.
pub struct ChunkedReader {
    reads: VecDeque<Result<Vec<u8>, io::ErrorKind>>,
    hang: bool,
}

impl ChunkedReader {
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        Self {
            reads: chunks
                .into_iter()
                .map(|chunk| chunk.as_ref().to_vec())
                .filter(|chunk| !chunk.is_empty())
                .map(Ok)
                .collect(),
            hang: false,
        }
    }

    pub fn failing_with(mut self, kind: io::ErrorKind) -> Self {
        self.reads.push_back(Err(kind));
        self
    }

    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    fn next_read(&mut self, buf: &mut [u8]) -> Option<io::Result<usize>> {
        let front = self.reads.front_mut()?;

        match front {
            Err(kind) => {
                let err = io::Error::from(*kind);
                self.reads.pop_front();
                Some(Err(err))
            }
            Ok(chunk) => {
                let read = chunk.len().min(buf.len());
                buf[..read].copy_from_slice(&chunk[..read]);
                chunk.drain(..read);
                if chunk.is_empty() {
                    self.reads.pop_front();
                }
                Some(Ok(read))
            }
        }
    }
}

impl AsyncRead for ChunkedReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let unfilled = buf.initialize_unfilled();

        match this.next_read(unfilled) {
            Some(Ok(read)) => {
                buf.advance(read);
                Poll::Ready(Ok(()))
            }
            Some(Err(err)) => Poll::Ready(Err(err)),
            None if this.hang => Poll::Pending,
            None => Poll::Ready(Ok(())),
        }
    }
}

impl io::Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.next_read(buf).unwrap_or(Ok(0))
    }
}
