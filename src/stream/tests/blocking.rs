use std::io::{self, Cursor};

use tokio_util::sync::CancellationToken;

use super::support::{ChunkedReader, GGA, GSV, RMC, VTG, gps_stream_decoder, identifiers};
use crate::{Error, ExitReason, StreamDecoder, sentences::NmeaMessage};

#[test]
fn test_parse_reader() {
    let input = [GGA, RMC, GSV, VTG].concat();
    let mut decoder = gps_stream_decoder();
    let mut messages = Vec::new();

    let reason = decoder
        .parse_reader(Cursor::new(&input), |message| messages.push(message), &CancellationToken::new())
        .unwrap();

    assert_eq!(reason, ExitReason::StreamEnded);
    assert_eq!(identifiers(&messages), ["GPGGA", "GPRMC", "GPGSV", "GPVTG"]);
    assert_eq!(decoder.stats().bytes_received, input.len() as u64);
}

#[test]
fn test_parse_reader_small_reads() {
    let input = [GGA, RMC].concat();
    let mut decoder = StreamDecoder::builder()
        .min_read_size(7)
        .decoders(crate::sentences::gps_decoders())
        .build();
    let mut messages = Vec::new();

    let reason = decoder
        .parse_reader(input.as_slice(), |message| messages.push(message), &CancellationToken::new())
        .unwrap();

    assert_eq!(reason, ExitReason::StreamEnded);
    assert_eq!(identifiers(&messages), ["GPGGA", "GPRMC"]);
}

#[test]
fn test_parse_reader_failures() {
    let cases = [
        (io::ErrorKind::Interrupted, ExitReason::StreamEnded),
        (io::ErrorKind::ConnectionReset, ExitReason::TransportFailed),
    ];

    for (kind, expected) in cases {
        let mut decoder = gps_stream_decoder();
        let mut messages = Vec::new();
        let reader = ChunkedReader::new([GGA]).failing_with(kind);

        let reason = decoder
            .parse_reader(reader, |message| messages.push(message), &CancellationToken::new())
            .unwrap();

        assert_eq!(reason, expected, "Failed: {kind:?}");
        assert_eq!(identifiers(&messages), ["GPGGA"], "Failed: {kind:?}");
    }
}

#[test]
fn test_parse_reader_cancellation() {
    let input = [GGA, RMC, GSV].concat();
    let mut decoder = gps_stream_decoder();
    let mut messages = Vec::new();
    let cancel = CancellationToken::new();

    let reason = decoder
        .parse_reader(
            input.as_slice(),
            |message| {
                messages.push(message);
                cancel.cancel();
            },
            &cancel,
        )
        .unwrap();

    assert_eq!(reason, ExitReason::CancellationRequested);
    assert_eq!(identifiers(&messages), ["GPGGA"]);
}

#[test]
fn test_parse_reader_without_decoders() {
    let mut decoder = StreamDecoder::<NmeaMessage>::new();
    let result = decoder.parse_reader(GGA, |_| {}, &CancellationToken::new());

    assert!(matches!(result, Err(Error::NoDecoders)), "{result:?}");
}
