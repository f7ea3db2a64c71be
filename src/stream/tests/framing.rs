use tokio_util::sync::CancellationToken;

use super::support::{ChunkedReader, GGA, GSV, RMC, VTG, gps_stream_decoder, identifiers};
use crate::{ExitReason, sentences::NmeaMessage};

async fn decode_chunks<I, C>(chunks: I) -> (ExitReason, Vec<NmeaMessage>)
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut decoder = gps_stream_decoder();
    let mut messages = Vec::new();

    let reason = decoder
        .parse_stream(
            ChunkedReader::new(chunks),
            |message| messages.push(message),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    (reason, messages)
}

#[tokio::test]
async fn test_frames_split_across_reads() {
    let input = [GGA, RMC].concat();
    let (_, expected) = decode_chunks([&input]).await;
    assert_eq!(identifiers(&expected), ["GPGGA", "GPRMC"]);

    for split in 1..input.len() {
        let (reason, messages) = decode_chunks([&input[..split], &input[split..]]).await;

        assert_eq!(reason, ExitReason::StreamEnded, "Failed at {split}");
        assert_eq!(messages.len(), 2, "Failed at {split}");
        // NaN fields never compare equal, so compare the debug output
        assert_eq!(format!("{messages:?}"), format!("{expected:?}"), "Failed at {split}");
    }
}

#[tokio::test]
async fn test_byte_at_a_time() {
    let input = [GSV, VTG, GGA].concat();
    let (reason, messages) = decode_chunks(input.chunks(1)).await;

    assert_eq!(reason, ExitReason::StreamEnded);
    assert_eq!(identifiers(&messages), ["GPGSV", "GPVTG", "GPGGA"]);
}

#[tokio::test]
async fn test_line_endings() {
    let input = b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\n\
                  $GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48\r\n\
                  \r\n\
                  $GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48";

    let mut decoder = gps_stream_decoder();
    let mut messages = Vec::new();

    let reason = decoder
        .parse_stream(&input[..], |message| messages.push(message), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reason, ExitReason::StreamEnded);
    // the last frame has no line feed and is discarded
    assert_eq!(identifiers(&messages), ["GPVTG", "GPVTG"]);

    let stats = decoder.stats();
    assert_eq!(stats.line_count, 3);
    assert_eq!(stats.bytes_received, input.len() as u64);
    assert_eq!(stats.bytes_read, 41 + 42 + 1);
    assert_eq!(stats.unparsed_sequence_length, 1);
}

#[tokio::test]
async fn test_garbage_between_frames() {
    let input = [
        GGA,
        &b"\xff\xfe\x00binary noise\r\n"[..],
        &b"$GP\r\n"[..],
        &b"GPRMC,174114.00,V,,,,,,,051218,,,N*74\r\n"[..],
        RMC,
    ]
    .concat();

    let (reason, messages) = decode_chunks([input]).await;

    assert_eq!(reason, ExitReason::StreamEnded);
    assert_eq!(identifiers(&messages), ["GPGGA", "GPRMC"]);
}

#[tokio::test]
async fn test_decoded_fields_survive_framing() {
    let (_, messages) = decode_chunks([&GGA[..20], &GGA[20..]]).await;

    let [NmeaMessage::GGA(gga)] = &messages[..] else {
        panic!("expected one GGA, got {messages:?}");
    };
    assert_eq!(gga.number_of_satellites, 8);
    assert_eq!(gga.altitude, 781.7);
    assert_eq!(gga.checksum, 0x62);
}
