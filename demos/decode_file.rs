//! Decodes an NMEA 0183 capture file and logs every message.
//!
//! ```text
//! RUST_LOG=debug cargo run --example decode_file -- capture.nmea
//! ```

use std::{env, process::ExitCode};

use nmea0183_stream::{
    ExitReason, StreamDecoder,
    sentences::{NmeaMessage, gps_decoders},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: decode_file <capture file>");
        return ExitCode::FAILURE;
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(err) => {
            error!("cannot open {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut decoder = StreamDecoder::builder()
        .abort_after_unparsed_lines(10)
        .decoders(gps_decoders())
        .build();

    // stop cleanly on Ctrl-C
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let reason = decoder
        .parse_stream(file, log_message, cancel)
        .await;

    match reason {
        Ok(reason) => {
            let stats = decoder.stats();
            info!(
                %reason,
                lines = stats.line_count,
                bytes = stats.bytes_received,
                "finished decoding {path}"
            );

            if reason == ExitReason::TooManySequentialUnparsedLines {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("cannot decode {path}: {err}");
            ExitCode::FAILURE
        }
    }
}

fn log_message(message: NmeaMessage) {
    match message {
        NmeaMessage::GGA(gga) => info!(
            latitude = gga.latitude,
            longitude = gga.longitude,
            satellites = gga.number_of_satellites,
            quality = ?gga.quality,
            "position fix"
        ),
        NmeaMessage::RMC(rmc) => info!(
            date = %rmc.date,
            status = %rmc.status,
            speed = rmc.speed_over_ground,
            "navigation data"
        ),
        other => info!(identifier = other.identifier(), "{other:?}"),
    }
}
