use time::PrimitiveDateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{self as nmea0183_stream, Sentence};

/// GFDTA - Gas-finder data
///
/// Proprietary sentence of open-path laser gas detectors.
///
/// ```text
///         1   2  3   4     5                   6      7
///         |   |  |   |     |                   |      |
///  $GFDTA,x.x,xx,x.x,xxxx,YYYY/MM/DD hh:mm:ss,c--c,c--c*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Sentence)]
#[nmea(key = "$GFDTA")]
pub struct GFDTA {
    /// Gas concentration in ppm-m
    pub concentration: f64,
    /// Quality of the fit, in percent
    pub r2: i32,
    /// Distance to the retro-reflector, in meters
    pub distance: f64,
    /// Received light level
    pub light: i32,
    /// Instrument time of the reading
    pub date_time: PrimitiveDateTime,
    /// Instrument serial number
    pub serial_number: String,
    /// Instrument status code
    pub status: String,
    #[nmea(checksum)]
    pub checksum: u8,
}
