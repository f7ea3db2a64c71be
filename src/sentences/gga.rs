use time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{self as nmea0183_stream, Lexer, Sentence, sentences::FixQuality};

/// GGA - Global Positioning System Fix Data
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gga_global_positioning_system_fix_data>
///
/// ```text
///                                                      11
///         1         2       3 4        5 6 7  8   9  10 |  12 13  14
///         |         |       | |        | | |  |   |   | |   | |   |
///  $GPGGA,hhmmss.ss,ddmm.mm,a,dddmm.mm,a,x,xx,x.x,x.x,M,x.x,M,x.x,xxxx*hh<CR><LF>
/// ```
///
/// Latitude and longitude are signed decimal degrees; fields 3 and 5 only carry
/// the sign.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Sentence)]
#[nmea(key = "$GPGGA")]
pub struct GGA {
    /// Fix time in UTC, as time since midnight
    pub fix_time: Duration,
    #[nmea(reader(Lexer::next_latitude))]
    /// Latitude in decimal degrees, negative in the southern hemisphere
    pub latitude: f64,
    #[nmea(reader(Lexer::next_longitude))]
    /// Longitude in decimal degrees, negative in the western hemisphere
    pub longitude: f64,
    /// GPS Quality Indicator
    pub quality: FixQuality,
    /// Number of satellites in use
    pub number_of_satellites: i32,
    /// Horizontal Dilution of Precision
    pub hdop: f64,
    /// Altitude above/below mean sea level (geoid)
    pub altitude: f64,
    /// Units of altitude, `M` for meters
    pub altitude_units: char,
    /// Geoidal separation, negative when the geoid is below the ellipsoid
    pub height_of_geoid: f64,
    /// Units of geoidal separation, `M` for meters
    pub height_of_geoid_units: char,
    /// Age of differential GPS data, in the `hhmmss` form some receivers use
    pub time_since_last_dgps_update: Duration,
    /// Differential reference station ID
    pub dgps_station_id: i32,
    #[nmea(checksum)]
    /// Transmitted checksum
    pub checksum: u8,
}
