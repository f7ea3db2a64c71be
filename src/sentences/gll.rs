use time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{self as nmea0183_stream, Lexer, Sentence};

/// GLL - Geographic Position - Latitude/Longitude
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gll_geographic_position_latitudelongitude>
///
/// ```text
///         1       2 3        4 5         6 7
///         |       | |        | |         | |
///  $GPGLL,ddmm.mm,a,dddmm.mm,a,hhmmss.ss,a,m*hh<CR><LF>
/// ```
///
/// Field 7 (FAA mode) is only present from NMEA 2.3 on.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Sentence)]
#[nmea(key = "$GPGLL")]
pub struct GLL {
    #[nmea(reader(Lexer::next_latitude))]
    /// Latitude in decimal degrees
    pub latitude: f64,
    #[nmea(reader(Lexer::next_longitude))]
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Fix time in UTC, as time since midnight
    pub fix_time: Duration,
    /// Status, `A` for valid data and `V` for invalid
    pub data_active: char,
    /// FAA mode indicator
    pub mode: char,
    #[nmea(checksum)]
    pub checksum: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gll_decoding() {
        let gll = GLL::decode(b"$GPGLL,4916.45,N,12311.12,W,225444,A,*1D").unwrap();

        assert!((gll.latitude - 49.274166667).abs() < 1e-7, "{}", gll.latitude);
        assert!((gll.longitude + 123.185333333).abs() < 1e-7, "{}", gll.longitude);
        assert_eq!(gll.fix_time, Duration::hours(22) + Duration::minutes(54) + Duration::seconds(44));
        assert_eq!(gll.data_active, 'A');
        assert_eq!(gll.mode, '\0');
        assert_eq!(gll.checksum(), 0x1D);
    }

    #[test]
    fn test_gll_with_mode() {
        let gll = GLL::decode(b"$GPGLL,3751.65,S,14507.36,E,225444.50,A,D*74").unwrap();

        assert!(gll.latitude < 0.0);
        assert!(gll.longitude > 0.0);
        assert_eq!(gll.fix_time, Duration::hours(22) + Duration::minutes(54) + Duration::milliseconds(44_500));
        assert_eq!(gll.mode, 'D');
    }
}
