use time::{Date, Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{self as nmea0183_stream, Lexer, Sentence};

/// RMC - Recommended Minimum Navigation Information
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_rmc_recommended_minimum_navigation_information>
///
/// ```text
///                                                            12
///         1         2 3       4 5        6 7   8   9    10 11|
///         |         | |       | |        | |   |   |    |  | |
///  $GPRMC,hhmmss.ss,A,ddmm.mm,a,dddmm.mm,a,x.x,x.x,xxxx,x.x,a,m*hh<CR><LF>
/// ```
///
/// Field 12 (FAA mode) is only present from NMEA 2.3 on.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Sentence)]
#[nmea(key = "$GPRMC")]
pub struct RMC {
    /// Fix time in UTC, as time since midnight
    pub fix_time: Duration,
    /// Status, `A` for valid data and `V` for a navigation receiver warning
    pub status: char,
    #[nmea(reader(Lexer::next_latitude))]
    /// Latitude in decimal degrees
    pub latitude: f64,
    #[nmea(reader(Lexer::next_longitude))]
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Speed over ground in knots
    pub speed_over_ground: f64,
    /// Track made good in degrees true
    pub track_angle: f64,
    /// Date of the fix, `Date::MIN` when absent
    pub date: Date,
    /// Magnetic variation in degrees
    pub magnetic_variation: f64,
    /// Direction of the magnetic variation, `E` or `W`
    pub magnetic_variation_direction: char,
    /// FAA mode indicator
    pub mode: char,
    #[nmea(checksum)]
    pub checksum: u8,
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::*;

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).unwrap()
    }

    fn hms(hours: i64, minutes: i64, millis: i64) -> Duration {
        Duration::hours(hours) + Duration::minutes(minutes) + Duration::milliseconds(millis)
    }

    #[test]
    fn test_rmc_without_mode() {
        let rmc =
            RMC::decode(b"$GPRMC,063321.803,A,5234.906,N,01318.184,E,4948.6,043.5,171118,,W*47")
                .unwrap();

        assert_eq!(rmc.fix_time, hms(6, 33, 21_803));
        assert_eq!(rmc.status, 'A');
        assert!((rmc.latitude - 52.581766667).abs() < 1e-7, "{}", rmc.latitude);
        assert!((rmc.longitude - 13.303066667).abs() < 1e-7, "{}", rmc.longitude);
        assert_eq!(rmc.speed_over_ground, 4948.6);
        assert_eq!(rmc.track_angle, 43.5);
        assert_eq!(rmc.date, date(2018, Month::November, 17));
        assert!(rmc.magnetic_variation.is_nan());
        assert_eq!(rmc.magnetic_variation_direction, 'W');
        assert_eq!(rmc.mode, '\0');
        assert_eq!(rmc.checksum(), 0x47);
    }

    #[test]
    fn test_rmc_with_mode() {
        let rmc = RMC::decode(
            b"$GPRMC,182630.00,A,4955.65790,N,11926.34845,W,0.045,,051218,,,D*64",
        )
        .unwrap();

        assert_eq!(rmc.fix_time, hms(18, 26, 30_000));
        assert!((rmc.latitude - 49.927631667).abs() < 1e-7, "{}", rmc.latitude);
        assert!((rmc.longitude + 119.439140833).abs() < 1e-7, "{}", rmc.longitude);
        assert_eq!(rmc.speed_over_ground, 0.045);
        assert!(rmc.track_angle.is_nan());
        assert_eq!(rmc.date, date(2018, Month::December, 5));
        assert!(rmc.magnetic_variation.is_nan());
        assert_eq!(rmc.magnetic_variation_direction, '\0');
        assert_eq!(rmc.mode, 'D');
        assert_eq!(rmc.checksum(), 0x64);
    }

    #[test]
    fn test_rmc_with_magnetic_variation() {
        let rmc = RMC::decode(
            b"$GPRMC,144326.00,A,5107.0017737,N,11402.3291611,W,0.080,323.3,210307,0.0,E,A*20",
        )
        .unwrap();

        assert_eq!(rmc.fix_time, hms(14, 43, 26_000));
        assert!((rmc.latitude - 51.116696228).abs() < 1e-7, "{}", rmc.latitude);
        assert!((rmc.longitude + 114.038819352).abs() < 1e-7, "{}", rmc.longitude);
        assert_eq!(rmc.track_angle, 323.3);
        assert_eq!(rmc.date, date(2007, Month::March, 21));
        assert_eq!(rmc.magnetic_variation, 0.0);
        assert_eq!(rmc.magnetic_variation_direction, 'E');
        assert_eq!(rmc.mode, 'A');
        assert_eq!(rmc.checksum(), 0x20);
    }

    #[test]
    fn test_rmc_without_fix() {
        let rmc = RMC::decode(b"$GPRMC,174114.00,V,,,,,,,051218,,,N*74\r\n").unwrap();

        assert_eq!(rmc.fix_time, hms(17, 41, 14_000));
        assert_eq!(rmc.status, 'V');
        assert!(rmc.latitude.is_nan());
        assert!(rmc.longitude.is_nan());
        assert!(rmc.speed_over_ground.is_nan());
        assert!(rmc.track_angle.is_nan());
        assert!(rmc.magnetic_variation.is_nan());
        assert_eq!(rmc.magnetic_variation_direction, '\0');
        assert_eq!(rmc.date, date(2018, Month::December, 5));
        assert_eq!(rmc.mode, 'N');
        assert_eq!(rmc.checksum(), 0x74);
    }

    #[test]
    fn test_rmc_invalid_date() {
        let result = RMC::decode(b"$GPRMC,182630.00,A,4955.65790,N,11926.34845,W,0.045,,321318,,,D*64");
        assert!(result.is_err(), "Failed: {result:?}");
    }
}
