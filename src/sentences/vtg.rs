#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{self as nmea0183_stream, Sentence};

/// VTG - Track made good and Ground speed
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_vtg_track_made_good_and_ground_speed>
///
/// ```text
///          1  2  3  4  5  6  7  8 9
///          |  |  |  |  |  |  |  | |
///  $GPVTG,x.x,T,x.x,M,x.x,N,x.x,K,m*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Sentence)]
#[nmea(key = "$GPVTG")]
pub struct VTG {
    /// Course over ground in degrees true
    pub true_track: f64,
    /// Fixed `T`
    pub true_track_indicator: char,
    /// Course over ground in degrees magnetic
    pub magnetic_track: f64,
    /// Fixed `M`
    pub magnetic_track_indicator: char,
    /// Speed over ground in knots
    pub ground_speed_knots: f64,
    /// Fixed `N`
    pub knots_indicator: char,
    /// Speed over ground in kilometers per hour
    pub ground_speed_kmh: f64,
    /// Fixed `K`
    pub kmh_indicator: char,
    /// FAA mode indicator
    pub mode: char,
    #[nmea(checksum)]
    pub checksum: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vtg_decoding() {
        let vtg = VTG::decode(b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48").unwrap();

        assert_eq!(vtg.true_track, 54.7);
        assert_eq!(vtg.true_track_indicator, 'T');
        assert_eq!(vtg.magnetic_track, 34.4);
        assert_eq!(vtg.magnetic_track_indicator, 'M');
        assert_eq!(vtg.ground_speed_knots, 5.5);
        assert_eq!(vtg.knots_indicator, 'N');
        assert_eq!(vtg.ground_speed_kmh, 10.2);
        assert_eq!(vtg.kmh_indicator, 'K');
        assert_eq!(vtg.mode, '\0');
        assert_eq!(vtg.checksum(), 0x48);
    }

    #[test]
    fn test_vtg_without_magnetic_track() {
        let vtg = VTG::decode(b"$GPVTG,220.86,T,,M,2.550,N,4.724,K,A*34").unwrap();

        assert_eq!(vtg.true_track, 220.86);
        assert!(vtg.magnetic_track.is_nan());
        assert_eq!(vtg.magnetic_track_indicator, 'M');
        assert_eq!(vtg.ground_speed_kmh, 4.724);
        assert_eq!(vtg.mode, 'A');
        assert_eq!(vtg.checksum(), 0x34);
    }
}
