#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{self as nmea0183_stream, Sentence, sentences::FixType};

/// GSA - GPS DOP and active satellites
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gsa_gps_dop_and_active_satellites>
///
/// ```text
///         1 2 3                        14 15  16  17
///         | | |                         |  |   |   |
///  $GPGSA,a,a,x,x,x,x,x,x,x,x,x,x,x,x,x,x.x,x.x,x.x*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Sentence)]
#[nmea(key = "$GPGSA")]
pub struct GSA {
    /// Selection mode, `M` for manual and `A` for automatic
    pub fix_mode: char,
    /// Fix type
    pub fix_type: FixType,
    /// PRNs of the satellites used in the fix, `0` for unused slots
    pub satellites: [i32; 12],
    /// Position Dilution of Precision
    pub pdop: f64,
    /// Horizontal Dilution of Precision
    pub hdop: f64,
    /// Vertical Dilution of Precision
    pub vdop: f64,
    #[nmea(checksum)]
    pub checksum: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gsa_decoding() {
        let gsa = GSA::decode(b"$GPGSA,A,3,,,,,,16,18,,22,24,,,3.6,2.1,2.2*3C").unwrap();

        assert_eq!(gsa.fix_mode, 'A');
        assert_eq!(gsa.fix_type, FixType::Fix3D);
        assert_eq!(gsa.satellites, [0, 0, 0, 0, 0, 16, 18, 0, 22, 24, 0, 0]);
        assert_eq!(gsa.pdop, 3.6);
        assert_eq!(gsa.hdop, 2.1);
        assert_eq!(gsa.vdop, 2.2);
        assert_eq!(gsa.checksum(), 0x3C);
    }

    #[test]
    fn test_gsa_fix_type() {
        let cases = [
            ("1", FixType::NoFix),
            ("2", FixType::Fix2D),
            ("3", FixType::Fix3D),
            ("", FixType::Unknown),
            ("7", FixType::Unknown),
        ];

        for (input, expected) in cases {
            let frame = format!("$GPGSA,A,{input},,,,,,,,,,,,,,,*00");
            let result = GSA::decode(frame.as_bytes()).map(|gsa| gsa.fix_type);
            assert_eq!(result, Ok(expected), "Failed: {input:?}");
        }
    }
}
