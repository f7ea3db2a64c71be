#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    self as nmea0183_stream, DecodeError, FromLexer, Lexer, Sentence, sentence::KEY_LEN,
};

/// GSV - Satellites in View
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gsv_satellites_in_view>
///
/// ```text
///         1 2 3 4 5 6 7     n
///         | | | | | | |     |
///  $GPGSV,x,x,x,x,x,x,x,...,x*hh<CR><LF>
/// ```
///
/// Each sentence carries up to four satellites, four fields each. The last
/// sentence of a group may carry fewer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct GSV {
    /// Total number of GSV sentences to be transmitted in this group
    pub total_messages: i32,
    /// Sentence number of this GSV message within current group
    pub message_number: i32,
    /// Total number of satellites in view
    pub satellites_in_view: i32,
    /// Satellites carried by this sentence, in transmission order
    pub satellites: heapless::Vec<SatelliteView, 4>,
    /// Transmitted checksum
    pub checksum: u8,
}

/// One satellite as reported by [`GSV`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromLexer)]
pub struct SatelliteView {
    /// Satellite PRN number
    pub prn: i32,
    /// Elevation in degrees, 90 maximum
    pub elevation: i32,
    /// Azimuth in degrees true, 000 to 359
    pub azimuth: i32,
    /// Signal to noise ratio in dB, 00-99, `0` when not tracking
    pub snr: i32,
}

impl Sentence for GSV {
    const KEY: &'static [u8; KEY_LEN] = b"$GPGSV";
    const IDENTIFIER: &'static str = "GPGSV";

    fn read_fields(lexer: &mut Lexer<'_>) -> Result<Self, DecodeError> {
        let total_messages = lexer.next_integer()?;
        let message_number = lexer.next_integer()?;
        let satellites_in_view = lexer.next_integer()?;

        let mut satellites = heapless::Vec::new();
        while !lexer.is_eol() && !satellites.is_full() {
            let view = SatelliteView::read(lexer)?;
            if satellites.push(view).is_err() {
                break;
            }
        }

        let checksum = lexer.next_checksum()?;

        Ok(Self {
            total_messages,
            message_number,
            satellites_in_view,
            satellites,
            checksum,
        })
    }

    fn checksum(&self) -> u8 {
        self.checksum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gsv_full_sentence() {
        let gsv =
            GSV::decode(b"$GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00*74")
                .unwrap();

        assert_eq!(gsv.total_messages, 3);
        assert_eq!(gsv.message_number, 1);
        assert_eq!(gsv.satellites_in_view, 11);
        assert_eq!(
            gsv.satellites.as_slice(),
            [
                SatelliteView { prn: 3, elevation: 3, azimuth: 111, snr: 0 },
                SatelliteView { prn: 4, elevation: 15, azimuth: 270, snr: 0 },
                SatelliteView { prn: 6, elevation: 1, azimuth: 10, snr: 0 },
                SatelliteView { prn: 13, elevation: 6, azimuth: 292, snr: 0 },
            ]
        );
        assert_eq!(gsv.checksum(), 0x74);
    }

    #[test]
    fn test_gsv_last_sentence_of_group() {
        let gsv = GSV::decode(b"$GPGSV,4,4,13,31,02,340,24*4A").unwrap();

        assert_eq!(gsv.total_messages, 4);
        assert_eq!(gsv.message_number, 4);
        assert_eq!(gsv.satellites_in_view, 13);
        assert_eq!(
            gsv.satellites.as_slice(),
            [SatelliteView { prn: 31, elevation: 2, azimuth: 340, snr: 24 }]
        );
        assert_eq!(gsv.checksum(), 0x4A);
    }

    #[test]
    fn test_gsv_without_satellites() {
        let cases: [&[u8]; 2] = [b"$GPGSV,1,1,00*79", b"$GPGSV,1,1,00"];

        for input in cases {
            let result = GSV::decode(input);
            assert!(
                result.as_ref().is_ok_and(|gsv| gsv.satellites.is_empty()),
                "Failed: {input:?}\n\t{result:?}"
            );
        }
    }

    #[test]
    fn test_gsv_partial_satellite() {
        let gsv = GSV::decode(b"$GPGSV,1,1,01,05,45,,*7C").unwrap();

        assert_eq!(
            gsv.satellites.as_slice(),
            [SatelliteView { prn: 5, elevation: 45, azimuth: 0, snr: 0 }]
        );
    }

    #[test]
    fn test_gsv_invalid() {
        let cases: [&[u8]; 2] = [b"$GPGSV,1,1,01,05,45,1x0,38*00", b"$GPGSV,one,1,00*00"];

        for input in cases {
            let result = GSV::decode(input);
            assert!(result.is_err(), "Failed: {input:?}\n\t{result:?}");
        }
    }
}
