//! # Built-in Sentences
//!
//! Strongly-typed records for the sentences most GPS receivers and the
//! gas-finder instrument emit, plus [`NmeaMessage`], the sum type a
//! [`StreamDecoder`](crate::StreamDecoder) produces when fed [`gps_decoders`].
//!
//! Absent fields decode to the lexer's absent values: `NaN` for measurements,
//! `0` for counts, `'\0'` for indicators, an empty string for text and the
//! minimum date for dates.
//!
//! | Variant | Sentence | Description |
//! |---------|----------|-------------|
//! | GGA([`GGA`]) | Global Positioning System Fix Data | Position and fix quality |
//! | GLL([`GLL`]) | Geographic Position - Latitude/Longitude | Position with time |
//! | GSA([`GSA`]) | GPS DOP and active satellites | Satellites used in the fix |
//! | GSV([`GSV`]) | Satellites in View | Per-satellite details |
//! | RMC([`RMC`]) | Recommended Minimum Navigation Information | Essential navigation data |
//! | VTG([`VTG`]) | Track made good and Ground speed | Velocity |
//! | GFDTA([`GFDTA`]) | Gas-finder data | Gas concentration reading |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{self as nmea0183_stream, FromLexer, Lexer, Sentence, SentenceDecoder, decoder};

mod gfdta;
mod gga;
mod gll;
mod gsa;
mod gsv;
mod rmc;
mod vtg;

pub use gfdta::GFDTA;
pub use gga::GGA;
pub use gll::GLL;
pub use gsa::GSA;
pub use gsv::{GSV, SatelliteView};
pub use rmc::RMC;
pub use vtg::VTG;

/// A message decoded by one of the built-in sentence decoders.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum NmeaMessage {
    /// Global Positioning System Fix Data
    GGA(GGA),
    /// Geographic Position - Latitude/Longitude
    GLL(GLL),
    /// GPS DOP and active satellites
    GSA(GSA),
    /// Satellites in View
    GSV(GSV),
    /// Recommended Minimum Navigation Information
    RMC(RMC),
    /// Track made good and Ground speed
    VTG(VTG),
    /// Gas-finder data
    GFDTA(GFDTA),
}

macro_rules! nmea_message {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for NmeaMessage {
                fn from(sentence: $variant) -> Self {
                    Self::$variant(sentence)
                }
            }
        )*

        impl NmeaMessage {
            /// The sentence identifier of the decoded sentence, e.g. `GPGGA`.
            pub fn identifier(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$variant as Sentence>::IDENTIFIER,)*
                }
            }

            /// The checksum transmitted with the sentence.
            pub fn checksum(&self) -> u8 {
                match self {
                    $(Self::$variant(sentence) => sentence.checksum(),)*
                }
            }
        }
    };
}

nmea_message!(GGA, GLL, GSA, GSV, RMC, VTG, GFDTA);

/// Returns a decoder for every built-in sentence, producing [`NmeaMessage`]s.
///
/// ```rust
/// use nmea0183_stream::{StreamDecoder, sentences::gps_decoders};
///
/// let mut decoder = StreamDecoder::new();
/// decoder.register(gps_decoders()).unwrap();
/// ```
pub fn gps_decoders() -> Vec<Box<dyn SentenceDecoder<NmeaMessage>>> {
    vec![
        Box::new(decoder::<GGA>()),
        Box::new(decoder::<GSA>()),
        Box::new(decoder::<GSV>()),
        Box::new(decoder::<RMC>()),
        Box::new(decoder::<GLL>()),
        Box::new(decoder::<VTG>()),
        Box::new(decoder::<GFDTA>()),
    ]
}

/// Quality of the GPS fix
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromLexer)]
#[nmea(selector(Lexer::next_integer))]
pub enum FixQuality {
    /// 0 - Fix not available
    #[default]
    #[nmea(selector(0))]
    Invalid,
    /// 1 - GPS fix
    #[nmea(selector(1))]
    GpsFix,
    /// 2 - Differential GPS fix
    #[nmea(selector(2))]
    DgpsFix,
    /// 3 - PPS fix
    #[nmea(selector(3))]
    PpsFix,
    /// 4 - Real Time Kinematic
    #[nmea(selector(4))]
    Rtk,
    /// 5 - Float RTK
    #[nmea(selector(5))]
    FloatRtk,
    /// 6 - Estimated (dead reckoning)
    #[nmea(selector(6))]
    Estimated,
    /// 7 - Manual input mode
    #[nmea(selector(7))]
    ManualInput,
    /// 8 - Simulation mode
    #[nmea(selector(8))]
    Simulation,
    /// Any other value
    #[nmea(selector(_))]
    Unknown,
}

/// Fix type reported by GSA
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromLexer)]
#[nmea(selector(Lexer::next_integer))]
pub enum FixType {
    /// 1 - No fix
    #[nmea(selector(1))]
    NoFix,
    /// 2 - 2D fix
    #[nmea(selector(2))]
    Fix2D,
    /// 3 - 3D fix
    #[nmea(selector(3))]
    Fix3D,
    /// Field absent or any other value
    #[default]
    #[nmea(selector(_))]
    Unknown,
}
