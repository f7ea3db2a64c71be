//! # Field Grammars
//!
//! Pure conversion routines from a field's raw bytes to a typed value. The
//! [`Lexer`](crate::Lexer) isolates the run of bytes that makes up a field and hands
//! it to one of these functions; each function either consumes the whole run or
//! rejects it by returning `None`. None of them allocate.
//!
//! All grammars are built from [`nom`] combinators operating directly on `&[u8]`.

use nom::{
    IResult, Parser,
    bytes::complete::take_while_m_n,
    character::complete::{char, digit0, space1},
    combinator::{all_consuming, not, opt},
    error::Error,
    number::complete::{double, hex_u32},
    sequence::preceded,
};
use time::{Date, Duration, Month, PrimitiveDateTime, Time};

type FieldResult<'a, O> = IResult<&'a [u8], O>;

/// Parses a signed decimal number (`-12.5`, `.5`, `3.`).
///
/// # Examples
///
/// ```rust
/// use nmea0183_stream::parsing::decimal;
///
/// assert_eq!(decimal(b"-18.1"), Some(-18.1));
/// assert_eq!(decimal(b"1.0.6"), None);
/// assert_eq!(decimal(b"-"), None);
/// ```
pub fn decimal(run: &[u8]) -> Option<f64> {
    let result: FieldResult<'_, f64> = all_consuming(double).parse(run);
    finish(result)
}

/// Parses a signed 32-bit integer.
///
/// ```rust
/// use nmea0183_stream::parsing::integer;
///
/// assert_eq!(integer(b"0008"), Some(8));
/// assert_eq!(integer(b"-3"), Some(-3));
/// assert_eq!(integer(b"1.5"), None);
/// ```
pub fn integer(run: &[u8]) -> Option<i32> {
    let result: FieldResult<'_, i32> = all_consuming(nom::character::complete::i32).parse(run);
    finish(result)
}

/// Parses up to eight hexadecimal digits, most significant nibble first.
///
/// Both upper and lower case digits are accepted.
///
/// ```rust
/// use nmea0183_stream::parsing::hexadecimal;
///
/// assert_eq!(hexadecimal(b"4A"), Some(0x4A));
/// assert_eq!(hexadecimal(b"4a"), Some(0x4A));
/// assert_eq!(hexadecimal(b"4G"), None);
/// ```
pub fn hexadecimal(run: &[u8]) -> Option<u32> {
    let result: FieldResult<'_, u32> = all_consuming(hex_u32).parse(run);
    finish(result)
}

/// Parses a sexagesimal coordinate magnitude: `degree_digits` digits of whole
/// degrees followed by decimal minutes (`DDMM.mmmm` or `DDDMM.mmmm`).
///
/// The result is `degrees + minutes / 60`, always non-negative; the hemisphere
/// is applied by the caller.
///
/// ```rust
/// use nmea0183_stream::parsing::sexagesimal;
///
/// let latitude = sexagesimal(b"4916.45", 2).unwrap();
/// assert!((latitude - 49.274166).abs() < 1e-6);
/// assert_eq!(sexagesimal(b"49", 2), None);
/// ```
pub fn sexagesimal(run: &[u8], degree_digits: usize) -> Option<f64> {
    let result: FieldResult<'_, (u32, f64)> =
        all_consuming((fixed_digits(degree_digits), unsigned_decimal)).parse(run);
    let (degrees, minutes) = finish(result)?;

    (minutes < 60.0).then(|| f64::from(degrees) + minutes / 60.0)
}

/// Parses a `HHMMSS[.sss]` time of day into the time elapsed since midnight.
///
/// Fractional seconds are kept to nanosecond precision without going through a
/// floating point value.
///
/// ```rust
/// use nmea0183_stream::parsing::time_of_day;
/// use time::Duration;
///
/// assert_eq!(
///     time_of_day(b"063321.803"),
///     Some(Duration::new(6 * 3600 + 33 * 60 + 21, 803_000_000))
/// );
/// ```
pub fn time_of_day(run: &[u8]) -> Option<Duration> {
    let result: FieldResult<'_, (u32, u32, u32, Option<&[u8]>)> = all_consuming((
        fixed_digits(2),
        fixed_digits(2),
        nom::character::complete::u32,
        opt(preceded(char('.'), digit0)),
    ))
    .parse(run);
    let (hours, minutes, seconds, fraction) = finish(result)?;

    if minutes >= 60 {
        return None;
    }

    let whole = i64::from(hours) * 3600 + i64::from(minutes) * 60 + i64::from(seconds);
    let nanos = fraction.map_or(0, fraction_to_nanos);

    Some(Duration::new(whole, nanos))
}

/// Parses a `DDMMYY` or `DDMMYYYY` calendar date.
///
/// Two-digit years are expanded with [`expand_two_digit_year`] against
/// `reference_year`.
///
/// ```rust
/// use nmea0183_stream::parsing::calendar_date;
/// use time::{Date, Month};
///
/// assert_eq!(
///     calendar_date(b"051218", 2026),
///     Date::from_calendar_date(2018, Month::December, 5).ok()
/// );
/// assert_eq!(
///     calendar_date(b"29022024", 2026),
///     Date::from_calendar_date(2024, Month::February, 29).ok()
/// );
/// assert_eq!(calendar_date(b"310218", 2026), None);
/// ```
pub fn calendar_date(run: &[u8], reference_year: i32) -> Option<Date> {
    let (day, month, year) = match run.len() {
        6 => {
            let result: FieldResult<'_, (u32, u32, u32)> =
                all_consuming((fixed_digits(2), fixed_digits(2), fixed_digits(2))).parse(run);
            let (day, month, year) = finish(result)?;
            let year = i32::try_from(year).ok()?;

            (day, month, expand_two_digit_year(year, reference_year))
        }
        8 => {
            let result: FieldResult<'_, (u32, u32, u32)> =
                all_consuming((fixed_digits(2), fixed_digits(2), fixed_digits(4))).parse(run);
            let (day, month, year) = finish(result)?;

            (day, month, i32::try_from(year).ok()?)
        }
        _ => return None,
    };

    to_date(year, month, day)
}

/// Expands a two-digit year to the full year closest to `reference_year`.
///
/// The candidates are the given year in the reference year's century and in the
/// centuries on either side of it. When two candidates are equally far away the
/// earlier one wins.
///
/// ```rust
/// use nmea0183_stream::parsing::expand_two_digit_year;
///
/// assert_eq!(expand_two_digit_year(74, 2018), 1974);
/// assert_eq!(expand_two_digit_year(74, 2026), 2074);
/// assert_eq!(expand_two_digit_year(18, 2026), 2018);
/// assert_eq!(expand_two_digit_year(76, 2026), 1976);
/// ```
pub fn expand_two_digit_year(year: i32, reference_year: i32) -> i32 {
    // saturates at the ends of the i32 range
    let century = reference_year.saturating_sub(reference_year.rem_euclid(100));

    [century.saturating_sub(100), century, century.saturating_add(100)]
        .into_iter()
        .map(|base| base.saturating_add(year))
        .min_by_key(|&candidate| (candidate.abs_diff(reference_year), candidate))
        .unwrap_or(reference_year)
}

/// Parses a `YYYY/MM/DD HH:MM:SS` timestamp.
///
/// ```rust
/// use nmea0183_stream::parsing::date_time;
///
/// let timestamp = date_time(b"2004/10/29 18:49:55").unwrap();
/// assert_eq!(timestamp.year(), 2004);
/// assert_eq!(timestamp.second(), 55);
/// ```
pub fn date_time(text: &[u8]) -> Option<PrimitiveDateTime> {
    let result: FieldResult<'_, _> = all_consuming((
        fixed_digits(4),
        preceded(char('/'), fixed_digits(2)),
        preceded(char('/'), fixed_digits(2)),
        preceded(space1, fixed_digits(2)),
        preceded(char(':'), fixed_digits(2)),
        preceded(char(':'), fixed_digits(2)),
    ))
    .parse(text);
    let (year, month, day, hour, minute, second) = finish(result)?;

    let date = to_date(i32::try_from(year).ok()?, month, day)?;
    let time = Time::from_hms(
        u8::try_from(hour).ok()?,
        u8::try_from(minute).ok()?,
        u8::try_from(second).ok()?,
    )
    .ok()?;

    Some(PrimitiveDateTime::new(date, time))
}

fn finish<O>(result: FieldResult<'_, O>) -> Option<O> {
    result.ok().map(|(_, value)| value)
}

fn fixed_digits<'a>(count: usize) -> impl Parser<&'a [u8], Output = u32, Error = Error<&'a [u8]>> {
    take_while_m_n(count, count, |b: u8| b.is_ascii_digit()).map(|digits: &[u8]| {
        digits
            .iter()
            .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'))
    })
}

fn unsigned_decimal(i: &[u8]) -> FieldResult<'_, f64> {
    preceded(not(char('-')), double).parse(i)
}

fn fraction_to_nanos(fraction: &[u8]) -> i32 {
    let digits = fraction.len().min(9);
    let value = fraction[..digits]
        .iter()
        .fold(0i32, |acc, digit| acc * 10 + i32::from(digit - b'0'));

    value * 10i32.pow((9 - digits) as u32)
}

fn to_date(year: i32, month: u32, day: u32) -> Option<Date> {
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    Date::from_calendar_date(year, month, u8::try_from(day).ok()?).ok()
}
