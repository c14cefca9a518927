//! Register-image codec and structured calendar value for the DS1315.
//!
//! This module converts between the chip's 8-byte BCD register image
//! and the structured [`DateTime`] value, and formats the result for
//! display.
//!
//! # Register Model
//!
//! The DS1315 stores date and time in 8 registers, transferred in this
//! order: hundredths, seconds, minutes, hours, day, date, month, year.
//!
//! # Error Handling
//!
//! The register codec itself never fails: the chip cannot signal
//! errors, so corrupted BCD decodes to out-of-range binary values and
//! flows through to the caller as-is (best-effort decode). The
//! validated path is the chrono conversion pair
//! [`DateTime::from_naive`] / [`DateTime::into_naive`], which
//! range-checks every field and reports [`DS1315DateTimeError`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::bcd;
use crate::registers::{Day, Hours, Oscillator, TimeRepresentation};

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Returns the display name for a day-of-week index (1 = Monday,
/// 7 = Sunday). Out-of-range indices come back as `"???"` rather than
/// failing, consistent with the best-effort decode policy.
pub fn weekday_name(weekday: u8) -> &'static str {
    match weekday {
        1..=7 => WEEKDAY_NAMES[usize::from(weekday) - 1],
        _ => "???",
    }
}

/// Structured calendar value, decoded from or encoded into the chip's
/// register image.
///
/// All fields are plain binary (not BCD). No field is validated by the
/// register codec; see the module docs for the validated chrono path.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// Hundredths of a second (0-99); read-only, always written as 0
    pub hundredths: u8,
    /// Seconds (0-59)
    pub second: u8,
    /// Minutes (0-59)
    pub minute: u8,
    /// Hour of day (0-23; 12-hour register encodings are folded on
    /// decode)
    pub hour: u8,
    /// Day of week (1-7, 1 = Monday, 7 = Sunday)
    pub weekday: u8,
    /// Day of month (1-31)
    pub date: u8,
    /// Month (1-12)
    pub month: u8,
    /// Two-digit year (0-99); the display applies a 2000 offset
    pub year: u8,
}

impl core::fmt::Display for DateTime {
    /// Formats as `<Weekday> 20YY-MM-DD HH:MM:SS.hh` with zero-padded
    /// two-digit fields. The century prefix `20` is a display
    /// convention; the chip only stores the two-digit year.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} 20{:02}-{:02}-{:02} {:02}:{:02}:{:02}.{:02}",
            weekday_name(self.weekday),
            self.year,
            self.month,
            self.date,
            self.hour,
            self.minute,
            self.second,
            self.hundredths
        )
    }
}

/// Raw register image, one field per chip register.
///
/// Pure-BCD registers are held as raw bytes; the two flag-carrying
/// registers (hours, day) use their bitfield types.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct DS1315DateTime {
    hundredths: u8,
    seconds: u8,
    minutes: u8,
    hours: Hours,
    day: Day,
    date: u8,
    month: u8,
    year: u8,
}

impl DS1315DateTime {
    fn convert_hours(hour: u8, time_representation: TimeRepresentation) -> Hours {
        let mut value = Hours::default();
        value.set_time_representation(time_representation);
        match time_representation {
            TimeRepresentation::TwentyFourHour => {
                value.set_hours(hour % 10);
                value.set_ten_hours(u8::from((10..20).contains(&hour)));
                value.set_pm_or_twenty_hours(u8::from(hour >= 20));
            }
            TimeRepresentation::TwelveHour => {
                let (hour12, is_pm) = match hour {
                    0 => (12, false),
                    1..=11 => (hour, false),
                    12 => (12, true),
                    _ => (hour.wrapping_sub(12), true),
                };
                value.set_hours(hour12 % 10);
                value.set_ten_hours(hour12 / 10);
                value.set_pm_or_twenty_hours(u8::from(is_pm));
            }
        }
        value
    }

    /// Encodes a [`DateTime`] into the register image. Unvalidated:
    /// out-of-range fields are BCD-encoded bit for bit and land in the
    /// chip exactly as mangled as they arrived. Hundredths are always
    /// written as 0; the chip restarts its sub-second chain on write.
    pub(crate) fn from_datetime(
        datetime: &DateTime,
        time_representation: TimeRepresentation,
        oscillator: Oscillator,
    ) -> Self {
        let mut day = Day::default();
        day.set_day(datetime.weekday & 0x0F);
        day.set_oscillator(oscillator);
        let raw = DS1315DateTime {
            hundredths: 0,
            seconds: bcd::encode(datetime.second),
            minutes: bcd::encode(datetime.minute),
            hours: Self::convert_hours(datetime.hour, time_representation),
            day,
            date: bcd::encode(datetime.date),
            month: bcd::encode(datetime.month),
            year: bcd::encode(datetime.year),
        };
        debug!("raw={:?}", raw);
        raw
    }

    /// Decodes the register image into a [`DateTime`], folding 12-hour
    /// register encodings into a 0-23 hour. The oscillator flag in the
    /// day register is masked off and otherwise ignored; this driver
    /// never re-derives it from a read.
    pub(crate) fn into_datetime(self) -> DateTime {
        let hours = 10 * self.hours.ten_hours() + self.hours.hours();
        let hour = match self.hours.time_representation() {
            TimeRepresentation::TwentyFourHour => hours + 20 * self.hours.pm_or_twenty_hours(),
            TimeRepresentation::TwelveHour => {
                let is_pm = self.hours.pm_or_twenty_hours() != 0;
                match (hours, is_pm) {
                    (12, false) => 0,    // 12 AM = 0:xx
                    (12, true) => 12,    // 12 PM = 12:xx
                    (h, false) => h,     // 1-11 AM
                    (h, true) => h + 12, // 1-11 PM
                }
            }
        };
        DateTime {
            hundredths: bcd::decode(self.hundredths),
            second: bcd::decode(self.seconds),
            minute: bcd::decode(self.minutes),
            hour,
            weekday: self.day.day(),
            date: bcd::decode(self.date),
            month: bcd::decode(self.month),
            year: bcd::decode(self.year),
        }
    }
}

impl From<[u8; 8]> for DS1315DateTime {
    fn from(data: [u8; 8]) -> Self {
        DS1315DateTime {
            hundredths: data[0],
            seconds: data[1],
            minutes: data[2],
            hours: Hours(data[3]),
            day: Day(data[4]),
            date: data[5],
            month: data[6],
            year: data[7],
        }
    }
}

impl From<&DS1315DateTime> for [u8; 8] {
    fn from(dt: &DS1315DateTime) -> [u8; 8] {
        [
            dt.hundredths,
            dt.seconds,
            dt.minutes,
            dt.hours.0,
            dt.day.0,
            dt.date,
            dt.month,
            dt.year,
        ]
    }
}

/// Errors from the validated chrono conversion layer.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DS1315DateTimeError {
    /// The provided or decoded date/time is invalid (out of range or
    /// not representable)
    InvalidDateTime,
    /// The year is not before 2100 (the two-digit year only covers
    /// 2000-2099)
    YearNotBefore2100,
    /// The year is not after 1999
    YearNotAfter1999,
}

impl DateTime {
    /// Builds a validated `DateTime` from a chrono `NaiveDateTime`.
    ///
    /// The chip's two-digit year covers 2000-2099; anything outside
    /// that window is rejected. Sub-second precision below 10 ms is
    /// truncated.
    pub fn from_naive(datetime: &NaiveDateTime) -> Result<Self, DS1315DateTimeError> {
        let year = datetime.year();
        if year > 2099 {
            error!("Year {} is too late! must be before 2100", year);
            return Err(DS1315DateTimeError::YearNotBefore2100);
        }
        if year < 2000 {
            error!("Year {} is too early! must be after 1999", year);
            return Err(DS1315DateTimeError::YearNotAfter1999);
        }
        let hundredths = u8::try_from((datetime.nanosecond() / 10_000_000).min(99))
            .map_err(|_| DS1315DateTimeError::InvalidDateTime)?;
        let field = |v: u32| u8::try_from(v).map_err(|_| DS1315DateTimeError::InvalidDateTime);
        Ok(DateTime {
            hundredths,
            second: field(datetime.second())?,
            minute: field(datetime.minute())?,
            hour: field(datetime.hour())?,
            weekday: field(datetime.weekday().number_from_monday())?,
            date: field(datetime.day())?,
            month: field(datetime.month())?,
            year: u8::try_from(year - 2000).map_err(|_| DS1315DateTimeError::InvalidDateTime)?,
        })
    }

    /// Converts to a chrono `NaiveDateTime`, validating every field.
    ///
    /// This is where corrupted register images finally get rejected:
    /// any field the permissive decode let through out of range fails
    /// here with [`DS1315DateTimeError::InvalidDateTime`]. The weekday
    /// field is dropped (chrono derives it from the date).
    pub fn into_naive(self) -> Result<NaiveDateTime, DS1315DateTimeError> {
        if self.hundredths > 99 {
            return Err(DS1315DateTimeError::InvalidDateTime);
        }
        NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.date),
        )
        .and_then(|d| {
            d.and_hms_milli_opt(
                u32::from(self.hour),
                u32::from(self.minute),
                u32::from(self.second),
                u32::from(self.hundredths) * 10,
            )
        })
        .ok_or(DS1315DateTimeError::InvalidDateTime)
    }
}
