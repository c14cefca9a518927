//! Register layout and bitfield structures for the DS1315 phantom RTC.
//!
//! The chip holds its calendar state in an 8-byte register image,
//! transferred serially one byte at a time in a fixed order. Most
//! registers are plain packed BCD (see [`crate::bcd`]); the hours and
//! day registers additionally carry mode flags and get bitfield types
//! here.

use bitfield::bitfield;

/// Index of each register slot in the 8-byte register image.
///
/// The image is always transferred in this order, one chip-enable
/// framed byte at a time, least-significant bit first within each byte.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegIndex {
    /// Hundredths of a second (0-99)
    Hundredths = 0,
    /// Seconds register (0-59)
    Seconds = 1,
    /// Minutes register (0-59)
    Minutes = 2,
    /// Hours register (1-12 + AM/PM or 0-23)
    Hours = 3,
    /// Day-of-week register (1-7) plus the oscillator-disable flag
    Day = 4,
    /// Date register (1-31)
    Date = 5,
    /// Month register (1-12)
    Month = 6,
    /// Year register (0-99)
    Year = 7,
}

/// The 64-bit recognition pattern that unlocks register access.
///
/// Fixed by the chip vendor. Sent byte 0 first, least-significant bit
/// first within each byte, immediately after one discarded bit read.
/// Register reads or writes attempted without this preamble are not
/// honored by the chip.
pub const WAKE_PATTERN: [u8; 8] = [0xC5, 0x3A, 0xA3, 0x5C, 0xC5, 0x3A, 0xA3, 0x5C];

/// Time representation format for the DS1315.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeRepresentation {
    /// 24-hour format (0-23)
    TwentyFourHour = 0,
    /// 12-hour format (1-12 + AM/PM)
    TwelveHour = 1,
}
impl From<u8> for TimeRepresentation {
    /// Creates a `TimeRepresentation` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => TimeRepresentation::TwentyFourHour,
            1 => TimeRepresentation::TwelveHour,
            _ => panic!("Invalid value for TimeRepresentation: {}", v),
        }
    }
}
impl From<TimeRepresentation> for u8 {
    /// Converts a `TimeRepresentation` to its raw register value.
    fn from(v: TimeRepresentation) -> Self {
        v as u8
    }
}

/// Oscillator control for the DS1315.
///
/// The flag lives in bit 5 of the day register and is the only
/// non-calendar state the chip has. A stopped oscillator halts the
/// clock chain to preserve the backup battery during storage.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oscillator {
    /// Oscillator is running
    Enabled = 0,
    /// Oscillator is stopped
    Disabled = 1,
}
impl From<u8> for Oscillator {
    /// Creates an `Oscillator` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => Oscillator::Enabled,
            1 => Oscillator::Disabled,
            _ => panic!("Invalid value for Oscillator: {}", v),
        }
    }
}
impl From<Oscillator> for u8 {
    /// Converts an `Oscillator` to its raw register value.
    fn from(v: Oscillator) -> Self {
        v as u8
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Hours register with format selection and BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// Time representation format (12/24 hour)
    pub from into TimeRepresentation, time_representation, set_time_representation: 7, 7;
    /// PM flag (12-hour) or 20-hour bit (24-hour)
    pub pm_or_twenty_hours, set_pm_or_twenty_hours: 5, 5;
    /// Tens place of hours
    pub ten_hours, set_ten_hours: 4, 4;
    /// Ones place of hours
    pub hours, set_hours: 3, 0;
}
from_register_u8!(Hours);

#[cfg(feature = "defmt")]
impl defmt::Format for Hours {
    fn format(&self, f: defmt::Formatter) {
        let hours = 10 * self.ten_hours() + self.hours();
        match self.time_representation() {
            TimeRepresentation::TwentyFourHour => {
                let hours = hours + 20 * self.pm_or_twenty_hours();
                defmt::write!(f, "Hours({}h 24h)", hours);
            }
            TimeRepresentation::TwelveHour => {
                let is_pm = self.pm_or_twenty_hours() != 0;
                defmt::write!(f, "Hours({}h {})", hours, if is_pm { "PM" } else { "AM" });
            }
        }
    }
}

bitfield! {
    /// Day-of-week register (1-7) with oscillator control.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Day(u8);
    impl Debug;
    /// Oscillator control (0 = running)
    pub from into Oscillator, oscillator, set_oscillator: 5, 5;
    /// Day of week (1-7, where 7 = Sunday)
    pub day, set_day: 3, 0;
}
from_register_u8!(Day);

#[cfg(feature = "defmt")]
impl defmt::Format for Day {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Day({}", self.day());
        if self.oscillator() == Oscillator::Disabled {
            defmt::write!(f, ", oscillator stopped");
        }
        defmt::write!(f, ")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_pattern_literal() {
        assert_eq!(
            WAKE_PATTERN,
            [0xC5, 0x3A, 0xA3, 0x5C, 0xC5, 0x3A, 0xA3, 0x5C]
        );
    }

    #[test]
    fn test_reg_index_order() {
        assert_eq!(RegIndex::Hundredths as usize, 0);
        assert_eq!(RegIndex::Seconds as usize, 1);
        assert_eq!(RegIndex::Minutes as usize, 2);
        assert_eq!(RegIndex::Hours as usize, 3);
        assert_eq!(RegIndex::Day as usize, 4);
        assert_eq!(RegIndex::Date as usize, 5);
        assert_eq!(RegIndex::Month as usize, 6);
        assert_eq!(RegIndex::Year as usize, 7);
    }

    #[test]
    fn test_hours_register_conversions() {
        // 24-hour mode, 15:xx
        let hours = Hours::from(0x15);
        assert_eq!(
            hours.time_representation(),
            TimeRepresentation::TwentyFourHour
        );
        assert_eq!(hours.pm_or_twenty_hours(), 0);
        assert_eq!(hours.ten_hours(), 1);
        assert_eq!(hours.hours(), 5);
        assert_eq!(u8::from(hours), 0x15);

        // 24-hour mode, 23:xx (20-hour bit set)
        let hours = Hours::from(0x23);
        assert_eq!(
            hours.time_representation(),
            TimeRepresentation::TwentyFourHour
        );
        assert_eq!(hours.pm_or_twenty_hours(), 1);
        assert_eq!(hours.ten_hours(), 0);
        assert_eq!(hours.hours(), 3);
        assert_eq!(u8::from(hours), 0x23);

        // 12-hour mode, 12 PM
        let hours = Hours::from(0xB2);
        assert_eq!(hours.time_representation(), TimeRepresentation::TwelveHour);
        assert_eq!(hours.pm_or_twenty_hours(), 1);
        assert_eq!(hours.ten_hours(), 1);
        assert_eq!(hours.hours(), 2);
        assert_eq!(u8::from(hours), 0xB2);

        // 12-hour mode, 8 AM
        let hours = Hours::from(0x88);
        assert_eq!(hours.time_representation(), TimeRepresentation::TwelveHour);
        assert_eq!(hours.pm_or_twenty_hours(), 0);
        assert_eq!(hours.ten_hours(), 0);
        assert_eq!(hours.hours(), 8);
        assert_eq!(u8::from(hours), 0x88);
    }

    #[test]
    fn test_day_register_conversions() {
        // Sunday, oscillator running
        let day = Day::from(0x07);
        assert_eq!(day.day(), 7);
        assert_eq!(day.oscillator(), Oscillator::Enabled);
        assert_eq!(u8::from(day), 0x07);

        // Wednesday, oscillator stopped
        let day = Day::from(0x23);
        assert_eq!(day.day(), 3);
        assert_eq!(day.oscillator(), Oscillator::Disabled);
        assert_eq!(u8::from(day), 0x23);
    }

    #[test]
    fn test_day_register_masks_high_bits() {
        // The day getter only looks at the low nibble; whatever else is
        // in the byte survives the u8 roundtrip untouched.
        let day = Day::from(0xC5);
        assert_eq!(day.day(), 5);
        assert_eq!(u8::from(day), 0xC5);
    }

    #[test]
    fn test_register_roundtrip_conversions() {
        let test_values = [0x00, 0x15, 0x23, 0x55, 0xAA, 0xB2, 0xC5, 0xFF];
        for &value in &test_values {
            assert_eq!(u8::from(Hours::from(value)), value);
            assert_eq!(u8::from(Day::from(value)), value);
        }
    }

    #[test]
    fn test_register_bitfield_operations() {
        let mut hours = Hours::default();
        hours.set_time_representation(TimeRepresentation::TwelveHour);
        hours.set_pm_or_twenty_hours(1);
        hours.set_ten_hours(1);
        hours.set_hours(2);
        assert_eq!(hours.time_representation(), TimeRepresentation::TwelveHour);
        assert_eq!(hours.pm_or_twenty_hours(), 1);
        assert_eq!(hours.ten_hours(), 1);
        assert_eq!(hours.hours(), 2);
        assert_eq!(u8::from(hours), 0xB2);

        let mut day = Day::default();
        day.set_day(6);
        day.set_oscillator(Oscillator::Disabled);
        assert_eq!(day.day(), 6);
        assert_eq!(day.oscillator(), Oscillator::Disabled);
        assert_eq!(u8::from(day), 0x26);
    }

    #[test]
    #[should_panic(expected = "Invalid value for TimeRepresentation: 2")]
    fn test_invalid_time_representation_conversion() {
        let _ = TimeRepresentation::from(2);
    }

    #[test]
    #[should_panic(expected = "Invalid value for Oscillator: 2")]
    fn test_invalid_oscillator_conversion() {
        let _ = Oscillator::from(2);
    }
}
