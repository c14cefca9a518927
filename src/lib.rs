#![no_std]
//! Platform-agnostic driver for the DS1315 phantom real-time clock.
//!
//! The DS1315 has no bus interface of its own: the host bit-bangs a
//! four-wire software protocol over one bidirectional data line and
//! three active-low control lines (chip-enable, output-enable,
//! write-enable). Every register access burst must be preceded by a
//! 64-bit recognition pattern; the clock state itself is an 8-byte
//! packed-BCD register image.
//!
//! The driver is built on `embedded-hal` 1.0 digital and delay traits
//! and is `no_std`. The data line is abstracted by the [`InOutPin`]
//! trait, since its direction switches at runtime.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds1315::DS1315;
//!
//! let mut rtc = DS1315::new(ce, oe, we, io, delay);
//!
//! // Read the current date/time (wake sequence included).
//! let now = rtc.datetime()?;
//! info!("{}", now); // e.g. "Sunday 2020-02-19 15:31:27.00"
//! ```

#[macro_use]
mod macros;

pub mod bcd;
mod datetime;
mod interface;
mod registers;

pub use datetime::{weekday_name, DS1315DateTimeError, DateTime};
pub use interface::InOutPin;
pub use registers::{Oscillator, RegIndex, TimeRepresentation, WAKE_PATTERN};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::datetime::DS1315DateTime;
use crate::interface::Interface;

/// Default minimum separation between consecutive control-line edges,
/// in nanoseconds. Comfortably above the chip's minimum pulse widths
/// at 5 V supply.
pub const DEFAULT_EDGE_DELAY_NS: u32 = 100;

/// Host-side driver configuration.
pub struct Config {
    /// Hour register encoding used on writes (reads accept either)
    pub time_representation: TimeRepresentation,
    /// Oscillator state written into the day register on writes
    pub oscillator_enable: Oscillator,
    /// Minimum separation between consecutive control-line edges, in
    /// nanoseconds
    pub edge_delay_ns: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_representation: TimeRepresentation::TwentyFourHour,
            oscillator_enable: Oscillator::Enabled,
            edge_delay_ns: DEFAULT_EDGE_DELAY_NS,
        }
    }
}

/// Errors returned by the driver.
///
/// The chip itself never acknowledges anything, so the only failure
/// the transport can observe is a pin error from the HAL. Data content
/// never fails an operation; see [`DateTime`] for the best-effort
/// decode policy.
#[derive(Debug)]
pub enum DS1315Error<E> {
    /// A control or data pin returned an error
    Pin(E),
}

impl<E> From<E> for DS1315Error<E> {
    fn from(e: E) -> Self {
        DS1315Error::Pin(e)
    }
}

/// DS1315 phantom RTC driver.
///
/// Owns the three control pins, the data pin and the delay provider
/// for as long as it lives; [`DS1315::release`] gives them back.
pub struct DS1315<CE, OE, WE, IO, D> {
    iface: Interface<CE, OE, WE, IO, D>,
    time_representation: TimeRepresentation,
    oscillator_enable: Oscillator,
}

impl<CE, OE, WE, IO, D, E> DS1315<CE, OE, WE, IO, D>
where
    CE: OutputPin<Error = E>,
    OE: OutputPin<Error = E>,
    WE: OutputPin<Error = E>,
    IO: InOutPin<Error = E>,
    D: DelayNs,
{
    /// Creates a new driver instance with the default configuration.
    ///
    /// All three control pins must already be configured as outputs
    /// and idle high (deasserted).
    pub fn new(ce: CE, oe: OE, we: WE, io: IO, delay: D) -> Self {
        Self {
            iface: Interface::new(ce, oe, we, io, delay, DEFAULT_EDGE_DELAY_NS),
            time_representation: TimeRepresentation::TwentyFourHour,
            oscillator_enable: Oscillator::Enabled,
        }
    }

    /// Applies a configuration.
    ///
    /// Host-side state only: the DS1315 has no control register, so
    /// nothing reaches the chip until the next [`DS1315::set_datetime`].
    pub fn configure(&mut self, config: &Config) {
        self.time_representation = config.time_representation;
        self.oscillator_enable = config.oscillator_enable;
        self.iface.edge_delay_ns = config.edge_delay_ns;
    }

    /// Reads the raw 8-byte register image, wake sequence included.
    ///
    /// Bytes arrive in [`RegIndex`] order, unexamined. Together with
    /// [`bcd::digit_pair`] this is the diagnostic path for inspecting
    /// a chip that returns garbled data.
    pub fn read_registers(&mut self) -> Result<[u8; 8], DS1315Error<E>> {
        self.iface.wake()?;
        let mut data = [0u8; 8];
        for slot in data.iter_mut() {
            *slot = self.iface.recv_byte()?;
        }
        debug!("register image: {:?}", data);
        Ok(data)
    }

    fn read_raw_datetime(&mut self) -> Result<DS1315DateTime, DS1315Error<E>> {
        Ok(self.read_registers()?.into())
    }

    fn write_raw_datetime(&mut self, datetime: &DS1315DateTime) -> Result<(), DS1315Error<E>> {
        let data: [u8; 8] = datetime.into();
        self.iface.wake()?;
        for byte in data {
            self.iface.send_byte(byte)?;
        }
        Ok(())
    }

    /// Runs one full read cycle: wake sequence, 8 register bytes,
    /// decode.
    ///
    /// Decoding is best-effort: a wiring or timing fault shows up as
    /// out-of-range field values in the returned [`DateTime`], never
    /// as an `Err`.
    pub fn datetime(&mut self) -> Result<DateTime, DS1315Error<E>> {
        let raw = self.read_raw_datetime()?;
        Ok(raw.into_datetime())
    }

    /// Runs one full write cycle: encode, wake sequence, 8 register
    /// bytes.
    ///
    /// Fields are not validated; the hundredths register is always
    /// written as 0. The hour register is encoded per the configured
    /// [`TimeRepresentation`], and the oscillator flag per the
    /// configured [`Oscillator`].
    pub fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), DS1315Error<E>> {
        let raw = DS1315DateTime::from_datetime(
            datetime,
            self.time_representation,
            self.oscillator_enable,
        );
        self.write_raw_datetime(&raw)
    }

    /// Releases the pins and the delay provider.
    pub fn release(self) -> (CE, OE, WE, IO, D) {
        self.iface.release()
    }
}
