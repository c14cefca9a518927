//! Bit-level transport for the DS1315's software serial interface.
//!
//! The chip shares one bidirectional data line with three active-low
//! control lines. Chip-enable frames every byte transfer, a
//! write-enable pulse commits each bit driven onto the data line, and
//! an output-enable pulse makes the chip drive the data line for each
//! bit read. The chip gives no acknowledgment at any point; the only
//! errors this layer can observe are pin errors from the HAL.
//!
//! Every pair of consecutive line transitions is separated by a
//! configurable delay so the chip's minimum edge separation is honored
//! explicitly instead of depending on host instruction latency.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::registers::WAKE_PATTERN;

/// A bidirectional data pin whose direction can be switched at runtime.
///
/// The transport switches the line to output before driving bits into
/// the chip and back to input before sampling bits the chip drives.
pub trait InOutPin {
    /// Pin error type.
    type Error;

    /// Reconfigures the pin as an input.
    fn set_input(&mut self) -> Result<(), Self::Error>;
    /// Reconfigures the pin as an output.
    fn set_output(&mut self) -> Result<(), Self::Error>;
    /// Drives the pin to the given level. The pin must currently be an
    /// output.
    fn write(&mut self, state: PinState) -> Result<(), Self::Error>;
    /// Samples the pin. The pin must currently be an input.
    fn is_high(&mut self) -> Result<bool, Self::Error>;
}

/// The four-wire interface to the chip.
///
/// Owns the three control pins, the data pin and the delay provider;
/// no other part of the driver touches the lines.
pub(crate) struct Interface<CE, OE, WE, IO, D> {
    ce: CE,
    oe: OE,
    we: WE,
    io: IO,
    delay: D,
    pub(crate) edge_delay_ns: u32,
}

impl<CE, OE, WE, IO, D, E> Interface<CE, OE, WE, IO, D>
where
    CE: OutputPin<Error = E>,
    OE: OutputPin<Error = E>,
    WE: OutputPin<Error = E>,
    IO: InOutPin<Error = E>,
    D: DelayNs,
{
    pub(crate) fn new(ce: CE, oe: OE, we: WE, io: IO, delay: D, edge_delay_ns: u32) -> Self {
        Self {
            ce,
            oe,
            we,
            io,
            delay,
            edge_delay_ns,
        }
    }

    fn settle(&mut self) {
        self.delay.delay_ns(self.edge_delay_ns);
    }

    /// Clocks one bit into the chip. Chip-enable must already be
    /// asserted and the data line must be in output mode; this layer
    /// manages neither.
    fn write_bit(&mut self, bit: bool) -> Result<(), E> {
        self.io.write(PinState::from(bit))?;
        self.settle();
        // the rising edge of write-enable latches the driven level
        self.we.set_low()?;
        self.settle();
        self.we.set_high()?;
        self.settle();
        Ok(())
    }

    /// Clocks one bit out of the chip. Chip-enable must already be
    /// asserted and the data line must be in input mode.
    fn read_bit(&mut self) -> Result<bool, E> {
        self.oe.set_low()?;
        self.settle();
        let bit = self.io.is_high()?;
        self.oe.set_high()?;
        self.settle();
        Ok(bit)
    }

    /// Sends one register byte, least-significant bit first, framed by
    /// its own chip-enable assertion. Chip-enable is back high when
    /// this returns, whatever happened in between.
    pub(crate) fn send_byte(&mut self, byte: u8) -> Result<(), E> {
        self.ce.set_low()?;
        self.io.set_output()?;
        self.settle();
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0)?;
        }
        self.ce.set_high()?;
        self.settle();
        Ok(())
    }

    /// Receives one register byte, least-significant bit first, framed
    /// by its own chip-enable assertion.
    pub(crate) fn recv_byte(&mut self) -> Result<u8, E> {
        self.io.set_input()?;
        self.ce.set_low()?;
        self.settle();
        let mut byte = 0;
        for i in 0..8 {
            byte |= u8::from(self.read_bit()?) << i;
        }
        self.ce.set_high()?;
        self.settle();
        Ok(byte)
    }

    /// Runs the mandatory wake-up preamble: one discarded bit read,
    /// which resets the chip's internal access sequencer, followed by
    /// the 64-bit recognition pattern. Must run immediately before
    /// every register read or write burst. Fire-and-forget; the chip
    /// never acknowledges.
    pub(crate) fn wake(&mut self) -> Result<(), E> {
        self.ce.set_low()?;
        self.io.set_input()?;
        self.settle();
        self.read_bit()?;
        self.ce.set_high()?;
        self.settle();
        for byte in WAKE_PATTERN {
            self.send_byte(byte)?;
        }
        Ok(())
    }

    pub(crate) fn release(self) -> (CE, OE, WE, IO, D) {
        (self.ce, self.oe, self.we, self.io, self.delay)
    }
}
