//! Transport abstraction: one full-duplex byte-exchange bus with explicit
//! chip-select framing.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// One logical transaction is `select`, any number of `exchange` calls, then
/// `deselect`. CS must stay asserted for the whole command+address+payload
/// sequence, so the driver owns the framing and the interface only moves
/// bytes.
///
/// The bus is full duplex: every byte sent shifts a byte in, and receiving
/// requires sending a filler byte. This layer signals no errors; a failure
/// here is a silent framing/timing problem outside this contract.
pub trait SerialInterface {
    /// Assert chip select.
    fn select(&mut self);
    /// Release chip select.
    fn deselect(&mut self);
    /// Clock one byte out and return the byte clocked in.
    fn exchange(&mut self, byte: u8) -> u8;
    /// Busy-wait for at least `us` microseconds.
    fn delay_us(&mut self, us: u32);
}

impl<T: SerialInterface + ?Sized> SerialInterface for &mut T {
    fn select(&mut self) {
        T::select(self)
    }

    fn deselect(&mut self) {
        T::deselect(self)
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        T::exchange(self, byte)
    }

    fn delay_us(&mut self, us: u32) {
        T::delay_us(self, us)
    }
}

/// [`SerialInterface`] over an `embedded-hal` SPI bus with a GPIO chip-select
/// line.
pub struct SpiInterface<SPI, CS, D> {
    spi: SPI,
    cs: CS,
    delay: D,
}

impl<SPI, CS, D> SpiInterface<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, cs: CS, delay: D) -> Self {
        SpiInterface { spi, cs, delay }
    }

    pub fn free(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }
}

impl<SPI, CS, D> SerialInterface for SpiInterface<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    fn select(&mut self) {
        let _ = self.cs.set_low();
    }

    fn deselect(&mut self) {
        let _ = self.cs.set_high();
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        let mut word = [byte];
        let _ = self.spi.transfer_in_place(&mut word);
        let _ = self.spi.flush();
        word[0]
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
