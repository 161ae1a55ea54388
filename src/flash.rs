use log::{debug, error, info};

use crate::define::{self, EraseCmd, IdCmd, ModeCmd, ReadCmd, WriteCmd};
use crate::geometry;
use crate::serial_interface::SerialInterface;
use crate::{ChipIdentity, Error};

/// W25Q32 driver over a [`SerialInterface`] transport.
///
/// The driver owns the transport (and with it the chip-select line) for its
/// lifetime; it performs no internal locking, so callers in environments with
/// multiple execution contexts must serialize access externally — an
/// interleaved transaction corrupts the byte-stream framing irrecoverably.
pub struct Flash<I>
where
    I: SerialInterface,
{
    interface: I,
    poll_budget: u32,
}

impl<I> Flash<I>
where
    I: SerialInterface,
{
    pub fn new(interface: I) -> Self {
        Self::with_poll_budget(interface, define::DEFAULT_POLL_BUDGET)
    }

    /// Builds a driver with an explicit busy-poll iteration budget.
    ///
    /// The budget counts status polls, not time; it must outlast the slowest
    /// operation (full chip erase, tens of seconds) at the lowest supported
    /// clock speed.
    pub fn with_poll_budget(interface: I, poll_budget: u32) -> Self {
        Flash {
            interface,
            poll_budget,
        }
    }

    /// Releases the transport.
    pub fn release(self) -> I {
        self.interface
    }

    /// Wakes the chip, reads and verifies its JEDEC identity and unique id.
    ///
    /// On an identity mismatch the returned [`Error::ChipNotFound`] carries
    /// the fields actually observed, so callers can inspect what is fitted.
    pub fn init(&mut self) -> Result<ChipIdentity, Error> {
        // Known CS state first; the chip may also still be powered down from
        // a previous session, and the wake command is harmless if it is not.
        self.interface.deselect();
        self.release_power_down();

        self.interface.select();
        self.interface.exchange(IdCmd::JedecId as u8);
        let manufacturer_id = self.interface.exchange(define::DUMMY_BYTE);
        let memory_type = self.interface.exchange(define::DUMMY_BYTE);
        let capacity = self.interface.exchange(define::DUMMY_BYTE);
        self.interface.deselect();

        let mut identity = ChipIdentity {
            manufacturer_id,
            jedec_part_id: u16::from(memory_type) << 8 | u16::from(capacity),
            device_id: capacity,
            ..ChipIdentity::default()
        };

        if identity.manufacturer_id != define::EXPECTED_MANUFACTURER_ID
            || identity.jedec_part_id != define::EXPECTED_JEDEC_PART_ID
        {
            error!(
                "JEDEC ID mismatch: expected {:02X} {:04X}, got {:02X} {:04X}",
                define::EXPECTED_MANUFACTURER_ID,
                define::EXPECTED_JEDEC_PART_ID,
                identity.manufacturer_id,
                identity.jedec_part_id
            );
            return Err(Error::ChipNotFound(identity));
        }
        info!(
            "JEDEC ID: {:02X} {:04X}",
            identity.manufacturer_id, identity.jedec_part_id
        );

        self.interface.select();
        self.interface.exchange(IdCmd::ReadUnique as u8);
        for _ in 0..4 {
            // Datasheet: four dummy bytes before the id starts clocking out.
            self.interface.exchange(define::DUMMY_BYTE);
        }
        let mut id_bytes = [0u8; 8];
        for byte in &mut id_bytes {
            *byte = self.interface.exchange(define::DUMMY_BYTE);
        }
        self.interface.deselect();

        identity.unique_id = geometry::unique_id_from_bytes(id_bytes);
        identity.page_count = define::PAGE_COUNT;
        identity.sector_count = define::SECTOR_COUNT;
        identity.block_64k_count = define::BLOCK_64K_COUNT;

        Ok(identity)
    }

    /// Erases the entire 4 MB array to 0xFF.
    ///
    /// Blocks until the erase completes, which can take tens of seconds.
    pub fn chip_erase(&mut self) -> Result<(), Error> {
        self.wait_idle()?;
        self.write_enable();
        debug!("chip erase");
        self.command(EraseCmd::Chip as u8);
        self.wait_idle()
    }

    /// Erases the 4 KB sector `index` (0..1024) to 0xFF.
    pub fn sector_erase(&mut self, index: u32) -> Result<(), Error> {
        let address = geometry::sector_address(index)?;
        self.wait_idle()?;
        self.write_enable();
        debug!("sector erase at {:06X}", address);
        self.command_with_address(EraseCmd::Sector4k as u8, address);
        self.wait_idle()
    }

    /// Erases the 64 KB block `index` (0..64) to 0xFF.
    pub fn block_erase(&mut self, index: u32) -> Result<(), Error> {
        let address = geometry::block_address(index)?;
        self.wait_idle()?;
        self.write_enable();
        debug!("block erase at {:06X}", address);
        self.command_with_address(EraseCmd::Block64k as u8, address);
        self.wait_idle()
    }

    /// Programs `data` into page `page` starting at `offset` and returns the
    /// number of bytes actually written.
    ///
    /// A request running past the end of the page is clipped to the page
    /// remainder, matching the device's own page-wrap behavior: the call
    /// succeeds with a short count and no out-of-page byte is transmitted.
    /// The target range must have been erased beforehand. An empty request is
    /// a no-op that never touches the bus.
    pub fn page_program(&mut self, page: u32, offset: u16, data: &[u8]) -> Result<usize, Error> {
        let span = geometry::page_write_span(page, offset, data.len())?;
        if span.len == 0 {
            return Ok(0);
        }

        self.wait_idle()?;
        self.write_enable();
        debug!("page program {} bytes at {:06X}", span.len, span.address);

        self.interface.select();
        self.interface.exchange(WriteCmd::PageProgram as u8);
        for byte in geometry::encode_addr24(span.address) {
            self.interface.exchange(byte);
        }
        for &byte in &data[..span.len] {
            self.interface.exchange(byte);
        }
        self.interface.deselect();

        self.wait_idle()?;
        Ok(span.len)
    }

    /// Reads `buffer.len()` bytes starting at the linear address `address`.
    ///
    /// An empty buffer is a no-op that never touches the bus.
    pub fn read_data(&mut self, address: u32, buffer: &mut [u8]) -> Result<(), Error> {
        geometry::check_read_span(address, buffer.len())?;
        if buffer.is_empty() {
            return Ok(());
        }

        self.wait_idle()?;

        self.interface.select();
        self.interface.exchange(ReadCmd::Data as u8);
        for byte in geometry::encode_addr24(address) {
            self.interface.exchange(byte);
        }
        for byte in buffer.iter_mut() {
            *byte = self.interface.exchange(define::DUMMY_BYTE);
        }
        self.interface.deselect();

        Ok(())
    }

    /// Reads status register 1. Bit 0 is the busy flag.
    pub fn read_status(&mut self) -> u8 {
        self.interface.select();
        self.interface.exchange(ReadCmd::Status1 as u8);
        let status = self.interface.exchange(define::DUMMY_BYTE);
        self.interface.deselect();
        status
    }

    /// Clears the write enable latch.
    ///
    /// The device drops the latch by itself after every completed program or
    /// erase; this is only needed to cancel a stray write-enable.
    pub fn write_disable(&mut self) {
        self.command(WriteCmd::WriteDisable as u8);
    }

    /// Puts the device into power-down mode.
    ///
    /// Fire-and-forget: the device gives no status feedback for this
    /// transition, so the call just waits out the fixed settle time.
    pub fn power_down(&mut self) {
        self.command(ModeCmd::PowerDown as u8);
        self.interface.delay_us(define::POWER_DOWN_SETTLE_US);
    }

    /// Wakes the device from power-down mode. Safe to issue when already
    /// awake.
    pub fn release_power_down(&mut self) {
        self.command(ModeCmd::ReleasePowerDown as u8);
        self.interface.delay_us(define::RELEASE_POWER_DOWN_SETTLE_US);
    }

    fn command(&mut self, opcode: u8) {
        self.interface.select();
        self.interface.exchange(opcode);
        self.interface.deselect();
    }

    fn command_with_address(&mut self, opcode: u8, address: u32) {
        self.interface.select();
        self.interface.exchange(opcode);
        for byte in geometry::encode_addr24(address) {
            self.interface.exchange(byte);
        }
        self.interface.deselect();
    }

    fn write_enable(&mut self) {
        self.command(WriteCmd::WriteEnable as u8);
    }

    // Polls the busy flag until it clears or the iteration budget runs out.
    // On Timeout the state of the in-flight operation is unknown.
    fn wait_idle(&mut self) -> Result<(), Error> {
        for _ in 0..self.poll_budget {
            if self.read_status() & define::STATUS_BUSY == 0 {
                return Ok(());
            }
        }
        error!("timed out waiting for device idle");
        Err(Error::Timeout)
    }
}
