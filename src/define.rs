//! Command opcodes, status bits and device constants for the W25Q32.

pub(crate) enum WriteCmd {
    WriteEnable = 0x06,
    WriteDisable = 0x04,
    PageProgram = 0x02,
}

pub(crate) enum ReadCmd {
    Status1 = 0x05,
    Data = 0x03,
}

pub(crate) enum ModeCmd {
    PowerDown = 0xB9,
    ReleasePowerDown = 0xAB,
}

pub(crate) enum IdCmd {
    ReadUnique = 0x4B,
    JedecId = 0x9F,
}

pub(crate) enum EraseCmd {
    Block64k = 0xD8,
    Sector4k = 0x20,
    Chip = 0xC7, // C7h|60h
}

/// Status register 1, bit 0: erase/write in progress.
pub const STATUS_BUSY: u8 = 0b0000_0001;
/// Status register 1, bit 1: write enable latch.
pub const STATUS_WEL: u8 = 0b0000_0010;

/// Smallest programmable unit.
pub const PAGE_SIZE: u32 = 256;
/// Smallest erasable unit.
pub const SECTOR_SIZE: u32 = 4096;
pub const BLOCK_64K_SIZE: u32 = 65536;
/// 4 MB total array.
pub const TOTAL_SIZE: u32 = 4_194_304;

pub const PAGE_COUNT: u32 = TOTAL_SIZE / PAGE_SIZE;
pub const SECTOR_COUNT: u32 = TOTAL_SIZE / SECTOR_SIZE;
pub const BLOCK_64K_COUNT: u32 = TOTAL_SIZE / BLOCK_64K_SIZE;

/// Winbond.
pub const EXPECTED_MANUFACTURER_ID: u8 = 0xEF;
/// Memory type byte << 8 | capacity byte.
pub const EXPECTED_JEDEC_PART_ID: u16 = 0x4016;

/// Byte clocked out to drive a read; the value is irrelevant.
pub const DUMMY_BYTE: u8 = 0xFF;

/// Busy-poll iterations before `wait_idle` gives up. An iteration budget, not
/// a wall-clock timeout: the effective duration scales with the CPU clock and
/// must outlast a full chip erase at the lowest supported clock.
pub const DEFAULT_POLL_BUDGET: u32 = 4_000_000;

/// Settle time after entering power-down (tDP).
pub const POWER_DOWN_SETTLE_US: u32 = 3;
/// Settle time after release from power-down (tRES1).
pub const RELEASE_POWER_DOWN_SETTLE_US: u32 = 3;
