#![no_std]

//! Blocking driver for the Winbond W25Q32 4 MB serial NOR flash.
//!
//! The driver talks to the chip through the [`SerialInterface`] byte-exchange
//! transport and exposes geometry-aware erase/program/read operations plus
//! chip identification and power-state control. It is purely synchronous:
//! every call runs to completion on the calling thread, including the bounded
//! busy-poll that follows each erase or program command.

pub mod define;
pub mod flash;
pub mod geometry;
pub mod serial_interface;

pub use flash::Flash;
pub use serial_interface::{SerialInterface, SpiInterface};

/// Identification data read from the chip by [`Flash::init`].
///
/// Filled once at initialization and never mutated afterwards. The derived
/// counts come from the fixed 4 MB geometry; on an identity mismatch they are
/// left at zero because the geometry of the part actually fitted is unknown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChipIdentity {
    pub manufacturer_id: u8,
    /// Memory type byte << 8 | capacity byte, as reported by JEDEC ID (9Fh).
    pub jedec_part_id: u16,
    /// Capacity byte; redundant with the low byte of `jedec_part_id`.
    pub device_id: u8,
    /// 64-bit factory-programmed id, unique per physical part.
    pub unique_id: u64,
    pub page_count: u32,
    pub sector_count: u32,
    pub block_64k_count: u32,
}

/// Driver status codes.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Index, address or length outside the device geometry. Detected before
    /// any bus access, so retrying with corrected inputs is always safe.
    #[error("parameter out of range for device geometry")]
    InvalidParam,
    /// The busy-poll budget ran out before the device went idle. The state of
    /// the target region is indeterminate; the operation cannot be rolled
    /// back and was not retried.
    #[error("device still busy after poll budget exhausted")]
    Timeout,
    /// The JEDEC identity did not match a W25Q32. Carries the identity that
    /// was actually observed.
    #[error("unexpected JEDEC identity, not a W25Q32")]
    ChipNotFound(ChipIdentity),
    /// Reserved; not produced by any current operation.
    #[error("device busy")]
    Busy,
    /// Reserved; not produced by any current operation.
    #[error("device error")]
    Other,
}
