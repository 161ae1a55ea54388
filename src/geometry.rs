//! Address arithmetic and bounds checks against the fixed W25Q32 geometry.
//!
//! Everything here is pure and runs before any bus access, so a bad index or
//! span is rejected with zero hardware side effects.

use crate::Error;
use crate::define;

/// A page-program span resolved to a linear address, clipped to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub address: u32,
    pub len: usize,
}

/// 24-bit big-endian wire form of a linear address, MSB first.
///
/// Always three bytes; callers guarantee `address < 2^24` via the checks
/// below.
pub fn encode_addr24(address: u32) -> [u8; 3] {
    [(address >> 16) as u8, (address >> 8) as u8, address as u8]
}

/// Linear start address of a 4 KB sector.
pub fn sector_address(index: u32) -> Result<u32, Error> {
    if index >= define::SECTOR_COUNT {
        return Err(Error::InvalidParam);
    }
    Ok(index * define::SECTOR_SIZE)
}

/// Linear start address of a 64 KB block.
pub fn block_address(index: u32) -> Result<u32, Error> {
    if index >= define::BLOCK_64K_COUNT {
        return Err(Error::InvalidParam);
    }
    Ok(index * define::BLOCK_64K_SIZE)
}

/// Resolves a page program request to a linear address and effective length.
///
/// A request that would run past the end of the page is clipped to the page
/// remainder, not rejected: the device itself wraps writes at the page
/// boundary, so the driver never transmits an out-of-page byte and the caller
/// sees a short successful write instead of an error.
pub fn page_write_span(page: u32, offset: u16, requested: usize) -> Result<PageSpan, Error> {
    if page >= define::PAGE_COUNT || u32::from(offset) >= define::PAGE_SIZE {
        return Err(Error::InvalidParam);
    }
    let remaining = (define::PAGE_SIZE - u32::from(offset)) as usize;
    Ok(PageSpan {
        address: page * define::PAGE_SIZE + u32::from(offset),
        len: requested.min(remaining),
    })
}

/// Checks that `len` bytes starting at `address` stay inside the array.
pub fn check_read_span(address: u32, len: usize) -> Result<(), Error> {
    if u64::from(address) + len as u64 > u64::from(define::TOTAL_SIZE) {
        return Err(Error::InvalidParam);
    }
    Ok(())
}

/// Composes the 64-bit unique id from the eight bytes the device clocks out,
/// most significant byte first.
pub fn unique_id_from_bytes(bytes: [u8; 8]) -> u64 {
    u64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr24_is_big_endian() {
        assert_eq!(encode_addr24(0x00_0000), [0x00, 0x00, 0x00]);
        assert_eq!(encode_addr24(0x12_34_56), [0x12, 0x34, 0x56]);
        assert_eq!(encode_addr24(0x00_00_FF), [0x00, 0x00, 0xFF]);
        assert_eq!(encode_addr24(0x3F_FF_FF), [0x3F, 0xFF, 0xFF]);
    }

    #[test]
    fn sector_addressing() {
        assert_eq!(sector_address(0), Ok(0));
        assert_eq!(sector_address(1), Ok(4096));
        assert_eq!(sector_address(1023), Ok(1023 * 4096));
        assert_eq!(sector_address(1024), Err(Error::InvalidParam));
    }

    #[test]
    fn block_addressing() {
        assert_eq!(block_address(0), Ok(0));
        assert_eq!(block_address(63), Ok(63 * 65536));
        assert_eq!(block_address(64), Err(Error::InvalidParam));
    }

    #[test]
    fn page_span_clips_at_page_end() {
        let span = page_write_span(0, 250, 10).unwrap();
        assert_eq!(span.address, 250);
        assert_eq!(span.len, 6);
    }

    #[test]
    fn page_span_exact_fit_not_clipped() {
        let span = page_write_span(3, 250, 6).unwrap();
        assert_eq!(span.address, 3 * 256 + 250);
        assert_eq!(span.len, 6);
    }

    #[test]
    fn page_span_rejects_bad_indices() {
        assert_eq!(page_write_span(16384, 0, 1), Err(Error::InvalidParam));
        assert_eq!(page_write_span(0, 256, 1), Err(Error::InvalidParam));
    }

    #[test]
    fn page_span_zero_len_is_valid() {
        let span = page_write_span(7, 0, 0).unwrap();
        assert_eq!(span.len, 0);
    }

    #[test]
    fn read_span_bounds() {
        assert!(check_read_span(0, 4_194_304).is_ok());
        assert!(check_read_span(4_194_303, 1).is_ok());
        assert_eq!(check_read_span(4_194_304, 1), Err(Error::InvalidParam));
        assert_eq!(check_read_span(0, 4_194_305), Err(Error::InvalidParam));
        assert_eq!(check_read_span(u32::MAX, 1), Err(Error::InvalidParam));
    }

    #[test]
    fn unique_id_msb_first() {
        let id = unique_id_from_bytes([0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);
        assert_eq!(id, 0x0123_4567_89AB_CDEF);
    }
}
