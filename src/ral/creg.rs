//! CREG DMA multiplexer register
//!
//! The DMAMUX register selects, for each of the 16 GPDMA peripheral request
//! lines, which of four hardware sources drives the line. Two bits per line.

use super::RWRegister;

#[repr(C)]
pub struct RegisterBlock {
    /// DMA multiplexer control (CREG offset 0x11C)
    pub DMAMUX: RWRegister<u32>,
}

/// Number of peripheral request lines routed through the multiplexer
pub const PERIPHERAL_COUNT: u8 = 16;
/// Number of sources selectable per request line
pub const OPTION_COUNT: u8 = 4;

/// Bit offset of the selection for `peripheral`
pub const fn offset(peripheral: u8) -> u32 {
    2 * peripheral as u32
}

/// Mask covering the selection for `peripheral`
pub const fn mask(peripheral: u8) -> u32 {
    0b11 << offset(peripheral)
}
