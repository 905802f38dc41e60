//! A RAL-like module for GPDMA register access
//!
//! The GPDMA channel registers repeat every 0x20 bytes, and the transfer
//! descriptors in memory share the channel's SRC / DEST / LLI / CONTROL layout.
//! Describing the channels as an array of structs, and declaring the fields
//! once, lets us use the RAL macros for registers and descriptors alike.

#![allow(
    non_snake_case,        // Compatibility with RAL
    non_upper_case_globals, // Field offset / mask constants
    dead_code,              // Not every field is used
)]

pub use ral_registers::{modify_reg, read_reg, write_reg};
use ral_registers::{RORegister, RWRegister, WORegister};

/// Declares RAL field modules, each `width` bits wide, starting at `offset`
macro_rules! fields {
    ($($field:ident: $offset:literal, $width:literal;)+) => {
        $(
            pub mod $field {
                pub const offset: u32 = $offset;
                pub const mask: u32 = (((1u64 << $width) - 1) as u32) << offset;
                pub mod R {}
                pub mod W {}
                pub mod RW {}
            }
        )+
    };
}

pub mod creg;
pub mod gpdma;

//
// Helper types for static memory
//
// Similar to the RAL's `Instance` type, but copy.
//

pub(crate) struct Static<T>(pub(crate) *const T);
impl<T> core::ops::Deref for Static<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // Safety: pointer points to static memory (peripheral memory)
        unsafe { &*self.0 }
    }
}
impl<T> Clone for Static<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Static<T> {}
