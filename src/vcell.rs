//! Volatile memory cell
//!
//! Transfer descriptors live in normal memory, but the DMA controller reads
//! them behind our back. `VCell` keeps every access volatile, and it exposes the
//! same `read` / `write` interface as the RAL registers, so the RAL macros work
//! on descriptors too.

use core::cell::UnsafeCell;

#[repr(transparent)]
pub struct VCell<T>(UnsafeCell<T>);

impl<T> VCell<T> {
    pub const fn new(value: T) -> Self {
        VCell(UnsafeCell::new(value))
    }
}

impl<T: Copy> VCell<T> {
    pub fn read(&self) -> T {
        // Safety: pointer from UnsafeCell is valid and aligned.
        unsafe { core::ptr::read_volatile(self.0.get()) }
    }

    pub fn write(&self, value: T) {
        // Safety: pointer from UnsafeCell is valid and aligned.
        unsafe { core::ptr::write_volatile(self.0.get(), value) }
    }
}
