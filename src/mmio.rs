#![allow(unsafe_code)]

use crate::registers::RegisterBus;

/// Volatile memory-mapped access to a register block at a fixed base address.
#[derive(Debug, Clone, Copy)]
pub struct MmioBus {
    base: usize,
}

impl MmioBus {
    /// # Safety
    /// `base` must point at a mapped register block that stays valid for
    /// aligned volatile 32-bit reads and writes at every offset the caller
    /// will use, for as long as this bus exists. No other code may treat
    /// that memory as ordinary Rust data.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }
}

impl RegisterBus for MmioBus {
    #[inline]
    fn read_word(&self, offset: usize) -> u32 {
        let addr = (self.base + offset) as *const u32;
        unsafe { core::ptr::read_volatile(addr) }
    }

    #[inline]
    fn write_word(&self, offset: usize, value: u32) {
        let addr = (self.base + offset) as *mut u32;
        unsafe { core::ptr::write_volatile(addr, value) }
    }
}
