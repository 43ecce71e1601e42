//! Typed access to the PRBS generator's register block.
//!
//! The device exposes three 32-bit registers laid out back to back:
//!
//! ```text
//! base + 0  OUTPUT   write: indicator pattern   read: status bits
//! base + 4  SEED     write: 8-bit seed load     read: last captured PRBS value
//! base + 8  TRIGGER  write-only: any write advances the PRBS by one step
//! ```
//!
//! Nothing here validates values. Range checks belong to the caller.

/// Raw 32-bit access to a peripheral register block.
///
/// `offset` is a byte offset from the block's base address. Implementations
/// must perform exactly one access per call; register side effects (such as
/// the TRIGGER pulse) depend on it.
pub trait RegisterBus {
    fn read_word(&self, offset: usize) -> u32;
    fn write_word(&self, offset: usize, value: u32);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    #[inline]
    fn read_word(&self, offset: usize) -> u32 {
        (**self).read_word(offset)
    }

    #[inline]
    fn write_word(&self, offset: usize, value: u32) {
        (**self).write_word(offset, value)
    }
}

/// One of the three PRBS device registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterId {
    Output,
    Seed,
    Trigger,
}

impl RegisterId {
    /// Byte offset of the register from the device base.
    #[inline]
    pub const fn offset(self) -> usize {
        match self {
            RegisterId::Output => 0,
            RegisterId::Seed => 4,
            RegisterId::Trigger => 8,
        }
    }
}

/// Value written to TRIGGER for a pulse. The device ignores it.
pub const TRIGGER_PULSE: u32 = 0;

/// Generates typed accessors for a single register.
macro_rules! impl_register_accessors {
    // Read/write register: `name()` and `set_name(value)`
    ($name:ident, $id:ident, rw) => {
        paste::paste! {
            #[doc = "Reads the `" $id "` register."]
            #[inline]
            pub fn $name(&self) -> u32 {
                self.read(RegisterId::$id)
            }

            #[doc = "Writes `value` to the `" $id "` register."]
            #[inline]
            pub fn [<set_ $name>](&self, value: u32) {
                self.write(RegisterId::$id, value)
            }
        }
    };
    // Write-only strobe register: `pulse_name()`
    ($name:ident, $id:ident, strobe) => {
        paste::paste! {
            #[doc = "Strobes the write-only `" $id "` register."]
            #[inline]
            pub fn [<pulse_ $name>](&self) {
                self.write(RegisterId::$id, TRIGGER_PULSE)
            }
        }
    };
}

/// The PRBS generator peripheral, reached through a [`RegisterBus`].
///
/// All accesses take `&self` so one device can be shared between the tick
/// handler and the foreground loop.
#[derive(Debug)]
pub struct PrbsDevice<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> PrbsDevice<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    #[inline]
    pub fn read(&self, id: RegisterId) -> u32 {
        self.bus.read_word(id.offset())
    }

    #[inline]
    pub fn write(&self, id: RegisterId, value: u32) {
        self.bus.write_word(id.offset(), value)
    }

    impl_register_accessors!(output, Output, rw);
    impl_register_accessors!(seed, Seed, rw);
    impl_register_accessors!(trigger, Trigger, strobe);
}
