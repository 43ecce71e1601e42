//! A `no_std`, no-alloc exerciser for a memory-mapped PRBS generator peripheral.
//!
//! The exerciser drives the generator from a line-oriented console, samples it
//! on a periodic timer interrupt, and runs bounded capture tests that pair
//! every trigger pulse with exactly one fresh tick.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐            ┌──────────────────────────┐
//! │  Timer ISR (board)   │            │  Foreground              │
//! │                      │            │                          │
//! │  service_tick()      │  sampler   │  Exerciser::poll()       │
//! │   clear pending      │   state    │   parse_line()           │
//! │   publish_tick() ────┼───────────▶│   run_test_with()        │
//! │   rotate indicator   │            │    wait_and_consume()    │
//! └──────────┬───────────┘            └────────────┬─────────────┘
//!            │                                     │
//!            └────────────▶ PrbsDevice ◀───────────┘
//!                  OUTPUT / SEED / TRIGGER
//! ```
//!
//! - The tick handler is bounded and never waits
//! - Only the foreground blocks, busy-waiting for the next tick
//! - [`SamplerState`] is the sole shared state, reached by reference from both sides
//!
//! # Example
//!
//! ```rust,no_run
//! use prbs_exerciser::prelude::*;
//! # struct Timer;
//! # impl PeriodicTimer for Timer {
//! #     fn load_period(&mut self, _: u32) {}
//! #     fn enable_auto_reload(&mut self) {}
//! #     fn enable_interrupt(&mut self) {}
//! #     fn disable_interrupt(&mut self) {}
//! #     fn start(&mut self) {}
//! #     fn stop(&mut self) {}
//! #     fn clear_pending(&mut self) {}
//! # }
//! # struct Gic;
//! # impl InterruptController for Gic {
//! #     fn connect_timer(&mut self, _: TickHandler) {}
//! #     fn enable_timer(&mut self) {}
//! #     fn disable_timer(&mut self) {}
//! #     fn enable_cpu(&mut self) {}
//! #     fn disable_cpu(&mut self) {}
//! # }
//! # struct Uart;
//! # impl core::fmt::Write for Uart {
//! #     fn write_str(&mut self, _: &str) -> core::fmt::Result { Ok(()) }
//! # }
//! # impl Console for Uart {
//! #     fn read_line(&mut self, _: &mut [u8]) -> usize { 0 }
//! # }
//!
//! const PRBS_BASE: usize = 0x43c0_0000;
//!
//! static DEVICE: PrbsDevice<MmioBus> = PrbsDevice::new(unsafe { MmioBus::new(PRBS_BASE) });
//! static SAMPLER: SamplerState = SamplerState::new();
//!
//! // Connected to the private timer interrupt by the board.
//! fn timer_isr() {
//!     service_tick(&mut Timer, &SAMPLER, &DEVICE);
//! }
//!
//! let mut exerciser = ExerciserBuilder::new()
//!     .device(&DEVICE)
//!     .sampler_state(&SAMPLER)
//!     .timer(Timer)
//!     .interrupts(Gic, timer_isr)
//!     .console(Uart)
//!     .build();
//!
//! exerciser.run();
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod board;
pub mod builder;
pub mod command;
pub mod config;
pub mod error;
pub mod exerciser;
pub mod mmio;
pub mod orchestrator;
pub mod registers;
pub mod sampler;

#[cfg(test)]
mod test_support;

pub use board::{Console, InterruptController, PeriodicTimer, TickHandler};
pub use builder::ExerciserBuilder;
pub use command::{Command, parse_line, sanitize_line};
pub use config::ExerciserConfig;
pub use error::{ArgumentError, ExerciserError};
pub use exerciser::{Exerciser, Flow};
pub use mmio::MmioBus;
pub use orchestrator::{Sample, TestRecord, run_test, run_test_with};
pub use registers::{PrbsDevice, RegisterBus, RegisterId};
pub use sampler::{Indicator, Sampler, SamplerMode, SamplerState, TickSnapshot, service_tick};

pub mod prelude {
    pub use crate::{
        ArgumentError, Command, Console, Exerciser, ExerciserBuilder, ExerciserConfig,
        ExerciserError, Flow, Indicator, InterruptController, MmioBus, PeriodicTimer, PrbsDevice,
        RegisterBus, RegisterId, Sample, Sampler, SamplerMode, SamplerState, TestRecord,
        TickHandler, TickSnapshot, run_test, run_test_with, service_tick,
    };
}
