//! Periodic sampling driven by the timer interrupt.
//!
//! [`SamplerState`] is the only state shared between the tick handler and the
//! foreground. The tick side publishes through [`SamplerState::publish_tick`],
//! the foreground consumes through [`SamplerState::wait_and_consume`]:
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────────────┐
//! │  Tick (ISR)      │         │  Foreground              │
//! │                  │         │                          │
//! │  publish_tick()  │────────▶│  wait_and_consume()      │
//! │  count += 1      │  ready  │  (test-and-clear)        │
//! │  ready = true    │         │                          │
//! │  rotate pattern  │◀────────│  set_indicator()         │
//! │                  │ target  │                          │
//! └──────────────────┘         └──────────────────────────┘
//! ```
//!
//! [`Sampler`] owns the foreground's timer handle and the
//! `Stopped`/`Running` state machine.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use critical_section::Mutex;

#[cfg(not(feature = "defmt"))]
#[allow(unused_imports)]
use log::{debug, info, warn};

#[cfg(feature = "defmt")]
#[allow(unused_imports)]
use defmt::{debug, info, warn};

use crate::{
    board::PeriodicTimer,
    error::ExerciserError,
    registers::{PrbsDevice, RegisterBus},
};

/// Rotating indicator shown on OUTPUT while the sampler ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Ticks leave OUTPUT alone.
    Inactive,
    /// Next pattern to write on a tick.
    Active(u8),
}

impl Indicator {
    /// Foreground resting state: rotation restarts from 0x1.
    pub const RESTING: Indicator = Indicator::Active(0x1);

    /// Steps the 4-position ring 0x8 -> 0x4 -> 0x2 -> 0x1 -> 0x8.
    #[inline]
    pub fn advance(self) -> Self {
        match self {
            Indicator::Inactive => Indicator::Inactive,
            Indicator::Active(pattern) if pattern <= 0x1 => Indicator::Active(0x8),
            Indicator::Active(pattern) => Indicator::Active(pattern >> 1),
        }
    }
}

/// Point-in-time view of the tick state, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSnapshot {
    pub ready: bool,
    pub count: u32,
}

/// State shared between the tick handler and the foreground.
///
/// Meant to live in a `static` owned by board code and handed to both sides
/// by reference.
pub struct SamplerState {
    ready: AtomicBool,
    count: AtomicU32,
    indicator: Mutex<Cell<Indicator>>,
}

impl SamplerState {
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            count: AtomicU32::new(0),
            indicator: Mutex::new(Cell::new(Indicator::RESTING)),
        }
    }

    /// Tick-side publication. Call once per timer interrupt.
    ///
    /// Bounded: one optional register write and a few stores, all inside a
    /// single critical section.
    pub fn publish_tick<B: RegisterBus>(&self, device: &PrbsDevice<B>) {
        critical_section::with(|cs| {
            // single writer; load/store keeps this usable on cores without CAS
            let count = self.count.load(Ordering::Relaxed);
            self.count.store(count.wrapping_add(1), Ordering::Relaxed);
            self.ready.store(true, Ordering::Release);

            let indicator = self.indicator.borrow(cs);
            let current = indicator.get();
            if let Indicator::Active(pattern) = current {
                device.set_output(pattern as u32);
                indicator.set(current.advance());
            }
        });
    }

    /// Spins until a tick has been published, then consumes it.
    ///
    /// The test and the clear happen in one critical section, so a tick
    /// landing after the clear stays visible to the next call.
    ///
    /// Returns the tick count observed at the moment of consumption.
    ///
    /// Never call this from interrupt context, and never while the timer is
    /// stopped: there is no timeout.
    pub fn wait_and_consume(&self) -> u32 {
        loop {
            if let Some(tick) = self.take_ready() {
                return tick;
            }
            core::hint::spin_loop();
        }
    }

    fn take_ready(&self) -> Option<u32> {
        critical_section::with(|_| {
            if self.ready.load(Ordering::Acquire) {
                self.ready.store(false, Ordering::Relaxed);
                Some(self.count.load(Ordering::Relaxed))
            } else {
                None
            }
        })
    }

    /// Drops a tick that was published before the caller started waiting.
    pub(crate) fn discard_pending(&self) {
        critical_section::with(|_| self.ready.store(false, Ordering::Relaxed));
    }

    pub fn snapshot(&self) -> TickSnapshot {
        critical_section::with(|_| TickSnapshot {
            ready: self.ready.load(Ordering::Acquire),
            count: self.count.load(Ordering::Acquire),
        })
    }

    /// Cumulative tick count for the life of the process.
    pub fn ticks(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    pub fn indicator(&self) -> Indicator {
        critical_section::with(|cs| self.indicator.borrow(cs).get())
    }

    /// Foreground-side assignment of the indicator target.
    pub(crate) fn set_indicator(&self, indicator: Indicator) {
        critical_section::with(|cs| self.indicator.borrow(cs).set(indicator));
    }
}

impl Default for SamplerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of the periodic timer interrupt handler.
///
/// Acknowledges the timer, then publishes the tick.
pub fn service_tick<T, B>(timer: &mut T, state: &SamplerState, device: &PrbsDevice<B>)
where
    T: PeriodicTimer,
    B: RegisterBus,
{
    timer.clear_pending();
    state.publish_tick(device);
}

/// Run state of the periodic sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerMode {
    Stopped,
    Running,
}

/// Foreground control of the periodic sampler.
pub struct Sampler<'a, T: PeriodicTimer> {
    state: &'a SamplerState,
    timer: T,
    mode: SamplerMode,
}

impl<'a, T: PeriodicTimer> Sampler<'a, T> {
    /// Creates a stopped sampler. The timer is not touched.
    pub fn new(state: &'a SamplerState, timer: T) -> Self {
        Self {
            state,
            timer,
            mode: SamplerMode::Stopped,
        }
    }

    /// Starts the periodic timer.
    ///
    /// Returns [`ExerciserError::AlreadyRunning`] without side effects if the
    /// sampler is already running.
    pub fn start(&mut self) -> Result<(), ExerciserError> {
        if self.mode == SamplerMode::Running {
            return Err(ExerciserError::AlreadyRunning);
        }
        self.timer.start();
        self.mode = SamplerMode::Running;
        info!("sampler started at tick {}", self.state.ticks());
        Ok(())
    }

    /// Stops the periodic timer, returning the mode it was in.
    ///
    /// Stopping a stopped sampler does nothing.
    pub fn stop(&mut self) -> SamplerMode {
        let previous = self.mode;
        if previous == SamplerMode::Running {
            self.timer.stop();
            self.mode = SamplerMode::Stopped;
            info!("sampler stopped at tick {}", self.state.ticks());
        }
        previous
    }

    /// Flips between running and stopped, returning the new mode.
    pub fn toggle(&mut self) -> SamplerMode {
        match self.mode {
            SamplerMode::Stopped => {
                // cannot fail from Stopped
                let _ = self.start();
            }
            SamplerMode::Running => {
                self.stop();
            }
        }
        self.mode
    }

    pub fn mode(&self) -> SamplerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == SamplerMode::Running
    }

    /// Blocks until the next tick. See [`SamplerState::wait_and_consume`].
    pub fn wait_for_sample(&self) -> u32 {
        self.state.wait_and_consume()
    }

    pub fn state(&self) -> &'a SamplerState {
        self.state
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub(crate) fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
