//! Test support utilities - only compiled in test builds.

extern crate std;

use std::boxed::Box;
use std::collections::VecDeque;
use std::string::String;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::vec::Vec;

use crate::{
    board::{Console, InterruptController, PeriodicTimer, TickHandler},
    builder::ExerciserBuilder,
    exerciser::Exerciser,
    registers::{PrbsDevice, RegisterBus},
    sampler::SamplerState,
};

/// One step of the 8-bit Fibonacci LFSR x^8 + x^6 + x^5 + x^4 + 1.
pub fn lfsr_step(state: u8) -> u8 {
    let bit = ((state >> 7) ^ (state >> 5) ^ (state >> 4) ^ (state >> 3)) & 1;
    (state << 1) | bit
}

/// A single access seen by [`SimulatedPrbs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusAccess {
    Read { offset: usize },
    Write { offset: usize, value: u32 },
}

struct SimInner {
    status: u32,
    prbs: u8,
    log: Vec<BusAccess>,
}

/// Register-level model of the PRBS peripheral.
///
/// OUTPUT reads return the configured status bits, SEED loads and reads the
/// LFSR state, and any TRIGGER write steps the LFSR once.
pub struct SimulatedPrbs {
    inner: Mutex<SimInner>,
}

impl SimulatedPrbs {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SimInner {
                status: 0,
                prbs: 0,
                log: Vec::new(),
            }),
        }
    }

    pub fn set_status(&self, status: u32) {
        self.inner.lock().unwrap().status = status;
    }

    pub fn prbs(&self) -> u8 {
        self.inner.lock().unwrap().prbs
    }

    pub fn log(&self) -> Vec<BusAccess> {
        self.inner.lock().unwrap().log.clone()
    }

    pub fn clear_log(&self) {
        self.inner.lock().unwrap().log.clear();
    }

    /// Values written to OUTPUT, in order.
    pub fn output_writes(&self) -> Vec<u32> {
        self.log()
            .into_iter()
            .filter_map(|access| match access {
                BusAccess::Write { offset: 0, value } => Some(value),
                _ => None,
            })
            .collect()
    }
}

impl Default for SimulatedPrbs {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimulatedPrbs {
    fn read_word(&self, offset: usize) -> u32 {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(BusAccess::Read { offset });
        match offset {
            0 => inner.status,
            4 => inner.prbs as u32,
            _ => 0,
        }
    }

    fn write_word(&self, offset: usize, value: u32) {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(BusAccess::Write { offset, value });
        match offset {
            4 => inner.prbs = (value & 0xff) as u8,
            8 => inner.prbs = lfsr_step(inner.prbs),
            _ => {}
        }
    }
}

/// Bus wrapper that fires a tick on every TRIGGER write while `armed`.
///
/// Gives single-threaded tests a deterministic interrupt: the tick lands
/// right after the pulse, before the foreground starts waiting.
pub struct TickOnTrigger<'a> {
    sim: &'a SimulatedPrbs,
    state: &'a SamplerState,
    armed: Arc<AtomicBool>,
}

impl<'a> TickOnTrigger<'a> {
    pub fn new(sim: &'a SimulatedPrbs, state: &'a SamplerState, armed: Arc<AtomicBool>) -> Self {
        Self { sim, state, armed }
    }
}

impl RegisterBus for TickOnTrigger<'_> {
    fn read_word(&self, offset: usize) -> u32 {
        self.sim.read_word(offset)
    }

    fn write_word(&self, offset: usize, value: u32) {
        self.sim.write_word(offset, value);
        if offset == 8 && self.armed.load(Ordering::Acquire) {
            self.state.publish_tick(&PrbsDevice::new(self.sim));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    LoadPeriod(u32),
    AutoReload,
    EnableInterrupt,
    DisableInterrupt,
    Start,
    Stop,
    ClearPending,
}

/// Timer that records every call, optionally arming a [`TickOnTrigger`].
#[derive(Default)]
pub struct RecordingTimer {
    pub events: Vec<TimerEvent>,
    armed: Option<Arc<AtomicBool>>,
}

impl RecordingTimer {
    pub fn linked(armed: Arc<AtomicBool>) -> Self {
        Self {
            events: Vec::new(),
            armed: Some(armed),
        }
    }

    fn arm(&self, on: bool) {
        if let Some(armed) = &self.armed {
            armed.store(on, Ordering::Release);
        }
    }
}

impl PeriodicTimer for RecordingTimer {
    fn load_period(&mut self, counts: u32) {
        self.events.push(TimerEvent::LoadPeriod(counts));
    }

    fn enable_auto_reload(&mut self) {
        self.events.push(TimerEvent::AutoReload);
    }

    fn enable_interrupt(&mut self) {
        self.events.push(TimerEvent::EnableInterrupt);
    }

    fn disable_interrupt(&mut self) {
        self.events.push(TimerEvent::DisableInterrupt);
    }

    fn start(&mut self) {
        self.events.push(TimerEvent::Start);
        self.arm(true);
    }

    fn stop(&mut self) {
        self.events.push(TimerEvent::Stop);
        self.arm(false);
    }

    fn clear_pending(&mut self) {
        self.events.push(TimerEvent::ClearPending);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqEvent {
    Connect,
    EnableTimer,
    DisableTimer,
    EnableCpu,
    DisableCpu,
}

#[derive(Default)]
pub struct RecordingInterrupts {
    pub events: Vec<IrqEvent>,
    pub handler: Option<TickHandler>,
}

impl InterruptController for RecordingInterrupts {
    fn connect_timer(&mut self, handler: TickHandler) {
        self.events.push(IrqEvent::Connect);
        self.handler = Some(handler);
    }

    fn enable_timer(&mut self) {
        self.events.push(IrqEvent::EnableTimer);
    }

    fn disable_timer(&mut self) {
        self.events.push(IrqEvent::DisableTimer);
    }

    fn enable_cpu(&mut self) {
        self.events.push(IrqEvent::EnableCpu);
    }

    fn disable_cpu(&mut self) {
        self.events.push(IrqEvent::DisableCpu);
    }
}

/// Console fed from a list of input lines, capturing all output.
#[derive(Default)]
pub struct ScriptConsole {
    input: VecDeque<Vec<u8>>,
    pub output: String,
}

impl ScriptConsole {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|line| line.as_bytes().to_vec()).collect(),
            output: String::new(),
        }
    }

    /// Output lines with the `\n\r` terminators and prompts removed.
    pub fn lines(&self) -> Vec<&str> {
        self.output
            .split("\n\r")
            .map(|line| line.trim_start_matches(">> "))
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl core::fmt::Write for ScriptConsole {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

impl Console for ScriptConsole {
    fn read_line(&mut self, buf: &mut [u8]) -> usize {
        match self.input.pop_front() {
            Some(line) => {
                let len = line.len().min(buf.len());
                buf[..len].copy_from_slice(&line[..len]);
                len
            }
            None => 0,
        }
    }
}

pub type TestExerciser =
    Exerciser<'static, TickOnTrigger<'static>, RecordingTimer, RecordingInterrupts, ScriptConsole>;

fn test_tick() {}

/// Simulated board: device, shared state and a timer-armed tick source.
///
/// Parts are leaked so exercisers built from the rig can borrow them for
/// `'static`, the way board statics would be.
pub struct TestRig {
    pub sim: &'static SimulatedPrbs,
    pub state: &'static SamplerState,
    pub device: &'static PrbsDevice<TickOnTrigger<'static>>,
    armed: Arc<AtomicBool>,
}

impl TestRig {
    pub fn new() -> Self {
        let sim: &'static SimulatedPrbs = Box::leak(Box::new(SimulatedPrbs::new()));
        let state: &'static SamplerState = Box::leak(Box::new(SamplerState::new()));
        let armed = Arc::new(AtomicBool::new(false));
        let device = Box::leak(Box::new(PrbsDevice::new(TickOnTrigger::new(
            sim,
            state,
            Arc::clone(&armed),
        ))));
        Self {
            sim,
            state,
            device,
            armed,
        }
    }

    /// An exerciser whose console will read `lines` in order.
    pub fn exerciser(&self, lines: &[&str]) -> TestExerciser {
        ExerciserBuilder::new()
            .device(self.device)
            .sampler_state(self.state)
            .timer(RecordingTimer::linked(Arc::clone(&self.armed)))
            .interrupts(RecordingInterrupts::default(), test_tick)
            .console(ScriptConsole::new(lines))
            .build()
    }
}

#[test]
fn lfsr_has_full_period() {
    let mut state = 0xffu8;
    let mut steps = 0;
    loop {
        state = lfsr_step(state);
        steps += 1;
        if state == 0xff {
            break;
        }
    }
    assert_eq!(steps, 255);
}
