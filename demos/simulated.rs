//! Host simulation: the exerciser against a simulated PRBS device
//!
//! This demo shows:
//! - Static device and sampler state shared between "ISR" and main loop
//! - A thread standing in for the periodic timer interrupt
//! - The interactive command loop on stdin/stdout
//!
//! Try: `isr`, `test 8`, `pbsw`, `isr`, `init 5a`, `s`, `x`

use std::io::{self, BufRead, Write as _};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use prbs_exerciser::prelude::*;

/// Register block backed by atomics, stepping an 8-bit LFSR on TRIGGER.
struct SimulatedBlock {
    output: AtomicU32,
    prbs: AtomicU32,
}

impl SimulatedBlock {
    const fn new() -> Self {
        Self {
            output: AtomicU32::new(0),
            prbs: AtomicU32::new(0),
        }
    }
}

impl RegisterBus for SimulatedBlock {
    fn read_word(&self, offset: usize) -> u32 {
        match offset {
            0 => self.output.load(Ordering::Acquire),
            4 => self.prbs.load(Ordering::Acquire),
            _ => 0,
        }
    }

    fn write_word(&self, offset: usize, value: u32) {
        match offset {
            0 => self.output.store(value, Ordering::Release),
            4 => self.prbs.store(value & 0xff, Ordering::Release),
            8 => {
                let state = self.prbs.load(Ordering::Acquire) as u8;
                let bit = ((state >> 7) ^ (state >> 5) ^ (state >> 4) ^ (state >> 3)) & 1;
                self.prbs.store(((state << 1) | bit) as u32, Ordering::Release);
            }
            _ => {}
        }
    }
}

static DEVICE: PrbsDevice<SimulatedBlock> = PrbsDevice::new(SimulatedBlock::new());
static SAMPLER: SamplerState = SamplerState::new();

// Simulated timer control register
static TIMER_RUNNING: AtomicBool = AtomicBool::new(false);
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

struct SimTimer;

impl PeriodicTimer for SimTimer {
    fn load_period(&mut self, counts: u32) {
        println!("[timer] period {counts} counts (simulated at 20 ms)");
    }
    fn enable_auto_reload(&mut self) {}
    fn enable_interrupt(&mut self) {}
    fn disable_interrupt(&mut self) {}
    fn start(&mut self) {
        TIMER_RUNNING.store(true, Ordering::Release);
    }
    fn stop(&mut self) {
        TIMER_RUNNING.store(false, Ordering::Release);
    }
    fn clear_pending(&mut self) {}
}

struct SimInterrupts;

impl InterruptController for SimInterrupts {
    fn connect_timer(&mut self, _handler: TickHandler) {}
    fn enable_timer(&mut self) {}
    fn disable_timer(&mut self) {}
    fn enable_cpu(&mut self) {}
    fn disable_cpu(&mut self) {
        SHUTDOWN.store(true, Ordering::Release);
    }
}

struct StdConsole;

impl core::fmt::Write for StdConsole {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        print!("{}", s.replace("\n\r", "\n"));
        io::stdout().flush().map_err(|_| core::fmt::Error)
    }
}

impl Console for StdConsole {
    fn read_line(&mut self, buf: &mut [u8]) -> usize {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => 0,
            Ok(_) => {
                let len = line.len().min(buf.len());
                buf[..len].copy_from_slice(&line.as_bytes()[..len]);
                len
            }
        }
    }
}

fn timer_isr() {
    service_tick(&mut SimTimer, &SAMPLER, &DEVICE);
}

fn main() {
    // Simulated interrupt source: fires the handler while the timer runs
    let isr_thread = thread::spawn(|| {
        while !SHUTDOWN.load(Ordering::Acquire) {
            thread::sleep(Duration::from_millis(20));
            if TIMER_RUNNING.load(Ordering::Acquire) {
                timer_isr();
            }
        }
    });

    let mut exerciser = ExerciserBuilder::new()
        .device(&DEVICE)
        .sampler_state(&SAMPLER)
        .timer(SimTimer)
        .interrupts(SimInterrupts, timer_isr)
        .console(StdConsole)
        .build();

    exerciser.run();

    isr_thread.join().unwrap();
    println!("[sim] {} ticks", SAMPLER.ticks());
}
