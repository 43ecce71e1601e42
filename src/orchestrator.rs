//! Bounded capture test: one trigger pulse and one fresh tick per sample.

#[cfg(not(feature = "defmt"))]
#[allow(unused_imports)]
use log::{debug, info, warn};

#[cfg(feature = "defmt")]
#[allow(unused_imports)]
use defmt::{debug, info, warn};

use crate::{
    board::PeriodicTimer,
    error::{ArgumentError, ExerciserError},
    registers::{PrbsDevice, RegisterBus},
    sampler::{Indicator, Sampler},
};

/// Largest iteration count a single test run accepts.
pub const MAX_ITERATIONS: usize = 999;

/// Seed forced into the device before every test run.
pub const TEST_SEED: u32 = 0xff;

/// One captured PRBS value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub index: u16,
    pub value: u8,
}

/// Samples from one test run, in capture order.
pub type TestRecord = heapless::Vec<Sample, MAX_ITERATIONS>;

/// Checks a requested iteration count against `1..=MAX_ITERATIONS`.
pub fn validate_iterations(iterations: u32) -> Result<u16, ArgumentError> {
    if iterations == 0 || iterations as usize > MAX_ITERATIONS {
        return Err(ArgumentError::Range(iterations));
    }
    Ok(iterations as u16)
}

/// Runs a capture test, handing each sample to `on_sample` as it arrives.
///
/// Fails before touching any register if the sampler is stopped or the
/// iteration count is out of range. Otherwise runs to completion: the
/// indicator is parked, SEED is forced to [`TEST_SEED`], and for every index
/// the device is triggered, one fresh tick is awaited, and the captured SEED
/// value is echoed to OUTPUT. The indicator resumes from its resting state
/// afterwards.
///
/// Holding the sampler mutably for the whole run keeps any other foreground
/// path from stopping it mid-wait. Must not be called from interrupt context.
pub fn run_test_with<T, B, F>(
    sampler: &mut Sampler<'_, T>,
    device: &PrbsDevice<B>,
    iterations: u32,
    mut on_sample: F,
) -> Result<u16, ExerciserError>
where
    T: PeriodicTimer,
    B: RegisterBus,
    F: FnMut(Sample),
{
    if !sampler.is_running() {
        return Err(ExerciserError::SamplerNotRunning);
    }
    let iterations = validate_iterations(iterations)?;

    let state = sampler.state();
    debug!("test run: {} iterations from tick {}", iterations, state.ticks());

    state.set_indicator(Indicator::Inactive);
    device.set_seed(TEST_SEED);
    state.discard_pending();

    for index in 0..iterations {
        device.pulse_trigger();
        sampler.wait_for_sample();
        let value = (device.seed() & 0xff) as u8;
        device.set_output(value as u32);
        on_sample(Sample { index, value });
    }

    state.set_indicator(Indicator::RESTING);
    debug!("test run complete at tick {}", state.ticks());
    Ok(iterations)
}

/// Runs a capture test and collects every sample.
pub fn run_test<T, B>(
    sampler: &mut Sampler<'_, T>,
    device: &PrbsDevice<B>,
    iterations: u32,
) -> Result<TestRecord, ExerciserError>
where
    T: PeriodicTimer,
    B: RegisterBus,
{
    let mut record = TestRecord::new();
    run_test_with(sampler, device, iterations, |sample| {
        // capacity matches MAX_ITERATIONS, which bounds the run
        let _ = record.push(sample);
    })?;
    Ok(record)
}
