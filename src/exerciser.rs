//! The command loop tying the device, sampler and console together.

use core::fmt::Write;

#[cfg(not(feature = "defmt"))]
#[allow(unused_imports)]
use log::{debug, info, warn};

#[cfg(feature = "defmt")]
#[allow(unused_imports)]
use defmt::{debug, info, warn};

use crate::{
    board::{Console, InterruptController, PeriodicTimer, TickHandler},
    command::{Command, LINE_CAPACITY, parse_line, sanitize_line},
    config::ExerciserConfig,
    error::{ArgumentError, ExerciserError},
    orchestrator::run_test_with,
    registers::{PrbsDevice, RegisterBus},
    sampler::{Sampler, SamplerMode},
};

/// Line terminator used on the console.
pub const EOL: &str = "\n\r";

pub const BANNER: &str = "--- PRBS IVP V0.a ---";
pub const FAREWELL: &str = "Thank you for using PRBS IVP V0.a";
pub const PROMPT: &str = ">> ";

/// Whether the command loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Interactive exerciser for one PRBS device.
///
/// Built with [`ExerciserBuilder`](crate::builder::ExerciserBuilder). The
/// lifecycle is [`init`](Self::init), then [`poll`](Self::poll) until it
/// returns [`Flow::Exit`], then [`shutdown`](Self::shutdown);
/// [`run`](Self::run) does all three.
pub struct Exerciser<'a, B, T, I, C>
where
    B: RegisterBus,
    T: PeriodicTimer,
    I: InterruptController,
    C: Console,
{
    device: &'a PrbsDevice<B>,
    sampler: Sampler<'a, T>,
    interrupts: I,
    console: C,
    tick_handler: TickHandler,
    config: ExerciserConfig,
}

impl<'a, B, T, I, C> Exerciser<'a, B, T, I, C>
where
    B: RegisterBus,
    T: PeriodicTimer,
    I: InterruptController,
    C: Console,
{
    pub(crate) fn new(
        device: &'a PrbsDevice<B>,
        sampler: Sampler<'a, T>,
        interrupts: I,
        console: C,
        tick_handler: TickHandler,
        config: ExerciserConfig,
    ) -> Self {
        Self {
            device,
            sampler,
            interrupts,
            console,
            tick_handler,
            config,
        }
    }

    /// Runs the whole session: init, command loop, shutdown.
    ///
    /// Command errors are reported and never end the session, so this always
    /// completes successfully.
    pub fn run(&mut self) {
        self.init();
        while self.poll() == Flow::Continue {}
        self.shutdown();
    }

    /// Prints the banner, sets the startup OUTPUT pattern and wires up the
    /// periodic timer interrupt. The sampler is left stopped.
    pub fn init(&mut self) {
        let _ = write!(self.console, "{BANNER}{EOL}");
        self.device.set_output(self.config.initial_output);

        info!(
            "configuring periodic timer: {} counts per tick",
            self.config.timer_period
        );
        let timer = self.sampler.timer_mut();
        timer.enable_auto_reload();
        timer.load_period(self.config.timer_period);

        self.interrupts.connect_timer(self.tick_handler);
        self.interrupts.enable_timer();
        self.sampler.timer_mut().enable_interrupt();
        self.interrupts.enable_cpu();

        self.sampler.state().discard_pending();
    }

    /// Prompts for, reads and executes one command line.
    ///
    /// Exhausted console input counts as an exit request.
    pub fn poll(&mut self) -> Flow {
        let _ = write!(self.console, "{PROMPT}");
        let mut buf = [0u8; LINE_CAPACITY];
        let len = self.console.read_line(&mut buf);
        if len == 0 {
            info!("console input exhausted");
            return Flow::Exit;
        }
        self.execute(sanitize_line(&buf[..len]))
    }

    /// Executes one sanitized command line, reporting any error.
    pub fn execute(&mut self, line: &str) -> Flow {
        match parse_line(line).and_then(|command| self.dispatch(command)) {
            Ok(flow) => flow,
            Err(err) => {
                self.report(line, err);
                Flow::Continue
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow, ExerciserError> {
        match command {
            Command::Exit => return Ok(Flow::Exit),
            Command::Status => self.status(),
            Command::Load(seed) => self.device.set_seed(seed as u32),
            Command::Test(iterations) => self.capture(iterations)?,
            Command::Step => self.step(),
            Command::ToggleSampler => self.toggle_sampler(),
        }
        Ok(Flow::Continue)
    }

    fn status(&mut self) {
        let ticks = self.sampler.state().snapshot();
        let _ = write!(
            self.console,
            "o ready: {}  |  ticks: {}{EOL}",
            ticks.ready as u8, ticks.count
        );
        let status = self.device.output();
        let _ = write!(self.console, " o status: {status:x}{EOL}");
    }

    fn step(&mut self) {
        self.device.pulse_trigger();
        let value = self.device.seed();
        let _ = write!(self.console, " o PRBS: {value:2x}  ({value:3}){EOL}");
    }

    fn toggle_sampler(&mut self) {
        let announce = match self.sampler.mode() {
            SamplerMode::Stopped => " * start timer...",
            SamplerMode::Running => " * stop timer...",
        };
        let _ = write!(self.console, "{announce}{EOL}");
        self.sampler.toggle();
        let ticks = self.sampler.state().ticks();
        let _ = write!(self.console, "ISR count: {ticks}{EOL}");
    }

    fn capture(&mut self, iterations: Result<u32, ArgumentError>) -> Result<(), ExerciserError> {
        if !self.sampler.is_running() {
            return Err(ExerciserError::SamplerNotRunning);
        }
        let iterations = iterations?;

        let console = &mut self.console;
        run_test_with(&mut self.sampler, self.device, iterations, |sample| {
            let _ = write!(
                console,
                "{:4}. {:4} [ {:x} ]{EOL}",
                sample.index, sample.value, sample.value
            );
        })?;
        Ok(())
    }

    fn report(&mut self, line: &str, err: ExerciserError) {
        warn!("command rejected: {}", err);
        let _ = match err {
            ExerciserError::UnknownCommand => {
                write!(self.console, " *** unknown command: [{line}]{EOL}")
            }
            ExerciserError::InvalidArgument(detail) => write!(self.console, "*** {detail}{EOL}"),
            ExerciserError::SamplerNotRunning | ExerciserError::AlreadyRunning => {
                write!(self.console, " *** {err}{EOL}")
            }
        };
    }

    /// Stops sampling, disables the timer interrupt path and blanks OUTPUT.
    pub fn shutdown(&mut self) {
        let _ = write!(self.console, "shutting down...{EOL}");
        self.sampler.stop();
        self.interrupts.disable_cpu();
        self.sampler.timer_mut().disable_interrupt();
        self.interrupts.disable_timer();
        self.device.set_output(0);
        info!("shutdown after {} ticks", self.sampler.state().ticks());
        let _ = write!(self.console, "{FAREWELL}{EOL}");
    }

    pub fn device(&self) -> &'a PrbsDevice<B> {
        self.device
    }

    pub fn sampler(&self) -> &Sampler<'a, T> {
        &self.sampler
    }

    pub fn interrupts(&self) -> &I {
        &self.interrupts
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn config(&self) -> &ExerciserConfig {
        &self.config
    }
}
