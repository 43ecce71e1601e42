use crate::{
    board::{Console, InterruptController, PeriodicTimer, TickHandler},
    config::ExerciserConfig,
    exerciser::Exerciser,
    registers::{PrbsDevice, RegisterBus},
    sampler::{Sampler, SamplerState},
};

/// Placeholder tick handler until the board supplies one.
fn unconnected_tick() {}

/// Typestate builder for [`Exerciser`].
///
/// Each collaborator slot starts as `()` and is filled in order:
/// device, sampler state, timer, interrupts, console. Only a fully
/// populated builder has `build()`.
pub struct ExerciserBuilder<D, S, T, I, C> {
    device: D,
    state: S,
    timer: T,
    interrupts: I,
    console: C,
    tick_handler: TickHandler,
    config: ExerciserConfig,
}

// Start the builder
impl ExerciserBuilder<(), (), (), (), ()> {
    pub fn new() -> Self {
        ExerciserBuilder {
            device: (),
            state: (),
            timer: (),
            interrupts: (),
            console: (),
            tick_handler: unconnected_tick,
            config: ExerciserConfig::new(),
        }
    }

    /// Set the device under test
    pub fn device<B: RegisterBus>(
        self,
        device: &PrbsDevice<B>,
    ) -> ExerciserBuilder<&PrbsDevice<B>, (), (), (), ()> {
        ExerciserBuilder {
            device,
            state: (),
            timer: (),
            interrupts: (),
            console: (),
            tick_handler: self.tick_handler,
            config: self.config,
        }
    }
}

impl Default for ExerciserBuilder<(), (), (), (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

// Set the shared sampler state
impl<'a, B: RegisterBus> ExerciserBuilder<&'a PrbsDevice<B>, (), (), (), ()> {
    /// The same state the tick handler publishes into.
    pub fn sampler_state(
        self,
        state: &'a SamplerState,
    ) -> ExerciserBuilder<&'a PrbsDevice<B>, &'a SamplerState, (), (), ()> {
        ExerciserBuilder {
            device: self.device,
            state,
            timer: (),
            interrupts: (),
            console: (),
            tick_handler: self.tick_handler,
            config: self.config,
        }
    }
}

// Set the foreground timer handle
impl<'a, B: RegisterBus> ExerciserBuilder<&'a PrbsDevice<B>, &'a SamplerState, (), (), ()> {
    pub fn timer<T: PeriodicTimer>(
        self,
        timer: T,
    ) -> ExerciserBuilder<&'a PrbsDevice<B>, &'a SamplerState, T, (), ()> {
        ExerciserBuilder {
            device: self.device,
            state: self.state,
            timer,
            interrupts: (),
            console: (),
            tick_handler: self.tick_handler,
            config: self.config,
        }
    }
}

// Set interrupt routing
impl<'a, B: RegisterBus, T: PeriodicTimer>
    ExerciserBuilder<&'a PrbsDevice<B>, &'a SamplerState, T, (), ()>
{
    /// Set the interrupt controller and the handler it will connect to the
    /// timer source
    pub fn interrupts<I: InterruptController>(
        self,
        interrupts: I,
        tick_handler: TickHandler,
    ) -> ExerciserBuilder<&'a PrbsDevice<B>, &'a SamplerState, T, I, ()> {
        ExerciserBuilder {
            device: self.device,
            state: self.state,
            timer: self.timer,
            interrupts,
            console: (),
            tick_handler,
            config: self.config,
        }
    }
}

// Set the console
impl<'a, B: RegisterBus, T: PeriodicTimer, I: InterruptController>
    ExerciserBuilder<&'a PrbsDevice<B>, &'a SamplerState, T, I, ()>
{
    pub fn console<C: Console>(
        self,
        console: C,
    ) -> ExerciserBuilder<&'a PrbsDevice<B>, &'a SamplerState, T, I, C> {
        ExerciserBuilder {
            device: self.device,
            state: self.state,
            timer: self.timer,
            interrupts: self.interrupts,
            console,
            tick_handler: self.tick_handler,
            config: self.config,
        }
    }
}

// Configuration can be replaced at any stage
impl<D, S, T, I, C> ExerciserBuilder<D, S, T, I, C> {
    pub fn config(mut self, config: ExerciserConfig) -> Self {
        self.config = config;
        self
    }
}

// Build the exerciser
impl<'a, B, T, I, C> ExerciserBuilder<&'a PrbsDevice<B>, &'a SamplerState, T, I, C>
where
    B: RegisterBus,
    T: PeriodicTimer,
    I: InterruptController,
    C: Console,
{
    /// Build the exerciser with its sampler stopped. Nothing is touched
    /// until [`Exerciser::init`].
    pub fn build(self) -> Exerciser<'a, B, T, I, C> {
        Exerciser::new(
            self.device,
            Sampler::new(self.state, self.timer),
            self.interrupts,
            self.console,
            self.tick_handler,
            self.config,
        )
    }
}
