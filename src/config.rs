/// Timer reload value for a 2 Hz tick on a 333 MHz private timer.
pub const DEFAULT_TIMER_PERIOD: u32 = 166_666_500;

/// OUTPUT value written at startup.
pub const DEFAULT_INITIAL_OUTPUT: u32 = 0x081;

/// Fixed settings applied when the exerciser initializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciserConfig {
    /// Timer counts between ticks.
    pub timer_period: u32,
    /// Pattern written to OUTPUT before the timer is set up.
    pub initial_output: u32,
}

impl ExerciserConfig {
    pub const fn new() -> Self {
        Self {
            timer_period: DEFAULT_TIMER_PERIOD,
            initial_output: DEFAULT_INITIAL_OUTPUT,
        }
    }

    pub const fn with_timer_period(mut self, counts: u32) -> Self {
        self.timer_period = counts;
        self
    }

    pub const fn with_initial_output(mut self, value: u32) -> Self {
        self.initial_output = value;
        self
    }
}

impl Default for ExerciserConfig {
    fn default() -> Self {
        Self::new()
    }
}
