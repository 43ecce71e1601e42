//! Contracts the exerciser consumes from board support code.
//!
//! Controller and timer bring-up, vector table wiring and console setup all
//! happen on the board side. The exerciser only drives these narrow handles.
//!
//! Handles are usually zero-sized wrappers around a peripheral instance, so
//! the tick handler can own its own [`PeriodicTimer`] handle for
//! acknowledging interrupts while the foreground owns another for start/stop.

/// Interrupt handler entry point connected to the periodic timer source.
pub type TickHandler = fn();

/// Routing for the periodic timer interrupt.
pub trait InterruptController {
    /// Connects `handler` to the periodic timer interrupt source.
    fn connect_timer(&mut self, handler: TickHandler);
    /// Enables the timer source at the controller.
    fn enable_timer(&mut self);
    /// Disables the timer source at the controller.
    fn disable_timer(&mut self);
    /// Enables interrupt delivery to the processor.
    fn enable_cpu(&mut self);
    /// Disables interrupt delivery to the processor.
    fn disable_cpu(&mut self);
}

/// A down-counting timer that raises an interrupt on every reload.
pub trait PeriodicTimer {
    fn load_period(&mut self, counts: u32);
    fn enable_auto_reload(&mut self);
    fn enable_interrupt(&mut self);
    fn disable_interrupt(&mut self);
    fn start(&mut self);
    fn stop(&mut self);
    /// Acknowledges the pending timer interrupt.
    fn clear_pending(&mut self);
}

/// Line-oriented console. Formatted output goes through [`core::fmt::Write`].
pub trait Console: core::fmt::Write {
    /// Reads one line into `buf`, returning the number of bytes stored.
    ///
    /// Returns 0 when the input is exhausted. Lines longer than `buf` are
    /// cut to fit.
    fn read_line(&mut self, buf: &mut [u8]) -> usize;
}
