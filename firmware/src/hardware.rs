//! Board-level pieces of the transmitter: busy-wait, tick clock, pin line.
//!
//! # Pins
//!
//! - GPIO 15: RF transmitter data
//! - GPIO 14: PIR sensor (active high, pulled up)
//! - GPIO 25: on-board LED, lit while a repetition is on air

use embassy_rp::gpio::Output;
use embassy_time::{block_for, Duration, Instant, TICK_HZ};
use embedded_hal::delay::DelayNs;
use rf_proto::{ClockConfig, PinLine, TimingError};
use switch_core::TickClock;

/// Rate of the hardware timer every pulse is timed by.
///
/// The RP2040 timer counts microseconds from the watchdog tick generator,
/// independent of the system clock.
pub const TIMER: ClockConfig = ClockConfig::new(1_000_000);

const _: () = assert!(TIMER.is_exact(), "tick is not a whole number of timer counts");
const _: () = assert!(
    TIMER.clock_hz as u64 == TICK_HZ,
    "embassy-time does not tick at the busy-wait timer rate"
);

/// Rate the timer is really counting at: `clk_ref` over the watchdog tick divider.
pub fn timer_hz() -> u32 {
    let divider = u32::from(embassy_rp::pac::WATCHDOG.tick().read().cycles());
    embassy_rp::clocks::clk_ref_freq() / divider.max(1)
}

/// Check the running timer against [`TIMER`].
///
/// # Errors
///
/// See [`TimingError`].
pub fn check_clock() -> Result<(), TimingError> {
    TIMER.check(timer_hz())
}

/// Busy-wait that polls the hardware timer.
///
/// Reads the free-running counter directly, so it stays exact with
/// interrupts masked and does not depend on instruction timing.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimerDelay;

impl DelayNs for TimerDelay {
    fn delay_ns(&mut self, ns: u32) {
        block_for(Duration::from_nanos(u64::from(ns)));
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(u64::from(us)));
    }
}

/// Free-running millisecond counter, truncated to 16 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct MillisClock;

impl TickClock for MillisClock {
    #[inline]
    fn now(&self) -> u16 {
        Instant::now().as_millis() as u16
    }
}

/// The RF transmit line: data pin, timer busy-wait, activity LED.
pub type RadioLine = PinLine<Output<'static>, TimerDelay, Output<'static>>;
