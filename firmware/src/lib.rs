//! MQTT to 433 MHz mains switch bridge for RP2040.
//!
//! This crate provides the board side of the bridge: the cycle-counted RF
//! transmit line, the millisecond tick clock and the UART link to the MQTT
//! relay. Routing and debounce live in `switch-core`.

#![no_std]

// Re-export core types for convenience
pub use rf_proto::{ClockConfig, TimingError, TxLine};
pub use switch_core::{
    FrameSource, LineStatusSink, LinkError, LinkEvent, StatusSink, SwitchController,
    DEFAULT_CONFIG,
};

pub mod hardware;
pub mod uart_link;

pub use hardware::{check_clock, timer_hz, MillisClock, RadioLine, TimerDelay, TIMER};
pub use uart_link::{
    EventReceiver, QueuedEvents, UartLineWriter, UartLinkReader, EVENT_QUEUE_DEPTH,
};
