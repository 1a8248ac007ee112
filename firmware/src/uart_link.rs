//! Serial link to the MQTT relay.
//!
//! Reads relay lines from UART and turns them into [`LinkEvent`]s; writes
//! subscribe/publish lines back. See [`switch_core::link`] for the line
//! format.
//!
//! # Pins
//!
//! Uses UART1 at 115200 baud:
//! - GPIO 8: TX
//! - GPIO 9: RX

use embassy_rp::uart::{Async, Error as UartError, UartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use switch_core::{parse_line, FrameSource, LineAssembler, LineWriter, LinkError, LinkEvent};

/// Link events buffered between the reader task and the main loop.
///
/// Only covers events parsed before a transmission starts. While one is on
/// air (up to about 1.3 s for twelve Quigg repetitions) interrupts are
/// masked and the reader task is not polled, so incoming bytes pile up in
/// the 32-byte UART FIFO. That holds about one relay line; anything after
/// it overruns and is lost.
pub const EVENT_QUEUE_DEPTH: usize = 4;

/// Receiving end of the event queue, as seen by the main loop.
pub type EventReceiver = Receiver<'static, CriticalSectionRawMutex, LinkEvent, EVENT_QUEUE_DEPTH>;

/// Convert UART errors to [`LinkError`].
///
/// A helper function instead of a `From` impl: both types are foreign here.
#[inline]
fn uart_error_to_link_error(e: UartError) -> LinkError {
    match e {
        UartError::Framing => LinkError::Framing,
        UartError::Overrun => LinkError::BufferOverflow,
        _ => LinkError::Io,
    }
}

/// Reads relay lines from the UART.
pub struct UartLinkReader<'d> {
    rx: UartRx<'d, Async>,
    assembler: LineAssembler,
}

impl<'d> UartLinkReader<'d> {
    #[must_use]
    pub fn new(rx: UartRx<'d, Async>) -> Self {
        Self {
            rx,
            assembler: LineAssembler::new(),
        }
    }

    /// Wait for the next complete line and parse it.
    ///
    /// A UART error drops the partial line, so the next event starts clean.
    pub async fn next_event(&mut self) -> Result<LinkEvent, LinkError> {
        let mut byte = [0u8; 1];
        loop {
            if let Err(e) = self.rx.read(&mut byte).await {
                self.assembler.reset();
                return Err(uart_error_to_link_error(e));
            }

            if let Some(line) = self.assembler.push(byte[0]) {
                return parse_line(line?);
            }
        }
    }
}

/// Writes relay lines to the UART, blocking until they are in the FIFO.
pub struct UartLineWriter<'d> {
    tx: UartTx<'d, Async>,
}

impl<'d> UartLineWriter<'d> {
    #[must_use]
    pub fn new(tx: UartTx<'d, Async>) -> Self {
        Self { tx }
    }
}

impl LineWriter for UartLineWriter<'_> {
    fn write_line(&mut self, line: &[u8]) -> Result<(), LinkError> {
        self.tx.blocking_write(line).map_err(uart_error_to_link_error)
    }
}

/// [`FrameSource`] over the event queue; never waits.
pub struct QueuedEvents {
    receiver: EventReceiver,
}

impl QueuedEvents {
    #[must_use]
    pub fn new(receiver: EventReceiver) -> Self {
        Self { receiver }
    }
}

impl FrameSource for QueuedEvents {
    fn try_receive(&mut self) -> Option<LinkEvent> {
        self.receiver.try_receive().ok()
    }
}
