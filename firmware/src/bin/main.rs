#![no_std]
#![no_main]

use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_time::Timer;
use rf_switch_bridge::{
    check_clock, LineStatusSink, LinkEvent, MillisClock, QueuedEvents, RadioLine,
    SwitchController, TimerDelay, UartLineWriter, UartLinkReader, DEFAULT_CONFIG,
    EVENT_QUEUE_DEPTH,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
});

/// Events from the UART reader task to the main loop.
static EVENTS: StaticCell<Channel<CriticalSectionRawMutex, LinkEvent, EVENT_QUEUE_DEPTH>> =
    StaticCell::new();

/// Boot chatter of the relay is over by then.
const RELAY_SETTLE_SECS: u64 = 5;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("RF switch bridge starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // Pulse widths are timed by the hardware timer; refuse to send if it is off.
    if let Err(e) = check_clock() {
        defmt::panic!("unusable timer clock: {}", e);
    }

    let events: &'static Channel<CriticalSectionRawMutex, LinkEvent, EVENT_QUEUE_DEPTH> =
        EVENTS.init(Channel::new());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (tx, rx) = uart.split();

    // --- Radio Setup ---
    let data = Output::new(p.PIN_15, Level::Low);
    let led = Output::new(p.PIN_25, Level::Low);
    let line: RadioLine = RadioLine::with_indicator(data, TimerDelay, led);
    let pir = Input::new(p.PIN_14, Pull::Up);

    let sink = LineStatusSink::new(UartLineWriter::new(tx));
    let mut controller = match SwitchController::new(&DEFAULT_CONFIG, line, sink, MillisClock) {
        Ok(controller) => controller,
        Err(e) => defmt::panic!("invalid switch configuration: {}", e),
    };

    Timer::after_secs(RELAY_SETTLE_SECS).await;

    spawner.spawn(link_task(UartLinkReader::new(rx), events.sender())).unwrap();

    if let Err(e) = controller.on_connected() {
        warn!("initial subscribe failed: {}", e);
    }

    info!("RF switch bridge initialized, waiting for commands...");

    let mut source = QueuedEvents::new(events.receiver());
    loop {
        // Transmissions must not be stretched by interrupts. Commands that
        // arrive meanwhile are limited by the UART FIFO, see EVENT_QUEUE_DEPTH.
        let result = critical_section::with(|_| controller.poll_once(&mut source, pir.is_high()));
        if let Err(e) = result {
            warn!("link error: {}", e);
        }
        yield_now().await;
    }
}

/// Link task - reads relay lines from UART and queues the events.
#[embassy_executor::task]
async fn link_task(
    mut reader: UartLinkReader<'static>,
    events: Sender<'static, CriticalSectionRawMutex, LinkEvent, EVENT_QUEUE_DEPTH>,
) {
    loop {
        match reader.next_event().await {
            Ok(event) => events.send(event).await,
            Err(e) => error!("Link error: {:?}", e),
        }
    }
}
