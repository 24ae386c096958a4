#![no_std]
#![no_main]

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};
use invisyrinth_core::Datagram;
use invisyrinth_rp2040::config::{
    CONTROLLER_ADDRESS, I2C_FREQUENCY, INBOX_DEPTH, MATRIX_BRIGHTNESS, MAZE_ADDRESS,
    RADIO_BAUDRATE,
};
use invisyrinth_rp2040::drivers::{ht16k33, Ht16k33Matrix};
use invisyrinth_rp2040::{Inbox, Maze, MazeSession, RadioLink, RadioReceiver};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART0_IRQ => embassy_rp::uart::InterruptHandler<UART0>;
});

/// Datagrams from the radio task to the session.
static INBOX: StaticCell<Inbox> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Invisyrinth maze starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let inbox = INBOX.init(Channel::new());

    // --- Radio Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = RADIO_BAUDRATE;

    let uart = Uart::new(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (tx, rx) = uart.split();
    let link = RadioLink::new(tx, MAZE_ADDRESS, inbox.receiver());
    let receiver = RadioReceiver::new(rx, MAZE_ADDRESS);

    // --- Matrix Setup ---
    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = I2C_FREQUENCY;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config); // SCL, SDA

    // The panel is mounted upside down.
    let mut matrix = Ht16k33Matrix::new(i2c, ht16k33::DEFAULT_ADDRESS, true);
    if let Err(e) = matrix.init(MATRIX_BRIGHTNESS) {
        error!("Matrix init failed: {:?}", e);
    }

    spawner.spawn(radio_rx_task(receiver, inbox.sender()).unwrap());

    let mut session = MazeSession::new(link, CONTROLLER_ADDRESS, Maze::standard(), matrix);
    session.run().await
}

/// Radio RX task - frames UART lines into datagrams for the session.
#[embassy_executor::task]
async fn radio_rx_task(
    mut receiver: RadioReceiver<'static>,
    inbox: Sender<'static, CriticalSectionRawMutex, Datagram, INBOX_DEPTH>,
) {
    receiver.run(inbox).await
}
