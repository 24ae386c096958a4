#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{error, info};
use defmt_rtt as _;
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{Blocking, Config as I2cConfig, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_time::Delay;
use invisyrinth_core::Datagram;
use invisyrinth_rp2040::config::{
    CONTROLLER_ADDRESS, I2C_FREQUENCY, INBOX_DEPTH, MAZE_ADDRESS, RADIO_BAUDRATE,
};
use invisyrinth_rp2040::drivers::{lsm6dsox, GpioButtons, GpioIndicators, GroveLcd, Lsm6dsox};
use invisyrinth_rp2040::{ControllerSession, EmbassyClock, Feedback, Inbox, RadioLink, RadioReceiver};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART0_IRQ => embassy_rp::uart::InterruptHandler<UART0>;
});

type I2cBus = Mutex<NoopRawMutex, RefCell<I2c<'static, I2C0, Blocking>>>;

/// Datagrams from the radio task to the session.
static INBOX: StaticCell<Inbox> = StaticCell::new();

/// LCD and IMU share I2C0.
static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Invisyrinth controller starting...");

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
    let link = RadioLink::new(tx, CONTROLLER_ADDRESS, inbox.receiver());
    let receiver = RadioReceiver::new(rx, CONTROLLER_ADDRESS);

    // --- I2C Setup ---
    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = I2C_FREQUENCY;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config); // SCL, SDA
    let bus = I2C_BUS.init(Mutex::new(RefCell::new(i2c)));

    let mut lcd = GroveLcd::new(I2cDevice::new(bus), Delay);
    if let Err(e) = lcd.init() {
        // Keep going; the feedback layer logs what the LCD would show.
        error!("LCD init failed: {:?}", e);
    }

    let mut imu = Lsm6dsox::new(I2cDevice::new(bus), lsm6dsox::DEFAULT_ADDRESS);
    if let Err(e) = imu.init() {
        error!("IMU init failed: {:?}", e);
    }

    // --- GPIO Setup ---
    let indicators = GpioIndicators::new(
        Output::new(p.PIN_10, Level::Low), // up
        Output::new(p.PIN_11, Level::Low), // down
        Output::new(p.PIN_12, Level::Low), // left
        Output::new(p.PIN_13, Level::Low), // right
    );
    let buttons = GpioButtons::new(
        Input::new(p.PIN_14, Pull::Up), // red
        Input::new(p.PIN_15, Pull::Up), // blue
    );

    spawner.spawn(radio_rx_task(receiver, inbox.sender()).unwrap());

    let mut session = ControllerSession::new(
        link,
        MAZE_ADDRESS,
        imu,
        buttons,
        Feedback::new(lcd, indicators),
        EmbassyClock,
    );
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
