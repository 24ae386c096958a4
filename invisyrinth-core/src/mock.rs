//! In-memory test doubles for every collaborator trait.

extern crate std;

use crate::input::{AccelerometerSource, ButtonLevels, Buttons, Clock, SensorError};
use crate::link::{Datagram, Link, LinkError, PeerRegistration, PeerTable};
use crate::motion::SensorSample;
use crate::output::{DirectionalIndicators, OutputError, PixelMatrix, Rgb, TextDisplay};
use crate::config::{GRID_COLS, GRID_ROWS};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use embedded_hal_async::delay::DelayNs;
use invisyrinth_proto::{Direction, PeerAddress};
use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec::Vec;

// Helper to run a future to completion (simple blocking executor)
pub fn block_on<F: Future>(mut f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);

    // SAFETY: We don't move f after pinning
    let mut f = unsafe { Pin::new_unchecked(&mut f) };

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {
                panic!("Mock future returned Pending unexpectedly");
            }
        }
    }
}

/// Queue-backed link. Sends to unregistered peers fail like the radio does.
pub struct MockLink {
    pub inbox: VecDeque<Datagram>,
    pub sent: Vec<(PeerAddress, Vec<u8>)>,
    pub peers: PeerTable<4>,
    pub fail_sends: bool,
}

impl MockLink {
    pub fn new() -> Self {
        Self {
            inbox: VecDeque::new(),
            sent: Vec::new(),
            peers: PeerTable::new(),
            fail_sends: false,
        }
    }

    pub fn push(&mut self, peer: PeerAddress, payload: &[u8]) {
        self.inbox.push_back(Datagram::new(peer, payload).unwrap());
    }

    /// Sent payloads as strings, in order.
    pub fn sent_text(&self) -> Vec<String> {
        self.sent
            .iter()
            .map(|(_, p)| String::from_utf8(p.clone()).unwrap())
            .collect()
    }
}

impl Link for MockLink {
    fn send(&mut self, peer: PeerAddress, payload: &[u8]) -> Result<(), LinkError> {
        if !self.peers.contains(&peer) {
            return Err(LinkError::UnknownPeer);
        }
        if self.fail_sends {
            return Err(LinkError::SendFailed);
        }
        self.sent.push((peer, payload.to_vec()));
        Ok(())
    }

    fn try_recv(&mut self) -> Option<Datagram> {
        self.inbox.pop_front()
    }

    async fn recv(&mut self) -> Datagram {
        match self.inbox.pop_front() {
            Some(datagram) => datagram,
            None => core::future::pending().await,
        }
    }

    fn register_peer(&mut self, peer: PeerAddress) -> Result<PeerRegistration, LinkError> {
        self.peers.register(peer)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayEvent {
    Clear,
    Color(Rgb),
    Lines(String, Option<String>),
}

/// Records every display call. With `fail` set, calls error and record nothing.
pub struct MockDisplay {
    pub events: Vec<DisplayEvent>,
    pub color: Option<Rgb>,
    pub fail: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            color: None,
            fail: false,
        }
    }

    /// The most recently written lines.
    pub fn lines(&self) -> (String, Option<String>) {
        self.events
            .iter()
            .rev()
            .find_map(|e| match e {
                DisplayEvent::Lines(a, b) => Some((a.clone(), b.clone())),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn record(&mut self, event: DisplayEvent) -> Result<(), OutputError> {
        if self.fail {
            return Err(OutputError::Io);
        }
        self.events.push(event);
        Ok(())
    }
}

impl TextDisplay for MockDisplay {
    fn clear(&mut self) -> Result<(), OutputError> {
        self.record(DisplayEvent::Clear)
    }

    fn set_color(&mut self, color: Rgb) -> Result<(), OutputError> {
        self.record(DisplayEvent::Color(color))?;
        self.color = Some(color);
        Ok(())
    }

    fn show_lines(&mut self, line1: &str, line2: Option<&str>) -> Result<(), OutputError> {
        self.record(DisplayEvent::Lines(
            line1.to_string(),
            line2.map(ToString::to_string),
        ))
    }
}

pub struct MockIndicators {
    on: [bool; 4],
}

impl MockIndicators {
    pub fn new() -> Self {
        Self { on: [false; 4] }
    }

    pub fn lit(&self) -> Vec<Direction> {
        Direction::ALL
            .iter()
            .zip(self.on.iter())
            .filter(|(_, on)| **on)
            .map(|(d, _)| *d)
            .collect()
    }
}

impl DirectionalIndicators for MockIndicators {
    fn set(&mut self, direction: Direction, on: bool) {
        let index = Direction::ALL
            .iter()
            .position(|d| *d == direction)
            .unwrap();
        self.on[index] = on;
    }
}

/// Back buffer plus the last presented frame, indexed `[row][col]`.
pub struct MockMatrix {
    pub pending: [[bool; GRID_COLS]; GRID_ROWS],
    pub shown: [[bool; GRID_COLS]; GRID_ROWS],
    pub presented: usize,
    pub fail: bool,
}

impl MockMatrix {
    pub fn new() -> Self {
        Self {
            pending: [[false; GRID_COLS]; GRID_ROWS],
            shown: [[false; GRID_COLS]; GRID_ROWS],
            presented: 0,
            fail: false,
        }
    }
}

impl PixelMatrix for MockMatrix {
    fn clear(&mut self) -> Result<(), OutputError> {
        if self.fail {
            return Err(OutputError::Io);
        }
        self.pending = [[false; GRID_COLS]; GRID_ROWS];
        Ok(())
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> Result<(), OutputError> {
        if self.fail {
            return Err(OutputError::Io);
        }
        self.pending[y][x] = on;
        Ok(())
    }

    fn present(&mut self) -> Result<(), OutputError> {
        if self.fail {
            return Err(OutputError::Io);
        }
        self.shown = self.pending;
        self.presented += 1;
        Ok(())
    }
}

/// Plays back queued samples, then rests.
pub struct MockAccel {
    pub samples: VecDeque<Result<SensorSample, SensorError>>,
}

impl MockAccel {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::new(),
        }
    }

    pub fn push(&mut self, sample: SensorSample) {
        self.samples.push_back(Ok(sample));
    }
}

impl AccelerometerSource for MockAccel {
    fn sample(&mut self) -> Result<SensorSample, SensorError> {
        self.samples.pop_front().unwrap_or(Ok(SensorSample::RESTING))
    }
}

/// Plays back queued levels, then reports both released.
pub struct MockButtons {
    pub levels: VecDeque<ButtonLevels>,
}

impl MockButtons {
    pub fn new() -> Self {
        Self {
            levels: VecDeque::new(),
        }
    }

    pub fn push(&mut self, red: bool, blue: bool) {
        self.levels.push_back(ButtonLevels { red, blue });
    }
}

impl Buttons for MockButtons {
    fn read(&mut self) -> ButtonLevels {
        self.levels.pop_front().unwrap_or(ButtonLevels::RELEASED)
    }
}

/// Simulated clock. Delays complete immediately and move time forward.
pub struct MockTime {
    pub now_ns: u64,
    pub delays_ms: Vec<u32>,
}

impl MockTime {
    pub fn new() -> Self {
        Self {
            now_ns: 0,
            delays_ms: Vec::new(),
        }
    }

    pub fn at_ms(ms: u64) -> Self {
        let mut time = Self::new();
        time.advance_ms(ms);
        time
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.now_ns += ms * 1_000_000;
    }
}

impl Clock for MockTime {
    fn now_ms(&self) -> u64 {
        self.now_ns / 1_000_000
    }
}

impl DelayNs for MockTime {
    async fn delay_ns(&mut self, ns: u32) {
        self.now_ns += u64::from(ns);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        self.advance_ms(u64::from(ms));
    }
}
