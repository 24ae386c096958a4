//! Handheld controller session: feedback, buttons, then motion, once per tick.

use crate::config::{MotionConfig, BUTTON_SETTLE_MS, IDLE_DELAY_MS, SPLASH_MS, TITLE};
use crate::input::{AccelerometerSource, Buttons, Clock, EdgeDetector};
use crate::link::{register_logged, Link, LinkError};
use crate::motion::{DirectionClassifier, StepDetector};
use crate::output::{DirectionalIndicators, Feedback, Rgb, TextDisplay};
use embedded_hal_async::delay::DelayNs;
use invisyrinth_proto::{parse_status, Command, MoveVector, PeerAddress, Serialize, Status};

/// Whether motion sensing is live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameMode {
    #[default]
    Active,
    Paused,
}

impl GameMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            GameMode::Active => GameMode::Paused,
            GameMode::Paused => GameMode::Active,
        }
    }
}

/// What the motion half of a tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionOutcome {
    /// Paused; the accelerometer was not read.
    Paused,
    /// The accelerometer read failed.
    NoSample,
    NoStep,
    /// A step with too little tilt to pick a direction.
    NoDirection,
    Sent(MoveVector),
    /// The step was detected but the datagram was lost.
    SendFailed(MoveVector),
}

impl MotionOutcome {
    /// Whether the loop should idle before the next tick.
    ///
    /// A step without a direction goes straight to the next tick.
    #[must_use]
    pub fn idle_after(&self) -> bool {
        !matches!(self, MotionOutcome::NoDirection)
    }
}

/// Controller-side session state.
///
/// Owns every collaborator; `tick()` is the whole loop body so it can be
/// driven step by step from tests.
pub struct ControllerSession<L, A, B, D, I, T> {
    link: L,
    maze_peer: PeerAddress,
    accelerometer: A,
    buttons: B,
    feedback: Feedback<D, I>,
    time: T,
    steps: StepDetector,
    classifier: DirectionClassifier,
    mode: GameMode,
    red: EdgeDetector,
    blue: EdgeDetector,
}

impl<L, A, B, D, I, T> ControllerSession<L, A, B, D, I, T>
where
    L: Link,
    A: AccelerometerSource,
    B: Buttons,
    D: TextDisplay,
    I: DirectionalIndicators,
    T: Clock + DelayNs,
{
    pub fn new(
        link: L,
        maze_peer: PeerAddress,
        accelerometer: A,
        buttons: B,
        feedback: Feedback<D, I>,
        time: T,
    ) -> Self {
        Self::with_config(
            link,
            maze_peer,
            accelerometer,
            buttons,
            feedback,
            time,
            &MotionConfig::default(),
        )
    }

    pub fn with_config(
        link: L,
        maze_peer: PeerAddress,
        accelerometer: A,
        buttons: B,
        feedback: Feedback<D, I>,
        time: T,
        config: &MotionConfig,
    ) -> Self {
        Self {
            link,
            maze_peer,
            accelerometer,
            buttons,
            feedback,
            time,
            steps: StepDetector::new(config),
            classifier: DirectionClassifier::new(config),
            mode: GameMode::Active,
            red: EdgeDetector::new(),
            blue: EdgeDetector::new(),
        }
    }

    /// Register the maze peer and play the splash screen.
    pub async fn start(&mut self) {
        register_logged(&mut self.link, self.maze_peer, "Maze");

        self.feedback.message(TITLE, None);
        self.feedback.color(Rgb::BLUE);
        self.time.delay_ms(SPLASH_MS).await;
        self.feedback.clear();

        info!("Controller ready, maze at {}", self.maze_peer);
        self.feedback.message("Ready to play!", Some("Take a step."));
    }

    /// Run forever.
    pub async fn run(&mut self) -> ! {
        self.start().await;
        loop {
            if self.tick().await.idle_after() {
                self.time.delay_ms(IDLE_DELAY_MS).await;
            }
        }
    }

    /// One loop iteration.
    pub async fn tick(&mut self) -> MotionOutcome {
        self.poll_feedback();
        self.poll_buttons().await;

        if self.mode == GameMode::Paused {
            return MotionOutcome::Paused;
        }

        let sample = match self.accelerometer.sample() {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Accelerometer read failed: {:?}", e);
                return MotionOutcome::NoSample;
            }
        };

        if !self.steps.detect(&sample, self.time.now_ms()) {
            return MotionOutcome::NoStep;
        }

        let vector = self.classifier.classify(&sample);
        if vector.is_none() {
            info!("Step without clear direction, ignored");
            return MotionOutcome::NoDirection;
        }

        info!("Step detected, direction: {:?}", vector);
        match self.send(Command::Step(vector)) {
            Ok(()) => MotionOutcome::Sent(vector),
            Err(_) => MotionOutcome::SendFailed(vector),
        }
    }

    /// Show a status reported by the maze node.
    pub fn handle_feedback(&mut self, status: &Status) {
        self.feedback.show_status(status);
    }

    /// Take at most one pending datagram and show it.
    fn poll_feedback(&mut self) {
        let Some(datagram) = self.link.try_recv() else {
            return;
        };
        match parse_status(&datagram.payload) {
            Ok(status) => {
                info!("Status from {}: {:?}", datagram.peer, status);
                self.handle_feedback(&status);
            }
            Err(e) => warn!("Dropping undecodable status from {}: {:?}", datagram.peer, e),
        }
    }

    async fn poll_buttons(&mut self) {
        let levels = self.buttons.read();

        if self.red.pressed(levels.red) {
            info!("Red button pressed, resetting game");
            // A lost reset is just lost; the player presses again.
            let _ = self.send(Command::Reset);
            self.feedback.message("New run", Some("Good luck!"));
            self.time.delay_ms(BUTTON_SETTLE_MS).await;
        }

        if self.blue.pressed(levels.blue) {
            self.mode = self.mode.toggled();
            self.feedback.lights_off();
            self.feedback.color(Rgb::BLUE);
            match self.mode {
                GameMode::Active => {
                    info!("Blue button pressed, game resumed");
                    self.feedback.message("Game on", None);
                }
                GameMode::Paused => {
                    info!("Blue button pressed, game paused");
                    self.feedback.message("Game paused", None);
                }
            }
            self.time.delay_ms(BUTTON_SETTLE_MS).await;
        }
    }

    fn send(&mut self, command: Command) -> Result<(), LinkError> {
        let payload = command
            .to_payload()
            .map_err(|_| LinkError::PayloadTooLong)?;
        match self.link.send(self.maze_peer, &payload) {
            Ok(()) => {
                debug!("Sent {:?} to {}", command, self.maze_peer);
                Ok(())
            }
            Err(e) => {
                warn!("Send {:?} failed: {:?}", command, e);
                Err(e)
            }
        }
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn accelerometer_mut(&mut self) -> &mut A {
        &mut self.accelerometer
    }

    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }

    pub fn feedback(&self) -> &Feedback<D, I> {
        &self.feedback
    }

    pub fn time(&self) -> &T {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut T {
        &mut self.time
    }
}
