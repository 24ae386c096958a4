//! Maze node session: wait for a command, apply it, reply, re-render.

use super::SessionError;
use crate::config::GRID_ROWS;
use crate::link::{register_logged, Datagram, Link, LinkError};
use crate::maze::Maze;
use crate::output::PixelMatrix;
use invisyrinth_proto::{parse_command, Command, PeerAddress, Serialize, Status};

/// Maze-side session state.
pub struct MazeSession<L, M> {
    link: L,
    controller_peer: PeerAddress,
    maze: Maze,
    matrix: M,
}

impl<L: Link, M: PixelMatrix> MazeSession<L, M> {
    pub fn new(link: L, controller_peer: PeerAddress, maze: Maze, matrix: M) -> Self {
        Self {
            link,
            controller_peer,
            maze,
            matrix,
        }
    }

    /// Register the controller and show the initial board.
    pub fn start(&mut self) {
        register_logged(&mut self.link, self.controller_peer, "Controller");
        info!("Maze ready, waiting for steps");
        info!("Start: {:?}", self.maze.start());
        info!("Goal: {:?}", self.maze.goal());
        self.render();
    }

    /// Run forever.
    pub async fn run(&mut self) -> ! {
        self.start();
        loop {
            // Failures are already logged; the next datagram is independent.
            let _ = self.process_one().await;
        }
    }

    /// Wait for one datagram and handle it.
    pub async fn process_one(&mut self) -> Result<Status, SessionError> {
        let datagram = self.link.recv().await;
        self.handle_datagram(&datagram)
    }

    /// Decode, apply and answer a single datagram.
    ///
    /// The reply goes to whoever sent the command. Undecodable datagrams get
    /// no reply and leave the maze untouched.
    pub fn handle_datagram(&mut self, datagram: &Datagram) -> Result<Status, SessionError> {
        trace!(
            "Datagram from {}: {} bytes",
            datagram.peer,
            datagram.payload.len()
        );

        let command = match parse_command(&datagram.payload) {
            Ok(command) => command,
            Err(e) => {
                warn!("Discarding datagram from {}: {:?}", datagram.peer, e);
                return Err(e.into());
            }
        };

        let status = self.apply(command);
        self.reply(datagram.peer, &status)?;
        Ok(status)
    }

    /// Apply a command to the maze and re-render.
    pub fn apply(&mut self, command: Command) -> Status {
        let status = match command {
            Command::Reset => {
                self.maze.reset();
                info!("Game reset");
                Status::ResetOk
            }
            Command::Step(vector) => {
                info!("Step received: {:?}", vector);
                self.maze.apply_step(vector)
            }
        };
        info!("Status: {:?}, position {:?}", status, self.maze.position());
        self.render();
        status
    }

    fn reply(&mut self, peer: PeerAddress, status: &Status) -> Result<(), LinkError> {
        let payload = status
            .to_payload()
            .map_err(|_| LinkError::PayloadTooLong)?;
        self.link.send(peer, &payload).inspect_err(|e| {
            warn!("Reply to {} failed: {:?}", peer, e);
        })
    }

    fn render(&mut self) {
        for row in 0..GRID_ROWS {
            let text = self.maze.row_text(row);
            debug!("{}", text.as_str());
        }
        if let Err(e) = self.maze.draw(&mut self.matrix) {
            warn!("Matrix update failed: {:?}", e);
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut M {
        &mut self.matrix
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::maze::Position;
    use crate::mock::{block_on, MockLink, MockMatrix};
    use invisyrinth_proto::{MoveVector, ParseError};
    use std::vec;

    const CONTROLLER: PeerAddress = PeerAddress::new([0x74, 0x4d, 0xbd, 0xa1, 0x0a, 0xbc]);
    const STRANGER: PeerAddress = PeerAddress::new([2, 0, 0, 0, 0, 1]);

    fn session() -> MazeSession<MockLink, MockMatrix> {
        let mut s = MazeSession::new(
            MockLink::new(),
            CONTROLLER,
            Maze::standard(),
            MockMatrix::new(),
        );
        s.start();
        s
    }

    fn deliver(
        s: &mut MazeSession<MockLink, MockMatrix>,
        payload: &[u8],
    ) -> Result<Status, SessionError> {
        s.link_mut().push(CONTROLLER, payload);
        block_on(s.process_one())
    }

    #[test]
    fn test_start_registers_and_renders() {
        let s = session();
        assert!(s.link().peers.contains(&CONTROLLER));
        assert_eq!(s.matrix().presented, 1);
        assert!(s.matrix().shown[1][1]);
    }

    #[test]
    fn test_wall_reply() {
        let mut s = session();
        assert_eq!(deliver(&mut s, b"1,0"), Ok(Status::Wall(MoveVector::DOWN)));
        assert_eq!(s.maze().position(), Position::new(1, 1));
        assert_eq!(s.link().sent_text(), vec!["wall,1,0"]);
        assert_eq!(s.link().sent[0].0, CONTROLLER);
    }

    #[test]
    fn test_ok_reply_moves_player() {
        let mut s = session();
        assert_eq!(deliver(&mut s, b"0,1"), Ok(Status::Ok));
        assert_eq!(s.maze().position(), Position::new(1, 2));
        assert_eq!(s.link().sent_text(), vec!["ok"]);
        assert!(s.matrix().shown[1][2]);
        assert!(!s.matrix().shown[1][1]);
        assert_eq!(s.matrix().presented, 2);
    }

    #[test]
    fn test_goal_reply() {
        let mut s = session();
        // Walk to the cell just above the goal.
        for step in [
            "0,1", "0,1", "0,1", "0,1", "1,0", "1,0", "0,-1", "0,-1", "0,-1", "1,0", "1,0", "1,0",
            "0,-1",
        ] {
            assert_eq!(deliver(&mut s, step.as_bytes()), Ok(Status::Ok), "step {step}");
        }
        assert_eq!(s.maze().position(), Position::new(6, 1));
        assert_eq!(deliver(&mut s, b"1,0"), Ok(Status::Goal));
        assert_eq!(s.link().sent_text().last().unwrap(), "goal");
    }

    #[test]
    fn test_reset_reply() {
        let mut s = session();
        assert_eq!(deliver(&mut s, b"0,1"), Ok(Status::Ok));
        assert_eq!(deliver(&mut s, b"reset"), Ok(Status::ResetOk));
        assert_eq!(s.maze().position(), Position::new(1, 1));
        assert_eq!(s.link().sent_text(), vec!["ok", "reset_ok"]);
    }

    #[test]
    fn test_garbage_is_discarded_without_reply() {
        let mut s = session();
        assert_eq!(
            deliver(&mut s, b"foo"),
            Err(SessionError::Decode(ParseError::Format))
        );
        assert!(s.link().sent.is_empty());
        assert_eq!(s.maze().position(), Position::new(1, 1));
        // Not even re-rendered.
        assert_eq!(s.matrix().presented, 1);
    }

    #[test]
    fn test_duplicate_step_applies_twice() {
        // The link may duplicate; each copy is a fresh step from wherever the player is.
        let mut s = session();
        assert_eq!(deliver(&mut s, b"0,1"), Ok(Status::Ok));
        assert_eq!(deliver(&mut s, b"0,1"), Ok(Status::Ok));
        assert_eq!(s.maze().position(), Position::new(1, 3));
        assert_eq!(s.link().sent_text(), vec!["ok", "ok"]);
    }

    #[test]
    fn test_duplicate_reset_is_harmless() {
        let mut s = session();
        assert_eq!(deliver(&mut s, b"reset"), Ok(Status::ResetOk));
        assert_eq!(deliver(&mut s, b"reset"), Ok(Status::ResetOk));
        assert_eq!(s.maze().position(), Position::new(1, 1));
        assert_eq!(s.link().sent_text(), vec!["reset_ok", "reset_ok"]);
    }

    #[test]
    fn test_reply_goes_to_sender() {
        let mut s = session();
        s.link_mut().register_peer(STRANGER).unwrap();
        s.link_mut().push(STRANGER, b"0,1");
        assert_eq!(block_on(s.process_one()), Ok(Status::Ok));
        assert_eq!(s.link().sent[0].0, STRANGER);
    }

    #[test]
    fn test_reply_failure_keeps_the_move() {
        let mut s = session();
        s.link_mut().fail_sends = true;
        assert_eq!(
            deliver(&mut s, b"0,1"),
            Err(SessionError::Link(LinkError::SendFailed))
        );
        assert_eq!(s.maze().position(), Position::new(1, 2));
    }

    #[test]
    fn test_matrix_failure_is_not_fatal() {
        let mut s = session();
        s.matrix_mut().fail = true;
        assert_eq!(deliver(&mut s, b"0,1"), Ok(Status::Ok));
        assert_eq!(s.link().sent_text(), vec!["ok"]);
    }
}
