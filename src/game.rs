// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! The turn loop: read a move, check it, apply it, hand over to the other player.
//!
//! Moves arrive as three lines, `row`, `column` and `direction`. A row or column that isn't an
//! integer is reported and the move is read again from its first line. Running out of input
//! while any of the three is awaited ends the game with [`GameError::UnexpectedEndOfInput`].

use crate::{Board, BoardValue, Cell, Direction, InvalidMoveError, InvalidMoveType, Position};
use core::convert::Infallible;
use core::fmt::{Display, Formatter};
use core::num::IntErrorKind;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const BAD_NUMBER: &str = "Invalid input! Please enter valid integers for row and column.";
const REJECTED: &str = "Invalid move! Please try again.";

/// One of the two players taking turns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    /// Player 1, who moves first.
    One,
    /// Player 2.
    Two,
}

impl Player {
    /// The player who moves after this one.
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Position of this player's entry in [`GameLoop::scores`].
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "player {}", self.index() + 1)
    }
}

/// What became of one move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome<V> {
    /// The cell moved from `from` to `to`.
    Moved {
        /// Where the cell was.
        from: Position<V>,
        /// Where it is now.
        to: Position<V>,
    },
    /// The move passed validation, but the destination wasn't empty so nothing moved. The turn
    /// still passes to the other player.
    Blocked(InvalidMoveError),
    /// The move was refused; the same player goes again.
    Rejected(InvalidMoveError),
}

/// Fatal problems while playing.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The input ended while part of a move was still expected.
    #[error("input ended while waiting for the {awaiting}")]
    UnexpectedEndOfInput {
        /// The field being read.
        awaiting: &'static str,
    },
    /// Reading input or writing output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A game in progress: the board plus the input moves come from and the output the board is
/// drawn to.
#[derive(Debug)]
pub struct GameLoop<V, R, W> {
    board: Board<V>,
    input: R,
    output: W,
    player: Player,
    scores: [u32; 2],
}

impl<V, R, W> GameLoop<V, R, W>
where
    V: BoardValue,
    R: BufRead,
    W: Write,
{
    /// Start a game on `board` with player 1 to move.
    pub fn new(board: Board<V>, input: R, output: W) -> Self {
        Self {
            board,
            input,
            output,
            player: Player::One,
            scores: [0; 2],
        }
    }

    /// The board as it stands.
    pub fn board(&self) -> &Board<V> {
        &self.board
    }

    /// Whose turn it is.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Per-player scores. Nothing awards points yet, so these stay at zero.
    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    /// Take the board and output back, ending the game.
    pub fn into_parts(self) -> (Board<V>, W) {
        (self.board, self.output)
    }

    /// Draw the board to the output.
    pub fn render(&mut self) -> Result<(), GameError> {
        write!(self.output, "{}", self.board)?;
        self.output.flush()?;
        Ok(())
    }

    fn read_field(&mut self, awaiting: &'static str) -> Result<String, GameError> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        // a blank line counts as the end of input
        let field = line.trim_end();
        if field.is_empty() {
            return Err(GameError::UnexpectedEndOfInput { awaiting });
        }
        Ok(field.to_string())
    }

    fn read_coordinate(&mut self, awaiting: &'static str) -> Result<Option<i64>, GameError> {
        let field = self.read_field(awaiting)?;
        match field.trim().parse::<i64>() {
            Ok(value) => Ok(Some(value)),
            // still an integer, just never on the board
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
            Err(err) if *err.kind() == IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
            Err(err) => {
                debug!(%field, %err, awaiting, "not an integer");
                writeln!(self.output, "{BAD_NUMBER}")?;
                Ok(None)
            }
        }
    }

    /// Read `row`, `column` and `direction`, re-reading from `row` until both coordinates parse.
    fn read_move(&mut self) -> Result<(i64, i64, String), GameError> {
        loop {
            let Some(row) = self.read_coordinate("row")? else {
                continue;
            };
            let Some(column) = self.read_coordinate("column")? else {
                continue;
            };
            let direction = self.read_field("direction")?;
            return Ok((row, column, direction));
        }
    }

    /// Turn raw input into a move the board can check: the direction must be named exactly and
    /// the source must not be empty or fixed.
    fn resolve(
        &self,
        row: i64,
        column: i64,
        direction: &str,
    ) -> Result<(Position<V>, Direction), InvalidMoveError> {
        let reject = |direction: Option<Direction>, variant: InvalidMoveType| InvalidMoveError {
            row,
            column,
            direction,
            variant,
        };
        let dir: Direction = direction
            .parse()
            .map_err(|_| reject(None, InvalidMoveType::InvalidDirection(direction.to_string())))?;
        let source = Position::from_signed(row, column)
            .filter(|p| self.board.get(*p).is_some())
            .ok_or_else(|| reject(Some(dir), InvalidMoveType::InvalidSource))?;
        match self.board.get(source) {
            Some(cell @ (Cell::Empty | Cell::Fixed)) => {
                Err(reject(Some(dir), InvalidMoveType::Immovable(cell)))
            }
            _ => Ok((source, dir)),
        }
    }

    /// Read and play a single move.
    pub fn step(&mut self) -> Result<TurnOutcome<V>, GameError> {
        let (row, column, direction) = self.read_move()?;
        let checked = self
            .resolve(row, column, &direction)
            .and_then(|(source, dir)| self.board.check_move(source, dir).map(|_| (source, dir)));
        let (source, dir) = match checked {
            Ok(request) => request,
            Err(err) => {
                warn!(player = %self.player, %err, "move rejected");
                writeln!(self.output, "{REJECTED}")?;
                return Ok(TurnOutcome::Rejected(err));
            }
        };

        let outcome = match self.board.do_move(source, dir) {
            Ok(to) => {
                debug!(player = %self.player, from = %source, %to, "moved");
                self.render()?;
                TurnOutcome::Moved { from: source, to }
            }
            Err(err) => {
                warn!(player = %self.player, %err, "move blocked");
                writeln!(self.output, "{}", err.variant().prompt())?;
                TurnOutcome::Blocked(err)
            }
        };
        self.player = self.player.other();
        Ok(outcome)
    }

    /// Draw the starting board, then play moves until the input runs out or fails. The loop has no
    /// other way to end, so this only ever returns an error.
    pub fn run(&mut self) -> Result<Infallible, GameError> {
        info!(
            rows = %self.board.dimensions().rows(),
            columns = %self.board.dimensions().columns(),
            "game started"
        );
        self.render()?;
        loop {
            self.step()?;
        }
    }
}
