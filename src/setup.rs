// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Initial board layout from placement commands.
//!
//! Each command is a single line whose fields sit at fixed character offsets:
//!
//! ```text
//! offset: 0      2       4     6
//!         <type> <shape> <row> <col>
//! ```
//!
//! `s` places a `shape`×`shape` sink, `x` places a fixed obstacle (the shape field may be left
//! out, as in `x 2 2`), and `l` places a piece of shape `a`, `b`, `c` or `d`. The `d` family
//! upper-cases its shape code, and upper-case codes have no footprint, so it writes nothing. The
//! stream ends at a line holding only `#`.

use crate::{Board, BoardValue, Cell, Dimensions, PieceKind, Position};
use std::io::BufRead;
use tracing::{debug, warn};

const TERMINATOR: &str = "#";

/// Fatal problems with the placement stream. No board is produced once one is raised.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The sink would stick out of the board.
    #[error("sink of size {size} at ({row}, {column}) is in the wrong position")]
    SinkOutOfRange {
        /// Side length of the sink.
        size: usize,
        /// Row of the sink's origin.
        row: usize,
        /// Column of the sink's origin.
        column: usize,
    },
    /// A sink command lacks a digit size, row or column.
    #[error("missing information for 's' object in {line:?}")]
    MissingSinkInformation {
        /// The offending command.
        line: String,
    },
    /// An obstacle command lacks a digit row or column.
    #[error("missing coordinate for 'x' object in {line:?}")]
    MissingObstacleCoordinate {
        /// The offending command.
        line: String,
    },
    /// A piece command lacks a digit row or column.
    #[error("missing coordinate for '{object}' piece in {line:?}")]
    MissingPieceCoordinate {
        /// The orientation family, `l` or `d`.
        object: char,
        /// The offending command.
        line: String,
    },
    /// The obstacle is not on the board.
    #[error("obstacle at ({row}, {column}) is outside the board")]
    ObstacleOutOfRange {
        /// Row of the obstacle.
        row: usize,
        /// Column of the obstacle.
        column: usize,
    },
    /// Part of the piece's footprint is not on the board.
    #[error("piece '{shape}' at ({row}, {column}) does not fit on the board")]
    PieceOutOfRange {
        /// Shape code after case normalisation.
        shape: char,
        /// Row of the piece's head.
        row: usize,
        /// Column of the piece's head.
        column: usize,
    },
    /// The stream ended before the terminator.
    #[error("input ended before the '#' terminator")]
    UnexpectedEndOfInput,
    /// Reading the stream failed.
    #[error("failed to read placement commands: {0}")]
    Io(#[from] std::io::Error),
}

/// The area a shape code covers, as `height`×`width` cells anchored at the head.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Footprint {
    height: usize,
    width: usize,
    kind: Option<PieceKind>,
}

impl Footprint {
    /// Look up a case-normalised shape code. Only the lowercase codes `a` to `d` have a
    /// footprint; anything else, the upper-cased codes of the `d` family included, covers nothing.
    pub fn lookup(shape: char) -> Self {
        let (height, width) = match shape {
            'a' => (1, 1),
            'b' => (1, 2),
            'c' => (1, 3),
            'd' => (2, 2),
            _ => (0, 0),
        };
        Self {
            height,
            width,
            kind: PieceKind::from_symbol(shape),
        }
    }

    /// Rows covered.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns covered.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The kind written to the head cell, or `None` for an unknown code.
    pub fn kind(&self) -> Option<PieceKind> {
        self.kind
    }
}

/// One decoded placement command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// A `size`×`size` sink with its top-left corner at `(row, column)`.
    Sink {
        /// Side length.
        size: usize,
        /// Origin row.
        row: usize,
        /// Origin column.
        column: usize,
    },
    /// A fixed obstacle.
    Obstacle {
        /// Row.
        row: usize,
        /// Column.
        column: usize,
    },
    /// A piece whose head sits at `(row, column)`.
    Piece {
        /// Shape code after case normalisation.
        shape: char,
        /// Head row.
        row: usize,
        /// Head column.
        column: usize,
    },
}

fn field(line: &str, offset: usize) -> Option<char> {
    line.chars().nth(offset)
}

fn digit(line: &str, offset: usize) -> Option<usize> {
    field(line, offset)
        .and_then(|c| c.to_digit(10))
        .map(|d| d as usize)
}

impl Placement {
    /// Decode a command line. Blank lines and unknown object types decode to `Ok(None)`.
    pub fn decode(line: &str) -> Result<Option<Self>, SetupError> {
        let placement = match field(line, 0) {
            Some('s') => match (digit(line, 2), digit(line, 4), digit(line, 6)) {
                (Some(size), Some(row), Some(column)) => Placement::Sink { size, row, column },
                _ => {
                    return Err(SetupError::MissingSinkInformation {
                        line: line.to_string(),
                    });
                }
            },
            Some('x') => match (digit(line, 2), digit(line, 4), field(line, 6)) {
                (_, Some(row), Some(_)) => match digit(line, 6) {
                    Some(column) => Placement::Obstacle { row, column },
                    None => {
                        return Err(SetupError::MissingObstacleCoordinate {
                            line: line.to_string(),
                        });
                    }
                },
                // compact form: `x <row> <col>`
                (Some(row), Some(column), None) => Placement::Obstacle { row, column },
                _ => {
                    return Err(SetupError::MissingObstacleCoordinate {
                        line: line.to_string(),
                    });
                }
            },
            Some(object @ ('d' | 'l')) => {
                let shape = field(line, 2).map(|c| match object {
                    'd' => c.to_ascii_uppercase(),
                    _ => c.to_ascii_lowercase(),
                });
                match (digit(line, 4), digit(line, 6)) {
                    (Some(row), Some(column)) => Placement::Piece {
                        shape: shape.unwrap_or(' '),
                        row,
                        column,
                    },
                    _ => {
                        return Err(SetupError::MissingPieceCoordinate {
                            object,
                            line: line.to_string(),
                        });
                    }
                }
            }
            Some(other) => {
                warn!(object = %other, line, "skipping command with unknown object type");
                return Ok(None);
            }
            None => return Ok(None),
        };
        Ok(Some(placement))
    }
}

/// Builds the initial [`Board`] by applying placements in order. Later placements overwrite
/// whatever earlier ones wrote; only range checks are performed.
#[derive(Debug)]
pub struct BoardBuilder<V> {
    board: Board<V>,
}

impl<V> BoardBuilder<V>
where
    V: BoardValue,
{
    /// Start from an empty board of the given dimensions.
    pub fn new(dim: Dimensions<V>) -> Self {
        Self {
            board: Board::new(dim),
        }
    }

    /// The board as laid out so far.
    pub fn board(&self) -> &Board<V> {
        &self.board
    }

    fn position(&self, row: usize, column: usize) -> Option<Position<V>> {
        Position::from_indices(row, column).filter(|p| p.as_index(self.board.dimensions()).is_some())
    }

    /// Apply one decoded placement.
    pub fn apply(&mut self, placement: Placement) -> Result<(), SetupError> {
        let dim = *self.board.dimensions();
        match placement {
            Placement::Sink { size, row, column } => {
                if !dim.contains_square(row, column, size) {
                    return Err(SetupError::SinkOutOfRange { size, row, column });
                }
                for r in row..row + size {
                    for c in column..column + size {
                        if let Some(p) = self.position(r, c) {
                            self.board.set(p, Cell::Sink);
                        }
                    }
                }
            }
            Placement::Obstacle { row, column } => {
                let p = self
                    .position(row, column)
                    .ok_or(SetupError::ObstacleOutOfRange { row, column })?;
                self.board.set(p, Cell::Fixed);
            }
            Placement::Piece {
                shape, row, column, ..
            } => {
                let footprint = Footprint::lookup(shape);
                let Some(kind) = footprint.kind().filter(|_| footprint.height() > 0) else {
                    warn!(%shape, row, column, "unknown shape code places nothing");
                    return Ok(());
                };
                let columns: usize = (*dim.columns()).into();
                let mut cells = Vec::with_capacity(footprint.height() * footprint.width());
                for i in 0..footprint.height() {
                    for j in 0..footprint.width() {
                        let (r, c) = (row + i, column + j);
                        let p = self
                            .position(r, c)
                            .ok_or(SetupError::PieceOutOfRange { shape, row, column })?;
                        let cell = if i == 0 && j == 0 {
                            Cell::Head(kind)
                        } else {
                            Cell::Body(r * columns + c)
                        };
                        cells.push((p, cell));
                    }
                }
                for (p, cell) in cells {
                    self.board.set(p, cell);
                }
            }
        }
        debug!(?placement, "placed");
        Ok(())
    }

    /// Decode and apply one command line.
    pub fn apply_line(&mut self, line: &str) -> Result<(), SetupError> {
        match Placement::decode(line)? {
            Some(placement) => self.apply(placement),
            None => Ok(()),
        }
    }

    /// Consume placement commands from `reader` up to the `#` terminator and return the finished
    /// board. Running out of input first is an error, as is any malformed command.
    pub fn build<R: BufRead>(mut self, mut reader: R) -> Result<Board<V>, SetupError> {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(SetupError::UnexpectedEndOfInput);
            }
            let command = line.trim_end_matches(['\n', '\r']);
            if command.trim_end() == TERMINATOR {
                return Ok(self.board);
            }
            self.apply_line(command)?;
        }
    }
}
