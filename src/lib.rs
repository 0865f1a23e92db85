// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! sink-slider: a turn-based sliding puzzle played toward a sink region.
//!
//! A rectangular board is laid out from a stream of fixed-width placement commands: fixed
//! obstacles, a square "sink" region which pieces are meant to reach, and movable pieces of four
//! shapes. Players then take turns sliding the contents of one cell a single grid step at a time.
//! This library implements the board model ([`Board`]), the placement decoder
//! ([`setup::BoardBuilder`]), the single-step movement rules ([`Board::validate_move`] and
//! [`Board::do_move`]) and a line-oriented turn loop ([`game::GameLoop`]). Whether anyone has
//! actually won is left to the user.

use core::fmt::{Debug, Display, Formatter};
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use core::str::FromStr;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, One, Unsigned, Zero};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

mod board;
pub mod game;
mod moves;
pub mod setup;

pub use board::{Board, Cell, CellCountError, PieceKind};
pub use moves::{InvalidMoveError, InvalidMoveType};

/// The axis along which a two-cell run of identical content is drawn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum Orientation {
    /// Drawn top-to-bottom ("upright").
    UpDown,
    /// Drawn left-to-right ("lying").
    LeftRight,
}

/// A direction for a move. A direction may be flipped with [`Neg`] (i.e. `-`).
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum Direction {
    /// Upward movement (towards row zero).
    Up,
    /// Downward movement.
    Down,
    /// Leftward movement (towards column zero).
    Left,
    /// Rightward movement.
    Right,
}

impl Direction {
    /// Every direction, in the order moves are enumerated.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

impl Neg for Direction {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Raised when a direction name is not exactly one of `up`, `down`, `left` or `right`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction {0:?}: expected one of 'up', 'down', 'left', 'right'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    // Case-sensitive on purpose: "Up" is not a direction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Marker trait: specifies that a value may be used for board definitions.
pub trait BoardValue:
    One
    + Ord
    + Add<Output = Self>
    + CheckedAdd
    + Sub<Output = Self>
    + CheckedSub
    + AddAssign
    + SubAssign
    + Copy
    + Into<usize>
    + TryFrom<usize>
    + Zero
    + CheckedMul
    + Debug
    + Display
    + Unsigned
    + DeserializeOwned
    + Serialize
    + 'static
{
}

impl<V> BoardValue for V where
    V: One
        + Ord
        + Add<Output = Self>
        + CheckedAdd
        + Sub<Output = Self>
        + CheckedSub
        + AddAssign
        + SubAssign
        + Copy
        + Into<usize>
        + TryFrom<usize>
        + Zero
        + CheckedMul
        + Debug
        + Display
        + Unsigned
        + DeserializeOwned
        + Serialize
        + 'static
{
}

/// A position in the board (eff., a coordinate pair). Row zero is the first row placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Position<V> {
    row: V,
    column: V,
}

impl<V> Position<V> {
    /// The row of the position.
    pub fn row(&self) -> &V {
        &self.row
    }

    /// The column of the position.
    pub fn column(&self) -> &V {
        &self.column
    }
}

impl<V> Add for Position<V>
where
    V: BoardValue,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            row: self.row + rhs.row,
            column: self.column + rhs.column,
        }
    }
}

impl<V> Sub for Position<V>
where
    V: BoardValue,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            row: self.row - rhs.row,
            column: self.column - rhs.column,
        }
    }
}

impl<V> CheckedAdd for Position<V>
where
    V: BoardValue,
{
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(&rhs.row)?,
            column: self.column.checked_add(&rhs.column)?,
        })
    }
}

impl<V> CheckedSub for Position<V>
where
    V: BoardValue,
{
    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        Some(Self {
            row: self.row.checked_sub(&rhs.row)?,
            column: self.column.checked_sub(&rhs.column)?,
        })
    }
}

impl<V> Position<V>
where
    V: BoardValue,
{
    /// The position encoded as an index into a board with the provided dimensions, or `None` if
    /// it lies outside of them.
    pub fn as_index(&self, dim: &Dimensions<V>) -> Option<usize> {
        if self.row >= dim.rows || self.column >= dim.columns {
            return None;
        }
        let (row, column, columns): (usize, usize, usize) =
            (self.row.into(), self.column.into(), dim.columns.into());
        Some(row * columns + column)
    }

    /// Get the position `by` units away from this position in the provided direction `dir`, or
    /// `None` if the position would underflow or overflow `V`. Board bounds are not checked here.
    pub fn shift(&self, dir: Direction, by: V) -> Option<Self> {
        match dir {
            Direction::Up => self.checked_sub(&Self::from((by, V::zero()))),
            Direction::Down => self.checked_add(&Self::from((by, V::zero()))),
            Direction::Left => self.checked_sub(&Self::from((V::zero(), by))),
            Direction::Right => self.checked_add(&Self::from((V::zero(), by))),
        }
    }

    /// Build a position from plain indices, or `None` if either does not fit in `V`.
    pub fn from_indices(row: usize, column: usize) -> Option<Self> {
        Some(Self {
            row: V::try_from(row).ok()?,
            column: V::try_from(column).ok()?,
        })
    }

    /// Build a position from signed user input. Negative or oversized coordinates give `None`.
    pub fn from_signed(row: i64, column: i64) -> Option<Self> {
        Self::from_indices(usize::try_from(row).ok()?, usize::try_from(column).ok()?)
    }

    /// The coordinates as plain indices.
    pub fn indices(&self) -> (usize, usize) {
        (self.row.into(), self.column.into())
    }
}

impl<V> From<(V, V)> for Position<V> {
    fn from((row, column): (V, V)) -> Self {
        Self { row, column }
    }
}

impl<V> Display for Position<V>
where
    V: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The dimensions of a board in terms of rows and columns. Fixed once a board is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "RawDimensions<V>", bound(deserialize = "V: BoardValue"))]
pub struct Dimensions<V> {
    rows: V,
    columns: V,
}

#[derive(Deserialize)]
struct RawDimensions<V> {
    rows: V,
    columns: V,
}

impl<V> Dimensions<V> {
    /// The number of rows.
    pub fn rows(&self) -> &V {
        &self.rows
    }

    /// The number of columns.
    pub fn columns(&self) -> &V {
        &self.columns
    }
}

impl<V> Dimensions<V>
where
    V: BoardValue,
{
    /// Number of cells on a board of these dimensions.
    pub fn area(&self) -> usize {
        let (rows, columns): (usize, usize) = (self.rows.into(), self.columns.into());
        rows * columns
    }

    /// Whether a `size`×`size` square with its top-left corner at `(row, column)` lies wholly
    /// inside these dimensions.
    pub fn contains_square(&self, row: usize, column: usize, size: usize) -> bool {
        let (rows, columns): (usize, usize) = (self.rows.into(), self.columns.into());
        row.checked_add(size).is_some_and(|end| end <= rows)
            && column.checked_add(size).is_some_and(|end| end <= columns)
    }

    /// Iterate every position of these dimensions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position<V>> + use<V> {
        let (rows, columns): (usize, usize) = (self.rows.into(), self.columns.into());
        (0..rows).flat_map(move |row| {
            (0..columns).filter_map(move |column| Position::from_indices(row, column))
        })
    }
}

/// An error associated with the creation of the dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    /// The number of cells overflows the backing type.
    #[error("dimensions could not be used: the dimensions were too large")]
    TooLarge,
    /// Either side is zero.
    #[error("dimensions could not be used: the dimensions have zero area")]
    ZeroArea,
}

impl<V> TryFrom<(V, V)> for Dimensions<V>
where
    V: BoardValue,
{
    type Error = DimensionError;

    fn try_from((rows, columns): (V, V)) -> Result<Self, Self::Error> {
        if let Some(size) = rows.checked_mul(&columns) {
            if size.is_zero() {
                Err(DimensionError::ZeroArea)
            } else {
                Ok(Self { rows, columns })
            }
        } else {
            Err(DimensionError::TooLarge)
        }
    }
}

impl<V> TryFrom<RawDimensions<V>> for Dimensions<V>
where
    V: BoardValue,
{
    type Error = DimensionError;

    fn try_from(raw: RawDimensions<V>) -> Result<Self, Self::Error> {
        Self::try_from((raw.rows, raw.columns))
    }
}
