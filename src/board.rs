// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

use crate::{BoardValue, Dimensions, Direction, Orientation, Position};
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

/// The shape of a movable piece. The kind is what a piece's head cell records.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum PieceKind {
    /// A 1×1 piece (`a`).
    Single,
    /// A two-cell piece (`b`).
    Domino,
    /// A three-cell piece (`c`).
    Triple,
    /// A 2×2 piece (`d`).
    Square,
}

impl PieceKind {
    /// The board symbol of this kind.
    pub fn symbol(self) -> char {
        match self {
            PieceKind::Single => 'a',
            PieceKind::Domino => 'b',
            PieceKind::Triple => 'c',
            PieceKind::Square => 'd',
        }
    }

    /// Look up a kind by its (lowercase) board symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'a' => Some(PieceKind::Single),
            'b' => Some(PieceKind::Domino),
            'c' => Some(PieceKind::Triple),
            'd' => Some(PieceKind::Square),
            _ => None,
        }
    }
}

/// The content of a single board cell.
///
/// Two cells belong to "the same piece" exactly when their contents compare equal; there is no
/// separate piece identifier. Every head of a given kind is therefore equal to every other head of
/// that kind, while body cells only ever equal cells carrying the same label.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum Cell {
    /// Traversable and unoccupied.
    #[default]
    Empty,
    /// A permanent obstacle (`x`).
    Fixed,
    /// Part of the goal region (`s`).
    Sink,
    /// The canonical cell of a piece.
    Head(PieceKind),
    /// A non-head cell of a multi-cell piece, labelled with the linear index it was placed at.
    Body(usize),
}

impl Cell {
    /// Whether the cell is [`Cell::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Cell::Empty => f.write_str(" "),
            Cell::Fixed => f.write_str("x"),
            Cell::Sink => f.write_str("s"),
            Cell::Head(kind) => write!(f, "{}", kind.symbol()),
            Cell::Body(index) => write!(f, "{index:>2}"),
        }
    }
}

/// A fixed-size rectangular grid of [`Cell`]s, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "RawBoard<V>", bound(deserialize = "V: BoardValue"))]
pub struct Board<V> {
    dim: Dimensions<V>,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "V: BoardValue"))]
struct RawBoard<V> {
    dim: Dimensions<V>,
    cells: Vec<Cell>,
}

/// A board snapshot whose cells don't cover its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a board with {expected} cells was given {found}")]
pub struct CellCountError {
    expected: usize,
    found: usize,
}

impl<V> TryFrom<RawBoard<V>> for Board<V>
where
    V: BoardValue,
{
    type Error = CellCountError;

    fn try_from(RawBoard { dim, cells }: RawBoard<V>) -> Result<Self, Self::Error> {
        if cells.len() != dim.area() {
            return Err(CellCountError {
                expected: dim.area(),
                found: cells.len(),
            });
        }
        Ok(Self { dim, cells })
    }
}

impl<V> Board<V> {
    /// The dimensions of this board.
    pub fn dimensions(&self) -> &Dimensions<V> {
        &self.dim
    }

    /// The [`Vec`] which represents the board literally, row by row.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl<V> Board<V>
where
    V: BoardValue,
{
    /// An all-empty board of the given dimensions.
    pub fn new(dim: Dimensions<V>) -> Self {
        Self {
            cells: vec![Cell::Empty; dim.area()],
            dim,
        }
    }

    /// Produce an all-empty board from anything convertible into dimensions.
    pub fn empty<D: TryInto<Dimensions<V>>>(dim: D) -> Result<Self, D::Error> {
        Ok(Self::new(dim.try_into()?))
    }

    /// Fetches the content of the requested position, or [`None`] if the position doesn't exist in
    /// the board.
    pub fn get<P: Into<Position<V>>>(&self, position: P) -> Option<Cell> {
        position
            .into()
            .as_index(&self.dim)
            .and_then(|p| self.cells.get(p).copied())
    }

    /// Whether the position exists and holds [`Cell::Empty`].
    pub fn is_empty<P: Into<Position<V>>>(&self, position: P) -> bool {
        self.get(position).is_some_and(|cell| cell.is_empty())
    }

    /// Overwrite a cell, returning what it held before. Out-of-bounds positions are left alone.
    pub(crate) fn set(&mut self, position: Position<V>, cell: Cell) -> Option<Cell> {
        let idx = position.as_index(&self.dim)?;
        self.cells
            .get_mut(idx)
            .map(|slot| core::mem::replace(slot, cell))
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Every position whose content equals the content at `position`, in row-major order.
    ///
    /// Grouping is by content alone, so querying one `a` head returns every `a` head on the board,
    /// and querying an empty cell returns every empty cell. Out-of-bounds queries return nothing.
    pub fn piece_fields<P: Into<Position<V>>>(&self, position: P) -> Vec<Position<V>> {
        let Some(target) = self.get(position) else {
            return Vec::new();
        };
        self.dim
            .positions()
            .filter(|p| self.get(*p) == Some(target))
            .collect()
    }

    /// Determine how the content at `position` is drawn: [`Orientation::UpDown`] if both vertical
    /// neighbours hold the same content, [`Orientation::LeftRight`] if both horizontal neighbours
    /// do, and [`None`] otherwise. Neighbours off the board never match.
    pub fn piece_orientation<P: Into<Position<V>>>(&self, position: P) -> Option<Orientation> {
        let position = position.into();
        let here = self.get(position)?;
        let same = |dir: Direction| {
            position
                .shift(dir, V::one())
                .and_then(|neighbour| self.get(neighbour))
                == Some(here)
        };
        if same(Direction::Up) && same(Direction::Down) {
            Some(Orientation::UpDown)
        } else if same(Direction::Left) && same(Direction::Right) {
            Some(Orientation::LeftRight)
        } else {
            None
        }
    }
}

impl<V> Display for Board<V>
where
    V: BoardValue,
{
    // Row zero is drawn at the bottom, with column headers above the grid.
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let columns: usize = (*self.dim.columns()).into();
        let border = "--+".repeat(columns);

        write!(f, " ")?;
        for column in 0..columns {
            write!(f, "{column:3}")?;
        }
        writeln!(f)?;

        for (row, cells) in self.cells.chunks(columns).enumerate().rev() {
            writeln!(f, "  +{border}")?;
            write!(f, "{row} |")?;
            for cell in cells {
                let label = cell.to_string();
                write!(f, "{label:<2}|")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  +{border}")
    }
}

#[cfg(test)]
mod test {
    use crate::{Board, Cell, Orientation, PieceKind, Position};
    use std::error::Error;

    #[test]
    fn empty_board() -> Result<(), Box<dyn Error>> {
        let board = Board::empty((2u8, 3))?;
        println!("{board}");
        assert_eq!(6, board.cells().len());
        assert!(board.cells().iter().all(Cell::is_empty));
        assert_eq!(Some(Cell::Empty), board.get((1, 2)));
        assert_eq!(None, board.get((2, 0)));
        assert_eq!(None, board.get((0, 3)));
        assert!(board.is_empty((0, 0)));
        assert!(!board.is_empty((5, 5)));
        Ok(())
    }

    #[test]
    fn piece_fields_group_by_content() -> Result<(), Box<dyn Error>> {
        let mut board = Board::empty((3u8, 3))?;
        board.set(Position::from((0, 0)), Cell::Head(PieceKind::Single));
        board.set(Position::from((2, 2)), Cell::Head(PieceKind::Single));
        board.set(Position::from((1, 1)), Cell::Head(PieceKind::Domino));
        board.set(Position::from((1, 2)), Cell::Body(5));
        println!("{board}");

        // every `a` head is reported, not only the one queried
        assert_eq!(
            vec![Position::from((0, 0)), Position::from((2, 2))],
            board.piece_fields((2, 2))
        );
        assert_eq!(vec![Position::from((1, 2))], board.piece_fields((1, 2)));
        assert_eq!(5, board.piece_fields((0, 1)).len());
        assert!(board.piece_fields((3, 0)).is_empty());

        let blank = Board::empty((2u8, 2))?;
        assert_eq!(4, blank.piece_fields((1, 1)).len());
        Ok(())
    }

    #[test]
    fn piece_orientation() -> Result<(), Box<dyn Error>> {
        let mut board = Board::empty((3u8, 3))?;
        for row in 0..3 {
            board.set(Position::from((row, 0)), Cell::Sink);
        }
        board.set(Position::from((1, 2)), Cell::Fixed);
        println!("{board}");

        assert_eq!(Some(Orientation::UpDown), board.piece_orientation((1, 0)));
        assert_eq!(Some(Orientation::UpDown), board.piece_orientation((1, 1)));
        // the top neighbour is off the board
        assert_eq!(None, board.piece_orientation((0, 0)));
        assert_eq!(None, board.piece_orientation((1, 2)));
        assert_eq!(None, board.piece_orientation((9, 9)));

        let mut row = Board::empty((1u8, 3))?;
        assert_eq!(Some(Orientation::LeftRight), row.piece_orientation((0, 1)));
        row.set(Position::from((0, 2)), Cell::Head(PieceKind::Single));
        assert_eq!(None, row.piece_orientation((0, 1)));
        Ok(())
    }

    #[test]
    fn render() -> Result<(), Box<dyn Error>> {
        let mut board = Board::empty((2u8, 2))?;
        board.set(Position::from((0, 0)), Cell::Head(PieceKind::Domino));
        board.set(Position::from((0, 1)), Cell::Body(1));
        board.set(Position::from((1, 1)), Cell::Fixed);
        let expected = concat!(
            "   0  1\n",
            "  +--+--+\n",
            "1 |  |x |\n",
            "  +--+--+\n",
            "0 |b | 1|\n",
            "  +--+--+\n",
        );
        assert_eq!(expected, board.to_string());
        Ok(())
    }

    #[test]
    fn snapshot() -> Result<(), Box<dyn Error>> {
        let mut board = Board::empty((2u8, 2))?;
        board.set(Position::from((1, 0)), Cell::Sink);
        board.set(Position::from((0, 1)), Cell::Body(1));
        let json = serde_json::to_string(&board)?;
        let restored: Board<u8> = serde_json::from_str(&json)?;
        assert_eq!(board, restored);

        // snapshots go through the same checks as a freshly built board
        let short = r#"{"dim":{"rows":2,"columns":2},"cells":["Empty"]}"#;
        let err = serde_json::from_str::<Board<u8>>(short).unwrap_err();
        assert!(err.to_string().contains("a board with 4 cells was given 1"));
        let flat = r#"{"dim":{"rows":2,"columns":0},"cells":[]}"#;
        assert!(serde_json::from_str::<Board<u8>>(flat).is_err());
        Ok(())
    }
}
