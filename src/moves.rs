// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

use crate::{Board, BoardValue, Cell, Direction, Position};
use core::error::Error;
use core::fmt::{Display, Formatter};

/// The type of invalid move that was observed in an [`InvalidMoveError`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidMoveType {
    /// The requested direction isn't one of `up`, `down`, `left` or `right`.
    InvalidDirection(String),
    /// The cell designated to be moved isn't on the board.
    InvalidSource,
    /// The cell designated to be moved is empty or an obstacle.
    Immovable(Cell),
    /// The destination is off the board.
    InvalidFinalPosition,
    /// The destination already holds the provided content.
    Occupied(Cell),
}

impl InvalidMoveType {
    /// The message shown to a player whose move was refused for this reason.
    pub fn prompt(&self) -> &'static str {
        match self {
            InvalidMoveType::InvalidDirection(_) => {
                "Invalid direction! Please provide a valid direction: 'up', 'down', 'left', 'right'."
            }
            InvalidMoveType::InvalidFinalPosition => "Cannot move outside the board!",
            InvalidMoveType::Occupied(_) => "Cannot move to a non-empty cell!",
            InvalidMoveType::InvalidSource | InvalidMoveType::Immovable(_) => {
                "Invalid move! Please try again."
            }
        }
    }
}

/// An error which describes an attempted invalid move. Rejecting a move never changes the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidMoveError {
    pub(crate) row: i64,
    pub(crate) column: i64,
    pub(crate) direction: Option<Direction>,
    pub(crate) variant: InvalidMoveType,
}

impl InvalidMoveError {
    pub(crate) fn new<V: BoardValue>(
        position: &Position<V>,
        direction: Direction,
        variant: InvalidMoveType,
    ) -> Self {
        let (row, column) = position.indices();
        Self {
            row: row as i64,
            column: column as i64,
            direction: Some(direction),
            variant,
        }
    }

    /// The row of the cell that was to be moved.
    pub fn row(&self) -> i64 {
        self.row
    }

    /// The column of the cell that was to be moved.
    pub fn column(&self) -> i64 {
        self.column
    }

    /// The requested direction, if it was a valid one.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Why the move was refused.
    pub fn variant(&self) -> &InvalidMoveType {
        &self.variant
    }
}

impl Display for InvalidMoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let (row, column) = (self.row, self.column);
        let dir = match (&self.direction, &self.variant) {
            (Some(dir), _) => dir.to_string(),
            (None, InvalidMoveType::InvalidDirection(name)) => format!("{name:?}"),
            (None, _) => "nowhere".to_string(),
        };
        match &self.variant {
            InvalidMoveType::InvalidDirection(_) => write!(f, "cannot move ({row}, {column}) {dir} because that is not a direction"),
            InvalidMoveType::InvalidSource => write!(f, "cannot move ({row}, {column}) {dir} because it is not on the board"),
            InvalidMoveType::Immovable(cell) => write!(f, "cannot move ({row}, {column}) {dir} because {cell:?} cells cannot move"),
            InvalidMoveType::InvalidFinalPosition => write!(f, "cannot move ({row}, {column}) {dir} because it would leave the board"),
            InvalidMoveType::Occupied(cell) => write!(f, "cannot move ({row}, {column}) {dir} because the destination holds {cell:?}"),
        }
    }
}

impl Error for InvalidMoveError {}

impl<V> Board<V>
where
    V: BoardValue,
{
    /// The cell one step from `source` in `dir`, provided both lie on the board.
    fn destination(
        &self,
        source: Position<V>,
        dir: Direction,
    ) -> Result<(usize, Position<V>, usize), InvalidMoveError> {
        let from = source.as_index(self.dimensions()).ok_or_else(|| {
            InvalidMoveError::new(&source, dir, InvalidMoveType::InvalidSource)
        })?;
        source
            .shift(dir, V::one())
            .and_then(|target| Some((target, target.as_index(self.dimensions())?)))
            .map(|(target, to)| (from, target, to))
            .ok_or_else(|| InvalidMoveError::new(&source, dir, InvalidMoveType::InvalidFinalPosition))
    }

    /// Check a single-step move without performing it, returning the destination on success.
    ///
    /// The destination must be on the board and either empty or holding exactly the same content
    /// as the source, so a piece is never blocked by a copy of itself.
    pub fn check_move<P: Into<Position<V>>>(
        &self,
        position: P,
        dir: Direction,
    ) -> Result<Position<V>, InvalidMoveError> {
        let source = position.into();
        let (from, target, to) = self.destination(source, dir)?;
        let (here, there) = (self.cells()[from], self.cells()[to]);
        if there.is_empty() || there == here {
            Ok(target)
        } else {
            Err(InvalidMoveError::new(
                &source,
                dir,
                InvalidMoveType::Occupied(there),
            ))
        }
    }

    /// Whether [`Board::check_move`] accepts the move.
    pub fn validate_move<P: Into<Position<V>>>(&self, position: P, dir: Direction) -> bool {
        self.check_move(position, dir).is_ok()
    }

    /// Move the content of one cell a single step in the designated direction, leaving the source
    /// empty. Only that one cell moves; the rest of a multi-cell piece stays where it is.
    ///
    /// Unlike [`Board::check_move`], the destination must be empty. On error the board is
    /// untouched.
    pub fn do_move<P: Into<Position<V>>>(
        &mut self,
        position: P,
        dir: Direction,
    ) -> Result<Position<V>, InvalidMoveError> {
        let source = position.into();
        let (from, target, to) = self.destination(source, dir)?;
        if let Ok([from, to]) = self.cells_mut().get_disjoint_mut([from, to]) {
            return if to.is_empty() {
                *to = core::mem::take(from);
                Ok(target)
            } else {
                Err(InvalidMoveError::new(
                    &source,
                    dir,
                    InvalidMoveType::Occupied(*to),
                ))
            };
        }
        Err(InvalidMoveError::new(
            &source,
            dir,
            InvalidMoveType::InvalidFinalPosition,
        ))
    }

    /// Every move that could be attempted on this board: all four directions from every empty
    /// cell, whether or not they would be accepted.
    pub fn candidate_moves(&self) -> Vec<(Position<V>, Direction)> {
        self.dimensions()
            .positions()
            .filter(|p| self.is_empty(*p))
            .flat_map(|p| Direction::ALL.into_iter().map(move |dir| (p, dir)))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use crate::{Board, Cell, Direction, InvalidMoveType, PieceKind, Position};
    use proptest::prelude::*;
    use std::error::Error;

    fn domino() -> Result<Board<u8>, Box<dyn Error>> {
        let mut board = Board::empty((3u8, 3))?;
        board.set(Position::from((1, 0)), Cell::Head(PieceKind::Domino));
        board.set(Position::from((1, 1)), Cell::Body(4));
        board.set(Position::from((2, 2)), Cell::Fixed);
        Ok(board)
    }

    #[test]
    fn shift_cell() -> Result<(), Box<dyn Error>> {
        let mut board = domino()?;
        let original = board.clone();
        println!("{board}");

        assert_eq!(Position::from((1, 2)), board.do_move((1, 1), Direction::Right)?);
        assert_eq!(Some(Cell::Empty), board.get((1, 1)));
        assert_eq!(Some(Cell::Body(4)), board.get((1, 2)));
        println!("{board}");

        board.do_move((1, 2), Direction::Left)?;
        assert_eq!(original, board);

        board.do_move((1, 0), Direction::Up)?;
        assert_eq!(Some(Cell::Head(PieceKind::Domino)), board.get((0, 0)));
        println!("{board}");
        Ok(())
    }

    #[test]
    fn rejected_moves_leave_the_board_alone() -> Result<(), Box<dyn Error>> {
        let mut board = domino()?;
        let original = board.clone();

        let err = board.do_move((1, 0), Direction::Left).unwrap_err();
        assert_eq!(&InvalidMoveType::InvalidFinalPosition, err.variant());
        assert_eq!((1, 0), (err.row(), err.column()));
        assert_eq!(Some(Direction::Left), err.direction());

        let err = board.do_move((1, 0), Direction::Right).unwrap_err();
        assert_eq!(&InvalidMoveType::Occupied(Cell::Body(4)), err.variant());
        assert_eq!("Cannot move to a non-empty cell!", err.variant().prompt());

        let err = board.do_move((3, 0), Direction::Up).unwrap_err();
        assert_eq!(&InvalidMoveType::InvalidSource, err.variant());

        let err = board.do_move((2, 1), Direction::Right).unwrap_err();
        assert_eq!(&InvalidMoveType::Occupied(Cell::Fixed), err.variant());

        assert_eq!(original, board);
        Ok(())
    }

    #[test]
    fn validation() -> Result<(), Box<dyn Error>> {
        let mut board = domino()?;
        board.set(Position::from((0, 0)), Cell::Head(PieceKind::Domino));

        assert!(board.validate_move((1, 1), Direction::Down));
        assert!(!board.validate_move((1, 1), Direction::Left));
        assert!(!board.validate_move((1, 0), Direction::Left));
        assert!(!board.validate_move((0, 0), Direction::Up));
        assert!(!board.validate_move((7, 7), Direction::Up));
        assert!(!board.validate_move((2, 1), Direction::Right));

        // the validator lets a head step onto an identical head; the executor does not
        assert!(board.validate_move((1, 0), Direction::Up));
        let err = board.do_move((1, 0), Direction::Up).unwrap_err();
        assert_eq!(
            &InvalidMoveType::Occupied(Cell::Head(PieceKind::Domino)),
            err.variant()
        );
        Ok(())
    }

    #[test]
    fn candidate_moves() -> Result<(), Box<dyn Error>> {
        let board = domino()?;
        let moves = board.candidate_moves();
        assert_eq!(6 * 4, moves.len());
        assert!(moves.contains(&(Position::from((0, 0)), Direction::Up)));
        assert!(!moves.iter().any(|(p, _)| *p == Position::from((2, 2))));
        Ok(())
    }

    #[test]
    fn error_display() -> Result<(), Box<dyn Error>> {
        let board = domino()?;
        let err = board.check_move((1, 0), Direction::Right).unwrap_err();
        assert_eq!(
            "cannot move (1, 0) right because the destination holds Body(4)",
            err.to_string()
        );
        Ok(())
    }

    fn any_cell() -> impl Strategy<Value = Cell> {
        prop_oneof![
            4 => Just(Cell::Empty),
            1 => Just(Cell::Fixed),
            1 => Just(Cell::Sink),
            1 => Just(Cell::Head(PieceKind::Single)),
            1 => Just(Cell::Head(PieceKind::Domino)),
            1 => (0usize..4).prop_map(Cell::Body),
        ]
    }

    fn any_board() -> impl Strategy<Value = Board<u8>> {
        (1u8..6, 1u8..6).prop_flat_map(|(rows, columns)| {
            proptest::collection::vec(any_cell(), rows as usize * columns as usize).prop_map(
                move |cells| {
                    let mut board = Board::empty((rows, columns)).unwrap();
                    board.cells_mut().copy_from_slice(&cells);
                    board
                },
            )
        })
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        proptest::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn validate_matches_destination(board in any_board(), row in 0u8..7, column in 0u8..7, dir in any_direction()) {
            let source = Position::from((row, column));
            let expected = match (board.get(source), source.shift(dir, 1).and_then(|t| board.get(t))) {
                (Some(here), Some(there)) => there == Cell::Empty || there == here,
                _ => false,
            };
            prop_assert_eq!(expected, board.validate_move(source, dir));
        }

        #[test]
        fn rejection_never_mutates(board in any_board(), row in 0u8..7, column in 0u8..7, dir in any_direction()) {
            let mut moved = board.clone();
            match moved.do_move((row, column), dir) {
                Ok(target) => {
                    prop_assert_eq!(Some(Cell::Empty), moved.get((row, column)));
                    prop_assert_eq!(board.get((row, column)), moved.get(target));
                    moved.do_move(target, -dir).unwrap();
                    prop_assert_eq!(board, moved);
                }
                Err(_) => prop_assert_eq!(board, moved),
            }
        }
    }
}
