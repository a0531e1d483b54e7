//! Squares of the chessboard and the offsets used to walk between them.
//!
//! Squares are addressed by `(row, col)`, where row 0 is the eighth rank (black's
//! back rank) and col 0 is the a-file.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareParseError {
    #[error("Squares are exactly 2 characters, got {0}")]
    InvalidLength(usize),
    #[error("Invalid file: {0}")]
    InvalidFile(char),
    #[error("Invalid rank: {0}")]
    InvalidRank(char),
}

/// Offset between two squares, in rows and columns.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Delta {
    pub row: i8,
    pub col: i8,
}
impl Delta {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// The same offset pointing the other way.
    pub const fn reversed(self) -> Self {
        Self::new(-self.row, -self.col)
    }

    /// Checks if this offset lies on the same line as `other`, in either
    /// orientation.
    pub fn is_parallel_to(self, other: Delta) -> bool {
        self == other || self == other.reversed()
    }

    /// Checks if the offset is a rook direction.
    pub const fn is_orthogonal(self) -> bool {
        (self.row == 0) != (self.col == 0)
    }

    /// Rook directions: up, left, down, right.
    pub const ORTHOGONALS: [Delta; 4] = [
        Delta::new(-1, 0),
        Delta::new(0, -1),
        Delta::new(1, 0),
        Delta::new(0, 1),
    ];

    /// Bishop directions.
    pub const DIAGONALS: [Delta; 4] = [
        Delta::new(-1, -1),
        Delta::new(-1, 1),
        Delta::new(1, -1),
        Delta::new(1, 1),
    ];

    /// All eight ray directions, orthogonals first.
    pub const RAYS: [Delta; 8] = [
        Delta::new(-1, 0),
        Delta::new(0, -1),
        Delta::new(1, 0),
        Delta::new(0, 1),
        Delta::new(-1, -1),
        Delta::new(-1, 1),
        Delta::new(1, -1),
        Delta::new(1, 1),
    ];

    pub const KNIGHT_JUMPS: [Delta; 8] = [
        Delta::new(-2, -1),
        Delta::new(-2, 1),
        Delta::new(-1, 2),
        Delta::new(1, 2),
        Delta::new(2, -1),
        Delta::new(2, 1),
        Delta::new(-1, -2),
        Delta::new(1, -2),
    ];

    pub const KING_STEPS: [Delta; 8] = [
        Delta::new(1, 0),
        Delta::new(1, -1),
        Delta::new(0, -1),
        Delta::new(-1, -1),
        Delta::new(-1, 0),
        Delta::new(-1, 1),
        Delta::new(0, 1),
        Delta::new(1, 1),
    ];
}

/// A square of the board.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}
impl Square {
    /// Creates a square from its row and column.
    ///
    /// # Panics
    /// Panics if either coordinate is outside of the board.
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < 8 && col < 8, "square out of the board");
        Self { row, col }
    }

    /// Creates a square from signed coordinates, if they are on the board.
    #[inline]
    pub fn try_new(row: i8, col: i8) -> Option<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline(always)]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline(always)]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Index of the square in a row-major 64 entries array.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Moves the square by `delta`, returning `None` if it leaves the board.
    #[inline]
    pub fn translate(self, delta: Delta) -> Option<Self> {
        self.translate_by(delta, 1)
    }

    /// Moves the square `distance` times by `delta`.
    #[inline]
    pub fn translate_by(self, delta: Delta, distance: i8) -> Option<Self> {
        Self::try_new(
            self.row as i8 + delta.row * distance,
            self.col as i8 + delta.col * distance,
        )
    }

    /// Walks from this square (excluded) in the given direction until the edge
    /// of the board.
    pub fn ray(self, delta: Delta) -> impl Iterator<Item = Square> {
        (1..8).map_while(move |distance| self.translate_by(delta, distance))
    }

    /// The file letter of the square.
    pub const fn file(self) -> char {
        (b'a' + self.col) as char
    }

    /// The rank digit of the square.
    pub const fn rank(self) -> char {
        (b'8' - self.row) as char
    }

    /// Iterator over all squares, row by row starting from the eighth rank.
    pub fn iter() -> impl Iterator<Item = Square> {
        (0..8).flat_map(|row| (0..8).map(move |col| Square { row, col }))
    }
}
impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}
impl std::str::FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::InvalidLength(s.chars().count()));
        };
        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(SquareParseError::InvalidFile(file));
        }
        if !('1'..='8').contains(&rank) {
            return Err(SquareParseError::InvalidRank(rank));
        }
        Ok(Self {
            row: b'8' - rank as u8,
            col: file as u8 - b'a',
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn algebraic_round_trip() {
        let e4: Square = "e4".parse().unwrap();
        assert_eq!((e4.row(), e4.col()), (4, 4));
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(Square::new(0, 0).to_string(), "a8");
        assert_eq!(Square::new(7, 7).to_string(), "h1");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "e".parse::<Square>(),
            Err(SquareParseError::InvalidLength(1))
        );
        assert_eq!(
            "i4".parse::<Square>(),
            Err(SquareParseError::InvalidFile('i'))
        );
        assert_eq!(
            "a9".parse::<Square>(),
            Err(SquareParseError::InvalidRank('9'))
        );
    }

    #[test]
    fn rays_stop_at_the_edge() {
        let a1: Square = "a1".parse().unwrap();
        let up: Vec<String> = a1.ray(Delta::new(-1, 0)).map(|sq| sq.to_string()).collect();
        assert_eq!(up, ["a2", "a3", "a4", "a5", "a6", "a7", "a8"]);
        assert_eq!(a1.ray(Delta::new(1, 0)).count(), 0);
        assert_eq!(a1.translate(Delta::new(0, -1)), None);
    }

    #[test]
    fn parallel_offsets() {
        let up = Delta::new(-1, 0);
        assert!(up.is_parallel_to(Delta::new(1, 0)));
        assert!(!up.is_parallel_to(Delta::new(0, 1)));
        assert!(up.is_orthogonal());
        assert!(!Delta::new(1, 1).is_orthogonal());
    }

    #[test]
    fn iteration_order() {
        let squares: Vec<Square> = Square::iter().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0].to_string(), "a8");
        assert_eq!(squares[63].to_string(), "h1");
        assert!(squares.iter().enumerate().all(|(i, sq)| sq.index() == i));
    }
}
