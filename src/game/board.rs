//! The 8x8 grid of pieces.

use super::{
    colour::Colour,
    piece::{Piece, PieceKind},
    square::Square,
};

/// An 8x8 mailbox of pieces, indexed by [`Square`].
///
/// Boards are plain values: the [`Position`](super::position::Position) owns
/// the only mutable one and hands out copies or shared references.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board([Option<Piece>; 64]);
impl Default for Board {
    /// A board with no pieces.
    fn default() -> Self {
        Self([None; 64])
    }
}
impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The initial arrangement of pieces.
    pub fn initial() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Self::empty();
        for colour in [Colour::White, Colour::Black] {
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                board.set(
                    Square::new(colour.back_row(), col as u8),
                    Some(Piece::new(kind, colour)),
                );
                board.set(
                    Square::new(colour.pawn_row(), col as u8),
                    Some(Piece::new(PieceKind::Pawn, colour)),
                );
            }
        }
        board
    }

    /// Returns the piece sitting on a given square if any.
    #[inline(always)]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.0[square.index()]
    }

    /// Checks if a square holds no piece.
    #[inline(always)]
    pub fn is_empty(&self, square: Square) -> bool {
        self.0[square.index()].is_none()
    }

    /// Checks if a square holds a piece of the given colour.
    #[inline(always)]
    pub fn is_occupied_by(&self, square: Square, colour: Colour) -> bool {
        self.0[square.index()].is_some_and(|piece| piece.colour == colour)
    }

    /// Overwrites the content of a square, returning what was there.
    #[inline]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.0[square.index()], piece)
    }

    /// Empties a square, returning what was there.
    #[inline]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.0[square.index()].take()
    }

    /// Iterator over all occupied squares and their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_on(square).map(|piece| (square, piece)))
    }

    /// Looks up the square of the king of the given colour by scanning the board.
    pub fn find_king(&self, colour: Colour) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| *piece == Piece::new(PieceKind::King, colour))
            .map(|(square, _)| square)
    }

    /// The board as rows of 2 character tags, row 0 first.
    pub fn tags(&self) -> [[String; 8]; 8] {
        std::array::from_fn(|row| {
            std::array::from_fn(|col| Piece::tag_of(self.piece_on(Square::new(row as u8, col as u8))))
        })
    }
}
impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..8u8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8u8 {
                match self.piece_on(Square::new(row, col)) {
                    Some(piece) => write!(f, "{piece} ")?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn initial_board() {
        let board = Board::initial();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.find_king(Colour::White), Some("e1".parse().unwrap()));
        assert_eq!(board.find_king(Colour::Black), Some("e8".parse().unwrap()));
        let tags = board.tags();
        assert_eq!(tags[0][3], "bQ");
        assert_eq!(tags[6][0], "wp");
        assert_eq!(tags[4][4], "--");
    }

    #[test]
    fn display() {
        let board = Board::initial();
        let text = board.to_string();
        assert!(text.starts_with("8 r n b q k b n r"));
        assert!(text.ends_with("  a b c d e f g h"));
    }
}
