//! # Moves
//!
//! A [`Move`] describes a single ply. It is built against the board it will be
//! played on, so it knows which piece moves and which one it captures.

use super::{
    board::Board,
    piece::{Piece, PieceKind},
    square::Square,
};

/// Fixed capacity list of moves, large enough for any legal chess position.
pub type MoveList = heapless::Vec<Move, 256>;

/// Describes a move and everything needed to play and undo it.
///
/// Two moves compare equal when their origin and target squares match, whatever
/// the other fields say.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    start: Square,
    end: Square,
    moved: Piece,
    captured: Option<Piece>,
    is_pawn_promotion: bool,
    is_en_passant: bool,
    is_castle: bool,
    promoted_to: Option<PieceKind>,
}
impl Move {
    /// A regular move or capture, reading the moving and captured pieces from
    /// the board before it is mutated.
    pub(crate) fn new(start: Square, end: Square, board: &Board) -> Self {
        let Some(moved) = board.piece_on(start) else {
            unreachable!("no piece to move on {start}")
        };
        Self {
            start,
            end,
            moved,
            captured: board.piece_on(end),
            is_pawn_promotion: moved.kind == PieceKind::Pawn
                && end.row() == moved.colour.inverse().back_row(),
            is_en_passant: false,
            is_castle: false,
            promoted_to: None,
        }
    }

    /// An en passant capture. The captured pawn is not on the target square.
    pub(crate) fn new_en_passant(start: Square, end: Square, board: &Board) -> Self {
        let mut mv = Self::new(start, end, board);
        mv.is_en_passant = true;
        mv.captured = Some(Piece::new(PieceKind::Pawn, mv.moved.colour.inverse()));
        mv
    }

    /// A castle, described by the king's origin and target.
    pub(crate) fn new_castle(start: Square, end: Square, board: &Board) -> Self {
        let mut mv = Self::new(start, end, board);
        mv.is_castle = true;
        mv
    }

    /// The same move, with the promotion piece resolved.
    pub(crate) fn with_promotion(mut self, kind: PieceKind) -> Self {
        if self.is_pawn_promotion {
            self.promoted_to = Some(kind);
        }
        self
    }

    #[inline(always)]
    pub fn start(&self) -> Square {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> Square {
        self.end
    }

    /// The piece being moved.
    #[inline(always)]
    pub fn moved(&self) -> Piece {
        self.moved
    }

    /// The piece being captured, if any. For en passant captures this is the
    /// pawn next to the target square.
    #[inline(always)]
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline(always)]
    pub fn is_pawn_promotion(&self) -> bool {
        self.is_pawn_promotion
    }

    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.is_en_passant
    }

    #[inline(always)]
    pub fn is_castle(&self) -> bool {
        self.is_castle
    }

    /// Checks if this castle is on the king side (the king lands on the g-file).
    pub fn is_kingside_castle(&self) -> bool {
        self.is_castle && self.end.col() == 6
    }

    /// The piece a promoted pawn turned into, once the move has been played.
    pub fn promoted_to(&self) -> Option<PieceKind> {
        self.promoted_to
    }

    /// Square of the pawn removed by an en passant capture: beside the origin,
    /// on the target's file.
    pub(crate) fn en_passant_victim(&self) -> Square {
        Square::new(self.start.row(), self.end.col())
    }

    /// Origin and target of the rook accompanying a castle.
    pub(crate) fn castle_rook_squares(&self) -> (Square, Square) {
        let row = self.end.row();
        if self.is_kingside_castle() {
            (Square::new(row, 7), Square::new(row, 5))
        } else {
            (Square::new(row, 0), Square::new(row, 3))
        }
    }

    /// Key combining the four coordinates, which defines move equality.
    pub fn id(&self) -> u16 {
        1000 * self.start.row() as u16
            + 100 * self.start.col() as u16
            + 10 * self.end.row() as u16
            + self.end.col() as u16
    }

    /// Pure coordinate form of the move (`e2e4`, `e7e8q`).
    pub fn coordinates(&self) -> String {
        match self.promoted_to {
            Some(kind) => format!(
                "{}{}{}",
                self.start,
                self.end,
                kind.letter().to_ascii_lowercase()
            ),
            None => format!("{}{}", self.start, self.end),
        }
    }
}
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
impl Eq for Move {}
impl std::hash::Hash for Move {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}
impl std::fmt::Display for Move {
    /// Algebraic notation as shown in the move log.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_castle {
            return write!(f, "{}", if self.is_kingside_castle() { "0-0" } else { "0-0-0" });
        }

        if self.moved.kind == PieceKind::Pawn {
            if self.is_capture() {
                write!(f, "{}x", self.start.file())?
            }
            write!(f, "{}", self.end)?;
            if self.is_pawn_promotion {
                write!(f, "{}", self.promoted_to.unwrap_or(PieceKind::Queen))?
            }
            if self.is_en_passant {
                write!(f, "e.p.")?
            }
            Ok(())
        } else {
            write!(f, "{}", self.moved.kind)?;
            if self.is_capture() {
                write!(f, "x")?
            }
            write!(f, "{}", self.end)
        }
    }
}
