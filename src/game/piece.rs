//! Piece types encoding.

use thiserror::Error;

use super::colour::Colour;

/// The kind of a piece, one of Pawn, Knight, Bishop, Rook, Queen or King. Usually
/// with supplementary information about the colour of the piece, in the form of
/// a [`Piece`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}
impl PieceKind {
    /// Checks if this piece kind is a diagonal slider (bishops and queens).
    #[inline(always)]
    pub fn is_diagonal_slider(self) -> bool {
        matches!(self, Self::Bishop | Self::Queen)
    }
    /// Checks if this piece kind is an orthogonal slider (rooks and queens).
    #[inline(always)]
    pub fn is_orthogonal_slider(self) -> bool {
        matches!(self, Self::Rook | Self::Queen)
    }

    /// Uppercase letter of the piece kind, as used in tags and notation.
    pub const fn letter(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}
impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Complete set of information for identifying a piece.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}
impl Piece {
    pub const fn new(kind: PieceKind, colour: Colour) -> Self {
        Self { kind, colour }
    }

    pub const fn white(kind: PieceKind) -> Self {
        Self::new(kind, Colour::White)
    }

    pub const fn black(kind: PieceKind) -> Self {
        Self::new(kind, Colour::Black)
    }

    /// Two character tag of the piece: colour then kind, e.g. `wp` or `bK`.
    pub fn tag(self) -> String {
        format!("{}{}", self.colour.tag(), self.kind.letter())
    }

    /// Tag of an optional piece, `--` standing for an empty square.
    pub fn tag_of(piece: Option<Piece>) -> String {
        piece.map_or_else(|| "--".to_string(), Piece::tag)
    }
}
impl std::fmt::Display for Piece {
    /// Single letter, uppercase for white and lowercase for black.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self.kind {
            PieceKind::Pawn => 'P',
            kind => kind.letter(),
        };
        write!(
            f,
            "{}",
            if self.colour.is_black() {
                letter.to_ascii_lowercase()
            } else {
                letter
            }
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot promote to {0:?}, expected one of q, r, b or n")]
pub struct PromotionParseError(pub String);

/// Piece a pawn turns into when reaching the last rank.
///
/// The choice is resolved by the caller before the move is applied, and
/// defaults to a queen.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub enum PromotionChoice {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}
impl From<PromotionChoice> for PieceKind {
    fn from(value: PromotionChoice) -> Self {
        match value {
            PromotionChoice::Queen => PieceKind::Queen,
            PromotionChoice::Rook => PieceKind::Rook,
            PromotionChoice::Bishop => PieceKind::Bishop,
            PromotionChoice::Knight => PieceKind::Knight,
        }
    }
}
impl std::str::FromStr for PromotionChoice {
    type Err = PromotionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "q" => Self::Queen,
            "r" => Self::Rook,
            "b" => Self::Bishop,
            "n" => Self::Knight,
            _ => Err(PromotionParseError(s.to_string()))?,
        })
    }
}
