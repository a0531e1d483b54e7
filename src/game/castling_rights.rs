//! # Representation of castling rights

use super::{colour::Colour, moves::Move, piece::PieceKind};

/// Which castles are still available, for both sides.
///
/// Rights are only ever revoked while a game goes on. Restoring them on undo
/// goes through the position history.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CastlingRights(u8);
impl CastlingRights {
    const KINGSIDE_BLACK: u8 = 0b0001;
    const QUEENSIDE_BLACK: u8 = 0b0010;
    const KINGSIDE_WHITE: u8 = 0b0100;
    const QUEENSIDE_WHITE: u8 = 0b1000;
    const FULL: u8 =
        Self::KINGSIDE_BLACK | Self::KINGSIDE_WHITE | Self::QUEENSIDE_BLACK | Self::QUEENSIDE_WHITE;
    const EMPTY: u8 = 0;

    /// Full castling rights for both sides.
    pub const fn full() -> Self {
        Self(Self::FULL)
    }

    /// No castling rights for any sides.
    pub const fn none() -> Self {
        Self(Self::EMPTY)
    }

    /// Checks if no one can castle.
    pub const fn is_none(self) -> bool {
        self.0 == Self::EMPTY
    }

    /// Checks if kingside castling is allowed for a certain colour.
    #[inline(always)]
    pub const fn kingside_castle_allowed(self, colour: Colour) -> bool {
        if colour.is_black() {
            self.0 & Self::KINGSIDE_BLACK != 0
        } else {
            self.0 & Self::KINGSIDE_WHITE != 0
        }
    }
    /// Checks if queenside castling is allowed for a certain colour.
    #[inline(always)]
    pub const fn queenside_castle_allowed(self, colour: Colour) -> bool {
        if colour.is_black() {
            self.0 & Self::QUEENSIDE_BLACK != 0
        } else {
            self.0 & Self::QUEENSIDE_WHITE != 0
        }
    }

    /// Disallows kingside for a given side.
    #[inline(always)]
    pub fn disallow_kingside_castle(&mut self, colour: Colour) {
        self.0 &= if colour.is_black() {
            !Self::KINGSIDE_BLACK
        } else {
            !Self::KINGSIDE_WHITE
        }
    }
    /// Disallows queenside for a given side.
    #[inline(always)]
    pub fn disallow_queenside_castle(&mut self, colour: Colour) {
        self.0 &= if colour.is_black() {
            !Self::QUEENSIDE_BLACK
        } else {
            !Self::QUEENSIDE_WHITE
        }
    }
    /// Disallows castling for a given side.
    pub fn disallow(&mut self, colour: Colour) {
        self.0 &= if colour.is_black() {
            !(Self::QUEENSIDE_BLACK | Self::KINGSIDE_BLACK)
        } else {
            !(Self::QUEENSIDE_WHITE | Self::KINGSIDE_WHITE)
        }
    }

    /// Revokes the rights lost by playing `mv`: a king move drops both castles
    /// of its side, a rook leaving its corner or being captured on it drops the
    /// castle on that corner.
    pub fn update(&mut self, mv: &Move) {
        if let Some(captured) = mv.captured() {
            if captured.kind == PieceKind::Rook {
                self.disallow_corner(captured.colour, mv.end().row(), mv.end().col());
            }
        }

        let moved = mv.moved();
        match moved.kind {
            PieceKind::King => self.disallow(moved.colour),
            PieceKind::Rook => {
                self.disallow_corner(moved.colour, mv.start().row(), mv.start().col())
            }
            _ => (),
        }
    }

    fn disallow_corner(&mut self, colour: Colour, row: u8, col: u8) {
        if row != colour.back_row() {
            return;
        }
        match col {
            0 => self.disallow_queenside_castle(colour),
            7 => self.disallow_kingside_castle(colour),
            _ => (),
        }
    }
}
impl Default for CastlingRights {
    fn default() -> Self {
        Self::full()
    }
}
impl std::fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            return write!(f, "-");
        }

        if self.kingside_castle_allowed(Colour::White) {
            write!(f, "K")?
        }
        if self.queenside_castle_allowed(Colour::White) {
            write!(f, "Q")?
        }
        if self.kingside_castle_allowed(Colour::Black) {
            write!(f, "k")?
        }
        if self.queenside_castle_allowed(Colour::Black) {
            write!(f, "q")?
        }
        Ok(())
    }
}
