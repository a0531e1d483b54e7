//! Colours for each players and their pieces.

/// Number of different colours (2).
pub const NUM_COLOURS: usize = 2;

/// Colour enumeration.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum Colour {
    White = 0,
    Black = 1,
}
impl Colour {
    /// Inverts the colour in place.
    #[inline]
    pub fn invert(&mut self) {
        *self = self.inverse()
    }

    /// Returns the inverse of this colour.
    #[inline]
    pub const fn inverse(&self) -> Self {
        if self.is_black() {
            Colour::White
        } else {
            Colour::Black
        }
    }

    /// Checks if the colour variant is black.
    #[inline]
    pub const fn is_black(&self) -> bool {
        matches!(self, Colour::Black)
    }

    /// Single character tag used in piece tags (`w` or `b`).
    #[inline]
    pub const fn tag(&self) -> char {
        if self.is_black() {
            'b'
        } else {
            'w'
        }
    }

    /// Row delta of a pawn push for this colour. Row 0 is the eighth rank, so
    /// white pawns move towards lower rows.
    #[inline]
    pub const fn forward(&self) -> i8 {
        if self.is_black() {
            1
        } else {
            -1
        }
    }

    /// Row of this colour's back rank.
    #[inline]
    pub const fn back_row(&self) -> u8 {
        if self.is_black() {
            0
        } else {
            7
        }
    }

    /// Row from which this colour's pawns may double push.
    #[inline]
    pub const fn pawn_row(&self) -> u8 {
        if self.is_black() {
            1
        } else {
            6
        }
    }
}
impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self.is_black() { "Black" } else { "White" })
    }
}
