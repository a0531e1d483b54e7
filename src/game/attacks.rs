//! # Pins and checks
//!
//! Everything about which squares a side attacks, computed by walking the eight
//! rays and the eight knight jumps around a square.

use super::{
    board::Board,
    colour::Colour,
    piece::{Piece, PieceKind},
    square::{Delta, Square},
};

/// A piece that cannot leave the line between its king and an enemy slider.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Pin {
    /// Square of the pinned piece.
    pub square: Square,
    /// Direction from the king to the pinned piece. The piece may still move
    /// along this axis, in either orientation.
    pub direction: Delta,
}

/// A piece giving check.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Check {
    pub attacker: Square,
    pub kind: PieceKind,
    /// Direction from the king to the attacker. For knights this is the jump
    /// itself rather than a unit step.
    pub direction: Delta,
}
impl Check {
    /// Squares a non-king piece can move to in order to resolve this check: the
    /// attacker's square, plus every square in between for sliders.
    pub fn resolving_squares(&self, king: Square) -> heapless::Vec<Square, 8> {
        let mut squares = heapless::Vec::new();
        if self.kind == PieceKind::Knight {
            let _ = squares.push(self.attacker);
            return squares;
        }
        for square in king.ray(self.direction) {
            let _ = squares.push(square);
            if square == self.attacker {
                break;
            }
        }
        squares
    }
}

/// Pins and checks against one side's king.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct AttackInformation {
    pins: heapless::Vec<Pin, 8>,
    checks: heapless::Vec<Check, 16>,
}
impl AttackInformation {
    /// Scans outward from `king`, looking for pins and checks against the
    /// pieces of `colour`.
    ///
    /// The king of `colour` is transparent to the scan, which lets callers ask
    /// about a square the king is about to step on before actually moving it.
    pub fn detect(board: &Board, king: Square, colour: Colour) -> Self {
        let mut info = Self::default();

        for direction in Delta::RAYS {
            let mut possible_pin = None;
            for (distance, square) in king.ray(direction).enumerate() {
                let Some(piece) = board.piece_on(square) else {
                    continue;
                };
                if piece.colour == colour {
                    if piece.kind == PieceKind::King {
                        continue;
                    }
                    if possible_pin.is_some() {
                        break;
                    }
                    possible_pin = Some(Pin { square, direction });
                    continue;
                }

                if attacks_along_ray(piece, direction, distance + 1) {
                    match possible_pin {
                        None => {
                            let _ = info.checks.push(Check {
                                attacker: square,
                                kind: piece.kind,
                                direction,
                            });
                        }
                        Some(pin) => {
                            let _ = info.pins.push(pin);
                        }
                    }
                }
                break;
            }
        }

        for jump in Delta::KNIGHT_JUMPS {
            if let Some(square) = king.translate(jump) {
                if board.piece_on(square) == Some(Piece::new(PieceKind::Knight, colour.inverse())) {
                    let _ = info.checks.push(Check {
                        attacker: square,
                        kind: PieceKind::Knight,
                        direction: jump,
                    });
                }
            }
        }

        info
    }

    /// Returns the number of checking pieces.
    #[inline(always)]
    pub fn checkers_count(&self) -> usize {
        self.checks.len()
    }

    /// Returns `true` if there is at least one checker.
    #[inline(always)]
    pub fn in_check(&self) -> bool {
        !self.checks.is_empty()
    }

    /// Returns `true` if there is more than one checker.
    #[inline(always)]
    pub fn in_double_check(&self) -> bool {
        self.checks.len() > 1
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Returns the pin axis of the piece on `square`, if it is pinned.
    pub fn pin_on(&self, square: Square) -> Option<Delta> {
        self.pins
            .iter()
            .find(|pin| pin.square == square)
            .map(|pin| pin.direction)
    }
}

/// Checks if `piece`, met at `distance` steps from a square while walking in
/// `direction`, attacks that square.
#[inline]
fn attacks_along_ray(piece: Piece, direction: Delta, distance: usize) -> bool {
    match piece.kind {
        PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => {
            if direction.is_orthogonal() {
                piece.kind.is_orthogonal_slider()
            } else {
                piece.kind.is_diagonal_slider()
            }
        }
        // Pawns capture forward, so they sit behind the square they attack.
        PieceKind::Pawn => {
            distance == 1
                && !direction.is_orthogonal()
                && direction.row == -piece.colour.forward()
        }
        PieceKind::King => distance == 1,
        PieceKind::Knight => false,
    }
}

/// Checks if any piece of colour `by` attacks `square`.
///
/// The board is left untouched, and every piece blocks rays, kings included.
pub fn is_square_attacked(board: &Board, square: Square, by: Colour) -> bool {
    let ray_attack = Delta::RAYS.into_iter().any(|direction| {
        square
            .ray(direction)
            .enumerate()
            .find_map(|(distance, target)| board.piece_on(target).map(|piece| (distance, piece)))
            .is_some_and(|(distance, piece)| {
                piece.colour == by && attacks_along_ray(piece, direction, distance + 1)
            })
    });

    ray_attack
        || Delta::KNIGHT_JUMPS.into_iter().any(|jump| {
            square.translate(jump).is_some_and(|target| {
                board.piece_on(target) == Some(Piece::new(PieceKind::Knight, by))
            })
        })
}
