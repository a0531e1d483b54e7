//! # Move generation
//!
//! Per piece kind generators producing pseudo-legal moves, restricted by the pins
//! found by [`AttackInformation::detect`]. The king generator only emits moves to
//! squares that are not attacked, so its output is always legal.

use super::{
    attacks::{is_square_attacked, AttackInformation},
    moves::{Move, MoveList},
    piece::PieceKind,
    position::Position,
    square::{Delta, Square},
};

impl Position {
    /// Generates the moves of every piece of the side to move, castles excluded.
    pub(super) fn generate_pseudo_legal_moves(
        &self,
        attacks: &AttackInformation,
        moves: &mut MoveList,
    ) {
        for (square, piece) in self.board.pieces() {
            if piece.colour != self.side_to_move {
                continue;
            }
            let pin = attacks.pin_on(square);
            match piece.kind {
                PieceKind::Pawn => self.generate_pawn_moves(square, pin, moves),
                PieceKind::Knight => self.generate_knight_moves(square, pin, moves),
                PieceKind::Bishop => {
                    self.generate_sliding_moves(square, &Delta::DIAGONALS, pin, moves)
                }
                PieceKind::Rook => {
                    self.generate_sliding_moves(square, &Delta::ORTHOGONALS, pin, moves)
                }
                // A queen pinned on a line keeps the pin for both its rook and
                // bishop halves.
                PieceKind::Queen => {
                    self.generate_sliding_moves(square, &Delta::DIAGONALS, pin, moves);
                    self.generate_sliding_moves(square, &Delta::ORTHOGONALS, pin, moves);
                }
                PieceKind::King => self.generate_king_moves(square, moves),
            }
        }
    }

    fn generate_pawn_moves(&self, origin: Square, pin: Option<Delta>, moves: &mut MoveList) {
        let us = self.side_to_move;
        let forward = us.forward();
        let allowed = |direction: Delta| pin.map_or(true, |pin| pin.is_parallel_to(direction));

        let push = Delta::new(forward, 0);
        if let Some(target) = origin.translate(push) {
            if self.board.is_empty(target) && allowed(push) {
                let _ = moves.push(Move::new(origin, target, &self.board));
                if origin.row() == us.pawn_row() {
                    if let Some(double) = origin.translate_by(push, 2) {
                        if self.board.is_empty(double) {
                            let _ = moves.push(Move::new(origin, double, &self.board));
                        }
                    }
                }
            }
        }

        for side in [-1, 1] {
            let capture = Delta::new(forward, side);
            let Some(target) = origin.translate(capture) else {
                continue;
            };
            if !allowed(capture) {
                continue;
            }
            if self.board.is_occupied_by(target, us.inverse()) {
                let _ = moves.push(Move::new(origin, target, &self.board));
            } else if self.en_passant == Some(target) {
                let mv = Move::new_en_passant(origin, target, &self.board);
                if self.en_passant_keeps_king_safe(&mv) {
                    let _ = moves.push(mv);
                }
            }
        }
    }

    /// En passant takes two pawns off the same row at once, which can uncover
    /// the king along that row even when neither pawn is pinned.
    fn en_passant_keeps_king_safe(&self, mv: &Move) -> bool {
        let mut board = self.board;
        board.take(mv.en_passant_victim());
        let pawn = board.take(mv.start());
        board.set(mv.end(), pawn);
        !is_square_attacked(
            &board,
            self.king_square(self.side_to_move),
            self.side_to_move.inverse(),
        )
    }

    fn generate_sliding_moves(
        &self,
        origin: Square,
        directions: &[Delta],
        pin: Option<Delta>,
        moves: &mut MoveList,
    ) {
        for &direction in directions {
            if pin.is_some_and(|pin| !pin.is_parallel_to(direction)) {
                continue;
            }
            for target in origin.ray(direction) {
                match self.board.piece_on(target) {
                    None => {
                        let _ = moves.push(Move::new(origin, target, &self.board));
                    }
                    Some(piece) => {
                        if piece.colour != self.side_to_move {
                            let _ = moves.push(Move::new(origin, target, &self.board));
                        }
                        break;
                    }
                }
            }
        }
    }

    fn generate_knight_moves(&self, origin: Square, pin: Option<Delta>, moves: &mut MoveList) {
        // A pinned knight can never stay on its pin line.
        if pin.is_some() {
            return;
        }
        for jump in Delta::KNIGHT_JUMPS {
            if let Some(target) = origin.translate(jump) {
                if !self.board.is_occupied_by(target, self.side_to_move) {
                    let _ = moves.push(Move::new(origin, target, &self.board));
                }
            }
        }
    }

    /// King steps onto squares that would not be attacked once it stands there.
    pub(super) fn generate_king_moves(&self, origin: Square, moves: &mut MoveList) {
        let us = self.side_to_move;
        for step in Delta::KING_STEPS {
            let Some(target) = origin.translate(step) else {
                continue;
            };
            if self.board.is_occupied_by(target, us) {
                continue;
            }
            if !AttackInformation::detect(&self.board, target, us).in_check() {
                let _ = moves.push(Move::new(origin, target, &self.board));
            }
        }
    }

    /// Castles for the side to move, assuming it is not in check.
    pub(super) fn generate_castles(&self, king: Square, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.inverse();
        let row = king.row();
        if king != Square::new(us.back_row(), 4) {
            return;
        }
        let empty = |cols: &[u8]| cols.iter().all(|&col| self.board.is_empty(Square::new(row, col)));
        let safe = |cols: &[u8]| {
            cols.iter()
                .all(|&col| !is_square_attacked(&self.board, Square::new(row, col), them))
        };

        if self.castling_rights.kingside_castle_allowed(us) && empty(&[5, 6]) && safe(&[5, 6]) {
            let _ = moves.push(Move::new_castle(king, Square::new(row, 6), &self.board));
        }
        if self.castling_rights.queenside_castle_allowed(us)
            && empty(&[1, 2, 3])
            && safe(&[2, 3])
        {
            let _ = moves.push(Move::new_castle(king, Square::new(row, 2), &self.board));
        }
    }
}

#[cfg(test)]
mod test {
    use crate::game::{
        castling_rights::CastlingRights,
        colour::Colour,
        piece::{Piece, PieceKind},
        position::{Position, Setup},
        square::Square,
    };

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn setup(pieces: &[(&str, Piece)], side_to_move: Colour) -> Position {
        pieces
            .iter()
            .fold(Setup::new(), |setup, &(square, piece)| {
                setup.place(sq(square), piece).unwrap()
            })
            .side_to_move(side_to_move)
            .castling_rights(CastlingRights::full())
            .build()
            .unwrap()
    }

    fn targets_from(position: &Position, origin: &str) -> Vec<String> {
        let mut targets: Vec<String> = position
            .moves()
            .iter()
            .filter(|mv| mv.start() == sq(origin))
            .map(|mv| mv.end().to_string())
            .collect();
        targets.sort();
        targets
    }

    #[test]
    fn pinned_rook_slides_along_the_pin() {
        let position = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("e3", Piece::white(PieceKind::Rook)),
                ("e7", Piece::black(PieceKind::Rook)),
                ("a8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert_eq!(targets_from(&position, "e3"), ["e2", "e4", "e5", "e6", "e7"]);
    }

    #[test]
    fn pinned_queen_keeps_its_pin_for_both_halves() {
        let position = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("e3", Piece::white(PieceKind::Queen)),
                ("e7", Piece::black(PieceKind::Rook)),
                ("a8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert_eq!(targets_from(&position, "e3"), ["e2", "e4", "e5", "e6", "e7"]);

        let diagonal = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("f2", Piece::white(PieceKind::Queen)),
                ("h4", Piece::black(PieceKind::Bishop)),
                ("a8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert_eq!(targets_from(&diagonal, "f2"), ["g3", "h4"]);
    }

    #[test]
    fn pinned_knight_cannot_move() {
        let position = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("d2", Piece::white(PieceKind::Knight)),
                ("a5", Piece::black(PieceKind::Bishop)),
                ("h8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert!(targets_from(&position, "d2").is_empty());
    }

    #[test]
    fn pinned_pawns() {
        // Pinned on its file, pushing towards its own king.
        let file_pin = setup(
            &[
                ("e7", Piece::white(PieceKind::King)),
                ("e4", Piece::white(PieceKind::Pawn)),
                ("e1", Piece::black(PieceKind::Rook)),
                ("d5", Piece::black(PieceKind::Bishop)),
                ("a8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert_eq!(targets_from(&file_pin, "e4"), ["e5"]);

        let push_pin = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("e2", Piece::white(PieceKind::Pawn)),
                ("e8", Piece::black(PieceKind::Rook)),
                ("d3", Piece::black(PieceKind::Bishop)),
                ("a8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert_eq!(targets_from(&push_pin, "e2"), ["e3", "e4"]);

        let diagonal_pin = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("f2", Piece::white(PieceKind::Pawn)),
                ("g3", Piece::black(PieceKind::Bishop)),
                ("e3", Piece::black(PieceKind::Knight)),
                ("a8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert_eq!(targets_from(&diagonal_pin, "f2"), ["g3"]);
    }

    #[test]
    fn king_avoids_attacked_squares() {
        let position = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("a2", Piece::black(PieceKind::Rook)),
                ("h8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert_eq!(targets_from(&position, "e1"), ["d1", "f1"]);
    }

    #[test]
    fn king_cannot_retreat_along_the_checking_ray() {
        let mut position = setup(
            &[
                ("e2", Piece::white(PieceKind::King)),
                ("e8", Piece::black(PieceKind::Rook)),
                ("a8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        let targets = targets_from(&position, "e2");
        assert!(!targets.contains(&"e1".to_string()));
        assert!(!targets.contains(&"e3".to_string()));
        assert_eq!(targets, ["d1", "d2", "d3", "f1", "f2", "f3"]);
        position.legal_moves();
        assert!(position.in_check());
    }

    #[test]
    fn king_cannot_capture_a_protected_piece() {
        let position = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("e2", Piece::black(PieceKind::Queen)),
                ("e8", Piece::black(PieceKind::Rook)),
                ("a8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert!(targets_from(&position, "e1").is_empty());
    }

    #[test]
    fn castling() {
        let position = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("a1", Piece::white(PieceKind::Rook)),
                ("h1", Piece::white(PieceKind::Rook)),
                ("e8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        let castles: Vec<String> = position
            .moves()
            .iter()
            .filter(|mv| mv.is_castle())
            .map(|mv| mv.to_string())
            .collect();
        assert_eq!(castles, ["0-0", "0-0-0"]);
    }

    #[test]
    fn castling_through_attacked_squares() {
        // f1 is attacked: no king side castle. b1 is attacked, which does not
        // matter for the queen side.
        let position = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("a1", Piece::white(PieceKind::Rook)),
                ("h1", Piece::white(PieceKind::Rook)),
                ("e8", Piece::black(PieceKind::King)),
                ("f8", Piece::black(PieceKind::Rook)),
                ("b8", Piece::black(PieceKind::Rook)),
            ],
            Colour::White,
        );
        let castles: Vec<String> = position
            .moves()
            .iter()
            .filter(|mv| mv.is_castle())
            .map(|mv| mv.to_string())
            .collect();
        assert_eq!(castles, ["0-0-0"]);
    }

    #[test]
    fn no_castling_out_of_check_or_through_pieces() {
        let in_check = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("a1", Piece::white(PieceKind::Rook)),
                ("h1", Piece::white(PieceKind::Rook)),
                ("e8", Piece::black(PieceKind::King)),
                ("e7", Piece::black(PieceKind::Rook)),
            ],
            Colour::White,
        );
        assert!(!in_check.moves().iter().any(|mv| mv.is_castle()));

        let blocked = setup(
            &[
                ("e1", Piece::white(PieceKind::King)),
                ("a1", Piece::white(PieceKind::Rook)),
                ("b1", Piece::white(PieceKind::Knight)),
                ("h1", Piece::white(PieceKind::Rook)),
                ("g1", Piece::white(PieceKind::Bishop)),
                ("e8", Piece::black(PieceKind::King)),
            ],
            Colour::White,
        );
        assert!(!blocked.moves().iter().any(|mv| mv.is_castle()));
    }

    #[test]
    fn en_passant_exposing_the_king_is_illegal() {
        let position = Setup::new()
            .place(sq("a5"), Piece::white(PieceKind::King))
            .unwrap()
            .place(sq("b5"), Piece::white(PieceKind::Pawn))
            .unwrap()
            .place(sq("c5"), Piece::black(PieceKind::Pawn))
            .unwrap()
            .place(sq("h5"), Piece::black(PieceKind::Rook))
            .unwrap()
            .place(sq("h8"), Piece::black(PieceKind::King))
            .unwrap()
            .en_passant(sq("c6"))
            .build()
            .unwrap();
        assert!(!position.moves().iter().any(|mv| mv.is_en_passant()));
        assert_eq!(targets_from(&position, "b5"), ["b6"]);
    }

    #[test]
    fn en_passant_resolves_a_pawn_check() {
        let mut position = Setup::new()
            .place(sq("d5"), Piece::black(PieceKind::King))
            .unwrap()
            .place(sq("f4"), Piece::black(PieceKind::Pawn))
            .unwrap()
            .place(sq("e4"), Piece::white(PieceKind::Pawn))
            .unwrap()
            .place(sq("a1"), Piece::white(PieceKind::King))
            .unwrap()
            .side_to_move(Colour::Black)
            .en_passant(sq("e3"))
            .build()
            .unwrap();
        let moves = position.legal_moves();
        assert!(position.in_check());
        let en_passant = moves.iter().find(|mv| mv.is_en_passant()).unwrap();
        assert_eq!(en_passant.to_string(), "fxe3e.p.");
        // The other pawn move does not deal with the check.
        assert!(!moves.iter().any(|mv| mv.start() == sq("f4") && mv.end() == sq("f3")));
    }
}
