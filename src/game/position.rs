//! Main API to represent and interact with a chess position.
//!
//! This includes making, unmaking and generating moves, as well as deriving the
//! status of the game (check, checkmate, stalemate).
use thiserror::Error;

use super::{
    attacks::AttackInformation,
    board::Board,
    castling_rights::CastlingRights,
    colour::{Colour, NUM_COLOURS},
    history::HistoryEntry,
    moves::{Move, MoveList},
    piece::{Piece, PieceKind, PromotionChoice},
    square::Square,
};

#[derive(Error, Clone, Debug, Hash, Eq, PartialEq)]
#[error("Illegal move: {0}")]
pub struct IllegalMoveError(pub String);

#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum SetupError {
    #[error("Square {square} is already occupied by {occupant}")]
    SquareOccupied { square: Square, occupant: String },
    #[error("{0} has no king")]
    MissingKing(Colour),
    #[error("{0} has more than one king")]
    TooManyKings(Colour),
    #[error("Pawn on a back rank: {0}")]
    PawnOnBackRank(Square),
    #[error("No pawn can have skipped {0}")]
    InvalidEnPassant(Square),
    #[error("{0} is in check but it is not their turn")]
    OpponentInCheck(Colour),
}

/// Outcome of the last legal move query.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum GameStatus {
    Ongoing,
    /// The side to move is in check but has legal moves.
    Check,
    /// The side to move has been mated, by the colour stored here.
    Checkmate { winner: Colour },
    Stalemate,
}
impl GameStatus {
    /// Checks if the game is over.
    pub fn is_over(self) -> bool {
        matches!(self, Self::Checkmate { .. } | Self::Stalemate)
    }

    /// Returns the winner, if any.
    pub fn winner(self) -> Option<Colour> {
        match self {
            Self::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }
}
impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Check => write!(f, "check"),
            Self::Checkmate { winner } => write!(f, "{winner} wins by checkmate"),
            Self::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// Represents a valid chess position and defines an API to interact with said
/// position (making, unmaking, generating moves, etc).
///
/// The board is only ever mutated through [`Position::make`] and
/// [`Position::unmake`]; everything else hands out shared references or copies.
#[derive(PartialEq, Eq, Clone)]
pub struct Position {
    pub(super) board: Board,
    pub(super) side_to_move: Colour,
    // Cached king squares, indexed by colour.
    pub(super) kings: [Square; NUM_COLOURS],
    pub(super) castling_rights: CastlingRights,
    pub(super) en_passant: Option<Square>,
    history: Vec<HistoryEntry>,

    // Set by the last call to `legal_moves`.
    in_check: bool,
    checkmate: bool,
    stalemate: bool,
}
impl Default for Position {
    /// The initial position of chess.
    fn default() -> Self {
        Self::initial()
    }
}
impl Position {
    /// The initial position of chess.
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            side_to_move: Colour::White,
            kings: [Square::new(7, 4), Square::new(0, 4)],
            castling_rights: CastlingRights::full(),
            en_passant: None,
            history: Vec::new(),

            in_check: false,
            checkmate: false,
            stalemate: false,
        }
    }

    /// Throws the current game away and starts over from the initial position.
    pub fn reset(&mut self) {
        log::debug!("Resetting position");
        *self = Self::initial()
    }

    /// Returns the board.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece sitting on a given square if any.
    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board.piece_on(square)
    }

    /// Returns the current side to move.
    #[inline]
    pub fn side_to_move(&self) -> Colour {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Square skipped by a pawn's double push on the last ply, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the position of the king of the given colour.
    #[inline]
    pub fn king_square(&self, colour: Colour) -> Square {
        self.kings[colour as usize]
    }

    /// Moves played so far, oldest first.
    pub fn move_log(&self) -> impl DoubleEndedIterator<Item = &Move> + ExactSizeIterator + '_ {
        self.history.iter().map(|entry| &entry.played)
    }

    /// The last move played, if any.
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last().map(|entry| &entry.played)
    }

    /// The move log in numbered algebraic notation, e.g. `1. e4 e5 2. Qh5`.
    pub fn notation_log(&self) -> String {
        self.history
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| {
                let mut text = format!("{}. {}", i + 1, pair[0].played);
                if let Some(reply) = pair.get(1) {
                    text.push_str(&format!(" {}", reply.played));
                }
                text
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the side to move was in check at the last legal move query.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// Whether the last legal move query found a checkmate.
    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Whether the last legal move query found a stalemate.
    #[inline]
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    /// Status of the game as of the last legal move query.
    pub fn status(&self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate {
                winner: self.side_to_move.inverse(),
            }
        } else if self.stalemate {
            GameStatus::Stalemate
        } else if self.in_check {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }

    /// Returns check and pin information for the side to move.
    pub fn attack_information(&self) -> AttackInformation {
        AttackInformation::detect(
            &self.board,
            self.king_square(self.side_to_move),
            self.side_to_move,
        )
    }

    /// Generates all legal moves for the side to move, without touching the
    /// status flags.
    pub fn moves(&self) -> MoveList {
        self.generate_legal_moves().0
    }

    /// Legal moves along with the pins and checks they were filtered with.
    fn generate_legal_moves(&self) -> (MoveList, AttackInformation) {
        let attacks = self.attack_information();
        let king = self.king_square(self.side_to_move);
        let mut moves = MoveList::new();

        if attacks.in_double_check() {
            // Only the king can get out of two checks at once.
            self.generate_king_moves(king, &mut moves);
        } else if let [check] = attacks.checks() {
            self.generate_pseudo_legal_moves(&attacks, &mut moves);
            let resolving = check.resolving_squares(king);
            moves.retain(|mv| {
                mv.moved().kind == PieceKind::King
                    || resolving.contains(&mv.end())
                    || (mv.is_en_passant()
                        && check.kind == PieceKind::Pawn
                        && mv.en_passant_victim() == check.attacker)
            });
        } else {
            self.generate_pseudo_legal_moves(&attacks, &mut moves);
            self.generate_castles(king, &mut moves);
        }

        (moves, attacks)
    }

    /// Generates all legal moves for the side to move, and updates the check,
    /// checkmate and stalemate flags accordingly.
    pub fn legal_moves(&mut self) -> MoveList {
        let (moves, attacks) = self.generate_legal_moves();
        self.in_check = attacks.in_check();
        self.checkmate = moves.is_empty() && self.in_check;
        self.stalemate = moves.is_empty() && !self.in_check;

        log::trace!(
            "{} legal moves for {}",
            moves.len(),
            self.side_to_move
        );
        if self.checkmate || self.stalemate {
            log::info!("Game over: {}", self.status());
        }
        moves
    }

    /// Resolves a pair of squares (e.g. two clicks) into the matching legal move.
    pub fn find_move(&self, start: Square, end: Square) -> Option<Move> {
        self.moves()
            .into_iter()
            .find(|mv| mv.start() == start && mv.end() == end)
    }

    /// Makes a move on the board, modifying the position.
    ///
    /// Promotions turn into `promotion`, or a queen when no choice is given.
    /// # Errors
    /// This function returns an error if the move is illegal, in which case the
    /// position is left untouched.
    pub fn make(
        &mut self,
        mv: Move,
        promotion: Option<PromotionChoice>,
    ) -> Result<(), IllegalMoveError> {
        match self.moves().into_iter().find(|legal| *legal == mv) {
            Some(legal) => {
                self.play(legal, promotion.unwrap_or_default());
                Ok(())
            }
            None => {
                log::debug!("Rejected illegal move {}", mv.coordinates());
                Err(IllegalMoveError(mv.coordinates()))
            }
        }
    }

    /// Makes the move going from `start` to `end`, see [`Position::make`].
    /// # Errors
    /// This function returns an error if no legal move links both squares.
    pub fn make_squares(
        &mut self,
        start: Square,
        end: Square,
        promotion: Option<PromotionChoice>,
    ) -> Result<(), IllegalMoveError> {
        let Some(mv) = self.find_move(start, end) else {
            log::debug!("Rejected illegal move {start}{end}");
            return Err(IllegalMoveError(format!("{start}{end}")));
        };
        self.play(mv, promotion.unwrap_or_default());
        Ok(())
    }

    /// Plays a move taken from the legal move list of this position.
    ///
    /// Playing anything else breaks the invariants of the position.
    pub(crate) fn play(&mut self, mv: Move, promotion: PromotionChoice) {
        let us = self.side_to_move;
        let played = mv.with_promotion(promotion.into());
        self.history.push(HistoryEntry {
            played,
            en_passant: self.en_passant,
            castling_rights: self.castling_rights,
        });

        let start = mv.start();
        let end = mv.end();
        let moved = self.board.take(start);
        let landing = match played.promoted_to() {
            Some(kind) => Some(Piece::new(kind, us)),
            None => moved,
        };
        self.board.set(end, landing);

        if mv.is_en_passant() {
            self.board.take(mv.en_passant_victim());
        }
        if mv.is_castle() {
            let (rook_origin, rook_target) = mv.castle_rook_squares();
            let rook = self.board.take(rook_origin);
            self.board.set(rook_target, rook);
        }
        if mv.moved().kind == PieceKind::King {
            self.kings[us as usize] = end;
        }

        self.en_passant = if mv.moved().kind == PieceKind::Pawn
            && start.row().abs_diff(end.row()) == 2
        {
            Some(Square::new((start.row() + end.row()) / 2, start.col()))
        } else {
            None
        };
        self.castling_rights.update(&played);
        self.side_to_move.invert();

        log::debug!(
            "{us} played {played} ({}), {} to move",
            played.coordinates(),
            self.side_to_move
        );
    }

    /// Undoes the effects of the last move played, restoring the position as it
    /// was prior to the move.
    ///
    /// Returns `false` and does nothing if no moves were played.
    pub fn unmake(&mut self) -> bool {
        let Some(HistoryEntry {
            played,
            en_passant,
            castling_rights,
        }) = self.history.pop()
        else {
            return false;
        };

        self.side_to_move.invert();
        let us = self.side_to_move;

        self.board.set(played.start(), Some(played.moved()));
        if played.is_en_passant() {
            self.board.take(played.end());
            self.board.set(played.en_passant_victim(), played.captured());
        } else {
            self.board.set(played.end(), played.captured());
        }
        if played.is_castle() {
            let (rook_origin, rook_target) = played.castle_rook_squares();
            let rook = self.board.take(rook_target);
            self.board.set(rook_origin, rook);
        }
        if played.moved().kind == PieceKind::King {
            self.kings[us as usize] = played.start();
        }

        self.en_passant = en_passant;
        self.castling_rights = castling_rights;
        self.in_check = false;
        self.checkmate = false;
        self.stalemate = false;

        log::debug!("{us} took back {played}");
        true
    }
}
impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f, "side to move: {}", self.side_to_move)?;
        writeln!(f, "castling rights: {}", self.castling_rights)?;
        write!(
            f,
            "en passant: {}",
            match self.en_passant {
                Some(square) => square.to_string(),
                None => "-".to_string(),
            }
        )
    }
}
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Builder for arbitrary (but valid) positions.
///
/// ```
/// # use gambit::game::{colour::Colour, piece::{Piece, PieceKind}, position::Setup};
/// let position = Setup::new()
///     .place("e1".parse().unwrap(), Piece::white(PieceKind::King))?
///     .place("e8".parse().unwrap(), Piece::black(PieceKind::King))?
///     .side_to_move(Colour::Black)
///     .build()?;
/// assert!(position.castling_rights().is_none());
/// # Ok::<(), gambit::game::position::SetupError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Setup {
    board: Board,
    side_to_move: Option<Colour>,
    castling_rights: Option<CastlingRights>,
    en_passant: Option<Square>,
}
impl Setup {
    /// An empty board, white to move, nobody allowed to castle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a piece on an empty square.
    /// # Errors
    /// Fails if the square is already occupied.
    pub fn place(mut self, square: Square, piece: Piece) -> Result<Self, SetupError> {
        if let Some(occupant) = self.board.piece_on(square) {
            return Err(SetupError::SquareOccupied {
                square,
                occupant: occupant.tag(),
            });
        }
        self.board.set(square, Some(piece));
        Ok(self)
    }

    pub fn side_to_move(mut self, colour: Colour) -> Self {
        self.side_to_move = Some(colour);
        self
    }

    /// Castling rights to start with. Rights whose king or rook is not on its
    /// original square are dropped when building.
    pub fn castling_rights(mut self, rights: CastlingRights) -> Self {
        self.castling_rights = Some(rights);
        self
    }

    /// Square skipped by the pawn that just double pushed.
    pub fn en_passant(mut self, square: Square) -> Self {
        self.en_passant = Some(square);
        self
    }

    /// Validates the setup and turns it into a position.
    /// # Errors
    /// Fails if either side does not have exactly one king, if a pawn stands on
    /// a back rank, if the en passant square is inconsistent or if the side that
    /// just moved is in check.
    pub fn build(self) -> Result<Position, SetupError> {
        let side_to_move = self.side_to_move.unwrap_or(Colour::White);
        let board = self.board;

        let mut kings = [None; NUM_COLOURS];
        for (square, piece) in board.pieces() {
            match piece.kind {
                PieceKind::King => {
                    if kings[piece.colour as usize].replace(square).is_some() {
                        return Err(SetupError::TooManyKings(piece.colour));
                    }
                }
                PieceKind::Pawn if square.row() == 0 || square.row() == 7 => {
                    return Err(SetupError::PawnOnBackRank(square))
                }
                _ => (),
            }
        }
        let [Some(white_king), Some(black_king)] = kings else {
            let missing = if kings[0].is_none() {
                Colour::White
            } else {
                Colour::Black
            };
            return Err(SetupError::MissingKing(missing));
        };

        let mut castling_rights = self.castling_rights.unwrap_or(CastlingRights::none());
        for colour in [Colour::White, Colour::Black] {
            let row = colour.back_row();
            let has = |col: u8, kind: PieceKind| {
                board.piece_on(Square::new(row, col)) == Some(Piece::new(kind, colour))
            };
            if !has(4, PieceKind::King) {
                castling_rights.disallow(colour);
            }
            if !has(7, PieceKind::Rook) {
                castling_rights.disallow_kingside_castle(colour);
            }
            if !has(0, PieceKind::Rook) {
                castling_rights.disallow_queenside_castle(colour);
            }
        }

        if let Some(square) = self.en_passant {
            // The pawn that skipped the square belongs to the side that just
            // moved and now stands one row further.
            let mover = side_to_move.inverse();
            let pawn_square = Square::try_new(
                square.row() as i8 + mover.forward(),
                square.col() as i8,
            );
            let skipped_row = (mover.pawn_row() as i8 + mover.forward()) as u8;
            if square.row() != skipped_row
                || !board.is_empty(square)
                || pawn_square.and_then(|sq| board.piece_on(sq))
                    != Some(Piece::new(PieceKind::Pawn, mover))
            {
                return Err(SetupError::InvalidEnPassant(square));
            }
        }

        let position = Position {
            board,
            side_to_move,
            kings: [white_king, black_king],
            castling_rights,
            en_passant: self.en_passant,
            history: Vec::new(),

            in_check: false,
            checkmate: false,
            stalemate: false,
        };

        let waiting = side_to_move.inverse();
        if AttackInformation::detect(&board, position.king_square(waiting), waiting).in_check() {
            return Err(SetupError::OpponentInCheck(waiting));
        }

        Ok(position)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn play(position: &mut Position, moves: &[&str]) {
        for mv in moves {
            position
                .make_squares(sq(&mv[0..2]), sq(&mv[2..4]), None)
                .unwrap();
        }
    }

    #[test]
    fn initial_position_has_twenty_moves() {
        let mut position = Position::initial();
        assert_eq!(position.legal_moves().len(), 20);
        assert_eq!(position.status(), GameStatus::Ongoing);
    }

    #[test]
    fn illegal_moves_are_rejected() {
        let mut position = Position::initial();
        let before = position.clone();
        assert_eq!(
            position.make_squares(sq("e2"), sq("e5"), None),
            Err(IllegalMoveError("e2e5".to_string()))
        );
        assert!(position.make_squares(sq("e7"), sq("e5"), None).is_err());
        assert_eq!(position, before);
    }

    #[test]
    fn unmake_on_empty_history_is_a_no_op() {
        let mut position = Position::initial();
        assert!(!position.unmake());
        assert_eq!(position, Position::initial());
    }

    #[test]
    fn double_push_sets_en_passant() {
        let mut position = Position::initial();
        play(&mut position, &["e2e4"]);
        assert_eq!(position.en_passant(), Some(sq("e3")));
        play(&mut position, &["g8f6"]);
        assert_eq!(position.en_passant(), None);
        position.unmake();
        assert_eq!(position.en_passant(), Some(sq("e3")));
    }

    #[test]
    fn king_cache_follows_the_king() {
        let mut position = Position::initial();
        play(&mut position, &["e2e4", "e7e5", "e1e2"]);
        assert_eq!(position.king_square(Colour::White), sq("e2"));
        assert!(!position.castling_rights().kingside_castle_allowed(Colour::White));
        assert!(!position.castling_rights().queenside_castle_allowed(Colour::White));
        position.unmake();
        assert_eq!(position.king_square(Colour::White), sq("e1"));
        assert_eq!(position.castling_rights(), CastlingRights::full());
    }

    #[test]
    fn notation_log() {
        let mut position = Position::initial();
        play(&mut position, &["e2e4", "e7e5", "d1h5"]);
        assert_eq!(position.notation_log(), "1. e4 e5 2. Qh5");
        assert_eq!(position.move_log().len(), 3);
        assert_eq!(position.last_move().map(|mv| mv.to_string()), Some("Qh5".to_string()));
    }

    #[test]
    fn legal_move_query_sets_flags_from_its_own_scan() {
        let mut position = Position::initial();
        play(&mut position, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(position.moves().is_empty());
        assert!(position.legal_moves().is_empty());
        assert!(position.in_check());
        assert!(position.is_checkmate());

        position.unmake();
        play(&mut position, &["d8g5"]);
        let moves = position.legal_moves();
        assert_eq!(moves, position.moves());
        assert!(!position.in_check());
        assert_eq!(position.status(), GameStatus::Ongoing);

        play(&mut position, &["e1f2", "g5e3"]);
        let moves = position.legal_moves();
        assert_eq!(position.status(), GameStatus::Check);
        assert_eq!(moves, position.moves());
        assert!(moves
            .iter()
            .all(|mv| mv.moved().kind == PieceKind::King || mv.end() == sq("e3")));
    }

    #[test]
    fn reset() {
        let mut position = Position::initial();
        play(&mut position, &["e2e4", "e7e5"]);
        position.reset();
        assert_eq!(position, Position::initial());
    }

    #[test]
    fn setup_errors() {
        let king = Piece::white(PieceKind::King);
        assert_eq!(
            Setup::new().place(sq("e1"), king).unwrap().place(sq("e1"), king).unwrap_err(),
            SetupError::SquareOccupied {
                square: sq("e1"),
                occupant: "wK".to_string()
            }
        );
        assert_eq!(
            Setup::new().place(sq("e1"), king).unwrap().build().unwrap_err(),
            SetupError::MissingKing(Colour::Black)
        );
        assert_eq!(
            Setup::new()
                .place(sq("e1"), king)
                .unwrap()
                .place(sq("a1"), king)
                .unwrap()
                .build()
                .unwrap_err(),
            SetupError::TooManyKings(Colour::White)
        );
        assert_eq!(
            Setup::new()
                .place(sq("e1"), king)
                .unwrap()
                .place(sq("e8"), Piece::black(PieceKind::King))
                .unwrap()
                .place(sq("a1"), Piece::black(PieceKind::Pawn))
                .unwrap()
                .build()
                .unwrap_err(),
            SetupError::PawnOnBackRank(sq("a1"))
        );
        assert_eq!(
            Setup::new()
                .place(sq("e1"), king)
                .unwrap()
                .place(sq("e8"), Piece::black(PieceKind::King))
                .unwrap()
                .place(sq("e2"), Piece::black(PieceKind::Rook))
                .unwrap()
                .side_to_move(Colour::Black)
                .build()
                .unwrap_err(),
            SetupError::OpponentInCheck(Colour::White)
        );
        assert_eq!(
            Setup::new()
                .place(sq("e1"), king)
                .unwrap()
                .place(sq("e8"), Piece::black(PieceKind::King))
                .unwrap()
                .en_passant(sq("d6"))
                .build()
                .unwrap_err(),
            SetupError::InvalidEnPassant(sq("d6"))
        );
    }

    #[test]
    fn setup_drops_unbacked_castling_rights() {
        let position = Setup::new()
            .place(sq("e1"), Piece::white(PieceKind::King))
            .unwrap()
            .place(sq("h1"), Piece::white(PieceKind::Rook))
            .unwrap()
            .place(sq("e8"), Piece::black(PieceKind::King))
            .unwrap()
            .castling_rights(CastlingRights::full())
            .build()
            .unwrap();
        assert_eq!(position.castling_rights().to_string(), "K");
    }
}
