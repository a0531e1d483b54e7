use super::{castling_rights::CastlingRights, moves::Move, square::Square};

/// Records the information lost when making a move, one entry per ply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HistoryEntry {
    /// The move as it was played, promotion piece included.
    pub played: Move,
    /// En passant target before the move.
    pub en_passant: Option<Square>,
    /// Castling rights before the move.
    pub castling_rights: CastlingRights,
}
