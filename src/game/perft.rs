//! # Perft testing/benchmarking
//!
//! Counts the leaf nodes of the move tree up to a given depth. Promotions count
//! as a single move, since the promotion piece is chosen when the move is made.

use std::time::Instant;

use super::{piece::PromotionChoice, position::Position};

/// Builder pattern to configure a Perft test.
#[derive(Clone, Debug, Default)]
pub struct PerftConfig {
    pub depth: u8,
    pub iterative: bool,
    pub bulk_counting: bool,
    pub divide: bool,

    pub bench: bool,
}
impl PerftConfig {
    /// Sets the maximum depth of the perft run.
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// If set to true, the run will start from all depth between 1 and the maximum.
    pub fn iterative_deepening(mut self, value: bool) -> Self {
        self.iterative = value;
        self
    }

    /// If set to true, simply returns the number of the legal moves at horizon nodes.
    pub fn bulk_counting(mut self, value: bool) -> Self {
        self.bulk_counting = value;
        self
    }

    /// Shows perft results per legal move at the starting position.
    pub fn divide_moves(mut self, value: bool) -> Self {
        self.divide = value;
        self
    }

    /// Measures the time it takes to complete one depth.
    pub fn benchmark(mut self, value: bool) -> Self {
        self.bench = value;
        self
    }

    /// Runs a Perft test on the given position, printing the results.
    pub fn go(&self, position: &mut Position) {
        for depth in (if self.iterative { 1 } else { self.depth })..=self.depth {
            if depth == 0 {
                println!("depth 0: 1 nodes");
                continue;
            }
            if self.iterative && self.divide {
                println!("====== DEPTH {depth} ======")
            }

            let start = Instant::now();
            let nodes: u64 = position
                .moves()
                .iter()
                .map(|&mv| {
                    position.play(mv, PromotionChoice::default());
                    let mv_nodes = perft_rec(position, depth - 1, self.bulk_counting);
                    position.unmake();
                    if self.divide {
                        println!("{}: {mv_nodes} nodes", mv.coordinates());
                    }
                    mv_nodes
                })
                .sum();
            let elapsed = start.elapsed().as_secs_f64();
            println!("depth {depth}: {nodes} nodes");
            if self.bench {
                println!(
                    "\ttook {} ({})",
                    human_readable_time(elapsed),
                    human_readable_nps(nodes as f64 / elapsed)
                );
            }
        }
    }
}

/// Number of leaf nodes reachable from `position` in exactly `depth` plies.
pub fn perft(position: &mut Position, depth: u8) -> u64 {
    perft_rec(position, depth, true)
}

/// Traverses all nodes accessible from a given position, returning the number of
/// nodes traversed.
fn perft_rec(position: &mut Position, depth_left: u8, bulk_counting: bool) -> u64 {
    if depth_left == 0 {
        1
    } else if depth_left == 1 && bulk_counting {
        position.moves().len() as u64
    } else {
        position
            .moves()
            .iter()
            .map(|&mv| {
                position.play(mv, PromotionChoice::default());
                let mv_nodes = perft_rec(position, depth_left - 1, bulk_counting);
                position.unmake();
                mv_nodes
            })
            .sum()
    }
}

fn human_readable_time(secs: f64) -> String {
    if secs < 0.000_001 {
        format!("{:.3}ns", secs * 1_000_000_000.)
    } else if secs < 0.001 {
        format!("{:.3}µs", secs * 1_000_000.)
    } else if secs < 1. {
        format!("{:.3}ms", secs * 1_000.)
    } else {
        format!("{secs:.3}s")
    }
}

fn human_readable_nps(nps: f64) -> String {
    if nps > 1_000_000_000. {
        format!("{:.3}Gnps", nps / 1_000_000_000.)
    } else if nps > 1_000_000. {
        format!("{:.3}Mnps", nps / 1_000_000.)
    } else if nps > 1_000. {
        format!("{:.3}Knps", nps / 1_000.)
    } else {
        format!("{nps:.3}nps")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::{
        castling_rights::CastlingRights,
        colour::Colour,
        piece::{Piece, PieceKind},
        position::Setup,
    };

    fn check_matching(position: &mut Position, expected: &[u64]) {
        for (depth, expected) in expected.iter().enumerate() {
            let actual = perft(position, depth as u8 + 1);
            assert_eq!(
                actual,
                *expected,
                "Expected {expected} at depth {} for\n{position}\nbut got {actual}",
                depth + 1,
            );
        }
    }

    #[test]
    fn initial_position_perft() {
        check_matching(&mut Position::initial(), &[20, 400, 8902, 197281])
    }

    #[test]
    #[ignore]
    fn initial_position_perft_deep() {
        check_matching(&mut Position::initial(), &[20, 400, 8902, 197281, 4865609])
    }

    /// 8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -, where en passant captures can
    /// uncover a king along its rank.
    fn endgame() -> Position {
        let pieces = [
            ("c7", Piece::black(PieceKind::Pawn)),
            ("d6", Piece::black(PieceKind::Pawn)),
            ("a5", Piece::white(PieceKind::King)),
            ("b5", Piece::white(PieceKind::Pawn)),
            ("h5", Piece::black(PieceKind::Rook)),
            ("b4", Piece::white(PieceKind::Rook)),
            ("f4", Piece::black(PieceKind::Pawn)),
            ("h4", Piece::black(PieceKind::King)),
            ("e2", Piece::white(PieceKind::Pawn)),
            ("g2", Piece::white(PieceKind::Pawn)),
        ];
        pieces
            .into_iter()
            .fold(Setup::new(), |setup, (square, piece)| {
                setup.place(square.parse().unwrap(), piece).unwrap()
            })
            .side_to_move(Colour::White)
            .castling_rights(CastlingRights::none())
            .build()
            .unwrap()
    }

    #[test]
    fn endgame_perft() {
        check_matching(&mut endgame(), &[14, 191, 2812, 43238])
    }

    #[test]
    #[ignore]
    fn endgame_perft_deep() {
        check_matching(&mut endgame(), &[14, 191, 2812, 43238, 674624])
    }

    #[test]
    fn bulk_counting_matches_full_playout() {
        let mut position = endgame();
        for depth in 1..=3 {
            assert_eq!(
                perft_rec(&mut position, depth, true),
                perft_rec(&mut position, depth, false)
            );
        }
        let mut position = Position::initial();
        let before = position.clone();
        PerftConfig::default()
            .with_depth(2)
            .bulk_counting(true)
            .go(&mut position);
        assert_eq!(position, before);
    }

    #[test]
    fn perft_leaves_the_position_untouched() {
        let mut position = Position::initial();
        let before = position.clone();
        PerftConfig::default()
            .with_depth(2)
            .divide_moves(true)
            .go(&mut position);
        assert_eq!(position, before);
    }
}
