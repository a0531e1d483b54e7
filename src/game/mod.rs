//! # Chess API
//! This module contains everything Chess related: the board, moves, pins and
//! checks, move generation and the game state.

pub mod attacks;
pub mod board;
pub mod castling_rights;
pub mod colour;
mod history;
mod movegen;
pub mod moves;
#[cfg(feature = "perft")]
pub mod perft;
pub mod piece;
pub mod position;
pub mod square;
