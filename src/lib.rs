//! # Gambit
//! A chess rules engine: it keeps track of a game, generates strictly legal moves
//! (pins, checks, castling, en passant and promotions included), makes and undoes
//! them, and detects checkmate and stalemate.
//!
//! Drawing the board and reading user input is left to the caller, which asks a
//! [`Position`](game::position::Position) for its legal moves and plays the one
//! the user picked.

pub mod game;
