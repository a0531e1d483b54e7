use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
#[cfg(feature = "perft")]
use gambit::game::perft::PerftConfig;
use gambit::game::{
    piece::{PromotionChoice, PromotionParseError},
    position::{IllegalMoveError, Position},
    square::{Square, SquareParseError},
};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plays a game on the console, reading moves from standard input (DEFAULT)
    Play,
    /// Plays the given moves from the initial position and prints the game
    Replay {
        /// Moves in coordinate form, e.g. e2e4 or e7e8n
        moves: Vec<String>,
    },
    /// Runs perft (generating all moves up to a certain depth)
    Perft {
        /// Maximum depth to reach
        depth: u8,
        /// Shows move count for each move from the starting position
        #[arg(short)]
        divide: bool,
        /// Generates moves for each depth up to the maximum
        #[arg(short)]
        iterative: bool,
        /// Show timing information
        #[arg(long)]
        bench: bool,
        /// Counts legal moves at horizon nodes instead of playing each of them
        #[arg(short)]
        bulk: bool,
    },
}

#[derive(Error, Debug)]
enum InputError {
    #[error("Moves are written as <from><to>[promotion], e.g. e2e4 or e7e8n")]
    BadLength,
    #[error(transparent)]
    Square(#[from] SquareParseError),
    #[error(transparent)]
    Promotion(#[from] PromotionParseError),
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{input}: {source}")]
    Input { input: String, source: InputError },
    #[error(transparent)]
    Illegal(#[from] IllegalMoveError),
}

/// Splits `e7e8n` into its origin, target and optional promotion choice.
fn parse_coordinates(input: &str) -> Result<(Square, Square, Option<PromotionChoice>), InputError> {
    if !input.is_ascii() || !(4..=5).contains(&input.len()) {
        return Err(InputError::BadLength);
    }
    let start = input[0..2].parse()?;
    let end = input[2..4].parse()?;
    let promotion = input
        .get(4..5)
        .map(str::parse::<PromotionChoice>)
        .transpose()?;
    Ok((start, end, promotion))
}

fn print_position(out: &mut impl Write, position: &Position) -> io::Result<()> {
    writeln!(out, "{}", position.board())?;
    if position.is_checkmate() || position.is_stalemate() {
        writeln!(out, "{}", position.status())
    } else if position.in_check() {
        writeln!(out, "{} to move, in check", position.side_to_move())
    } else {
        writeln!(out, "{} to move", position.side_to_move())
    }
}

fn play() -> Result<(), CliError> {
    let mut position = Position::initial();
    let mut moves = position.legal_moves();
    let mut out = io::stdout().lock();
    print_position(&mut out, &position)?;

    for line in io::stdin().lock().lines() {
        match line?.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "undo" => {
                if !position.unmake() {
                    writeln!(out, "Nothing to undo")?;
                    continue;
                }
            }
            "reset" => position.reset(),
            "moves" => {
                let list: Vec<String> = moves.iter().map(|mv| mv.to_string()).collect();
                writeln!(out, "{}", list.join(" "))?;
                continue;
            }
            "log" => {
                writeln!(out, "{}", position.notation_log())?;
                continue;
            }
            input => {
                let (start, end, promotion) = match parse_coordinates(input) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        writeln!(out, "{input}: {e}")?;
                        continue;
                    }
                };
                if let Err(e) = position.make_squares(start, end, promotion) {
                    writeln!(out, "{e}")?;
                    continue;
                }
            }
        }

        moves = position.legal_moves();
        print_position(&mut out, &position)?;
    }
    Ok(())
}

fn replay(inputs: &[String]) -> Result<(), CliError> {
    let mut position = Position::initial();
    for input in inputs {
        let (start, end, promotion) =
            parse_coordinates(input).map_err(|source| CliError::Input {
                input: input.clone(),
                source,
            })?;
        position.make_squares(start, end, promotion)?;
        position.legal_moves();
    }

    let mut out = io::stdout().lock();
    print_position(&mut out, &position)?;
    writeln!(out, "{}", position.notation_log())?;
    Ok(())
}

pub fn main() -> ExitCode {
    let args = Arguments::parse();
    env_logger::init();

    let result = match args.command.unwrap_or(Command::Play) {
        Command::Play => play(),
        Command::Replay { moves } => replay(&moves),
        #[cfg(feature = "perft")]
        Command::Perft {
            depth,
            divide,
            iterative,
            bench,
            bulk,
        } => {
            PerftConfig::default()
                .with_depth(depth)
                .divide_moves(divide)
                .iterative_deepening(iterative)
                .benchmark(bench)
                .bulk_counting(bulk)
                .go(&mut Position::initial());
            Ok(())
        }
        #[cfg(not(feature = "perft"))]
        Command::Perft { .. } => {
            eprintln!("Gambit has not been compiled with feature `perft`");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
