use std::io::{BufRead, Write};

use clap::Parser;
use coup::moves::move_gen::{self, GenType};
use coup::prelude::*;
use coup::utils::clear_screen;
use tracing::{Level, span, trace};

fn main() -> miette::Result<()> {
    init();

    let span = span!(Level::DEBUG, "main");
    let _guard = span.enter();
    match Cli::parse().command {
        Some(cmd) => match cmd {
            Commands::Perft { fen, depth, divide } => {
                trace!("Running perft with fen: {fen:?}, depth: {depth}, divide: {divide}");
                let mut board = fen::parse_fen(&fen)?;
                println!("{board}");
                if divide {
                    perft::perft_divide(&mut board, depth);
                } else {
                    perft::run_perft_suite(&mut board, depth);
                }
            }
            Commands::Moves { fen, category } => {
                trace!("Listing {category:?} moves for fen: {fen:?}");
                let board = fen::parse_fen(&fen)?;
                let list = generate_category(&board, category)?;
                for m in list.iter() {
                    println!("{}", m.uci());
                }
                println!("{} {:?} moves", list.len(), category);
            }
            Commands::Suite { path } => {
                trace!("Running perft suite from {path:?}");
                let suite = match path {
                    Some(path) => perft::load_suite(&path)?,
                    None => perft::default_suite(),
                };
                perft::run_toml_suite(&suite)?;
            }
            Commands::Explore { fen } => {
                trace!("Exploring from fen: {fen:?}");
                explore(&fen)?;
            }
        },
        None => explore(START_FEN)?,
    }
    Ok(())
}

/// Generates one category, refusing combinations the generator does not
/// define instead of tripping its debug assertions.
fn generate_category(board: &Board, category: Category) -> miette::Result<MoveBuffer> {
    match category.gen_type() {
        GenType::Evasions => {
            miette::ensure!(board.in_check(), "evasions are only defined in check")
        }
        GenType::Legal => {}
        _ => miette::ensure!(
            !board.in_check(),
            "{category:?} moves are only defined outside of check; use evasions or legal"
        ),
    }
    Ok(move_gen::generate(board, category.gen_type()))
}

/// Interactive position walker. Reads one command per line; `help` lists them.
fn explore(start_fen: &str) -> miette::Result<()> {
    let mut board = fen::parse_fen(start_fen)?;
    let mut history: Vec<MoveInfo> = Vec::new();
    println!("{board}");

    let stdin = std::io::stdin();
    loop {
        print!("coup> ");
        std::io::stdout().flush().into_diagnostic()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).into_diagnostic()? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let words = match shell_words::split(line) {
            Ok(words) => words,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        let cmd = match ExploreCommand::try_parse_from(&words) {
            Ok(parsed) => parsed.cmd,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match cmd {
            ExploreSubcommand::Move { mv } => {
                let wanted = mv.to_lowercase();
                let found = board.generate_legal_moves().into_iter().find(|m| m.uci() == wanted);
                match found {
                    Some(m) => {
                        history.push(board.make_move(m)?);
                        println!("{board}");
                    }
                    None => println!("'{mv}' is not legal here (castling is king-takes-rook)"),
                }
            }
            ExploreSubcommand::Undo => match history.pop() {
                Some(undo) => {
                    board.unmake_move(&undo)?;
                    println!("{board}");
                }
                None => println!("nothing to undo"),
            },
            ExploreSubcommand::Print => println!("{board}"),
            ExploreSubcommand::List { category } => match generate_category(&board, category) {
                Ok(list) => {
                    for m in list.iter() {
                        println!("{}", m.uci());
                    }
                    println!("{} {:?} moves", list.len(), category);
                }
                Err(err) => println!("{err}"),
            },
            ExploreSubcommand::Perft { depth, divide } => {
                let depth = depth.unwrap_or(5);
                if divide {
                    perft::perft_divide(&mut board, depth);
                } else {
                    perft::run_perft_suite(&mut board, depth);
                }
            }
            ExploreSubcommand::Fen { set } => match set {
                Some(new_fen) => match fen::parse_fen(&new_fen) {
                    Ok(parsed) => {
                        board = parsed;
                        history.clear();
                        println!("{board}");
                    }
                    Err(err) => println!("{err}"),
                },
                None => println!("{}", board.to_fen()),
            },
            ExploreSubcommand::Clear => clear_screen()?,
            ExploreSubcommand::Restart => {
                board = fen::parse_fen(start_fen)?;
                history.clear();
                println!("{board}");
            }
            ExploreSubcommand::Verbosity { level } => match set_log_level(level) {
                Ok(()) => println!("console log level set to {level}"),
                Err(err) => println!("{err}"),
            },
            ExploreSubcommand::FileLog { enable } => match toggle_file_logging(enable) {
                Ok(()) => println!("file logging {}", if enable { "on" } else { "off" }),
                Err(err) => println!("{err}"),
            },
            ExploreSubcommand::Quit => break,
        }
    }
    Ok(())
}
