use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::START_FEN;
use crate::moves::move_gen::GenType;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"), version = env!("APP_VERSION"), about = env!("CARGO_PKG_DESCRIPTION") )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count leaf nodes of the legal move tree for a position
    Perft {
        /// FEN string for the starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// depth of the tree walk
        #[arg(short, long, default_value = "5")]
        depth: u8,
        /// print per-root-move subtotals instead of a depth table
        #[arg(long, default_value = "false")]
        divide: bool,
    },

    /// List one generation category for a position
    Moves {
        /// FEN string for the position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// which slice of the move space to list
        #[arg(short, long, value_enum, default_value_t = Category::Legal)]
        category: Category,
    },

    /// Check perft counts against a TOML suite file
    Suite {
        /// path to a suite file; the built-in suite runs when omitted
        path: Option<PathBuf>,
    },

    /// Walk a position interactively
    Explore {
        /// FEN string for the starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
    },
}

/// Generation category names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    Captures,
    Quiets,
    QuietChecks,
    Evasions,
    NonEvasions,
    Legal,
}

impl Category {
    pub const fn gen_type(self) -> GenType {
        match self {
            Category::Captures => GenType::Captures,
            Category::Quiets => GenType::Quiets,
            Category::QuietChecks => GenType::QuietChecks,
            Category::Evasions => GenType::Evasions,
            Category::NonEvasions => GenType::NonEvasions,
            Category::Legal => GenType::Legal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "explore_cmd", no_binary_name = true)]
pub struct ExploreCommand {
    #[command(subcommand)]
    pub cmd: ExploreSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ExploreSubcommand {
    /// Play a move in coordinate notation; castling is king-takes-rook (e1h1)
    #[clap(visible_alias = "m")]
    Move { mv: String },

    /// Take back the last move played
    #[clap(visible_alias = "u")]
    Undo,

    /// Redraw the board as it stands
    #[clap(visible_alias = "p")]
    Print,

    /// List a category of moves for the current position
    #[clap(visible_alias = "l")]
    List {
        #[arg(value_enum, default_value_t = Category::Legal)]
        category: Category,
    },

    /// Count nodes to the given depth [default: 5]
    #[clap(visible_alias = "pe")]
    Perft {
        depth: Option<u8>,
        #[arg(short, default_value = "false")]
        divide: bool,
    },

    /// Show the current fen of the board, or set a new position
    #[clap(visible_alias = "f")]
    Fen { set: Option<String> },

    /// Wipe the screen
    #[clap(visible_alias = "c")]
    Clear,

    /// Reset to the position the explorer started with
    #[clap(visible_alias = "r")]
    Restart,

    /// Set console log verbosity
    #[clap(visible_alias = "v")]
    Verbosity {
        /// trace, debug, info, warn or error
        level: tracing::Level,
    },

    /// Turn the timestamped file log on or off
    #[clap(visible_alias = "fl")]
    FileLog { enable: bool },

    /// Quit the explorer
    #[clap(visible_alias = "q")]
    Quit,
}
