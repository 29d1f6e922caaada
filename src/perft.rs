//! Perft walks the legal move tree to a fixed depth and counts leaf
//! nodes. The counts for the classic reference positions are known, so
//! any generation or make/unmake bug shows up as a count drift.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Debug)]
pub struct PerftResult {
    pub nodes: u64,
    pub duration: Duration,
    /// Nodes per second over the whole run
    pub nps: u64,
    /// Per-root-move subtotals when running a divide
    pub move_counts: Option<Vec<(Move, u64)>>,
}

impl PerftResult {
    pub fn new(nodes: u64, duration: Duration, move_counts: Option<Vec<(Move, u64)>>) -> Self {
        let nanos = duration.as_nanos();
        let nps = if nanos > 0 {
            (nodes as u128 * 1_000_000_000 / nanos) as u64
        } else {
            0
        };

        Self {
            nodes,
            duration,
            nps,
            move_counts,
        }
    }
}

/// Counts leaf nodes of the legal move tree, `depth` plies deep.
/// With `divide` set, also collects the subtotal under each root move.
pub fn perft(board: &mut Board, depth: u8, divide: bool) -> PerftResult {
    let start = Instant::now();

    if depth == 0 {
        return PerftResult::new(1, start.elapsed(), None);
    }

    let legal = board.generate_legal_moves();

    if depth == 1 {
        let counts = divide.then(|| legal.into_iter().map(|m| (m, 1)).collect());
        return PerftResult::new(legal.len() as u64, start.elapsed(), counts);
    }

    let mut nodes = 0u64;
    let mut counts = divide.then(|| Vec::with_capacity(legal.len()));

    for m in legal {
        let undo = match board.make_move(m) {
            Ok(undo) => undo,
            Err(_) => continue,
        };

        let sub = perft(board, depth - 1, false).nodes;

        board
            .unmake_move(&undo)
            .wrap_err_with(|| format!("unmaking {} at depth {depth}", m.uci()))
            .expect("a legal move must unmake cleanly");

        nodes += sub;

        if let Some(counts) = counts.as_mut() {
            counts.push((m, sub));
        }
    }

    PerftResult::new(nodes, start.elapsed(), counts)
}

/// Runs a perft and prints the per-root-move breakdown.
pub fn perft_divide(board: &mut Board, depth: u8) -> PerftResult {
    let result = perft(board, depth, true);

    if let Some(counts) = result.move_counts.as_deref() {
        println!("divide at depth {depth}");
        for (m, count) in counts {
            println!("  {}: {count}", m.uci());
        }
        println!(
            "{} nodes in {} ms ({} nps)",
            result.nodes,
            result.duration.as_millis(),
            result.nps
        );
    }

    result
}

/// Runs perft for every depth from 1 through `max_depth`, printing a row per depth.
pub fn run_perft_suite(board: &mut Board, max_depth: u8) {
    println!("perft to depth {max_depth}");

    for depth in 1..=max_depth {
        let result = perft(board, depth, false);
        println!(
            "  depth {depth}: {} nodes in {} ms ({} nps)",
            result.nodes,
            result.duration.as_millis(),
            result.nps
        );
    }
}

/// A perft suite file: named positions with expected node counts per depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerftSuite {
    pub position: Vec<PerftPosition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerftPosition {
    pub name: String,
    pub fen: String,
    /// Expected node counts, one entry per depth starting at depth 1.
    pub nodes: Vec<u64>,
}

/// Reads a [`PerftSuite`] from a TOML file.
pub fn load_suite(path: &Path) -> miette::Result<PerftSuite> {
    let text = fs::read_to_string(path)
        .into_diagnostic()
        .with_context(|| format!("Reading perft suite from {}", path.display()))?;
    toml::from_str(&text)
        .into_diagnostic()
        .with_context(|| format!("Parsing perft suite from {}", path.display()))
}

/// The six reference positions everyone checks movegen against.
pub fn default_suite() -> PerftSuite {
    let case = |name: &str, fen: &str, nodes: &[u64]| PerftPosition {
        name: name.into(),
        fen: fen.into(),
        nodes: nodes.into(),
    };

    PerftSuite {
        position: vec![
            case("startpos", START_FEN, &[20, 400, 8902, 197281]),
            case("kiwipete", KIWIPETE, &[48, 2039, 97862]),
            case(
                "endgame",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
                &[14, 191, 2812, 43238],
            ),
            case(
                "promotions",
                "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
                &[6, 264, 9467],
            ),
            case(
                "buggy-bishop",
                "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
                &[44, 1486, 62379],
            ),
            case(
                "symmetrical",
                "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
                &[46, 2079, 89890],
            ),
        ],
    }
}

/// Checks every position in the suite at every listed depth.
/// Fails with a diagnostic if any count drifts from the expected value.
pub fn run_toml_suite(suite: &PerftSuite) -> miette::Result<()> {
    let mut failures = 0usize;

    for case in &suite.position {
        let mut board =
            fen::parse_fen(&case.fen).with_context(|| format!("Suite position '{}'", case.name))?;

        println!("{}: {}", case.name, case.fen);

        for (i, &expected) in case.nodes.iter().enumerate() {
            let depth = (i + 1) as u8;
            let result = perft(&mut board, depth, false);

            if result.nodes == expected {
                println!(
                    "  depth {depth}: {} nodes in {} ms ({} nps)",
                    result.nodes,
                    result.duration.as_millis(),
                    result.nps
                );
            } else {
                failures += 1;
                println!(
                    "  depth {depth}: FAIL got {} expected {expected}",
                    result.nodes
                );
            }
        }
    }

    miette::ensure!(failures == 0, "{failures} perft check(s) failed");
    Ok(())
}

#[cfg(test)]
mod perft_tests {
    use super::*;
    use crate::init;

    /// Walks `fen` at depth 1, 2, ... and compares against the known counts.
    fn assert_counts(fen: &str, expected: &[u64]) {
        init();
        let mut board = Board::from_fen(fen);

        for (i, &want) in expected.iter().enumerate() {
            let depth = (i + 1) as u8;
            let got = perft(&mut board, depth, false).nodes;
            assert_eq!(got, want, "count drifted at depth {depth} for {fen}");
        }
    }

    #[test]
    fn reference_counts_from_the_start_position() {
        // Depth 5 is 4.8M nodes, too slow for an unoptimised test run
        assert_counts(START_FEN, &[20, 400, 8902, 197281]);
    }

    #[test]
    fn reference_counts_from_kiwipete() {
        assert_counts(KIWIPETE, &[48, 2039, 97862]);
    }

    #[test]
    fn reference_counts_from_a_rook_endgame() {
        assert_counts(
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            &[14, 191, 2812, 43238],
        );
    }

    #[test]
    fn reference_counts_through_promotions() {
        assert_counts(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &[6, 264, 9467],
        );
    }

    #[test]
    fn divide_sums_to_total() {
        init();
        let mut board = Board::new();

        let result = perft(&mut board, 3, true);
        let counts = result.move_counts.expect("divide must collect subtotals");

        assert_eq!(counts.len(), 20, "startpos has 20 root moves");
        assert_eq!(
            counts.iter().map(|&(_, n)| n).sum::<u64>(),
            result.nodes,
            "per-move subtotals must sum to the total"
        );
    }

    #[test]
    fn perft_leaves_board_unchanged() {
        init();
        let mut board = Board::from_fen(KIWIPETE);
        let original = board;

        perft(&mut board, 3, false);

        assert_eq!(
            board, original,
            "a perft walk must unmake every move it made"
        );
    }

    #[test]
    fn suite_parses_from_toml() {
        init();
        let text = r#"
            [[position]]
            name = "startpos"
            fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            nodes = [20, 400]
        "#;

        let suite: PerftSuite = toml::from_str(text).unwrap();
        assert_eq!(suite.position.len(), 1);
        assert_eq!(suite.position[0].name, "startpos");
        assert_eq!(suite.position[0].nodes, vec![20, 400]);

        run_toml_suite(&suite).expect("counts in the suite are correct");
    }

    #[test]
    fn suite_flags_wrong_counts() {
        init();
        let suite = PerftSuite {
            position: vec![PerftPosition {
                name: "bogus".into(),
                fen: START_FEN.into(),
                nodes: vec![21],
            }],
        };

        assert!(
            run_toml_suite(&suite).is_err(),
            "a drifted count must fail the suite"
        );
    }

    #[test]
    fn default_suite_holds_at_shallow_depth() {
        init();
        let mut suite = default_suite();
        for case in &mut suite.position {
            case.nodes.truncate(2);
        }

        run_toml_suite(&suite).expect("reference counts must hold");
    }
}
