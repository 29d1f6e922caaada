use miette::{Context, IntoDiagnostic};

use super::{
    Board,
    components::{Piece, Side, Square},
};
use crate::moves::precomputed::MOVE_TABLES;

/// Builds a [`Board`] from a FEN record.
///
/// The first four fields are required; the halfmove clock and fullmove
/// counter default to `0` and `1` when absent, as test positions often
/// omit them. The castling field accepts the classical `KQkq` letters,
/// where each letter resolves to the outermost rook on that wing, and
/// Shredder-FEN file letters (`HAha`) for Chess960 positions.
pub fn parse_fen(fen: &str) -> miette::Result<Board> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    miette::ensure!(
        parts.len() >= 4,
        "FEN needs at least 4 fields, got {} in '{fen}'",
        parts.len()
    );

    let mut board = Board::empty();
    place_pieces(&mut board, parts[0])
        .with_context(|| format!("placing pieces from '{}'", parts[0]))?;
    board.stm = parse_stm(parts[1]).with_context(|| format!("parsed stm input: {}", parts[1]))?;
    parse_castle(&mut board, parts[2])
        .with_context(|| format!("parsed input castle: {}", parts[2]))?;
    board.enpassant_square = parse_enpassant(parts[3])
        .with_context(|| format!("parsed input enpassant: {}", parts[3]))?;

    // Keep the en-passant square only when a pawn is placed to use it.
    if board.enpassant_square.is_some() {
        let ep = board.enpassant_square.index();
        let capturers = MOVE_TABLES.get_pawn_attacks(ep, board.stm.flip())
            & *board.positions.get_piece_bb(board.stm, Piece::Pawn);
        if capturers.is_empty() {
            board.enpassant_square = Square::NONE;
        }
    }

    if let Some(half_move) = parts.get(4) {
        board.halfmove_clock = half_move
            .parse::<u8>()
            .into_diagnostic()
            .with_context(|| format!("attempt to parse halfmove clock '{half_move}'"))?;
    }
    if let Some(full_move) = parts.get(5) {
        board.fullmove_counter = full_move
            .parse::<u16>()
            .into_diagnostic()
            .with_context(|| format!("attempt to parse fullmove counter '{full_move}'"))?;
    }

    Ok(board)
}

fn place_pieces(board: &mut Board, placement: &str) -> miette::Result<()> {
    let ranks: Vec<&str> = placement.split('/').collect();
    miette::ensure!(
        ranks.len() == 8,
        "expected 8 ranks in piece placement, got {}",
        ranks.len()
    );

    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - row;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
                continue;
            }
            let (side, piece) = piece_from_char(c)
                .with_context(|| format!("unexpected piece character '{c}'"))?;
            miette::ensure!(file < 8, "rank '{rank_str}' overflows the board");
            board.positions.set(side, piece, rank * 8 + file)?;
            file += 1;
        }
        miette::ensure!(
            file == 8,
            "rank '{rank_str}' describes {file} files instead of 8"
        );
    }
    Ok(())
}

fn piece_from_char(c: char) -> Option<(Side, Piece)> {
    for (side, chars) in Side::SIDES.iter().zip(Piece::PIECE_CHARS.iter()) {
        if let Some(index) = chars.iter().position(|&pc| pc == c) {
            return Some((*side, Piece::from_index(index)));
        }
    }
    None
}

fn parse_stm(stm: &str) -> miette::Result<Side> {
    match stm {
        "w" => Ok(Side::White),
        "b" => Ok(Side::Black),
        _ => Err(miette::Error::msg("Invalid stm")),
    }
}

/// Fills in castling rights together with the rook squares and path
/// masks they imply. Board placement must already be done.
fn parse_castle(board: &mut Board, castle: &str) -> miette::Result<()> {
    for c in castle.chars() {
        match c {
            '-' => {}
            'K' => {
                let rook = find_castling_rook(board, Side::White, true)?;
                board.set_castling_right(Side::White, rook);
            }
            'Q' => {
                let rook = find_castling_rook(board, Side::White, false)?;
                board.set_castling_right(Side::White, rook);
            }
            'k' => {
                let rook = find_castling_rook(board, Side::Black, true)?;
                board.set_castling_right(Side::Black, rook);
            }
            'q' => {
                let rook = find_castling_rook(board, Side::Black, false)?;
                board.set_castling_right(Side::Black, rook);
            }
            'A'..='H' | 'a'..='h' => {
                let side = if c.is_ascii_uppercase() {
                    Side::White
                } else {
                    Side::Black
                };
                let file = (c.to_ascii_lowercase() as u8 - b'a') as usize;
                let rook = Square::from_index(side.back_rank() * 8 + file);
                miette::ensure!(
                    board.positions.get_piece_at(&rook) == Some((Piece::Rook, side)),
                    "castling field names {rook}, but no {side} rook stands there"
                );
                board.set_castling_right(side, rook);
                board.chess960 = true;
            }
            _ => {
                return Err(miette::Error::msg(
                    "Unexpected character while parsing CastlingRights",
                ));
            }
        }
    }
    Ok(())
}

/// Resolves a classical `KQkq` letter to the outermost rook on that wing
/// of the king, which also covers X-FEN records of Chess960 positions.
fn find_castling_rook(board: &Board, side: Side, kingside: bool) -> miette::Result<Square> {
    let king_file = board.king_square(side).col();
    let rank = side.back_rank();
    let files: Vec<usize> = if kingside {
        (king_file + 1..8).rev().collect()
    } else {
        (0..king_file).collect()
    };

    for file in files {
        let square = Square::from_index(rank * 8 + file);
        if board.positions.get_piece_at(&square) == Some((Piece::Rook, side)) {
            return Ok(square);
        }
    }
    Err(miette::Error::msg(format!(
        "no {side} rook found for the {} castling right",
        if kingside { "kingside" } else { "queenside" }
    )))
}

fn parse_enpassant(enpassant: &str) -> miette::Result<Square> {
    if enpassant == "-" {
        Ok(Square::NONE)
    } else {
        let file = enpassant
            .chars()
            .next()
            .ok_or_else(|| miette::Error::msg("Missing en passant file"))?;
        let rank = enpassant
            .chars()
            .nth(1)
            .ok_or_else(|| miette::Error::msg("Missing en passant rank"))?;
        Square::enpassant_from_index(file, rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init;
    use crate::prelude::*;

    #[test]
    fn test_parse_fen() {
        init();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let board = parse_fen(fen).unwrap();
        assert_eq!(board.stm, Side::White);
        assert_eq!(board.castling_rights, CastlingRights::all());
        assert_eq!(board.enpassant_square, Square::NONE);
        assert_eq!(board.halfmove_clock, 0);
        assert_eq!(board.fullmove_counter, 1);
        assert!(!board.chess960);
        assert_eq!(
            board.castling_rook_square(Side::White, true),
            Square::from_index(7)
        );
        assert_eq!(
            board.castling_rook_square(Side::Black, false),
            Square::from_index(56)
        );
    }

    #[test]
    fn test_parse_fen_without_clocks() {
        init();
        let board = parse_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -").unwrap();
        assert_eq!(board.halfmove_clock, 0);
        assert_eq!(board.fullmove_counter, 1);
        assert!(board.castling_rights.is_empty());
    }

    #[test]
    fn test_clock_fields_must_be_numeric() {
        init();
        assert!(parse_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - x 1").is_err());
        assert!(parse_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 one").is_err());

        let board = parse_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 99 450").unwrap();
        assert_eq!(board.halfmove_clock, 99);
        assert_eq!(board.fullmove_counter, 450);
    }

    #[test]
    fn test_parse_enpassant() {
        // Valid en passant
        let enpassant = "e3";
        let square = parse_enpassant(enpassant).unwrap();
        assert_eq!(square, Square::new(20).unwrap());

        // Invalid en passant (missing rank)
        let enpassant_missing_rank = "e";
        assert!(parse_enpassant(enpassant_missing_rank).is_err());

        // Invalid en passant (missing file)
        let enpassant_missing_file = "";
        assert!(parse_enpassant(enpassant_missing_file).is_err());

        // En passant disabled
        let enpassant_disabled = "-";
        assert_eq!(parse_enpassant(enpassant_disabled).unwrap(), Square::NONE);
    }

    #[test]
    fn test_unusable_enpassant_square_is_dropped() {
        init();
        // Black just played e7e5, but no white pawn can capture on e6.
        let board =
            parse_fen("rnbqkbnr/pppp1ppp/8/4p3/8/8/PPPPPPPP/RNBQKBNR w KQkq e6 0 2").unwrap();
        assert_eq!(board.enpassant_square, Square::NONE);

        // With a white pawn on d5 the capture is live, so the square stays.
        let board =
            parse_fen("rnbqkbnr/pppp1ppp/8/3Pp3/8/8/PPP1PPPP/RNBQKBNR w KQkq e6 0 2").unwrap();
        assert_eq!(board.enpassant_square, Square::from_index(44));
    }

    #[test]
    fn test_parse_shredder_castling() {
        init();
        let board =
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w HAha - 0 1").unwrap();
        assert!(board.chess960);
        assert_eq!(board.castling_rights, CastlingRights::all());
        assert_eq!(
            board.castling_rook_square(Side::White, true),
            Square::from_index(7)
        );
        assert_eq!(
            board.castling_rook_square(Side::White, false),
            Square::from_index(0)
        );
    }

    #[test]
    fn test_nonstandard_placement_flips_chess960() {
        init();
        // King on b1 with a rook on c1: legal only under Chess960 rules.
        let board = parse_fen("5k2/8/8/8/8/8/8/1KR5 w K - 0 1").unwrap();
        assert!(board.chess960);
        assert_eq!(
            board.castling_rook_square(Side::White, true),
            Square::from_index(2)
        );
    }

    #[test]
    fn test_fen_round_trip() {
        init();
        for fen in [
            crate::consts::START_FEN,
            crate::consts::KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        ] {
            let board = parse_fen(fen).unwrap();
            assert_eq!(board.to_fen(), fen, "round trip broke for {fen}");
        }
    }
}
