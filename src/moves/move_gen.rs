//! Category-driven move generation.
//!
//! Callers ask for one slice of the move space at a time: captures,
//! quiet moves, quiet checks, check evasions, the pseudo-legal union, or
//! the fully legal list. Staged generation keeps search loops cheap;
//! they can try captures first and only pay for quiets when needed.
//!
//! Apart from [`generate_legal`], every function produces pseudo-legal
//! moves: pins and exposed kings are not resolved. Filter through
//! [`Board::is_legal`] before applying a move to a real game.

use super::check_info::CheckInfo;
use crate::board::relative_square;
use crate::prelude::*;

/// Which slice of the move space to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenType {
    /// Captures, en passant, and queen promotions. The non-capturing
    /// push to the promotion rank belongs here too.
    Captures,
    /// Non-captures plus rook, bishop and knight underpromotions,
    /// capturing ones included. The complement of `Captures`.
    Quiets,
    /// Quiet moves that give check, direct or discovered.
    QuietChecks,
    /// Moves that may resolve a check: king steps off the checking rays,
    /// interpositions, and captures of the checker.
    Evasions,
    /// All pseudo-legal moves, captures and quiets together.
    NonEvasions,
    /// Fully legal moves.
    Legal,
}

/// Generates the requested category into a fresh buffer.
///
/// `Captures`, `Quiets`, `QuietChecks` and `NonEvasions` expect a
/// position that is not in check; `Evasions` expects one that is.
/// `Legal` works everywhere.
pub fn generate(board: &Board, gen_type: GenType) -> MoveBuffer {
    let mut list = MoveBuffer::new();
    let us = board.stm;
    match gen_type {
        GenType::Captures => {
            debug_assert!(
                board.checkers().is_empty(),
                "capture generation requires an unchecked king"
            );
            let target = *board.positions.get_side_bb(us.flip());
            generate_all(board, &mut list, target, gen_type, None);
        }
        GenType::Quiets => {
            debug_assert!(
                board.checkers().is_empty(),
                "quiet generation requires an unchecked king"
            );
            generate_all(board, &mut list, !board.occupied(), gen_type, None);
        }
        GenType::NonEvasions => {
            debug_assert!(
                board.checkers().is_empty(),
                "non-evasion generation requires an unchecked king"
            );
            let target = !*board.positions.get_side_bb(us);
            generate_all(board, &mut list, target, gen_type, None);
        }
        GenType::QuietChecks => generate_quiet_checks_into(board, &mut list),
        GenType::Evasions => generate_evasions_into(board, &mut list),
        GenType::Legal => generate_legal_into(board, &mut list),
    }
    list
}

pub fn generate_captures(board: &Board) -> MoveBuffer {
    generate(board, GenType::Captures)
}

pub fn generate_quiets(board: &Board) -> MoveBuffer {
    generate(board, GenType::Quiets)
}

pub fn generate_quiet_checks(board: &Board) -> MoveBuffer {
    generate(board, GenType::QuietChecks)
}

pub fn generate_evasions(board: &Board) -> MoveBuffer {
    generate(board, GenType::Evasions)
}

pub fn generate_non_evasions(board: &Board) -> MoveBuffer {
    generate(board, GenType::NonEvasions)
}

pub fn generate_legal(board: &Board) -> MoveBuffer {
    generate(board, GenType::Legal)
}

/// Runs every per-piece generator against the shared `target` mask.
/// `ci` is `Some` only for quiet-check generation.
fn generate_all(
    board: &Board,
    list: &mut MoveBuffer,
    target: BitBoard,
    gen_type: GenType,
    ci: Option<&CheckInfo>,
) {
    let us = board.stm;

    generate_pawn_moves(board, list, target, gen_type, ci);
    generate_piece_moves(board, Piece::Knight, list, target, ci);
    generate_piece_moves(board, Piece::Bishop, list, target, ci);
    generate_piece_moves(board, Piece::Rook, list, target, ci);
    generate_piece_moves(board, Piece::Queen, list, target, ci);

    // Plain king steps. Evasions build their own, and a king cannot give
    // a direct check.
    if gen_type != GenType::QuietChecks && gen_type != GenType::Evasions {
        let ksq = board.king_square(us);
        let mut b = MOVE_TABLES.king_moves[ksq.index()] & target;
        while let Some(to) = b.try_pop_lsb() {
            list.push(Move::new(ksq, Square::from_index(to as usize)));
        }
    }

    if gen_type != GenType::Captures && gen_type != GenType::Evasions && board.castling_rights.can_castle_side(us)
    {
        generate_castling(board, list, us, true, ci);
        generate_castling(board, list, us, false, ci);
    }
}

/// Pawn moves for the requested category: pushes, double pushes,
/// captures, promotions and en passant.
fn generate_pawn_moves(
    board: &Board,
    list: &mut MoveBuffer,
    target: BitBoard,
    gen_type: GenType,
    ci: Option<&CheckInfo>,
) {
    let us = board.stm;
    let them = us.flip();
    let up = us.up();
    let (right, left) = match us {
        Side::White => (Direction::NORTHEAST, Direction::NORTHWEST),
        Side::Black => (Direction::SOUTHWEST, Direction::SOUTHEAST),
    };
    let rank7 = BitBoard(RANK_MASKS[if us == Side::White { 6 } else { 1 }]);
    let rank3 = BitBoard(RANK_MASKS[if us == Side::White { 2 } else { 5 }]);
    let rank8 = BitBoard(RANK_MASKS[if us == Side::White { 7 } else { 0 }]);

    let pawns = *board.positions.get_piece_bb(us, Piece::Pawn);
    let pawns_on_7 = pawns & rank7;
    let pawns_not_on_7 = pawns & !rank7;
    let empty_squares = !board.occupied();

    // Squares pawn captures may land on. For evasions only the checker
    // itself can be captured.
    let enemies = match gen_type {
        GenType::Evasions => *board.positions.get_side_bb(them) & target,
        GenType::Captures => target,
        _ => *board.positions.get_side_bb(them),
    };

    // Single and double pushes, no promotions
    if gen_type != GenType::Captures {
        let mut b1 = pawns_not_on_7.shift(up) & empty_squares;
        let mut b2 = (b1 & rank3).shift(up) & empty_squares;

        if gen_type == GenType::Evasions {
            // Only blocking squares matter
            b1 &= target;
            b2 &= target;
        }

        if let Some(ci) = ci {
            b1 &= ci.check_squares[Piece::pawn()];
            b2 &= ci.check_squares[Piece::pawn()];

            // Pushing a discovered-check candidate never checks from the
            // king's file: the pawn stays on the line it should leave.
            if (pawns_not_on_7 & ci.dc_candidates).any() {
                let king_file = BitBoard(FILE_MASKS[ci.ksq.col()]);
                let dc1 =
                    (pawns_not_on_7 & ci.dc_candidates).shift(up) & empty_squares & !king_file;
                let dc2 = (dc1 & rank3).shift(up) & empty_squares;
                b1 |= dc1;
                b2 |= dc2;
            }
        }

        while let Some(to) = b1.try_pop_lsb() {
            let to = Square::from_index(to as usize);
            list.push(Move::new(to.get_neighbor(-up), to));
        }
        while let Some(to) = b2.try_pop_lsb() {
            let to = Square::from_index(to as usize);
            list.push(Move::new(to.get_neighbor(-up).get_neighbor(-up), to));
        }
    }

    // Promotions, with and without capture
    if pawns_on_7.any() && (gen_type != GenType::Evasions || (target & rank8).any()) {
        let promo_empty = if gen_type == GenType::Evasions {
            empty_squares & target
        } else {
            empty_squares
        };

        let mut b1 = pawns_on_7.shift(right) & enemies;
        let mut b2 = pawns_on_7.shift(left) & enemies;
        let mut b3 = pawns_on_7.shift(up) & promo_empty;

        while let Some(to) = b1.try_pop_lsb() {
            push_promotions(list, gen_type, to as usize, right, ci);
        }
        while let Some(to) = b2.try_pop_lsb() {
            push_promotions(list, gen_type, to as usize, left, ci);
        }
        while let Some(to) = b3.try_pop_lsb() {
            push_promotions(list, gen_type, to as usize, up, ci);
        }
    }

    // Standard and en-passant captures
    if matches!(
        gen_type,
        GenType::Captures | GenType::Evasions | GenType::NonEvasions
    ) {
        let mut b1 = pawns_not_on_7.shift(right) & enemies;
        let mut b2 = pawns_not_on_7.shift(left) & enemies;

        while let Some(to) = b1.try_pop_lsb() {
            let to = Square::from_index(to as usize);
            list.push(Move::new(to.get_neighbor(-right), to));
        }
        while let Some(to) = b2.try_pop_lsb() {
            let to = Square::from_index(to as usize);
            list.push(Move::new(to.get_neighbor(-left), to));
        }

        if board.enpassant_square.is_some() {
            let ep = board.enpassant_square;
            debug_assert!(
                ep.row() == if us == Side::White { 5 } else { 2 },
                "en-passant square {ep} on the wrong rank"
            );

            // An en-passant capture evades check only when the checker is
            // the double-pushed pawn itself, which then sits in the target.
            if gen_type == GenType::Evasions && !target.contains_square(ep.get_neighbor(-up).index()) {
                return;
            }

            let mut origins = pawns_not_on_7 & MOVE_TABLES.get_pawn_attacks(ep.index(), them);
            debug_assert!(origins.any(), "recorded en-passant square has no capturer");
            while let Some(from) = origins.try_pop_lsb() {
                list.push(Move::new_en_passant(Square::from_index(from as usize), ep));
            }
        }
    }
}

/// Promotion fan-out for one landing square, split by category. Queen
/// promotions count as captures; the rest are quiets. For quiet checks
/// only the knight can give a check the queen does not already cover.
fn push_promotions(
    list: &mut MoveBuffer,
    gen_type: GenType,
    to: usize,
    dir: i8,
    ci: Option<&CheckInfo>,
) {
    let to = Square::from_index(to);
    let from = to.get_neighbor(-dir);

    if matches!(
        gen_type,
        GenType::Captures | GenType::Evasions | GenType::NonEvasions
    ) {
        list.push(Move::new_promotion(from, to, Piece::Queen));
    }

    if matches!(
        gen_type,
        GenType::Quiets | GenType::Evasions | GenType::NonEvasions
    ) {
        list.push(Move::new_promotion(from, to, Piece::Rook));
        list.push(Move::new_promotion(from, to, Piece::Bishop));
        list.push(Move::new_promotion(from, to, Piece::Knight));
    } else if gen_type == GenType::QuietChecks {
        if let Some(ci) = ci {
            if MOVE_TABLES.knight_moves[to.index()].contains_square(ci.ksq.index()) {
                list.push(Move::new_promotion(from, to, Piece::Knight));
            }
        }
    }
}

/// Knight, bishop, rook and queen moves onto `target`. With `ci` set
/// (quiet checks) origins that cannot possibly check are pruned before
/// their attack set is computed, and discovered-check candidates are
/// left to the dedicated sweep.
fn generate_piece_moves(
    board: &Board,
    piece: Piece,
    list: &mut MoveBuffer,
    target: BitBoard,
    ci: Option<&CheckInfo>,
) {
    debug_assert!(piece != Piece::Pawn && piece != Piece::King);
    let us = board.stm;
    let occupied = board.occupied();

    let mut origins = *board.positions.get_piece_bb(us, piece);
    while let Some(from) = origins.try_pop_lsb() {
        let from = from as usize;

        if let Some(ci) = ci {
            if piece.is_slider()
                && (MOVE_TABLES.get_pseudo_attacks(piece, from)
                    & target
                    & ci.check_squares[piece.index()])
                .is_empty()
            {
                continue;
            }
            if ci.dc_candidates.contains_square(from) {
                continue;
            }
        }

        let mut b = MOVE_TABLES.get_attacks(piece, from, occupied) & target;
        if let Some(ci) = ci {
            b &= ci.check_squares[piece.index()];
        }

        while let Some(to) = b.try_pop_lsb() {
            list.push(Move::new(
                Square::from_index(from),
                Square::from_index(to as usize),
            ));
        }
    }
}

/// One castling move for `side` on the given wing, provided the right is
/// alive, the path is clear and the king never crosses an attacked
/// square. Chess960 additionally has to look for a checker the castling
/// rook was hiding.
fn generate_castling(
    board: &Board,
    list: &mut MoveBuffer,
    us: Side,
    kingside: bool,
    ci: Option<&CheckInfo>,
) {
    if !board.castling_rights.can_castle(us, kingside) || board.castling_impeded(us, kingside) {
        return;
    }

    let kfrom = board.king_square(us);
    let rfrom = board.castling_rook_square(us, kingside);
    debug_assert!(rfrom.is_some(), "castling right without a recorded rook");
    let kto = Square::from_index(relative_square(us, if kingside { 6 } else { 2 }));
    let enemies = *board.positions.get_side_bb(us.flip());

    // Walk the king's path backwards from its destination; the origin
    // itself was vetted by the category's no-checkers precondition.
    let step: i8 = if kto > kfrom {
        Direction::WEST
    } else {
        Direction::EAST
    };
    let mut s = kto;
    while s != kfrom {
        if (board.attackers_to(s.index(), board.occupied()) & enemies).any() {
            return;
        }
        s = s.get_neighbor(step);
    }

    // The castling rook may have masked an enemy slider on the king's
    // destination rank, e.g. a queen on a1 behind a rook on b1.
    if board.chess960 {
        let without_rook = board.occupied() ^ rfrom.bb();
        if (MOVE_TABLES.get_rook_attacks(kto.index(), without_rook)
            & board.positions.get_ortho_sliders_bb(us.flip()))
        .any()
        {
            return;
        }
    }

    let m = Move::new_castling(kfrom, rfrom);

    if let Some(ci) = ci {
        if !board.gives_check(m, ci) {
            return;
        }
    }

    list.push(m);
}

/// Quiet checks: a sweep over discovered-check candidates, whose every
/// quiet move checks, then direct checks through `generate_all` with the
/// metadata attached.
fn generate_quiet_checks_into(board: &Board, list: &mut MoveBuffer) {
    debug_assert!(
        board.checkers().is_empty(),
        "quiet-check generation requires an unchecked king"
    );

    let ci = CheckInfo::new(board);
    let empty_squares = !board.occupied();

    let mut dc = ci.dc_candidates;
    while let Some(from) = dc.try_pop_lsb() {
        let from = Square::from_index(from as usize);
        let piece = match board.piece_at(from) {
            // Pawn pushes off the line are generated with the direct checks
            Some((Piece::Pawn, _)) => continue,
            Some((piece, _)) => piece,
            None => continue,
        };

        let mut b = MOVE_TABLES.get_attacks(piece, from.index(), board.occupied()) & empty_squares;
        if piece == Piece::King {
            // A king step along another royal line could be met by the
            // legality filter instead; skip those destinations entirely.
            b &= !MOVE_TABLES.get_queen_rays(ci.ksq.index());
        }

        while let Some(to) = b.try_pop_lsb() {
            list.push(Move::new(from, Square::from_index(to as usize)));
        }
    }

    generate_all(board, list, empty_squares, GenType::QuietChecks, Some(&ci));
}

/// Check evasions: king steps that leave every checking ray, and, for
/// single checks, interpositions on the checking line or captures of
/// the checker.
fn generate_evasions_into(board: &Board, list: &mut MoveBuffer) {
    let us = board.stm;
    let them = us.flip();
    let ksq = board.king_square(us);
    let checkers = board.checkers();
    debug_assert!(checkers.any(), "evasion generation requires a checker");

    // Squares covered by a checking slider, with the slider itself
    // removed so the king may capture it. Stepping further down a ray it
    // already stands on would keep the king in check.
    let mut slider_attacks = BitBoard(0);
    let mut sliders = checkers
        & (board.positions.get_ortho_sliders_bb(them) | board.positions.get_diag_sliders_bb(them));
    while let Some(check_sq) = sliders.try_pop_lsb() {
        let check_sq = check_sq as usize;
        slider_attacks |= MOVE_TABLES.line_bb(check_sq, ksq.index()) ^ BitBoard(1 << check_sq);
    }

    let mut b = MOVE_TABLES.king_moves[ksq.index()]
        & !*board.positions.get_side_bb(us)
        & !slider_attacks;
    while let Some(to) = b.try_pop_lsb() {
        list.push(Move::new(ksq, Square::from_index(to as usize)));
    }

    // Double check: only the king may move
    if checkers.more_than_one() {
        return;
    }

    // Block the check or capture the checker
    let check_sq = checkers.0.trailing_zeros() as usize;
    let target = MOVE_TABLES.between_bb(check_sq, ksq.index()) | BitBoard(1 << check_sq);
    generate_all(board, list, target, GenType::Evasions, None);
}

/// Pseudo-legal generation followed by the legality filter. Only moves
/// that can possibly be illegal are tested: a pinned origin, a king
/// origin, or an en-passant capture. Everything else passes untouched.
fn generate_legal_into(board: &Board, list: &mut MoveBuffer) {
    let us = board.stm;
    let pinned = board.pinned_pieces(us);
    let ksq = board.king_square(us);

    if board.checkers().any() {
        generate_evasions_into(board, list);
    } else {
        let target = !*board.positions.get_side_bb(us);
        generate_all(board, list, target, GenType::NonEvasions, None);
    }

    let mut i = 0;
    while i < list.len() {
        let m = list[i];
        let needs_test = pinned.contains_square(m.from_sq().index())
            || m.from_sq() == ksq
            || m.is_en_passant();
        if needs_test && !board.is_legal(m, pinned) {
            list.swap_remove(i);
        } else {
            i += 1;
        }
    }
}
