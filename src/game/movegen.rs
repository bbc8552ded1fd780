//! Move generation.
//!
//! `pseudo_legal_moves` follows piece movement and occupancy only. The public
//! legality contract is `legal_moves`, which layers castling and en passant on
//! top and then drops every destination that would leave the mover's own king
//! attacked, by playing the move on a scratch board.

use std::collections::BTreeSet;

use crate::game::rules::{is_in_check, make_move_on};
use crate::models::{Board, Color, GameState, Move, Piece, PieceKind, Position, SpecialMove};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Destinations allowed by the movement pattern of the piece on `from`,
/// ignoring king safety, castling and en passant
pub fn pseudo_legal_moves(board: &Board, from: Position) -> BTreeSet<Position> {
    let mut moves = BTreeSet::new();
    let Some(piece) = board.get(from) else {
        return moves;
    };

    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece.color, &mut moves),
        PieceKind::Knight => step_moves(board, from, piece.color, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::King => step_moves(board, from, piece.color, &KING_OFFSETS, &mut moves),
        PieceKind::Rook => ray_moves(board, from, piece.color, &ROOK_DIRECTIONS, &mut moves),
        PieceKind::Bishop => ray_moves(board, from, piece.color, &BISHOP_DIRECTIONS, &mut moves),
        PieceKind::Queen => {
            ray_moves(board, from, piece.color, &ROOK_DIRECTIONS, &mut moves);
            ray_moves(board, from, piece.color, &BISHOP_DIRECTIONS, &mut moves);
        }
    }
    moves
}

/// Squares the piece on `from` attacks. Same as the pseudo-legal set except
/// pawns, which attack both forward diagonals whether or not they are occupied.
pub fn attacked_squares(board: &Board, from: Position) -> BTreeSet<Position> {
    match board.get(from) {
        Some(piece) if piece.kind == PieceKind::Pawn => {
            let dir = piece.color.pawn_direction();
            [from.offset(dir, -1), from.offset(dir, 1)]
                .into_iter()
                .flatten()
                .collect()
        }
        Some(_) => pseudo_legal_moves(board, from),
        None => BTreeSet::new(),
    }
}

/// True if any piece of color `by` attacks `target`
pub fn is_square_attacked(board: &Board, target: Position, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(from, _)| attacked_squares(board, from).contains(&target))
}

/// Legal destinations for the piece on `from`, including castling and en
/// passant, with the king-safety filter applied
pub fn legal_moves(state: &GameState, from: Position) -> BTreeSet<Position> {
    let board = state.board();
    let Some(piece) = board.get(from) else {
        return BTreeSet::new();
    };

    let mut candidates = pseudo_legal_moves(board, from);
    match piece.kind {
        PieceKind::King => candidates.extend(castling_moves(state, from, piece)),
        PieceKind::Pawn => candidates.extend(en_passant_move(state, from, piece)),
        _ => {}
    }

    candidates
        .into_iter()
        .filter(|&to| {
            let mv = build_move(state, piece, from, to, None);
            let mut scratch = board.clone();
            make_move_on(&mut scratch, &mv);
            !is_in_check(&scratch, piece.color)
        })
        .collect()
}

/// Every legal `(from, to)` pair for `color`
pub fn all_legal_moves(state: &GameState, color: Color) -> Vec<(Position, Position)> {
    state
        .board()
        .pieces_of(color)
        .flat_map(|(from, _)| legal_moves(state, from).into_iter().map(move |to| (from, to)))
        .collect()
}

/// Cheaper than `all_legal_moves` when only existence matters
pub fn has_legal_move(state: &GameState, color: Color) -> bool {
    state
        .board()
        .pieces_of(color)
        .any(|(from, _)| !legal_moves(state, from).is_empty())
}

/// Describe the transition `from -> to` in the current position: what gets
/// captured and which special rule applies. The destination is assumed to
/// have been produced by the generator; nothing is validated here.
pub(crate) fn build_move(
    state: &GameState,
    piece: Piece,
    from: Position,
    to: Position,
    promotion: Option<PieceKind>,
) -> Move {
    let board = state.board();
    let mut captured = board.get(to);
    let mut special = SpecialMove::None;

    match piece.kind {
        PieceKind::King if (to.col() as i8 - from.col() as i8).abs() == 2 => {
            special = if to.col() > from.col() {
                SpecialMove::CastleKingside
            } else {
                SpecialMove::CastleQueenside
            };
        }
        PieceKind::Pawn => {
            if captured.is_none() && to.col() != from.col() && state.en_passant() == Some(to) {
                special = SpecialMove::EnPassant;
                captured = Position::new(from.row() as i32, to.col() as i32)
                    .and_then(|square| board.get(square));
            } else if to.row() == piece.color.opponent().back_rank() {
                special = SpecialMove::Promotion(promotion.unwrap_or(PieceKind::Queen));
            }
        }
        _ => {}
    }

    Move {
        from,
        to,
        piece,
        captured,
        special,
    }
}

fn pawn_moves(board: &Board, from: Position, color: Color, moves: &mut BTreeSet<Position>) {
    let dir = color.pawn_direction();

    if let Some(one) = from.offset(dir, 0) {
        if board.is_empty(one) {
            moves.insert(one);
            let start_row = color.back_rank() as i8 + dir;
            if from.row() as i8 == start_row {
                if let Some(two) = from.offset(dir * 2, 0) {
                    if board.is_empty(two) {
                        moves.insert(two);
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(target) = from.offset(dir, dc) {
            if matches!(board.get(target), Some(other) if other.color != color) {
                moves.insert(target);
            }
        }
    }
}

fn step_moves(
    board: &Board,
    from: Position,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut BTreeSet<Position>,
) {
    for &(dr, dc) in offsets {
        if let Some(target) = from.offset(dr, dc) {
            match board.get(target) {
                Some(other) if other.color == color => {}
                _ => {
                    moves.insert(target);
                }
            }
        }
    }
}

fn ray_moves(
    board: &Board,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut BTreeSet<Position>,
) {
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            match board.get(next) {
                None => {
                    moves.insert(next);
                    current = next;
                }
                Some(other) => {
                    if other.color != color {
                        moves.insert(next);
                    }
                    break;
                }
            }
        }
    }
}

fn castling_moves(state: &GameState, from: Position, king: Piece) -> Vec<Position> {
    let board = state.board();
    let color = king.color;
    let enemy = color.opponent();
    let rank = color.back_rank() as i32;
    let on_rank = |col: i32| Position::new(rank, col);

    if on_rank(4) != Some(from) || is_square_attacked(board, from, enemy) {
        return Vec::new();
    }

    let rights = state.castling_rights();
    let own_rook = Some(Piece::new(PieceKind::Rook, color));
    let rook_home = |col: i32| on_rank(col).and_then(|sq| board.get(sq)) == own_rook;
    let clear = |cols: &[i32]| {
        cols.iter()
            .filter_map(|&col| on_rank(col))
            .all(|sq| board.is_empty(sq))
    };
    let safe = |cols: &[i32]| {
        cols.iter()
            .filter_map(|&col| on_rank(col))
            .all(|sq| !is_square_attacked(board, sq, enemy))
    };

    let mut moves = Vec::new();
    if rights.kingside(color) && rook_home(7) && clear(&[5, 6]) && safe(&[5, 6]) {
        moves.extend(on_rank(6));
    }
    if rights.queenside(color) && rook_home(0) && clear(&[1, 2, 3]) && safe(&[2, 3]) {
        moves.extend(on_rank(2));
    }
    moves
}

fn en_passant_move(state: &GameState, from: Position, pawn: Piece) -> Option<Position> {
    let target = state.en_passant()?;
    if pawn.color != state.side_to_move() {
        return None;
    }
    let forward = target.row() as i8 - from.row() as i8;
    let sideways = (target.col() as i8 - from.col() as i8).abs();
    (forward == pawn.color.pawn_direction() && sideways == 1).then_some(target)
}
