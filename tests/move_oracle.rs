//! Cross-checks move generation against the `chess` crate over many
//! pseudo-random games.

use std::collections::BTreeSet;
use std::str::FromStr;

use chess::{Board as OracleBoard, BoardStatus, MoveGen};
use chess_session_server::models::{GameState, GameStatus, MoveRequest};

/// Deterministic 64-bit LCG so failures reproduce
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize
    }
}

fn ours(state: &GameState) -> BTreeSet<(String, String)> {
    state
        .all_legal_moves()
        .into_iter()
        .map(|(from, to)| (from.algebraic(), to.algebraic()))
        .collect()
}

fn oracle(board: &OracleBoard) -> BTreeSet<(String, String)> {
    // promotions collapse into one (from, to) pair
    MoveGen::new_legal(board)
        .map(|mv| (mv.get_source().to_string(), mv.get_dest().to_string()))
        .collect()
}

#[test]
fn legal_moves_match_reference_engine() {
    let mut positions = 0;
    for seed in 0..60u64 {
        let mut rng = Lcg(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) + 1);
        let mut state = GameState::new();

        for ply in 0..120 {
            let fen = state.fen();
            let board = OracleBoard::from_str(&fen)
                .unwrap_or_else(|e| panic!("reference rejected {fen}: {e:?}"));
            assert_eq!(ours(&state), oracle(&board), "seed {seed} ply {ply} at {fen}");
            positions += 1;

            if state.is_over() {
                break;
            }
            let moves = state.all_legal_moves();
            let (from, to) = moves[rng.next() % moves.len()];
            let piece = state.board().get(from).unwrap();
            state.apply_move(MoveRequest::new(piece, from, to)).unwrap();

            let reference_status = OracleBoard::from_str(&state.fen()).unwrap().status();
            match state.status() {
                GameStatus::Checkmate => assert_eq!(reference_status, BoardStatus::Checkmate),
                GameStatus::Stalemate => assert_eq!(reference_status, BoardStatus::Stalemate),
                _ => {}
            }
        }
    }
    assert!(positions > 1000);
}
