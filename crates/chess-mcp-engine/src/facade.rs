//! Service Facade: the thin adapter between the RPC/HTTP layer and the
//! Engine Instance plus the chess rule library. Every public method here
//! returns a success payload or an opaque error string; nothing panics
//! and no engine-internal detail escapes to the caller.

use std::str::FromStr;
use std::sync::Arc;

use chess::{Board, BoardStatus, ChessMove, Color, Piece, Square};
use serde::Serialize;

use engine_supervisor::{EngineInstance, SupervisorError};

/// Response payload for [`ServiceFacade::get_best_move`].
#[derive(Debug, Clone, Serialize)]
pub struct BestMoveResult {
    pub best_move_uci: String,
}

/// Response payload for [`ServiceFacade::game_status`].
#[derive(Debug, Clone, Serialize)]
pub struct GameStatusResult {
    pub status: String,
    pub winner: Option<String>,
}

pub struct ServiceFacade {
    engine: Option<Arc<EngineInstance>>,
}

impl ServiceFacade {
    pub fn new(engine: Option<Arc<EngineInstance>>) -> Self {
        ServiceFacade { engine }
    }

    /// Delegates to the Engine Instance. `"Engine not initialized"` when no
    /// instance was ever constructed.
    pub async fn get_best_move(
        &self,
        fen: &str,
        move_history: &[String],
    ) -> Result<BestMoveResult, String> {
        let engine = self
            .engine
            .as_ref()
            .ok_or_else(|| "Engine not initialized".to_string())?;

        engine
            .best_move(fen, move_history)
            .await
            .map(|best_move_uci| BestMoveResult { best_move_uci })
            .map_err(|e| facade_error_message(&e))
    }

    /// Parses FEN and a UCI move, reports legality via the chess library.
    /// No engine call.
    pub fn validate_move(&self, fen: &str, uci_move: &str) -> Result<bool, String> {
        let board = parse_fen(fen)?;
        let mv = parse_uci_move(uci_move)?;
        Ok(chess::MoveGen::new_legal(&board).any(|legal| legal == mv))
    }

    /// Parses FEN, enumerates legal moves via the chess library.
    pub fn legal_moves(&self, fen: &str) -> Result<Vec<String>, String> {
        let board = parse_fen(fen)?;
        Ok(chess::MoveGen::new_legal(&board)
            .map(|mv| mv.to_string())
            .collect())
    }

    /// Classifies the position as `IN_PROGRESS`, `CHECKMATE`, `STALEMATE`,
    /// or `DRAW` (insufficient material).
    pub fn game_status(&self, fen: &str) -> Result<GameStatusResult, String> {
        let board = parse_fen(fen)?;

        let result = match board.status() {
            BoardStatus::Checkmate => {
                let winner = match board.side_to_move() {
                    Color::White => "BLACK",
                    Color::Black => "WHITE",
                };
                GameStatusResult {
                    status: "CHECKMATE".to_string(),
                    winner: Some(winner.to_string()),
                }
            }
            BoardStatus::Stalemate => GameStatusResult {
                status: "STALEMATE".to_string(),
                winner: None,
            },
            BoardStatus::Ongoing if is_insufficient_material(&board) => GameStatusResult {
                status: "DRAW".to_string(),
                winner: None,
            },
            BoardStatus::Ongoing => GameStatusResult {
                status: "IN_PROGRESS".to_string(),
                winner: None,
            },
        };

        Ok(result)
    }

    /// The engine instance's readiness; a null engine is never ready.
    pub async fn is_ready(&self) -> bool {
        match &self.engine {
            Some(engine) => engine.is_ready().await,
            None => false,
        }
    }
}

fn parse_fen(fen: &str) -> Result<Board, String> {
    Board::from_str(fen).map_err(|e| format!("Invalid FEN format: {e}"))
}

fn parse_uci_move(uci_move: &str) -> Result<ChessMove, String> {
    ChessMove::from_str(uci_move).map_err(|_| "Invalid move format".to_string())
}

/// Maps a [`SupervisorError`] to the opaque string the RPC layer sees.
/// Low-level engine detail (raw stdout text) never crosses this boundary;
/// only the synthesized "no best move" wording does, since that is our
/// own message rather than the child's output.
fn facade_error_message(error: &SupervisorError) -> String {
    match error {
        SupervisorError::NotReady => "Engine not initialized".to_string(),
        SupervisorError::ProtocolViolation(msg) => msg.clone(),
        _ => "Internal server error".to_string(),
    }
}

/// Neither side individually has mating material. The chess crate's
/// [`BoardStatus`] does not classify draws beyond stalemate, so this fills
/// in the minimum bar for `DRAW`. Each side is judged on its own pieces --
/// a lone bishop never mates regardless of what the other side is holding,
/// which is why this does not compare bishops across the two sides.
fn is_insufficient_material(board: &Board) -> bool {
    side_lacks_mating_material(board, Color::White)
        && side_lacks_mating_material(board, Color::Black)
}

/// True when `color`'s own pieces (king aside) can never force checkmate:
/// no pieces at all, a single knight or bishop, or several bishops that all
/// sit on the same-colored squares.
fn side_lacks_mating_material(board: &Board, color: Color) -> bool {
    let side_squares = *board.color_combined(color);
    let mut minors: Vec<Square> = Vec::new();

    for sq in side_squares {
        match board.piece_on(sq) {
            Some(Piece::King) | None => {}
            Some(Piece::Knight) | Some(Piece::Bishop) => minors.push(sq),
            Some(_) => return false,
        }
    }

    match minors.as_slice() {
        [] | [_] => true,
        _ => {
            minors
                .iter()
                .all(|&sq| board.piece_on(sq) == Some(Piece::Bishop))
                && minors
                    .windows(2)
                    .all(|w| square_is_light(w[0]) == square_is_light(w[1]))
        }
    }
}

fn square_is_light(square: Square) -> bool {
    (square.get_file().to_index() + square.get_rank().to_index()) % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facade() -> ServiceFacade {
        ServiceFacade::new(None)
    }

    #[test]
    fn validate_move_accepts_legal_opening() {
        let f = facade();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(f.validate_move(fen, "e2e4"), Ok(true));
    }

    #[test]
    fn validate_move_rejects_malformed_uci() {
        let f = facade();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let err = f.validate_move(fen, "e2e9").unwrap_err();
        assert_eq!(err, "Invalid move format");
    }

    #[test]
    fn validate_move_false_for_blocked_own_piece() {
        let f = facade();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(f.validate_move(fen, "e1e2"), Ok(false));
    }

    #[test]
    fn game_status_fools_mate_is_checkmate_black_wins() {
        let f = facade();
        let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1";
        let status = f.game_status(fen).unwrap();
        assert_eq!(status.status, "CHECKMATE");
        assert_eq!(status.winner.as_deref(), Some("BLACK"));
        assert!(f.legal_moves(fen).unwrap().is_empty());
    }

    #[test]
    fn game_status_recognizes_stalemate() {
        let f = facade();
        let fen = "k7/8/1Q6/8/8/8/8/K7 b - - 0 1";
        let status = f.game_status(fen).unwrap();
        assert_eq!(status.status, "STALEMATE");
        assert_eq!(status.winner, None);
    }

    #[test]
    fn game_status_recognizes_insufficient_material_draw() {
        let f = facade();
        let fen = "8/8/8/8/8/8/8/k1K5 w - - 0 1";
        let status = f.game_status(fen).unwrap();
        assert_eq!(status.status, "DRAW");
        assert_eq!(status.winner, None);
    }

    #[test]
    fn game_status_king_and_bishop_each_same_color_is_draw() {
        let f = facade();
        let fen = "8/8/8/4k3/8/8/3B4/K3b3 w - - 0 1";
        let status = f.game_status(fen).unwrap();
        assert_eq!(status.status, "DRAW");
    }

    #[test]
    fn game_status_king_and_bishop_each_opposite_color_is_still_a_draw() {
        let f = facade();
        let fen = "3bk3/8/8/8/8/8/8/3BK3 w - - 0 1";
        let status = f.game_status(fen).unwrap();
        assert_eq!(status.status, "DRAW");
    }

    #[test]
    fn game_status_with_rook_is_not_a_draw() {
        let f = facade();
        let fen = "8/8/8/8/8/3k4/8/R3K3 w - - 0 1";
        let status = f.game_status(fen).unwrap();
        assert_eq!(status.status, "IN_PROGRESS");
    }

    #[tokio::test]
    async fn get_best_move_without_engine_is_not_initialized() {
        let f = facade();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let err = f.get_best_move(fen, &[]).await.unwrap_err();
        assert_eq!(err, "Engine not initialized");
    }

    #[tokio::test]
    async fn is_ready_without_engine_is_false() {
        let f = facade();
        assert!(!f.is_ready().await);
    }

    #[test]
    fn invalid_fen_is_reported() {
        let f = facade();
        let err = f.game_status("not a fen").unwrap_err();
        assert!(err.starts_with("Invalid FEN format"));
    }
}
