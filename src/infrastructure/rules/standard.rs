//! `chess` クレートを使った Rules Oracle 実装
//!
//! 合法手判定と局面の更新は `chess::Board` に委譲します。`Board` は
//! ハーフムーブクロックと手数を保持しないため、50 手ルール・手数付き FEN の
//! ためにアダプタ側で追跡します。同一局面の出現回数も Zobrist ハッシュで
//! 数え、3 回出現で引き分けと判定します。

use std::collections::HashMap;
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Piece, Square};

use crate::domain::{Color, DrawReason, GameResult, MoveError, MoveRequest, RulesOracle};

fn to_domain_color(color: chess::Color) -> Color {
    match color {
        chess::Color::White => Color::White,
        chess::Color::Black => Color::Black,
    }
}

/// 標準チェスルールの Rules Oracle
pub struct StandardRules {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    /// 局面ハッシュ → 出現回数（3 回で同形反復の引き分け）
    seen_positions: HashMap<u64, u8>,
}

impl StandardRules {
    pub fn new() -> Self {
        Self::with_board(Board::default(), 0, 1)
    }

    fn with_board(board: Board, halfmove_clock: u32, fullmove_number: u32) -> Self {
        let mut seen_positions = HashMap::new();
        seen_positions.insert(board.get_hash(), 1);
        Self {
            board,
            halfmove_clock,
            fullmove_number,
            seen_positions,
        }
    }

    /// FEN から局面を読み込む。クロック 2 フィールドはアダプタ側で解釈する。
    pub fn from_fen(fen: &str) -> Result<Self, chess::Error> {
        let board = Board::from_str(fen)?;
        let mut clocks = fen.split_whitespace().skip(4);
        let halfmove_clock = clocks.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let fullmove_number = clocks.next().and_then(|s| s.parse().ok()).unwrap_or(1);
        Ok(Self::with_board(board, halfmove_clock, fullmove_number))
    }

    fn insufficient_material(&self) -> bool {
        let heavy = self.board.pieces(Piece::Pawn).popcnt()
            + self.board.pieces(Piece::Rook).popcnt()
            + self.board.pieces(Piece::Queen).popcnt();
        if heavy > 0 {
            return false;
        }
        let knights = self.board.pieces(Piece::Knight).popcnt();
        let bishops = self.board.pieces(Piece::Bishop).popcnt();
        // K vs K、K+マイナー vs K
        if knights + bishops <= 1 {
            return true;
        }
        // 残りが同色マスのビショップだけならどちらも詰ませられない
        if knights == 0 {
            let mut square_colors = [false; 2];
            for sq in *self.board.pieces(Piece::Bishop) {
                let parity = (sq.get_rank().to_index() + sq.get_file().to_index()) % 2;
                square_colors[parity] = true;
            }
            return !(square_colors[0] && square_colors[1]);
        }
        false
    }

    fn parse_promotion(promotion: Option<&str>) -> Result<Option<Piece>, MoveError> {
        match promotion {
            None | Some("") => Ok(None),
            Some("q") => Ok(Some(Piece::Queen)),
            Some("r") => Ok(Some(Piece::Rook)),
            Some("b") => Ok(Some(Piece::Bishop)),
            Some("n") => Ok(Some(Piece::Knight)),
            Some(_) => Err(MoveError::Illegal),
        }
    }
}

impl Default for StandardRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesOracle for StandardRules {
    fn fen(&self) -> String {
        let base = self.board.to_string();
        let position_fields: Vec<&str> = base.split_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            position_fields.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    fn turn(&self) -> Color {
        to_domain_color(self.board.side_to_move())
    }

    fn in_check(&self) -> bool {
        self.board.checkers().popcnt() > 0
    }

    fn try_move(&mut self, mv: &MoveRequest) -> Result<(), MoveError> {
        let from = Square::from_str(&mv.from).map_err(|_| MoveError::Illegal)?;
        let to = Square::from_str(&mv.to).map_err(|_| MoveError::Illegal)?;
        let promotion = Self::parse_promotion(mv.promotion.as_deref())?;

        let chess_move = ChessMove::new(from, to, promotion);
        if !self.board.legal(chess_move) {
            return Err(MoveError::Illegal);
        }

        let moved_piece = self.board.piece_on(from);
        // アンパッサンは行き先が空マスなので、ポーンの斜め移動も取りとして扱う
        let is_capture = self.board.piece_on(to).is_some()
            || (moved_piece == Some(Piece::Pawn) && from.get_file() != to.get_file());
        let mover = self.board.side_to_move();

        self.board = self.board.make_move_new(chess_move);

        if moved_piece == Some(Piece::Pawn) || is_capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if mover == chess::Color::Black {
            self.fullmove_number += 1;
        }
        *self
            .seen_positions
            .entry(self.board.get_hash())
            .or_insert(0) += 1;
        Ok(())
    }

    fn status(&self) -> Option<GameResult> {
        match self.board.status() {
            BoardStatus::Checkmate => Some(GameResult::Checkmate {
                winner: to_domain_color(!self.board.side_to_move()),
            }),
            BoardStatus::Stalemate => Some(GameResult::Stalemate),
            BoardStatus::Ongoing => {
                let repetitions = self
                    .seen_positions
                    .get(&self.board.get_hash())
                    .copied()
                    .unwrap_or(0);
                if repetitions >= 3 {
                    Some(GameResult::Draw {
                        reason: DrawReason::ThreefoldRepetition,
                    })
                } else if self.insufficient_material() {
                    Some(GameResult::Draw {
                        reason: DrawReason::InsufficientMaterial,
                    })
                } else if self.halfmove_clock >= 100 {
                    Some(GameResult::Draw {
                        reason: DrawReason::FiftyMoveRule,
                    })
                } else {
                    None
                }
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
