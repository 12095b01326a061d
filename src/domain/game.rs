//! 対局まわりのドメイン型と Rules Oracle インターフェース
//!
//! チェスのルール（合法手判定・終局判定・FEN 変換）は外部コラボレータ
//! として扱い、`RulesOracle` trait の背後に隠します。
//! 具体的な実装は Infrastructure 層の `StandardRules` が提供します。

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 座席の色（手番の色でもある）
///
/// ワイヤ上は chess.js 由来の `"w"` / `"b"` で表現します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::White => "w",
            Color::Black => "b",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// クライアントから提案された 1 手
///
/// マス目は代数記法（例: `e2`）。昇格は `q`/`r`/`b`/`n`。
/// 解釈と検証は Rules Oracle に委譲します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

/// 直前に適用された手（クライアントのハイライト用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastMove {
    pub from: String,
    pub to: String,
}

/// 引き分けの理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Agreement,
    ThreefoldRepetition,
    InsufficientMaterial,
    FiftyMoveRule,
}

impl DrawReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DrawReason::Agreement => "agreement",
            DrawReason::ThreefoldRepetition => "threefold repetition",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::FiftyMoveRule => "50-move rule",
        }
    }
}

/// 終局結果
///
/// `Checkmate` / `Stalemate` / ルールによる `Draw` は Oracle が検出し、
/// `Resignation` と合意による `Draw` はルーム側のプロトコルが設定します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameResult {
    Checkmate { winner: Color },
    Stalemate,
    Draw { reason: DrawReason },
    Resignation { winner: Color },
}

/// Rules Oracle が手を拒否したときのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    /// 不正なマス目表記・非合法手
    #[error("Invalid move")]
    Illegal,
}

/// Rules Oracle インターフェース
///
/// 局面 1 つを所有し、合法手の適用・チェック判定・終局判定・FEN 変換を
/// 提供します。`try_move` は失敗時に局面を一切変更してはいけません
/// （部分的な状態変化の禁止）。
#[cfg_attr(test, mockall::automock)]
pub trait RulesOracle: Send + Sync {
    /// 現局面の FEN 表現
    fn fen(&self) -> String;

    /// 現在の手番
    fn turn(&self) -> Color;

    /// 手番側がチェックされているか
    fn in_check(&self) -> bool;

    /// 手を検証して適用する。非合法なら局面を変えずに `MoveError` を返す。
    fn try_move(&mut self, mv: &MoveRequest) -> Result<(), MoveError>;

    /// Oracle が検出できる終局状態（チェックメイト・ステイルメイト・
    /// 規定による引き分け）。継続中なら `None`。
    fn status(&self) -> Option<GameResult>;

    /// 初期局面に戻す
    fn reset(&mut self);
}
