//! ドメイン層のエラー定義

use thiserror::Error;

/// ルーム操作のエラー分類
///
/// すべてのエラーは操作を発行した接続にのみ報告され、ルームの状態や
/// 他のメンバーには影響しません。`Display` 文字列はそのままワイヤ上の
/// `error` メッセージになります。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    /// 指定されたルームが存在しない
    #[error("Room not found")]
    RoomNotFound,

    /// 座席がすでに占有されている
    #[error("Seat already taken")]
    SeatTaken,

    /// 手番の座席を占有していない接続からの着手
    #[error("Not your turn or you are not seated")]
    NotYourTurn,

    /// Rules Oracle が拒否した手
    #[error("Invalid move")]
    IllegalMove,

    /// プロトコル上その操作が許されない状態
    /// （例: 終局後の着手、着席していない接続からの投了）
    #[error("{0}")]
    InvalidProtocolState(String),
}

impl RoomError {
    /// `InvalidProtocolState` の定型メッセージ
    pub fn game_over() -> Self {
        RoomError::InvalidProtocolState("Game is already over".to_string())
    }

    pub fn not_seated() -> Self {
        RoomError::InvalidProtocolState("You are not seated".to_string())
    }
}

/// メッセージ送信（通知）のエラー
#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
