//! WebSocket メッセージの DTO
//!
//! ワイヤ形式は `type` フィールドで判別する JSON オブジェクトで、
//! フィールド名は camelCase です。
//!
//! ```json
//! {"type":"takeSeat","roomId":"a1b2c3d4","color":"w"}
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Color;

/// クライアント → サーバーのメッセージ
///
/// `roomId` を持つ操作は、フィールドが欠けていても JSON としては受理し、
/// ハンドラ側で「ルームなし」として扱います（プロトコルエラーと
/// 存在しないルームを区別しない）。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// 新しいルームを作る
    CreateRoom,
    /// ルームに参加する
    Join {
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        spectate: bool,
    },
    /// 座席に着く
    TakeSeat {
        #[serde(default)]
        room_id: Option<String>,
        color: Color,
    },
    /// 座席を離れる
    LeaveSeat {
        #[serde(default)]
        room_id: Option<String>,
    },
    /// 手を指す
    Move {
        #[serde(default)]
        room_id: Option<String>,
        from: String,
        to: String,
        #[serde(default)]
        promotion: Option<String>,
    },
    /// 投了する
    Resign {
        #[serde(default)]
        room_id: Option<String>,
    },
    /// ドローを提案する
    OfferDraw {
        #[serde(default)]
        room_id: Option<String>,
    },
    /// ドロー提案に応答する
    RespondDraw {
        #[serde(default)]
        room_id: Option<String>,
        accept: bool,
    },
    /// リスタートを要求する
    Restart {
        #[serde(default)]
        room_id: Option<String>,
    },
}

/// サーバー → クライアントのメッセージ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// 接続直後に割り当てた接続識別子を通知する
    Welcome { conn_id: String },
    /// createRoom への応答
    RoomCreated { room_id: String },
    /// ルーム状態のスナップショット（全メンバーへブロードキャスト）
    RoomState(RoomStateDto),
    /// 要求起因のエラー（要求を出した接続のみに送られる）
    Error { message: String },
    /// リスタート投票の通知
    RestartRequested { from: String },
}

/// ルーム状態スナップショットのワイヤ表現
///
/// 冪等かつ完全: クライアントはこのメッセージだけで UI を再構築できます。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateDto {
    pub room_id: String,
    pub fen: String,
    pub turn: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_move: Option<LastMoveDto>,
    pub in_check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GameResultDto>,
    pub seats: SeatsDto,
    pub players: HashMap<String, PlayerDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_offer: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastMoveDto {
    pub from: String,
    pub to: String,
}

/// 終局結果のワイヤ表現
///
/// `status`: "checkmate" | "stalemate" | "draw" | "resign"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResultDto {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// 座席の占有状況（値は接続識別子）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeatsDto {
    pub w: Option<String>,
    pub b: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerDto {
    pub nickname: String,
}
