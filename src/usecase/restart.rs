//! UseCase: リスタート処理
//!
//! - 両座席が空: 即リセット
//! - 両座席が占有: 全会一致の投票。一致するまでは全メンバーへ
//!   `restartRequested` を通知する（UI が相手に確認を促せるように）
//! - 片側のみ占有: 黙って無視

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RestartOutcome, RoomError, RoomId, RoomRepository};
use crate::infrastructure::dto::websocket::ServerMessage;

/// リスタートのユースケース
pub struct RestartGameUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RestartGameUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// リスタート要求を実行
    ///
    /// リセットが起きた場合の状態配信は Repository が行う。投票のみが
    /// 記録された場合はここで全メンバーへ `restartRequested` を通知する。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
    ) -> Result<RestartOutcome, RoomError> {
        let outcome = self.repository.restart(room_id, conn).await?;

        if let RestartOutcome::VoteRecorded { members } = &outcome {
            let notification = ServerMessage::RestartRequested {
                from: conn.as_str().to_string(),
            };
            match serde_json::to_string(&notification) {
                Ok(json) => {
                    let _ = self
                        .message_pusher
                        .broadcast(members.clone(), &json)
                        .await;
                }
                Err(e) => {
                    tracing::error!("Failed to serialize restart notification: {}", e);
                }
            }
        }

        Ok(outcome)
    }
}
