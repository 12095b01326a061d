//! UseCase: 切断処理
//!
//! トランスポートの切断はルームにとってエラーではなく通常のライフサイクル
//! イベントです。所属ルームからの退出（座席解放・投票無効化・空ルームの
//! 削除予約・残メンバーへの配信は Repository 側で行われる）と、
//! Connection Registry からの登録解除を行います。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomError, RoomId, RoomRepository};

/// 切断処理のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断処理を実行
    ///
    /// # Arguments
    ///
    /// * `conn` - 切断した接続の識別子
    /// * `current_room` - 接続が所属していたルーム（未参加なら `None`）
    pub async fn execute(
        &self,
        conn: &ConnectionId,
        current_room: Option<RoomId>,
    ) -> Result<(), RoomError> {
        if let Some(room_id) = current_room {
            // ルームが既に消えていても leave は冪等に成功する
            self.repository.leave(&room_id, conn).await?;
        }
        self.message_pusher.unregister_client(conn).await;
        tracing::info!("Connection '{}' disconnected", conn.as_str());
        Ok(())
    }
}
