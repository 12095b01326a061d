//! UseCase: 着手処理
//!
//! 正しさの要: 手番の座席を占有する接続以外の着手、および Oracle が
//! 拒否した手は、ルーム状態を一切変更せず配信もしない（Repository と
//! Room エンティティで保証）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MoveRequest, RoomError, RoomId, RoomRepository};

/// 着手のユースケース
pub struct PlayMoveUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl PlayMoveUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 着手を実行
    pub async fn execute(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
        mv: MoveRequest,
    ) -> Result<(), RoomError> {
        self.repository.apply_move(room_id, conn, mv).await
    }
}
