//! UseCase: 着席・離席処理

use std::sync::Arc;

use crate::domain::{Color, ConnectionId, RoomError, RoomId, RoomRepository};

/// 着席のユースケース
pub struct TakeSeatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl TakeSeatUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 着席を実行。占有済みの座席なら `SeatTaken`。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
        color: Color,
    ) -> Result<(), RoomError> {
        self.repository.take_seat(room_id, conn, color).await
    }
}

/// 離席のユースケース
pub struct LeaveSeatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl LeaveSeatUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 離席を実行（観戦者に戻る）。離席で自分のリスタート投票は無効になる。
    pub async fn execute(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError> {
        self.repository.leave_seat(room_id, conn).await
    }
}
