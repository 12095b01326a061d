//! UseCase: ルーム作成処理

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 空の座席と初期局面を持つ新しいルームを作る。失敗しない。
    /// 作成者は自動では参加しない（クライアントは続けて join を送る）。
    pub async fn execute(&self) -> RoomId {
        self.repository.create_room().await
    }
}
