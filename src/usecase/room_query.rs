//! UseCase: ルーム一覧取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{RoomRepository, RoomSummary};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全ルームの概要を取得
    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.repository.summaries().await
    }
}
