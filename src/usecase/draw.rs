//! UseCase: ドロー提案・応答処理
//!
//! 2 メッセージのハンドシェイク。提案は同時に 1 件まで、着手が介在すると
//! 提案は破棄されます。破棄済みの提案への応答は黙殺されます
//! （並行編集の許容であり、エラーではない）。

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomError, RoomId, RoomRepository};

/// ドロー提案のユースケース
pub struct OfferDrawUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl OfferDrawUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ドロー提案を実行
    pub async fn execute(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError> {
        self.repository.offer_draw(room_id, conn).await
    }
}

/// ドロー応答のユースケース
pub struct RespondDrawUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl RespondDrawUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ドロー応答を実行。accept なら合意ドローで終局する。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
        accept: bool,
    ) -> Result<(), RoomError> {
        self.repository.respond_draw(room_id, conn, accept).await
    }
}
