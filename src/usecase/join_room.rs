//! UseCase: ルーム参加処理
//!
//! 参加はメンバー集合への追加のみで、着席は別操作（takeSeat）です。
//! `spectate` フラグはクライアント側の表示ヒントで、サーバー側の
//! 扱いは変わりません。

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomError, RoomId, RoomRepository};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl JoinRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行（接続単位で冪等）
    pub async fn execute(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError> {
        self.repository.join(room_id, conn).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::SystemClock;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::InMemoryRoomRepository;
    use std::time::Duration;

    fn create_test_repo() -> Arc<InMemoryRoomRepository> {
        Arc::new(InMemoryRoomRepository::new(
            Arc::new(WebSocketMessagePusher::new()),
            Arc::new(SystemClock),
            Duration::from_secs(600),
        ))
    }

    #[tokio::test]
    async fn test_join_adds_member() {
        // テスト項目: 参加した接続がメンバー集合に現れる
        // given (前提条件):
        let repo = create_test_repo();
        let usecase = JoinRoomUseCase::new(repo.clone());
        let room_id = repo.create_room().await;
        let alice = ConnectionId::new("guest-alice".to_string());

        // when (操作):
        usecase.execute(&room_id, &alice).await.unwrap();

        // then (期待する結果):
        let snapshot = repo.snapshot(&room_id).await.unwrap();
        assert!(snapshot.players.contains_key(&alice));
    }

    #[tokio::test]
    async fn test_join_unknown_room_fails() {
        // テスト項目: 存在しないルームへの参加は RoomNotFound
        // given (前提条件):
        let repo = create_test_repo();
        let usecase = JoinRoomUseCase::new(repo);
        let alice = ConnectionId::new("guest-alice".to_string());

        // when (操作):
        let result = usecase
            .execute(&RoomId::new("deadbeef".to_string()), &alice)
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RoomError::RoomNotFound);
    }
}
