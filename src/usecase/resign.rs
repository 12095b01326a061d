//! UseCase: 投了処理
//!
//! 投了は Rules Oracle を介さない直接の終局遷移です。

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomError, RoomId, RoomRepository};

/// 投了のユースケース
pub struct ResignUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl ResignUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 投了を実行。着席者のみ可能で、相手の勝ちで終局する。
    pub async fn execute(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError> {
        self.repository.resign(room_id, conn).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::SystemClock;
    use crate::domain::{Color, GameResult};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::InMemoryRoomRepository;
    use std::time::Duration;

    #[tokio::test]
    async fn test_resign_ends_game_with_opponent_win() {
        // テスト項目: 投了で相手の勝ちとして終局し、以後の着手が拒否される
        // given (前提条件):
        let repo = Arc::new(InMemoryRoomRepository::new(
            Arc::new(WebSocketMessagePusher::new()),
            Arc::new(SystemClock),
            Duration::from_secs(600),
        ));
        let usecase = ResignUseCase::new(repo.clone());
        let room_id = repo.create_room().await;
        let alice = ConnectionId::new("guest-alice".to_string());
        let bob = ConnectionId::new("guest-bob".to_string());
        repo.join(&room_id, &alice).await.unwrap();
        repo.join(&room_id, &bob).await.unwrap();
        repo.take_seat(&room_id, &alice, Color::White).await.unwrap();
        repo.take_seat(&room_id, &bob, Color::Black).await.unwrap();

        // when (操作): 白の alice が投了する
        usecase.execute(&room_id, &alice).await.unwrap();

        // then (期待する結果):
        let snapshot = repo.snapshot(&room_id).await.unwrap();
        assert_eq!(
            snapshot.result,
            Some(GameResult::Resignation {
                winner: Color::Black
            })
        );
        let result = repo
            .apply_move(
                &room_id,
                &alice,
                crate::domain::MoveRequest {
                    from: "e2".to_string(),
                    to: "e4".to_string(),
                    promotion: None,
                },
            )
            .await;
        assert!(result.is_err());
    }
}
