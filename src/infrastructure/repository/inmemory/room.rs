//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ブロードキャストの順序保証
//!
//! 状態を変更する操作は、登録簿のロックを保持したままスナップショットを
//! シリアライズして配信します。配信は接続ごとの `UnboundedSender` への
//! enqueue であり、ロック保持中にブロックしません。これによりルームごとの
//! 配信順序が変更操作の順序と一致します。
//!
//! ## ルームの GC
//!
//! メンバーが空のルームは非活性ウィンドウ（TTL）経過後に削除されます。
//! タイマーは epoch でガードされ、ウィンドウ中の参加で古いタイマーが
//! 無効化されます。発火時にも空であることを再確認します。

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{
    Color, ConnectionId, MessagePusher, MoveRequest, RestartOutcome, Room, RoomError, RoomId,
    RoomIdFactory, RoomRepository, RoomSnapshot, RoomSummary, RulesOracle, Timestamp,
};
use crate::infrastructure::dto::websocket::ServerMessage;
use crate::infrastructure::rules::StandardRules;

/// 登録簿の 1 エントリ
///
/// `gc_epoch` は削除タイマーの世代番号。参加のたびにインクリメントされ、
/// 古い世代で予約されたタイマーは発火しても何もしない。
struct RoomEntry {
    room: Room,
    gc_epoch: u64,
}

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: Arc<Mutex<HashMap<RoomId, RoomEntry>>>,
    pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    game_factory: Arc<dyn Fn() -> Box<dyn RulesOracle> + Send + Sync>,
    /// 空ルームが削除されるまでの非活性ウィンドウ
    room_ttl: Duration,
}

impl InMemoryRoomRepository {
    /// 標準ルールの Oracle を使う Repository を作成
    pub fn new(pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>, room_ttl: Duration) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            pusher,
            clock,
            game_factory: Arc::new(|| Box::new(StandardRules::new())),
            room_ttl,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// ルームの現在状態を全メンバーへ配信する
    ///
    /// 呼び出し側が登録簿のロックを保持していることを前提とする。
    async fn broadcast_state(&self, room: &Room) {
        let message = ServerMessage::RoomState(room.snapshot().into());
        match serde_json::to_string(&message) {
            Ok(json) => {
                // 個別の送信失敗は pusher 側でログされ、配信は継続する
                let _ = self.pusher.broadcast(room.member_ids(), &json).await;
            }
            Err(e) => {
                tracing::error!(
                    "Failed to serialize room state for '{}': {}",
                    room.id.as_str(),
                    e
                );
            }
        }
    }

    /// 非活性ウィンドウ経過後のルーム削除を予約する
    fn schedule_gc(&self, room_id: RoomId, epoch: u64) {
        let rooms = Arc::clone(&self.rooms);
        let ttl = self.room_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut rooms = rooms.lock().await;
            let expired = rooms
                .get(&room_id)
                .is_some_and(|entry| entry.gc_epoch == epoch && entry.room.is_empty());
            if expired {
                rooms.remove(&room_id);
                tracing::info!("Room '{}' removed after inactivity", room_id.as_str());
            }
        });
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self) -> RoomId {
        let mut rooms = self.rooms.lock().await;
        // 衝突時は再生成（32 bit 相当の ID なので実質起きない）
        let room_id = loop {
            let candidate = RoomIdFactory::generate();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let room = Room::new(room_id.clone(), (self.game_factory)(), self.now());
        rooms.insert(
            room_id.clone(),
            RoomEntry {
                room,
                gc_epoch: 0,
            },
        );
        // 作成直後はメンバーが空なので、この時点から非活性ウィンドウが走る
        self.schedule_gc(room_id.clone(), 0);
        tracing::info!("Room '{}' created", room_id.as_str());
        room_id
    }

    async fn snapshot(&self, room_id: &RoomId) -> Result<RoomSnapshot, RoomError> {
        let rooms = self.rooms.lock().await;
        let entry = rooms.get(room_id).ok_or(RoomError::RoomNotFound)?;
        Ok(entry.room.snapshot())
    }

    async fn summaries(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().await;
        rooms.values().map(|entry| entry.room.summary()).collect()
    }

    async fn join(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        // 参加は進行中の削除タイマーを無効化する
        entry.gc_epoch += 1;
        entry.room.join(conn.clone(), self.now());
        self.broadcast_state(&entry.room).await;
        Ok(())
    }

    async fn leave(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        // 切断処理は冪等: ルームが既に消えていても成功扱い
        let Some(entry) = rooms.get_mut(room_id) else {
            return Ok(());
        };
        let became_empty = entry.room.leave(conn);
        if became_empty {
            entry.gc_epoch += 1;
            let epoch = entry.gc_epoch;
            self.schedule_gc(room_id.clone(), epoch);
        } else {
            self.broadcast_state(&entry.room).await;
        }
        Ok(())
    }

    async fn take_seat(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
        color: Color,
    ) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        entry.room.take_seat(conn, color, self.now())?;
        self.broadcast_state(&entry.room).await;
        Ok(())
    }

    async fn leave_seat(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        entry.room.leave_seat(conn, self.now());
        self.broadcast_state(&entry.room).await;
        Ok(())
    }

    async fn apply_move(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
        mv: MoveRequest,
    ) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        entry.room.apply_move(conn, &mv, self.now())?;
        self.broadcast_state(&entry.room).await;
        Ok(())
    }

    async fn resign(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        entry.room.resign(conn, self.now())?;
        self.broadcast_state(&entry.room).await;
        Ok(())
    }

    async fn offer_draw(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        // 状態が変化したときだけ配信する（重複提案は黙殺）
        if entry.room.offer_draw(conn, self.now())? {
            self.broadcast_state(&entry.room).await;
        }
        Ok(())
    }

    async fn respond_draw(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
        accept: bool,
    ) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        if entry.room.respond_draw(conn, accept, self.now())? {
            self.broadcast_state(&entry.room).await;
        }
        Ok(())
    }

    async fn restart(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
    ) -> Result<RestartOutcome, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        let outcome = entry.room.restart(conn, self.now());
        // リセットが起きたときだけ状態が変わる。投票の記録は snapshot に
        // 現れないため、通知は UseCase 側が restartRequested として送る。
        if outcome == RestartOutcome::Restarted {
            self.broadcast_state(&entry.room).await;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::{FixedClock, SystemClock};
    use crate::domain::MessagePushError;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository のルーム生成・参加・操作・削除
    // - 変更操作ごとのブロードキャスト（対象と内容）
    // - 空ルームの GC と、参加によるタイマー無効化
    //
    // 【なぜこのテストが必要か】
    // - Repository は全ての状態変更とブロードキャストの唯一の通り道
    // - ルームごとの配信順序とライフサイクルの正しさを保証する必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. ルーム生成と初期状態の取得
    // 2. 存在しないルームへの操作
    // 3. 参加・着席・着手の一連の流れとブロードキャスト
    // 4. 空ルームの TTL 経過後の削除
    // 5. TTL 内の参加による削除キャンセル
    // ========================================

    /// broadcast の対象と内容を記録するテスト用 Pusher
    struct RecordingPusher {
        broadcasts: std::sync::Mutex<Vec<(Vec<ConnectionId>, String)>>,
    }

    impl RecordingPusher {
        fn new() -> Self {
            Self {
                broadcasts: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn recorded(&self) -> Vec<(Vec<ConnectionId>, String)> {
            self.broadcasts.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl MessagePusher for RecordingPusher {
        async fn register_client(&self, _conn: ConnectionId, _sender: crate::domain::PusherChannel) {
        }

        async fn unregister_client(&self, _conn: &ConnectionId) {}

        async fn push_to(
            &self,
            _conn: &ConnectionId,
            _content: &str,
        ) -> Result<(), MessagePushError> {
            Ok(())
        }

        async fn broadcast(
            &self,
            targets: Vec<ConnectionId>,
            content: &str,
        ) -> Result<(), MessagePushError> {
            self.broadcasts
                .lock()
                .unwrap()
                .push((targets, content.to_string()));
            Ok(())
        }
    }

    fn create_test_repository() -> (Arc<InMemoryRoomRepository>, Arc<RecordingPusher>) {
        create_test_repository_with_ttl(Duration::from_secs(600))
    }

    fn create_test_repository_with_ttl(
        ttl: Duration,
    ) -> (Arc<InMemoryRoomRepository>, Arc<RecordingPusher>) {
        let pusher = Arc::new(RecordingPusher::new());
        let repo = Arc::new(InMemoryRoomRepository::new(
            pusher.clone(),
            Arc::new(SystemClock),
            ttl,
        ));
        (repo, pusher)
    }

    fn conn(name: &str) -> ConnectionId {
        ConnectionId::new(format!("guest-{}", name))
    }

    #[tokio::test]
    async fn test_create_room_and_snapshot() {
        // テスト項目: ルームを作ると初期局面・空座席のスナップショットが取れる
        // given (前提条件):
        let (repo, _pusher) = create_test_repository();

        // when (操作):
        let room_id = repo.create_room().await;
        let snapshot = repo.snapshot(&room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            snapshot.fen,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
        assert_eq!(snapshot.turn, Color::White);
        assert!(snapshot.seats.white.is_none());
        assert!(snapshot.seats.black.is_none());
        assert!(snapshot.players.is_empty());
        assert!(snapshot.result.is_none());
    }

    #[tokio::test]
    async fn test_operations_on_unknown_room() {
        // テスト項目: 存在しないルームへの操作は RoomNotFound を返す
        // given (前提条件):
        let (repo, _pusher) = create_test_repository();
        let unknown = RoomId::new("deadbeef".to_string());
        let alice = conn("alice");

        // when (操作) / then (期待する結果):
        assert_eq!(
            repo.snapshot(&unknown).await.unwrap_err(),
            RoomError::RoomNotFound
        );
        assert_eq!(
            repo.join(&unknown, &alice).await.unwrap_err(),
            RoomError::RoomNotFound
        );
        assert_eq!(
            repo.take_seat(&unknown, &alice, Color::White)
                .await
                .unwrap_err(),
            RoomError::RoomNotFound
        );

        // 切断経路の leave だけは冪等に成功する
        assert!(repo.leave(&unknown, &alice).await.is_ok());
    }

    #[tokio::test]
    async fn test_join_broadcasts_to_all_members() {
        // テスト項目: 参加のたびに全メンバーへ状態が配信される
        // given (前提条件):
        let (repo, pusher) = create_test_repository();
        let room_id = repo.create_room().await;
        let alice = conn("alice");
        let bob = conn("bob");

        // when (操作):
        repo.join(&room_id, &alice).await.unwrap();
        repo.join(&room_id, &bob).await.unwrap();

        // then (期待する結果): 2 回目の配信は alice と bob の両方が対象
        let broadcasts = pusher.recorded();
        assert_eq!(broadcasts.len(), 2);
        let (targets, json) = &broadcasts[1];
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&alice));
        assert!(targets.contains(&bob));

        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["type"], "roomState");
        assert_eq!(value["roomId"], room_id.as_str());
        assert!(value["players"].get(alice.as_str()).is_some());
        assert!(value["players"].get(bob.as_str()).is_some());
    }

    #[tokio::test]
    async fn test_move_flow_and_broadcast_content() {
        // テスト項目: 着席から着手までの流れと、配信内容が局面を反映すること
        // given (前提条件):
        let (repo, pusher) = create_test_repository();
        let room_id = repo.create_room().await;
        let alice = conn("alice");
        let bob = conn("bob");
        repo.join(&room_id, &alice).await.unwrap();
        repo.join(&room_id, &bob).await.unwrap();
        repo.take_seat(&room_id, &alice, Color::White).await.unwrap();
        repo.take_seat(&room_id, &bob, Color::Black).await.unwrap();

        // when (操作):
        repo.apply_move(
            &room_id,
            &alice,
            MoveRequest {
                from: "e2".to_string(),
                to: "e4".to_string(),
                promotion: None,
            },
        )
        .await
        .unwrap();

        // then (期待する結果): 手番が黒になり、直前の配信が着手後の局面を含む
        let snapshot = repo.snapshot(&room_id).await.unwrap();
        assert_eq!(snapshot.turn, Color::Black);

        let broadcasts = pusher.recorded();
        let (_, json) = broadcasts.last().unwrap();
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["turn"], "b");
        assert_eq!(value["lastMove"]["from"], "e2");
        assert_eq!(value["lastMove"]["to"], "e4");

        // 手番でない alice の着手は拒否される
        let result = repo
            .apply_move(
                &room_id,
                &alice,
                MoveRequest {
                    from: "d2".to_string(),
                    to: "d4".to_string(),
                    promotion: None,
                },
            )
            .await;
        assert_eq!(result.unwrap_err(), RoomError::NotYourTurn);
    }

    #[tokio::test]
    async fn test_empty_room_is_removed_after_ttl() {
        // テスト項目: 誰も参加しなかったルームは TTL 経過後に削除される
        // given (前提条件):
        let (repo, _pusher) = create_test_repository_with_ttl(Duration::from_millis(50));
        let room_id = repo.create_room().await;

        // when (操作):
        tokio::time::sleep(Duration::from_millis(150)).await;

        // then (期待する結果):
        assert_eq!(
            repo.snapshot(&room_id).await.unwrap_err(),
            RoomError::RoomNotFound
        );
    }

    #[tokio::test]
    async fn test_join_cancels_pending_gc() {
        // テスト項目: TTL 内の参加で削除タイマーが無効化される
        // given (前提条件):
        let (repo, _pusher) = create_test_repository_with_ttl(Duration::from_millis(100));
        let room_id = repo.create_room().await;
        let alice = conn("alice");

        // when (操作): ウィンドウ内に参加し、TTL を超えて待つ
        repo.join(&room_id, &alice).await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;

        // then (期待する結果): ルームは残っている
        assert!(repo.snapshot(&room_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_room_removed_after_last_member_leaves() {
        // テスト項目: 最後のメンバーが抜けたルームは TTL 経過後に削除される
        // given (前提条件):
        let (repo, _pusher) = create_test_repository_with_ttl(Duration::from_millis(50));
        let room_id = repo.create_room().await;
        let alice = conn("alice");
        repo.join(&room_id, &alice).await.unwrap();

        // when (操作):
        repo.leave(&room_id, &alice).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        // then (期待する結果):
        assert_eq!(
            repo.snapshot(&room_id).await.unwrap_err(),
            RoomError::RoomNotFound
        );
    }

    #[tokio::test]
    async fn test_rejoin_during_gc_window_keeps_room() {
        // テスト項目: 空になった後の再参加で削除が取り消される
        // given (前提条件):
        let (repo, _pusher) = create_test_repository_with_ttl(Duration::from_millis(100));
        let room_id = repo.create_room().await;
        let alice = conn("alice");
        repo.join(&room_id, &alice).await.unwrap();
        repo.leave(&room_id, &alice).await.unwrap();

        // when (操作): ウィンドウ内に別の接続が参加する
        let bob = conn("bob");
        repo.join(&room_id, &bob).await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;

        // then (期待する結果): ルームは残っている
        let snapshot = repo.snapshot(&room_id).await.unwrap();
        assert!(snapshot.players.contains_key(&bob));
    }

    #[tokio::test]
    async fn test_summaries_reflect_rooms() {
        // テスト項目: summaries が全ルームの概要を返す
        // given (前提条件):
        let (repo, _pusher) = create_test_repository();
        let room_id = repo.create_room().await;
        let alice = conn("alice");
        repo.join(&room_id, &alice).await.unwrap();
        repo.take_seat(&room_id, &alice, Color::White).await.unwrap();

        // when (操作):
        let summaries = repo.summaries().await;

        // then (期待する結果):
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, room_id);
        assert_eq!(summaries[0].member_count, 1);
        assert_eq!(summaries[0].seats_taken, 1);
    }

    #[tokio::test]
    async fn test_summary_timestamps_come_from_injected_clock() {
        // テスト項目: 概要のタイムスタンプが注入された Clock の値になる
        // given (前提条件):
        let fixed_millis = 1_700_000_000_000;
        let pusher = Arc::new(RecordingPusher::new());
        let repo = Arc::new(InMemoryRoomRepository::new(
            pusher,
            Arc::new(FixedClock::new(fixed_millis)),
            Duration::from_secs(600),
        ));
        let room_id = repo.create_room().await;
        repo.join(&room_id, &conn("alice")).await.unwrap();

        // when (操作):
        let summaries = repo.summaries().await;

        // then (期待する結果):
        assert_eq!(summaries[0].created_at, Timestamp::new(fixed_millis));
        assert_eq!(summaries[0].last_activity, Timestamp::new(fixed_millis));
    }

    #[tokio::test]
    async fn test_draw_offer_broadcast_only_on_change() {
        // テスト項目: 重複したドロー提案では配信が増えない
        // given (前提条件):
        let (repo, pusher) = create_test_repository();
        let room_id = repo.create_room().await;
        let alice = conn("alice");
        let bob = conn("bob");
        repo.join(&room_id, &alice).await.unwrap();
        repo.join(&room_id, &bob).await.unwrap();
        repo.take_seat(&room_id, &alice, Color::White).await.unwrap();
        repo.take_seat(&room_id, &bob, Color::Black).await.unwrap();

        // when (操作):
        repo.offer_draw(&room_id, &alice).await.unwrap();
        let count_after_first = pusher.recorded().len();
        repo.offer_draw(&room_id, &bob).await.unwrap();

        // then (期待する結果): 2 回目の提案は黙殺され、配信されない
        assert_eq!(pusher.recorded().len(), count_after_first);
        let snapshot = repo.snapshot(&room_id).await.unwrap();
        assert_eq!(snapshot.draw_offer, Some(Color::White));
    }
}
