//! UseCase: 接続受付処理
//!
//! 新しいトランスポート接続にプロセス内一意な識別子を割り当て、
//! Connection Registry（MessagePusher）に sender を登録します。
//! welcome の送信は UI 層が接続自身のチャンネルへ直接行います。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionIdFactory, MessagePusher, PusherChannel};

/// 接続受付のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続受付を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 割り当てた接続識別子。識別子の割り当てはルームに依存せず、
    /// プロセス生存期間中に再利用されない。
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let conn = ConnectionIdFactory::generate();
        self.message_pusher
            .register_client(conn.clone(), sender)
            .await;
        tracing::info!("Connection '{}' accepted", conn.as_str());
        conn
    }
}
