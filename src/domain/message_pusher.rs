//! MessagePusher trait 定義
//!
//! ルーム状態のブロードキャストと個別通知の送信インターフェース。
//! WebSocket などの具体的なトランスポートは Infrastructure 層が実装します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::value_object::ConnectionId;

/// クライアントへメッセージを送るためのチャンネル
///
/// 送信は fire-and-forget で、ブロックしません。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録する（Connection Registry への追加）
    async fn register_client(&self, conn: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除する
    async fn unregister_client(&self, conn: &ConnectionId);

    /// 特定の接続にメッセージを送る
    async fn push_to(&self, conn: &ConnectionId, content: &str) -> Result<(), MessagePushError>;

    /// 複数の接続にメッセージを送る。一部の送信失敗は許容する。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
