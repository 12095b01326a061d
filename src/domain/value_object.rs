//! Value Object 定義
//!
//! 接続 ID・ルーム ID・タイムスタンプなどの不変な値オブジェクト。

use uuid::Uuid;

/// 1 本のトランスポート接続を表すプロセス内一意な識別子
///
/// `guest-` プレフィックス付きのランダム文字列。Room は接続を所有せず、
/// この識別子でのみ参照します。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a ConnectionId from an existing string (e.g., in tests)
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Default display nickname derived from the id tail, e.g. `Guest-3f2a`
    pub fn default_nickname(&self) -> String {
        let tail: String = self
            .0
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("Guest-{}", tail)
    }
}

/// ConnectionId のファクトリ
///
/// プロセス生存期間中に再利用されない識別子を払い出します。
/// 48 bit のランダム部で衝突確率は無視できます。
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        let raw = Uuid::new_v4().simple().to_string();
        ConnectionId(format!("guest-{}", &raw[..12]))
    }
}

/// ルームを識別する短いランダム文字列（URL-safe、不透明）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// RoomId のファクトリ
///
/// 32 bit 相当のランダム ID を生成します。登録時に Repository 側で
/// 衝突チェックを行うため、ここでは一意性を保証しません。
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> RoomId {
        let raw = Uuid::new_v4().simple().to_string();
        RoomId(raw[..8].to_string())
    }
}

/// Unix タイムスタンプ（ミリ秒）の値オブジェクト
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// ルーム内でのプレイヤー表示情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerMeta {
    pub nickname: String,
}
