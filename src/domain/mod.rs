//! ドメイン層
//!
//! ルーム・座席・対局の状態と、それを取り巻くインターフェース
//! （Repository / MessagePusher / RulesOracle）を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

mod entity;
mod error;
mod game;
mod message_pusher;
mod repository;
mod value_object;

pub use entity::{RestartOutcome, Room, RoomSnapshot, RoomSummary, Seats};
pub use error::{MessagePushError, RoomError};
pub use game::{Color, DrawReason, GameResult, LastMove, MoveError, MoveRequest, RulesOracle};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use value_object::{
    ConnectionId, ConnectionIdFactory, PlayerMeta, RoomId, RoomIdFactory, Timestamp,
};

#[cfg(test)]
pub use game::MockRulesOracle;
