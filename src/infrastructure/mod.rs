//! Infrastructure 層
//!
//! ドメイン層が定義するインターフェースの具体的な実装を提供します。
//!
//! - `dto`: ワイヤプロトコルのデータ転送オブジェクト
//! - `message_pusher`: WebSocket を使ったメッセージ送信
//! - `repository`: インメモリのルーム登録簿
//! - `rules`: `chess` クレートを使った Rules Oracle

pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod rules;
