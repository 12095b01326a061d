//! UseCase 層
//!
//! プロトコル操作ごとに 1 つのユースケースを定義します。
//! 各ユースケースは Repository / MessagePusher の trait（ドメイン層で定義）
//! にのみ依存し、具体的な実装は起動時に注入されます。

mod connect;
mod create_room;
mod disconnect;
mod draw;
mod join_room;
mod play_move;
mod resign;
mod restart;
mod room_query;
mod seat;

pub use connect::ConnectParticipantUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect::DisconnectParticipantUseCase;
pub use draw::{OfferDrawUseCase, RespondDrawUseCase};
pub use join_room::JoinRoomUseCase;
pub use play_move::PlayMoveUseCase;
pub use resign::ResignUseCase;
pub use restart::RestartGameUseCase;
pub use room_query::GetRoomsUseCase;
pub use seat::{LeaveSeatUseCase, TakeSeatUseCase};
