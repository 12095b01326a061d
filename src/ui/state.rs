//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, CreateRoomUseCase, DisconnectParticipantUseCase, GetRoomsUseCase,
    JoinRoomUseCase, LeaveSeatUseCase, OfferDrawUseCase, PlayMoveUseCase, ResignUseCase,
    RespondDrawUseCase, RestartGameUseCase, TakeSeatUseCase,
};

/// Shared application state
pub struct AppState {
    /// 接続受付のユースケース
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// 切断処理のユースケース
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// ルーム作成のユースケース
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// ルーム参加のユースケース
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// 着席のユースケース
    pub take_seat_usecase: Arc<TakeSeatUseCase>,
    /// 離席のユースケース
    pub leave_seat_usecase: Arc<LeaveSeatUseCase>,
    /// 着手のユースケース
    pub play_move_usecase: Arc<PlayMoveUseCase>,
    /// 投了のユースケース
    pub resign_usecase: Arc<ResignUseCase>,
    /// ドロー提案のユースケース
    pub offer_draw_usecase: Arc<OfferDrawUseCase>,
    /// ドロー応答のユースケース
    pub respond_draw_usecase: Arc<RespondDrawUseCase>,
    /// リスタートのユースケース
    pub restart_game_usecase: Arc<RestartGameUseCase>,
    /// ルーム一覧取得のユースケース
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
}
