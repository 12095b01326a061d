//! Repository trait 定義
//!
//! ドメイン層が必要とするルーム登録簿（Room Registry）のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::entity::{RestartOutcome, RoomSnapshot, RoomSummary};
use super::error::RoomError;
use super::game::{Color, MoveRequest};
use super::value_object::{ConnectionId, RoomId};

/// Room Repository trait
///
/// ルームの生成・検索と、各ルームへの状態変更操作を提供します。
/// 状態を変更する操作は、変更が起きた場合に必ずルーム全メンバーへ
/// 最新スナップショットを配信してから戻ります（配信順序はルームごとに
/// 変更操作の順序と一致すること）。
///
/// ## 依存性の逆転（DIP）
///
/// - ドメイン層が必要とするインターフェースをドメイン層自身が定義
/// - UseCase 層はこの trait に依存し、Infrastructure 層の実装には依存しない
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 空の座席と初期局面を持つ新しいルームを作る。失敗しない。
    async fn create_room(&self) -> RoomId;

    /// ルームの現在のスナップショットを取得
    async fn snapshot(&self, room_id: &RoomId) -> Result<RoomSnapshot, RoomError>;

    /// 全ルームの概要を取得（HTTP API 用）
    async fn summaries(&self) -> Vec<RoomSummary>;

    /// 接続をルームのメンバーに追加（接続単位で冪等）
    async fn join(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError>;

    /// 接続をルームから取り除く（切断時に呼ばれる）。
    /// メンバーが空になったら非活性ウィンドウ経過後の削除を予約する。
    /// ルームが既に存在しない場合も成功として扱う。
    async fn leave(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError>;

    /// 座席に着く
    async fn take_seat(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
        color: Color,
    ) -> Result<(), RoomError>;

    /// 座席を離れる
    async fn leave_seat(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError>;

    /// 手を適用する
    async fn apply_move(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
        mv: MoveRequest,
    ) -> Result<(), RoomError>;

    /// 投了する
    async fn resign(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError>;

    /// ドローを提案する
    async fn offer_draw(&self, room_id: &RoomId, conn: &ConnectionId) -> Result<(), RoomError>;

    /// ドロー提案に応答する
    async fn respond_draw(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
        accept: bool,
    ) -> Result<(), RoomError>;

    /// リスタートを要求する
    async fn restart(
        &self,
        room_id: &RoomId,
        conn: &ConnectionId,
    ) -> Result<RestartOutcome, RoomError>;
}
