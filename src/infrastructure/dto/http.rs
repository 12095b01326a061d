//! HTTP API レスポンスの DTO

use serde::Serialize;

/// ルーム一覧の 1 エントリ (`GET /api/rooms`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub member_count: usize,
    pub seats_taken: usize,
    /// Unix epoch ミリ秒
    pub created_at: i64,
    pub last_activity: i64,
}
