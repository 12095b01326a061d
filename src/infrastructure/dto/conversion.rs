//! Conversion logic between DTOs and domain entities.

use crate::domain::{GameResult, RoomSnapshot, RoomSummary, Seats};
use crate::infrastructure::dto::http::RoomSummaryDto;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<GameResult> for dto::GameResultDto {
    fn from(result: GameResult) -> Self {
        match result {
            GameResult::Checkmate { winner } => Self {
                status: "checkmate".to_string(),
                winner: Some(winner),
                reason: None,
            },
            GameResult::Stalemate => Self {
                status: "stalemate".to_string(),
                winner: None,
                reason: None,
            },
            GameResult::Draw { reason } => Self {
                status: "draw".to_string(),
                winner: None,
                reason: Some(reason.as_str().to_string()),
            },
            GameResult::Resignation { winner } => Self {
                status: "resign".to_string(),
                winner: Some(winner),
                reason: None,
            },
        }
    }
}

impl From<&Seats> for dto::SeatsDto {
    fn from(seats: &Seats) -> Self {
        Self {
            w: seats.white.as_ref().map(|c| c.as_str().to_string()),
            b: seats.black.as_ref().map(|c| c.as_str().to_string()),
        }
    }
}

impl From<RoomSnapshot> for dto::RoomStateDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            room_id: snapshot.room_id.as_str().to_string(),
            fen: snapshot.fen,
            turn: snapshot.turn,
            last_move: snapshot.last_move.map(|m| dto::LastMoveDto {
                from: m.from,
                to: m.to,
            }),
            in_check: snapshot.in_check,
            result: snapshot.result.map(Into::into),
            seats: (&snapshot.seats).into(),
            players: snapshot
                .players
                .into_iter()
                .map(|(conn, meta)| {
                    (
                        conn.into_string(),
                        dto::PlayerDto {
                            nickname: meta.nickname,
                        },
                    )
                })
                .collect(),
            draw_offer: snapshot.draw_offer,
        }
    }
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            id: summary.id.into_string(),
            member_count: summary.member_count,
            seats_taken: summary.seats_taken,
            created_at: summary.created_at.value(),
            last_activity: summary.last_activity.value(),
        }
    }
}
