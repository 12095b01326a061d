//! Room エンティティ
//!
//! 1 つの対局セッションの可変状態（座席・メンバー・ドロー提案・
//! リスタート投票・終局結果）と、その状態機械を実装します。
//! ここは同期的な純粋ロジックで、ロックや I/O は Repository 側の責務です。

use std::collections::{HashMap, HashSet};

use super::error::RoomError;
use super::game::{Color, DrawReason, GameResult, LastMove, MoveRequest, RulesOracle};
use super::value_object::{ConnectionId, PlayerMeta, RoomId, Timestamp};

/// 白黒 2 つの座席
///
/// 座席は接続識別子を参照で保持するだけで、接続そのものは所有しません。
/// 1 つの座席は同時に 1 接続まで、1 接続は同時に 1 座席までです。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seats {
    pub white: Option<ConnectionId>,
    pub black: Option<ConnectionId>,
}

impl Seats {
    pub fn get(&self, color: Color) -> Option<&ConnectionId> {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    fn slot_mut(&mut self, color: Color) -> &mut Option<ConnectionId> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// 指定接続が占有している座席をすべて空ける
    pub fn vacate(&mut self, conn: &ConnectionId) {
        if self.white.as_ref() == Some(conn) {
            self.white = None;
        }
        if self.black.as_ref() == Some(conn) {
            self.black = None;
        }
    }

    /// 接続の色を導出する（どちらの座席も占有していなければ観戦者）
    pub fn seat_of(&self, conn: &ConnectionId) -> Option<Color> {
        if self.white.as_ref() == Some(conn) {
            Some(Color::White)
        } else if self.black.as_ref() == Some(conn) {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn both_occupied(&self) -> bool {
        self.white.is_some() && self.black.is_some()
    }

    pub fn both_empty(&self) -> bool {
        self.white.is_none() && self.black.is_none()
    }
}

/// `Room::restart` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartOutcome {
    /// ルームが初期局面にリセットされた
    Restarted,
    /// 投票を記録した（全会一致にはまだ達していない）。
    /// `members` は `restartRequested` の通知対象。
    VoteRecorded { members: Vec<ConnectionId> },
    /// 片方の座席だけが占有されている場合は何もしない
    Ignored,
}

/// ブロードキャスト用のルーム状態スナップショット
///
/// 冪等かつ完全: クライアントは直前の状態と差分を取る必要がありません。
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub fen: String,
    pub turn: Color,
    pub last_move: Option<LastMove>,
    pub in_check: bool,
    pub result: Option<GameResult>,
    pub seats: Seats,
    pub players: HashMap<ConnectionId, PlayerMeta>,
    pub draw_offer: Option<Color>,
}

/// HTTP API 用のルーム概要
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub id: RoomId,
    pub member_count: usize,
    pub seats_taken: usize,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

/// 1 つの対局セッション
pub struct Room {
    pub id: RoomId,
    game: Box<dyn RulesOracle>,
    seats: Seats,
    /// メンバー集合とプレイヤー表示情報（キー集合 = メンバー集合）
    members: HashMap<ConnectionId, PlayerMeta>,
    last_move: Option<LastMove>,
    draw_offer: Option<Color>,
    restart_votes: HashSet<ConnectionId>,
    /// プロトコル起因の終局結果（投了・合意ドロー）。
    /// 一度設定されたら、合意リスタートまで不変。
    result: Option<GameResult>,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, game: Box<dyn RulesOracle>, now: Timestamp) -> Self {
        Self {
            id,
            game,
            seats: Seats::default(),
            members: HashMap::new(),
            last_move: None,
            draw_offer: None,
            restart_votes: HashSet::new(),
            result: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.keys().cloned().collect()
    }

    pub fn seats(&self) -> &Seats {
        &self.seats
    }

    pub fn seat_of(&self, conn: &ConnectionId) -> Option<Color> {
        self.seats.seat_of(conn)
    }

    /// 現在の終局結果
    ///
    /// プロトコル起因の結果（投了・合意ドロー）が Oracle の判定より優先。
    pub fn result(&self) -> Option<GameResult> {
        self.result.clone().or_else(|| self.game.status())
    }

    fn touch(&mut self, now: Timestamp) {
        self.last_activity = now;
    }

    /// メンバー集合に接続を追加する（接続単位で冪等）
    pub fn join(&mut self, conn: ConnectionId, now: Timestamp) {
        let nickname = conn.default_nickname();
        self.members
            .entry(conn)
            .or_insert_with(|| PlayerMeta { nickname });
        self.touch(now);
    }

    /// 接続をメンバー集合・座席・投票から取り除く。
    /// 取り除いた後にメンバーが空になったかを返す。
    pub fn leave(&mut self, conn: &ConnectionId) -> bool {
        self.members.remove(conn);
        self.seats.vacate(conn);
        self.restart_votes.remove(conn);
        self.members.is_empty()
    }

    /// 座席に着く。占有済みなら `SeatTaken`。
    /// すでに別の座席を占有していた場合はそちらを空けてから着席する。
    pub fn take_seat(
        &mut self,
        conn: &ConnectionId,
        color: Color,
        now: Timestamp,
    ) -> Result<(), RoomError> {
        if self.seats.get(color).is_some() {
            return Err(RoomError::SeatTaken);
        }
        self.seats.vacate(conn);
        // 座席を移った接続の投票は元の座席のものなので無効化する
        self.restart_votes.remove(conn);
        *self.seats.slot_mut(color) = Some(conn.clone());
        self.touch(now);
        Ok(())
    }

    /// 占有している座席を空ける。座席を離れた接続の投票は無効化する。
    pub fn leave_seat(&mut self, conn: &ConnectionId, now: Timestamp) {
        self.seats.vacate(conn);
        self.restart_votes.remove(conn);
        self.touch(now);
    }

    /// 手を適用する
    ///
    /// 手番の座席を占有する接続のみが着手でき、合法性は Oracle に委譲。
    /// 失敗時にはルーム状態を一切変更しない（部分的変化の禁止）。
    pub fn apply_move(
        &mut self,
        conn: &ConnectionId,
        mv: &MoveRequest,
        now: Timestamp,
    ) -> Result<(), RoomError> {
        if self.result().is_some() {
            return Err(RoomError::game_over());
        }
        if self.seats.get(self.game.turn()) != Some(conn) {
            return Err(RoomError::NotYourTurn);
        }
        self.game.try_move(mv).map_err(|_| RoomError::IllegalMove)?;
        self.last_move = Some(LastMove {
            from: mv.from.clone(),
            to: mv.to.clone(),
        });
        // 着手は未処理のドロー提案を無条件に破棄する
        self.draw_offer = None;
        self.touch(now);
        Ok(())
    }

    /// 投了。Oracle を介さない直接の終局遷移。
    pub fn resign(&mut self, conn: &ConnectionId, now: Timestamp) -> Result<(), RoomError> {
        let color = self.seat_of(conn).ok_or_else(RoomError::not_seated)?;
        if self.result().is_some() {
            return Err(RoomError::game_over());
        }
        self.result = Some(GameResult::Resignation {
            winner: color.opposite(),
        });
        self.draw_offer = None;
        self.touch(now);
        Ok(())
    }

    /// ドローを提案する。状態が変化したときのみ `true` を返す。
    ///
    /// 既に提案が残っている場合は黙って無視する（提案は 1 件まで）。
    pub fn offer_draw(&mut self, conn: &ConnectionId, now: Timestamp) -> Result<bool, RoomError> {
        let color = self.seat_of(conn).ok_or_else(RoomError::not_seated)?;
        if self.result().is_some() {
            return Err(RoomError::game_over());
        }
        if self.draw_offer.is_some() {
            return Ok(false);
        }
        self.draw_offer = Some(color);
        self.touch(now);
        Ok(true)
    }

    /// ドロー提案に応答する。状態が変化したときのみ `true` を返す。
    ///
    /// 提案が既に消えていた場合（介在した着手など）は黙って無視する。
    /// 自分の提案への応答はプロトコル違反。
    pub fn respond_draw(
        &mut self,
        conn: &ConnectionId,
        accept: bool,
        now: Timestamp,
    ) -> Result<bool, RoomError> {
        let color = self.seat_of(conn).ok_or_else(RoomError::not_seated)?;
        match self.draw_offer {
            None => Ok(false),
            Some(by) if by == color => Err(RoomError::InvalidProtocolState(
                "Cannot respond to your own draw offer".to_string(),
            )),
            Some(_) => {
                self.draw_offer = None;
                if accept {
                    self.result = Some(GameResult::Draw {
                        reason: DrawReason::Agreement,
                    });
                }
                self.touch(now);
                Ok(true)
            }
        }
    }

    /// リスタート要求
    ///
    /// - 両座席が空: 即リセット（反対する者がいない）
    /// - 両座席が占有: 着席者の投票を記録し、両座席保持者が揃ったらリセット
    /// - 片側のみ占有: 何もしない
    pub fn restart(&mut self, conn: &ConnectionId, now: Timestamp) -> RestartOutcome {
        if self.seats.both_empty() {
            self.reset_game(now);
            return RestartOutcome::Restarted;
        }
        if !self.seats.both_occupied() {
            return RestartOutcome::Ignored;
        }

        if self.seat_of(conn).is_some() {
            self.restart_votes.insert(conn.clone());
        }

        let unanimous = match (&self.seats.white, &self.seats.black) {
            (Some(w), Some(b)) => self.restart_votes.contains(w) && self.restart_votes.contains(b),
            _ => false,
        };
        if unanimous {
            self.reset_game(now);
            RestartOutcome::Restarted
        } else {
            RestartOutcome::VoteRecorded {
                members: self.member_ids(),
            }
        }
    }

    fn reset_game(&mut self, now: Timestamp) {
        self.game.reset();
        self.last_move = None;
        self.draw_offer = None;
        self.result = None;
        self.restart_votes.clear();
        self.touch(now);
    }

    /// 全メンバー配信用のスナップショットを作る
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id.clone(),
            fen: self.game.fen(),
            turn: self.game.turn(),
            last_move: self.last_move.clone(),
            in_check: self.game.in_check(),
            result: self.result(),
            seats: self.seats.clone(),
            players: self.members.clone(),
            draw_offer: self.draw_offer,
        }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            member_count: self.members.len(),
            seats_taken: [&self.seats.white, &self.seats.black]
                .into_iter()
                .filter(|s| s.is_some())
                .count(),
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }
}
