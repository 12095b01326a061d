//! WebSocket connection handlers.
//!
//! 受信メッセージの処理は 1 通ずつ完結します（decode → ユースケース実行 →
//! 応答/配信）。要求起因のエラーは要求を出した接続にだけ `error` として
//! 返し、ルーム状態には影響しません。パースできない入力はログに残して
//! 破棄します。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ConnectionId, MoveRequest, PusherChannel, RoomError, RoomId},
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// この接続にだけメッセージを送る（fire-and-forget）
fn push_to_self(tx: &PusherChannel, message: &ServerMessage) {
    match serde_json::to_string(message) {
        Ok(json) => {
            let _ = tx.send(json);
        }
        Err(e) => {
            tracing::error!("Failed to serialize server message: {}", e);
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Assign a connection id and register the sender
    // (register_client is called inside the UseCase)
    let conn = state.connect_participant_usecase.execute(tx.clone()).await;

    // 他のメッセージを受け付ける前に welcome で識別子を通知する
    push_to_self(
        &tx,
        &ServerMessage::Welcome {
            conn_id: conn.as_str().to_string(),
        },
    );

    // この接続が所属しているルーム（切断時の退出処理に使う）
    let current_room: Arc<Mutex<Option<RoomId>>> = Arc::new(Mutex::new(None));

    let state_clone = state.clone();
    let conn_clone = conn.clone();
    let current_room_clone = current_room.clone();

    // Spawn a task to receive messages from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        dispatch(
                            &state_clone,
                            &conn_clone,
                            client_msg,
                            &current_room_clone,
                            &tx,
                        )
                        .await;
                    }
                    Err(e) => {
                        // 不正な入力は破棄する（接続もルームも巻き込まない）
                        tracing::warn!(
                            "Dropping malformed message from '{}': {}",
                            conn_clone.as_str(),
                            e
                        );
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", conn_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive broadcasts and send them to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // 切断はルームにとって通常のライフサイクルイベント
    let room = current_room.lock().await.take();
    if let Err(e) = state
        .disconnect_participant_usecase
        .execute(&conn, room)
        .await
    {
        tracing::warn!("Failed to disconnect '{}': {}", conn.as_str(), e);
    }
}

/// メッセージを 1 通処理し、エラーは要求元の接続にだけ返す
async fn dispatch(
    state: &Arc<AppState>,
    conn: &ConnectionId,
    msg: ClientMessage,
    current_room: &Arc<Mutex<Option<RoomId>>>,
    tx: &PusherChannel,
) {
    if let Err(e) = handle_message(state, conn, msg, current_room, tx).await {
        push_to_self(
            tx,
            &ServerMessage::Error {
                message: e.to_string(),
            },
        );
    }
}

/// `roomId` を解決する。欠落も未知の ID と同じ「ルームなし」として扱う。
fn resolve_room(room_id: Option<String>) -> Result<RoomId, RoomError> {
    room_id.map(RoomId::new).ok_or(RoomError::RoomNotFound)
}

async fn handle_message(
    state: &Arc<AppState>,
    conn: &ConnectionId,
    msg: ClientMessage,
    current_room: &Arc<Mutex<Option<RoomId>>>,
    tx: &PusherChannel,
) -> Result<(), RoomError> {
    match msg {
        ClientMessage::CreateRoom => {
            let room_id = state.create_room_usecase.execute().await;
            push_to_self(
                tx,
                &ServerMessage::RoomCreated {
                    room_id: room_id.into_string(),
                },
            );
            Ok(())
        }
        ClientMessage::Join { room_id, .. } => {
            let room_id = resolve_room(room_id)?;
            state.join_room_usecase.execute(&room_id, conn).await?;
            *current_room.lock().await = Some(room_id);
            Ok(())
        }
        ClientMessage::TakeSeat { room_id, color } => {
            let room_id = resolve_room(room_id)?;
            state.take_seat_usecase.execute(&room_id, conn, color).await
        }
        ClientMessage::LeaveSeat { room_id } => {
            let room_id = resolve_room(room_id)?;
            state.leave_seat_usecase.execute(&room_id, conn).await
        }
        ClientMessage::Move {
            room_id,
            from,
            to,
            promotion,
        } => {
            let room_id = resolve_room(room_id)?;
            let mv = MoveRequest {
                from,
                to,
                promotion,
            };
            state.play_move_usecase.execute(&room_id, conn, mv).await
        }
        ClientMessage::Resign { room_id } => {
            let room_id = resolve_room(room_id)?;
            state.resign_usecase.execute(&room_id, conn).await
        }
        ClientMessage::OfferDraw { room_id } => {
            let room_id = resolve_room(room_id)?;
            state.offer_draw_usecase.execute(&room_id, conn).await
        }
        ClientMessage::RespondDraw { room_id, accept } => {
            let room_id = resolve_room(room_id)?;
            state
                .respond_draw_usecase
                .execute(&room_id, conn, accept)
                .await
        }
        ClientMessage::Restart { room_id } => {
            let room_id = resolve_room(room_id)?;
            state
                .restart_game_usecase
                .execute(&room_id, conn)
                .await
                .map(|_| ())
        }
    }
}
