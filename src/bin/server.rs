//! Realtime chess room server over WebSocket.
//!
//! Rooms, seats, turn enforcement, draw/restart protocols and state broadcast.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000 --room-ttl-secs 600
//! ```

use std::{sync::Arc, time::Duration};

use chess_rooms_rs::{
    common::{logger::setup_logger, time::SystemClock},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{Server, state::AppState},
    usecase::{
        ConnectParticipantUseCase, CreateRoomUseCase, DisconnectParticipantUseCase,
        GetRoomsUseCase, JoinRoomUseCase, LeaveSeatUseCase, OfferDrawUseCase, PlayMoveUseCase,
        ResignUseCase, RespondDrawUseCase, RestartGameUseCase, TakeSeatUseCase,
    },
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Realtime chess room server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds an empty room survives before it is reclaimed
    #[arg(long, default_value = "600")]
    room_ttl_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. MessagePusher
    // 2. Repository
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 2. Create Repository (in-memory room registry)
    let repository = Arc::new(InMemoryRoomRepository::new(
        message_pusher.clone(),
        Arc::new(SystemClock),
        Duration::from_secs(args.room_ttl_secs),
    ));

    // 3. Create UseCases
    let connect_participant_usecase =
        Arc::new(ConnectParticipantUseCase::new(message_pusher.clone()));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let create_room_usecase = Arc::new(CreateRoomUseCase::new(repository.clone()));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(repository.clone()));
    let take_seat_usecase = Arc::new(TakeSeatUseCase::new(repository.clone()));
    let leave_seat_usecase = Arc::new(LeaveSeatUseCase::new(repository.clone()));
    let play_move_usecase = Arc::new(PlayMoveUseCase::new(repository.clone()));
    let resign_usecase = Arc::new(ResignUseCase::new(repository.clone()));
    let offer_draw_usecase = Arc::new(OfferDrawUseCase::new(repository.clone()));
    let respond_draw_usecase = Arc::new(RespondDrawUseCase::new(repository.clone()));
    let restart_game_usecase = Arc::new(RestartGameUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));

    // 4. Build AppState
    let app_state = AppState {
        connect_participant_usecase,
        disconnect_participant_usecase,
        create_room_usecase,
        join_room_usecase,
        take_seat_usecase,
        leave_seat_usecase,
        play_move_usecase,
        resign_usecase,
        offer_draw_usecase,
        respond_draw_usecase,
        restart_game_usecase,
        get_rooms_usecase,
    };

    // 5. Create and run the server
    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
