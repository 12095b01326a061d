//! Realtime chess room server library.
//!
//! This library keeps any number of isolated game rooms consistent over
//! WebSocket: two seated players, any number of spectators, turn enforcement,
//! draw-offer and restart-vote protocols, and a full state broadcast to every
//! room member after each change. Chess legality itself is delegated to a
//! rules oracle behind a trait.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
