//! Player module: registration of players into tournaments.
//!
//! Players are admitted only while their tournament is upcoming, has a free
//! seat, and has no other player holding the same nickname.

pub mod manager;
pub mod models;

pub use manager::PlayerRegistrar;
pub use models::{NewPlayer, Player, PlayerId, PlayerUpdate};
