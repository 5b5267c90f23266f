//! # Tournaments
//!
//! Lifecycle and cross-entity validation for tournaments and the players
//! registered into them.
//!
//! ## Core Modules
//!
//! - [`tournament`]: Tournament models and the [`TournamentRegistry`]
//! - [`player`]: Player models and the [`PlayerRegistrar`]
//! - [`db`]: Storage contract with PostgreSQL and in-memory implementations
//! - [`clock`]: Date source used for start-date validation
//! - [`errors`]: The [`RegistryError`] taxonomy
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tournaments::clock::FixedClock;
//! use tournaments::db::InMemoryStore;
//! use tournaments::{NewPlayer, NewTournament, PlayerRegistrar, TournamentRegistry};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), tournaments::RegistryError> {
//! let today = chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
//! let store = Arc::new(InMemoryStore::new());
//! let clock = Arc::new(FixedClock(today));
//! let tournaments = Arc::new(TournamentRegistry::new(store.clone(), store.clone(), clock.clone()));
//! let players = PlayerRegistrar::new(store, tournaments.clone(), clock);
//!
//! let cup = tournaments
//!     .create(NewTournament {
//!         name: "Cup".to_string(),
//!         game_title: "Tekken".to_string(),
//!         max_players: 2,
//!         start_date: Some(today),
//!     })
//!     .await?;
//!
//! players
//!     .register(NewPlayer {
//!         name: "Danna".to_string(),
//!         nick_name: "Sakura".to_string(),
//!         tournament_id: cup.id,
//!         registration_date: today,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod db;
pub mod errors;
pub mod player;
pub mod tournament;

pub use errors::{ErrorKind, RegistryError, RegistryResult};
pub use player::{NewPlayer, Player, PlayerId, PlayerRegistrar, PlayerUpdate};
pub use tournament::{
    NewTournament, Tournament, TournamentId, TournamentLookup, TournamentRegistry,
    TournamentStatus, TournamentUpdate,
};
