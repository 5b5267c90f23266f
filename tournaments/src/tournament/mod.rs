//! Tournament module: lifecycle status, capacity, and the registry that
//! creates, replaces, and deletes tournaments.
//!
//! ## Example
//!
//! ```no_run
//! use tournaments::clock::SystemClock;
//! use tournaments::db::{Database, PgPlayerRepository, PgTournamentRepository};
//! use tournaments::tournament::{NewTournament, TournamentRegistry};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let registry = TournamentRegistry::new(
//!         Arc::new(PgTournamentRepository::new(db.pool().clone())),
//!         Arc::new(PgPlayerRepository::new(db.pool().clone())),
//!         Arc::new(SystemClock),
//!     );
//!
//!     let tournament = registry
//!         .create(NewTournament {
//!             name: "Spring Cup".to_string(),
//!             game_title: "Tekken 8".to_string(),
//!             max_players: 16,
//!             start_date: chrono::NaiveDate::from_ymd_opt(2031, 4, 1),
//!         })
//!         .await?;
//!     println!("Created tournament: {}", tournament.id);
//!
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;

pub use manager::{TournamentLookup, TournamentRegistry};
pub use models::{
    NewTournament, Tournament, TournamentId, TournamentStatus, TournamentUpdate, UnknownStatus,
};
