//! Player data models.

use crate::tournament::TournamentId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Player ID type
pub type PlayerId = i64;

/// Stored player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub nick_name: String,
    pub tournament_id: TournamentId,
    pub registration_date: NaiveDate,
}

impl Player {
    /// Apply an update, keeping identity and tournament reference
    pub fn updated_with(&self, update: PlayerUpdate) -> Player {
        Player {
            id: self.id,
            name: update.name,
            nick_name: update.nick_name,
            tournament_id: self.tournament_id,
            registration_date: update.registration_date,
        }
    }
}

/// Player registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub nick_name: String,
    pub tournament_id: TournamentId,
    pub registration_date: NaiveDate,
}

/// Editable player fields; the tournament reference is fixed at registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub name: String,
    pub nick_name: String,
    pub registration_date: NaiveDate,
}
