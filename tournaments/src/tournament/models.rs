//! Tournament data models.

use crate::errors::{RegistryError, RegistryResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tournament ID type
pub type TournamentId = i64;

/// Tournament lifecycle status
///
/// Progression is `Upcoming -> Started -> Finished`, driven entirely by
/// callers of [`TournamentRegistry::update`](super::TournamentRegistry::update).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TournamentStatus {
    /// Accepting registrations
    Upcoming,
    /// Tournament in progress
    Started,
    /// Tournament finished
    Finished,
}

impl TournamentStatus {
    /// Whether the tournament record may no longer be replaced
    pub fn blocks_edits(self) -> bool {
        match self {
            TournamentStatus::Started => true,
            TournamentStatus::Upcoming | TournamentStatus::Finished => false,
        }
    }

    /// Whether the tournament may no longer be deleted
    pub fn blocks_deletion(self) -> bool {
        match self {
            TournamentStatus::Started => true,
            TournamentStatus::Upcoming | TournamentStatus::Finished => false,
        }
    }

    /// Whether new players may register
    pub fn accepts_registrations(self) -> bool {
        match self {
            TournamentStatus::Upcoming => true,
            TournamentStatus::Started | TournamentStatus::Finished => false,
        }
    }

    /// Storage representation
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "UPCOMING",
            TournamentStatus::Started => "STARTED",
            TournamentStatus::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tournament status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TournamentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UPCOMING" => Ok(TournamentStatus::Upcoming),
            "STARTED" => Ok(TournamentStatus::Started),
            "FINISHED" => Ok(TournamentStatus::Finished),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Stored tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub game_title: String,
    pub max_players: i32,
    pub start_date: Option<NaiveDate>,
    pub status: TournamentStatus,
}

impl Tournament {
    /// Replace every mutable field with the values in `update`
    pub fn replaced_with(&self, update: TournamentUpdate) -> Tournament {
        Tournament {
            id: self.id,
            name: update.name,
            game_title: update.game_title,
            max_players: update.max_players,
            start_date: update.start_date,
            status: update.status,
        }
    }

    /// Whether one more player dated `registration_date` may join, with
    /// `registered` players already in
    ///
    /// Stores run this against the tournament as it is at insert time, so an
    /// edit that lands after the registrar's own checks is still honoured.
    pub fn check_admission(
        &self,
        registered: i64,
        registration_date: NaiveDate,
    ) -> RegistryResult<()> {
        if registered >= i64::from(self.max_players) {
            return Err(RegistryError::CapacityReached {
                max_players: self.max_players,
            });
        }
        if !self.status.accepts_registrations() {
            return Err(RegistryError::TournamentNotOpen(self.status));
        }
        let start_date = self.start_date.ok_or(RegistryError::MissingStartDate)?;
        if registration_date > start_date {
            return Err(RegistryError::RegistrationAfterStart);
        }
        Ok(())
    }
}

/// Tournament creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub game_title: String,
    pub max_players: i32,
    pub start_date: Option<NaiveDate>,
}

/// Full-record tournament replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentUpdate {
    pub name: String,
    pub game_title: String,
    pub max_players: i32,
    pub start_date: Option<NaiveDate>,
    pub status: TournamentStatus,
}
