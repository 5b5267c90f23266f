//! Tournament registry: creation, replacement, deletion, and lookup.

use super::models::{NewTournament, Tournament, TournamentId, TournamentStatus, TournamentUpdate};
use crate::clock::Clock;
use crate::db::{PlayerRepository, TournamentRepository};
use crate::errors::{RegistryError, RegistryResult};
use crate::player::Player;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// Read access to tournaments, as needed by player registration.
#[async_trait]
pub trait TournamentLookup: Send + Sync {
    /// Fetch a tournament or fail with `TournamentNotFound`
    async fn find_by_id(&self, id: TournamentId) -> RegistryResult<Tournament>;
}

/// Start dates must be present and must not lie before `today`.
pub(crate) fn validate_start_date(
    start_date: Option<NaiveDate>,
    today: NaiveDate,
) -> RegistryResult<NaiveDate> {
    let start_date = start_date.ok_or(RegistryError::MissingStartDate)?;
    if start_date < today {
        return Err(RegistryError::PastStartDate);
    }
    Ok(start_date)
}

fn validate_max_players(max_players: i32) -> RegistryResult<()> {
    if max_players <= 1 {
        return Err(RegistryError::InvalidCapacity(max_players));
    }
    Ok(())
}

/// Tournament registry
#[derive(Clone)]
pub struct TournamentRegistry {
    tournaments: Arc<dyn TournamentRepository>,
    players: Arc<dyn PlayerRepository>,
    clock: Arc<dyn Clock>,
}

impl TournamentRegistry {
    /// Create a new tournament registry
    pub fn new(
        tournaments: Arc<dyn TournamentRepository>,
        players: Arc<dyn PlayerRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tournaments,
            players,
            clock,
        }
    }

    /// Create a new tournament in the `Upcoming` state
    ///
    /// # Errors
    ///
    /// * `RegistryError::DuplicateName` - Another tournament has this name
    /// * `RegistryError::MissingStartDate` - No start date given
    /// * `RegistryError::PastStartDate` - Start date is before today
    /// * `RegistryError::InvalidCapacity` - Fewer than two seats
    pub async fn create(&self, request: NewTournament) -> RegistryResult<Tournament> {
        log::info!("Creating tournament: {:?}", request);

        if self.tournaments.find_by_name(&request.name).await?.is_some() {
            log::warn!("Tournament name already in use: {}", request.name);
            return Err(RegistryError::DuplicateName(request.name));
        }

        validate_start_date(request.start_date, self.clock.today())
            .and_then(|_| validate_max_players(request.max_players))
            .inspect_err(|e| log::warn!("Rejected tournament {}: {}", request.name, e))?;

        let tournament = self
            .tournaments
            .insert(&request, TournamentStatus::Upcoming)
            .await?;

        log::info!("Created tournament {} ({})", tournament.id, tournament.name);
        Ok(tournament)
    }

    /// Replace every field of a tournament, including its status
    ///
    /// Capacity, start date, and name uniqueness are not re-validated here;
    /// only a `Started` tournament refuses the replacement.
    ///
    /// # Errors
    ///
    /// * `RegistryError::TournamentNotFound` - No such tournament
    /// * `RegistryError::IllegalTransition` - Tournament has started
    pub async fn update(
        &self,
        id: TournamentId,
        update: TournamentUpdate,
    ) -> RegistryResult<Tournament> {
        let current = self.find_by_id(id).await?;

        if current.status.blocks_edits() {
            log::warn!("Refusing to edit started tournament {}", id);
            return Err(RegistryError::IllegalTransition);
        }

        let replaced = self.tournaments.save(&current.replaced_with(update)).await?;

        log::info!(
            "Updated tournament {}: status {} -> {}",
            id,
            current.status,
            replaced.status
        );
        Ok(replaced)
    }

    /// List all tournaments
    pub async fn find_all(&self) -> RegistryResult<Vec<Tournament>> {
        self.tournaments.find_all().await
    }

    /// Get a tournament by ID
    pub async fn find_by_id(&self, id: TournamentId) -> RegistryResult<Tournament> {
        self.tournaments
            .find_by_id(id)
            .await?
            .ok_or(RegistryError::TournamentNotFound(id))
    }

    /// Delete a tournament and every player registered in it
    ///
    /// # Errors
    ///
    /// * `RegistryError::TournamentNotFound` - No such tournament
    /// * `RegistryError::AlreadyStarted` - Tournament has started
    pub async fn delete(&self, id: TournamentId) -> RegistryResult<()> {
        let tournament = self.find_by_id(id).await?;

        if tournament.status.blocks_deletion() {
            log::warn!("Refusing to delete started tournament {}", id);
            return Err(RegistryError::AlreadyStarted);
        }

        self.tournaments.delete(id).await?;

        log::info!("Deleted tournament {} ({})", id, tournament.name);
        Ok(())
    }

    /// List the players registered in a tournament
    pub async fn list_players(&self, tournament_id: TournamentId) -> RegistryResult<Vec<Player>> {
        self.find_by_id(tournament_id).await?;
        self.players.find_by_tournament_id(tournament_id).await
    }
}

#[async_trait]
impl TournamentLookup for TournamentRegistry {
    async fn find_by_id(&self, id: TournamentId) -> RegistryResult<Tournament> {
        TournamentRegistry::find_by_id(self, id).await
    }
}
