//! Player registrar: registration, update, deletion, and lookup.

use super::models::{NewPlayer, Player, PlayerId, PlayerUpdate};
use crate::clock::Clock;
use crate::db::PlayerRepository;
use crate::errors::{RegistryError, RegistryResult};
use crate::tournament::TournamentLookup;
use crate::tournament::manager::validate_start_date;
use std::sync::Arc;

/// Player registrar
#[derive(Clone)]
pub struct PlayerRegistrar {
    players: Arc<dyn PlayerRepository>,
    tournaments: Arc<dyn TournamentLookup>,
    clock: Arc<dyn Clock>,
}

impl PlayerRegistrar {
    /// Create a new player registrar
    ///
    /// # Arguments
    ///
    /// * `players` - Player storage
    /// * `tournaments` - Read access to tournaments for cross-entity checks
    /// * `clock` - Source of today's date
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        tournaments: Arc<dyn TournamentLookup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            players,
            tournaments,
            clock,
        }
    }

    /// Register a player into an upcoming tournament
    ///
    /// The capacity, status, start date and nickname checks run again inside
    /// the store's atomic insert against the tournament as it is then, so a
    /// concurrent registration or tournament edit that slips past them here
    /// is still rejected with the same error.
    ///
    /// # Errors
    ///
    /// * `RegistryError::TournamentNotFound` - Unknown tournament
    /// * `RegistryError::CapacityReached` - Every seat is taken
    /// * `RegistryError::TournamentNotOpen` - Tournament started or finished
    /// * `RegistryError::MissingStartDate` - Tournament has no start date
    /// * `RegistryError::PastStartDate` - Tournament start date has passed
    /// * `RegistryError::RegistrationAfterStart` - Registration dated after the start
    /// * `RegistryError::DuplicateNickname` - Nickname taken in this tournament
    pub async fn register(&self, request: NewPlayer) -> RegistryResult<Player> {
        let tournament = self.tournaments.find_by_id(request.tournament_id).await?;

        let registered = self.players.count_by_tournament_id(tournament.id).await?;
        if registered >= i64::from(tournament.max_players) {
            log::warn!(
                "Tournament {} is full ({}/{})",
                tournament.id,
                registered,
                tournament.max_players
            );
            return Err(RegistryError::CapacityReached {
                max_players: tournament.max_players,
            });
        }

        if !tournament.status.accepts_registrations() {
            return Err(RegistryError::TournamentNotOpen(tournament.status));
        }

        let start_date = validate_start_date(tournament.start_date, self.clock.today())?;
        if request.registration_date > start_date {
            return Err(RegistryError::RegistrationAfterStart);
        }

        if self
            .players
            .exists_by_nick_name_and_tournament_id(&request.nick_name, tournament.id)
            .await?
        {
            return Err(RegistryError::DuplicateNickname(request.nick_name));
        }

        let player = self
            .players
            .insert_within_capacity(&request)
            .await
            .inspect_err(|e| log::warn!("Registration into {} rejected: {}", tournament.id, e))?;

        log::info!(
            "Registered player {} ({}) in tournament {}",
            player.id,
            player.nick_name,
            player.tournament_id
        );
        Ok(player)
    }

    /// Update a player's name, nickname, and registration date
    ///
    /// # Errors
    ///
    /// * `RegistryError::PlayerNotFound` - Unknown player
    /// * `RegistryError::DuplicateNickname` - New nickname taken in the tournament
    /// * `RegistryError::RegistrationAfterStart` - Registration dated after the start
    pub async fn update(&self, id: PlayerId, update: PlayerUpdate) -> RegistryResult<Player> {
        let current = self.read_by_id(id).await?;

        if update.nick_name != current.nick_name
            && self
                .players
                .exists_by_nick_name_and_tournament_id(&update.nick_name, current.tournament_id)
                .await?
        {
            return Err(RegistryError::DuplicateNickname(update.nick_name));
        }

        // Re-read so a start date moved since registration is honoured
        let tournament = self.tournaments.find_by_id(current.tournament_id).await?;
        let start_date = tournament
            .start_date
            .ok_or(RegistryError::MissingStartDate)?;
        if update.registration_date > start_date {
            return Err(RegistryError::RegistrationAfterStart);
        }

        let player = self.players.save(&current.updated_with(update)).await?;

        log::info!("Updated player {}", player.id);
        Ok(player)
    }

    /// List every player across all tournaments
    pub async fn read_all(&self) -> RegistryResult<Vec<Player>> {
        self.players.find_all().await
    }

    /// Get a player by ID
    pub async fn read_by_id(&self, id: PlayerId) -> RegistryResult<Player> {
        self.players
            .find_by_id(id)
            .await?
            .ok_or(RegistryError::PlayerNotFound(id))
    }

    /// Delete a player regardless of tournament state
    pub async fn delete(&self, id: PlayerId) -> RegistryResult<()> {
        let player = self.read_by_id(id).await?;
        self.players.delete(player.id).await?;

        log::info!(
            "Deleted player {} from tournament {}",
            player.id,
            player.tournament_id
        );
        Ok(())
    }
}
