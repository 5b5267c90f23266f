//! In-memory storage backing both repositories.
//!
//! Every operation runs under one mutex guard, which gives the same
//! single-write atomicity the PostgreSQL implementation gets from its
//! transaction and unique constraint.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::repository::{PlayerRepository, TournamentRepository};
use crate::errors::{RegistryError, RegistryResult};
use crate::player::{NewPlayer, Player, PlayerId};
use crate::tournament::{NewTournament, Tournament, TournamentId, TournamentStatus};

#[derive(Default)]
struct MemoryState {
    tournaments: HashMap<TournamentId, Tournament>,
    players: HashMap<PlayerId, Player>,
    next_tournament_id: TournamentId,
    next_player_id: PlayerId,
}

impl MemoryState {
    fn nick_name_taken(
        &self,
        nick_name: &str,
        tournament_id: TournamentId,
        except: Option<PlayerId>,
    ) -> bool {
        self.players.values().any(|p| {
            p.tournament_id == tournament_id && p.nick_name == nick_name && Some(p.id) != except
        })
    }

    fn player_count(&self, tournament_id: TournamentId) -> usize {
        self.players
            .values()
            .filter(|p| p.tournament_id == tournament_id)
            .count()
    }
}

/// Shared in-memory store implementing [`TournamentRepository`] and
/// [`PlayerRepository`]
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sorted_by_id<T, F>(mut items: Vec<T>, id: F) -> Vec<T>
where
    F: Fn(&T) -> i64,
{
    items.sort_by_key(|item| id(item));
    items
}

#[async_trait]
impl TournamentRepository for InMemoryStore {
    async fn insert(
        &self,
        tournament: &NewTournament,
        status: TournamentStatus,
    ) -> RegistryResult<Tournament> {
        let mut state = self.lock();
        if state.tournaments.values().any(|t| t.name == tournament.name) {
            return Err(RegistryError::DuplicateName(tournament.name.clone()));
        }

        state.next_tournament_id += 1;
        let stored = Tournament {
            id: state.next_tournament_id,
            name: tournament.name.clone(),
            game_title: tournament.game_title.clone(),
            max_players: tournament.max_players,
            start_date: tournament.start_date,
            status,
        };
        state.tournaments.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, tournament: &Tournament) -> RegistryResult<Tournament> {
        let mut state = self.lock();
        match state.tournaments.get_mut(&tournament.id) {
            Some(slot) => {
                *slot = tournament.clone();
                Ok(tournament.clone())
            }
            None => Err(RegistryError::TournamentNotFound(tournament.id)),
        }
    }

    async fn find_by_id(&self, id: TournamentId) -> RegistryResult<Option<Tournament>> {
        Ok(self.lock().tournaments.get(&id).cloned())
    }

    async fn find_all(&self) -> RegistryResult<Vec<Tournament>> {
        let all: Vec<Tournament> = self.lock().tournaments.values().cloned().collect();
        Ok(sorted_by_id(all, |t: &Tournament| t.id))
    }

    async fn find_by_name(&self, name: &str) -> RegistryResult<Option<Tournament>> {
        Ok(self
            .lock()
            .tournaments
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn delete(&self, id: TournamentId) -> RegistryResult<()> {
        let mut state = self.lock();
        if state.tournaments.remove(&id).is_none() {
            return Err(RegistryError::TournamentNotFound(id));
        }
        state.players.retain(|_, p| p.tournament_id != id);
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for InMemoryStore {
    async fn insert_within_capacity(&self, player: &NewPlayer) -> RegistryResult<Player> {
        let mut state = self.lock();

        let tournament = state
            .tournaments
            .get(&player.tournament_id)
            .ok_or(RegistryError::TournamentNotFound(player.tournament_id))?;
        tournament.check_admission(
            state.player_count(player.tournament_id) as i64,
            player.registration_date,
        )?;
        if state.nick_name_taken(&player.nick_name, player.tournament_id, None) {
            return Err(RegistryError::DuplicateNickname(player.nick_name.clone()));
        }

        state.next_player_id += 1;
        let stored = Player {
            id: state.next_player_id,
            name: player.name.clone(),
            nick_name: player.nick_name.clone(),
            tournament_id: player.tournament_id,
            registration_date: player.registration_date,
        };
        state.players.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, player: &Player) -> RegistryResult<Player> {
        let mut state = self.lock();
        if !state.players.contains_key(&player.id) {
            return Err(RegistryError::PlayerNotFound(player.id));
        }
        if state.nick_name_taken(&player.nick_name, player.tournament_id, Some(player.id)) {
            return Err(RegistryError::DuplicateNickname(player.nick_name.clone()));
        }
        state.players.insert(player.id, player.clone());
        Ok(player.clone())
    }

    async fn find_by_id(&self, id: PlayerId) -> RegistryResult<Option<Player>> {
        Ok(self.lock().players.get(&id).cloned())
    }

    async fn find_all(&self) -> RegistryResult<Vec<Player>> {
        let all: Vec<Player> = self.lock().players.values().cloned().collect();
        Ok(sorted_by_id(all, |p: &Player| p.id))
    }

    async fn find_by_tournament_id(
        &self,
        tournament_id: TournamentId,
    ) -> RegistryResult<Vec<Player>> {
        let matching: Vec<Player> = self
            .lock()
            .players
            .values()
            .filter(|p| p.tournament_id == tournament_id)
            .cloned()
            .collect();
        Ok(sorted_by_id(matching, |p: &Player| p.id))
    }

    async fn count_by_tournament_id(&self, tournament_id: TournamentId) -> RegistryResult<i64> {
        Ok(self.lock().player_count(tournament_id) as i64)
    }

    async fn exists_by_nick_name_and_tournament_id(
        &self,
        nick_name: &str,
        tournament_id: TournamentId,
    ) -> RegistryResult<bool> {
        Ok(self.lock().nick_name_taken(nick_name, tournament_id, None))
    }

    async fn delete(&self, id: PlayerId) -> RegistryResult<()> {
        match self.lock().players.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RegistryError::PlayerNotFound(id)),
        }
    }
}
