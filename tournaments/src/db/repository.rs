//! Repository trait definitions for testability and dependency injection.
//!
//! The registries only ever talk to storage through [`TournamentRepository`]
//! and [`PlayerRepository`]. PostgreSQL implementations live here; an
//! in-memory implementation lives in [`super::memory`].

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::timeouts::{TimeoutError, with_default_timeout, with_transaction_timeout};
use crate::errors::{RegistryError, RegistryResult};
use crate::player::{NewPlayer, Player, PlayerId};
use crate::tournament::{NewTournament, Tournament, TournamentId, TournamentStatus};

/// Trait for tournament storage operations
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Store a new tournament and assign its identity
    ///
    /// # Errors
    ///
    /// * `RegistryError::DuplicateName` - Name taken concurrently
    async fn insert(
        &self,
        tournament: &NewTournament,
        status: TournamentStatus,
    ) -> RegistryResult<Tournament>;

    /// Replace an existing tournament record
    async fn save(&self, tournament: &Tournament) -> RegistryResult<Tournament>;

    /// Find tournament by ID
    async fn find_by_id(&self, id: TournamentId) -> RegistryResult<Option<Tournament>>;

    /// List every tournament
    async fn find_all(&self) -> RegistryResult<Vec<Tournament>>;

    /// Find tournament by exact name
    async fn find_by_name(&self, name: &str) -> RegistryResult<Option<Tournament>>;

    /// Delete a tournament together with its players
    async fn delete(&self, id: TournamentId) -> RegistryResult<()>;
}

/// Trait for player storage operations
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Atomically store a new player if its tournament, as it stands at
    /// insert time, still admits them and the nickname is still free.
    ///
    /// # Errors
    ///
    /// * `RegistryError::TournamentNotFound` - Tournament vanished
    /// * `RegistryError::CapacityReached` - Tournament filled up
    /// * `RegistryError::TournamentNotOpen` - Tournament started or finished
    /// * `RegistryError::MissingStartDate` - Start date was cleared
    /// * `RegistryError::RegistrationAfterStart` - Start date moved before the registration
    /// * `RegistryError::DuplicateNickname` - Nickname taken concurrently
    async fn insert_within_capacity(&self, player: &NewPlayer) -> RegistryResult<Player>;

    /// Replace an existing player record
    async fn save(&self, player: &Player) -> RegistryResult<Player>;

    /// Find player by ID
    async fn find_by_id(&self, id: PlayerId) -> RegistryResult<Option<Player>>;

    /// List every player across all tournaments
    async fn find_all(&self) -> RegistryResult<Vec<Player>>;

    /// List the players registered in a tournament
    async fn find_by_tournament_id(&self, tournament_id: TournamentId)
    -> RegistryResult<Vec<Player>>;

    /// Count the players registered in a tournament
    async fn count_by_tournament_id(&self, tournament_id: TournamentId) -> RegistryResult<i64>;

    /// Whether a nickname is taken in a tournament
    async fn exists_by_nick_name_and_tournament_id(
        &self,
        nick_name: &str,
        tournament_id: TournamentId,
    ) -> RegistryResult<bool>;

    /// Delete a player
    async fn delete(&self, id: PlayerId) -> RegistryResult<()>;
}

fn tournament_from_row(row: &PgRow) -> RegistryResult<Tournament> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<TournamentStatus>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(Tournament {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        game_title: row.try_get("game_title")?,
        max_players: row.try_get("max_players")?,
        start_date: row.try_get("start_date")?,
        status,
    })
}

fn player_from_row(row: &PgRow) -> RegistryResult<Player> {
    Ok(Player {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        nick_name: row.try_get("nick_name")?,
        tournament_id: row.try_get("tournament_id")?,
        registration_date: row.try_get("registration_date")?,
    })
}

/// Translate a unique-constraint rejection into the same error the
/// nickname pre-check produces
fn nickname_conflict(err: sqlx::Error, nick_name: &str) -> RegistryError {
    if matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation()) {
        RegistryError::DuplicateNickname(nick_name.to_string())
    } else {
        RegistryError::Database(err)
    }
}

/// PostgreSQL implementation of `TournamentRepository`
pub struct PgTournamentRepository {
    pool: PgPool,
}

impl PgTournamentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert unless the name is taken, serialising creators of the same name
    async fn insert_unique(
        &self,
        tournament: &NewTournament,
        status: TournamentStatus,
    ) -> RegistryResult<Tournament> {
        let mut tx = self.pool.begin().await?;

        // Released at commit or rollback
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&tournament.name)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            r#"
            INSERT INTO tournaments (name, game_title, max_players, start_date, status)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (SELECT 1 FROM tournaments WHERE name = $1)
            RETURNING id, name, game_title, max_players, start_date, status
            "#,
        )
        .bind(&tournament.name)
        .bind(&tournament.game_title)
        .bind(tournament.max_players)
        .bind(tournament.start_date)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RegistryError::DuplicateName(tournament.name.clone()))?;

        let stored = tournament_from_row(&row)?;
        tx.commit().await?;

        Ok(stored)
    }
}

#[async_trait]
impl TournamentRepository for PgTournamentRepository {
    async fn insert(
        &self,
        tournament: &NewTournament,
        status: TournamentStatus,
    ) -> RegistryResult<Tournament> {
        with_transaction_timeout(self.insert_unique(tournament, status)).await
    }

    async fn save(&self, tournament: &Tournament) -> RegistryResult<Tournament> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                UPDATE tournaments
                SET name = $1, game_title = $2, max_players = $3, start_date = $4, status = $5
                WHERE id = $6
                RETURNING id, name, game_title, max_players, start_date, status
                "#,
            )
            .bind(&tournament.name)
            .bind(&tournament.game_title)
            .bind(tournament.max_players)
            .bind(tournament.start_date)
            .bind(tournament.status.as_str())
            .bind(tournament.id)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(RegistryError::TournamentNotFound(tournament.id))?;

        tournament_from_row(&row)
    }

    async fn find_by_id(&self, id: TournamentId) -> RegistryResult<Option<Tournament>> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT id, name, game_title, max_players, start_date, status
                 FROM tournaments WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(tournament_from_row).transpose()
    }

    async fn find_all(&self) -> RegistryResult<Vec<Tournament>> {
        let rows = with_default_timeout(
            sqlx::query(
                "SELECT id, name, game_title, max_players, start_date, status
                 FROM tournaments ORDER BY id",
            )
            .fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(tournament_from_row).collect()
    }

    async fn find_by_name(&self, name: &str) -> RegistryResult<Option<Tournament>> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT id, name, game_title, max_players, start_date, status
                 FROM tournaments WHERE name = $1 LIMIT 1",
            )
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(tournament_from_row).transpose()
    }

    async fn delete(&self, id: TournamentId) -> RegistryResult<()> {
        // players go with it through ON DELETE CASCADE
        let result = with_default_timeout(
            sqlx::query("DELETE FROM tournaments WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::TournamentNotFound(id));
        }
        Ok(())
    }
}

/// PostgreSQL implementation of `PlayerRepository`
pub struct PgPlayerRepository {
    pool: PgPool,
}

impl PgPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check admission and insert under a row lock on the tournament
    async fn insert_locked(&self, player: &NewPlayer) -> RegistryResult<Player> {
        let mut tx = self.pool.begin().await?;

        // Concurrent registrations and tournament updates queue up behind this lock
        let row = sqlx::query(
            "SELECT id, name, game_title, max_players, start_date, status
             FROM tournaments WHERE id = $1 FOR UPDATE",
        )
        .bind(player.tournament_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RegistryError::TournamentNotFound(player.tournament_id))?;
        let tournament = tournament_from_row(&row)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players WHERE tournament_id = $1")
            .bind(player.tournament_id)
            .fetch_one(&mut *tx)
            .await?;

        tournament.check_admission(count, player.registration_date)?;

        let row = sqlx::query(
            r#"
            INSERT INTO players (name, nick_name, tournament_id, registration_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, nick_name, tournament_id, registration_date
            "#,
        )
        .bind(&player.name)
        .bind(&player.nick_name)
        .bind(player.tournament_id)
        .bind(player.registration_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| nickname_conflict(e, &player.nick_name))?;

        let stored = player_from_row(&row)?;
        tx.commit().await?;

        Ok(stored)
    }
}

#[async_trait]
impl PlayerRepository for PgPlayerRepository {
    async fn insert_within_capacity(&self, player: &NewPlayer) -> RegistryResult<Player> {
        with_transaction_timeout(self.insert_locked(player)).await
    }

    async fn save(&self, player: &Player) -> RegistryResult<Player> {
        let row = with_default_timeout(
            sqlx::query(
                r#"
                UPDATE players
                SET name = $1, nick_name = $2, registration_date = $3
                WHERE id = $4
                RETURNING id, name, nick_name, tournament_id, registration_date
                "#,
            )
            .bind(&player.name)
            .bind(&player.nick_name)
            .bind(player.registration_date)
            .bind(player.id)
            .fetch_optional(&self.pool),
        )
        .await
        .map_err(|e| match e {
            TimeoutError::Database(e) => nickname_conflict(e, &player.nick_name),
            other => other.into(),
        })?
        .ok_or(RegistryError::PlayerNotFound(player.id))?;

        player_from_row(&row)
    }

    async fn find_by_id(&self, id: PlayerId) -> RegistryResult<Option<Player>> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT id, name, nick_name, tournament_id, registration_date
                 FROM players WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(player_from_row).transpose()
    }

    async fn find_all(&self) -> RegistryResult<Vec<Player>> {
        let rows = with_default_timeout(
            sqlx::query(
                "SELECT id, name, nick_name, tournament_id, registration_date
                 FROM players ORDER BY id",
            )
            .fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(player_from_row).collect()
    }

    async fn find_by_tournament_id(
        &self,
        tournament_id: TournamentId,
    ) -> RegistryResult<Vec<Player>> {
        let rows = with_default_timeout(
            sqlx::query(
                "SELECT id, name, nick_name, tournament_id, registration_date
                 FROM players WHERE tournament_id = $1 ORDER BY id",
            )
            .bind(tournament_id)
            .fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(player_from_row).collect()
    }

    async fn count_by_tournament_id(&self, tournament_id: TournamentId) -> RegistryResult<i64> {
        let count: i64 = with_default_timeout(
            sqlx::query_scalar("SELECT COUNT(*) FROM players WHERE tournament_id = $1")
                .bind(tournament_id)
                .fetch_one(&self.pool),
        )
        .await?;

        Ok(count)
    }

    async fn exists_by_nick_name_and_tournament_id(
        &self,
        nick_name: &str,
        tournament_id: TournamentId,
    ) -> RegistryResult<bool> {
        let exists: bool = with_default_timeout(
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM players WHERE nick_name = $1 AND tournament_id = $2)",
            )
            .bind(nick_name)
            .bind(tournament_id)
            .fetch_one(&self.pool),
        )
        .await?;

        Ok(exists)
    }

    async fn delete(&self, id: PlayerId) -> RegistryResult<()> {
        let result = with_default_timeout(
            sqlx::query("DELETE FROM players WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::PlayerNotFound(id));
        }
        Ok(())
    }
}
