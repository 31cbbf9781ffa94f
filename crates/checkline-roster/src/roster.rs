//! The player roster: records, the active-player pointer, persistence.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::RosterError;

/// One registered player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: String,
    /// Stored as provided. The roster trusts its local store; hardening
    /// credentials is out of scope for a desktop client.
    pub credential: String,
    pub wins: u32,
}

/// On-disk shape of the roster file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredRoster {
    players: HashMap<String, PlayerRecord>,
    active: Option<String>,
}

/// All known players plus the currently signed-in one.
///
/// Mutating operations rewrite the backing file (when there is one)
/// before returning. A failed rewrite is logged and otherwise ignored:
/// losing a win count must never abort a game.
#[derive(Debug, Default)]
pub struct Roster {
    players: HashMap<String, PlayerRecord>,
    active: Option<String>,
    store: Option<PathBuf>,
}

impl Roster {
    /// A roster with no backing file. State lives for the process only.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the roster from `path`, creating an empty one if the file
    /// does not exist yet.
    ///
    /// A stored active pointer naming a player with no record is
    /// cleared rather than trusted, so a half-written store cannot sign
    /// in a phantom player.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RosterError> {
        let path = path.into();
        let stored = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<StoredRoster>(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredRoster::default(),
            Err(e) => return Err(e.into()),
        };
        let mut roster = Self {
            players: stored.players,
            active: stored.active,
            store: Some(path),
        };
        if let Some(name) = &roster.active {
            if !roster.players.contains_key(name) {
                tracing::warn!(player = %name, "clearing dangling active pointer");
                roster.active = None;
                roster.persist();
            }
        }
        Ok(roster)
    }

    /// Registers a new player and signs them in.
    pub fn register(&mut self, name: &str, credential: &str) -> Result<&PlayerRecord, RosterError> {
        if name.trim().is_empty() || credential.is_empty() {
            return Err(RosterError::MissingField);
        }
        if self.players.contains_key(name) {
            return Err(RosterError::NameTaken(name.to_owned()));
        }
        self.players.insert(
            name.to_owned(),
            PlayerRecord {
                name: name.to_owned(),
                credential: credential.to_owned(),
                wins: 0,
            },
        );
        self.active = Some(name.to_owned());
        self.persist();
        tracing::info!(player = %name, "registered");
        Ok(&self.players[name])
    }

    /// Signs in an existing player.
    pub fn login(&mut self, name: &str, credential: &str) -> Result<&PlayerRecord, RosterError> {
        if name.trim().is_empty() || credential.is_empty() {
            return Err(RosterError::MissingField);
        }
        let record = self
            .players
            .get(name)
            .ok_or_else(|| RosterError::UnknownPlayer(name.to_owned()))?;
        if record.credential != credential {
            return Err(RosterError::WrongCredential(name.to_owned()));
        }
        self.active = Some(name.to_owned());
        self.persist();
        tracing::info!(player = %name, "signed in");
        Ok(&self.players[name])
    }

    /// Signs the active player out. Their record and wins remain.
    pub fn logout(&mut self) {
        if let Some(name) = self.active.take() {
            tracing::info!(player = %name, "signed out");
            self.persist();
        }
    }

    /// The currently signed-in player, if any.
    pub fn active(&self) -> Option<&PlayerRecord> {
        self.active.as_deref().and_then(|n| self.players.get(n))
    }

    /// Credits the active player with a win and returns their new
    /// total. A no-op returning `None` when nobody is signed in.
    pub fn record_win(&mut self) -> Option<u32> {
        let name = self.active.clone()?;
        let record = self.players.get_mut(&name)?;
        record.wins += 1;
        let wins = record.wins;
        tracing::info!(player = %name, wins, "win recorded");
        self.persist();
        Some(wins)
    }

    /// Every record, sorted by wins descending then name ascending.
    pub fn leaderboard(&self) -> Vec<&PlayerRecord> {
        let mut records: Vec<&PlayerRecord> = self.players.values().collect();
        records.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.name.cmp(&b.name)));
        records
    }

    fn persist(&self) {
        let Some(path) = &self.store else { return };
        let stored = StoredRoster {
            players: self.players.clone(),
            active: self.active.clone(),
        };
        let result = serde_json::to_string_pretty(&stored)
            .map_err(std::io::Error::other)
            .and_then(|text| std::fs::write(path, text));
        if let Err(e) = result {
            tracing::warn!(error = %e, path = %path.display(), "failed to persist roster");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_signs_player_in() {
        let mut roster = Roster::in_memory();
        roster.register("ada", "pw").unwrap();
        assert_eq!(roster.active().unwrap().name, "ada");
        assert_eq!(roster.active().unwrap().wins, 0);
    }

    #[test]
    fn test_register_duplicate_name_rejected() {
        let mut roster = Roster::in_memory();
        roster.register("ada", "pw").unwrap();
        roster.record_win();
        let err = roster.register("ada", "other").unwrap_err();
        assert!(matches!(err, RosterError::NameTaken(_)));
        // Existing record untouched by the failed attempt.
        assert_eq!(roster.active().unwrap().wins, 1);
        assert_eq!(roster.active().unwrap().credential, "pw");
    }

    #[test]
    fn test_register_empty_fields_rejected() {
        let mut roster = Roster::in_memory();
        assert!(matches!(
            roster.register("", "pw"),
            Err(RosterError::MissingField)
        ));
        assert!(matches!(
            roster.register("ada", ""),
            Err(RosterError::MissingField)
        ));
        assert!(roster.active().is_none());
    }

    #[test]
    fn test_login_wrong_credential_rejected() {
        let mut roster = Roster::in_memory();
        roster.register("ada", "pw").unwrap();
        roster.logout();
        assert!(matches!(
            roster.login("ada", "nope"),
            Err(RosterError::WrongCredential(_))
        ));
        assert!(roster.active().is_none());
        roster.login("ada", "pw").unwrap();
        assert_eq!(roster.active().unwrap().name, "ada");
    }

    #[test]
    fn test_login_unknown_player_rejected() {
        let mut roster = Roster::in_memory();
        assert!(matches!(
            roster.login("ghost", "pw"),
            Err(RosterError::UnknownPlayer(_))
        ));
    }

    #[test]
    fn test_logout_keeps_record() {
        let mut roster = Roster::in_memory();
        roster.register("ada", "pw").unwrap();
        roster.record_win();
        roster.logout();
        assert!(roster.active().is_none());
        roster.login("ada", "pw").unwrap();
        assert_eq!(roster.active().unwrap().wins, 1);
    }

    #[test]
    fn test_record_win_anonymous_is_noop() {
        let mut roster = Roster::in_memory();
        assert_eq!(roster.record_win(), None);
    }

    #[test]
    fn test_record_win_increments() {
        let mut roster = Roster::in_memory();
        roster.register("ada", "pw").unwrap();
        assert_eq!(roster.record_win(), Some(1));
        assert_eq!(roster.record_win(), Some(2));
    }

    #[test]
    fn test_leaderboard_sorted_by_wins_then_name() {
        let mut roster = Roster::in_memory();
        roster.register("ada", "pw").unwrap();
        roster.record_win();
        roster.record_win();
        roster.register("zoe", "pw").unwrap();
        roster.register("bob", "pw").unwrap();
        let names: Vec<&str> = roster.leaderboard().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["ada", "bob", "zoe"]);
    }

    #[test]
    fn test_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("checkline-roster-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roster.json");

        let mut roster = Roster::load(&path).unwrap();
        roster.register("ada", "pw").unwrap();
        roster.record_win();

        let reloaded = Roster::load(&path).unwrap();
        assert_eq!(reloaded.active().unwrap().name, "ada");
        assert_eq!(reloaded.active().unwrap().wins, 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_clears_dangling_active_pointer() {
        let dir = std::env::temp_dir().join(format!("checkline-dangling-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roster.json");
        std::fs::write(&path, r#"{"players":{},"active":"ghost"}"#).unwrap();

        let roster = Roster::load(&path).unwrap();
        assert!(roster.active().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
