//! Per-difficulty top-N leaderboard with one entry per normalized name

use crate::names::{escape_html, normalize_name, stored_identity, trim_name};
use crate::store::{Clock, ScoreStore};
use crate::Params;
use proto::{Difficulty, ScoreEntry};

/// Why a save was accepted or rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// New name for this difficulty
    Registered,
    /// Beat the player's previous score
    Updated,
    /// Did not beat the stored score
    NotBeaten,
    /// Trimmed name outside 1..=16 characters
    InvalidLength,
    /// Name normalizes to nothing
    InvalidName,
    /// Storage could not be read or written
    Failed,
}

impl SaveStatus {
    pub fn updated(&self) -> bool {
        matches!(self, SaveStatus::Registered | SaveStatus::Updated)
    }

    /// Player-facing message
    pub fn message(&self) -> &'static str {
        match self {
            SaveStatus::Registered => "ランキングに登録しました！",
            SaveStatus::Updated => "ハイスコアを更新しました！",
            SaveStatus::NotBeaten => "既存のスコアを超えられませんでした。",
            SaveStatus::InvalidLength => "名前は1～16文字で入力してください。",
            SaveStatus::InvalidName => "無効な名前です。",
            SaveStatus::Failed => "スコアの保存に失敗しました。",
        }
    }
}

/// Result of [`Leaderboard::save_score`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub status: SaveStatus,
    pub updated: bool,
    pub message: &'static str,
}

impl From<SaveStatus> for SaveOutcome {
    fn from(status: SaveStatus) -> Self {
        Self {
            status,
            updated: status.updated(),
            message: status.message(),
        }
    }
}

pub struct Leaderboard<S, C> {
    store: S,
    clock: C,
}

impl<S: ScoreStore, C: Clock> Leaderboard<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Top entries for one difficulty, best first. Ties keep stored order.
    /// Unreadable storage yields an empty board.
    pub fn scores(&self, difficulty: Difficulty) -> Vec<ScoreEntry> {
        let entries = match self.store.load() {
            Ok(entries) => entries,
            Err(err) => {
                log::error!("Leaderboard: failed to load scores: {err}");
                return Vec::new();
            }
        };

        let mut board: Vec<ScoreEntry> = entries
            .into_iter()
            .filter(|e| e.mode == difficulty)
            .collect();
        board.sort_by(|a, b| b.score.cmp(&a.score));
        board.truncate(Params::LEADERBOARD_SIZE);
        board
    }

    /// Register or improve a player's score. Never fails the caller.
    pub fn save_score(&mut self, name: &str, score: u32, difficulty: Difficulty) -> SaveOutcome {
        // U+FEFF is not whitespace: a BOM-only name passes the length check
        // and is refused below
        let trimmed = name.trim();
        let len = trimmed.chars().count();
        if !(Params::NAME_MIN_CHARS..=Params::NAME_MAX_CHARS).contains(&len) {
            return SaveStatus::InvalidLength.into();
        }

        let key = normalize_name(trimmed);
        if key.is_empty() {
            return SaveStatus::InvalidName.into();
        }

        let mut entries = match self.store.load() {
            Ok(entries) => entries,
            Err(err) => {
                log::error!("Leaderboard: failed to load scores before save: {err}");
                return SaveStatus::Failed.into();
            }
        };

        let existing = entries
            .iter()
            .position(|e| e.mode == difficulty && stored_identity(&e.name) == key);

        let entry = ScoreEntry::new(
            escape_html(trim_name(trimmed)),
            score,
            difficulty,
            self.clock.now_ms(),
        );
        let status = match existing {
            Some(idx) if score > entries[idx].score => {
                log::info!(
                    "Leaderboard: {} improved {} -> {} on {}",
                    entry.name,
                    entries[idx].score,
                    score,
                    difficulty
                );
                entries[idx] = entry;
                SaveStatus::Updated
            }
            Some(idx) => {
                log::info!(
                    "Leaderboard: {} kept {} (submitted {}) on {}",
                    entries[idx].name,
                    entries[idx].score,
                    score,
                    difficulty
                );
                return SaveStatus::NotBeaten.into();
            }
            None => {
                log::info!("Leaderboard: registered {} with {} on {}", entry.name, score, difficulty);
                entries.push(entry);
                SaveStatus::Registered
            }
        };

        match self.store.save(&entries) {
            Ok(()) => status.into(),
            Err(err) => {
                log::error!("Leaderboard: failed to save scores: {err}");
                SaveStatus::Failed.into()
            }
        }
    }
}
