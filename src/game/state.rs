use std::collections::{HashSet, VecDeque};

use anyhow::{anyhow, ensure, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Company;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Loading,
    Ready,
    Advancing,
    GameOver,
}

impl Default for GamePhase {
    fn default() -> Self {
        GamePhase::Loading
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GuessDirection {
    Higher,
    Lower,
}

/// One play-through of the comparison game. Owned by a single controller;
/// every transition happens under its lock, so no partial state is ever
/// visible to the webview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: Uuid,
    pub phase: GamePhase,
    pub left: Option<Company>,
    pub right: Option<Company>,
    /// Candidates queued to become the next right card. Not serialized:
    /// the webview must not see upcoming answers.
    #[serde(skip)]
    pub prefetch: VecDeque<Company>,
    /// Every identifier shown this session, kept to avoid repeats for as
    /// long as the pool allows.
    #[serde(skip)]
    pub used_ids: HashSet<String>,
    pub score: u32,
    pub game_over: bool,
    pub last_guess: Option<GuessDirection>,
    pub demo_mode: bool,
    /// Bumped on every (re)initialize. An in-flight advance compares its
    /// captured epoch before committing, so a reset supersedes it without
    /// any abort machinery.
    #[serde(skip)]
    pub epoch: u64,
}

impl GameSession {
    pub fn new(demo_mode: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: GamePhase::Loading,
            left: None,
            right: None,
            prefetch: VecDeque::new(),
            used_ids: HashSet::new(),
            score: 0,
            game_over: false,
            last_guess: None,
            demo_mode,
            epoch: 0,
        }
    }

    /// Seeds a fresh round. Needs at least two candidates; the first two go
    /// on screen, the rest wait in the prefetch buffer.
    pub fn initialize(&mut self, candidates: Vec<Company>, demo_mode: bool) -> Result<()> {
        ensure!(
            candidates.len() >= 2,
            "need at least two companies to start a round, got {}",
            candidates.len()
        );

        self.used_ids = candidates.iter().map(|c| c.id.clone()).collect();
        let mut queue: VecDeque<Company> = candidates.into();
        self.id = Uuid::new_v4();
        self.left = queue.pop_front();
        self.right = queue.pop_front();
        self.prefetch = queue;
        self.score = 0;
        self.game_over = false;
        self.last_guess = None;
        self.demo_mode = demo_mode;
        self.phase = GamePhase::Ready;
        self.epoch = self.epoch.wrapping_add(1);
        Ok(())
    }

    /// Judges a guess against the rounded display figures. Equality counts
    /// as correct in either direction: two companies that render the same
    /// number are a free pass, not a trap.
    pub fn evaluate(&self, direction: GuessDirection) -> Result<bool> {
        let (left, right) = match (&self.left, &self.right) {
            (Some(left), Some(right)) => (left, right),
            _ => return Err(anyhow!("no active pair to compare")),
        };

        let left_value = left.rounded_valuation();
        let right_value = right.rounded_valuation();
        Ok(match direction {
            GuessDirection::Higher => right_value >= left_value,
            GuessDirection::Lower => right_value <= left_value,
        })
    }

    /// Applies a guess: a correct one banks the point and parks the session
    /// in `Advancing` until the controller commits the shift; a wrong one
    /// ends the game, keeping the final pair and guess for display.
    pub fn apply_guess(&mut self, direction: GuessDirection) -> Result<bool> {
        ensure!(self.phase == GamePhase::Ready, "no round awaiting a guess");

        let correct = self.evaluate(direction)?;
        self.last_guess = Some(direction);
        if correct {
            self.score += 1;
            self.phase = GamePhase::Advancing;
        } else {
            self.game_over = true;
            self.phase = GamePhase::GameOver;
        }
        Ok(correct)
    }

    /// Commits the shift after the pacing delay: left ← right, right ← next
    /// queued candidate, the replacement joins the back of the queue. With
    /// nothing queued and no replacement, the outgoing left is recycled
    /// rather than the round failing.
    pub fn advance(&mut self, replacement: Option<Company>) -> Result<()> {
        ensure!(self.phase == GamePhase::Advancing, "no advance pending");

        let right = self
            .right
            .take()
            .ok_or_else(|| anyhow!("advancing without an active pair"))?;

        if let Some(company) = replacement {
            self.used_ids.insert(company.id.clone());
            self.prefetch.push_back(company);
        }

        let next = match self.prefetch.pop_front() {
            Some(company) => company,
            None => self
                .left
                .take()
                .ok_or_else(|| anyhow!("no candidate available to advance"))?,
        };

        self.left = Some(right);
        self.right = Some(next);
        self.phase = GamePhase::Ready;
        Ok(())
    }

    /// Identifiers currently on screen or queued; fresh fetches must avoid
    /// these so the active pair always stays distinct.
    pub fn in_play_ids(&self) -> HashSet<String> {
        self.left
            .iter()
            .chain(self.right.iter())
            .chain(self.prefetch.iter())
            .map(|company| company.id.clone())
            .collect()
    }
}
