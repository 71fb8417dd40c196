use std::{collections::HashSet, sync::Arc, time::Duration};

use anyhow::Result;
use log::{error, info, warn};
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tokio::sync::Mutex;

use crate::{
    data::CompanyStore,
    game::state::{GameSession, GuessDirection},
};

/// Pause between a correct guess and the visible shift to the next round.
/// Animation pacing only, not a correctness mechanism.
const ADVANCE_DELAY: Duration = Duration::from_millis(700);

/// Two active cards plus a two-deep prefetch buffer.
const INITIAL_DRAW: usize = 4;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub session: GameSession,
    pub left_display: Option<String>,
    pub right_display: Option<String>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct GuessEvaluatedEvent {
    correct: bool,
    direction: GuessDirection,
    score: u32,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct GameOverEvent {
    score: u32,
    direction: GuessDirection,
}

#[derive(Clone)]
pub struct GameController {
    session: Arc<Mutex<GameSession>>,
    store: Arc<CompanyStore>,
    app_handle: AppHandle,
    advance_delay: Duration,
}

impl GameController {
    pub fn new(app_handle: AppHandle, store: Arc<CompanyStore>) -> Self {
        Self {
            session: Arc::new(Mutex::new(GameSession::new(store.is_demo()))),
            store,
            app_handle,
            advance_delay: ADVANCE_DELAY,
        }
    }

    pub async fn get_snapshot(&self) -> GameSnapshot {
        snapshot_of(&*self.session.lock().await)
    }

    /// Loads the candidate pool and deals a fresh round.
    pub async fn start_game(&self) -> Result<GameSnapshot> {
        let candidates = self.store.draw_initial(INITIAL_DRAW).await;
        let demo = self.store.is_demo();

        let snapshot = {
            let mut session = self.session.lock().await;
            session.initialize(candidates, demo)?;
            info!("Game {} started (demo mode: {demo})", session.id);
            snapshot_of(&session)
        };

        self.emit_state(&snapshot);
        Ok(snapshot)
    }

    /// Same path as the first deal; the bumped epoch makes any in-flight
    /// advance from the previous round discard itself on arrival.
    pub async fn reset_game(&self) -> Result<GameSnapshot> {
        self.start_game().await
    }

    pub async fn guess(&self, direction: GuessDirection) -> Result<GameSnapshot> {
        let (correct, epoch, used, displayed, snapshot) = {
            let mut session = self.session.lock().await;
            let correct = session.apply_guess(direction)?;
            (
                correct,
                session.epoch,
                session.used_ids.clone(),
                session.in_play_ids(),
                snapshot_of(&session),
            )
        };

        let score = snapshot.session.score;
        self.emit_event(
            "guess-evaluated",
            GuessEvaluatedEvent {
                correct,
                direction,
                score,
            },
        );
        self.emit_state(&snapshot);

        if correct {
            self.spawn_advance(epoch, used, displayed);
        } else {
            info!("Game over at score {score}");
            self.emit_event("game-over", GameOverEvent { score, direction });
        }

        Ok(snapshot)
    }

    /// Waits out the pacing delay and the replacement fetch together, then
    /// commits the shift. Joining both means the webview never sees a
    /// half-advanced pair.
    fn spawn_advance(&self, epoch: u64, used: HashSet<String>, displayed: HashSet<String>) {
        let controller = self.clone();
        tokio::spawn(async move {
            let (_, replacement) = tokio::join!(
                tokio::time::sleep(controller.advance_delay),
                controller.store.random_company(&used, &displayed)
            );
            if replacement.is_none() {
                warn!("No replacement candidate available; recycling the outgoing card");
            }

            let snapshot = {
                let mut session = controller.session.lock().await;
                if session.epoch != epoch {
                    // A reset superseded this round; drop the stale result.
                    return;
                }
                match session.advance(replacement) {
                    Ok(()) => snapshot_of(&session),
                    Err(err) => {
                        error!("Failed to advance round: {err:#}");
                        return;
                    }
                }
            };

            controller.emit_state(&snapshot);
        });
    }

    fn emit_state(&self, snapshot: &GameSnapshot) {
        self.emit_event("game-state-changed", snapshot.clone());
    }

    fn emit_event<P: Serialize + Clone>(&self, event: &str, payload: P) {
        if let Err(err) = self.app_handle.emit(event, payload) {
            error!("Failed to emit {event}: {err}");
        }
    }
}

fn snapshot_of(session: &GameSession) -> GameSnapshot {
    GameSnapshot {
        left_display: session.left.as_ref().map(|c| c.display_valuation()),
        right_display: session.right.as_ref().map(|c| c.display_valuation()),
        session: session.clone(),
    }
}
