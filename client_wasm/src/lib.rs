//! Browser bindings for Sasagane
//!
//! The page owns screens and drawing. This crate owns the round: it wires
//! `game_core` to browser timers, `localStorage` and the flavor-text endpoint,
//! and exposes plain functions for the page to call.

#![cfg(target_arch = "wasm32")]

mod haiku;
mod hud;
mod input;
mod logger;
mod scheduler;
mod storage;

use game_core::dialogue::pick_story;
use game_core::scheduler::{Task, TaskId};
use game_core::*;
use hud::{Hud, ResultView, SaveResult};
use input::PourInput;
use scheduler::{BrowserScheduler, Dispatch};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use storage::{BrowserClock, LocalStorage};
use wasm_bindgen::prelude::*;

/// Settings supplied by the page at start-up
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub storage_key: String,
    pub seed: u64,
}

impl ClientConfig {
    fn from_js(api_key: Option<String>, storage_key: Option<String>, seed: Option<f64>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            storage_key: storage_key.unwrap_or_else(|| Params::LEADERBOARD_KEY.to_string()),
            seed: seed.map(|s| s as u64).unwrap_or_else(|| js_sys::Date::now() as u64),
        }
    }
}

/// One round and the timers driving it
struct Session {
    round: Round,
    scheduler: BrowserScheduler,
    on_complete: Option<js_sys::Function>,
}

impl Session {
    fn handle(&mut self, id: TaskId, task: Task, now_ms: f64) -> Option<RoundReport> {
        self.scheduler.fired(id);
        self.round.on_task(task, now_ms, &mut self.scheduler)
    }

    fn summary(&self) -> Option<ResultSummary> {
        self.round
            .report()
            .map(|report| ResultSummary::new(self.round.config().difficulty, report))
    }
}

/// Routes fired tasks into the session. The completion callback runs after
/// the session borrow is released so the page may call back in.
fn dispatcher(session: Weak<RefCell<Session>>) -> Dispatch {
    Rc::new(move |id: TaskId, task: Task, now_ms: f64| {
        let Some(cell) = session.upgrade() else {
            return;
        };
        let completed = match cell.try_borrow_mut() {
            Ok(mut s) => s
                .handle(id, task, now_ms)
                .map(|report| (report, s.on_complete.clone())),
            Err(_) => {
                log::warn!("Client: dropped {task:?}, session busy");
                None
            }
        };

        if let Some((report, Some(callback))) = completed {
            let base = JsValue::from(report.base_score);
            let bonus = JsValue::from(report.time_bonus);
            if let Err(err) = callback.call2(&JsValue::NULL, &base, &bonus) {
                log::error!("Client: round-complete callback threw: {err:?}");
            }
        }
    })
}

/// Main client state
pub struct Client {
    config: ClientConfig,
    leaderboard: Leaderboard<KvScoreStore<LocalStorage>, BrowserClock>,
    rng: GameRng,
    session: Option<Rc<RefCell<Session>>>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        let store = KvScoreStore::new(LocalStorage::open(), config.storage_key.clone());
        log::info!(
            "Client: ready (storage key {}, flavor text {})",
            config.storage_key,
            if config.api_key.is_some() { "on" } else { "off" }
        );
        Self {
            rng: GameRng::new(config.seed),
            leaderboard: Leaderboard::new(store, BrowserClock),
            config,
            session: None,
        }
    }

    pub fn start_round(
        &mut self,
        difficulty: &str,
        on_complete: Option<js_sys::Function>,
    ) -> Result<(), JsValue> {
        let difficulty: Difficulty = difficulty
            .parse()
            .map_err(|e: proto::ParseDifficultyError| JsValue::from_str(&e.to_string()))?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;

        self.teardown();
        let config = Config::for_difficulty(difficulty);
        let session = Rc::new_cyclic(|weak| {
            let mut scheduler = BrowserScheduler::new(window, dispatcher(weak.clone()));
            let round = Round::start(config, &mut scheduler);
            RefCell::new(Session {
                round,
                scheduler,
                on_complete,
            })
        });
        self.session = Some(session);
        Ok(())
    }

    /// Cancel the current round's timers and forget it
    pub fn teardown(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let Ok(mut s) = session.try_borrow_mut() else {
            return;
        };
        let Session {
            round, scheduler, ..
        } = &mut *s;
        round.teardown(scheduler);
    }

    fn session(&self) -> Result<&Rc<RefCell<Session>>, JsValue> {
        self.session
            .as_ref()
            .ok_or_else(|| JsValue::from_str("No round in progress"))
    }

    pub fn input(&mut self, input: PourInput) -> Result<bool, JsValue> {
        let now_ms = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        let mut s = self
            .session()?
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Round busy"))?;
        let Session {
            round, scheduler, ..
        } = &mut *s;
        Ok(match input {
            PourInput::Press => round.press(now_ms, scheduler),
            PourInput::Release => round.release(scheduler),
        })
    }

    pub fn hud(&self) -> Result<Hud, JsValue> {
        let s = self
            .session()?
            .try_borrow()
            .map_err(|_| JsValue::from_str("Round busy"))?;
        Ok(Hud::snapshot(&s.round))
    }

    pub fn result(&self) -> Result<Option<ResultSummary>, JsValue> {
        let s = self
            .session()?
            .try_borrow()
            .map_err(|_| JsValue::from_str("Round busy"))?;
        Ok(s.summary())
    }

    pub fn scores(&self, difficulty: &str) -> Result<String, JsValue> {
        let difficulty: Difficulty = difficulty
            .parse()
            .map_err(|e: proto::ParseDifficultyError| JsValue::from_str(&e.to_string()))?;
        ScoreEntry::list_to_json(&self.leaderboard.scores(difficulty))
            .map_err(|e| JsValue::from_str(&format!("Failed to encode scores: {e}")))
    }

    /// Save the finished round under `name`. May be repeated, e.g. under
    /// another name; the leaderboard keeps the best score per name.
    pub fn save_score(&mut self, name: &str) -> Result<SaveResult, JsValue> {
        let summary = self
            .result()?
            .ok_or_else(|| JsValue::from_str("Round not finished"))?;
        Ok(self
            .leaderboard
            .save_score(name, summary.final_score, summary.difficulty)
            .into())
    }

    pub fn story(&mut self) -> &'static str {
        pick_story(&mut self.rng)
    }
}

// Global client storage for WASM bindings
static mut CLIENT: Option<Client> = None;

fn with_client<T>(f: impl FnOnce(&mut Client) -> Result<T, JsValue>) -> Result<T, JsValue> {
    // Single-threaded; no export holds the client across a call back into JS
    let client = unsafe { (*std::ptr::addr_of_mut!(CLIENT)).as_mut() };
    match client {
        Some(client) => f(client),
        None => Err(JsValue::from_str("Client not initialized")),
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

/// Create the client. `seed` fixes the story RNG (defaults to the clock).
#[wasm_bindgen]
pub fn init_client(
    api_key: Option<String>,
    storage_key: Option<String>,
    seed: Option<f64>,
) -> Result<(), JsValue> {
    let client = Client::new(ClientConfig::from_js(api_key, storage_key, seed));
    unsafe {
        if let Some(mut old) = (*std::ptr::addr_of_mut!(CLIENT)).replace(client) {
            old.teardown();
        }
    }
    Ok(())
}

/// Start a round on `difficulty` ("easy" | "normal" | "hard").
/// `on_complete(base_score, time_bonus)` is called once when it ends.
#[wasm_bindgen]
pub fn start_round(difficulty: &str, on_complete: Option<js_sys::Function>) -> Result<(), JsValue> {
    with_client(|client| client.start_round(difficulty, on_complete))
}

#[wasm_bindgen]
pub fn teardown() -> Result<(), JsValue> {
    with_client(|client| {
        client.teardown();
        Ok(())
    })
}

/// Pointer/touch down. Returns whether a pour started.
#[wasm_bindgen]
pub fn press() -> Result<bool, JsValue> {
    with_client(|client| client.input(PourInput::Press))
}

/// Pointer/touch up. Returns whether a pour was judged.
#[wasm_bindgen]
pub fn release() -> Result<bool, JsValue> {
    with_client(|client| client.input(PourInput::Release))
}

#[wasm_bindgen]
pub fn key_down(key: &str, repeat: bool) -> Result<bool, JsValue> {
    match input::handle_key_down(key, repeat) {
        Some(action) => with_client(|client| client.input(action)),
        None => Ok(false),
    }
}

#[wasm_bindgen]
pub fn key_up(key: &str) -> Result<bool, JsValue> {
    match input::handle_key_up(key) {
        Some(action) => with_client(|client| client.input(action)),
        None => Ok(false),
    }
}

#[wasm_bindgen]
pub fn hud() -> Result<Hud, JsValue> {
    with_client(|client| client.hud())
}

/// Result of the finished round, or undefined while it is still running
#[wasm_bindgen]
pub fn result_summary() -> Result<Option<ResultView>, JsValue> {
    with_client(|client| Ok(client.result()?.map(ResultView::from)))
}

/// Top scores for a difficulty as a JSON array of `{name, score, mode, at}`.
/// Names are HTML-escaped.
#[wasm_bindgen]
pub fn scores(difficulty: &str) -> Result<String, JsValue> {
    with_client(|client| client.scores(difficulty))
}

#[wasm_bindgen]
pub fn save_score(name: &str) -> Result<SaveResult, JsValue> {
    with_client(|client| client.save_score(name))
}

#[wasm_bindgen]
pub fn story() -> Result<String, JsValue> {
    with_client(|client| Ok(client.story().to_string()))
}

/// Resolves to a haiku about the finished round, or a fixed fallback line.
/// Never rejects once the round has a result.
#[wasm_bindgen]
pub fn request_haiku() -> Result<js_sys::Promise, JsValue> {
    let (api_key, summary) = with_client(|client| {
        let summary = client
            .result()?
            .ok_or_else(|| JsValue::from_str("Round not finished"))?;
        Ok((client.config.api_key.clone(), summary))
    })?;
    Ok(wasm_bindgen_futures::future_to_promise(async move {
        Ok(JsValue::from_str(&haiku::compose(api_key, summary).await))
    }))
}
