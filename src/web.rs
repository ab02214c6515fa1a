//! Browser facade
//!
//! Exposes a `Session` to a JavaScript DOM renderer. The page owns the
//! per-cell listeners and the `setInterval` driving `tick`; every call that
//! changes state returns the produced events as a JSON array.

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{GameEvent, Session};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Maze Memory (web) starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    /// New game. Without a seed one is drawn from the browser's entropy;
    /// `settings_json` may override any subset of the settings.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>, settings_json: Option<String>) -> Result<WebGame, JsError> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json)?,
            None => Settings::default(),
        };
        let seed = seed.unwrap_or_else(rand::random);
        Ok(Self {
            session: Session::new(settings, seed)?,
        })
    }

    /// Interval the page should call `tick` at
    pub fn tick_ms(&self) -> u32 {
        u32::try_from(self.session.settings().tick_ms).unwrap_or(u32::MAX)
    }

    pub fn start(&mut self) -> Result<String, JsError> {
        let events = self.session.start()?;
        events_json(&events)
    }

    pub fn tick(&mut self) -> Result<String, JsError> {
        events_json(&self.session.tick())
    }

    pub fn cancel(&mut self) -> Result<String, JsError> {
        events_json(&self.session.cancel())
    }

    pub fn press(&mut self) {
        self.session.press();
    }

    pub fn release(&mut self) {
        self.session.release();
    }

    /// Pointer entered a cell; negative coordinates are ignored
    pub fn move_to(&mut self, row: i32, col: i32) -> Result<String, JsError> {
        let events = match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) => self.session.move_to(row, col),
            _ => Vec::new(),
        };
        events_json(&events)
    }

    pub fn reset(&mut self) -> Result<String, JsError> {
        let events = self.session.reset()?;
        events_json(&events)
    }

    /// `BoardSnapshot` as JSON
    pub fn board_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.session.board())?)
    }

    /// `SessionState` as JSON
    pub fn state_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.session.state())?)
    }
}

fn events_json(events: &[GameEvent]) -> Result<String, JsError> {
    Ok(serde_json::to_string(events)?)
}
