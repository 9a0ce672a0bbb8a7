//! Browser bindings
//!
//! Thin wasm-bindgen wrapper around `SimulationContext`. The page owns the
//! animation frame loop and calls `update_game` once per frame; state comes
//! back as JSON for rendering and the info panels.

use glam::DVec2;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{GameMode, SimulationContext};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Quantum Sandbox loaded");
}

/// A game session exposed to JavaScript
#[wasm_bindgen]
pub struct Sandbox {
    ctx: SimulationContext,
}

#[wasm_bindgen]
impl Sandbox {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Sandbox {
        let settings = Settings::load();
        let seed = match settings.seed {
            0 => js_sys::Date::now() as u64,
            seed => seed,
        };
        log::info!("Session seed {}", seed);
        Sandbox {
            ctx: SimulationContext::new(settings, seed),
        }
    }

    /// One frame tick
    #[wasm_bindgen(js_name = updateGame)]
    pub fn update_game(&mut self) {
        self.ctx.update_game();
    }

    /// `mode` is "single" or "multi"; anything else keeps the current mode
    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self, mode: &str) {
        let mode = GameMode::from_str(mode).unwrap_or(self.ctx.mode);
        self.ctx.start_game(mode);
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) -> bool {
        self.ctx.toggle_pause();
        self.ctx.paused
    }

    #[wasm_bindgen(js_name = resetGame)]
    pub fn reset_game(&mut self) {
        self.ctx.reset_game();
    }

    /// Dispatch "start" | "pause" | "reset"; returns false for unknown actions
    #[wasm_bindgen(js_name = internalTrigger)]
    pub fn internal_trigger(&mut self, action: &str, mode: &str) -> bool {
        self.ctx.internal_trigger_str(action, mode)
    }

    /// Select the body under a canvas point; returns its id or -1
    #[wasm_bindgen(js_name = selectAt)]
    pub fn select_at(&mut self, x: f64, y: f64) -> i64 {
        self.ctx
            .select_at(DVec2::new(x, y))
            .map_or(-1, |id| i64::from(id.0))
    }

    /// Full session snapshot as JSON
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.ctx.snapshot()).unwrap_or_else(|e| {
            log::error!("Snapshot serialization failed: {}", e);
            String::from("{}")
        })
    }

    /// Status messages since the last call, as a JSON array of strings
    #[wasm_bindgen(js_name = drainMessages)]
    pub fn drain_messages(&mut self) -> String {
        let messages: Vec<String> = self
            .ctx
            .drain_events()
            .iter()
            .map(|e| e.to_string())
            .collect();
        serde_json::to_string(&messages).unwrap_or_else(|_| String::from("[]"))
    }

    /// Persist the current settings to LocalStorage
    #[wasm_bindgen(js_name = saveSettings)]
    pub fn save_settings(&self) {
        self.ctx.settings.save();
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}
