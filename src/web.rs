//! Browser bindings for the JS UI layer
//!
//! The block editor hands over a JSON array of command ids
//! (`["forward","turnRight"]`); the renderer polls the pose every frame and
//! drains events to drive popups and pickups.

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::levels::LevelConfig;
use crate::progress::{LocalStorageProgress, ProgressStore};
use crate::settings::{PacingPreset, Settings};
use crate::sim::{Command, Pacer, RunHandle};

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Syntax Saga core loaded");
}

/// One open level plus its pacing clock
#[wasm_bindgen]
pub struct LevelRunner {
    handle: RunHandle,
    pacer: Pacer,
    settings: Settings,
}

#[wasm_bindgen]
impl LevelRunner {
    /// Open a built-in level by id
    #[wasm_bindgen(constructor)]
    pub fn new(level_id: &str) -> Result<LevelRunner, JsValue> {
        let config = LevelConfig::builtin(level_id).map_err(to_js)?;
        Self::with_config(config)
    }

    /// Open a level described as JSON
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<LevelRunner, JsValue> {
        let config = LevelConfig::from_json(json).map_err(to_js)?;
        Self::with_config(config)
    }

    fn with_config(config: LevelConfig) -> Result<LevelRunner, JsValue> {
        let settings = Settings::load();
        Ok(Self {
            handle: RunHandle::new(config).map_err(to_js)?,
            pacer: Pacer::new(settings.tick_interval()),
            settings,
        })
    }

    /// Start a program given as a JSON array of command ids
    pub fn start(&mut self, program_json: &str) -> Result<(), JsValue> {
        let program: Vec<Command> = serde_json::from_str(program_json).map_err(to_js)?;
        self.handle.start(&program).map_err(to_js)?;
        self.pacer.reset();
        Ok(())
    }

    /// Execute one command now; returns the result as JSON, or null
    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        match self.handle.tick() {
            Some(result) => Ok(JsValue::from_str(
                &serde_json::to_string(&result).map_err(to_js)?,
            )),
            None => Ok(JsValue::NULL),
        }
    }

    /// Feed a frame delta (ms); executes any commands that are due and
    /// returns their results as a JSON array
    pub fn advance(&mut self, dt_ms: f64) -> Result<String, JsValue> {
        let mut results = Vec::new();
        if self.handle.is_running() {
            let due = self.pacer.update((dt_ms / 1000.0) as f32);
            for _ in 0..due {
                let Some(result) = self.handle.tick() else {
                    break;
                };
                let done = !result.is_continue();
                results.push(result);
                if done {
                    break;
                }
            }
        }
        serde_json::to_string(&results).map_err(to_js)
    }

    /// `[x, z, heading]`
    #[wasm_bindgen(js_name = currentPose)]
    pub fn current_pose(&self) -> Vec<f32> {
        let pose = self.handle.current_pose();
        vec![pose.x, pose.z, pose.heading]
    }

    #[wasm_bindgen(js_name = capturedTargets)]
    pub fn captured_targets(&self) -> Array {
        self.handle
            .captured_targets()
            .into_iter()
            .map(|name| JsValue::from_str(&name))
            .collect()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Pending events as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.handle.drain_events()).map_err(to_js)
    }

    pub fn reset(&mut self) {
        self.handle.reset();
        self.pacer.reset();
    }

    /// Change playback speed ("slow", "normal", "fast") and persist it
    #[wasm_bindgen(js_name = setPacing)]
    pub fn set_pacing(&mut self, preset: &str) -> Result<(), JsValue> {
        let Some(pacing) = PacingPreset::parse(preset) else {
            return Err(JsValue::from_str(&format!("unknown pacing '{}'", preset)));
        };
        self.settings.pacing = pacing;
        self.settings.save();
        self.pacer = Pacer::new(self.settings.tick_interval());
        Ok(())
    }

    #[wasm_bindgen(js_name = completionDelayMs)]
    pub fn completion_delay_ms(&self) -> f64 {
        f64::from(self.settings.effective_completion_delay()) * 1000.0
    }

    #[wasm_bindgen(js_name = messageDurationMs)]
    pub fn message_duration_ms(&self) -> f64 {
        f64::from(self.settings.message_duration) * 1000.0
    }
}

#[wasm_bindgen(js_name = isLevelUnlocked)]
pub fn is_level_unlocked(level_id: &str) -> bool {
    LocalStorageProgress::load().get(level_id)
}

/// Record a completed level; returns the newly unlocked level id
#[wasm_bindgen(js_name = completeLevel)]
pub fn complete_level(level_id: &str) -> Option<String> {
    let mut progress = LocalStorageProgress::load();
    progress.unlock_next(level_id).map(str::to_string)
}
