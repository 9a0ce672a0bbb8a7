//! Simulation settings
//!
//! Persisted separately from session state (LocalStorage on web, a JSON file
//! for the native runner).

use serde::{Deserialize, Serialize};

/// Fallback compounding bounds when the configured ones are unusable
const MIN_BREATHING_RADIUS: f64 = 2.0;
const MAX_BREATHING_RADIUS: f64 = 200.0;

/// How the 4th-dimension scale factor is applied to a body's radius each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum RadiusBreathing {
    #[default]
    /// radius = base_radius * (1 + 0.1 sin(phase)); stays within ±10% of the base
    Relative,
    /// radius *= 1 + 0.1 sin(phase) every tick, compounding, clamped to the given bounds
    Compounding { min_radius: f64, max_radius: f64 },
}

impl RadiusBreathing {
    pub fn as_str(&self) -> &'static str {
        match self {
            RadiusBreathing::Relative => "relative",
            RadiusBreathing::Compounding { .. } => "compounding",
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed (0 = pick one from the clock at startup)
    pub seed: u64,

    // === Arena ===
    /// Spawn area width
    pub arena_width: f64,
    /// Spawn area height
    pub arena_height: f64,

    // === Integration ===
    /// Time step per frame tick
    pub dt: f64,
    /// Speed cap applied after each integration step
    pub max_speed: f64,

    // === Effects ===
    /// Radius breathing policy
    pub breathing: RadiusBreathing,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            arena_width: 800.0,
            arena_height: 600.0,
            dt: 1.0 / 60.0,
            max_speed: 400.0,
            breathing: RadiusBreathing::Relative,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults, out-of-range
    /// values are repaired by `sanitized`)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Replace values the simulation cannot run with.
    ///
    /// `dt`, `max_speed` and the arena extent must be finite and positive,
    /// otherwise they fall back to the defaults. Compounding bounds are
    /// swapped when reversed and must satisfy `0 < min_radius <= max_radius`.
    pub fn sanitized(mut self) -> Self {
        fn repair(name: &str, value: &mut f64, fallback: f64) {
            if !(value.is_finite() && *value > 0.0) {
                log::warn!("Invalid {} {}, using {}", name, value, fallback);
                *value = fallback;
            }
        }

        let defaults = Self::default();
        repair("dt", &mut self.dt, defaults.dt);
        repair("max_speed", &mut self.max_speed, defaults.max_speed);
        repair("arena_width", &mut self.arena_width, defaults.arena_width);
        repair("arena_height", &mut self.arena_height, defaults.arena_height);

        if let RadiusBreathing::Compounding {
            min_radius,
            max_radius,
        } = self.breathing
        {
            let (mut lo, mut hi) = if min_radius > max_radius {
                log::warn!(
                    "Breathing bounds reversed ({} > {}), swapping",
                    min_radius,
                    max_radius
                );
                (max_radius, min_radius)
            } else {
                (min_radius, max_radius)
            };
            repair("min_radius", &mut lo, MIN_BREATHING_RADIUS);
            if !(hi.is_finite() && hi >= lo) {
                let fallback = lo.max(MAX_BREATHING_RADIUS);
                log::warn!("Invalid max_radius {}, using {}", hi, fallback);
                hi = fallback;
            }
            self.breathing = RadiusBreathing::Compounding {
                min_radius: lo,
                max_radius: hi,
            };
        }
        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "quantum_sandbox_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
