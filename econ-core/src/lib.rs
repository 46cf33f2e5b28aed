use wasm_bindgen::prelude::*;

pub mod config;
pub mod economy;
pub mod error;
pub mod firm;
pub mod household;
pub mod rng;
pub mod schedule;
pub mod stats;
pub mod types;

pub use config::{EconomyConfig, FirmConfig, HouseholdConfig, JobGuaranteeConfig};
pub use economy::{Agents, Economy, Shareholdings};
pub use error::{ConfigError, EconResult};
pub use firm::{Firm, FirmMonthStats, FirmRegistry};
pub use household::{Blackmark, ConsumptionPlan, Household};
pub use rng::SimRng;
pub use schedule::{DayReport, Scheduler};
pub use stats::{EconomySnapshot, EconomyStats, FirmSnapshot, HouseholdSnapshot};
pub use types::*;

#[cfg(feature = "instrument")]
pub use instrument;

// ============================================================================
// WASM API - Simulation
// ============================================================================

#[wasm_bindgen]
pub struct Simulation {
    economy: Economy,
}

#[wasm_bindgen]
impl Simulation {
    /// Default calibration with the given seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<Simulation, JsError> {
        console_error_panic_hook::set_once();
        let config = EconomyConfig {
            seed,
            ..EconomyConfig::default()
        };
        Self::build(config)
    }

    /// Build from a JS config object. Missing fields take their defaults.
    #[wasm_bindgen]
    pub fn from_config(config: JsValue) -> Result<Simulation, JsError> {
        console_error_panic_hook::set_once();
        let config: EconomyConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsError::new(&format!("invalid config: {}", e)))?;
        Self::build(config)
    }

    /// Build from a JSON config string. Missing fields take their defaults.
    #[wasm_bindgen]
    pub fn from_config_json(json: &str) -> Result<Simulation, JsError> {
        console_error_panic_hook::set_once();
        let config: EconomyConfig = serde_json::from_str(json)
            .map_err(|e| JsError::new(&format!("invalid config: {}", e)))?;
        Self::build(config)
    }

    /// Advance one working day. Returns true when that day closed a month.
    #[wasm_bindgen]
    pub fn step(&mut self) -> bool {
        self.economy.step().month_end
    }

    /// Advance `days` working days.
    #[wasm_bindgen]
    pub fn run(&mut self, days: u32) {
        self.economy.run(u64::from(days));
    }

    #[wasm_bindgen]
    pub fn get_steps(&self) -> u64 {
        self.economy.steps()
    }

    #[wasm_bindgen]
    pub fn get_month(&self) -> u64 {
        self.economy.month()
    }

    #[wasm_bindgen]
    pub fn get_day(&self) -> u32 {
        self.economy.day()
    }

    #[wasm_bindgen]
    pub fn is_month_start(&self) -> bool {
        self.economy.is_month_start()
    }

    #[wasm_bindgen]
    pub fn is_month_end(&self) -> bool {
        self.economy.is_month_end()
    }

    /// Aggregates at the current step boundary.
    #[wasm_bindgen]
    pub fn get_stats(&self) -> EconomyStats {
        self.economy.stats()
    }

    /// Every agent plus aggregates, for rendering.
    #[wasm_bindgen]
    pub fn get_snapshot(&self) -> EconomySnapshot {
        self.economy.snapshot()
    }

    /// The active calibration as JSON.
    #[wasm_bindgen]
    pub fn get_config_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.economy.config()).map_err(|e| JsError::new(&e.to_string()))
    }
}

impl Simulation {
    fn build(config: EconomyConfig) -> Result<Simulation, JsError> {
        let economy = Economy::new(config).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Simulation { economy })
    }
}
