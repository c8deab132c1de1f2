use crate::ast::ParsedSystem;
use crate::builder::build_system;
use crate::error::ExportError;
use crate::simulation::RawState;
use crate::ta::system::System;
use crate::tck::{SystemSerializer, TckWriter};
use crate::validation::validate_system;
use wasm_bindgen::prelude::*;

pub mod ast;
pub mod builder;
pub mod config;
pub mod error;
pub mod oracle;
pub mod simulation;
pub mod ta;
pub mod tck;
mod util;
pub mod validation;

/// Builds a system from the parser's JSON output and returns it as JSON.
#[wasm_bindgen(js_name = buildSystem)]
pub fn build_system_json(parsed: &str) -> Result<String, ExportError> {
    let parsed: ParsedSystem = serde_json::from_str(parsed)?;
    let system = build_system(&parsed)?;
    Ok(serde_json::to_string(&system)?)
}

/// Fails with a build error when an edge points outside its process.
#[wasm_bindgen(js_name = serializeSystem)]
pub fn serialize_system(system: &str) -> Result<String, ExportError> {
    let system: System = serde_json::from_str(system)?;
    Ok(TckWriter.serialize(&system)?)
}

/// Returns the failed checks; an empty list means the system is fine.
#[wasm_bindgen(js_name = validateSystem)]
pub fn validate_system_json(system: &str) -> Result<Vec<String>, ExportError> {
    let system: System = serde_json::from_str(system)?;
    Ok(validate_system(&system).err().unwrap_or_default())
}

#[wasm_bindgen(js_name = parseSimulationState)]
pub fn parse_simulation_state(raw: &str) -> Result<String, ExportError> {
    let raw: RawState = serde_json::from_str(raw)?;
    Ok(serde_json::to_string(&raw.parse())?)
}

#[cfg(target_arch = "wasm32")]
mod web {
    use crate::config::AppConfig;
    use crate::error::{ExportError, SimulationError};
    use crate::oracle::fetch::FetchOracle;
    use crate::simulation::{RawState, Simulation, SimulationStatus};
    use crate::ta::system::System;
    use crate::tck::TckWriter;
    use js_sys::Promise;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::future_to_promise;

    /// Simulation session talking to the configured engine.
    #[wasm_bindgen]
    pub struct SimulationClient {
        simulation: Simulation<FetchOracle, TckWriter>,
    }

    #[wasm_bindgen]
    impl SimulationClient {
        #[wasm_bindgen(constructor)]
        pub fn new(config: &str) -> Result<SimulationClient, ExportError> {
            let config = AppConfig::from_json(config)?;
            Ok(Self {
                simulation: Simulation::new(FetchOracle::new(config), TckWriter),
            })
        }

        pub fn start(&self, system: &str) -> Result<Promise, ExportError> {
            let system: System = serde_json::from_str(system)?;
            let simulation = self.simulation.clone();
            Ok(future_to_promise(async move {
                simulation.start(&system).await.map_err(to_js_error)?;
                Ok(JsValue::UNDEFINED)
            }))
        }

        pub fn advance(&self, chosen: &str) -> Result<Promise, ExportError> {
            let chosen: RawState = serde_json::from_str(chosen)?;
            let simulation = self.simulation.clone();
            Ok(future_to_promise(async move {
                simulation.advance(&chosen).await.map_err(to_js_error)?;
                Ok(JsValue::UNDEFINED)
            }))
        }

        pub fn stop(&self) {
            self.simulation.stop();
        }

        pub fn status(&self) -> String {
            let status = match self.simulation.status() {
                SimulationStatus::Idle => "idle",
                SimulationStatus::Loading => "loading",
                SimulationStatus::Ready => "ready",
            };
            String::from(status)
        }

        #[wasm_bindgen(js_name = currentState)]
        pub fn current_state(&self) -> Result<String, ExportError> {
            Ok(serde_json::to_string(&self.simulation.current_state())?)
        }

        #[wasm_bindgen(js_name = nextStates)]
        pub fn next_states(&self) -> Result<String, ExportError> {
            Ok(serde_json::to_string(&self.simulation.next_states())?)
        }
    }

    fn to_js_error(err: SimulationError) -> JsValue {
        ExportError::from(err).into()
    }
}
