//! Request and response shapes exchanged with the analysis engine.

use crate::error::TransportError;
use crate::simulation::raw_state::{NextState, RawState};
use serde::{Deserialize, Serialize};
use std::future::Future;

pub mod analysis;
#[cfg(target_arch = "wasm32")]
pub mod fetch;

/// Body of a simulation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateRequest {
    pub sysdecl: String,
    /// JSON-encoded [`RawState`]; `None` asks for the initial states.
    pub starting_state: Option<String>,
}

impl SimulateRequest {
    pub fn initial(sysdecl: String) -> Self {
        Self {
            sysdecl,
            starting_state: None,
        }
    }

    pub fn from_state(sysdecl: String, state: &RawState) -> Result<Self, serde_json::Error> {
        Ok(Self {
            sysdecl,
            starting_state: Some(serde_json::to_string(state)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialStateResponse {
    pub initial: Vec<NextState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStateResponse {
    pub current: RawState,
    pub next: Vec<NextState>,
}

/// The remote engine as seen by the simulation.
///
/// Implementations return the raw response body; decoding happens in the caller.
pub trait Oracle {
    fn simulate(
        &self,
        request: &SimulateRequest,
    ) -> impl Future<Output = Result<String, TransportError>>;
}
