use crate::error::{SimulationError, TransportError};
use crate::oracle::{InitialStateResponse, NextStateResponse, SimulateRequest};
use crate::simulation::raw_state::{NextState, RawState, SimulationState};
use crate::tck::SystemSerializer;
use crate::ta::system::System;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStatus {
    Idle,
    Loading,
    Ready,
}

/// Identifies the session and request a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request: u64,
}

/// A request the host has to send to the engine and answer via
/// [`SimulationStepper::on_response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    pub ticket: Ticket,
    pub body: SimulateRequest,
}

/// What applying a response did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The sequence continues with another request.
    Request(OracleRequest),
    /// Current and next states were replaced.
    Applied,
    /// The response belongs to a superseded request and was ignored.
    Discarded,
}

/// Current state together with the states reachable from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub current: SimulationState,
    pub next: Vec<NextState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Initial,
    NextFromInitial,
    Advance,
}

/// Client side of an interactive simulation, independent of any transport.
///
/// Every request carries a [`Ticket`]. Starting a new session or stopping the
/// current one bumps the generation, so that late responses to superseded
/// requests are discarded instead of overwriting newer state. Current and next
/// states live in a single [`Step`] and are only ever replaced together.
#[derive(Debug, Default)]
pub struct SimulationStepper {
    generation: u64,
    request: u64,
    sysdecl: Option<String>,
    pending: Option<Pending>,
    step: Option<Step>,
}

impl SimulationStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SimulationStatus {
        match (&self.pending, &self.step) {
            (Some(_), _) => SimulationStatus::Loading,
            (None, Some(_)) => SimulationStatus::Ready,
            (None, None) => SimulationStatus::Idle,
        }
    }

    pub fn step(&self) -> Option<&Step> {
        self.step.as_ref()
    }

    pub fn current_state(&self) -> Option<&SimulationState> {
        self.step.as_ref().map(|step| &step.current)
    }

    pub fn next_states(&self) -> &[NextState] {
        self.step
            .as_ref()
            .map(|step| step.next.as_slice())
            .unwrap_or_default()
    }

    /// Begins a new session, superseding whatever was running before.
    ///
    /// A system the serializer rejects still ends the previous session.
    pub fn start(
        &mut self,
        system: &System,
        serializer: &impl SystemSerializer,
    ) -> Result<OracleRequest, SimulationError> {
        self.generation += 1;
        self.sysdecl = None;
        self.pending = None;
        self.step = None;
        let sysdecl = serializer.serialize(system)?;
        info!(system = %system.name(), generation = self.generation, "starting simulation");
        self.sysdecl = Some(sysdecl.clone());
        Ok(self.issue(Pending::Initial, SimulateRequest::initial(sysdecl)))
    }

    /// Requests the successors of `chosen`, which becomes the new current state.
    pub fn advance(&mut self, chosen: &RawState) -> Result<OracleRequest, SimulationError> {
        if self.pending.is_some() {
            return Err(SimulationError::RequestInFlight);
        }
        let sysdecl = match (&self.sysdecl, &self.step) {
            (Some(sysdecl), Some(_)) => sysdecl.clone(),
            _ => return Err(SimulationError::NotReady),
        };
        let body = SimulateRequest::from_state(sysdecl, chosen).map_err(TransportError::from)?;
        Ok(self.issue(Pending::Advance, body))
    }

    /// Ends the session. Responses to requests issued before are discarded.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.sysdecl = None;
        self.pending = None;
        self.step = None;
        info!(generation = self.generation, "simulation stopped");
    }

    /// Applies the engine's answer to the request identified by `ticket`.
    ///
    /// On failure while starting, the session falls back to idle; on failure
    /// while advancing, the previous step stays visible.
    pub fn on_response(
        &mut self,
        ticket: Ticket,
        response: Result<String, TransportError>,
    ) -> Result<Progress, SimulationError> {
        let pending = match self.pending {
            Some(pending) if self.is_current(ticket) => pending,
            _ => {
                debug!(?ticket, "discarding response of superseded request");
                return Ok(Progress::Discarded);
            }
        };
        self.pending = None;

        match self.apply(pending, response) {
            Ok(progress) => Ok(progress),
            Err(err) => {
                if pending != Pending::Advance {
                    self.sysdecl = None;
                    self.step = None;
                }
                Err(err)
            }
        }
    }

    fn apply(
        &mut self,
        pending: Pending,
        response: Result<String, TransportError>,
    ) -> Result<Progress, SimulationError> {
        let body = response?;
        match pending {
            Pending::Initial => {
                let parsed: InitialStateResponse =
                    serde_json::from_str(&body).map_err(TransportError::from)?;
                let initial = parsed
                    .initial
                    .into_iter()
                    .next()
                    .ok_or(SimulationError::NoInitialState)?;
                let sysdecl = self.sysdecl.clone().unwrap_or_default();
                let request = SimulateRequest::from_state(sysdecl, &initial.state)
                    .map_err(TransportError::from)?;
                Ok(Progress::Request(
                    self.issue(Pending::NextFromInitial, request),
                ))
            }
            Pending::NextFromInitial | Pending::Advance => {
                let parsed: NextStateResponse =
                    serde_json::from_str(&body).map_err(TransportError::from)?;
                self.step = Some(Step {
                    current: parsed.current.parse(),
                    next: parsed.next,
                });
                Ok(Progress::Applied)
            }
        }
    }

    fn issue(&mut self, pending: Pending, body: SimulateRequest) -> OracleRequest {
        self.request += 1;
        self.pending = Some(pending);
        OracleRequest {
            ticket: Ticket {
                generation: self.generation,
                request: self.request,
            },
            body,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation && ticket.request == self.request
    }
}
