use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Structural errors raised while turning parser items into a system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{item} refers to process '{process}', which is not declared")]
    DanglingProcessReference { process: String, item: String },

    #[error(
        "Edge '{edge}' of process '{process}' refers to location '{location}', which is not declared before it"
    )]
    DanglingLocationReference {
        process: String,
        location: String,
        edge: String,
    },

    #[error("Process '{0}' is declared more than once")]
    DuplicateProcess(String),

    #[error("Location '{location}' is declared more than once in process '{process}'")]
    DuplicateLocation { process: String, location: String },

    #[error("Integer variable '{0}' is declared more than once")]
    DuplicateInteger(String),

    #[error("Clock '{0}' is declared more than once")]
    DuplicateClock(String),

    #[error("Process '{process}' has no location '{location}'")]
    UnknownLocation { process: String, location: String },

    #[error("Edge '{action}' of process '{process}' has an endpoint outside the process's locations")]
    DanglingSwitchEndpoint { process: String, action: String },
}

/// Failures of a call to the remote engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request to the analysis engine failed: {0}")]
    Network(String),

    #[error("Analysis engine answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Analysis engine answered with malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Request was cancelled")]
    Cancelled,
}

impl TransportError {
    /// Cancellations are initiated by the user and must not be reported as failures.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::MalformedJson(err.to_string())
    }
}

/// Errors of the interactive simulation session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("No simulation is running")]
    NotReady,

    #[error("A simulation request is still outstanding")]
    RequestInFlight,

    #[error("The analysis engine did not return an initial state")]
    NoInitialState,

    #[error(transparent)]
    InvalidSystem(#[from] BuildError),
}

impl SimulationError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SimulationError::Transport(err) if err.is_cancellation())
    }
}

/// What went wrong, as seen by the browser client.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The JSON handed over could not be read.
    MalformedInput,
    Build,
    Transport,
    /// Not a failure: the user aborted the request.
    Cancelled,
    Simulation,
}

/// Error returned by the exported functions.
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportError {
    kind: ErrorKind,
    message: String,
}

#[wasm_bindgen]
impl ExportError {
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }

    #[wasm_bindgen(js_name = isCancellation)]
    pub fn is_cancellation(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

impl ExportError {
    fn new(kind: ErrorKind, err: impl std::error::Error) -> Self {
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::new(ErrorKind::MalformedInput, err)
    }
}

impl From<BuildError> for ExportError {
    fn from(err: BuildError) -> Self {
        ExportError::new(ErrorKind::Build, err)
    }
}

impl From<TransportError> for ExportError {
    fn from(err: TransportError) -> Self {
        let kind = if err.is_cancellation() {
            ErrorKind::Cancelled
        } else {
            ErrorKind::Transport
        };
        ExportError::new(kind, err)
    }
}

impl From<SimulationError> for ExportError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::Transport(err) => err.into(),
            SimulationError::InvalidSystem(err) => err.into(),
            other => ExportError::new(ErrorKind::Simulation, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_cancellation_returns_true_only_for_cancelled() {
        // given
        let cancelled = TransportError::Cancelled;
        let network = TransportError::Network(String::from("offline"));

        // when / then
        assert!(cancelled.is_cancellation());
        assert!(!network.is_cancellation());
        assert!(SimulationError::from(cancelled).is_cancellation());
        assert!(!SimulationError::NotReady.is_cancellation());
    }

    #[test]
    fn dangling_location_reference_names_the_location() {
        // given
        let err = BuildError::DanglingLocationReference {
            process: String::from("P"),
            location: String::from("l9"),
            edge: String::from("l0 -> l9"),
        };

        // when
        let msg = err.to_string();

        // then
        assert_eq!(
            msg,
            "Edge 'l0 -> l9' of process 'P' refers to location 'l9', which is not declared before it"
        );
    }

    #[test]
    fn malformed_json_is_converted_from_serde_error() {
        // given
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        // when
        let err = TransportError::from(serde_err);

        // then
        assert!(matches!(err, TransportError::MalformedJson(_)));
    }

    #[test]
    fn export_error_keeps_cancellation_apart_from_failures() {
        // given
        let cancelled = SimulationError::from(TransportError::Cancelled);
        let failed = SimulationError::from(TransportError::Status {
            status: 502,
            body: String::from("bad gateway"),
        });

        // when
        let cancelled = ExportError::from(cancelled);
        let failed = ExportError::from(failed);

        // then
        assert_eq!(cancelled.kind(), ErrorKind::Cancelled);
        assert!(cancelled.is_cancellation());
        assert_eq!(failed.kind(), ErrorKind::Transport);
        assert!(!failed.is_cancellation());
        assert_eq!(
            failed.message(),
            "Analysis engine answered with status 502: bad gateway"
        );
    }

    #[test]
    fn export_error_classifies_build_and_simulation_errors() {
        // given
        let dangling = BuildError::DuplicateProcess(String::from("P"));

        // when
        let build = ExportError::from(SimulationError::InvalidSystem(dangling));
        let simulation = ExportError::from(SimulationError::NotReady);

        // then
        assert_eq!(build.kind(), ErrorKind::Build);
        assert_eq!(build.message(), "Process 'P' is declared more than once");
        assert_eq!(simulation.kind(), ErrorKind::Simulation);
    }
}
