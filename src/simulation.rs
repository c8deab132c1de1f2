//! Client side of interactive simulation.
//!
//! [`stepper::SimulationStepper`] holds the session state and never performs IO;
//! [`driver::Simulation`] feeds its requests to an [`crate::oracle::Oracle`].

pub mod driver;
pub mod raw_state;
pub mod stepper;

pub use driver::Simulation;
pub use raw_state::{NextState, RawState, SimulationState};
pub use stepper::{SimulationStatus, SimulationStepper};
