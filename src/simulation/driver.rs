use crate::error::SimulationError;
use crate::oracle::Oracle;
use crate::simulation::raw_state::{NextState, RawState, SimulationState};
use crate::simulation::stepper::{OracleRequest, Progress, SimulationStatus, SimulationStepper};
use crate::tck::SystemSerializer;
use crate::ta::system::System;
use std::cell::RefCell;
use std::rc::Rc;

/// Runs a [`SimulationStepper`] against an [`Oracle`].
///
/// Handles are cheap to clone and share one session, so a host can call
/// [`Simulation::stop`] while [`Simulation::start`] is still awaiting the engine.
pub struct Simulation<O, S> {
    oracle: Rc<O>,
    serializer: Rc<S>,
    stepper: Rc<RefCell<SimulationStepper>>,
}

impl<O, S> Clone for Simulation<O, S> {
    fn clone(&self) -> Self {
        Self {
            oracle: Rc::clone(&self.oracle),
            serializer: Rc::clone(&self.serializer),
            stepper: Rc::clone(&self.stepper),
        }
    }
}

impl<O: Oracle, S: SystemSerializer> Simulation<O, S> {
    pub fn new(oracle: O, serializer: S) -> Self {
        Self {
            oracle: Rc::new(oracle),
            serializer: Rc::new(serializer),
            stepper: Rc::new(RefCell::new(SimulationStepper::new())),
        }
    }

    pub fn status(&self) -> SimulationStatus {
        self.stepper.borrow().status()
    }

    pub fn current_state(&self) -> Option<SimulationState> {
        self.stepper.borrow().current_state().cloned()
    }

    pub fn next_states(&self) -> Vec<NextState> {
        self.stepper.borrow().next_states().to_vec()
    }

    /// Resolves once the session is ready, failed, or was superseded.
    pub async fn start(&self, system: &System) -> Result<(), SimulationError> {
        let request = self
            .stepper
            .borrow_mut()
            .start(system, self.serializer.as_ref())?;
        self.drive(request).await
    }

    pub async fn advance(&self, chosen: &RawState) -> Result<(), SimulationError> {
        let request = self.stepper.borrow_mut().advance(chosen)?;
        self.drive(request).await
    }

    pub fn stop(&self) {
        self.stepper.borrow_mut().stop();
    }

    async fn drive(&self, mut request: OracleRequest) -> Result<(), SimulationError> {
        loop {
            let response = self.oracle.simulate(&request.body).await;
            let progress = self
                .stepper
                .borrow_mut()
                .on_response(request.ticket, response)?;
            match progress {
                Progress::Request(next) => request = next,
                Progress::Applied | Progress::Discarded => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildError, TransportError};
    use crate::oracle::SimulateRequest;
    use crate::simulation::raw_state::RawTransition;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::{Pin, pin};
    use std::task::{Context, Poll, Waker};

    struct NameSerializer;

    impl SystemSerializer for NameSerializer {
        fn serialize(&self, system: &System) -> Result<String, BuildError> {
            Ok(format!("system:{}\n", system.name()))
        }
    }

    /// Answers requests from a queue, yielding once before each answer.
    #[derive(Default)]
    struct ScriptedOracle {
        responses: RefCell<VecDeque<Result<String, TransportError>>>,
        requests: RefCell<Vec<SimulateRequest>>,
    }

    impl ScriptedOracle {
        fn answering(responses: Vec<Result<String, TransportError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Oracle for ScriptedOracle {
        fn simulate(
            &self,
            request: &SimulateRequest,
        ) -> impl Future<Output = Result<String, TransportError>> {
            self.requests.borrow_mut().push(request.clone());
            let response = self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(TransportError::Network(String::from("no response"))));
            async move {
                YieldOnce::default().await;
                response
            }
        }
    }

    #[derive(Default)]
    struct YieldOnce {
        yielded: bool,
    }

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
            if self.yielded {
                Poll::Ready(())
            } else {
                self.yielded = true;
                Poll::Pending
            }
        }
    }

    fn block_on<F: Future>(future: F) -> F::Output {
        let mut future = pin!(future);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }

    #[test]
    fn start_runs_initial_and_next_requests_in_order() {
        // given
        let oracle = ScriptedOracle::answering(vec![
            Ok(json!({ "initial": [gen_next("i=0", "<l0>")] }).to_string()),
            Ok(json!({ "current": gen_raw("i=0", "<l0>"), "next": [gen_next("i=1", "<l1>")] })
                .to_string()),
        ]);
        let simulation = Simulation::new(oracle, NameSerializer);

        // when
        let result = block_on(simulation.start(&gen_system()));

        // then
        assert_eq!(result, Ok(()));
        assert_eq!(simulation.status(), SimulationStatus::Ready);
        assert_eq!(
            simulation.current_state(),
            Some(gen_raw("i=0", "<l0>").parse())
        );
        assert_eq!(simulation.next_states(), vec![gen_next("i=1", "<l1>")]);
        let requests = simulation.oracle.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].starting_state, None);
        assert!(requests[1].starting_state.is_some());
    }

    #[test]
    fn advance_moves_to_chosen_state() {
        // given
        let oracle = ScriptedOracle::answering(vec![
            Ok(json!({ "initial": [gen_next("i=0", "<l0>")] }).to_string()),
            Ok(json!({ "current": gen_raw("i=0", "<l0>"), "next": [gen_next("i=1", "<l1>")] })
                .to_string()),
            Ok(json!({ "current": gen_raw("i=1", "<l1>"), "next": [] }).to_string()),
        ]);
        let simulation = Simulation::new(oracle, NameSerializer);
        block_on(simulation.start(&gen_system())).unwrap();

        // when
        let result = block_on(simulation.advance(&gen_raw("i=1", "<l1>")));

        // then
        assert_eq!(result, Ok(()));
        assert_eq!(
            simulation.current_state(),
            Some(gen_raw("i=1", "<l1>").parse())
        );
        assert!(simulation.next_states().is_empty());
    }

    #[test]
    fn stop_while_starting_discards_the_late_response() {
        // given
        let oracle = ScriptedOracle::answering(vec![Ok(
            json!({ "initial": [gen_next("i=0", "<l0>")] }).to_string(),
        )]);
        let simulation = Simulation::new(oracle, NameSerializer);
        let handle = simulation.clone();
        let system = gen_system();
        let mut start = pin!(simulation.start(&system));
        let mut cx = Context::from_waker(Waker::noop());
        assert!(start.as_mut().poll(&mut cx).is_pending());

        // when
        handle.stop();
        let result = block_on(start);

        // then
        assert_eq!(result, Ok(()));
        assert_eq!(handle.status(), SimulationStatus::Idle);
        assert_eq!(handle.current_state(), None);
        assert_eq!(handle.oracle.requests.borrow().len(), 1);
    }

    #[test]
    fn transport_failure_is_reported_and_session_stays_idle() {
        // given
        let oracle = ScriptedOracle::answering(vec![Err(TransportError::Status {
            status: 500,
            body: String::from("boom"),
        })]);
        let simulation = Simulation::new(oracle, NameSerializer);

        // when
        let result = block_on(simulation.start(&gen_system()));

        // then
        assert!(matches!(
            result,
            Err(SimulationError::Transport(TransportError::Status { status: 500, .. }))
        ));
        assert_eq!(simulation.status(), SimulationStatus::Idle);
    }

    fn gen_system() -> System {
        System::new("sys", Vec::new(), Vec::new(), Vec::new())
    }

    fn gen_raw(intval: &str, vloc: &str) -> RawState {
        RawState {
            intval: String::from(intval),
            labels: String::new(),
            vloc: String::from(vloc),
            zone: String::new(),
        }
    }

    fn gen_next(intval: &str, vloc: &str) -> NextState {
        NextState {
            status: 1,
            state: gen_raw(intval, vloc),
            transition: RawTransition::default(),
        }
    }
}
