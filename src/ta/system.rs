use crate::error::BuildError;
use crate::ta::TimedAutomaton;
use crate::ta::integer::Integer;
use crate::ta::sync_constraint::SyncConstraint;
use serde::{Deserialize, Serialize};

/// A named automaton of a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    name: String,
    automaton: TimedAutomaton,
}

impl Process {
    pub fn new(name: &str, automaton: TimedAutomaton) -> Self {
        Self {
            name: String::from(name),
            automaton,
        }
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn automaton(&self) -> &TimedAutomaton {
        &self.automaton
    }

    pub(crate) fn automaton_mut(&mut self) -> &mut TimedAutomaton {
        &mut self.automaton
    }
}

/// A network of timed automata.
///
/// Process order is declaration order; the analysis engine refers to processes
/// by their position in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    name: String,
    processes: Vec<Process>,
    integers: Vec<Integer>,
    synchronizations: Vec<SyncConstraint>,
}

impl System {
    pub fn new(
        name: &str,
        processes: Vec<Process>,
        integers: Vec<Integer>,
        synchronizations: Vec<SyncConstraint>,
    ) -> Self {
        Self {
            name: String::from(name),
            processes,
            integers,
            synchronizations,
        }
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn processes(&self) -> &Vec<Process> {
        &self.processes
    }

    pub fn integers(&self) -> &Vec<Integer> {
        &self.integers
    }

    pub fn synchronizations(&self) -> &Vec<SyncConstraint> {
        &self.synchronizations
    }

    pub fn process_names(&self) -> Vec<&String> {
        self.processes.iter().map(|p| p.name()).collect()
    }

    pub fn process(&self, name: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.name() == name)
    }

    /// Adds a computed automaton (e.g. a synchronized product) as a new process.
    pub fn append_automaton(
        &mut self,
        name: &str,
        automaton: TimedAutomaton,
    ) -> Result<(), BuildError> {
        if self.process(name).is_some() {
            return Err(BuildError::DuplicateProcess(String::from(name)));
        }
        self.processes.push(Process::new(name, automaton));
        Ok(())
    }

    /// Persists coordinates chosen by the user or the layout engine.
    pub fn set_location_layout(
        &mut self,
        process: &str,
        location: &str,
        x: f64,
        y: f64,
    ) -> Result<(), BuildError> {
        let automaton = self
            .processes
            .iter_mut()
            .find(|p| p.name() == process)
            .ok_or_else(|| BuildError::DanglingProcessReference {
                process: String::from(process),
                item: format!("Layout of location '{location}'"),
            })?
            .automaton_mut();
        let unknown = || BuildError::UnknownLocation {
            process: String::from(process),
            location: String::from(location),
        };
        let id = automaton.find_location(location).ok_or_else(unknown)?;
        automaton
            .location_mut(id)
            .ok_or_else(unknown)?
            .set_layout(x, y);
        Ok(())
    }
}
