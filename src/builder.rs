//! Conversion of parser items into a [`System`].
//!
//! The conversion runs in two explicit passes over the item list:
//!
//! 1. every `process` item registers an empty automaton, in declaration order;
//! 2. a single linear scan handles all other items. Clocks are declared on every
//!    registered automaton, integers and synchronizations on the system, and
//!    locations and edges on the automaton whose process name they carry.
//!
//! Edges are resolved against the locations seen so far, so the parser must emit
//! all locations of a process before the edges that reference them. A reference
//! to an unknown process or location is reported as a [`BuildError`].

use crate::ast::{
    Constraint, EdgeAttribute, Item, LocationAttribute, ParsedSystem, Statement, SyncParticipant,
};
use crate::error::BuildError;
use crate::ta::TimedAutomaton;
use crate::ta::clock::Clock;
use crate::ta::clock_constraint::ClockConstraint;
use crate::ta::clock_constraint::clause::FreeClause;
use crate::ta::integer::Integer;
use crate::ta::location::Location;
use crate::ta::switch::{Switch, SwitchStatement};
use crate::ta::sync_constraint::{Sync, SyncConstraint};
use crate::ta::system::{Process, System};
use tracing::debug;

pub fn build_system(parsed: &ParsedSystem) -> Result<System, BuildError> {
    build_from_items(&parsed.system.name, &parsed.items)
}

pub fn build_from_items(name: &str, items: &[Item]) -> Result<System, BuildError> {
    let mut builder = SystemBuilder::default();

    for item in items {
        if let Item::Process { name } = item {
            builder.register_process(name)?;
        }
    }

    for item in items {
        match item {
            Item::Process { .. } => {}
            Item::Event { name } => {
                debug!(event = %name, "event declarations are derived, skipping");
            }
            Item::Clock { name, amount } => builder.declare_clock(name, *amount)?,
            Item::Int {
                name,
                size,
                min,
                max,
                init,
            } => builder.declare_integer(Integer::new(name, *size, *min, *max, *init))?,
            Item::Location {
                process_name,
                name,
                attributes,
            } => builder.add_location(process_name, name, attributes)?,
            Item::Edge {
                process_name,
                source,
                target,
                event,
                attributes,
            } => builder.add_edge(process_name, source, target, event, attributes)?,
            Item::Sync { sync_constr } => builder.add_sync(sync_constr),
        }
    }

    let system = builder.finish(name);
    debug!(
        system = %system.name(),
        processes = system.processes().len(),
        integers = system.integers().len(),
        synchronizations = system.synchronizations().len(),
        "built system"
    );
    Ok(system)
}

#[derive(Default)]
struct SystemBuilder {
    processes: Vec<(String, TimedAutomaton)>,
    integers: Vec<Integer>,
    synchronizations: Vec<SyncConstraint>,
}

impl SystemBuilder {
    fn register_process(&mut self, name: &str) -> Result<(), BuildError> {
        if self.processes.iter().any(|(p, _)| p == name) {
            return Err(BuildError::DuplicateProcess(String::from(name)));
        }
        self.processes
            .push((String::from(name), TimedAutomaton::new()));
        Ok(())
    }

    /// Clocks are not scoped per process at this layer, every automaton receives them.
    fn declare_clock(&mut self, name: &str, size: u32) -> Result<(), BuildError> {
        for (_, automaton) in &mut self.processes {
            if automaton.find_clock(name).is_some() {
                return Err(BuildError::DuplicateClock(String::from(name)));
            }
            automaton.push_clock(Clock::new(name, size));
        }
        Ok(())
    }

    fn declare_integer(&mut self, integer: Integer) -> Result<(), BuildError> {
        if self.integers.iter().any(|i| i.name() == integer.name()) {
            return Err(BuildError::DuplicateInteger(integer.name().clone()));
        }
        self.integers.push(integer);
        Ok(())
    }

    fn automaton_mut(
        &mut self,
        process: &str,
        item: impl FnOnce() -> String,
    ) -> Result<&mut TimedAutomaton, BuildError> {
        self.processes
            .iter_mut()
            .find(|(name, _)| name == process)
            .map(|(_, automaton)| automaton)
            .ok_or_else(|| BuildError::DanglingProcessReference {
                process: String::from(process),
                item: item(),
            })
    }

    fn add_location(
        &mut self,
        process: &str,
        name: &str,
        attributes: &[LocationAttribute],
    ) -> Result<(), BuildError> {
        let automaton = self.automaton_mut(process, || format!("Location '{name}'"))?;
        if automaton.find_location(name).is_some() {
            return Err(BuildError::DuplicateLocation {
                process: String::from(process),
                location: String::from(name),
            });
        }
        automaton.push_location(fold_location_attributes(name, attributes));
        Ok(())
    }

    fn add_edge(
        &mut self,
        process: &str,
        source: &str,
        target: &str,
        event: &str,
        attributes: &[EdgeAttribute],
    ) -> Result<(), BuildError> {
        let edge = || format!("{source} -> {target}");
        let automaton = self.automaton_mut(process, || format!("Edge '{}'", edge()))?;
        let resolve = |location: &str| {
            automaton
                .find_location(location)
                .ok_or_else(|| BuildError::DanglingLocationReference {
                    process: String::from(process),
                    location: String::from(location),
                    edge: edge(),
                })
        };
        let source_id = resolve(source)?;
        let target_id = resolve(target)?;

        let mut guard: Vec<FreeClause> = Vec::new();
        let mut reset: Vec<Clock> = Vec::new();
        let mut statements: Vec<FreeClause> = Vec::new();
        for attr in attributes {
            match attr {
                EdgeAttribute::Provided(constraints) => {
                    guard.extend(constraints.iter().map(to_free_clause))
                }
                EdgeAttribute::Do(maths) => {
                    for stmt in maths {
                        match as_clock_reset(automaton, stmt) {
                            Some(clock) => reset.push(clock.clone()),
                            None => statements.push(FreeClause::new(&stmt.to_string())),
                        }
                    }
                }
            }
        }

        let sw = Switch::new(
            source_id,
            ClockConstraint::from_free_clauses(guard),
            event,
            reset,
            target_id,
        )
        .with_statement(SwitchStatement::new(statements));
        automaton.push_switch(sw);
        Ok(())
    }

    fn add_sync(&mut self, participants: &[SyncParticipant]) {
        let syncs = participants
            .iter()
            .map(|p| Sync::new(&p.process, &p.event, p.is_weak()))
            .collect();
        self.synchronizations.push(SyncConstraint::new(syncs));
    }

    fn finish(self, name: &str) -> System {
        let processes = self
            .processes
            .into_iter()
            .map(|(process, automaton)| Process::new(&process, automaton))
            .collect();
        System::new(name, processes, self.integers, self.synchronizations)
    }
}

/// Attributes are applied left to right; a later layout or label list replaces an
/// earlier one, invariant constraints accumulate.
fn fold_location_attributes(name: &str, attributes: &[LocationAttribute]) -> Location {
    let mut is_initial = false;
    let mut urgent = false;
    let mut committed = false;
    let mut invariant: Vec<FreeClause> = Vec::new();
    let mut layout: Option<(f64, f64)> = None;
    let mut labels: Option<Vec<String>> = None;

    for attr in attributes {
        match attr {
            LocationAttribute::Initial => is_initial = true,
            LocationAttribute::Invariant(constraints) => {
                invariant.extend(constraints.iter().map(to_free_clause))
            }
            LocationAttribute::Layout { x, y } => layout = Some((*x, *y)),
            LocationAttribute::Labels(list) => labels = Some(list.clone()),
            LocationAttribute::Committed => committed = true,
            LocationAttribute::Urgent => urgent = true,
        }
    }

    let invariant = ClockConstraint::from_free_clauses(invariant);
    let mut location = Location::new(name, is_initial, invariant)
        .with_urgent(urgent)
        .with_committed(committed);
    if let Some(list) = labels {
        location = location.with_labels(list);
    }
    if let Some((x, y)) = layout {
        location = location.with_layout(x, y);
    }
    location
}

fn to_free_clause(constraint: &Constraint) -> FreeClause {
    FreeClause::new(&constraint.to_string())
}

/// `c = 0` is a reset only if `c` is a clock of the automaton owning the edge.
fn as_clock_reset<'a>(automaton: &'a TimedAutomaton, stmt: &Statement) -> Option<&'a Clock> {
    match stmt {
        Statement::Assignment { lhs, set, rhs } if set.trim() == "=" && rhs.is_zero() => {
            automaton.find_clock(lhs.trim())
        }
        _ => None,
    }
}
