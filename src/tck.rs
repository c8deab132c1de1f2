//! Rendering of a [`System`] into the declaration format read by the analysis engine.

use crate::error::BuildError;
use crate::ta::TimedAutomaton;
use crate::ta::clock::Clock;
use crate::ta::location::Location;
use crate::ta::switch::Switch;
use crate::ta::system::System;
use crate::util::dedup_keep_first;
use std::fmt::Write;

/// Produces the `sysdecl` text sent along with every engine request.
///
/// Systems that cannot be rendered faithfully are rejected, never truncated.
pub trait SystemSerializer {
    fn serialize(&self, system: &System) -> Result<String, BuildError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TckWriter;

impl SystemSerializer for TckWriter {
    fn serialize(&self, system: &System) -> Result<String, BuildError> {
        let mut out = String::new();
        let _ = writeln!(out, "system:{}", system.name());

        for event in collect_events(system) {
            let _ = writeln!(out, "event:{event}");
        }
        for clock in collect_clocks(system) {
            let _ = writeln!(out, "clock:{}:{}", clock.size(), clock.name());
        }
        for int in system.integers() {
            let _ = writeln!(
                out,
                "int:{}:{}:{}:{}:{}",
                int.size(),
                int.min(),
                int.max(),
                int.init(),
                int.name()
            );
        }

        for process in system.processes() {
            let name = process.name();
            let ta = process.automaton();
            let _ = writeln!(out, "process:{name}");
            for loc in ta.locations() {
                let attrs = location_attributes(loc);
                let _ = writeln!(out, "location:{name}:{}{attrs}", loc.name());
            }
            for sw in ta.switches() {
                let _ = writeln!(out, "{}", edge_line(name, ta, sw)?);
            }
        }

        for constraint in system.synchronizations() {
            let participants: Vec<String> = constraint
                .syncs()
                .iter()
                .map(|sync| {
                    let weak = if sync.is_weak() { "?" } else { "" };
                    format!("{}@{}{weak}", sync.process(), sync.event())
                })
                .collect();
            let _ = writeln!(out, "sync:{}", participants.join(":"));
        }

        Ok(out)
    }
}

fn collect_events(system: &System) -> Vec<&String> {
    let actions = system
        .processes()
        .iter()
        .flat_map(|p| p.automaton().switches())
        .map(|sw| sw.action());
    let synced = system
        .synchronizations()
        .iter()
        .flat_map(|c| c.syncs())
        .map(|sync| sync.event());
    dedup_keep_first(actions.chain(synced))
}

fn collect_clocks(system: &System) -> Vec<&Clock> {
    dedup_keep_first(
        system
            .processes()
            .iter()
            .flat_map(|p| p.automaton().clocks()),
    )
}

fn location_attributes(loc: &Location) -> String {
    let mut attrs: Vec<String> = Vec::new();
    if loc.is_initial() {
        attrs.push(String::from("initial:"));
    }
    if let Some(invariant) = loc.invariant() {
        attrs.push(format!("invariant: {invariant}"));
    }
    if let Some(labels) = loc.labels() {
        attrs.push(format!("labels: {}", labels.join(",")));
    }
    if loc.is_committed() {
        attrs.push(String::from("committed:"));
    }
    if loc.is_urgent() {
        attrs.push(String::from("urgent:"));
    }
    if loc.is_layout_fixed() {
        let (x, y) = loc.coordinates();
        attrs.push(format!("layout: {x},{y}"));
    }
    braced(attrs)
}

fn edge_line(process: &str, ta: &TimedAutomaton, sw: &Switch) -> Result<String, BuildError> {
    let dangling = || BuildError::DanglingSwitchEndpoint {
        process: String::from(process),
        action: sw.action().clone(),
    };
    let source = ta.source_of(sw).ok_or_else(dangling)?.name();
    let target = ta.target_of(sw).ok_or_else(dangling)?.name();

    let mut attrs: Vec<String> = Vec::new();
    if let Some(guard) = sw.guard() {
        attrs.push(format!("provided: {guard}"));
    }
    let effects: Vec<String> = sw
        .reset()
        .iter()
        .map(|clock| format!("{clock}=0"))
        .chain(
            sw.statement()
                .iter()
                .flat_map(|stmt| stmt.statements())
                .map(|clause| clause.to_string()),
        )
        .collect();
    if !effects.is_empty() {
        attrs.push(format!("do: {}", effects.join(";")));
    }

    Ok(format!(
        "edge:{process}:{source}:{target}:{}{}",
        sw.action(),
        braced(attrs)
    ))
}

fn braced(attrs: Vec<String>) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    format!("{{{}}}", attrs.join(" : "))
}
