use crate::ta::TimedAutomaton;
use crate::ta::system::System;

/// Checks that have to hold before a system is handed to the analysis engine.
///
/// All failing checks are reported, not only the first one.
pub fn validate_system(system: &System) -> Result<(), Vec<String>> {
    let mut error_msgs: Vec<String> = Vec::new();

    if system.processes().is_empty() {
        error_msgs.push(String::from("The system does not declare any process."));
    }

    for process in system.processes() {
        if let Err(err_msg) = validate_init_loc_count(process.name(), process.automaton()) {
            error_msgs.push(err_msg);
        }
        error_msgs.extend(validate_switch_endpoints(process.name(), process.automaton()));
    }

    error_msgs.extend(validate_sync_processes(system));

    if error_msgs.is_empty() {
        return Ok(());
    }
    Err(error_msgs)
}

fn validate_init_loc_count(process: &str, ta: &TimedAutomaton) -> Result<(), String> {
    let has_initial = ta.locations().iter().any(|loc| loc.is_initial());
    if !has_initial {
        return Err(format!("Process '{process}' does not have an initial location."));
    }
    Ok(())
}

fn validate_switch_endpoints(process: &str, ta: &TimedAutomaton) -> Vec<String> {
    ta.switches()
        .iter()
        .filter(|sw| ta.source_of(sw).is_none() || ta.target_of(sw).is_none())
        .map(|sw| {
            format!(
                "Edge '{}' of process '{process}' refers to a location that does not exist.",
                sw.action()
            )
        })
        .collect()
}

fn validate_sync_processes(system: &System) -> Vec<String> {
    system
        .synchronizations()
        .iter()
        .flat_map(|constraint| constraint.syncs())
        .filter(|sync| system.process(sync.process()).is_none())
        .map(|sync| {
            format!(
                "Synchronization on '{}@{}' refers to an undeclared process.",
                sync.process(),
                sync.event()
            )
        })
        .collect()
}
