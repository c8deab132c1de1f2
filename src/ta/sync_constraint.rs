use serde::{Deserialize, Serialize};

/// One participant of a synchronization: `process@event`, optionally weak (`?`).
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sync {
    process: String,
    event: String,
    weak_synchronisation: bool,
}

impl Sync {
    pub fn new(process: &str, event: &str, weak_synchronisation: bool) -> Self {
        Self {
            process: String::from(process),
            event: String::from(event),
            weak_synchronisation,
        }
    }

    pub fn process(&self) -> &String {
        &self.process
    }

    pub fn event(&self) -> &String {
        &self.event
    }

    pub fn is_weak(&self) -> bool {
        self.weak_synchronisation
    }
}

/// Events of several processes that have to fire together.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SyncConstraint {
    syncs: Vec<Sync>,
}

impl SyncConstraint {
    pub fn new(syncs: Vec<Sync>) -> Self {
        Self { syncs }
    }

    pub fn syncs(&self) -> &Vec<Sync> {
        &self.syncs
    }
}
