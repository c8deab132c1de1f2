use crate::ta::clock::Clock;
use crate::ta::location::Location;
use crate::ta::switch::Switch;
use crate::util::vecs_eq_without_order;
use serde::{Deserialize, Serialize};

pub mod clock;
pub mod clock_constraint;
pub mod integer;
pub mod location;
pub mod switch;
pub mod sync_constraint;
pub mod system;

/// Index of a location inside the automaton that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(usize);

impl LocationId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

type NamedSwitch<'a> = (Option<&'a String>, &'a Switch, Option<&'a String>);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimedAutomaton {
    locations: Vec<Location>,
    clocks: Vec<Clock>,
    switches: Vec<Switch>,
}

impl TimedAutomaton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locations(&self) -> &Vec<Location> {
        &self.locations
    }

    pub fn clocks(&self) -> &Vec<Clock> {
        &self.clocks
    }

    pub fn switches(&self) -> &Vec<Switch> {
        &self.switches
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.index())
    }

    pub fn location_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        self.locations.get_mut(id.index())
    }

    pub fn find_location(&self, name: &str) -> Option<LocationId> {
        self.locations
            .iter()
            .position(|loc| loc.name() == name)
            .map(LocationId::new)
    }

    pub fn find_clock(&self, name: &str) -> Option<&Clock> {
        self.clocks.iter().find(|clock| clock.name() == name)
    }

    pub fn source_of(&self, sw: &Switch) -> Option<&Location> {
        self.location(sw.source())
    }

    pub fn target_of(&self, sw: &Switch) -> Option<&Location> {
        self.location(sw.target())
    }

    pub(crate) fn push_location(&mut self, location: Location) -> LocationId {
        self.locations.push(location);
        LocationId::new(self.locations.len() - 1)
    }

    pub(crate) fn push_clock(&mut self, clock: Clock) {
        self.clocks.push(clock);
    }

    pub(crate) fn push_switch(&mut self, sw: Switch) {
        self.switches.push(sw);
    }

    /// Switch endpoints resolved to names, so that comparisons do not depend on
    /// the order in which locations were registered.
    fn named_switches(&self) -> Vec<NamedSwitch<'_>> {
        self.switches
            .iter()
            .map(|sw| {
                (
                    self.source_of(sw).map(|loc| loc.name()),
                    sw,
                    self.target_of(sw).map(|loc| loc.name()),
                )
            })
            .collect()
    }
}

impl PartialEq<Self> for TimedAutomaton {
    fn eq(&self, other: &Self) -> bool {
        let mine = self.named_switches();
        let theirs = other.named_switches();

        vecs_eq_without_order(&self.clocks, &other.clocks)
            && vecs_eq_without_order(&self.locations, &other.locations)
            && mine.len() == theirs.len()
            && mine.iter().all(|a| theirs.iter().any(|b| same_named_switch(a, b)))
            && theirs.iter().all(|b| mine.iter().any(|a| same_named_switch(a, b)))
    }
}

fn same_named_switch(a: &NamedSwitch<'_>, b: &NamedSwitch<'_>) -> bool {
    a.0 == b.0
        && a.2 == b.2
        && a.1.action() == b.1.action()
        && vecs_eq_without_order(a.1.reset(), b.1.reset())
        && a.1.guard() == b.1.guard()
        && a.1.statement() == b.1.statement()
}
