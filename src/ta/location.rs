use crate::ta::clock_constraint::{ClockConstraint, deserialize_non_empty};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    name: String,
    is_initial: bool,
    #[serde(default)]
    urgent: bool,
    #[serde(default)]
    committed: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    invariant: Option<ClockConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<String>>,
    #[serde(default)]
    x_coordinate: f64,
    #[serde(default)]
    y_coordinate: f64,
    /// Coordinates were given explicitly instead of being left to automatic layout.
    #[serde(default)]
    set_layout: bool,
}

impl Location {
    pub fn new(name: &str, is_initial: bool, invariant: Option<ClockConstraint>) -> Self {
        Self {
            name: String::from(name),
            is_initial,
            urgent: false,
            committed: false,
            invariant,
            labels: None,
            x_coordinate: 0.0,
            y_coordinate: 0.0,
            set_layout: false,
        }
    }

    pub fn with_urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    pub fn with_committed(mut self, committed: bool) -> Self {
        self.committed = committed;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_layout(mut self, x: f64, y: f64) -> Self {
        self.set_layout(x, y);
        self
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn invariant(&self) -> &Option<ClockConstraint> {
        &self.invariant
    }

    pub fn labels(&self) -> Option<&Vec<String>> {
        self.labels.as_ref()
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.x_coordinate, self.y_coordinate)
    }

    pub fn is_layout_fixed(&self) -> bool {
        self.set_layout
    }

    /// Pins the location to the given coordinates, e.g. after a drag or a layout settle.
    pub fn set_layout(&mut self, x: f64, y: f64) {
        self.x_coordinate = x;
        self.y_coordinate = y;
        self.set_layout = true;
    }
}
