use serde::{Deserialize, Serialize};
use tracing::warn;

/// A simulation state as reported by the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawState {
    pub intval: String,
    pub labels: String,
    pub vloc: String,
    pub zone: String,
}

/// Description of the transition leading to a next state. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTransition {
    pub guard: String,
    pub reset: String,
    pub src_invariant: String,
    pub sync: String,
    pub tgt_invariant: String,
    pub vedge: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextState {
    pub status: i64,
    pub state: RawState,
    pub transition: RawTransition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerValue {
    pub name: String,
    pub value: String,
}

/// A [`RawState`] split into its displayable parts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    pub integer_values: Vec<IntegerValue>,
    pub labels: Vec<String>,
    /// One location per process, in process declaration order.
    pub locations: Vec<String>,
    pub zone: String,
}

impl RawState {
    /// Never fails: malformed integer assignments are logged and left out.
    pub fn parse(&self) -> SimulationState {
        SimulationState {
            integer_values: parse_intval(&self.intval),
            labels: parse_labels(&self.labels),
            locations: parse_vloc(&self.vloc),
            zone: self.zone.trim().to_string(),
        }
    }
}

fn parse_intval(intval: &str) -> Vec<IntegerValue> {
    if intval.trim().is_empty() {
        return Vec::new();
    }
    intval
        .split(',')
        .filter_map(|pair| {
            let parts: Vec<&str> = pair.split('=').map(str::trim).collect();
            match parts.as_slice() {
                [name, value] if !name.is_empty() && !value.is_empty() => Some(IntegerValue {
                    name: name.to_string(),
                    value: value.to_string(),
                }),
                _ => {
                    warn!(pair = %pair, "invalid integer value format");
                    None
                }
            }
        })
        .collect()
}

fn parse_labels(labels: &str) -> Vec<String> {
    labels
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(String::from)
        .collect()
}

fn parse_vloc(vloc: &str) -> Vec<String> {
    let trimmed = vloc.trim();
    let inner = strip_brackets(trimmed, '(', ')')
        .or_else(|| strip_brackets(trimmed, '<', '>'))
        .unwrap_or(trimmed);
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|loc| loc.trim().to_string()).collect()
}

fn strip_brackets(text: &str, open: char, close: char) -> Option<&str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn parse_splits_integer_values() {
        // given
        let raw = RawState {
            intval: String::from("x=1, y=2"),
            ..RawState::default()
        };

        // when
        let state = raw.parse();

        // then
        assert_eq!(
            state.integer_values,
            vec![integer("x", "1"), integer("y", "2")]
        );
    }

    #[test]
    #[traced_test]
    fn parse_drops_malformed_integer_values_with_warning() {
        // given
        let raw = RawState {
            intval: String::from("x=1,bad,y=2,=3,z=1=2"),
            ..RawState::default()
        };

        // when
        let state = raw.parse();

        // then
        assert_eq!(
            state.integer_values,
            vec![integer("x", "1"), integer("y", "2")]
        );
        assert!(logs_contain("invalid integer value format"));
    }

    #[test]
    #[traced_test]
    fn parse_accepts_empty_intval_silently() {
        // given
        let raw = RawState::default();

        // when
        let state = raw.parse();

        // then
        assert!(state.integer_values.is_empty());
        assert!(!logs_contain("invalid integer value format"));
    }

    #[test]
    fn parse_trims_labels_and_removes_empty_entries() {
        // given
        let raw = RawState {
            labels: String::from(" green, ,red ,"),
            ..RawState::default()
        };

        // when
        let state = raw.parse();

        // then
        assert_eq!(state.labels, vec!["green", "red"]);
    }

    #[test]
    fn parse_strips_outer_parentheses_of_vloc() {
        // given
        let raw = RawState {
            vloc: String::from("(l0, m1,n2)"),
            ..RawState::default()
        };

        // when
        let state = raw.parse();

        // then
        assert_eq!(state.locations, vec!["l0", "m1", "n2"]);
    }

    #[test]
    fn parse_strips_angle_brackets_of_vloc() {
        // given
        let raw = RawState {
            vloc: String::from("<l0,m1>"),
            ..RawState::default()
        };

        // when
        let state = raw.parse();

        // then
        assert_eq!(state.locations, vec!["l0", "m1"]);
    }

    #[test]
    fn parse_passes_zone_through_trimmed() {
        // given
        let raw = RawState {
            zone: String::from("  (0<=x && x<=5)\n"),
            vloc: String::from("()"),
            ..RawState::default()
        };

        // when
        let state = raw.parse();

        // then
        assert_eq!(state.zone, "(0<=x && x<=5)");
        assert!(state.locations.is_empty());
    }

    #[test]
    fn next_state_deserializes_from_engine_json() {
        // given
        let json = r#"{
            "status": 1,
            "state": { "intval": "i=0", "labels": "", "vloc": "<l0>", "zone": "(x==0)" },
            "transition": { "guard": "", "reset": "x=0", "src_invariant": "",
                            "sync": "", "tgt_invariant": "", "vedge": "<P@a>" }
        }"#;

        // when
        let next: NextState = serde_json::from_str(json).unwrap();

        // then
        assert_eq!(next.status, 1);
        assert_eq!(next.state.vloc, "<l0>");
        assert_eq!(next.transition.vedge, "<P@a>");
    }

    fn integer(name: &str, value: &str) -> IntegerValue {
        IntegerValue {
            name: String::from(name),
            value: String::from(value),
        }
    }
}
