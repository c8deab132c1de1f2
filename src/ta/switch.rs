use crate::ta::LocationId;
use crate::ta::clock::Clock;
use crate::ta::clock_constraint::{ClockConstraint, deserialize_non_empty};
use crate::ta::clock_constraint::clause::FreeClause;
use crate::util::vecs_eq_without_order;
use serde::{Deserialize, Deserializer, Serialize};

/// Side effects of a switch that are not clock resets, in source order.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SwitchStatement {
    #[serde(default)]
    statements: Vec<FreeClause>,
}

impl SwitchStatement {
    /// Returns `None` when there is nothing to execute.
    pub fn new(statements: Vec<FreeClause>) -> Option<Self> {
        if statements.is_empty() {
            return None;
        }
        Some(Self { statements })
    }

    pub fn statements(&self) -> &Vec<FreeClause> {
        &self.statements
    }
}

fn deserialize_statement<'de, D>(deserializer: D) -> Result<Option<SwitchStatement>, D::Error>
where
    D: Deserializer<'de>,
{
    let statement = Option::<SwitchStatement>::deserialize(deserializer)?;
    Ok(statement.and_then(|s| SwitchStatement::new(s.statements)))
}

/// An edge of an automaton. Endpoints index into the owning automaton's locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Switch {
    source: LocationId,
    #[serde(
        default,
        deserialize_with = "deserialize_non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    guard: Option<ClockConstraint>,
    action_label: String,
    reset: Vec<Clock>,
    #[serde(
        default,
        deserialize_with = "deserialize_statement",
        skip_serializing_if = "Option::is_none"
    )]
    statement: Option<SwitchStatement>,
    target: LocationId,
}

impl Switch {
    pub fn new(
        source: LocationId,
        guard: Option<ClockConstraint>,
        action: &str,
        reset: Vec<Clock>,
        target: LocationId,
    ) -> Self {
        Self {
            source,
            guard,
            action_label: String::from(action),
            reset,
            statement: None,
            target,
        }
    }

    pub fn with_statement(mut self, statement: Option<SwitchStatement>) -> Self {
        self.statement = statement;
        self
    }

    pub fn source(&self) -> LocationId {
        self.source
    }

    pub fn guard(&self) -> &Option<ClockConstraint> {
        &self.guard
    }

    pub fn action(&self) -> &String {
        &self.action_label
    }

    pub fn reset(&self) -> &Vec<Clock> {
        &self.reset
    }

    pub fn statement(&self) -> &Option<SwitchStatement> {
        &self.statement
    }

    pub fn target(&self) -> LocationId {
        self.target
    }
}

impl PartialEq<Self> for Switch {
    fn eq(&self, other: &Self) -> bool {
        self.action_label == other.action_label
            && vecs_eq_without_order(&self.reset, &other.reset)
            && self.guard == other.guard
            && self.statement == other.statement
            && self.source == other.source
            && self.target == other.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ta::clock_constraint::clause::{Clause, ClockComparator};

    #[test]
    fn new_returns_correct_switch_when_called() {
        // given
        let clause = Clause::new(&Clock::scalar("x"), ClockComparator::LESSER, 42);
        let cc = ClockConstraint::new(vec![clause], Vec::new());
        let reset = vec![Clock::scalar("clock0"), Clock::scalar("clock1")];

        // when
        let result = Switch::new(
            LocationId::new(0),
            cc.clone(),
            "action",
            reset.clone(),
            LocationId::new(1),
        );

        // then
        assert_eq!(result.source(), LocationId::new(0));
        assert_eq!(result.guard, cc);
        assert_eq!(result.action(), "action");
        assert_eq!(result.reset, reset);
        assert_eq!(result.statement, None);
        assert_eq!(result.target(), LocationId::new(1));
    }

    #[test]
    fn switch_statement_new_returns_none_when_empty() {
        // when / then
        assert_eq!(SwitchStatement::new(Vec::new()), None);
    }

    #[test]
    fn eq_ignores_order_of_reset_clocks() {
        // given
        let sw0 = gen_switch();
        let sw1 = Switch {
            reset: vec![Clock::scalar("y"), Clock::scalar("x")],
            ..gen_switch()
        };

        // when / then
        assert_eq!(sw0, sw1);
    }

    #[test]
    fn eq_returns_false_when_targets_are_different() {
        // given
        let sw0 = gen_switch();
        let sw1 = Switch {
            target: LocationId::new(7),
            ..gen_switch()
        };

        // when / then
        assert_ne!(sw0, sw1);
    }

    #[test]
    fn eq_returns_false_when_statements_are_different() {
        // given
        let sw0 = gen_switch();
        let sw1 = gen_switch().with_statement(SwitchStatement::new(vec![FreeClause::new("i=1")]));

        // when / then
        assert_ne!(sw0, sw1);
    }

    #[test]
    fn serialize_omits_absent_guard_and_statement() {
        // given
        let sw = Switch::new(LocationId::new(0), None, "a", Vec::new(), LocationId::new(0));

        // when
        let json = serde_json::to_value(&sw).unwrap();

        // then
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("guard"));
        assert!(!obj.contains_key("statement"));
        assert_eq!(obj["actionLabel"], serde_json::json!("a"));
    }

    #[test]
    fn deserialize_treats_empty_guard_and_statement_as_absent() {
        // given
        let json = serde_json::json!({
            "source": 0,
            "guard": {},
            "actionLabel": "a",
            "reset": [],
            "statement": { "statements": [] },
            "target": 1
        });

        // when
        let sw: Switch = serde_json::from_value(json).unwrap();

        // then
        assert_eq!(sw.guard(), &None);
        assert_eq!(sw.statement(), &None);
        let round_trip = serde_json::to_value(&sw).unwrap();
        let obj = round_trip.as_object().unwrap();
        assert!(!obj.contains_key("guard"));
        assert!(!obj.contains_key("statement"));
    }

    #[test]
    fn deserialize_keeps_non_empty_statement() {
        // given
        let json = serde_json::json!({
            "source": 0,
            "actionLabel": "a",
            "reset": [],
            "statement": { "statements": [{ "term": "i=1" }] },
            "target": 0
        });

        // when
        let sw: Switch = serde_json::from_value(json).unwrap();

        // then
        assert_eq!(
            sw.statement(),
            &SwitchStatement::new(vec![FreeClause::new("i=1")])
        );
    }

    fn gen_switch() -> Switch {
        let clock_x = Clock::scalar("x");
        let clock_y = Clock::scalar("y");
        let clause = Clause::new(&clock_x, ClockComparator::LEQ, 42);
        let cc = ClockConstraint::new(vec![clause], Vec::new());
        Switch::new(
            LocationId::new(0),
            cc,
            "action",
            vec![clock_x, clock_y],
            LocationId::new(1),
        )
    }
}
