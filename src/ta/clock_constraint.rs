use crate::ta::clock_constraint::clause::{Clause, FreeClause};
use crate::util::vecs_eq_without_order;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

pub mod clause;

/// Conjunction of structured and free-form clauses.
///
/// An empty conjunction is not representable: callers treat the presence of a
/// constraint as "has invariant/guard", so absence is modelled with `Option`.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockConstraint {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    clauses: Vec<Clause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    free_clauses: Vec<FreeClause>,
}

impl ClockConstraint {
    /// Returns `None` when both clause lists are empty.
    pub fn new(clauses: Vec<Clause>, free_clauses: Vec<FreeClause>) -> Option<Self> {
        if clauses.is_empty() && free_clauses.is_empty() {
            return None;
        }
        Some(Self {
            clauses,
            free_clauses,
        })
    }

    pub fn from_free_clauses(free_clauses: Vec<FreeClause>) -> Option<Self> {
        Self::new(Vec::new(), free_clauses)
    }

    pub fn clauses(&self) -> &Vec<Clause> {
        &self.clauses
    }

    pub fn free_clauses(&self) -> &Vec<FreeClause> {
        &self.free_clauses
    }
}

/// Reads an optional constraint; an empty one counts as absent.
pub(crate) fn deserialize_non_empty<'de, D>(
    deserializer: D,
) -> Result<Option<ClockConstraint>, D::Error>
where
    D: Deserializer<'de>,
{
    let constraint = Option::<ClockConstraint>::deserialize(deserializer)?;
    Ok(constraint.and_then(|c| ClockConstraint::new(c.clauses, c.free_clauses)))
}

impl PartialEq<Self> for ClockConstraint {
    fn eq(&self, other: &Self) -> bool {
        vecs_eq_without_order(&self.clauses, &other.clauses)
            && vecs_eq_without_order(&self.free_clauses, &other.free_clauses)
    }
}

impl Display for ClockConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| clause.to_string())
            .chain(self.free_clauses.iter().map(|clause| clause.to_string()))
            .collect();
        write!(f, "{}", terms.join(" && "))
    }
}
