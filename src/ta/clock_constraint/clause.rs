use crate::ta::clock::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum ClockComparator {
    LESSER,
    LEQ,
    GEQ,
    GREATER,
}

impl Display for ClockComparator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ClockComparator::LESSER => "<",
            ClockComparator::LEQ => "<=",
            ClockComparator::GEQ => ">=",
            ClockComparator::GREATER => ">",
        };
        write!(f, "{symbol}")
    }
}

/// A clause comparing a declared clock against a constant.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Clause {
    lhs: Clock,
    op: ClockComparator,
    rhs: u32,
}

impl Clause {
    pub fn new(lhs: &Clock, op: ClockComparator, rhs: u32) -> Self {
        Self {
            lhs: lhs.clone(),
            op,
            rhs,
        }
    }

    pub fn lhs(&self) -> &Clock {
        &self.lhs
    }

    pub fn op(&self) -> ClockComparator {
        self.op
    }

    pub fn rhs(&self) -> u32 {
        self.rhs
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.lhs, self.op, self.rhs)
    }
}

/// A clause kept verbatim because it does not reduce to the structured shape.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct FreeClause {
    term: String,
}

impl FreeClause {
    pub fn new(term: &str) -> Self {
        Self {
            term: String::from(term),
        }
    }

    pub fn term(&self) -> &String {
        &self.term
    }
}

impl Display for FreeClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.term)
    }
}
