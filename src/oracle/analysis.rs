//! Verification requests and the statistics the engine reports for them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrder {
    Dfs,
    Bfs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachabilityAlgorithm {
    Reach,
    Concur19,
    Covreach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachabilityCertificate {
    Graph,
    Symbolic,
    Concrete,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessAlgorithm {
    Couvscc,
    Ndfs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessCertificate {
    Graph,
    Symbolic,
}

// The engine receives option values as their declaration index.
macro_rules! option_index {
    ($($ty:ty),*) => {
        $(impl $ty {
            pub fn index(self) -> u8 {
                self as u8
            }
        })*
    };
}

option_index!(
    SearchOrder,
    ReachabilityAlgorithm,
    ReachabilityCertificate,
    LivenessAlgorithm,
    LivenessCertificate
);

/// Body of a reachability or liveness request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    pub sysdecl: String,
    pub algorithm: u8,
    pub search_order: u8,
    pub certificate: u8,
    pub labels: String,
    pub block_size: Option<u32>,
    pub table_size: Option<u32>,
}

impl CheckRequest {
    pub fn reachability(
        sysdecl: String,
        algorithm: ReachabilityAlgorithm,
        search_order: SearchOrder,
        certificate: ReachabilityCertificate,
        labels: &[String],
    ) -> Self {
        Self {
            sysdecl,
            algorithm: algorithm.index(),
            search_order: search_order.index(),
            certificate: certificate.index(),
            labels: labels.join(","),
            block_size: None,
            table_size: None,
        }
    }

    pub fn liveness(
        sysdecl: String,
        algorithm: LivenessAlgorithm,
        search_order: SearchOrder,
        certificate: LivenessCertificate,
        labels: &[String],
    ) -> Self {
        Self {
            sysdecl,
            algorithm: algorithm.index(),
            search_order: search_order.index(),
            certificate: certificate.index(),
            labels: labels.join(","),
            block_size: None,
            table_size: None,
        }
    }

    pub fn with_sizes(mut self, block_size: Option<u32>, table_size: Option<u32>) -> Self {
        self.block_size = block_size;
        self.table_size = table_size;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareRequest {
    pub first_sysdecl: String,
    pub second_sysdecl: String,
    pub block_size: Option<u32>,
    pub table_size: Option<u32>,
    pub relationship: u8,
}

impl CompareRequest {
    pub fn new(first_sysdecl: String, second_sysdecl: String) -> Self {
        Self {
            first_sysdecl,
            second_sysdecl,
            block_size: None,
            table_size: None,
            relationship: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynchronizedProductRequest {
    pub sysdecl: String,
    pub process_name: String,
}

/// Raw answer to a reachability, liveness or compare request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckResponse {
    pub stats: String,
    pub certificate: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityStats {
    pub reachable: bool,
    pub visited_states: u64,
    pub visited_transitions: u64,
    pub running_time_seconds: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessStats {
    pub cycle: bool,
    pub visited_states: u64,
    pub visited_transitions: u64,
    pub running_time_seconds: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareStats {
    pub relationship_fulfilled: bool,
    pub visited_pair_of_states: u64,
    pub running_time_seconds: String,
}

/// Stats come as `KEY value` lines; anything else is ignored.
fn parse_stats(stats: &str) -> HashMap<&str, &str> {
    stats
        .lines()
        .filter_map(|line| {
            let mut parts = line.split(' ').map(str::trim);
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => {
                    Some((key, value))
                }
                _ => None,
            }
        })
        .collect()
}

fn flag(stats: &HashMap<&str, &str>, key: &str) -> bool {
    stats.get(key) == Some(&"true")
}

fn count(stats: &HashMap<&str, &str>, key: &str) -> u64 {
    stats
        .get(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

fn running_time(stats: &HashMap<&str, &str>) -> String {
    stats
        .get("RUNNING_TIME_SECONDS")
        .map_or_else(|| String::from("0"), |value| value.to_string())
}

impl ReachabilityStats {
    pub fn parse(stats: &str) -> Self {
        let stats = parse_stats(stats);
        Self {
            reachable: flag(&stats, "REACHABLE"),
            visited_states: count(&stats, "VISITED_STATES"),
            visited_transitions: count(&stats, "VISITED_TRANSITIONS"),
            running_time_seconds: running_time(&stats),
        }
    }
}

impl LivenessStats {
    pub fn parse(stats: &str) -> Self {
        let stats = parse_stats(stats);
        Self {
            cycle: flag(&stats, "CYCLE"),
            visited_states: count(&stats, "VISITED_STATES"),
            visited_transitions: count(&stats, "VISITED_TRANSITIONS"),
            running_time_seconds: running_time(&stats),
        }
    }
}

impl CompareStats {
    pub fn parse(stats: &str) -> Self {
        let stats = parse_stats(stats);
        Self {
            relationship_fulfilled: flag(&stats, "RELATIONSHIP_FULFILLED"),
            visited_pair_of_states: count(&stats, "VISITED_PAIR_OF_STATES"),
            running_time_seconds: running_time(&stats),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyntaxCheckResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxCheckOutcome {
    pub success: bool,
    pub messages: Vec<String>,
}

impl From<SyntaxCheckResponse> for SyntaxCheckOutcome {
    fn from(response: SyntaxCheckResponse) -> Self {
        let messages = response
            .message
            .lines()
            .filter(|line| {
                let lower = line.to_lowercase();
                !line.trim().is_empty() && !lower.contains("warning") && !lower.contains("error(s)")
            })
            .map(String::from)
            .collect();
        Self {
            success: response.status == "success",
            messages,
        }
    }
}
