use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }

    /// Whether a downstream agent should act on the trend now.
    pub fn agent_ready(self) -> bool {
        matches!(self, Priority::P0 | Priority::P1)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrioritySignals {
    pub trend_score: u8,
    pub monetization: f64,
    pub feasibility: f64,
}

/// Minimum score, monetization and feasibility for a priority level.
pub struct PriorityRule {
    pub label: Priority,
    pub min_score: u8,
    pub min_monetization: f64,
    pub min_feasibility: f64,
}

impl PriorityRule {
    pub fn matches(&self, signals: &PrioritySignals) -> bool {
        signals.trend_score >= self.min_score
            && signals.monetization >= self.min_monetization
            && signals.feasibility >= self.min_feasibility
    }
}

pub const PRIORITY_RULES: &[PriorityRule] = &[
    PriorityRule {
        label: Priority::P0,
        min_score: 85,
        min_monetization: 0.85,
        min_feasibility: 0.8,
    },
    PriorityRule {
        label: Priority::P1,
        min_score: 75,
        min_monetization: 0.70,
        min_feasibility: 0.6,
    },
    PriorityRule {
        label: Priority::P2,
        min_score: 60,
        min_monetization: 0.50,
        min_feasibility: 0.5,
    },
];

pub fn classify_priority(signals: &PrioritySignals) -> Priority {
    PRIORITY_RULES
        .iter()
        .find(|rule| rule.matches(signals))
        .map(|rule| rule.label)
        .unwrap_or(Priority::P3)
}
