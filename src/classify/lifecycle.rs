use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Rising,
    Flash,
    Sustained,
    Evergreen,
    Declining,
    /// No rule matched.
    Stable,
}

impl Lifecycle {
    pub fn label(self) -> &'static str {
        match self {
            Lifecycle::Rising => "rising",
            Lifecycle::Flash => "flash",
            Lifecycle::Sustained => "sustained",
            Lifecycle::Evergreen => "evergreen",
            Lifecycle::Declining => "declining",
            Lifecycle::Stable => "stable",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifecycleSignals {
    pub hotness: f64,
    pub velocity: f64,
    pub density: f64,
}

pub struct LifecycleRule {
    pub label: Lifecycle,
    pub matches: fn(&LifecycleSignals) -> bool,
}

fn is_rising(s: &LifecycleSignals) -> bool {
    s.velocity >= 0.8
}

fn is_flash(s: &LifecycleSignals) -> bool {
    s.velocity >= 0.7 && s.hotness < 0.6
}

fn is_sustained(s: &LifecycleSignals) -> bool {
    s.velocity >= 0.6 && s.hotness >= 0.6
}

fn is_evergreen(s: &LifecycleSignals) -> bool {
    s.hotness >= 0.7 && s.density >= 0.6 && s.velocity < 0.8
}

fn is_declining(s: &LifecycleSignals) -> bool {
    s.velocity <= 0.2
}

pub const LIFECYCLE_RULES: &[LifecycleRule] = &[
    LifecycleRule {
        label: Lifecycle::Rising,
        matches: is_rising,
    },
    LifecycleRule {
        label: Lifecycle::Flash,
        matches: is_flash,
    },
    LifecycleRule {
        label: Lifecycle::Sustained,
        matches: is_sustained,
    },
    LifecycleRule {
        label: Lifecycle::Evergreen,
        matches: is_evergreen,
    },
    LifecycleRule {
        label: Lifecycle::Declining,
        matches: is_declining,
    },
];

pub fn classify_lifecycle(signals: &LifecycleSignals) -> Lifecycle {
    LIFECYCLE_RULES
        .iter()
        .find(|rule| (rule.matches)(signals))
        .map(|rule| rule.label)
        .unwrap_or(Lifecycle::Stable)
}
