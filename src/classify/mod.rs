//! Ordered rule tables mapping scored dimensions to categorical labels.
//!
//! Both classifiers evaluate their rules top-down and return the first match,
//! so the order of each table is part of its meaning.

pub mod lifecycle;
pub mod priority;

pub use lifecycle::{classify_lifecycle, Lifecycle, LifecycleRule, LifecycleSignals, LIFECYCLE_RULES};
pub use priority::{classify_priority, Priority, PriorityRule, PrioritySignals, PRIORITY_RULES};
