pub mod aggregate;
pub mod density;
pub mod feasibility;
pub mod hotness;
pub mod monetization;
pub mod pipeline;
pub mod record;
pub mod risk;
pub mod velocity;

pub use aggregate::{AggregateScorer, Dimensions};
pub use density::density;
pub use feasibility::feasibility;
pub use hotness::hotness;
pub use monetization::monetization;
pub use pipeline::TrendScorer;
pub use record::ScoreRecord;
pub use velocity::{VelocityScorer, NEUTRAL_VELOCITY};
