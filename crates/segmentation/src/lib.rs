//! Audience segmentation: condition model, the segment filter engine,
//! and saved segments.

pub mod builder;
pub mod conditions;
pub mod engine;
pub mod parse;
pub mod predicates;
pub mod registry;

pub use builder::SegmentBuilder;
pub use conditions::{ConditionId, ConditionList, ConditionUpdate};
pub use engine::{
    filter_customers, matches_customer, ConditionOutcome, MatchTrace, SegmentFilterEngine,
    SkipReason,
};
pub use parse::parse_condition;
pub use predicates::{evaluate_condition, parse_threshold, ComparisonOperator, Condition, Logic};
pub use registry::{Segment, SegmentRegistry};
