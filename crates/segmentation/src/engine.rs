//! Segment filter engine: folds an ordered condition list over customer records.
//!
//! The fold starts at `true` and runs left to right. Each condition resolves to a
//! [`ConditionOutcome`]; skipped conditions leave the running result untouched,
//! everything else is combined with `AND` or `OR`. The logic attached to the
//! first condition is never applied.

use audience_core::{Customer, ZeroValuePolicy};
use serde::Serialize;
use tracing::debug;

use crate::predicates::{evaluate_condition, parse_threshold, Condition, Logic};

/// Why a condition did not contribute to the fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The condition has no field selected.
    FieldUnset,
    /// The customer has no value (or a NaN value) for the field.
    FieldAbsent,
    /// The customer's value is zero and zero is treated as absent.
    ZeroValue,
    /// The condition's value does not parse as a number.
    InvalidThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOutcome {
    /// The operator was applied.
    Matched(bool),
    /// Unrecognized or unset operator; the condition passes.
    AlwaysTrue,
    Skipped(SkipReason),
}

impl ConditionOutcome {
    /// The boolean folded into the running result, `None` for a skip.
    pub fn contribution(&self) -> Option<bool> {
        match self {
            ConditionOutcome::Matched(matched) => Some(*matched),
            ConditionOutcome::AlwaysTrue => Some(true),
            ConditionOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    pub position: usize,
    pub condition: Condition,
    pub outcome: ConditionOutcome,
    /// Running result after this step.
    pub accumulator: bool,
}

/// Step-by-step record of one customer's evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct MatchTrace {
    pub customer_id: String,
    pub steps: Vec<TraceStep>,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentFilterEngine {
    zero_policy: ZeroValuePolicy,
}

impl SegmentFilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zero_policy(zero_policy: ZeroValuePolicy) -> Self {
        Self { zero_policy }
    }

    pub fn zero_policy(&self) -> ZeroValuePolicy {
        self.zero_policy
    }

    pub fn outcome(&self, customer: &Customer, condition: &Condition) -> ConditionOutcome {
        let Some(field) = condition.field else {
            return ConditionOutcome::Skipped(SkipReason::FieldUnset);
        };
        let value = match customer.field_value(field) {
            Some(v) if !v.is_nan() => v,
            _ => return ConditionOutcome::Skipped(SkipReason::FieldAbsent),
        };
        if value == 0.0 && self.zero_policy == ZeroValuePolicy::TreatAsAbsent {
            return ConditionOutcome::Skipped(SkipReason::ZeroValue);
        }
        let Some(threshold) = parse_threshold(&condition.value) else {
            return ConditionOutcome::Skipped(SkipReason::InvalidThreshold);
        };
        match condition.operator {
            Some(op) => ConditionOutcome::Matched(evaluate_condition(value, Some(op), threshold)),
            None => ConditionOutcome::AlwaysTrue,
        }
    }

    pub fn matches_customer(&self, customer: &Customer, conditions: &[Condition]) -> bool {
        conditions
            .iter()
            .enumerate()
            .fold(true, |acc, (position, condition)| {
                fold_step(acc, position, condition.logic, self.outcome(customer, condition))
            })
    }

    /// Matching customers in their original order.
    pub fn filter_customers<'a>(
        &self,
        customers: &'a [Customer],
        conditions: &[Condition],
    ) -> Vec<&'a Customer> {
        let matched: Vec<&Customer> = customers
            .iter()
            .filter(|customer| self.matches_customer(customer, conditions))
            .collect();
        debug!(
            customers = customers.len(),
            conditions = conditions.len(),
            matched = matched.len(),
            "Filtered customers"
        );
        matched
    }

    pub fn audience_size(&self, customers: &[Customer], conditions: &[Condition]) -> usize {
        customers
            .iter()
            .filter(|customer| self.matches_customer(customer, conditions))
            .count()
    }

    pub fn explain(&self, customer: &Customer, conditions: &[Condition]) -> MatchTrace {
        let mut acc = true;
        let mut steps = Vec::with_capacity(conditions.len());
        for (position, condition) in conditions.iter().enumerate() {
            let outcome = self.outcome(customer, condition);
            acc = fold_step(acc, position, condition.logic, outcome);
            steps.push(TraceStep {
                position,
                condition: condition.clone(),
                outcome,
                accumulator: acc,
            });
        }
        MatchTrace {
            customer_id: customer.id.clone(),
            steps,
            matched: acc,
        }
    }
}

fn fold_step(acc: bool, position: usize, logic: Logic, outcome: ConditionOutcome) -> bool {
    match outcome.contribution() {
        None => acc,
        Some(matched) if position > 0 && logic == Logic::Or => acc || matched,
        Some(matched) => acc && matched,
    }
}

/// [`SegmentFilterEngine::matches_customer`] with zero treated as absent.
pub fn matches_customer(customer: &Customer, conditions: &[Condition]) -> bool {
    SegmentFilterEngine::default().matches_customer(customer, conditions)
}

/// [`SegmentFilterEngine::filter_customers`] with zero treated as absent.
pub fn filter_customers<'a>(customers: &'a [Customer], conditions: &[Condition]) -> Vec<&'a Customer> {
    SegmentFilterEngine::default().filter_customers(customers, conditions)
}
