//! Ordered, identifier-keyed list of conditions being edited for a segment.
//!
//! Positions shift when an entry is removed, so callers address entries by
//! [`ConditionId`] instead of index.

use audience_core::{AudienceError, AudienceResult, CustomerField};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::predicates::{ComparisonOperator, Condition, Logic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionId(Uuid);

impl ConditionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConditionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Partial update; `None` leaves the part unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionUpdate {
    pub field: Option<CustomerField>,
    pub operator: Option<ComparisonOperator>,
    pub value: Option<String>,
    pub logic: Option<Logic>,
}

impl ConditionUpdate {
    pub fn field(field: CustomerField) -> Self {
        Self {
            field: Some(field),
            ..Default::default()
        }
    }

    pub fn operator(operator: ComparisonOperator) -> Self {
        Self {
            operator: Some(operator),
            ..Default::default()
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn logic(logic: Logic) -> Self {
        Self {
            logic: Some(logic),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConditionList {
    ids: Vec<ConditionId>,
    conditions: Vec<Condition>,
}

impl ConditionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blank condition (no field, no operator, empty value, `AND`).
    pub fn add(&mut self) -> ConditionId {
        self.push(Condition::default())
    }

    pub fn push(&mut self, condition: Condition) -> ConditionId {
        let id = ConditionId::new();
        self.ids.push(id);
        self.conditions.push(condition);
        id
    }

    pub fn get(&self, id: ConditionId) -> Option<&Condition> {
        self.position(id).map(|i| &self.conditions[i])
    }

    pub fn position(&self, id: ConditionId) -> Option<usize> {
        self.ids.iter().position(|candidate| *candidate == id)
    }

    pub fn update(&mut self, id: ConditionId, update: ConditionUpdate) -> AudienceResult<&Condition> {
        let index = self
            .position(id)
            .ok_or_else(|| AudienceError::NotFound(format!("condition {id}")))?;
        let condition = &mut self.conditions[index];
        if let Some(field) = update.field {
            condition.field = Some(field);
        }
        if let Some(operator) = update.operator {
            condition.operator = Some(operator);
        }
        if let Some(value) = update.value {
            condition.value = value;
        }
        if let Some(logic) = update.logic {
            condition.logic = logic;
        }
        Ok(&*condition)
    }

    pub fn remove(&mut self, id: ConditionId) -> Option<Condition> {
        let index = self.position(id)?;
        self.ids.remove(index);
        Some(self.conditions.remove(index))
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Conditions in evaluation order.
    pub fn as_slice(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConditionId, &Condition)> {
        self.ids.iter().copied().zip(self.conditions.iter())
    }

    pub fn into_conditions(self) -> Vec<Condition> {
        self.conditions
    }
}

impl FromIterator<Condition> for ConditionList {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut list = ConditionList::new();
        for condition in iter {
            list.push(condition);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_update_remove() {
        let mut list = ConditionList::new();
        let first = list.add();
        let second = list.add();
        let third = list.add();
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(first), Some(&Condition::default()));

        list.update(third, ConditionUpdate::field(CustomerField::Visits)).unwrap();
        list.update(third, ConditionUpdate::operator(ComparisonOperator::GreaterThan))
            .unwrap();
        list.update(third, ConditionUpdate::value("10")).unwrap();
        list.update(third, ConditionUpdate::logic(Logic::Or)).unwrap();

        // Removing an earlier entry must not redirect later ids.
        assert!(list.remove(first).is_some());
        assert_eq!(list.position(second), Some(0));
        assert_eq!(list.position(third), Some(1));
        assert_eq!(
            list.get(third),
            Some(&Condition::new(CustomerField::Visits, ComparisonOperator::GreaterThan, "10").or())
        );
        assert!(list.get(first).is_none());
        assert!(list.remove(first).is_none());
    }

    #[test]
    fn test_update_unknown_id() {
        let mut list = ConditionList::new();
        let id = list.add();
        list.remove(id);
        let err = list.update(id, ConditionUpdate::value("5")).unwrap_err();
        assert!(matches!(err, AudienceError::NotFound(_)));
    }

    #[test]
    fn test_iteration_order() {
        let list: ConditionList = vec![
            Condition::new(CustomerField::TotalSpend, ComparisonOperator::GreaterThan, "100"),
            Condition::new(CustomerField::Visits, ComparisonOperator::LessThan, "5").or(),
        ]
        .into_iter()
        .collect();

        let fields: Vec<_> = list.iter().map(|(_, c)| c.field).collect();
        assert_eq!(fields, vec![Some(CustomerField::TotalSpend), Some(CustomerField::Visits)]);
        assert_eq!(list.as_slice().len(), 2);
    }
}
