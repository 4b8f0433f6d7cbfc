//! Segment builder: fluent API for constructing segment criteria.

use crate::conditions::ConditionList;
use crate::predicates::{ComparisonOperator, Condition, Logic};
use crate::registry::Segment;
use audience_core::CustomerField;
use uuid::Uuid;

pub struct SegmentBuilder {
    name: String,
    description: Option<String>,
    conditions: Vec<Condition>,
    tags: Vec<String>,
}

impl SegmentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            conditions: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(mut self, list: ConditionList) -> Self {
        self.conditions.extend(list.into_conditions());
        self
    }

    pub fn where_field(
        self,
        field: CustomerField,
        operator: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        self.condition(Condition::new(field, operator, value))
    }

    pub fn and_where(
        self,
        field: CustomerField,
        operator: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        self.where_field(field, operator, value)
    }

    pub fn or_where(
        self,
        field: CustomerField,
        operator: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        self.condition(Condition::new(field, operator, value).with_logic(Logic::Or))
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn criteria(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn build(self, audience_size: u64) -> Segment {
        let now = chrono::Utc::now();
        Segment {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            conditions: self.conditions,
            audience_size,
            created_at: now,
            updated_at: now,
            tags: self.tags,
        }
    }
}
