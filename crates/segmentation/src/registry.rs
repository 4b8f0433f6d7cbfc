//! Saved segments, held in memory.

use audience_core::{AudienceError, AudienceResult, Customer, CustomerField};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::builder::SegmentBuilder;
use crate::engine::SegmentFilterEngine;
use crate::predicates::{ComparisonOperator, Condition};

/// A named, saved set of filter conditions defining an audience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub conditions: Vec<Condition>,
    /// Matching customers when the segment was last evaluated.
    pub audience_size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

pub struct SegmentRegistry {
    engine: SegmentFilterEngine,
    segments: DashMap<Uuid, Segment>,
}

impl SegmentRegistry {
    pub fn new(engine: SegmentFilterEngine) -> Self {
        Self {
            engine,
            segments: DashMap::new(),
        }
    }

    /// Registry pre-populated with the demo segments.
    pub fn with_demo_segments(engine: SegmentFilterEngine) -> Self {
        let registry = Self::new(engine);
        registry.seed_demo_data();
        info!(segments = registry.segments.len(), "Segment registry seeded");
        registry
    }

    pub fn engine(&self) -> &SegmentFilterEngine {
        &self.engine
    }

    pub fn create_segment(
        &self,
        name: &str,
        conditions: Vec<Condition>,
        customers: &[Customer],
    ) -> AudienceResult<Segment> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AudienceError::Validation("Segment name is required".into()));
        }

        let audience_size = self.engine.audience_size(customers, &conditions) as u64;
        let segment = conditions
            .into_iter()
            .fold(SegmentBuilder::new(name), SegmentBuilder::condition)
            .build(audience_size);
        self.register_segment(segment.clone());
        info!(
            segment_id = %segment.id,
            name = %segment.name,
            audience_size,
            "Segment created"
        );
        Ok(segment)
    }

    pub fn register_segment(&self, segment: Segment) {
        self.segments.insert(segment.id, segment);
    }

    pub fn get_segment(&self, id: &Uuid) -> Option<Segment> {
        self.segments.get(id).map(|s| s.clone())
    }

    /// Case-insensitive lookup by name; the newest segment wins on duplicates.
    pub fn find_segment_by_name(&self, name: &str) -> Option<Segment> {
        let name = name.trim();
        self.list_segments()
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Newest first.
    pub fn list_segments(&self) -> Vec<Segment> {
        let mut segments: Vec<Segment> = self.segments.iter().map(|s| s.value().clone()).collect();
        segments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.name.cmp(&b.name)));
        segments
    }

    pub fn delete_segment(&self, id: &Uuid) -> bool {
        let removed = self.segments.remove(id).is_some();
        if removed {
            info!(segment_id = %id, "Segment deleted");
        }
        removed
    }

    /// Customers currently matching a saved segment.
    pub fn preview(&self, id: &Uuid, customers: &[Customer]) -> AudienceResult<Vec<Customer>> {
        let segment = self
            .segments
            .get(id)
            .ok_or_else(|| AudienceError::NotFound(format!("segment {id}")))?;
        Ok(self
            .engine
            .filter_customers(customers, &segment.conditions)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Re-evaluate the audience size against `customers`.
    pub fn refresh_audience(&self, id: &Uuid, customers: &[Customer]) -> AudienceResult<Segment> {
        let mut entry = self
            .segments
            .get_mut(id)
            .ok_or_else(|| AudienceError::NotFound(format!("segment {id}")))?;
        let segment = entry.value_mut();
        segment.audience_size = self.engine.audience_size(customers, &segment.conditions) as u64;
        segment.updated_at = Utc::now();
        Ok(segment.clone())
    }

    fn seed_demo_data(&self) {
        let seeds = [
            (
                "High Spenders",
                Condition::new(CustomerField::TotalSpend, ComparisonOperator::GreaterThan, "500"),
                120,
            ),
            (
                "Frequent Visitors",
                Condition::new(CustomerField::Visits, ComparisonOperator::GreaterThanOrEqual, "10"),
                200,
            ),
            (
                "Loyal Customers",
                Condition::new(CustomerField::LastVisitMonths, ComparisonOperator::LessThanOrEqual, "1"),
                150,
            ),
        ];
        for (name, condition, audience_size) in seeds {
            self.register_segment(
                SegmentBuilder::new(name)
                    .condition(condition)
                    .tag("demo")
                    .build(audience_size),
            );
        }
    }
}

impl Default for SegmentRegistry {
    fn default() -> Self {
        Self::new(SegmentFilterEngine::default())
    }
}
