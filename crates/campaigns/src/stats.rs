use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// One personalized message sent (or attempted) to one customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationLog {
    pub customer_id: String,
    pub customer_name: String,
    pub message: String,
    pub status: DeliveryStatus,
    pub sent_at: DateTime<Utc>,
}

/// Every message one customer received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerHistory {
    pub customer_id: String,
    pub customer_name: String,
    pub logs: Vec<CommunicationLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub segment_id: Uuid,
    pub segment_name: String,
    pub message_template: String,
    pub logs: Vec<CommunicationLog>,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub fn statistics(&self) -> CampaignStatistics {
        CampaignStatistics::from_logs(&self.logs)
    }
}

/// Delivery statistics; rates are percentages rounded to two decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignStatistics {
    pub audience_size: u64,
    pub messages_sent: u64,
    pub messages_failed: u64,
    pub total_messages: u64,
    pub success_rate: f64,
    pub failure_rate: f64,
}

impl CampaignStatistics {
    /// `audience_size` counts distinct customers across the logs.
    pub fn from_logs<'a>(logs: impl IntoIterator<Item = &'a CommunicationLog>) -> Self {
        let mut audience = HashSet::new();
        let mut sent = 0u64;
        let mut failed = 0u64;
        for log in logs {
            audience.insert(log.customer_id.as_str());
            match log.status {
                DeliveryStatus::Sent => sent += 1,
                DeliveryStatus::Failed => failed += 1,
            }
        }
        let total = sent + failed;
        Self {
            audience_size: audience.len() as u64,
            messages_sent: sent,
            messages_failed: failed,
            total_messages: total,
            success_rate: percentage(sent, total),
            failure_rate: percentage(failed, total),
        }
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 10_000.0).round() / 100.0
}
