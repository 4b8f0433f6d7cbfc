//! Campaign service: sends personalized messages to a segment's audience
//! and keeps the resulting history in memory.

use std::collections::HashSet;
use std::sync::Arc;

use audience_core::{AudienceError, AudienceResult, Customer};
use audience_segmentation::Segment;
use chrono::{TimeZone, Utc};
use dashmap::DashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::delivery::DeliveryChannel;
use crate::message::personalize;
use crate::stats::{
    Campaign, CampaignStatistics, CommunicationLog, CustomerHistory, DeliveryStatus,
};

pub struct CampaignService {
    channel: Arc<dyn DeliveryChannel>,
    campaigns: DashMap<Uuid, Campaign>,
}

impl CampaignService {
    pub fn new(channel: Arc<dyn DeliveryChannel>) -> Self {
        info!(channel = channel.name(), "Campaign service initialized");
        Self {
            channel,
            campaigns: DashMap::new(),
        }
    }

    /// Send `template` to every recipient. A blank template is rejected
    /// before anything is sent.
    pub fn send<'a>(
        &self,
        segment: &Segment,
        recipients: impl IntoIterator<Item = &'a Customer>,
        template: &str,
    ) -> AudienceResult<Campaign> {
        if template.trim().is_empty() {
            return Err(AudienceError::Validation("Message cannot be empty".into()));
        }

        let logs: Vec<CommunicationLog> = recipients
            .into_iter()
            .map(|customer| {
                let message = personalize(template, customer);
                let status = self.channel.deliver(customer, &message);
                if status == DeliveryStatus::Failed {
                    warn!(customer_id = %customer.id, "Message delivery failed");
                }
                CommunicationLog {
                    customer_id: customer.id.clone(),
                    customer_name: customer.name.clone(),
                    message,
                    status,
                    sent_at: Utc::now(),
                }
            })
            .collect();

        let campaign = Campaign {
            id: Uuid::new_v4(),
            segment_id: segment.id,
            segment_name: segment.name.clone(),
            message_template: template.to_string(),
            logs,
            created_at: Utc::now(),
        };
        let stats = campaign.statistics();
        info!(
            campaign_id = %campaign.id,
            segment = %campaign.segment_name,
            sent = stats.messages_sent,
            failed = stats.messages_failed,
            "Campaign sent"
        );
        self.campaigns.insert(campaign.id, campaign.clone());
        Ok(campaign)
    }

    pub fn get_campaign(&self, id: &Uuid) -> Option<Campaign> {
        self.campaigns.get(id).map(|c| c.clone())
    }

    /// Newest first.
    pub fn list_campaigns(&self) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> = self.campaigns.iter().map(|c| c.value().clone()).collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        campaigns
    }

    pub fn campaigns_for_segment(&self, segment_id: &Uuid) -> Vec<Campaign> {
        self.list_campaigns()
            .into_iter()
            .filter(|c| &c.segment_id == segment_id)
            .collect()
    }

    pub fn statistics(&self, campaign_id: &Uuid) -> AudienceResult<CampaignStatistics> {
        self.campaigns
            .get(campaign_id)
            .map(|c| c.statistics())
            .ok_or_else(|| AudienceError::NotFound(format!("campaign {campaign_id}")))
    }

    /// Statistics across every campaign sent to the segment.
    pub fn segment_statistics(&self, segment_id: &Uuid) -> CampaignStatistics {
        let campaigns = self.campaigns_for_segment(segment_id);
        CampaignStatistics::from_logs(campaigns.iter().flat_map(|c| c.logs.iter()))
    }

    /// Every message a customer received, newest first.
    pub fn customer_history(&self, customer_id: &str) -> Vec<CommunicationLog> {
        let mut logs: Vec<CommunicationLog> = self
            .campaigns
            .iter()
            .flat_map(|c| {
                c.value()
                    .logs
                    .iter()
                    .filter(|log| log.customer_id == customer_id)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        logs.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        logs
    }

    /// Full message history of everyone the segment's campaigns reached,
    /// in order of first contact.
    pub fn recipient_histories(&self, segment_id: &Uuid) -> Vec<CustomerHistory> {
        let mut seen = HashSet::new();
        let mut recipients = Vec::new();
        let mut campaigns = self.campaigns_for_segment(segment_id);
        campaigns.reverse();
        for campaign in &campaigns {
            for log in &campaign.logs {
                if seen.insert(log.customer_id.clone()) {
                    recipients.push((log.customer_id.clone(), log.customer_name.clone()));
                }
            }
        }

        recipients
            .into_iter()
            .map(|(customer_id, customer_name)| CustomerHistory {
                logs: self.customer_history(&customer_id),
                customer_id,
                customer_name,
            })
            .collect()
    }

    /// Record the historical demo campaign for `segment`.
    pub fn seed_demo_history(&self, segment: &Segment) -> Campaign {
        let entries = [
            ("1", "Alice", "Hello Alice, check out our latest offers!", DeliveryStatus::Sent, (17, 12, 0)),
            ("2", "Bob", "Hello Bob, don't miss our discounts!", DeliveryStatus::Failed, (16, 10, 0)),
            ("3", "Charlie", "Hi Charlie, enjoy 20% off on your next purchase!", DeliveryStatus::Sent, (15, 8, 30)),
        ];
        let logs: Vec<CommunicationLog> = entries
            .into_iter()
            .map(|(id, name, message, status, (day, hour, minute))| CommunicationLog {
                customer_id: id.to_string(),
                customer_name: name.to_string(),
                message: message.to_string(),
                status,
                sent_at: Utc
                    .with_ymd_and_hms(2024, 11, day, hour, minute, 0)
                    .single()
                    .unwrap_or_else(Utc::now),
            })
            .collect();
        let created_at = logs.iter().map(|l| l.sent_at).min().unwrap_or_else(Utc::now);
        let campaign = Campaign {
            id: Uuid::new_v4(),
            segment_id: segment.id,
            segment_name: segment.name.clone(),
            message_template: "Hello [Name]".to_string(),
            logs,
            created_at,
        };
        self.campaigns.insert(campaign.id, campaign.clone());
        campaign
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{AlwaysDeliver, SimulatedChannel};
    use audience_core::demo::demo_customers;
    use audience_segmentation::{parse_condition, SegmentRegistry};

    fn high_spenders(customers: &[Customer]) -> (SegmentRegistry, Segment) {
        let registry = SegmentRegistry::default();
        let segment = registry
            .create_segment(
                "High Spenders",
                vec![parse_condition("totalSpend > 600").unwrap()],
                customers,
            )
            .unwrap();
        (registry, segment)
    }

    #[test]
    fn test_send_to_segment() {
        let customers = demo_customers();
        let (registry, segment) = high_spenders(&customers);
        let service = CampaignService::new(Arc::new(AlwaysDeliver));
        let recipients = registry.preview(&segment.id, &customers).unwrap();

        let campaign = service
            .send(&segment, &recipients, "Hi [Name], here's 10% off!")
            .unwrap();
        assert_eq!(campaign.logs.len(), 3);
        assert_eq!(campaign.logs[0].message, "Hi David, here's 10% off!");
        assert!(campaign.logs.iter().all(|l| l.status == DeliveryStatus::Sent));

        let stats = service.statistics(&campaign.id).unwrap();
        assert_eq!(stats.audience_size, 3);
        assert_eq!(stats.success_rate, 100.0);
        assert_eq!(stats.failure_rate, 0.0);
        assert_eq!(service.campaigns_for_segment(&segment.id).len(), 1);
    }

    #[test]
    fn test_blank_message_rejected() {
        let customers = demo_customers();
        let (_, segment) = high_spenders(&customers);
        let service = CampaignService::new(Arc::new(AlwaysDeliver));

        let err = service.send(&segment, &customers, "   ").unwrap_err();
        assert!(matches!(err, AudienceError::Validation(ref m) if m == "Message cannot be empty"));
        assert!(service.list_campaigns().is_empty());
    }

    #[test]
    fn test_failures_are_recorded() {
        let customers = demo_customers();
        let (_, segment) = high_spenders(&customers);
        let service = CampaignService::new(Arc::new(SimulatedChannel::new(1.0, Some(3))));

        let campaign = service.send(&segment, &customers[..2], "Hello [Name]").unwrap();
        let stats = campaign.statistics();
        assert_eq!(stats.messages_failed, 2);
        assert_eq!(stats.failure_rate, 100.0);
    }

    #[test]
    fn test_segment_statistics_and_history() {
        let customers = demo_customers();
        let (_, segment) = high_spenders(&customers);
        let service = CampaignService::new(Arc::new(AlwaysDeliver));

        let demo = service.seed_demo_history(&segment);
        assert_eq!(demo.logs.len(), 3);
        service.send(&segment, &customers[..1], "Welcome back [Name]").unwrap();

        let stats = service.segment_statistics(&segment.id);
        // Alice twice, Bob, Charlie
        assert_eq!(stats.audience_size, 3);
        assert_eq!(stats.total_messages, 4);
        assert_eq!(stats.messages_failed, 1);
        assert_eq!(stats.success_rate, 75.0);

        let alice = service.customer_history("1");
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].message, "Welcome back Alice");
        assert_eq!(alice[1].status, DeliveryStatus::Sent);

        assert!(matches!(
            service.statistics(&Uuid::new_v4()),
            Err(AudienceError::NotFound(_))
        ));
    }

    #[test]
    fn test_recipient_histories_grouped_by_customer() {
        let customers = demo_customers();
        let (_, segment) = high_spenders(&customers);
        let service = CampaignService::new(Arc::new(AlwaysDeliver));

        service.seed_demo_history(&segment);
        service.send(&segment, &customers[..1], "Welcome back [Name]").unwrap();

        let histories = service.recipient_histories(&segment.id);
        let names: Vec<&str> = histories.iter().map(|h| h.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(histories[0].logs.len(), 2);
        assert_eq!(histories[1].logs[0].status, DeliveryStatus::Failed);

        assert!(service.recipient_histories(&Uuid::new_v4()).is_empty());
    }
}
