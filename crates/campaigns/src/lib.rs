//! Campaign messaging: personalization, simulated delivery, and
//! statistics for past campaigns.

pub mod delivery;
pub mod message;
pub mod service;
pub mod stats;

pub use delivery::{AlwaysDeliver, DeliveryChannel, SimulatedChannel};
pub use message::personalize;
pub use service::CampaignService;
pub use stats::{
    Campaign, CampaignStatistics, CommunicationLog, CustomerHistory, DeliveryStatus,
};
