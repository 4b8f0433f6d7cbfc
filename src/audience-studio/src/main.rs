//! Audience Studio: customer segmentation and campaign messaging from the command line.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::sync::Arc;

use anyhow::Context;
use audience_campaigns::{AlwaysDeliver, CampaignService, DeliveryChannel, SimulatedChannel};
use audience_core::config::{AppConfig, CampaignConfig, LogFormat};
use audience_core::{CustomerDirectory, ZeroValuePolicy};
use audience_segmentation::{parse_condition, Condition, SegmentFilterEngine, SegmentRegistry};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "audience-studio")]
#[command(about = "Customer segmentation and campaign messaging")]
#[command(version)]
struct Cli {
    /// Compare zero-valued attributes instead of skipping them
    #[arg(long, global = true, default_value_t = false)]
    compare_zero: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every customer in the directory
    Customers,
    /// Show the customers matching a set of conditions
    Preview {
        /// Condition such as "totalSpend > 400" or "or visits >= 10"; repeatable, applied in order
        #[arg(short, long = "condition", value_parser = condition_arg)]
        conditions: Vec<Condition>,
    },
    /// Show how each condition evaluated for one customer
    Explain {
        #[arg(long)]
        customer: String,
        #[arg(short, long = "condition", value_parser = condition_arg)]
        conditions: Vec<Condition>,
    },
    /// Create a segment and send it a campaign message
    Send {
        /// Segment name
        #[arg(long)]
        name: String,
        #[arg(short, long = "condition", value_parser = condition_arg)]
        conditions: Vec<Condition>,
        /// Message template; `[Name]` is replaced per customer
        #[arg(short, long)]
        message: String,
    },
    /// List saved segments
    Segments,
    /// Show past campaigns for a saved segment with per-customer history
    Campaigns {
        /// Segment name, matched case-insensitively
        #[arg(long)]
        segment: String,
    },
}

fn condition_arg(text: &str) -> Result<Condition, String> {
    parse_condition(text).map_err(|e| e.to_string())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "audience_studio=info,audience_segmentation=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn delivery_channel(config: &CampaignConfig) -> Arc<dyn DeliveryChannel> {
    if config.failure_rate > 0.0 {
        Arc::new(SimulatedChannel::new(config.failure_rate, config.rng_seed))
    } else {
        Arc::new(AlwaysDeliver)
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_result = AppConfig::load();
    let mut config = config_result.as_ref().cloned().unwrap_or_default();
    init_tracing(config.log_format);
    if let Err(e) = &config_result {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    if cli.compare_zero {
        config.segmentation.zero_value_policy = ZeroValuePolicy::Compare;
    }

    info!(
        zero_value_policy = ?config.segmentation.zero_value_policy,
        failure_rate = config.campaigns.failure_rate,
        "Configuration loaded"
    );

    let engine = SegmentFilterEngine::with_zero_policy(config.segmentation.zero_value_policy);
    let directory = CustomerDirectory::demo();
    let registry = if config.segmentation.seed_demo_segments {
        SegmentRegistry::with_demo_segments(engine)
    } else {
        SegmentRegistry::new(engine)
    };

    match cli.command {
        Command::Customers => print_json(&directory.list()),
        Command::Preview { conditions } => {
            let matched = engine.filter_customers(directory.list(), &conditions);
            print_json(&serde_json::json!({
                "segment_size": matched.len(),
                "customers": matched,
            }))
        }
        Command::Explain {
            customer,
            conditions,
        } => {
            let record = directory
                .get(&customer)
                .with_context(|| format!("customer '{customer}' not found"))?;
            print_json(&engine.explain(record, &conditions))
        }
        Command::Send {
            name,
            conditions,
            message,
        } => {
            let segment = registry.create_segment(&name, conditions, directory.list())?;
            let recipients = registry.preview(&segment.id, directory.list())?;

            let service = CampaignService::new(delivery_channel(&config.campaigns));
            let campaign = service.send(&segment, &recipients, &message)?;

            print_json(&serde_json::json!({
                "segment": segment,
                "campaign_id": campaign.id,
                "statistics": campaign.statistics(),
                "logs": campaign.logs,
            }))
        }
        Command::Segments => print_json(&registry.list_segments()),
        Command::Campaigns { segment } => {
            let segment = registry
                .find_segment_by_name(&segment)
                .with_context(|| format!("segment '{segment}' not found"))?;
            let service = CampaignService::new(delivery_channel(&config.campaigns));
            service.seed_demo_history(&segment);

            print_json(&serde_json::json!({
                "segment": segment.name,
                "campaigns": service.campaigns_for_segment(&segment.id),
                "statistics": service.segment_statistics(&segment.id),
                "customers": service.recipient_histories(&segment.id),
            }))
        }
    }
}
