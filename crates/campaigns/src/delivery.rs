//! Delivery channels. Nothing leaves the process; delivery outcomes are simulated.

use audience_core::Customer;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::stats::DeliveryStatus;

pub trait DeliveryChannel: Send + Sync {
    fn name(&self) -> &str;
    fn deliver(&self, customer: &Customer, message: &str) -> DeliveryStatus;
}

/// Every message is reported as sent.
pub struct AlwaysDeliver;

impl DeliveryChannel for AlwaysDeliver {
    fn name(&self) -> &str {
        "always-deliver"
    }

    fn deliver(&self, _customer: &Customer, _message: &str) -> DeliveryStatus {
        DeliveryStatus::Sent
    }
}

/// Fails each delivery independently with probability `failure_rate`.
pub struct SimulatedChannel {
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedChannel {
    pub fn new(failure_rate: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            failure_rate: failure_rate.clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl DeliveryChannel for SimulatedChannel {
    fn name(&self) -> &str {
        "simulated"
    }

    fn deliver(&self, _customer: &Customer, _message: &str) -> DeliveryStatus {
        if self.rng.lock().gen_bool(self.failure_rate) {
            DeliveryStatus::Failed
        } else {
            DeliveryStatus::Sent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_rates() {
        let customer = Customer::new("1", "Alice");
        let never = SimulatedChannel::new(0.0, Some(1));
        let always = SimulatedChannel::new(1.0, Some(1));
        for _ in 0..50 {
            assert_eq!(never.deliver(&customer, "hi"), DeliveryStatus::Sent);
            assert_eq!(always.deliver(&customer, "hi"), DeliveryStatus::Failed);
        }
    }

    #[test]
    fn test_rate_is_clamped_and_seed_is_reproducible() {
        assert_eq!(SimulatedChannel::new(3.0, None).failure_rate(), 1.0);
        assert_eq!(SimulatedChannel::new(-1.0, None).failure_rate(), 0.0);

        let customer = Customer::new("1", "Alice");
        let a = SimulatedChannel::new(0.5, Some(42));
        let b = SimulatedChannel::new(0.5, Some(42));
        let run_a: Vec<_> = (0..20).map(|_| a.deliver(&customer, "m")).collect();
        let run_b: Vec<_> = (0..20).map(|_| b.deliver(&customer, "m")).collect();
        assert_eq!(run_a, run_b);
    }
}
