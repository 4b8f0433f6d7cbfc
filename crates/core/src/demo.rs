//! Seed data for development and tests.

use crate::types::Customer;
use chrono::NaiveDate;

struct Seed {
    id: &'static str,
    name: &'static str,
    total_spend: f64,
    visits: u64,
    last_visit_months: f64,
    profile: Option<(u32, (i32, u32, u32))>,
}

const SEEDS: [Seed; 10] = [
    Seed { id: "1", name: "Alice", total_spend: 500.0, visits: 10, last_visit_months: 1.0, profile: Some((25, (2024, 1, 1))) },
    Seed { id: "2", name: "Bob", total_spend: 200.0, visits: 5, last_visit_months: 2.0, profile: Some((30, (2024, 2, 1))) },
    Seed { id: "3", name: "Charlie", total_spend: 300.0, visits: 8, last_visit_months: 3.0, profile: Some((28, (2024, 3, 1))) },
    Seed { id: "4", name: "David", total_spend: 800.0, visits: 15, last_visit_months: 0.5, profile: Some((35, (2024, 4, 1))) },
    Seed { id: "5", name: "Eve", total_spend: 600.0, visits: 12, last_visit_months: 1.5, profile: Some((22, (2024, 5, 1))) },
    Seed { id: "6", name: "Frank", total_spend: 1000.0, visits: 20, last_visit_months: 0.2, profile: Some((40, (2024, 6, 1))) },
    Seed { id: "7", name: "Grace", total_spend: 350.0, visits: 6, last_visit_months: 4.0, profile: Some((27, (2024, 7, 1))) },
    Seed { id: "8", name: "Hannah", total_spend: 450.0, visits: 9, last_visit_months: 2.5, profile: Some((29, (2024, 8, 1))) },
    Seed { id: "9", name: "Ivy", total_spend: 700.0, visits: 11, last_visit_months: 1.0, profile: None },
    Seed { id: "10", name: "Jake", total_spend: 150.0, visits: 3, last_visit_months: 5.0, profile: None },
];

/// The ten demo customers, ordered by id.
pub fn demo_customers() -> Vec<Customer> {
    SEEDS
        .iter()
        .map(|seed| {
            let mut customer = Customer::new(seed.id, seed.name)
                .with_spend(seed.total_spend)
                .with_visits(seed.visits)
                .with_last_visit_months(seed.last_visit_months);
            if let Some((age, (y, m, d))) = seed.profile {
                customer = customer.with_email(format!("{}@example.com", seed.name.to_lowercase()));
                customer.age = Some(age);
                customer.join_date = NaiveDate::from_ymd_opt(y, m, d);
            }
            customer
        })
        .collect()
}
